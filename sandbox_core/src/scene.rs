//! Boundary with the rendering layer.
//!
//! The editor only talks to the scene through [`AssetFactory`] and
//! [`TerrainMesher`]. [`SandboxScene`] implements both in memory so the model
//! runs headless and a renderer can mirror it.

use std::collections::BTreeMap;
use std::fmt;

use bevy::prelude::{Resource, Vec3};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    components::{Cell, ObjectKind},
    config::ScaleRange,
    grid::Blueprint,
    mesh::{build_merged_terrain, MergedTerrain},
};

/// Opaque reference to a placed visual object owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(pub u64);

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait AssetFactory {
    fn instantiate(&mut self, kind: ObjectKind) -> AssetHandle;
    fn dispose(&mut self, handle: AssetHandle);
    fn set_position(&mut self, handle: AssetHandle, anchor: Cell);
    fn set_random_y_rotation(&mut self, handle: AssetHandle);
    fn set_random_scale(&mut self, handle: AssetHandle, range: ScaleRange);
}

pub trait TerrainMesher {
    fn rebuild_merged_terrain(&mut self, blueprint: &Blueprint);
}

/// Transform state of one live scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub translation: Vec3,
    pub yaw: f32,
    pub scale: f32,
}

/// In-memory asset factory. Handles are never reused within a session.
#[derive(Debug, Clone)]
pub struct SceneLedger {
    next_handle: u64,
    live: BTreeMap<AssetHandle, SceneObject>,
    disposed: u64,
    rng: SmallRng,
}

/// Salt mixed into configured seeds for the yaw/scale stream.
const SCENE_SEED_SALT: u64 = 0x5CE4_E0B1_ECA5_7000;

impl SceneLedger {
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed ^ SCENE_SEED_SALT)
        };
        Self {
            next_handle: 1,
            live: BTreeMap::new(),
            disposed: 0,
            rng,
        }
    }

    pub fn get(&self, handle: AssetHandle) -> Option<&SceneObject> {
        self.live.get(&handle)
    }

    pub fn live(&self) -> impl Iterator<Item = (AssetHandle, &SceneObject)> {
        self.live.iter().map(|(handle, object)| (*handle, object))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn disposed_count(&self) -> u64 {
        self.disposed
    }

    fn with_object(&mut self, handle: AssetHandle, op: &str, apply: impl FnOnce(&mut SceneObject)) {
        match self.live.get_mut(&handle) {
            Some(object) => apply(object),
            None => tracing::warn!(
                target: "terra_sandbox::scene",
                %handle,
                op,
                "scene.unknown_handle"
            ),
        }
    }
}

impl AssetFactory for SceneLedger {
    fn instantiate(&mut self, kind: ObjectKind) -> AssetHandle {
        let handle = AssetHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(
            handle,
            SceneObject {
                kind,
                translation: Vec3::ZERO,
                yaw: 0.0,
                scale: 1.0,
            },
        );
        handle
    }

    fn dispose(&mut self, handle: AssetHandle) {
        if self.live.remove(&handle).is_some() {
            self.disposed += 1;
        } else {
            tracing::warn!(
                target: "terra_sandbox::scene",
                %handle,
                op = "dispose",
                "scene.unknown_handle"
            );
        }
    }

    /// Centres the object on its footprint.
    fn set_position(&mut self, handle: AssetHandle, anchor: Cell) {
        self.with_object(handle, "set_position", |object| {
            let half = object.kind.element().footprint().unwrap_or(1) as f32 * 0.5;
            object.translation = Vec3::new(anchor.i as f32 + half, 0.0, anchor.j as f32 + half);
        });
    }

    fn set_random_y_rotation(&mut self, handle: AssetHandle) {
        let yaw = self.rng.gen_range(0.0..std::f32::consts::TAU);
        self.with_object(handle, "set_random_y_rotation", |object| object.yaw = yaw);
    }

    fn set_random_scale(&mut self, handle: AssetHandle, range: ScaleRange) {
        let scale = range.sample(&mut self.rng);
        self.with_object(handle, "set_random_scale", |object| object.scale = scale);
    }
}

/// Latest merged terrain plus a rebuild counter.
#[derive(Debug, Clone, Default)]
pub struct TerrainMeshCache {
    latest: Option<MergedTerrain>,
    rebuilds: u64,
}

impl TerrainMeshCache {
    pub fn latest(&self) -> Option<&MergedTerrain> {
        self.latest.as_ref()
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

impl TerrainMesher for TerrainMeshCache {
    fn rebuild_merged_terrain(&mut self, blueprint: &Blueprint) {
        let terrain = build_merged_terrain(blueprint);
        self.rebuilds += 1;
        tracing::debug!(
            target: "terra_sandbox::scene",
            rebuilds = self.rebuilds,
            ground_quads = terrain.ground.quad_count(),
            water_quads = terrain.water.quad_count(),
            "scene.terrain.rebuilt"
        );
        self.latest = Some(terrain);
    }
}

/// The scene collaborator exposed to Bevy systems.
#[derive(Resource, Debug, Clone)]
pub struct SandboxScene {
    pub objects: SceneLedger,
    pub terrain: TerrainMeshCache,
}

impl SandboxScene {
    pub fn new(seed: u64) -> Self {
        Self {
            objects: SceneLedger::new(seed),
            terrain: TerrainMeshCache::default(),
        }
    }
}

impl AssetFactory for SandboxScene {
    fn instantiate(&mut self, kind: ObjectKind) -> AssetHandle {
        self.objects.instantiate(kind)
    }

    fn dispose(&mut self, handle: AssetHandle) {
        self.objects.dispose(handle);
    }

    fn set_position(&mut self, handle: AssetHandle, anchor: Cell) {
        self.objects.set_position(handle, anchor);
    }

    fn set_random_y_rotation(&mut self, handle: AssetHandle) {
        self.objects.set_random_y_rotation(handle);
    }

    fn set_random_scale(&mut self, handle: AssetHandle, range: ScaleRange) {
        self.objects.set_random_scale(handle, range);
    }
}

impl TerrainMesher for SandboxScene {
    fn rebuild_merged_terrain(&mut self, blueprint: &Blueprint) {
        self.terrain.rebuild_merged_terrain(blueprint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_disposed_once() {
        let mut ledger = SceneLedger::new(7);
        let a = ledger.instantiate(ObjectKind::Tree);
        let b = ledger.instantiate(ObjectKind::Rock);
        assert_ne!(a, b);
        assert_eq!(ledger.live_count(), 2);

        ledger.dispose(a);
        ledger.dispose(a);
        assert_eq!(ledger.live_count(), 1);
        assert_eq!(ledger.disposed_count(), 1);

        let c = ledger.instantiate(ObjectKind::Tree);
        assert_ne!(c, a);
    }

    #[test]
    fn transforms_are_applied() {
        let mut ledger = SceneLedger::new(7);
        let handle = ledger.instantiate(ObjectKind::Tree);
        ledger.set_position(handle, Cell::new(4, 10));
        ledger.set_random_y_rotation(handle);
        ledger.set_random_scale(handle, ScaleRange { min: 0.5, max: 0.75 });

        let object = ledger.get(handle).unwrap();
        assert_eq!(object.translation, Vec3::new(5.0, 0.0, 11.0));
        assert!((0.0..std::f32::consts::TAU).contains(&object.yaw));
        assert!((0.5..=0.75).contains(&object.scale));
    }

    #[test]
    fn mesh_cache_counts_rebuilds() {
        let mut scene = SandboxScene::new(1);
        assert!(scene.terrain.latest().is_none());
        scene.rebuild_merged_terrain(&Blueprint::new(4));
        scene.rebuild_merged_terrain(&Blueprint::new(4));
        assert_eq!(scene.terrain.rebuilds(), 2);
        assert_eq!(scene.terrain.latest().unwrap().ground.quad_count(), 32);
    }
}
