use bevy::prelude::*;

use crate::{
    components::ElementKind, editor::EditorState, mapgen::BlueprintKind, scene::SandboxScene,
};

#[derive(Resource, Default, Debug, Clone)]
pub struct SandboxMetrics {
    pub updates: u64,
    pub dim: u32,
    pub blueprint: Option<BlueprintKind>,
    pub land_cells: usize,
    pub water_cells: usize,
    pub tree_count: usize,
    pub rock_count: usize,
    pub live_objects: usize,
    pub terrain_rebuilds: u64,
    pub edits_applied: u64,
    pub edits_rejected: u64,
    pub resizes_applied: u64,
    pub resizes_rejected: u64,
}

impl SandboxMetrics {
    pub fn record_edit(&mut self, applied: bool) {
        if applied {
            self.edits_applied += 1;
        } else {
            self.edits_rejected += 1;
        }
    }

    pub fn record_resize(&mut self, applied: bool) {
        if applied {
            self.resizes_applied += 1;
        } else {
            self.resizes_rejected += 1;
        }
    }
}

pub fn collect_metrics(
    editor: Res<EditorState>,
    scene: Res<SandboxScene>,
    mut metrics: ResMut<SandboxMetrics>,
) {
    metrics.updates += 1;
    let blueprint = &editor.board().blueprint;
    metrics.dim = blueprint.dim();
    metrics.blueprint = editor.blueprint_kind();
    metrics.land_cells = blueprint.count(ElementKind::Land);
    metrics.water_cells = blueprint.count(ElementKind::Water);
    metrics.tree_count = blueprint.count(ElementKind::Tree);
    metrics.rock_count = blueprint.count(ElementKind::Rock);
    metrics.live_objects = scene.objects.live_count();
    metrics.terrain_rebuilds = scene.terrain.rebuilds();
}
