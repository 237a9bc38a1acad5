//! Pointer-to-board projection and object pick tracking.

use bevy::math::{Mat4, Vec2, Vec3};
use bevy::prelude::Resource;

use crate::{
    components::{AnimationCue, Cell},
    scene::AssetHandle,
};

const PARALLEL_EPSILON: f32 = 1e-6;

/// Converts a pixel position to normalised device coordinates in `[-1, 1]`,
/// with `y` pointing up. `None` for an empty viewport.
pub fn pointer_to_ndc(pixel: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        pixel.x / viewport.x * 2.0 - 1.0,
        -(pixel.y / viewport.y) * 2.0 + 1.0,
    ))
}

/// Floors the planar coordinates of a world point onto the board
/// (`x → i`, `z → j`). Points with a negative coordinate have no cell.
pub fn hit_to_cell(hit: Vec3) -> Option<Cell> {
    let (x, z) = (hit.x.floor(), hit.z.floor());
    if !x.is_finite() || !z.is_finite() || x < 0.0 || z < 0.0 {
        return None;
    }
    if x > u32::MAX as f32 || z > u32::MAX as f32 {
        return None;
    }
    Some(Cell::new(x as u32, z as u32))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    /// Unprojects an NDC point through the inverse view-projection matrix,
    /// from the near plane (`z = -1`) to the far plane (`z = 1`).
    pub fn from_ndc(ndc: Vec2, inverse_view_projection: Mat4) -> Option<Self> {
        let near = inverse_view_projection.project_point3(ndc.extend(-1.0));
        let far = inverse_view_projection.project_point3(ndc.extend(1.0));
        let direction = (far - near).try_normalize()?;
        near.is_finite().then_some(Self {
            origin: near,
            direction,
        })
    }

    /// Point where the ray crosses the horizontal plane `y = height`, if it
    /// does so in front of the origin.
    pub fn intersect_plane_y(&self, height: f32) -> Option<Vec3> {
        if self.direction.y.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then(|| self.origin + self.direction * t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickChange {
    Highlighted {
        current: AssetHandle,
        previous: Option<AssetHandle>,
    },
    Cleared {
        previous: AssetHandle,
    },
    Unchanged,
}

/// Remembers which object is highlighted in view mode.
#[derive(Debug, Clone, Default)]
pub struct PickTracker {
    highlighted: Option<AssetHandle>,
}

impl PickTracker {
    pub fn highlighted(&self) -> Option<AssetHandle> {
        self.highlighted
    }

    pub fn pick(&mut self, picked: Option<AssetHandle>) -> PickChange {
        let previous = self.highlighted;
        match (picked, previous) {
            (Some(current), Some(prev)) if current == prev => PickChange::Unchanged,
            (Some(current), _) => {
                self.highlighted = Some(current);
                PickChange::Highlighted { current, previous }
            }
            (None, Some(prev)) => {
                self.highlighted = None;
                PickChange::Cleared { previous: prev }
            }
            (None, None) => PickChange::Unchanged,
        }
    }

    /// Drops the highlight when its object leaves the scene.
    pub fn forget(&mut self, handle: AssetHandle) {
        if self.highlighted == Some(handle) {
            self.highlighted = None;
        }
    }

    pub fn clear(&mut self) {
        self.highlighted = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedAnimation {
    pub handle: AssetHandle,
    pub cue: AnimationCue,
}

/// Cues raised by the latest update. Cleared when the next update applies
/// pointer presses, so a renderer reads or drains it between updates.
#[derive(Resource, Debug, Default, Clone)]
pub struct AnimationQueue {
    pending: Vec<QueuedAnimation>,
}

impl AnimationQueue {
    pub fn push(&mut self, handle: AssetHandle, cue: AnimationCue) {
        self.pending.push(QueuedAnimation { handle, cue });
    }

    pub fn pending(&self) -> &[QueuedAnimation] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<QueuedAnimation> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
