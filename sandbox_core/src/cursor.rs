use bevy::math::Vec3;
use bevy::prelude::Resource;

use crate::{
    components::{Cell, ElementKind},
    editor::{EditAction, EditorMode, EditorSelection},
    footprint::can_place,
    grid::Blueprint,
    picking::hit_to_cell,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorFeedback {
    #[default]
    Hidden,
    Visible { cell: Cell, valid: bool },
}

/// Latest cursor feedback for the renderer, recomputed every update from the
/// last pick-plane hit.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    pub feedback: CursorFeedback,
    pub last_hit: Option<Vec3>,
}

/// Where the edit cursor sits for a pick-plane hit and whether the pending
/// action would succeed there. Never mutates anything.
///
/// The last row and column hide the cursor in both sub-modes.
pub fn cursor_feedback(
    blueprint: &Blueprint,
    selection: &EditorSelection,
    hit: Vec3,
) -> CursorFeedback {
    if selection.mode == EditorMode::View {
        return CursorFeedback::Hidden;
    }
    let Some(cell) = hit_to_cell(hit) else {
        return CursorFeedback::Hidden;
    };
    let limit = blueprint.dim().saturating_sub(1);
    if cell.i >= limit || cell.j >= limit {
        return CursorFeedback::Hidden;
    }

    let valid = match selection.action {
        EditAction::Add => selection
            .element
            .footprint()
            .map_or(false, |size| can_place(blueprint, cell, size)),
        EditAction::Remove => blueprint.get(cell) != Some(ElementKind::Land),
    };
    CursorFeedback::Visible { cell, valid }
}
