use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::{
    config::SandboxConfigHandle,
    cursor::{cursor_feedback, CursorFeedback, CursorState},
    editor::{EditorSelection, EditorState, PointerOutcome, RemoveOutcome},
    metrics::SandboxMetrics,
    picking::{AnimationQueue, PickChange},
    scene::{AssetHandle, SandboxScene},
};

/// Pointer ray crossed the pick plane at `hit`.
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerMoved {
    pub hit: Vec3,
}

/// Primary button pressed. `picked` is the object under the pointer, if the
/// renderer's scene raycast found one.
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerPressed {
    pub hit: Vec3,
    pub picked: Option<AssetHandle>,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ResizeBoard {
    pub dim: u32,
}

/// Random source shared by generation and layout picks.
#[derive(Resource)]
pub struct BoardRng(pub ChaCha8Rng);

/// Populate the board once assets are available.
pub fn spawn_initial_board(
    config: Res<SandboxConfigHandle>,
    mut editor: ResMut<EditorState>,
    mut scene: ResMut<SandboxScene>,
    mut rng: ResMut<BoardRng>,
) {
    let settings = config.get();
    tracing::info!(
        target: "terra_sandbox::config",
        source = %config.describe_source(),
        seed = settings.generation.seed,
        dim = settings.board.dim,
        "sandbox_config.active"
    );
    editor.regenerate(&mut rng.0, &mut *scene);
}

pub fn apply_resize_requests(
    mut requests: EventReader<ResizeBoard>,
    mut editor: ResMut<EditorState>,
    mut scene: ResMut<SandboxScene>,
    mut rng: ResMut<BoardRng>,
    mut metrics: ResMut<SandboxMetrics>,
) {
    for request in requests.read() {
        match editor.resize(request.dim, &mut rng.0, &mut *scene) {
            Ok(_) => metrics.record_resize(true),
            Err(err) => {
                tracing::warn!(
                    target: "terra_sandbox::editor",
                    dim = request.dim,
                    error = %err,
                    "editor.resize.rejected"
                );
                metrics.record_resize(false);
            }
        }
    }
}

/// Applies pointer presses. The animation queue only carries cues raised
/// during the current update.
pub fn apply_pointer_presses(
    mut presses: EventReader<PointerPressed>,
    selection: Res<EditorSelection>,
    mut editor: ResMut<EditorState>,
    mut scene: ResMut<SandboxScene>,
    mut animations: ResMut<AnimationQueue>,
    mut metrics: ResMut<SandboxMetrics>,
) {
    animations.clear();
    for press in presses.read() {
        match editor.apply_pointer(&selection, press.hit, press.picked, &mut *scene) {
            Ok(PointerOutcome::Picked {
                change: PickChange::Highlighted { current, .. },
                cue: Some(cue),
            }) => animations.push(current, cue),
            Ok(PointerOutcome::Picked { .. })
            | Ok(PointerOutcome::Missed)
            | Ok(PointerOutcome::Removed(RemoveOutcome::Nothing)) => {}
            Ok(PointerOutcome::Added(_)) | Ok(PointerOutcome::Removed(_)) => {
                metrics.record_edit(true)
            }
            Err(err) => {
                tracing::debug!(
                    target: "terra_sandbox::editor",
                    error = %err,
                    "editor.pointer.rejected"
                );
                metrics.record_edit(false);
            }
        }
    }
}

pub fn update_cursor(
    mut moves: EventReader<PointerMoved>,
    selection: Res<EditorSelection>,
    editor: Res<EditorState>,
    mut cursor: ResMut<CursorState>,
) {
    if let Some(moved) = moves.read().last() {
        cursor.last_hit = Some(moved.hit);
    }
    let feedback = match cursor.last_hit {
        Some(hit) => cursor_feedback(&editor.board().blueprint, &selection, hit),
        None => CursorFeedback::Hidden,
    };
    if cursor.feedback != feedback {
        cursor.feedback = feedback;
    }
}
