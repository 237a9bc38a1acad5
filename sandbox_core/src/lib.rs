//! Core model for the Terra Sandbox terrain editor.
//!
//! Generates square boards of land, water, trees and rocks, and applies
//! pointer-driven edits to them. Rendering stays outside the crate behind the
//! [`AssetFactory`] and [`TerrainMesher`] traits; [`build_headless_app`] wires
//! everything into a Bevy app driven by input events.

mod components;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod footprint;
pub mod grid;
mod hashing;
pub mod mapgen;
pub mod mesh;
pub mod metrics;
pub mod picking;
pub mod scene;
mod systems;

use std::{path::PathBuf, sync::Arc};

use bevy::prelude::*;

pub use components::{AnimationCue, Cell, ElementKind, ObjectKind, PlacedObject};
pub use config::{
    load_sandbox_config_from_env, BoardConfig, BoardSizeError, SandboxConfig, SandboxConfigError,
    SandboxConfigHandle, ScaleRange,
};
pub use cursor::{cursor_feedback, CursorFeedback, CursorState};
pub use editor::{
    AddOutcome, EditAction, EditError, EditorMode, EditorSelection, EditorState, PointerOutcome,
    RemoveOutcome,
};
pub use footprint::can_place;
pub use grid::{AssetReferences, Blueprint, Board, GridError};
pub use mapgen::{board_rng, generate_blueprint, BlueprintKind, GenerationReport};
pub use metrics::SandboxMetrics;
pub use picking::{AnimationQueue, PickChange, PickRay, QueuedAnimation};
pub use scene::{AssetFactory, AssetHandle, SandboxScene, TerrainMesher};
pub use systems::{BoardRng, PointerMoved, PointerPressed, ResizeBoard};

/// Construct a Bevy [`App`] using the configuration named by
/// `SANDBOX_CONFIG_PATH`, or the builtin one.
pub fn build_headless_app() -> App {
    let (config, source) = load_sandbox_config_from_env();
    match build_app_with_source(config, source) {
        Ok(app) => app,
        Err(err) => {
            tracing::warn!(
                target: "terra_sandbox::config",
                error = %err,
                "sandbox_config.rejected"
            );
            build_app(SandboxConfig::builtin()).expect("builtin sandbox config should be valid")
        }
    }
}

/// Construct a Bevy [`App`] for an explicit configuration.
///
/// The board is generated on the first update; afterwards each update applies
/// resize requests, then pointer presses, then refreshes the cursor and
/// metrics.
pub fn build_app(config: Arc<SandboxConfig>) -> Result<App, EditError> {
    build_app_with_source(config, None)
}

fn build_app_with_source(
    config: Arc<SandboxConfig>,
    source: Option<PathBuf>,
) -> Result<App, EditError> {
    let editor = EditorState::new(&config)?;
    let seed = config.generation.seed;

    let mut app = App::new();
    app.insert_resource(SandboxConfigHandle::new(config, source))
        .insert_resource(editor)
        .insert_resource(SandboxScene::new(seed))
        .insert_resource(BoardRng(board_rng(seed)))
        .insert_resource(EditorSelection::default())
        .insert_resource(CursorState::default())
        .insert_resource(AnimationQueue::default())
        .insert_resource(SandboxMetrics::default())
        .add_event::<PointerMoved>()
        .add_event::<PointerPressed>()
        .add_event::<ResizeBoard>()
        .add_plugins(MinimalPlugins)
        .add_systems(Startup, systems::spawn_initial_board)
        .add_systems(
            Update,
            (
                systems::apply_resize_requests,
                systems::apply_pointer_presses,
                systems::update_cursor,
                metrics::collect_metrics,
            )
                .chain(),
        );

    Ok(app)
}
