//! Prints a generated board as text.
//!
//! `terrain_preview [DIM]` generates a board from the configured (or
//! `SANDBOX_CONFIG_PATH`) settings, optionally resizes it to `DIM`, and
//! writes the blueprint plus a metrics summary to stdout.

use sandbox_core::{
    build_headless_app, EditorState, ResizeBoard, SandboxConfigHandle, SandboxMetrics,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut app = build_headless_app();
    app.update();

    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<u32>() {
            Ok(dim) => {
                app.world.send_event(ResizeBoard { dim });
                app.update();
            }
            Err(err) => {
                tracing::warn!(
                    target: "terra_sandbox::preview",
                    arg = %arg,
                    error = %err,
                    "preview.bad_dim"
                );
            }
        }
    }

    let editor = app.world.resource::<EditorState>();
    println!("{}", editor.board().blueprint.to_ascii());

    let config = app.world.resource::<SandboxConfigHandle>();
    println!();
    println!(
        "config={} seed={}",
        config.describe_source(),
        config.get().generation.seed
    );

    let metrics = app.world.resource::<SandboxMetrics>();
    let layout = metrics.blueprint.map_or("none", |kind| kind.label());
    println!(
        "layout={layout} dim={} land={} water={} trees={} rocks={} objects={} rebuilds={}",
        metrics.dim,
        metrics.land_cells,
        metrics.water_cells,
        metrics.tree_count,
        metrics.rock_count,
        metrics.live_objects,
        metrics.terrain_rebuilds,
    );
    if metrics.resizes_rejected > 0 {
        println!("rejected resize requests: {}", metrics.resizes_rejected);
    }
}
