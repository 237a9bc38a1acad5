mod common;

use sandbox_core::{
    build_headless_app, BlueprintKind, EditorState, SandboxConfigHandle, SandboxMetrics,
    SandboxScene,
};

#[test]
fn app_initializes() {
    common::ensure_test_config();
    let mut app = build_headless_app();
    // first update runs Startup, which populates the board
    app.update();

    let editor = app.world.resource::<EditorState>();
    assert_eq!(editor.dim(), 40);
    assert_eq!(editor.blueprint_kind(), Some(BlueprintKind::Lake));

    let scene = app.world.resource::<SandboxScene>();
    assert_eq!(scene.terrain.rebuilds(), 1);
    assert_eq!(scene.objects.live_count(), editor.object_count());

    let metrics = app.world.resource::<SandboxMetrics>();
    assert_eq!(metrics.updates, 1);
    assert_eq!(metrics.water_cells, 400);
    assert_eq!(metrics.live_objects, editor.object_count());
}

#[test]
fn app_records_where_its_config_came_from() {
    common::ensure_test_config();
    let app = build_headless_app();

    let handle = app.world.resource::<SandboxConfigHandle>();
    let source = handle.source().expect("fixture config path");
    assert_eq!(source, common::fixture_path().as_path());
    assert_eq!(handle.describe_source(), source.display().to_string());
    assert_eq!(handle.get().generation.seed, 1337);
    assert_eq!(handle.get().board.dim, 40);
}
