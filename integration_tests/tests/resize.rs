mod common;

use std::collections::BTreeSet;

use anyhow::Result;
use sandbox_core::{
    build_headless_app, AssetHandle, EditorState, ElementKind, ResizeBoard, SandboxMetrics,
    SandboxScene,
};

fn live_handles(scene: &SandboxScene) -> BTreeSet<AssetHandle> {
    scene.objects.live().map(|(handle, _)| handle).collect()
}

#[test]
fn resize_forty_to_sixty_repopulates_without_stale_handles() -> Result<()> {
    common::ensure_test_config();
    let mut app = build_headless_app();
    app.update();

    let before = live_handles(app.world.resource::<SandboxScene>());
    assert!(!before.is_empty());

    app.world.send_event(ResizeBoard { dim: 60 });
    app.update();

    let editor = app.world.resource::<EditorState>();
    let scene = app.world.resource::<SandboxScene>();
    assert_eq!(editor.dim(), 60);
    assert_eq!(editor.board().assets.iter().count() % 4, 0);
    assert_eq!(
        editor.board().blueprint.count(ElementKind::Water),
        900,
        "lake covers the centre quarter"
    );

    let after = live_handles(scene);
    assert!(before.is_disjoint(&after));
    assert_eq!(scene.objects.disposed_count(), before.len() as u64);
    assert_eq!(after.len(), editor.object_count());
    for handle in editor.board().assets.iter() {
        assert!(after.contains(&handle), "stale handle {handle}");
        assert!(editor.object(handle).is_some());
    }
    for (cell, kind) in editor.board().blueprint.iter() {
        if kind.is_object() {
            let handle = editor.board().assets.get(cell);
            assert!(handle.is_some(), "anchor {cell} has no asset");
        }
    }
    assert_eq!(scene.terrain.rebuilds(), 2);

    let metrics = app.world.resource::<SandboxMetrics>();
    assert_eq!(metrics.resizes_applied, 1);
    assert_eq!(metrics.edits_applied, 0);
    Ok(())
}

#[test]
fn invalid_resize_is_rejected() -> Result<()> {
    common::ensure_test_config();
    let mut app = build_headless_app();
    app.update();
    let fingerprint = app
        .world
        .resource::<EditorState>()
        .board()
        .blueprint
        .fingerprint();

    for dim in [18, 42, 64] {
        app.world.send_event(ResizeBoard { dim });
    }
    app.update();

    let editor = app.world.resource::<EditorState>();
    assert_eq!(editor.dim(), 40);
    assert_eq!(editor.board().blueprint.fingerprint(), fingerprint);
    let metrics = app.world.resource::<SandboxMetrics>();
    assert_eq!(metrics.resizes_rejected, 3);
    assert_eq!(metrics.resizes_applied, 0);
    assert_eq!(metrics.edits_rejected, 0);
    Ok(())
}
