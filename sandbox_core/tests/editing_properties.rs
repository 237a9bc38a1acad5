use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sandbox_core::{
    can_place, AddOutcome, AssetFactory, AssetHandle, Blueprint, BlueprintKind, Cell, EditError,
    EditorState, ElementKind, ObjectKind, RemoveOutcome, SandboxConfig, SandboxScene, ScaleRange,
    TerrainMesher,
};

/// Records every call so tests can assert on the exact collaborator traffic.
#[derive(Default)]
struct RecordingScene {
    next: u64,
    instantiated: Vec<(AssetHandle, ObjectKind)>,
    disposed: Vec<AssetHandle>,
    positioned: Vec<(AssetHandle, Cell)>,
    rebuilds: usize,
}

impl AssetFactory for RecordingScene {
    fn instantiate(&mut self, kind: ObjectKind) -> AssetHandle {
        self.next += 1;
        let handle = AssetHandle(self.next);
        self.instantiated.push((handle, kind));
        handle
    }

    fn dispose(&mut self, handle: AssetHandle) {
        self.disposed.push(handle);
    }

    fn set_position(&mut self, handle: AssetHandle, anchor: Cell) {
        self.positioned.push((handle, anchor));
    }

    fn set_random_y_rotation(&mut self, _handle: AssetHandle) {}

    fn set_random_scale(&mut self, _handle: AssetHandle, _range: ScaleRange) {}
}

impl TerrainMesher for RecordingScene {
    fn rebuild_merged_terrain(&mut self, _blueprint: &Blueprint) {
        self.rebuilds += 1;
    }
}

fn config(dim: u32, blueprint: Option<BlueprintKind>) -> SandboxConfig {
    let mut config = SandboxConfig::default();
    config.board.dim = dim;
    config.generation.seed = 17;
    config.generation.blueprint = blueprint;
    config
}

#[test]
fn successful_object_adds_stay_inside_the_board() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut editor = EditorState::new(&config(20, None)).unwrap();
    let mut scene = RecordingScene::default();

    for _ in 0..400 {
        let kind = if rng.gen_bool(0.5) {
            ElementKind::Tree
        } else {
            ElementKind::Rock
        };
        let cell = Cell::new(rng.gen_range(0..22), rng.gen_range(0..22));
        match editor.add(kind, cell, &mut scene) {
            Ok(AddOutcome::Object(placed)) => {
                let cells: Vec<Cell> = placed.footprint().collect();
                assert_eq!(cells.len(), 4);
                for covered in &cells {
                    assert!(editor.board().within_bounds(*covered));
                    assert_eq!(editor.board().assets.get(*covered), Some(placed.handle));
                }
                assert_eq!(editor.board().get(cells[0]), Some(kind));
                for filler in &cells[1..] {
                    assert_eq!(editor.board().get(*filler), Some(ElementKind::Filler));
                    assert_eq!(editor.board().blueprint.anchor_of(*filler), Some(placed.anchor));
                }
            }
            Ok(other) => panic!("unexpected outcome {other:?}"),
            Err(EditError::PlacementBlocked { .. }) | Err(EditError::OutOfBounds(_)) => {}
            Err(err) => panic!("unexpected error {err}"),
        }
    }
    assert_eq!(scene.rebuilds, 0);
    assert_eq!(scene.instantiated.len(), editor.object_count());
}

#[test]
fn placement_gate_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut blueprint = Blueprint::new(12);
    for _ in 0..30 {
        let cell = Cell::new(rng.gen_range(0..12), rng.gen_range(0..12));
        blueprint.set(cell, ElementKind::Water).unwrap();
    }

    for i in 0..14 {
        for j in 0..14 {
            let origin = Cell::new(i, j);
            let expected = i + 2 <= 12
                && j + 2 <= 12
                && [(0, 0), (0, 1), (1, 0), (1, 1)]
                    .iter()
                    .all(|(di, dj)| blueprint.get(origin.offset(*di, *dj)) == Some(ElementKind::Land));
            assert_eq!(can_place(&blueprint, origin, 2), expected, "origin {origin}");
        }
    }
}

#[test]
fn add_then_remove_round_trips_from_every_footprint_cell() {
    for kind in [ElementKind::Tree, ElementKind::Rock] {
        for (di, dj) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let mut editor = EditorState::new(&config(20, None)).unwrap();
            let mut scene = RecordingScene::default();
            let anchor = Cell::new(8, 11);
            let before = editor.board().clone();

            let AddOutcome::Object(placed) = editor.add(kind, anchor, &mut scene).unwrap() else {
                panic!("expected object");
            };
            let removed = editor.remove(anchor.offset(di, dj), &mut scene).unwrap();

            assert_eq!(removed, RemoveOutcome::Object(placed));
            assert_eq!(editor.board(), &before);
            assert_eq!(scene.disposed, vec![placed.handle]);
        }
    }
}

#[test]
fn every_filler_resolves_to_its_anchor_after_generation() {
    for kind in BlueprintKind::ALL {
        let mut editor = EditorState::new(&config(40, Some(kind))).unwrap();
        let mut scene = SandboxScene::new(4);
        editor.regenerate(&mut ChaCha8Rng::seed_from_u64(31), &mut scene);

        let blueprint = &editor.board().blueprint;
        for (cell, element) in blueprint.iter() {
            if element != ElementKind::Filler {
                continue;
            }
            let anchor = blueprint.anchor_of(cell).expect("filler anchor");
            assert_eq!(blueprint.anchor_of(cell), Some(anchor));
            assert!(blueprint.get(anchor).map_or(false, ElementKind::is_object));
            assert_eq!(
                editor.board().assets.get(cell),
                editor.board().assets.get(anchor),
                "filler {cell} does not share its anchor's handle"
            );
        }
    }
}

#[test]
fn water_at_five_five_touches_one_cell_and_rebuilds_once() {
    let mut editor = EditorState::new(&config(40, None)).unwrap();
    let mut scene = RecordingScene::default();
    let before = editor.board().clone();

    let outcome = editor
        .add(ElementKind::Water, Cell::new(5, 5), &mut scene)
        .unwrap();

    assert_eq!(outcome, AddOutcome::Water { cell: Cell::new(5, 5) });
    assert_eq!(scene.rebuilds, 1);
    assert!(scene.instantiated.is_empty());
    for (cell, element) in editor.board().blueprint.iter() {
        let expected = if cell == Cell::new(5, 5) {
            ElementKind::Water
        } else {
            before.get(cell).unwrap()
        };
        assert_eq!(element, expected, "cell {cell}");
    }
    assert_eq!(editor.board().assets.iter().count(), 0);
}

#[test]
fn river_on_forty_keeps_objects_out_of_the_band() {
    let mut editor = EditorState::new(&config(40, Some(BlueprintKind::River))).unwrap();
    let mut scene = SandboxScene::new(8);
    editor.regenerate(&mut ChaCha8Rng::seed_from_u64(8), &mut scene);

    for (cell, element) in editor.board().blueprint.iter() {
        let in_band = (20..30).contains(&cell.j);
        if in_band {
            assert_eq!(element, ElementKind::Water, "cell {cell}");
        } else {
            assert_ne!(element, ElementKind::Water, "cell {cell}");
        }
    }
    for placed in editor.objects() {
        for cell in placed.footprint() {
            assert!(!(20..30).contains(&cell.j), "{:?} footprint in river", placed.kind);
        }
    }
}

#[test]
fn regeneration_disposes_every_previous_handle() {
    let mut editor = EditorState::new(&config(40, Some(BlueprintKind::Island))).unwrap();
    let mut scene = RecordingScene::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    editor.regenerate(&mut rng, &mut scene);
    let first: Vec<AssetHandle> = scene.instantiated.iter().map(|(h, _)| *h).collect();
    assert!(!first.is_empty());

    editor.resize(60, &mut rng, &mut scene).unwrap();
    let mut disposed = scene.disposed.clone();
    disposed.sort();
    assert_eq!(disposed, first);
    assert_eq!(scene.rebuilds, 2);
    for handle in editor.board().assets.iter() {
        assert!(!first.contains(&handle), "stale handle {handle}");
    }
    assert_eq!(
        scene.positioned.len(),
        scene.instantiated.len(),
        "every instantiated object is positioned once"
    );
}
