//! Procedural blueprint generators.
//!
//! Every generator is a function of the blueprint size and a random source.
//! Placement attempts that fail the footprint gate are skipped without retry,
//! so object density varies between runs.

use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::{
    components::{Cell, ElementKind, ObjectKind},
    footprint::{can_place, try_place_object},
    grid::Blueprint,
};

const PUDDLE_EXTRA_ATTEMPTS: u32 = 20;
const PUDDLE_MAX_SIDE: u32 = 5;

/// Salt mixed into configured seeds so board and scene streams differ.
pub const BOARD_SEED_SALT: u64 = 0xB0A2_D5EE_D000_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlueprintKind {
    River,
    Island,
    Lake,
    Puddles,
}

impl BlueprintKind {
    pub const ALL: [BlueprintKind; 4] = [
        BlueprintKind::River,
        BlueprintKind::Island,
        BlueprintKind::Lake,
        BlueprintKind::Puddles,
    ];

    /// Uniform pick among the four layouts.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn label(self) -> &'static str {
        match self {
            BlueprintKind::River => "river",
            BlueprintKind::Island => "island",
            BlueprintKind::Lake => "lake",
            BlueprintKind::Puddles => "puddles",
        }
    }
}

/// Outcome counts of one generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub kind: BlueprintKind,
    pub dim: u32,
    pub tree_attempts: u32,
    pub trees_placed: u32,
    pub rock_attempts: u32,
    pub rocks_placed: u32,
    pub puddles_placed: u32,
}

impl GenerationReport {
    fn new(kind: BlueprintKind, dim: u32) -> Self {
        Self {
            kind,
            dim,
            tree_attempts: 0,
            trees_placed: 0,
            rock_attempts: 0,
            rocks_placed: 0,
            puddles_placed: 0,
        }
    }

    fn record(&mut self, kind: ObjectKind, placed: bool) {
        let (attempts, hits) = match kind {
            ObjectKind::Tree => (&mut self.tree_attempts, &mut self.trees_placed),
            ObjectKind::Rock => (&mut self.rock_attempts, &mut self.rocks_placed),
        };
        *attempts += 1;
        if placed {
            *hits += 1;
        }
    }
}

/// Builds the random source for a board. A seed of `0` draws from entropy.
pub fn board_rng(seed: u64) -> ChaCha8Rng {
    if seed == 0 {
        ChaCha8Rng::from_entropy()
    } else {
        ChaCha8Rng::seed_from_u64(seed ^ BOARD_SEED_SALT)
    }
}

/// Resets `blueprint` to land and runs the requested generator over it.
pub fn generate_blueprint<R: Rng + ?Sized>(
    kind: BlueprintKind,
    blueprint: &mut Blueprint,
    rng: &mut R,
) -> GenerationReport {
    blueprint.fill(ElementKind::Land);
    let mut report = GenerationReport::new(kind, blueprint.dim());
    match kind {
        BlueprintKind::River => generate_river(blueprint, rng, &mut report),
        BlueprintKind::Island => generate_island(blueprint, rng, &mut report),
        BlueprintKind::Lake => generate_lake(blueprint, rng, &mut report),
        BlueprintKind::Puddles => generate_puddles(blueprint, rng, &mut report),
    }

    tracing::info!(
        target: "terra_sandbox::mapgen",
        blueprint = kind.label(),
        dim = report.dim,
        trees = report.trees_placed,
        tree_attempts = report.tree_attempts,
        rocks = report.rocks_placed,
        rock_attempts = report.rock_attempts,
        puddles = report.puddles_placed,
        water = blueprint.count(ElementKind::Water),
        "mapgen.blueprint.generated"
    );
    report
}

/// Rows or columns `k` with `lo·dim ≤ k < hi·dim`.
pub fn fraction_range(dim: u32, lo: f32, hi: f32) -> Range<u32> {
    let scale = dim as f32;
    let start = (lo * scale).ceil() as u32;
    let end = (hi * scale).ceil() as u32;
    start.min(dim)..end.min(dim)
}

fn generate_river<R: Rng + ?Sized>(
    blueprint: &mut Blueprint,
    rng: &mut R,
    report: &mut GenerationReport,
) {
    let dim = blueprint.dim();
    let band = fraction_range(dim, 0.5, 0.75);
    for i in 0..dim {
        for j in band.clone() {
            write(blueprint, Cell::new(i, j), ElementKind::Water);
        }
    }

    for i in fraction_range(dim, 0.5, 1.0) {
        for j in 0..dim {
            let on_pattern = (i % 8 == 0 && j % 4 == 2) || (i % 8 == 4 && j % 4 == 0);
            if on_pattern {
                let placed = try_place_object(blueprint, ObjectKind::Tree, Cell::new(i, j));
                report.record(ObjectKind::Tree, placed);
            }
        }
    }

    // Anchors stop one row short of the midline so whole footprints stay north.
    let upper_rows = fraction_range(dim, 0.0, 0.5).end.saturating_sub(1);
    if upper_rows == 0 {
        return;
    }
    for _ in 0..dim / 2 {
        let anchor = Cell::new(rng.gen_range(0..upper_rows), rng.gen_range(0..dim));
        let placed = try_place_object(blueprint, ObjectKind::Rock, anchor);
        report.record(ObjectKind::Rock, placed);
    }
}

fn generate_island<R: Rng + ?Sized>(
    blueprint: &mut Blueprint,
    rng: &mut R,
    report: &mut GenerationReport,
) {
    let dim = blueprint.dim();
    blueprint.fill(ElementKind::Water);
    let land = fraction_range(dim, 0.125, 0.875);
    for i in land.clone() {
        for j in land.clone() {
            write(blueprint, Cell::new(i, j), ElementKind::Land);
        }
    }
    scatter_objects(blueprint, rng, report);
}

fn generate_lake<R: Rng + ?Sized>(
    blueprint: &mut Blueprint,
    rng: &mut R,
    report: &mut GenerationReport,
) {
    let dim = blueprint.dim();
    let lake = fraction_range(dim, 0.25, 0.75);
    for i in lake.clone() {
        for j in lake.clone() {
            write(blueprint, Cell::new(i, j), ElementKind::Water);
        }
    }
    scatter_objects(blueprint, rng, report);
}

fn generate_puddles<R: Rng + ?Sized>(
    blueprint: &mut Blueprint,
    rng: &mut R,
    report: &mut GenerationReport,
) {
    let dim = blueprint.dim();
    if dim > 0 {
        for _ in 0..dim + PUDDLE_EXTRA_ATTEMPTS {
            let origin = random_cell(dim, rng);
            let side = rng.gen_range(1..=PUDDLE_MAX_SIDE);
            if can_place(blueprint, origin, side) {
                blueprint.fill_block(origin, side, ElementKind::Water);
                report.puddles_placed += 1;
            }
        }
    }
    scatter_objects(blueprint, rng, report);
}

/// `dim` tree attempts then `dim / 2` rock attempts, anywhere on the board.
fn scatter_objects<R: Rng + ?Sized>(
    blueprint: &mut Blueprint,
    rng: &mut R,
    report: &mut GenerationReport,
) {
    let dim = blueprint.dim();
    if dim == 0 {
        return;
    }
    for _ in 0..dim {
        let placed = try_place_object(blueprint, ObjectKind::Tree, random_cell(dim, rng));
        report.record(ObjectKind::Tree, placed);
    }
    for _ in 0..dim / 2 {
        let placed = try_place_object(blueprint, ObjectKind::Rock, random_cell(dim, rng));
        report.record(ObjectKind::Rock, placed);
    }
}

fn random_cell<R: Rng + ?Sized>(dim: u32, rng: &mut R) -> Cell {
    Cell::new(rng.gen_range(0..dim), rng.gen_range(0..dim))
}

fn write(blueprint: &mut Blueprint, cell: Cell, kind: ElementKind) {
    let written = blueprint.set(cell, kind);
    debug_assert!(written.is_ok(), "generator wrote outside the board at {cell}");
}
