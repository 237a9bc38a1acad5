//! Merged terrain geometry rebuilt from the blueprint.
//!
//! Board cell `(i, j)` spans `x ∈ [i, i+1]`, `z ∈ [j, j+1]`, with `y` up.
//! Ground is every non-water cell; trees and rocks stand on it.

use crate::{
    components::{Cell, ElementKind},
    grid::Blueprint,
};

pub const GROUND_TOP: f32 = 0.0;
pub const WATER_SURFACE: f32 = -0.25;
pub const BOARD_BOTTOM: f32 = -1.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a quad whose corners wind counter-clockwise seen from `normal`.
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    North,
    South,
    West,
    East,
}

impl Side {
    const ALL: [Side; 4] = [Side::North, Side::South, Side::West, Side::East];

    fn neighbour(self, cell: Cell, dim: u32) -> Option<Cell> {
        match self {
            Side::North => cell.up(),
            Side::South => (cell.i + 1 < dim).then(|| cell.offset(1, 0)),
            Side::West => cell.left(),
            Side::East => (cell.j + 1 < dim).then(|| cell.offset(0, 1)),
        }
    }
}

fn top_quad(mesh: &mut MeshData, cell: Cell, y: f32) {
    let (x0, z0) = (cell.i as f32, cell.j as f32);
    let (x1, z1) = (x0 + 1.0, z0 + 1.0);
    mesh.push_quad(
        [[x0, y, z0], [x0, y, z1], [x1, y, z1], [x1, y, z0]],
        [0.0, 1.0, 0.0],
    );
}

fn side_quad(mesh: &mut MeshData, cell: Cell, side: Side, bottom: f32, top: f32) {
    let (x0, z0) = (cell.i as f32, cell.j as f32);
    let (x1, z1) = (x0 + 1.0, z0 + 1.0);
    let (corners, normal) = match side {
        Side::North => (
            [[x0, bottom, z0], [x0, bottom, z1], [x0, top, z1], [x0, top, z0]],
            [-1.0, 0.0, 0.0],
        ),
        Side::South => (
            [[x1, bottom, z1], [x1, bottom, z0], [x1, top, z0], [x1, top, z1]],
            [1.0, 0.0, 0.0],
        ),
        Side::West => (
            [[x1, bottom, z0], [x0, bottom, z0], [x0, top, z0], [x1, top, z0]],
            [0.0, 0.0, -1.0],
        ),
        Side::East => (
            [[x0, bottom, z1], [x1, bottom, z1], [x1, top, z1], [x0, top, z1]],
            [0.0, 0.0, 1.0],
        ),
    };
    mesh.push_quad(corners, normal);
}

/// Ground and water meshes for the whole board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTerrain {
    pub ground: MeshData,
    pub water: MeshData,
}

pub fn build_merged_terrain(blueprint: &Blueprint) -> MergedTerrain {
    let dim = blueprint.dim();
    let mut terrain = MergedTerrain::default();
    let is_water = |cell: Cell| blueprint.get(cell) == Some(ElementKind::Water);

    for (cell, kind) in blueprint.iter() {
        if kind == ElementKind::Water {
            top_quad(&mut terrain.water, cell, WATER_SURFACE);
            for side in Side::ALL {
                if side.neighbour(cell, dim).is_none() {
                    side_quad(&mut terrain.water, cell, side, BOARD_BOTTOM, WATER_SURFACE);
                }
            }
        } else {
            top_quad(&mut terrain.ground, cell, GROUND_TOP);
            for side in Side::ALL {
                match side.neighbour(cell, dim) {
                    None => side_quad(&mut terrain.ground, cell, side, BOARD_BOTTOM, GROUND_TOP),
                    Some(next) if is_water(next) => {
                        side_quad(&mut terrain.ground, cell, side, BOARD_BOTTOM, GROUND_TOP)
                    }
                    Some(_) => {}
                }
            }
        }
    }
    terrain
}
