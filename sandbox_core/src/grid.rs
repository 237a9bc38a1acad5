//! Board storage: the element blueprint and the parallel asset reference grid.
//!
//! Neither grid validates placements; that is the job of
//! [`crate::footprint`]. The only failure mode here is an out-of-range index.

use std::hash::Hasher;

use thiserror::Error;

use crate::{
    components::{Cell, ElementKind},
    hashing::FnvHasher,
    scene::AssetHandle,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("cell {cell} is outside the {dim}x{dim} board")]
    OutOfBounds { cell: Cell, dim: u32 },
}

/// Square grid of terrain elements, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    dim: u32,
    cells: Vec<ElementKind>,
    /// Anchor coordinate for every `Filler` cell, `None` elsewhere.
    anchors: Vec<Option<Cell>>,
}

impl Blueprint {
    pub fn new(dim: u32) -> Self {
        let len = (dim as usize) * (dim as usize);
        Self {
            dim,
            cells: vec![ElementKind::Land; len],
            anchors: vec![None; len],
        }
    }

    pub fn dim(&self) -> u32 {
        self.dim
    }

    #[inline]
    pub fn within_bounds(&self, cell: Cell) -> bool {
        cell.i < self.dim && cell.j < self.dim
    }

    #[inline]
    fn idx(&self, cell: Cell) -> Option<usize> {
        if self.within_bounds(cell) {
            Some(cell.i as usize * self.dim as usize + cell.j as usize)
        } else {
            None
        }
    }

    fn checked_idx(&self, cell: Cell) -> Result<usize, GridError> {
        self.idx(cell).ok_or(GridError::OutOfBounds {
            cell,
            dim: self.dim,
        })
    }

    pub fn get(&self, cell: Cell) -> Option<ElementKind> {
        self.idx(cell).map(|idx| self.cells[idx])
    }

    /// Overwrites a cell. Writing anything but `Filler` drops the stored anchor
    /// link; use [`Blueprint::set_filler`] to mark footprint cells.
    pub fn set(&mut self, cell: Cell, kind: ElementKind) -> Result<(), GridError> {
        let idx = self.checked_idx(cell)?;
        self.cells[idx] = kind;
        self.anchors[idx] = None;
        Ok(())
    }

    pub fn set_filler(&mut self, cell: Cell, anchor: Cell) -> Result<(), GridError> {
        let idx = self.checked_idx(cell)?;
        self.cells[idx] = ElementKind::Filler;
        self.anchors[idx] = Some(anchor);
        Ok(())
    }

    /// Reallocates at a new size with every cell reset to `Land`.
    pub fn resize(&mut self, dim: u32) {
        *self = Blueprint::new(dim);
    }

    pub fn fill(&mut self, kind: ElementKind) {
        self.cells.fill(kind);
        self.anchors.fill(None);
    }

    /// Writes `kind` into every cell of the `size × size` block at `origin`,
    /// clipped to the board.
    pub fn fill_block(&mut self, origin: Cell, size: u32, kind: ElementKind) {
        for di in 0..size {
            for dj in 0..size {
                let cell = origin.offset(di, dj);
                if let Some(idx) = self.idx(cell) {
                    self.cells[idx] = kind;
                    self.anchors[idx] = None;
                }
            }
        }
    }

    /// Resolves the anchor of the object covering `cell`.
    ///
    /// Anchors resolve to themselves. Fillers use their stored back-reference
    /// and fall back to probing above, left, then up-left. Land and water
    /// have no anchor.
    pub fn anchor_of(&self, cell: Cell) -> Option<Cell> {
        let idx = self.idx(cell)?;
        match self.cells[idx] {
            ElementKind::Tree | ElementKind::Rock => Some(cell),
            ElementKind::Filler => self.anchors[idx].or_else(|| self.search_anchor(cell)),
            ElementKind::Land | ElementKind::Water => None,
        }
    }

    fn search_anchor(&self, cell: Cell) -> Option<Cell> {
        let holds_object =
            |candidate: Cell| self.get(candidate).map_or(false, ElementKind::is_object);
        if let Some(up) = cell.up().filter(|c| holds_object(*c)) {
            return Some(up);
        }
        if let Some(left) = cell.left().filter(|c| holds_object(*c)) {
            return Some(left);
        }
        cell.up_left()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, ElementKind)> + '_ {
        let dim = self.dim;
        self.cells.iter().enumerate().map(move |(idx, kind)| {
            let idx = idx as u32;
            (Cell::new(idx / dim, idx % dim), *kind)
        })
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// Deterministic FNV-1a digest of the element layout.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FnvHasher::new();
        hasher.write(&self.dim.to_le_bytes());
        for kind in &self.cells {
            hasher.write_u8(u8::from(*kind));
        }
        hasher.finish()
    }

    /// One text row per board row, using [`ElementKind::glyph`].
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.dim as usize);
        for (idx, row) in self.cells.chunks(self.dim.max(1) as usize).enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.extend(row.iter().map(|kind| kind.glyph()));
        }
        out
    }
}

/// Which scene asset, if any, covers each cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReferences {
    dim: u32,
    handles: Vec<Option<AssetHandle>>,
}

impl AssetReferences {
    pub fn new(dim: u32) -> Self {
        Self {
            dim,
            handles: vec![None; (dim as usize) * (dim as usize)],
        }
    }

    #[inline]
    fn idx(&self, cell: Cell) -> Option<usize> {
        (cell.i < self.dim && cell.j < self.dim)
            .then(|| cell.i as usize * self.dim as usize + cell.j as usize)
    }

    pub fn get(&self, cell: Cell) -> Option<AssetHandle> {
        self.idx(cell).and_then(|idx| self.handles[idx])
    }

    pub fn set(&mut self, cell: Cell, handle: Option<AssetHandle>) -> Result<(), GridError> {
        let idx = self.idx(cell).ok_or(GridError::OutOfBounds {
            cell,
            dim: self.dim,
        })?;
        self.handles[idx] = handle;
        Ok(())
    }

    pub fn resize(&mut self, dim: u32) {
        *self = AssetReferences::new(dim);
    }

    /// Handles in row-major order, each reported once per covered cell.
    pub fn iter(&self) -> impl Iterator<Item = AssetHandle> + '_ {
        self.handles.iter().flatten().copied()
    }
}

/// The grid store: blueprint and asset references, always the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub blueprint: Blueprint,
    pub assets: AssetReferences,
}

impl Board {
    pub fn new(dim: u32) -> Self {
        Self {
            blueprint: Blueprint::new(dim),
            assets: AssetReferences::new(dim),
        }
    }

    pub fn dim(&self) -> u32 {
        self.blueprint.dim()
    }

    pub fn get(&self, cell: Cell) -> Option<ElementKind> {
        self.blueprint.get(cell)
    }

    pub fn set(&mut self, cell: Cell, kind: ElementKind) -> Result<(), GridError> {
        self.blueprint.set(cell, kind)
    }

    pub fn within_bounds(&self, cell: Cell) -> bool {
        self.blueprint.within_bounds(cell)
    }

    pub fn resize(&mut self, dim: u32) {
        self.blueprint.resize(dim);
        self.assets.resize(dim);
    }
}
