use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scene::AssetHandle;

/// A discrete board coordinate. `i` is the row, `j` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    pub i: u32,
    pub j: u32,
}

impl Cell {
    pub const fn new(i: u32, j: u32) -> Self {
        Self { i, j }
    }

    pub fn offset(self, di: u32, dj: u32) -> Self {
        Self {
            i: self.i + di,
            j: self.j + dj,
        }
    }

    pub fn up(self) -> Option<Self> {
        self.i.checked_sub(1).map(|i| Self { i, j: self.j })
    }

    pub fn left(self) -> Option<Self> {
        self.j.checked_sub(1).map(|j| Self { i: self.i, j })
    }

    pub fn up_left(self) -> Option<Self> {
        self.up().and_then(Cell::left)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// Terrain element occupying a single board cell.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    #[default]
    Land,
    Water,
    Tree,
    Rock,
    /// Non-anchor cell of a multi-cell footprint.
    Filler,
}

impl ElementKind {
    /// Side length of the square footprint an element claims when placed.
    /// `None` for kinds that cannot be placed on their own.
    pub fn footprint(self) -> Option<u32> {
        match self {
            ElementKind::Water => Some(1),
            ElementKind::Tree | ElementKind::Rock => Some(2),
            ElementKind::Land | ElementKind::Filler => None,
        }
    }

    pub fn is_object(self) -> bool {
        matches!(self, ElementKind::Tree | ElementKind::Rock)
    }

    pub fn glyph(self) -> char {
        match self {
            ElementKind::Land => '.',
            ElementKind::Water => '~',
            ElementKind::Tree => 'T',
            ElementKind::Rock => 'R',
            ElementKind::Filler => '+',
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ElementKind::Land),
            1 => Some(ElementKind::Water),
            2 => Some(ElementKind::Tree),
            3 => Some(ElementKind::Rock),
            4 => Some(ElementKind::Filler),
            _ => None,
        }
    }
}

impl From<ElementKind> for u8 {
    fn from(value: ElementKind) -> Self {
        value as u8
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ElementKind::Land => "land",
            ElementKind::Water => "water",
            ElementKind::Tree => "tree",
            ElementKind::Rock => "rock",
            ElementKind::Filler => "filler",
        };
        f.write_str(label)
    }
}

/// Decorative objects that own a scene asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Tree,
    Rock,
}

impl ObjectKind {
    pub fn from_element(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Tree => Some(ObjectKind::Tree),
            ElementKind::Rock => Some(ObjectKind::Rock),
            _ => None,
        }
    }

    pub fn element(self) -> ElementKind {
        match self {
            ObjectKind::Tree => ElementKind::Tree,
            ObjectKind::Rock => ElementKind::Rock,
        }
    }

    pub fn animation_cue(self) -> AnimationCue {
        match self {
            ObjectKind::Tree => AnimationCue::Shake,
            ObjectKind::Rock => AnimationCue::Bounce,
        }
    }
}

/// Clip a renderer should play when an object is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationCue {
    Shake,
    Bounce,
}

impl AnimationCue {
    pub fn clip_name(self) -> &'static str {
        match self {
            AnimationCue::Shake => "Shake",
            AnimationCue::Bounce => "Bounce",
        }
    }
}

/// A tree or rock standing on the board, tagged with the scene asset that draws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedObject {
    pub kind: ObjectKind,
    pub handle: AssetHandle,
    pub anchor: Cell,
}

impl PlacedObject {
    pub fn footprint(&self) -> impl Iterator<Item = Cell> {
        let anchor = self.anchor;
        let size = self.kind.element().footprint().unwrap_or(1);
        (0..size).flat_map(move |di| (0..size).map(move |dj| anchor.offset(di, dj)))
    }
}
