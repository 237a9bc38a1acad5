//! Placement gate for square footprints.

use crate::{
    components::{Cell, ElementKind, ObjectKind},
    grid::Blueprint,
};

/// Cells of the `size × size` block anchored at `origin`, row by row.
pub fn footprint_cells(origin: Cell, size: u32) -> impl Iterator<Item = Cell> {
    (0..size).flat_map(move |di| (0..size).map(move |dj| origin.offset(di, dj)))
}

/// True iff the whole block lies on the board and every cell in it is `Land`.
///
/// Spacing between distinct objects is not checked, so footprints may touch
/// corner to corner.
pub fn can_place(blueprint: &Blueprint, origin: Cell, size: u32) -> bool {
    if size == 0 {
        return false;
    }
    let dim = blueprint.dim();
    let fits = |start: u32| start.checked_add(size).map_or(false, |end| end <= dim);
    if !fits(origin.i) || !fits(origin.j) {
        return false;
    }
    footprint_cells(origin, size).all(|cell| blueprint.get(cell) == Some(ElementKind::Land))
}

/// Writes a tree or rock anchor plus its three linked fillers. The caller is
/// expected to have checked [`can_place`].
pub(crate) fn stamp_object(blueprint: &mut Blueprint, kind: ObjectKind, anchor: Cell) {
    let element = kind.element();
    let size = element.footprint().unwrap_or(1);
    for cell in footprint_cells(anchor, size) {
        let written = if cell == anchor {
            blueprint.set(cell, element)
        } else {
            blueprint.set_filler(cell, anchor)
        };
        debug_assert!(written.is_ok(), "stamped footprint left the board at {cell}");
    }
}

/// Checks the gate and stamps the object when it passes.
pub fn try_place_object(blueprint: &mut Blueprint, kind: ObjectKind, anchor: Cell) -> bool {
    let size = kind.element().footprint().unwrap_or(1);
    if !can_place(blueprint, anchor, size) {
        return false;
    }
    stamp_object(blueprint, kind, anchor);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_inside_empty_board() {
        let blueprint = Blueprint::new(10);
        assert!(can_place(&blueprint, Cell::new(0, 0), 2));
        assert!(can_place(&blueprint, Cell::new(8, 8), 2));
        assert!(can_place(&blueprint, Cell::new(9, 9), 1));
    }

    #[test]
    fn rejects_blocks_past_the_edge() {
        let blueprint = Blueprint::new(10);
        assert!(!can_place(&blueprint, Cell::new(9, 0), 2));
        assert!(!can_place(&blueprint, Cell::new(0, 9), 2));
        assert!(!can_place(&blueprint, Cell::new(10, 0), 1));
        assert!(!can_place(&blueprint, Cell::new(6, 6), 5));
        assert!(!can_place(&blueprint, Cell::new(u32::MAX, 0), 2));
    }

    #[test]
    fn zero_sized_footprint_is_never_placeable() {
        let blueprint = Blueprint::new(10);
        assert!(!can_place(&blueprint, Cell::new(2, 2), 0));
    }

    #[test]
    fn rejects_any_occupied_cell() {
        let mut blueprint = Blueprint::new(10);
        blueprint.set(Cell::new(5, 5), ElementKind::Water).unwrap();
        for origin in [
            Cell::new(4, 4),
            Cell::new(4, 5),
            Cell::new(5, 4),
            Cell::new(5, 5),
        ] {
            assert!(!can_place(&blueprint, origin, 2), "origin {origin}");
        }
        assert!(can_place(&blueprint, Cell::new(3, 3), 2));
        assert!(can_place(&blueprint, Cell::new(6, 6), 2));
    }

    #[test]
    fn diagonal_neighbours_may_touch() {
        let mut blueprint = Blueprint::new(10);
        assert!(try_place_object(&mut blueprint, ObjectKind::Tree, Cell::new(2, 2)));
        assert!(try_place_object(&mut blueprint, ObjectKind::Rock, Cell::new(4, 4)));
        assert!(!try_place_object(&mut blueprint, ObjectKind::Rock, Cell::new(3, 3)));
    }

    #[test]
    fn stamp_links_fillers_to_anchor() {
        let mut blueprint = Blueprint::new(6);
        assert!(try_place_object(&mut blueprint, ObjectKind::Tree, Cell::new(1, 3)));
        assert_eq!(blueprint.get(Cell::new(1, 3)), Some(ElementKind::Tree));
        for cell in [Cell::new(1, 4), Cell::new(2, 3), Cell::new(2, 4)] {
            assert_eq!(blueprint.get(cell), Some(ElementKind::Filler));
            assert_eq!(blueprint.anchor_of(cell), Some(Cell::new(1, 3)));
        }
    }
}
