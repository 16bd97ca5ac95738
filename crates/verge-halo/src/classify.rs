//! Replica classification: which adjacent partitions need a copy.

use smallvec::SmallVec;
use verge_grid::{CellBox, IntVect};

/// Per-axis halo proximity of a cell within its tile box.
///
/// `-halo` when the cell is within the halo width of the low face,
/// `+halo` near the high face, `0` otherwise. Adding a component to
/// the cell lands in the adjacent tile's interior on that axis.
pub(crate) fn shift_vector(cell: IntVect, tile_box: &CellBox, halo: i32) -> IntVect {
    let mut shift = IntVect::zero();
    for axis in 0..tile_box.dim {
        if cell[axis] <= tile_box.lo[axis] + halo - 1 {
            shift[axis] = -halo;
        } else if cell[axis] >= tile_box.hi[axis] - halo + 1 {
            shift[axis] = halo;
        }
    }
    shift
}

/// Enumerate destination cells from a shift vector.
///
/// One offset per nonzero axis (face neighbours), one per pair of
/// distinct nonzero axes (edge neighbours), and in three dimensions
/// one combining all three (the vertex neighbour). A zero shift
/// yields nothing. Up to 3 destinations in 2-D, 7 in 3-D.
pub(crate) fn destination_cells(
    cell: IntVect,
    shift: IntVect,
    dim: usize,
) -> SmallVec<[IntVect; 7]> {
    let mut out = SmallVec::new();
    for axis in 0..dim {
        if shift[axis] == 0 {
            continue;
        }
        out.push(cell.shifted(axis, shift[axis]));
    }
    for a in 0..dim {
        for b in 0..a {
            if shift[a] != 0 && shift[b] != 0 {
                out.push(cell.shifted(a, shift[a]).shifted(b, shift[b]));
            }
        }
    }
    if dim == 3 && shift[0] != 0 && shift[1] != 0 && shift[2] != 0 {
        out.push(
            cell.shifted(0, shift[0])
                .shifted(1, shift[1])
                .shifted(2, shift[2]),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_cell_has_zero_shift() {
        let tile = CellBox::new2([0, 0], [7, 7]);
        let shift = shift_vector(IntVect::new2(3, 4), &tile, 2);
        assert!(shift.is_zero());
        assert!(destination_cells(IntVect::new2(3, 4), shift, 2).is_empty());
    }

    #[test]
    fn low_face_shifts_negative() {
        let tile = CellBox::new2([0, 0], [7, 7]);
        assert_eq!(
            shift_vector(IntVect::new2(1, 4), &tile, 2),
            IntVect::new2(-2, 0)
        );
    }

    #[test]
    fn high_face_shifts_positive() {
        let tile = CellBox::new2([0, 0], [7, 7]);
        assert_eq!(
            shift_vector(IntVect::new2(4, 6), &tile, 2),
            IntVect::new2(0, 2)
        );
    }

    #[test]
    fn corner_emits_two_faces_and_one_edge() {
        let cell = IntVect::new2(4, 4);
        let shift = IntVect::new2(-2, -2);
        let cells = destination_cells(cell, shift, 2);
        assert_eq!(cells.len(), 3);
        assert!(cells.contains(&IntVect::new2(2, 4)));
        assert!(cells.contains(&IntVect::new2(4, 2)));
        assert!(cells.contains(&IntVect::new2(2, 2)));
    }

    #[test]
    fn single_axis_emits_one_face() {
        let cells = destination_cells(IntVect::new2(4, 7), IntVect::new2(0, 2), 2);
        assert_eq!(cells.as_slice(), &[IntVect::new2(4, 9)]);
    }

    #[test]
    fn three_d_corner_emits_seven() {
        let cell = IntVect::new3(0, 0, 0);
        let shift = IntVect::new3(-1, 1, -1);
        let cells = destination_cells(cell, shift, 3);
        assert_eq!(cells.len(), 7);
        // Faces.
        assert!(cells.contains(&IntVect::new3(-1, 0, 0)));
        assert!(cells.contains(&IntVect::new3(0, 1, 0)));
        assert!(cells.contains(&IntVect::new3(0, 0, -1)));
        // Edges.
        assert!(cells.contains(&IntVect::new3(-1, 1, 0)));
        assert!(cells.contains(&IntVect::new3(-1, 0, -1)));
        assert!(cells.contains(&IntVect::new3(0, 1, -1)));
        // Vertex.
        assert!(cells.contains(&IntVect::new3(-1, 1, -1)));
    }

    #[test]
    fn two_d_ignores_third_axis_shift_slot() {
        // A 2-D tile never produces a third-axis shift; even if one
        // were present the enumeration must not read past `dim`.
        let cells = destination_cells(IntVect::new2(0, 0), IntVect::new3(-1, -1, -1), 2);
        assert_eq!(cells.len(), 3);
    }

    proptest::proptest! {
        #[test]
        fn destination_count_follows_shifted_axes(
            x in 0i32..8, y in 0i32..8, halo in 1i32..3
        ) {
            let tile = CellBox::new2([0, 0], [7, 7]);
            let cell = IntVect::new2(x, y);
            let shift = shift_vector(cell, &tile, halo);
            let shifted = (0..2).filter(|&d| shift[d] != 0).count() as u32;
            let cells = destination_cells(cell, shift, 2);
            // One destination per non-empty subset of the shifted axes.
            proptest::prop_assert_eq!(cells.len() as u32, 2u32.pow(shifted) - 1);
            for (i, a) in cells.iter().enumerate() {
                for b in &cells[i + 1..] {
                    proptest::prop_assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn shift_magnitude_matches_halo_width() {
        let tile = CellBox::new2([0, 0], [7, 7]);
        assert_eq!(
            shift_vector(IntVect::new2(0, 0), &tile, 3),
            IntVect::new2(-3, -3)
        );
    }
}
