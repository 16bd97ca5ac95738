//! The problem domain: bounds, periodicity, and cell geometry.

use crate::cellbox::CellBox;
use crate::error::GridError;
use crate::vect::{IntVect, RealVect};

/// Immutable description of the simulated region.
///
/// Couples the domain's cell box with its physical origin, per-axis
/// cell size, and per-axis periodicity flags. Threaded explicitly
/// through the exchange machinery — there is no process-wide geometry
/// singleton.
#[derive(Clone, Debug)]
pub struct Domain {
    cells: CellBox,
    origin: RealVect,
    cell_size: RealVect,
    periodic: [bool; 3],
}

impl Domain {
    /// Create a domain over `cells` with the given geometry.
    ///
    /// Validates the dimension (2 or 3), a non-empty cell box, and
    /// positive cell sizes on every active axis.
    pub fn new(
        cells: CellBox,
        origin: RealVect,
        cell_size: RealVect,
        periodic: [bool; 3],
    ) -> Result<Self, GridError> {
        if cells.dim < 2 || cells.dim > 3 {
            return Err(GridError::InvalidDimension { dim: cells.dim });
        }
        if cells.is_empty() {
            return Err(GridError::EmptyBox { role: "domain" });
        }
        for axis in 0..cells.dim {
            if cell_size[axis] <= 0.0 {
                return Err(GridError::InvalidCellSize {
                    axis,
                    size: cell_size[axis],
                });
            }
        }
        Ok(Self {
            cells,
            origin,
            cell_size,
            periodic,
        })
    }

    /// Number of spatial dimensions (2 or 3).
    pub fn dim(&self) -> usize {
        self.cells.dim
    }

    /// The domain's cell box.
    pub fn cells(&self) -> CellBox {
        self.cells
    }

    /// Whether `axis` wraps periodically.
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// Physical length of the domain along `axis`.
    pub fn length(&self, axis: usize) -> f64 {
        self.cells.extent(axis) as f64 * self.cell_size[axis]
    }

    /// The cell occupied by a position.
    ///
    /// Positions on a cell face bin to the higher cell, matching the
    /// half-open `[lo, hi)` convention of floor binning.
    pub fn cell_of(&self, pos: RealVect) -> IntVect {
        let mut cell = IntVect::zero();
        for axis in 0..self.cells.dim {
            cell[axis] = ((pos[axis] - self.origin[axis]) / self.cell_size[axis]).floor() as i32;
        }
        cell
    }

    /// Map a cell into the domain through periodic wrap.
    ///
    /// Returns `None` when the cell lies outside the domain on any
    /// non-periodic axis — such cells have no owner.
    pub fn wrap_cell(&self, cell: IntVect) -> Option<IntVect> {
        let mut wrapped = cell;
        for axis in 0..self.cells.dim {
            let lo = self.cells.lo[axis];
            let n = self.cells.extent(axis) as i32;
            if wrapped[axis] >= lo && wrapped[axis] < lo + n {
                continue;
            }
            if !self.periodic[axis] {
                return None;
            }
            wrapped[axis] = (wrapped[axis] - lo).rem_euclid(n) + lo;
        }
        Some(wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_domain(periodic: [bool; 3]) -> Domain {
        Domain::new(
            CellBox::new2([0, 0], [7, 7]),
            RealVect::zero(),
            RealVect::new2(1.0, 1.0),
            periodic,
        )
        .unwrap()
    }

    #[test]
    fn cell_of_floors_toward_origin() {
        let d = unit_domain([false; 3]);
        assert_eq!(d.cell_of(RealVect::new2(0.5, 7.9)), IntVect::new2(0, 7));
        assert_eq!(d.cell_of(RealVect::new2(-0.1, 3.0)), IntVect::new2(-1, 3));
    }

    #[test]
    fn wrap_is_identity_inside() {
        let d = unit_domain([true, true, false]);
        let cell = IntVect::new2(3, 4);
        assert_eq!(d.wrap_cell(cell), Some(cell));
    }

    #[test]
    fn wrap_folds_periodic_axes() {
        let d = unit_domain([true, true, false]);
        assert_eq!(d.wrap_cell(IntVect::new2(-2, 9)), Some(IntVect::new2(6, 1)));
    }

    #[test]
    fn non_periodic_overflow_has_no_owner() {
        let d = unit_domain([true, false, false]);
        assert_eq!(d.wrap_cell(IntVect::new2(3, -1)), None);
        assert_eq!(d.wrap_cell(IntVect::new2(-1, 3)), Some(IntVect::new2(7, 3)));
    }

    #[test]
    fn length_spans_the_cell_box() {
        let d = Domain::new(
            CellBox::new2([0, 0], [7, 3]),
            RealVect::zero(),
            RealVect::new2(0.5, 2.0),
            [false; 3],
        )
        .unwrap();
        assert_eq!(d.length(0), 4.0);
        assert_eq!(d.length(1), 8.0);
    }

    proptest::proptest! {
        #[test]
        fn wrap_lands_inside_when_fully_periodic(x in -24i32..32, y in -24i32..32) {
            let d = unit_domain([true, true, false]);
            let wrapped = d.wrap_cell(IntVect::new2(x, y)).unwrap();
            proptest::prop_assert!(d.cells().contains(wrapped));
            // Wrapping is a whole-domain translation on each axis.
            proptest::prop_assert_eq!((wrapped[0] - x).rem_euclid(8), 0);
            proptest::prop_assert_eq!((wrapped[1] - y).rem_euclid(8), 0);
        }
    }

    #[test]
    fn zero_cell_size_rejected() {
        let err = Domain::new(
            CellBox::new2([0, 0], [1, 1]),
            RealVect::zero(),
            RealVect::new2(1.0, 0.0),
            [false; 3],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidCellSize { axis: 1, .. }));
    }
}
