//! # Hole Repair
//!
//! Repairs "holes" — erroneous non-monotonic dips — in a pole-to-equator
//! temperature map, independently per hemisphere and per longitude column.

use ndarray::Array2;

/// Repairs non-monotonic dips in a latitude×longitude value matrix.
///
/// The matrix is split at the floor-division midpoint row: rows
/// `[0, mid)` form the north half (already ordered pole→equator) and rows
/// `[mid, rows)` form the south half, which is traversed in reverse so it
/// runs pole→equator too. Within each half, each column keeps a running
/// maximum seeded from the half's most-poleward row; any value falling
/// below it is clamped to it, otherwise it becomes the new maximum.
/// Hemispheres and columns never interact.
///
/// An odd row count is a defined split (the south half gets the extra
/// row), not an error. The midpoint split assumes the field's physical
/// hemispheres align with the row-index midpoint; that assumption is not
/// checked.
///
/// A fresh matrix is returned; the input is never mutated. The operation
/// is idempotent and shape-preserving.
pub fn fill(map: &Array2<f64>) -> Array2<f64> {
    let rows = map.nrows();
    let mid = rows / 2;
    let mut filled = map.clone();
    clamp_to_poleward_maximum(&mut filled, 0..mid);
    clamp_to_poleward_maximum(&mut filled, (mid..rows).rev());
    filled
}

/// Enforces a per-column non-decreasing profile along the given row order,
/// which must run pole→equator.
fn clamp_to_poleward_maximum(map: &mut Array2<f64>, mut order: impl Iterator<Item = usize>) {
    let Some(first) = order.next() else {
        return;
    };
    let mut running_max = map.row(first).to_owned();
    for row in order {
        for col in 0..map.ncols() {
            let value = map[[row, col]];
            if value < running_max[col] {
                map[[row, col]] = running_max[col];
            } else {
                running_max[col] = value;
            }
        }
    }
}
