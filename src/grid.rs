//! # Grid Normalization
//!
//! Longitude-axis normalization for fields stored on a [0°, 360°) grid.
//! Two distinct operations live here, kept separate because callers need
//! different semantics:
//!
//! - [`recenter`] re-indexes the grid onto [-180°, 180°], split at the
//!   antimeridian, for Greenwich-centered rendering and dumps.
//! - [`close_seam`] duplicates the last longitude sample at the opposite
//!   end so a periodic field renders without a visible gap.
//!
//! Both are pure: inputs are never mutated and fresh arrays are returned.

use ndarray::{s, Array1, Array2};

/// Re-centers a [0°, 360°) longitude grid onto [-180°, 180°].
///
/// The split point is the *first* index `m` with `lon[m] > 180`; the tail
/// `lon[m..]` is shifted by -360° and moved in front of the head, and the
/// value matrix columns are rotated the same way. If no longitude exceeds
/// 180° the inputs are already centered and are returned unchanged — that
/// is a no-op, not an error.
///
/// The "first exceeding value" rule is deliberate: sortedness of the
/// longitude vector is not inferred or checked.
pub fn recenter(lon: &Array1<f64>, val: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let Some(meridian) = lon.iter().position(|&x| x > 180.0) else {
        return (lon.clone(), val.clone());
    };

    let mut centered_lon = Vec::with_capacity(lon.len());
    centered_lon.extend(lon.slice(s![meridian..]).iter().map(|&x| x - 360.0));
    centered_lon.extend(lon.slice(s![..meridian]).iter());

    let (rows, cols) = val.dim();
    let west_cols = cols - meridian;
    let mut centered_val = Array2::zeros((rows, cols));
    centered_val
        .slice_mut(s![.., ..west_cols])
        .assign(&val.slice(s![.., meridian..]));
    centered_val
        .slice_mut(s![.., west_cols..])
        .assign(&val.slice(s![.., ..meridian]));

    (Array1::from(centered_lon), centered_val)
}

/// Closes the periodic seam of a longitude grid for seamless rendering.
///
/// Prepends a duplicate of the last sample shifted by -360°: exactly one
/// extra column is added and no existing column is removed or reordered.
/// Independent of, and not to be confused with, [`recenter`].
pub fn close_seam(lon: &Array1<f64>, val: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let mut closed_lon = Vec::with_capacity(lon.len() + 1);
    closed_lon.push(lon[lon.len() - 1] - 360.0);
    closed_lon.extend(lon.iter());

    let (rows, cols) = val.dim();
    let mut closed_val = Array2::zeros((rows, cols + 1));
    closed_val
        .slice_mut(s![.., ..1])
        .assign(&val.slice(s![.., cols - 1..]));
    closed_val.slice_mut(s![.., 1..]).assign(val);

    (Array1::from(closed_lon), closed_val)
}
