//! # Field Diagnostics
//!
//! Simple diagnostics derived from a normalized temperature field: the
//! zonal median profile, the cosine reference curve it is compared
//! against, the temperature→latitude inversion of that curve, and the
//! tiled latitude matrix used for co-shaped dumps.

use ndarray::{Array1, Array2, Axis};
use std::f64::consts::PI;

/// Latitude of the poles, the upper bound of the inverted model curve.
const MAX_LATITUDE: f64 = 90.0;

/// Median of each latitude row across the longitude axis.
pub fn zonal_median(val: &Array2<f64>) -> Array1<f64> {
    let medians: Vec<f64> = val.axis_iter(Axis(0)).map(|row| median(&row.to_vec())).collect();
    Array1::from(medians)
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Reference temperature curve `230 + 70·(cos(lat/90·π) + 1)/2`, in
/// kelvin, evaluated per latitude sample.
pub fn model_profile(lat: &Array1<f64>) -> Array1<f64> {
    lat.mapv(|latitude| 230.0 + 70.0 * ((latitude / MAX_LATITUDE * PI).cos() + 1.0) / 2.0)
}

/// Maps each temperature to the latitude the model curve would place it
/// at: values are normalized to [0, 1] by `(max - t) / (max - min)` over
/// the whole map, then scaled as `90·sqrt(norm)`.
///
/// A constant map (max == min) divides by zero and yields IEEE NaN;
/// callers must not feed a flat field through this inversion.
pub fn temperature_to_latitude(map: &Array2<f64>) -> Array2<f64> {
    let min = map.fold(f64::INFINITY, |acc, &v| acc.min(v));
    let max = map.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    let span = max - min;
    map.mapv(|value| MAX_LATITUDE * ((max - value) / span).sqrt())
}

/// Tiles a latitude vector into a matrix with the given column count, so
/// latitude dumps are co-shaped with the value matrix they accompany.
pub fn tile_latitude(lat: &Array1<f64>, columns: usize) -> Array2<f64> {
    let mut tiled = Array2::zeros((lat.len(), columns));
    for (row, &latitude) in lat.iter().enumerate() {
        tiled.row_mut(row).fill(latitude);
    }
    tiled
}
