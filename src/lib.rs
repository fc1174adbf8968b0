//! # tempgrid
//!
//! A Rust library for normalizing gridded surface-temperature fields and
//! overlaying country boundary polygons on them.
//!
//! ## Features
//!
//! - **Geometry decoding**: tagged Polygon/MultiPolygon records decoded
//!   into a typed sum type, with textual shape summaries and ordered
//!   exterior-ring collection for overlays
//! - **Grid normalization**: antimeridian re-centering of [0°, 360°)
//!   longitude grids, and periodic seam closure for seamless rendering
//! - **Hole repair**: per-hemisphere, per-column clamping of erroneous
//!   non-monotonic dips in pole-to-equator profiles
//! - **Diagnostics**: zonal median profiles, a cosine reference curve,
//!   and temperature-to-latitude inversion
//! - **TSV dumps**: 6-significant-digit tab-separated output, and the
//!   matching reader for filter-style pipelines
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tempgrid::{process_grid_job, input::JobConfig};
//!
//! // Load configuration from a JSON or YAML file
//! let config = JobConfig::from_file("job.json").expect("Failed to load config");
//!
//! // Normalize the field and write the TSV dumps
//! process_grid_job(&config).expect("Failed to process grid");
//! ```

pub mod log;
pub mod cli;
pub mod input;
pub mod geometry;
pub mod grid;
pub mod holes;
pub mod analysis;
pub mod output;

#[cfg(test)]
mod tests;

use crate::geometry::collect_exterior_rings;
use crate::input::{load_geometry_records, load_mean_field, JobConfig, SeamMode};

/// Processes a gridded temperature field according to the provided job
/// configuration.
///
/// This function orchestrates the whole pipeline:
/// 1. Opens the NetCDF file and averages the variable over its time axis
/// 2. Re-centers the longitude grid at the antimeridian, or closes its
///    periodic seam, per the configured seam mode
/// 3. Optionally repairs non-monotonic pole-to-equator dips
/// 4. Writes the value matrix (and optionally the tiled latitudes, the
///    longitude vector, and the boundary exterior rings) as TSV
///
/// # Errors
///
/// This function will return an error if:
/// - The NetCDF file cannot be opened or the variable is missing
/// - The variable shape does not match its coordinate vectors
/// - The boundary file contains an unsupported or malformed geometry
/// - Any output file cannot be written
pub fn process_grid_job(config: &JobConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (lat, lon, mean) = load_mean_field(
        &config.nc_key,
        &config.variable_name,
        &config.lat_name,
        &config.lon_name,
    )?;

    let (lon, field) = match config.seam {
        SeamMode::Recenter => grid::recenter(&lon, &mean),
        SeamMode::Close => grid::close_seam(&lon, &mean),
    };
    let field = if config.fill_holes {
        holes::fill(&field)
    } else {
        field
    };

    output::write_matrix_to_path(&config.grid_key, &field)?;

    if let Some(lat_key) = &config.lat_key {
        let tiled = analysis::tile_latitude(&lat, field.ncols());
        output::write_matrix_to_path(lat_key, &tiled)?;
    }
    if let Some(lon_key) = &config.lon_key {
        let row = lon.clone().insert_axis(ndarray::Axis(0));
        output::write_matrix_to_path(lon_key, &row)?;
    }
    if let (Some(shapes_key), Some(rings_key)) = (&config.shapes_key, &config.rings_key) {
        let records = load_geometry_records(shapes_key)?;
        let rings = collect_exterior_rings(&records)?;
        output::write_rings_to_path(rings_key, &rings)?;
    }

    Ok(())
}
