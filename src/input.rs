//! # Input Configuration and Sources
//!
//! This module provides configuration parsing for tempgrid jobs and the
//! two data sources the pipeline consumes:
//!
//! - **Job configuration**: JSON or YAML files describing the NetCDF
//!   input, the variable to average, the seam handling mode, and the
//!   TSV outputs to produce.
//! - **Gridded scalar field**: a NetCDF file holding a latitude vector,
//!   a longitude vector in [0°, 360°), and a time×lat×lon value cube
//!   that is averaged over its time axis on load.
//! - **Vector geometry**: a GeoJSON document yielding the sequence of
//!   tagged geometry records the decoder consumes.
//!
//! All paths come in through explicit configuration values; nothing here
//! reads process-wide globals.
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "nc_key": "air.sig995.2012.nc",
//!   "variable_name": "air",
//!   "seam": "recenter",
//!   "fill_holes": false,
//!   "grid_key": "temperature.tsv",
//!   "lat_key": "latitude.tsv"
//! }
//! ```

use log::debug;
use ndarray::{Array1, Array2, Array3, Axis};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// How the longitude seam of the loaded grid is handled.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeamMode {
    /// Antimeridian split onto a [-180°, 180°] grid.
    #[default]
    Recenter,
    /// Periodic-wrap closure with one duplicated column.
    Close,
}

/// Main configuration structure for tempgrid jobs.
///
/// Describes the complete pipeline run: NetCDF input, variable selection,
/// seam handling, optional hole repair, and the TSV dumps to write.
#[derive(Deserialize, Debug)]
pub struct JobConfig {
    /// Path to the input NetCDF file
    pub nc_key: String,
    /// Name of the variable holding the time×lat×lon cube
    pub variable_name: String,
    /// Name of the latitude coordinate variable
    #[serde(default = "default_lat_name")]
    pub lat_name: String,
    /// Name of the longitude coordinate variable
    #[serde(default = "default_lon_name")]
    pub lon_name: String,
    /// Seam handling applied to the time-averaged field
    #[serde(default)]
    pub seam: SeamMode,
    /// Repair non-monotonic pole-to-equator dips after seam handling
    #[serde(default)]
    pub fill_holes: bool,
    /// Path for the value-matrix TSV dump
    pub grid_key: String,
    /// Optional path for the co-shaped tiled-latitude TSV dump
    #[serde(default)]
    pub lat_key: Option<String>,
    /// Optional path for the longitude-vector TSV dump
    #[serde(default)]
    pub lon_key: Option<String>,
    /// Optional path to a GeoJSON file with country boundary shapes
    #[serde(default)]
    pub shapes_key: Option<String>,
    /// Optional path for the exterior-ring TSV dump
    #[serde(default)]
    pub rings_key: Option<String>,
}

fn default_lat_name() -> String {
    "lat".to_string()
}

fn default_lon_name() -> String {
    "lon".to_string()
}

impl JobConfig {
    /// Loads a job configuration from a JSON or YAML file.
    ///
    /// The format is chosen by file extension: `.yaml`/`.yml` parse as
    /// YAML, everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match extension {
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Loads a job configuration from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: JobConfig = serde_json::from_str(json_str)?;
        Ok(config)
    }

    /// Loads a job configuration from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: JobConfig = serde_yaml::from_str(yaml_str)?;
        Ok(config)
    }
}

/// Loads the time-averaged scalar field from a NetCDF file.
///
/// Reads the latitude and longitude coordinate vectors plus the named
/// variable, which must be either a time×lat×lon cube (averaged over its
/// leading time axis) or an already 2-D lat×lon field. The returned
/// matrix is validated against the coordinate vector lengths: row count
/// must equal the latitude length and column count the longitude length.
pub fn load_mean_field(
    nc_key: &str,
    variable_name: &str,
    lat_name: &str,
    lon_name: &str,
) -> Result<(Array1<f64>, Array1<f64>, Array2<f64>), Box<dyn std::error::Error>> {
    let file = netcdf::open(nc_key)?;
    let lat = coordinate_values(&file, lat_name)?;
    let lon = coordinate_values(&file, lon_name)?;

    let var = file
        .variable(variable_name)
        .ok_or(format!("Variable '{}' not found in NetCDF file", variable_name))?;
    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    debug!("Variable '{}' has shape {:?}", variable_name, dims);
    let values = var.get_values::<f64, _>(..)?;

    let mean = match dims.as_slice() {
        &[steps, rows, cols] => {
            let cube = Array3::from_shape_vec((steps, rows, cols), values)?;
            cube.mean_axis(Axis(0)).ok_or(format!(
                "Variable '{}' has an empty time axis",
                variable_name
            ))?
        }
        &[rows, cols] => Array2::from_shape_vec((rows, cols), values)?,
        _ => {
            return Err(format!(
                "Variable '{}' must be 2-D or 3-D, got {} dimensions",
                variable_name,
                dims.len()
            )
            .into());
        }
    };

    if mean.nrows() != lat.len() || mean.ncols() != lon.len() {
        return Err(format!(
            "Variable '{}' shape {}x{} does not match coordinates {}x{}",
            variable_name,
            mean.nrows(),
            mean.ncols(),
            lat.len(),
            lon.len()
        )
        .into());
    }

    file.close()?;
    Ok((lat, lon, mean))
}

fn coordinate_values(
    file: &netcdf::File,
    name: &str,
) -> Result<Array1<f64>, Box<dyn std::error::Error>> {
    let var = file
        .variable(name)
        .ok_or(format!("Coordinate variable '{}' not found", name))?;
    let values = var.get_values::<f64, _>(..)?;
    Ok(Array1::from(values))
}

/// Loads the geometry records from a GeoJSON file.
pub fn load_geometry_records<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    geometry_records(document)
}

/// Extracts the sequence of geometry records from a parsed GeoJSON
/// document.
///
/// Accepts a `FeatureCollection` (one record per feature geometry), a
/// `GeometryCollection`, a bare array of geometries, or a single tagged
/// geometry. Record order follows document order.
pub fn geometry_records(document: Value) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = document
                .get("features")
                .and_then(Value::as_array)
                .ok_or("FeatureCollection has no features array")?;
            let mut records = Vec::with_capacity(features.len());
            for feature in features {
                let geometry = feature
                    .get("geometry")
                    .cloned()
                    .ok_or("feature has no geometry member")?;
                records.push(geometry);
            }
            Ok(records)
        }
        Some("GeometryCollection") => {
            let geometries = document
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or("GeometryCollection has no geometries array")?;
            Ok(geometries.to_vec())
        }
        Some(_) => Ok(vec![document]),
        None => document
            .as_array()
            .map(|records| records.to_vec())
            .ok_or_else(|| "document is neither a tagged geometry nor an array".into()),
    }
}
