//! # CLI Module
//!
//! This module provides the command-line interface for tempgrid,
//! including:
//! - Argument parsing with clap
//! - Configuration file loading (JSON/YAML)
//! - Subcommands for the different pipeline stages
//! - stdin/stdout streaming for the filter-style commands

use crate::analysis;
use crate::geometry::decode;
use crate::holes;
use crate::input::{load_geometry_records, load_mean_field, JobConfig, SeamMode};
use crate::log::{
    config_echo, show_farewell_with_timing, show_greeting, show_netcdf_file_info,
    show_shape_summaries,
};
use crate::output::{read_matrix, read_matrix_from_path, write_matrix, write_matrix_to_path};
use crate::{grid, process_grid_job};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ndarray::Array2;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

/// Surface-temperature grid normalization with country-outline overlays
#[derive(Parser, Debug)]
#[command(name = "tempgrid")]
#[command(about = "Normalize gridded temperature fields and dump them as TSV")]
#[command(version)]
#[command(long_about = "
tempgrid is a command-line tool for normalizing gridded surface-temperature
fields and overlaying country boundary polygons on them.

EXAMPLES:
  # Re-center a NetCDF field and dump it as TSV
  tempgrid convert air.sig995.2012.nc temperature.tsv -n air

  # Using a config file
  tempgrid convert --config job.json

  # Shape summaries for a boundary file
  tempgrid describe countries.geojson

  # Repair pole-to-equator dips in a previously dumped matrix
  tempgrid fill-holes < temperature.tsv > repaired.tsv

  # File inspection
  tempgrid info air.sig995.2012.nc
")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Seam handling mode selected on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeamArg {
    /// Antimeridian split onto a [-180, 180] grid
    #[default]
    Recenter,
    /// Periodic-wrap closure with one duplicated column
    Close,
}

impl From<SeamArg> for SeamMode {
    fn from(arg: SeamArg) -> Self {
        match arg {
            SeamArg::Recenter => SeamMode::Recenter,
            SeamArg::Close => SeamMode::Close,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a NetCDF temperature field to normalized TSV dumps
    Convert {
        /// Input NetCDF file path
        #[arg(value_name = "INPUT", env = "TEMPGRID_INPUT")]
        input: Option<String>,

        /// Output TSV file path for the value matrix
        #[arg(value_name = "OUTPUT", env = "TEMPGRID_OUTPUT")]
        output: Option<String>,

        /// NetCDF variable name to average and dump
        #[arg(short = 'n', long, env = "TEMPGRID_VARIABLE")]
        variable: Option<String>,

        /// Configuration file (JSON or YAML); overrides the inline arguments
        #[arg(short, long, env = "TEMPGRID_CONFIG")]
        config: Option<PathBuf>,

        /// Seam handling mode
        #[arg(long, value_enum, default_value_t = SeamArg::Recenter)]
        seam: SeamArg,

        /// Repair non-monotonic pole-to-equator dips after seam handling
        #[arg(long)]
        fill_holes: bool,

        /// Name of the latitude coordinate variable
        #[arg(long, default_value = "lat")]
        lat_name: String,

        /// Name of the longitude coordinate variable
        #[arg(long, default_value = "lon")]
        lon_name: String,

        /// Also dump the tiled latitude matrix to this path
        #[arg(long)]
        lat_out: Option<String>,

        /// Also dump the longitude vector to this path
        #[arg(long)]
        lon_out: Option<String>,

        /// GeoJSON boundary file whose exterior rings should be dumped
        #[arg(long)]
        shapes: Option<String>,

        /// Output TSV file path for the exterior rings
        #[arg(long)]
        rings_out: Option<String>,
    },

    /// Print a shape summary line for every geometry in a boundary file
    Describe {
        /// GeoJSON boundary file
        shapes: PathBuf,
    },

    /// Repair non-monotonic dips in a pole-to-equator TSV matrix
    FillHoles {
        /// Input TSV matrix (stdin when omitted)
        input: Option<PathBuf>,

        /// Output TSV matrix (stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Map temperatures to the latitudes the model curve would place them at
    TempToLat {
        /// Input TSV matrix (stdin when omitted)
        input: Option<PathBuf>,

        /// Output TSV matrix (stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Dump the zonal median profile and the model curve per latitude
    Zonal {
        /// Input NetCDF file path
        input: String,

        /// Output TSV file path (lat, median, model columns)
        output: String,

        /// NetCDF variable name to average
        #[arg(short = 'n', long)]
        variable: String,

        /// Name of the latitude coordinate variable
        #[arg(long, default_value = "lat")]
        lat_name: String,

        /// Name of the longitude coordinate variable
        #[arg(long, default_value = "lon")]
        lon_name: String,
    },

    /// Show the structure of a NetCDF file
    Info {
        /// NetCDF file path
        path: String,
    },
}

/// Dispatches the parsed command line to its handler.
pub fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            variable,
            config,
            seam,
            fill_holes,
            lat_name,
            lon_name,
            lat_out,
            lon_out,
            shapes,
            rings_out,
        } => {
            let config = match config {
                Some(path) => {
                    show_greeting(&path.display().to_string());
                    JobConfig::from_file(path)?
                }
                None => JobConfig {
                    nc_key: input.ok_or("missing INPUT argument (or --config)")?,
                    variable_name: variable.ok_or("missing --variable (or --config)")?,
                    lat_name,
                    lon_name,
                    seam: seam.into(),
                    fill_holes,
                    grid_key: output.ok_or("missing OUTPUT argument (or --config)")?,
                    lat_key: lat_out,
                    lon_key: lon_out,
                    shapes_key: shapes,
                    rings_key: rings_out,
                },
            };
            config_echo(&config);
            let start_time = Instant::now();
            process_grid_job(&config)?;
            show_farewell_with_timing(start_time.elapsed());
            Ok(())
        }

        Commands::Describe { shapes } => {
            let records = load_geometry_records(shapes)?;
            let mut summaries = Vec::with_capacity(records.len());
            for record in &records {
                summaries.push(decode(record)?.describe());
            }
            show_shape_summaries(&summaries);
            Ok(())
        }

        Commands::FillHoles { input, output } => {
            let matrix = read_matrix_argument(input)?;
            write_matrix_argument(output, &holes::fill(&matrix))
        }

        Commands::TempToLat { input, output } => {
            let matrix = read_matrix_argument(input)?;
            write_matrix_argument(output, &analysis::temperature_to_latitude(&matrix))
        }

        Commands::Zonal {
            input,
            output,
            variable,
            lat_name,
            lon_name,
        } => {
            let (lat, lon, mean) = load_mean_field(&input, &variable, &lat_name, &lon_name)?;
            let (_lon, field) = grid::recenter(&lon, &mean);
            let medians = analysis::zonal_median(&field);
            let model = analysis::model_profile(&lat);

            let mut profile = Array2::zeros((lat.len(), 3));
            profile.column_mut(0).assign(&lat);
            profile.column_mut(1).assign(&medians);
            profile.column_mut(2).assign(&model);
            write_matrix_to_path(&output, &profile)
        }

        Commands::Info { path } => execute_info(&path),
    }
}

fn execute_info(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file = netcdf::open(path)
        .with_context(|| format!("Failed to open NetCDF file: {}", path))?;
    println!("NetCDF file: {}", path);
    show_netcdf_file_info(&file)?;
    Ok(())
}

fn read_matrix_argument(
    input: Option<PathBuf>,
) -> Result<Array2<f64>, Box<dyn std::error::Error>> {
    match input {
        Some(path) => read_matrix_from_path(path),
        None => read_matrix(io::stdin().lock()),
    }
}

fn write_matrix_argument(
    output: Option<PathBuf>,
    matrix: &Array2<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => write_matrix_to_path(path, matrix),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_matrix(&mut lock, matrix)?;
            Ok(())
        }
    }
}
