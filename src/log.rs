use crate::input::{JobConfig, SeamMode};
use std::time::Duration;

pub fn show_greeting(config_path: &str) {
    println!("=== Temperature Grid Toolkit ===");
    println!("Loading configuration from: {}", config_path);
}

pub fn config_echo(config: &JobConfig) {
    println!("\nConfiguration:");
    println!("  Input NetCDF: {}", config.nc_key);
    println!("  Variable: {}", config.variable_name);
    println!(
        "  Seam handling: {}",
        match config.seam {
            SeamMode::Recenter => "recenter",
            SeamMode::Close => "close",
        }
    );
    println!("  Fill holes: {}", config.fill_holes);
    println!("  Output grid: {}", config.grid_key);
    if let Some(shapes_key) = &config.shapes_key {
        println!("  Boundary shapes: {}", shapes_key);
    }
}

pub fn show_netcdf_file_info(file: &netcdf::File) -> Result<(), Box<dyn std::error::Error>> {
    println!("\nNetCDF File Info:");
    println!("Dimensions:");
    for dim in file.dimensions() {
        println!("  {}: {}", dim.name(), dim.len());
    }
    println!("Variables:");
    for var in file.variables() {
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
        println!("  {}: {:?}", var.name(), dims);
    }
    Ok(())
}

pub fn show_shape_summaries(summaries: &[String]) {
    for summary in summaries {
        println!("{}", summary);
    }
}

pub fn show_farewell_with_timing(elapsed: Duration) {
    println!("\n=== Completed in {:.2?} ===", elapsed);
}
