//! # TSV Output Module
//!
//! Tab-separated serialization of matrices and ring collections, plus the
//! matching reader for pipelines that take a previously dumped matrix
//! back in on stdin.
//!
//! Values are written with 6 significant digits in the style of C's
//! `%.6g`: plain decimal notation with trailing zeros trimmed for
//! moderate magnitudes, exponential notation outside that range.

use crate::geometry::Ring;
use log::debug;
use ndarray::Array2;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Significant digits carried by [`format_value`].
const SIGNIFICANT_DIGITS: i32 = 6;

/// Formats a value with 6 significant digits, `%.6g` style.
///
/// ```
/// use tempgrid::output::format_value;
///
/// assert_eq!(format_value(230.0), "230");
/// assert_eq!(format_value(235.125), "235.125");
/// assert_eq!(format_value(1234567.0), "1.23457e+06");
/// ```
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let mantissa = value / 10f64.powi(exponent);
        let digits = trim_trailing_zeros(&format!("{:.*}", (SIGNIFICANT_DIGITS - 1) as usize, mantissa));
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", digits, sign, exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        trim_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

fn trim_trailing_zeros(formatted: &str) -> String {
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted.to_string()
    }
}

/// Writes a matrix as TSV: one row per line, fields separated by a single
/// tab, each value formatted with 6 significant digits.
pub fn write_matrix<W: Write>(writer: &mut W, matrix: &Array2<f64>) -> io::Result<()> {
    for row in matrix.outer_iter() {
        let fields: Vec<String> = row.iter().map(|&value| format_value(value)).collect();
        writeln!(writer, "{}", fields.join("\t"))?;
    }
    Ok(())
}

/// Writes a matrix TSV dump to the given path.
pub fn write_matrix_to_path<P: AsRef<Path>>(
    path: P,
    matrix: &Array2<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!(
        "Writing {}x{} matrix to {}",
        matrix.nrows(),
        matrix.ncols(),
        path.as_ref().display()
    );
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix(&mut writer, matrix)?;
    writer.flush()?;
    Ok(())
}

/// Reads a whitespace-separated matrix, the counterpart of
/// [`write_matrix`]. Blank lines are skipped; all rows must have the same
/// number of fields.
pub fn read_matrix<R: BufRead>(reader: R) -> Result<Array2<f64>, Box<dyn std::error::Error>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    let cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != cols) {
        return Err("input matrix has rows of unequal length".into());
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((rows.len(), cols), flat)?)
}

/// Reads a matrix TSV dump from the given path.
pub fn read_matrix_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Array2<f64>, Box<dyn std::error::Error>> {
    read_matrix(BufReader::new(File::open(path)?))
}

/// Writes a ring collection as TSV: one `x<TAB>y` line per vertex, with a
/// blank line between consecutive rings.
pub fn write_rings<W: Write>(writer: &mut W, rings: &[Ring]) -> io::Result<()> {
    for (index, ring) in rings.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        for &(x, y) in ring {
            writeln!(writer, "{}\t{}", format_value(x), format_value(y))?;
        }
    }
    Ok(())
}

/// Writes a ring-collection TSV dump to the given path.
pub fn write_rings_to_path<P: AsRef<Path>>(
    path: P,
    rings: &[Ring],
) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Writing {} rings to {}", rings.len(), path.as_ref().display());
    let mut writer = BufWriter::new(File::create(path)?);
    write_rings(&mut writer, rings)?;
    writer.flush()?;
    Ok(())
}
