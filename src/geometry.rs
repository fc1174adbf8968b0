//! # Geometry Decoding
//!
//! This module decodes tagged geometry records (the GeoJSON-shaped
//! "type string + nested coordinate arrays" interface exposed by vector
//! boundary files) into a closed sum type, and derives the two products
//! the rest of the pipeline needs: compact textual shape summaries and
//! ordered exterior-ring collections for overlay rendering.
//!
//! Records are decoded once, here, at the boundary; downstream code only
//! ever sees typed [`Geometry`] values.

use serde_json::Value;
use thiserror::Error;

/// A single vertex: (longitude-like x, latitude-like y). No unit conversion.
pub type Point = (f64, f64);

/// An ordered boundary loop. The first and last points are not required to
/// coincide; traversal direction is significant but never validated.
pub type Ring = Vec<Point>;

/// A polygon with one exterior boundary and zero or more interior holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

/// The closed set of geometry kinds the pipeline accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

/// Errors that can occur while decoding a geometry record
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("unrecognized shape: {0}")]
    UnsupportedGeometry(String),

    #[error("geometry record has no type tag")]
    MissingTag,

    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(String),
}

/// Result type for geometry decoding operations
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Decodes one geometry record into a typed [`Geometry`] value.
///
/// The record must carry a `"type"` tag of either `"Polygon"` or
/// `"MultiPolygon"` and a nested `"coordinates"` array. For a polygon the
/// first sub-array is the exterior ring and any remaining sub-arrays are
/// holes; a multi-polygon wraps each of its elements the same way.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedGeometry`] for any other tag,
/// [`GeometryError::MissingTag`] when the tag is absent, and
/// [`GeometryError::MalformedCoordinates`] when the nested arrays cannot
/// be read as rings of 2-D points.
pub fn decode(record: &Value) -> GeometryResult<Geometry> {
    let tag = record
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(GeometryError::MissingTag)?;
    let coordinates = record.get("coordinates").ok_or_else(|| {
        GeometryError::MalformedCoordinates("geometry record has no coordinates".to_string())
    })?;

    match tag {
        "Polygon" => Ok(Geometry::Polygon(decode_polygon(coordinates)?)),
        "MultiPolygon" => {
            let polygons = coordinates.as_array().ok_or_else(|| {
                GeometryError::MalformedCoordinates(
                    "multipolygon coordinates must be an array of polygons".to_string(),
                )
            })?;
            let decoded = polygons
                .iter()
                .map(decode_polygon)
                .collect::<GeometryResult<Vec<Polygon>>>()?;
            Ok(Geometry::MultiPolygon(decoded))
        }
        other => Err(GeometryError::UnsupportedGeometry(other.to_string())),
    }
}

fn decode_polygon(coordinates: &Value) -> GeometryResult<Polygon> {
    let rings = coordinates.as_array().ok_or_else(|| {
        GeometryError::MalformedCoordinates(
            "polygon coordinates must be an array of rings".to_string(),
        )
    })?;
    let mut decoded = rings
        .iter()
        .map(decode_ring)
        .collect::<GeometryResult<Vec<Ring>>>()?;
    if decoded.is_empty() {
        return Err(GeometryError::MalformedCoordinates(
            "polygon has no exterior ring".to_string(),
        ));
    }
    let exterior = decoded.remove(0);
    Ok(Polygon {
        exterior,
        holes: decoded,
    })
}

fn decode_ring(ring: &Value) -> GeometryResult<Ring> {
    let points = ring.as_array().ok_or_else(|| {
        GeometryError::MalformedCoordinates("ring must be an array of points".to_string())
    })?;
    points
        .iter()
        .map(|point| {
            let pair = point.as_array().ok_or_else(|| {
                GeometryError::MalformedCoordinates("point must be a coordinate array".to_string())
            })?;
            let x = pair.first().and_then(Value::as_f64).ok_or_else(|| {
                GeometryError::MalformedCoordinates("point has no numeric x coordinate".to_string())
            })?;
            let y = pair.get(1).and_then(Value::as_f64).ok_or_else(|| {
                GeometryError::MalformedCoordinates("point has no numeric y coordinate".to_string())
            })?;
            Ok((x, y))
        })
        .collect()
}

impl Polygon {
    /// Compact summary: `<N>` for N exterior vertices, `<N:H>` when the
    /// polygon additionally has H holes. Hole vertex counts are not
    /// reported.
    pub fn describe(&self) -> String {
        let mut summary = self.exterior.len().to_string();
        if !self.holes.is_empty() {
            summary.push(':');
            summary.push_str(&self.holes.len().to_string());
        }
        format!("<{}>", summary)
    }
}

impl Geometry {
    /// Textual shape summary.
    ///
    /// A multi-polygon reports the summary of each constituent polygon,
    /// joined with a single space, in order.
    ///
    /// ```
    /// use serde_json::json;
    /// use tempgrid::geometry::decode;
    ///
    /// let record = json!({
    ///     "type": "Polygon",
    ///     "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
    /// });
    /// assert_eq!(decode(&record).unwrap().describe(), "<5>");
    /// ```
    pub fn describe(&self) -> String {
        match self {
            Geometry::Polygon(polygon) => polygon.describe(),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .map(Polygon::describe)
                .collect::<Vec<String>>()
                .join(" "),
        }
    }

    /// Exterior rings in constituent order. Holes are never included.
    pub fn exterior_rings(&self) -> Vec<Ring> {
        match self {
            Geometry::Polygon(polygon) => vec![polygon.exterior.clone()],
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .map(|polygon| polygon.exterior.clone())
                .collect(),
        }
    }
}

/// Folds the exterior rings of many geometry records, in iteration order,
/// into one ordered ring collection.
///
/// Record order and within-record polygon order are both preserved; there
/// is no deduplication and no coordinate transformation. The first record
/// that fails to decode aborts the whole collection — no partial result is
/// returned.
pub fn collect_exterior_rings<'a, I>(records: I) -> GeometryResult<Vec<Ring>>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut rings = Vec::new();
    for record in records {
        rings.extend(decode(record)?.exterior_rings());
    }
    Ok(rings)
}
