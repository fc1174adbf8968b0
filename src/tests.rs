use crate::analysis::*;
use crate::geometry::*;
use crate::grid::*;
use crate::holes;
use crate::input::*;
use crate::output::*;
use ndarray::{array, Array1};
use serde_json::{json, Value};

/// Helper producing a closed 5-point square ring record fragment
fn square_ring() -> Value {
    json!([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])
}

/// Helper producing a 4-point interior ring record fragment
fn triangle_hole() -> Value {
    json!([[0.2, 0.2], [0.8, 0.2], [0.5, 0.8], [0.2, 0.2]])
}

fn polygon_record() -> Value {
    json!({ "type": "Polygon", "coordinates": [square_ring()] })
}

fn holed_polygon_record() -> Value {
    json!({ "type": "Polygon", "coordinates": [square_ring(), triangle_hole()] })
}

fn multipolygon_record() -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": [[square_ring()], [square_ring(), triangle_hole()]],
    })
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    #[test]
    fn test_describe_polygon_without_holes() {
        let geometry = decode(&polygon_record()).unwrap();
        assert_eq!(geometry.describe(), "<5>");
    }

    #[test]
    fn test_describe_polygon_with_hole() {
        let geometry = decode(&holed_polygon_record()).unwrap();
        assert_eq!(geometry.describe(), "<5:1>");
    }

    #[test]
    fn test_describe_multipolygon_joins_in_order() {
        let geometry = decode(&multipolygon_record()).unwrap();
        assert_eq!(geometry.describe(), "<5> <5:1>");
    }

    #[test]
    fn test_describe_empty_exterior_ring() {
        let record = json!({ "type": "Polygon", "coordinates": [[]] });
        let geometry = decode(&record).unwrap();
        assert_eq!(geometry.describe(), "<0>");
    }

    #[test]
    fn test_exterior_rings_exclude_holes() {
        let geometry = decode(&multipolygon_record()).unwrap();
        let rings = geometry.exterior_rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[1].len(), 5);
    }

    #[test]
    fn test_decode_point_is_unsupported() {
        let record = json!({ "type": "Point", "coordinates": [1.0, 2.0] });
        let error = decode(&record).unwrap_err();
        assert!(matches!(error, GeometryError::UnsupportedGeometry(_)));
        assert_eq!(error.to_string(), "unrecognized shape: Point");
    }

    #[test]
    fn test_decode_missing_tag() {
        let record = json!({ "coordinates": [] });
        let error = decode(&record).unwrap_err();
        assert!(matches!(error, GeometryError::MissingTag));
    }

    #[test]
    fn test_decode_polygon_without_rings_is_malformed() {
        let record = json!({ "type": "Polygon", "coordinates": [] });
        let error = decode(&record).unwrap_err();
        assert!(matches!(error, GeometryError::MalformedCoordinates(_)));
    }

    #[test]
    fn test_decode_non_numeric_point_is_malformed() {
        let record = json!({ "type": "Polygon", "coordinates": [[["a", 2.0]]] });
        let error = decode(&record).unwrap_err();
        assert!(matches!(error, GeometryError::MalformedCoordinates(_)));
    }

    #[test]
    fn test_collect_exterior_rings_preserves_order() {
        let records = vec![multipolygon_record(), polygon_record()];
        let rings = collect_exterior_rings(&records).unwrap();
        assert_eq!(rings.len(), 3);
        assert_eq!(rings[0][1], (1.0, 0.0));
        assert_eq!(rings[2][2], (1.0, 1.0));
    }

    #[test]
    fn test_collect_aborts_on_unsupported_record() {
        let records = vec![
            polygon_record(),
            json!({ "type": "LineString", "coordinates": [] }),
            polygon_record(),
        ];
        let error = collect_exterior_rings(&records).unwrap_err();
        assert_eq!(error.to_string(), "unrecognized shape: LineString");
    }
}

#[cfg(test)]
mod grid_tests {
    use super::*;

    #[test]
    fn test_recenter_splits_at_first_longitude_over_180() {
        let lon = array![0.0, 90.0, 180.0, 270.0, 350.0];
        let val = array![[1.0, 2.0, 3.0, 4.0, 5.0]];
        let (lon_out, val_out) = recenter(&lon, &val);
        assert_eq!(lon_out, array![-90.0, -10.0, 0.0, 90.0, 180.0]);
        assert_eq!(val_out, array![[4.0, 5.0, 1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_recenter_rotates_every_row() {
        let lon = array![90.0, 270.0];
        let val = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let (lon_out, val_out) = recenter(&lon, &val);
        assert_eq!(lon_out, array![-90.0, 90.0]);
        assert_eq!(val_out, array![[2.0, 1.0], [4.0, 3.0], [6.0, 5.0]]);
    }

    #[test]
    fn test_recenter_already_centered_is_noop() {
        let lon = array![-90.0, 0.0, 90.0, 180.0];
        let val = array![[1.0, 2.0, 3.0, 4.0]];
        let (lon_out, val_out) = recenter(&lon, &val);
        assert_eq!(lon_out, lon);
        assert_eq!(val_out, val);
    }

    #[test]
    fn test_recenter_does_not_mutate_inputs() {
        let lon = array![0.0, 270.0];
        let val = array![[1.0, 2.0]];
        let _ = recenter(&lon, &val);
        assert_eq!(lon, array![0.0, 270.0]);
        assert_eq!(val, array![[1.0, 2.0]]);
    }

    #[test]
    fn test_close_seam_prepends_wrap_column() {
        let lon = array![0.0, 90.0, 180.0, 270.0];
        let val = array![[1.0, 2.0, 3.0, 4.0]];
        let (lon_out, val_out) = close_seam(&lon, &val);
        assert_eq!(lon_out, array![-90.0, 0.0, 90.0, 180.0, 270.0]);
        assert_eq!(val_out, array![[4.0, 1.0, 2.0, 3.0, 4.0]]);
    }

    #[test]
    fn test_close_seam_adds_exactly_one_column() {
        let lon = array![0.0, 120.0, 240.0];
        let val = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let (lon_out, val_out) = close_seam(&lon, &val);
        assert_eq!(lon_out.len(), lon.len() + 1);
        assert_eq!(val_out.dim(), (2, 4));
        assert_eq!(val_out, array![[3.0, 1.0, 2.0, 3.0], [6.0, 4.0, 5.0, 6.0]]);
    }
}

#[cfg(test)]
mod holes_tests {
    use super::*;

    #[test]
    fn test_fill_clamps_each_hemisphere_pole_to_equator() {
        // North rows 0-1 unchanged; south rows 2-4 traversed bottom-up:
        // 238, then 240 (new max), then 228 clamped to 240.
        let map = array![[230.0], [235.0], [228.0], [240.0], [238.0]];
        let filled = holes::fill(&map);
        assert_eq!(filled, array![[230.0], [235.0], [240.0], [240.0], [238.0]]);
    }

    #[test]
    fn test_fill_enforces_monotone_profile_within_north_half() {
        // Ten rows, mid = 5: the north half is exactly the documented
        // single-pass example, the south half is already monotone.
        let map = array![
            [230.0],
            [235.0],
            [228.0],
            [240.0],
            [238.0],
            [254.0],
            [253.0],
            [252.0],
            [251.0],
            [250.0]
        ];
        let filled = holes::fill(&map);
        assert_eq!(
            filled,
            array![
                [230.0],
                [235.0],
                [235.0],
                [240.0],
                [240.0],
                [254.0],
                [253.0],
                [252.0],
                [251.0],
                [250.0]
            ]
        );
    }

    #[test]
    fn test_fill_columns_are_independent() {
        let map = array![[10.0, 5.0], [8.0, 7.0], [6.0, 9.0], [9.0, 8.0]];
        let filled = holes::fill(&map);
        assert_eq!(filled, array![[10.0, 5.0], [10.0, 7.0], [9.0, 9.0], [9.0, 8.0]]);
    }

    #[test]
    fn test_fill_is_idempotent() {
        let map = array![[230.0], [235.0], [228.0], [240.0], [238.0]];
        let once = holes::fill(&map);
        let twice = holes::fill(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fill_preserves_shape_for_odd_row_count() {
        let map = array![[3.0, 1.0], [2.0, 2.0], [1.0, 3.0]];
        let filled = holes::fill(&map);
        assert_eq!(filled.dim(), map.dim());
    }

    #[test]
    fn test_fill_does_not_mutate_input() {
        let map = array![[10.0], [5.0]];
        let _ = holes::fill(&map);
        assert_eq!(map, array![[10.0], [5.0]]);
    }
}

#[cfg(test)]
mod analysis_tests {
    use super::*;

    #[test]
    fn test_zonal_median_odd_row() {
        let val = array![[1.0, 3.0, 2.0], [4.0, 6.0, 5.0]];
        assert_eq!(zonal_median(&val), array![2.0, 5.0]);
    }

    #[test]
    fn test_zonal_median_even_row() {
        let val = array![[1.0, 2.0, 3.0, 4.0]];
        assert_eq!(zonal_median(&val), array![2.5]);
    }

    #[test]
    fn test_model_profile_endpoints() {
        let lat = array![-90.0, 0.0, 90.0];
        let profile = model_profile(&lat);
        assert!((profile[0] - 230.0).abs() < 1e-9);
        assert!((profile[1] - 300.0).abs() < 1e-9);
        assert!((profile[2] - 230.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_to_latitude_spans_pole_to_equator() {
        let map = array![[300.0, 250.0]];
        let lat = temperature_to_latitude(&map);
        assert!((lat[[0, 0]] - 0.0).abs() < 1e-9);
        assert!((lat[[0, 1]] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_to_latitude_midpoint() {
        // norm = 0.5 at the midpoint, so lat = 90 * sqrt(0.5)
        let map = array![[300.0, 275.0, 250.0]];
        let lat = temperature_to_latitude(&map);
        assert!((lat[[0, 1]] - 90.0 * 0.5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_tile_latitude_matches_value_matrix_shape() {
        let lat = array![60.0, 30.0, 0.0];
        let tiled = tile_latitude(&lat, 4);
        assert_eq!(tiled.dim(), (3, 4));
        assert_eq!(tiled.row(1), Array1::from(vec![30.0; 4]));
    }
}

#[cfg(test)]
mod output_tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_format_value_integers_drop_fraction() {
        assert_eq!(format_value(230.0), "230");
        assert_eq!(format_value(-90.0), "-90");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn test_format_value_trims_trailing_zeros() {
        assert_eq!(format_value(235.125), "235.125");
        assert_eq!(format_value(-0.5), "-0.5");
        assert_eq!(format_value(2.5), "2.5");
    }

    #[test]
    fn test_format_value_six_significant_digits() {
        assert_eq!(format_value(123.4567891), "123.457");
        assert_eq!(format_value(0.000123456), "0.000123456");
    }

    #[test]
    fn test_format_value_exponential_range() {
        assert_eq!(format_value(1234567.0), "1.23457e+06");
        assert_eq!(format_value(0.0000123456), "1.23456e-05");
    }

    #[test]
    fn test_write_matrix_tab_separated() {
        let matrix = array![[230.0, 235.125], [-90.0, 0.5]];
        let mut buffer = Vec::new();
        write_matrix(&mut buffer, &matrix).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "230\t235.125\n-90\t0.5\n"
        );
    }

    #[test]
    fn test_read_matrix_from_reader() {
        let matrix = read_matrix(Cursor::new("1\t2\n3\t4\n")).unwrap();
        assert_eq!(matrix, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_read_matrix_rejects_ragged_rows() {
        assert!(read_matrix(Cursor::new("1\t2\n3\n")).is_err());
    }

    #[test]
    fn test_matrix_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.tsv");
        let matrix = array![[263.5, 271.25], [280.0, 313.0]];
        write_matrix_to_path(&path, &matrix).unwrap();
        let read_back = read_matrix_from_path(&path).unwrap();
        assert_eq!(read_back, matrix);
    }

    #[test]
    fn test_write_rings_blank_line_between_rings() {
        let rings: Vec<Ring> = vec![vec![(0.0, 0.0), (1.0, 0.5)], vec![(2.0, 2.0)]];
        let mut buffer = Vec::new();
        write_rings(&mut buffer, &rings).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "0\t0\n1\t0.5\n\n2\t2\n"
        );
    }
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn test_job_config_from_json_with_defaults() {
        let json_str = r#"
        {
            "nc_key": "air.sig995.2012.nc",
            "variable_name": "air",
            "grid_key": "temperature.tsv"
        }"#;
        let config = JobConfig::from_json(json_str).unwrap();
        assert_eq!(config.nc_key, "air.sig995.2012.nc");
        assert_eq!(config.variable_name, "air");
        assert_eq!(config.lat_name, "lat");
        assert_eq!(config.lon_name, "lon");
        assert_eq!(config.seam, SeamMode::Recenter);
        assert!(!config.fill_holes);
        assert!(config.shapes_key.is_none());
    }

    #[test]
    fn test_job_config_from_yaml() {
        let yaml_str = "
nc_key: air.nc
variable_name: air
seam: close
fill_holes: true
grid_key: out.tsv
lat_key: lat.tsv
";
        let config = JobConfig::from_yaml(yaml_str).unwrap();
        assert_eq!(config.seam, SeamMode::Close);
        assert!(config.fill_holes);
        assert_eq!(config.lat_key.as_deref(), Some("lat.tsv"));
    }

    #[test]
    fn test_job_config_rejects_unknown_seam_mode() {
        let json_str = r#"
        {
            "nc_key": "air.nc",
            "variable_name": "air",
            "seam": "fold",
            "grid_key": "out.tsv"
        }"#;
        assert!(JobConfig::from_json(json_str).is_err());
    }

    #[test]
    fn test_geometry_records_from_feature_collection() {
        let document = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": polygon_record() },
                { "type": "Feature", "properties": {}, "geometry": multipolygon_record() }
            ]
        });
        let records = geometry_records(document).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(decode(&records[0]).unwrap().describe(), "<5>");
        assert_eq!(decode(&records[1]).unwrap().describe(), "<5> <5:1>");
    }

    #[test]
    fn test_geometry_records_from_bare_geometry() {
        let records = geometry_records(polygon_record()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_geometry_records_from_array() {
        let document = json!([polygon_record(), holed_polygon_record()]);
        let records = geometry_records(document).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_geometry_records_rejects_scalar_document() {
        assert!(geometry_records(json!(42)).is_err());
    }
}
