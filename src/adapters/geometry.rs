use crate::core::Storage;
use crate::domain::model::{DepartmentGeometry, Geometry, Ring};
use crate::utils::error::{DashboardError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Polygon, PolygonRing};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    Shapefile,
    GeoJson,
}

impl GeometryFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("shp") => Ok(Self::Shapefile),
            Some("geojson") | Some("json") => Ok(Self::GeoJson),
            _ => Err(DashboardError::InvalidConfigValueError {
                field: "geometry_file".to_string(),
                value: path.to_string(),
                reason: "expected a .shp, .geojson or .json file".to_string(),
            }),
        }
    }
}

/// Reads one boundary per department, keyed by the `key_field` attribute.
pub async fn read_geometries<S: Storage>(
    storage: &S,
    path: &str,
    key_field: &str,
) -> Result<Vec<DepartmentGeometry>> {
    match GeometryFormat::from_path(path)? {
        GeometryFormat::Shapefile => {
            let full_path = storage.locate(path);
            let key_field = key_field.to_string();
            tokio::task::spawn_blocking(move || read_shapefile(&full_path, &key_field))
                .await
                .map_err(|e| DashboardError::ProcessingError {
                    message: format!("shapefile reader task failed: {}", e),
                })?
        }
        GeometryFormat::GeoJson => {
            let bytes = storage.read_file(path).await?;
            parse_geojson(&bytes, key_field)
        }
    }
}

fn read_shapefile(path: &Path, key_field: &str) -> Result<Vec<DepartmentGeometry>> {
    let shapes = shapefile::read_as::<_, Polygon, Record>(path)?;
    tracing::debug!("Read {} shapes from {}", shapes.len(), path.display());

    shapes
        .into_iter()
        .enumerate()
        .map(|(index, (polygon, record))| {
            let department_code = match record.get(key_field) {
                Some(FieldValue::Character(Some(value))) => value.trim().to_string(),
                Some(FieldValue::Numeric(Some(value))) => numeric_key(*value),
                Some(_) => {
                    return Err(DashboardError::ValidationError {
                        message: format!("shape {}: '{}' is empty", index, key_field),
                    })
                }
                None => {
                    return Err(DashboardError::MissingColumnError {
                        column: key_field.to_string(),
                        source_name: path.display().to_string(),
                    })
                }
            };

            Ok(DepartmentGeometry {
                department_code,
                geometry: polygon_geometry(&polygon),
            })
        })
        .collect()
}

/// Shapefile polygons store all rings flat; each outer ring opens a new
/// polygon and the inner rings that follow it are its holes.
fn polygon_geometry(polygon: &Polygon) -> Geometry {
    let mut polygons: Vec<Vec<Ring>> = Vec::new();

    for ring in polygon.rings() {
        let points: Ring = ring.points().iter().map(|p| [p.x, p.y]).collect();
        match ring {
            PolygonRing::Outer(_) => polygons.push(vec![points]),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(current) => current.push(points),
                // hole without a preceding outer ring
                None => polygons.push(vec![points]),
            },
        }
    }

    Geometry { polygons }
}

fn numeric_key(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<GeoJsonGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeoJsonGeometry {
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

fn ring_from_positions(positions: Vec<Vec<f64>>, feature: usize) -> Result<Ring> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok([*x, *y]),
            _ => Err(DashboardError::ValidationError {
                message: format!("feature {}: position with fewer than 2 coordinates", feature),
            }),
        })
        .collect()
}

fn polygon_from_rings(rings: Vec<Vec<Vec<f64>>>, feature: usize) -> Result<Vec<Ring>> {
    rings
        .into_iter()
        .map(|ring| ring_from_positions(ring, feature))
        .collect()
}

pub fn parse_geojson(bytes: &[u8], key_field: &str) -> Result<Vec<DepartmentGeometry>> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let department_code = match feature
                .properties
                .as_ref()
                .and_then(|properties| properties.get(key_field))
            {
                Some(Value::String(value)) => value.trim().to_string(),
                Some(Value::Number(value)) => match value.as_i64() {
                    Some(integer) => integer.to_string(),
                    None => value.to_string(),
                },
                _ => {
                    return Err(DashboardError::MissingColumnError {
                        column: key_field.to_string(),
                        source_name: format!("GeoJSON feature {}", index),
                    })
                }
            };

            let polygons = match feature.geometry {
                Some(GeoJsonGeometry::Polygon(rings)) => vec![polygon_from_rings(rings, index)?],
                Some(GeoJsonGeometry::MultiPolygon(polygons)) => polygons
                    .into_iter()
                    .map(|rings| polygon_from_rings(rings, index))
                    .collect::<Result<Vec<_>>>()?,
                None => {
                    return Err(DashboardError::ValidationError {
                        message: format!(
                            "feature {} ({}) has no geometry",
                            index, department_code
                        ),
                    })
                }
            };

            Ok(DepartmentGeometry {
                department_code,
                geometry: Geometry { polygons },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::Point;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            GeometryFormat::from_path("coordenadas/COLOMBIA/COLOMBIA.shp").unwrap(),
            GeometryFormat::Shapefile
        );
        assert_eq!(
            GeometryFormat::from_path("deptos.GeoJSON").unwrap(),
            GeometryFormat::GeoJson
        );
        assert!(GeometryFormat::from_path("deptos.kml").is_err());
    }

    #[test]
    fn test_parse_geojson_polygon_and_multipolygon() {
        let geojson = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"DPTO_CCDGO": " 05 ", "DPTO_CNMBR": "ANTIOQUIA"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-76.0, 6.0], [-75.0, 6.0], [-75.0, 7.0], [-76.0, 6.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {"DPTO_CCDGO": 88},
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[-81.7, 12.5, 0.0], [-81.6, 12.5, 0.0], [-81.6, 12.6, 0.0], [-81.7, 12.5, 0.0]]],
                            [[[-81.4, 13.3], [-81.3, 13.3], [-81.3, 13.4], [-81.4, 13.3]]]
                        ]
                    }
                }
            ]
        });

        let geometries =
            parse_geojson(geojson.to_string().as_bytes(), "DPTO_CCDGO").unwrap();

        assert_eq!(geometries.len(), 2);
        assert_eq!(geometries[0].department_code, "05");
        assert_eq!(geometries[0].geometry.polygons.len(), 1);
        assert_eq!(geometries[0].geometry.polygons[0][0][1], [-75.0, 6.0]);
        assert_eq!(geometries[1].department_code, "88");
        assert_eq!(geometries[1].geometry.polygons.len(), 2);
        assert_eq!(geometries[1].geometry.polygons[0][0][0], [-81.7, 12.5]);
    }

    #[test]
    fn test_parse_geojson_missing_key() {
        let geojson = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"OTHER":"05"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}]}"#;
        let err = parse_geojson(geojson.as_bytes(), "DPTO_CCDGO").unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumnError { .. }));
    }

    #[test]
    fn test_parse_geojson_rejects_unsupported_geometry() {
        let geojson = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"DPTO_CCDGO":"05"},
             "geometry":{"type":"Point","coordinates":[0,0]}}]}"#;
        assert!(parse_geojson(geojson.as_bytes(), "DPTO_CCDGO").is_err());
    }

    #[test]
    fn test_polygon_rings_grouped_by_outer() {
        let polygon = Polygon::with_rings(vec![
            PolygonRing::Outer(vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 4.0),
                Point::new(4.0, 4.0),
                Point::new(4.0, 0.0),
                Point::new(0.0, 0.0),
            ]),
            PolygonRing::Inner(vec![
                Point::new(1.0, 1.0),
                Point::new(2.0, 1.0),
                Point::new(2.0, 2.0),
                Point::new(1.0, 2.0),
                Point::new(1.0, 1.0),
            ]),
            PolygonRing::Outer(vec![
                Point::new(10.0, 10.0),
                Point::new(10.0, 11.0),
                Point::new(11.0, 11.0),
                Point::new(10.0, 10.0),
            ]),
        ]);

        let geometry = polygon_geometry(&polygon);
        assert_eq!(geometry.polygons.len(), 2);
        assert_eq!(geometry.polygons[0].len(), 2);
        assert_eq!(geometry.polygons[1].len(), 1);
    }

    #[test]
    fn test_numeric_key() {
        assert_eq!(numeric_key(5.0), "5");
        assert_eq!(numeric_key(11.0), "11");
    }
}
