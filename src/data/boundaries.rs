use crate::error::DataError;
use crate::map::LineString;
use geojson::{Feature, GeoJson, Geometry, JsonObject, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outline of one region
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: Option<String>,
    /// Exterior and interior rings as lon/lat line strings
    pub rings: Vec<LineString>,
}

/// Region outlines for the boundary overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    pub boundaries: Vec<Boundary>,
}

impl BoundarySet {
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// All rings of all boundaries
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        self.boundaries.iter().flat_map(|b| b.rings.iter())
    }
}

/// Property keys tried, in order, for a region's display name
const NAME_KEYS: [&str; 3] = ["name", "NAZEV", "nazev"];

/// Load region boundary polygons from a GeoJSON file
pub fn load_boundaries(path: &Path) -> Result<BoundarySet, DataError> {
    let mut bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let object: JsonObject = simd_json::serde::from_slice(&mut bytes)?;
    let geojson = GeoJson::from_json_object(object)?;

    let set = collect_boundaries(&geojson);
    if set.is_empty() {
        return Err(DataError::NoPolygons(path.to_path_buf()));
    }

    info!(path = %path.display(), regions = set.len(), "boundaries loaded");
    Ok(set)
}

/// Extract polygon boundaries from parsed GeoJSON
pub fn collect_boundaries(geojson: &GeoJson) -> BoundarySet {
    let mut boundaries = Vec::new();

    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(b) = feature_boundary(feature) {
                    boundaries.push(b);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(b) = feature_boundary(f) {
                boundaries.push(b);
            }
        }
        GeoJson::Geometry(geometry) => {
            let mut rings = Vec::new();
            process_geometry_rings(geometry, &mut rings);
            if !rings.is_empty() {
                boundaries.push(Boundary { name: None, rings });
            }
        }
    }

    BoundarySet { boundaries }
}

fn feature_boundary(feature: &Feature) -> Option<Boundary> {
    let geometry = feature.geometry.as_ref()?;
    let mut rings = Vec::new();
    process_geometry_rings(geometry, &mut rings);
    if rings.is_empty() {
        debug!("ignoring feature without polygon geometry");
        return None;
    }

    let name = feature.properties.as_ref().and_then(|props| {
        NAME_KEYS
            .iter()
            .find_map(|key| props.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
    });

    Some(Boundary { name, rings })
}

fn process_geometry_rings(geometry: &Geometry, rings: &mut Vec<LineString>) {
    let to_line = |coords: &Vec<Vec<f64>>| -> LineString {
        coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
    };

    match &geometry.value {
        Value::Polygon(polygon) => {
            rings.extend(polygon.iter().map(to_line));
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                rings.extend(polygon.iter().map(to_line));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_rings(g, rings);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KRAJE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Hlavní město Praha" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [14.2, 50.0], [14.7, 50.0], [14.7, 50.2], [14.2, 50.2], [14.2, 50.0]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAZEV": "Středočeský kraj" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[13.5, 49.5], [15.5, 49.5], [15.5, 50.6], [13.5, 49.5]]],
                        [[[15.6, 49.6], [15.8, 49.6], [15.8, 49.8], [15.6, 49.6]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Bod" },
                "geometry": { "type": "Point", "coordinates": [14.4, 50.1] }
            }
        ]
    }"#;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_polygons_and_names() {
        let file = write_temp(KRAJE);
        let set = load_boundaries(file.path()).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.boundaries[0].name.as_deref(), Some("Hlavní město Praha"));
        assert_eq!(set.boundaries[0].rings.len(), 1);
        assert_eq!(set.boundaries[0].rings[0][1], (14.7, 50.0));
        assert_eq!(set.boundaries[1].name.as_deref(), Some("Středočeský kraj"));
        assert_eq!(set.rings().count(), 3);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let file = write_temp("{ \"type\": \"FeatureCollection\", ");
        assert!(matches!(load_boundaries(file.path()), Err(DataError::Json(_))));
    }

    #[test]
    fn test_not_geojson_is_error() {
        let file = write_temp(r#"{ "type": "Nonsense" }"#);
        assert!(matches!(load_boundaries(file.path()), Err(DataError::GeoJson(_))));
    }

    #[test]
    fn test_points_only_is_error() {
        let file = write_temp(
            r#"{
                "type": "Feature",
                "properties": null,
                "geometry": { "type": "Point", "coordinates": [14.4, 50.1] }
            }"#,
        );
        assert!(matches!(load_boundaries(file.path()), Err(DataError::NoPolygons(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_boundaries(&dir.path().join("kraje.json")),
            Err(DataError::Io { .. })
        ));
    }
}
