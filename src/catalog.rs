//! Polygon catalog: reads grouping polygons from a directory of GeoJSON files.
//!
//! Every entry whose name matches the configured [`FileMatch`](crate::config::FileMatch) rule is parsed
//! as a FeatureCollection. From each feature only one ring is kept:
//!
//! - `Polygon`: the exterior ring
//! - `MultiPolygon`: the exterior ring of the first part
//!
//! Interior rings and further parts are discarded. Features of any other
//! geometry type, and features without geometry, are skipped.
//!
//! Polygons come back in directory listing order, then feature order. Listing
//! order is whatever the platform returns unless
//! [`CatalogOptions::sorted_listing`] is set, so with overlapping polygons the
//! first-match winner can differ between machines.

use crate::config::{CatalogOptions, MalformedPolicy};
use crate::error::{Result, TileGroupError};
use geojson::{GeoJson, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tilegroup_types::point::Point3d;
use tilegroup_types::polygon::PolygonRing;

/// Loads polygons from GeoJSON files.
#[derive(Debug, Clone, Default)]
pub struct PolygonCatalog {
    options: CatalogOptions,
}

impl PolygonCatalog {
    pub fn new(options: CatalogOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// Read all polygons found in `dir`.
    ///
    /// # Errors
    ///
    /// - `DirectoryNotFound` if `dir` is missing or cannot be listed
    /// - `MalformedFeatureFile` if a matching file is not a FeatureCollection
    ///   with usable rings, unless the catalog skips malformed files
    /// - `Io` if a matching file cannot be read
    pub fn load<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PolygonRing>> {
        let dir = dir.as_ref();
        let files = self.polygon_files(dir)?;

        let mut rings = Vec::new();
        for path in files {
            let bytes = fs::read(&path)?;
            let parsed = std::str::from_utf8(&bytes)
                .map_err(|e| TileGroupError::InvalidInput(format!("File is not UTF-8: {}", e)))
                .and_then(rings_from_geojson);
            match parsed {
                Ok(found) => {
                    log::debug!("{} polygons read from {}", found.len(), path.display());
                    rings.extend(found);
                }
                Err(e) => {
                    let reason = match e {
                        TileGroupError::InvalidInput(reason) => reason,
                        other => other.to_string(),
                    };
                    match self.options.on_malformed {
                        MalformedPolicy::Fail => {
                            return Err(TileGroupError::MalformedFeatureFile { path, reason });
                        }
                        MalformedPolicy::Skip => {
                            log::warn!(
                                "Skipping malformed feature file {}: {}",
                                path.display(),
                                reason
                            );
                        }
                    }
                }
            }
        }

        log::debug!("Loaded {} polygons from {}", rings.len(), dir.display());
        Ok(rings)
    }

    /// Like [`load`](Self::load), but a failure ends the process.
    ///
    /// The diagnostic names the offending path and the exit status is 1.
    pub fn load_or_exit<P: AsRef<Path>>(&self, dir: P) -> Vec<PolygonRing> {
        match self.load(dir) {
            Ok(rings) => rings,
            Err(e) => {
                eprintln!("{}", e);
                eprintln!("Exiting");
                std::process::exit(1);
            }
        }
    }

    /// Matching file paths, in listing order (or name order when sorted).
    fn polygon_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        log::debug!(
            "Scanning {} for polygon files ({:?})",
            dir.display(),
            self.options.file_match
        );
        let entries = fs::read_dir(dir).map_err(|_| TileGroupError::DirectoryNotFound {
            path: dir.to_path_buf(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !self.options.file_match.matches(&name) {
                continue;
            }
            let path = entry.path();
            if !path.is_file() {
                log::debug!("Ignoring non-file entry {}", path.display());
                continue;
            }
            files.push(path);
        }

        if self.options.sorted_listing {
            files.sort();
        }
        Ok(files)
    }
}

/// Convenience for `PolygonCatalog::default().load(dir)`.
pub fn load_polygons<P: AsRef<Path>>(dir: P) -> Result<Vec<PolygonRing>> {
    PolygonCatalog::default().load(dir)
}

/// Extract one ring per polygonal feature from a GeoJSON FeatureCollection.
///
/// # Examples
///
/// ```
/// use tilegroup::catalog::rings_from_geojson;
///
/// let json = r#"{
///   "type": "FeatureCollection",
///   "features": [
///     {"type": "Feature", "properties": {},
///      "geometry": {"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,4],[0,4],[0,0]]]}},
///     {"type": "Feature", "properties": {},
///      "geometry": {"type": "Point", "coordinates": [1,1]}}
///   ]
/// }"#;
/// let rings = rings_from_geojson(json).unwrap();
/// assert_eq!(rings.len(), 1);
/// assert_eq!(rings[0].points().len(), 4);
/// ```
pub fn rings_from_geojson(text: &str) -> Result<Vec<PolygonRing>> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| TileGroupError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(TileGroupError::InvalidInput(
                "GeoJSON document is not a FeatureCollection".to_string(),
            ));
        }
    };

    let mut rings = Vec::new();
    for (idx, feature) in collection.features.iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            log::debug!("Feature {} has no geometry, skipped", idx);
            continue;
        };

        let ring = match &geometry.value {
            Value::Polygon(polygon) => polygon.first(),
            Value::MultiPolygon(parts) => parts.first().and_then(|part| part.first()),
            other => {
                log::debug!("Feature {} is a {}, skipped", idx, geometry_type(other));
                continue;
            }
        };
        let ring = ring.ok_or_else(|| {
            TileGroupError::InvalidInput(format!("Feature {} has an empty polygon", idx))
        })?;

        let points = ring
            .iter()
            .map(|position| {
                Point3d::from_slice(position).ok_or_else(|| {
                    TileGroupError::InvalidInput(format!(
                        "Feature {}: coordinate must have at least 2 values",
                        idx
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ring = PolygonRing::new(points).ok_or_else(|| {
            TileGroupError::InvalidInput(format!(
                "Feature {}: ring needs at least 3 distinct vertices",
                idx
            ))
        })?;
        rings.push(ring);
    }

    Ok(rings)
}

fn geometry_type(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "square"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[-10, -10, 5], [10, -10, 5], [10, 10, 5], [-10, 10, 5], [-10, -10, 5]],
                    [[-1, -1], [1, -1], [1, 1], [-1, 1], [-1, -1]]
                ]
            }
        }]
    }"#;

    #[test]
    fn test_polygon_exterior_only() {
        let rings = rings_from_geojson(SQUARE).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(
            rings[0].points(),
            &[
                Point3d::new(-10.0, -10.0, 5.0),
                Point3d::new(10.0, -10.0, 5.0),
                Point3d::new(10.0, 10.0, 5.0),
                Point3d::new(-10.0, 10.0, 5.0),
            ]
        );
        // hole discarded: its center is inside the ring
        assert!(rings[0].contains_2d(&Point3d::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_multipolygon_first_part_only() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature", "properties": null,
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0, 0], [2, 0], [2, 2], [0, 0]]],
                        [[[50, 50], [60, 50], [60, 60], [50, 50]]]
                    ]
                }
            }]
        }"#;
        let rings = rings_from_geojson(json).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].points().len(), 3);
        assert_eq!(rings[0].points()[1], Point3d::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_other_geometries_skipped() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": null, "geometry": null},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [3, 0], [0, 3], [0, 0]]]}}
            ]
        }"#;
        let rings = rings_from_geojson(json).unwrap();
        assert_eq!(rings.len(), 1);
    }

    #[test]
    fn test_not_json_is_error() {
        assert!(matches!(
            rings_from_geojson("not valid json"),
            Err(TileGroupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bare_geometry_is_error() {
        let json = r#"{"type": "Polygon", "coordinates": [[[0, 0], [3, 0], [0, 3], [0, 0]]]}"#;
        assert!(rings_from_geojson(json).is_err());
    }

    #[test]
    fn test_degenerate_ring_is_error() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": null,
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [3, 0], [0, 0]]]}}]
        }"#;
        let err = rings_from_geojson(json).unwrap_err();
        assert!(err.to_string().contains("Feature 0"));
    }

    #[test]
    fn test_repeated_vertex_ring_is_error() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": null,
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 0], [5, 5], [0, 0]]]}}]
        }"#;
        assert!(matches!(
            rings_from_geojson(json),
            Err(TileGroupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_directory() {
        let err = PolygonCatalog::default()
            .load("/definitely/not/a/polygon/dir")
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/definitely/not/a/polygon/dir"));
    }

    #[test]
    fn test_empty_features_yield_no_rings() {
        let json = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(rings_from_geojson(json).unwrap().is_empty());
    }
}
