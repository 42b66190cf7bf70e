#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for province boundary attribution.
//!
//! Loads province polygons from a bundled `GeoJSON` boundary asset at
//! startup, builds an R-tree spatial index, and provides fast
//! point-in-polygon lookups. Built once by the process initialization
//! path and shared read-only across all aggregation passes.

use std::path::Path;

use geo::{Contains, MultiPolygon};
use geojson::GeoJson;
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

/// Feature property carrying the province name in the bundled
/// boundary dataset (GADM level-1 administrative areas).
pub const DEFAULT_NAME_PROPERTY: &str = "NAME_1";

/// Errors that can occur while loading the boundary dataset.
///
/// All of these are fatal at startup; the aggregation pipeline cannot
/// function without province polygons.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Reading the boundary asset failed.
    #[error("Failed to read boundary dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The boundary asset is not valid `GeoJSON`.
    #[error("Failed to parse boundary GeoJSON: {0}")]
    Geojson(#[from] geojson::Error),

    /// The boundary asset parsed but is not a feature collection.
    #[error("Boundary dataset is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    /// No usable province polygons were found in the asset.
    #[error("Boundary dataset contains no usable province polygons")]
    EmptyDataset,
}

/// A province boundary polygon stored in the R-tree with its name.
struct BoundaryEntry {
    province: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for BoundaryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over province boundary polygons.
///
/// Constructed once and shared across all consumers. Provides fast
/// point-in-polygon lookups for province attribution.
pub struct BoundaryIndex {
    provinces: RTree<BoundaryEntry>,
    /// Province names in dataset order, for listing consumers.
    names: Vec<String>,
}

impl BoundaryIndex {
    /// Loads province polygons from a `GeoJSON` file and builds the
    /// R-tree index.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the file cannot be read, is not a
    /// `GeoJSON` feature collection, or yields no usable polygons.
    pub fn load_from_path(
        path: impl AsRef<Path>,
        name_property: &str,
    ) -> Result<Self, SpatialError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_geojson(&contents, name_property)
    }

    /// Builds the index from a `GeoJSON` feature collection string.
    ///
    /// Each feature must carry the province name under `name_property`
    /// and a `Polygon` or `MultiPolygon` geometry; features missing
    /// either are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError`] if the string is not a `GeoJSON`
    /// feature collection or yields no usable polygons.
    pub fn from_geojson(geojson_str: &str, name_property: &str) -> Result<Self, SpatialError> {
        let GeoJson::FeatureCollection(collection) = geojson_str.parse::<GeoJson>()? else {
            return Err(SpatialError::NotFeatureCollection);
        };

        let mut entries = Vec::new();
        let mut names = Vec::new();

        for feature in collection.features {
            let Some(province) = feature
                .property(name_property)
                .and_then(|value| value.as_str())
                .map(ToString::to_string)
            else {
                log::warn!("Skipping boundary feature without '{name_property}' property");
                continue;
            };

            let Some(multi_polygon) = feature.geometry.and_then(parse_geometry_to_multipolygon)
            else {
                log::warn!("Skipping boundary feature '{province}' with non-polygon geometry");
                continue;
            };

            let envelope = compute_envelope(&multi_polygon);

            names.push(province.clone());
            entries.push(BoundaryEntry {
                province,
                envelope,
                polygon: multi_polygon,
            });
        }

        if entries.is_empty() {
            return Err(SpatialError::EmptyDataset);
        }

        log::info!(
            "Loaded {} province boundaries into spatial index",
            entries.len()
        );

        Ok(Self {
            provinces: RTree::bulk_load(entries),
            names,
        })
    }

    /// Look up the province containing a point.
    ///
    /// Province boundaries tile the country without overlap, so the
    /// first match wins. Returns `None` for points outside every known
    /// polygon (e.g. at sea); that is an expected outcome, not an
    /// error.
    #[must_use]
    pub fn lookup_province(&self, lng: f64, lat: f64) -> Option<&str> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        for entry in self.provinces.locate_in_envelope_intersecting(&query_env) {
            if entry.polygon.contains(&point) {
                return Some(&entry.province);
            }
        }
        None
    }

    /// Province names in dataset order.
    #[must_use]
    pub fn province_names(&self) -> &[String] {
        &self.names
    }

    /// Number of indexed province polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.provinces.size()
    }

    /// Whether the index holds no polygons. Always `false` for an
    /// index built through the loading constructors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provinces.size() == 0
    }
}

/// Convert a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn parse_geometry_to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    use geo::BoundingRect;

    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle_feature(name: &str, west: f64, south: f64, east: f64, north: f64) -> String {
        format!(
            r#"{{
                "type": "Feature",
                "properties": {{ "NAME_1": "{name}" }},
                "geometry": {{
                    "type": "Polygon",
                    "coordinates": [[
                        [{west}, {south}], [{east}, {south}],
                        [{east}, {north}], [{west}, {north}],
                        [{west}, {south}]
                    ]]
                }}
            }}"#
        )
    }

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{ "type": "FeatureCollection", "features": [{}] }}"#,
            features.join(",")
        )
    }

    fn test_index() -> BoundaryIndex {
        let geojson = collection(&[
            rectangle_feature("TestProvince", 100.0, 10.0, 101.0, 11.0),
            rectangle_feature("OtherProvince", 102.0, 10.0, 103.0, 11.0),
        ]);
        BoundaryIndex::from_geojson(&geojson, DEFAULT_NAME_PROPERTY).unwrap()
    }

    #[test]
    fn finds_province_containing_point() {
        let index = test_index();
        assert_eq!(index.lookup_province(100.5, 10.5), Some("TestProvince"));
        assert_eq!(index.lookup_province(102.5, 10.5), Some("OtherProvince"));
    }

    #[test]
    fn returns_none_for_point_outside_all_polygons() {
        let index = test_index();
        assert_eq!(index.lookup_province(0.0, 0.0), None);
    }

    #[test]
    fn handles_multipolygon_geometry() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "NAME_1": "SplitProvince" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[100.0, 10.0], [101.0, 10.0], [101.0, 11.0], [100.0, 11.0], [100.0, 10.0]]],
                        [[[104.0, 10.0], [105.0, 10.0], [105.0, 11.0], [104.0, 11.0], [104.0, 10.0]]]
                    ]
                }
            }]
        }"#;
        let index = BoundaryIndex::from_geojson(geojson, DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(index.lookup_province(100.5, 10.5), Some("SplitProvince"));
        assert_eq!(index.lookup_province(104.5, 10.5), Some("SplitProvince"));
        assert_eq!(index.lookup_province(102.5, 10.5), None);
    }

    #[test]
    fn skips_features_without_name_property() {
        let unnamed = r#"{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [102.0, 10.0], [103.0, 10.0], [103.0, 11.0], [102.0, 11.0], [102.0, 10.0]
                ]]
            }
        }"#
        .to_string();
        let geojson = collection(&[
            rectangle_feature("Named", 100.0, 10.0, 101.0, 11.0),
            unnamed,
        ]);
        let index = BoundaryIndex::from_geojson(&geojson, DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup_province(102.5, 10.5), None);
    }

    #[test]
    fn skips_non_polygon_geometry() {
        let point_feature = r#"{
            "type": "Feature",
            "properties": { "NAME_1": "PointProvince" },
            "geometry": { "type": "Point", "coordinates": [100.5, 10.5] }
        }"#
        .to_string();
        let geojson = collection(&[
            rectangle_feature("Named", 100.0, 10.0, 101.0, 11.0),
            point_feature,
        ]);
        let index = BoundaryIndex::from_geojson(&geojson, DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn errors_on_empty_feature_collection() {
        let geojson = r#"{ "type": "FeatureCollection", "features": [] }"#;
        let result = BoundaryIndex::from_geojson(geojson, DEFAULT_NAME_PROPERTY);
        assert!(matches!(result, Err(SpatialError::EmptyDataset)));
    }

    #[test]
    fn errors_on_non_feature_collection() {
        let geojson = r#"{ "type": "Point", "coordinates": [100.5, 10.5] }"#;
        let result = BoundaryIndex::from_geojson(geojson, DEFAULT_NAME_PROPERTY);
        assert!(matches!(result, Err(SpatialError::NotFeatureCollection)));
    }

    #[test]
    fn errors_on_invalid_geojson() {
        let result = BoundaryIndex::from_geojson("not geojson", DEFAULT_NAME_PROPERTY);
        assert!(matches!(result, Err(SpatialError::Geojson(_))));
    }

    #[test]
    fn lists_province_names_in_dataset_order() {
        let index = test_index();
        assert_eq!(index.province_names(), ["TestProvince", "OtherProvince"]);
    }

    #[test]
    fn respects_custom_name_property() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "province_th": "Chiang Mai" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [98.0, 18.0], [99.5, 18.0], [99.5, 19.5], [98.0, 19.5], [98.0, 18.0]
                    ]]
                }
            }]
        }"#;
        let index = BoundaryIndex::from_geojson(geojson, "province_th").unwrap();
        assert_eq!(index.lookup_province(98.98, 18.79), Some("Chiang Mai"));
    }
}
