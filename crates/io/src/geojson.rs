// Map dataset loading (GeoJSON FeatureCollection)

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use bhulekh_recon::MapParcel;

#[derive(Debug)]
pub enum GeoJsonError {
    /// Not parseable as JSON / wrong shape.
    Parse(String),
    /// Top-level `type` is not `FeatureCollection`.
    NotFeatureCollection(String),
    /// A feature's properties fail the map-parcel contract.
    InvalidParcel { index: usize, message: String },
}

impl fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "GeoJSON parse error: {msg}"),
            Self::NotFeatureCollection(kind) => {
                write!(f, "expected a FeatureCollection, got '{kind}'")
            }
            Self::InvalidParcel { index, message } => {
                write!(f, "feature {index}: {message}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

// `geometry` is never deserialized; the engine consumes ids, areas and
// owner names, not shapes.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: MapParcel,
}

/// Load map parcels from a GeoJSON `FeatureCollection`.
///
/// Each feature must carry a non-empty `plot_id`, unique within the file,
/// and a positive finite `area_map`; `owner_name_map` is optional.
pub fn load_map_parcels(content: &str) -> Result<Vec<MapParcel>, GeoJsonError> {
    let collection: FeatureCollection =
        serde_json::from_str(content).map_err(|e| GeoJsonError::Parse(e.to_string()))?;

    if collection.kind != "FeatureCollection" {
        return Err(GeoJsonError::NotFeatureCollection(collection.kind));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut parcels = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.into_iter().enumerate() {
        let parcel = feature.properties;

        if parcel.plot_id.is_empty() {
            return Err(GeoJsonError::InvalidParcel {
                index,
                message: "empty plot_id".into(),
            });
        }
        if !seen.insert(parcel.plot_id.clone()) {
            return Err(GeoJsonError::InvalidParcel {
                index,
                message: format!("duplicate plot_id '{}'", parcel.plot_id),
            });
        }
        if !(parcel.area_map.is_finite() && parcel.area_map > 0.0) {
            return Err(GeoJsonError::InvalidParcel {
                index,
                message: format!(
                    "area_map must be a positive number, got {}",
                    parcel.area_map
                ),
            });
        }

        parcels.push(parcel);
    }

    Ok(parcels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(plot_id: &str, area: f64, owner: Option<&str>) -> String {
        let owner = match owner {
            Some(o) => format!(", \"owner_name_map\": \"{o}\""),
            None => String::new(),
        };
        format!(
            r#"{{"type": "Feature",
                 "properties": {{"plot_id": "{plot_id}", "area_map": {area}{owner}}},
                 "geometry": {{"type": "Polygon", "coordinates": [[[77.594, 12.9716], [77.5955, 12.972], [77.596, 12.9712], [77.594, 12.9716]]]}}}}"#
        )
    }

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features.join(",")
        )
    }

    #[test]
    fn load_basic() {
        let content = collection(&[
            feature("VLG-001", 2.45, Some("Ramesh Kumar")),
            feature("VLG-005", 2.89, None),
        ]);
        let parcels = load_map_parcels(&content).unwrap();
        assert_eq!(parcels.len(), 2);
        assert_eq!(parcels[0].plot_id, "VLG-001");
        assert_eq!(parcels[0].area_map, 2.45);
        assert_eq!(parcels[0].owner_name_map.as_deref(), Some("Ramesh Kumar"));
        assert_eq!(parcels[1].owner_name_map, None);
    }

    #[test]
    fn geometry_is_not_interpreted() {
        // A feature with no geometry at all still loads.
        let content = r#"{"type": "FeatureCollection", "features": [
            {"properties": {"plot_id": "VLG-001", "area_map": 2.45}}
        ]}"#;
        let parcels = load_map_parcels(content).unwrap();
        assert_eq!(parcels.len(), 1);
    }

    #[test]
    fn rejects_non_feature_collection() {
        let content = r#"{"type": "Feature", "features": []}"#;
        assert!(matches!(
            load_map_parcels(content),
            Err(GeoJsonError::NotFeatureCollection(_))
        ));
    }

    #[test]
    fn rejects_duplicate_plot_ids() {
        let content = collection(&[
            feature("VLG-001", 2.45, None),
            feature("VLG-001", 1.82, None),
        ]);
        match load_map_parcels(&content) {
            Err(GeoJsonError::InvalidParcel { index, message }) => {
                assert_eq!(index, 1);
                assert!(message.contains("duplicate"));
            }
            other => panic!("expected InvalidParcel, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_area() {
        let content = collection(&[feature("VLG-001", 0.0, None)]);
        assert!(matches!(
            load_map_parcels(&content),
            Err(GeoJsonError::InvalidParcel { .. })
        ));

        let content = collection(&[feature("VLG-001", -2.0, None)]);
        assert!(matches!(
            load_map_parcels(&content),
            Err(GeoJsonError::InvalidParcel { .. })
        ));
    }

    #[test]
    fn rejects_empty_plot_id() {
        let content = collection(&[feature("", 1.0, None)]);
        assert!(matches!(
            load_map_parcels(&content),
            Err(GeoJsonError::InvalidParcel { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            load_map_parcels("{not json"),
            Err(GeoJsonError::Parse(_))
        ));
    }
}
