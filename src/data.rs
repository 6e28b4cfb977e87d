use crate::types::{Interactivity, Marker, Region};
use anyhow::{anyhow, Context, Result};
use geo::{MultiPolygon, Point};
use geojson::GeoJson;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// GeoJSON property carrying the state name.
pub const NAME_PROPERTY: &str = "shape1";

/// Display name for features without a name property.
pub const FALLBACK_NAME: &str = "Unknown State";

// Features whose name contains one of these fragments are dropped before
// anything else looks at them.
const EXCLUDED_NAME_FRAGMENTS: [&str; 2] = ["andaman", "nicobar"];

// States that correspond to pinned locations; only these get popups, the
// hover highlight and the pointer cursor.
const INTERACTIVE_STATES: [&str; 7] = [
    "Delhi",
    "Maharashtra",
    "Haryana",
    "Madhya Pradesh",
    "Karnataka",
    "West Bengal",
    "Meghalaya",
];

pub fn load_regions(path: &Path) -> Result<Vec<Region>> {
    println!("Loading boundaries from {:?}...", path);
    let file = File::open(path)
        .with_context(|| format!("Failed to open boundary file: {:?}", path))?;
    let reader = BufReader::new(file);

    let geojson = GeoJson::from_reader(reader).context("Failed to parse boundary GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("Boundary GeoJSON must be a FeatureCollection")),
    };

    let mut regions = Vec::new();

    for feature in collection.features {
        let raw_name = feature
            .properties
            .as_ref()
            .and_then(|props| props.get(NAME_PROPERTY))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        // Missing name counts as empty for the exclusion check.
        if is_excluded(raw_name.as_deref().unwrap_or("")) {
            continue;
        }

        let geometry = match feature.geometry {
            Some(geom) => {
                let converted: geo::Geometry<f64> = geom
                    .value
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert feature geometry: {:?}", e))?;

                match converted {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => continue, // skip points/lines
                }
            }
            None => continue,
        };

        let name = raw_name.unwrap_or_else(|| FALLBACK_NAME.to_string());

        regions.push(Region {
            interactivity: classify(&name),
            name,
            geometry,
        });
    }

    println!("Loaded {} regions", regions.len());

    Ok(regions)
}

/// Substring match against the exclusion fragments, case-insensitive.
pub fn is_excluded(name: &str) -> bool {
    let lower = name.to_lowercase();
    EXCLUDED_NAME_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

/// Exact match against the allow-list, case-insensitive.
pub fn classify(name: &str) -> Interactivity {
    let lower = name.to_lowercase();
    if INTERACTIVE_STATES
        .iter()
        .any(|state| state.to_lowercase() == lower)
    {
        Interactivity::Interactive
    } else {
        Interactivity::Static
    }
}

/// Pinned outreach locations. Rendered unconditionally once the boundary
/// layer is in place.
pub fn markers() -> Vec<Marker> {
    [
        ("Delhi", 28.6139, 77.2090),
        ("Pune", 18.5204, 73.8567),
        ("Gurgaon", 28.4595, 77.0266),
        ("Nagpur", 21.1458, 79.0882),
        ("Mauda", 21.3116, 79.3713),
        ("Gadarwara", 22.9220, 78.7849),
        ("Bengaluru", 12.9716, 77.5946),
        ("Kolkata", 22.5726, 88.3639),
        ("Garo Hills (Tura)", 25.5142, 90.2026),
    ]
    .into_iter()
    .map(|(label, lat, lon)| Marker {
        label,
        position: Point::new(lon, lat),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn feature(name: Option<&str>, ring: &str) -> String {
        let props = match name {
            Some(n) => format!(r#"{{"{}":"{}"}}"#, NAME_PROPERTY, n),
            None => "{}".to_string(),
        };
        format!(
            r#"{{"type":"Feature","properties":{},"geometry":{{"type":"Polygon","coordinates":[{}]}}}}"#,
            props, ring
        )
    }

    fn write_collection(features: &[String]) -> tempfile::NamedTempFile {
        let body = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        );
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const DELHI_RING: &str = "[[76.8,28.4],[77.3,28.4],[77.3,28.9],[76.8,28.9],[76.8,28.4]]";
    const ISLAND_RING: &str = "[[92.0,11.0],[94.0,11.0],[94.0,13.0],[92.0,13.0],[92.0,11.0]]";

    #[test]
    fn excludes_by_substring_case_insensitively() {
        assert!(is_excluded("Andaman and Nicobar Islands"));
        assert!(is_excluded("ANDAMAN"));
        assert!(is_excluded("nicobar district"));
        assert!(!is_excluded("Delhi"));
        assert!(!is_excluded(""));
    }

    #[test]
    fn allow_list_membership_is_case_insensitive_and_exact() {
        assert_eq!(classify("Delhi"), Interactivity::Interactive);
        assert_eq!(classify("west bengal"), Interactivity::Interactive);
        assert_eq!(classify("MEGHALAYA"), Interactivity::Interactive);
        assert_eq!(classify("Kerala"), Interactivity::Static);
        // Substrings of allow-listed names do not count.
        assert_eq!(classify("Delh"), Interactivity::Static);
        assert_eq!(classify(FALLBACK_NAME), Interactivity::Static);
    }

    #[test]
    fn excluded_features_never_reach_the_layer() {
        let file = write_collection(&[
            feature(Some("Andaman and Nicobar Islands"), ISLAND_RING),
            feature(Some("Delhi"), DELHI_RING),
        ]);

        let regions = load_regions(file.path()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Delhi");
        assert!(regions[0].is_interactive());
    }

    #[test]
    fn missing_name_defaults_to_placeholder_and_static() {
        let file = write_collection(&[feature(None, DELHI_RING)]);

        let regions = load_regions(file.path()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, FALLBACK_NAME);
        assert!(!regions[0].is_interactive());
    }

    #[test]
    fn non_member_regions_render_as_static() {
        let file = write_collection(&[feature(Some("Kerala"), DELHI_RING)]);

        let regions = load_regions(file.path()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].interactivity, Interactivity::Static);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not geojson").unwrap();
        assert!(load_regions(file.path()).is_err());
    }

    #[test]
    fn non_collection_geojson_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"type":"Point","coordinates":[77.0,28.0]}"#)
            .unwrap();
        let err = load_regions(file.path()).unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_regions(Path::new("no/such/file.geojson")).is_err());
    }

    #[test]
    fn marker_list_is_complete_and_paired() {
        let markers = markers();
        assert_eq!(markers.len(), 9);

        let delhi = markers.iter().find(|m| m.label == "Delhi").unwrap();
        assert_eq!(delhi.position.y(), 28.6139);
        assert_eq!(delhi.position.x(), 77.2090);

        let tura = markers.iter().find(|m| m.label == "Garo Hills (Tura)").unwrap();
        assert_eq!(tura.position.y(), 25.5142);
        assert_eq!(tura.position.x(), 90.2026);
    }
}
