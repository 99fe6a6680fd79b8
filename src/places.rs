//! Supermarket list extracted from raw place-search results.

use ahash::AHashSet;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaceGeometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

/// One raw place-search result, tagged with the query type it came from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
    #[serde(default)]
    pub place_type: Option<String>,
}

/// A located place, numbered by its position after de-duplication.
#[derive(Debug, Clone, PartialEq)]
pub struct Supermarket {
    pub index: usize,
    pub name: Option<String>,
    pub addr: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub ty: Option<String>,
}

/// Counters for [`select_supermarkets`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacesStats {
    pub read: usize,
    pub unlocated: usize,
    pub duplicates: usize,
    pub grocery: usize,
    pub kept: usize,
}

/// De-duplicate places by exact location (first wins) and keep those whose
/// type is `supermarket_type`.
///
/// `index` is assigned before the type filter, so it stays stable with
/// respect to the de-duplicated list.
pub fn select_supermarkets(
    results: impl IntoIterator<Item = PlaceResult>,
    supermarket_type: &str,
) -> (Vec<Supermarket>, PlacesStats) {
    let mut stats = PlacesStats::default();
    let mut seen: AHashSet<(u64, u64)> = AHashSet::new();
    let mut unique = Vec::new();

    for result in results {
        stats.read += 1;
        let location = result.geometry.as_ref().and_then(|g| g.location.as_ref());
        let (Some(lat), Some(lng)) = (location.and_then(|l| l.lat), location.and_then(|l| l.lng)) else {
            stats.unlocated += 1;
            continue;
        };

        if !seen.insert((lat.to_bits(), lng.to_bits())) {
            stats.duplicates += 1;
            continue;
        }

        unique.push(Supermarket {
            index: unique.len(),
            name: result.name,
            addr: result.formatted_address,
            lat,
            lng,
            ty: result.place_type,
        });
    }

    stats.grocery = unique.iter().filter(|s| s.ty.as_deref() == Some("grocery")).count();
    info!("{} places left after duplicates removed, {} of them grocery", unique.len(), stats.grocery);

    let supermarkets = unique.into_iter()
        .filter(|s| s.ty.as_deref() == Some(supermarket_type))
        .collect::<Vec<_>>();
    stats.kept = supermarkets.len();

    if stats.unlocated > 0 {
        warn!("{} place(s) without a location skipped", stats.unlocated);
    }
    (supermarkets, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, ty: &str, lat: f64, lng: f64) -> PlaceResult {
        PlaceResult {
            name: Some(name.into()),
            formatted_address: Some(format!("{name} street")),
            geometry: Some(PlaceGeometry { location: Some(LatLng { lat: Some(lat), lng: Some(lng) }) }),
            place_type: Some(ty.into()),
        }
    }

    #[test]
    fn dedupes_then_filters() {
        let (supermarkets, stats) = select_supermarkets(
            vec![
                place("A", "supermarket", 5.1, 100.1),
                place("B", "grocery", 5.2, 100.2),
                place("A2", "grocery", 5.1, 100.1),
                place("C", "supermarket", 5.3, 100.3),
                PlaceResult { name: Some("nowhere".into()), ..PlaceResult::default() },
            ],
            "supermarket",
        );
        assert_eq!(stats, PlacesStats { read: 5, unlocated: 1, duplicates: 1, grocery: 1, kept: 2 });
        assert_eq!(supermarkets.iter().map(|s| (s.index, s.name.as_deref())).collect::<Vec<_>>(),
            [(0, Some("A")), (2, Some("C"))]);
    }

    #[test]
    fn parses_raw_json() {
        let results: Vec<PlaceResult> = serde_json::from_str(r#"[
            {"name": "Mart", "formatted_address": "1 Road", "place_id": "x",
             "geometry": {"location": {"lat": 5.4, "lng": 100.3}, "viewport": {}},
             "place_type": "supermarket"}
        ]"#).unwrap();
        let (supermarkets, _) = select_supermarkets(results, "supermarket");
        assert_eq!(supermarkets, [Supermarket {
            index: 0,
            name: Some("Mart".into()),
            addr: Some("1 Road".into()),
            lat: 5.4,
            lng: 100.3,
            ty: Some("supermarket".into()),
        }]);
    }
}
