//! JSON reading for raw mapping-service dumps.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::{access::DistanceResponse, places::PlaceResult};

/// Deserialize a whole JSON document from `path`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("[io::json] Failed to open JSON file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::json] Failed to parse JSON from {:?}", path))
}

/// Raw distance-matrix responses, one per (grid, supermarket) query.
pub(crate) fn read_distance_responses(path: &Path) -> Result<Vec<DistanceResponse>> {
    read_json(path)
}

/// Raw place-search results.
pub(crate) fn read_place_results(path: &Path) -> Result<Vec<PlaceResult>> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist.json");
        fs::write(&path, r#"[{"grid_id": 1}]"#).unwrap();
        let err = read_distance_responses(&path).unwrap_err();
        assert!(format!("{err:#}").contains("dist.json"));
    }

    #[test]
    fn reads_place_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        fs::write(&path, r#"[{"name": "A", "place_type": "supermarket"}, {}]"#).unwrap();
        let places = read_place_results(&path).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name.as_deref(), Some("A"));
    }
}
