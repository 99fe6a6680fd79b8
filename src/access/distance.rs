use serde::Deserialize;

use crate::grid::GridId;

/// An id that may be encoded as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    pub fn to_grid_id(&self) -> GridId {
        match self {
            RawId::Int(n) => GridId::new(n.to_string()),
            RawId::Float(x) => GridId::from_number(*x),
            RawId::Text(s) => GridId::new(s),
        }
    }
}

/// `{ "value": ..., "text": ... }` leaf of a distance-matrix element.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Measure {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatrixElement {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub distance: Option<Measure>,
    #[serde(default)]
    pub duration: Option<Measure>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Option<Vec<MatrixElement>>,
}

/// One raw distance-matrix response, tagged with the grid and supermarket it
/// was queried for. Every nesting level is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistanceResponse {
    pub grid_id: RawId,
    pub supermarket_id: RawId,
    pub status: String,
    #[serde(default)]
    pub rows: Option<Vec<MatrixRow>>,
}

impl DistanceResponse {
    /// `rows[0].elements[0]`, if present.
    pub fn element(&self) -> Option<&MatrixElement> {
        self.rows.as_ref()?.first()?.elements.as_ref()?.first()
    }

    /// Flatten into a record; any missing level yields null distance and time.
    pub fn into_record(self) -> SupermarketDistanceRecord {
        let element = self.element();
        let distance = element.and_then(|e| e.distance.as_ref()).and_then(|m| m.value);
        let driving_time = element.and_then(|e| e.duration.as_ref()).and_then(|m| m.value);

        SupermarketDistanceRecord {
            grid_id: self.grid_id.to_grid_id(),
            supermarket_id: self.supermarket_id.to_grid_id().id().to_string(),
            distance,
            driving_time,
            status: self.status,
        }
    }
}

/// Flattened grid-to-supermarket query result.
#[derive(Debug, Clone, PartialEq)]
pub struct SupermarketDistanceRecord {
    pub grid_id: GridId,
    pub supermarket_id: String,
    /// Meters; `None` when the query failed.
    pub distance: Option<f64>,
    /// Seconds; `None` when the query failed.
    pub driving_time: Option<f64>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SupermarketDistanceRecord {
        serde_json::from_str::<DistanceResponse>(json).unwrap().into_record()
    }

    #[test]
    fn complete_response_is_flattened() {
        let record = parse(r#"{
            "destination_addresses": ["x"], "origin_addresses": ["y"],
            "rows": [{"elements": [{
                "distance": {"text": "1.2 km", "value": 1200},
                "duration": {"text": "5 mins", "value": 300},
                "status": "OK"
            }]}],
            "status": "OK", "grid_id": 17, "supermarket_id": 3
        }"#);
        assert_eq!(record, SupermarketDistanceRecord {
            grid_id: "17".into(),
            supermarket_id: "3".into(),
            distance: Some(1200.0),
            driving_time: Some(300.0),
            status: "OK".into(),
        });
    }

    #[test]
    fn missing_levels_become_null() {
        for json in [
            r#"{"grid_id": "17", "supermarket_id": "3", "status": "INVALID_REQUEST"}"#,
            r#"{"grid_id": 17, "supermarket_id": 3, "status": "OK", "rows": []}"#,
            r#"{"grid_id": 17, "supermarket_id": 3, "status": "OK", "rows": null}"#,
            r#"{"grid_id": 17, "supermarket_id": 3, "status": "OK", "rows": [{"elements": []}]}"#,
            r#"{"grid_id": 17, "supermarket_id": 3, "status": "OK", "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}]}"#,
        ] {
            let record = parse(json);
            assert_eq!(record.grid_id.id(), "17", "{json}");
            assert_eq!(record.distance, None, "{json}");
            assert_eq!(record.driving_time, None, "{json}");
        }
    }

    #[test]
    fn distance_and_duration_are_independent() {
        let record = parse(r#"{"grid_id": 1.0, "supermarket_id": "a", "status": "OK",
            "rows": [{"elements": [{"distance": {"value": 800}}]}]}"#);
        assert_eq!(record.grid_id.id(), "1");
        assert_eq!(record.distance, Some(800.0));
        assert_eq!(record.driving_time, None);
    }

    #[test]
    fn status_is_required() {
        let err = serde_json::from_str::<DistanceResponse>(r#"{"grid_id": 1, "supermarket_id": 2}"#).unwrap_err();
        assert!(err.to_string().contains("status"));
    }
}
