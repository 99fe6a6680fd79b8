use ahash::AHashMap;

use crate::{config::Config, error::Result, grid::GridId};
use super::SupermarketDistanceRecord;

/// Reachable-supermarket count per grid; grids with no reachable
/// supermarket have no entry.
pub type SupermarketCounts = AHashMap<GridId, usize>;

/// Count records for `grid_id` whose driving time is known and within
/// `max_driving_time` seconds (inclusive). Null driving times never count.
pub fn count_reachable(grid_id: &GridId, records: &[SupermarketDistanceRecord], max_driving_time: f64) -> usize {
    AccessibilityCounter::new(max_driving_time).count_reachable(grid_id, records)
}

/// Applies the driving-time threshold to flattened distance records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessibilityCounter {
    max_driving_time: f64,
}

impl AccessibilityCounter {
    pub fn new(max_driving_time: f64) -> Self {
        Self { max_driving_time }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.max_driving_time()?))
    }

    #[inline] pub fn max_driving_time(&self) -> f64 { self.max_driving_time }

    #[inline]
    pub fn is_reachable(&self, record: &SupermarketDistanceRecord) -> bool {
        record.driving_time.is_some_and(|t| t <= self.max_driving_time)
    }

    pub fn count_reachable(&self, grid_id: &GridId, records: &[SupermarketDistanceRecord]) -> usize {
        records.iter()
            .filter(|record| record.grid_id == *grid_id && self.is_reachable(record))
            .count()
    }

    /// Reachable counts for every grid in one pass.
    pub fn count_all(&self, records: &[SupermarketDistanceRecord]) -> SupermarketCounts {
        let mut counts = SupermarketCounts::new();
        for record in records.iter().filter(|record| self.is_reachable(record)) {
            *counts.entry(record.grid_id.clone()).or_default() += 1;
        }
        counts
    }
}

/// Number of records whose query produced no driving time.
pub(crate) fn failed_queries(records: &[SupermarketDistanceRecord]) -> usize {
    records.iter().filter(|record| record.driving_time.is_none()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(grid: &str, supermarket: &str, driving_time: Option<f64>) -> SupermarketDistanceRecord {
        SupermarketDistanceRecord {
            grid_id: grid.into(),
            supermarket_id: supermarket.into(),
            distance: driving_time.map(|t| t * 10.0),
            driving_time,
            status: "OK".into(),
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let records = [
            record("1", "a", Some(300.0)),
            record("1", "b", Some(600.0)),
            record("1", "c", Some(600.5)),
            record("2", "a", Some(10.0)),
        ];
        assert_eq!(count_reachable(&"1".into(), &records, 600.0), 2);
        assert_eq!(count_reachable(&"2".into(), &records, 600.0), 1);
        assert_eq!(count_reachable(&"3".into(), &records, 600.0), 0);
    }

    #[test]
    fn null_driving_time_never_counts() {
        let records = [record("1", "a", None), record("1", "b", None), record("1", "c", Some(5.0))];
        for max in [0.0, 5.0, 1e12, f64::INFINITY] {
            let expected = if max >= 5.0 { 1 } else { 0 };
            assert_eq!(count_reachable(&"1".into(), &records, max), expected, "max = {max}");
        }
        assert_eq!(failed_queries(&records), 2);
    }

    #[test]
    fn count_all_matches_per_grid_counts() {
        let records = [
            record("1", "a", Some(300.0)),
            record("1", "b", Some(700.0)),
            record("1", "c", Some(1200.0)),
            record("2", "a", Some(100.0)),
            record("2", "b", Some(200.0)),
            record("3", "a", Some(900.0)),
            record("4", "a", None),
        ];
        let counter = AccessibilityCounter::new(600.0);
        let counts = counter.count_all(&records);
        assert_eq!(counts.get(&GridId::new("1")), Some(&1));
        assert_eq!(counts.get(&GridId::new("2")), Some(&2));
        assert_eq!(counts.get(&GridId::new("3")), None);
        assert_eq!(counts.get(&GridId::new("4")), None);
        for (grid, count) in &counts {
            assert_eq!(*count, counter.count_reachable(grid, &records));
        }
    }
}
