// End-to-end runs of the four pipelines against small files in a scratch
// directory: buildings preprocessing, population allocation, places
// selection and supermarket density.

use std::{collections::HashMap, fs, path::Path};

use approx::assert_relative_eq;
use gridpop::{pipeline, Config, Error};
use shapefile::{
    dbase::{FieldValue, Record, TableWriterBuilder},
    Point, Polygon, PolygonRing, Writer,
};

/// Parse a CSV written by a pipeline into rows keyed by column name.
fn read_rows(path: &Path) -> Vec<HashMap<String, String>> {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap().split(',').map(str::to_string).collect::<Vec<_>>();
    lines
        .map(|line| header.iter().cloned().zip(line.split(',').map(str::to_string)).collect())
        .collect()
}

fn number(row: &HashMap<String, String>, column: &str) -> f64 {
    row[column].parse().unwrap()
}

fn row<'a>(rows: &'a [HashMap<String, String>], id: &str) -> &'a HashMap<String, String> {
    rows.iter().find(|r| r["id"] == id).unwrap()
}

fn config(dir: &Path, body: &str) -> Config {
    let yaml = body.replace("$DIR", &dir.display().to_string());
    Config::from_yaml_str(&yaml).unwrap()
}

/// Three cells in a row; cells 1 and 2 in district A, cell 3 in district B.
const GRID: &str = "\
id,left,right,top,bottom,district
1,100.00,100.01,5.01,5.00,A
2,100.01,100.02,5.01,5.00,A
3,100.02,100.03,5.01,5.00,B
";

const BUILDINGS: &str = "\
id,osm_id,name,type,center_lng,center_lat,area
0,10,,apartments,100.005,5.005,300
1,11,,apartments,100.015,5.005,100
2,12,,bungalow,100.025,5.005,200
3,13,,apartments,100.500,5.500,80
";

const POPULATION_CONFIG: &str = r#"
input:
  grid_file: "$DIR/grid.csv"
  residential_buildings_file: "$DIR/buildings.csv"
output:
  grid_geocode_file: "$DIR/out/geocode.csv"
  grid_population_file: "$DIR/out/population.csv"
  district_population_file: "$DIR/out/districts.csv"
projection:
  source: "EPSG:4326"
  target: "EPSG:4326"
district_population:
  A: 1000
  B: 40
"#;

fn population_fixture(dir: &Path) -> Config {
    fs::write(dir.join("grid.csv"), GRID).unwrap();
    fs::write(dir.join("buildings.csv"), BUILDINGS).unwrap();
    config(dir, POPULATION_CONFIG)
}

#[test]
fn population_is_allocated_by_floor_area() {
    let dir = tempfile::tempdir().unwrap();
    let config = population_fixture(dir.path());

    let stats = pipeline::run_population(&config).unwrap();
    assert_eq!(stats.grids, 3);
    assert_eq!(stats.buildings.assigned, 3);
    assert_eq!(stats.buildings.unassigned, 1);
    assert_eq!(stats.districts, 2);
    assert_eq!(stats.guarded_grids, 1);
    assert_relative_eq!(stats.total_population, 960.0, epsilon = 1e-9);

    let rows = read_rows(&dir.path().join("out/population.csv"));
    assert_eq!(rows.len(), 3);
    // District A: 5% bungalow share, 950 apartment residents split 300:100.
    assert_relative_eq!(number(row(&rows, "1"), "population"), 712.5, epsilon = 1e-9);
    assert_relative_eq!(number(row(&rows, "2"), "population"), 237.5, epsilon = 1e-9);
    // District B has only a 200 m² bungalow: 200 / 100 * 5.
    assert_relative_eq!(number(row(&rows, "3"), "population"), 10.0, epsilon = 1e-9);
    assert_eq!(row(&rows, "3")["district"], "B");

    let geocode = read_rows(&dir.path().join("out/geocode.csv"));
    assert_eq!(geocode.len(), 3);
    assert_relative_eq!(number(row(&geocode, "2"), "center_lng"), 100.015, epsilon = 1e-9);
    assert_relative_eq!(number(row(&geocode, "2"), "center_lat"), 5.005, epsilon = 1e-9);

    let districts = read_rows(&dir.path().join("out/districts.csv"));
    let a = districts.iter().find(|r| r["district"] == "A").unwrap();
    assert_relative_eq!(number(a, "area"), 400.0);
    assert_relative_eq!(number(a, "apartment_population"), 950.0, epsilon = 1e-9);
}

#[test]
fn missing_district_total_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = population_fixture(dir.path());
    config.district_population.remove("B");

    let err = pipeline::run_population(&config).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::InvalidConfig { field, .. }) => assert_eq!(field, "district_population.B"),
        other => panic!("unexpected error: {other:?}"),
    }
}

const DISTANCES: &str = r#"[
  {"grid_id": 3, "supermarket_id": 0, "status": "OK",
   "rows": [{"elements": [{"duration": {"value": 300}, "distance": {"value": 2000}, "status": "OK"}]}]},
  {"grid_id": 3, "supermarket_id": 1, "status": "OK",
   "rows": [{"elements": [{"duration": {"value": 700}, "distance": {"value": 5000}, "status": "OK"}]}]},
  {"grid_id": 3, "supermarket_id": 2, "status": "OK",
   "rows": [{"elements": [{"duration": {"value": 1200}, "distance": {"value": 9000}, "status": "OK"}]}]},
  {"grid_id": 2, "supermarket_id": 0, "status": "OK",
   "rows": [{"elements": [{"duration": {"value": 100}, "distance": {"value": 700}, "status": "OK"}]}]},
  {"grid_id": 2, "supermarket_id": 1, "status": "OK",
   "rows": [{"elements": [{"duration": {"value": 600}, "distance": {"value": 4000}, "status": "OK"}]}]},
  {"grid_id": 1, "supermarket_id": 0, "status": "OVER_QUERY_LIMIT"}
]"#;

#[test]
fn density_divides_population_by_reachable_count() {
    let dir = tempfile::tempdir().unwrap();
    let population = population_fixture(dir.path());
    pipeline::run_population(&population).unwrap();
    fs::write(dir.path().join("distances.json"), DISTANCES).unwrap();

    let config = config(dir.path(), r#"
input:
  grid_file: "$DIR/grid.csv"
  grid_population_file: "$DIR/out/population.csv"
  grid_to_supermarket_dist_raw: "$DIR/distances.json"
output:
  grid_to_supermarket_dist_data: "$DIR/out/distances.csv"
  supermarket_density_file: "$DIR/out/density.csv"
projection:
  source: "EPSG:4326"
  target: "EPSG:4326"
max_driving_time: 600
"#);

    let stats = pipeline::run_density(&config).unwrap();
    assert_eq!(stats.records, 6);
    assert_eq!(stats.failed_queries, 1);
    assert_eq!(stats.grids_with_access, 2);
    assert_eq!(stats.grids, 3);

    let rows = read_rows(&dir.path().join("out/density.csv"));
    assert_eq!(rows.len(), 3);
    // One of [300, 700, 1200] s is within 600 s.
    assert_relative_eq!(number(row(&rows, "3"), "density"), 10.0, epsilon = 1e-9);
    // Both 100 s and 600 s count; the threshold is inclusive.
    assert_relative_eq!(number(row(&rows, "2"), "density"), 118.75, epsilon = 1e-9);
    // No reachable supermarket: divided by one.
    assert_relative_eq!(number(row(&rows, "1"), "density"), 712.5, epsilon = 1e-9);

    let distances = read_rows(&dir.path().join("out/distances.csv"));
    assert_eq!(distances.len(), 6);
    let failed = distances.iter().find(|r| r["grid_id"] == "1").unwrap();
    assert_eq!(failed["status"], "OVER_QUERY_LIMIT");
    assert_eq!(failed["driving_time"], "");
}

#[test]
fn density_requires_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), r#"
input:
  grid_population_file: "$DIR/population.csv"
  grid_to_supermarket_dist_raw: "$DIR/distances.json"
output:
  supermarket_density_file: "$DIR/density.csv"
"#);
    let err = pipeline::run_density(&config).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::InvalidConfig { field, .. }) => assert_eq!(field, "max_driving_time"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn places_keep_unique_supermarkets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("places.json"), r#"[
      {"name": "Mart", "formatted_address": "1 Jalan A", "geometry": {"location": {"lat": 5.40, "lng": 100.30}}, "place_type": "supermarket"},
      {"name": "Kedai", "formatted_address": "2 Jalan B", "geometry": {"location": {"lat": 5.41, "lng": 100.31}}, "place_type": "grocery"},
      {"name": "Mart again", "formatted_address": "1 Jalan A", "geometry": {"location": {"lat": 5.40, "lng": 100.30}}, "place_type": "supermarket"},
      {"name": "Giant", "formatted_address": "3 Jalan C", "geometry": {"location": {"lat": 5.42, "lng": 100.32}}, "place_type": "supermarket"}
    ]"#).unwrap();
    let config = config(dir.path(), r#"
input:
  existing_supermarkets_raw: "$DIR/places.json"
output:
  existing_supermarkets_data: "$DIR/supermarkets.csv"
"#);

    let stats = pipeline::run_places(&config).unwrap();
    assert_eq!((stats.read, stats.duplicates, stats.grocery, stats.kept), (4, 1, 1, 2));

    let rows = read_rows(&dir.path().join("supermarkets.csv"));
    assert_eq!(rows.iter().map(|r| (r["index"].as_str(), r["name"].as_str())).collect::<Vec<_>>(),
        [("0", "Mart"), ("2", "Giant")]);
}

fn footprint(x: f64, y: f64, size: f64) -> Polygon {
    // Clockwise, closed: the shapefile convention for an outer ring.
    Polygon::new(PolygonRing::Outer(vec![
        Point::new(x, y),
        Point::new(x, y + size),
        Point::new(x + size, y + size),
        Point::new(x + size, y),
        Point::new(x, y),
    ]))
}

#[test]
fn buildings_are_filtered_from_footprints() {
    let dir = tempfile::tempdir().unwrap();
    let shp_path = dir.path().join("buildings.shp");
    {
        let table = TableWriterBuilder::new()
            .add_character_field("osm_id".try_into().unwrap(), 20)
            .add_character_field("type".try_into().unwrap(), 40)
            .add_character_field("name".try_into().unwrap(), 80);
        let mut writer = Writer::from_path(&shp_path, table).unwrap();
        for (osm_id, ty, x) in [("1", "apartments", 100.1), ("2", "school", 100.2), ("3", "bungalow", 101.5)] {
            let mut record = Record::default();
            record.insert("osm_id".into(), FieldValue::Character(Some(osm_id.into())));
            record.insert("type".into(), FieldValue::Character(Some(ty.into())));
            record.insert("name".into(), FieldValue::Character(None));
            writer.write_shape_and_record(&footprint(x, 5.1, 0.0002), &record).unwrap();
        }
    }

    let config = config(dir.path(), r#"
input:
  buildings_shape_file: "$DIR/buildings.shp"
output:
  residential_buildings_file: "$DIR/residential.csv"
buildings:
  study_area: { min_lng: 100.0, max_lng: 101.0, min_lat: 5.0, max_lat: 6.0 }
"#);

    let stats = pipeline::run_buildings(&config).unwrap();
    assert_eq!((stats.read, stats.non_residential, stats.outside_study_area, stats.kept), (3, 1, 1, 1));

    let rows = read_rows(&dir.path().join("residential.csv"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["osm_id"], "1");
    assert_eq!(rows[0]["type"], "apartments");
    assert_relative_eq!(number(&rows[0], "center_lng"), 100.1001, epsilon = 1e-9);
    assert!(number(&rows[0], "area") > 0.0);
}
