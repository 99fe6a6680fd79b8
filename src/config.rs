//! Typed run configuration, loaded once from YAML and passed by reference.

use std::{collections::BTreeMap, fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub input: InputPaths,
    #[serde(default)]
    pub output: OutputPaths,
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Driving-time threshold in seconds, inclusive.
    pub max_driving_time: Option<f64>,
    /// District id -> externally known total population.
    #[serde(default)]
    pub district_population: BTreeMap<String, f64>,
    #[serde(default)]
    pub allocation: AllocationPolicy,
    #[serde(default)]
    pub buildings: BuildingFilter,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputPaths {
    pub grid_file: Option<PathBuf>,
    pub residential_buildings_file: Option<PathBuf>,
    pub grid_shape_file: Option<PathBuf>,
    pub buildings_shape_file: Option<PathBuf>,
    pub grid_population_file: Option<PathBuf>,
    pub grid_to_supermarket_dist_raw: Option<PathBuf>,
    pub existing_supermarkets_raw: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputPaths {
    pub grid_geocode_file: Option<PathBuf>,
    pub residential_buildings_file: Option<PathBuf>,
    pub grid_population_file: Option<PathBuf>,
    pub grid_population_shape_file: Option<PathBuf>,
    pub district_population_file: Option<PathBuf>,
    pub grid_to_supermarket_dist_data: Option<PathBuf>,
    pub supermarket_density_file: Option<PathBuf>,
    pub supermarket_density_shape_file: Option<PathBuf>,
    pub existing_supermarkets_data: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    #[serde(default = "default_source_crs")]
    pub source: String,
    #[serde(default = "default_target_crs")]
    pub target: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self { source: default_source_crs(), target: default_target_crs() }
    }
}

fn default_source_crs() -> String { "EPSG:3857".into() }
fn default_target_crs() -> String { "EPSG:4326".into() }

/// Policy constants used to split district population between dwelling types.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllocationPolicy {
    /// Fraction of each district's population living in bungalows.
    #[serde(default = "default_bungalow_share")]
    pub bungalow_share: f64,
    /// Residents per 100 m² of bungalow floor area.
    #[serde(default = "default_bungalow_density")]
    pub bungalow_residents_per_100m2: f64,
    /// Building type value that marks a bungalow.
    #[serde(default = "default_bungalow_type")]
    pub bungalow_type: String,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            bungalow_share: default_bungalow_share(),
            bungalow_residents_per_100m2: default_bungalow_density(),
            bungalow_type: default_bungalow_type(),
        }
    }
}

fn default_bungalow_share() -> f64 { 0.05 }
fn default_bungalow_density() -> f64 { 5.0 }
fn default_bungalow_type() -> String { "bungalow".into() }

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingFilter {
    #[serde(default = "default_residential_types")]
    pub residential_types: Vec<String>,
    pub study_area: Option<StudyArea>,
}

impl Default for BuildingFilter {
    fn default() -> Self {
        Self { residential_types: default_residential_types(), study_area: None }
    }
}

fn default_residential_types() -> Vec<String> {
    [
        "condominium", "apartment", "apartments", "dormitory", "EiS_Residences",
        "residential", "bungalow", "detached", "mix_used",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Geographic bounding box, exclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyArea {
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl StudyArea {
    #[inline]
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        lng > self.min_lng && lng < self.max_lng && lat > self.min_lat && lat < self.max_lat
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `gridpop=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub ansi: bool,
    #[serde(default)]
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), ansi: true, target: false }
    }
}

fn default_log_level() -> String { "info".into() }
fn default_true() -> bool { true }

impl Config {
    /// Read and validate a YAML config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("[config] Invalid config file: {}", path.display()))
    }

    /// Parse and validate a YAML config document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text).context("[config] Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Check policy values and numeric ranges.
    pub fn validate(&self) -> Result<(), Error> {
        let policy = &self.allocation;
        if !(0.0..=1.0).contains(&policy.bungalow_share) {
            return Err(Error::config("allocation.bungalow_share", "must be within [0, 1]"));
        }
        if !(policy.bungalow_residents_per_100m2 >= 0.0) {
            return Err(Error::config("allocation.bungalow_residents_per_100m2", "must be non-negative"));
        }
        if let Some(max) = self.max_driving_time {
            if !(max >= 0.0) {
                return Err(Error::config("max_driving_time", "must be non-negative"));
            }
        }
        if let Some(area) = &self.buildings.study_area {
            if !(area.min_lng < area.max_lng && area.min_lat < area.max_lat) {
                return Err(Error::config("buildings.study_area", "min bounds must be below max bounds"));
            }
        }
        for (district, total) in &self.district_population {
            if !(*total >= 0.0) {
                return Err(Error::config(
                    format!("district_population.{district}"),
                    "must be non-negative",
                ));
            }
        }
        Ok(())
    }

    /// Driving-time threshold, required by the density pipeline.
    pub fn max_driving_time(&self) -> Result<f64, Error> {
        self.max_driving_time.ok_or_else(|| Error::config("max_driving_time", "missing"))
    }
}

/// Unwrap an optional path, naming the dotted config key on failure.
pub fn require<'a>(path: &'a Option<PathBuf>, key: &str) -> Result<&'a Path, Error> {
    path.as_deref().ok_or_else(|| Error::config(key, "missing path"))
}
