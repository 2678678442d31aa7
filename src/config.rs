//! Grid and ingestion configuration
//!
//! Every constant the zone arithmetic depends on lives here so that the
//! resolution, domain bounds and earth radius can be changed from a JSON or
//! TOML file instead of code.
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Mean earth radius used for the flat zone projection.
pub const EARTH_RADIUS_KILOMETERS: f64 = 6371.0;

/// Tolerance when checking that a span is a whole number of cells.
const BIN_EPSILON: f64 = 1e-9;

/// Top-level configuration file shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Resolution and extent of the equirectangular grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    #[serde(default = "GridConfig::default_min_longitude")]
    pub min_longitude: f64,

    #[serde(default = "GridConfig::default_max_longitude")]
    pub max_longitude: f64,

    #[serde(default = "GridConfig::default_min_latitude")]
    pub min_latitude: f64,

    #[serde(default = "GridConfig::default_max_latitude")]
    pub max_latitude: f64,

    /// Cell width in degrees of longitude
    #[serde(default = "GridConfig::default_cell_degrees")]
    pub width_degrees: f64,

    /// Cell height in degrees of latitude
    #[serde(default = "GridConfig::default_cell_degrees")]
    pub height_degrees: f64,

    #[serde(default = "GridConfig::default_earth_radius_km")]
    pub earth_radius_km: f64,
}

impl GridConfig {
    const fn default_min_longitude() -> f64 {
        -180.0
    }

    const fn default_max_longitude() -> f64 {
        180.0
    }

    const fn default_min_latitude() -> f64 {
        -90.0
    }

    const fn default_max_latitude() -> f64 {
        90.0
    }

    const fn default_cell_degrees() -> f64 {
        1.0
    }

    const fn default_earth_radius_km() -> f64 {
        EARTH_RADIUS_KILOMETERS
    }

    /// Set both cell dimensions at once.
    pub fn with_resolution(mut self, width_degrees: f64, height_degrees: f64) -> Self {
        self.width_degrees = width_degrees;
        self.height_degrees = height_degrees;
        self
    }

    pub fn with_longitude_range(mut self, min: f64, max: f64) -> Self {
        self.min_longitude = min;
        self.max_longitude = max;
        self
    }

    pub fn with_latitude_range(mut self, min: f64, max: f64) -> Self {
        self.min_latitude = min;
        self.max_latitude = max;
        self
    }

    pub fn with_earth_radius_km(mut self, radius: f64) -> Self {
        self.earth_radius_km = radius;
        self
    }

    /// Number of cells along the longitude axis.
    pub fn longitude_bins(&self) -> usize {
        ((self.max_longitude - self.min_longitude) / self.width_degrees).round() as usize
    }

    /// Number of cells along the latitude axis.
    pub fn latitude_bins(&self) -> usize {
        ((self.max_latitude - self.min_latitude) / self.height_degrees).round() as usize
    }

    /// Total number of zones the grid will hold.
    pub fn zone_count(&self) -> usize {
        self.longitude_bins() * self.latitude_bins()
    }

    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("min_longitude", self.min_longitude),
            ("max_longitude", self.max_longitude),
            ("min_latitude", self.min_latitude),
            ("max_latitude", self.max_latitude),
            ("width_degrees", self.width_degrees),
            ("height_degrees", self.height_degrees),
            ("earth_radius_km", self.earth_radius_km),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} must be finite, got {}", name, value));
        }

        if self.width_degrees <= 0.0 || self.height_degrees <= 0.0 {
            return Err(format!(
                "Cell size must be positive, got {} x {} degrees",
                self.width_degrees, self.height_degrees
            ));
        }

        if self.earth_radius_km <= 0.0 {
            return Err(format!(
                "Earth radius must be positive, got {}",
                self.earth_radius_km
            ));
        }

        if !(-180.0 <= self.min_longitude
            && self.min_longitude < self.max_longitude
            && self.max_longitude <= 180.0)
        {
            return Err(format!(
                "Longitude range [{}, {}) must be increasing and within [-180, 180]",
                self.min_longitude, self.max_longitude
            ));
        }

        if !(-90.0 <= self.min_latitude
            && self.min_latitude < self.max_latitude
            && self.max_latitude <= 90.0)
        {
            return Err(format!(
                "Latitude range [{}, {}) must be increasing and within [-90, 90]",
                self.min_latitude, self.max_latitude
            ));
        }

        check_whole_bins(
            "longitude",
            self.max_longitude - self.min_longitude,
            self.width_degrees,
        )?;
        check_whole_bins(
            "latitude",
            self.max_latitude - self.min_latitude,
            self.height_degrees,
        )?;

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: GridConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn check_whole_bins(axis: &str, span: f64, step: f64) -> Result<(), String> {
    let bins = span / step;
    if bins < 1.0 - BIN_EPSILON || (bins - bins.round()).abs() > BIN_EPSILON * bins.max(1.0) {
        return Err(format!(
            "The {} span of {} degrees is not a whole number of {}-degree cells",
            axis, span, step
        ));
    }
    Ok(())
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_longitude: Self::default_min_longitude(),
            max_longitude: Self::default_max_longitude(),
            min_latitude: Self::default_min_latitude(),
            max_latitude: Self::default_max_latitude(),
            width_degrees: Self::default_cell_degrees(),
            height_degrees: Self::default_cell_degrees(),
            earth_radius_km: Self::default_earth_radius_km(),
        }
    }
}

/// What the aggregation pipeline does with a record it cannot place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Log the record, count it as skipped and carry on
    #[default]
    Skip,
    /// Stop the pass and return the error
    Abort,
}

/// Aggregation pipeline settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// Applies to out-of-domain positions and malformed input records
    #[serde(default)]
    pub on_invalid_record: RecordPolicy,
}

impl IngestConfig {
    pub fn with_policy(mut self, policy: RecordPolicy) -> Self {
        self.on_invalid_record = policy;
        self
    }
}

impl Config {
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_ingest(mut self, ingest: IngestConfig) -> Self {
        self.ingest = ingest;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.grid.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
