//! Error types for zone lookup, statistics and ingestion.

use geozone_types::record::RecordError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Error)]
pub enum GridError {
    /// Position outside `[min_lon, max_lon) x [min_lat, max_lat)`, upper bounds included.
    #[error("position ({longitude}, {latitude}) is outside the grid domain")]
    OutOfDomain { longitude: f64, latitude: f64 },

    /// Bin arithmetic produced a zone that does not contain the position.
    #[error("zone {index} does not contain position ({longitude}, {latitude})")]
    IndexMismatch {
        index: usize,
        longitude: f64,
        latitude: f64,
    },

    #[error("no zone with index {0}")]
    UnknownZone(usize),

    #[error("inhabitant {inhabitant} has no attribute '{attribute}'")]
    MissingAttribute { attribute: String, inhabitant: usize },

    #[error("attribute '{attribute}' of inhabitant {inhabitant} is {found}, not a number")]
    NonNumericAttribute {
        attribute: String,
        inhabitant: usize,
        found: &'static str,
    },

    /// Density requested on a zone whose area is not strictly positive.
    #[error("zone area is {0}; check grid resolution and earth radius")]
    ZeroArea(f64),

    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Record(#[from] RecordError),

    /// A per-record failure, tagged with the record's position in the feed.
    #[error("record {index}: {source}")]
    AtRecord {
        index: u64,
        #[source]
        source: Box<GridError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render error: {0}")]
    Render(String),
}

impl GridError {
    /// Wrap this error with the ordinal of the record that caused it.
    pub fn at_record(self, index: u64) -> Self {
        GridError::AtRecord {
            index,
            source: Box::new(self),
        }
    }

    /// Whether this error concerns a single record rather than the grid itself.
    pub fn is_record_error(&self) -> bool {
        match self {
            GridError::OutOfDomain { .. } | GridError::Record(_) => true,
            GridError::AtRecord { source, .. } => source.is_record_error(),
            _ => false,
        }
    }
}
