//! Fixed-resolution global grid that aggregates geolocated records per zone.
//!
//! ## Features
//! - **Constant-time lookup**: a position maps to its zone by bin arithmetic
//! - **Lazy registry**: zones are built once, on the first lookup, behind a one-shot gate
//! - **Per-zone statistics**: population, area, density and attribute means
//! - **Explicit rejection**: out-of-domain positions are errors, skipped or fatal by policy
//! - **Reporting**: chart series, GeoJSON export and (with `plot`) SVG scatter plots
//!
//! ```rust
//! use geozone::{Aggregator, GridConfig, IngestConfig, Position, Record, ZoneGrid};
//!
//! let grid = ZoneGrid::new(GridConfig::default())?;
//! let mut aggregator = Aggregator::new(&grid, IngestConfig::default());
//!
//! aggregator.ingest_all(vec![
//!     Record::new(Position::new(0.5, 0.5)).with_attribute("score", 10.0),
//!     Record::new(Position::new(0.9, 0.9)).with_attribute("score", 20.0),
//!     Record::new(Position::new(1.5, 1.5)).with_attribute("score", 30.0),
//! ])?;
//!
//! let zone = grid.zone_containing(&Position::new(0.0, 0.0))?;
//! assert_eq!(zone.population(), 2);
//! assert_eq!(zone.average_attribute("score")?, 15.0);
//! # Ok::<(), geozone::GridError>(())
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod grid;
pub mod ingest;
pub mod report;
pub mod zone;

pub use config::{Config, EARTH_RADIUS_KILOMETERS, GridConfig, IngestConfig, RecordPolicy};
pub use error::{GridError, Result};
pub use grid::{ZoneGrid, global};
pub use ingest::{
    Aggregator, RecordOutcome, records_from_json, records_from_path, records_from_reader,
};
pub use zone::{Zone, ZoneId};

pub use geozone_types::position::Position;
pub use geozone_types::record::{AttributeValue, Attributes, Record, RecordError};
pub use geozone_types::stats::IngestStats;

pub use report::{
    ChartSpec, DensityAttributeChart, PopulationAttributeChart, Series, SeriesExtractor,
    ZoneSummary, summaries,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Config, GridConfig, GridError, IngestConfig, RecordPolicy, Result};

    pub use crate::{Aggregator, Zone, ZoneGrid, ZoneId};

    pub use crate::{AttributeValue, Position, Record};

    pub use crate::{DensityAttributeChart, PopulationAttributeChart, SeriesExtractor};
}
