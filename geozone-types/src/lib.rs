//! # geozone-types
//!
//! Leaf value types for the geozone aggregation engine.
//!
//! - **Position**: a longitude/latitude pair in degrees with radian accessors
//! - **Record**: a position plus an open-ended bag of named scalar attributes
//! - **IngestStats**: counters produced by an aggregation pass
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geozone_types::position::Position;
//! use geozone_types::record::{AttributeValue, Record};
//!
//! let paris = Position::new(2.3522, 48.8566);
//! let record = Record::new(paris).with_attribute("score", 12.0);
//!
//! assert_eq!(record.numeric_attribute("score"), Some(12.0));
//! assert_eq!(record.attribute("score"), Some(&AttributeValue::Number(12.0)));
//! ```

pub mod position;
pub mod record;
pub mod stats;
