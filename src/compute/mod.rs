//! Computation helpers shared by the grid and the reporting sink.

pub mod geojson;
pub mod validation;
