//! A single grid cell and the statistics derived from its inhabitants.
//!
//! Zones never cache: every statistic is recomputed from the current
//! inhabitant list, which only ever grows by appending.

use crate::config::EARTH_RADIUS_KILOMETERS;
use crate::error::{GridError, Result};
use geo::Rect;
use geozone_types::position::Position;
use geozone_types::record::Record;
use serde::{Deserialize, Serialize};

/// Index of a zone in its grid's row-major ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

impl ZoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// An axis-aligned rectangle of the globe in degrees, with its inhabitants.
///
/// # Examples
///
/// ```
/// use geozone::{Position, Record, Zone};
///
/// let mut zone = Zone::new(Position::new(0.0, 0.0), Position::new(1.0, 1.0));
/// zone.add_inhabitant(Record::new(Position::new(0.5, 0.5)).with_attribute("score", 10.0));
/// zone.add_inhabitant(Record::new(Position::new(0.9, 0.9)).with_attribute("score", 20.0));
///
/// assert_eq!(zone.population(), 2);
/// assert_eq!(zone.average_attribute("score")?, 15.0);
/// assert!(zone.population_density()? > 0.0);
/// # Ok::<(), geozone::GridError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Zone {
    corner1: Position,
    corner2: Position,
    earth_radius_km: f64,
    inhabitants: Vec<Record>,
}

impl Zone {
    /// Create an empty zone from two opposite corners, in any order.
    pub fn new(corner1: Position, corner2: Position) -> Self {
        Self::with_earth_radius(corner1, corner2, EARTH_RADIUS_KILOMETERS)
    }

    pub fn with_earth_radius(corner1: Position, corner2: Position, earth_radius_km: f64) -> Self {
        Self {
            corner1,
            corner2,
            earth_radius_km,
            inhabitants: Vec::new(),
        }
    }

    pub fn corner1(&self) -> &Position {
        &self.corner1
    }

    pub fn corner2(&self) -> &Position {
        &self.corner2
    }

    /// Normalised bounds in degrees (x = longitude, y = latitude).
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.corner1.into_inner().0,
            self.corner2.into_inner().0,
        )
    }

    pub fn min_longitude(&self) -> f64 {
        self.corner1
            .longitude_degrees()
            .min(self.corner2.longitude_degrees())
    }

    pub fn max_longitude(&self) -> f64 {
        self.corner1
            .longitude_degrees()
            .max(self.corner2.longitude_degrees())
    }

    pub fn min_latitude(&self) -> f64 {
        self.corner1
            .latitude_degrees()
            .min(self.corner2.latitude_degrees())
    }

    pub fn max_latitude(&self) -> f64 {
        self.corner1
            .latitude_degrees()
            .max(self.corner2.latitude_degrees())
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_longitude() + self.max_longitude()) / 2.0,
            (self.min_latitude() + self.max_latitude()) / 2.0,
        )
    }

    /// Half-open containment: lower edges belong to the zone, upper edges do not.
    pub fn contains(&self, position: &Position) -> bool {
        let (lon, lat) = (position.longitude_degrees(), position.latitude_degrees());
        lon >= self.min_longitude()
            && lon < self.max_longitude()
            && lat >= self.min_latitude()
            && lat < self.max_latitude()
    }

    /// Append a record. No deduplication; arrival order is kept.
    pub fn add_inhabitant(&mut self, record: Record) {
        self.inhabitants.push(record);
    }

    pub fn inhabitants(&self) -> &[Record] {
        &self.inhabitants
    }

    pub fn population(&self) -> usize {
        self.inhabitants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inhabitants.is_empty()
    }

    /// East-west extent in kilometers, `|Δλ| · R`.
    pub fn width_km(&self) -> f64 {
        (self.corner1.longitude_radians() - self.corner2.longitude_radians()).abs()
            * self.earth_radius_km
    }

    /// North-south extent in kilometers, `|Δφ| · R`.
    pub fn height_km(&self) -> f64 {
        (self.corner1.latitude_radians() - self.corner2.latitude_radians()).abs()
            * self.earth_radius_km
    }

    pub fn area_km2(&self) -> f64 {
        self.width_km() * self.height_km()
    }

    /// Inhabitants per square kilometer.
    ///
    /// Fails with [`GridError::ZeroArea`] for a degenerate zone, which only a
    /// misconfigured grid can produce.
    pub fn population_density(&self) -> Result<f64> {
        let area = self.area_km2();
        if !(area.is_finite() && area > 0.0) {
            return Err(GridError::ZeroArea(area));
        }
        Ok(self.population() as f64 / area)
    }

    /// Sum of a numeric attribute over all inhabitants.
    pub fn attribute_sum(&self, name: &str) -> Result<f64> {
        self.inhabitants
            .iter()
            .enumerate()
            .map(|(idx, record)| numeric_value(record, name, idx))
            .sum()
    }

    /// Mean of a numeric attribute, or `0.0` for an empty zone.
    ///
    /// The zero is a bounded default, not a "no data" marker: check
    /// [`Zone::population`] first when the two must be told apart.
    pub fn average_attribute(&self, name: &str) -> Result<f64> {
        if self.is_empty() {
            return Ok(0.0);
        }
        Ok(self.attribute_sum(name)? / self.population() as f64)
    }
}

fn numeric_value(record: &Record, name: &str, inhabitant: usize) -> Result<f64> {
    let value = record
        .attribute(name)
        .ok_or_else(|| GridError::MissingAttribute {
            attribute: name.to_string(),
            inhabitant,
        })?;

    value
        .as_number()
        .ok_or_else(|| GridError::NonNumericAttribute {
            attribute: name.to_string(),
            inhabitant,
            found: value.type_name(),
        })
}
