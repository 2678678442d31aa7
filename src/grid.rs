//! Fixed-resolution equirectangular grid over the globe.
//!
//! The grid owns every [`Zone`] and maps a position to its zone with pure bin
//! arithmetic, never by scanning. Zones are built lazily on the first lookup,
//! behind a one-shot gate, in row-major order: latitude rows from south to
//! north, and within a row longitude columns from west to east. The index
//! formula in [`ZoneGrid::locate`] depends on that order.
//!
//! Each zone sits behind its own lock so that appends to one zone are
//! serialized while lookups and appends to other zones proceed.

use crate::compute::validation::validate_in_domain;
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::zone::{Zone, ZoneId};
use geozone_types::position::Position;
use geozone_types::record::Record;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

static GLOBAL: Lazy<ZoneGrid> = Lazy::new(|| ZoneGrid::unchecked(GridConfig::default()));

/// The process-wide grid at the default 1° x 1° resolution.
///
/// Zones are still built lazily, on the first lookup against this grid.
pub fn global() -> &'static ZoneGrid {
    &GLOBAL
}

/// The zone registry.
///
/// # Examples
///
/// ```
/// use geozone::{GridConfig, Position, Record, ZoneGrid};
///
/// let grid = ZoneGrid::new(GridConfig::default())?;
/// assert!(!grid.is_initialized());
///
/// let id = grid.add_inhabitant(Record::new(Position::new(2.35, 48.85)))?;
/// assert_eq!(grid.len(), 64_800);
///
/// let zone = grid.zone(id).unwrap();
/// assert_eq!(zone.population(), 1);
/// assert_eq!(zone.min_longitude(), 2.0);
/// assert_eq!(zone.min_latitude(), 48.0);
/// # Ok::<(), geozone::GridError>(())
/// ```
pub struct ZoneGrid {
    config: GridConfig,
    longitude_bins: usize,
    latitude_bins: usize,
    zones: OnceCell<Vec<RwLock<Zone>>>,
    initializations: AtomicUsize,
}

impl ZoneGrid {
    /// Create an empty grid. Zones are not built until the first lookup.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate().map_err(GridError::InvalidConfig)?;
        Ok(Self::unchecked(config))
    }

    fn unchecked(config: GridConfig) -> Self {
        Self {
            longitude_bins: config.longitude_bins(),
            latitude_bins: config.latitude_bins(),
            config,
            zones: OnceCell::new(),
            initializations: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn longitude_bins(&self) -> usize {
        self.longitude_bins
    }

    pub fn latitude_bins(&self) -> usize {
        self.latitude_bins
    }

    /// Build every zone if that has not happened yet. Idempotent.
    pub fn initialize(&self) {
        self.cells();
    }

    pub fn is_initialized(&self) -> bool {
        self.zones.get().is_some()
    }

    /// How many times the zone collection has been built: 0 before the first
    /// lookup, 1 forever after.
    pub fn initialization_count(&self) -> usize {
        self.initializations.load(Ordering::Acquire)
    }

    fn cells(&self) -> &[RwLock<Zone>] {
        self.zones.get_or_init(|| self.build_zones())
    }

    fn build_zones(&self) -> Vec<RwLock<Zone>> {
        self.initializations.fetch_add(1, Ordering::AcqRel);

        let c = &self.config;
        let mut zones = Vec::with_capacity(self.longitude_bins * self.latitude_bins);
        for row in 0..self.latitude_bins {
            let lat = self.latitude_edge(row);
            let next_lat = self.latitude_edge(row + 1);
            for col in 0..self.longitude_bins {
                let lon = self.longitude_edge(col);
                let next_lon = self.longitude_edge(col + 1);
                zones.push(RwLock::new(Zone::with_earth_radius(
                    Position::new(lon, lat),
                    Position::new(next_lon, next_lat),
                    c.earth_radius_km,
                )));
            }
        }

        log::debug!(
            "Initialized {} zones ({} x {}) at {}° x {}°",
            zones.len(),
            self.longitude_bins,
            self.latitude_bins,
            c.width_degrees,
            c.height_degrees
        );
        zones
    }

    /// Western edge of column `col`; column `longitude_bins` is the eastern bound.
    fn longitude_edge(&self, col: usize) -> f64 {
        axis_edge(
            col,
            self.config.min_longitude,
            self.config.max_longitude,
            self.config.width_degrees,
            self.longitude_bins,
        )
    }

    fn latitude_edge(&self, row: usize) -> f64 {
        axis_edge(
            row,
            self.config.min_latitude,
            self.config.max_latitude,
            self.config.height_degrees,
            self.latitude_bins,
        )
    }

    /// Number of zones. Triggers initialization.
    pub fn len(&self) -> usize {
        self.cells().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the zone containing `position`.
    ///
    /// `column = floor((lon - min_lon) / width)`, `row = floor((lat - min_lat) / height)`,
    /// `index = row * longitude_bins + column`. Positions outside the half-open
    /// domain, including exactly on the upper bounds, fail with
    /// [`GridError::OutOfDomain`].
    pub fn locate(&self, position: &Position) -> Result<ZoneId> {
        validate_in_domain(position, &self.config)?;
        let cells = self.cells();

        let (lon, lat) = (position.longitude_degrees(), position.latitude_degrees());
        let col = self.longitude_bin(lon);
        let row = self.latitude_bin(lat);
        let index = row * self.longitude_bins + col;

        // Zone corners are built from these same edges and never change, so
        // containment is checked against them without taking the zone lock.
        let contained = index < cells.len()
            && self.longitude_edge(col) <= lon
            && lon < self.longitude_edge(col + 1)
            && self.latitude_edge(row) <= lat
            && lat < self.latitude_edge(row + 1);
        if !contained {
            return Err(GridError::IndexMismatch {
                index,
                longitude: lon,
                latitude: lat,
            });
        }

        Ok(ZoneId(index))
    }

    fn longitude_bin(&self, lon: f64) -> usize {
        let c = &self.config;
        let col = floor_bin(lon - c.min_longitude, c.width_degrees, self.longitude_bins);
        snap_to_edges(col, lon, self.longitude_bins, |i| self.longitude_edge(i))
    }

    fn latitude_bin(&self, lat: f64) -> usize {
        let c = &self.config;
        let row = floor_bin(lat - c.min_latitude, c.height_degrees, self.latitude_bins);
        snap_to_edges(row, lat, self.latitude_bins, |i| self.latitude_edge(i))
    }

    /// Read access to a zone by id.
    ///
    /// Holding the guard blocks appends to that zone until it is dropped.
    pub fn zone(&self, id: ZoneId) -> Option<RwLockReadGuard<'_, Zone>> {
        self.cells().get(id.index()).map(|zone| zone.read())
    }

    /// Read access to the zone containing `position`.
    pub fn zone_containing(&self, position: &Position) -> Result<RwLockReadGuard<'_, Zone>> {
        let id = self.locate(position)?;
        self.zone(id).ok_or(GridError::UnknownZone(id.index()))
    }

    /// Place a record in the zone containing its position.
    pub fn add_inhabitant(&self, record: Record) -> Result<ZoneId> {
        let id = self.locate(record.position())?;
        let zone = self
            .cells()
            .get(id.index())
            .ok_or(GridError::UnknownZone(id.index()))?;
        zone.write().add_inhabitant(record);
        Ok(id)
    }

    /// All zones in registry order.
    pub fn zones(&self) -> impl Iterator<Item = RwLockReadGuard<'_, Zone>> + '_ {
        self.cells().iter().map(|zone| zone.read())
    }

    /// Ids and zones holding at least one inhabitant, in registry order.
    pub fn occupied(&self) -> impl Iterator<Item = (ZoneId, RwLockReadGuard<'_, Zone>)> + '_ {
        self.cells()
            .iter()
            .enumerate()
            .map(|(idx, zone)| (ZoneId(idx), zone.read()))
            .filter(|(_, zone)| !zone.is_empty())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells()
            .iter()
            .filter(|zone| !zone.read().is_empty())
            .count()
    }

    /// Sum of all zone populations.
    pub fn total_population(&self) -> usize {
        self.cells().iter().map(|zone| zone.read().population()).sum()
    }
}

impl std::fmt::Debug for ZoneGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneGrid")
            .field("config", &self.config)
            .field("longitude_bins", &self.longitude_bins)
            .field("latitude_bins", &self.latitude_bins)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Edge `i` of an axis split into `bins` steps, pinned to `max` at the end so
/// the last cell closes the domain exactly.
fn axis_edge(i: usize, min: f64, max: f64, step: f64, bins: usize) -> f64 {
    if i >= bins {
        max
    } else {
        min + i as f64 * step
    }
}

fn floor_bin(offset: f64, step: f64, bins: usize) -> usize {
    let bin = (offset / step).floor();
    if bin <= 0.0 {
        0
    } else {
        (bin as usize).min(bins - 1)
    }
}

/// Correct a one-step rounding disagreement between `offset / step` and the
/// stored edges, which can happen for fractional steps.
fn snap_to_edges(bin: usize, value: f64, bins: usize, edge: impl Fn(usize) -> f64) -> usize {
    if bin > 0 && value < edge(bin) {
        bin - 1
    } else if bin + 1 < bins && value >= edge(bin + 1) {
        bin + 1
    } else {
        bin
    }
}
