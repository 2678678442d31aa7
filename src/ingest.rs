//! Aggregation pipeline: places each incoming record into its zone.
//!
//! A single linear pass. Each record is independent; a record that cannot be
//! placed is either skipped (and logged) or aborts the pass, as chosen by
//! [`RecordPolicy`]. Errors that point at the grid itself rather than the
//! record always abort.

use crate::config::{IngestConfig, RecordPolicy};
use crate::error::{GridError, Result};
use crate::grid::ZoneGrid;
use crate::zone::ZoneId;
use geozone_types::record::{Record, RecordError};
use geozone_types::stats::IngestStats;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Outcome of decoding one raw input record.
pub type RecordOutcome = std::result::Result<Record, RecordError>;

/// Decode a JSON array of flat objects into records.
///
/// A malformed document fails as a whole; a malformed element only fails its
/// own entry so the pipeline can apply its record policy to it.
///
/// # Examples
///
/// ```
/// use geozone::ingest::records_from_json;
///
/// let outcomes = records_from_json(r#"[
///     {"longitude": 0.5, "latitude": 0.5, "score": 10},
///     {"latitude": 1.0}
/// ]"#)?;
///
/// assert_eq!(outcomes.len(), 2);
/// assert!(outcomes[0].is_ok());
/// assert!(outcomes[1].is_err());
/// # Ok::<(), geozone::GridError>(())
/// ```
pub fn records_from_json(json: &str) -> Result<Vec<RecordOutcome>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    Ok(decode_all(values))
}

pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<RecordOutcome>> {
    let values: Vec<Value> = serde_json::from_reader(reader)?;
    Ok(decode_all(values))
}

pub fn records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RecordOutcome>> {
    let file = File::open(path.as_ref())?;
    records_from_reader(BufReader::new(file))
}

fn decode_all(values: Vec<Value>) -> Vec<RecordOutcome> {
    values.into_iter().map(Record::from_json_value).collect()
}

/// Drives records into a [`ZoneGrid`].
///
/// # Examples
///
/// ```
/// use geozone::{Aggregator, GridConfig, IngestConfig, Position, Record, ZoneGrid};
///
/// let grid = ZoneGrid::new(GridConfig::default())?;
/// let mut aggregator = Aggregator::new(&grid, IngestConfig::default());
///
/// let stats = aggregator.ingest_all(vec![
///     Record::new(Position::new(0.5, 0.5)),
///     Record::new(Position::new(180.0, 0.0)), // upper bound, skipped
/// ])?;
///
/// assert_eq!(stats.ingested, 1);
/// assert_eq!(stats.skipped, 1);
/// # Ok::<(), geozone::GridError>(())
/// ```
#[derive(Debug)]
pub struct Aggregator<'g> {
    grid: &'g ZoneGrid,
    config: IngestConfig,
    stats: IngestStats,
}

impl<'g> Aggregator<'g> {
    pub fn new(grid: &'g ZoneGrid, config: IngestConfig) -> Self {
        Self {
            grid,
            config,
            stats: IngestStats::new(),
        }
    }

    pub fn grid(&self) -> &'g ZoneGrid {
        self.grid
    }

    /// Place one record.
    ///
    /// Returns `Ok(None)` when the record was rejected and skipped.
    pub fn ingest(&mut self, record: Record) -> Result<Option<ZoneId>> {
        self.ingest_outcome(Ok(record))
    }

    /// Place one decoded record, or apply the record policy to a decode failure.
    pub fn ingest_outcome(&mut self, outcome: RecordOutcome) -> Result<Option<ZoneId>> {
        let index = self.stats.received;
        self.stats.record_received();

        let placed = outcome
            .map_err(GridError::from)
            .and_then(|record| self.grid.add_inhabitant(record));

        match placed {
            Ok(id) => {
                self.stats.record_ingested();
                Ok(Some(id))
            }
            Err(err) => self.reject(err.at_record(index)),
        }
    }

    fn reject(&mut self, err: GridError) -> Result<Option<ZoneId>> {
        if err.is_record_error() && self.config.on_invalid_record == RecordPolicy::Skip {
            log::warn!("Skipping {}", err);
            self.stats.record_skipped();
            Ok(None)
        } else {
            Err(err)
        }
    }

    /// Place every record, then return the pass statistics.
    pub fn ingest_all<I>(&mut self, records: I) -> Result<IngestStats>
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            self.ingest(record)?;
        }
        Ok(self.finish_pass())
    }

    /// Like [`Aggregator::ingest_all`] for decoded input that may contain failures.
    pub fn ingest_outcomes<I>(&mut self, outcomes: I) -> Result<IngestStats>
    where
        I: IntoIterator<Item = RecordOutcome>,
    {
        for outcome in outcomes {
            self.ingest_outcome(outcome)?;
        }
        Ok(self.finish_pass())
    }

    fn finish_pass(&mut self) -> IngestStats {
        self.stats.set_occupied_zones(self.grid.occupied_count());
        log::info!(
            "Ingested {} of {} records into {} zones ({} skipped)",
            self.stats.ingested,
            self.stats.received,
            self.stats.occupied_zones,
            self.stats.skipped
        );
        self.stats.clone()
    }

    /// Statistics so far. `occupied_zones` is refreshed at the end of each pass.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }
}
