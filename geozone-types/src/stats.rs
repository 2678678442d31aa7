use serde::{Deserialize, Serialize};

/// Counters produced by an aggregation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Records offered to the pipeline
    pub received: u64,
    /// Records placed into a zone
    pub ingested: u64,
    /// Records rejected and skipped under the skip policy
    pub skipped: u64,
    /// Zones holding at least one inhabitant after the pass
    pub occupied_zones: usize,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&mut self) {
        self.received += 1;
    }

    pub fn record_ingested(&mut self) {
        self.ingested += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn set_occupied_zones(&mut self, count: usize) {
        self.occupied_zones = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = IngestStats::new();
        stats.record_received();
        stats.record_received();
        stats.record_ingested();
        stats.record_skipped();
        stats.set_occupied_zones(1);

        assert_eq!(stats.received, 2);
        assert_eq!(stats.ingested, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.occupied_zones, 1);
    }
}
