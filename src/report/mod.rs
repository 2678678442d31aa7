//! Reporting sink contract.
//!
//! A chart is a [`ChartSpec`] (title, axis labels, grid flag) plus a way of
//! turning one zone into one `(x, y)` point. [`SeriesExtractor::series`] walks
//! every zone of a grid in registry order, so both series always hold exactly
//! one value per zone, empty zones included.

use crate::error::Result;
use crate::grid::ZoneGrid;
use crate::zone::{Zone, ZoneId};
use serde::{Deserialize, Serialize};

#[cfg(feature = "plot")]
pub mod plot;

/// Presentation settings shared by every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_grid: bool,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: "Zone statistics".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            show_grid: true,
        }
    }
}

impl ChartSpec {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            ..Self::default()
        }
    }

    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }
}

/// Two parallel numeric series, one entry per zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Series {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

/// Anything that can chart a grid.
///
/// Implementors supply the presentation settings and the per-zone point;
/// collecting the series is shared.
pub trait SeriesExtractor {
    fn spec(&self) -> &ChartSpec;

    /// The `(x, y)` point plotted for one zone.
    fn point(&self, zone: &Zone) -> Result<(f64, f64)>;

    /// Both series over every zone, in registry order.
    fn series(&self, grid: &ZoneGrid) -> Result<Series> {
        let mut series = Series::with_capacity(grid.len());
        for zone in grid.zones() {
            let (x, y) = self.point(&zone)?;
            series.push(x, y);
        }
        Ok(series)
    }
}

/// Population density on x, mean of one attribute on y.
#[derive(Debug, Clone)]
pub struct DensityAttributeChart {
    spec: ChartSpec,
    attribute: String,
}

impl DensityAttributeChart {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            spec: ChartSpec::new("Distribution", "Population density (per km²)", &attribute),
            attribute,
        }
    }

    pub fn with_spec(mut self, spec: ChartSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl SeriesExtractor for DensityAttributeChart {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn point(&self, zone: &Zone) -> Result<(f64, f64)> {
        Ok((
            zone.population_density()?,
            zone.average_attribute(&self.attribute)?,
        ))
    }
}

/// Inhabitant count on x, mean of one attribute on y.
#[derive(Debug, Clone)]
pub struct PopulationAttributeChart {
    spec: ChartSpec,
    attribute: String,
}

impl PopulationAttributeChart {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            spec: ChartSpec::new("Distribution", "Population", &attribute),
            attribute,
        }
    }

    pub fn with_spec(mut self, spec: ChartSpec) -> Self {
        self.spec = spec;
        self
    }
}

impl SeriesExtractor for PopulationAttributeChart {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn point(&self, zone: &Zone) -> Result<(f64, f64)> {
        Ok((
            zone.population() as f64,
            zone.average_attribute(&self.attribute)?,
        ))
    }
}

/// Per-zone statistics in a serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub id: ZoneId,
    pub min_longitude: f64,
    pub min_latitude: f64,
    pub max_longitude: f64,
    pub max_latitude: f64,
    pub population: usize,
    /// Inhabitants per square kilometer
    pub density: f64,
    /// Mean of the requested attribute; absent when none was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
}

impl ZoneSummary {
    pub fn from_zone(id: ZoneId, zone: &Zone, attribute: Option<&str>) -> Result<Self> {
        Ok(Self {
            id,
            min_longitude: zone.min_longitude(),
            min_latitude: zone.min_latitude(),
            max_longitude: zone.max_longitude(),
            max_latitude: zone.max_latitude(),
            population: zone.population(),
            density: zone.population_density()?,
            mean: attribute
                .map(|name| zone.average_attribute(name))
                .transpose()?,
        })
    }
}

/// Summaries of every zone in registry order, optionally leaving out empty ones.
pub fn summaries(
    grid: &ZoneGrid,
    attribute: Option<&str>,
    include_empty: bool,
) -> Result<Vec<ZoneSummary>> {
    grid.zones()
        .enumerate()
        .filter(|(_, zone)| include_empty || !zone.is_empty())
        .map(|(idx, zone)| ZoneSummary::from_zone(ZoneId(idx), &zone, attribute))
        .collect()
}
