//! GeoJSON export of zone summaries.

use crate::error::{GridError, Result};
use crate::grid::ZoneGrid;
use crate::report::{ZoneSummary, summaries};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Number};

/// Closed exterior ring of a zone rectangle, counter-clockwise.
pub fn zone_ring(summary: &ZoneSummary) -> Vec<Vec<f64>> {
    let (w, s, e, n) = (
        summary.min_longitude,
        summary.min_latitude,
        summary.max_longitude,
        summary.max_latitude,
    );
    vec![
        vec![w, s],
        vec![e, s],
        vec![e, n],
        vec![w, n],
        vec![w, s],
    ]
}

/// One polygon feature carrying the zone's statistics as properties.
pub fn zone_to_feature(summary: &ZoneSummary) -> Feature {
    let geom = Geometry::new(Value::Polygon(vec![zone_ring(summary)]));

    let mut props = Map::new();
    props.insert("zone".to_string(), summary.id.index().into());
    props.insert("population".to_string(), summary.population.into());
    props.insert("density".to_string(), number(summary.density));
    if let Some(mean) = summary.mean {
        props.insert("mean".to_string(), number(mean));
    }

    Feature {
        bbox: Some(vec![
            summary.min_longitude,
            summary.min_latitude,
            summary.max_longitude,
            summary.max_latitude,
        ]),
        geometry: Some(geom),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn number(value: f64) -> serde_json::Value {
    Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Serializes zone summaries as a GeoJSON FeatureCollection.
pub fn summaries_to_feature_collection(summaries: &[ZoneSummary]) -> Result<String> {
    let collection = FeatureCollection {
        bbox: None,
        features: summaries.iter().map(zone_to_feature).collect(),
        foreign_members: None,
    };

    serde_json::to_string(&collection).map_err(GridError::from)
}

/// Exports a grid as GeoJSON, one feature per zone.
///
/// # Examples
///
/// ```
/// use geozone::compute::geojson::grid_to_geojson;
/// use geozone::{GridConfig, Position, Record, ZoneGrid};
///
/// let grid = ZoneGrid::new(GridConfig::default())?;
/// grid.add_inhabitant(Record::new(Position::new(0.5, 0.5)).with_attribute("score", 2.0))?;
///
/// let json = grid_to_geojson(&grid, Some("score"), false)?;
/// assert!(json.contains("FeatureCollection"));
/// assert!(json.contains("\"population\":1"));
/// # Ok::<(), geozone::GridError>(())
/// ```
pub fn grid_to_geojson(
    grid: &ZoneGrid,
    attribute: Option<&str>,
    include_empty: bool,
) -> Result<String> {
    let summaries = summaries(grid, attribute, include_empty)?;
    summaries_to_feature_collection(&summaries)
}
