use geozone::compute::geojson::grid_to_geojson;
use geozone::{
    Aggregator, Config, DensityAttributeChart, GridConfig, GridError, IngestConfig, Position,
    RecordPolicy, SeriesExtractor, ZoneGrid, records_from_path, summaries,
};
use std::io::Write;

const AGENTS: &str = r#"[
    {"longitude": 0.5, "latitude": 0.5, "agreeableness": 0.2, "name": "a"},
    {"longitude": 0.9, "latitude": 0.9, "agreeableness": 0.6, "name": "b"},
    {"longitude": 1.5, "latitude": 1.5, "agreeableness": 0.9, "name": "c"},
    {"longitude": 180.0, "latitude": 10.0, "agreeableness": 0.1},
    {"latitude": 10.0, "agreeableness": 0.1}
]"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn agents_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(AGENTS.as_bytes()).expect("write agents");
    file
}

#[test]
fn test_ingest_file_with_skip_policy() {
    init_logging();
    let file = agents_file();
    let grid = ZoneGrid::new(GridConfig::default()).unwrap();
    let mut aggregator = Aggregator::new(&grid, IngestConfig::default());

    let stats = aggregator
        .ingest_outcomes(records_from_path(file.path()).unwrap())
        .unwrap();

    assert_eq!(stats.received, 5);
    assert_eq!(stats.ingested, 3);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.occupied_zones, 2);

    let origin = grid.zone_containing(&Position::new(0.0, 0.0)).unwrap();
    assert_eq!(origin.population(), 2);
    assert!((origin.average_attribute("agreeableness").unwrap() - 0.4).abs() < 1e-12);

    // text attributes are carried but never averaged
    assert!(matches!(
        origin.average_attribute("name"),
        Err(GridError::NonNumericAttribute { .. })
    ));
}

#[test]
fn test_ingest_file_with_abort_policy() {
    init_logging();
    let file = agents_file();
    let grid = ZoneGrid::new(GridConfig::default()).unwrap();
    let config = IngestConfig::default().with_policy(RecordPolicy::Abort);
    let mut aggregator = Aggregator::new(&grid, config);

    let err = aggregator
        .ingest_outcomes(records_from_path(file.path()).unwrap())
        .unwrap_err();

    assert!(err.is_record_error());
    assert!(matches!(err, GridError::AtRecord { index: 3, .. }));
    assert_eq!(grid.total_population(), 3);
}

#[test]
fn test_attribute_quirks_keep_the_record() {
    init_logging();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
            {"longitude": 0.5, "latitude": 0.5, "agreeableness": 0.5, "nickname": null},
            {"longitude": 0.6, "latitude": 0.6, "agreeableness": 0.7, "tags": ["x"]},
            {"longitude": 0.7, "latitude": 0.7, "nickname": null}
        ]"#,
    )
    .unwrap();

    let grid = ZoneGrid::new(GridConfig::default()).unwrap();
    let mut aggregator = Aggregator::new(&grid, IngestConfig::default());
    let stats = aggregator
        .ingest_outcomes(records_from_path(file.path()).unwrap())
        .unwrap();
    assert_eq!(stats.ingested, 3);
    assert_eq!(stats.skipped, 0);

    let zone = grid.zone_containing(&Position::new(0.0, 0.0)).unwrap();
    assert_eq!(zone.population(), 3);
    // the record without the attribute surfaces only when the mean is computed
    assert!(matches!(
        zone.average_attribute("agreeableness"),
        Err(GridError::MissingAttribute { inhabitant: 2, .. })
    ));
}

#[test]
fn test_config_file_drives_the_grid() {
    init_logging();
    let config = Config::from_json(
        r#"{
            "grid": {"width_degrees": 10.0, "height_degrees": 5.0},
            "ingest": {"on_invalid_record": "abort"}
        }"#,
    )
    .unwrap();
    assert_eq!(config.ingest.on_invalid_record, RecordPolicy::Abort);

    let grid = ZoneGrid::new(config.grid).unwrap();
    assert_eq!(grid.longitude_bins(), 36);
    assert_eq!(grid.latitude_bins(), 36);
    assert_eq!(grid.len(), 36 * 36);

    let zone = grid.zone_containing(&Position::new(12.0, 7.0)).unwrap();
    assert_eq!((zone.min_longitude(), zone.min_latitude()), (10.0, 5.0));
}

#[test]
fn test_config_rejects_uneven_resolution() {
    init_logging();
    assert!(Config::from_json(r#"{"grid": {"width_degrees": 7.0}}"#).is_err());
    assert!(matches!(
        ZoneGrid::new(GridConfig::default().with_resolution(0.0, 1.0)),
        Err(GridError::InvalidConfig(_))
    ));
}

#[test]
fn test_reports_cover_every_zone() {
    init_logging();
    let file = agents_file();
    let grid = ZoneGrid::new(GridConfig::default().with_resolution(30.0, 30.0)).unwrap();
    let mut aggregator = Aggregator::new(&grid, IngestConfig::default());
    aggregator
        .ingest_outcomes(records_from_path(file.path()).unwrap())
        .unwrap();

    let chart = DensityAttributeChart::new("agreeableness");
    let series = chart.series(&grid).unwrap();
    assert_eq!(series.len(), grid.len());
    assert_eq!(series.xs.len(), series.ys.len());
    assert_eq!(series.points().filter(|(x, _)| *x > 0.0).count(), 1);

    let occupied = summaries(&grid, Some("agreeableness"), false).unwrap();
    assert_eq!(occupied.len(), 1);
    assert_eq!(occupied[0].population, 3);

    let json = grid_to_geojson(&grid, Some("agreeableness"), false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"].as_array().unwrap().len(), 1);
}

#[cfg(feature = "plot")]
#[test]
fn test_render_plot_to_file() {
    use geozone::report::plot::render_svg;

    init_logging();
    let file = agents_file();
    let grid = ZoneGrid::new(GridConfig::default().with_resolution(30.0, 30.0)).unwrap();
    let mut aggregator = Aggregator::new(&grid, IngestConfig::default());
    aggregator
        .ingest_outcomes(records_from_path(file.path()).unwrap())
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agreeableness.svg");
    render_svg(&DensityAttributeChart::new("agreeableness"), &grid, &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("agreeableness"));
}

#[cfg(feature = "toml")]
#[test]
fn test_toml_config() {
    init_logging();
    let config = Config::from_toml(
        r#"
        [grid]
        width_degrees = 2.0
        height_degrees = 2.0

        [ingest]
        on_invalid_record = "skip"
        "#,
    )
    .unwrap();

    let grid = ZoneGrid::new(config.grid).unwrap();
    assert_eq!(grid.len(), 180 * 90);
}
