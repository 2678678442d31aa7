//! Scatter-plot rendering of a chart's series to SVG.

use super::{ChartSpec, Series, SeriesExtractor};
use crate::error::{GridError, Result};
use crate::grid::ZoneGrid;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// Output size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1024, 768);

/// Render `extractor`'s series over `grid` into an SVG file.
pub fn render_svg<E, P>(extractor: &E, grid: &ZoneGrid, path: P) -> Result<()>
where
    E: SeriesExtractor + ?Sized,
    P: AsRef<Path>,
{
    let series = extractor.series(grid)?;
    let root = SVGBackend::new(path.as_ref(), DEFAULT_SIZE).into_drawing_area();
    draw(&root, extractor.spec(), &series)?;
    log::info!(
        "Rendered {} points to {}",
        series.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Render `extractor`'s series over `grid` into an SVG document in memory.
pub fn render_svg_string<E>(extractor: &E, grid: &ZoneGrid) -> Result<String>
where
    E: SeriesExtractor + ?Sized,
{
    let series = extractor.series(grid)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, DEFAULT_SIZE).into_drawing_area();
        draw(&root, extractor.spec(), &series)?;
    }
    Ok(svg)
}

fn draw<DB>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec, series: &Series) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(padded_range(&series.xs), padded_range(&series.ys))
        .map_err(render_error)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str());
    if !spec.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(render_error)?;

    chart
        .draw_series(
            series
                .points()
                .map(|point| Circle::new(point, 2, BLUE.filled())),
        )
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

fn render_error(err: impl std::fmt::Display) -> GridError {
    GridError::Render(err.to_string())
}

/// Data range widened by 5% on each side, never empty.
fn padded_range(values: &[f64]) -> Range<f64> {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { 0.5 };
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::report::DensityAttributeChart;
    use geozone_types::position::Position;
    use geozone_types::record::Record;

    fn populated_grid() -> ZoneGrid {
        let grid = ZoneGrid::new(GridConfig::default().with_resolution(30.0, 30.0)).unwrap();
        for (lon, lat, score) in [(1.0, 1.0, 0.2), (2.0, 2.0, 0.4), (100.0, -45.0, 0.9)] {
            grid.add_inhabitant(
                Record::new(Position::new(lon, lat)).with_attribute("agreeableness", score),
            )
            .unwrap();
        }
        grid
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(&[]), 0.0..1.0);
        assert_eq!(padded_range(&[2.0, 2.0]), 1.5..2.5);

        let r = padded_range(&[0.0, 10.0, f64::NAN]);
        assert_eq!(r, -0.5..10.5);
    }

    #[test]
    fn test_render_svg_string() {
        let grid = populated_grid();
        let chart = DensityAttributeChart::new("agreeableness");
        let svg = render_svg_string(&chart, &grid).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Distribution"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_render_svg_file() {
        let grid = populated_grid();
        let chart = DensityAttributeChart::new("agreeableness");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("density.svg");

        render_svg(&chart, &grid, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<svg"));
    }

    #[test]
    fn test_render_propagates_statistic_errors() {
        let grid = populated_grid();
        let chart = DensityAttributeChart::new("missing");
        assert!(matches!(
            render_svg_string(&chart, &grid),
            Err(GridError::MissingAttribute { .. })
        ));
    }
}
