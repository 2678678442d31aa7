//! Validation for positions against a grid domain.

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use geozone_types::position::Position;

/// Checks a position lies in the half-open grid domain.
///
/// The domain is `[min_longitude, max_longitude) x [min_latitude, max_latitude)`,
/// so the upper bounds themselves (180° / 90° by default) are rejected rather
/// than wrapped or clamped. Non-finite coordinates are rejected too.
///
/// # Examples
///
/// ```
/// use geozone::compute::validation::validate_in_domain;
/// use geozone::{GridConfig, Position};
///
/// let config = GridConfig::default();
/// assert!(validate_in_domain(&Position::new(-180.0, -90.0), &config).is_ok());
/// assert!(validate_in_domain(&Position::new(179.999, 89.999), &config).is_ok());
///
/// assert!(validate_in_domain(&Position::new(180.0, 0.0), &config).is_err());
/// assert!(validate_in_domain(&Position::new(0.0, 90.0), &config).is_err());
/// ```
pub fn validate_in_domain(position: &Position, config: &GridConfig) -> Result<()> {
    let (lon, lat) = (position.longitude_degrees(), position.latitude_degrees());

    let inside = lon.is_finite()
        && lat.is_finite()
        && (config.min_longitude..config.max_longitude).contains(&lon)
        && (config.min_latitude..config.max_latitude).contains(&lat);

    if inside {
        Ok(())
    } else {
        Err(GridError::OutOfDomain {
            longitude: lon,
            latitude: lat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_positions() {
        let config = GridConfig::default();
        for (lon, lat) in [
            (-74.0060, 40.7128),
            (-0.1278, 51.5074),
            (139.6917, 35.6895),
            (-180.0, -90.0),
            (0.0, 0.0),
        ] {
            assert!(validate_in_domain(&Position::new(lon, lat), &config).is_ok());
        }
    }

    #[test]
    fn test_upper_bounds_excluded() {
        let config = GridConfig::default();
        assert!(matches!(
            validate_in_domain(&Position::new(180.0, 0.0), &config),
            Err(GridError::OutOfDomain { .. })
        ));
        assert!(matches!(
            validate_in_domain(&Position::new(0.0, 90.0), &config),
            Err(GridError::OutOfDomain { .. })
        ));
        assert!(validate_in_domain(&Position::new(180.0, 90.0), &config).is_err());
    }

    #[test]
    fn test_out_of_range_and_non_finite() {
        let config = GridConfig::default();
        assert!(validate_in_domain(&Position::new(-180.0001, 0.0), &config).is_err());
        assert!(validate_in_domain(&Position::new(0.0, -95.0), &config).is_err());
        assert!(validate_in_domain(&Position::new(f64::NAN, 0.0), &config).is_err());
        assert!(validate_in_domain(&Position::new(0.0, f64::INFINITY), &config).is_err());
    }

    #[test]
    fn test_restricted_domain() {
        let europe = GridConfig::default()
            .with_longitude_range(-10.0, 40.0)
            .with_latitude_range(35.0, 70.0);
        assert!(validate_in_domain(&Position::new(2.35, 48.85), &europe).is_ok());
        assert!(validate_in_domain(&Position::new(-74.0, 40.7), &europe).is_err());
    }
}
