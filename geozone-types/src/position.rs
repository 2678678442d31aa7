use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
///
/// This wraps `geo::Point` (x = longitude, y = latitude) and adds the radian
/// conversions the zone geometry is derived from. No range validation happens
/// here: the grid decides what is inside its domain.
///
/// # Examples
///
/// ```
/// use geozone_types::position::Position;
///
/// let p = Position::new(180.0, -90.0);
/// assert!((p.longitude_radians() - std::f64::consts::PI).abs() < 1e-12);
/// assert!((p.latitude_radians() + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LonLat", into = "LonLat")]
pub struct Position {
    inner: geo::Point<f64>,
}

/// Wire shape of a position: `{"longitude": .., "latitude": ..}`.
#[derive(Serialize, Deserialize)]
struct LonLat {
    longitude: f64,
    latitude: f64,
}

impl From<LonLat> for Position {
    fn from(value: LonLat) -> Self {
        Self::new(value.longitude, value.latitude)
    }
}

impl From<Position> for LonLat {
    fn from(value: Position) -> Self {
        Self {
            longitude: value.longitude_degrees(),
            latitude: value.latitude_degrees(),
        }
    }
}

impl Position {
    /// Create a position from longitude and latitude in degrees.
    #[inline]
    pub fn new(longitude_degrees: f64, latitude_degrees: f64) -> Self {
        Self {
            inner: geo::Point::new(longitude_degrees, latitude_degrees),
        }
    }

    #[inline]
    pub fn longitude_degrees(&self) -> f64 {
        self.inner.x()
    }

    #[inline]
    pub fn latitude_degrees(&self) -> f64 {
        self.inner.y()
    }

    #[inline]
    pub fn longitude_radians(&self) -> f64 {
        self.longitude_degrees().to_radians()
    }

    #[inline]
    pub fn latitude_radians(&self) -> f64 {
        self.latitude_degrees().to_radians()
    }

    /// Access the inner `geo::Point`.
    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    /// Convert into the inner `geo::Point`.
    #[inline]
    pub fn into_inner(self) -> geo::Point<f64> {
        self.inner
    }

    /// Great-circle distance to another position in kilometers.
    ///
    /// # Examples
    ///
    /// ```
    /// use geozone_types::position::Position;
    ///
    /// let a = Position::new(0.0, 0.0);
    /// let b = Position::new(1.0, 0.0);
    /// let km = a.haversine_distance_km(&b);
    /// assert!((km - 111.2).abs() < 0.5);
    /// ```
    pub fn haversine_distance_km(&self, other: &Position) -> f64 {
        use geo::Distance;
        geo::Haversine.distance(self.inner, other.inner) / 1000.0
    }
}

impl From<geo::Point<f64>> for Position {
    fn from(point: geo::Point<f64>) -> Self {
        Self { inner: point }
    }
}

impl From<Position> for geo::Point<f64> {
    fn from(position: Position) -> Self {
        position.inner
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})",
            self.longitude_degrees(),
            self.latitude_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_degree_accessors() {
        let p = Position::new(-74.0060, 40.7128);
        assert_eq!(p.longitude_degrees(), -74.0060);
        assert_eq!(p.latitude_degrees(), 40.7128);
    }

    #[test]
    fn test_radians_use_their_own_axis() {
        let p = Position::new(90.0, 45.0);
        assert!((p.longitude_radians() - FRAC_PI_2).abs() < 1e-12);
        assert!((p.latitude_radians() - FRAC_PI_4).abs() < 1e-12);

        let q = Position::new(-180.0, 0.0);
        assert!((q.longitude_radians() + PI).abs() < 1e-12);
        assert_eq!(q.latitude_radians(), 0.0);
    }

    #[test]
    fn test_geo_point_conversion() {
        let point = geo::Point::new(10.0, 20.0);
        let p = Position::from(point);
        assert_eq!(p.inner(), &point);
        assert_eq!(geo::Point::from(p), point);
    }

    #[test]
    fn test_serde_field_names() {
        let p = Position::new(2.5, -3.25);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"longitude":2.5,"latitude":-3.25}"#);

        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = Position::new(-74.0060, 40.7128);
        let b = Position::new(-118.2437, 34.0522);
        let ab = a.haversine_distance_km(&b);
        let ba = b.haversine_distance_km(&a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 3_900.0 && ab < 4_000.0);
    }
}
