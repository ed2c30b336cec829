//! Distances, interpolation and bounding boxes over lon/lat points.

use geo::Point;

/// Mean Earth radius used by the haversine distance, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two lon/lat points in meters.
pub fn distance(a: Point, b: Point) -> f64 {
    let (lon1, lat1) = (a.x().to_radians(), a.y().to_radians());
    let (lon2, lat2) = (b.x().to_radians(), b.y().to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// `a + (b - a) * t`. Not clamped: `t` outside 0..=1 extrapolates.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x(), b.x(), t), lerp(a.y(), b.y(), t))
}

/// Axis-aligned lon/lat box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// `None` for an empty input.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for p in points {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: Point) {
        self.min = Point::new(self.min.x().min(p.x()), self.min.y().min(p.y()));
        self.max = Point::new(self.max.x().max(p.x()), self.max.y().max(p.y()));
    }

    pub fn center(&self) -> Point {
        lerp_point(self.min, self.max, 0.5)
    }

    /// `[[min_lon, min_lat], [max_lon, max_lat]]`
    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [[self.min.x(), self.min.y()], [self.max.x(), self.max.y()]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_zero_and_symmetric() {
        let b1 = Point::new(27.18158, 38.46393);
        let w1 = Point::new(27.0856, 38.5102);

        assert_eq!(distance(b1, b1), 0.0);
        assert_relative_eq!(distance(b1, w1), distance(w1, b1), epsilon = 1e-9);
        assert!(distance(b1, w1) > 0.0);
    }

    #[test]
    fn test_distance_along_equator() {
        // On the equator a longitude step is a plain arc of the great circle
        let d = distance(Point::new(0.0, 0.0), Point::new(0.01, 0.0));
        let expected = EARTH_RADIUS_M * 0.01_f64.to_radians();

        assert_relative_eq!(d, expected, epsilon = 1e-6);
        assert_relative_eq!(d, 1111.95, epsilon = 0.01);
    }

    #[test]
    fn test_distance_nyc_to_la() {
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);

        let dist = distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Point::new(27.18158, 38.46393);
        let b = Point::new(27.0856, 38.5102);

        assert_eq!(lerp_point(a, b, 0.0), a);
        let end = lerp_point(a, b, 1.0);
        assert_relative_eq!(end.x(), b.x(), epsilon = 1e-12);
        assert_relative_eq!(end.y(), b.y(), epsilon = 1e-12);

        let mid = lerp_point(a, b, 0.5);
        assert_relative_eq!(mid.x(), (a.x() + b.x()) / 2.0, epsilon = 1e-12);
        assert_relative_eq!(mid.y(), (a.y() + b.y()) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lerp_extrapolates() {
        assert_eq!(lerp(0.0, 10.0, 1.5), 15.0);
        assert_eq!(lerp(0.0, 10.0, -0.5), -5.0);
    }

    #[test]
    fn test_bounds() {
        assert!(Bounds::from_points(Vec::new()).is_none());

        let bounds = Bounds::from_points([
            Point::new(27.18, 38.46),
            Point::new(27.08, 38.51),
            Point::new(27.14, 38.42),
        ])
        .unwrap();

        assert_eq!(bounds.to_array(), [[27.08, 38.42], [27.18, 38.51]]);
        assert_relative_eq!(bounds.center().x(), 27.13, epsilon = 1e-9);
    }
}
