use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, matching the geofencing service's
/// haversine implementation.
const EARTH_RADIUS: f64 = 6_371_000.0;

/// A geographical coordinate. Field names mirror the wire format of the
/// geofencing API (`lat`/`lon`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the coordinate lies in the valid lat/lon ranges.
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lon >= -180.0 && self.lon <= 180.0
    }

    /// Great-circle distance in meters using the haversine formula.
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// An axis-aligned bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Builds the tightest bounds containing every point, or `None` for
    /// an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for point in iter {
            bounds.extend(&point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lon >= self.south_west.lon
            && point.lon <= self.north_east.lon
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lon = self.south_west.lon.min(point.lon);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lon = self.north_east.lon.max(point.lon);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lon + self.north_east.lon) / 2.0,
        )
    }

    /// Gets the lat/lon span of the bounds
    pub fn span(&self) -> (f64, f64) {
        (
            self.north_east.lat - self.south_west.lat,
            self.north_east.lon - self.south_west.lon,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(37.7749, -122.4194);
        assert_eq!(coord.lat, 37.7749);
        assert_eq!(coord.lon, -122.4194);
        assert!(coord.is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
    }

    #[test]
    fn test_haversine_distance() {
        let downtown = LatLng::new(37.7749, -122.4194);
        let airport = LatLng::new(37.6213, -122.3790);

        // SFO is roughly 17.5 km from downtown San Francisco
        let distance = downtown.distance_to(&airport);
        assert!((distance - 17_500.0).abs() < 1_000.0);

        assert_eq!(downtown.distance_to(&downtown), 0.0);
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = LatLngBounds::from_points(vec![
            LatLng::new(37.7749, -122.4194),
            LatLng::new(37.6213, -122.3790),
            LatLng::new(37.7786, -122.3893),
        ])
        .unwrap();

        assert_eq!(bounds.south_west, LatLng::new(37.6213, -122.4194));
        assert_eq!(bounds.north_east, LatLng::new(37.7786, -122.3790));
        assert!(bounds.contains(&LatLng::new(37.7, -122.4)));
        assert!(!bounds.contains(&LatLng::new(38.0, -122.4)));

        assert!(LatLngBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_center() {
        let bounds = LatLngBounds::new(LatLng::new(10.0, 20.0), LatLng::new(30.0, 40.0));
        assert_eq!(bounds.center(), LatLng::new(20.0, 30.0));
        assert_eq!(bounds.span(), (20.0, 20.0));
    }
}
