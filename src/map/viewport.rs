//! Map viewport: center, zoom, and the slippy-map projection
//!
//! All projection math uses the standard Web Mercator pixel space where
//! the world is `256 * 2^zoom` pixels wide. Screen positions are derived
//! per-frame from the widget rect, so the viewport itself stays free of
//! any UI types.

use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 19.0;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LATITUDE: f64 = 85.0511287798;

const TILE_SIZE: f64 = 256.0;
const EARTH_CIRCUMFERENCE: f64 = 40_075_016.686;

/// A point in projected (world pixel) or screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The current view of the map: center and zoom, with clamped limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), center.lon);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.set_center(center);
        self.set_zoom(zoom);
    }

    /// World width in pixels at the current zoom.
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2_f64.powf(self.zoom)
    }

    /// Projects a coordinate to world pixel space at the current zoom.
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let world = self.world_size();
        let lat = lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let x = (lat_lng.lon + 180.0) / 360.0 * world;
        let y = (1.0 - lat.tan().asinh() / PI) / 2.0 * world;
        Point::new(x, y)
    }

    /// Inverse of [`project`](Self::project).
    pub fn unproject(&self, point: Point) -> LatLng {
        let world = self.world_size();
        let lon = point.x / world * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * point.y / world)).sinh().atan().to_degrees();
        LatLng::new(lat, lon)
    }

    /// Converts a coordinate into an offset from the screen center.
    pub fn lat_lng_to_screen_offset(&self, lat_lng: &LatLng) -> Point {
        let world = self.project(lat_lng);
        let origin = self.project(&self.center);
        Point::new(world.x - origin.x, world.y - origin.y)
    }

    /// Converts an offset from the screen center back to a coordinate.
    pub fn screen_offset_to_lat_lng(&self, offset: Point) -> LatLng {
        let origin = self.project(&self.center);
        self.unproject(Point::new(origin.x + offset.x, origin.y + offset.y))
    }

    /// Ground resolution in meters per pixel at the given latitude.
    pub fn meters_per_pixel(&self, lat: f64) -> f64 {
        EARTH_CIRCUMFERENCE * lat.to_radians().cos() / self.world_size()
    }

    /// Pans the viewport by a screen-pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let origin = self.project(&self.center);
        let center = self.unproject(Point::new(origin.x + dx, origin.y + dy));
        self.set_center(center);
    }

    /// Centers and zooms so `bounds` fits inside `width`x`height` pixels
    /// with `padding` pixels on each side. The resulting zoom is snapped
    /// down to a whole level so tile selection stays exact.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, width: f64, height: f64, padding: f64) {
        let usable_w = (width - 2.0 * padding).max(1.0);
        let usable_h = (height - 2.0 * padding).max(1.0);

        // Projected span at zoom 0 (world is one 256px tile). Built
        // directly so the zoom limits don't clamp the reference level.
        let base = Viewport {
            center: bounds.center(),
            zoom: 0.0,
            min_zoom: 0.0,
            max_zoom: MAX_ZOOM,
        };
        let sw = base.project(&bounds.south_west);
        let ne = base.project(&bounds.north_east);
        let span_x = (ne.x - sw.x).abs().max(1e-9);
        let span_y = (ne.y - sw.y).abs().max(1e-9);

        let zoom_x = (usable_w / span_x).log2();
        let zoom_y = (usable_h / span_y).log2();
        let zoom = zoom_x.min(zoom_y).floor();

        self.set_view(bounds.center(), zoom.clamp(self.min_zoom, self.max_zoom));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_unproject_round_trip() {
        let viewport = Viewport::new(LatLng::new(37.7749, -122.4194), 12.0);
        let point = viewport.project(&viewport.center);
        let back = viewport.unproject(point);

        assert!((back.lat - viewport.center.lat).abs() < 1e-9);
        assert!((back.lon - viewport.center.lon).abs() < 1e-9);
    }

    #[test]
    fn test_center_offset_is_zero() {
        let viewport = Viewport::new(LatLng::new(51.5074, -0.1278), 10.0);
        let offset = viewport.lat_lng_to_screen_offset(&viewport.center);
        assert!(offset.x.abs() < 1e-9);
        assert!(offset.y.abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::new(LatLng::default(), 30.0);
        assert_eq!(viewport.zoom, MAX_ZOOM);
        viewport.set_zoom(-3.0);
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_meters_per_pixel_at_equator() {
        let viewport = Viewport::new(LatLng::default(), 1.0);
        // 40075 km over 512 pixels
        let expected = 40_075_016.686 / 512.0;
        assert!((viewport.meters_per_pixel(0.0) - expected).abs() < 1.0);
    }

    #[test]
    fn test_pan_by_moves_center() {
        let mut viewport = Viewport::new(LatLng::new(37.7749, -122.4194), 12.0);
        let before = viewport.center;
        viewport.pan_by(100.0, 0.0);
        assert!(viewport.center.lon > before.lon);
        assert!((viewport.center.lat - before.lat).abs() < 1e-6);
    }

    #[test]
    fn test_fit_bounds_contains_all_points() {
        let bounds = LatLngBounds::from_points(vec![
            LatLng::new(37.6213, -122.3790),
            LatLng::new(37.7786, -122.4194),
        ])
        .unwrap();

        let mut viewport = Viewport::new(LatLng::default(), 5.0);
        viewport.fit_bounds(&bounds, 800.0, 600.0, 50.0);

        assert_eq!(viewport.center, bounds.center());
        assert_eq!(viewport.zoom, viewport.zoom.floor());

        // Both corners must land inside the padded screen area.
        for corner in [bounds.south_west, bounds.north_east] {
            let offset = viewport.lat_lng_to_screen_offset(&corner);
            assert!(offset.x.abs() <= 400.0 - 50.0 + 1.0);
            assert!(offset.y.abs() <= 300.0 - 50.0 + 1.0);
        }
    }
}
