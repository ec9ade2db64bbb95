//! Interactive map widget: tiles, zone overlays, vehicle markers
//!
//! Immediate-mode egui widget. Zone circles are drawn with their metric
//! radius converted through the viewport's ground resolution, so they
//! stay geographically accurate across zoom levels. Clicking a marker or
//! zone opens a small popup; clicking empty map closes it.

use crate::api::types::Zone;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::map::tiles::{OpenStreetMapSource, TileCache, TileCoord, TileLoader, TileSource};
use crate::map::viewport::{Point, Viewport};
use crate::prelude::{HashMap, HashSet};
use crate::ui::controller::VehicleMarker;
use egui::{Align2, Color32, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};
use std::sync::mpsc::{channel, Receiver};

/// Zone overlay color (#2563eb with a translucent fill).
const ZONE_COLOR: Color32 = Color32::from_rgb(37, 99, 235);
const ZONE_FILL_ALPHA: u8 = 38;
const ZONE_STROKE_WIDTH: f32 = 2.0;
const ZONE_DOT_RADIUS: f32 = 6.0;

/// Vehicle marker color (#ef4444).
const VEHICLE_COLOR: Color32 = Color32::from_rgb(239, 68, 68);
const VEHICLE_RADIUS: f32 = 12.0;

const POPUP_PADDING: f32 = 8.0;
const POPUP_MAX_WIDTH: f32 = 300.0;

/// A popup pinned to a geographic anchor.
#[derive(Debug, Clone)]
struct MapPopup {
    anchor: LatLng,
    text: String,
}

/// The interactive map widget.
pub struct MapView {
    pub viewport: Viewport,
    source: Box<dyn TileSource>,
    cache: TileCache,
    loader: TileLoader,
    tile_rx: Receiver<(TileCoord, Vec<u8>)>,
    textures: HashMap<TileCoord, egui::TextureHandle>,
    in_flight: HashSet<TileCoord>,
    popup: Option<MapPopup>,
    last_size: Vec2,
}

impl MapView {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        let (tx, tile_rx) = channel();
        Self {
            viewport: Viewport::new(center, zoom),
            source: Box::new(OpenStreetMapSource::new()),
            cache: TileCache::default(),
            loader: TileLoader::new(tx),
            tile_rx,
            textures: HashMap::default(),
            in_flight: HashSet::default(),
            popup: None,
            last_size: Vec2::new(800.0, 600.0),
        }
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_view(center, zoom);
    }

    /// Fits the given bounds into the most recently rendered size.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) {
        self.viewport.fit_bounds(
            bounds,
            self.last_size.x as f64,
            self.last_size.y as f64,
            padding,
        );
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Renders the map and handles pan/zoom/click interaction.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        zones: &[Zone],
        markers: &HashMap<String, VehicleMarker>,
    ) -> Response {
        let desired_size = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());
        self.last_size = rect.size();

        self.handle_interaction(ui, &response);
        self.receive_tiles(ui);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(221, 221, 221));

        self.draw_tiles(ui, &painter, rect);
        self.draw_zones(&painter, rect, zones);
        self.draw_markers(&painter, rect, markers);

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.popup = self.hit_test(rect, pos, zones, markers);
            }
        }
        self.draw_popup(ui, &painter, rect);

        painter.text(
            rect.right_bottom() - Vec2::new(4.0, 2.0),
            Align2::RIGHT_BOTTOM,
            self.source.attribution(),
            FontId::proportional(10.0),
            Color32::from_gray(90),
        );

        if !self.in_flight.is_empty() {
            ui.ctx().request_repaint();
        }

        response
    }

    fn handle_interaction(&mut self, ui: &mut Ui, response: &Response) {
        if response.hovered() {
            let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_delta.abs() > 0.1 {
                // Whole-level zoom steps keep tile selection exact.
                let step = if scroll_delta > 0.0 { 1.0 } else { -1.0 };
                let new_zoom = (self.viewport.zoom + step).round();
                self.viewport.set_zoom(new_zoom);
            }
        }

        if response.dragged() {
            let drag_delta = response.drag_delta();
            if drag_delta.length_sq() > 0.5 {
                self.viewport
                    .pan_by(-drag_delta.x as f64, -drag_delta.y as f64);
            }
        }
    }

    /// Drains completed downloads, decoding each into a texture.
    fn receive_tiles(&mut self, ui: &Ui) {
        while let Ok((coord, bytes)) = self.tile_rx.try_recv() {
            self.in_flight.remove(&coord);
            self.ingest_tile(ui.ctx(), coord, bytes);
        }
    }

    /// Decodes downloaded bytes into a texture. Undecodable payloads
    /// are dropped without caching so the tile gets re-requested when
    /// it next scrolls into view.
    fn ingest_tile(&mut self, ctx: &egui::Context, coord: TileCoord, bytes: Vec<u8>) {
        let Some(color_image) = decode_tile(&bytes) else {
            log::warn!("discarding undecodable tile {coord:?}");
            return;
        };
        let texture = ctx.load_texture(
            format!("tile_{}_{}_{}", coord.z, coord.x, coord.y),
            color_image,
            egui::TextureOptions::default(),
        );
        self.textures.insert(coord, texture);
        self.cache.insert(coord, bytes);
    }

    fn draw_tiles(&mut self, ui: &Ui, painter: &egui::Painter, rect: Rect) {
        let zoom = self.viewport.zoom.round().max(0.0) as u8;
        let center_px = self.viewport.project(&self.viewport.center);
        let max_index = 2_u32.pow(zoom as u32) as i64;

        let first_x = ((center_px.x - rect.width() as f64 / 2.0) / 256.0).floor() as i64;
        let last_x = ((center_px.x + rect.width() as f64 / 2.0) / 256.0).floor() as i64;
        let first_y = ((center_px.y - rect.height() as f64 / 2.0) / 256.0).floor() as i64;
        let last_y = ((center_px.y + rect.height() as f64 / 2.0) / 256.0).floor() as i64;

        for ty in first_y.max(0)..=last_y.min(max_index - 1) {
            for tx in first_x.max(0)..=last_x.min(max_index - 1) {
                let coord = TileCoord::new(tx as u32, ty as u32, zoom);
                let origin = Point::new(tx as f64 * 256.0, ty as f64 * 256.0);
                let screen_min = Pos2::new(
                    rect.center().x + (origin.x - center_px.x) as f32,
                    rect.center().y + (origin.y - center_px.y) as f32,
                );
                let tile_rect = Rect::from_min_size(screen_min, Vec2::splat(256.0));

                if let Some(texture) = self.textures.get(&coord) {
                    painter.image(
                        texture.id(),
                        tile_rect,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                } else if let Some(bytes) = self.cache.get(&coord) {
                    // Cached bytes whose texture was dropped; decode again.
                    if let Some(color_image) = decode_tile(&bytes) {
                        let texture = ui.ctx().load_texture(
                            format!("tile_{}_{}_{}", coord.z, coord.x, coord.y),
                            color_image,
                            egui::TextureOptions::default(),
                        );
                        painter.image(
                            texture.id(),
                            tile_rect,
                            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                            Color32::WHITE,
                        );
                        self.textures.insert(coord, texture);
                    }
                } else if !self.in_flight.contains(&coord) && coord.is_valid() {
                    self.loader.start_download(self.source.as_ref(), coord);
                    self.in_flight.insert(coord);
                }
            }
        }
    }

    fn screen_pos(&self, rect: Rect, lat_lng: &LatLng) -> Pos2 {
        let offset = self.viewport.lat_lng_to_screen_offset(lat_lng);
        Pos2::new(
            rect.center().x + offset.x as f32,
            rect.center().y + offset.y as f32,
        )
    }

    fn draw_zones(&self, painter: &egui::Painter, rect: Rect, zones: &[Zone]) {
        let fill = Color32::from_rgba_unmultiplied(
            ZONE_COLOR.r(),
            ZONE_COLOR.g(),
            ZONE_COLOR.b(),
            ZONE_FILL_ALPHA,
        );

        for zone in zones {
            let center = self.screen_pos(rect, &zone.center);
            let radius_px =
                (zone.radius_meters / self.viewport.meters_per_pixel(zone.center.lat)) as f32;

            painter.circle(
                center,
                radius_px,
                fill,
                Stroke::new(ZONE_STROKE_WIDTH, ZONE_COLOR),
            );
            painter.circle(
                center,
                ZONE_DOT_RADIUS,
                ZONE_COLOR,
                Stroke::new(2.0, Color32::WHITE),
            );
        }
    }

    fn draw_markers(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        markers: &HashMap<String, VehicleMarker>,
    ) {
        for marker in markers.values() {
            let center = self.screen_pos(rect, &marker.position);
            painter.circle(
                center,
                VEHICLE_RADIUS,
                VEHICLE_COLOR,
                Stroke::new(3.0, Color32::WHITE),
            );
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "V",
                FontId::proportional(10.0),
                Color32::WHITE,
            );
        }
    }

    /// Finds what was clicked: markers win over zone dots, zone dots
    /// over zone circles; empty map closes any open popup.
    fn hit_test(
        &self,
        rect: Rect,
        pos: Pos2,
        zones: &[Zone],
        markers: &HashMap<String, VehicleMarker>,
    ) -> Option<MapPopup> {
        for (vehicle_id, marker) in markers {
            let center = self.screen_pos(rect, &marker.position);
            if center.distance(pos) <= VEHICLE_RADIUS {
                return Some(MapPopup {
                    anchor: marker.position,
                    text: marker.popup_text(vehicle_id),
                });
            }
        }

        for zone in zones {
            let center = self.screen_pos(rect, &zone.center);
            if center.distance(pos) <= ZONE_DOT_RADIUS + 2.0 {
                return Some(MapPopup {
                    anchor: zone.center,
                    text: zone.name.clone(),
                });
            }
        }

        for zone in zones {
            let center = self.screen_pos(rect, &zone.center);
            let radius_px =
                (zone.radius_meters / self.viewport.meters_per_pixel(zone.center.lat)) as f32;
            if center.distance(pos) <= radius_px {
                return Some(MapPopup {
                    anchor: zone.center,
                    text: format!("{}\nRadius: {:.0}m", zone.name, zone.radius_meters),
                });
            }
        }

        None
    }

    fn draw_popup(&mut self, ui: &Ui, painter: &egui::Painter, rect: Rect) {
        let Some(popup) = &self.popup else {
            return;
        };

        let anchor = self.screen_pos(rect, &popup.anchor);
        let font_id = FontId::proportional(12.0);
        let text_size = ui
            .fonts(|f| f.layout_no_wrap(popup.text.clone(), font_id.clone(), Color32::BLACK))
            .size();

        let size = Vec2::new(
            (text_size.x + POPUP_PADDING * 2.0).min(POPUP_MAX_WIDTH),
            text_size.y + POPUP_PADDING * 2.0,
        );
        let popup_rect = Rect::from_min_size(
            anchor - Vec2::new(size.x / 2.0, size.y + VEHICLE_RADIUS + 4.0),
            size,
        );

        painter.rect_filled(popup_rect, 4.0, Color32::WHITE);
        painter.rect_stroke(popup_rect, 4.0, Stroke::new(1.0, Color32::GRAY));
        painter.text(
            popup_rect.min + Vec2::splat(POPUP_PADDING),
            Align2::LEFT_TOP,
            &popup.text,
            font_id,
            Color32::BLACK,
        );
    }
}

fn decode_tile(bytes: &[u8]) -> Option<egui::ColorImage> {
    let img = image::load_from_memory(bytes).ok()?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        &rgba.into_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();
        bytes
    }

    #[test]
    fn test_undecodable_tile_is_not_cached() {
        let ctx = egui::Context::default();
        let mut view = MapView::new(LatLng::new(0.0, 0.0), 3.0);
        let coord = TileCoord::new(1, 1, 3);

        view.ingest_tile(&ctx, coord, vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(!view.cache.contains(&coord));
        assert!(view.textures.is_empty());

        view.ingest_tile(&ctx, coord, png_bytes());
        assert!(view.cache.contains(&coord));
        assert!(view.textures.contains_key(&coord));
    }
}
