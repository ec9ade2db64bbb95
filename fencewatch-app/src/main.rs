use fencewatch::ui::controller::{CameraRequest, DashboardController, FIT_PADDING};
use fencewatch::ui::panels;
use fencewatch::MapView;

/// Where the dashboard fetches its runtime configuration from. The
/// browser original resolved `/config` against the page origin; a
/// native client has to pick a bootstrap address.
const DEFAULT_CONFIG_URL: &str = "http://localhost:5000/config";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title("Fencewatch - Geofence Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "fencewatch-app",
        options,
        Box::new(|cc| Box::new(DashboardApp::new(cc))),
    )?;

    Ok(())
}

/// The main application struct
struct DashboardApp {
    controller: DashboardController,
    map: MapView,
}

impl DashboardApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut controller = DashboardController::new();
        controller.start(DEFAULT_CONFIG_URL);

        let map = MapView::new(controller.config.map_center, controller.config.map_zoom);
        log::info!("dashboard started, config from {DEFAULT_CONFIG_URL}");

        Self { controller, map }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();

        // Responses arrive between input events; keep frames coming
        // until every spawned flow has been applied.
        if self.controller.has_pending_flows() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if let Some(camera) = self.controller.take_camera() {
            match camera {
                CameraRequest::View { center, zoom } => self.map.set_view(center, zoom),
                CameraRequest::Fit(bounds) => self.map.fit_bounds(&bounds, FIT_PADDING),
            }
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.label(egui::RichText::new("Fencewatch").strong());
                ui.separator();

                if ui.button("Center Map").clicked() {
                    self.controller.fit_view();
                }
                if ui.button("Clear Markers").clicked() {
                    self.controller.clear_markers();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let viewport = &self.map.viewport;
                    ui.label(format!(
                        "Center: {:.4}, {:.4} | Zoom: {:.0}",
                        viewport.center.lat, viewport.center.lon, viewport.zoom
                    ));
                });
            });
        });

        egui::SidePanel::left("zones_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::zone_panel(ui, &self.controller);
                });
            });

        egui::SidePanel::right("control_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::submission_panel(ui, &mut self.controller);
                    ui.separator();
                    panels::status_panel(ui, &mut self.controller);
                    ui.separator();
                    panels::event_panel(ui, &self.controller);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.map
                .show(ui, &self.controller.zones, &self.controller.markers);
        });
    }
}
