//! Side-panel rendering: zone list, forms, status display, event log

use crate::api::types::ZoneEventKind;
use crate::ui::controller::DashboardController;
use crate::ui::forms::{MessageKind, StatusMessage};
use egui::{Color32, RichText, Ui};

const SUCCESS_COLOR: Color32 = Color32::from_rgb(22, 163, 74);
const WARNING_COLOR: Color32 = Color32::from_rgb(234, 88, 12);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 38, 38);
const INFO_COLOR: Color32 = Color32::from_rgb(37, 99, 235);

/// Zone list: one block per zone, wholesale re-render every frame.
pub fn zone_panel(ui: &mut Ui, controller: &DashboardController) {
    ui.heading("Zones");
    ui.separator();

    if let Some(error) = &controller.zones_error {
        ui.colored_label(ERROR_COLOR, error);
        return;
    }
    if !controller.zones_loaded {
        ui.label("Loading zones…");
        return;
    }
    if controller.zones.is_empty() {
        ui.label("No zones configured");
        return;
    }

    for zone in &controller.zones {
        ui.label(RichText::new(&zone.name).strong());
        ui.label(format!("ID: {}", zone.id));
        ui.label(format!(
            "Center: {:.4}, {:.4}",
            zone.center.lat, zone.center.lon
        ));
        ui.label(format!("Radius: {:.0}m", zone.radius_meters));
        ui.separator();
    }
}

/// Location submission form.
pub fn submission_panel(ui: &mut Ui, controller: &mut DashboardController) {
    ui.heading("Submit Location");
    ui.separator();

    egui::Grid::new("location_form").num_columns(2).show(ui, |ui| {
        ui.label("Vehicle ID");
        ui.text_edit_singleline(&mut controller.location_form.vehicle_id);
        ui.end_row();

        ui.label("Latitude");
        ui.text_edit_singleline(&mut controller.location_form.latitude);
        ui.end_row();

        ui.label("Longitude");
        ui.text_edit_singleline(&mut controller.location_form.longitude);
        ui.end_row();
    });

    if ui.button("Submit").clicked() {
        controller.submit_location();
    }
    message_label(ui, &mut controller.location_form.result);
}

/// Vehicle status lookup form and result display.
pub fn status_panel(ui: &mut Ui, controller: &mut DashboardController) {
    ui.heading("Vehicle Status");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Vehicle ID");
        ui.text_edit_singleline(&mut controller.status_form.vehicle_id);
    });
    if ui.button("Look Up").clicked() {
        controller.lookup_status();
    }

    if let Some(status) = &controller.status_form.status {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("Vehicle: {}", status.vehicle_id)).strong());
        let zone_name = status.zone_name.as_deref().unwrap_or("No Zone");
        ui.label(format!("Current Zone: {zone_name}"));
        ui.label(format!("Location Updates: {}", status.location_count));
    }
    message_label(ui, &mut controller.status_form.result);
}

/// Event log: newest first, capped upstream.
pub fn event_panel(ui: &mut Ui, controller: &DashboardController) {
    ui.heading("Zone Events");
    ui.separator();

    if controller.event_log.is_empty() {
        ui.label("No events yet");
        return;
    }

    for entry in controller.event_log.entries() {
        let (icon, color) = match entry.kind {
            ZoneEventKind::Enter => ("→", SUCCESS_COLOR),
            ZoneEventKind::Exit => ("←", WARNING_COLOR),
        };
        ui.label(
            RichText::new(format!(
                "{icon} Vehicle {} {} Zone",
                entry.vehicle_id,
                entry.kind.label()
            ))
            .color(color)
            .strong(),
        );
        ui.label(format!("Zone: {}", entry.zone_label()));
        ui.label(
            RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                .small()
                .color(Color32::from_gray(120)),
        );
        ui.separator();
    }
}

/// Shows a timed inline message, dropping it once expired.
fn message_label(ui: &mut Ui, slot: &mut Option<StatusMessage>) {
    if slot.as_ref().is_some_and(|m| !m.is_visible()) {
        *slot = None;
    }
    let Some(message) = slot.as_ref() else {
        return;
    };

    let color = match message.kind {
        MessageKind::Success => SUCCESS_COLOR,
        MessageKind::Info => INFO_COLOR,
        MessageKind::Error => ERROR_COLOR,
    };
    ui.colored_label(color, &message.text);

    // Timed messages need a frame after expiry to disappear.
    if message.kind != MessageKind::Error {
        ui.ctx().request_repaint_after(std::time::Duration::from_millis(250));
    }
}
