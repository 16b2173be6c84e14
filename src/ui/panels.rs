use eframe::egui::{self, Color32, RichText, Ui};

use crate::controller::InputEvent;
use crate::data::model::{PayloadRange, SiteSelection};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selector widgets
// ---------------------------------------------------------------------------

/// Render the selector panel. Widget changes are returned as events rather
/// than applied here; the caller feeds them to the controller.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) -> Vec<InputEvent> {
    let mut events = Vec::new();

    ui.heading("Filters");
    ui.separator();

    // ---- Launch site selector ----
    ui.strong("Launch site");
    let mut picked: Option<SiteSelection> = None;
    let current = state.controller.selection().site.clone();
    egui::ComboBox::from_id_salt("site-dropdown")
        .selected_text(state.selected_site_label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.site_query)
                    .hint_text("Select a launch site here"),
            );
            for (label, value) in state.site_options() {
                if ui.selectable_label(current == value, label).clicked() {
                    picked = Some(value);
                }
            }
        });
    if let Some(site) = picked {
        events.push(InputEvent::SiteSelected(site));
    }

    ui.add_space(8.0);
    ui.separator();

    // ---- Payload range ----
    ui.strong("Payload range (kg)");
    let slider = state.config.slider.clone();
    let low_changed = ui
        .add(
            egui::Slider::new(&mut state.payload_low, slider.min..=slider.max)
                .step_by(slider.step)
                .text("from"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut state.payload_high, slider.min..=slider.max)
                .step_by(slider.step)
                .text("to"),
        )
        .changed();

    // Handles may not cross: the one being dragged pushes the other.
    if low_changed && state.payload_low > state.payload_high {
        state.payload_high = state.payload_low;
    }
    if high_changed && state.payload_high < state.payload_low {
        state.payload_low = state.payload_high;
    }

    ui.horizontal(|ui: &mut Ui| {
        for mark in slider.marks() {
            ui.small(format!("{mark:.0}"));
        }
    });

    if low_changed || high_changed {
        events.push(InputEvent::PayloadRangeChanged(PayloadRange::new(
            state.payload_low,
            state.payload_high,
        )));
    }

    ui.add_space(8.0);
    ui.separator();

    let ds = state.dataset();
    ui.label(format!(
        "Data payload span: {:.0} – {:.0} kg",
        ds.min_payload(),
        ds.max_payload()
    ));

    events
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the heading and the menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches from {} sites, {} in the scatter",
            state.dataset().len(),
            state.dataset().sites().len(),
            state.table_rows.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(&state.config.heading)
                .size(32.0)
                .color(Color32::from_rgb(0x50, 0x3D, 0x36)),
        );
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart specifications")
        .set_file_name("charts.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_specs(&path) {
            Ok(()) => {
                log::info!("Exported chart specs to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export chart specs: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
