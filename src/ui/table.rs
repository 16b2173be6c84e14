use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const HEADERS: [&str; 6] = [
    "Flight",
    "Launch site",
    "Payload (kg)",
    "Outcome",
    "Booster version",
    "Category",
];

/// Launch table listing the records behind the scatter chart.
pub fn launch_table(ui: &mut Ui, state: &AppState) {
    let records = state.dataset().records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(48.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.table_rows.len(), |mut row| {
                let rec = &records[state.table_rows[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(rec.flight_number.map(|n| n.to_string()).unwrap_or_default());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.site.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.0}", rec.payload_mass_kg));
                });
                row.col(|ui: &mut Ui| {
                    let color = if rec.outcome.is_success() {
                        Color32::from_rgb(0x2E, 0x8B, 0x57)
                    } else {
                        Color32::from_rgb(0xB2, 0x22, 0x22)
                    };
                    ui.label(RichText::new(rec.outcome.to_string()).color(color));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.booster_version.as_deref().unwrap_or("–"));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.booster_category.as_str());
                });
            });
        });
}
