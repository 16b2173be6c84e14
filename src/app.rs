use std::sync::Arc;

use eframe::egui::{self, Ui};

use crate::config::DashboardConfig;
use crate::controller::Slot;
use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(dataset, config),
        }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + heading ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors ----
        let events = egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| panels::side_panel(ui, &mut self.state))
            .inner;

        // Recompute before drawing so this frame already shows the new charts.
        self.state.apply(events);

        // ---- Central panel: charts + launch table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    let height = self.state.config.chart_height;
                    for slot in Slot::ALL {
                        if let Some(figure) = self.state.figure(slot) {
                            figure.show(ui, slot.id(), height);
                        }
                        ui.add_space(12.0);
                    }

                    egui::CollapsingHeader::new("Launches in the scatter chart")
                        .default_open(false)
                        .show(ui, |ui: &mut Ui| {
                            table::launch_table(ui, &self.state);
                        });
                });
        });
    }
}
