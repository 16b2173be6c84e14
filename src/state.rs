use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::chart::{ChartBackend, ChartSpec};
use crate::config::DashboardConfig;
use crate::controller::{Controller, InputEvent, Slot};
use crate::data::filter::filtered_indices;
use crate::data::model::{Dataset, SiteSelection};
use crate::ui::plot::{EguiCharts, Figure};

/// Display label of the `ALL` selector entry.
pub const ALL_SITES_LABEL: &str = "All Sites";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Owns the current selection and the published chart specs.
    pub controller: Controller,

    /// Figures built from the published specs, tagged with the spec revision.
    figures: BTreeMap<Slot, (u64, Figure)>,

    /// Indices of records behind the scatter chart (launch table rows).
    pub table_rows: Vec<usize>,

    /// Text typed into the site selector's search box.
    pub site_query: String,

    /// Slider handle positions; may sit off the step grid until first dragged.
    pub payload_low: f64,
    pub payload_high: f64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        let controller = Controller::new(dataset);
        let range = controller.selection().payload_range;
        let mut state = Self {
            config,
            controller,
            figures: BTreeMap::new(),
            table_rows: Vec::new(),
            site_query: String::new(),
            payload_low: range.low(),
            payload_high: range.high(),
            status_message: None,
        };
        state.refresh(&Slot::ALL);
        state
    }

    pub fn dataset(&self) -> &Dataset {
        self.controller.dataset()
    }

    /// Feed UI events to the controller and rebuild what changed.
    pub fn apply(&mut self, events: Vec<InputEvent>) {
        if events.is_empty() {
            return;
        }
        let updated = self.controller.dispatch_all(events);
        self.refresh(&updated);
    }

    /// Rebuild figures whose spec revision moved, and the table when the
    /// scatter input set changed.
    fn refresh(&mut self, slots: &[Slot]) {
        for &slot in slots {
            let Some(published) = self.controller.published(slot) else {
                continue;
            };
            let stale = self
                .figures
                .get(&slot)
                .map_or(true, |(rev, _)| *rev != published.revision);
            if stale {
                let figure = EguiCharts.build_chart(&published.spec);
                self.figures.insert(slot, (published.revision, figure));
            }
            if slot == Slot::PayloadScatter {
                self.table_rows = filtered_indices(self.controller.dataset(), self.controller.selection());
            }
        }
    }

    pub fn figure(&self, slot: Slot) -> Option<&Figure> {
        self.figures.get(&slot).map(|(_, f)| f)
    }

    /// Selector entries `(label, value)`: `ALL` first, then every site whose
    /// name contains the search text (case-insensitive).
    pub fn site_options(&self) -> Vec<(String, SiteSelection)> {
        let query = self.site_query.trim().to_lowercase();
        let mut options = vec![(ALL_SITES_LABEL.to_string(), SiteSelection::All)];
        options.extend(
            self.dataset()
                .sites()
                .iter()
                .filter(|site| query.is_empty() || site.to_lowercase().contains(&query))
                .map(|site| (site.clone(), SiteSelection::Site(site.clone()))),
        );
        options
    }

    pub fn selected_site_label(&self) -> String {
        match &self.controller.selection().site {
            SiteSelection::All => ALL_SITES_LABEL.to_string(),
            SiteSelection::Site(site) => site.clone(),
        }
    }

    /// Write the currently published specs as pretty JSON keyed by slot id.
    pub fn export_specs(&self, path: &Path) -> Result<()> {
        let specs: BTreeMap<&str, &ChartSpec> = Slot::ALL
            .iter()
            .filter_map(|slot| self.controller.spec(*slot).map(|spec| (slot.id(), spec)))
            .collect();
        let json = serde_json::to_string_pretty(&specs).context("serializing chart specs")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing chart specs to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::scenario_dataset;
    use crate::data::model::PayloadRange;

    fn state() -> AppState {
        AppState::new(Arc::new(scenario_dataset()), DashboardConfig::default())
    }

    #[test]
    fn test_new_state_has_both_figures() {
        let s = state();
        assert!(s.figure(Slot::SuccessPie).is_some());
        assert!(s.figure(Slot::PayloadScatter).is_some());
        assert_eq!(s.table_rows, vec![0, 1, 2]);
        assert_eq!((s.payload_low, s.payload_high), (2000.0, 5000.0));
    }

    #[test]
    fn test_apply_refreshes_table() {
        let mut s = state();
        s.apply(vec![InputEvent::PayloadRangeChanged(PayloadRange::new(4000.0, 10000.0))]);
        assert_eq!(s.table_rows, vec![1]);
        s.apply(vec![InputEvent::SiteSelected(SiteSelection::Site("B".into()))]);
        assert!(s.table_rows.is_empty());
        assert!(s.figure(Slot::PayloadScatter).unwrap().is_empty());
        assert_eq!(s.selected_site_label(), "B");
    }

    #[test]
    fn test_site_options_filter() {
        let mut s = state();
        assert_eq!(s.site_options().len(), 3);
        s.site_query = "b".to_string();
        let options = s.site_options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0], (ALL_SITES_LABEL.to_string(), SiteSelection::All));
        assert_eq!(options[1].1, SiteSelection::Site("B".into()));
    }

    #[test]
    fn test_export_specs() {
        let s = state();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.json");
        s.export_specs(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["success-pie-chart"]["kind"], "pie");
        assert_eq!(json["success-payload-scatter-chart"]["kind"], "scatter");
        assert_eq!(
            json["success-payload-scatter-chart"]["axes"]["x"],
            "Payload Mass (kg)"
        );
    }
}
