use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::chart::{payload_correlation, success_breakdown, ChartSpec};
use crate::data::model::{Dataset, FilterSelection, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Inputs, events and output slots
// ---------------------------------------------------------------------------

/// An observed UI input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    SiteSelector,
    PayloadSlider,
}

/// One UI change, carrying the new value of the input that changed.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    SiteSelected(SiteSelection),
    PayloadRangeChanged(PayloadRange),
}

impl InputEvent {
    pub fn input(&self) -> Input {
        match self {
            InputEvent::SiteSelected(_) => Input::SiteSelector,
            InputEvent::PayloadRangeChanged(_) => Input::PayloadSlider,
        }
    }
}

/// A named output location a chart spec is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    SuccessPie,
    PayloadScatter,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::SuccessPie, Slot::PayloadScatter];

    pub fn id(self) -> &'static str {
        match self {
            Slot::SuccessPie => "success-pie-chart",
            Slot::PayloadScatter => "success-payload-scatter-chart",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Reactive edges
// ---------------------------------------------------------------------------

/// A recomputation bound to a trigger set and an output slot.
struct Edge {
    triggers: &'static [Input],
    slot: Slot,
    compute: fn(&Dataset, &FilterSelection) -> ChartSpec,
}

fn pie_edge(dataset: &Dataset, selection: &FilterSelection) -> ChartSpec {
    success_breakdown(dataset, &selection.site)
}

const EDGES: [Edge; 2] = [
    Edge {
        triggers: &[Input::SiteSelector],
        slot: Slot::SuccessPie,
        compute: pie_edge,
    },
    Edge {
        triggers: &[Input::SiteSelector, Input::PayloadSlider],
        slot: Slot::PayloadScatter,
        compute: payload_correlation,
    },
];

/// A chart spec as last published to a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub spec: ChartSpec,
    /// Bumped on every publish so renderers know to rebuild their figure.
    pub revision: u64,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Dispatches input events to the reactive edges and keeps the latest spec per slot.
///
/// Edges never read each other's output; each one sees only the dataset and
/// the current selection, so the order they run in does not matter.
pub struct Controller {
    dataset: Arc<Dataset>,
    selection: FilterSelection,
    slots: BTreeMap<Slot, Published>,
}

impl Controller {
    /// Start with every site selected and the dataset's payload bounds,
    /// and publish both charts for that initial state.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let selection = FilterSelection::initial(&dataset);
        let mut controller = Controller {
            dataset,
            selection,
            slots: BTreeMap::new(),
        };
        for edge in &EDGES {
            controller.run(edge);
        }
        controller
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn published(&self, slot: Slot) -> Option<&Published> {
        self.slots.get(&slot)
    }

    pub fn spec(&self, slot: Slot) -> Option<&ChartSpec> {
        self.published(slot).map(|p| &p.spec)
    }

    /// Apply one input change and run every edge it triggers.
    ///
    /// Returns the slots that received a new spec. An event that does not
    /// change the current value triggers nothing.
    pub fn dispatch(&mut self, event: InputEvent) -> Vec<Slot> {
        let input = event.input();
        let changed = match event {
            InputEvent::SiteSelected(site) => {
                let changed = self.selection.site != site;
                self.selection.site = site;
                changed
            }
            InputEvent::PayloadRangeChanged(range) => {
                let changed = self.selection.payload_range != range;
                self.selection.payload_range = range;
                changed
            }
        };
        if !changed {
            log::trace!("{input:?} unchanged, nothing to recompute");
            return Vec::new();
        }

        log::debug!(
            "{input:?} changed: site={} payload=[{}, {}]",
            self.selection.site,
            self.selection.payload_range.low(),
            self.selection.payload_range.high()
        );

        EDGES
            .iter()
            .filter(|edge| edge.triggers.contains(&input))
            .map(|edge| self.run(edge))
            .collect()
    }

    /// Apply a batch of events in order, returning each updated slot once.
    pub fn dispatch_all(&mut self, events: impl IntoIterator<Item = InputEvent>) -> Vec<Slot> {
        let mut updated: Vec<Slot> = Vec::new();
        for event in events {
            for slot in self.dispatch(event) {
                if !updated.contains(&slot) {
                    updated.push(slot);
                }
            }
        }
        updated
    }

    fn run(&mut self, edge: &Edge) -> Slot {
        let spec = (edge.compute)(&self.dataset, &self.selection);
        log::debug!(
            "publish {}: {:?} '{}' ({} labels)",
            edge.slot,
            spec.kind(),
            spec.title,
            spec.labels().len()
        );
        let revision = self.slots.get(&edge.slot).map_or(0, |p| p.revision + 1);
        self.slots.insert(edge.slot, Published { spec, revision });
        edge.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartData, ChartKind};
    use crate::data::model::tests::scenario_dataset;

    fn controller() -> Controller {
        Controller::new(Arc::new(scenario_dataset()))
    }

    fn pie_values(c: &Controller) -> Vec<(String, u64)> {
        match &c.spec(Slot::SuccessPie).unwrap().data {
            ChartData::Pie { slices } => slices.iter().map(|s| (s.label.clone(), s.value)).collect(),
            other => panic!("expected pie, got {other:?}"),
        }
    }

    fn scatter_payloads(c: &Controller) -> Vec<f64> {
        match &c.spec(Slot::PayloadScatter).unwrap().data {
            ChartData::Scatter { series } => {
                let mut xs: Vec<f64> = series.iter().flat_map(|s| s.points.iter().map(|p| p.x)).collect();
                xs.sort_by(f64::total_cmp);
                xs
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn test_initial_state_publishes_both_slots() {
        let c = controller();
        assert_eq!(c.selection().site, SiteSelection::All);
        assert_eq!(c.selection().payload_range, PayloadRange::new(2000.0, 5000.0));
        assert_eq!(c.spec(Slot::SuccessPie).unwrap().kind(), ChartKind::Pie);
        assert_eq!(c.spec(Slot::PayloadScatter).unwrap().kind(), ChartKind::Scatter);
        assert_eq!(c.published(Slot::SuccessPie).unwrap().revision, 0);
    }

    #[test]
    fn test_site_change_triggers_both_edges() {
        let mut c = controller();
        let updated = c.dispatch(InputEvent::SiteSelected(SiteSelection::Site("A".into())));
        assert_eq!(updated, vec![Slot::SuccessPie, Slot::PayloadScatter]);
        assert_eq!(c.published(Slot::SuccessPie).unwrap().revision, 1);
    }

    #[test]
    fn test_range_change_only_triggers_scatter() {
        let mut c = controller();
        let pie_before = c.published(Slot::SuccessPie).cloned();
        let updated = c.dispatch(InputEvent::PayloadRangeChanged(PayloadRange::new(0.0, 3000.0)));
        assert_eq!(updated, vec![Slot::PayloadScatter]);
        assert_eq!(c.published(Slot::SuccessPie).cloned(), pie_before);
    }

    #[test]
    fn test_unchanged_value_triggers_nothing() {
        let mut c = controller();
        assert!(c.dispatch(InputEvent::SiteSelected(SiteSelection::All)).is_empty());
        assert_eq!(c.published(Slot::PayloadScatter).unwrap().revision, 0);
    }

    #[test]
    fn test_same_inputs_same_specs() {
        let mut c = controller();
        let first = c.spec(Slot::PayloadScatter).cloned();
        c.dispatch(InputEvent::SiteSelected(SiteSelection::Site("B".into())));
        c.dispatch(InputEvent::SiteSelected(SiteSelection::All));
        assert_eq!(c.spec(Slot::PayloadScatter).cloned(), first);
        assert_eq!(c.published(Slot::PayloadScatter).unwrap().revision, 2);
    }

    #[test]
    fn test_dispatch_all_deduplicates_slots() {
        let mut c = controller();
        let updated = c.dispatch_all([
            InputEvent::PayloadRangeChanged(PayloadRange::new(0.0, 10000.0)),
            InputEvent::SiteSelected(SiteSelection::Site("A".into())),
        ]);
        assert_eq!(updated, vec![Slot::PayloadScatter, Slot::SuccessPie]);
    }

    #[test]
    fn test_scenario_all_sites_full_range() {
        let mut c = controller();
        c.dispatch(InputEvent::PayloadRangeChanged(PayloadRange::new(0.0, 10000.0)));
        assert_eq!(pie_values(&c), vec![("A".to_string(), 1), ("B".to_string(), 1)]);
        assert_eq!(c.spec(Slot::PayloadScatter).unwrap().point_count(), 3);
    }

    #[test]
    fn test_scenario_single_site_full_range() {
        let mut c = controller();
        c.dispatch_all([
            InputEvent::SiteSelected(SiteSelection::Site("A".into())),
            InputEvent::PayloadRangeChanged(PayloadRange::new(0.0, 10000.0)),
        ]);
        assert_eq!(
            pie_values(&c),
            vec![("Success".to_string(), 1), ("Failure".to_string(), 1)]
        );
        assert_eq!(scatter_payloads(&c), vec![2000.0, 5000.0]);
    }

    #[test]
    fn test_scenario_all_sites_heavy_payloads() {
        let mut c = controller();
        c.dispatch(InputEvent::PayloadRangeChanged(PayloadRange::new(4000.0, 10000.0)));
        assert_eq!(scatter_payloads(&c), vec![5000.0]);
        assert_eq!(pie_values(&c), vec![("A".to_string(), 1), ("B".to_string(), 1)]);
    }

    #[test]
    fn test_slot_ids() {
        assert_eq!(Slot::SuccessPie.to_string(), "success-pie-chart");
        assert_eq!(Slot::PayloadScatter.id(), "success-payload-scatter-chart");
    }
}
