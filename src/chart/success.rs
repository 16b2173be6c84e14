use std::collections::BTreeMap;

use crate::color::ColorMap;
use crate::data::filter::records_for_site;
use crate::data::model::{Dataset, Outcome, SiteSelection};

use super::{ChartData, ChartSpec, PieSlice};

pub const TITLE_ALL_SITES: &str = "Total Successful Launches by Site";

/// Success breakdown pie. The payload range never applies here.
///
/// * `ALL`: one slice per site (sorted by site id) valued by its number of
///   successful launches. Sites with no success keep a zero-valued slice.
/// * A single site: one slice per outcome that occurs at that site, largest
///   count first. Outcomes that never occur are left out, so an unknown or
///   empty site gives a chart with no slices.
pub fn success_breakdown(dataset: &Dataset, site: &SiteSelection) -> ChartSpec {
    match site {
        SiteSelection::All => successes_by_site(dataset),
        SiteSelection::Site(name) => outcomes_for_site(dataset, site, name),
    }
}

fn successes_by_site(dataset: &Dataset) -> ChartSpec {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in dataset.records() {
        *totals.entry(rec.site.as_str()).or_default() += u64::from(rec.outcome.as_class());
    }

    let colors = ColorMap::new(dataset.sites());
    let slices = totals
        .into_iter()
        .map(|(site, value)| PieSlice {
            label: site.to_string(),
            value,
            color: colors.color_for(site),
        })
        .collect();

    ChartSpec {
        title: TITLE_ALL_SITES.to_string(),
        data: ChartData::Pie { slices },
        axes: None,
    }
}

fn outcomes_for_site(dataset: &Dataset, site: &SiteSelection, name: &str) -> ChartSpec {
    let mut counts: BTreeMap<Outcome, u64> = BTreeMap::new();
    for rec in records_for_site(dataset, site) {
        *counts.entry(rec.outcome).or_default() += 1;
    }

    let mut counts: Vec<(Outcome, u64)> = counts.into_iter().collect();
    // Largest count first; on a tie successes lead.
    counts.sort_by(|(oa, ca), (ob, cb)| cb.cmp(ca).then(ob.cmp(oa)));

    let colors = ColorMap::new(&[Outcome::Failure.to_string(), Outcome::Success.to_string()]);
    let slices = counts
        .into_iter()
        .map(|(outcome, value)| {
            let label = outcome.to_string();
            PieSlice {
                color: colors.color_for(&label),
                label,
                value,
            }
        })
        .collect();

    ChartSpec {
        title: format!("Success Rate for Site {name}"),
        data: ChartData::Pie { slices },
        axes: None,
    }
}
