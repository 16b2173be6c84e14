use std::collections::BTreeMap;

use crate::color::ColorMap;
use crate::data::filter::records_in_range;
use crate::data::model::{Dataset, FilterSelection, SiteSelection};

use super::{AxisLabels, ChartData, ChartSpec, ScatterPoint, ScatterSeries};

pub const TITLE_ALL_SITES: &str = "Correlation between Payload and Success for All Sites";
pub const X_LABEL: &str = "Payload Mass (kg)";
pub const Y_LABEL: &str = "Success (1) / Failure (0)";

/// Payload vs outcome scatter.
///
/// The payload range is applied first, then the site restriction. Every
/// surviving record becomes exactly one point `(payload, class)`; points are
/// grouped into one series per booster category, series sorted by category
/// and points kept in dataset order.
pub fn payload_correlation(dataset: &Dataset, selection: &FilterSelection) -> ChartSpec {
    let in_range = records_in_range(dataset, &selection.payload_range);

    let mut groups: BTreeMap<&str, Vec<ScatterPoint>> = BTreeMap::new();
    for rec in in_range
        .into_iter()
        .filter(|rec| selection.site.matches(&rec.site))
    {
        groups
            .entry(rec.booster_category.as_str())
            .or_default()
            .push(ScatterPoint {
                x: rec.payload_mass_kg,
                y: f64::from(rec.outcome.as_class()),
            });
    }

    let colors = ColorMap::new(dataset.booster_categories());
    let series = groups
        .into_iter()
        .map(|(category, points)| ScatterSeries {
            name: category.to_string(),
            color: colors.color_for(category),
            points,
        })
        .collect();

    let title = match &selection.site {
        SiteSelection::All => TITLE_ALL_SITES.to_string(),
        SiteSelection::Site(name) => {
            format!("Correlation between Payload and Success for Site {name}")
        }
    };

    ChartSpec {
        title,
        data: ChartData::Scatter { series },
        axes: Some(AxisLabels {
            x: X_LABEL.to_string(),
            y: Y_LABEL.to_string(),
        }),
    }
}
