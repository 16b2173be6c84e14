use super::model::{Dataset, FilterSelection, LaunchRecord, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Filter predicates: site + inclusive payload range
// ---------------------------------------------------------------------------

/// Whether one record passes the selection.
///
/// A record passes when:
/// * its payload mass lies in `[low, high]` (inclusive on both ends), and
/// * the selection is `ALL`, or the record's site equals the selected site.
pub fn matches(record: &LaunchRecord, selection: &FilterSelection) -> bool {
    selection.payload_range.contains(record.payload_mass_kg) && selection.site.matches(&record.site)
}

/// Return indices of records that pass the selection, in dataset order.
/// An empty result is a normal outcome.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches(rec, selection))
        .map(|(i, _)| i)
        .collect()
}

/// Records for one site selection, ignoring payload.
pub fn records_for_site<'a>(dataset: &'a Dataset, site: &SiteSelection) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|rec| site.matches(&rec.site))
        .collect()
}

/// Records inside a payload range, ignoring site.
pub fn records_in_range<'a>(dataset: &'a Dataset, range: &PayloadRange) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|rec| range.contains(rec.payload_mass_kg))
        .collect()
}
