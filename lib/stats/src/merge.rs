use crate::{StatsGraph, StatsMetric, StatsRecord};
use std::collections::BTreeMap;

/// Sums the counts of records with the same graph and metric.
///
/// The result is sorted by graph, the root graph first, and then by metric.
pub fn merge_records(records: impl IntoIterator<Item = StatsRecord>) -> Vec<StatsRecord> {
    let mut totals = BTreeMap::<(StatsGraph, StatsMetric), u64>::new();
    for record in records {
        *totals.entry((record.graph, record.metric)).or_default() += record.count;
    }
    totals
        .into_iter()
        .map(|((graph, metric), count)| StatsRecord {
            graph,
            metric,
            count,
        })
        .collect()
}
