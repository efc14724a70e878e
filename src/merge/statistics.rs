// Histogram and response-statistic merges, plus their keyed (per-agent,
// per-direction) variants. Absent accumulator sides adopt the incoming value
// by move; averages are refreshed as the last step of every path.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::models::{Histogram, ResponseStatistics};

/// Per-bucket sum. An accumulator with no histogram takes the incoming one
/// wholesale; an absent incoming histogram is a no-op.
pub fn merge_histogram(acc: &mut Option<Histogram>, inc: Option<Histogram>) {
    let Some(inc) = inc else { return };
    match acc {
        Some(acc) => add_buckets(acc, inc),
        None => *acc = Some(inc),
    }
}

/// Keyed histogram maps (per agent id, or per source/target sub-key): merge
/// per key, inserting new keys wholesale.
pub fn merge_keyed_histograms(
    acc: &mut BTreeMap<String, Histogram>,
    inc: BTreeMap<String, Histogram>,
) {
    for (key, histogram) in inc {
        match acc.entry(key) {
            Entry::Occupied(mut entry) => add_buckets(entry.get_mut(), histogram),
            Entry::Vacant(entry) => {
                entry.insert(histogram);
            }
        }
    }
}

fn add_buckets(acc: &mut Histogram, inc: Histogram) {
    for (bucket, count) in inc.0 {
        *acc.0.entry(bucket).or_insert(0) += count;
    }
}

/// Sum/Tot add, Max maxes, Avg recomputed last. Absent incoming is a no-op;
/// an absent accumulator adopts the incoming record (and refreshes its Avg).
pub fn merge_response_statistics(
    acc: &mut Option<ResponseStatistics>,
    inc: Option<ResponseStatistics>,
) {
    let Some(mut inc) = inc else { return };
    match acc {
        Some(acc) => merge_response_record(acc, &inc),
        None => {
            inc.refresh_avg();
            *acc = Some(inc);
        }
    }
}

/// Keyed response-statistics maps: merge per key, inserting new keys
/// wholesale (with a refreshed Avg, skipping the add/max step).
pub fn merge_keyed_response_statistics(
    acc: &mut BTreeMap<String, ResponseStatistics>,
    inc: BTreeMap<String, ResponseStatistics>,
) {
    for (key, stats) in inc {
        match acc.entry(key) {
            Entry::Occupied(mut entry) => merge_response_record(entry.get_mut(), &stats),
            Entry::Vacant(entry) => {
                let mut stats = stats;
                stats.refresh_avg();
                entry.insert(stats);
            }
        }
    }
}

fn merge_response_record(acc: &mut ResponseStatistics, inc: &ResponseStatistics) {
    acc.tot += inc.tot;
    acc.sum += inc.sum;
    acc.max = acc.max.max(inc.max);
    acc.refresh_avg();
}
