// Time-series alignment merge, the heart of the engine. Two snapshots' axes
// may differ in length, start, or step, so values are paired by timestamp
// *value* lookup across the axes, never by array position. The accumulator's
// axis is canonical: timestamps it does not carry are dropped, and it never
// grows from a merge.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::models::{KEY_AVG, KEY_MAX, KEY_SUM, KEY_TOT, TimeSeries, Timestamp};

enum Combine {
    Sum,
    Max,
}

/// Merges an incoming series list into the accumulator's, aligning by
/// timestamp. With no accumulator list yet, the incoming one is adopted
/// (realigned to `acc_axis` when the axes differ).
pub fn merge_series_list(
    acc: &mut Option<Vec<TimeSeries>>,
    acc_axis: &[Timestamp],
    inc: Option<Vec<TimeSeries>>,
    inc_axis: &[Timestamp],
) {
    let Some(inc) = inc else { return };
    match acc {
        Some(acc) => merge_into(acc, acc_axis, inc, inc_axis),
        None => *acc = Some(adopt_series_list(inc, inc_axis, acc_axis)),
    }
}

/// Per-agent variant: the same alignment procedure runs once per incoming
/// agent id; agents new to the accumulator are adopted wholesale.
pub fn merge_keyed_series(
    acc: &mut BTreeMap<String, Vec<TimeSeries>>,
    acc_axis: &[Timestamp],
    inc: BTreeMap<String, Vec<TimeSeries>>,
    inc_axis: &[Timestamp],
) {
    for (agent_id, list) in inc {
        match acc.entry(agent_id) {
            Entry::Occupied(mut entry) => merge_into(entry.get_mut(), acc_axis, list, inc_axis),
            Entry::Vacant(entry) => {
                entry.insert(adopt_series_list(list, inc_axis, acc_axis));
            }
        }
    }
}

fn merge_into(
    acc: &mut Vec<TimeSeries>,
    acc_axis: &[Timestamp],
    inc: Vec<TimeSeries>,
    inc_axis: &[Timestamp],
) {
    for series in inc {
        // Avg is derived; recomputed below once Sum and Tot are settled.
        if series.key == KEY_AVG {
            continue;
        }
        let combine = if series.key == KEY_MAX {
            Combine::Max
        } else {
            Combine::Sum
        };
        match acc.iter_mut().find(|s| s.key == series.key) {
            Some(target) => combine_aligned(
                &mut target.values,
                acc_axis,
                &series.values,
                inc_axis,
                combine,
            ),
            // A series key the accumulator has never seen: insert it realigned
            // to the accumulator's axis rather than dropping it.
            None => acc.push(realign(series, inc_axis, acc_axis)),
        }
    }
    refresh_avg_series(acc);
}

/// Pairs each accumulator point with the incoming point carrying the same
/// timestamp, if any. Deliberately an O(n*m) lookup by value: positions are
/// not comparable across snapshots.
fn combine_aligned(
    acc_values: &mut [u64],
    acc_axis: &[Timestamp],
    inc_values: &[u64],
    inc_axis: &[Timestamp],
    combine: Combine,
) {
    for (slot, ts) in acc_values.iter_mut().zip(acc_axis) {
        let Some(j) = inc_axis.iter().position(|t| t == ts) else {
            continue;
        };
        let incoming = inc_values.get(j).copied().unwrap_or(0);
        *slot = match combine {
            Combine::Sum => *slot + incoming,
            Combine::Max => (*slot).max(incoming),
        };
    }
}

/// Prepares a series list taken from another snapshot for storage against
/// `to_axis`: realigns by timestamp when the axes differ (zero-filling points
/// the source axis does not carry) and refreshes the derived Avg series.
pub fn adopt_series_list(
    list: Vec<TimeSeries>,
    from_axis: &[Timestamp],
    to_axis: &[Timestamp],
) -> Vec<TimeSeries> {
    let mut list: Vec<TimeSeries> = list
        .into_iter()
        .map(|series| realign(series, from_axis, to_axis))
        .collect();
    refresh_avg_series(&mut list);
    list
}

fn realign(series: TimeSeries, from_axis: &[Timestamp], to_axis: &[Timestamp]) -> TimeSeries {
    if to_axis.is_empty() || from_axis == to_axis {
        return series;
    }
    let values = to_axis
        .iter()
        .map(|ts| {
            from_axis
                .iter()
                .position(|t| t == ts)
                .and_then(|j| series.values.get(j).copied())
                .unwrap_or(0)
        })
        .collect();
    TimeSeries {
        key: series.key,
        values,
    }
}

/// Recomputes the Avg series pointwise from the Sum and Tot series
/// (floor(Sum[t] / Tot[t]), 0 when Tot[t] is 0), inserting it when Sum and
/// Tot exist but Avg does not. A missing Sum or Tot point counts as 0.
pub fn refresh_avg_series(list: &mut Vec<TimeSeries>) {
    let sums = list.iter().find(|s| s.key == KEY_SUM).map(|s| s.values.clone());
    let tots = list.iter().find(|s| s.key == KEY_TOT).map(|s| s.values.clone());
    let avg_at = |i: usize| -> u64 {
        let sum = sums.as_ref().and_then(|v| v.get(i)).copied().unwrap_or(0);
        let tot = tots.as_ref().and_then(|v| v.get(i)).copied().unwrap_or(0);
        if tot > 0 { sum / tot } else { 0 }
    };
    if let Some(avg) = list.iter_mut().find(|s| s.key == KEY_AVG) {
        for i in 0..avg.values.len() {
            avg.values[i] = avg_at(i);
        }
    } else if let (Some(sum_values), Some(tot_values)) = (&sums, &tots) {
        let len = sum_values.len().max(tot_values.len());
        let values = (0..len).map(avg_at).collect();
        list.push(TimeSeries::new(KEY_AVG, values));
    }
}
