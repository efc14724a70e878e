// Merge engine: folds one incoming snapshot entry into the running aggregate.
// Scalar rules live here; histogram/response-statistic rules, the time-series
// alignment algorithm, and structural unions live in the submodules.

pub mod statistics;
pub mod structural;
pub mod timeseries;

use crate::models::{LinkData, NodeData, Timestamp, TopologySnapshot};

/// Folds `inc` into `acc` for one node key present in both snapshots.
///
/// Alert flags are overwritten, counters summed, instance gauges maxed; every
/// nested statistic merges per its own rule. `acc_axis`/`inc_axis` are the
/// timestamp axes the two sides' series are aligned to; the accumulator's
/// axis is canonical and never grows.
pub fn merge_node(
    acc: &mut NodeData,
    acc_axis: &[Timestamp],
    inc: NodeData,
    inc_axis: &[Timestamp],
) {
    acc.has_alert = inc.has_alert;
    acc.slow_count += inc.slow_count;
    acc.error_count += inc.error_count;
    acc.total_count += inc.total_count;
    acc.instance_count = acc.instance_count.max(inc.instance_count);
    acc.instance_error_count = acc.instance_error_count.max(inc.instance_error_count);

    structural::merge_id_set(&mut acc.agent_ids, inc.agent_ids);
    structural::merge_name_map(&mut acc.agent_id_name_map, inc.agent_id_name_map);
    statistics::merge_histogram(&mut acc.histogram, inc.histogram);
    statistics::merge_response_statistics(&mut acc.response_statistics, inc.response_statistics);
    statistics::merge_keyed_histograms(&mut acc.agent_histogram, inc.agent_histogram);
    timeseries::merge_series_list(
        &mut acc.time_series_histogram,
        acc_axis,
        inc.time_series_histogram,
        inc_axis,
    );
    timeseries::merge_keyed_series(
        &mut acc.agent_time_series_histogram,
        acc_axis,
        inc.agent_time_series_histogram,
        inc_axis,
    );
    structural::merge_server_list(&mut acc.server_list, inc.server_list);
}

/// Folds `inc` into `acc` for one link key present in both snapshots.
pub fn merge_link(
    acc: &mut LinkData,
    acc_axis: &[Timestamp],
    inc: LinkData,
    inc_axis: &[Timestamp],
) {
    acc.has_alert = inc.has_alert;
    acc.slow_count += inc.slow_count;
    acc.error_count += inc.error_count;
    acc.total_count += inc.total_count;

    structural::merge_id_set(&mut acc.from_agent, inc.from_agent);
    structural::merge_id_set(&mut acc.to_agent, inc.to_agent);
    structural::merge_name_map(&mut acc.from_agent_id_name_map, inc.from_agent_id_name_map);
    structural::merge_name_map(&mut acc.to_agent_id_name_map, inc.to_agent_id_name_map);
    statistics::merge_histogram(&mut acc.histogram, inc.histogram);
    statistics::merge_response_statistics(&mut acc.response_statistics, inc.response_statistics);
    timeseries::merge_series_list(
        &mut acc.time_series_histogram,
        acc_axis,
        inc.time_series_histogram,
        inc_axis,
    );
    timeseries::merge_keyed_series(
        &mut acc.source_time_series_histogram,
        acc_axis,
        inc.source_time_series_histogram,
        inc_axis,
    );
    statistics::merge_keyed_histograms(&mut acc.source_histogram, inc.source_histogram);
    statistics::merge_keyed_histograms(&mut acc.target_histogram, inc.target_histogram);
    statistics::merge_keyed_response_statistics(
        &mut acc.source_response_statistics,
        inc.source_response_statistics,
    );
    statistics::merge_keyed_response_statistics(
        &mut acc.target_response_statistics,
        inc.target_response_statistics,
    );
}

/// Prepares a node that is new to the accumulator: realigns its series to the
/// accumulator's axis and refreshes derived averages. Takes the node by value
/// so the adopted entry shares no structure with the incoming snapshot.
pub fn adopt_node(mut node: NodeData, node_axis: &[Timestamp], acc_axis: &[Timestamp]) -> NodeData {
    if let Some(list) = node.time_series_histogram.take() {
        node.time_series_histogram = Some(timeseries::adopt_series_list(list, node_axis, acc_axis));
    }
    for list in node.agent_time_series_histogram.values_mut() {
        let owned = std::mem::take(list);
        *list = timeseries::adopt_series_list(owned, node_axis, acc_axis);
    }
    refresh_node(&mut node);
    node
}

/// Link counterpart of [`adopt_node`].
pub fn adopt_link(mut link: LinkData, link_axis: &[Timestamp], acc_axis: &[Timestamp]) -> LinkData {
    if let Some(list) = link.time_series_histogram.take() {
        link.time_series_histogram = Some(timeseries::adopt_series_list(list, link_axis, acc_axis));
    }
    for list in link.source_time_series_histogram.values_mut() {
        let owned = std::mem::take(list);
        *list = timeseries::adopt_series_list(owned, link_axis, acc_axis);
    }
    refresh_link(&mut link);
    link
}

/// Recomputes every derived average in a snapshot. Run after adopting a whole
/// snapshot wholesale, so averages carried on the wire are never trusted.
pub fn refresh_derived(snapshot: &mut TopologySnapshot) {
    for node in snapshot.nodes.values_mut() {
        refresh_node(node);
    }
    for link in snapshot.links.values_mut() {
        refresh_link(link);
    }
}

fn refresh_node(node: &mut NodeData) {
    if let Some(stats) = node.response_statistics.as_mut() {
        stats.refresh_avg();
    }
    if let Some(list) = node.time_series_histogram.as_mut() {
        timeseries::refresh_avg_series(list);
    }
    for list in node.agent_time_series_histogram.values_mut() {
        timeseries::refresh_avg_series(list);
    }
}

fn refresh_link(link: &mut LinkData) {
    if let Some(stats) = link.response_statistics.as_mut() {
        stats.refresh_avg();
    }
    for stats in link.source_response_statistics.values_mut() {
        stats.refresh_avg();
    }
    for stats in link.target_response_statistics.values_mut() {
        stats.refresh_avg();
    }
    if let Some(list) = link.time_series_histogram.as_mut() {
        timeseries::refresh_avg_series(list);
    }
    for list in link.source_time_series_histogram.values_mut() {
        timeseries::refresh_avg_series(list);
    }
}
