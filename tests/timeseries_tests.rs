// Timestamp-aligned series merging: alignment by value, max/sum/derived-avg
// rules, realignment of adopted series, and the per-agent variant.

use std::collections::BTreeMap;

use servermap::merge::merge_node;
use servermap::merge::timeseries::{adopt_series_list, merge_keyed_series, merge_series_list};
use servermap::models::*;

const ACC_AXIS: &[Timestamp] = &[100, 200, 300];
const INC_AXIS: &[Timestamp] = &[200, 300, 400];

fn series(key: &str, values: &[u64]) -> TimeSeries {
    TimeSeries::new(key, values.to_vec())
}

#[test]
fn sum_series_aligns_by_timestamp_value_not_position() {
    let mut acc = Some(vec![series(KEY_SUM, &[1, 2, 3])]);
    let inc = Some(vec![series(KEY_SUM, &[10, 20, 30])]);

    merge_series_list(&mut acc, ACC_AXIS, inc, INC_AXIS);

    // 100 has no incoming match; 200/300 pair with incoming positions 0/1;
    // the incoming value at 400 is dropped and the axis never grows.
    let merged = acc.unwrap();
    assert_eq!(merged[0], series(KEY_SUM, &[1, 12, 23]));
}

#[test]
fn max_series_combines_pointwise_by_maximum() {
    let mut acc = Some(vec![series(KEY_MAX, &[5, 6, 7])]);
    let inc = Some(vec![series(KEY_MAX, &[1, 9, 2])]);

    merge_series_list(&mut acc, ACC_AXIS, inc, INC_AXIS);

    assert_eq!(acc.unwrap()[0], series(KEY_MAX, &[5, 6, 9]));
}

#[test]
fn avg_series_is_recomputed_never_merged() {
    let mut acc = Some(vec![
        series(KEY_SUM, &[10, 10, 10]),
        series(KEY_TOT, &[2, 2, 2]),
        series(KEY_AVG, &[5, 5, 5]),
    ]);
    // Incoming Avg is garbage on purpose; it must be ignored.
    let inc = Some(vec![
        series(KEY_SUM, &[8, 20, 0]),
        series(KEY_TOT, &[2, 3, 0]),
        series(KEY_AVG, &[99, 99, 99]),
    ]);

    merge_series_list(&mut acc, ACC_AXIS, inc, INC_AXIS);

    let merged = acc.unwrap();
    assert_eq!(merged[0], series(KEY_SUM, &[10, 18, 30]));
    assert_eq!(merged[1], series(KEY_TOT, &[2, 4, 5]));
    // floor(10/2), floor(18/4), floor(30/5)
    assert_eq!(merged[2], series(KEY_AVG, &[5, 4, 6]));
}

#[test]
fn avg_series_inserted_when_absent() {
    let mut acc = Some(vec![series(KEY_SUM, &[9, 9, 9]), series(KEY_TOT, &[3, 3, 3])]);
    let inc = Some(vec![series(KEY_SUM, &[3, 3, 3]), series(KEY_TOT, &[0, 0, 0])]);

    merge_series_list(&mut acc, ACC_AXIS, inc, INC_AXIS);

    let merged = acc.unwrap();
    let avg = merged.iter().find(|s| s.key == KEY_AVG).expect("Avg inserted");
    // Sum merges to [9, 12, 12], Tot stays [3, 3, 3].
    assert_eq!(avg.values, vec![3, 4, 4]);
}

#[test]
fn unknown_incoming_series_key_is_inserted_realigned() {
    let mut acc = Some(vec![series(KEY_SUM, &[1, 1, 1])]);
    let inc = Some(vec![
        series(KEY_SUM, &[1, 1, 1]),
        series("Error", &[10, 20, 30]),
    ]);

    merge_series_list(&mut acc, ACC_AXIS, inc, INC_AXIS);

    let merged = acc.unwrap();
    let inserted = merged.iter().find(|s| s.key == "Error").expect("inserted");
    // Realigned to the accumulator axis: 100 zero-filled, 400 dropped.
    assert_eq!(inserted.values, vec![0, 10, 20]);
}

#[test]
fn list_adopted_wholesale_when_accumulator_has_none() {
    let mut acc: Option<Vec<TimeSeries>> = None;
    let inc = Some(vec![series(KEY_SUM, &[10, 20, 30]), series(KEY_TOT, &[1, 2, 3])]);

    // Same axis on both sides: values adopt unchanged.
    merge_series_list(&mut acc, ACC_AXIS, inc, ACC_AXIS);

    let adopted = acc.unwrap();
    assert_eq!(adopted[0], series(KEY_SUM, &[10, 20, 30]));
    assert_eq!(adopted[1], series(KEY_TOT, &[1, 2, 3]));
}

#[test]
fn adopted_list_realigns_to_the_accumulator_axis() {
    let adopted = adopt_series_list(vec![series(KEY_SUM, &[10, 20, 30])], INC_AXIS, ACC_AXIS);
    assert_eq!(adopted[0], series(KEY_SUM, &[0, 10, 20]));
}

#[test]
fn per_agent_series_merge_and_adopt() {
    let mut acc = BTreeMap::from([(
        "agent-1".to_string(),
        vec![series(KEY_SUM, &[1, 2, 3]), series(KEY_TOT, &[1, 1, 1])],
    )]);
    let inc = BTreeMap::from([
        (
            "agent-1".to_string(),
            vec![series(KEY_SUM, &[10, 20, 30]), series(KEY_TOT, &[1, 1, 1])],
        ),
        ("agent-2".to_string(), vec![series(KEY_SUM, &[7, 8, 9])]),
    ]);

    merge_keyed_series(&mut acc, ACC_AXIS, inc, INC_AXIS);

    assert_eq!(acc["agent-1"][0], series(KEY_SUM, &[1, 12, 23]));
    assert_eq!(acc["agent-1"][1], series(KEY_TOT, &[1, 2, 2]));
    // New agent adopted, realigned to the session axis.
    assert_eq!(acc["agent-2"][0], series(KEY_SUM, &[0, 7, 8]));
}

#[test]
fn node_merge_runs_flat_and_per_agent_series_together() {
    let mut acc = NodeData {
        time_series_histogram: Some(vec![
            series(KEY_SUM, &[1, 2, 3]),
            series(KEY_TOT, &[1, 1, 1]),
            series(KEY_AVG, &[1, 2, 3]),
        ]),
        ..Default::default()
    };
    acc.agent_time_series_histogram
        .insert("agent-1".into(), vec![series(KEY_MAX, &[5, 6, 7])]);

    let mut inc = NodeData {
        time_series_histogram: Some(vec![
            series(KEY_SUM, &[10, 20, 30]),
            series(KEY_TOT, &[1, 1, 1]),
            series(KEY_AVG, &[0, 0, 0]),
        ]),
        ..Default::default()
    };
    inc.agent_time_series_histogram
        .insert("agent-1".into(), vec![series(KEY_MAX, &[1, 9, 2])]);

    merge_node(&mut acc, ACC_AXIS, inc, INC_AXIS);

    let flat = acc.time_series_histogram.unwrap();
    assert_eq!(flat[0], series(KEY_SUM, &[1, 12, 23]));
    assert_eq!(flat[1], series(KEY_TOT, &[1, 2, 2]));
    assert_eq!(flat[2], series(KEY_AVG, &[1, 6, 11]));
    assert_eq!(
        acc.agent_time_series_histogram["agent-1"][0],
        series(KEY_MAX, &[5, 6, 9])
    );
}

#[test]
fn disjoint_axes_leave_the_accumulator_unchanged() {
    let mut acc = Some(vec![series(KEY_SUM, &[1, 2, 3])]);
    let inc = Some(vec![series(KEY_SUM, &[10, 20])]);

    merge_series_list(&mut acc, ACC_AXIS, inc, &[900, 1000]);

    assert_eq!(acc.unwrap()[0], series(KEY_SUM, &[1, 2, 3]));
}
