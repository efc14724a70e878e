// Statistic records: histograms, response-time summaries, time series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Series key whose values combine pointwise by sum and feed the derived average.
pub const KEY_SUM: &str = "Sum";
/// Series key holding the per-point transaction total; summed, feeds the derived average.
pub const KEY_TOT: &str = "Tot";
/// Series key combined pointwise by maximum instead of sum.
pub const KEY_MAX: &str = "Max";
/// Derived series key: never merged, always recomputed from `Sum` and `Tot`.
pub const KEY_AVG: &str = "Avg";

/// Response-time bucket counts keyed by bucket label (e.g. "1s", "3s", "Slow", "Error").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram(pub BTreeMap<String, u64>);

/// Response-time summary for one node, link, agent, or direction sub-key.
///
/// `Avg` is a derived projection: it is serialized for the rendering layer but
/// ignored on input and recomputed from `Sum`/`Tot` after every merge, so a
/// stale or inconsistent incoming average can never leak into the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatistics {
    #[serde(rename = "Tot")]
    pub tot: u64,
    #[serde(rename = "Sum")]
    pub sum: u64,
    #[serde(rename = "Avg", default, skip_deserializing)]
    avg: u64,
    #[serde(rename = "Max")]
    pub max: u64,
}

impl ResponseStatistics {
    pub fn new(tot: u64, sum: u64, max: u64) -> Self {
        let mut stats = ResponseStatistics {
            tot,
            sum,
            avg: 0,
            max,
        };
        stats.refresh_avg();
        stats
    }

    /// Average response time, floor(Sum / Tot); 0 when there are no transactions.
    pub fn avg(&self) -> u64 {
        self.avg
    }

    pub(crate) fn refresh_avg(&mut self) {
        self.avg = if self.tot > 0 { self.sum / self.tot } else { 0 };
    }
}

/// One named series of values index-aligned to the owning snapshot's timestamp axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub key: String,
    pub values: Vec<u64>,
}

impl TimeSeries {
    pub fn new(key: impl Into<String>, values: Vec<u64>) -> Self {
        TimeSeries {
            key: key.into(),
            values,
        }
    }
}
