// Topology snapshot models: nodes (services), links (calls), server groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Histogram, ResponseStatistics, TimeSeries};

/// Milliseconds since epoch. Snapshot axes are strictly increasing.
pub type Timestamp = i64;

/// One polling cycle's full topology payload: a shared timestamp axis plus
/// per-node and per-link statistics, all series index-aligned to the axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopologySnapshot {
    pub timestamps: Vec<Timestamp>,
    pub nodes: BTreeMap<String, NodeData>,
    pub links: BTreeMap<String, LinkData>,
}

/// Statistics for one service in the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
    pub has_alert: bool,
    pub slow_count: u64,
    pub error_count: u64,
    pub total_count: u64,
    pub instance_count: u64,
    pub instance_error_count: u64,
    /// Ordered set, first-seen order preserved.
    pub agent_ids: Vec<String>,
    pub agent_id_name_map: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_statistics: Option<ResponseStatistics>,
    pub agent_histogram: BTreeMap<String, Histogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series_histogram: Option<Vec<TimeSeries>>,
    pub agent_time_series_histogram: BTreeMap<String, Vec<TimeSeries>>,
    pub server_list: BTreeMap<String, ServerGroup>,
}

/// Statistics for one directed call relationship between two services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkData {
    pub has_alert: bool,
    pub slow_count: u64,
    pub error_count: u64,
    pub total_count: u64,
    /// Caller-side agent ids; ordered set like `NodeData::agent_ids`.
    pub from_agent: Vec<String>,
    pub to_agent: Vec<String>,
    pub from_agent_id_name_map: BTreeMap<String, String>,
    pub to_agent_id_name_map: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_statistics: Option<ResponseStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series_histogram: Option<Vec<TimeSeries>>,
    pub source_time_series_histogram: BTreeMap<String, Vec<TimeSeries>>,
    pub source_histogram: BTreeMap<String, Histogram>,
    pub target_histogram: BTreeMap<String, Histogram>,
    pub source_response_statistics: BTreeMap<String, ResponseStatistics>,
    pub target_response_statistics: BTreeMap<String, ResponseStatistics>,
}

/// One server (host) entry: a set of instances plus opaque display metadata.
/// Instance payloads are static metadata the engine never rewrites once seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerGroup {
    pub name: String,
    pub instance_list: BTreeMap<String, serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
