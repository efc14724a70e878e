// Domain models (wire shapes ported from the dashboard payload)

mod statistics;
mod topology;

pub use statistics::{
    Histogram, KEY_AVG, KEY_MAX, KEY_SUM, KEY_TOT, ResponseStatistics, TimeSeries,
};
pub use topology::{LinkData, NodeData, ServerGroup, Timestamp, TopologySnapshot};
