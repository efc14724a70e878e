// Topology-map merge engine: folds service-map polling snapshots into one
// running aggregate for a long-lived dashboard session.

pub mod merge;
pub mod models;
pub mod session;
