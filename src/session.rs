// Session-side accumulator: owns the running aggregate for one application
// and enforces the snapshot-arrival-order precondition the merge engine
// relies on. The engine itself performs no locking; callers with several
// snapshot sources serialize through one session.

use std::collections::HashMap;
use std::collections::btree_map::Entry;

use thiserror::Error;
use tracing::debug;

use crate::merge;
use crate::models::TopologySnapshot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The accumulator's timestamp axis is canonical; a snapshot applied out
    /// of order would silently lose points, so it is rejected instead.
    #[error(
        "snapshot sequence {incoming} is not after {last}; snapshots must merge in arrival order"
    )]
    OutOfOrder { last: u64, incoming: u64 },
}

/// Running aggregate for one application over one dashboard session.
#[derive(Debug, Default)]
pub struct MergeSession {
    last_seq: Option<u64>,
    aggregate: Option<TopologySnapshot>,
}

impl MergeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one polling snapshot into the aggregate. `seq` must be strictly
    /// greater than the previous call's sequence. The first snapshot is
    /// adopted wholesale (its axis becomes the session's canonical axis);
    /// later ones merge entry by entry, and node/link keys new to the
    /// aggregate are adopted with their series realigned to that axis.
    pub fn apply(&mut self, seq: u64, incoming: TopologySnapshot) -> Result<(), SessionError> {
        if let Some(last) = self.last_seq
            && seq <= last
        {
            return Err(SessionError::OutOfOrder {
                last,
                incoming: seq,
            });
        }
        self.last_seq = Some(seq);

        match self.aggregate.as_mut() {
            None => {
                let mut snapshot = incoming;
                merge::refresh_derived(&mut snapshot);
                debug!(
                    seq,
                    nodes = snapshot.nodes.len(),
                    links = snapshot.links.len(),
                    "adopted first snapshot"
                );
                self.aggregate = Some(snapshot);
            }
            Some(acc) => {
                let TopologySnapshot {
                    timestamps,
                    nodes,
                    links,
                } = acc;
                let axis = timestamps.as_slice();
                let inc_axis = incoming.timestamps;
                let (node_count, link_count) = (incoming.nodes.len(), incoming.links.len());

                for (key, node) in incoming.nodes {
                    match nodes.entry(key) {
                        Entry::Occupied(mut entry) => {
                            merge::merge_node(entry.get_mut(), axis, node, &inc_axis);
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(merge::adopt_node(node, &inc_axis, axis));
                        }
                    }
                }
                for (key, link) in incoming.links {
                    match links.entry(key) {
                        Entry::Occupied(mut entry) => {
                            merge::merge_link(entry.get_mut(), axis, link, &inc_axis);
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(merge::adopt_link(link, &inc_axis, axis));
                        }
                    }
                }
                debug!(seq, nodes = node_count, links = link_count, "merged snapshot");
            }
        }
        Ok(())
    }

    /// Read-only view for the rendering layer.
    pub fn aggregate(&self) -> Option<&TopologySnapshot> {
        self.aggregate.as_ref()
    }

    pub fn last_sequence(&self) -> Option<u64> {
        self.last_seq
    }

    /// Drops the aggregate, e.g. when the dashboard's time window resets.
    pub fn reset(&mut self) {
        self.last_seq = None;
        self.aggregate = None;
    }
}

/// Session cache keyed by application id, the typical owner of accumulators
/// for a multi-application dashboard.
#[derive(Debug, Default)]
pub struct SessionCache {
    sessions: HashMap<String, MergeSession>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(
        &mut self,
        application_id: &str,
        seq: u64,
        snapshot: TopologySnapshot,
    ) -> Result<(), SessionError> {
        self.sessions
            .entry(application_id.to_string())
            .or_default()
            .apply(seq, snapshot)
    }

    pub fn aggregate(&self, application_id: &str) -> Option<&TopologySnapshot> {
        self.sessions
            .get(application_id)
            .and_then(MergeSession::aggregate)
    }

    pub fn evict(&mut self, application_id: &str) -> bool {
        self.sessions.remove(application_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
