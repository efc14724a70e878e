// Structural unions: identifier sets, display-name maps, and the nested
// server -> instance lists. Existing entries are never replaced, so a later
// partial snapshot cannot clobber richer data already in the aggregate.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::models::ServerGroup;

/// Ordered-set union; first-seen order is preserved.
pub fn merge_id_set(acc: &mut Vec<String>, inc: Vec<String>) {
    for id in inc {
        if !acc.contains(&id) {
            acc.push(id);
        }
    }
}

/// Union keyed by id; first-seen name wins.
pub fn merge_name_map(acc: &mut BTreeMap<String, String>, inc: BTreeMap<String, String>) {
    for (id, name) in inc {
        acc.entry(id).or_insert(name);
    }
}

/// Union at the server level and, independently, at the instance level.
/// New servers are inserted with their full instance list; for a server
/// present on both sides only missing instances are inserted. An instance's
/// static metadata, once known, does not change.
pub fn merge_server_list(
    acc: &mut BTreeMap<String, ServerGroup>,
    inc: BTreeMap<String, ServerGroup>,
) {
    for (server_key, group) in inc {
        match acc.entry(server_key) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                for (instance_key, instance) in group.instance_list {
                    existing.instance_list.entry(instance_key).or_insert(instance);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(group);
            }
        }
    }
}
