//! Common-subset collapsing.
//!
//! When many unrelated targets all depend on the same small set of
//! widely-used targets, drawing every edge clutters the graph; one synthetic
//! hub node standing in for the shared portion carries the same information.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use cmgraph_model::Snapshot;

use crate::markers::FrequentSet;

/// A synthetic grouping node for a recurring frequent-dependency subset.
#[derive(Debug, Clone)]
pub struct Hub {
    /// Member target indices, ascending.
    pub members: Vec<usize>,
    /// How many targets share exactly this subset.
    pub recurrence: usize,
    member_set: HashSet<usize>,
}

impl Hub {
    pub fn is_member(&self, target: usize) -> bool {
        self.member_set.contains(&target)
    }
}

/// Pick the most recurring frequent-dependency subset and accept it as a hub
/// only if both its recurrence and its size strictly exceed `threshold`.
///
/// Targets group by *exactly equal* subsets of frequent dependencies. Only
/// the single best subset is considered per run; ties resolve to the subset
/// seen first in target iteration order, so the pick is deterministic.
pub fn select_hub(snapshot: &Snapshot, frequent: &FrequentSet, threshold: usize) -> Option<Hub> {
    if frequent.is_empty() {
        return None;
    }

    let mut counts: HashMap<BTreeSet<usize>, usize> = HashMap::new();
    let mut order: Vec<BTreeSet<usize>> = Vec::new();

    for (index, target) in snapshot.targets.iter().enumerate() {
        if target.skipped {
            continue;
        }
        let subset: BTreeSet<usize> = snapshot.resolved[index]
            .iter()
            .copied()
            .filter(|dep| frequent.contains(*dep))
            .collect();
        if subset.is_empty() {
            continue;
        }
        match counts.entry(subset) {
            Entry::Occupied(mut entry) => *entry.get_mut() += 1,
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(1);
            }
        }
    }

    let mut best: Option<(&BTreeSet<usize>, usize)> = None;
    for subset in &order {
        let count = counts[subset];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((subset, count));
        }
    }

    let (subset, recurrence) = best?;
    if recurrence <= threshold || subset.len() <= threshold {
        debug!(
            size = subset.len(),
            recurrence, threshold, "no hub: best candidate below threshold"
        );
        return None;
    }

    debug!(size = subset.len(), recurrence, "hub accepted");
    Some(Hub {
        members: subset.iter().copied().collect(),
        recurrence,
        member_set: subset.iter().copied().collect(),
    })
}
