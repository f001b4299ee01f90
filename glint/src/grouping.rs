//! Grouping of collected minings by document position.

use crate::{mining::CodeMining, position::Position};
use smallvec::SmallVec;
use std::sync::Arc;

/// Per-group mining storage. Most positions carry one or two minings.
pub type GroupMinings = SmallVec<[Arc<dyn CodeMining>; 2]>;

/// An ordered list of minings sharing one position.
pub struct MiningGroup {
    pub position: Position,
    pub minings: GroupMinings,
}

/// Partition `minings` by equal `(offset, length)` position.
///
/// Input entries carry the rank of their producing provider (its index in the
/// manager's registered provider list). The result iterates in ascending
/// position order; within each group, minings are ordered by ascending
/// provider rank, ties preserving original relative order (the sort is
/// stable).
pub fn group_by_position(mut minings: Vec<(usize, Arc<dyn CodeMining>)>) -> Vec<MiningGroup> {
    minings.sort_by_key(|(rank, mining)| (mining.position(), *rank));

    let mut groups: Vec<MiningGroup> = Vec::new();
    for (_, mining) in minings {
        let position = mining.position();
        if let Some(group) = groups.last_mut() {
            if group.position == position {
                group.minings.push(mining);
                continue;
            }
        }
        groups.push(MiningGroup {
            position,
            minings: GroupMinings::from_iter([mining]),
        });
    }
    groups
}
