//! Rollback resolution (spec §4.8): recovering from an L1 reorg by walking
//! the predecessor chain back to the deepest state still valid at the
//! rolled-back chain tip.
//!
//! Grounded on the predecessor/back-pointer walk in
//! `strata-consensus-logic`'s `reorg::compute_reorg`, adapted to a single
//! linked list (this core only ever keeps one predecessor per state, not a
//! full fork-choice tree) rather than a down/pivot/up triple.

use crate::{
    effect::{Effect, ServerOutput},
    ledger::{IsChainState, Ledger},
    types::{Out, St},
};

/// Walks backward from `state` through its predecessor chain until it finds
/// one whose chain state is at or behind `target_slot`, and makes that the
/// new current state. If `state` itself already satisfies that, nothing
/// changes (spec §4.8: a rollback to a slot we haven't advanced past yet is
/// a no-op).
pub fn resolve_rollback<L: Ledger, CS: IsChainState>(state: St<L, CS>, target_slot: u64) -> Out<L, CS> {
    if state.chain_state().slot() <= target_slot {
        return Out::<L, CS>::none();
    }

    let mut cursor = &state;
    let restored = loop {
        match cursor.predecessor() {
            Some(predecessor) => {
                if predecessor.chain_state().slot() <= target_slot {
                    break predecessor.clone();
                }
                cursor = predecessor;
            }
            None => break cursor.clone(),
        }
    };

    Out::<L, CS>::new_state(restored, vec![Effect::client(ServerOutput::RolledBack)])
}
