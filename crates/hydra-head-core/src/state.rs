//! The four-phase head state (spec §3.2) and the coordinated off-chain
//! ledger view it carries while `Open` (spec §3.3).

use std::collections::{BTreeMap, BTreeSet};

use hydra_primitives::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    params::HeadParameters,
    snapshot::{ConfirmedSnapshot, SeenSnapshot},
    time::Timestamp,
};

/// The off-chain ledger view held while the head is `Open` (spec §3.3).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatedHeadState<Tx, Utxo> {
    /// The UTxO set obtained by applying all of `seen_txs` to
    /// `confirmed_snapshot`'s UTxO.
    pub seen_utxo: Utxo,
    /// Transactions observed since the last confirmed snapshot, in receipt
    /// order. Never contains a transaction already in
    /// `confirmed_snapshot.confirmed` (spec invariant §3.3/§8.6).
    pub seen_txs: Vec<Tx>,
    pub confirmed_snapshot: ConfirmedSnapshot<Tx, Utxo>,
    pub seen_snapshot: SeenSnapshot<Tx, Utxo>,
}

impl<Tx, Utxo> CoordinatedHeadState<Tx, Utxo> {
    /// The coordinated state for a freshly opened head: `u0` carrying the
    /// union of committed UTxOs, snapshot number 0, nothing seen yet.
    pub fn fresh(u0: Utxo) -> Self {
        Self {
            seen_utxo: u0.clone(),
            seen_txs: Vec::new(),
            confirmed_snapshot: ConfirmedSnapshot::Initial { utxo: u0 },
            seen_snapshot: SeenSnapshot::None,
        }
    }
}

/// The four-phase head state (spec §3.2). Each non-`Idle` variant owns its
/// predecessor as a `Box`, forming a strictly chain-slot-decreasing linked
/// list that terminates at `Idle` — modeled here as `None` rather than a
/// literal self-referential `Idle -> Idle` edge, since Rust has no cheap way
/// to make an owned value point at itself; the two are equivalent for the
/// rollback walk in `crate::rollback`, which simply stops when there's no
/// predecessor left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadState<Tx, Utxo, CS> {
    Idle {
        chain_state: CS,
    },
    Initial {
        parameters: HeadParameters,
        pending_commits: BTreeSet<Party>,
        committed: BTreeMap<Party, Utxo>,
        predecessor: Box<HeadState<Tx, Utxo, CS>>,
        chain_state: CS,
    },
    Open {
        parameters: HeadParameters,
        coordinated: CoordinatedHeadState<Tx, Utxo>,
        predecessor: Box<HeadState<Tx, Utxo, CS>>,
        chain_state: CS,
    },
    Closed {
        parameters: HeadParameters,
        confirmed_snapshot: ConfirmedSnapshot<Tx, Utxo>,
        contestation_deadline: Timestamp,
        ready_to_fanout_sent: bool,
        predecessor: Box<HeadState<Tx, Utxo, CS>>,
        chain_state: CS,
    },
}

impl<Tx, Utxo, CS> HeadState<Tx, Utxo, CS> {
    pub fn chain_state(&self) -> &CS {
        match self {
            HeadState::Idle { chain_state }
            | HeadState::Initial { chain_state, .. }
            | HeadState::Open { chain_state, .. }
            | HeadState::Closed { chain_state, .. } => chain_state,
        }
    }

    /// The immediately preceding recoverable state, or `None` for `Idle`
    /// (spec §3.2's fixed point).
    pub fn predecessor(&self) -> Option<&HeadState<Tx, Utxo, CS>> {
        match self {
            HeadState::Idle { .. } => None,
            HeadState::Initial { predecessor, .. }
            | HeadState::Open { predecessor, .. }
            | HeadState::Closed { predecessor, .. } => Some(predecessor),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, HeadState::Idle { .. })
    }

    pub fn as_open(&self) -> Option<(&HeadParameters, &CoordinatedHeadState<Tx, Utxo>)> {
        match self {
            HeadState::Open {
                parameters,
                coordinated,
                ..
            } => Some((parameters, coordinated)),
            _ => None,
        }
    }
}
