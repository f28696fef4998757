//! Snapshots: numbered, signed agreements on the off-chain ledger state
//! (spec §3.4).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hydra_primitives::prelude::*;

/// A numbered ledger-state agreement plus the transactions applied to reach
/// it since the previous snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<Tx, Utxo> {
    pub number: u64,
    pub utxo: Utxo,
    pub confirmed: Vec<Tx>,
}

impl<Tx, Utxo> Snapshot<Tx, Utxo> {
    pub fn new(number: u64, utxo: Utxo, confirmed: Vec<Tx>) -> Self {
        Self {
            number,
            utxo,
            confirmed,
        }
    }
}

/// Either the unsigned initial snapshot (number 0, no signatures required)
/// or a snapshot bundled with its aggregated multisignature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmedSnapshot<Tx, Utxo> {
    Initial { utxo: Utxo },
    Confirmed { snapshot: Snapshot<Tx, Utxo>, multisig: Buf64 },
}

impl<Tx, Utxo: Clone> ConfirmedSnapshot<Tx, Utxo> {
    pub fn number(&self) -> u64 {
        match self {
            ConfirmedSnapshot::Initial { .. } => 0,
            ConfirmedSnapshot::Confirmed { snapshot, .. } => snapshot.number,
        }
    }

    pub fn utxo(&self) -> &Utxo {
        match self {
            ConfirmedSnapshot::Initial { utxo } => utxo,
            ConfirmedSnapshot::Confirmed { snapshot, .. } => &snapshot.utxo,
        }
    }
}

/// What we've seen toward the *next* snapshot above `confirmed_snapshot`
/// (spec §3.3).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeenSnapshot<Tx, Utxo> {
    None,
    Requested,
    Collecting {
        snapshot: Snapshot<Tx, Utxo>,
        signatures: BTreeMap<Party, Buf64>,
    },
}

impl<Tx, Utxo> SeenSnapshot<Tx, Utxo> {
    pub fn is_collecting_for(&self, sn: u64) -> bool {
        matches!(self, SeenSnapshot::Collecting { snapshot, .. } if snapshot.number == sn)
    }
}
