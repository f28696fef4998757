//! Effect vocabulary produced by the transition function (spec §4.1, §6).

use hydra_primitives::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    snapshot::ConfirmedSnapshot,
    time::Timestamp,
};

/// Transactions the core asks to have posted on-chain (spec §6.4 "Posted
/// transactions").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostChainTx<Tx, Utxo> {
    InitTx {
        contestation_period: std::time::Duration,
        parties: Vec<Party>,
    },
    CommitTx {
        party: Party,
        utxo: Utxo,
    },
    AbortTx {
        utxo: Utxo,
    },
    CollectComTx {
        utxo: Utxo,
    },
    CloseTx {
        confirmed_snapshot: ConfirmedSnapshot<Tx, Utxo>,
    },
    ContestTx {
        confirmed_snapshot: ConfirmedSnapshot<Tx, Utxo>,
    },
    FanoutTx {
        utxo: Utxo,
        deadline: Timestamp,
    },
}

/// Server output vocabulary delivered to the client API (spec §6.2).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerOutput<Tx, Utxo, ValidationError> {
    PeerConnected { node_id: Party },
    PeerDisconnected { node_id: Party },
    ReadyToCommit { parties: Vec<Party> },
    Committed { party: Party, utxo: Utxo },
    HeadIsOpen { utxo: Utxo },
    HeadIsAborted { utxo: Utxo },
    HeadIsClosed { snapshot_number: u64, contestation_deadline: Timestamp },
    HeadIsContested { snapshot_number: u64 },
    ReadyToFanout,
    HeadIsFinalized { utxo: Utxo },
    TxValid { tx: Tx },
    TxInvalid { utxo: Utxo, tx: Tx, error: ValidationError },
    TxSeen { tx: Tx },
    TxExpired { tx: Tx },
    SnapshotConfirmed { snapshot: crate::snapshot::Snapshot<Tx, Utxo>, multisig: Buf64 },
    GetUTxOResponse { utxo: Utxo },
    CommandFailed { input_description: String },
    PostTxOnChainFailed { post_chain_tx: PostChainTx<Tx, Utxo>, error: String },
    RolledBack,
}

/// Effect vocabulary: what the shell must dispatch (spec §4.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect<Tx, Utxo, CS, ValidationError> {
    ClientEffect(ServerOutput<Tx, Utxo, ValidationError>),
    NetworkEffect(crate::event::NetworkMessage<Tx>),
    OnChainEffect {
        chain_state: CS,
        post_chain_tx: PostChainTx<Tx, Utxo>,
    },
}

impl<Tx, Utxo, CS, ValidationError> Effect<Tx, Utxo, CS, ValidationError> {
    pub fn client(output: ServerOutput<Tx, Utxo, ValidationError>) -> Self {
        Effect::ClientEffect(output)
    }

    pub fn network(message: crate::event::NetworkMessage<Tx>) -> Self {
        Effect::NetworkEffect(message)
    }

    pub fn on_chain(chain_state: CS, post_chain_tx: PostChainTx<Tx, Utxo>) -> Self {
        Effect::OnChainEffect {
            chain_state,
            post_chain_tx,
        }
    }
}

/// Reasons the shell should re-enqueue an event rather than treat it as
/// processed (spec §4.1, §4.4, §4.5).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitReason<ValidationError> {
    WaitOnNotApplicableTx(ValidationError),
    WaitOnSnapshotNumber(u64),
    WaitOnSeenSnapshot,
}

/// Result of one call to the transition function (spec §4.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<S, Tx, Utxo, CS, ValidationError> {
    OnlyEffects(Vec<Effect<Tx, Utxo, CS, ValidationError>>),
    NewState {
        state: Box<S>,
        effects: Vec<Effect<Tx, Utxo, CS, ValidationError>>,
    },
    Wait(WaitReason<ValidationError>),
    Error(crate::errors::LogicError),
}

impl<S, Tx, Utxo, CS, ValidationError> Outcome<S, Tx, Utxo, CS, ValidationError> {
    pub fn only(effects: Vec<Effect<Tx, Utxo, CS, ValidationError>>) -> Self {
        Outcome::OnlyEffects(effects)
    }

    pub fn none() -> Self {
        Outcome::OnlyEffects(Vec::new())
    }

    pub fn new_state(state: S, effects: Vec<Effect<Tx, Utxo, CS, ValidationError>>) -> Self {
        Outcome::NewState {
            state: Box::new(state),
            effects,
        }
    }
}
