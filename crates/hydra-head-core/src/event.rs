//! Event vocabulary ingested by the transition function (spec §4.1, §6).
//!
//! Every type in this module is generic over the transaction, UTxO, and
//! chain-state families the `Ledger`/`IsChainState` capabilities define
//! (spec §9, "polymorphism over `tx`"). Threading `Tx`/`Utxo`/`CS` as plain
//! type parameters rather than reaching into `L: Ledger` keeps the event
//! vocabulary free of any dependency on a concrete `Ledger` implementation.

use hydra_primitives::prelude::*;
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Re-enqueue counter on a peer message. Starts at [`DEFAULT_TTL`] and is
/// decremented by the shell each time the event is re-enqueued after a
/// `Wait`; at zero the carried payload is treated as expired (spec §4.1).
pub type Ttl = u32;

/// Initial TTL assigned to a freshly received `NetworkEvent`.
pub const DEFAULT_TTL: Ttl = 5;

/// Client input vocabulary (spec §6.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientInput<Tx, Utxo> {
    Init,
    Commit { utxo: Utxo },
    Abort,
    NewTx { tx: Tx },
    Close,
    Contest,
    Fanout,
    GetUTxO,
}

/// Network message vocabulary (spec §6.3).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkMessage<Tx> {
    ReqTx {
        from: Party,
        tx: Tx,
    },
    ReqSn {
        from: Party,
        sn: u64,
        txs: Vec<Tx>,
    },
    AckSn {
        from: Party,
        signature: Buf64,
        sn: u64,
    },
    Connected {
        node_id: Party,
    },
    Disconnected {
        node_id: Party,
    },
}

/// Observed on-chain transactions (spec §6.4).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservedTx<Utxo> {
    OnInitTx {
        contestation_period: std::time::Duration,
        parties: Vec<Party>,
    },
    OnCommitTx {
        party: Party,
        utxo: Utxo,
    },
    OnCollectComTx,
    OnAbortTx,
    OnCloseTx {
        closed_number: u64,
        contestation_deadline: Timestamp,
    },
    OnContestTx {
        contested_number: u64,
    },
    OnFanoutTx,
}

/// On-chain event sources (spec §4.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainEvent<Utxo, CS> {
    Observation {
        observed_tx: ObservedTx<Utxo>,
        new_chain_state: CS,
    },
    Rollback {
        slot: u64,
    },
    Tick {
        time: Timestamp,
    },
}

/// Failure re-ingested from a previously posted chain transaction, so the
/// client can be notified (spec §4.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTxErrorEvent<Tx, Utxo> {
    pub post_chain_tx: crate::effect::PostChainTx<Tx, Utxo>,
    pub post_tx_error: String,
}

/// Top-level event sum (spec §4.1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event<Tx, Utxo, CS> {
    ClientEvent {
        input: ClientInput<Tx, Utxo>,
    },
    NetworkEvent {
        ttl: Ttl,
        message: NetworkMessage<Tx>,
    },
    OnChainEvent {
        chain_event: ChainEvent<Utxo, CS>,
    },
    PostTxError(PostTxErrorEvent<Tx, Utxo>),
}
