//! Open-phase handlers (spec §4.4, §4.5): the coordinated snapshot
//! sub-protocol and off-chain transaction gossip.

use std::collections::BTreeSet;

use hydra_primitives::prelude::*;
use tracing::debug;

use crate::{
    crypto::SignatureScheme,
    effect::{Effect, PostChainTx, ServerOutput, WaitReason},
    event::NetworkMessage,
    ledger::{IsChainState, Ledger},
    params::{Environment, HeadParameters},
    snapshot::{ConfirmedSnapshot, SeenSnapshot, Snapshot},
    state::{CoordinatedHeadState, HeadState},
    types::{Eff, Out, St},
};

/// The canonical bytes a snapshot's signature is taken over. A snapshot
/// commits to its number and resulting UTxO only — not to the individual
/// transactions, which every party can already reconstruct from `seenTxs` —
/// but we sign the fuller `Snapshot` so a verifier with only the signed
/// payload can still recover what was confirmed.
fn snapshot_signing_payload<Tx: serde::Serialize, Utxo: serde::Serialize>(
    snapshot: &Snapshot<Tx, Utxo>,
) -> Vec<u8> {
    serde_json::to_vec(snapshot).expect("snapshot serialization is infallible")
}

/// Client `NewTx{tx}` (spec §4.4): a pure validity check against the last
/// *confirmed* UTxO, not the speculative `seenUtxo` — and, per spec, no state
/// change either way. The transaction only enters `seenTxs`/`seenUtxo` when
/// it comes back through the network as our own `ReqTx` broadcast (handled
/// by [`on_network_req_tx`]), exactly like every other party sees it.
pub fn on_client_new_tx<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    coordinated: &CoordinatedHeadState<L::Tx, L::UTxO>,
    tx: L::Tx,
) -> Out<L, CS> {
    match ledger.can_apply(coordinated.confirmed_snapshot.utxo(), &tx) {
        Ok(()) => {
            let effects: Vec<Eff<L, CS>> = vec![
                Effect::client(ServerOutput::TxValid { tx: tx.clone() }),
                Effect::network(NetworkMessage::ReqTx {
                    from: env.party,
                    tx,
                }),
            ];
            Out::<L, CS>::only(effects)
        }
        Err(error) => {
            let utxo = coordinated.confirmed_snapshot.utxo().clone();
            Out::<L, CS>::only(vec![Effect::client(ServerOutput::TxInvalid {
                utxo,
                tx,
                error,
            })])
        }
    }
}

/// Network `ReqTx{from, tx}` (spec §4.4). Re-validation failures come back
/// as `Wait` rather than `TxInvalid`: causal ordering over an unordered
/// transport means a peer's transaction can legitimately arrive before one
/// of its inputs, and the shell is expected to re-enqueue with a decremented
/// ttl (spec §4.1) before the core gives up and calls it invalid.
pub fn on_network_req_tx<L: Ledger, CS: IsChainState>(
    ledger: &L,
    parameters: HeadParameters,
    mut coordinated: CoordinatedHeadState<L::Tx, L::UTxO>,
    predecessor: St<L, CS>,
    chain_state: CS,
    tx: L::Tx,
) -> Out<L, CS> {
    match ledger.apply_transactions(&coordinated.seen_utxo, std::slice::from_ref(&tx)) {
        Ok(new_utxo) => {
            coordinated.seen_utxo = new_utxo;
            coordinated.seen_txs.push(tx.clone());
            let effect: Eff<L, CS> = Effect::client(ServerOutput::TxSeen { tx });
            let new_state = HeadState::Open {
                parameters,
                coordinated,
                predecessor: Box::new(predecessor),
                chain_state,
            };
            Out::<L, CS>::new_state(new_state, vec![effect])
        }
        Err(error) => Out::<L, CS>::Wait(WaitReason::WaitOnNotApplicableTx(error)),
    }
}

/// A `ReqTx` whose ttl has just run out without ever applying (spec §4.1):
/// give up and tell the client instead of re-enqueuing again.
pub fn on_req_tx_expired<L: Ledger, CS: IsChainState>(tx: L::Tx) -> Out<L, CS> {
    Out::<L, CS>::only(vec![Effect::client(ServerOutput::TxExpired { tx })])
}

/// Network `ReqSn{from, sn, txs}` (spec §4.5): a three-way partition on
/// `(sn, isLeader(from, sn), seenSnapshot)`.
///
/// 1. *Accept-and-sign*: `sn = c + 1`, `from` leads `sn`, and we aren't
///    already collecting — apply `txs` to the confirmed UTxO, sign the
///    result, start collecting, and ack.
/// 2. *Future request*: `sn > c` and `from` leads `sn`, but (1) doesn't hold
///    because we're mid-round — `Wait` (or `Error` if the round in flight is
///    for this exact `sn`, which would mean a duplicate/illegal re-request).
/// 3. *Anything else* (stale `sn`, or `from` isn't `sn`'s leader) is a hard
///    protocol violation.
#[allow(clippy::too_many_arguments)]
pub fn on_network_req_sn<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    sigs: &impl SignatureScheme,
    parameters: HeadParameters,
    mut coordinated: CoordinatedHeadState<L::Tx, L::UTxO>,
    predecessor: St<L, CS>,
    chain_state: CS,
    from: Party,
    sn: u64,
    txs: Vec<L::Tx>,
) -> Out<L, CS> {
    let c = coordinated.confirmed_snapshot.number();

    if sn <= c || !parameters.is_leader(&from, sn) {
        return Out::<L, CS>::Error(crate::errors::LogicError::invalid_event(
            format!("ReqSn{{from: {from:?}, sn: {sn}}}"),
            "Open",
        ));
    }

    let is_collecting = matches!(&coordinated.seen_snapshot, SeenSnapshot::Collecting { .. });
    if sn != c + 1 || is_collecting {
        return match &coordinated.seen_snapshot {
            SeenSnapshot::Collecting { snapshot, .. } if snapshot.number == sn => {
                Out::<L, CS>::Error(crate::errors::LogicError::invalid_event(
                    format!("ReqSn{{from: {from:?}, sn: {sn}}}"),
                    "Open(Collecting)",
                ))
            }
            SeenSnapshot::Collecting { snapshot, .. } => {
                Out::<L, CS>::Wait(WaitReason::WaitOnSnapshotNumber(snapshot.number))
            }
            SeenSnapshot::None | SeenSnapshot::Requested => {
                Out::<L, CS>::Wait(WaitReason::WaitOnSeenSnapshot)
            }
        };
    }

    match ledger.apply_transactions(coordinated.confirmed_snapshot.utxo(), &txs) {
        Ok(new_utxo) => {
            let snapshot = Snapshot::new(sn, new_utxo, txs.clone());
            let payload = snapshot_signing_payload(&snapshot);
            let own_signature = sigs.sign(&env.signing_key, &payload);

            let mut signatures = std::collections::BTreeMap::new();
            signatures.insert(env.party, own_signature.clone());
            coordinated.seen_snapshot = SeenSnapshot::Collecting {
                snapshot,
                signatures,
            };

            let effect: Eff<L, CS> = Effect::network(NetworkMessage::AckSn {
                from: env.party,
                signature: own_signature,
                sn,
            });
            let new_state = HeadState::Open {
                parameters,
                coordinated,
                predecessor: Box::new(predecessor),
                chain_state,
            };
            Out::<L, CS>::new_state(new_state, vec![effect])
        }
        Err(error) => Out::<L, CS>::Wait(WaitReason::WaitOnNotApplicableTx(error)),
    }
}

/// Network `AckSn{from, signature, sn}` (spec §4.5): fold the signature into
/// the snapshot we're collecting for `sn`, and confirm once every party has
/// signed.
#[allow(clippy::too_many_arguments)]
pub fn on_network_ack_sn<L: Ledger, CS: IsChainState>(
    sigs: &impl SignatureScheme,
    parameters: HeadParameters,
    mut coordinated: CoordinatedHeadState<L::Tx, L::UTxO>,
    predecessor: St<L, CS>,
    chain_state: CS,
    from: Party,
    signature: Buf64,
    sn: u64,
) -> Out<L, CS> {
    let SeenSnapshot::Collecting {
        snapshot,
        mut signatures,
    } = coordinated.seen_snapshot.clone()
    else {
        return Out::<L, CS>::Wait(WaitReason::WaitOnSeenSnapshot);
    };
    if snapshot.number != sn {
        return Out::<L, CS>::Wait(WaitReason::WaitOnSnapshotNumber(snapshot.number));
    }

    let payload = snapshot_signing_payload(&snapshot);
    if !sigs.verify(from.vkey(), &signature, &payload) {
        debug!(?from, sn, "dropping AckSn with invalid signature");
        return Out::<L, CS>::none();
    }
    signatures.insert(from, signature);

    let expected: BTreeSet<Party> = parameters.parties.iter().copied().collect();
    let have: BTreeSet<Party> = signatures.keys().copied().collect();

    if expected != have {
        coordinated.seen_snapshot = SeenSnapshot::Collecting {
            snapshot,
            signatures,
        };
        let new_state = HeadState::Open {
            parameters,
            coordinated,
            predecessor: Box::new(predecessor),
            chain_state,
        };
        return Out::<L, CS>::new_state(new_state, Vec::new());
    }

    let ordered_signatures: Vec<Buf64> = parameters
        .parties
        .iter()
        .map(|party| signatures.get(party).expect("all parties signed").clone())
        .collect();
    let multisig = sigs.aggregate_in_order(&ordered_signatures);

    debug!(sn, "snapshot confirmed");
    coordinated
        .seen_txs
        .retain(|tx| !snapshot.confirmed.contains(tx));
    coordinated.confirmed_snapshot = ConfirmedSnapshot::Confirmed {
        snapshot: snapshot.clone(),
        multisig: multisig.clone(),
    };
    coordinated.seen_snapshot = SeenSnapshot::None;

    let effect: Eff<L, CS> = Effect::client(ServerOutput::SnapshotConfirmed { snapshot, multisig });
    let new_state = HeadState::Open {
        parameters,
        coordinated,
        predecessor: Box::new(predecessor),
        chain_state,
    };
    Out::<L, CS>::new_state(new_state, vec![effect])
}

/// Client `Close` (spec §4.4, §4.6): post the best confirmed snapshot we
/// have as `CloseTx`.
pub fn on_client_close<L: Ledger, CS: IsChainState>(
    chain_state: &CS,
    confirmed_snapshot: ConfirmedSnapshot<L::Tx, L::UTxO>,
) -> Out<L, CS> {
    let effect: Eff<L, CS> = Effect::on_chain(
        chain_state.clone(),
        PostChainTx::CloseTx { confirmed_snapshot },
    );
    Out::<L, CS>::only(vec![effect])
}
