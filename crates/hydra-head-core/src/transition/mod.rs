//! The top-level transition function (spec §4): `(Environment, Ledger,
//! HeadState, Event) -> Outcome`. This module owns only the dispatch — every
//! phase's actual handling lives in its own submodule.

mod closed;
mod idle;
mod initial;
mod open;

use std::fmt::Debug;

use crate::{
    effect::{Effect, ServerOutput},
    event::{ChainEvent, ClientInput, Event, NetworkMessage, ObservedTx, PostTxErrorEvent},
    ledger::{IsChainState, Ledger},
    params::Environment,
    state::HeadState,
    time::Timestamp,
    types::{Ev, Out, St},
};

/// Entry point: dispatches on the event kind first, then on `(state,
/// payload)` within each handler. Combinations with no defined behavior fall
/// through to `Outcome::none()` (spec §7: "Uncategorized (state, event)
/// pairs default to OnlyEffects([])").
pub fn dispatch_event<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    sigs: &impl crate::crypto::SignatureScheme,
    state: St<L, CS>,
    event: Ev<L, CS>,
) -> Out<L, CS> {
    match event {
        Event::ClientEvent { input } => dispatch_client_event(env, ledger, state, input),
        Event::NetworkEvent { ttl, message } => {
            dispatch_network_event(env, ledger, sigs, state, ttl, message)
        }
        Event::OnChainEvent { chain_event } => dispatch_chain_event(env, ledger, state, chain_event),
        Event::PostTxError(post_tx_error) => dispatch_post_tx_error(state, post_tx_error),
    }
}

/// A client input the current phase has no handler for (spec §4.3's "any
/// other client input yields CommandFailed", generalized to every phase).
fn command_failed<L: Ledger, CS: IsChainState>(input: impl Debug) -> Out<L, CS> {
    Out::<L, CS>::only(vec![Effect::client(ServerOutput::CommandFailed {
        input_description: format!("{input:?}"),
    })])
}

fn dispatch_client_event<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    state: St<L, CS>,
    input: ClientInput<L::Tx, L::UTxO>,
) -> Out<L, CS> {
    match (state, input) {
        (HeadState::Idle { chain_state }, ClientInput::Init) => {
            idle::on_client_init::<L, CS>(env, &chain_state)
        }
        (
            HeadState::Initial { chain_state, pending_commits, .. },
            ClientInput::Commit { utxo },
        ) => initial::on_client_commit::<L, CS>(env, &chain_state, &pending_commits, utxo),
        (HeadState::Initial { chain_state, committed, .. }, ClientInput::Abort) => {
            initial::on_client_abort::<L, CS>(ledger, &chain_state, &committed)
        }
        (HeadState::Initial { committed, .. }, ClientInput::GetUTxO) => {
            initial::on_client_get_utxo::<L, CS>(ledger, &committed)
        }
        (HeadState::Open { coordinated, .. }, ClientInput::GetUTxO) => {
            Out::<L, CS>::only(vec![Effect::client(ServerOutput::GetUTxOResponse {
                utxo: coordinated.seen_utxo,
            })])
        }
        (HeadState::Open { coordinated, .. }, ClientInput::NewTx { tx }) => {
            open::on_client_new_tx::<L, CS>(env, ledger, &coordinated, tx)
        }
        (HeadState::Open { chain_state, coordinated, .. }, ClientInput::Close) => {
            open::on_client_close::<L, CS>(&chain_state, coordinated.confirmed_snapshot)
        }
        (HeadState::Closed { chain_state, confirmed_snapshot, .. }, ClientInput::Contest) => {
            closed::on_client_contest::<L, CS>(&chain_state, confirmed_snapshot)
        }
        (
            HeadState::Closed { chain_state, confirmed_snapshot, contestation_deadline, .. },
            ClientInput::Fanout,
        ) => closed::on_client_fanout::<L, CS>(
            &chain_state,
            &confirmed_snapshot,
            contestation_deadline,
        ),
        (HeadState::Closed { confirmed_snapshot, .. }, ClientInput::GetUTxO) => {
            Out::<L, CS>::only(vec![Effect::client(ServerOutput::GetUTxOResponse {
                utxo: confirmed_snapshot.utxo().clone(),
            })])
        }
        (_state, other) => command_failed::<L, CS>(other),
    }
}

fn dispatch_network_event<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    sigs: &impl crate::crypto::SignatureScheme,
    state: St<L, CS>,
    ttl: u32,
    message: NetworkMessage<L::Tx>,
) -> Out<L, CS> {
    let predecessor = state.clone();
    match (state, message) {
        (
            HeadState::Open { parameters, coordinated, chain_state, .. },
            NetworkMessage::ReqTx { tx, .. },
        ) => {
            if ttl == 0 {
                open::on_req_tx_expired::<L, CS>(tx)
            } else {
                open::on_network_req_tx::<L, CS>(
                    ledger,
                    parameters,
                    coordinated,
                    predecessor,
                    chain_state,
                    tx,
                )
            }
        }
        (
            HeadState::Open { parameters, coordinated, chain_state, .. },
            NetworkMessage::ReqSn { from, sn, txs },
        ) => open::on_network_req_sn::<L, CS>(
            env,
            ledger,
            sigs,
            parameters,
            coordinated,
            predecessor,
            chain_state,
            from,
            sn,
            txs,
        ),
        (
            HeadState::Open { parameters, coordinated, chain_state, .. },
            NetworkMessage::AckSn { from, signature, sn },
        ) => open::on_network_ack_sn::<L, CS>(
            sigs,
            parameters,
            coordinated,
            predecessor,
            chain_state,
            from,
            signature,
            sn,
        ),
        (_state, NetworkMessage::Connected { node_id }) => {
            Out::<L, CS>::only(vec![Effect::client(ServerOutput::PeerConnected { node_id })])
        }
        (_state, NetworkMessage::Disconnected { node_id }) => {
            Out::<L, CS>::only(vec![Effect::client(ServerOutput::PeerDisconnected { node_id })])
        }
        (_state, _message) => Out::<L, CS>::none(),
    }
}

fn dispatch_chain_event<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    state: St<L, CS>,
    chain_event: ChainEvent<L::UTxO, CS>,
) -> Out<L, CS> {
    match chain_event {
        ChainEvent::Observation { observed_tx, new_chain_state } => {
            dispatch_observation(env, ledger, state, observed_tx, new_chain_state)
        }
        ChainEvent::Rollback { slot } => crate::rollback::resolve_rollback::<L, CS>(state, slot),
        ChainEvent::Tick { time } => dispatch_tick::<L, CS>(state, time),
    }
}

fn dispatch_observation<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    state: St<L, CS>,
    observed_tx: ObservedTx<L::UTxO>,
    new_chain_state: CS,
) -> Out<L, CS> {
    let predecessor = state.clone();
    match (state, observed_tx) {
        (HeadState::Idle { .. }, ObservedTx::OnInitTx { contestation_period, parties }) => {
            idle::on_init_tx::<L, CS>(predecessor, contestation_period, parties, new_chain_state)
        }
        (
            HeadState::Initial { parameters, pending_commits, committed, .. },
            ObservedTx::OnCommitTx { party, utxo },
        ) => {
            if pending_commits.contains(&party) {
                initial::on_commit_tx::<L, CS>(
                    env,
                    ledger,
                    parameters,
                    &pending_commits,
                    &committed,
                    predecessor,
                    party,
                    utxo,
                    new_chain_state,
                )
            } else {
                initial::on_stray_commit_tx::<L, CS>()
            }
        }
        (HeadState::Initial { parameters, committed, .. }, ObservedTx::OnCollectComTx) => {
            initial::on_collect_com_tx::<L, CS>(ledger, parameters, &committed, predecessor, new_chain_state)
        }
        (HeadState::Initial { committed, .. }, ObservedTx::OnAbortTx) => {
            initial::on_abort_tx::<L, CS>(ledger, &committed, new_chain_state)
        }
        (
            HeadState::Open { parameters, coordinated, .. },
            ObservedTx::OnCloseTx { closed_number, contestation_deadline },
        ) => closed::on_close_tx::<L, CS>(
            parameters,
            coordinated,
            predecessor,
            new_chain_state,
            closed_number,
            contestation_deadline,
        ),
        (
            HeadState::Closed { chain_state, confirmed_snapshot, .. },
            ObservedTx::OnContestTx { contested_number },
        ) => closed::on_contest_tx::<L, CS>(&chain_state, &confirmed_snapshot, contested_number),
        (HeadState::Closed { confirmed_snapshot, .. }, ObservedTx::OnFanoutTx) => {
            closed::on_fanout_tx::<L, CS>(confirmed_snapshot, new_chain_state)
        }
        (_state, _observed_tx) => Out::<L, CS>::none(),
    }
}

fn dispatch_tick<L: Ledger, CS: IsChainState>(state: St<L, CS>, time: Timestamp) -> Out<L, CS> {
    let predecessor = state.clone();
    match state {
        HeadState::Closed {
            parameters,
            confirmed_snapshot,
            contestation_deadline,
            ready_to_fanout_sent,
            chain_state,
            ..
        } => closed::on_tick::<L, CS>(
            parameters,
            confirmed_snapshot,
            contestation_deadline,
            ready_to_fanout_sent,
            predecessor,
            chain_state,
            time,
        ),
        _ => Out::<L, CS>::none(),
    }
}

fn dispatch_post_tx_error<L: Ledger, CS: IsChainState>(
    _state: St<L, CS>,
    post_tx_error: PostTxErrorEvent<L::Tx, L::UTxO>,
) -> Out<L, CS> {
    Out::<L, CS>::only(vec![Effect::client(ServerOutput::PostTxOnChainFailed {
        post_chain_tx: post_tx_error.post_chain_tx,
        error: post_tx_error.post_tx_error,
    })])
}
