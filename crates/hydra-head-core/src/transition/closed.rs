//! Closed-phase handlers and the Open -> Closed boundary (spec §4.6).

use tracing::debug;

use crate::{
    effect::{Effect, PostChainTx, ServerOutput},
    ledger::{IsChainState, Ledger},
    params::HeadParameters,
    snapshot::ConfirmedSnapshot,
    state::{CoordinatedHeadState, HeadState},
    time::Timestamp,
    types::{Eff, Out, St},
};

/// Observation `OnCloseTx{closed_number, contestation_deadline}` (spec
/// §4.6): Open -> Closed. If the number the chain just closed with is behind
/// our own best confirmed snapshot, we hold a strictly newer agreement than
/// what's on chain, so we immediately post a `ContestTx` with it rather than
/// waiting for the client to notice and contest manually.
pub fn on_close_tx<L: Ledger, CS: IsChainState>(
    parameters: HeadParameters,
    coordinated: CoordinatedHeadState<L::Tx, L::UTxO>,
    predecessor: St<L, CS>,
    new_chain_state: CS,
    closed_number: u64,
    contestation_deadline: Timestamp,
) -> Out<L, CS> {
    let confirmed_snapshot = coordinated.confirmed_snapshot;

    let mut effects: Vec<Eff<L, CS>> = vec![Effect::client(ServerOutput::HeadIsClosed {
        snapshot_number: closed_number,
        contestation_deadline,
    })];

    if confirmed_snapshot.number() > closed_number {
        debug!(
            closed_number,
            our_number = confirmed_snapshot.number(),
            "closed with a stale snapshot, contesting"
        );
        // The close tx itself consumes the post-close state on chain, so the
        // contest must be submitted against the *pre-close* chain state, not
        // `new_chain_state` (spec §4.6, §9).
        effects.push(Effect::on_chain(
            predecessor.chain_state().clone(),
            PostChainTx::ContestTx {
                confirmed_snapshot: confirmed_snapshot.clone(),
            },
        ));
    }

    let new_state = HeadState::Closed {
        parameters,
        confirmed_snapshot,
        contestation_deadline,
        ready_to_fanout_sent: false,
        predecessor: Box::new(predecessor),
        chain_state: new_chain_state,
    };
    Out::<L, CS>::new_state(new_state, effects)
}

/// Client `Contest` (spec §4.4, §4.6): post our own confirmed snapshot as a
/// `ContestTx`, same shape as the automatic contest in [`on_close_tx`].
pub fn on_client_contest<L: Ledger, CS: IsChainState>(
    chain_state: &CS,
    confirmed_snapshot: ConfirmedSnapshot<L::Tx, L::UTxO>,
) -> Out<L, CS> {
    let effect: Eff<L, CS> = Effect::on_chain(
        chain_state.clone(),
        PostChainTx::ContestTx { confirmed_snapshot },
    );
    Out::<L, CS>::only(vec![effect])
}

/// Observation `OnContestTx{contested_number}` (spec §4.6). Compares the
/// number the chain just saw against our own confirmed snapshot: if ours is
/// strictly newer, the contest that just landed on chain is already stale,
/// so we re-post our own `ContestTx` alongside the client notification.
/// Otherwise the chain's view already matches or beats ours and there's
/// nothing more for this node to contest.
pub fn on_contest_tx<L: Ledger, CS: IsChainState>(
    chain_state: &CS,
    confirmed_snapshot: &ConfirmedSnapshot<L::Tx, L::UTxO>,
    contested_number: u64,
) -> Out<L, CS> {
    let mut effects: Vec<Eff<L, CS>> = vec![Effect::client(ServerOutput::HeadIsContested {
        snapshot_number: contested_number,
    })];
    if confirmed_snapshot.number() > contested_number {
        effects.push(Effect::on_chain(
            chain_state.clone(),
            PostChainTx::ContestTx {
                confirmed_snapshot: confirmed_snapshot.clone(),
            },
        ));
    }
    Out::<L, CS>::only(effects)
}

/// `Tick` while `Closed` (spec §4.6): once the contestation deadline has
/// passed, tell the client it's safe to fan out. Fires once per close.
pub fn on_tick<L: Ledger, CS: IsChainState>(
    parameters: HeadParameters,
    confirmed_snapshot: ConfirmedSnapshot<L::Tx, L::UTxO>,
    contestation_deadline: Timestamp,
    ready_to_fanout_sent: bool,
    predecessor: St<L, CS>,
    chain_state: CS,
    now: Timestamp,
) -> Out<L, CS> {
    if ready_to_fanout_sent || now < contestation_deadline {
        return Out::<L, CS>::none();
    }
    let new_state = HeadState::Closed {
        parameters,
        confirmed_snapshot,
        contestation_deadline,
        ready_to_fanout_sent: true,
        predecessor: Box::new(predecessor),
        chain_state,
    };
    Out::<L, CS>::new_state(new_state, vec![Effect::client(ServerOutput::ReadyToFanout)])
}

/// Client `Fanout` (spec §4.6): post the final UTxO for distribution.
pub fn on_client_fanout<L: Ledger, CS: IsChainState>(
    chain_state: &CS,
    confirmed_snapshot: &ConfirmedSnapshot<L::Tx, L::UTxO>,
    contestation_deadline: Timestamp,
) -> Out<L, CS> {
    let effect: Eff<L, CS> = Effect::on_chain(
        chain_state.clone(),
        PostChainTx::FanoutTx {
            utxo: confirmed_snapshot.utxo().clone(),
            deadline: contestation_deadline,
        },
    );
    Out::<L, CS>::only(vec![effect])
}

/// Observation `OnFanoutTx` (spec §4.6): Closed -> Idle.
pub fn on_fanout_tx<L: Ledger, CS: IsChainState>(
    confirmed_snapshot: ConfirmedSnapshot<L::Tx, L::UTxO>,
    new_chain_state: CS,
) -> Out<L, CS> {
    debug!("observed OnFanoutTx, head finalized");
    let utxo = confirmed_snapshot.utxo().clone();
    let new_state = HeadState::Idle {
        chain_state: new_chain_state,
    };
    Out::<L, CS>::new_state(
        new_state,
        vec![Effect::client(ServerOutput::HeadIsFinalized { utxo })],
    )
}
