//! Initial-phase handlers (spec §4.3).

use std::collections::{BTreeMap, BTreeSet};

use hydra_primitives::party::Party;
use tracing::debug;

use crate::{
    effect::{Effect, PostChainTx, ServerOutput},
    ledger::{IsChainState, Ledger},
    params::{Environment, HeadParameters},
    state::{CoordinatedHeadState, HeadState},
    types::{Eff, Out, St},
};

/// Client `Commit{utxo}` (spec §4.3): only the party itself may commit its
/// own UTxO, and only while it's still pending.
pub fn on_client_commit<L: Ledger, CS: IsChainState>(
    env: &Environment,
    chain_state: &CS,
    pending_commits: &BTreeSet<Party>,
    utxo: L::UTxO,
) -> Out<L, CS> {
    if pending_commits.contains(&env.party) {
        let effect: Eff<L, CS> = Effect::on_chain(
            chain_state.clone(),
            PostChainTx::CommitTx {
                party: env.party,
                utxo,
            },
        );
        Out::<L, CS>::only(vec![effect])
    } else {
        Out::<L, CS>::only(vec![Effect::client(ServerOutput::CommandFailed {
            input_description: "Commit: party not in pendingCommits".to_string(),
        })])
    }
}

/// Client `GetUTxO` (spec §4.3): the fold of everything committed so far.
pub fn on_client_get_utxo<L: Ledger, CS: IsChainState>(
    ledger: &L,
    committed: &BTreeMap<Party, L::UTxO>,
) -> Out<L, CS> {
    let utxo = ledger.union_utxo(committed.values());
    Out::<L, CS>::only(vec![Effect::client(ServerOutput::GetUTxOResponse { utxo })])
}

/// Client `Abort` (spec §4.3).
pub fn on_client_abort<L: Ledger, CS: IsChainState>(
    ledger: &L,
    chain_state: &CS,
    committed: &BTreeMap<Party, L::UTxO>,
) -> Out<L, CS> {
    let utxo = ledger.union_utxo(committed.values());
    let effect: Eff<L, CS> = Effect::on_chain(chain_state.clone(), PostChainTx::AbortTx { utxo });
    Out::<L, CS>::only(vec![effect])
}

/// Observation `OnCommitTx{party, utxo}` (spec §4.3). The "last committer"
/// tie-break: only the node whose own commit just emptied `pendingCommits`
/// posts `CollectComTx`, so exactly one `CollectComTx` is submitted per head.
pub fn on_commit_tx<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    parameters: HeadParameters,
    pending_commits: &BTreeSet<Party>,
    committed: &BTreeMap<Party, L::UTxO>,
    predecessor: St<L, CS>,
    party: Party,
    utxo: L::UTxO,
    new_chain_state: CS,
) -> Out<L, CS> {
    let mut new_pending = pending_commits.clone();
    new_pending.remove(&party);
    let mut new_committed = committed.clone();
    new_committed.insert(party, utxo.clone());

    let mut effects: Vec<Eff<L, CS>> = vec![Effect::client(ServerOutput::Committed {
        party,
        utxo,
    })];

    if new_pending.is_empty() && party == env.party {
        debug!(?party, "last commit observed locally, posting CollectComTx");
        effects.push(Effect::on_chain(
            new_chain_state.clone(),
            PostChainTx::CollectComTx {
                utxo: ledger.union_utxo(new_committed.values()),
            },
        ));
    }

    let new_state = HeadState::Initial {
        parameters,
        pending_commits: new_pending,
        committed: new_committed,
        predecessor: Box::new(predecessor),
        chain_state: new_chain_state,
    };
    Out::<L, CS>::new_state(new_state, effects)
}

/// A commit for a party that isn't pending is a no-op (spec §8 round-trip
/// property: "An `OnCommitTx` for a party not in `pendingCommits` is a
/// no-op").
pub fn on_stray_commit_tx<L: Ledger, CS: IsChainState>() -> Out<L, CS> {
    Out::<L, CS>::none()
}

/// Observation `OnCollectComTx` (spec §4.3): Initial -> Open.
pub fn on_collect_com_tx<L: Ledger, CS: IsChainState>(
    ledger: &L,
    parameters: HeadParameters,
    committed: &BTreeMap<Party, L::UTxO>,
    predecessor: St<L, CS>,
    new_chain_state: CS,
) -> Out<L, CS> {
    let u0 = ledger.union_utxo(committed.values());
    debug!("observed OnCollectComTx, head is open");
    let new_state = HeadState::Open {
        parameters,
        coordinated: CoordinatedHeadState::fresh(u0.clone()),
        predecessor: Box::new(predecessor),
        chain_state: new_chain_state,
    };
    Out::<L, CS>::new_state(
        new_state,
        vec![Effect::client(ServerOutput::HeadIsOpen { utxo: u0 })],
    )
}

/// Observation `OnAbortTx` (spec §4.3): Initial -> Idle.
pub fn on_abort_tx<L: Ledger, CS: IsChainState>(
    ledger: &L,
    committed: &BTreeMap<Party, L::UTxO>,
    new_chain_state: CS,
) -> Out<L, CS> {
    let utxo = ledger.union_utxo(committed.values());
    debug!("observed OnAbortTx, head aborted");
    let new_state = HeadState::Idle {
        chain_state: new_chain_state,
    };
    Out::<L, CS>::new_state(
        new_state,
        vec![Effect::client(ServerOutput::HeadIsAborted { utxo })],
    )
}
