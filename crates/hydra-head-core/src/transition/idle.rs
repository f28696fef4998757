//! Idle-phase handlers (spec §4.2).

use std::collections::{BTreeMap, BTreeSet};

use hydra_primitives::party::Party;
use tracing::debug;

use crate::{
    effect::{Effect, PostChainTx, ServerOutput},
    ledger::{IsChainState, Ledger},
    params::{Environment, HeadParameters},
    state::HeadState,
    types::{Eff, Out, St},
};

/// Client `Init` (spec §4.2): ask the shell to post `InitTx`. The state
/// itself doesn't change until the corresponding observation comes back —
/// initializing only takes effect once it's chain-confirmed.
pub fn on_client_init<L: Ledger, CS: IsChainState>(
    env: &Environment,
    chain_state: &CS,
) -> Out<L, CS> {
    debug!("posting InitTx");
    let effect: Eff<L, CS> = Effect::on_chain(
        chain_state.clone(),
        PostChainTx::InitTx {
            contestation_period: env.contestation_period,
            parties: env.all_parties(),
        },
    );
    Out::<L, CS>::only(vec![effect])
}

/// Observation `OnInitTx` (spec §4.2): transition Idle -> Initial.
pub fn on_init_tx<L: Ledger, CS: IsChainState>(
    predecessor: St<L, CS>,
    contestation_period: std::time::Duration,
    parties: Vec<Party>,
    new_chain_state: CS,
) -> Out<L, CS> {
    debug!(?parties, "observed OnInitTx, entering Initial");
    let parameters = HeadParameters::new(contestation_period, parties.clone());
    let new_state = HeadState::Initial {
        parameters,
        pending_commits: parties.iter().copied().collect::<BTreeSet<_>>(),
        committed: BTreeMap::new(),
        predecessor: Box::new(predecessor),
        chain_state: new_chain_state,
    };
    let effect: Eff<L, CS> = Effect::client(ServerOutput::ReadyToCommit { parties });
    Out::<L, CS>::new_state(new_state, vec![effect])
}
