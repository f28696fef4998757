//! Pure head-logic core of a Hydra-style off-chain state channel.
//!
//! Everything here is deterministic and side-effect free: no I/O, no clock,
//! no randomness, no cryptography, no ledger rules. Those capabilities are
//! abstract parameters ([`ledger::Ledger`], [`ledger::IsChainState`],
//! [`crypto::SignatureScheme`]) supplied by whatever shell embeds this
//! crate. The only two entry points a host needs are [`process_event`] and
//! [`rollback::resolve_rollback`].

pub mod crypto;
pub mod effect;
pub mod emitter;
pub mod errors;
pub mod event;
pub mod ledger;
pub mod params;
pub mod rollback;
pub mod snapshot;
pub mod state;
pub mod time;
mod transition;
pub mod types;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod proptests;

use crate::{
    crypto::SignatureScheme,
    ledger::{IsChainState, Ledger},
    params::Environment,
    types::{Ev, Out, St},
};

/// Applies one event to `state` and, if the resulting outcome carries a new
/// state, runs the snapshot emitter over it (spec §4, §4.7). This is the
/// single function a shell needs to drive the protocol forward; everything
/// else in this crate is vocabulary.
pub fn process_event<L: Ledger, CS: IsChainState>(
    env: &Environment,
    ledger: &L,
    sigs: &impl SignatureScheme,
    state: St<L, CS>,
    event: Ev<L, CS>,
) -> Out<L, CS> {
    let outcome = transition::dispatch_event(env, ledger, sigs, state, event);
    match outcome {
        effect::Outcome::NewState { state, effects } => {
            let (state, effects) = emitter::emit_snapshot_request(env, *state, effects);
            Out::<L, CS>::new_state(state, effects)
        }
        other => other,
    }
}
