//! The post-transition snapshot emitter (spec §4.7).
//!
//! `process_event` only ever reacts to what it was handed; deciding to
//! *start* a new snapshot round is a separate, purely locally-driven
//! concern, so it runs as a second pass over whatever `process_event`
//! produced rather than being woven into every `Open`-phase handler.

use crate::{
    effect::Effect,
    event::NetworkMessage,
    ledger::{IsChainState, Ledger},
    params::Environment,
    snapshot::SeenSnapshot,
    state::HeadState,
    types::{Eff, St},
};

/// If `state` is `Open`, we're the leader for the next snapshot number, we
/// have transactions sitting in `seenTxs`, and nobody's collecting a
/// snapshot already, appends a `ReqSn` broadcast and marks `seenSnapshot :=
/// Requested`. Otherwise returns `state`/`effects` unchanged.
pub fn emit_snapshot_request<L: Ledger, CS: IsChainState>(
    env: &Environment,
    mut state: St<L, CS>,
    mut effects: Vec<Eff<L, CS>>,
) -> (St<L, CS>, Vec<Eff<L, CS>>) {
    if let HeadState::Open { parameters, coordinated, .. } = &mut state {
        let next = coordinated.confirmed_snapshot.number() + 1;
        let ready = matches!(coordinated.seen_snapshot, SeenSnapshot::None)
            && !coordinated.seen_txs.is_empty()
            && parameters.is_leader(&env.party, next);

        if ready {
            effects.push(Effect::network(NetworkMessage::ReqSn {
                from: env.party,
                sn: next,
                txs: coordinated.seen_txs.clone(),
            }));
            coordinated.seen_snapshot = SeenSnapshot::Requested;
        }
    }
    (state, effects)
}
