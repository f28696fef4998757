//! Convenience aliases binding the event/effect/state vocabulary to a
//! concrete `Ledger`/`IsChainState` pair, so the rest of the crate can write
//! `St<L, CS>` instead of spelling out `HeadState<L::Tx, L::UTxO, CS>` at
//! every call site.

use crate::{
    effect::{Effect, Outcome},
    event::Event,
    ledger::Ledger,
    state::HeadState,
};

pub type St<L, CS> = HeadState<<L as Ledger>::Tx, <L as Ledger>::UTxO, CS>;
pub type Ev<L, CS> = Event<<L as Ledger>::Tx, <L as Ledger>::UTxO, CS>;
pub type Eff<L, CS> =
    Effect<<L as Ledger>::Tx, <L as Ledger>::UTxO, CS, <L as Ledger>::ValidationError>;
pub type Out<L, CS> = Outcome<
    St<L, CS>,
    <L as Ledger>::Tx,
    <L as Ledger>::UTxO,
    CS,
    <L as Ledger>::ValidationError,
>;
