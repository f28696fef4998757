//! Capability interfaces the transition function is parameterized over.
//!
//! The core never executes ledger rules or chain-state bookkeeping itself —
//! spec §9 calls this out explicitly as "polymorphism over `tx`" and asks for
//! a capability interface rather than a trait object baked into the state.
//! This mirrors how `strata_db::traits::Database` bundles several narrow
//! sub-traits behind one parameter that callers thread through instead of
//! reaching for a global.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// The ledger-rule capability: validating and applying layer-2 transactions
/// against a UTxO set. `Tx` and `UTxO` are left fully abstract — the core
/// only ever clones, compares, folds, and (de)serializes them, the last of
/// which is needed to produce a canonical payload to sign a snapshot over
/// (see `crate::transition::open::snapshot_signing_payload`).
pub trait Ledger {
    type Tx: Clone + Debug + Eq + Serialize + DeserializeOwned;
    type UTxO: Clone + Debug + Serialize + DeserializeOwned;
    type ValidationError: Clone + Debug + Serialize + DeserializeOwned;

    /// Checks whether `tx` can be applied to `utxo` without mutating either.
    fn can_apply(&self, utxo: &Self::UTxO, tx: &Self::Tx) -> Result<(), Self::ValidationError>;

    /// Applies `txs` in order to `utxo`, returning the resulting UTxO set or
    /// the first validation failure encountered.
    fn apply_transactions(
        &self,
        utxo: &Self::UTxO,
        txs: &[Self::Tx],
    ) -> Result<Self::UTxO, Self::ValidationError>;

    /// The empty UTxO set, used before any party has committed.
    fn empty_utxo(&self) -> Self::UTxO;

    /// Folds a collection of per-party UTxOs into the union used to open the
    /// head (`u0` in spec §4.3) or to abort it.
    fn union_utxo<'a, I: IntoIterator<Item = &'a Self::UTxO>>(&self, utxos: I) -> Self::UTxO
    where
        Self::UTxO: 'a;
}

/// The chain-state capability: an opaque token the chain-observation shell
/// attaches to every `HeadState`, exposing at least the slot it was observed
/// at. The rollback resolver (spec §4.8) is the only place in the core that
/// inspects it.
pub trait IsChainState: Clone + Debug {
    fn slot(&self) -> u64;
}
