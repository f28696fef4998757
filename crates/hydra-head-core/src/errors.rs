//! Error types produced by the head-logic core.

use thiserror::Error;

/// A hard protocol violation or internal inconsistency.
///
/// `Wait` is deliberately *not* a variant here — it's a non-fatal deferral
/// the shell is expected to act on by re-enqueuing the event, not a logic
/// error. Likewise `CommandFailed` and `TxInvalid` are ordinary
/// `ServerOutput` effects, not errors: a client submitting a transaction that
/// doesn't apply is a normal outcome of the protocol, not a bug in it.
///
/// The `event`/`state` fields carry their `{:?}` rendering rather than the
/// typed values themselves — `Event`/`HeadState` are generic over the host's
/// `Tx`/`Utxo`/`ChainState` families, and an error type has no business
/// forcing every caller to monomorphize around it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    /// The event doesn't make sense in the given state and isn't one of the
    /// enumerated benign-ignore cases either.
    #[error("invalid event {event} in state {state}")]
    InvalidEvent { event: String, state: String },

    /// The state itself is internally inconsistent (e.g. a phase invariant
    /// from spec §3.2/§3.3 was violated). This should never happen if the
    /// core built the state itself; seeing it means a bug in this crate.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Reserved for future tightening of snapshot validation; unused today.
    #[error("invalid snapshot: expected number {expected}, got {actual}")]
    InvalidSnapshot { expected: u64, actual: u64 },

    /// Surfaced from the `Ledger` capability.
    #[error("ledger error: {0}")]
    LedgerError(String),
}

impl LogicError {
    pub fn invalid_event(event: impl std::fmt::Debug, state: impl std::fmt::Debug) -> Self {
        LogicError::InvalidEvent {
            event: format!("{event:?}"),
            state: format!("{state:?}"),
        }
    }
}
