//! The signing/verification/aggregation capability.
//!
//! Spec §9: "Polymorphism over `tx`... Similarly... Both are parameters of
//! the transition function, not globals." The same principle applies to
//! cryptography: the core never hashes, signs, or verifies anything itself,
//! it only calls out to whatever `SignatureScheme` the shell supplies.

use hydra_primitives::prelude::*;

/// A single party's signature over a snapshot, plus the deterministically
/// aggregated multisignature over a fully-signed one (spec §3.4, §4.5).
pub trait SignatureScheme {
    /// Signs an opaque message (the snapshot's canonical encoding) with our
    /// own signing key.
    fn sign(&self, key: &SigningKey, message: &[u8]) -> Buf64;

    /// Verifies a single party's signature over a message.
    fn verify(&self, vkey: &VerificationKey, signature: &Buf64, message: &[u8]) -> bool;

    /// Deterministically aggregates signatures collected in `parties` order.
    /// Spec §4.5: "a deterministic aggregation is required for on-chain
    /// verifiability" — this is `aggregateInOrder`.
    fn aggregate_in_order(&self, ordered_signatures: &[Buf64]) -> Buf64;
}
