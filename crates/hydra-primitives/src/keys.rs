//! Key material types used by the head node.
//!
//! The core never performs signing itself (see the crypto capability in
//! `hydra_head_core::crypto`); these types just give the surrounding node a
//! place to carry key material without leaking it into logs or memory dumps.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::buf::Buf32;

/// A party's public verification key. Parties are compared and ordered by
/// this value, so the leader schedule and signature-aggregation order in the
/// head protocol are entirely determined by it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct VerificationKey(pub Buf32);

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vk:{:?}", self.0)
    }
}

/// A zeroizable wrapper around a party's signing key.
///
/// Lives for the lifetime of the node inside `Environment`; the original
/// source notes an intent to eventually move signing behind a signing-effect
/// instead, which this wrapper doesn't preclude.
#[derive(Clone)]
pub struct SigningKey(Buf32);

impl SigningKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(Buf32(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

impl Zeroize for SigningKey {
    fn zeroize(&mut self) {
        self.0 .0.zeroize();
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SigningKey {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_key_zeroize_clears_bytes() {
        let mut key = SigningKey::new([7u8; 32]);
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; 32]);
    }
}
