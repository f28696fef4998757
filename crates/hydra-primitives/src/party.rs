//! A protocol participant, identified by its verification key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::VerificationKey;

/// A `Party` is identified purely by its verification key. `Ord` on `Party`
/// is load-bearing: `HeadParameters::parties` is an *ordered* sequence, and
/// that order defines both the snapshot leader schedule and the
/// signature-aggregation order (see `hydra_head_core::snapshot`).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Party(pub VerificationKey);

impl Party {
    pub fn vkey(&self) -> &VerificationKey {
        &self.0
    }
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Party({:?})", self.0)
    }
}
