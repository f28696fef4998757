//! Immutable protocol parameters and node environment (spec §3.1, §6.5).

use std::time::Duration;

use hydra_primitives::prelude::*;
use serde::{Deserialize, Serialize};

/// Record fixed at protocol initialization. `parties` order is significant:
/// it defines both the snapshot leader schedule and the fixed order used by
/// `aggregate_in_order` (spec §4.5).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadParameters {
    pub contestation_period: Duration,
    pub parties: Vec<Party>,
}

impl HeadParameters {
    pub fn new(contestation_period: Duration, parties: Vec<Party>) -> Self {
        Self {
            contestation_period,
            parties,
        }
    }

    /// The party leading snapshot number `n` (`n >= 1`), round-robin over
    /// `parties` (spec §4.5: `(n-1) mod |parties|`).
    pub fn leader_for(&self, n: u64) -> Option<&Party> {
        if n == 0 || self.parties.is_empty() {
            return None;
        }
        let idx = (n - 1) as usize % self.parties.len();
        self.parties.get(idx)
    }

    pub fn is_leader(&self, party: &Party, n: u64) -> bool {
        self.leader_for(n) == Some(party)
    }
}

/// Immutable for the lifetime of the node (spec §6.5). Threaded through every
/// transition call rather than kept as ambient global state (spec §9).
#[derive(Clone)]
pub struct Environment {
    pub party: Party,
    pub signing_key: SigningKey,
    pub other_parties: Vec<Party>,
    pub contestation_period: Duration,
}

impl Environment {
    pub fn new(
        party: Party,
        signing_key: SigningKey,
        other_parties: Vec<Party>,
        contestation_period: Duration,
    ) -> Self {
        Self {
            party,
            signing_key,
            other_parties,
            contestation_period,
        }
    }

    /// The full party set in a stable order: ourselves followed by the other
    /// parties, used to assemble `HeadParameters` for `InitTx` (spec §4.2).
    pub fn all_parties(&self) -> Vec<Party> {
        let mut parties = Vec::with_capacity(self.other_parties.len() + 1);
        parties.push(self.party);
        parties.extend(self.other_parties.iter().copied());
        parties
    }
}
