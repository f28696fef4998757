//! Wall-clock instant as seen by the core.
//!
//! The core never reads a clock (spec §1, §5); every `Timestamp` it ever
//! sees arrives inside a `Tick` event or a `ClosedState::contestation_deadline`
//! computed by the shell from `HeadParameters::contestation_period`. Modeled
//! as milliseconds since the Unix epoch so it stays a plain, totally-ordered,
//! `Copy` value with no platform-clock dependency.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        self.0.checked_add(duration.as_millis() as u64).map(Self)
    }
}
