//! Shared identifier and key types used across the hydra head node.

pub mod buf;
pub mod keys;
pub mod party;

pub mod prelude {
    pub use crate::{
        buf::{Buf32, Buf64},
        keys::{SigningKey, VerificationKey},
        party::Party,
    };
}
