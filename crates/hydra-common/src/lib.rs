//! Reusable utilities for hydra head node binaries — currently just logging
//! setup. Kept as its own crate so the pure `hydra-head-core` crate never
//! needs to depend on `tracing-subscriber` or any other init-time machinery.

pub mod logging;
