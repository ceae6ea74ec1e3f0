//! Pulse host telemetry agent.
//!
//! Periodically samples host metrics (battery, Wi-Fi, mobile data, memory,
//! storage, network throughput) and POSTs each snapshot as JSON to a fixed
//! HTTP endpoint, best-effort: no retries, no queue, no acknowledgment
//! beyond a log line.
//!
//! One cycle: sample (blocks for the throughput window) -> dispatch a
//! detached delivery task -> sleep the inter-cycle delay -> repeat until
//! shutdown.

pub mod agent;
pub mod args;
pub mod config;
pub mod identity;
pub mod platform;
pub mod reporter;
pub mod sampler;

#[cfg(target_os = "linux")]
pub mod linux;
