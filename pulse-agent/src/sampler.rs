//! Snapshot assembly.
//!
//! The sampler reads every metric best-effort: a failed read logs a warning
//! and substitutes the field's sentinel, so one bad accessor never costs
//! the rest of the snapshot. The only blocking part is the throughput
//! window, during which cumulative byte counters are differenced.

use std::time::{Duration, Instant};

use tracing::warn;

use pulse_common::{NetworkTraffic, SIGNAL_UNAVAILABLE, Snapshot, WifiNetwork};

use crate::platform::{MetricError, Platform, TrafficCounters, WifiInfo};

const BYTES_PER_MIB: f64 = (1024 * 1024) as f64;

/// Assembles telemetry snapshots from a [`Platform`].
pub struct Sampler<P: Platform> {
    platform: P,
    device_id: String,
}

impl<P: Platform> Sampler<P> {
    pub fn new(platform: P, device_id: String) -> Self {
        Self {
            platform,
            device_id,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Take one complete snapshot.
    ///
    /// Blocks for the duration of `window` to measure network throughput.
    /// The wait is a plain `tokio::time::sleep`, so dropping the returned
    /// future (e.g. on shutdown) abandons the cycle promptly.
    pub async fn sample(&mut self, window: Duration) -> Snapshot {
        let start = self.read_counters();
        let begun = Instant::now();

        tokio::time::sleep(window).await;

        let end = self.read_counters();
        let network_traffic = match (start, end) {
            (Some(start), Some(end)) => throughput(start, end, begun.elapsed()),
            _ => NetworkTraffic::default(),
        };

        let battery_level = self.platform.battery_level().unwrap_or_else(|e| {
            warn!(error = %e, "battery read failed");
            0
        });

        let (wifi_network, wifi_signal_strength) = wifi_fields(self.platform.wifi());

        let mobile_data_available = self.platform.mobile_data_available().unwrap_or_else(|e| {
            warn!(error = %e, "mobile data read failed");
            false
        });

        let ram_usage = self
            .platform
            .memory()
            .map(|m| m.fraction())
            .unwrap_or_else(|e| {
                warn!(error = %e, "memory read failed");
                0.0
            });

        let storage_usage = self
            .platform
            .storage()
            .map(|s| s.fraction())
            .unwrap_or_else(|e| {
                warn!(error = %e, "storage read failed");
                0.0
            });

        Snapshot {
            device_id: self.device_id.clone(),
            battery_level,
            wifi_network,
            wifi_signal_strength,
            mobile_data_available,
            ram_usage,
            storage_usage,
            network_traffic,
        }
    }

    fn read_counters(&mut self) -> Option<TrafficCounters> {
        match self.platform.traffic_counters() {
            Ok(counters) => Some(counters),
            Err(e) => {
                warn!(error = %e, "traffic counter read failed");
                None
            }
        }
    }
}

/// Map a Wi-Fi read to the snapshot's network name and signal strength.
///
/// Mirrors the decision ladder of the network: a wired link wins, then a
/// disabled radio, then the permission gate, then the SSID when known.
fn wifi_fields(result: Result<WifiInfo, MetricError>) -> (WifiNetwork, i32) {
    match result {
        Err(MetricError::PermissionDenied) => {
            (WifiNetwork::PermissionNotGranted, SIGNAL_UNAVAILABLE)
        }
        Err(e) => {
            warn!(error = %e, "wifi read failed");
            (WifiNetwork::Unknown, SIGNAL_UNAVAILABLE)
        }
        Ok(info) if info.ethernet => (WifiNetwork::Ethernet, SIGNAL_UNAVAILABLE),
        Ok(info) if !info.enabled => (WifiNetwork::Disabled, SIGNAL_UNAVAILABLE),
        Ok(info) => {
            let strength = info.signal_dbm.unwrap_or(SIGNAL_UNAVAILABLE);
            match info.ssid {
                Some(ssid) => (WifiNetwork::Ssid(ssid), strength),
                None => (WifiNetwork::Unknown, strength),
            }
        }
    }
}

/// Compute throughput from before/after counters over an elapsed window.
///
/// Rates are megabits per second: `delta_bytes / secs / 1024^2 * 8`.
/// A zero-length window or a counter regression yields 0.0, never a
/// division fault or a negative rate.
pub fn throughput(
    start: TrafficCounters,
    end: TrafficCounters,
    elapsed: Duration,
) -> NetworkTraffic {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return NetworkTraffic::default();
    }

    let rx_bytes = end.rx_bytes.saturating_sub(start.rx_bytes) as f64;
    let tx_bytes = end.tx_bytes.saturating_sub(start.tx_bytes) as f64;

    NetworkTraffic {
        download_speed_mbps: rx_bytes / secs / BYTES_PER_MIB * 8.0,
        upload_speed_mbps: tx_bytes / secs / BYTES_PER_MIB * 8.0,
    }
}
