//! Platform metric accessors.
//!
//! The [`Platform`] trait is the seam between the sampling logic and the
//! host: each accessor is a synchronous point-in-time read that may fail
//! with a [`MetricError`]. The sampler substitutes sentinels on failure, so
//! no accessor error ever aborts a snapshot.

use std::path::Path;

use sysinfo::{Disks, Networks, System};
use thiserror::Error;

/// Errors from a single metric read.
#[derive(Debug, Error)]
pub enum MetricError {
    /// The reading is gated behind a permission that is not granted.
    #[error("permission not granted")]
    PermissionDenied,

    /// The metric source does not exist or produced no usable value.
    #[error("metric unavailable: {0}")]
    Unavailable(String),

    /// I/O error while reading the metric source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Used and total bytes of a finite resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageStats {
    pub used: u64,
    pub total: u64,
}

impl UsageStats {
    /// Used-over-total fraction in [0, 1]. Zero when the total is zero.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64
        }
    }
}

/// Cumulative network byte counters at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Point-in-time Wi-Fi state as seen by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiInfo {
    /// A wireless interface exists and is usable.
    pub enabled: bool,
    /// The active link is wired instead.
    pub ethernet: bool,
    /// Connected network name, when the host exposes it.
    pub ssid: Option<String>,
    /// Signal strength in dBm, when the host exposes it.
    pub signal_dbm: Option<i32>,
}

/// Host metric accessors.
///
/// Accessors take `&mut self` because refreshing system tables mutates
/// cached state (see [`sysinfo`]).
pub trait Platform: Send {
    /// Battery charge in percent (0-100).
    fn battery_level(&mut self) -> Result<u8, MetricError>;

    /// Wi-Fi/link state.
    fn wifi(&mut self) -> Result<WifiInfo, MetricError>;

    /// Whether a cellular data link is present.
    fn mobile_data_available(&mut self) -> Result<bool, MetricError>;

    /// System memory usage.
    fn memory(&mut self) -> Result<UsageStats, MetricError>;

    /// Storage usage of the primary data filesystem.
    fn storage(&mut self) -> Result<UsageStats, MetricError>;

    /// Cumulative received/transmitted bytes across real interfaces.
    fn traffic_counters(&mut self) -> Result<TrafficCounters, MetricError>;

    /// Capability gate: whether the agent is allowed to sample at all.
    ///
    /// Consulted once before the driving loop enters its running state.
    /// A denied gate is a normal stop condition, not an error. Individual
    /// accessors still degrade to sentinels if capabilities disappear
    /// while the loop is running.
    fn capabilities_granted(&self) -> bool;
}

/// [`Platform`] implementation backed by `sysinfo` and, on Linux, direct
/// sysfs/procfs reads for battery and wireless state.
pub struct HostPlatform {
    system: System,
    disks: Disks,
    networks: Networks,
}

impl HostPlatform {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
        }
    }

    fn interface_names(&mut self) -> Vec<String> {
        self.networks.refresh(true);
        self.networks.list().keys().cloned().collect()
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HostPlatform {
    fn battery_level(&mut self) -> Result<u8, MetricError> {
        #[cfg(target_os = "linux")]
        {
            crate::linux::battery_capacity()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(MetricError::Unavailable(
                "battery readings are not supported on this platform".to_string(),
            ))
        }
    }

    fn wifi(&mut self) -> Result<WifiInfo, MetricError> {
        let names = self.interface_names();
        Ok(classify_wifi(wired_link_up(&names), wireless_link(&names)))
    }

    fn mobile_data_available(&mut self) -> Result<bool, MetricError> {
        Ok(self.interface_names().iter().any(|n| is_cellular(n)))
    }

    fn memory(&mut self) -> Result<UsageStats, MetricError> {
        self.system.refresh_memory();
        Ok(UsageStats {
            used: self.system.used_memory(),
            total: self.system.total_memory(),
        })
    }

    fn storage(&mut self) -> Result<UsageStats, MetricError> {
        self.disks.refresh(true);

        // Prefer the root filesystem; fall back to the largest mount.
        let disk = self
            .disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| self.disks.list().iter().max_by_key(|d| d.total_space()))
            .ok_or_else(|| MetricError::Unavailable("no mounted disks".to_string()))?;

        let total = disk.total_space();
        Ok(UsageStats {
            used: total.saturating_sub(disk.available_space()),
            total,
        })
    }

    fn traffic_counters(&mut self) -> Result<TrafficCounters, MetricError> {
        self.networks.refresh(true);

        let mut counters = TrafficCounters::default();
        for (name, data) in self.networks.list() {
            if is_loopback(name) {
                continue;
            }
            counters.rx_bytes = counters.rx_bytes.saturating_add(data.total_received());
            counters.tx_bytes = counters.tx_bytes.saturating_add(data.total_transmitted());
        }
        Ok(counters)
    }

    fn capabilities_granted(&self) -> bool {
        // On a host deployment the process either has access to its metric
        // sources or individual reads degrade to sentinels; there is no
        // runtime permission prompt to wait for.
        true
    }
}

/// State of the host's wireless interface, when one exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct WirelessLink {
    /// The radio has an operational link (not rfkill'd or down).
    up: bool,
    ssid: Option<String>,
    signal_dbm: Option<i32>,
}

/// Decide the reported Wi-Fi state from the host's link layout.
///
/// An active cable wins over any wireless interface; a wireless interface
/// without an operational link (rfkill'd, administratively down) counts as
/// a disabled radio.
fn classify_wifi(wired_link_up: bool, wireless: Option<WirelessLink>) -> WifiInfo {
    if wired_link_up {
        return WifiInfo {
            ethernet: true,
            ..WifiInfo::default()
        };
    }

    match wireless {
        Some(link) if link.up => WifiInfo {
            enabled: true,
            ethernet: false,
            ssid: link.ssid,
            signal_dbm: link.signal_dbm,
        },
        // Radio present but down, or no radio at all
        _ => WifiInfo::default(),
    }
}

fn is_loopback(name: &str) -> bool {
    name == "lo" || name.starts_with("lo0")
}

fn is_cellular(name: &str) -> bool {
    ["wwan", "ppp", "rmnet"]
        .iter()
        .any(|p| name.starts_with(p))
}

fn is_virtual(name: &str) -> bool {
    ["docker", "veth", "br-", "virbr", "vnet"]
        .iter()
        .any(|p| name.starts_with(p))
}

fn is_wired(name: &str) -> bool {
    !is_loopback(name) && !is_cellular(name) && !is_virtual(name)
}

/// Whether a wired (non-wireless) interface currently has a link.
fn wired_link_up(names: &[String]) -> bool {
    #[cfg(target_os = "linux")]
    {
        names.iter().any(|n| {
            is_wired(n) && !crate::linux::is_wireless(n) && crate::linux::is_interface_up(n)
        })
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = names;
        false
    }
}

/// State of the first wireless interface among the given names, if any.
fn wireless_link(names: &[String]) -> Option<WirelessLink> {
    #[cfg(target_os = "linux")]
    {
        let iface = names.iter().find(|n| crate::linux::is_wireless(n))?;
        let up = crate::linux::is_interface_up(iface);
        let (ssid, signal_dbm) = if up {
            (
                crate::linux::wireless_ssid(iface),
                crate::linux::wireless_signal(iface),
            )
        } else {
            (None, None)
        };
        Some(WirelessLink {
            up,
            ssid,
            signal_dbm,
        })
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = names;
        None
    }
}
