//! Telemetry snapshot data model.
//!
//! A [`Snapshot`] is one complete, self-contained telemetry record produced
//! by a single sampling cycle. Snapshots never reference each other; the
//! device identifier is the only state shared between cycles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel value for an unavailable Wi-Fi signal strength reading.
pub const SIGNAL_UNAVAILABLE: i32 = -1;

/// One complete telemetry record, serialized as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Stable per-installation identifier.
    pub device_id: String,

    /// Battery charge in percent (0-100). 0 when no reading is available.
    pub battery_level: u8,

    /// Connected network name or a sentinel state.
    pub wifi_network: WifiNetwork,

    /// RSSI in dBm, or [`SIGNAL_UNAVAILABLE`] when no reading is available.
    pub wifi_signal_strength: i32,

    /// Whether a cellular data link is present.
    pub mobile_data_available: bool,

    /// Used-over-total memory fraction in [0, 1].
    pub ram_usage: f64,

    /// Used-over-total storage fraction in [0, 1].
    pub storage_usage: f64,

    /// Windowed network throughput measurement.
    pub network_traffic: NetworkTraffic,
}

/// Network throughput over one sampling window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkTraffic {
    pub download_speed_mbps: f64,
    pub upload_speed_mbps: f64,
}

/// Wi-Fi network state, serialized as a plain string.
///
/// The sentinel strings are part of the wire format; an SSID that happens
/// to collide with one of them deserializes as the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifiNetwork {
    /// Connected to the named network.
    Ssid(String),
    /// Wi-Fi is on but the network name could not be determined.
    Unknown,
    /// The name is permission-gated and the permission is missing.
    PermissionNotGranted,
    /// Wi-Fi is turned off.
    Disabled,
    /// The active link is wired.
    Ethernet,
}

impl WifiNetwork {
    const UNKNOWN: &'static str = "Unknown";
    const PERMISSION_NOT_GRANTED: &'static str = "Unknown (permission not granted)";
    const DISABLED: &'static str = "WiFi Disabled";
    const ETHERNET: &'static str = "Ethernet";

    /// Get the wire-format string for this state.
    pub fn as_str(&self) -> &str {
        match self {
            WifiNetwork::Ssid(name) => name,
            WifiNetwork::Unknown => Self::UNKNOWN,
            WifiNetwork::PermissionNotGranted => Self::PERMISSION_NOT_GRANTED,
            WifiNetwork::Disabled => Self::DISABLED,
            WifiNetwork::Ethernet => Self::ETHERNET,
        }
    }

    /// Parse a wire-format string back into a state.
    pub fn from_label(label: &str) -> Self {
        match label {
            Self::UNKNOWN => WifiNetwork::Unknown,
            Self::PERMISSION_NOT_GRANTED => WifiNetwork::PermissionNotGranted,
            Self::DISABLED => WifiNetwork::Disabled,
            Self::ETHERNET => WifiNetwork::Ethernet,
            ssid => WifiNetwork::Ssid(ssid.to_string()),
        }
    }
}

impl std::fmt::Display for WifiNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for WifiNetwork {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WifiNetwork {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(WifiNetwork::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            device_id: "6f1c9b2e-0000-4000-8000-0123456789ab".to_string(),
            battery_level: 87,
            wifi_network: WifiNetwork::Ssid("office".to_string()),
            wifi_signal_strength: -56,
            mobile_data_available: false,
            ram_usage: 0.42,
            storage_usage: 0.73,
            network_traffic: NetworkTraffic {
                download_speed_mbps: 0.5,
                upload_speed_mbps: 0.1,
            },
        }
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(sample_snapshot()).unwrap();
        let object = value.as_object().unwrap();

        let expected_fields = [
            "device_id",
            "battery_level",
            "wifi_network",
            "wifi_signal_strength",
            "mobile_data_available",
            "ram_usage",
            "storage_usage",
            "network_traffic",
        ];
        assert_eq!(object.len(), expected_fields.len());
        for field in expected_fields {
            assert!(object.contains_key(field), "missing field '{}'", field);
        }

        assert_eq!(value["wifi_network"], "office");
        let traffic = value["network_traffic"].as_object().unwrap();
        assert_eq!(traffic.len(), 2);
        assert_eq!(traffic["download_speed_mbps"], 0.5);
        assert_eq!(traffic["upload_speed_mbps"], 0.1);
    }

    #[test]
    fn test_sentinel_strings() {
        assert_eq!(WifiNetwork::Unknown.as_str(), "Unknown");
        assert_eq!(
            WifiNetwork::PermissionNotGranted.as_str(),
            "Unknown (permission not granted)"
        );
        assert_eq!(WifiNetwork::Disabled.as_str(), "WiFi Disabled");
        assert_eq!(WifiNetwork::Ethernet.as_str(), "Ethernet");
    }

    #[test]
    fn test_wifi_network_from_label() {
        assert_eq!(WifiNetwork::from_label("Unknown"), WifiNetwork::Unknown);
        assert_eq!(
            WifiNetwork::from_label("WiFi Disabled"),
            WifiNetwork::Disabled
        );
        assert_eq!(
            WifiNetwork::from_label("home-net"),
            WifiNetwork::Ssid("home-net".to_string())
        );
    }

    #[test]
    fn test_snapshot_deserialize() {
        let json = r#"{
            "device_id": "abc",
            "battery_level": 100,
            "wifi_network": "WiFi Disabled",
            "wifi_signal_strength": -1,
            "mobile_data_available": true,
            "ram_usage": 0.0,
            "storage_usage": 1.0,
            "network_traffic": { "download_speed_mbps": 0.0, "upload_speed_mbps": 0.0 }
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.device_id, "abc");
        assert_eq!(snapshot.wifi_network, WifiNetwork::Disabled);
        assert_eq!(snapshot.wifi_signal_strength, SIGNAL_UNAVAILABLE);
        assert_eq!(snapshot.network_traffic, NetworkTraffic::default());
    }
}
