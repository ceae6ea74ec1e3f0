//! Integration tests for the pulse-common library.

use pulse_common::{NetworkTraffic, SIGNAL_UNAVAILABLE, Snapshot, WifiNetwork};

#[test]
fn test_snapshot_wire_format() {
    let snapshot = Snapshot {
        device_id: "device-01".to_string(),
        battery_level: 42,
        wifi_network: WifiNetwork::PermissionNotGranted,
        wifi_signal_strength: SIGNAL_UNAVAILABLE,
        mobile_data_available: true,
        ram_usage: 0.5,
        storage_usage: 0.25,
        network_traffic: NetworkTraffic {
            download_speed_mbps: 0.00762939453125,
            upload_speed_mbps: 0.0,
        },
    };

    let json = serde_json::to_string(&snapshot).expect("serialize failed");

    // The permission sentinel is a plain string on the wire
    assert!(json.contains(r#""wifi_network":"Unknown (permission not granted)""#));

    let decoded: Snapshot = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(decoded, snapshot);
}

#[test]
fn test_snapshots_are_self_contained() {
    // Two records from the same installation share only the device id.
    let first = Snapshot {
        device_id: "device-01".to_string(),
        battery_level: 90,
        wifi_network: WifiNetwork::Ssid("lab".to_string()),
        wifi_signal_strength: -40,
        mobile_data_available: false,
        ram_usage: 0.3,
        storage_usage: 0.6,
        network_traffic: NetworkTraffic::default(),
    };
    let second = Snapshot {
        battery_level: 89,
        network_traffic: NetworkTraffic {
            download_speed_mbps: 1.5,
            upload_speed_mbps: 0.2,
        },
        ..first.clone()
    };

    assert_eq!(first.device_id, second.device_id);
    assert_ne!(first, second);

    // Each serializes independently of the other
    let a = serde_json::to_value(&first).unwrap();
    let b = serde_json::to_value(&second).unwrap();
    assert_eq!(a["device_id"], b["device_id"]);
    assert_ne!(a["battery_level"], b["battery_level"]);
}
