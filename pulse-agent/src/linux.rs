//! Linux-specific metric sources read directly from sysfs and procfs:
//! - Battery capacity (`/sys/class/power_supply/*/capacity`)
//! - Interface carrier state (`/sys/class/net/*/operstate`)
//! - Wireless interface detection and signal level (`/proc/net/wireless`)
//! - Connected SSID (`iw dev <iface> link`)

use std::path::Path;

use crate::platform::MetricError;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";
const WIRELESS_STATS: &str = "/proc/net/wireless";

/// Read the charge percentage of the first battery-type power supply.
pub fn battery_capacity() -> Result<u8, MetricError> {
    battery_capacity_in(Path::new(POWER_SUPPLY_DIR))
}

fn battery_capacity_in(dir: &Path) -> Result<u8, MetricError> {
    let entries = std::fs::read_dir(dir).map_err(|_| {
        MetricError::Unavailable(format!("cannot enumerate {}", dir.display()))
    })?;

    for entry in entries.flatten() {
        let supply = entry.path();

        let Ok(kind) = std::fs::read_to_string(supply.join("type")) else {
            continue;
        };
        if kind.trim() != "Battery" {
            continue;
        }

        let Ok(capacity) = std::fs::read_to_string(supply.join("capacity")) else {
            continue;
        };
        let Ok(percent) = capacity.trim().parse::<u8>() else {
            continue;
        };
        return Ok(percent.min(100));
    }

    Err(MetricError::Unavailable("no battery present".to_string()))
}

/// Whether the named interface is wireless.
pub fn is_wireless(iface: &str) -> bool {
    Path::new("/sys/class/net")
        .join(iface)
        .join("wireless")
        .is_dir()
}

/// Whether the named interface has an operational link.
///
/// An interface that is rfkill'd or administratively down reports an
/// operstate other than "up".
pub fn is_interface_up(iface: &str) -> bool {
    let operstate = Path::new("/sys/class/net").join(iface).join("operstate");
    std::fs::read_to_string(operstate)
        .map(|s| s.trim() == "up")
        .unwrap_or(false)
}

/// Connected SSID of a wireless interface, via `iw dev <iface> link`.
///
/// Returns `None` when `iw` is missing, the query is not permitted, or
/// the interface is not associated.
pub fn wireless_ssid(iface: &str) -> Option<String> {
    let output = std::process::Command::new("iw")
        .args(["dev", iface, "link"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_iw_ssid(&String::from_utf8_lossy(&output.stdout))
}

/// Extract the `SSID:` line from `iw dev <iface> link` output.
fn parse_iw_ssid(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim_start().strip_prefix("SSID: "))
        .map(|ssid| ssid.trim_end().to_string())
        .filter(|ssid| !ssid.is_empty())
}

/// Current signal level in dBm for a wireless interface.
pub fn wireless_signal(iface: &str) -> Option<i32> {
    let content = std::fs::read_to_string(WIRELESS_STATS).ok()?;
    parse_wireless_signal(&content, iface)
}

/// Parse the `level` column of `/proc/net/wireless` for one interface.
///
/// The file has two header lines followed by one line per interface:
///
/// ```text
/// Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
///  face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
///  wlan0: 0000   54.  -56.  -256        0      0      0      0      0        0
/// ```
fn parse_wireless_signal(content: &str, iface: &str) -> Option<i32> {
    let prefix = format!("{}:", iface);

    for line in content.lines().skip(2) {
        let mut fields = line.split_whitespace();
        if fields.next() != Some(prefix.as_str()) {
            continue;
        }

        // status, link quality, then the signal level
        let level = fields.nth(2)?;
        return level.trim_end_matches('.').parse::<f64>().ok().map(|v| v as i32);
    }

    None
}
