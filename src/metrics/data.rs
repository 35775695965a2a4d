//! Data structures for host telemetry.

use super::sources::{percentage, round2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Core index (1-based) to clock speed in MHz.
pub type CpuSpeeds = BTreeMap<usize, u64>;

/// Interface name to interface statistics.
pub type NetworkMap = BTreeMap<String, NetworkInterface>;

/// One collection pass over the host, serialized as the `GET /` body.
///
/// Optional fields are omitted from JSON when their probe is disabled or
/// found nothing to report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cpu_model: String,
    /// Degrees Celsius, 0 when the thermal source is unreadable
    pub cpu_temperature: f64,
    pub cpu_load1: f64,
    pub cpu_load5: f64,
    pub cpu_load15: f64,
    /// Instantaneous usage percentage
    pub cpu_current: f64,
    /// Instantaneous idle percentage
    pub cpu_free: f64,
    pub cpu_average: CpuAverage,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_speeds_policy: Option<CpuSpeeds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_avg_speed_policy: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_max_speed_policy: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_speeds_nodeos: Option<CpuSpeeds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_avg_speed_nodeos: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_max_speed_nodeos: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive: Option<DriveInfo>,
    pub memory: MemoryInfo,
    pub network: NetworkMap,
    #[serde(rename = "wifiStats")]
    pub wifi_stats: bool,
    /// Seconds since boot
    pub os_uptime: u64,
    pub oos: String,
    pub platform: String,
}

/// Cumulative per-core tick counters since boot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuAverage {
    pub total_idle: u64,
    pub total_tick: u64,
    pub avg_idle: f64,
    pub avg_total: f64,
}

/// Mean and peak over a [`CpuSpeeds`] mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedSummary {
    pub average_mhz: u64,
    pub max_mhz: u64,
}

/// Root filesystem usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveInfo {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub used_percentage: f64,
    pub free_percentage: f64,
}

/// Memory usage in megabytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total_mem_mb: f64,
    pub used_mem_mb: f64,
    /// Memory available for new allocations, not just unused pages
    pub free_mem_mb: f64,
    pub used_mem_percentage: f64,
    pub free_mem_percentage: f64,
}

/// Counters for one network interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub interface: String,
    pub input_bytes: u64,
    pub input_packets: u64,
    pub input_errors: u64,
    pub output_bytes: u64,
    pub output_packets: u64,
    pub output_errors: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wireless: Option<WirelessQuality>,
}

/// Link quality columns of a `/proc/net/wireless` record, kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessQuality {
    pub quality_link: String,
    pub quality_level: String,
    pub quality_noise: String,
    pub packets_nwid: String,
    pub packets_crypt: String,
    pub packets_frag: String,
    pub packets_retry: String,
    pub packets_misc: String,
    pub missed_beacons: String,
}

impl MemoryInfo {
    /// Build from byte counts; `available` is what the kernel can hand out.
    pub fn from_bytes(total: u64, available: u64) -> Self {
        let used = total.saturating_sub(available);
        Self {
            total_mem_mb: round2(bytes_to_mb(total)),
            used_mem_mb: round2(bytes_to_mb(used)),
            free_mem_mb: round2(bytes_to_mb(available)),
            used_mem_percentage: percentage(used, total),
            free_mem_percentage: percentage(available, total),
        }
    }
}

impl DriveInfo {
    /// Build from byte counts of a single filesystem.
    pub fn from_bytes(total: u64, available: u64) -> Self {
        let used = total.saturating_sub(available);
        Self {
            total_gb: round2(bytes_to_gb(total)),
            used_gb: round2(bytes_to_gb(used)),
            free_gb: round2(bytes_to_gb(available)),
            used_percentage: percentage(used, total),
            free_percentage: percentage(available, total),
        }
    }
}

fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0 / 1024.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_from_bytes() {
        let gib = 1024 * 1024 * 1024_u64;
        let memory = MemoryInfo::from_bytes(8 * gib, 2 * gib);

        assert_eq!(memory.total_mem_mb, 8192.0);
        assert_eq!(memory.used_mem_mb, 6144.0);
        assert_eq!(memory.free_mem_mb, 2048.0);
        assert_eq!(memory.used_mem_percentage, 75.0);
        assert_eq!(memory.free_mem_percentage, 25.0);
    }

    #[test]
    fn test_zero_sized_drive() {
        let drive = DriveInfo::from_bytes(0, 0);
        assert_eq!(drive, DriveInfo::default());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(MetricsSnapshot::default()).unwrap();
        let object = json.as_object().unwrap();

        for key in [
            "cpu_speeds_policy",
            "cpu_avg_speed_policy",
            "cpu_max_speed_policy",
            "cpu_speeds_nodeos",
            "cpu_avg_speed_nodeos",
            "cpu_max_speed_nodeos",
            "drive",
        ] {
            assert!(!object.contains_key(key), "{key} should be omitted");
        }
        assert_eq!(json["wifiStats"], serde_json::Value::Bool(false));
        assert_eq!(json["cpu_temperature"], serde_json::json!(0.0));
    }

    #[test]
    fn test_speed_keys_serialize_as_strings() {
        let snapshot = MetricsSnapshot {
            cpu_speeds_policy: Some(CpuSpeeds::from([(1, 1500), (2, 1800)])),
            ..Default::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["cpu_speeds_policy"]["1"], 1500);
        assert_eq!(json["cpu_speeds_policy"]["2"], 1800);
    }
}
