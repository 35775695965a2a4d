//! Collector configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default sysfs node holding the CPU temperature in millidegrees.
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Default glob matching every cpufreq policy's current frequency node.
pub const DEFAULT_CPUFREQ_POLICY_GLOB: &str =
    "/sys/devices/system/cpu/cpufreq/policy*/scaling_cur_freq";

/// Default wireless status pseudo-file.
pub const DEFAULT_WIRELESS_PATH: &str = "/proc/net/wireless";

/// Default kernel CPU counters pseudo-file.
pub const DEFAULT_PROC_STAT_PATH: &str = "/proc/stat";

/// Default upper bound for a single pseudo-file read, in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;

/// Configuration for a [`MetricsCollector`](crate::MetricsCollector).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// File read for the raw CPU temperature
    pub thermal_zone_path: PathBuf,
    /// Probe per-core clock speed through cpufreq policy nodes
    pub enable_policy_cpu_speed: bool,
    /// Probe per-core clock speed through the OS core table
    pub enable_nodeos_cpu_speed: bool,
    /// Report root filesystem usage
    pub enable_drive_info: bool,
    /// Glob used to discover cpufreq policy nodes
    pub cpufreq_policy_glob: String,
    /// Wireless status pseudo-file
    pub wireless_path: PathBuf,
    /// Per-core tick counters pseudo-file
    pub proc_stat_path: PathBuf,
    /// Upper bound for each pseudo-file read
    pub probe_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            thermal_zone_path: PathBuf::from(DEFAULT_THERMAL_ZONE),
            enable_policy_cpu_speed: true,
            enable_nodeos_cpu_speed: true,
            enable_drive_info: false,
            cpufreq_policy_glob: DEFAULT_CPUFREQ_POLICY_GLOB.to_string(),
            wireless_path: PathBuf::from(DEFAULT_WIRELESS_PATH),
            proc_stat_path: PathBuf::from(DEFAULT_PROC_STAT_PATH),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }
}

impl CollectorConfig {
    /// Set the thermal zone file.
    pub fn with_thermal_zone(mut self, path: impl Into<PathBuf>) -> Self {
        self.thermal_zone_path = path.into();
        self
    }

    /// Enable or disable the cpufreq policy speed probe.
    pub fn with_policy_cpu_speed(mut self, enabled: bool) -> Self {
        self.enable_policy_cpu_speed = enabled;
        self
    }

    /// Enable or disable the OS-reported speed probe.
    pub fn with_nodeos_cpu_speed(mut self, enabled: bool) -> Self {
        self.enable_nodeos_cpu_speed = enabled;
        self
    }

    /// Enable or disable the drive usage probe.
    pub fn with_drive_info(mut self, enabled: bool) -> Self {
        self.enable_drive_info = enabled;
        self
    }

    /// Set the glob used to discover cpufreq policy nodes.
    pub fn with_cpufreq_policy_glob(mut self, pattern: impl Into<String>) -> Self {
        self.cpufreq_policy_glob = pattern.into();
        self
    }

    /// Set the wireless status file.
    pub fn with_wireless_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.wireless_path = path.into();
        self
    }

    /// Set the per-core tick counters file.
    pub fn with_proc_stat_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.proc_stat_path = path.into();
        self
    }

    /// Set the per-read timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.thermal_zone_path, PathBuf::from(DEFAULT_THERMAL_ZONE));
        assert!(config.enable_policy_cpu_speed);
        assert!(config.enable_nodeos_cpu_speed);
        assert!(!config.enable_drive_info);
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_builder() {
        let config = CollectorConfig::default()
            .with_thermal_zone("/tmp/temp")
            .with_policy_cpu_speed(false)
            .with_drive_info(true)
            .with_probe_timeout(Duration::from_millis(50));

        assert_eq!(config.thermal_zone_path, PathBuf::from("/tmp/temp"));
        assert!(!config.enable_policy_cpu_speed);
        assert!(config.enable_nodeos_cpu_speed);
        assert!(config.enable_drive_info);
        assert_eq!(config.probe_timeout, Duration::from_millis(50));
    }
}
