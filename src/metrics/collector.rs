//! Core telemetry collection pipeline.

use crate::config::CollectorConfig;
use crate::error::{Result, SystemError};
use crate::metrics::{
    data::*,
    sources::{self, or_fallback, round2},
    traits::MetricsProvider,
};
use futures_util::future::join_all;
use std::path::Path;
use std::time::Instant;
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System,
    MINIMUM_CPU_UPDATE_INTERVAL,
};
use tracing::debug;

/// Telemetry collector using sysinfo and direct sysfs/procfs reads.
///
/// Holds configuration only; every call to
/// [`collect_snapshot`](MetricsProvider::collect_snapshot) builds its own
/// OS handles, so one collector can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    config: CollectorConfig,
}

/// Results of the probes that run alongside the CPU sampling window.
struct FileProbes {
    temperature: Result<f64>,
    average: Result<CpuAverage>,
    policy_speeds: Option<Result<CpuSpeeds>>,
    wireless: Result<String>,
}

impl MetricsCollector {
    /// Create a new collector.
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// The configuration this collector runs with.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Run every probe and assemble a snapshot.
    pub async fn collect(&self) -> Result<MetricsSnapshot> {
        let started = Instant::now();

        let mut system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        if system.cpus().is_empty() {
            return Err(SystemError::unavailable("No CPU information available"));
        }

        // Usage is a delta between two refreshes, so the file probes run
        // while the sampling window elapses.
        let ((), probes) = tokio::join!(
            tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL),
            self.run_file_probes()
        );
        system.refresh_cpu_specifics(CpuRefreshKind::new().with_cpu_usage());

        let cpus = system.cpus();
        let cpu_model = cpus[0].brand().trim_end().to_string();
        let cpu_usage = (cpus.iter().map(|cpu| cpu.cpu_usage()).sum::<f32>() / cpus.len() as f32)
            .clamp(0.0, 100.0) as f64;
        let load = System::load_average();

        let mut snapshot = MetricsSnapshot {
            cpu_model,
            cpu_temperature: or_fallback("cpu_temperature", probes.temperature, 0.0),
            cpu_load1: round2(load.one),
            cpu_load5: round2(load.five),
            cpu_load15: round2(load.fifteen),
            cpu_current: round2(cpu_usage),
            cpu_free: round2(100.0 - cpu_usage),
            cpu_average: or_fallback("cpu_average", probes.average, CpuAverage::default()),
            ..Default::default()
        };

        if let Some(policy_speeds) = probes.policy_speeds {
            let speeds = or_fallback("cpu_speeds_policy", policy_speeds, CpuSpeeds::new());
            if let Some(summary) = sources::summarize_speeds(&speeds) {
                snapshot.cpu_speeds_policy = Some(speeds);
                snapshot.cpu_avg_speed_policy = Some(summary.average_mhz);
                snapshot.cpu_max_speed_policy = Some(summary.max_mhz);
            }
        }

        if self.config.enable_nodeos_cpu_speed {
            let speeds: CpuSpeeds = cpus
                .iter()
                .enumerate()
                .map(|(index, cpu)| (index + 1, cpu.frequency()))
                .collect();
            if let Some(summary) = sources::summarize_speeds(&speeds) {
                snapshot.cpu_speeds_nodeos = Some(speeds);
                snapshot.cpu_avg_speed_nodeos = Some(summary.average_mhz);
                snapshot.cpu_max_speed_nodeos = Some(summary.max_mhz);
            }
        }

        if self.config.enable_drive_info {
            snapshot.drive = collect_drive_info();
        }

        snapshot.memory = MemoryInfo::from_bytes(system.total_memory(), system.available_memory());
        snapshot.network = collect_network_info();

        let wireless = or_fallback("wireless", probes.wireless.map(Some), None);
        if let Some(contents) = wireless {
            let records = sources::parse_wireless(&contents);
            let matched = sources::attach_wireless(&mut snapshot.network, &records);
            debug!(records = records.len(), matched, "merged wireless link quality");
            snapshot.wifi_stats = true;
        }

        snapshot.os_uptime = System::uptime();
        snapshot.oos = System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| "unknown".to_string());
        snapshot.platform = std::env::consts::OS.to_string();

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            interfaces = snapshot.network.len(),
            "collected metrics snapshot"
        );

        Ok(snapshot)
    }

    /// Run the pseudo-file probes concurrently.
    async fn run_file_probes(&self) -> FileProbes {
        let policy = async {
            if self.config.enable_policy_cpu_speed {
                Some(self.probe_policy_speeds().await)
            } else {
                None
            }
        };

        let (temperature, average, policy_speeds, wireless) = tokio::join!(
            self.probe_temperature(),
            self.probe_cpu_average(),
            policy,
            sources::read_source(&self.config.wireless_path, self.config.probe_timeout),
        );

        FileProbes {
            temperature,
            average,
            policy_speeds,
            wireless,
        }
    }

    /// Read the thermal zone in degrees Celsius.
    async fn probe_temperature(&self) -> Result<f64> {
        let raw =
            sources::read_source(&self.config.thermal_zone_path, self.config.probe_timeout).await?;
        sources::parse_millidegrees(&raw)
    }

    /// Read cumulative per-core ticks.
    async fn probe_cpu_average(&self) -> Result<CpuAverage> {
        let raw =
            sources::read_source(&self.config.proc_stat_path, self.config.probe_timeout).await?;
        sources::parse_cpu_ticks(&raw)
    }

    /// Read every discovered cpufreq policy node.
    ///
    /// Keys follow discovery order, so an unreadable node leaves a gap
    /// rather than shifting later cores.
    async fn probe_policy_speeds(&self) -> Result<CpuSpeeds> {
        let nodes = sources::discover_policy_nodes(&self.config.cpufreq_policy_glob)?;
        let readings = join_all(nodes.iter().map(|node| async move {
            sources::read_source(node, self.config.probe_timeout)
                .await
                .and_then(|raw| sources::parse_khz(&raw))
        }))
        .await;

        let mut speeds = CpuSpeeds::new();
        for (position, (node, reading)) in nodes.iter().zip(readings).enumerate() {
            match reading {
                Ok(khz) => {
                    speeds.insert(position + 1, sources::khz_to_mhz(khz));
                }
                Err(err) => {
                    debug!(node = %node.display(), error = %err, "skipping cpufreq policy node");
                }
            }
        }

        Ok(speeds)
    }
}

impl MetricsProvider for MetricsCollector {
    async fn collect_snapshot(&self) -> Result<MetricsSnapshot> {
        self.collect().await
    }
}

/// Usage of the root filesystem, or of the first listed disk when no disk
/// is mounted at `/`.
fn collect_drive_info() -> Option<DriveInfo> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.iter().next())?;

    Some(DriveInfo::from_bytes(disk.total_space(), disk.available_space()))
}

/// Collect interface counters keyed by interface name.
fn collect_network_info() -> NetworkMap {
    let networks = Networks::new_with_refreshed_list();
    let interfaces = networks
        .iter()
        .map(|(name, data)| NetworkInterface {
            interface: name.clone(),
            input_bytes: data.total_received(),
            input_packets: data.total_packets_received(),
            input_errors: data.total_errors_on_received(),
            output_bytes: data.total_transmitted(),
            output_packets: data.total_packets_transmitted(),
            output_errors: data.total_errors_on_transmitted(),
            wireless: None,
        })
        .collect();

    index_by_name(interfaces)
}

/// Re-key a sequence of interface records by interface name.
fn index_by_name(interfaces: Vec<NetworkInterface>) -> NetworkMap {
    interfaces
        .into_iter()
        .map(|interface| (interface.interface.clone(), interface))
        .collect()
}
