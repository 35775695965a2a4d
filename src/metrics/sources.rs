//! Readers and parsers for the sysfs and procfs sources behind each probe.
//!
//! Everything here is free of global state so it can be exercised against
//! fixture files instead of the live host.

use crate::error::{Result, SystemError};
use crate::metrics::data::{CpuAverage, CpuSpeeds, NetworkMap, SpeedSummary, WirelessQuality};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Minimum number of columns in a `/proc/net/wireless` data row.
const WIRELESS_COLUMNS: usize = 11;

/// One data row of `/proc/net/wireless`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirelessRecord {
    pub interface: String,
    pub quality: WirelessQuality,
}

/// Read a pseudo-file as text, giving up after `timeout`.
pub async fn read_source(path: &Path, timeout: Duration) -> Result<String> {
    match tokio::time::timeout(timeout, tokio::fs::read_to_string(path)).await {
        Ok(contents) => Ok(contents?),
        Err(_) => Err(SystemError::timeout(path.display().to_string(), timeout)),
    }
}

/// Unwrap a probe result, substituting `fallback` when the probe failed.
pub fn or_fallback<T>(probe: &str, result: Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            debug!(probe, error = %err, "probe failed, using fallback");
            fallback
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total` as a two-decimal percentage, 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Convert a thermal zone reading to degrees Celsius.
///
/// Every non-digit character is dropped before parsing, so trailing
/// newlines and stray units are tolerated.
pub fn parse_millidegrees(raw: &str) -> Result<f64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let millidegrees = digits
        .parse::<u64>()
        .map_err(|e| SystemError::parse_error(format!("thermal reading {raw:?}: {e}")))?;

    Ok(round2(millidegrees as f64 / 1000.0))
}

/// Parse a cpufreq `scaling_cur_freq` node (kHz).
pub fn parse_khz(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| SystemError::parse_error(format!("cpufreq reading {raw:?}: {e}")))
}

/// kHz to MHz, rounded to the nearest MHz.
pub fn khz_to_mhz(khz: u64) -> u64 {
    (khz + 500) / 1000
}

/// Rounded mean and maximum of a speed mapping, `None` when it is empty.
pub fn summarize_speeds(speeds: &CpuSpeeds) -> Option<SpeedSummary> {
    let max_mhz = speeds.values().copied().max()?;
    let total: u64 = speeds.values().sum();
    let average_mhz = (total as f64 / speeds.len() as f64).round() as u64;

    Some(SpeedSummary {
        average_mhz,
        max_mhz,
    })
}

/// Find cpufreq policy nodes matching `pattern`, ordered by policy number.
pub fn discover_policy_nodes(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|e| SystemError::config_error(format!("Invalid cpufreq glob {pattern}: {e}")))?;

    let mut nodes: Vec<PathBuf> = paths.flatten().collect();
    nodes.sort_by(|a, b| {
        policy_index(a)
            .cmp(&policy_index(b))
            .then_with(|| a.cmp(b))
    });

    Ok(nodes)
}

/// Numeric suffix of the `policyN` directory holding `node`.
fn policy_index(node: &Path) -> usize {
    node.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("policy"))
        .and_then(|index| index.parse().ok())
        .unwrap_or(usize::MAX)
}

/// Parse the data rows of `/proc/net/wireless`.
///
/// Header rows (those containing `|`) and short rows are skipped. The dot
/// the kernel appends to the link and level columns is removed.
pub fn parse_wireless(contents: &str) -> Vec<WirelessRecord> {
    contents
        .lines()
        .filter(|line| !line.contains('|'))
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < WIRELESS_COLUMNS {
                return None;
            }

            Some(WirelessRecord {
                interface: columns[0].trim_end_matches(':').to_string(),
                quality: WirelessQuality {
                    quality_link: columns[2].replace('.', ""),
                    quality_level: columns[3].replace('.', ""),
                    quality_noise: columns[4].to_string(),
                    packets_nwid: columns[5].to_string(),
                    packets_crypt: columns[6].to_string(),
                    packets_frag: columns[7].to_string(),
                    packets_retry: columns[8].to_string(),
                    packets_misc: columns[9].to_string(),
                    missed_beacons: columns[10].to_string(),
                },
            })
        })
        .collect()
}

/// Attach wireless quality to matching interfaces, returning the match count.
pub fn attach_wireless(network: &mut NetworkMap, records: &[WirelessRecord]) -> usize {
    let mut matched = 0;
    for record in records {
        if let Some(interface) = network.get_mut(&record.interface) {
            interface.wireless = Some(record.quality.clone());
            matched += 1;
        }
    }
    matched
}

/// Sum the per-core tick counters of `/proc/stat`.
///
/// Busy time is `user + nice + system + irq`; the aggregate `cpu` row is
/// ignored so that averages are per core.
pub fn parse_cpu_ticks(contents: &str) -> Result<CpuAverage> {
    let mut total_idle = 0u64;
    let mut total_tick = 0u64;
    let mut cores = 0u64;

    for line in contents.lines() {
        let mut columns = line.split_whitespace();
        let Some(label) = columns.next() else {
            continue;
        };
        let is_core = label
            .strip_prefix("cpu")
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()));
        if !is_core {
            continue;
        }

        let ticks: Vec<u64> = columns
            .map(str::parse::<u64>)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| SystemError::parse_error(format!("{label} counters: {e}")))?;
        if ticks.len() < 6 {
            return Err(SystemError::parse_error(format!(
                "{label} has {} counters, expected at least 6",
                ticks.len()
            )));
        }

        let (user, nice, system, idle, irq) = (ticks[0], ticks[1], ticks[2], ticks[3], ticks[5]);
        total_idle += idle;
        total_tick += user + nice + system + idle + irq;
        cores += 1;
    }

    if cores == 0 {
        return Err(SystemError::parse_error("no per-core rows in /proc/stat"));
    }

    Ok(CpuAverage {
        total_idle,
        total_tick,
        avg_idle: total_idle as f64 / cores as f64,
        avg_total: total_tick as f64 / cores as f64,
    })
}
