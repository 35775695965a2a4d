//! # hostpulse - Host Telemetry Endpoint
//!
//! A small HTTP service reporting host telemetry as one JSON document per
//! request: CPU model, temperature, load averages, instantaneous usage,
//! per-core clock speed, memory, disk, network counters with wireless link
//! quality, uptime and platform.
//!
//! Every request runs a fresh collection pass. A probe that cannot read its
//! source falls back to a documented default (0, `false`, or an omitted
//! field) instead of failing the whole snapshot.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hostpulse::{start_web_server, CollectorConfig, MetricsCollector, WebConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collector = MetricsCollector::new(CollectorConfig::default());
//!
//!     // Serve snapshots on port 7777
//!     start_web_server(WebConfig::default().with_port(7777), collector).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod web;

// Re-export public API
pub use config::CollectorConfig;
pub use error::{Result, SystemError};
pub use metrics::{
    collector::MetricsCollector,
    data::{CpuAverage, DriveInfo, MemoryInfo, MetricsSnapshot, NetworkInterface, WirelessQuality},
    traits::MetricsProvider,
};

pub use web::{start_web_server, WebConfig};

/// The default web server port
pub const DEFAULT_LISTEN_PORT: u16 = 7777;
