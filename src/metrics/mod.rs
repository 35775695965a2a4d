//! Host telemetry collection and data structures.
//!
//! This module provides the collection pipeline behind `GET /`: CPU model,
//! temperature, load and usage, per-core clock speed from two independent
//! sources, memory, disk, network counters and wireless link quality.

pub mod collector;
pub mod data;
pub mod sources;
pub mod traits;

// Re-export commonly used items
pub use collector::MetricsCollector;
pub use data::MetricsSnapshot;
pub use traits::MetricsProvider;
