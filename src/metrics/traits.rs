//! Traits for host telemetry collection.

use crate::error::Result;
use crate::metrics::data::MetricsSnapshot;

/// Source of [`MetricsSnapshot`]s.
///
/// The HTTP layer depends only on this trait, one call per request.
/// Implementations must not share mutable state between calls: concurrent
/// requests each get an independent collection pass.
pub trait MetricsProvider: Send + Sync + 'static {
    /// Run one collection pass.
    ///
    /// Individual probe failures are absorbed into fallback values; an `Err`
    /// means nothing at all could be collected.
    fn collect_snapshot(&self) -> impl std::future::Future<Output = Result<MetricsSnapshot>> + Send;
}
