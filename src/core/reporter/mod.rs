//! Read-only usage and timeline views derived from counters

mod timeline;
mod usage;


pub use timeline::{Sample, collect_timeline, timeline};
pub use usage::{MetricSelection, MonitoringView, NamespaceUsage, UsageMetrics, UsageOverview, UsageReporter};
