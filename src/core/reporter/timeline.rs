//! Counter timelines

use crate::core::context::AppContext;
use crate::core::models::CounterKind;
use crate::core::rate_limiter::{CounterEngine, Window};
use crate::utils::error::Result;
use futures::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};

/// One point of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Window start, or the read time for the concurrency gauge
    pub timestamp: u64,
    pub value: u64,
}

/// Counter values for the last `bucket_count` windows of `bucket_size`
/// seconds, oldest first
///
/// Nothing is read until the stream is polled, and each window is read as
/// it is yielded. Expired or never-written windows read as 0. The
/// concurrency gauge has no history and yields a single current sample.
pub fn timeline(
    ctx: &AppContext,
    namespace_id: i32,
    kind: CounterKind,
    bucket_count: usize,
    bucket_size: u64,
) -> impl Stream<Item = Result<Sample>> + Send + 'static {
    let counters = CounterEngine::new(ctx.clone());
    let now = ctx.now();

    async_stream::try_stream! {
        if kind.is_windowed() {
            let current = Window::containing(now, bucket_size);
            // No window starts before the epoch
            let buckets = (bucket_count as u64).min(current.start / current.size + 1);
            for back in (0..buckets).rev() {
                let Some(start) = back
                    .checked_mul(current.size)
                    .and_then(|offset| current.start.checked_sub(offset))
                else {
                    break;
                };
                let value = counters.read_window(namespace_id, kind, start).await?;
                yield Sample { timestamp: start, value };
            }
        } else {
            let value = counters.read(namespace_id, kind).await?;
            yield Sample { timestamp: now, value };
        }
    }
}

/// Read a whole timeline into memory
pub async fn collect_timeline(
    ctx: &AppContext,
    namespace_id: i32,
    kind: CounterKind,
    bucket_count: usize,
    bucket_size: u64,
) -> Result<Vec<Sample>> {
    timeline(ctx, namespace_id, kind, bucket_count, bucket_size)
        .try_collect()
        .await
}
