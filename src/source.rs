use crate::types::{RawTweet, Result};
use async_trait::async_trait;

/// Trait for anything that can yield raw timeline candidates: a live browser
/// session scrolling a home timeline, a captured dump being replayed, or a
/// scripted fixture in tests.
///
/// A source is consumed over one collection run. It yields candidates in
/// timeline order, may return fewer items than asked for, and signals
/// exhaustion with an empty batch. It is treated as a blocking, possibly
/// slow resource; the collector bounds the total time spent pulling.
#[async_trait]
pub trait TimelineSource: Send {
    /// Human-readable name for logs.
    fn source_name(&self) -> String;

    /// Produce the next batch of raw candidates, at most `max_items` of
    /// them. An empty batch means the source has nothing more to give.
    async fn next_batch(&mut self, max_items: usize) -> Result<Vec<RawTweet>>;
}
