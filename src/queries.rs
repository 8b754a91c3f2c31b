use crate::store::TweetStore;
use crate::types::{DeleteOutcome, Result, ScraperError, StoreStats, Tweet};
use tracing::info;

pub const MAX_QUERY_LIMIT: i64 = 500;
pub const DEFAULT_QUERY_LIMIT: i64 = 50;

/// Read-side facade over the store: the pass-through queries plus input
/// validation, so callers (CLI, HTTP shims) never hand raw limits or blank
/// identifiers to the storage layer.
pub struct TimelineQueries {
    store: TweetStore,
}

impl TimelineQueries {
    pub fn new(store: TweetStore) -> Self {
        Self { store }
    }

    /// Stored tweets ordered by `scraped_at` descending.
    pub async fn list(&self, limit: Option<i64>, offset: Option<i64>) -> Result<Vec<Tweet>> {
        let limit = clamp_limit(limit);
        let offset = offset.unwrap_or(0).max(0);
        self.store.get_all(limit, offset).await
    }

    /// The `limit` most recently scraped tweets.
    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<Tweet>> {
        self.store.get_recent(clamp_limit(limit)).await
    }

    pub async fn by_author(&self, author: &str) -> Result<Vec<Tweet>> {
        let author = author.trim().trim_start_matches('@');
        if author.is_empty() {
            return Err(ScraperError::InvalidInput(
                "author handle must not be blank".to_string(),
            ));
        }
        self.store.get_by_author(author).await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        self.store.get_stats().await
    }

    /// Administrative delete. A miss is a negative result, not an error.
    pub async fn delete(&self, tweet_id: &str) -> Result<bool> {
        let tweet_id = tweet_id.trim();
        if tweet_id.is_empty() {
            return Err(ScraperError::InvalidInput(
                "tweet id must not be blank".to_string(),
            ));
        }
        match self.store.delete_by_id(tweet_id).await? {
            DeleteOutcome::Deleted => Ok(true),
            DeleteOutcome::NotFound => {
                info!("Nothing to delete for tweet id {}", tweet_id);
                Ok(false)
            }
        }
    }

    /// Mark or unmark a stored tweet for downstream thread building.
    /// Returns false when no such tweet exists.
    pub async fn set_thread_selected(&self, tweet_id: &str, selected: bool) -> Result<bool> {
        let tweet_id = tweet_id.trim();
        if tweet_id.is_empty() {
            return Err(ScraperError::InvalidInput(
                "tweet id must not be blank".to_string(),
            ));
        }
        self.store.set_thread_selected(tweet_id, selected).await
    }

    /// Store reachability only; says nothing about any timeline source.
    pub async fn health(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_QUERY_LIMIT).clamp(1, MAX_QUERY_LIMIT)
}
