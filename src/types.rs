use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted timeline post.
///
/// Rows are immutable after insertion except for `thread_selected` and the
/// store-managed `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: Uuid,
    pub tweet_id: String,
    pub content: String,
    pub author: Option<String>,
    pub tweet_url: Option<String>,
    pub thread_selected: bool,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An unvalidated candidate as produced by a timeline source, prior to
/// extraction. Any field may be missing or malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTweet {
    pub tweet_url: Option<String>,
    pub text: Option<String>,
    pub author: Option<String>,
}

impl RawTweet {
    pub fn new(tweet_url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tweet_url: Some(tweet_url.into()),
            text: Some(text.into()),
            author: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Result of a single `insert_if_absent` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Result of a delete-by-id call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// How a collection run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The source was exhausted or `max_items` candidates were consumed.
    Completed,
    /// The run budget expired; counts reflect work done so far.
    SourceTimedOut,
    /// The source returned a hard error mid-run.
    SourceFailed,
    /// The store became unreachable; remaining items were not attempted.
    StoreUnavailable,
}

/// Counters accumulated over one collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub collected: usize,
    pub saved: usize,
    pub skipped_duplicates: usize,
    pub skipped_invalid: usize,
    pub errors: usize,
    pub outcome: RunOutcome,
}

impl CollectionSummary {
    pub(crate) fn new() -> Self {
        Self {
            collected: 0,
            saved: 0,
            skipped_duplicates: 0,
            skipped_invalid: 0,
            errors: 0,
            outcome: RunOutcome::Completed,
        }
    }
}

/// Per-author row in the aggregate stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: i64,
}

/// Aggregate view over the whole store, computed at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_tweets: i64,
    pub distinct_authors: i64,
    pub per_author: Vec<AuthorCount>,
}

/// Why the extractor refused a raw candidate. Per-item and non-fatal: the
/// collector records these as skips and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("no /status/ identifier found in candidate URL")]
    MissingIdentifier,

    #[error("empty content after normalization")]
    EmptyContent,
}

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    /// The backing store is unreachable or failing. Fatal for the current
    /// run; distinct from a duplicate or a lookup miss.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("timeline source error: {0}")]
    Source(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
