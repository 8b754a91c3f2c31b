use crate::extractor;
use crate::source::TimelineSource;
use crate::store::TweetStore;
use crate::types::{CollectionSummary, InsertOutcome, RunOutcome, ScraperError};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Overall budget for one run, covering every source pull. Expiry aborts
    /// the run between items; counts accumulated so far are returned.
    pub run_timeout: Duration,
    /// How many candidates to request from the source per pull.
    pub batch_size: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            run_timeout: Duration::from_secs(120),
            batch_size: 20,
        }
    }
}

/// Drives one collection run: pull raw candidates from a timeline source,
/// extract and validate them, and persist each through the store's atomic
/// insert-if-absent.
pub struct TimelineCollector {
    store: TweetStore,
    config: CollectorConfig,
}

impl TimelineCollector {
    pub fn new(store: TweetStore) -> Self {
        Self::with_config(store, CollectorConfig::default())
    }

    pub fn with_config(store: TweetStore, config: CollectorConfig) -> Self {
        Self { store, config }
    }

    /// Collect up to `max_items` candidates from the source and persist the
    /// valid, previously-unseen ones.
    ///
    /// Ordinary outcomes (duplicates, rejected candidates, a source that
    /// runs dry early) are absorbed into the summary counters and never
    /// abort the run. Store connectivity loss stops the run immediately;
    /// re-invoking `collect` later is safe because duplicate skipping makes
    /// runs idempotent.
    pub async fn collect(
        &self,
        source: &mut dyn TimelineSource,
        max_items: usize,
    ) -> CollectionSummary {
        let mut summary = CollectionSummary::new();
        if max_items == 0 {
            return summary;
        }

        let deadline = Instant::now() + self.config.run_timeout;
        // Ids already handled in this run, so a timeline that shows the same
        // post twice does not cost a second store round-trip. The UNIQUE
        // constraint remains the authority across runs.
        let mut seen_ids: HashSet<String> = HashSet::new();

        info!(
            "Starting collection run: up to {} items from {}",
            max_items,
            source.source_name()
        );

        'run: while summary.collected < max_items {
            let want = (max_items - summary.collected).min(self.config.batch_size);
            let batch = match timeout_at(deadline, source.next_batch(want)).await {
                Err(_) => {
                    warn!(
                        "Run budget of {:?} expired while pulling from source; returning partial results",
                        self.config.run_timeout
                    );
                    summary.outcome = RunOutcome::SourceTimedOut;
                    break;
                }
                Ok(Err(e)) => {
                    error!("Timeline source failed: {}", e);
                    summary.errors += 1;
                    summary.outcome = RunOutcome::SourceFailed;
                    break;
                }
                Ok(Ok(batch)) => batch,
            };

            if batch.is_empty() {
                debug!("Source exhausted after {} candidates", summary.collected);
                break;
            }

            for raw in batch {
                if summary.collected >= max_items {
                    break;
                }
                if Instant::now() >= deadline {
                    warn!("Run budget expired between items; returning partial results");
                    summary.outcome = RunOutcome::SourceTimedOut;
                    break 'run;
                }
                summary.collected += 1;

                let tweet = match extractor::extract(&raw) {
                    Ok(tweet) => tweet,
                    Err(reason) => {
                        debug!("Skipping candidate: {}", reason);
                        summary.skipped_invalid += 1;
                        continue;
                    }
                };

                if !seen_ids.insert(tweet.tweet_id.clone()) {
                    debug!("Tweet {} already seen in this run", tweet.tweet_id);
                    summary.skipped_duplicates += 1;
                    continue;
                }

                match self.store.insert_if_absent(&tweet).await {
                    Ok(InsertOutcome::Inserted) => summary.saved += 1,
                    Ok(InsertOutcome::AlreadyExists) => summary.skipped_duplicates += 1,
                    Err(ScraperError::StoreUnavailable(e)) => {
                        // Connectivity loss is not item-local; the remaining
                        // items would fail the same way.
                        error!("Store unavailable, aborting run: {}", e);
                        summary.errors += 1;
                        summary.outcome = RunOutcome::StoreUnavailable;
                        break 'run;
                    }
                    Err(e) => {
                        error!("Unexpected store error for {}: {}", tweet.tweet_id, e);
                        summary.errors += 1;
                    }
                }
            }
        }

        info!(
            "Run finished ({:?}): collected={} saved={} duplicates={} invalid={} errors={}",
            summary.outcome,
            summary.collected,
            summary.saved,
            summary.skipped_duplicates,
            summary.skipped_invalid,
            summary.errors
        );
        summary
    }
}
