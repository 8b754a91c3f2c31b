use crate::types::{
    AuthorCount, DeleteOutcome, InsertOutcome, Result, ScraperError, StoreStats, Tweet,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

/// Deduplicating tweet store on SQLite.
///
/// Uniqueness of `tweet_id` is enforced by the table's UNIQUE constraint,
/// not by a check-then-insert, so concurrent runs inserting the same id
/// resolve to exactly one `Inserted`. Cloning shares the connection pool.
#[derive(Clone)]
pub struct TweetStore {
    pool: Pool<Sqlite>,
}

impl TweetStore {
    /// Connect to the given database URL, creating the file and schema if
    /// they do not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(ScraperError::StoreUnavailable)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(ScraperError::StoreUnavailable)?;

        let store = Self { pool };
        store.setup_schema().await?;
        info!("Connected to tweet store at {}", database_url);
        Ok(store)
    }

    /// In-memory store for tests. A single pooled connection keeps the
    /// memory database alive and shared across callers of the clone.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(ScraperError::StoreUnavailable)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(ScraperError::StoreUnavailable)?;

        let store = Self { pool };
        store.setup_schema().await?;
        Ok(store)
    }

    async fn setup_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS timeline_tweets (
                id TEXT PRIMARY KEY,
                tweet_id TEXT NOT NULL UNIQUE,
                content TEXT NOT NULL,
                author TEXT,
                tweet_url TEXT,
                thread_selected INTEGER NOT NULL DEFAULT 0,
                scraped_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_timeline_tweets_scraped_at
             ON timeline_tweets (scraped_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_timeline_tweets_author
             ON timeline_tweets (author)",
        )
        .execute(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        Ok(())
    }

    /// Insert the tweet unless a row with the same `tweet_id` already
    /// exists. First writer wins; later attempts see `AlreadyExists`.
    pub async fn insert_if_absent(&self, tweet: &Tweet) -> Result<InsertOutcome> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO timeline_tweets
                (id, tweet_id, content, author, tweet_url, thread_selected,
                 scraped_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (tweet_id) DO NOTHING
            "#,
        )
        .bind(tweet.id.to_string())
        .bind(&tweet.tweet_id)
        .bind(&tweet.content)
        .bind(&tweet.author)
        .bind(&tweet.tweet_url)
        .bind(tweet.thread_selected)
        .bind(tweet.scraped_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                debug!("Saved new tweet {}", tweet.tweet_id);
                Ok(InsertOutcome::Inserted)
            }
            Ok(_) => {
                debug!("Tweet {} already stored", tweet.tweet_id);
                Ok(InsertOutcome::AlreadyExists)
            }
            // The ON CONFLICT clause normally absorbs duplicates; if the
            // constraint still fires it is the same outcome, not a failure.
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::AlreadyExists),
            Err(e) => Err(ScraperError::StoreUnavailable(e)),
        }
    }

    /// All stored tweets, newest scrape first.
    pub async fn get_all(&self, limit: i64, offset: i64) -> Result<Vec<Tweet>> {
        let rows = sqlx::query(
            "SELECT * FROM timeline_tweets ORDER BY scraped_at DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        rows.into_iter().map(tweet_from_row).collect()
    }

    pub async fn get_recent(&self, limit: i64) -> Result<Vec<Tweet>> {
        self.get_all(limit, 0).await
    }

    pub async fn get_by_author(&self, author: &str) -> Result<Vec<Tweet>> {
        let rows = sqlx::query(
            "SELECT * FROM timeline_tweets WHERE author = ? ORDER BY scraped_at DESC",
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        rows.into_iter().map(tweet_from_row).collect()
    }

    /// Aggregate counts, computed fresh on every call.
    pub async fn get_stats(&self) -> Result<StoreStats> {
        let total_tweets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM timeline_tweets")
            .fetch_one(&self.pool)
            .await
            .map_err(ScraperError::StoreUnavailable)?;

        let distinct_authors: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT author) FROM timeline_tweets WHERE author IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        let rows = sqlx::query(
            r#"
            SELECT author, COUNT(*) AS tweet_count
            FROM timeline_tweets
            WHERE author IS NOT NULL
            GROUP BY author
            ORDER BY tweet_count DESC, author ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        let mut per_author = Vec::with_capacity(rows.len());
        for row in rows {
            per_author.push(AuthorCount {
                author: row
                    .try_get("author")
                    .map_err(ScraperError::StoreUnavailable)?,
                count: row
                    .try_get("tweet_count")
                    .map_err(ScraperError::StoreUnavailable)?,
            });
        }

        Ok(StoreStats {
            total_tweets,
            distinct_authors,
            per_author,
        })
    }

    pub async fn delete_by_id(&self, tweet_id: &str) -> Result<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM timeline_tweets WHERE tweet_id = ?")
            .bind(tweet_id)
            .execute(&self.pool)
            .await
            .map_err(ScraperError::StoreUnavailable)?;

        if result.rows_affected() > 0 {
            info!("Deleted tweet {}", tweet_id);
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    /// Flip the thread-selection flag. `updated_at` is refreshed in the same
    /// statement; no other column of a stored row is ever mutated.
    pub async fn set_thread_selected(&self, tweet_id: &str, selected: bool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE timeline_tweets SET thread_selected = ?, updated_at = ? WHERE tweet_id = ?",
        )
        .bind(selected)
        .bind(Utc::now())
        .bind(tweet_id)
        .execute(&self.pool)
        .await
        .map_err(ScraperError::StoreUnavailable)?;

        Ok(result.rows_affected() > 0)
    }

    /// Cheap reachability probe for health checks.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(ScraperError::StoreUnavailable)?;
        Ok(())
    }

    /// Graceful shutdown; subsequent calls fail with `StoreUnavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn tweet_from_row(row: SqliteRow) -> Result<Tweet> {
    let id: String = row.try_get("id").map_err(ScraperError::StoreUnavailable)?;
    let id = uuid::Uuid::parse_str(&id)
        .map_err(|e| ScraperError::StoreUnavailable(sqlx::Error::Decode(Box::new(e))))?;

    Ok(Tweet {
        id,
        tweet_id: row
            .try_get("tweet_id")
            .map_err(ScraperError::StoreUnavailable)?,
        content: row
            .try_get("content")
            .map_err(ScraperError::StoreUnavailable)?,
        author: row
            .try_get("author")
            .map_err(ScraperError::StoreUnavailable)?,
        tweet_url: row
            .try_get("tweet_url")
            .map_err(ScraperError::StoreUnavailable)?,
        thread_selected: row
            .try_get("thread_selected")
            .map_err(ScraperError::StoreUnavailable)?,
        scraped_at: row
            .try_get::<DateTime<Utc>, _>("scraped_at")
            .map_err(ScraperError::StoreUnavailable)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(ScraperError::StoreUnavailable)?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(ScraperError::StoreUnavailable)?,
    })
}
