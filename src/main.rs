use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use timeline_scraper::{
    CollectorConfig, SchedulerConfig, ScraperScheduler, ScriptedSource, TimelineCollector,
    TimelineQueries, TimelineSource, TweetStore,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "timeline-scraper", version, about = "Collect timeline posts into a deduplicated store")]
struct Cli {
    /// SQLite database URL; the file is created on first use.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://timeline.db")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one collection pass over a captured timeline dump.
    Scrape {
        /// JSON file with an array of raw candidates to replay.
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 10)]
        max_items: usize,
        /// Overall run budget in seconds.
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
    },
    /// List stored tweets, newest scrape first.
    List {
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
    },
    /// Show the most recently scraped tweets.
    Recent {
        #[arg(long)]
        limit: Option<i64>,
    },
    /// List stored tweets by author handle.
    Author { handle: String },
    /// Aggregate counts over the whole store.
    Stats,
    /// Delete one stored tweet by its tweet id.
    Delete { tweet_id: String },
    /// Mark (or unmark) a tweet for downstream thread building.
    Select {
        tweet_id: String,
        #[arg(long)]
        unselect: bool,
    },
    /// Report store reachability.
    Health,
    /// Repeat collection runs on a jittered interval.
    Watch {
        #[arg(long)]
        input: PathBuf,
        /// Base minutes between runs; actual waits vary by ±20%.
        #[arg(long, default_value_t = 10)]
        interval_mins: u64,
        #[arg(long, default_value_t = 10)]
        max_items: usize,
        #[arg(long)]
        max_runs: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = TweetStore::connect(&cli.database_url).await?;
    let queries = TimelineQueries::new(store.clone());

    match cli.command {
        Command::Scrape {
            input,
            max_items,
            timeout_secs,
        } => {
            let mut source = ScriptedSource::from_file(&input)?;
            let config = CollectorConfig {
                run_timeout: Duration::from_secs(timeout_secs),
                ..CollectorConfig::default()
            };
            let collector = TimelineCollector::with_config(store.clone(), config);
            let summary = collector.collect(&mut source, max_items).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::List { limit, offset } => {
            let tweets = queries.list(limit, offset).await?;
            println!("{}", serde_json::to_string_pretty(&tweets)?);
        }
        Command::Recent { limit } => {
            let tweets = queries.recent(limit).await?;
            println!("{}", serde_json::to_string_pretty(&tweets)?);
        }
        Command::Author { handle } => {
            let tweets = queries.by_author(&handle).await?;
            println!("{}", serde_json::to_string_pretty(&tweets)?);
        }
        Command::Stats => {
            let stats = queries.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Delete { tweet_id } => {
            let deleted = queries.delete(&tweet_id).await?;
            println!("{}", serde_json::json!({ "deleted": deleted }));
        }
        Command::Select { tweet_id, unselect } => {
            let updated = queries.set_thread_selected(&tweet_id, !unselect).await?;
            println!("{}", serde_json::json!({ "updated": updated }));
        }
        Command::Health => {
            let ok = queries.health().await;
            println!("{}", serde_json::json!({ "ok": ok }));
        }
        Command::Watch {
            input,
            interval_mins,
            max_items,
            max_runs,
        } => {
            let collector = TimelineCollector::new(store.clone());
            let config = SchedulerConfig {
                base_interval: Duration::from_secs(interval_mins * 60),
                max_items,
                max_runs,
            };
            let scheduler = ScraperScheduler::new(collector, config);
            scheduler
                .run(move || {
                    ScriptedSource::from_file(&input)
                        .map(|s| Box::new(s) as Box<dyn TimelineSource>)
                })
                .await;
        }
    }

    info!("Done");
    store.close().await;
    Ok(())
}
