use crate::collector::TimelineCollector;
use crate::source::TimelineSource;
use crate::types::Result;
use rand::Rng;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Base interval between runs; each wait is drawn uniformly from
    /// base ± 20% so repeated runs do not fire on a fixed cadence.
    pub base_interval: Duration,
    /// Candidates to collect per run.
    pub max_items: usize,
    /// Stop after this many runs; `None` runs until cancelled.
    pub max_runs: Option<u32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(600),
            max_items: 10,
            max_runs: None,
        }
    }
}

/// Repeats collection runs on a jittered interval. Each run gets a fresh
/// source from the factory, mirroring how a live session is opened per run.
pub struct ScraperScheduler {
    collector: TimelineCollector,
    config: SchedulerConfig,
}

impl ScraperScheduler {
    pub fn new(collector: TimelineCollector, config: SchedulerConfig) -> Self {
        Self { collector, config }
    }

    pub async fn run<F>(&self, mut make_source: F)
    where
        F: FnMut() -> Result<Box<dyn TimelineSource>>,
    {
        let mut run_count: u32 = 0;

        info!(
            "Scheduler started: base interval {:?}, {} items per run",
            self.config.base_interval, self.config.max_items
        );

        loop {
            run_count += 1;
            info!("Starting scheduled run #{}", run_count);

            match make_source() {
                Ok(mut source) => {
                    let summary = self
                        .collector
                        .collect(source.as_mut(), self.config.max_items)
                        .await;
                    info!(
                        "Run #{} summary: saved={} duplicates={} invalid={}",
                        run_count, summary.saved, summary.skipped_duplicates, summary.skipped_invalid
                    );
                }
                Err(e) => error!("Run #{}: failed to open source: {}", run_count, e),
            }

            if let Some(max_runs) = self.config.max_runs {
                if run_count >= max_runs {
                    info!("Completed {} runs, stopping scheduler", max_runs);
                    break;
                }
            }

            let wait = self.jittered_interval();
            info!("Next run in {:.1} minutes", wait.as_secs_f64() / 60.0);
            tokio::time::sleep(wait).await;
        }
    }

    fn jittered_interval(&self) -> Duration {
        let factor = rand::thread_rng().gen_range(0.8..=1.2);
        self.config.base_interval.mul_f64(factor)
    }
}
