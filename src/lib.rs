pub mod collector;
pub mod extractor;
pub mod queries;
pub mod scheduler;
pub mod source;
pub mod sources;
pub mod store;
pub mod types;

pub use collector::{CollectorConfig, TimelineCollector};
pub use queries::TimelineQueries;
pub use scheduler::{ScraperScheduler, SchedulerConfig};
pub use source::TimelineSource;
pub use sources::ScriptedSource;
pub use store::TweetStore;
pub use types::*;
