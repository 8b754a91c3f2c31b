use crate::source::TimelineSource;
use crate::types::{RawTweet, Result, ScraperError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info};

/// Deterministic timeline source backed by a pre-collected list of raw
/// candidates. Used to replay captured timeline dumps through the pipeline
/// and as the standard fake source in tests.
pub struct ScriptedSource {
    name: String,
    items: VecDeque<RawTweet>,
}

impl ScriptedSource {
    pub fn new(name: impl Into<String>, items: Vec<RawTweet>) -> Self {
        Self {
            name: name.into(),
            items: items.into(),
        }
    }

    /// Load a JSON dump (an array of raw candidates) from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ScraperError::Source(format!("failed to read {}: {e}", path.display())))?;
        let items: Vec<RawTweet> = serde_json::from_str(&data)
            .map_err(|e| ScraperError::Source(format!("failed to parse {}: {e}", path.display())))?;
        info!("Loaded {} raw candidates from {}", items.len(), path.display());
        Ok(Self::new(path.display().to_string(), items))
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl TimelineSource for ScriptedSource {
    fn source_name(&self) -> String {
        format!("scripted({})", self.name)
    }

    async fn next_batch(&mut self, max_items: usize) -> Result<Vec<RawTweet>> {
        let take = max_items.min(self.items.len());
        let batch: Vec<RawTweet> = self.items.drain(..take).collect();
        debug!(
            "Scripted source yielded {} candidates ({} remaining)",
            batch.len(),
            self.items.len()
        );
        Ok(batch)
    }
}
