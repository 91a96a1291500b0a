//! Synthetic filler: the last strategy, guaranteeing a full snapshot.

use async_trait::async_trait;
use shoptrends_core::{Candidate, Error, Normalizer};

use super::{CascadeRun, Strategy};

/// Generates numbered placeholder keywords for every remaining slot.
pub struct SyntheticFillerStrategy {
    normalizer: Normalizer,
}

impl SyntheticFillerStrategy {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }
}

#[async_trait]
impl Strategy for SyntheticFillerStrategy {
    fn name(&self) -> &'static str {
        "synthetic_filler"
    }

    async fn collect(&self, run: &CascadeRun) -> Result<Vec<Candidate>, Error> {
        Ok(self.normalizer.filler(run.seen(), run.len(), run.remaining()))
    }
}
