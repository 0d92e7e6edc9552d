//! In-memory source.

use crate::record::Batch;
use crate::traits::Source;
use std::collections::VecDeque;

/// A [`Source`] that hands out a fixed list of batches in order.
///
/// Empty batches in the input are skipped so that an empty result always
/// means exhaustion.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    batches: VecDeque<Batch>,
}

impl MemorySource {
    pub fn new(batches: impl IntoIterator<Item = Batch>) -> Self {
        Self {
            batches: batches.into_iter().filter(|b| !b.is_empty()).collect(),
        }
    }

    /// Number of batches not yet handed out.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

#[async_trait::async_trait]
impl Source for MemorySource {
    async fn initialize(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn get_data(&mut self) -> anyhow::Result<Batch> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
