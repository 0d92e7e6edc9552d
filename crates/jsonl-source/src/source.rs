//! JSONL reading logic

use anyhow::{anyhow, bail, Context, Result};
use mover_core::{record_from_value, Batch, Source};
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Streams records from a JSONL file.
///
/// Blank lines are skipped. An empty batch means the file is exhausted.
pub struct JsonlSource {
    path: PathBuf,
    batch_size: usize,
    lines: Option<Lines<BufReader<File>>>,
    line_number: usize,
}

impl JsonlSource {
    pub fn new(path: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            path: path.into(),
            batch_size,
            lines: None,
            line_number: 0,
        }
    }

    /// Lines consumed so far, blank ones included.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

#[async_trait::async_trait]
impl Source for JsonlSource {
    async fn initialize(&mut self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("JSONL batch size must be greater than zero");
        }
        let file = File::open(&self.path)
            .await
            .with_context(|| format!("Failed to open JSONL file {:?}", self.path))?;
        self.lines = Some(BufReader::new(file).lines());
        self.line_number = 0;
        tracing::info!("Processing JSONL from: {:?}", self.path);
        Ok(())
    }

    async fn get_data(&mut self) -> Result<Batch> {
        let Some(lines) = self.lines.as_mut() else {
            bail!("JSONL source {:?} is not initialized", self.path);
        };

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            let Some(line) = lines
                .next_line()
                .await
                .with_context(|| format!("Failed to read {:?}", self.path))?
            else {
                break;
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(&line)
                .map_err(|e| anyhow!("Error parsing JSON at line {}: {e}", self.line_number))?;
            let record = record_from_value(value)
                .ok_or_else(|| anyhow!("Line {} is not a JSON object", self.line_number))?;
            batch.push(record);
        }

        tracing::debug!(
            "Read batch of {} records (through line {})",
            batch.len(),
            self.line_number
        );
        Ok(batch)
    }
}
