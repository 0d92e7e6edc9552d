//! JSONL file source.
//!
//! Reads one JSON object per line and hands them out in fixed-size batches.

mod source;

pub use source::{JsonlSource, DEFAULT_BATCH_SIZE};
