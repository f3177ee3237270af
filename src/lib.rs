//! One-shot preparation of a combined OpenAssistant + Alpaca QA dataset:
//! download, normalize, shuffle/split, write JSONL, upload to S3.

pub mod config;
pub mod dataset;
pub mod extract;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod store;
