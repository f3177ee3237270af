use std::path::PathBuf;

pub const OASST1_URL: &str =
    "https://huggingface.co/datasets/OpenAssistant/oasst1/resolve/main/2023-04-12_oasst_ready.trees.jsonl.gz";
pub const ALPACA_URL: &str =
    "https://raw.githubusercontent.com/tatsu-lab/stanford_alpaca/main/alpaca_data.json";

// Fixed local filenames, all resolved against the working directory
pub const OASST_ARCHIVE: &str = "oasst1.jsonl.gz";
pub const OASST_RAW: &str = "oasst1_raw.jsonl";
pub const ALPACA_DATA: &str = "alpaca_data.json";
pub const TRAIN_FILE: &str = "train.jsonl";
pub const EVAL_FILE: &str = "eval.jsonl";

/// Deleted after a successful run. The train/eval outputs are kept.
pub const INTERMEDIATE_FILES: [&str; 3] = [OASST_ARCHIVE, OASST_RAW, ALPACA_DATA];
pub const OUTPUT_FILES: [&str; 2] = [TRAIN_FILE, EVAL_FILE];

/// Everything the pipeline needs to run, passed in explicitly so tests can
/// point it at scratch directories and fake endpoints.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub bucket: String,
    pub prefix: String,
    pub oasst_url: String,
    pub alpaca_url: String,
    pub work_dir: PathBuf,
    pub train_frac: f32,
}

impl PipelineConfig {
    pub fn local_path(&self, filename: &str) -> PathBuf {
        self.work_dir.join(filename)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket: "my-qa-dataset".to_string(),
            prefix: "data/".to_string(),
            oasst_url: OASST1_URL.to_string(),
            alpaca_url: ALPACA_URL.to_string(),
            work_dir: PathBuf::from("."),
            train_frac: 0.8,
        }
    }
}
