use crate::config::{self, PipelineConfig};
use crate::dataset::{split_dataset, write_jsonl};
use crate::extract::extract_gzip;
use crate::fetch::download_file;
use crate::parse::{parse_alpaca, parse_openassistant};
use crate::store::{upload_files, ObjectStore};
use anyhow::{Context, Result};
use log::info;
use rand::Rng;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Record counts from a completed run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub oasst_records: usize,
    pub alpaca_records: usize,
    pub train_records: usize,
    pub eval_records: usize,
}

/// Run the whole pipeline: fetch, extract, parse, combine/split, write,
/// upload, cleanup. Any stage error aborts immediately, leaving whatever
/// intermediates exist on disk.
pub async fn run<R: Rng>(
    cfg: &PipelineConfig,
    store: &dyn ObjectStore,
    rng: &mut R,
) -> Result<PipelineReport> {
    ensure_gitignore(&cfg.work_dir)?;
    let client = reqwest::Client::new();

    // Download and extract OpenAssistant
    download_file(&client, &cfg.oasst_url, &cfg.local_path(config::OASST_ARCHIVE)).await?;
    extract_gzip(
        &cfg.local_path(config::OASST_ARCHIVE),
        &cfg.local_path(config::OASST_RAW),
    )?;

    // Download Alpaca
    download_file(&client, &cfg.alpaca_url, &cfg.local_path(config::ALPACA_DATA)).await?;

    // Parse both sources
    let oasst = parse_openassistant(&cfg.local_path(config::OASST_RAW))?;
    let alpaca = parse_alpaca(&cfg.local_path(config::ALPACA_DATA))?;
    let (oasst_records, alpaca_records) = (oasst.len(), alpaca.len());

    // Combine in fixed order, then shuffle and split
    let mut combined = oasst;
    combined.extend(alpaca);
    info!("Total combined QA pairs: {}", combined.len());
    let (train, eval) = split_dataset(combined, cfg.train_frac, rng);

    write_jsonl(&cfg.local_path(config::TRAIN_FILE), &train)?;
    write_jsonl(&cfg.local_path(config::EVAL_FILE), &eval)?;

    // Upload partitions
    upload_files(store, &cfg.work_dir, &cfg.prefix, &config::OUTPUT_FILES).await?;

    // Cleanup intermediates; train/eval outputs stay
    remove_intermediates(&cfg.work_dir, &config::INTERMEDIATE_FILES)?;

    Ok(PipelineReport {
        oasst_records,
        alpaca_records,
        train_records: train.len(),
        eval_records: eval.len(),
    })
}

/// Seed a `.gitignore` so the downloaded JSON never ends up in version
/// control. An existing file is left untouched.
pub fn ensure_gitignore(dir: &Path) -> Result<()> {
    let path = dir.join(".gitignore");
    if !path.exists() {
        fs::write(&path, "*.json\n")
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Delete the named files from `dir`. A file that is already gone is fine;
/// any other error aborts.
pub fn remove_intermediates(dir: &Path, filenames: &[&str]) -> Result<()> {
    for name in filenames {
        match fs::remove_file(dir.join(name)) {
            Ok(()) => info!("Removed {name}"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err).with_context(|| format!("failed to remove {name}")),
        }
    }
    Ok(())
}
