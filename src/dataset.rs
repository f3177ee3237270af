use crate::parse::QaRecord;
use anyhow::{Context, Result};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Shuffle `records` with the given RNG and split them into
/// (train, eval) at `train_frac`, truncating toward zero.
pub fn split_dataset<R: Rng>(
    mut records: Vec<QaRecord>,
    train_frac: f32,
    rng: &mut R,
) -> (Vec<QaRecord>, Vec<QaRecord>) {
    records.shuffle(rng);

    let total = records.len();
    let split_index = ((total as f32) * train_frac) as usize;
    let eval = records.split_off(split_index.min(total));

    info!("Split sizes: train={} eval={}", records.len(), eval.len());
    (records, eval)
}

/// Write records as line-delimited JSON, one compact object per line.
/// Non-ASCII text passes through as UTF-8. Overwrites `path`.
pub fn write_jsonl(path: &Path, records: &[QaRecord]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!("Saved {} records to {:?}", records.len(), path);
    Ok(())
}
