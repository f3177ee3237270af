use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Stream a gzip-compressed text file into a plain UTF-8 text file,
/// line by line. Malformed gzip data or invalid UTF-8 aborts the run.
pub fn extract_gzip(src: &Path, dest: &Path) -> Result<()> {
    info!("Extracting {:?} -> {:?}", src, dest);

    let file = File::open(src).with_context(|| format!("failed to open {}", src.display()))?;
    let reader = BufReader::new(GzDecoder::new(file));
    let out =
        File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    let mut writer = BufWriter::new(out);

    for line in reader.lines() {
        let line = line.with_context(|| format!("failed to decode {}", src.display()))?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    info!("Extracted to {:?}", dest);
    Ok(())
}
