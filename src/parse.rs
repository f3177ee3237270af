use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Normalized instruction/response pair, ready for training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub text: String,
}

// One message node in an oasst1 conversation tree. Missing keys are
// treated as non-matching rather than as errors.
#[derive(Debug, Deserialize)]
struct MessageNode {
    #[serde(default)]
    role: String,
    #[serde(default)]
    lang: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    replies: Vec<MessageNode>,
}

#[derive(Debug, Deserialize)]
struct TreeLine {
    #[serde(default)]
    prompt: Option<MessageNode>,
}

/// Parse the oasst1 ready-trees JSONL file into QA records.
///
/// Keeps only trees whose top-level prompt is an English prompter turn with
/// at least one English assistant reply, and pairs the prompt with the first
/// such reply. Everything else is silently skipped; a malformed line aborts
/// the whole run.
pub fn parse_openassistant(path: &Path) -> Result<Vec<QaRecord>> {
    info!("Parsing OpenAssistant from {:?}", path);

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let tree: TreeLine = serde_json::from_str(&line)
            .with_context(|| format!("malformed JSON on line {} of {}", idx + 1, path.display()))?;

        let prompt = match tree.prompt {
            Some(p) => p,
            None => continue,
        };
        if prompt.role != "prompter" || prompt.lang != "en" {
            continue;
        }
        if let Some(reply) = prompt
            .replies
            .iter()
            .find(|r| r.role == "assistant" && r.lang == "en")
        {
            records.push(QaRecord {
                text: format!(
                    "Instruction: {}\nResponse:    {}",
                    prompt.text.trim(),
                    reply.text.trim()
                ),
            });
        }
    }

    info!("Extracted {} QA pairs from OpenAssistant", records.len());
    Ok(records)
}

// Alpaca entry; `input` is optional in practice
#[derive(Debug, Deserialize)]
struct AlpacaEntry {
    #[serde(default)]
    instruction: String,
    #[serde(default)]
    input: String,
    #[serde(default)]
    output: String,
}

/// Parse the Alpaca JSON array into QA records, one per entry.
pub fn parse_alpaca(path: &Path) -> Result<Vec<QaRecord>> {
    info!("Parsing Alpaca from {:?}", path);

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let entries: Vec<AlpacaEntry> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let records: Vec<QaRecord> = entries
        .iter()
        .map(|entry| QaRecord {
            text: alpaca_text(entry),
        })
        .collect();

    info!("Extracted {} QA pairs from Alpaca", records.len());
    Ok(records)
}

fn alpaca_text(entry: &AlpacaEntry) -> String {
    let instruction = entry.instruction.trim();
    let input = entry.input.trim();
    let output = entry.output.trim();

    let full_instruction = if input.is_empty() {
        instruction.to_string()
    } else {
        format!("{instruction}\nInput: {input}")
    };
    format!("Instruction: {full_instruction}\nResponse:    {output}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn alpaca_entry_with_input_gets_input_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "alpaca.json",
            r#"[{"instruction":"Sort this list","input":"3,1,2","output":"1,2,3"}]"#,
        );

        let records = parse_alpaca(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].text,
            "Instruction: Sort this list\nInput: 3,1,2\nResponse:    1,2,3"
        );
    }

    #[test]
    fn alpaca_entry_without_input_has_no_input_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "alpaca.json",
            r#"[{"instruction":"Say hi","input":"","output":"Hi!"}]"#,
        );

        let records = parse_alpaca(&path).unwrap();
        assert_eq!(records[0].text, "Instruction: Say hi\nResponse:    Hi!");
    }

    #[test]
    fn alpaca_is_count_preserving() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "alpaca.json",
            r#"[
                {"instruction":"a","input":"","output":"x"},
                {"instruction":"b","input":"","output":""},
                {"instruction":"","input":"y","output":"z"}
            ]"#,
        );

        // one record per entry, even for empty instruction or output
        let records = parse_alpaca(&path).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn oasst_takes_first_english_assistant_reply() {
        let dir = tempfile::tempdir().unwrap();
        let line = r#"{"prompt":{"role":"prompter","lang":"en","text":" What is 2+2? ","replies":[{"role":"assistant","lang":"de","text":"Vier"},{"role":"assistant","lang":"en","text":"Four. "},{"role":"assistant","lang":"en","text":"It is 4"}]}}"#;
        let path = write_temp(&dir, "trees.jsonl", &format!("{line}\n"));

        let records = parse_openassistant(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Instruction: What is 2+2?\nResponse:    Four.");
    }

    #[test]
    fn oasst_skips_non_english_prompts_and_missing_replies() {
        let dir = tempfile::tempdir().unwrap();
        let lines = [
            // non-English prompter
            r#"{"prompt":{"role":"prompter","lang":"es","text":"Hola","replies":[{"role":"assistant","lang":"es","text":"Hola!"}]}}"#,
            // English prompter, no English assistant reply
            r#"{"prompt":{"role":"prompter","lang":"en","text":"Hi","replies":[{"role":"assistant","lang":"fr","text":"Salut"}]}}"#,
            // not a prompter node
            r#"{"prompt":{"role":"assistant","lang":"en","text":"Hello","replies":[]}}"#,
            // missing prompt entirely
            r#"{"tree_id":"abc"}"#,
        ];
        let path = dir.path().join("trees.jsonl");
        fs::write(&path, lines.join("\n")).unwrap();

        let records = parse_openassistant(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn oasst_malformed_line_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "trees.jsonl", "{not valid json}\n");

        assert!(parse_openassistant(&path).is_err());
    }
}
