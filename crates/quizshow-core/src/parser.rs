//! Plain-text question bank parser.
//!
//! A bank is a sequence of blocks:
//!
//! ```text
//! 12. Which club plays at the Tomás Adolfo Ducó stadium?
//! A. Boca Juniors
//! B. Huracán*
//! C. River Plate
//! D. San Lorenzo
//! ```
//!
//! A header line opens a block and the next four lines are its option
//! window. Only lines in the window that match the option pattern fill a
//! slot; a block that ends with fewer than four options is dropped whole.
//! Lines outside any window are ignored.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::error::BankError;
use crate::model::{Label, Question, OPTION_COUNT};

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*(.+)").expect("header pattern is valid"));

static OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-D])\.\s*(.+?)(\*?)$").expect("option pattern is valid"));

/// Parser output together with what was filtered on the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedBank {
    /// Complete questions in file order.
    pub questions: Vec<Question>,
    /// Blocks dropped for having fewer than four recognized options.
    pub discarded: Vec<DiscardedBlock>,
    /// Indices into `questions` whose answer defaulted to A (no `*` marker).
    pub defaulted_answers: Vec<usize>,
}

/// A question block that did not yield a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedBlock {
    /// 1-based line of the header.
    pub line: usize,
    /// Number from the header.
    pub number: u32,
    /// How many of the four window lines matched the option pattern.
    pub recognized_options: usize,
}

/// Parse bank text into complete questions.
pub fn parse(raw: &str) -> Vec<Question> {
    parse_with_diagnostics(raw).questions
}

/// Parse bank text, also reporting discarded blocks and defaulted answers.
pub fn parse_with_diagnostics(raw: &str) -> ParsedBank {
    let lines: Vec<&str> = raw.lines().collect();
    let mut bank = ParsedBank::default();

    let mut i = 0;
    while i < lines.len() {
        if let Some((number, text)) = match_header(lines[i].trim()) {
            let header_line = i + 1;
            let mut options = Vec::with_capacity(OPTION_COUNT);
            let mut correct = None;

            // The window is positional: slot order comes from recognized
            // lines, never from the letter prefix.
            for _ in 0..OPTION_COUNT {
                i += 1;
                let Some(line) = lines.get(i) else {
                    continue;
                };
                if let Some((label, option, marked)) = match_option(line.trim()) {
                    if marked {
                        correct = Some(label);
                    }
                    options.push(option);
                }
            }

            match <[String; OPTION_COUNT]>::try_from(options) {
                Ok(options) => {
                    if correct.is_none() {
                        bank.defaulted_answers.push(bank.questions.len());
                    }
                    bank.questions.push(Question {
                        number,
                        text,
                        options,
                        correct: correct.unwrap_or(Label::A),
                    });
                }
                Err(partial) => {
                    tracing::debug!(
                        line = header_line,
                        number,
                        recognized = partial.len(),
                        "discarding incomplete question block"
                    );
                    bank.discarded.push(DiscardedBlock {
                        line: header_line,
                        number,
                        recognized_options: partial.len(),
                    });
                }
            }
        }
        i += 1;
    }

    bank
}

fn match_header(line: &str) -> Option<(u32, String)> {
    let caps = HEADER.captures(line)?;
    Some((header_number(&caps[1]), caps[2].trim().to_string()))
}

/// First code point of each run of non-ASCII decimal digits `\d` accepts.
/// Every run holds the digits zero to nine in order.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
];

/// Value of a header's digit run, saturating at `u32::MAX`.
///
/// Never fails, so a matched header always opens its option window.
fn header_number(digits: &str) -> u32 {
    digits
        .chars()
        .fold(0u32, |n, c| n.saturating_mul(10).saturating_add(digit_value(c)))
}

fn digit_value(c: char) -> u32 {
    if let Some(d) = c.to_digit(10) {
        return d;
    }
    let cp = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&cp))
        .map_or(0, |&zero| cp - zero)
}

fn match_option(line: &str) -> Option<(Label, String, bool)> {
    let caps = OPTION.captures(line)?;
    let label = caps[1].chars().next().and_then(|c| Label::try_from(c).ok())?;
    Some((label, caps[2].trim().to_string(), &caps[3] == "*"))
}

/// Decode raw bank bytes as UTF-8.
pub fn decode(bytes: &[u8]) -> Result<&str, BankError> {
    std::str::from_utf8(bytes).map_err(|e| BankError::Encoding {
        offset: e.valid_up_to(),
    })
}

/// Decode and parse raw bank bytes.
pub fn parse_bytes(bytes: &[u8]) -> Result<Vec<Question>, BankError> {
    decode(bytes).map(parse)
}

/// Read and parse a bank file, keeping diagnostics.
pub fn read_bank(path: &Path) -> Result<ParsedBank, BankError> {
    let bytes = std::fs::read(path).map_err(|source| BankError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_with_diagnostics(decode(&bytes)?);
    tracing::info!(
        path = %path.display(),
        questions = parsed.questions.len(),
        discarded = parsed.discarded.len(),
        "loaded question bank"
    );
    Ok(parsed)
}

/// Read and parse a bank file.
pub fn load_bank(path: &Path) -> Result<Vec<Question>, BankError> {
    read_bank(path).map(|parsed| parsed.questions)
}

/// A bank file loaded from a directory.
#[derive(Debug, Clone)]
pub struct NamedBank {
    /// File name, e.g. `history.txt`.
    pub name: String,
    pub path: PathBuf,
    pub parsed: ParsedBank,
}

/// Recursively load every `.txt` bank in a directory, sorted by path.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<NamedBank>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    collect_bank_paths(dir, &mut paths)?;
    paths.sort();

    let mut banks = Vec::new();
    for path in paths {
        match read_bank(&path) {
            Ok(parsed) => banks.push(NamedBank {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path,
                parsed,
            }),
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
            }
        }
    }

    Ok(banks)
}

fn collect_bank_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            collect_bank_paths(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            out.push(path);
        }
    }
    Ok(())
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Question number the warning refers to (if applicable).
    pub number: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Check a parsed bank for common authoring mistakes.
pub fn validate_bank(bank: &ParsedBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            number: None,
            message: "bank contains no complete questions".into(),
        });
    }

    for block in &bank.discarded {
        warnings.push(ValidationWarning {
            number: Some(block.number),
            message: format!(
                "line {}: only {} of {} options recognized, question skipped",
                block.line, block.recognized_options, OPTION_COUNT
            ),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for q in &bank.questions {
        if !seen.insert(q.number) {
            warnings.push(ValidationWarning {
                number: Some(q.number),
                message: format!("duplicate question number: {}", q.number),
            });
        }
    }

    for &index in &bank.defaulted_answers {
        if let Some(q) = bank.questions.get(index) {
            warnings.push(ValidationWarning {
                number: Some(q.number),
                message: "no option marked with '*', answer defaults to A".into(),
            });
        }
    }

    warnings
}
