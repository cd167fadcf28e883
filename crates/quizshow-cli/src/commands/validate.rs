//! The `quizshow validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizshow_core::parser::{self, NamedBank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        parser::load_bank_directory(&bank_path)?
    } else {
        let name = bank_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| bank_path.display().to_string());
        vec![NamedBank {
            name,
            parsed: parser::read_bank(&bank_path)?,
            path: bank_path.clone(),
        }]
    };

    anyhow::ensure!(
        !banks.is_empty(),
        "no .txt banks found in {}",
        bank_path.display()
    );

    let mut total_warnings = 0;

    for bank in &banks {
        println!(
            "Bank: {} ({} questions)",
            bank.name,
            bank.parsed.questions.len()
        );

        let warnings = parser::validate_bank(&bank.parsed);
        for w in &warnings {
            let prefix = w
                .number
                .map(|n| format!("  [#{n}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
