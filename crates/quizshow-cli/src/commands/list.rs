//! The `quizshow list` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizshow_core::traits::BankEntry;
use quizshow_sources::config::load_config_from;
use quizshow_sources::{create_source, SourceConfig};

pub async fn execute(source_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.sources.keys().collect();
    names.sort();

    if let Some(filter) = &source_filter {
        anyhow::ensure!(
            config.sources.contains_key(filter),
            "source '{filter}' not found in config. Available: {names:?}"
        );
    }

    let mut found_any = false;
    let mut failures = 0;

    for name in names {
        if source_filter.as_ref().is_some_and(|f| f != name) {
            continue;
        }

        let banks = match list_source(name, &config.sources[name]).await {
            Ok(banks) => banks,
            Err(e) => {
                tracing::warn!("skipping source {}: {:#}", name, e);
                println!("Source: {name} (unavailable: {e:#})\n");
                failures += 1;
                continue;
            }
        };

        found_any = true;
        let marker = if *name == config.default_source { " (default)" } else { "" };
        println!("Source: {name}{marker}");
        if banks.is_empty() {
            println!("  (no banks)");
        }
        for bank in &banks {
            match bank.size {
                Some(size) => println!("  {} ({size} bytes)", bank.name),
                None => println!("  {}", bank.name),
            }
        }
        println!();
    }

    anyhow::ensure!(
        found_any || failures == 0,
        "no source could be listed ({failures} failed)"
    );

    if !found_any {
        println!("No sources configured. Run `quizshow init` to create a config file.");
    }

    Ok(())
}

async fn list_source(name: &str, config: &SourceConfig) -> Result<Vec<BankEntry>> {
    let source = create_source(name, config)?;
    source
        .list()
        .await
        .with_context(|| format!("failed to list source '{name}'"))
}
