//! The `quizshow play` command.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use quizshow_core::model::Question;
use quizshow_core::narration::{question_narration, summary_narration, Locale};
use quizshow_core::parser;
use quizshow_core::report::SessionReport;
use quizshow_core::scoring::ScoreSummary;
use quizshow_core::traits::{SpeechRequest, SpeechSynthesizer};
use quizshow_core::QuizSession;
use quizshow_report::html::write_html_report;
use quizshow_sources::config::{load_config_from, VoiceConfig};
use quizshow_sources::{create_source, create_synthesizer, fetch_bank};

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Local bank file to play
    #[arg(long, conflicts_with_all = ["source", "name"])]
    pub bank: Option<PathBuf>,

    /// Configured source to fetch the bank from
    #[arg(long)]
    pub source: Option<String>,

    /// Bank name within the source
    #[arg(long)]
    pub name: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for narration audio files
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    /// Directory for the results report
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Report format: json, html, all
    #[arg(long, default_value = "json")]
    pub format: String,
}

pub async fn execute(args: PlayArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let mut session = QuizSession::default();
    let bank_name = match &args.bank {
        Some(path) => {
            session
                .replace_bank(parser::load_bank(path))
                .with_context(|| format!("cannot play {}", path.display()))?;
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        }
        None => {
            let source_name = args.source.as_deref().unwrap_or(&config.default_source);
            let source_config = config.sources.get(source_name).with_context(|| {
                let mut available: Vec<_> = config.sources.keys().collect();
                available.sort();
                format!("source '{source_name}' not found in config. Available: {available:?}")
            })?;
            let source = create_source(source_name, source_config)?;
            let name = args.name.clone().unwrap_or_else(|| config.default_bank.clone());
            session
                .replace_bank(fetch_bank(source.as_ref(), &name).await)
                .with_context(|| format!("cannot play '{name}' from {source_name}"))?;
            name
        }
    };
    tracing::info!(bank = %bank_name, questions = session.len(), "starting quiz");

    let narrator = match &args.audio_dir {
        Some(dir) if config.audio_enabled => Some(Narrator::new(
            create_synthesizer(&config.voice),
            &config.voice,
            dir.clone(),
        )),
        Some(_) => {
            tracing::warn!("audio is disabled in config, ignoring --audio-dir");
            None
        }
        None => None,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let completed = run_quiz(
        &mut session,
        &mut stdin.lock(),
        &mut stdout.lock(),
        config.voice.locale,
        narrator.as_ref(),
    )
    .await?;

    if let (Some(summary), Some(dir)) = (completed, &args.report_dir) {
        let report = SessionReport::new(bank_name, summary);
        save_report(&report, config.voice.locale, dir, &args.format)?;
    }

    Ok(())
}

/// Speaks narration into audio files.
pub struct Narrator {
    synthesizer: Box<dyn SpeechSynthesizer>,
    lang: String,
    tld: String,
    locale: Locale,
    dir: PathBuf,
}

impl Narrator {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, voice: &VoiceConfig, dir: PathBuf) -> Self {
        Self {
            synthesizer,
            lang: voice.lang.clone(),
            tld: voice.tld.clone(),
            locale: voice.locale,
            dir,
        }
    }

    /// `position` is the 1-based place in the quiz; question numbers may repeat.
    async fn question(&self, position: usize, question: &Question) {
        let stem = format!("question-{position:03}");
        self.speak(question_narration(question, self.locale), &stem)
            .await;
    }

    async fn summary(&self, summary: &ScoreSummary) {
        self.speak(summary_narration(summary, self.locale), "summary")
            .await;
    }

    /// Narration is best-effort: failures are logged and the quiz goes on.
    async fn speak(&self, text: String, stem: &str) {
        if let Err(e) = self.try_speak(text, stem).await {
            tracing::warn!("skipping narration {}: {:#}", stem, e);
        }
    }

    async fn try_speak(&self, text: String, stem: &str) -> Result<PathBuf> {
        let request = SpeechRequest {
            text,
            lang: self.lang.clone(),
            tld: self.tld.clone(),
        };
        let audio = self
            .synthesizer
            .synthesize(&request)
            .await
            .with_context(|| format!("{} failed", self.synthesizer.name()))?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.dir.join(format!("{stem}.{}", audio.extension()));
        std::fs::write(&path, &audio.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "narration written");
        Ok(path)
    }
}

enum Command {
    Quit,
    Restart,
    Answer(String),
}

fn read_command<R: BufRead>(input: &mut R) -> Result<Option<Command>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read input")? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim();
    Ok(Some(match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" => Command::Quit,
        "r" | "restart" => Command::Restart,
        _ => Command::Answer(trimmed.to_ascii_uppercase()),
    }))
}

/// Run the interactive loop until the player quits or input ends.
///
/// Returns the score of the last completed game, if any.
pub async fn run_quiz<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: &mut R,
    out: &mut W,
    locale: Locale,
    narrator: Option<&Narrator>,
) -> Result<Option<ScoreSummary>> {
    let mut completed = None;
    let mut shown: Option<usize> = None;

    loop {
        let Some(question) = session.current_question() else {
            let summary = session.summary()?;
            print_summary(out, &summary, locale)?;
            if let Some(narrator) = narrator {
                narrator.summary(&summary).await;
            }
            completed = Some(summary);

            loop {
                write!(out, "\nr = play again, q = quit: ")?;
                out.flush()?;
                match read_command(input)? {
                    None | Some(Command::Quit) => {
                        writeln!(out)?;
                        return Ok(completed);
                    }
                    Some(Command::Restart) => break,
                    Some(Command::Answer(_)) => {}
                }
            }
            session.reset();
            shown = None;
            writeln!(out, "\nStarting over.")?;
            continue;
        };

        let index = session.current_index();
        if shown != Some(index) {
            let progress = session.progress();
            writeln!(out, "\nQuestion {} of {}", index + 1, progress.total)?;
            writeln!(out, "[{}]", progress_bar(progress.fraction(), 20))?;
            writeln!(out, "{}", question.text)?;
            for (label, text) in question.labeled_options() {
                writeln!(out, "  {label}. {text}")?;
            }
            if let Some(narrator) = narrator {
                narrator.question(index + 1, question).await;
            }
            shown = Some(index);
        }

        write!(out, "Answer (A-D, r = restart, q = quit): ")?;
        out.flush()?;
        match read_command(input)? {
            None => {
                writeln!(out)?;
                return Ok(completed);
            }
            Some(Command::Quit) => {
                writeln!(out, "Bye.")?;
                return Ok(completed);
            }
            Some(Command::Restart) => {
                session.reset();
                shown = None;
                writeln!(out, "Starting over.")?;
            }
            Some(Command::Answer(text)) => {
                if let Err(e) = session.submit_input(&text) {
                    writeln!(out, "{e}")?;
                }
            }
        }
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

fn print_summary<W: Write>(out: &mut W, summary: &ScoreSummary, locale: Locale) -> Result<()> {
    let headline = locale.headline(summary.tier);
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Correct", "Total", "Score", "Result"]);
    table.add_row(vec![
        Cell::new(summary.correct),
        Cell::new(summary.total),
        Cell::new(format!("{}%", summary.percentage)),
        Cell::new(headline),
    ]);

    writeln!(out, "\nFinal result: {} / {}", summary.correct, summary.total)?;
    writeln!(out, "{table}")?;
    writeln!(out, "{headline}")?;

    if !summary.incorrect.is_empty() {
        writeln!(out, "\nIncorrect answers:")?;
        for record in &summary.incorrect {
            writeln!(out, "  {}. {}", record.number, record.text)?;
            writeln!(
                out,
                "     Your answer: {}. {}",
                record.user,
                record.user_option()
            )?;
            writeln!(
                out,
                "     Correct:     {}. {}",
                record.correct,
                record.correct_option()
            )?;
        }
    }
    Ok(())
}

fn save_report(report: &SessionReport, locale: Locale, dir: &Path, format: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = dir.join(format!("quiz-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = dir.join(format!("quiz-{timestamp}.html"));
                write_html_report(report, locale, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }
    Ok(())
}
