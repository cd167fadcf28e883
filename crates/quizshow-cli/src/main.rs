//! quizshow CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizshow", version, about = "Interactive multiple-choice quiz presenter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz interactively
    Play(commands::play::PlayArgs),

    /// Check question bank files for problems
    Validate {
        /// Path to a bank file or a directory of banks
        #[arg(long)]
        bank: PathBuf,
    },

    /// List banks available from configured sources
    List {
        /// Only list this source
        #[arg(long)]
        source: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizshow=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play(args) => commands::play::execute(args).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List { source, config } => commands::list::execute(source, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
