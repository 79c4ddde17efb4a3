//! bloomquiz CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "bloomquiz",
    version,
    about = "Medical-education quiz with levels and a shared leaderboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play {
        /// Question bank file or directory (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Player name; the score is submitted to the leaderboard if it qualifies
        #[arg(long)]
        name: Option<String>,

        /// Shuffle seed, to replay the same question order
        #[arg(long)]
        seed: Option<u64>,

        /// Write a JSON session report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the leaderboard
    Leaderboard {
        /// Number of entries to show (default: display_cap from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Submit a score to the leaderboard
    Submit {
        /// Player name
        #[arg(long)]
        name: String,

        /// Final score
        #[arg(long, allow_hyphen_values = true)]
        score: f64,

        /// Share of correct answers, 0-100
        #[arg(long, allow_hyphen_values = true)]
        percent: f64,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bloomquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            bank,
            name,
            seed,
            output,
            config,
        } => commands::play::execute(bank, name, seed, output, config).await,
        Commands::Leaderboard {
            limit,
            format,
            config,
        } => commands::leaderboard::execute(limit, format, config).await,
        Commands::Submit {
            name,
            score,
            percent,
            config,
        } => commands::submit::execute(name, score, percent, config).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
