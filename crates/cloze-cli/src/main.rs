//! cloze CLI: grade fill-in-the-blank submissions from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cloze", version, about = "Cloze exercise grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against a task
    Grade {
        /// Path to the .toml task file
        #[arg(long)]
        task: PathBuf,

        /// Submission JSON file, or "-" for stdin
        #[arg(long)]
        submission: PathBuf,

        /// Only this problem; the submission is its raw value
        #[arg(long)]
        problem: Option<String>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the JSON report to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the JSON report into the configured output directory
        #[arg(long)]
        save: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check that every blank has an answer before submitting
    Check {
        /// Path to the .toml task file
        #[arg(long)]
        task: PathBuf,

        /// Submission JSON file, or "-" for stdin
        #[arg(long)]
        submission: PathBuf,

        /// Only this problem; the submission is its raw value
        #[arg(long)]
        problem: Option<String>,
    },

    /// Validate task TOML files
    Validate {
        /// Path to task file or directory
        #[arg(long)]
        task: PathBuf,
    },

    /// Create starter config and example task
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cloze=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            task,
            submission,
            problem,
            format,
            output,
            save,
            config,
        } => commands::grade::execute(task, submission, problem, format, output, save, config),
        Commands::Check {
            task,
            submission,
            problem,
        } => commands::check::execute(task, submission, problem),
        Commands::Validate { task } => commands::validate::execute(task),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
