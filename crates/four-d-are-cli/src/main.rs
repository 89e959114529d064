//! 4D-ARE command line.
//!
//! Commands:
//! - `demo`      Show the demo data and, if an API key is set, analyze it
//! - `analyze`   Run an attribution analysis
//! - `prompt`    Print the assembled prompts without calling the endpoint
//! - `scenarios` List built-in demo scenarios
//! - `init`      Write an example data file and `.env.example`
//! - `experiment` Compare prompt variants over the demo scenarios

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::InputArgs;

#[derive(Parser, Debug)]
#[command(
    name = "four-d-are",
    about = "Attribution-driven analysis prompts for LLM agents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the banking retention demo
    Demo,

    /// Analyze a question with the 4D-ARE framework
    Analyze {
        /// The question to analyze
        query: String,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the system and user prompts that `analyze` would send
    Prompt {
        query: String,

        #[command(flatten)]
        input: InputArgs,
    },

    /// List built-in demo scenarios
    Scenarios,

    /// Initialize a project directory with example files
    Init {
        /// Output directory for generated files
        #[arg(short, long, default_value = ".")]
        output: std::path::PathBuf,
    },

    /// Run every demo scenario under each prompt variant
    Experiment {
        /// Score each response with an LLM judge
        #[arg(long)]
        judge: bool,

        /// Write the full report as JSON
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
}

/// A `.env` that exists but cannot be loaded; a missing one is fine.
fn dotenv_problem(result: &Result<std::path::PathBuf, dotenvy::Error>) -> Option<&dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Some(e) = dotenv_problem(&dotenv) {
        tracing::warn!(error = %e, "Ignoring unreadable .env file");
    }

    match cli.command {
        Commands::Demo => commands::demo::run().await,
        Commands::Analyze { query, input } => commands::analyze::run(&query, &input).await,
        Commands::Prompt { query, input } => commands::prompt::run(&query, &input),
        Commands::Scenarios => commands::scenarios::run(),
        Commands::Init { output } => commands::init::run(&output).map(|_| ()),
        Commands::Experiment { judge, output } => {
            commands::experiment::run(judge, output.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_with_options() {
        let cli = Cli::try_parse_from([
            "four-d-are",
            "analyze",
            "Why is retention low?",
            "--data",
            "data/ctx.json",
            "--template",
            "healthcare",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { query, input } => {
                assert_eq!(query, "Why is retention low?");
                assert_eq!(input.data.unwrap().to_str(), Some("data/ctx.json"));
                assert_eq!(input.template.as_deref(), Some("healthcare"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_template_and_template_file_conflict() {
        let result = Cli::try_parse_from([
            "four-d-are",
            "analyze",
            "Why?",
            "--template",
            "banking",
            "--template-file",
            "t.yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_data_and_scenario_conflict() {
        let result = Cli::try_parse_from([
            "four-d-are",
            "prompt",
            "Why?",
            "--data",
            "ctx.json",
            "--scenario",
            "banking_aum",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_requires_query() {
        assert!(Cli::try_parse_from(["four-d-are", "analyze"]).is_err());
    }

    #[test]
    fn test_init_default_output() {
        let cli = Cli::try_parse_from(["four-d-are", "init"]).unwrap();
        match cli.command {
            Commands::Init { output } => assert_eq!(output, std::path::PathBuf::from(".")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_experiment_flags() {
        let cli =
            Cli::try_parse_from(["four-d-are", "experiment", "--judge", "-o", "report.json"])
                .unwrap();
        match cli.command {
            Commands::Experiment { judge, output } => {
                assert!(judge);
                assert_eq!(output, Some(std::path::PathBuf::from("report.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_dotenv_missing_file_is_quiet() {
        let missing = Err(dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no .env",
        )));
        assert!(dotenv_problem(&missing).is_none());
        assert!(dotenv_problem(&Ok(std::path::PathBuf::from(".env"))).is_none());
    }

    #[test]
    fn test_dotenv_parse_error_is_reported() {
        let broken = Err(dotenvy::Error::LineParse("KEY=\"unterminated".to_string(), 4));
        assert!(dotenv_problem(&broken).is_some());
    }

    #[test]
    fn test_global_verbose_flag() {
        let cli = Cli::try_parse_from(["four-d-are", "scenarios", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
