//! fribe CLI: compile behavior descriptions and run evaluation cycles.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use fribe::config::FribeConfig;
use fribe::loader::load_engine_from_file;

#[derive(Parser)]
#[command(name = "fribe", version, about = "Fuzzy rule-based inference engine")]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Lexical grammar description replacing the built-in one.
    #[arg(long, global = true)]
    lexer_grammar: Option<PathBuf>,

    /// Syntax grammar description replacing the built-in one.
    #[arg(long, global = true)]
    parser_grammar: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a model and print what it defines.
    Check {
        /// Model file in the behavior description language.
        model: PathBuf,
    },

    /// Compile a model, run evaluation cycles and print the state as JSON.
    Eval {
        /// Model file in the behavior description language.
        model: PathBuf,

        /// Observation as name=value (repeatable).
        #[arg(long = "set", value_parser = parse_observation)]
        observations: Vec<(String, f64)>,

        /// Number of cycles to run with the same observations.
        #[arg(long, default_value = "1")]
        cycles: usize,
    },
}

fn parse_observation(arg: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got \"{arg}\""))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for \"{name}\": {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FribeConfig::load(path)?,
        None => FribeConfig::default(),
    };
    if cli.lexer_grammar.is_some() {
        config.grammars.lexer = cli.lexer_grammar;
    }
    if cli.parser_grammar.is_some() {
        config.grammars.parser = cli.parser_grammar;
    }

    match cli.command {
        Commands::Check { model } => {
            let engine = load_engine_from_file(&model, &config)?;
            println!("{}: ok", model.display());
            for universe in engine.universes() {
                let (min, max) = universe.domain().unwrap_or((f64::NAN, f64::NAN));
                println!(
                    "  universe {:?}: {} terms, domain [{min}, {max}]",
                    universe.name(),
                    universe.count_terms()
                );
            }
            for rulebase in engine.rulebases() {
                println!(
                    "  rulebase {:?}: {} rules",
                    rulebase.name(),
                    rulebase.rules().len()
                );
            }
        }

        Commands::Eval {
            model,
            observations,
            cycles,
        } => {
            let mut engine = load_engine_from_file(&model, &config)?;
            let observations: HashMap<String, f64> = observations.into_iter().collect();
            for cycle in 0..cycles {
                tracing::debug!(cycle, "running cycle");
                engine.calc_consequences(&observations)?;
            }
            let snapshot = engine.snapshot();
            if snapshot.is_empty() {
                tracing::warn!(
                    model = %model.display(),
                    "model defines no rulebases, state is empty"
                );
            }
            let json = serde_json::to_string_pretty(&snapshot).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}
