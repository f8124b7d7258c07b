//! Command implementations for the hydrometrie CLI
//!
//! This module contains the command execution logic and the terminal
//! reporting for the CLI interface.

use crate::Message;
use crate::app::models::{Intervenant, Origine, Scenario};
use crate::app::services::csv_codec::CsvParser;
use crate::cli::args::{Commands, ConvertArgs, ShowArgs};
use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Instant;
use tracing::{debug, info};

/// Length of a SIRET establishment code
const SIRET_LENGTH: usize = 14;

/// Main command runner
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Convert(args) => {
            setup_logging(args.get_log_level(), args.quiet);
            run_convert(&args)
        }
        Commands::Show(args) => {
            setup_logging(args.get_log_level(), false);
            run_show(&args)
        }
    }
}

/// Convert a CSV export into an XML message
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    let start = Instant::now();
    args.validate().context("Invalid convert arguments")?;

    let options = args.csv_options()?;
    let output = args.output_path();
    info!(
        "Converting {} ({}) to {}",
        args.input.display(),
        args.data_type.name(),
        output.display()
    );

    let parsed = CsvParser::new(options)?
        .parse_file(args.data_type, &args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    debug!("Parsed {} {} records", parsed.len(), parsed.data_type().name());

    let scenario = Scenario::new(
        intervenant_from_code(&args.emetteur).context("Invalid sender")?,
        intervenant_from_code(&args.destinataire).context("Invalid recipient")?,
    )?;
    let mut message = Message::new(scenario);
    message.add(parsed.into())?;
    message
        .write(&output, args.force)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if !args.quiet {
        println!(
            "{} {} entities written to {} in {:.2?}",
            "✓".bright_green().bold(),
            message.entity_count().to_string().bright_white().bold(),
            output.display().to_string().cyan(),
            start.elapsed()
        );
    }
    Ok(())
}

/// Print the summary of an XML message
pub fn run_show(args: &ShowArgs) -> Result<()> {
    let message = Message::from_file(&args.input, !args.lenient)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    println!("{}", args.input.display().to_string().bright_blue().bold());
    match &message.scenario {
        Some(scenario) => println!(
            "  {} {} v{} produced {}",
            "Scenario:".bold(),
            scenario.code(),
            scenario.version(),
            scenario.production_datetime.format("%Y-%m-%dT%H:%M:%S")
        ),
        None => println!("  {} {}", "Scenario:".bold(), "none".yellow()),
    }
    for (name, count) in message.summary() {
        if count > 0 {
            println!("  {:<20} {}", name, count.to_string().bright_white());
        }
    }
    println!(
        "  {:<20} {}",
        "total".bold(),
        message.entity_count().to_string().bright_green().bold()
    );
    Ok(())
}

/// Intervenant for a command-line code; 14-digit codes are SIRET
fn intervenant_from_code(code: &str) -> crate::Result<Intervenant> {
    let code = code.trim();
    let origine = if code.len() == SIRET_LENGTH {
        Origine::Siret
    } else {
        Origine::Sandre
    };
    Intervenant::new(code, origine)
}

/// Setup structured logging on stderr
fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hydrometrie={}", log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    // a subscriber may already be installed
    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };
    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}
