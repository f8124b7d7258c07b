use clap::Parser;
use hydrometrie::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    if let Err(error) = commands::run(command) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Hydrometrie - SANDRE hydrometric data converter");
    println!("===============================================");
    println!();
    println!("Convert SANDRE simplified CSV exports into Hydrometrie v1.1 XML");
    println!("messages and inspect existing messages.");
    println!();
    println!("USAGE:");
    println!("    hydrometrie <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    convert     Convert a CSV export to an XML message");
    println!("    show        Print the content summary of an XML message");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Convert hydrometric sites, sender SANDRE 1537, recipient a SIRET:");
    println!("    hydrometrie convert sites.csv --type sitehydro \\");
    println!("                        --emetteur 1537 --destinataire 12345678901234");
    println!();
    println!("    # Convert a UTF-8 series export with '.' decimals, without merging:");
    println!("    hydrometrie convert obs.csv -t seriehydro --emetteur 1537 --destinataire 14 \\");
    println!("                        --encoding utf-8 --no-decimal --no-merge -o obs.xml");
    println!();
    println!("    # Summarize a message:");
    println!("    hydrometrie show obs.xml");
    println!();
    println!("For detailed help on any command, use:");
    println!("    hydrometrie <COMMAND> --help");
}
