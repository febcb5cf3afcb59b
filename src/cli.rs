use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, CommandReport};

#[derive(Parser)]
#[command(
    name = "pawpicks",
    version,
    about = "Daily pet-goods recommendation site builder"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch catalog offers, rotate today's picks into the history, and sweep expired pages
    Fetch,
    /// Render the homepage and the 30-day archive from the persisted history
    Render,
    /// Fetch then render in one invocation (the scheduled-job entry point)
    Run,
    /// Show resolved paths and configuration readiness
    Status,
}

fn print_report(report: &CommandReport) {
    let verdict = if report.ok { "ok" } else { "issues" };
    println!("[{}] {}", report.command, verdict);
    for detail in &report.details {
        println!("  - {detail}");
    }
    for issue in &report.issues {
        println!("  ! {issue}");
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match cli.command {
        Command::Fetch => commands::fetch::run()?,
        Command::Render => commands::render::run()?,
        Command::Run => commands::run::run()?,
        Command::Status => commands::status::run()?,
    };

    print_report(&report);
    if !report.ok {
        anyhow::bail!("{} completed with issues", report.command);
    }
    Ok(())
}
