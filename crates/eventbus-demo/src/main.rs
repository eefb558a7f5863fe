//! Event bus demo entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use eventbus_demo::cli::Cli;
use eventbus_demo::{Game, GameReport, Result};

fn main() {
    // Load .env.local if it exists (for EVENTBUS_BORDER etc.)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let game = Game::new(cli.game_config())?;
    let report = game.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &GameReport) {
    for player in &report.players {
        let p = player.position;
        match player.blocked_at {
            Some(x) => println!(
                "{}: stopped at ({}, {}, {}), move to x={} was canceled",
                player.name, p.x, p.y, p.z, x
            ),
            None => println!("{}: reached ({}, {}, {})", player.name, p.x, p.y, p.z),
        }
    }

    for line in &report.chat {
        println!("{}", line);
    }

    println!(
        "Moves rejected: {}, chat delivered: {}/{}",
        report.moves_rejected, report.chats_delivered, report.chats_published
    );
}
