use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tokio::io::{AsyncBufReadExt, BufReader};

use tictactoe_engine::{
    board::{Mark, Status},
    driver::{Driver, DriverConfig, GameView, Intent},
};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "play", version, about)]
struct Args {
    /// Start against the computer opponent
    #[arg(short, long)]
    vs_computer: bool,

    /// Computer "thinking" delay in milliseconds
    #[arg(long, default_value_t = 500)]
    think_delay_ms: u64,

    /// How long the win celebration displays, in seconds
    #[arg(long, default_value_t = 5)]
    celebration_secs: u64,

    /// Seed for the opponent's random tie-breaking
    #[arg(long)]
    seed: Option<u64>,

    /// Emit each state update as a JSON line instead of a rendered board
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();
    log::debug!("Command line arguments: {args:?}");

    let rng = match args.seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_os_rng(),
    };
    let config = DriverConfig {
        think_delay: Duration::from_millis(args.think_delay_ms),
        celebration: Duration::from_secs(args.celebration_secs),
    };

    let (driver, handle) = Driver::new(config, rng);
    let driver_task = tokio::spawn(driver.run());

    if args.vs_computer {
        handle.send(Intent::SetMode { vs_computer: true }).await?;
    }

    // Render every published view
    let mut views = handle.views();
    let json = args.json;
    let render_task = tokio::spawn(async move {
        render(&views.borrow_and_update().clone(), json);
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            render(&view, json);
        }
    });

    print_help();

    // Read commands from stdin
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| "Failed to read from stdin")?
    {
        match parse_command(line.trim()) {
            Command::Intent(intent) => handle.send(intent).await?,
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown => println!("Unknown command, type `help`"),
        }
    }

    // Closing the handle stops the driver, which closes the view stream
    drop(handle);
    driver_task
        .await
        .with_context(|| "Driver task panicked")?
        .with_context(|| "Driver exited with an error")?;
    let _ = render_task.await;

    Ok(())
}

enum Command {
    Intent(Intent),
    Help,
    Quit,
    Empty,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Command::Empty,
        ["play" | "p", cell] => match cell.parse() {
            Ok(cell) => Command::Intent(Intent::Play { cell }),
            Err(_) => Command::Unknown,
        },
        ["jump" | "j", index] => match index.parse() {
            Ok(index) => Command::Intent(Intent::JumpTo { index }),
            Err(_) => Command::Unknown,
        },
        ["new" | "n"] => Command::Intent(Intent::NewGame),
        ["reset"] => Command::Intent(Intent::ResetAll),
        ["mode", "on"] => Command::Intent(Intent::SetMode { vs_computer: true }),
        ["mode", "off"] => Command::Intent(Intent::SetMode { vs_computer: false }),
        ["quit" | "q"] => Command::Quit,
        ["help" | "h"] => Command::Help,
        _ => Command::Unknown,
    }
}

fn print_help() {
    println!("Commands:");
    println!("  play <0-8>   place your mark (cells are numbered row-major)");
    println!("  jump <n>     go to move n in the history");
    println!("  new          new game, scores kept");
    println!("  reset        new game and zeroed scores");
    println!("  mode on|off  toggle the computer opponent (resets everything)");
    println!("  quit");
}

fn render(view: &GameView, json: bool) {
    if json {
        match serde_json::to_string(view) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("Failed to encode view: {e}"),
        }
        return;
    }

    println!();
    print!("{board}", board = view.board);
    let status = match view.status {
        Status::InProgress { turn } => format!("{turn}'s turn"),
        Status::Won { mark, line } => {
            if view.vs_computer {
                if mark == Mark::Cross {
                    format!("You win! (line {line:?})")
                } else {
                    format!("Computer wins! (line {line:?})")
                }
            } else {
                format!("Winner: {mark} (line {line:?})")
            }
        }
        Status::Draw => "It's a draw!".to_string(),
    };
    println!("{status}");
    if view.celebrating {
        println!("*** 🎉 ***");
    }
    println!(
        "Scores: X {cross} | O {nought} | ties {ties}",
        cross = view.scores.cross,
        nought = view.scores.nought,
        ties = view.scores.ties,
    );
    for (index, desc) in view.moves.iter().enumerate() {
        let marker = if index == view.cursor { ">" } else { " " };
        println!("{marker} {desc}");
    }
}
