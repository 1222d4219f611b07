//! Terminal front-end: find the numbers in order, submit the time, browse the rankings.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use find_numbers_back::{
    client::{ClientError, DEFAULT_SERVER_URL, RankingsClient},
    game::{ClickOutcome, GameSession, GridSize, Score},
};

type Input = Lines<BufReader<Stdin>>;

#[derive(Parser)]
#[command(
    name = "find-numbers",
    version,
    about = "Find every number from 1 upwards as fast as you can"
)]
struct Cli {
    /// Base URL of the rankings server.
    #[arg(long, global = true, env = "FIND_NUMBERS_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds on a board and submit the times.
    Play {
        /// Board size: 4, 5 or 6 (or 4x4, 5x5, 6x6).
        #[arg(long, default_value_t = GridSize::Four)]
        size: GridSize,
    },
    /// Show the leaderboard of a board size.
    Rankings {
        #[arg(long, default_value_t = GridSize::Four)]
        size: GridSize,
    },
    /// Show every time recorded by a player.
    History {
        #[arg(long)]
        name: String,
        #[arg(long)]
        size: Option<GridSize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = RankingsClient::new(&cli.server).context("creating rankings client")?;
    debug!(server = client.base_url(), "rankings client ready");

    match cli.command {
        Commands::Play { size } => {
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            play(&client, size, &mut input).await
        }
        Commands::Rankings { size } => {
            print_leaderboard(&client, size).await;
            Ok(())
        }
        Commands::History { name, size } => {
            print_history(&client, &name, size).await;
            Ok(())
        }
    }
}

async fn play(client: &RankingsClient, grid: GridSize, input: &mut Input) -> anyhow::Result<()> {
    let mut session = GameSession::new(grid);

    render_board(&mut session);
    println!("Type each number from 1 to {} in order.", grid.squares());
    println!("Press Enter to start, or q to quit.");
    if is_quit(read_line(input).await?.as_deref()) {
        return Ok(());
    }
    session.start();

    loop {
        if !run_round(&mut session, input).await? {
            println!("Round abandoned.");
            return Ok(());
        }

        if let Some(score) = session.score() {
            save_score(client, score, input).await?;
        }

        println!("Play again? [y/N]");
        let again = read_line(input)
            .await?
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y"));
        if !again {
            session.dismiss_prompt();
            return Ok(());
        }
        session.play_again();
    }
}

/// Drive one active run until completion. Returns `false` when the player quits.
async fn run_round(session: &mut GameSession, input: &mut Input) -> anyhow::Result<bool> {
    while session.is_active() {
        let elapsed = session.tick();
        render_board(session);
        println!(
            "Find {}  ({:.1}s)",
            session.target(),
            elapsed.as_secs_f64()
        );

        let line = read_line(input).await?;
        if is_quit(line.as_deref()) {
            session.abandon();
            return Ok(false);
        }
        let Some(line) = line else {
            continue;
        };
        let Ok(value) = line.trim().parse::<u32>() else {
            println!("Type the number you want to pick.");
            continue;
        };

        match session.click(value) {
            ClickOutcome::Ignored => println!("Not {value}. Keep looking."),
            ClickOutcome::Advanced { .. } => {}
            ClickOutcome::Completed { elapsed } => {
                println!("All found in {:.3}s!", elapsed.as_secs_f64());
            }
        }
    }
    Ok(true)
}

async fn save_score(client: &RankingsClient, score: Score, input: &mut Input) -> anyhow::Result<()> {
    loop {
        println!("Enter your name to save {:.3}s (or - to skip):", score.time_secs);
        let Some(name) = read_line(input).await? else {
            return Ok(());
        };
        if name.trim() == "-" {
            return Ok(());
        }

        match client.submit_score(&name, score).await {
            Ok(_) => {
                println!("Score saved.");
                print_leaderboard(client, score.grid).await;
                return Ok(());
            }
            Err(err @ ClientError::MissingName) => println!("{err}"),
            Err(err) => {
                report(&err);
                return Ok(());
            }
        }
    }
}

async fn print_leaderboard(client: &RankingsClient, grid: GridSize) {
    match client.fetch_leaderboard(grid).await {
        Ok(rows) if rows.is_empty() => println!("No times recorded on {grid} yet."),
        Ok(rows) => {
            println!("Rankings {grid}");
            for (rank, row) in rows.iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:>8.3}s  {}",
                    rank + 1,
                    row.name,
                    row.time,
                    date_part(&row.created_at)
                );
            }
        }
        Err(err) => report(&err),
    }
}

async fn print_history(client: &RankingsClient, name: &str, grid: Option<GridSize>) {
    match client.fetch_history(name, grid).await {
        Ok(entries) if entries.is_empty() => println!("No times recorded for {}.", name.trim()),
        Ok(entries) => {
            for entry in entries {
                println!("{}  {:>8.3}s", date_part(&entry.created_at), entry.time);
            }
        }
        Err(err) => report(&err),
    }
}

fn render_board(session: &mut GameSession) {
    let side = usize::from(session.grid().side());
    let highlighted = session.acknowledged();
    for row in session.numbers().chunks(side) {
        let cells: Vec<String> = row
            .iter()
            .map(|value| {
                if highlighted.contains(value) {
                    format!("[{value:>2}]")
                } else {
                    format!(" {value:>2} ")
                }
            })
            .collect();
        println!("{}", cells.join(""));
    }
}

fn report(err: &ClientError) {
    println!("{err}");
    if let Some(source) = std::error::Error::source(err) {
        debug!(error = %source, "request failed");
    }
}

fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

fn is_quit(line: Option<&str>) -> bool {
    match line {
        None => true,
        Some(line) => line.trim().eq_ignore_ascii_case("q"),
    }
}

async fn read_line(input: &mut Input) -> anyhow::Result<Option<String>> {
    input.next_line().await.context("reading from stdin")
}
