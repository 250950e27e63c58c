use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use salmon_chess::{Color, Game, GameStatus, Square};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "salmon-chess", about = "Play chess against a minimax engine")]
struct Args {
    /// Search depth in plies
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Side the engine plays
    #[arg(long, value_enum, default_value_t = EngineSide::Black)]
    engine: EngineSide,

    /// Log filter, e.g. "debug" or "salmon_chess=trace"; falls back to RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineSide {
    White,
    Black,
    None,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::try_new(directives).context("invalid --log filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let engine = match args.engine {
        EngineSide::White => Some(Color::White),
        EngineSide::Black => Some(Color::Black),
        EngineSide::None => None,
    };
    run(Game::with_depth(args.depth), engine)
}

fn run(mut game: Game, engine: Option<Color>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut line = String::new();

    println!("Moves are given as 'e2 e4'. Type 'quit' to leave.");
    println!("{}", game.board());

    loop {
        let color = game.side_to_move();
        match game.game_status()? {
            GameStatus::Checkmate => {
                println!("Checkmate! {} wins.", color.opposite());
                break;
            }
            GameStatus::Stalemate => {
                println!("Stalemate.");
                break;
            }
            GameStatus::Check => println!("{} is in check.", color),
            GameStatus::Ongoing => {}
        }

        if engine == Some(color) {
            match game.engine_move()? {
                Some(applied) => println!("{} plays {}", color, applied.mv),
                None => break,
            }
            println!("{}", game.board());
            continue;
        }

        print!("{}'s move: ", color);
        stdout.flush()?;
        line.clear();
        if reader.read_line(&mut line).context("failed to read move")? == 0 {
            break;
        }

        let input = line.trim();
        if input == "quit" {
            break;
        }
        let (from, to) = match parse_move(input) {
            Ok(squares) => squares,
            Err(err) => {
                println!("Invalid input: {}", err);
                continue;
            }
        };

        match game.request_move(from, to, color) {
            Ok(_) => println!("{}", game.board()),
            Err(err) if err.is_fatal() => bail!(err),
            Err(err) => println!("Invalid move: {}", err),
        }
    }
    Ok(())
}

/// Accepts "e2 e4" or "e2e4".
fn parse_move(input: &str) -> Result<(Square, Square)> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (from, to) = match parts.as_slice() {
        [from, to] => (*from, *to),
        [joined] if joined.len() == 4 && joined.is_ascii() => joined.split_at(2),
        _ => bail!("expected two squares like 'e2 e4', got '{}'", input),
    };
    Ok((from.parse()?, to.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let (from, to) = parse_move("e2 e4").unwrap();
        assert_eq!((from.to_string(), to.to_string()), ("e2".into(), "e4".into()));
        assert_eq!(parse_move("g1f3").unwrap().1.to_string(), "f3");

        let err = parse_move("e2 z9").unwrap_err();
        assert!(err.to_string().contains("'z9' is not a square"));
        assert!(parse_move("castle").is_err());
    }
}
