use std::{error::Error, thread};
use torlife::{Board, EngineConfig, LifeError, PositionEncoder, RunLengthEncoded, game_of_life};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod console;
mod options;
mod stats;

use stats::Recorder;

fn initial_board(args: &options::Args) -> Result<Board, Box<dyn Error>> {
    if let Some(file_name) = &args.input_file {
        let encoded = std::fs::read_to_string(file_name)?;
        let pattern = RunLengthEncoded::default().decode(&encoded)?;
        info!(file = %file_name, width = pattern.width, height = pattern.height, "loaded pattern");
        return Ok(Board::from_pattern(args.size, &pattern));
    }
    Ok(args.fill.create_board(args.size, &mut args.rng()))
}

/// Advances `board` by `gens` generations, explaining unsupported sizes to the user
fn advance(board: Board, gens: usize, config: EngineConfig) -> Result<Board, LifeError> {
    game_of_life(board, gens, config).inspect_err(|err| match err {
        LifeError::UnsupportedSize { max, .. } => {
            error!(%err, "boards are limited to {max}x{max}, choose a smaller --size")
        }
        _ => error!(%err, "simulation failed"),
    })
}

fn run_batch(
    mut board: Board,
    args: &options::Args,
    config: EngineConfig,
    stats: &mut impl Recorder,
) -> Result<Board, LifeError> {
    let mut remaining = args.generations;
    while remaining > 0 {
        let step = remaining.min(args.chunk);
        board = advance(board, step, config)?;
        remaining -= step;

        stats.record(step, board.alive_count());
        if stats.has_report() || remaining == 0 {
            println!("{}", stats.report().as_ref());
        }
        if let Some(time) = args.sleep {
            thread::sleep(time);
        }
    }
    Ok(board)
}

fn run_console(
    mut board: Board,
    args: &options::Args,
    config: EngineConfig,
    stats: &mut impl Recorder,
) -> Result<Board, Box<dyn Error>> {
    let mut console = console::ConsoleRender::new()?;
    'generations: for _ in 0..args.generations {
        while let Some(cmd) = console.poll_events()? {
            if let console::ConsoleCommand::Exit = cmd {
                break 'generations;
            }
        }
        console.render(&board)?;

        board = advance(board, 1, config)?;
        stats.record(1, board.alive_count());
        if stats.has_report() {
            console.set_report(stats.report().as_ref().to_owned());
        }
        if let Some(time) = args.sleep {
            thread::sleep(time);
        }
    }
    Ok(board)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let board = initial_board(&args)?;
    info!(size = board.nrows(), alive = board.alive_count(), "board ready");

    let config = EngineConfig::with_threads(args.threads);
    let mut stats = stats::SwitchRecorder::new(board.alive_count(), args.stats_file.is_some());
    let board = if args.console {
        run_console(board, &args, config, &mut stats)?
    } else {
        run_batch(board, &args, config, &mut stats)?
    };

    if let Some(file_name) = &args.stats_file {
        stats.save(file_name)?;
    }
    if let Some(file_name) = &args.output_file {
        let encoder = RunLengthEncoded::default().set_name("torlife generated pattern");
        std::fs::write(file_name, encoder.encode(&board.alive_positions()))?;
        info!(file = %file_name, alive = board.alive_count(), "wrote final board");
    }

    Ok(())
}
