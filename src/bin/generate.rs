/// Maze generator
///
/// Writes a random maze that is guaranteed to be solvable.
use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use thiserror::Error;

use maze_search::generator::GeneratorError;
use maze_search::generator::Maze2DGenerator;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, env = "MAZE_WIDTH", default_value_t = 100usize)]
    pub width: usize,
    #[arg(long, env = "MAZE_HEIGHT", default_value_t = 30usize)]
    pub height: usize,

    /// Seed for a reproducible maze, a random one is used otherwise
    #[arg(long, env = "MAZE_SEED")]
    pub seed: Option<u64>,

    #[arg(short, long, env = "MAZE_OUTPUT", default_value = "solvable_maze.txt")]
    pub output: PathBuf,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Debug, Error)]
enum GenerateError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("IO error when writing '{p}': {e}")]
    IOError { p: PathBuf, e: std::io::Error },
}

fn run(args: &Args) -> Result<(), GenerateError> {
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Generating a {}x{} maze with seed {seed}", args.width, args.height);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let problem = Maze2DGenerator::new(args.width, args.height).generate(&mut rng)?;

    std::fs::write(&args.output, problem.to_text()).map_err(|e| GenerateError::IOError {
        p: args.output.clone(),
        e,
    })?;
    println!(
        "Maze {}x{} (seed {}) written to {:?}",
        args.width,
        args.height,
        seed.yellow(),
        args.output.green()
    );

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    args.color.write_global();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
