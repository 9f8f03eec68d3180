/// Maze solver
///
/// Loads a maze, finds a path from `A` to `B` and prints it.
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use rustc_hash::FxHashSet;
use thiserror::Error;

use maze_search::algorithms::uninformed::SearchConfig;
use maze_search::algorithms::uninformed::SearchError;
use maze_search::algorithms::uninformed::UninformedSearch;
use maze_search::frontier::FrontierKind;
use maze_search::problems::maze_2d::Maze2DAction;
use maze_search::problems::maze_2d::Maze2DProblem;
use maze_search::problems::maze_2d::Maze2DProblemParseError;
use maze_search::problems::maze_2d::Maze2DState;
use maze_search::render::image::ImageRenderError;
use maze_search::render::image::ImageRenderer;
use maze_search::render::terminal::TerminalAnimation;
use maze_search::render::text::render_text;
use maze_search::space::Solution;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Maze file, `A` marks the start and `B` the goal
    #[arg()]
    pub maze: PathBuf,

    /// Stack runs a depth-first search, queue a breadth-first one
    #[arg(short, long, env = "MAZE_FRONTIER", value_enum, default_value_t)]
    pub frontier: FrontierKind,

    /// Writes the solved maze as a PNG
    #[arg(short, long, env = "MAZE_IMAGE")]
    pub image: Option<PathBuf>,

    /// Marks explored cells on the solution
    #[arg(long)]
    pub show_explored: bool,

    /// Animates the search on the terminal
    #[arg(long)]
    pub animate: bool,
    #[arg(long, default_value_t = 100u64)]
    pub delay_ms: u64,

    /// Gives up after removing this many nodes from the frontier
    #[arg(long, env = "MAZE_MAX_STEPS")]
    pub max_steps: Option<usize>,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Debug, Error)]
enum SolveError {
    #[error(transparent)]
    Parse(#[from] Maze2DProblemParseError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Image(#[from] ImageRenderError),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

/// Writes the unsolved maze, surrounded by blank lines.
fn write_intro<W: Write>(out: &mut W, problem: &Maze2DProblem) -> std::io::Result<()> {
    writeln!(out, "{}", "Maze:".bold())?;
    writeln!(out)?;
    write!(out, "{}", render_text(problem, None, None))?;
    writeln!(out)?;
    writeln!(out, "Solving...")
}

/// Writes the explored count, and the solved maze when there is one.
fn write_outcome<W: Write>(
    out: &mut W,
    problem: &Maze2DProblem,
    num_explored: usize,
    solution: Option<&Solution<Maze2DState, Maze2DAction>>,
    explored: Option<&FxHashSet<Maze2DState>>,
) -> std::io::Result<()> {
    writeln!(out, "States Explored: {}", num_explored.yellow())?;
    if let Some(solution) = solution {
        writeln!(out, "{}", "Solution:".bold())?;
        writeln!(out)?;
        write!(out, "{}", render_text(problem, Some(solution), explored))?;
        writeln!(out)?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), SolveError> {
    let problem = Maze2DProblem::try_from(args.maze.as_path())?;
    log::info!("Loaded {:?} from {:?}", problem, args.maze);

    let mut out = anstream::stdout();
    write_intro(&mut out, &problem)?;

    let mut config = SearchConfig::new(args.frontier);
    config.max_steps = args.max_steps;
    let mut search = UninformedSearch::new(problem.clone(), config);

    log::info!("Solving with a {} frontier", args.frontier);
    let result = if args.animate {
        let delay = Duration::from_millis(args.delay_ms);
        let mut animation = TerminalAnimation::new(anstream::stdout(), &problem, delay);
        search.solve_observed(&mut animation).map(|s| s.clone())
    } else {
        search.solve().map(|s| s.clone())
    };

    let explored = args.show_explored.then(|| search.explored());
    write_outcome(
        &mut out,
        &problem,
        search.num_explored(),
        result.as_ref().ok(),
        explored,
    )?;
    let solution = result?;
    log::info!("Solution: {solution}");

    if let Some(p) = &args.image {
        let renderer = ImageRenderer {
            show_explored: args.show_explored,
            ..ImageRenderer::default()
        };
        renderer.save(p, &problem, Some(&solution), Some(search.explored()))?;
        println!("Image written to {:?}", p.green());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    #[cfg(feature = "coz_profile")]
    coz::thread_init();

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
