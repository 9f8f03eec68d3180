//! Step-by-step terminal animation of a running search.

use std::io::Write;
use std::time::Duration;

use owo_colors::OwoColorize;
use rustc_hash::FxHashSet;

use crate::algorithms::uninformed::StepObserver;
use crate::problem::Problem;
use crate::problems::maze_2d::Maze2DAction;
use crate::problems::maze_2d::Maze2DProblem;
use crate::problems::maze_2d::Maze2DState;
use crate::render::text::Glyph;
use crate::render::text::glyph;
use crate::render::text::solution_cells;
use crate::search::SearchTreeNode;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Redraws the maze after every step, highlighting the path to the node just
/// removed from the frontier and everything explored so far.
///
/// Colours are always emitted, wrap the writer in an `anstream` stream to have
/// them stripped when unsupported.
#[derive(Debug)]
pub struct TerminalAnimation<'p, W: Write> {
    out: W,
    problem: &'p Maze2DProblem,
    delay: Duration,
    /// Frames successfully written.
    frames: usize,
    /// Set on the first failed write, no further frames are drawn.
    broken: bool,
}

impl<'p, W: Write> TerminalAnimation<'p, W> {
    pub fn new(out: W, problem: &'p Maze2DProblem, delay: Duration) -> Self {
        Self {
            out,
            problem,
            delay,
            frames: 0,
            broken: false,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(
        &mut self,
        node: &SearchTreeNode<'_, Maze2DState, Maze2DAction>,
        explored: &FxHashSet<Maze2DState>,
        num_explored: usize,
    ) -> std::io::Result<()> {
        let path = solution_cells(&node.path());
        let mut frame = String::from(CLEAR_SCREEN);
        let mut row = 0usize;

        for (s, cell) in self.problem.space().cells() {
            if s.row() != row {
                frame.push('\n');
                row = s.row();
            }
            let g = glyph(self.problem, &s, cell, Some(&path), Some(explored));
            let c = g.as_char();
            let styled = match g {
                Glyph::Wall => c.bright_black().to_string(),
                Glyph::Start => c.red().bold().to_string(),
                Glyph::Goal => c.green().bold().to_string(),
                Glyph::Solution if &s == node.state() => '@'.yellow().bold().to_string(),
                Glyph::Solution => c.yellow().to_string(),
                Glyph::Explored => c.magenta().to_string(),
                Glyph::Empty => c.to_string(),
            };
            frame.push_str(&styled);
        }
        frame.push('\n');

        writeln!(
            self.out,
            "{frame}Step {} at {} (depth {})",
            num_explored.bold(),
            node.state().cyan(),
            node.depth()
        )?;
        self.out.flush()
    }
}

impl<W: Write> StepObserver<Maze2DState, Maze2DAction> for TerminalAnimation<'_, W> {
    fn on_step(
        &mut self,
        node: &SearchTreeNode<'_, Maze2DState, Maze2DAction>,
        explored: &FxHashSet<Maze2DState>,
        num_explored: usize,
    ) {
        if self.broken {
            return;
        }
        match self.draw(node, explored, num_explored) {
            Ok(()) => self.frames += 1,
            Err(e) => {
                log::warn!("Stopping animation, failed to draw frame {num_explored}: {e}");
                self.broken = true;
                return;
            }
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}
