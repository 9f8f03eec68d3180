//! Random maze generation through iterative randomized depth-first carving.
//!
//! The start is always `(0, 0)` and the goal is placed on the last cell carved,
//! so every generated maze is solvable. Note the last carved cell is only an
//! approximation of the cell farthest from the start.

use rand::Rng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::problems::maze_2d::Maze2DCell;
use crate::problems::maze_2d::Maze2DProblem;
use crate::problems::maze_2d::Maze2DSpace;
use crate::problems::maze_2d::Maze2DState;

/// Carving moves two cells at a time, leaving walls between corridors.
const CARVE_OFFSETS: [(isize, isize); 4] = [(0, 2), (0, -2), (2, 0), (-2, 0)];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("a {width}x{height} maze has no room to carve a goal")]
    TooSmall { width: usize, height: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Maze2DGenerator {
    width: usize,
    height: usize,
}

impl Maze2DGenerator {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Generates a solvable maze.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Maze2DProblem, GeneratorError> {
        // A single carving step needs 3 cells along some dimension.
        if self.width == 0 || self.height == 0 || (self.width < 3 && self.height < 3) {
            return Err(GeneratorError::TooSmall {
                width: self.width,
                height: self.height,
            });
        }

        let mut space =
            Maze2DSpace::new_filled_with_dimensions(self.width, self.height, Maze2DCell::Wall);

        let start = Maze2DState::new(0, 0);
        space.set(&start, Maze2DCell::Empty);

        let mut stack = vec![start];
        let mut visited = FxHashSet::<Maze2DState>::default();
        visited.insert(start);
        let mut farthest = start;

        while let Some(&current) = stack.last() {
            match self.random_unvisited(rng, &current, &visited) {
                Some(next) => {
                    let between = Maze2DState::new(
                        (current.row() + next.row()) / 2,
                        (current.col() + next.col()) / 2,
                    );
                    space.set(&between, Maze2DCell::Empty);
                    space.set(&next, Maze2DCell::Empty);
                    visited.insert(next);
                    stack.push(next);

                    farthest = next;
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug_assert_ne!(farthest, start);
        log::debug!(
            "Carved {} cells of a {}x{} maze, goal at {}",
            visited.len(),
            self.width,
            self.height,
            farthest
        );
        Ok(Maze2DProblem::from_parts(space, start, farthest))
    }

    /// Picks a random in-bounds unvisited cell two steps away.
    fn random_unvisited<R: Rng>(
        &self,
        rng: &mut R,
        s: &Maze2DState,
        visited: &FxHashSet<Maze2DState>,
    ) -> Option<Maze2DState> {
        let mut offsets = CARVE_OFFSETS;
        offsets.shuffle(rng);

        offsets.into_iter().find_map(|(d_row, d_col)| {
            let row = s.row().checked_add_signed(d_row)?;
            let col = s.col().checked_add_signed(d_col)?;
            let next = Maze2DState::new(row, col);
            (row < self.height && col < self.width && !visited.contains(&next)).then_some(next)
        })
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::algorithms::uninformed::SearchConfig;
    use crate::algorithms::uninformed::UninformedSearch;
    use crate::frontier::FrontierKind;
    use crate::problem::Problem;
    use crate::space::Space;

    #[test]
    fn generated_mazes_are_solvable() {
        for seed in 0..20u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let problem = Maze2DGenerator::new(21, 11).generate(&mut rng).unwrap();

            assert_eq!(problem.start(), &Maze2DState::new(0, 0));
            assert_ne!(problem.start(), problem.goal());
            assert!(problem.space().valid(problem.goal()));

            for kind in [FrontierKind::Stack, FrontierKind::Queue] {
                let mut search = UninformedSearch::new(problem.clone(), SearchConfig::new(kind));
                let solution = search.solve().unwrap().clone();
                assert!(problem.space().valid_solution(problem.start(), &solution));
            }
        }
    }

    #[test]
    fn generated_text_parses_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let problem = Maze2DGenerator::new(100, 30).generate(&mut rng).unwrap();
        let text = problem.to_text();

        assert_eq!(text.lines().count(), 30);
        assert!(text.lines().all(|l| l.chars().count() == 100));
        assert_eq!(Maze2DProblem::try_from(text.as_str()).unwrap(), problem);
    }

    #[test]
    fn same_seed_same_maze() {
        let generator = Maze2DGenerator::new(15, 9);
        let a = generator
            .generate(&mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        let b = generator
            .generate(&mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn carving_stays_on_even_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let problem = Maze2DGenerator::new(9, 9).generate(&mut rng).unwrap();
        let space = problem.space();

        // Cells with both coordinates odd are never carved.
        for (s, cell) in space.cells() {
            if s.row() % 2 == 1 && s.col() % 2 == 1 {
                assert_eq!(cell, Maze2DCell::Wall, "{s} was carved");
            }
        }
        // Every even cell of an odd-sized grid gets visited.
        for (s, cell) in space.cells() {
            if s.row() % 2 == 0 && s.col() % 2 == 0 {
                assert_eq!(cell, Maze2DCell::Empty, "{s} was not carved");
            }
        }
        assert_eq!(problem.goal().row() % 2, 0);
        assert_eq!(problem.goal().col() % 2, 0);
    }

    #[test]
    fn too_small() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for (width, height) in [(0, 10), (10, 0), (1, 1), (2, 2)] {
            assert_eq!(
                Maze2DGenerator::new(width, height).generate(&mut rng),
                Err(GeneratorError::TooSmall { width, height })
            );
        }
        assert!(Maze2DGenerator::new(3, 1).generate(&mut rng).is_ok());
        assert!(Maze2DGenerator::new(1, 3).generate(&mut rng).is_ok());
    }
}
