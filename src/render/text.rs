use rustc_hash::FxHashSet;

use crate::problem::Problem;
use crate::problems::maze_2d::Maze2DAction;
use crate::problems::maze_2d::Maze2DCell;
use crate::problems::maze_2d::Maze2DProblem;
use crate::problems::maze_2d::Maze2DState;
use crate::space::Solution;

/// What a single cell looks like once rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    Start,
    Goal,
    Solution,
    Explored,
    Empty,
}

impl Glyph {
    pub fn as_char(&self) -> char {
        match self {
            Glyph::Wall => '█',
            Glyph::Start => 'A',
            Glyph::Goal => 'B',
            Glyph::Solution => '*',
            Glyph::Explored => '·',
            Glyph::Empty => ' ',
        }
    }
}

/// The cells a solution goes through, collected once per render.
pub fn solution_cells(solution: &Solution<Maze2DState, Maze2DAction>) -> FxHashSet<Maze2DState> {
    solution.cells().collect()
}

/// Classifies a cell. Walls win over markers, which win over the solution.
pub fn glyph(
    problem: &Maze2DProblem,
    s: &Maze2DState,
    cell: Maze2DCell,
    solution: Option<&FxHashSet<Maze2DState>>,
    explored: Option<&FxHashSet<Maze2DState>>,
) -> Glyph {
    if cell == Maze2DCell::Wall {
        Glyph::Wall
    } else if s == problem.start() {
        Glyph::Start
    } else if s == problem.goal() {
        Glyph::Goal
    } else if solution.is_some_and(|cells| cells.contains(s)) {
        Glyph::Solution
    } else if explored.is_some_and(|e| e.contains(s)) {
        Glyph::Explored
    } else {
        Glyph::Empty
    }
}

/// Renders the maze as text, one line per row.
///
/// Explored cells are only marked when `explored` is given.
pub fn render_text(
    problem: &Maze2DProblem,
    solution: Option<&Solution<Maze2DState, Maze2DAction>>,
    explored: Option<&FxHashSet<Maze2DState>>,
) -> String {
    let space = problem.space();
    let path = solution.map(solution_cells);
    let mut out = String::with_capacity((space.width() + 1) * space.height() * 3);
    let mut row = 0usize;
    for (s, cell) in space.cells() {
        if s.row() != row {
            out.push('\n');
            row = s.row();
        }
        out.push(glyph(problem, &s, cell, path.as_ref(), explored).as_char());
    }
    if space.height() > 0 {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use std::path::Path;

    use super::*;
    use crate::algorithms::uninformed::SearchConfig;
    use crate::algorithms::uninformed::UninformedSearch;
    use crate::frontier::FrontierKind;

    #[test]
    fn unsolved() {
        let problem = Maze2DProblem::try_from(Path::new("data/mazes/maze2.txt")).unwrap();

        assert_eq!(render_text(&problem, None, None), "█A█\n█ █\n█B█\n");
    }

    #[test]
    fn solved() {
        let problem = Maze2DProblem::try_from(indoc! {"
            #####
            #A  #
            # # #
            #B  #
            #####
        "})
        .unwrap();

        // Stack pops `right` first, so it goes around.
        let mut dfs = UninformedSearch::new(problem.clone(), SearchConfig::default());
        let solution = dfs.solve().unwrap().clone();
        assert_eq!(
            render_text(&problem, Some(&solution), None),
            indoc! {"
                █████
                █A**█
                █ █*█
                █B**█
                █████
            "}
        );

        let mut bfs = UninformedSearch::new(problem.clone(), SearchConfig::new(FrontierKind::Queue));
        let solution = bfs.solve().unwrap().clone();
        assert_eq!(
            render_text(&problem, Some(&solution), Some(bfs.explored())),
            indoc! {"
                █████
                █A· █
                █*█ █
                █B  █
                █████
            "}
        );
    }

    #[test]
    fn glyph_precedence() {
        let problem = Maze2DProblem::try_from("A  B").unwrap();
        let solution = Solution::from_steps(vec![
            (Maze2DAction::Right, Maze2DState::new(0, 1)),
            (Maze2DAction::Right, Maze2DState::new(0, 2)),
            (Maze2DAction::Right, Maze2DState::new(0, 3)),
        ]);
        let path = solution_cells(&solution);
        assert_eq!(path.len(), 3);

        let explored: FxHashSet<Maze2DState> =
            (0..4).map(|col| Maze2DState::new(0, col)).collect();
        let at = |col: usize, cell: Maze2DCell| {
            glyph(&problem, &Maze2DState::new(0, col), cell, Some(&path), Some(&explored))
        };

        assert_eq!(at(0, Maze2DCell::Empty), Glyph::Start);
        assert_eq!(at(1, Maze2DCell::Empty), Glyph::Solution);
        assert_eq!(at(1, Maze2DCell::Wall), Glyph::Wall);
        assert_eq!(at(3, Maze2DCell::Empty), Glyph::Goal);
        assert_eq!(
            glyph(&problem, &Maze2DState::new(0, 2), Maze2DCell::Empty, None, Some(&explored)),
            Glyph::Explored
        );
        assert_eq!(
            glyph(&problem, &Maze2DState::new(0, 2), Maze2DCell::Empty, None, None),
            Glyph::Empty
        );
    }

    #[test]
    fn explored_marks() {
        let problem = Maze2DProblem::try_from("A   #B").unwrap();
        let mut explored = FxHashSet::default();
        explored.insert(Maze2DState::new(0, 1));

        assert_eq!(
            render_text(&problem, None, Some(&explored)),
            "A·  █B\n"
        );
    }
}
