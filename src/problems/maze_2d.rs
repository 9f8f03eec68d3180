use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

use crate::problem::Problem;
use crate::space::Action;
use crate::space::Neighbours;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 20;

const START_MARKER: char = 'A';
const GOAL_MARKER: char = 'B';
const OPEN_MARKER: char = ' ';
const WALL_MARKER: char = '#';

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({row},{col})")]
pub struct Maze2DState {
    pub(crate) row: usize,
    pub(crate) col: usize,
}

impl Maze2DState {
    pub const fn new(row: usize, col: usize) -> Maze2DState {
        Maze2DState { row, col }
    }
    pub fn row(&self) -> usize {
        self.row
    }
    pub fn col(&self) -> usize {
        self.col
    }
}
impl State for Maze2DState {}

impl Default for Maze2DState {
    fn default() -> Self {
        Maze2DState::new(0, 0)
    }
}

impl From<(usize, usize)> for Maze2DState {
    fn from((row, col): (usize, usize)) -> Self {
        Maze2DState::new(row, col)
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Maze2DAction {
    #[display("up")]
    Up = 0, // row--
    #[display("down")]
    Down = 1, // row++
    #[display("left")]
    Left = 2, // col--
    #[display("right")]
    Right = 3, // col++
}
impl Action for Maze2DAction {}

impl Maze2DAction {
    /// Expansion order. Searches depend on it being fixed.
    pub const ALL: [Maze2DAction; 4] = [
        Maze2DAction::Up,
        Maze2DAction::Down,
        Maze2DAction::Left,
        Maze2DAction::Right,
    ];
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Default)]
pub enum Maze2DCell {
    #[default]
    #[display(" ")]
    Empty,
    #[display("█")]
    Wall,
}

impl From<char> for Maze2DCell {
    /// Anything that is not blank is a Wall.
    fn from(ch: char) -> Self {
        match ch {
            OPEN_MARKER => Maze2DCell::Empty,
            _ => Maze2DCell::Wall,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Maze2DSpace {
    pub(crate) map: Vec<Vec<Maze2DCell>>,
    width: usize,
}

impl Maze2DSpace {
    /// Builds a Space from rows of cells.
    ///
    /// Rows shorter than the longest one are padded with Empty cells.
    pub fn new_from_map(mut map: Vec<Vec<Maze2DCell>>) -> Self {
        let width = map.iter().map(Vec::len).max().unwrap_or(0);
        for row in map.iter_mut() {
            row.resize(width, Maze2DCell::Empty);
        }
        Self { map, width }
    }
    pub(crate) fn new_filled_with_dimensions(width: usize, height: usize, cell: Maze2DCell) -> Self {
        Self {
            map: vec![vec![cell; width]; height],
            width,
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.map.len())
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.map.len()
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width
    }

    #[inline(always)]
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.in_bounds(row, col) && self.map[row][col] == Maze2DCell::Wall
    }

    /// In bounds and not a Wall.
    #[inline(always)]
    pub fn is_passable(&self, row: usize, col: usize) -> bool {
        self.in_bounds(row, col) && self.map[row][col] != Maze2DCell::Wall
    }

    pub(crate) fn set(&mut self, s: &Maze2DState, cell: Maze2DCell) {
        debug_assert!(self.in_bounds(s.row, s.col));
        self.map[s.row][s.col] = cell;
    }

    /// Iterates over every `(state, cell)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Maze2DState, Maze2DCell)> + '_ {
        self.map.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, cell)| (Maze2DState::new(row, col), *cell))
        })
    }
}

impl Space<Maze2DState, Maze2DAction> for Maze2DSpace {
    #[inline(always)]
    fn apply(&self, state: &Maze2DState, action: &Maze2DAction) -> Option<Maze2DState> {
        let (row, col) = (state.row, state.col);

        #[rustfmt::skip]
        let (row, col) = match action {
            Maze2DAction::Up    => (row.checked_sub(1)?, col                ),
            Maze2DAction::Down  => (row.checked_add(1)?, col                ),
            Maze2DAction::Left  => (row,                 col.checked_sub(1)?),
            Maze2DAction::Right => (row,                 col.checked_add(1)?),
        };

        Some(Maze2DState::new(row, col))
    }

    /// Gets the neighbours of a given position.
    ///
    /// Candidates are checked in the fixed `up, down, left, right` order and
    /// only passable ones are kept.
    fn neighbours(&self, state: &Maze2DState) -> Neighbours<Maze2DState, Maze2DAction> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let mut v: Neighbours<Maze2DState, Maze2DAction> = SmallVec::new();
        for action in Maze2DAction::ALL {
            if let Some(s) = self.apply(state, &action) {
                if self.is_passable(s.row, s.col) {
                    v.push((action, s));
                }
            }
        }
        v
    }

    #[inline(always)]
    fn valid(&self, state: &Maze2DState) -> bool {
        self.is_passable(state.row, state.col)
    }
}

impl std::fmt::Display for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.dimensions();
        writeln!(f, "Maze2D({}x{}):", d.0, d.1)?;
        for line in self.map.iter().take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze2D{:?}", self.dimensions())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze2DProblem {
    space: Maze2DSpace,
    start: Maze2DState,
    goal: Maze2DState,
}

impl Maze2DProblem {
    /// Serialises the maze back into its text format.
    pub fn to_text(&self) -> String {
        let mut s = String::with_capacity((self.space.width() + 1) * self.space.height());
        for (row, line) in self.space.map.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                let state = Maze2DState::new(row, col);
                let ch = if state == self.start {
                    START_MARKER
                } else if state == self.goal {
                    GOAL_MARKER
                } else {
                    match cell {
                        Maze2DCell::Empty => OPEN_MARKER,
                        Maze2DCell::Wall => WALL_MARKER,
                    }
                };
                s.push(ch);
            }
            s.push('\n');
        }
        s
    }

    pub(crate) fn from_parts(space: Maze2DSpace, start: Maze2DState, goal: Maze2DState) -> Self {
        debug_assert!(space.valid(&start));
        debug_assert!(space.valid(&goal));
        Self { space, start, goal }
    }
}

impl Problem<Maze2DSpace, Maze2DState, Maze2DAction> for Maze2DProblem {
    fn space(&self) -> &Maze2DSpace {
        &self.space
    }
    fn start(&self) -> &Maze2DState {
        &self.start
    }
    fn goal(&self) -> &Maze2DState {
        &self.goal
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq)]
pub enum Maze2DProblemCell {
    Cell(Maze2DCell),
    #[display("A")]
    Start,
    #[display("B")]
    Goal,
}

impl From<char> for Maze2DProblemCell {
    fn from(ch: char) -> Self {
        match ch {
            START_MARKER => Maze2DProblemCell::Start,
            GOAL_MARKER => Maze2DProblemCell::Goal,
            ch => Maze2DProblemCell::Cell(Maze2DCell::from(ch)),
        }
    }
}

#[derive(Debug, Error)]
pub enum Maze2DProblemParseError {
    #[error("maze must have exactly one start point (found {found})")]
    StartPoints { found: usize },
    #[error("maze must have exactly one goal (found {found})")]
    Goals { found: usize },
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
}

impl std::convert::TryFrom<&str> for Maze2DProblem {
    type Error = Maze2DProblemParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        // Marker counts are checked over the whole text, start first.
        let found = s.chars().filter(|ch| *ch == START_MARKER).count();
        if found != 1 {
            return Err(Maze2DProblemParseError::StartPoints { found });
        }
        let found = s.chars().filter(|ch| *ch == GOAL_MARKER).count();
        if found != 1 {
            return Err(Maze2DProblemParseError::Goals { found });
        }

        let mut start = Maze2DState::default();
        let mut goal = Maze2DState::default();
        let mut map = Vec::<Vec<Maze2DCell>>::new();

        for (row, line) in s.lines().enumerate() {
            let mut cells = Vec::<Maze2DCell>::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                cells.push(match Maze2DProblemCell::from(ch) {
                    Maze2DProblemCell::Start => {
                        start = Maze2DState::new(row, col);
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Goal => {
                        goal = Maze2DState::new(row, col);
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Cell(c) => c,
                });
            }
            map.push(cells);
        }

        let space = Maze2DSpace::new_from_map(map);
        log::debug!(
            "Parsed {:?} with start {} and goal {}",
            space,
            start,
            goal
        );
        Ok(Maze2DProblem::from_parts(space, start, goal))
    }
}

impl std::convert::TryFrom<&std::path::Path> for Maze2DProblem {
    type Error = Maze2DProblemParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let contents =
            std::fs::read_to_string(p).map_err(|e| Maze2DProblemParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?;

        Maze2DProblem::try_from(contents.as_str())
    }
}

impl std::fmt::Display for Maze2DProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.space.dimensions();

        writeln!(
            f,
            "Maze2DProblem({}x{}) (s:{}, g:{}):",
            d.0, d.1, self.start, self.goal
        )?;
        let map = &self.space.map;
        for (row, line) in map.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (col, cell) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let s = Maze2DState::new(row, col);
                if s == self.start {
                    write!(f, "{}", Maze2DProblemCell::Start)?;
                } else if s == self.goal {
                    write!(f, "{}", Maze2DProblemCell::Goal)?;
                } else {
                    write!(f, "{cell}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::path::Path;

    fn s(row: usize, col: usize) -> Maze2DState {
        Maze2DState::new(row, col)
    }

    #[test]
    fn load_maze1() {
        let problem = Maze2DProblem::try_from(Path::new("data/mazes/maze1.txt")).unwrap();

        assert_eq!(problem.space().height(), 10);
        assert_eq!(problem.space().width(), 10);
        assert_eq!(problem.start(), &s(9, 0));
        assert_eq!(problem.goal(), &s(0, 5));
    }

    #[test]
    fn neighbours_of_corner_start() {
        let problem = Maze2DProblem::try_from(Path::new("data/mazes/maze1.txt")).unwrap();
        let neighbours = problem.space().neighbours(&s(9, 0));

        assert_eq!(neighbours.as_slice(), &[(Maze2DAction::Up, s(8, 0))]);
    }

    #[test]
    fn neighbours_keep_direction_order() {
        let problem = Maze2DProblem::try_from(indoc! {"
            # #
             A
            #B#
        "})
        .unwrap();
        let neighbours = problem.space().neighbours(&s(1, 1));

        assert_eq!(
            neighbours.as_slice(),
            &[
                (Maze2DAction::Up, s(0, 1)),
                (Maze2DAction::Down, s(2, 1)),
                (Maze2DAction::Left, s(1, 0)),
                (Maze2DAction::Right, s(1, 2)),
            ]
        );
    }

    #[test]
    fn single_row() {
        let problem = Maze2DProblem::try_from("A  B").unwrap();

        assert_eq!(problem.space().dimensions(), (4, 1));
        assert_eq!(problem.start(), &s(0, 0));
        assert_eq!(problem.goal(), &s(0, 3));
        assert!(problem.space().is_passable(0, 1));
        assert!(!problem.space().is_passable(1, 0));
        assert!(!problem.space().is_passable(0, 4));
    }

    #[test]
    fn short_rows_are_padded_open() {
        let problem = Maze2DProblem::try_from(indoc! {"
            #####
            #A
            ###B#
        "})
        .unwrap();

        assert_eq!(problem.space().width(), 5);
        assert!(problem.space().is_passable(1, 3));
        assert!(problem.space().is_passable(1, 4));
        assert!(!problem.space().is_wall(1, 4));
        assert!(problem.space().is_wall(1, 0));
    }

    #[test]
    fn any_other_glyph_is_a_wall() {
        let problem = Maze2DProblem::try_from("A.x B").unwrap();

        assert!(problem.space().is_wall(0, 1));
        assert!(problem.space().is_wall(0, 2));
        assert!(problem.space().is_passable(0, 3));
    }

    #[test]
    fn invalid_markers() {
        let no_start = indoc! {"
            ##########
            #        #
            #  ####  #
            #     B  #
            ##########
        "};
        let no_goal = indoc! {"
            ##########
            #A       #
            #  ####  #
            #        #
            ##########
        "};
        let two_starts = indoc! {"
            ##########
            #A       #
            #  ####  #
            #       A#
            ##########
        "};
        let two_goals = indoc! {"
            ##########
            #A       #
            #  #B##  #
            #     B  #
            ##########
        "};
        let two_starts_no_goal = "A  A";

        for (maze, expected) in [
            (no_start, "maze must have exactly one start point"),
            (no_goal, "maze must have exactly one goal"),
            (two_starts, "maze must have exactly one start point"),
            (two_goals, "maze must have exactly one goal"),
            (two_starts_no_goal, "maze must have exactly one start point"),
        ] {
            let err = Maze2DProblem::try_from(maze).unwrap_err();
            assert!(
                err.to_string().starts_with(expected),
                "{err} should start with {expected}"
            );
        }

        assert!(matches!(
            Maze2DProblem::try_from(two_starts).unwrap_err(),
            Maze2DProblemParseError::StartPoints { found: 2 }
        ));
        assert!(matches!(
            Maze2DProblem::try_from("").unwrap_err(),
            Maze2DProblemParseError::StartPoints { found: 0 }
        ));
    }

    #[test]
    fn missing_file() {
        let err = Maze2DProblem::try_from(Path::new("data/mazes/does-not-exist.txt")).unwrap_err();
        assert!(matches!(err, Maze2DProblemParseError::IOError { .. }));
    }

    #[test]
    fn apply_stays_in_coordinates() {
        let problem = Maze2DProblem::try_from("A  B").unwrap();
        let space = problem.space();

        assert_eq!(space.apply(&s(0, 0), &Maze2DAction::Up), None);
        assert_eq!(space.apply(&s(0, 0), &Maze2DAction::Left), None);
        assert_eq!(space.apply(&s(0, 0), &Maze2DAction::Down), Some(s(1, 0)));
        assert_eq!(space.apply(&s(0, 0), &Maze2DAction::Right), Some(s(0, 1)));
        assert!(!space.valid(&s(1, 0)));
    }

    #[test]
    fn text_round_trip() {
        let text = indoc! {"
            #####B#
            ##### #
            ####  #
            #### ##
                 ##
            A######
        "};
        let problem = Maze2DProblem::try_from(text).unwrap();

        assert_eq!(problem.to_text(), text);
    }

    #[test]
    fn display() {
        let problem = Maze2DProblem::try_from("#A#\n# #\n#B#").unwrap();

        assert_eq!(
            problem.to_string(),
            "Maze2DProblem(3x3) (s:(0,1), g:(2,1)):\n█A█\n█ █\n█B█\n"
        );
        assert_eq!(format!("{:?}", problem.space()), "Maze2D(3, 3)");
        assert_eq!(Maze2DAction::Left.to_string(), "left");
        assert_eq!(s(3, 4).to_string(), "(3,4)");
    }
}
