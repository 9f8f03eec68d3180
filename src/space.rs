use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

pub trait Action: Copy + Clone + Debug + std::fmt::Display + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + std::fmt::Display + PartialEq + Eq + Hash {}

/// The `(action, state)` pairs reachable from a State in one step.
///
/// Grid-like spaces rarely have more than 4-8 successors, so these stay on the
/// stack.
pub type Neighbours<St, A> = SmallVec<[(A, St); 8]>;

/// A path from a (known) start to a goal.
///
/// Holds every step taken after leaving the start, so the start itself is not
/// part of it and the last state is the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<St, A>
where
    St: State,
    A: Action,
{
    steps: Vec<(A, St)>,
}

impl<St, A> Solution<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self { steps: vec![] }
    }

    #[inline(always)]
    pub fn from_steps(steps: Vec<(A, St)>) -> Self {
        Self { steps }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline(always)]
    pub fn append(&mut self, step: (A, St)) {
        self.steps.push(step);
    }

    /// Reverses the steps.
    ///
    /// Useful when naturally reconstructing paths from the goal backwards.
    pub fn reverse(&mut self) {
        self.steps.reverse();
    }

    pub fn steps(&self) -> &[(A, St)] {
        &self.steps
    }

    pub fn actions(&self) -> impl Iterator<Item = A> + '_ {
        self.steps.iter().map(|(a, _)| *a)
    }

    pub fn cells(&self) -> impl Iterator<Item = St> + '_ {
        self.steps.iter().map(|(_, s)| *s)
    }

    /// The last State reached, if any step was taken.
    pub fn end(&self) -> Option<St> {
        self.steps.last().map(|(_, s)| *s)
    }

    pub fn contains(&self, s: &St) -> bool {
        self.steps.iter().any(|(_, step)| step == s)
    }
}

impl<St, A> Default for Solution<St, A>
where
    St: State,
    A: Action,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> std::fmt::Display for Solution<St, A>
where
    St: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Solution({}:", self.len())?;
        for (a, s) in self.steps.iter().take(20) {
            write!(f, " {a}{s}")?;
        }
        if self.len() > 20 {
            write!(f, " ...")?;
        }
        write!(f, ")")
    }
}

pub trait Space<St, A>: std::fmt::Debug
where
    St: State,
    A: Action,
{
    /// Applies an Action, without checking that the result is valid.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// Expands a State.
    ///
    /// The order of the returned pairs is part of the contract, searches rely
    /// on it to be deterministic.
    fn neighbours(&self, s: &St) -> Neighbours<St, A>;

    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    /// Checks that a Solution can actually be walked from `start`.
    ///
    /// Every step has to land on a valid State through its recorded action,
    /// and no State may be visited twice.
    fn valid_solution(&self, start: &St, solution: &Solution<St, A>) -> bool {
        let mut visited = FxHashSet::<St>::default();
        visited.insert(*start);

        let mut state: St = *start;
        for (a, s) in solution.steps() {
            match self.apply(&state, a) {
                Some(new_state) if new_state == *s && self.valid(s) => state = new_state,
                _ => return false,
            }
            if !visited.insert(state) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::problems::maze_2d::Maze2DAction;
    use crate::problems::maze_2d::Maze2DProblem;
    use crate::problems::maze_2d::Maze2DState;

    #[test]
    fn valid_solution() {
        let problem = Maze2DProblem::try_from("A  B\n ## ").unwrap();
        let space = problem.space();
        let start = problem.start();
        let s = Maze2DState::new;

        let walk = Solution::from_steps(vec![
            (Maze2DAction::Right, s(0, 1)),
            (Maze2DAction::Right, s(0, 2)),
            (Maze2DAction::Right, s(0, 3)),
        ]);
        assert!(space.valid_solution(start, &walk));
        assert_eq!(walk.end(), Some(*problem.goal()));
        assert_eq!(walk.actions().count(), 3);
        assert_eq!(walk.to_string(), "Solution(3: right(0,1) right(0,2) right(0,3))");

        let jump = Solution::from_steps(vec![(Maze2DAction::Right, s(0, 2))]);
        assert!(!space.valid_solution(start, &jump));

        let into_wall = Solution::from_steps(vec![
            (Maze2DAction::Down, s(1, 0)),
            (Maze2DAction::Right, s(1, 1)),
        ]);
        assert!(!space.valid_solution(start, &into_wall));

        let back_and_forth = Solution::from_steps(vec![
            (Maze2DAction::Right, s(0, 1)),
            (Maze2DAction::Left, s(0, 0)),
        ]);
        assert!(!space.valid_solution(start, &back_and_forth));
    }
}
