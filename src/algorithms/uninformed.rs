//! Implementation of uninformed search (depth-first and breadth-first).
//!
//! Both searches share the same loop and only differ in the frontier that
//! orders the pending nodes.

use std::marker::PhantomData;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::frontier::Frontier;
use crate::frontier::FrontierError;
use crate::frontier::FrontierKind;
use crate::frontier::QueueFrontier;
use crate::frontier::StackFrontier;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Solution;
use crate::space::Space;
use crate::space::State;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("no solution (explored {explored} states)")]
    NoSolution { explored: usize },
    #[error("search aborted after exploring {explored} states (limit {limit})")]
    Aborted { explored: usize, limit: usize },
    #[error("frontier misuse: {0}")]
    Frontier(#[from] FrontierError),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Frontier policy, decides between depth-first and breadth-first search.
    pub frontier: FrontierKind,
    /// Maximum number of nodes to remove from the frontier before giving up.
    pub max_steps: Option<usize>,
}

impl SearchConfig {
    pub fn new(frontier: FrontierKind) -> Self {
        Self {
            frontier,
            max_steps: None,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// Gets notified every time the search removes a node from the frontier.
///
/// Observers see the search, but can't influence it.
pub trait StepObserver<St, A>
where
    St: State,
    A: Action,
{
    fn on_step(
        &mut self,
        node: &SearchTreeNode<'_, St, A>,
        explored: &FxHashSet<St>,
        num_explored: usize,
    );
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl<St, A> StepObserver<St, A> for NoopObserver
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn on_step(
        &mut self,
        _node: &SearchTreeNode<'_, St, A>,
        _explored: &FxHashSet<St>,
        _num_explored: usize,
    ) {
    }
}

#[derive(Debug)]
pub struct UninformedSearch<P, Sp, St, A>
where
    P: Problem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    problem: P,
    config: SearchConfig,

    /// States removed from the frontier and expanded during the last run.
    explored: FxHashSet<St>,
    /// Number of nodes removed from the frontier during the last run,
    /// including the goal node.
    num_explored: usize,
    solution: Option<Solution<St, A>>,

    _phantom_space: PhantomData<Sp>,
}

impl<P, Sp, St, A> UninformedSearch<P, Sp, St, A>
where
    P: Problem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new(p: P, config: SearchConfig) -> Self {
        Self {
            problem: p,
            config,
            explored: FxHashSet::default(),
            num_explored: 0,
            solution: None,

            _phantom_space: PhantomData,
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
    pub fn explored(&self) -> &FxHashSet<St> {
        &self.explored
    }
    pub fn num_explored(&self) -> usize {
        self.num_explored
    }
    /// The Solution found by the last successful run.
    pub fn solution(&self) -> Option<&Solution<St, A>> {
        self.solution.as_ref()
    }

    /// Finds a path from the start to the goal.
    pub fn solve(&mut self) -> Result<&Solution<St, A>, SearchError> {
        self.solve_observed(&mut NoopObserver)
    }

    /// Finds a path from the start to the goal, reporting every step.
    pub fn solve_observed<O>(
        &mut self,
        observer: &mut O,
    ) -> Result<&Solution<St, A>, SearchError>
    where
        O: StepObserver<St, A>,
    {
        self.explored.clear();
        self.num_explored = 0;
        self.solution = None;
        log::debug!(
            "Solving {:?} with a {} frontier (limit: {:?})",
            self.problem.space(),
            self.config.frontier,
            self.config.max_steps
        );

        let tree = SearchTree::<St, A>::new();
        let result = match self.config.frontier {
            FrontierKind::Stack => self.run(&tree, StackFrontier::new(), observer),
            FrontierKind::Queue => self.run(&tree, QueueFrontier::new(), observer),
        };
        log::debug!(
            "Search finished after exploring {} states ({} nodes created)",
            self.num_explored,
            tree.len()
        );

        let solution = result?;
        Ok(self.solution.insert(solution))
    }

    fn run<'t, F, O>(
        &mut self,
        tree: &'t SearchTree<'t, St, A>,
        mut frontier: F,
        observer: &mut O,
    ) -> Result<Solution<St, A>, SearchError>
    where
        F: Frontier<'t, St, A>,
        O: StepObserver<St, A>,
    {
        frontier.add(tree.push(SearchTreeNode::new_root(*self.problem.start())));

        loop {
            #[cfg(feature = "coz_profile")]
            coz::scope!("NodeExpansion");

            if frontier.is_empty() {
                return Err(SearchError::NoSolution {
                    explored: self.num_explored,
                });
            }
            if let Some(limit) = self.config.max_steps {
                if self.num_explored >= limit {
                    return Err(SearchError::Aborted {
                        explored: self.num_explored,
                        limit,
                    });
                }
            }

            let node = frontier.remove()?;
            self.num_explored += 1;
            observer.on_step(node, &self.explored, self.num_explored);

            if self.problem.is_goal(node.state()) {
                #[cfg(feature = "coz_profile")]
                coz::progress!("GoalFound");
                return Ok(node.path());
            }

            // Mark as explored
            let state = *node.state();
            self.explored.insert(state);

            // Expand state
            for (a, s) in self.problem.space().neighbours(&state) {
                if frontier.contains_state(&s) || self.explored.contains(&s) {
                    continue;
                }
                log::trace!("{state} -{a}-> {s}");
                frontier.add(tree.push(SearchTreeNode::new(s, node, a)));
            }
        }
    }
}
