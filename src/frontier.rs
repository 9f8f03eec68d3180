//! Frontiers hold the nodes that were discovered but not yet expanded.
//!
//! The removal policy of the frontier is what decides the search order, a
//! `StackFrontier` gives a depth-first search while a `QueueFrontier` gives a
//! breadth-first search.

use std::collections::VecDeque;

use derive_more::Display;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::State;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontierError {
    #[error("empty frontier")]
    Empty,
}

/// Selects the frontier policy by value.
#[derive(Copy, Clone, Debug, Display, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FrontierKind {
    /// Last-in first-out, explores depth-first.
    #[default]
    #[display("stack")]
    Stack,
    /// First-in first-out, explores breadth-first.
    #[display("queue")]
    Queue,
}

pub trait Frontier<'t, St, A>
where
    St: State,
    A: Action,
{
    /// Adds a node at the end of the frontier.
    fn add(&mut self, node: &'t SearchTreeNode<'t, St, A>);
    /// Removes the next node according to the frontier's policy.
    fn remove(&mut self) -> Result<&'t SearchTreeNode<'t, St, A>, FrontierError>;
    /// Checks whether any pending node holds the given State.
    fn contains_state(&self, s: &St) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Multiset of the States currently held by a frontier.
///
/// Allows answering `contains_state` without scanning the pending nodes.
#[derive(Debug)]
struct PendingStates<St: State> {
    counts: FxHashMap<St, u32>,
}

impl<St: State> PendingStates<St> {
    fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }

    #[inline(always)]
    fn insert(&mut self, s: St) {
        *self.counts.entry(s).or_insert(0) += 1;
    }

    #[inline(always)]
    fn remove(&mut self, s: &St) {
        match self.counts.get_mut(s) {
            Some(1) => {
                self.counts.remove(s);
            }
            Some(count) => *count -= 1,
            None => unreachable!("Removed a state that was never pending"),
        }
    }

    #[inline(always)]
    fn contains(&self, s: &St) -> bool {
        self.counts.contains_key(s)
    }

    #[cfg(feature = "verify")]
    fn verify(&self, states: impl Iterator<Item = St>) {
        let mut counts = FxHashMap::<St, u32>::default();
        for s in states {
            *counts.entry(s).or_insert(0) += 1;
        }
        assert_eq!(counts, self.counts, "Pending states are out of sync");
    }
}

/// A LIFO frontier.
#[derive(Debug)]
pub struct StackFrontier<'t, St, A>
where
    St: State,
    A: Action,
{
    nodes: Vec<&'t SearchTreeNode<'t, St, A>>,
    pending: PendingStates<St>,
}

impl<'t, St, A> StackFrontier<'t, St, A>
where
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            pending: PendingStates::new(),
        }
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {}
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        self.pending.verify(self.nodes.iter().map(|node| node.state));
    }
}

impl<St, A> Default for StackFrontier<'_, St, A>
where
    St: State,
    A: Action,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'t, St, A> Frontier<'t, St, A> for StackFrontier<'t, St, A>
where
    St: State,
    A: Action,
{
    fn add(&mut self, node: &'t SearchTreeNode<'t, St, A>) {
        self.pending.insert(node.state);
        self.nodes.push(node);
        self.verify();
    }

    fn remove(&mut self) -> Result<&'t SearchTreeNode<'t, St, A>, FrontierError> {
        let node = self.nodes.pop().ok_or(FrontierError::Empty)?;
        self.pending.remove(&node.state);
        self.verify();
        Ok(node)
    }

    #[inline(always)]
    fn contains_state(&self, s: &St) -> bool {
        self.pending.contains(s)
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// A FIFO frontier.
#[derive(Debug)]
pub struct QueueFrontier<'t, St, A>
where
    St: State,
    A: Action,
{
    nodes: VecDeque<&'t SearchTreeNode<'t, St, A>>,
    pending: PendingStates<St>,
}

impl<'t, St, A> QueueFrontier<'t, St, A>
where
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: VecDeque::new(),
            pending: PendingStates::new(),
        }
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {}
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        self.pending.verify(self.nodes.iter().map(|node| node.state));
    }
}

impl<St, A> Default for QueueFrontier<'_, St, A>
where
    St: State,
    A: Action,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'t, St, A> Frontier<'t, St, A> for QueueFrontier<'t, St, A>
where
    St: State,
    A: Action,
{
    fn add(&mut self, node: &'t SearchTreeNode<'t, St, A>) {
        self.pending.insert(node.state);
        self.nodes.push_back(node);
        self.verify();
    }

    fn remove(&mut self) -> Result<&'t SearchTreeNode<'t, St, A>, FrontierError> {
        let node = self.nodes.pop_front().ok_or(FrontierError::Empty)?;
        self.pending.remove(&node.state);
        self.verify();
        Ok(node)
    }

    #[inline(always)]
    fn contains_state(&self, s: &St) -> bool {
        self.pending.contains(s)
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.nodes.len()
    }
}
