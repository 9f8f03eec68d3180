use typed_arena::Arena;

use crate::space::Action;
use crate::space::Solution;
use crate::space::State;

/// A node in the Search Tree.
///
/// Nodes are never modified after being created. A child borrows its parent,
/// so lineage always points backwards to nodes allocated earlier in the same
/// `SearchTree`.
#[derive(Debug)]
pub struct SearchTreeNode<'t, St, A>
where
    St: State,
    A: Action,
{
    pub(crate) parent: Option<(&'t SearchTreeNode<'t, St, A>, A)>,
    pub(crate) state: St,
}

impl<'t, St, A> SearchTreeNode<'t, St, A>
where
    St: State,
    A: Action,
{
    /// Creates a root node, which has no parent and no action.
    pub fn new_root(s: St) -> Self {
        Self {
            parent: None,
            state: s,
        }
    }

    /// Creates a node reached from `parent` through `a`.
    pub fn new(s: St, parent: &'t SearchTreeNode<'t, St, A>, a: A) -> Self {
        debug_assert!(parent.state != s);
        Self {
            parent: Some((parent, a)),
            state: s,
        }
    }

    pub fn state(&self) -> &St {
        &self.state
    }

    pub fn parent(&self) -> Option<&'t SearchTreeNode<'t, St, A>> {
        self.parent.map(|(p, _)| p)
    }

    /// The action taken to reach this node, `None` for the root.
    pub fn action(&self) -> Option<A> {
        self.parent.map(|(_, a)| a)
    }

    /// Number of actions between the root and this node.
    pub fn depth(&self) -> usize {
        let mut depth = 0usize;
        let mut node = self;
        while let Some((parent, _)) = node.parent {
            depth += 1;
            node = parent;
        }
        depth
    }

    /// Reconstructs the path from the root to this node.
    #[must_use]
    pub fn path(&self) -> Solution<St, A> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("PathReconstruction");

        let mut path = Solution::<St, A>::new();
        let mut node = self;
        while let Some((parent, a)) = node.parent {
            path.append((a, node.state));
            node = parent;
        }

        path.reverse();
        path
    }
}

/// All the nodes created during a single search run.
///
/// Backed by an Arena since this collection only grows and nodes need stable
/// addresses for their children to borrow them.
pub struct SearchTree<'t, St, A>
where
    St: State,
    A: Action,
{
    nodes: Arena<SearchTreeNode<'t, St, A>>,
}

impl<'t, St, A> SearchTree<'t, St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Arena::<SearchTreeNode<'t, St, A>>::new(),
        }
    }

    #[inline(always)]
    pub fn push(&'t self, node: SearchTreeNode<'t, St, A>) -> &'t SearchTreeNode<'t, St, A> {
        self.nodes.alloc(node)
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<St, A> Default for SearchTree<'_, St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> std::fmt::Debug for SearchTree<'_, St, A>
where
    St: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
