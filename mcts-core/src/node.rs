/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt, mem,
    rc::{Rc, Weak},
};

use crate::GameAdapter;

/// Strong reference counted node.
pub type Node<G> = Rc<RefCell<TreeNode<G>>>;

/// Weak reference counted node.
pub type WeakNode<G> = Weak<RefCell<TreeNode<G>>>;

/// A node of the search tree, owning its children.
///
/// This is a plain data holder, the engine updates its statistics directly.
pub struct TreeNode<G: GameAdapter> {
    pub(crate) parent: Option<WeakNode<G>>,
    pub(crate) parent_action: Option<G::Action>,
    pub(crate) children: BTreeMap<G::Action, Node<G>>,
    pub(crate) untried_actions: Vec<G::Action>,
    pub(crate) visits: u32,
    pub(crate) wins: f32,
}

impl<G: GameAdapter> fmt::Debug for TreeNode<G> {
    fn fmt(&self, f: &'_ mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("parent_action", &self.parent_action)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("untried_actions", &self.untried_actions)
            .field("visits", &self.visits)
            .field("wins", &self.wins)
            .finish()
    }
}

impl<G: GameAdapter> TreeNode<G> {
    /// Creates a new node without statistics, whose untried actions are the given legal actions.
    ///
    /// The node only keeps a weak reference to its parent, registering it as a child is up to the caller.
    pub fn create(
        parent: Option<&Node<G>>,
        parent_action: Option<G::Action>,
        legal_actions: Vec<G::Action>,
    ) -> Node<G> {
        Rc::new(RefCell::new(TreeNode {
            parent: parent.map(Rc::downgrade),
            parent_action,
            children: BTreeMap::new(),
            untried_actions: legal_actions,
            visits: 0,
            wins: 0.,
        }))
    }

    /// Returns the parent node, None for the root.
    pub fn parent(&self) -> Option<Node<G>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Returns the action that led from the parent to this node, None for the root.
    pub fn parent_action(&self) -> Option<&G::Action> {
        self.parent_action.as_ref()
    }

    /// Returns the expanded children, ordered by action.
    pub fn children(&self) -> &BTreeMap<G::Action, Node<G>> {
        &self.children
    }

    /// Returns the child reached through a given action, None if not expanded.
    pub fn child(&self, action: &G::Action) -> Option<Node<G>> {
        self.children.get(action).cloned()
    }

    /// Returns the legal actions not yet expanded into children.
    pub fn untried_actions(&self) -> &[G::Action] {
        &self.untried_actions
    }

    /// Returns the number of simulations that passed through this node.
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Returns the accumulated win credit, at most the number of visits.
    pub fn wins(&self) -> f32 {
        self.wins
    }

    /// Returns wins over visits, 0 if never visited.
    pub fn win_rate(&self) -> f32 {
        if self.visits == 0 {
            0.
        } else {
            self.wins / self.visits as f32
        }
    }

    /// Returns the sum of the visits of all children.
    pub fn child_visits(&self) -> u32 {
        self.children
            .values()
            .map(|child| child.borrow().visits)
            .sum()
    }

    /// Returns whether all legal actions were expanded into children.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty() && !self.children.is_empty()
    }

    /// Returns whether nothing can be expanded nor selected below this node.
    pub fn is_dead_end(&self) -> bool {
        self.untried_actions.is_empty() && self.children.is_empty()
    }

    /// Returns the number of nodes in the subtree rooted here, including this node.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .values()
            .map(|child| child.borrow().subtree_size())
            .sum::<usize>()
    }

    /// Returns the memory footprint of this node, excluding its children.
    pub fn size(&self) -> usize {
        let mut size = 0;

        size += mem::size_of::<Self>();
        size += self.untried_actions.len() * mem::size_of::<G::Action>();
        size += self.children.len() * mem::size_of::<(G::Action, Node<G>)>();

        size
    }
}
