/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use ordered_float::NotNan;

use crate::{GameAdapter, MCTSConfiguration, Node, TreeNode, UnvisitedScore};

// SAFETY: 0 is not NaN
pub(crate) const SCORE_ZERO: NotNan<f32> = unsafe { NotNan::new_unchecked(0.) };

/// From whose point of view the win statistics of a child are read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Perspective {
    /// The child's wins belong to the player choosing at the parent.
    Mover,
    /// The child's wins belong to the opponent of the player choosing at the parent.
    Opponent,
}

/// The UCB1 policy used to choose among the children of a fully-expanded node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelectionPolicy {
    /// The exploration constant `C`.
    pub exploration: f32,
    /// The score of children without visits.
    pub unvisited_score: UnvisitedScore,
}

impl SelectionPolicy {
    pub fn new(config: &MCTSConfiguration) -> Self {
        Self {
            exploration: config.exploration,
            unvisited_score: config.unvisited_score,
        }
    }

    /// Computes `exploitation + C * sqrt(2 ln(parent_visits / child_visits))`.
    ///
    /// A child without visits never reaches the logarithm, it gets the configured [UnvisitedScore].
    pub fn ucb1(
        &self,
        parent_visits: u32,
        child_wins: f32,
        child_visits: u32,
        perspective: Perspective,
    ) -> f32 {
        if child_visits == 0 {
            return match self.unvisited_score {
                UnvisitedScore::Zero => 0.,
                UnvisitedScore::Infinite => f32::INFINITY,
            };
        }
        let win_rate = child_wins / child_visits as f32;
        let exploitation = match perspective {
            Perspective::Mover => win_rate,
            Perspective::Opponent => 1. - win_rate,
        };
        // A parent is visited at least as often as its children, clamp anyway to keep the root real
        let ratio = parent_visits as f32 / child_visits as f32;
        let exploration = self.exploration * (2. * ratio.ln()).max(0.).sqrt();
        exploitation + exploration
    }

    /// Scores a child of a given parent.
    pub fn score<G: GameAdapter>(
        &self,
        parent: &TreeNode<G>,
        child: &TreeNode<G>,
        perspective: Perspective,
    ) -> f32 {
        self.ucb1(parent.visits, child.wins, child.visits, perspective)
    }

    /// Returns the child with the highest score and its action, None if the node has no children.
    ///
    /// Ties go to the smallest action.
    pub fn select_child<G: GameAdapter>(
        &self,
        node: &TreeNode<G>,
        perspective: Perspective,
    ) -> Option<(G::Action, Node<G>)> {
        // max_by_key keeps the last maximum, so iterate from the largest action
        node.children
            .iter()
            .rev()
            .max_by_key(|(_, child)| {
                let score = self.score(node, &*child.borrow(), perspective);
                NotNan::new(score).unwrap_or(SCORE_ZERO)
            })
            .map(|(action, child)| (action.clone(), child.clone()))
    }
}
