/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// The payoff a player receives in a terminal state.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Payoff {
    Loss = -1,
    Draw = 0,
    Win = 1,
}
impl Payoff {
    /// Returns the payoff as -1, 0 or 1.
    pub fn value(self) -> i8 {
        self as i8
    }

    /// Returns the payoff of the opponent in a two-player zero-sum game.
    pub fn reversed(self) -> Self {
        match self {
            Payoff::Loss => Payoff::Win,
            Payoff::Draw => Payoff::Draw,
            Payoff::Win => Payoff::Loss,
        }
    }
}
impl fmt::Display for Payoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A game on which the MCTS planner can plan.
///
/// The engine only consumes these five operations, the game itself is owned by the host.
/// States are values: [next_state](Self::next_state) must not alter its input.
pub trait GameAdapter {
    /// The state of the game, including whose turn it is.
    type State: Clone + fmt::Debug;
    /// A move in the game. Its ordering is used to break ties deterministically.
    type Action: Clone + Ord + Hash + fmt::Debug;
    /// The identifier of a player.
    type Player: Copy + Ord + Hash + fmt::Debug;

    /// Returns the legal actions in a state, non-empty unless the state is terminal.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Returns the state resulting from applying an action to a state.
    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Returns whether the game has ended in this state.
    fn is_ended(&self, state: &Self::State) -> bool;

    /// Returns the player who is about to move in this state.
    fn current_player(&self, state: &Self::State) -> Self::Player;

    /// Returns the payoff of each player, only meaningful if the state [is ended](Self::is_ended).
    fn points_values(&self, state: &Self::State) -> BTreeMap<Self::Player, Payoff>;

    /// Gets a textual description of the given state.
    /// This will be used by the graph tool to show in each node.
    fn describe(&self, _state: &Self::State) -> String {
        String::new()
    }
}

/// Returns the player with a winning payoff in a terminal state, None on a draw.
pub fn winner_of<G: GameAdapter>(game: &G, state: &G::State) -> Option<G::Player> {
    game.points_values(state)
        .into_iter()
        .find(|(_, payoff)| *payoff == Payoff::Win)
        .map(|(player, _)| player)
}
