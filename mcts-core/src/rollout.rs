/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::{winner_of, GameAdapter};

/// The outcome of a simulation until the end of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rollout<P> {
    /// The winning player, None on a draw.
    pub winner: Option<P>,
    /// The number of actions played.
    pub length: usize,
}

/// A simulation policy estimating the value of a freshly expanded state.
pub trait RolloutPolicy<G: GameAdapter> {
    /// Plays from `state` until the game ends.
    fn rollout(&mut self, rng: &mut ChaCha8Rng, game: &G, state: G::State) -> Rollout<G::Player>;
}

/// MCTS default policy, playing uniformly random legal actions.
#[derive(Copy, Clone, Debug, Default)]
pub struct RandomRollout;

impl<G: GameAdapter> RolloutPolicy<G> for RandomRollout {
    fn rollout(&mut self, rng: &mut ChaCha8Rng, game: &G, state: G::State) -> Rollout<G::Player> {
        let mut state = state;
        let mut length = 0;
        while !game.is_ended(&state) {
            let actions = game.legal_actions(&state);
            let action = match actions.choose(rng) {
                Some(action) => action,
                None => {
                    log::debug!("No legal action in non-terminal state {state:?}, scoring a draw");
                    return Rollout {
                        winner: None,
                        length,
                    };
                }
            };
            log::trace!("\tRollout step {length}: {action:?}");
            state = game.next_state(&state, action);
            length += 1;
        }
        let winner = winner_of(game, &state);
        log::trace!("\tRollout ended after {length} steps, winner: {winner:?}");
        Rollout { winner, length }
    }
}

/// The outcome of a rollout, seen from the player who moved into the expanded node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackpropSignal {
    /// The player who moved into the expanded node won.
    Won,
    /// The player about to move in the expanded node won.
    Lost,
    /// Nobody won.
    Draw,
}

impl BackpropSignal {
    /// Translates a rollout winner given the player about to move in the expanded state.
    pub fn from_winner<P: PartialEq>(winner: Option<P>, mover: P) -> Self {
        match winner {
            None => BackpropSignal::Draw,
            Some(winner) if winner == mover => BackpropSignal::Lost,
            Some(_) => BackpropSignal::Won,
        }
    }

    /// Returns whether a node on the backpropagation path receives win credit.
    ///
    /// `even` is true for the expanded node and every second ancestor.
    pub fn credits(self, even: bool) -> bool {
        matches!(
            (self, even),
            (BackpropSignal::Won, true) | (BackpropSignal::Lost, false)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_from_winner() {
        assert_eq!(BackpropSignal::from_winner(None, 1), BackpropSignal::Draw);
        assert_eq!(BackpropSignal::from_winner(Some(1), 1), BackpropSignal::Lost);
        assert_eq!(BackpropSignal::from_winner(Some(2), 1), BackpropSignal::Won);
    }

    #[test]
    fn signal_credits_alternate() {
        assert!(BackpropSignal::Won.credits(true));
        assert!(!BackpropSignal::Won.credits(false));
        assert!(!BackpropSignal::Lost.credits(true));
        assert!(BackpropSignal::Lost.credits(false));
        assert!(!BackpropSignal::Draw.credits(true));
        assert!(!BackpropSignal::Draw.credits(false));
    }
}
