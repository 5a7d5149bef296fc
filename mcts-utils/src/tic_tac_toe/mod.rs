/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::collections::BTreeMap;

use cached::proc_macro::cached;
use mcts_core::{GameAdapter, Payoff};

mod board;
mod r#move;
mod player;

pub use board::*;
pub use player::*;
pub use r#move::*;

/// The game of tic-tac-toe on a 3x3 board.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl GameAdapter for TicTacToe {
    type State = State;
    type Action = Move;
    type Player = Player;

    fn legal_actions(&self, state: &State) -> Vec<Move> {
        // if the game is already won, no move is legal
        if state.winner().is_some() {
            return Vec::new();
        }
        C_RANGE
            .iter()
            .flat_map(|&x| C_RANGE.iter().map(move |&y| Move { x, y }))
            .filter(|m| state.get(m.x, m.y) == Cell::Empty)
            .collect()
    }

    fn next_state(&self, state: &State, action: &Move) -> State {
        let mut next = *state;
        next.set(action.x, action.y, Cell::Player(self.current_player(state)));
        next
    }

    fn is_ended(&self, state: &State) -> bool {
        state.winner().is_some() || state.is_full()
    }

    fn current_player(&self, state: &State) -> Player {
        if state.count(Player::O) > state.count(Player::X) {
            Player::X
        } else {
            Player::O
        }
    }

    fn points_values(&self, state: &State) -> BTreeMap<Player, Payoff> {
        let points = match state.winner() {
            Some(winner) => [(winner, Payoff::Win), (winner.other(), Payoff::Loss)],
            None => [(Player::O, Payoff::Draw), (Player::X, Payoff::Draw)],
        };
        points.into_iter().collect()
    }

    fn describe(&self, state: &State) -> String {
        state.description()
    }
}

/// Returns the payoff of the player to move when both players play perfectly.
#[cached(size = 19683)]
pub fn solve(state: State) -> Payoff {
    let game = TicTacToe;
    if game.is_ended(&state) {
        let player = game.current_player(&state);
        return game
            .points_values(&state)
            .get(&player)
            .copied()
            .unwrap_or(Payoff::Draw);
    }
    game.legal_actions(&state)
        .iter()
        .map(|action| solve(game.next_state(&state, action)).reversed())
        .max()
        .unwrap_or(Payoff::Draw)
}

/// Returns whether playing `action` lets a perfect opponent force a win.
pub fn is_losing_move(state: State, action: &Move) -> bool {
    solve(TicTacToe.next_state(&state, action)) == Payoff::Win
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[(u32, u32)]) -> State {
        moves.iter().fold(0, |state, &(x, y)| {
            TicTacToe.next_state(&state, &Move::new(x, y).unwrap())
        })
    }

    #[test]
    fn players_alternate() {
        assert_eq!(TicTacToe.current_player(&0), Player::O);
        let state = play(&[(1, 1)]);
        assert_eq!(TicTacToe.current_player(&state), Player::X);
        assert_eq!(state.get(C_RANGE[1], C_RANGE[1]), Cell::Player(Player::O));
        let state = play(&[(1, 1), (0, 0)]);
        assert_eq!(state.get(C_RANGE[0], C_RANGE[0]), Cell::Player(Player::X));
        assert_eq!(TicTacToe.legal_actions(&state).len(), 7);
    }

    #[test]
    fn win_ends_the_game() {
        // O takes the first column
        let state = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert!(TicTacToe.is_ended(&state));
        assert!(TicTacToe.legal_actions(&state).is_empty());
        let points = TicTacToe.points_values(&state);
        assert_eq!(points[&Player::O], Payoff::Win);
        assert_eq!(points[&Player::X], Payoff::Loss);
    }

    #[test]
    fn perfect_play_is_a_draw() {
        assert_eq!(solve(0), Payoff::Draw);
        // every opening is safe
        for action in TicTacToe.legal_actions(&0) {
            assert!(!is_losing_move(0, &action));
        }
    }

    #[test]
    fn not_blocking_loses() {
        // O threatens the first row, X must play 2 0
        let state = play(&[(0, 0), (1, 1), (1, 0)]);
        assert!(!is_losing_move(state, &Move::new(2, 0).unwrap()));
        assert!(is_losing_move(state, &Move::new(2, 2).unwrap()));
    }
}
