/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use bounded_integer::BoundedU32;
use cached::proc_macro::cached;

use super::Player;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Cell {
    Empty,
    Player(Player),
}
impl Cell {
    fn char(&self) -> char {
        match *self {
            Cell::Empty => '_',
            Cell::Player(Player::O) => 'O',
            Cell::Player(Player::X) => 'X',
        }
    }
}

pub type CellCoord = BoundedU32<0, 2>;

// SAFETY: 0, 1, 2 are in range 0..=2
const C0: CellCoord = unsafe { CellCoord::new_unchecked(0) };
const C1: CellCoord = unsafe { CellCoord::new_unchecked(1) };
const C2: CellCoord = unsafe { CellCoord::new_unchecked(2) };
pub const C_RANGE: [CellCoord; 3] = [C0, C1, C2];
pub type CoordPair = (CellCoord, CellCoord);

/// A board packed in 18 bits, two per cell, row after row.
pub type State = u32;

/// Cell-level access to a packed board.
pub trait CellArray2D {
    fn get(&self, x: CellCoord, y: CellCoord) -> Cell;
    fn set(&mut self, x: CellCoord, y: CellCoord, cell: Cell);
    fn description(&self) -> String;
}

impl CellArray2D for State {
    fn get(&self, x: CellCoord, y: CellCoord) -> Cell {
        let shift = y.get() * 6 + x.get() * 2;
        match (*self >> shift) & 0x3 {
            1 => Cell::Player(Player::O),
            2 => Cell::Player(Player::X),
            // 3 is never written by set
            _ => Cell::Empty,
        }
    }

    fn set(&mut self, x: CellCoord, y: CellCoord, cell: Cell) {
        let pattern = match cell {
            Cell::Empty => 0,
            Cell::Player(Player::O) => 1,
            Cell::Player(Player::X) => 2,
        };
        let shift = y.get() * 6 + x.get() * 2;
        *self &= !(0b11 << shift);
        *self |= pattern << shift;
    }

    fn description(&self) -> String {
        C_RANGE
            .iter()
            .map(|&y| {
                C_RANGE
                    .iter()
                    .map(|&x| self.get(x, y).char().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Game-level queries on a packed board.
pub trait Board {
    fn is_line_all_of(&self, player: Player, line: &[CoordPair]) -> bool;
    fn count(&self, player: Player) -> usize;
    fn is_full(&self) -> bool;
    fn winner(&self) -> Option<Player>;
}

impl Board for State {
    fn is_line_all_of(&self, player: Player, line: &[CoordPair]) -> bool {
        line.iter()
            .all(|&(x, y)| CellArray2D::get(self, x, y) == Cell::Player(player))
    }

    fn count(&self, player: Player) -> usize {
        C_RANGE
            .iter()
            .flat_map(|&x| C_RANGE.iter().map(move |&y| (x, y)))
            .filter(|&(x, y)| self.get(x, y) == Cell::Player(player))
            .count()
    }

    fn is_full(&self) -> bool {
        self.count(Player::O) + self.count(Player::X) == 9
    }

    fn winner(&self) -> Option<Player> {
        cached_winner(*self)
    }
}

#[cached(size = 19683)] // there are 3^9 possible boards
fn cached_winner(state: State) -> Option<Player> {
    const LINES: [[CoordPair; 3]; 8] = [
        // diagonals
        [(C0, C0), (C1, C1), (C2, C2)],
        [(C0, C2), (C1, C1), (C2, C0)],
        // horizontals
        [(C0, C0), (C1, C0), (C2, C0)],
        [(C0, C1), (C1, C1), (C2, C1)],
        [(C0, C2), (C1, C2), (C2, C2)],
        // verticals
        [(C0, C0), (C0, C1), (C0, C2)],
        [(C1, C0), (C1, C1), (C1, C2)],
        [(C2, C0), (C2, C1), (C2, C2)],
    ];
    LINES.iter().find_map(|line| {
        [Player::O, Player::X]
            .into_iter()
            .find(|&player| state.is_line_all_of(player, line))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing() {
        let mut state: State = 0;
        state.set(C0, C0, Cell::Player(Player::O));
        assert_eq!(state, 0b01);
        state.set(C2, C0, Cell::Player(Player::X));
        assert_eq!(state, 0b100001);
        state.set(C1, C2, Cell::Player(Player::O));
        assert_eq!(state, 0b000100_000000_100001);
        state.set(C0, C0, Cell::Empty);
        assert_eq!(state, 0b000100_000000_100000);
        assert_eq!(state.get(C1, C2), Cell::Player(Player::O));
        assert_eq!(state.get(C1, C1), Cell::Empty);
        assert_eq!(state.count(Player::O), 1);
        assert_eq!(state.count(Player::X), 1);
    }

    #[test]
    fn description() {
        let mut state: State = 0;
        state.set(C0, C0, Cell::Player(Player::X));
        state.set(C2, C1, Cell::Player(Player::O));
        assert_eq!(state.description(), "X _ _\n_ _ O\n_ _ _");
    }

    #[test]
    fn winner() {
        let winner = |state: State| state.winner();
        assert_eq!(winner(0), None);
        assert_eq!(winner(0b000000_000000_010101), Some(Player::O));
        assert_eq!(winner(0b100000_100000_100000), Some(Player::X));
        assert_eq!(winner(0b100001_001000_010010), Some(Player::X));
        assert_eq!(winner(0b100010_000100_010010), None);
    }

    #[test]
    fn full_board() {
        // O X O / O X X / X O O
        let state: State = 0b010110_101001_011001;
        assert!(state.is_full());
        assert_eq!(state.winner(), None);
        assert!(!(0b010110_101001_001001 as State).is_full());
    }
}
