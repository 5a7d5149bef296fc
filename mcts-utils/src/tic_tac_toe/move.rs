/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::fmt;

use super::CellCoord;

/// Placing the current player's mark on a cell.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Move {
    pub x: CellCoord,
    pub y: CellCoord,
}
impl Move {
    /// Returns the move at the given coordinates, None if out of the board.
    pub fn new(x: u32, y: u32) -> Option<Self> {
        Some(Move {
            x: CellCoord::new(x)?,
            y: CellCoord::new(y)?,
        })
    }
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}
impl fmt::Debug for Move {
    fn fmt(&self, f: &'_ mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Move")
            .field("x", &self.x.get())
            .field("y", &self.y.get())
            .finish()
    }
}
