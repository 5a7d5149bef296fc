/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

//! This is the utility module of the MCTS engine, containing helpful utility code.
//!
//! It contains the following features:
//! - A 3x3 [TicTacToe] implementation of [GameAdapter], with a perfect-play [solve] function.
//! - A helper function to plot search trees: [plot_tree_in_tmp].
//! - Grid shortest paths with Dijkstra's algorithm: [dijkstras_shortest_path] and [dijkstras_shortest_path_to_all].
//! - A best-first crafting planner over inventories: [search].

#[cfg(doc)]
use mcts_core::GameAdapter;

mod crafting;
mod dijkstra;
mod graphs;
mod tic_tac_toe;

pub use crafting::*;
pub use dijkstra::*;
pub use graphs::*;
pub use tic_tac_toe::*;
