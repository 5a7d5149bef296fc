/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

//! This is the core of the MCTS engine, containing the [MCTS] algorithm implementation and related abstractions.
//!
//! A host game plugs into the engine by implementing [GameAdapter].
//! The engine then repeats selection, expansion, rollout and backpropagation
//! over a private search tree, and returns the best action at the root.
//! The simplest entry point is [decide].
//!
//! Support code such as a tic-tac-toe game and plotting helpers is available in the `mcts-utils` crate.

mod config;
mod game;
mod mcts;
mod node;
mod rollout;
mod selection;

pub use config::*;
pub use game::*;
pub use mcts::*;
pub use node::*;
pub use rollout::*;
pub use selection::*;
