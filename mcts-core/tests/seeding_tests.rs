/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use mcts_core::{MCTSConfiguration, MCTS};
use mcts_utils::TicTacToe;
use rand::{thread_rng, RngCore};

fn tree_shape(mcts: &MCTS<TicTacToe>) -> Vec<(u32, f32)> {
    let root = mcts.root_node();
    let root = root.borrow();
    root.children()
        .values()
        .map(|child| {
            let child = child.borrow();
            (child.visits(), child.wins())
        })
        .collect()
}

#[test]
fn seed() {
    let _ = env_logger::builder().is_test(true).try_init();
    for _ in 0..5 {
        let seed = thread_rng().next_u64();
        let config = MCTSConfiguration {
            iterations: 500,
            seed: Some(seed),
            ..MCTSConfiguration::REFERENCE
        };
        let mut mcts = MCTS::new(&TicTacToe, 0, config.clone());
        let result = mcts.run();
        let shape = tree_shape(&mcts);
        assert_eq!(mcts.seed(), seed);

        for _ in 0..10 {
            let mut mcts = MCTS::new(&TicTacToe, 0, config.clone());

            assert!(result == mcts.run());
            assert_eq!(shape, tree_shape(&mcts));
            assert_eq!(mcts.seed(), seed);
        }
    }
}

#[test]
fn unseeded_search_draws_a_seed() {
    let config = MCTSConfiguration {
        iterations: 10,
        ..MCTSConfiguration::REFERENCE
    };
    let mut mcts = MCTS::new(&TicTacToe, 0, config.clone());
    let result = mcts.run();
    // Replaying with the drawn seed reproduces the search
    let mut replay = MCTS::new(&TicTacToe, 0, config.with_seed(mcts.seed()));
    assert_eq!(result, replay.run());
    assert_eq!(tree_shape(&mcts), tree_shape(&replay));
}
