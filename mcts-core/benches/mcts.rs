/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mcts_core::{decide, MCTSConfiguration, UnvisitedScore, MCTS};
use mcts_utils::TicTacToe;

fn mcts_benchmark(c: &mut Criterion) {
    const CONFIG: MCTSConfiguration = MCTSConfiguration {
        seed: Some(0),
        ..MCTSConfiguration::REFERENCE
    };

    c.bench_function("mcts_run", |b| {
        b.iter(|| {
            let mut mcts = MCTS::new(&TicTacToe, black_box(0), CONFIG);
            black_box(mcts.run().unwrap());
        });
    });

    c.bench_function("mcts_decide_unvisited_first", |b| {
        let config = MCTSConfiguration {
            unvisited_score: UnvisitedScore::Infinite,
            ..CONFIG
        };
        b.iter(|| black_box(decide(&TicTacToe, black_box(0), config.clone())));
    });
}

criterion_group!(benches, mcts_benchmark);
criterion_main!(benches);
