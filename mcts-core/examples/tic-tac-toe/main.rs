/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use mcts_core::{graphviz, GameAdapter, MCTSConfiguration, MCTS};
use mcts_utils::{plot_tree_in_tmp, Board, CellArray2D, Move, Player, State, TicTacToe};
use regex::Regex;

enum Input {
    Coordinate(Move),
    Quit,
    Error,
}

fn get_input(input_re: &Regex) -> Input {
    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return Input::Quit;
    }
    match input.trim() {
        "q" | "" => Input::Quit,
        s => {
            let coordinate = input_re
                .captures(s)
                .and_then(|cap| Move::new(cap[1].parse().ok()?, cap[2].parse().ok()?));
            match coordinate {
                Some(coordinate) => Input::Coordinate(coordinate),
                None => {
                    println!("Input error, try again!");
                    Input::Error
                }
            }
        }
    }
}

fn run_mcts_and_return_move(
    board: State,
    config: MCTSConfiguration,
    turn_to_plot: Option<u32>,
) -> Option<Move> {
    let mut mcts = MCTS::new(&TicTacToe, board, config);
    let ai_move = mcts.run();
    log::info!(
        "Search took {:?} for {} iterations, {} nodes",
        mcts.time(),
        mcts.iterations(),
        mcts.node_count()
    );
    if let Some(turn) = turn_to_plot {
        if let Err(e) = plot_tree_in_tmp(&mcts, "tic-tac-toe_graphs", &format!("turn{turn:02}")) {
            println!("Cannot write search tree: {e}");
        }
    }
    ai_move
}

fn game_finished(state: State) -> bool {
    if let Some(winner) = state.winner() {
        match winner {
            Player::O => println!("You won!"),
            Player::X => println!("Computer won!"),
        };
        true
    } else if state.is_full() {
        println!("Draw!");
        true
    } else {
        false
    }
}

fn main() {
    // Set the depth of graph output to 4 and enable logging if specified
    // in the RUST_LOG environment variable.
    graphviz::set_graph_output_depth(4);
    env_logger::init();

    let input_re = Regex::new(r"^([0-2])\s+([0-2])$").expect("valid regex");

    println!("Welcome to tic-tac-toe. You are player 'O', I'm player 'X'.");

    let mut board: State = 0;
    let mut turn = 0;
    loop {
        println!("{}", board.description());

        println!("Please enter a coordinate with 'X Y' where X,Y are 0,1,2, or 'q' to quit.");
        let human_move = match get_input(&input_re) {
            Input::Coordinate(human_move) => human_move,
            Input::Quit => break,
            Input::Error => continue,
        };
        if !TicTacToe.legal_actions(&board).contains(&human_move) {
            println!("The cell {human_move} is already occupied!");
            continue;
        }
        board = TicTacToe.next_state(&board, &human_move);

        if game_finished(board) {
            println!("{}", board.description());
            break;
        }

        println!("Computer is thinking...");
        let ai_move = run_mcts_and_return_move(board, MCTSConfiguration::REFERENCE, Some(turn));
        let ai_move = match ai_move {
            Some(ai_move) => ai_move,
            None => break,
        };
        println!("Computer played {ai_move}");
        board = TicTacToe.next_state(&board, &ai_move);
        turn += 1;

        if game_finished(board) {
            println!("{}", board.description());
            break;
        }
    }
}
