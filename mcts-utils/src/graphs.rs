use std::fs;

use mcts_core::{graphviz, GameAdapter, MCTS};

/// Writes the search tree as `{tmp}/{base_dir_name}/{file_name}.dot`.
pub fn plot_tree_in_tmp<G: GameAdapter>(
    mcts: &MCTS<G>,
    base_dir_name: &str,
    file_name: &str,
) -> std::io::Result<()> {
    let temp_dir = std::env::temp_dir().display().to_string();
    let path = format!("{temp_dir}/{base_dir_name}/");
    fs::create_dir_all(&path)?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(format!("{path}{file_name}.dot"))?;
    graphviz::plot_mcts_tree(mcts, &mut file)
}
