/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::collections::BTreeSet;
use std::mem;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ordered_float::NotNan;
use rand::{
    prelude::{thread_rng, RngCore, SeedableRng},
    Rng,
};
use rand_chacha::ChaCha8Rng;

use crate::*;

/// The state of a running planner instance.
///
/// The tree is private to the instance and dropped with it,
/// so nothing is shared between two decisions.
pub struct MCTS<'g, G: GameAdapter> {
    // Statistics
    time: Duration,
    iterations: u32,
    completed_iterations: u32,
    node_count: usize,

    // Config
    config: MCTSConfiguration,
    selection: SelectionPolicy,
    rollout_policy: Box<dyn RolloutPolicy<G> + 'g>,
    early_stop_condition: Option<Box<EarlyStopCondition>>,

    // Run-specific parameters
    game: &'g G,
    identity: G::Player,
    seed: u64,

    // Nodes
    root: Node<G>,

    // State before planning
    initial_state: G::State,

    // Rng
    rng: ChaCha8Rng,
}

impl<'g, G: GameAdapter> MCTS<'g, G> {
    /// Instantiates a new search tree for the given state, using random rollouts.
    pub fn new(game: &'g G, initial_state: G::State, config: MCTSConfiguration) -> Self {
        Self::new_with_policy(game, initial_state, config, Box::new(RandomRollout), None)
    }

    /// Instantiates a new search tree for the given state, with a custom rollout policy and early stop condition.
    pub fn new_with_policy(
        game: &'g G,
        initial_state: G::State,
        config: MCTSConfiguration,
        rollout_policy: Box<dyn RolloutPolicy<G> + 'g>,
        early_stop_condition: Option<Box<EarlyStopCondition>>,
    ) -> Self {
        // The player to move at the root is the one we decide for
        let identity = game.current_player(&initial_state);

        // Create new root node
        let root = TreeNode::create(None, None, Self::expandable_actions(game, &initial_state));

        // Compute seed
        let cur_seed = config.seed.unwrap_or_else(|| thread_rng().next_u64());

        MCTS {
            time: Duration::default(),
            iterations: 0,
            completed_iterations: 0,
            node_count: 1,
            selection: SelectionPolicy::new(&config),
            config,
            rollout_policy,
            early_stop_condition,
            game,
            identity,
            seed: cur_seed,
            root,
            initial_state,
            rng: ChaCha8Rng::seed_from_u64(cur_seed),
        }
    }

    /// Terminal states get no untried actions, whatever the game reports.
    fn expandable_actions(game: &G, state: &G::State) -> Vec<G::Action> {
        if game.is_ended(state) {
            Vec::new()
        } else {
            game.legal_actions(state)
        }
    }

    /// Executes the MCTS search.
    ///
    /// Returns the best action at the root, if the root state has at least one legal action.
    pub fn run(&mut self) -> Option<G::Action> {
        let start = Instant::now();
        for i in 0..self.config.iterations {
            if let Some(budget) = self.config.time_budget {
                if start.elapsed() >= budget {
                    log::info!(
                        "{:?} exhausted its time budget of {budget:?} after {i} iterations",
                        self.identity
                    );
                    break;
                }
            }

            if self.iterate() {
                self.completed_iterations += 1;
            }
            self.iterations += 1;

            // Early stopping if told so by some user-defined condition
            if let Some(early_stop_condition) = &self.early_stop_condition {
                if early_stop_condition() {
                    log::info!(
                        "{:?} early stops planning after {} iterations",
                        self.identity,
                        i + 1
                    );
                    break;
                }
            }
        }
        self.time = start.elapsed();
        log::debug!(
            "{:?} ran {} iterations ({} completed) in {:?}, tree has {} nodes",
            self.identity,
            self.iterations,
            self.completed_iterations,
            self.time,
            self.node_count
        );

        self.best_action_at_root()
    }

    /// Executes one selection, expansion, rollout and backpropagation cycle.
    ///
    /// Returns false if nothing could be expanded, in which case no statistics change.
    fn iterate(&mut self) -> bool {
        // -------------------------
        // Selection
        // -------------------------
        let (selected, selected_state) = self.traverse_nodes();

        // -------------------------
        // Expansion
        // -------------------------
        let (leaf, leaf_state) = match self.expand_leaf(&selected, &selected_state) {
            Some(expanded) => expanded,
            None if self.config.score_terminal_leaves
                && self.game.is_ended(&selected_state)
                && !Rc::ptr_eq(&selected, &self.root) =>
            {
                // The payoff of a terminal leaf is known, score it without simulating
                let mover = self.game.current_player(&selected_state);
                let signal =
                    BackpropSignal::from_winner(winner_of(self.game, &selected_state), mover);
                log::trace!("Scoring terminal leaf, {:?} to move: {:?}", mover, signal);
                backpropagate(&selected, signal);
                return true;
            }
            None => {
                log::trace!(
                    "Nothing to expand below {:?}, void iteration",
                    selected.borrow().parent_action
                );
                return false;
            }
        };

        // -------------------------
        // Rollout
        // -------------------------
        let mover = self.game.current_player(&leaf_state);
        let rollout = self
            .rollout_policy
            .rollout(&mut self.rng, self.game, leaf_state);
        let signal = BackpropSignal::from_winner(rollout.winner, mover);
        log::debug!(
            "Rollout of {} steps won by {:?}, {:?} to move: {:?}",
            rollout.length,
            rollout.winner,
            mover,
            signal
        );

        // -------------------------
        // Backpropagation
        // -------------------------
        backpropagate(&leaf, signal);
        true
    }

    /// MCTS selection phase.
    ///
    /// Descends from the root through the best-scoring children, replaying their actions on the
    /// initial state, until reaching a node with untried actions, a terminal state, or a node without children.
    fn traverse_nodes(&self) -> (Node<G>, G::State) {
        let mut node = self.root.clone();
        let mut state = self.initial_state.clone();
        loop {
            let selected = {
                let current = node.borrow();
                if !current.untried_actions.is_empty() || self.game.is_ended(&state) {
                    break;
                }
                // Wins are stored for the player moving into a child, who chooses here
                self.selection.select_child(&*current, Perspective::Mover)
            };
            match selected {
                Some((action, child)) => {
                    log::trace!("\tSelect action: {action:?}");
                    state = self.game.next_state(&state, &action);
                    node = child;
                }
                None => {
                    log::debug!("Node has no children, selecting it");
                    break;
                }
            }
        }
        (node, state)
    }

    /// MCTS expansion phase.
    ///
    /// Moves a random untried action of `node` into a new child, returning it with its state.
    /// Returns None if `node` has no untried action.
    fn expand_leaf(&mut self, node: &Node<G>, state: &G::State) -> Option<(Node<G>, G::State)> {
        let action = {
            let mut leaf = node.borrow_mut();
            if leaf.untried_actions.is_empty() {
                return None;
            }
            let index = self.rng.gen_range(0..leaf.untried_actions.len());
            leaf.untried_actions.swap_remove(index)
        };
        log::debug!("Expand action: {action:?}");

        let new_state = self.game.next_state(state, &action);
        let child = TreeNode::create(
            Some(node),
            Some(action.clone()),
            Self::expandable_actions(self.game, &new_state),
        );
        node.borrow_mut().children.insert(action, child.clone());
        self.node_count += 1;

        Some((child, new_state))
    }

    /// Returns a legal action at the root that ends the game with a win for the deciding player, if any.
    ///
    /// Both expanded and untried actions are considered, the smallest winning one is returned.
    pub fn winning_action_at_root(&self) -> Option<G::Action> {
        let actions = {
            let root = self.root.borrow();
            root.children
                .keys()
                .chain(root.untried_actions.iter())
                .cloned()
                .collect::<BTreeSet<_>>()
        };
        actions.into_iter().find(|action| {
            let state = self.game.next_state(&self.initial_state, action);
            self.game.is_ended(&state)
                && self.game.points_values(&state).get(&self.identity) == Some(&Payoff::Win)
        })
    }

    /// Returns the best action at the root.
    ///
    /// This is an immediately winning action if there is one, otherwise the child with the highest win rate,
    /// the smallest action winning ties. If no child was visited, the first legal action is returned.
    pub fn best_action_at_root(&self) -> Option<G::Action> {
        if self.game.is_ended(&self.initial_state) {
            log::info!("{:?} has no action in a terminal state", self.identity);
            return None;
        }

        if let Some(action) = self.winning_action_at_root() {
            log::info!("{:?} plays immediately winning {action:?}", self.identity);
            return Some(action);
        }

        let root = self.root.borrow();
        if root
            .children
            .values()
            .all(|child| child.borrow().visits == 0)
        {
            log::info!(
                "{:?} has no visited child at root, falling back to the first legal action",
                self.identity
            );
            return self
                .game
                .legal_actions(&self.initial_state)
                .into_iter()
                .next();
        }

        // max_by_key keeps the last maximum, so iterate from the largest action
        root.children
            .iter()
            .rev()
            .max_by_key(|(_, child)| NotNan::new(child.borrow().win_rate()).unwrap_or(SCORE_ZERO))
            .map(|(action, _)| action.clone())
    }

    /// Reconstructs the state of a node by replaying the actions from the root.
    pub fn state_of(&self, node: &Node<G>) -> G::State {
        let mut actions = Vec::new();
        let mut current = node.clone();
        loop {
            let parent = {
                let inner = current.borrow();
                if let Some(action) = &inner.parent_action {
                    actions.push(action.clone());
                }
                inner.parent()
            };
            match parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        actions
            .iter()
            .rev()
            .fold(self.initial_state.clone(), |state, action| {
                self.game.next_state(&state, action)
            })
    }

    /// Returns the initial state at the root of the planning tree.
    pub fn initial_state(&self) -> &G::State {
        &self.initial_state
    }

    /// Returns the player the tree searches for.
    pub fn identity(&self) -> G::Player {
        self.identity
    }

    /// Returns the game the tree searches in.
    pub fn game(&self) -> &G {
        self.game
    }

    /// Returns the configuration of the search.
    pub fn config(&self) -> &MCTSConfiguration {
        &self.config
    }

    /// Returns the root node of the search tree.
    pub fn root_node(&self) -> Node<G> {
        self.root.clone()
    }

    /// Returns the seed of the tree.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the number of iterations executed, void ones included.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Returns the number of iterations that ended with a backpropagation.
    pub fn completed_iterations(&self) -> u32 {
        self.completed_iterations
    }

    /// Returns the duration of the last run.
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Returns an estimation of the memory footprint of the MCTS struct.
    pub fn size(&self) -> usize {
        fn subtree_size<G: GameAdapter>(node: &Node<G>) -> usize {
            let node = node.borrow();
            let children = node.children.values().map(subtree_size).sum::<usize>();
            node.size() + children
        }
        mem::size_of::<Self>() + subtree_size(&self.root)
    }
}

/// MCTS backpropagation phase.
///
/// Walks from `leaf` up to the root, incrementing visits and crediting wins
/// on every other node, starting with `leaf` on a [BackpropSignal::Won].
pub fn backpropagate<G: GameAdapter>(leaf: &Node<G>, signal: BackpropSignal) {
    let mut node = Some(leaf.clone());
    let mut even = true;
    while let Some(current) = node {
        let parent = {
            let mut inner = current.borrow_mut();
            inner.visits += 1;
            if signal.credits(even) {
                inner.wins += 1.;
            }
            inner.parent()
        };
        even = !even;
        node = parent;
    }
}

/// Searches a fresh tree for the player to move in `state` and returns its best action.
///
/// Returns None only if `state` has no legal action.
pub fn decide<G: GameAdapter>(
    game: &G,
    state: G::State,
    config: MCTSConfiguration,
) -> Option<G::Action> {
    let mut mcts = MCTS::new(game, state, config);
    mcts.run()
}

/// When `graphviz` feature is enabled, provides plotting of the search tree.
#[cfg(feature = "graphviz")]
pub mod graphviz {
    use super::*;
    use std::hash::{Hash, Hasher};
    use std::{
        borrow::Cow,
        io::{self, Write},
        rc::Rc,
        sync::atomic::AtomicUsize,
    };

    use dot::{Arrow, Edges, GraphWalk, Id, Kind, LabelText, Labeller, Nodes, Style};

    /// Renders the search tree as graphviz's dot format.
    pub fn plot_mcts_tree<G: GameAdapter, W: Write>(mcts: &MCTS<G>, w: &mut W) -> io::Result<()> {
        dot::render(mcts, w)
    }

    fn player_color_hsv<P: Hash>(player: P) -> (f32, f32, f32) {
        use palette::IntoColor;
        let mut hasher = std::collections::hash_map::DefaultHasher::default();
        player.hash(&mut hasher);
        let bytes: [u8; 8] = hasher.finish().to_ne_bytes();
        let (h, s, v) = palette::Srgb::from_components((bytes[5], bytes[6], bytes[7]))
            .into_format::<f32>()
            .into_hsv::<palette::encoding::Srgb>()
            .into_components();

        ((h.to_degrees() + 180.) / 360., s, v)
    }

    struct Edge<G: GameAdapter> {
        parent: Node<G>,
        child: Node<G>,
        action: G::Action,
        best: bool,
        visits: u32,
        win_rate: f32,
        ucb: f32,
    }

    impl<G: GameAdapter> Clone for Edge<G> {
        fn clone(&self) -> Self {
            Edge {
                parent: self.parent.clone(),
                child: self.child.clone(),
                action: self.action.clone(),
                best: self.best,
                visits: self.visits,
                win_rate: self.win_rate,
                ucb: self.ucb,
            }
        }
    }

    /// The depth of the graph to plot, in number of nodes.
    static GRAPH_OUTPUT_DEPTH: AtomicUsize = AtomicUsize::new(4);

    /// Sets the depth of the graph to plot, in number of nodes.
    pub fn set_graph_output_depth(depth: usize) {
        GRAPH_OUTPUT_DEPTH.store(depth, std::sync::atomic::Ordering::Relaxed);
    }
    /// Gets the depth of the graph to plot, in number of nodes.
    pub fn get_graph_output_depth() -> usize {
        GRAPH_OUTPUT_DEPTH.load(std::sync::atomic::Ordering::Relaxed)
    }

    impl<G: GameAdapter> MCTS<'_, G> {
        fn add_relevant_nodes(&self, nodes: &mut Vec<Node<G>>, node: &Node<G>, depth: usize) {
            if depth >= get_graph_output_depth() {
                return;
            }

            nodes.push(node.clone());

            for child in node.borrow().children.values() {
                self.add_relevant_nodes(nodes, child, depth + 1);
            }
        }

        fn relevant_nodes(&self) -> Vec<Node<G>> {
            let mut nodes = Vec::new();
            self.add_relevant_nodes(&mut nodes, &self.root, 0);
            nodes
        }
    }

    impl<'a, G: GameAdapter> GraphWalk<'a, Node<G>, Edge<G>> for MCTS<'_, G> {
        fn nodes(&'a self) -> Nodes<'a, Node<G>> {
            Nodes::Owned(self.relevant_nodes())
        }

        fn edges(&'a self) -> Edges<'a, Edge<G>> {
            let nodes = self.relevant_nodes();
            let is_plotted = |node: &Node<G>| nodes.iter().any(|other| Rc::ptr_eq(node, other));

            let mut edge_vec = Vec::new();
            nodes.iter().for_each(|node| {
                let parent = node.borrow();
                let best_action = parent
                    .children
                    .iter()
                    .rev()
                    .max_by_key(|(_, child)| {
                        NotNan::new(child.borrow().win_rate()).unwrap_or(SCORE_ZERO)
                    })
                    .map(|(action, _)| action.clone());
                parent.children.iter().for_each(|(action, child)| {
                    if is_plotted(child) {
                        let inner = child.borrow();
                        edge_vec.push(Edge {
                            parent: node.clone(),
                            child: child.clone(),
                            action: action.clone(),
                            best: Some(action) == best_action.as_ref(),
                            visits: inner.visits,
                            win_rate: inner.win_rate(),
                            ucb: self.selection.score(&*parent, &*inner, Perspective::Mover),
                        });
                    }
                });
            });

            Edges::Owned(edge_vec)
        }

        fn source(&'a self, edge: &Edge<G>) -> Node<G> {
            edge.parent.clone()
        }

        fn target(&'a self, edge: &Edge<G>) -> Node<G> {
            edge.child.clone()
        }
    }

    impl<'a, G: GameAdapter> Labeller<'a, Node<G>, Edge<G>> for MCTS<'_, G> {
        fn graph_id(&'a self) -> Id<'a> {
            let id = format!("player_{:?}", self.identity)
                .replace(|c: char| !c.is_ascii_alphanumeric(), "_");
            Id::new(id).unwrap()
        }

        fn node_id(&'a self, n: &Node<G>) -> Id<'a> {
            Id::new(format!("_{:p}", Rc::as_ptr(n))).unwrap()
        }

        fn node_label(&'a self, n: &Node<G>) -> LabelText<'a> {
            let state = self.state_of(n);
            let mut description = self.game.describe(&state);
            if !description.is_empty() {
                description = description.replace('\n', "<br/>");
                description = format!("<br/><font point-size='10'>{description}</font>");
            }
            let node = n.borrow();
            LabelText::HtmlStr(Cow::Owned(format!(
                "To move: {:?}<br/>N: {}, W: {:.1}, untried: {}{description}",
                self.game.current_player(&state),
                node.visits,
                node.wins,
                node.untried_actions.len(),
            )))
        }

        fn node_style(&'a self, node: &Node<G>) -> Style {
            if Rc::ptr_eq(node, &self.root) {
                Style::Bold
            } else {
                Style::Filled
            }
        }

        fn node_color(&'a self, node: &Node<G>) -> Option<LabelText<'a>> {
            if Rc::ptr_eq(node, &self.root) {
                Some(LabelText::LabelStr(Cow::Borrowed("red")))
            } else {
                let root_visits = self.root.borrow().visits.max(1);
                let visits = node.borrow().visits;
                let player = self.game.current_player(&self.state_of(node));
                let (h, s, _v) = player_color_hsv(player);
                Some(LabelText::LabelStr(Cow::Owned(format!(
                    "{:.3} {:.3} 1.000",
                    h,
                    s * (visits as f32 / root_visits as f32).min(1.0)
                ))))
            }
        }

        fn edge_style(&'a self, edge: &Edge<G>) -> Style {
            if edge.best {
                Style::Bold
            } else {
                Style::Solid
            }
        }

        fn edge_color(&'a self, edge: &Edge<G>) -> Option<LabelText<'a>> {
            if edge.best {
                Some(LabelText::LabelStr(Cow::Borrowed("red")))
            } else {
                None
            }
        }

        fn edge_label(&'a self, edge: &Edge<G>) -> LabelText<'a> {
            LabelText::LabelStr(Cow::Owned(format!(
                "{:?}\nN: {}, R: {:.2}\nU: {:.2}",
                edge.action, edge.visits, edge.win_rate, edge.ucb
            )))
        }

        fn edge_start_arrow(&'a self, _e: &Edge<G>) -> Arrow {
            Arrow::none()
        }

        fn edge_end_arrow(&'a self, _e: &Edge<G>) -> Arrow {
            Arrow::normal()
        }

        fn kind(&self) -> Kind {
            Kind::Digraph
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;

    use rand_chacha::ChaCha8Rng;

    use super::*;

    /// Players alternately take one or two sticks, whoever takes the last one wins.
    struct Sticks;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Heap {
        sticks: u8,
        to_move: u8,
    }

    impl GameAdapter for Sticks {
        type State = Heap;
        type Action = u8;
        type Player = u8;

        fn legal_actions(&self, state: &Heap) -> Vec<u8> {
            (1..=2).filter(|take| *take <= state.sticks).collect()
        }

        fn next_state(&self, state: &Heap, action: &u8) -> Heap {
            Heap {
                sticks: state.sticks - action,
                to_move: 3 - state.to_move,
            }
        }

        fn is_ended(&self, state: &Heap) -> bool {
            state.sticks == 0
        }

        fn current_player(&self, state: &Heap) -> u8 {
            state.to_move
        }

        fn points_values(&self, state: &Heap) -> BTreeMap<u8, Payoff> {
            // The player who just moved took the last stick
            let winner = 3 - state.to_move;
            [(winner, Payoff::Win), (state.to_move, Payoff::Loss)]
                .into_iter()
                .collect()
        }
    }

    const CONFIG: MCTSConfiguration = MCTSConfiguration {
        iterations: 500,
        exploration: 2.,
        unvisited_score: UnvisitedScore::Zero,
        score_terminal_leaves: false,
        time_budget: None,
        seed: Some(42),
    };

    fn heap(sticks: u8) -> Heap {
        Heap { sticks, to_move: 1 }
    }

    #[test]
    fn backpropagation_alternates_credit() {
        let root = TreeNode::<Sticks>::create(None, None, vec![]);
        let child = TreeNode::create(Some(&root), Some(1), vec![]);
        root.borrow_mut().children.insert(1, child.clone());
        let grandchild = TreeNode::create(Some(&child), Some(2), vec![]);
        child.borrow_mut().children.insert(2, grandchild.clone());

        backpropagate(&grandchild, BackpropSignal::Won);
        backpropagate(&grandchild, BackpropSignal::Lost);
        backpropagate(&grandchild, BackpropSignal::Draw);

        for node in [&root, &child, &grandchild] {
            assert_eq!(node.borrow().visits(), 3);
        }
        // Won credits offsets 0 and 2, Lost credits offset 1
        assert_eq!(grandchild.borrow().wins(), 1.);
        assert_eq!(child.borrow().wins(), 1.);
        assert_eq!(root.borrow().wins(), 1.);

        backpropagate(&grandchild, BackpropSignal::Won);
        assert_eq!(grandchild.borrow().wins(), 2.);
        assert_eq!(child.borrow().wins(), 1.);
        assert_eq!(root.borrow().wins(), 2.);
    }

    #[test]
    fn selection_ties_go_to_smallest_action() {
        let root = TreeNode::<Sticks>::create(None, None, vec![]);
        for action in [2, 1] {
            let child = TreeNode::create(Some(&root), Some(action), vec![]);
            child.borrow_mut().visits = 1;
            root.borrow_mut().children.insert(action, child);
        }
        root.borrow_mut().visits = 2;
        let policy = SelectionPolicy::new(&CONFIG);
        let (action, _) = policy
            .select_child(&*root.borrow(), Perspective::Mover)
            .unwrap();
        assert_eq!(action, 1);
    }

    #[test]
    fn state_is_replayed_from_root() {
        let mcts = MCTS::new(&Sticks, heap(5), CONFIG);
        let root = mcts.root_node();
        let child = TreeNode::create(Some(&root), Some(2), vec![]);
        root.borrow_mut().children.insert(2, child.clone());
        let grandchild = TreeNode::create(Some(&child), Some(1), vec![]);
        child.borrow_mut().children.insert(1, grandchild.clone());
        assert_eq!(
            mcts.state_of(&grandchild),
            Heap {
                sticks: 2,
                to_move: 1
            }
        );
        assert_eq!(mcts.state_of(&root), heap(5));
    }

    #[test]
    fn immediate_win_with_single_iteration() {
        let config = MCTSConfiguration {
            iterations: 1,
            ..CONFIG
        };
        assert_eq!(decide(&Sticks, heap(2), config.clone()), Some(2));
        assert_eq!(decide(&Sticks, heap(1), config), Some(1));
    }

    #[test]
    fn zero_iterations_fall_back_to_first_legal_action() {
        let config = MCTSConfiguration {
            iterations: 0,
            ..CONFIG
        };
        assert_eq!(decide(&Sticks, heap(4), config), Some(1));
    }

    #[test]
    fn terminal_root_has_no_action() {
        let mut mcts = MCTS::new(&Sticks, heap(0), CONFIG);
        assert_eq!(mcts.run(), None);
        assert_eq!(mcts.completed_iterations(), 0);
        assert_eq!(mcts.iterations(), CONFIG.iterations);
        assert_eq!(mcts.node_count(), 1);
    }

    #[test]
    fn terminal_leaves_make_void_iterations() {
        // Taking both sticks wins at once, so selection keeps returning to that terminal child
        let mut mcts = MCTS::new(&Sticks, heap(2), CONFIG);
        assert_eq!(mcts.run(), Some(2));
        assert_eq!(mcts.node_count(), 3);
        assert_eq!(mcts.completed_iterations(), 2);
        assert_eq!(mcts.iterations(), CONFIG.iterations);
        assert_eq!(mcts.root_node().borrow().visits(), 2);
    }

    #[test]
    fn scored_terminal_leaves_complete_every_iteration() {
        let config = MCTSConfiguration {
            score_terminal_leaves: true,
            ..CONFIG
        };
        let mut mcts = MCTS::new(&Sticks, heap(2), config);
        mcts.run();
        assert_eq!(mcts.node_count(), 4);
        assert_eq!(mcts.root_node().borrow().subtree_size(), 4);
        assert_eq!(mcts.completed_iterations(), CONFIG.iterations);
        assert_eq!(mcts.root_node().borrow().visits(), CONFIG.iterations);
    }

    #[test]
    fn unvisited_children_fall_back_to_first_legal_action() {
        let mcts = MCTS::new(&Sticks, heap(4), CONFIG);
        let root = mcts.root_node();
        let child = TreeNode::create(Some(&root), Some(2), vec![1, 2]);
        root.borrow_mut().children.insert(2, child);
        root.borrow_mut().untried_actions.retain(|action| *action != 2);
        assert_eq!(root.borrow().children().len(), 1);
        // 1 is legal but not expanded, the only child 2 has no visits
        assert_eq!(mcts.best_action_at_root(), Some(1));
        assert_eq!(mcts.best_action_at_root(), Some(1));
    }

    #[test]
    fn early_stop_condition_ends_the_search() {
        let checks = Rc::new(Cell::new(0));
        let counter = checks.clone();
        let early_stop: Box<EarlyStopCondition> = Box::new(move || {
            counter.set(counter.get() + 1);
            counter.get() >= 7
        });
        let mut mcts = MCTS::new_with_policy(
            &Sticks,
            heap(6),
            CONFIG,
            Box::new(RandomRollout),
            Some(early_stop),
        );
        assert!(mcts.run().is_some());
        assert_eq!(checks.get(), 7);
        assert_eq!(mcts.iterations(), 7);
    }

    /// Declares every game a draw, counting its calls.
    struct CountingDraws(Rc<Cell<u32>>);

    impl RolloutPolicy<Sticks> for CountingDraws {
        fn rollout(&mut self, _rng: &mut ChaCha8Rng, _game: &Sticks, _state: Heap) -> Rollout<u8> {
            self.0.set(self.0.get() + 1);
            Rollout {
                winner: None,
                length: 0,
            }
        }
    }

    #[test]
    fn custom_rollout_policy_is_used() {
        let calls = Rc::new(Cell::new(0));
        let mut mcts = MCTS::new_with_policy(
            &Sticks,
            heap(5),
            CONFIG,
            Box::new(CountingDraws(calls.clone())),
            None,
        );
        mcts.run();
        assert!(calls.get() > 0);
        assert_eq!(calls.get(), mcts.completed_iterations());

        // Draws never credit a win
        let mut stack = vec![mcts.root_node()];
        while let Some(node) = stack.pop() {
            let node = node.borrow();
            assert_eq!(node.wins(), 0.);
            stack.extend(node.children().values().cloned());
        }
    }

    #[test]
    fn searched_tree_is_fully_expanded() {
        let config = MCTSConfiguration {
            score_terminal_leaves: true,
            ..CONFIG
        };
        let mut mcts = MCTS::new(&Sticks, heap(3), config);
        mcts.run();
        assert_eq!(mcts.node_count(), 7);

        let root = mcts.root_node();
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            let ended = Sticks.is_ended(&mcts.state_of(&node));
            let inner = node.borrow();
            assert_eq!(inner.is_dead_end(), ended);
            assert_eq!(inner.is_fully_expanded(), !ended);
            for (action, child) in inner.children() {
                assert!(Rc::ptr_eq(&inner.child(action).unwrap(), child));
            }
            stack.extend(inner.children().values().cloned());
        }
        assert!(root.borrow().child(&3).is_none());
    }

    #[test]
    fn size_grows_with_the_tree() {
        let mut mcts = MCTS::new(&Sticks, heap(5), CONFIG);
        let empty = mcts.size();
        assert!(
            empty
                >= std::mem::size_of::<MCTS<Sticks>>() + std::mem::size_of::<TreeNode<Sticks>>()
        );
        mcts.run();
        assert!(mcts.size() > empty);
        assert!(mcts.root_node().borrow().size() >= std::mem::size_of::<TreeNode<Sticks>>());
    }
}
