use std::time::Duration;

/// A functor that returns whether the planner must do an early stop.
pub type EarlyStopCondition = dyn Fn() -> bool;

/// The score given to children that have never been visited.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnvisitedScore {
    /// Unvisited children score 0 and compete with the visited ones.
    #[default]
    Zero,
    /// Unvisited children are always selected first.
    Infinite,
}

/// The configuration of an MCTS instance.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct MCTSConfiguration {
    /// number of search iterations per decision, including the ones that could not expand anything
    pub iterations: u32,
    /// exploration factor to use in UCB1 to balance exploration and exploitation
    pub exploration: f32,
    /// the score of children without visits during selection
    pub unvisited_score: UnvisitedScore,
    /// if true, selecting a terminal node other than the root backpropagates its payoff,
    /// otherwise the iteration is void and changes nothing
    pub score_terminal_leaves: bool,
    /// if not `None`, the search stops once this wall-clock duration is exceeded
    pub time_budget: Option<Duration>,
    /// optionally, a user-given seed
    pub seed: Option<u64>,
}

impl MCTSConfiguration {
    /// The parameters used for decisions: 1000 iterations, exploration of 2,
    /// terminal leaves scored so that no iteration is void below the root.
    pub const REFERENCE: MCTSConfiguration = MCTSConfiguration {
        iterations: 1000,
        exploration: 2.,
        unvisited_score: UnvisitedScore::Zero,
        score_terminal_leaves: true,
        time_budget: None,
        seed: None,
    };

    /// Returns a copy of this configuration using the given seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
