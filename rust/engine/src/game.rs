use serde::{Deserialize, Serialize};

/// How a resolved hand ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandResult {
    /// Goal reached; round-won screen requested after a delay
    Won,
    /// Goal missed; a fresh round was dealt
    Continue,
    /// Goal missed with no seeds left anywhere
    Lost,
}

/// Round counters and scores.
///
/// `current_score` is zeroed at the start of every round, whether the
/// previous one was won or missed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub round_number: u32,
    pub score_goal: u64,
    pub current_score: f64,
    /// Cached preview of the board; rewritten whenever the board changes
    pub predicted_score: f64,
}

impl RoundState {
    pub fn new(score_goal: u64) -> Self {
        Self {
            round_number: 1,
            score_goal,
            current_score: 0.0,
            predicted_score: 0.0,
        }
    }

    pub fn goal_reached(&self) -> bool {
        self.current_score >= self.score_goal as f64
    }

    /// Moves to the next round and raises the goal by `goal_step`.
    pub fn advance(&mut self, goal_step: u64) {
        self.round_number += 1;
        self.score_goal = self.score_goal.saturating_add(goal_step);
    }
}
