use serde::{Deserialize, Serialize};

use crate::domain::SolverConfig;

/// Weights of the per-song objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Span of the reported score; half goes to scarcity, half to coverage
    pub score_range: f64,
    pub instrument_weight: f64,
    /// Multiplied by the square of a member's songs so far
    pub penalty_per_song: f64,
    /// Must stay well below every other term
    pub tie_break_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_range: 100.0,
            instrument_weight: 1.0,
            penalty_per_song: 0.0001,
            tie_break_weight: 0.000001,
        }
    }
}

/// Everything that shapes one optimizer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub scoring: ScoringConfig,
    pub solver: SolverConfig,
    pub tie_break_seed: u64,
    /// Reject conflicting overrides before they reach the solver
    pub validate_overrides: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            solver: SolverConfig::default(),
            tie_break_seed: 0,
            validate_overrides: true,
        }
    }
}

impl OptimizerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.tie_break_seed = seed;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn without_override_validation(mut self) -> Self {
        self.validate_overrides = false;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let s = &self.scoring;
        if !(s.score_range.is_finite() && s.score_range > 0.0) {
            return Err(format!("score_range must be positive, got {}", s.score_range));
        }
        for (name, value) in [
            ("instrument_weight", s.instrument_weight),
            ("penalty_per_song", s.penalty_per_song),
            ("tie_break_weight", s.tie_break_weight),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }
        if let Some(limit) = self.solver.time_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(format!("solver.time_limit must be positive, got {}", limit));
            }
        }
        Ok(())
    }
}
