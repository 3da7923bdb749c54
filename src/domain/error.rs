// Run-level error taxonomy

use super::assignment::SkipReason;
use super::band::SongId;
use super::solver_service::SolverError;

/// Failure talking to the fact store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse facts: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    /// Gig or referenced entity cannot be resolved; fatal for the run
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("override conflict on {song}: {detail}")]
    OverrideConflict { song: SongId, detail: String },

    #[error("no feasible assignment for {0}")]
    Infeasible(SongId),

    #[error("solver time budget exceeded for {0}")]
    SolverTimeout(SongId),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("optimizer run cancelled after {completed} songs")]
    Cancelled { completed: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl OptimizerError {
    /// How a failure confined to one song is reported; `None` ends the run
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            OptimizerError::OverrideConflict { detail, .. } => {
                Some(SkipReason::OverrideConflict(detail.clone()))
            }
            OptimizerError::Infeasible(_) => Some(SkipReason::Infeasible),
            OptimizerError::SolverTimeout(_) => Some(SkipReason::SolverTimeout),
            OptimizerError::Solver(e) => Some(SkipReason::SolverFailed(e.to_string())),
            OptimizerError::DataUnavailable(_)
            | OptimizerError::Cancelled { .. }
            | OptimizerError::Config(_) => None,
        }
    }
}

impl From<StoreError> for OptimizerError {
    fn from(err: StoreError) -> Self {
        OptimizerError::DataUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
