// Domain layer: band facts, the 0/1 program model and the solver contract
pub mod domain;

// Application layer: snapshot loading, model building and song sequencing
pub mod application;

// Infrastructure layer: fact stores, config files, async execution
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Assignment, CapabilityEdge, GigAssignments, GigId, MemberId, OptimizerError, Override,
    ReadinessTier, SkipReason, SkippedSong, SolverBackend, SolverConfig, SolverError,
    SolverService, SongAssignments, SongId,
};

pub use application::{
    load_snapshot, FactSnapshot, FactStore, GigOptimizer, OptimizerConfig, ScoringConfig,
};

pub use infrastructure::{load_config, run_gig, FactsDocument, InMemoryFactStore, RunConfig};

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
pub use solver::{MicroLpSolver, SolverFactory};
