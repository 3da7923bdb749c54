// Solver adapters: concrete implementations of SolverService

use crate::domain::{OptimizationProblem, Solution, SolverStatistics};

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc_solver;
pub mod factory;
mod good_lp_model;
#[cfg(feature = "highs")]
pub mod highs_solver;
pub mod microlp_solver;

#[cfg(feature = "coin_cbc")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;
pub use microlp_solver::MicroLpSolver;

/// A program with no variables has exactly one solution; backends are not asked for it.
pub(crate) fn trivial_solution(problem: &OptimizationProblem) -> Option<Solution> {
    if !problem.is_empty() {
        return None;
    }
    let mut solution = Solution::optimal(0.0, Vec::new())
        .with_statistics(SolverStatistics::for_problem(problem, 0.0));
    solution.message = format!("Nothing to decide for '{}'", problem.name);
    Some(solution)
}
