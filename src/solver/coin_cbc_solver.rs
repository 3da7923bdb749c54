// COIN-OR CBC Solver Adapter (feature `coin_cbc`)

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::coin_cbc, SolverModel};
use std::time::Instant;

use super::good_lp_model::{self, TimeLimitPolicy};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        if let Some(solution) = super::trivial_solution(problem) {
            return Ok(solution);
        }

        let start_time = Instant::now();
        let model = good_lp_model::build(problem);

        let mut lp_model = model.vars.minimise(model.objective).using(coin_cbc::coin_cbc);
        if !problem.solver_config.verbose {
            lp_model.set_parameter("log", "0");
        }
        if let Some(limit) = problem.solver_config.time_limit {
            lp_model.set_parameter("seconds", &limit.to_string());
        }

        for constraint in model.constraints {
            lp_model = lp_model.with(constraint);
        }

        good_lp_model::interpret(
            problem,
            &model.columns,
            lp_model.solve(),
            start_time,
            TimeLimitPolicy::StopsSearch,
        )
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
