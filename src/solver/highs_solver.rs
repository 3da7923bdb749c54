// HiGHS Solver Adapter (feature `highs`)
// Translates the domain model straight onto the HiGHS row API

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        if let Some(solution) = super::trivial_solution(problem) {
            return Ok(solution);
        }

        let start_time = Instant::now();

        // Columns first, then rows
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.variables.len());

        for (i, var_def) in problem.variables.iter().enumerate() {
            let obj_coeff = problem.objective.coefficients[i];
            cols.push(pb.add_integer_column(obj_coeff, var_def.lower_bound..=var_def.upper_bound));
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms()
                .map(|(i, coeff)| (cols[i], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let mut model = pb.optimise(Sense::Minimise);
        model.set_option("output_flag", problem.solver_config.verbose);
        if let Some(limit) = problem.solver_config.time_limit {
            model.set_option("time_limit", limit);
        }

        let solved = model.solve();
        let statistics = SolverStatistics::for_problem(
            problem,
            start_time.elapsed().as_secs_f64() * 1000.0,
        );

        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let actual_obj = problem.objective.value_at(&variable_values);

                let mut solution = DomainSolution::optimal(actual_obj, variable_values)
                    .with_statistics(statistics);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(solution)
            }
            HighsModelStatus::Infeasible => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            HighsModelStatus::ReachedTimeLimit => Ok(DomainSolution::new(
                DomainSolutionStatus::TimeLimit,
                format!("Time limit reached for '{}'", problem.name),
            )
            .with_statistics(statistics)),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(DomainSolution::new(
                    DomainSolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
                .with_statistics(statistics))
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
