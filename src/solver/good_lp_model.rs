// Translation of a domain OptimizationProblem into good_lp terms
// Shared by every adapter that goes through good_lp (microlp, CBC)

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, SolutionStatus as DomainSolutionStatus},
};
use good_lp::{
    variable, variables, Constraint as GoodLpConstraint, Expression, ProblemVariables,
    ResolutionError, Solution as GoodLpSolutionTrait, Variable as GoodLpVariable,
};
use std::time::Instant;

pub(crate) struct GoodLpModel {
    pub vars: ProblemVariables,
    pub columns: Vec<GoodLpVariable>,
    pub objective: Expression,
    pub constraints: Vec<GoodLpConstraint>,
}

pub(crate) fn build(problem: &OptimizationProblem) -> GoodLpModel {
    let mut vars = variables!();
    let mut columns: Vec<GoodLpVariable> = Vec::with_capacity(problem.variables.len());

    for var_def in &problem.variables {
        let var = vars.add(
            variable()
                .integer()
                .min(var_def.lower_bound)
                .max(var_def.upper_bound),
        );
        columns.push(var);
    }

    let mut objective: Expression = 0.into();
    for (i, &coeff) in problem.objective.coefficients.iter().enumerate() {
        if coeff != 0.0 {
            objective += coeff * columns[i];
        }
    }

    let mut constraints = Vec::with_capacity(problem.constraints.len());
    for constraint in &problem.constraints {
        let mut lhs: Expression = 0.into();
        for (i, coeff) in constraint.terms() {
            lhs += coeff * columns[i];
        }

        constraints.push(match constraint.constraint_type {
            ConstraintType::LessThanOrEqual => lhs.leq(constraint.bound),
            ConstraintType::GreaterThanOrEqual => lhs.geq(constraint.bound),
        });
    }

    GoodLpModel {
        vars,
        columns,
        objective,
        constraints,
    }
}

/// How a backend treats `SolverConfig::time_limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeLimitPolicy {
    /// The search stops at the limit, so a late result is only the incumbent
    StopsSearch,
    /// The search always runs to a proven optimum
    RunsToCompletion,
}

/// Map a good_lp resolution result back into domain terms
pub(crate) fn interpret<S: GoodLpSolutionTrait>(
    problem: &OptimizationProblem,
    columns: &[GoodLpVariable],
    result: std::result::Result<S, ResolutionError>,
    start_time: Instant,
    policy: TimeLimitPolicy,
) -> Result<DomainSolution> {
    let elapsed = start_time.elapsed();
    let statistics = SolverStatistics::for_problem(problem, elapsed.as_secs_f64() * 1000.0);

    match result {
        Ok(sol) => {
            if let Some(limit) = problem.solver_config.time_limit {
                if elapsed.as_secs_f64() >= limit {
                    match policy {
                        TimeLimitPolicy::StopsSearch => {
                            return Ok(DomainSolution::new(
                                DomainSolutionStatus::TimeLimit,
                                format!("Time limit of {}s reached for '{}'", limit, problem.name),
                            )
                            .with_statistics(statistics));
                        }
                        TimeLimitPolicy::RunsToCompletion => {
                            tracing::debug!(
                                problem = %problem.name,
                                limit_s = limit,
                                elapsed_ms = statistics.solve_time_ms,
                                "Solve overran its time limit; keeping the proven optimum"
                            );
                        }
                    }
                }
            }

            let variable_values: Vec<f64> = columns.iter().map(|&var| sol.value(var)).collect();
            let actual_obj = problem.objective.value_at(&variable_values);

            let mut solution =
                DomainSolution::optimal(actual_obj, variable_values).with_statistics(statistics);
            solution.message = format!("Optimal solution found for '{}'", problem.name);
            Ok(solution)
        }
        Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
            DomainSolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
            DomainSolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
        .with_statistics(statistics)),
        Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
    }
}
