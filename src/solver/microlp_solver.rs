// microlp Solver Adapter
// Pure-Rust branch and bound; always compiled in

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::microlp::microlp, SolverModel};
use std::time::Instant;

use super::good_lp_model::{self, TimeLimitPolicy};

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        if let Some(solution) = super::trivial_solution(problem) {
            return Ok(solution);
        }

        if problem.solver_config.time_limit.is_some() {
            // microlp cannot be interrupted
            tracing::debug!(
                problem = %problem.name,
                "microlp does not enforce time limits during search"
            );
        }

        let start_time = Instant::now();
        let model = good_lp_model::build(problem);

        let mut lp_model = model.vars.minimise(model.objective).using(microlp);
        for constraint in model.constraints {
            lp_model = lp_model.with(constraint);
        }

        good_lp_model::interpret(
            problem,
            &model.columns,
            lp_model.solve(),
            start_time,
            TimeLimitPolicy::RunsToCompletion,
        )
    }

    fn name(&self) -> &str {
        "microlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Constraint, ConstraintType, ObjectiveFunction, SolutionStatus, SolverConfig,
        SolverService, Variable,
    };

    fn problem(coefficients: Vec<f64>, constraints: Vec<Constraint>) -> OptimizationProblem {
        let variables = (0..coefficients.len())
            .map(|i| Variable::binary(format!("x{}", i)))
            .collect();
        OptimizationProblem::new(ObjectiveFunction::new(coefficients))
            .with_name("test")
            .with_variables(variables)
            .with_constraints(constraints)
    }

    #[test]
    fn picks_cheapest_under_exclusivity() {
        let p = problem(
            vec![-1.0, -3.0, -2.0],
            vec![Constraint::new(
                ConstraintType::LessThanOrEqual,
                vec![1.0, 1.0, 1.0],
                1.0,
            )],
        );

        let sol = MicroLpSolver::new().solve(&p).unwrap();
        assert!(sol.is_feasible());
        assert!(sol.is_selected(1));
        assert!(!sol.is_selected(0));
        assert!(!sol.is_selected(2));
        assert!((sol.optimal_value.unwrap() + 3.0).abs() < 1e-9);
    }

    #[test]
    fn overrunning_the_time_limit_keeps_the_optimum() {
        let p = problem(
            vec![2.0, 1.0],
            vec![Constraint::new(
                ConstraintType::GreaterThanOrEqual,
                vec![1.0, 1.0],
                1.0,
            )],
        )
        .with_config(SolverConfig {
            time_limit: Some(1e-9),
            ..SolverConfig::default()
        });

        let sol = MicroLpSolver::new().solve(&p).unwrap();
        assert_eq!(sol.status, SolutionStatus::Optimal);
        assert!(sol.is_selected(1));
        assert!((sol.optimal_value.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn coverage_row_forces_selection() {
        let p = problem(
            vec![5.0, 7.0],
            vec![Constraint::new(
                ConstraintType::GreaterThanOrEqual,
                vec![1.0, 1.0],
                1.0,
            )],
        );

        let sol = MicroLpSolver::new().solve(&p).unwrap();
        assert!(sol.is_selected(0));
        assert!(!sol.is_selected(1));
    }

    #[test]
    fn conflicting_fixed_variables_are_infeasible() {
        let mut p = problem(
            vec![0.0, 0.0],
            vec![Constraint::new(
                ConstraintType::LessThanOrEqual,
                vec![1.0, 1.0],
                1.0,
            )],
        );
        p.variables = p.variables.into_iter().map(|v| v.fixed_at(1.0)).collect();

        let sol = MicroLpSolver::new().solve(&p).unwrap();
        assert_eq!(sol.status, SolutionStatus::Infeasible);
    }

    #[test]
    fn empty_problem_is_trivially_optimal() {
        let p = problem(vec![], vec![]);
        let sol = MicroLpSolver::new().solve(&p).unwrap();
        assert_eq!(sol.status, SolutionStatus::Optimal);
        assert_eq!(sol.optimal_value, Some(0.0));
        assert!(sol.variable_values.is_empty());
    }
}
