use serde::{Deserialize, Serialize};

use super::value_objects::{ConstraintType, SolutionStatus, SolverBackend};

/// Binary decision variable in a 0/1 program
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub name: String,
}

impl Variable {
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            lower_bound: 0.0,
            upper_bound: 1.0,
            name: name.into(),
        }
    }

    /// Pin both bounds to `value`, forcing the solver's hand.
    pub fn fixed_at(mut self, value: f64) -> Self {
        self.lower_bound = value;
        self.upper_bound = value;
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}

/// Linear objective, always minimised
#[derive(Debug, Clone, Default)]
pub struct ObjectiveFunction {
    pub coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Objective value realised by a full assignment of variable values
    pub fn value_at(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }
}

/// Linear constraint on variables
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub coefficients: Vec<f64>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, coefficients: Vec<f64>, bound: f64) -> Self {
        Self {
            constraint_type,
            coefficients,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Non-zero `(variable index, coefficient)` pairs
    pub fn terms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0.0)
            .map(|(i, &c)| (i, c))
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Per-song time budget in seconds
    pub time_limit: Option<f64>,
    pub verbose: bool,
}

/// Complete 0/1 optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_fixed_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_fixed_vars: problem.variables.iter().filter(|v| v.is_fixed()).count() as u32,
        }
    }
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_feasible(&self) -> bool {
        matches!(
            self.status,
            SolutionStatus::Optimal | SolutionStatus::Feasible
        )
    }

    /// Whether binary variable `index` was switched on
    pub fn is_selected(&self, index: usize) -> bool {
        self.variable_values.get(index).is_some_and(|&v| v > 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_variable_pins_both_bounds() {
        let v = Variable::binary("override_0").fixed_at(1.0);
        assert_eq!(v.lower_bound, 1.0);
        assert_eq!(v.upper_bound, 1.0);
        assert!(v.is_fixed());
        assert!(!Variable::binary("x").is_fixed());
    }

    #[test]
    fn constraint_terms_skip_zero_coefficients() {
        let c = Constraint::new(ConstraintType::LessThanOrEqual, vec![1.0, 0.0, 1.0], 1.0);
        assert_eq!(c.terms().collect::<Vec<_>>(), vec![(0, 1.0), (2, 1.0)]);
    }

    #[test]
    fn objective_value_and_selection() {
        let obj = ObjectiveFunction::new(vec![-2.0, 3.0, 0.5]);
        assert_eq!(obj.value_at(&[1.0, 0.0, 1.0]), -1.5);

        let sol = Solution::optimal(-1.5, vec![1.0, 0.0, 0.9999]);
        assert!(sol.is_selected(0));
        assert!(!sol.is_selected(1));
        assert!(sol.is_selected(2));
        assert!(!sol.is_selected(7));
    }
}
