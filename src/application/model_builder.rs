// Per-song model builder
//
// Turns one song's candidate edges and overrides into a 0/1 program.
// Variables are numbered `[candidates.., overrides.., slacks..]`, one slack
// per song part.
//
// Rows:
// - member: every variable naming the member sums to at most 1
// - instrument: variables on an instrument sum to at most the gig's count
// - coverage: ready-tier variables on a part plus its slack sum to at least 1
//
// Overrides are pinned through their bounds, not through rows.
//
// Objective (minimised):
// - scarcity: `-range / 2 / |gig instruments| / count(instrument)` per edge
// - fairness: `penalty * songs_so_far(member)^2` per edge
// - tie-break: `weight * U[0, 1)` per candidate, from the run's seeded RNG
// - missing coverage: `range / 2 / |parts|` per slack

use std::collections::{BTreeMap, HashMap};

use rand::Rng;

use super::config::ScoringConfig;
use super::fairness::FairnessAccumulator;
use super::snapshot::SongFacts;
use crate::domain::{
    CapabilityEdge, Constraint, ConstraintType, InstrumentId, MemberId, ObjectiveFunction,
    OptimizationProblem, Solution, SolverConfig, SongPartId, Variable,
};

/// What a variable of a [`SongModel`] stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRole {
    /// Index into [`SongFacts::candidates`]
    Candidate(usize),
    /// Index into [`SongFacts::overrides`]
    Override(usize),
    /// Index into [`SongFacts::parts`]
    Slack(usize),
}

/// A built program plus what is needed to read its solution back
#[derive(Debug, Clone)]
pub struct SongModel {
    pub problem: OptimizationProblem,
    pub roles: Vec<VariableRole>,
    /// Scarcity and missing-coverage share of each objective coefficient
    pub score_terms: Vec<f64>,
    score_offset: f64,
}

impl SongModel {
    /// Invert the scored part of the objective so higher is better
    pub fn score(&self, solution: &Solution) -> f64 {
        let spent: f64 = self
            .score_terms
            .iter()
            .enumerate()
            .filter(|&(i, _)| solution.is_selected(i))
            .map(|(_, term)| term)
            .sum();
        self.score_offset - spent
    }

    /// Selected edges and whether each came from an override
    pub fn selected_edges(
        &self,
        solution: &Solution,
        song: &SongFacts,
    ) -> Vec<(CapabilityEdge, bool)> {
        self.roles
            .iter()
            .enumerate()
            .filter(|&(i, _)| solution.is_selected(i))
            .filter_map(|(_, role)| match *role {
                VariableRole::Candidate(c) => song.candidates.get(c).map(|e| (*e, false)),
                VariableRole::Override(o) => song.overrides.get(o).map(|ov| (ov.as_edge(), true)),
                VariableRole::Slack(_) => None,
            })
            .collect()
    }

    pub fn num_slacks(&self) -> usize {
        self.roles
            .iter()
            .filter(|r| matches!(r, VariableRole::Slack(_)))
            .count()
    }
}

pub struct ModelBuilder<'a> {
    scoring: &'a ScoringConfig,
    inventory: &'a BTreeMap<InstrumentId, u32>,
    solver_config: &'a SolverConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(
        scoring: &'a ScoringConfig,
        inventory: &'a BTreeMap<InstrumentId, u32>,
        solver_config: &'a SolverConfig,
    ) -> Self {
        Self {
            scoring,
            inventory,
            solver_config,
        }
    }

    fn capacity(&self, instrument: InstrumentId) -> u32 {
        self.inventory.get(&instrument).copied().unwrap_or(0)
    }

    /// Negative, and larger in magnitude the fewer units the gig has
    pub fn scarcity_coefficient(&self, instrument: InstrumentId) -> f64 {
        let instruments = self.inventory.len().max(1) as f64;
        // A zero count is already ruled out by the capacity row
        let count = self.capacity(instrument).max(1) as f64;
        -self.scoring.score_range / 2.0 / instruments / count * self.scoring.instrument_weight
    }

    pub fn fairness_coefficient(&self, songs_so_far: u32) -> f64 {
        let n = songs_so_far as f64;
        self.scoring.penalty_per_song * n * n
    }

    pub fn slack_coefficient(&self, num_parts: usize) -> f64 {
        self.scoring.score_range / 2.0 / num_parts.max(1) as f64
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        song: &SongFacts,
        fairness: &FairnessAccumulator,
        rng: &mut R,
    ) -> SongModel {
        let num_candidates = song.candidates.len();
        let num_edges = num_candidates + song.overrides.len();
        let num_parts = song.parts.len();
        let num_vars = num_edges + num_parts;

        let part_index: HashMap<SongPartId, usize> = song
            .parts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();

        let edges: Vec<CapabilityEdge> = song
            .candidates
            .iter()
            .copied()
            .chain(song.overrides.iter().map(|o| o.as_edge()))
            .collect();

        let mut by_member: BTreeMap<MemberId, Vec<usize>> = BTreeMap::new();
        let mut by_instrument: BTreeMap<InstrumentId, Vec<usize>> = BTreeMap::new();
        let mut by_part: Vec<Vec<usize>> = vec![Vec::new(); num_parts];

        for (i, edge) in edges.iter().enumerate() {
            by_member.entry(edge.member).or_default().push(i);
            by_instrument.entry(edge.instrument).or_default().push(i);
            if edge.tier.covers_part() {
                if let Some(&p) = part_index.get(&edge.part) {
                    by_part[p].push(i);
                }
            }
        }

        let mut variables = Vec::with_capacity(num_vars);
        let mut roles = Vec::with_capacity(num_vars);
        let mut coefficients = Vec::with_capacity(num_vars);
        let mut score_terms = Vec::with_capacity(num_vars);

        for (i, edge) in edges.iter().enumerate() {
            let scarcity = self.scarcity_coefficient(edge.instrument);
            let penalty = self.fairness_coefficient(fairness.count(edge.member));
            let name = format!("m{}_p{}_i{}", edge.member.0, edge.part.0, edge.instrument.0);

            if i < num_candidates {
                let tie_break = self.scoring.tie_break_weight * rng.random::<f64>();
                variables.push(Variable::binary(name));
                roles.push(VariableRole::Candidate(i));
                coefficients.push(scarcity + penalty + tie_break);
            } else {
                variables.push(Variable::binary(format!("override_{}", name)).fixed_at(1.0));
                roles.push(VariableRole::Override(i - num_candidates));
                coefficients.push(scarcity + penalty);
            }
            score_terms.push(scarcity);
        }

        let slack = self.slack_coefficient(num_parts);
        for (p, part) in song.parts.iter().enumerate() {
            variables.push(Variable::binary(format!("unplayed_p{}", part.id.0)));
            roles.push(VariableRole::Slack(p));
            coefficients.push(slack);
            score_terms.push(slack);
        }

        let row = |indices: &[usize]| {
            let mut coeffs = vec![0.0; num_vars];
            for &i in indices {
                coeffs[i] = 1.0;
            }
            coeffs
        };

        let mut constraints =
            Vec::with_capacity(by_member.len() + by_instrument.len() + num_parts);

        for (member, indices) in &by_member {
            constraints.push(
                Constraint::new(ConstraintType::LessThanOrEqual, row(indices), 1.0)
                    .with_name(format!("member_{}", member.0)),
            );
        }

        for (instrument, indices) in &by_instrument {
            constraints.push(
                Constraint::new(
                    ConstraintType::LessThanOrEqual,
                    row(indices),
                    self.capacity(*instrument) as f64,
                )
                .with_name(format!("instrument_{}", instrument.0)),
            );
        }

        for (p, part) in song.parts.iter().enumerate() {
            let mut coeffs = row(&by_part[p]);
            coeffs[num_edges + p] = 1.0;
            constraints.push(
                Constraint::new(ConstraintType::GreaterThanOrEqual, coeffs, 1.0)
                    .with_name(format!("coverage_{}", part.id.0)),
            );
        }

        let problem = OptimizationProblem::new(ObjectiveFunction::new(coefficients))
            .with_name(song.song.title.clone())
            .with_variables(variables)
            .with_constraints(constraints)
            .with_config(self.solver_config.clone());

        SongModel {
            problem,
            roles,
            score_terms,
            // nothing to play scores the same as nothing covered
            score_offset: if num_parts == 0 {
                0.0
            } else {
                self.scoring.score_range / 2.0
            },
        }
    }
}
