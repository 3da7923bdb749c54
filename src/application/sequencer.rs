// Sequencer & aggregator
//
// Solves a gig's songs one at a time, fewest candidate edges first, feeding
// each song's assignments into the fairness accumulator the next song's
// model is built from. Song-level failures are reported and skipped; only
// unresolvable data, bad configuration and cancellation end a run early.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;

use super::config::OptimizerConfig;
use super::fairness::FairnessAccumulator;
use super::model_builder::ModelBuilder;
use super::overrides::validate_song_overrides;
use super::snapshot::{load_snapshot, FactSnapshot, FactStore, SongFacts};
use crate::domain::{
    error::Result, Assignment, GigAssignments, GigId, MemberSongCount, OptimizerError,
    SkippedSong, SolutionStatus, SolverError, SolverService, SongAssignments,
};
use crate::solver::SolverFactory;

/// Songs in solve order: ascending pool size, then song id
pub fn processing_order(songs: &[SongFacts]) -> Vec<&SongFacts> {
    let mut order: Vec<&SongFacts> = songs.iter().collect();
    order.sort_by_key(|s| (s.pool_size(), s.song.id));
    order
}

/// Ranks songs by descending score, then ascending title.
pub fn rank_songs(a: &SongAssignments, b: &SongAssignments) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.title.cmp(&b.title))
}

pub struct GigOptimizer {
    solver: Arc<dyn SolverService>,
    config: OptimizerConfig,
}

impl GigOptimizer {
    pub fn new(solver: Arc<dyn SolverService>, config: OptimizerConfig) -> Self {
        Self { solver, config }
    }

    /// Build an optimizer with the backend named in `config`
    pub fn from_config(config: OptimizerConfig) -> Result<Self> {
        config.validate().map_err(OptimizerError::Config)?;
        let solver = SolverFactory::create_from_backend(config.solver.backend)?;
        Ok(Self::new(solver, config))
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn optimize(&self, store: &dyn FactStore, gig: GigId) -> Result<GigAssignments> {
        self.optimize_with_cancel(store, gig, &CancellationToken::new())
    }

    pub fn optimize_with_cancel(
        &self,
        store: &dyn FactStore,
        gig: GigId,
        cancel: &CancellationToken,
    ) -> Result<GigAssignments> {
        let snapshot = load_snapshot(store, gig)?;
        self.optimize_snapshot(&snapshot, cancel)
    }

    /// Run every considered song of an already loaded snapshot
    pub fn optimize_snapshot(
        &self,
        snapshot: &FactSnapshot,
        cancel: &CancellationToken,
    ) -> Result<GigAssignments> {
        let gig = snapshot.gig.id;
        tracing::info!(
            gig = %gig,
            songs = snapshot.songs.len(),
            solver = self.solver.name(),
            seed = self.config.tie_break_seed,
            "Starting gig assignment run"
        );

        let builder = ModelBuilder::new(
            &self.config.scoring,
            &snapshot.inventory,
            &self.config.solver,
        );
        let mut fairness = FairnessAccumulator::new();
        let mut rng = StdRng::seed_from_u64(self.config.tie_break_seed);

        let mut songs = Vec::new();
        let mut skipped = Vec::new();

        for (completed, song) in processing_order(&snapshot.songs).into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(gig = %gig, completed, "Gig assignment run cancelled");
                return Err(OptimizerError::Cancelled { completed });
            }

            match self.solve_song(snapshot, song, &builder, &fairness, &mut rng) {
                Ok(result) => {
                    tracing::debug!(
                        song = %song.song.id,
                        title = %song.song.title,
                        pool = song.pool_size(),
                        assigned = result.assignments.len(),
                        unplayed = result.unplayed_parts.len(),
                        score = result.score,
                        "Solved song"
                    );
                    fairness.record(result.members());
                    songs.push(result);
                }
                Err(err) => {
                    let Some(reason) = err.skip_reason() else {
                        return Err(err);
                    };
                    tracing::warn!(
                        song = %song.song.id,
                        title = %song.song.title,
                        %reason,
                        "Skipping song"
                    );
                    skipped.push(SkippedSong {
                        song: song.song.id,
                        title: song.song.title.clone(),
                        reason,
                    });
                }
            }
        }

        songs.sort_by(rank_songs);

        let on_setlist: HashSet<_> = snapshot.setlist.iter().copied().collect();
        let solved: HashSet<_> = songs.iter().map(|s| s.song).collect();
        let setlist = snapshot
            .setlist
            .iter()
            .copied()
            .filter(|id| solved.contains(id))
            .collect();
        let recommendations = songs
            .iter()
            .map(|s| s.song)
            .filter(|id| !on_setlist.contains(id))
            .collect();

        let member_song_counts = fairness.into_counts();
        let mut ranked_members: Vec<MemberSongCount> = member_song_counts
            .iter()
            .map(|(&member, &count)| MemberSongCount {
                member,
                name: snapshot.member_name(member),
                songs: count,
            })
            .collect();
        ranked_members.sort_by(|a, b| {
            b.songs
                .cmp(&a.songs)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.member.cmp(&b.member))
        });

        tracing::info!(
            gig = %gig,
            solved = songs.len(),
            skipped = skipped.len(),
            members = member_song_counts.len(),
            "Finished gig assignment run"
        );

        Ok(GigAssignments {
            gig,
            songs,
            setlist,
            recommendations,
            skipped,
            member_song_counts,
            ranked_members,
        })
    }

    fn solve_song(
        &self,
        snapshot: &FactSnapshot,
        song: &SongFacts,
        builder: &ModelBuilder<'_>,
        fairness: &FairnessAccumulator,
        rng: &mut StdRng,
    ) -> Result<SongAssignments> {
        let id = song.song.id;
        if self.config.validate_overrides {
            validate_song_overrides(song, snapshot)
                .map_err(|detail| OptimizerError::OverrideConflict { song: id, detail })?;
        }

        let model = builder.build(song, fairness, rng);
        let solution = self.solver.solve(&model.problem)?;

        match solution.status {
            SolutionStatus::Optimal | SolutionStatus::Feasible => {}
            SolutionStatus::Infeasible => return Err(OptimizerError::Infeasible(id)),
            SolutionStatus::TimeLimit => return Err(OptimizerError::SolverTimeout(id)),
            status => {
                return Err(SolverError::ExecutionFailed(format!(
                    "{} returned {} for {}",
                    self.solver.name(),
                    status,
                    id
                ))
                .into())
            }
        }

        let part_order: BTreeMap<_, _> = song.parts.iter().map(|p| (p.id, p.order)).collect();
        let mut assignments: Vec<Assignment> = model
            .selected_edges(&solution, song)
            .into_iter()
            .map(|(edge, from_override)| Assignment {
                member: edge.member,
                instrument: edge.instrument,
                part: edge.part,
                tier: edge.tier,
                from_override,
            })
            .collect();
        assignments.sort_by_cached_key(|a| {
            (
                part_order.get(&a.part).copied().unwrap_or(u32::MAX),
                snapshot.member_name(a.member),
                a.member,
            )
        });

        let covered: BTreeSet<_> = assignments
            .iter()
            .filter(|a| a.tier.covers_part())
            .map(|a| a.part)
            .collect();
        let unplayed_parts = song
            .parts
            .iter()
            .map(|p| p.id)
            .filter(|id| !covered.contains(id))
            .collect();

        let playing: BTreeSet<_> = assignments.iter().map(|a| a.member).collect();
        let unassigned_eligible_members = song
            .eligible_members()
            .into_iter()
            .filter(|m| !playing.contains(m))
            .collect();

        let mut used: BTreeMap<_, u32> = BTreeMap::new();
        for a in &assignments {
            *used.entry(a.instrument).or_default() += 1;
        }
        let remaining_instrument_capacity = snapshot
            .inventory
            .iter()
            .map(|(&instrument, &count)| {
                let left = count.saturating_sub(used.get(&instrument).copied().unwrap_or(0));
                (instrument, left)
            })
            .filter(|&(_, left)| left != 0)
            .collect();

        Ok(SongAssignments {
            song: song.song.id,
            title: song.song.title.clone(),
            assignments,
            score: model.score(&solution),
            objective: solution.optimal_value.unwrap_or_default(),
            unplayed_parts,
            unassigned_eligible_members,
            remaining_instrument_capacity,
            statistics: solution.statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Song, SongId};

    fn facts(id: u32, title: &str, pool: usize) -> SongFacts {
        SongFacts {
            song: Song {
                id: SongId(id),
                title: title.into(),
                in_rotation: true,
            },
            parts: Vec::new(),
            candidates: vec![
                crate::domain::CapabilityEdge {
                    member: crate::domain::MemberId(1),
                    part: crate::domain::SongPartId(1),
                    instrument: crate::domain::InstrumentId(1),
                    tier: crate::domain::ReadinessTier::Ready,
                };
                pool
            ],
            overrides: Vec::new(),
        }
    }

    fn result(title: &str, score: f64) -> SongAssignments {
        SongAssignments {
            song: SongId(0),
            title: title.into(),
            assignments: Vec::new(),
            score,
            objective: 0.0,
            unplayed_parts: BTreeSet::new(),
            unassigned_eligible_members: BTreeSet::new(),
            remaining_instrument_capacity: BTreeMap::new(),
            statistics: Default::default(),
        }
    }

    #[test]
    fn smallest_pool_goes_first() {
        let songs = vec![facts(1, "a", 3), facts(2, "b", 1), facts(3, "c", 3), facts(4, "d", 0)];
        let order: Vec<u32> = processing_order(&songs).iter().map(|s| s.song.id.0).collect();
        assert_eq!(order, vec![4, 2, 1, 3]);
    }

    #[test]
    fn ranking_is_score_then_title() {
        let mut results = vec![
            result("Moondance", 10.0),
            result("Africa", 10.0),
            result("Zebra", 42.0),
        ];
        results.sort_by(rank_songs);
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Zebra", "Africa", "Moondance"]);
    }

}
