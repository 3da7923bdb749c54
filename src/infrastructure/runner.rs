// Infrastructure: run the synchronous optimizer off the async executor
// The budget is enforced by cancelling at the next song boundary

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::application::{FactStore, GigOptimizer};
use crate::domain::{GigAssignments, GigId, OptimizerError, SolverError};

pub struct RunConfig {
    pub gig: GigId,
    /// Wall-clock budget for the whole gig; `None` waits indefinitely
    pub budget: Option<Duration>,
}

impl RunConfig {
    pub fn new(gig: GigId) -> Self {
        Self { gig, budget: None }
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }
}

pub async fn run_gig(
    optimizer: Arc<GigOptimizer>,
    store: Arc<dyn FactStore>,
    config: RunConfig,
) -> Result<GigAssignments, OptimizerError> {
    let gig = config.gig;
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();

    let mut handle = tokio::task::spawn_blocking(move || {
        optimizer.optimize_with_cancel(store.as_ref(), gig, &worker_cancel)
    });

    let joined = match config.budget {
        None => handle.await,
        Some(budget) => match tokio::time::timeout(budget, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(
                    gig = %gig,
                    budget_ms = budget.as_millis() as u64,
                    "Run budget exceeded, cancelling at the next song boundary"
                );
                cancel.cancel();
                handle.await
            }
        },
    };

    joined.map_err(|e| {
        OptimizerError::Solver(SolverError::ExecutionFailed(format!(
            "optimizer task failed: {}",
            e
        )))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::OptimizerConfig;
    use crate::domain::{
        Attendance, AttendanceStatus, CapabilityEdge, GigInstrument, InstrumentId, Member,
        MemberId, OptimizationProblem, ReadinessTier, Solution, SolverService, Song, SongId,
        SongPart, SongPartId,
    };
    use crate::infrastructure::{FactsDocument, GigFacts, InMemoryFactStore};
    use crate::solver::MicroLpSolver;

    struct SlowSolver(Duration);

    impl SolverService for SlowSolver {
        fn solve(
            &self,
            problem: &OptimizationProblem,
        ) -> crate::domain::solver_service::Result<Solution> {
            std::thread::sleep(self.0);
            Ok(Solution::optimal(0.0, vec![0.0; problem.num_variables()]))
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn store(songs: u32) -> Arc<dyn FactStore> {
        let doc = FactsDocument {
            members: vec![Member {
                id: MemberId(1),
                name: "Solo".into(),
            }],
            songs: (1..=songs)
                .map(|i| Song {
                    id: SongId(i),
                    title: format!("Song {}", i),
                    in_rotation: true,
                })
                .collect(),
            parts: (1..=songs)
                .map(|i| SongPart {
                    id: SongPartId(i),
                    song: SongId(i),
                    name: "melody".into(),
                    order: 0,
                })
                .collect(),
            capabilities: (1..=songs)
                .map(|i| CapabilityEdge {
                    member: MemberId(1),
                    part: SongPartId(i),
                    instrument: InstrumentId(1),
                    tier: ReadinessTier::Ready,
                })
                .collect(),
            gigs: vec![GigFacts {
                id: GigId(1),
                name: "Gig".into(),
                attendance: vec![Attendance {
                    member: MemberId(1),
                    status: AttendanceStatus::Available,
                }],
                inventory: vec![GigInstrument {
                    instrument: InstrumentId(1),
                    count: 1,
                }],
                ..Default::default()
            }],
        };
        Arc::new(InMemoryFactStore::from_document(doc))
    }

    #[tokio::test]
    async fn runs_to_completion_without_budget() {
        let optimizer = Arc::new(GigOptimizer::new(
            Arc::new(MicroLpSolver::new()),
            OptimizerConfig::default(),
        ));
        let result = run_gig(optimizer, store(2), RunConfig::new(GigId(1)))
            .await
            .unwrap();
        assert_eq!(result.songs.len(), 2);
        assert_eq!(result.member_song_counts.get(&MemberId(1)), Some(&2));
    }

    #[tokio::test]
    async fn budget_cancels_between_songs() {
        let optimizer = Arc::new(GigOptimizer::new(
            Arc::new(SlowSolver(Duration::from_millis(300))),
            OptimizerConfig::default(),
        ));
        let config = RunConfig::new(GigId(1)).with_budget(Duration::from_millis(100));

        match run_gig(optimizer, store(3), config).await {
            Err(OptimizerError::Cancelled { completed }) => assert_eq!(completed, 1),
            other => panic!("expected cancellation, got {:?}", other.map(|r| r.songs.len())),
        }
    }

    #[tokio::test]
    async fn unknown_gig_surfaces_data_unavailable() {
        let optimizer = Arc::new(GigOptimizer::new(
            Arc::new(MicroLpSolver::new()),
            OptimizerConfig::default(),
        ));
        let err = run_gig(optimizer, store(1), RunConfig::new(GigId(42)))
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizerError::DataUnavailable(_)));
    }
}
