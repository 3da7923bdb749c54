use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
#[cfg(feature = "coin_cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
use crate::solver::MicroLpSolver;
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    ///
    /// Fails with [`SolverError::SolverNotAvailable`] when the backend's
    /// cargo feature is not compiled in.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Ok(Self::default_solver()),
            SolverBackend::MicroLp => Ok(Arc::new(MicroLpSolver::new())),
            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => Ok(Arc::new(CoinCbcSolver::new())),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Ok(Arc::new(HighsSolver::new())),
            #[allow(unreachable_patterns)]
            other => Err(SolverError::SolverNotAvailable(format!(
                "{} support was not compiled into this build",
                other
            ))),
        }
    }

    /// Strongest compiled-in backend: HiGHS, then CBC, then microlp
    pub fn default_solver() -> Arc<dyn SolverService> {
        strongest_backend()
    }
}

#[cfg(feature = "highs")]
fn strongest_backend() -> Arc<dyn SolverService> {
    Arc::new(HighsSolver::new())
}

#[cfg(all(feature = "coin_cbc", not(feature = "highs")))]
fn strongest_backend() -> Arc<dyn SolverService> {
    Arc::new(CoinCbcSolver::new())
}

#[cfg(not(any(feature = "coin_cbc", feature = "highs")))]
fn strongest_backend() -> Arc<dyn SolverService> {
    Arc::new(MicroLpSolver::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn microlp_is_always_available() {
        let solver = SolverFactory::create_from_backend(SolverBackend::MicroLp).unwrap();
        assert_eq!(solver.name(), "microlp");
    }

    #[test]
    fn auto_resolves_to_a_backend() {
        let solver = SolverFactory::create_from_backend(SolverBackend::Auto).unwrap();
        assert!(!solver.name().is_empty());
    }

    #[cfg(not(feature = "highs"))]
    #[test]
    fn missing_feature_is_reported() {
        match SolverFactory::create_from_backend(SolverBackend::Highs) {
            Err(SolverError::SolverNotAvailable(msg)) => assert!(msg.contains("HiGHS")),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("HiGHS should not be available without the feature"),
        }
    }
}
