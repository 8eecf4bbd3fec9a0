use std::sync::Arc;

use crate::domain::{
    relaxation::RelaxationSolver,
    solver_service::{Result, SolverError},
    value_objects::RelaxationBackend,
};

/// Factory for creating relaxation solvers based on configuration
pub struct RelaxationFactory;

impl RelaxationFactory {
    /// Create the relaxation solver for a backend
    pub fn create(backend: RelaxationBackend) -> Result<Arc<dyn RelaxationSolver>> {
        match backend {
            RelaxationBackend::Auto => Self::default_solver(),
            RelaxationBackend::MicroLp => Self::microlp(),
            RelaxationBackend::CoinCbc => Self::coin_cbc(),
            RelaxationBackend::Highs => Self::highs(),
        }
    }

    /// Get the preferred compiled-in solver (HiGHS, then CBC, then microlp)
    pub fn default_solver() -> Result<Arc<dyn RelaxationSolver>> {
        match Self::available_backends().first() {
            Some(&backend) => Self::create(backend),
            None => Err(SolverError::SolverNotAvailable(
                "no LP backend compiled in; enable `microlp`, `coin_cbc` or `highs`".to_string(),
            )),
        }
    }

    /// Backends compiled into this build, in order of preference
    pub fn available_backends() -> Vec<RelaxationBackend> {
        let mut backends = Vec::new();
        if cfg!(feature = "highs") {
            backends.push(RelaxationBackend::Highs);
        }
        if cfg!(feature = "coin_cbc") {
            backends.push(RelaxationBackend::CoinCbc);
        }
        if cfg!(feature = "microlp") {
            backends.push(RelaxationBackend::MicroLp);
        }
        backends
    }

    #[cfg(feature = "microlp")]
    fn microlp() -> Result<Arc<dyn RelaxationSolver>> {
        Ok(Arc::new(super::MicroLpRelaxation::new()))
    }

    #[cfg(not(feature = "microlp"))]
    fn microlp() -> Result<Arc<dyn RelaxationSolver>> {
        Err(not_compiled(RelaxationBackend::MicroLp, "microlp"))
    }

    #[cfg(feature = "coin_cbc")]
    fn coin_cbc() -> Result<Arc<dyn RelaxationSolver>> {
        Ok(Arc::new(super::CoinCbcRelaxation::new()))
    }

    #[cfg(not(feature = "coin_cbc"))]
    fn coin_cbc() -> Result<Arc<dyn RelaxationSolver>> {
        Err(not_compiled(RelaxationBackend::CoinCbc, "coin_cbc"))
    }

    #[cfg(feature = "highs")]
    fn highs() -> Result<Arc<dyn RelaxationSolver>> {
        Ok(Arc::new(super::HighsRelaxation::new()))
    }

    #[cfg(not(feature = "highs"))]
    fn highs() -> Result<Arc<dyn RelaxationSolver>> {
        Err(not_compiled(RelaxationBackend::Highs, "highs"))
    }
}

#[allow(dead_code)]
fn not_compiled(backend: RelaxationBackend, feature: &str) -> SolverError {
    SolverError::SolverNotAvailable(format!(
        "{} (enable the `{}` feature)",
        backend, feature
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "microlp")]
    fn test_microlp_is_available() {
        assert!(RelaxationFactory::available_backends().contains(&RelaxationBackend::MicroLp));
        let solver = RelaxationFactory::create(RelaxationBackend::MicroLp).unwrap();
        assert_eq!(solver.name(), "microlp");
        assert!(RelaxationFactory::create(RelaxationBackend::Auto).is_ok());
    }

    #[test]
    #[cfg(not(feature = "highs"))]
    fn test_missing_backend_is_reported() {
        match RelaxationFactory::create(RelaxationBackend::Highs) {
            Err(SolverError::SolverNotAvailable(message)) => assert!(message.contains("highs")),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(solver) => panic!("unexpected solver: {}", solver.name()),
        }
    }
}
