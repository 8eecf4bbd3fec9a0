// Relaxation adapters: concrete implementations of RelaxationSolver

pub mod factory;
#[cfg(any(feature = "microlp", feature = "coin_cbc"))]
mod good_lp_model;

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc_relaxation;
#[cfg(feature = "highs")]
pub mod highs_relaxation;
#[cfg(feature = "microlp")]
pub mod microlp_relaxation;

#[cfg(feature = "coin_cbc")]
pub use coin_cbc_relaxation::CoinCbcRelaxation;
pub use factory::RelaxationFactory;
#[cfg(feature = "highs")]
pub use highs_relaxation::HighsRelaxation;
#[cfg(feature = "microlp")]
pub use microlp_relaxation::MicroLpRelaxation;
