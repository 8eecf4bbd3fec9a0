// Domain module: problem model, relaxation boundary and service contract

pub mod models;
pub mod relaxation;
pub mod solver_service;
pub mod value_objects;

pub use models::*;
pub use relaxation::*;
pub use solver_service::*;
pub use value_objects::*;
