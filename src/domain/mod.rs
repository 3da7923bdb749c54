// Domain module: band facts, the 0/1 program model and the solver contract

pub mod assignment;
pub mod band;
pub mod error;
pub mod models;
pub mod solver_service;
pub mod value_objects;

pub use assignment::*;
pub use band::*;
pub use error::{OptimizerError, StoreError};
pub use models::*;
pub use solver_service::{SolverError, SolverService};
pub use value_objects::*;
