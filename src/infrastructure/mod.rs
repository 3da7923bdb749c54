// Infrastructure: fact storage, config files, async execution

pub mod config;
pub mod memory_store;
pub mod runner;

pub use config::{load_config, parse_config};
pub use memory_store::{FactsDocument, GigFacts, InMemoryFactStore};
pub use runner::{run_gig, RunConfig};
