// Application layer: loading facts, building per-song models, sequencing solves

pub mod config;
pub mod fairness;
pub mod model_builder;
pub mod overrides;
pub mod sequencer;
pub mod snapshot;

pub use config::{OptimizerConfig, ScoringConfig};
pub use fairness::FairnessAccumulator;
pub use model_builder::{ModelBuilder, SongModel, VariableRole};
pub use overrides::validate_song_overrides;
pub use sequencer::{processing_order, rank_songs, GigOptimizer};
pub use snapshot::{load_snapshot, FactSnapshot, FactStore, SongFacts};
