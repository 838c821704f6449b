//! Vehicle fitness scoring.
//!
//! Each vehicle earns up to two points for route efficiency, two for
//! projected fuel burn over the average route and two for load capacity.
//! Thresholds come from [`ScoringConfig`], which layers a JSON file and CLI
//! overrides on top of the built-in defaults.

pub mod config;
pub mod score;
pub mod types;

pub use config::ScoringConfig;
pub use score::{score_table, score_vehicle};
pub use types::{ScoreThresholds, ScoredConvoy, ScoredVehicle, VehicleRecord};
