//! A/B experiment evaluation: two-proportion z-tests over variant
//! conversion data and the running/paused/completed test lifecycle.

pub mod engine;
pub mod significance;
pub mod stats;
pub mod types;

pub use engine::ExperimentEngine;
pub use significance::{variant_confidence, SignificanceEngine};
pub use types::{AbRecommendation, AbTest, AbTestStatus, AbVariant, SignificanceResult};
