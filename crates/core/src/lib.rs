//! Shared building blocks for the campaign analytics core: metric inputs,
//! grades, industry benchmarks, configuration, errors, and the caller-owned
//! in-memory repository.

pub mod benchmarks;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use benchmarks::{BenchmarkTable, IndustryBenchmark, MetricTiers, TierSet};
pub use config::InsightsConfig;
pub use error::{CampaignError, CampaignResult};
pub use store::{Entity, InMemoryRepository};
pub use types::{Campaign, CampaignCounts, CampaignStatus, Grade, MetricKind, MetricSet};
