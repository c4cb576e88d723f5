//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven
//! adapters (databases, caches, the planting provider). Each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

mod activity_log;
mod cache_key;
mod carbon_ledger;
mod dashboard_cache;
mod learning_paths;
mod plantation_ledger;
mod planting_provider;
mod user_directory;

#[cfg(test)]
pub use activity_log::MockActivityLog;
pub use activity_log::{ActivityLog, ActivityLogError};
pub use cache_key::{CacheKey, CacheKeyValidationError};
#[cfg(test)]
pub use carbon_ledger::MockCarbonLedger;
pub use carbon_ledger::{CarbonLedger, CarbonLedgerError};
#[cfg(test)]
pub use dashboard_cache::MockDashboardCache;
pub use dashboard_cache::{DashboardCache, DashboardCacheError, NoOpDashboardCache};
#[cfg(test)]
pub use learning_paths::MockLearningPathRepository;
pub use learning_paths::{LearningPathRepository, LearningPathRepositoryError};
#[cfg(test)]
pub use plantation_ledger::MockPlantationLedger;
pub use plantation_ledger::{PlantationLedger, PlantationLedgerError};
#[cfg(test)]
pub use planting_provider::MockPlantingProvider;
pub use planting_provider::{PlantingProvider, PlantingProviderError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
