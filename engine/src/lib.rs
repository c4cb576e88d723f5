//! Carbon footprint and engagement analytics engine.
//!
//! The crate computes a user's digital-learning carbon footprint, converts
//! it into a tree-offset requirement, aggregates plantation and
//! learning-path ledgers, and composes the three into a dashboard snapshot
//! (eco-score, badges, recommendations). Persistence, caching, and the
//! external planting provider are consumed through the ports in
//! [`domain::ports`]; this crate contains no transport or storage
//! implementation.

pub mod config;
pub mod domain;
pub mod logging;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::EngineConfig;
