//! Domain core: models, pure aggregators, rule engines, and services.
//!
//! Purpose: keep every algorithmic piece of the engine behind strongly
//! typed, transport-agnostic entry points. Adapters live on the other
//! side of [`ports`]; nothing in here performs I/O except through those
//! traits.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failure payload.
//! - [`UserId`] / [`UserProfile`] — identity primitives.
//! - `telemetry`, `carbon`, `plantation`, `learning`, `activity` —
//!   records and pure aggregation.
//! - `insights` — recommendation/badge rule engines and the eco-score.
//! - `carbon_service`, `plantation_service`, `learning_service`,
//!   `dashboard` — the driving services.

pub mod activity;
pub mod carbon;
pub mod carbon_service;
pub mod dashboard;
pub mod error;
pub mod insights;
pub mod learning;
pub mod learning_service;
pub mod plantation;
pub mod plantation_service;
pub mod ports;
pub mod telemetry;
pub mod user;

pub use self::carbon_service::CarbonTrackingService;
pub use self::dashboard::{DashboardPorts, DashboardService, DashboardSnapshot};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::learning_service::LearningProgressService;
pub use self::plantation_service::{PlantationService, SyncReport};
pub use self::user::{UserId, UserIdValidationError, UserProfile};
