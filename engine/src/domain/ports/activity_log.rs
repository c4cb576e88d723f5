//! Port for the per-user activity-date log backing streaks.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::user::UserId;

/// Errors raised by activity log adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityLogError {
    /// Log connection could not be established.
    #[error("activity log connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query failed during execution.
    #[error("activity log query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Write could not be committed.
    #[error("activity log write failed: {message}")]
    Write {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl ActivityLogError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for write failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Port for recording and reading activity days.
///
/// Recording the same user/day pair twice is permitted; the streak
/// derivation counts presence per calendar day.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Record one active day for a user.
    async fn record(&self, user_id: &UserId, date: NaiveDate) -> Result<(), ActivityLogError>;

    /// Read every recorded activity day for a user.
    async fn list_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, ActivityLogError>;
}
