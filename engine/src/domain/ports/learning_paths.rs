//! Port for learning-path persistence.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::learning::LearningPathRecord;
use crate::domain::user::UserId;

/// Errors raised by learning-path repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LearningPathRepositoryError {
    /// Repository connection could not be established.
    #[error("learning path repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query failed during execution.
    #[error("learning path repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Write could not be committed.
    #[error("learning path repository write failed: {message}")]
    Write {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl LearningPathRepositoryError {
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

/// Port for storing and reading learning paths.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LearningPathRepository: Send + Sync {
    /// Fetch a path by identifier; `None` when unknown.
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<LearningPathRecord>, LearningPathRepositoryError>;

    /// Insert or update a path.
    async fn save(&self, record: &LearningPathRecord) -> Result<(), LearningPathRepositoryError>;

    /// Read a user's paths in creation order.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<LearningPathRecord>, LearningPathRepositoryError>;

    /// Read every path on a topic, across all users.
    async fn list_by_topic(
        &self,
        topic: &str,
    ) -> Result<Vec<LearningPathRecord>, LearningPathRepositoryError>;
}
