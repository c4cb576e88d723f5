//! Port for reading user profiles.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::{UserId, UserProfile};

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDirectoryError {
    /// Directory connection could not be established.
    #[error("user directory connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query failed during execution.
    #[error("user directory query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl UserDirectoryError {
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
}

/// Port for proving a user exists and labelling outbound calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a profile by identifier; `None` when the user is unknown.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError>;
}
