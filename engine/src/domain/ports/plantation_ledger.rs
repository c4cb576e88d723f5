//! Port for the plantation ledger.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::plantation::{PlantationRecord, PlantationStatus};
use crate::domain::user::UserId;

/// Errors raised by plantation ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlantationLedgerError {
    /// Ledger connection could not be established.
    #[error("plantation ledger connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query failed during execution.
    #[error("plantation ledger query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Write could not be committed.
    #[error("plantation ledger write failed: {message}")]
    Write {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Status update referenced a missing record.
    #[error("plantation record {id} not found")]
    RecordNotFound {
        /// Identifier the update referenced.
        id: Uuid,
    },
}

impl PlantationLedgerError {
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

    /// Helper for missing-record failures.
    pub fn record_not_found(id: Uuid) -> Self {
        Self::RecordNotFound { id }
    }
}

/// Port for writing and reading plantation records.
///
/// Records are append-only; `update_status` is the single permitted
/// mutation and only drives the `Pending` → `Confirmed` transition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlantationLedger: Send + Sync {
    /// Durably append a new record.
    async fn append(&self, record: &PlantationRecord) -> Result<(), PlantationLedgerError>;

    /// Update a record's confirmation status and provider identifier.
    async fn update_status(
        &self,
        id: &Uuid,
        status: PlantationStatus,
        external_id: Option<String>,
    ) -> Result<(), PlantationLedgerError>;

    /// Read a user's records.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PlantationRecord>, PlantationLedgerError>;

    /// Read every record still awaiting provider confirmation, across
    /// all users.
    async fn list_pending(&self) -> Result<Vec<PlantationRecord>, PlantationLedgerError>;
}
