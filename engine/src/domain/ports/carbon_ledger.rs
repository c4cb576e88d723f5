//! Port for the append-only carbon ledger.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::carbon::{CarbonRecord, NewCarbonSession};
use crate::domain::user::UserId;

/// Errors raised by carbon ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarbonLedgerError {
    /// Ledger connection could not be established.
    #[error("carbon ledger connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query failed during execution.
    #[error("carbon ledger query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Append could not be committed.
    #[error("carbon ledger append failed: {message}")]
    Write {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl CarbonLedgerError {
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

    /// Helper for append failures.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Port for appending to and reading a user's carbon ledger.
///
/// ## Append contract
/// `append_session` must serialise the read-total-then-append sequence
/// per user: the returned record's `total_carbon` equals the user's
/// previous total plus the new `session_carbon` in commit order, and
/// `trees_needed` is derived from that total via
/// [`crate::domain::carbon::trees_needed`]. Two concurrent appends for
/// the same user must never observe the same prior total. Readers
/// observe either the pre- or post-append ledger, never a partial
/// record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarbonLedger: Send + Sync {
    /// Append one session atomically, deriving the running total.
    async fn append_session(
        &self,
        session: &NewCarbonSession,
    ) -> Result<CarbonRecord, CarbonLedgerError>;

    /// Read a user's records in append order.
    async fn list_for_user(&self, user_id: &UserId)
    -> Result<Vec<CarbonRecord>, CarbonLedgerError>;
}
