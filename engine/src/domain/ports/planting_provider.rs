//! Port for the external tree-planting provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::UserId;

/// Errors raised by planting provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlantingProviderError {
    /// Provider is unreachable or timing out.
    #[error("planting provider unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Provider rejected the confirmation request.
    #[error("planting provider rejected the request: {message}")]
    Rejected {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl PlantingProviderError {
    /// Helper for outages.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Helper for rejected confirmations.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Port for confirming plant actions with the external provider.
///
/// The provider is optional: services hold `Option<Arc<dyn
/// PlantingProvider>>` and treat `None` as the valid disabled state, not
/// an error. Confirmation is best-effort; a failure leaves the ledger
/// record `Pending` for a later sync pass.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlantingProvider: Send + Sync {
    /// Confirm a plant action, returning the provider-side identifier.
    async fn confirm_planting(
        &self,
        trees: u32,
        project: &str,
        user_id: &UserId,
    ) -> Result<String, PlantingProviderError>;
}
