use thiserror::Error;

use crate::providers::{AdapterError, ProviderError};
use crate::services::entitlement::Denial;

/// Business failure of a creation request. Rendered as a 200 envelope.
#[derive(Debug, Error)]
pub enum CreationError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", .0.message())]
    EntitlementDenied(Denial),

    #[error(transparent)]
    Provider(ProviderError),

    /// Store failure; the underlying error is logged, never sent to the client
    #[error("Failed to save creation")]
    Persistence,
}

impl CreationError {
    /// Message placed in the envelope
    pub fn client_message(&self) -> String {
        self.to_string()
    }
}

impl From<AdapterError> for CreationError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Validation(message) => CreationError::Validation(message),
            AdapterError::Provider(provider) => CreationError::Provider(provider),
        }
    }
}

impl From<Denial> for CreationError {
    fn from(denial: Denial) -> Self {
        CreationError::EntitlementDenied(denial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_messages_reach_the_client_verbatim() {
        let err = CreationError::from(Denial::QuotaExhausted);
        assert_eq!(err.client_message(), "Limit reached. Upgrade to continue.");

        let err = CreationError::from(Denial::PremiumRequired);
        assert_eq!(
            err.client_message(),
            "This feature is only available for premium subscriptions"
        );
    }

    #[test]
    fn adapter_errors_keep_their_category() {
        let err = CreationError::from(AdapterError::validation("Prompt is required"));
        assert!(matches!(err, CreationError::Validation(ref m) if m == "Prompt is required"));

        let err = CreationError::from(AdapterError::Provider(ProviderError::Timeout {
            provider: "clipdrop",
        }));
        assert_eq!(err.client_message(), "clipdrop request timed out");
    }

    #[test]
    fn persistence_message_hides_store_details() {
        assert_eq!(CreationError::Persistence.client_message(), "Failed to save creation");
    }
}
