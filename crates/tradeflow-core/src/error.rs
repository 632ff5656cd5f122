//! Centralized error types for Tradeflow.

use thiserror::Error;

/// Main error type for Tradeflow operations.
#[derive(Error, Debug)]
pub enum TradeflowError {
    #[error("Contract not found: {0}")]
    ContractNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Invalid state transition for {entity}: cannot move from '{from}' to '{to}'")]
    InvalidStateTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Role '{role}' may not {action}")]
    Unauthorized { role: String, action: String },

    #[error("Unknown role: {0} (expected seller, admin, financier or buyer)")]
    InvalidRole(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not signed in. Run 'tradeflow login' or pass --as <role>.")]
    NotSignedIn,

    #[error("Store error: {0}")]
    Store(#[from] tradeflow_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for Tradeflow operations.
pub type TradeflowResult<T> = Result<T, TradeflowError>;

impl TradeflowError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ContractNotFound(_)
                | Self::ProjectNotFound(_)
                | Self::InvoiceNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::ClientNotFound(_)
                | Self::Store(tradeflow_store::StoreError::NotFound(_))
        )
    }
}
