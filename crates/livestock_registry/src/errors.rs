//! Error types for the livestock registry

use thiserror::Error;

/// Rejections produced by registry operations.
///
/// Every variant is a final validation or authorization failure. Callers
/// branch on [`RegistryError::code`], which is stable across releases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Hash already registered: {hash}")]
    HashExists { hash: String },

    #[error("Invalid record hash: must not be empty")]
    InvalidHash,

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Invalid breed: must be 1..={max} characters, got {len}")]
    InvalidBreed { len: usize, max: usize },

    #[error("Invalid birth date {birth_date}: later than current height {current_height}")]
    InvalidDate { birth_date: u64, current_height: u64 },

    #[error("Record is inactive: {hash}")]
    Inactive { hash: String },

    #[error("Authority contract has not been set")]
    AuthorityNotSet,

    #[error("Authority contract already set to {current}")]
    AuthorityAlreadySet { current: String },

    #[error("Capacity exceeded: {what} limit of {limit} reached")]
    MaxExceeded { what: &'static str, limit: u64 },

    #[error("Invalid description: at most {max} characters, got {len}")]
    InvalidDescription { len: usize, max: usize },

    #[error("Record not found: {hash}")]
    NotFound { hash: String },
}

impl RegistryError {
    /// Stable numeric code for this error kind.
    pub fn code(&self) -> u32 {
        match self {
            RegistryError::HashExists { .. } => 100,
            RegistryError::InvalidHash => 101,
            RegistryError::Unauthorized { .. } => 102,
            RegistryError::InvalidBreed { .. } => 103,
            RegistryError::InvalidDate { .. } => 104,
            RegistryError::Inactive { .. } => 105,
            RegistryError::AuthorityNotSet => 106,
            RegistryError::MaxExceeded { .. } => 107,
            RegistryError::InvalidDescription { .. } => 108,
            RegistryError::NotFound { .. } => 109,
            RegistryError::AuthorityAlreadySet { .. } => 110,
        }
    }

    /// Registry rejections are deterministic; resubmitting the same call
    /// against the same state yields the same error.
    pub fn is_retryable(&self) -> bool {
        false
    }

    pub(crate) fn unauthorized(reason: impl Into<String>) -> Self {
        RegistryError::Unauthorized {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading or validating [`crate::RegistryConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
