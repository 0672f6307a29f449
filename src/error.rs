//! Error types for linked data authority operations.
//!
//! This module provides the [`LinkedDataError`] type for all lookup and
//! search operations and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all linked data authority operations.
///
/// Configuration errors are raised synchronously while resolving an
/// authority or building a request, before any network call is made.
/// Transport errors are classified (never retried) and always carry the
/// URL and host/port of the failed request.
#[derive(Error, Debug)]
pub enum LinkedDataError {
    /// The named authority is unknown, or a subauthority could not be resolved.
    #[error("Invalid linked data authority: {0}")]
    InvalidLinkedDataAuthority(String),

    /// A configuration block is missing a required element or is malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The authority does not configure the requested action.
    #[error("Authority {authority} does not support the {action} action")]
    UnsupportedAction {
        /// Name of the authority.
        authority: String,
        /// Action that was requested (`search` or `term`).
        action: String,
    },

    /// The caller supplied an incomplete or unusable request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// RDF content could not be parsed.
    #[error("RDF parse error: {0}")]
    RdfParse(String),

    /// The requested term does not exist at the authority.
    #[error("Term not found: {url}")]
    TermNotFound {
        /// URL that was fetched.
        url: String,
    },

    /// The remote authority is temporarily unavailable.
    #[error("Service unavailable: {host}:{port} is not responding for {url}")]
    ServiceUnavailable {
        /// Host of the remote authority.
        host: String,
        /// Port of the remote authority.
        port: u16,
        /// URL that was fetched.
        url: String,
    },

    /// Any other failure while fetching or parsing the authority graph.
    #[error("Service error from {host}:{port} for {url}: {message}")]
    ServiceError {
        /// Host of the remote authority.
        host: String,
        /// Port of the remote authority.
        port: u16,
        /// URL that was fetched.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// IO error while reading authority configuration.
    #[error("IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Authority configuration is not valid JSON.
    #[error("JSON error: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

impl LinkedDataError {
    /// Returns true for errors raised while resolving configuration.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLinkedDataAuthority(_)
                | Self::InvalidConfiguration(_)
                | Self::ConfigIo(_)
                | Self::ConfigJson(_)
        )
    }

    /// Returns true for errors that originate from the remote service.
    #[must_use]
    pub const fn is_service_error(&self) -> bool {
        matches!(
            self,
            Self::TermNotFound { .. } | Self::ServiceUnavailable { .. } | Self::ServiceError { .. }
        )
    }
}

/// Convenience type alias for [`std::result::Result`] with [`LinkedDataError`].
pub type Result<T> = std::result::Result<T, LinkedDataError>;
