//! Error types for the unical ecosystem.

use std::time::Duration;

use thiserror::Error;

use crate::source::SourceKind;

/// Errors raised outside the aggregation path (config, parsing, IO).
#[derive(Error, Debug)]
pub enum UnicalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Unknown timezone '{0}'. Use \"local\", \"UTC\", an IANA name or an offset like -05:00")]
    InvalidTimeZone(String),

    #[error("No source configured. Add a [source] table to {0}")]
    NoSourceConfigured(String),
}

/// Failure of a single source adapter call.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Source request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The single failure an aggregation reports when any source fails.
///
/// The cause is kept for diagnostics only; users see a generic message.
#[derive(Error, Debug)]
#[error(
    "Sync failed{}: {cause}",
    .source_kind.map(|kind| format!(" while fetching {kind}")).unwrap_or_default()
)]
pub struct SyncFailure {
    /// `None` when the join as a whole timed out.
    pub source_kind: Option<SourceKind>,
    #[source]
    pub cause: TransportError,
}

impl SyncFailure {
    pub fn new(source_kind: SourceKind, cause: TransportError) -> Self {
        SyncFailure {
            source_kind: Some(source_kind),
            cause,
        }
    }

    pub fn timed_out(limit: Duration) -> Self {
        SyncFailure {
            source_kind: None,
            cause: TransportError::Timeout(limit),
        }
    }
}

/// Result type alias for unical operations.
pub type UnicalResult<T> = Result<T, UnicalError>;
