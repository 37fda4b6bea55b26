use thiserror::Error;

/// Errors produced by the ephemeris store, queries and refresh cycle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EphemerisError {
    /// Nothing is loaded (never refreshed, or wiped).
    #[error("Empty data set")]
    EmptyStore,

    /// No state vector carries exactly this epoch string.
    #[error("Epoch {0} not found")]
    EpochNotFound(String),

    /// `limit` / `offset` were supplied but are not non-negative integers.
    #[error("Parameters limit and offset must be integers")]
    InvalidParameter,

    #[error("Malformed epoch: {0}")]
    MalformedEpoch(String),

    /// Upstream retrieval failed (network, HTTP status, file read).
    #[error("Failed to fetch ephemeris: {0}")]
    Fetch(String),

    /// The fetched document is not a well-formed OEM.
    #[error("Failed to parse ephemeris: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, EphemerisError>;
