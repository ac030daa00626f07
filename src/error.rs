//! Error types for the planning pipeline.
//!
//! Per-address and per-group failures are values the pipeline collects and
//! logs; only [`PlanError`] is returned to callers of a planning run.

use std::fmt;

/// Failure to turn an address into coordinates.
#[derive(Debug)]
pub enum GeocodeError {
    /// The provider answered with a non-success status.
    Status { status: String, message: Option<String> },
    /// The provider answered OK but returned no candidates.
    NoResults,
    Http(reqwest::Error),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Status { status, message: Some(message) } => {
                write!(f, "geocoder returned {}: {}", status, message)
            }
            GeocodeError::Status { status, message: None } => {
                write!(f, "geocoder returned {}", status)
            }
            GeocodeError::NoResults => write!(f, "geocoder returned no results"),
            GeocodeError::Http(err) => write!(f, "geocoder request failed: {}", err),
        }
    }
}

impl std::error::Error for GeocodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeocodeError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err)
    }
}

/// Failure to sequence a single route group.
#[derive(Debug)]
pub enum SequencingError {
    /// Groups need a start and an end.
    InsufficientStops { stops: usize },
    /// The route-ordering provider answered with a non-success status.
    ProviderStatus { status: String, message: Option<String> },
    Http(reqwest::Error),
    /// The provider answered OK with a body the sequencer cannot use.
    MalformedResponse(String),
}

impl fmt::Display for SequencingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencingError::InsufficientStops { stops } => {
                write!(f, "route group has {} stop(s), at least 2 are required", stops)
            }
            SequencingError::ProviderStatus { status, message: Some(message) } => {
                write!(f, "route provider returned {}: {}", status, message)
            }
            SequencingError::ProviderStatus { status, message: None } => {
                write!(f, "route provider returned {}", status)
            }
            SequencingError::Http(err) => write!(f, "route request failed: {}", err),
            SequencingError::MalformedResponse(detail) => {
                write!(f, "malformed route response: {}", detail)
            }
        }
    }
}

impl std::error::Error for SequencingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SequencingError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SequencingError {
    fn from(err: reqwest::Error) -> Self {
        SequencingError::Http(err)
    }
}

/// A route group that could not be turned into a route.
#[derive(Debug)]
pub struct GroupFailure {
    pub route_number: usize,
    pub stops: usize,
    pub error: SequencingError,
}

impl fmt::Display for GroupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route {} ({} stops): {}", self.route_number, self.stops, self.error)
    }
}

impl std::error::Error for GroupFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Why geographic grouping could not run.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupingError {
    /// Every address fell back to the sentinel coordinates.
    NoResolvedPoints,
    NonFiniteCoordinate { address: String },
    ZeroCapacity,
}

impl fmt::Display for GroupingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingError::NoResolvedPoints => write!(f, "no address could be geocoded"),
            GroupingError::NonFiniteCoordinate { address } => {
                write!(f, "non-finite coordinates for {}", address)
            }
            GroupingError::ZeroCapacity => write!(f, "group capacity must be at least 1"),
        }
    }
}

impl std::error::Error for GroupingError {}

/// Missing or unusable configuration for an external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} is not configured", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by a planning run.
#[derive(Debug)]
pub enum PlanError {
    InvalidInput(String),
    ConfigurationMissing(String),
    /// Not a single group could be sequenced.
    BatchFailure { groups: usize },
    WorkerPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidInput(detail) => write!(f, "invalid input: {}", detail),
            PlanError::ConfigurationMissing(detail) => {
                write!(f, "configuration missing: {}", detail)
            }
            PlanError::BatchFailure { groups } => write!(
                f,
                "no routes could be created from {} group(s), check the addresses and try again",
                groups
            ),
            PlanError::WorkerPool(err) => write!(f, "failed to start worker pool: {}", err),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::WorkerPool(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for PlanError {
    fn from(err: ConfigError) -> Self {
        PlanError::ConfigurationMissing(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for PlanError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        PlanError::WorkerPool(err)
    }
}

/// Failure reading addresses from the voter store.
#[derive(Debug)]
pub enum StoreError {
    Http(reqwest::Error),
    Status { code: u16, body: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Http(err) => write!(f, "voter store request failed: {}", err),
            StoreError::Status { code, body } => {
                write!(f, "voter store returned HTTP {}: {}", code, body)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Http(err) => Some(err),
            StoreError::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Http(err)
    }
}
