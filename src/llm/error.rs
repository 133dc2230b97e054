// ABOUTME: Shared failure taxonomy for text-generation providers and the generation pipeline
// ABOUTME: ProviderError variants with retryable flags plus HTTP status and transport classifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Provider Errors
//!
//! Every adapter translates its backend's failures into a [`ProviderError`]
//! before returning, so nothing downstream ever inspects HTTP status codes.
//! The orchestrator decides whether to retry from [`ProviderError::kind`]
//! alone.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;
use thiserror::Error;

/// Boxed cause carried by provider errors
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Longest slice of raw provider text kept in error messages
const RAW_PREVIEW_CHARS: usize = 200;

/// Mutually exclusive failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderErrorKind {
    /// Backend rejected the credential
    InvalidCredentials,
    /// Backend is throttling requests
    RateLimited,
    /// Connection, DNS, timeout or server-side failure
    Network,
    /// Provider text could not be turned into a recipe
    Parsing,
    /// Request rejected before any network call
    Validation,
    /// Missing or inconsistent configuration
    Configuration,
    /// Anything the adapter could not classify
    Unknown,
}

impl ProviderErrorKind {
    /// Kebab-case label used in logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid-credentials",
            Self::RateLimited => "rate-limited",
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ProviderErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of a provider call or of the generation pipeline
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential rejected by the backend (401/403)
    #[error("{provider}: invalid credentials: {message}")]
    InvalidCredentials {
        /// Backend name
        provider: String,
        /// Backend message
        message: String,
        /// Original cause
        #[source]
        source: Option<BoxError>,
    },

    /// Backend throttled the request (429)
    #[error("{provider}: rate limited: {message}")]
    RateLimited {
        /// Backend name
        provider: String,
        /// Backend message
        message: String,
        /// Backend's `Retry-After` hint, when it sent one
        retry_after: Option<Duration>,
        /// Original cause
        #[source]
        source: Option<BoxError>,
    },

    /// Connection refused, DNS failure, timeout or 5xx
    #[error("{provider}: network error: {message}")]
    Network {
        /// Backend name
        provider: String,
        /// Failure description
        message: String,
        /// Original cause
        #[source]
        source: Option<BoxError>,
    },

    /// Provider text did not contain a valid recipe payload
    #[error("parsing error: {message} (raw: {})", preview(raw))]
    Parsing {
        /// What was wrong with the payload
        message: String,
        /// Full raw provider text for diagnostics
        raw: String,
        /// Original cause
        #[source]
        source: Option<BoxError>,
    },

    /// Generation request failed validation; never reaches the network
    #[error("validation error{}: {message}", field.as_ref().map(|f| format!(" on '{f}'")).unwrap_or_default())]
    Validation {
        /// Offending field, if a single one is to blame
        field: Option<String>,
        /// What is wrong
        message: String,
        /// The field was absent rather than out of range
        missing: bool,
    },

    /// Missing or inconsistent configuration
    #[error("configuration error: {message}")]
    Configuration {
        /// What is wrong
        message: String,
    },

    /// Unclassified backend failure
    #[error("{provider}: {message}")]
    Unknown {
        /// Backend name
        provider: String,
        /// Failure description
        message: String,
        /// HTTP status when the failure came from a response
        status: Option<u16>,
        /// Whether re-attempting may succeed
        retryable: bool,
        /// Original cause
        #[source]
        source: Option<BoxError>,
    },
}

fn preview(raw: &str) -> String {
    if raw.chars().count() > RAW_PREVIEW_CHARS {
        format!("{}...", raw.chars().take(RAW_PREVIEW_CHARS).collect::<String>())
    } else {
        raw.to_owned()
    }
}

impl ProviderError {
    /// Classification of this error
    #[must_use]
    pub const fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::InvalidCredentials { .. } => ProviderErrorKind::InvalidCredentials,
            Self::RateLimited { .. } => ProviderErrorKind::RateLimited,
            Self::Network { .. } => ProviderErrorKind::Network,
            Self::Parsing { .. } => ProviderErrorKind::Parsing,
            Self::Validation { .. } => ProviderErrorKind::Validation,
            Self::Configuration { .. } => ProviderErrorKind::Configuration,
            Self::Unknown { .. } => ProviderErrorKind::Unknown,
        }
    }

    /// Whether re-attempting the same call may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network { .. } => true,
            Self::Unknown { retryable, .. } => *retryable,
            Self::InvalidCredentials { .. }
            | Self::Parsing { .. }
            | Self::Validation { .. }
            | Self::Configuration { .. } => false,
        }
    }

    /// Raw provider text attached to a parsing error
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Parsing { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Invalid credentials
    pub fn invalid_credentials(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Rate limited, with an optional retry hint
    pub fn rate_limited(
        provider: impl Into<String>,
        message: impl Into<String>,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            message: message.into(),
            retry_after,
            source: None,
        }
    }

    /// Network failure
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Parsing failure carrying the raw provider text
    pub fn parsing(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parsing {
            message: message.into(),
            raw: raw.into(),
            source: None,
        }
    }

    /// Validation failure, optionally naming the offending field
    pub fn validation(field: Option<&str>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.map(ToOwned::to_owned),
            message: message.into(),
            missing: false,
        }
    }

    /// Validation failure for a required field that was not supplied
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            field: Some(field.to_owned()),
            message: format!("{field} is required"),
            missing: true,
        }
    }

    /// Configuration failure
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Unclassified failure (not retryable)
    pub fn unknown(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unknown {
            provider: provider.into(),
            message: message.into(),
            status: None,
            retryable: false,
            source: None,
        }
    }

    /// Attach the original cause
    #[must_use]
    pub fn with_source(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        let boxed: BoxError = Box::new(cause);
        match &mut self {
            Self::InvalidCredentials { source, .. }
            | Self::RateLimited { source, .. }
            | Self::Network { source, .. }
            | Self::Parsing { source, .. }
            | Self::Unknown { source, .. } => *source = Some(boxed),
            Self::Validation { .. } | Self::Configuration { .. } => {}
        }
        self
    }
}

/// Classify a non-success HTTP response from a backend
///
/// `message` is the backend's own error text when it could be extracted,
/// otherwise a truncated body.
#[must_use]
pub fn classify_http_status(
    provider: &str,
    status: u16,
    message: &str,
    retry_after: Option<Duration>,
) -> ProviderError {
    match status {
        401 | 403 => ProviderError::invalid_credentials(provider, message),
        429 => ProviderError::rate_limited(provider, message, retry_after),
        408 | 500..=599 => ProviderError::network(provider, format!("HTTP {status}: {message}")),
        _ => ProviderError::Unknown {
            provider: provider.to_owned(),
            message: format!("HTTP {status}: {message}"),
            status: Some(status),
            retryable: false,
            source: None,
        },
    }
}

/// Classify a transport-level failure from the HTTP client
#[must_use]
pub fn classify_transport_error(provider: &str, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::network(provider, "request timed out").with_source(error)
    } else if error.is_connect() {
        ProviderError::network(provider, format!("failed to connect: {error}")).with_source(error)
    } else if error.is_request() || error.is_body() {
        ProviderError::network(provider, format!("request failed: {error}")).with_source(error)
    } else {
        ProviderError::unknown(provider, format!("HTTP client error: {error}")).with_source(error)
    }
}

/// Parse a `Retry-After` header given in whole seconds
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Truncate a response body for inclusion in an error message
#[must_use]
pub fn truncate_body(body: &str) -> String {
    body.chars().take(RAW_PREVIEW_CHARS).collect()
}
