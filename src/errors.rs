// ABOUTME: Unified application error type with stable error codes for the meal planner
// ABOUTME: Wraps provider, nutrition, configuration and I/O failures behind AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! [`AppError`] is what callers outside the generation core see: the batch
//! driver, configuration loading and logging setup. The generation pipeline
//! itself speaks [`ProviderError`](crate::llm::ProviderError), which converts
//! into an `AppError` with a matching [`ErrorCode`].

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use thiserror::Error;

use crate::llm::{ProviderError, ProviderErrorKind};
use crate::nutrition::{AllocationError, ConfigError, ProfileError, ScaleError};

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request input failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field is missing
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// A numeric value is outside its allowed range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // External Services (5000-5999)
    /// The text-generation backend failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// The text-generation backend could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// The text-generation backend rejected our credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// The text-generation backend is rate limiting us
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,
    /// The backend answered with something that is not a valid recipe
    #[serde(rename = "EXTERNAL_RESPONSE_INVALID")]
    ExternalResponseInvalid = 5004,

    // Configuration (6000-6999)
    /// Configuration error encountered
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Filesystem operation failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Serialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// HTTP status for consumers exposing the planner over HTTP
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,
            Self::ExternalRateLimited => 429,
            Self::ExternalServiceError | Self::ExternalResponseInvalid => 502,
            Self::ExternalServiceUnavailable | Self::ExternalAuthFailed => 503,
            Self::ConfigError
            | Self::InternalError
            | Self::StorageError
            | Self::SerializationError => 500,
        }
    }

    /// Short user-facing description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ExternalServiceError => "The recipe generation service encountered an error",
            Self::ExternalServiceUnavailable => {
                "The recipe generation service is currently unavailable"
            }
            Self::ExternalAuthFailed => "Authentication with the recipe generation service failed",
            Self::ExternalRateLimited => "Recipe generation service rate limit exceeded",
            Self::ExternalResponseInvalid => "The generated recipe could not be understood",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        if matches!(error, ProviderError::Validation { missing: true, .. }) {
            return Self::new(ErrorCode::MissingRequiredField, error.to_string()).with_source(error);
        }
        let code = match error.kind() {
            ProviderErrorKind::InvalidCredentials => ErrorCode::ExternalAuthFailed,
            ProviderErrorKind::RateLimited => ErrorCode::ExternalRateLimited,
            ProviderErrorKind::Network => ErrorCode::ExternalServiceUnavailable,
            ProviderErrorKind::Parsing => ErrorCode::ExternalResponseInvalid,
            ProviderErrorKind::Validation => ErrorCode::InvalidInput,
            ProviderErrorKind::Configuration => ErrorCode::ConfigError,
            ProviderErrorKind::Unknown => ErrorCode::ExternalServiceError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<AllocationError> for AppError {
    fn from(error: AllocationError) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, error.to_string()).with_source(error)
    }
}

impl From<ScaleError> for AppError {
    fn from(error: ScaleError) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, error.to_string()).with_source(error)
    }
}

impl From<ProfileError> for AppError {
    fn from(error: ProfileError) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, error.to_string()).with_source(error)
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorCode::ConfigError, error.to_string()).with_source(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::new(ErrorCode::StorageError, error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}
