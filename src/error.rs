// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the browser-like HTTP client
//!
//! Transport failures are carried through untouched in [`Error::Http`];
//! every other variant is raised by the client itself before anything
//! reaches the network.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    /// No request was handed to the client
    #[error("Request is empty")]
    EmptyRequest,

    /// The pre-send interceptor declined the request
    #[error("Request rejected by interceptor: {reason}")]
    InterceptorRejection { reason: String },

    /// The configured proxy could not be used
    #[error("Invalid proxy URL '{proxy}': {reason}")]
    ProxyConfig { proxy: String, reason: String },

    /// Body serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A header name or value was not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Error raised by the underlying HTTP stack (connect, TLS, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an interceptor rejection
    pub fn rejected(reason: impl Into<String>) -> Self {
        Error::InterceptorRejection {
            reason: reason.into(),
        }
    }

    /// Create a proxy configuration error
    pub fn proxy_config(proxy: impl Into<String>, reason: impl ToString) -> Self {
        Error::ProxyConfig {
            proxy: proxy.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if the interceptor stopped the request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::InterceptorRejection { .. })
    }

    /// Check if this is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }

    /// Check if this came from the network layer
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Rejection reason, if the interceptor stopped the request
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Error::InterceptorRejection { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeader(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for Error {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        Error::InvalidHeader(e.to_string())
    }
}
