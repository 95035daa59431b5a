// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Kalamari HTTP - Browser-like HTTP client
//!
//! A blocking HTTP client whose requests look like they come from a desktop
//! web browser. Built on `reqwest`.
//!
//! ## Features
//!
//! - Browser default headers: added only where the caller has not set them
//! - Cookie management: one jar per client, public-suffix aware
//! - Proxy: optional single proxy for all traffic, validated per request
//! - Interception: inspect, rewrite or cancel any request before it is sent
//! - Explicit copies: independent clients with the same configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use kalamari_http::{BrowserClient, ClientConfig, InterceptAction, Request};
//! use std::time::Duration;
//!
//! fn main() -> kalamari_http::Result<()> {
//!     let config = ClientConfig::default()
//!         .timeout(Duration::from_secs(10))
//!         .interceptor(|req: &mut Request| {
//!             println!("{} {}", req.method, req.url);
//!             InterceptAction::Continue
//!         });
//!     let client = BrowserClient::with_config(config)?;
//!
//!     let page = client.get("https://example.com")?;
//!     println!("{} ({} bytes)", page.status, page.body_len());
//!
//!     client.post_form("https://example.com/login", [("user", "admin")])?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod network;

// Re-exports for convenience

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    BrowserClient, ClientConfig, Cookie, CookieJar, ReqwestTransport, Request, RequestBuilder,
    Response, SameSite, Transport,
};

// Network
pub use network::{
    HostBlocker, InterceptAction, InterceptorChain, RequestInterceptor, RequestLogger,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
