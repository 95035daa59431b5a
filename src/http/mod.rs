// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! Provides a browser-like HTTP client with default headers, a
//! public-suffix-aware cookie jar, proxy support and request interception.

mod client;
mod config;
mod cookie;
mod request;
mod response;
mod transport;

pub use client::{BrowserClient, RequestBuilder};
pub use config::ClientConfig;
pub use cookie::{Cookie, CookieJar, SameSite};
pub use request::Request;
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

use reqwest::header::{HeaderMap, HeaderValue};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/66.0.3359.181 Safari/537.36";

/// Default `Accept` header
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

/// Default `Accept-Language` header
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Content type used by form posts
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Content type used by JSON posts
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const ACCEPT_LANGUAGE: &str = "accept-language";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const UPGRADE_INSECURE_REQUESTS: &str = "upgrade-insecure-requests";
    pub const USER_AGENT: &str = "user-agent";
}

/// The header set a desktop Chrome sends on a top-level navigation
pub fn browser_headers() -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(headers::ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    map.insert(
        headers::ACCEPT_LANGUAGE,
        HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
    );
    map.insert(
        headers::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    map.insert(headers::USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers() {
        let map = browser_headers();
        assert_eq!(map.len(), 4);
        assert_eq!(map["Accept-Language"], "en-US,en;q=0.9");
        assert_eq!(map["upgrade-insecure-requests"], "1");
        assert_eq!(map["User-Agent"], DEFAULT_USER_AGENT);
        assert_eq!(map["ACCEPT"], DEFAULT_ACCEPT);
    }
}
