// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request type

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::form_urlencoded;
use url::Url;

use super::{headers, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::error::Result;

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Per-request timeout, overriding the client's
    pub timeout: Option<Duration>,
}

impl Request {
    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::from_url(method, Url::parse(url.as_ref())?))
    }

    /// Create a new request from an already parsed URL
    pub fn from_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new HEAD request
    pub fn head(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::HEAD, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Set a header, replacing any previous value.
    ///
    /// Pairs that are not valid HTTP are skipped; use
    /// [`Request::try_header`] to get the error instead.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::debug!(header = name, "Skipping invalid header"),
        }
        self
    }

    /// Set a header, failing on an invalid name or value
    pub fn try_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())?;
        let value = HeaderValue::try_from(value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set multiple headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set JSON body and content type
    pub fn json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.body = Some(Bytes::from(json));
        self.headers.insert(
            headers::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
        Ok(self)
    }

    /// Set a URL-encoded form body and content type.
    ///
    /// Pairs are encoded in iteration order.
    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.body = Some(Bytes::from(body));
        self.headers.insert(
            headers::CONTENT_TYPE,
            HeaderValue::from_static(FORM_CONTENT_TYPE),
        );
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Get a header value as a string
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.host(), Some("example.com"));
        assert!(req.body.is_none());
        assert!(req.timeout.is_none());
    }

    #[test]
    fn test_invalid_url() {
        assert!(Request::get("not a url").is_err());
    }

    #[test]
    fn test_request_headers() {
        let req = Request::get("https://example.com")
            .unwrap()
            .header("X-Custom", "value")
            .header("bad header", "skipped");
        assert_eq!(req.header_str("x-custom"), Some("value"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_try_header_rejects_invalid() {
        let req = Request::get("https://example.com").unwrap();
        assert!(req.try_header("x-ok", "line\nbreak").is_err());
    }

    #[test]
    fn test_form_body() {
        let req = Request::post("https://example.com")
            .unwrap()
            .form([("q", "rust lang"), ("page", "2&3")]);
        assert_eq!(req.body.as_deref(), Some(&b"q=rust+lang&page=2%263"[..]));
        assert_eq!(req.header_str("content-type"), Some(FORM_CONTENT_TYPE));
    }

    #[test]
    fn test_json_body() {
        let req = Request::post("https://example.com")
            .unwrap()
            .json(&serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(req.header_str("Content-Type"), Some(JSON_CONTENT_TYPE));
    }
}
