// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::{browser_headers, headers};
use crate::error::Result;
use crate::network::RequestInterceptor;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on idle connections kept per host
pub const DEFAULT_MAX_CONNS_PER_HOST: usize = 10;

/// Configuration for [`BrowserClient`](super::BrowserClient).
///
/// Build one value and pass clones of it to every client that should share
/// the same defaults.
#[derive(Clone)]
pub struct ClientConfig {
    /// Overall per-request deadline
    pub timeout: Duration,
    /// TCP connect + TLS handshake deadline
    pub connect_timeout: Duration,
    /// How long pooled idle connections are kept
    pub idle_timeout: Duration,
    /// TCP keepalive interval
    pub tcp_keepalive: Duration,
    /// Maximum idle persistent connections per host
    pub max_conns_per_host: usize,
    /// Headers added to every request that does not already carry them
    pub default_headers: HeaderMap,
    /// Proxy URL for all requests
    pub proxy: Option<String>,
    /// Hook run on every request before it is sent
    pub interceptor: Option<Arc<dyn RequestInterceptor>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            idle_timeout: DEFAULT_TIMEOUT * 3,
            tcp_keepalive: DEFAULT_TIMEOUT,
            max_conns_per_host: DEFAULT_MAX_CONNS_PER_HOST,
            default_headers: browser_headers(),
            proxy: None,
            interceptor: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("tcp_keepalive", &self.tcp_keepalive)
            .field("max_conns_per_host", &self.max_conns_per_host)
            .field("default_headers", &self.default_headers)
            .field("proxy", &self.proxy)
            .field("interceptor", &self.interceptor.is_some())
            .finish()
    }
}

impl ClientConfig {
    /// Create a new config with browser defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with no default headers at all
    pub fn without_default_headers() -> Self {
        Self {
            default_headers: HeaderMap::new(),
            ..Default::default()
        }
    }

    /// Set request timeout. Idle timeout follows at three times this value.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.idle_timeout = timeout * 3;
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set idle connection timeout
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set max idle connections per host
    pub fn max_conns_per_host(mut self, max: usize) -> Self {
        self.max_conns_per_host = max;
        self
    }

    /// Add or replace a default header.
    ///
    /// Pairs that are not valid HTTP are skipped; use
    /// [`ClientConfig::try_header`] to get the error instead.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.default_headers.insert(name, value);
            }
            _ => tracing::debug!(header = name, "Skipping invalid default header"),
        }
        self
    }

    /// Add or replace a default header, failing on an invalid name or value
    pub fn try_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())?;
        let value = HeaderValue::try_from(value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Set user agent
    pub fn user_agent(self, user_agent: impl AsRef<str>) -> Self {
        self.header(headers::USER_AGENT, user_agent)
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the pre-send interceptor
    pub fn interceptor<I: RequestInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptor = Some(Arc::new(interceptor));
        self
    }
}
