// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pre-send request interception
//!
//! An interceptor sees every request after default headers are merged and
//! before it reaches the transport. It may rewrite the request or abort it.

use std::sync::Arc;

use crate::http::Request;

/// Request interceptor trait
///
/// Closures of the shape `Fn(&mut Request) -> InterceptAction` implement it
/// directly.
///
/// # Example
///
/// ```rust,no_run
/// use kalamari_http::{BrowserClient, InterceptAction, Request};
///
/// let mut client = BrowserClient::new()?;
/// client.set_interceptor(|req: &mut Request| {
///     if req.url.scheme() != "https" {
///         return InterceptAction::abort("plain http is not allowed");
///     }
///     InterceptAction::Continue
/// });
/// # Ok::<(), kalamari_http::Error>(())
/// ```
pub trait RequestInterceptor: Send + Sync {
    /// Called before a request is sent
    ///
    /// Can modify the request or abort it entirely.
    fn before_send(&self, request: &mut Request) -> InterceptAction;

    /// Filter - return true if this interceptor should handle the request
    fn should_intercept(&self, _request: &Request) -> bool {
        true
    }

    /// Priority - higher priority interceptors run first in a chain
    fn priority(&self) -> i32 {
        0
    }
}

/// Action to take after interception
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptAction {
    /// Continue with the (possibly modified) request
    Continue,
    /// Abort the request with a reason
    Abort(String),
}

impl InterceptAction {
    /// Abort with the given reason
    pub fn abort(reason: impl Into<String>) -> Self {
        InterceptAction::Abort(reason.into())
    }

    /// Check if the request may proceed
    pub fn is_continue(&self) -> bool {
        matches!(self, InterceptAction::Continue)
    }
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut Request) -> InterceptAction + Send + Sync,
{
    fn before_send(&self, request: &mut Request) -> InterceptAction {
        self(request)
    }
}

/// Request logger interceptor
#[derive(Debug, Clone, Default)]
pub struct RequestLogger {
    /// Log request bodies
    pub log_bodies: bool,
    /// Filter by URL pattern
    pub url_filter: Option<String>,
}

impl RequestInterceptor for RequestLogger {
    fn should_intercept(&self, request: &Request) -> bool {
        if let Some(ref filter) = self.url_filter {
            request.url.as_str().contains(filter)
        } else {
            true
        }
    }

    fn before_send(&self, request: &mut Request) -> InterceptAction {
        tracing::info!(
            method = %request.method,
            url = %request.url,
            "Request"
        );

        if self.log_bodies {
            if let Some(ref body) = request.body {
                tracing::debug!(body = ?String::from_utf8_lossy(body), "Request body");
            }
        }

        InterceptAction::Continue
    }

    fn priority(&self) -> i32 {
        -100 // Low priority - run logging last
    }
}

/// Aborts requests to listed hosts and their subdomains
#[derive(Debug, Clone, Default)]
pub struct HostBlocker {
    hosts: Vec<String>,
}

impl HostBlocker {
    /// Create an empty blocker
    pub fn new() -> Self {
        Self::default()
    }

    /// Block a host and everything below it
    pub fn block(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into().to_lowercase());
        self
    }

    fn is_blocked(&self, host: &str) -> bool {
        self.hosts.iter().any(|blocked| {
            host == blocked
                || host
                    .strip_suffix(blocked.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

impl RequestInterceptor for HostBlocker {
    fn before_send(&self, request: &mut Request) -> InterceptAction {
        match request.host() {
            Some(host) if self.is_blocked(host) => {
                InterceptAction::abort(format!("host {} is blocked", host))
            }
            _ => InterceptAction::Continue,
        }
    }

    fn priority(&self) -> i32 {
        100 // Drop blocked requests before anything else touches them
    }
}

/// Interceptor chain - manages multiple interceptors
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl InterceptorChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interceptor
    pub fn add<I: RequestInterceptor + 'static>(&mut self, interceptor: I) {
        self.interceptors.push(Arc::new(interceptor));
        // Stable sort keeps insertion order within a priority
        self.interceptors
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Builder-style [`InterceptorChain::add`]
    pub fn with<I: RequestInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.add(interceptor);
        self
    }

    /// Number of interceptors in the chain
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl RequestInterceptor for InterceptorChain {
    fn before_send(&self, request: &mut Request) -> InterceptAction {
        for interceptor in &self.interceptors {
            if !interceptor.should_intercept(request) {
                continue;
            }

            match interceptor.before_send(request) {
                InterceptAction::Continue => continue,
                action => return action,
            }
        }
        InterceptAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(url: &str) -> Request {
        Request::get(url).unwrap()
    }

    #[test]
    fn test_closure_interceptor() {
        let tagger = |req: &mut Request| {
            req.headers
                .insert("x-tag", reqwest::header::HeaderValue::from_static("1"));
            InterceptAction::Continue
        };

        let mut req = request("https://example.com");
        assert!(tagger.before_send(&mut req).is_continue());
        assert_eq!(req.header_str("x-tag"), Some("1"));
    }

    #[test]
    fn test_host_blocker() {
        let blocker = HostBlocker::new().block("Tracker.example");

        let mut blocked = request("https://cdn.tracker.example/pixel.gif");
        let mut allowed = request("https://nottracker.example/");

        assert_eq!(
            blocker.before_send(&mut blocked),
            InterceptAction::abort("host cdn.tracker.example is blocked")
        );
        assert!(blocker.before_send(&mut allowed).is_continue());
    }

    #[test]
    fn test_interceptor_chain_order() {
        let chain = InterceptorChain::new()
            .with(RequestLogger::default())
            .with(HostBlocker::new().block("blocked.test"));

        assert_eq!(chain.len(), 2);
        // Blocker has the highest priority
        assert_eq!(chain.interceptors[0].priority(), 100);

        let mut req = request("https://blocked.test/");
        assert!(!chain.before_send(&mut req).is_continue());
    }

    #[test]
    fn test_chain_stops_at_abort() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let chain = InterceptorChain::new()
            .with(|_: &mut Request| InterceptAction::abort("stop"))
            .with(move |_: &mut Request| {
                counter.fetch_add(1, Ordering::SeqCst);
                InterceptAction::Continue
            });

        let mut req = request("https://example.com");
        assert_eq!(chain.before_send(&mut req), InterceptAction::abort("stop"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_logger_filter() {
        let logger = RequestLogger {
            log_bodies: true,
            url_filter: Some("/api/".to_string()),
        };

        assert!(logger.should_intercept(&request("https://example.com/api/v1")));
        assert!(!logger.should_intercept(&request("https://example.com/home")));
        assert!(logger.before_send(&mut request("https://example.com/api/v1")).is_continue());
    }
}
