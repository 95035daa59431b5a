// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser-like HTTP client

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::config::ClientConfig;
use super::cookie::CookieJar;
use super::request::Request;
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use super::headers;
use crate::error::{Error, Result};
use crate::network::{InterceptAction, RequestInterceptor};

/// HTTP client that behaves like a desktop web browser.
///
/// Every request gets the client's default headers (unless it already
/// carries them), goes through the optional interceptor, and shares one
/// cookie jar. The client is `Send + Sync`; share it by reference or `Arc`
/// rather than cloning it. Use [`BrowserClient::copy`] for an independent
/// client.
pub struct BrowserClient {
    transport: Box<dyn Transport>,
    cookie_jar: Arc<CookieJar>,
    default_headers: HeaderMap,
    proxy: Option<String>,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    /// Transport settings only; headers, proxy and interceptor live above
    settings: ClientConfig,
}

impl BrowserClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let settings = config.clone();
        Self::with_transport(config, move |jar| ReqwestTransport::new(&settings, jar))
    }

    /// Create a client on top of a custom transport.
    ///
    /// `build` receives the client's fresh cookie jar so the transport can
    /// store and replay cookies through it.
    pub fn with_transport<F, T>(config: ClientConfig, build: F) -> Result<Self>
    where
        F: FnOnce(Arc<CookieJar>) -> Result<T>,
        T: Transport + 'static,
    {
        let cookie_jar = Arc::new(CookieJar::new());
        let transport = build(Arc::clone(&cookie_jar))?;

        let ClientConfig {
            default_headers,
            proxy,
            interceptor,
            ..
        } = config.clone();
        let settings = ClientConfig {
            default_headers: HeaderMap::new(),
            proxy: None,
            interceptor: None,
            ..config
        };

        Ok(Self {
            transport: Box::new(transport),
            cookie_jar,
            default_headers,
            proxy,
            interceptor,
            settings,
        })
    }

    /// Create an independent client with the same settings.
    ///
    /// The copy gets its own transport and its own cookie jar, seeded with
    /// the cookies this client holds right now. Headers are copied; proxy
    /// and interceptor are shared by value and reference respectively.
    pub fn copy(&self) -> Result<Self> {
        let cookie_jar = Arc::new(CookieJar::clone(&self.cookie_jar));
        let transport = self.transport.fork(Arc::clone(&cookie_jar))?;

        Ok(Self {
            transport,
            cookie_jar,
            default_headers: self.default_headers.clone(),
            proxy: self.proxy.clone(),
            interceptor: self.interceptor.clone(),
            settings: self.settings.clone(),
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &Arc<CookieJar> {
        &self.cookie_jar
    }

    /// Current configuration: the construction-time transport settings
    /// together with the live headers, proxy and interceptor.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            default_headers: self.default_headers.clone(),
            proxy: self.proxy.clone(),
            interceptor: self.interceptor.clone(),
            ..self.settings.clone()
        }
    }

    /// Default headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Mutable access to the default headers
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.default_headers
    }

    /// Current proxy URL, if any
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Set or clear the proxy.
    ///
    /// The value is not validated here; a malformed URL makes every
    /// following request fail with [`Error::ProxyConfig`].
    pub fn set_proxy(&mut self, proxy: Option<String>) {
        self.proxy = proxy;
    }

    /// Current pre-send interceptor
    pub fn interceptor(&self) -> Option<&Arc<dyn RequestInterceptor>> {
        self.interceptor.as_ref()
    }

    /// Set the pre-send interceptor
    pub fn set_interceptor<I: RequestInterceptor + 'static>(&mut self, interceptor: I) {
        self.interceptor = Some(Arc::new(interceptor));
    }

    /// Remove the pre-send interceptor
    pub fn clear_interceptor(&mut self) {
        self.interceptor = None;
    }

    /// Execute a GET request
    pub fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.execute(Request::get(url)?)
    }

    /// Execute a HEAD request
    pub fn head(&self, url: impl AsRef<str>) -> Result<Response> {
        self.execute(Request::head(url)?)
    }

    /// Execute a POST request with an explicit content type
    pub fn post(
        &self,
        url: impl AsRef<str>,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<Response> {
        let mut request = Request::post(url)?.body(body);
        request
            .headers
            .insert(headers::CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        self.execute(request)
    }

    /// Execute a POST request with a URL-encoded form body
    pub fn post_form<I, K, V>(&self, url: impl AsRef<str>, pairs: I) -> Result<Response>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.execute(Request::post(url)?.form(pairs))
    }

    /// Execute a POST request with a JSON body
    pub fn post_json<T: Serialize + ?Sized>(
        &self,
        url: impl AsRef<str>,
        data: &T,
    ) -> Result<Response> {
        self.execute(Request::post(url)?.json(data)?)
    }

    /// Create a request builder bound to this client
    pub fn request(&self, method: Method, url: impl AsRef<str>) -> Result<RequestBuilder<'_>> {
        Ok(RequestBuilder {
            client: self,
            request: Request::new(method, url)?,
        })
    }

    /// Execute a request.
    ///
    /// Default headers are merged in, the interceptor runs, the proxy is
    /// resolved, and the transport performs the exchange. Transport errors
    /// are returned as they are.
    pub fn execute(&self, request: impl Into<Option<Request>>) -> Result<Response> {
        let mut request = request.into().ok_or(Error::EmptyRequest)?;
        self.merge_headers(&mut request);

        let interceptor = self
            .interceptor
            .as_ref()
            .filter(|interceptor| interceptor.should_intercept(&request));
        if let Some(interceptor) = interceptor {
            if let InterceptAction::Abort(reason) = interceptor.before_send(&mut request) {
                tracing::debug!(url = %request.url, %reason, "Request rejected");
                return Err(Error::InterceptorRejection { reason });
            }
        }

        let proxy = self.resolve_proxy()?;
        self.transport.send(request, proxy.as_ref())
    }

    /// Parse the configured proxy. `None` or an empty string means direct.
    pub fn resolve_proxy(&self) -> Result<Option<Url>> {
        match self.proxy.as_deref() {
            None | Some("") => Ok(None),
            Some(proxy) => Url::parse(proxy)
                .map(Some)
                .map_err(|e| Error::proxy_config(proxy, e)),
        }
    }

    /// Add default headers the request does not already carry.
    /// Empty values count as absent.
    fn merge_headers(&self, request: &mut Request) {
        for name in self.default_headers.keys() {
            let present = request
                .headers
                .get(name)
                .is_some_and(|existing| !existing.is_empty());
            if present {
                continue;
            }

            tracing::trace!(header = %name, "Adding default header");
            request.headers.remove(name);
            for value in self.default_headers.get_all(name) {
                request.headers.append(name.clone(), value.clone());
            }
        }
    }
}

impl fmt::Debug for BrowserClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserClient")
            .field("default_headers", &self.default_headers)
            .field("proxy", &self.proxy)
            .field("interceptor", &self.interceptor.is_some())
            .field("cookies", &self.cookie_jar.len())
            .finish_non_exhaustive()
    }
}

/// Builder for executing requests with the client
pub struct RequestBuilder<'a> {
    client: &'a BrowserClient,
    request: Request,
}

impl RequestBuilder<'_> {
    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request = self.request.body(body);
        self
    }

    /// Set JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        self.request = self.request.json(data)?;
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request = self.request.timeout(timeout);
        self
    }

    /// Get the request built so far
    pub fn build(self) -> Request {
        self.request
    }

    /// Execute the request
    pub fn send(self) -> Result<Response> {
        self.client.execute(self.request)
    }
}
