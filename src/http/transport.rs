// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network transport behind the browser client

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use reqwest::blocking::Client;
use url::Url;

use super::config::ClientConfig;
use super::cookie::CookieJar;
use super::request::Request;
use super::response::Response;
use crate::error::{Error, Result};

/// Performs the actual network exchange for a prepared request.
///
/// Implementations must be safe to share between threads; the client never
/// locks around them.
pub trait Transport: Send + Sync {
    /// Send the request, directly or through `proxy`
    fn send(&self, request: Request, proxy: Option<&Url>) -> Result<Response>;

    /// Build an independent transport with the same settings, storing
    /// cookies in `cookies`
    fn fork(&self, cookies: Arc<CookieJar>) -> Result<Box<dyn Transport>>;
}

/// Connection settings taken from [`ClientConfig`]
#[derive(Debug, Clone, Copy)]
struct Settings {
    timeout: Duration,
    connect_timeout: Duration,
    idle_timeout: Duration,
    tcp_keepalive: Duration,
    max_conns_per_host: usize,
}

impl From<&ClientConfig> for Settings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            idle_timeout: config.idle_timeout,
            tcp_keepalive: config.tcp_keepalive,
            max_conns_per_host: config.max_conns_per_host,
        }
    }
}

/// Blocking `reqwest` transport.
///
/// Keeps one connection pool for direct traffic and one for the proxy in
/// use, both feeding the same cookie jar.
#[derive(Debug)]
pub struct ReqwestTransport {
    settings: Settings,
    cookies: Arc<CookieJar>,
    direct: Client,
    proxied: DashMap<Url, Client>,
}

impl ReqwestTransport {
    /// Create a transport from the client configuration
    pub fn new(config: &ClientConfig, cookies: Arc<CookieJar>) -> Result<Self> {
        Self::with_settings(Settings::from(config), cookies)
    }

    fn with_settings(settings: Settings, cookies: Arc<CookieJar>) -> Result<Self> {
        let direct = build_client(&settings, &cookies, None)?;
        Ok(Self {
            settings,
            cookies,
            direct,
            proxied: DashMap::new(),
        })
    }

    /// Get the cookie jar the transport stores into
    pub fn cookie_jar(&self) -> &Arc<CookieJar> {
        &self.cookies
    }

    /// Pick the pool for `proxy`. Pools for proxies other than the active
    /// one are dropped, so at most one proxied pool is kept.
    fn client_for(&self, proxy: Option<&Url>) -> Result<Client> {
        let Some(proxy) = proxy else {
            if !self.proxied.is_empty() {
                self.proxied.clear();
            }
            return Ok(self.direct.clone());
        };
        if let Some(client) = self.proxied.get(proxy) {
            return Ok(client.clone());
        }

        let client = build_client(&self.settings, &self.cookies, Some(proxy))?;
        self.proxied.retain(|url, _| url == proxy);
        self.proxied.insert(proxy.clone(), client.clone());
        tracing::debug!(proxy = %proxy, "Built proxied connection pool");
        Ok(client)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: Request, proxy: Option<&Url>) -> Result<Response> {
        let client = self.client_for(proxy)?;
        let start = Instant::now();
        let original_url = request.url.clone();

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            proxy = ?proxy.map(Url::as_str),
            "Sending request"
        );

        let mut builder = client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body.to_vec());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send()?;
        let response_time = start.elapsed().as_millis() as u64;

        let final_url = response.url().clone();
        let redirected = final_url != original_url;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?;

        tracing::debug!(%status, url = %final_url, time_ms = response_time, "Response");

        Ok(Response::new(
            status,
            headers,
            body,
            final_url,
            redirected,
            response_time,
        ))
    }

    fn fork(&self, cookies: Arc<CookieJar>) -> Result<Box<dyn Transport>> {
        Ok(Box::new(Self::with_settings(self.settings, cookies)?))
    }
}

fn build_client(
    settings: &Settings,
    cookies: &Arc<CookieJar>,
    proxy: Option<&Url>,
) -> Result<Client> {
    let builder = Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .pool_idle_timeout(settings.idle_timeout)
        .pool_max_idle_per_host(settings.max_conns_per_host)
        .tcp_keepalive(settings.tcp_keepalive)
        .cookie_provider(Arc::clone(cookies));

    // Environment proxies are ignored; only the configured one applies
    let builder = match proxy {
        Some(url) => builder.proxy(
            reqwest::Proxy::all(url.as_str()).map_err(|e| Error::proxy_config(url.as_str(), e))?,
        ),
        None => builder.no_proxy(),
    };

    Ok(builder.build()?)
}
