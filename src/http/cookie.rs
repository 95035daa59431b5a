// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar with public-suffix aware domain rules
//!
//! Cookies are bucketed by registrable domain (eTLD+1), so a lookup only
//! ever scans cookies that could legally apply to the request host. A
//! `Domain` attribute naming a public suffix (`co.uk`, `github.io`, ...)
//! is refused, which keeps one site from planting cookies on its
//! neighbours.

use chrono::{DateTime, NaiveDateTime, Utc};
use dashmap::DashMap;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to (empty until resolved against a URL)
    pub domain: String,
    /// Path the cookie is valid for (empty means the default path)
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag (not accessible via JavaScript)
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
    /// Only sent to the exact host that set it
    #[serde(default)]
    pub host_only: bool,
    /// When the cookie was first stored
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    /// Cookie sent with all requests
    #[default]
    None,
    /// Cookie sent with same-site and top-level navigations
    Lax,
    /// Cookie only sent with same-site requests
    Strict,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: String::new(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
            host_only: false,
            created: Utc::now(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set same_site attribute
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp <= Utc::now())
    }

    /// Check if the cookie should be sent to the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let Some((host, _)) = request_host(url) else {
            return false;
        };

        let domain_ok = if self.host_only {
            host == self.domain
        } else {
            domain_matches(&host, &self.domain)
        };

        domain_ok
            && path_matches(&self.path, url.path())
            && (!self.secure || url.scheme() == "https")
            && !self.is_expired()
    }

    /// Same (domain, path, name) triple, i.e. one replaces the other
    fn same_identity(&self, other: &Cookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    /// Parse a Set-Cookie header value received from `url`.
    ///
    /// The result still carries the raw `Domain` attribute; it is checked
    /// against the URL when the cookie is stored.
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));
        let mut max_age = None;

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let attr = attr.trim().to_lowercase();
                let val = val.trim();
                match attr.as_str() {
                    "domain" => cookie.domain = val.trim_start_matches('.').to_lowercase(),
                    "path" if val.starts_with('/') => cookie.path = val.to_string(),
                    "expires" => {
                        if let Some(dt) = parse_cookie_date(val) {
                            cookie.expires = Some(dt);
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.parse::<i64>() {
                            max_age = Some(max_age_to_expiry(secs));
                        }
                    }
                    "samesite" => {
                        cookie.same_site = match val.to_lowercase().as_str() {
                            "strict" => SameSite::Strict,
                            "lax" => SameSite::Lax,
                            _ => SameSite::None,
                        };
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        // Max-Age has precedence over Expires
        if let Some(expiry) = max_age {
            cookie.expires = Some(expiry);
        }
        if cookie.path.is_empty() {
            cookie.path = default_path(url);
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Thread-safe cookie storage.
///
/// `Clone` produces an independent deep copy; share a jar with `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    /// Cookies stored by registrable domain
    cookies: DashMap<String, Vec<Cookie>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already resolved cookie.
    ///
    /// An expired cookie deletes its stored counterpart instead.
    pub fn add(&self, mut cookie: Cookie) {
        cookie.domain = normalize_domain(&cookie.domain);
        if cookie.domain.is_empty() {
            tracing::debug!(name = %cookie.name, "Ignoring cookie without domain");
            return;
        }
        if cookie.path.is_empty() {
            cookie.path = "/".to_string();
        }
        let key = jar_key(&cookie.domain);

        if cookie.is_expired() {
            self.cookies.remove_if_mut(&key, |_, bucket| {
                bucket.retain(|c| !c.same_identity(&cookie));
                bucket.is_empty()
            });
            return;
        }

        let mut bucket = self.cookies.entry(key).or_default();
        if let Some(pos) = bucket.iter().position(|c| c.same_identity(&cookie)) {
            let old = bucket.remove(pos);
            cookie.created = old.created;
        }
        bucket.push(cookie);
    }

    /// Store cookies received from `url`, enforcing the domain rules.
    ///
    /// Cookies whose domain is not allowed for the URL's host are dropped.
    pub fn set_cookies(&self, url: &Url, cookies: impl IntoIterator<Item = Cookie>) {
        for cookie in cookies {
            if let Some(cookie) = resolve_for(cookie, url) {
                self.add(cookie);
            }
        }
    }

    /// Add a cookie from a Set-Cookie header. Returns false if it was refused.
    pub fn add_from_header(&self, header: &str, url: &Url) -> bool {
        match Cookie::parse(header, url).and_then(|c| resolve_for(c, url)) {
            Some(cookie) => {
                self.add(cookie);
                true
            }
            None => false,
        }
    }

    /// Get all cookies for a URL, most specific path first
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        let Some((host, _)) = request_host(url) else {
            return Vec::new();
        };
        let Some(mut bucket) = self.cookies.get_mut(&jar_key(&host)) else {
            return Vec::new();
        };

        bucket.retain(|c| !c.is_expired());
        let mut result: Vec<Cookie> = bucket.iter().filter(|c| c.matches(url)).cloned().collect();
        drop(bucket);

        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.created.cmp(&b.created))
        });
        result
    }

    /// Get Cookie header value for a URL
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(|c| c.to_header_value())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Remove a specific cookie
    pub fn remove(&self, name: &str, domain: &str, path: &str) {
        let domain = normalize_domain(domain);
        self.cookies.remove_if_mut(&jar_key(&domain), |_, cookies| {
            cookies.retain(|c| c.name != name || c.domain != domain || c.path != path);
            cookies.is_empty()
        });
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
    }

    /// Clear every cookie under the registrable domain of `domain`
    pub fn clear_domain(&self, domain: &str) {
        self.cookies.remove(&jar_key(&normalize_domain(domain)));
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all_cookies: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        serde_json::to_string(&all_cookies)
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let jar = CookieJar::new();
        for cookie in cookies {
            jar.add(cookie);
        }
        Ok(jar)
    }
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            if let Ok(value) = header.to_str() {
                self.add_from_header(value, url);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.get_cookie_header(url)
            .and_then(|header| HeaderValue::from_str(&header).ok())
    }
}

/// Request host, lowercased, and whether it is an IP address
fn request_host(url: &Url) -> Option<(String, bool)> {
    match url.host()? {
        Host::Domain(domain) => Some((domain.trim_end_matches('.').to_lowercase(), false)),
        Host::Ipv4(ip) => Some((ip.to_string(), true)),
        Host::Ipv6(ip) => Some((ip.to_string(), true)),
    }
}

/// Bucket key: the registrable domain, or the name itself for IPs and suffixes
/// Strip a leading dot and lowercase, the stored form of cookie domains
fn normalize_domain(domain: &str) -> String {
    domain.trim_start_matches('.').to_lowercase()
}

fn jar_key(domain: &str) -> String {
    if domain.parse::<std::net::IpAddr>().is_ok() {
        return domain.to_string();
    }
    psl::domain_str(domain).unwrap_or(domain).to_string()
}

fn is_public_suffix(domain: &str) -> bool {
    psl::suffix_str(domain) == Some(domain)
}

/// Check the cookie's Domain attribute against the host that sent it
fn resolve_for(mut cookie: Cookie, url: &Url) -> Option<Cookie> {
    let (host, is_ip) = request_host(url)?;
    let attr = normalize_domain(&cookie.domain);

    if attr.is_empty() || ((is_ip || is_public_suffix(&attr)) && attr == host) {
        cookie.domain = host;
        cookie.host_only = true;
    } else if !is_ip && !is_public_suffix(&attr) && domain_matches(&host, &attr) {
        cookie.domain = attr;
        cookie.host_only = false;
    } else {
        tracing::debug!(
            name = %cookie.name,
            domain = %attr,
            host = %host,
            "Rejecting cookie for illegal domain"
        );
        return None;
    }

    if cookie.path.is_empty() {
        cookie.path = default_path(url);
    }
    Some(cookie)
}

fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'))
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

/// RFC 6265 default-path: the request path up to its last `/`
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        None | Some(0) => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // Netscape format: Wed, 21-Oct-2015 07:28:00 GMT
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}

fn max_age_to_expiry(secs: i64) -> DateTime<Utc> {
    if secs <= 0 {
        return DateTime::<Utc>::MIN_UTC;
    }
    chrono::Duration::try_seconds(secs)
        .and_then(|d| Utc::now().checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_cookie_parsing() {
        let url = url("https://example.com/path");
        let header = "session=abc123; Domain=.Example.com; Path=/; Secure; HttpOnly; SameSite=Lax";
        let cookie = Cookie::parse(header, &url).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.same_site, SameSite::Lax);
        assert!(cookie.secure);
        assert!(cookie.http_only);
    }

    #[test]
    fn test_parse_rejects_nameless() {
        let url = url("https://example.com/");
        assert!(Cookie::parse("=value", &url).is_none());
        assert!(Cookie::parse("novalue", &url).is_none());
    }

    #[test]
    fn test_default_path() {
        let jar = CookieJar::new();
        jar.add_from_header("a=1", &url("https://example.com/docs/page.html"));

        assert!(jar.get_cookie_header(&url("https://example.com/docs/other")).is_some());
        assert!(jar.get_cookie_header(&url("https://example.com/docsx")).is_none());
        assert!(jar.get_cookie_header(&url("https://example.com/")).is_none());
    }

    #[test]
    fn test_host_only_cookie() {
        let jar = CookieJar::new();
        assert!(jar.add_from_header("a=1; Path=/", &url("https://example.com/")));

        assert_eq!(
            jar.get_cookie_header(&url("https://example.com/x")).as_deref(),
            Some("a=1")
        );
        assert!(jar.get_cookie_header(&url("https://www.example.com/")).is_none());
    }

    #[test]
    fn test_domain_cookie_reaches_subdomains() {
        let jar = CookieJar::new();
        assert!(jar.add_from_header(
            "a=1; Domain=example.co.uk; Path=/",
            &url("https://www.example.co.uk/")
        ));

        assert!(jar.get_cookie_header(&url("https://shop.example.co.uk/")).is_some());
        assert!(jar.get_cookie_header(&url("https://example.co.uk/")).is_some());
        assert!(jar.get_cookie_header(&url("https://other.co.uk/")).is_none());
    }

    #[test]
    fn test_public_suffix_domain_rejected() {
        let jar = CookieJar::new();
        assert!(!jar.add_from_header("a=1; Domain=co.uk", &url("https://www.example.co.uk/")));
        assert!(!jar.add_from_header("b=2; Domain=com", &url("https://example.com/")));
        assert!(jar.is_empty());
    }

    #[test]
    fn test_foreign_domain_rejected() {
        let jar = CookieJar::new();
        assert!(!jar.add_from_header("a=1; Domain=example.org", &url("https://example.com/")));
        assert!(!jar.add_from_header("a=1; Domain=ample.com", &url("https://example.com/")));
        assert!(jar.is_empty());
    }

    #[test]
    fn test_ip_host() {
        let jar = CookieJar::new();
        assert!(jar.add_from_header("a=1; Path=/", &url("http://127.0.0.1:8080/")));
        assert!(!jar.add_from_header("b=2; Domain=0.0.1", &url("http://127.0.0.1:8080/")));

        assert_eq!(
            jar.get_cookie_header(&url("http://127.0.0.1:9090/")).as_deref(),
            Some("a=1")
        );
        assert!(jar.get_cookie_header(&url("http://localhost:8080/")).is_none());
    }

    #[test]
    fn test_unrelated_domain_withheld() {
        let jar = CookieJar::new();
        jar.add_from_header("a=1; Path=/", &url("https://example.com/"));

        assert!(jar.get_cookie_header(&url("https://example.org/")).is_none());
        assert!(jar.get_cookie_header(&url("https://notexample.com/")).is_none());
    }

    #[test]
    fn test_secure_only_over_https() {
        let jar = CookieJar::new();
        jar.add_from_header("a=1; Path=/; Secure", &url("https://example.com/"));

        assert!(jar.get_cookie_header(&url("https://example.com/")).is_some());
        assert!(jar.get_cookie_header(&url("http://example.com/")).is_none());
    }

    #[test]
    fn test_max_age_zero_deletes() {
        let jar = CookieJar::new();
        let site = url("https://example.com/");
        jar.add_from_header("a=1; Path=/", &site);
        assert_eq!(jar.len(), 1);

        jar.add_from_header("a=gone; Path=/; Max-Age=0", &site);
        assert!(jar.is_empty());
    }

    #[test]
    fn test_expired_cookie_not_sent() {
        let jar = CookieJar::new();
        jar.add_from_header(
            "a=1; Path=/; Expires=Wed, 21 Oct 2015 07:28:00 GMT",
            &url("https://example.com/"),
        );
        assert!(jar.get_cookie_header(&url("https://example.com/")).is_none());
    }

    #[test]
    fn test_replacement_keeps_single_entry() {
        let jar = CookieJar::new();
        let site = url("https://example.com/");
        jar.add_from_header("a=1; Path=/", &site);
        jar.add_from_header("a=2; Path=/", &site);

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_cookie_header(&site).as_deref(), Some("a=2"));
    }

    #[test]
    fn test_longest_path_first() {
        let jar = CookieJar::new();
        let site = url("https://example.com/a/b/c");
        jar.add_from_header("short=1; Path=/", &site);
        jar.add_from_header("long=2; Path=/a/b", &site);

        assert_eq!(
            jar.get_cookie_header(&site).as_deref(),
            Some("long=2; short=1")
        );
    }

    #[test]
    fn test_set_cookies_resolves_domain() {
        let jar = CookieJar::new();
        let site = url("http://www.example.com/");
        jar.set_cookies(&site, vec![Cookie::new("k", "v")]);

        let cookies = jar.get_cookies(&site);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].domain, "www.example.com");
        assert!(cookies[0].host_only);
        assert_eq!(cookies[0].path, "/");
    }

    #[test]
    fn test_clone_is_independent() {
        let jar = CookieJar::new();
        let site = url("https://example.com/");
        jar.add_from_header("a=1; Path=/", &site);

        let copy = jar.clone();
        jar.add_from_header("b=2; Path=/", &site);
        copy.clear();

        assert_eq!(jar.len(), 2);
        assert!(copy.is_empty());
    }

    #[test]
    fn test_add_normalizes_domain() {
        let jar = CookieJar::new();
        jar.add(Cookie::new("a", "1").domain(".example.com").path("/"));
        jar.add(Cookie::new("b", "2").domain("Example.com").path("/"));

        assert_eq!(jar.len(), 2);
        assert_eq!(
            jar.get_cookie_header(&url("https://www.example.com/")).as_deref(),
            Some("a=1; b=2")
        );
        assert_eq!(
            jar.get_cookie_header(&url("https://example.com/")).as_deref(),
            Some("a=1; b=2")
        );

        jar.remove("a", ".Example.com", "/");
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_json_import_with_dotted_domain() {
        let json = r#"[{"name":"sid","value":"x","domain":".example.com","path":"/",
            "expires":null,"secure":false,"http_only":false,"same_site":"Lax",
            "host_only":false,"created":"2026-01-01T00:00:00Z"}]"#;
        let jar = CookieJar::from_json(json).unwrap();

        assert_eq!(
            jar.get_cookie_header(&url("https://shop.example.com/")).as_deref(),
            Some("sid=x")
        );
    }

    #[test]
    fn test_expired_cookie_leaves_no_bucket() {
        let jar = CookieJar::new();
        let past = Utc::now() - chrono::Duration::hours(1);
        jar.add(Cookie::new("a", "1").domain("example.com").path("/").expires(past));
        assert!(jar.cookies.is_empty());

        let site = url("https://example.com/");
        jar.add_from_header("a=1; Path=/", &site);
        jar.add_from_header("a=gone; Path=/; Max-Age=0", &site);
        assert!(jar.cookies.is_empty());

        jar.add_from_header("b=1; Path=/", &site);
        jar.remove("b", "example.com", "/");
        assert!(jar.cookies.is_empty());
    }

    #[test]
    fn test_json_export() {
        let jar = CookieJar::new();
        jar.add(Cookie::new("test", "value").domain("example.com").path("/"));

        let restored = CookieJar::from_json(&jar.to_json().unwrap()).unwrap();
        assert_eq!(
            restored.get_cookie_header(&url("https://example.com/")).as_deref(),
            Some("test=value")
        );
    }

    #[test]
    fn test_reqwest_cookie_store() {
        let jar = CookieJar::new();
        let site = url("https://example.com/");
        let headers = [
            HeaderValue::from_static("a=1; Path=/"),
            HeaderValue::from_static("b=2; Path=/; Domain=co.uk"),
        ];

        CookieStore::set_cookies(&jar, &mut headers.iter(), &site);

        assert_eq!(jar.len(), 1);
        assert_eq!(CookieStore::cookies(&jar, &site).unwrap(), "a=1");
        assert!(CookieStore::cookies(&jar, &url("https://example.net/")).is_none());
    }
}
