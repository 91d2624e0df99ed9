//! Pulls structured facts out of raw input text.
//!
//! Everything here is pure; an [`ExtractedFacts`] snapshot is built once per
//! analysis and only read afterwards.

use crate::error::AnalysisError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid URL regex"));

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

// RFC 3986 appendix B
static RE_URI_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("valid URI regex")
});

static RE_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("valid scheme regex"));

static RE_IPV4_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{1,3}\.){3}\d{1,3}$").expect("valid ipv4 regex"));

static RE_BASE64_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9+/]{12,}={0,2}").expect("valid base64 regex"));

/// Components of a URL that split cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: String,
    pub userinfo: Option<String>,
    /// Lower-cased host without port or brackets.
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
}

/// Facts about one URL found in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlFacts {
    pub raw: String,
    pub parsed: Result<ParsedUrl, AnalysisError>,
    pub is_ip_host: bool,
    pub is_punycode: bool,
}

impl UrlFacts {
    pub fn new(raw: &str) -> Self {
        let parsed = parse_url(raw);
        let (is_ip_host, is_punycode) = match &parsed {
            Ok(p) => (is_raw_ip_host(&p.host), p.host.contains("xn--")),
            Err(_) => (false, false),
        };
        Self {
            raw: raw.to_string(),
            parsed,
            is_ip_host,
            is_punycode,
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.parsed.as_ref().ok().map(|p| p.host.as_str())
    }
}

/// Read-only snapshot computed once per analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFacts {
    pub text: String,
    pub lowered: String,
    pub urls: Vec<UrlFacts>,
    pub emails: Vec<String>,
    pub entropy: f64,
}

impl ExtractedFacts {
    /// Facts for free text: every embedded URL and email address.
    pub fn from_text(text: &str) -> Self {
        let urls = extract_urls(text)
            .into_iter()
            .map(|u| UrlFacts::new(&u))
            .collect();
        Self::build(text, urls)
    }

    /// Facts for an input that is itself a single URL, well-formed or not.
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim();
        Self::build(trimmed, vec![UrlFacts::new(trimmed)])
    }

    fn build(text: &str, urls: Vec<UrlFacts>) -> Self {
        Self {
            text: text.to_string(),
            lowered: text.to_lowercase(),
            urls,
            emails: extract_emails(text),
            entropy: shannon_entropy(text),
        }
    }
}

/// All `http(s)://` runs of non-whitespace, in order, duplicates kept.
pub fn extract_urls(text: &str) -> Vec<String> {
    RE_URL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn extract_emails(text: &str) -> Vec<String> {
    RE_EMAIL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Splits a URL into scheme, host, port, path and query.
///
/// Parsing is deliberately permissive: any scheme and any host shape are
/// accepted as long as the string has a `scheme://authority` form with a
/// non-empty host and a numeric port.
pub fn parse_url(url: &str) -> Result<ParsedUrl, AnalysisError> {
    let malformed = || AnalysisError::MalformedUrl(url.to_string());
    let url = url.trim();

    let caps = RE_URI_PARTS.captures(url).ok_or_else(malformed)?;
    let scheme = caps.get(1).map(|m| m.as_str()).ok_or_else(malformed)?;
    if !RE_SCHEME.is_match(scheme) {
        return Err(malformed());
    }
    let authority = caps.get(2).map(|m| m.as_str()).ok_or_else(malformed)?;

    let (userinfo, host_port) = match authority.rsplit_once('@') {
        Some((user, rest)) => (Some(user.to_string()), rest),
        None => (None, authority),
    };

    let (host, port) = split_host_port(host_port).ok_or_else(malformed)?;
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(malformed());
    }

    Ok(ParsedUrl {
        scheme: scheme.to_lowercase(),
        userinfo,
        host: host.to_lowercase(),
        port,
        path: caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
        query: caps.get(4).map(|m| m.as_str().to_string()),
    })
}

fn split_host_port(host_port: &str) -> Option<(&str, Option<u16>)> {
    let (host, port) = if let Some(rest) = host_port.strip_prefix('[') {
        let (inner, after) = rest.split_once(']')?;
        match after {
            "" => (inner, None),
            _ => (inner, Some(after.strip_prefix(':')?)),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    let port = match port {
        None | Some("") => None,
        Some(p) => Some(p.parse::<u16>().ok()?),
    };
    Some((host, port))
}

/// Four dot-separated groups of one to three digits; values are not range checked.
pub fn is_raw_ip_host(host: &str) -> bool {
    RE_IPV4_SHAPE.is_match(host)
}

pub fn find_base64_tokens(text: &str) -> Vec<&str> {
    RE_BASE64_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Shannon entropy over the character distribution of the whole text.
pub fn shannon_entropy(text: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let len = total as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum()
}
