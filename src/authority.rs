//! External blacklist / malware authority signal.
//!
//! No network lookups happen here. Production code can implement
//! [`ExternalAuthority`] over a real reputation API; the engine only needs a
//! synchronous yes/no answer per URL.

use rand::Rng;

pub trait ExternalAuthority: Send + Sync {
    /// Whether the authority flags this URL as known malware or phishing.
    /// `host` is `None` when the URL could not be parsed.
    fn is_flagged(&self, url: &str, host: Option<&str>) -> bool;

    fn name(&self) -> &str;
}

/// Marker matching plus a random draw standing in for an external API.
#[derive(Debug, Clone)]
pub struct SimulatedAuthority {
    markers: Vec<String>,
    flag_probability: f64,
}

impl SimulatedAuthority {
    pub fn new(markers: Vec<String>, flag_probability: f64) -> Self {
        Self {
            markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
            flag_probability: flag_probability.clamp(0.0, 1.0),
        }
    }

    /// Marker matching only; never flags at random.
    pub fn markers_only(markers: Vec<String>) -> Self {
        Self::new(markers, 0.0)
    }

    fn matches_marker(&self, haystack: &str) -> bool {
        let haystack = haystack.to_lowercase();
        self.markers
            .iter()
            .any(|m| !m.is_empty() && haystack.contains(m.as_str()))
    }
}

impl ExternalAuthority for SimulatedAuthority {
    fn is_flagged(&self, url: &str, host: Option<&str>) -> bool {
        if self.matches_marker(host.unwrap_or(url)) {
            log::debug!("Authority marker matched for {url}");
            return true;
        }
        self.flag_probability > 0.0 && rand::thread_rng().gen_bool(self.flag_probability)
    }

    fn name(&self) -> &str {
        "simulated-authority"
    }
}

/// Fixed answer, for tests and for deployments without an authority.
#[derive(Debug, Clone, Copy)]
pub struct StaticAuthority(pub bool);

impl ExternalAuthority for StaticAuthority {
    fn is_flagged(&self, _url: &str, _host: Option<&str>) -> bool {
        self.0
    }

    fn name(&self) -> &str {
        "static-authority"
    }
}
