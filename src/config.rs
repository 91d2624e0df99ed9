use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Which weight table the detectors contribute with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringProfile {
    /// Canonical weights: punycode +35, typosquatting +25, HIGH >= 60, MODERATE >= 25.
    #[default]
    Standard,
    /// Alternate weights: punycode +25, typosquatting +30, HIGH >= 70, MODERATE >= 40.
    Legacy,
}

/// Score contribution of every detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub authority: i32,
    pub malformed_url: i32,
    pub non_standard_port: i32,
    pub excessive_subdomains: i32,
    pub punycode: i32,
    pub typosquatting: i32,
    pub domain_age: i32,
    pub raw_ip_host: i32,
    pub suspicious_tld: i32,
    pub base64_token: i32,
    pub url_keyword: i32,
    pub email_keyword: i32,
    pub high_entropy: i32,
    pub suspicious_email_domain: i32,
    pub credential_trick: i32,
    pub long_path: i32,
    pub encoded_newline: i32,
    pub suspicious_token: i32,
    /// Near-brand similarity scores `near_brand_base - 10 * distance`.
    pub near_brand_base: i32,
}

/// Lower bounds of the MODERATE and HIGH verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub high: u8,
    pub moderate: u8,
}

const STANDARD_WEIGHTS: Weights = Weights {
    authority: 50,
    malformed_url: 10,
    non_standard_port: 15,
    excessive_subdomains: 10,
    punycode: 35,
    typosquatting: 25,
    domain_age: 20,
    raw_ip_host: 25,
    suspicious_tld: 20,
    base64_token: 15,
    url_keyword: 8,
    email_keyword: 10,
    high_entropy: 15,
    suspicious_email_domain: 20,
    credential_trick: 10,
    long_path: 10,
    encoded_newline: 10,
    suspicious_token: 10,
    near_brand_base: 45,
};

impl ScoringProfile {
    pub fn weights(&self) -> Weights {
        match self {
            ScoringProfile::Standard => STANDARD_WEIGHTS,
            ScoringProfile::Legacy => Weights {
                punycode: 25,
                typosquatting: 30,
                ..STANDARD_WEIGHTS
            },
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        match self {
            ScoringProfile::Standard => Thresholds {
                high: 60,
                moderate: 25,
            },
            ScoringProfile::Legacy => Thresholds {
                high: 70,
                moderate: 40,
            },
        }
    }
}

/// A protected brand and the near-miss spellings that imitate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TyposquatRule {
    pub brand: String,
    pub typos: Vec<String>,
}

impl TyposquatRule {
    fn new(brand: &str, typos: &[&str]) -> Self {
        Self {
            brand: brand.to_string(),
            typos: strings(typos),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// Marker matching plus random draws, as a stand-in for real lookups.
    #[default]
    Simulated,
    /// Marker matching plus the mock domain-age table; no randomness.
    Mock,
    /// Marker matching only.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub mode: SignalMode,
    pub known_bad_markers: Vec<String>,
    pub authority_probability: f64,
    pub domain_age_probability: f64,
    pub max_domain_age_days: u32,
    pub mock_domain_ages: HashMap<String, u32>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            mode: SignalMode::Simulated,
            known_bad_markers: strings(&["known-bad-site.com"]),
            authority_probability: 0.1,
            domain_age_probability: 0.2,
            max_domain_age_days: 120,
            mock_domain_ages: HashMap::from([
                ("psybook.info".to_string(), 90),
                ("example.com".to_string(), 8000),
                ("google.com".to_string(), 9000),
                ("suspicious.tk".to_string(), 30),
                ("newdomain.info".to_string(), 45),
                ("established.org".to_string(), 3650),
            ]),
        }
    }
}

/// Extra URL heuristics that are off unless explicitly enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedChecks {
    pub enabled: bool,
    pub max_path_length: usize,
    pub max_brand_distance: usize,
    pub suspicious_tokens: Vec<String>,
}

impl Default for ExtendedChecks {
    fn default() -> Self {
        Self {
            enabled: false,
            max_path_length: 100,
            max_brand_distance: 2,
            suspicious_tokens: strings(&[
                "secure-",
                "login-",
                "verify-",
                "banking",
                "update",
                "freegift",
                "account-reset",
                "paypal-login",
            ]),
        }
    }
}

/// Read-only detector tables shared by every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub profile: ScoringProfile,
    pub entropy_threshold: f64,
    pub typosquat_rules: Vec<TyposquatRule>,
    pub url_keywords: Vec<String>,
    pub email_keywords: Vec<String>,
    pub suspicious_tlds: Vec<String>,
    pub dangerous_extensions: Vec<String>,
    pub blacklisted_domains: Vec<String>,
    pub safe_email_domains: Vec<String>,
    pub trusted_domains: Vec<String>,
    pub signals: SignalConfig,
    pub extended_checks: ExtendedChecks,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: ScoringProfile::Standard,
            entropy_threshold: 4.0,
            typosquat_rules: vec![
                TyposquatRule::new("google", &["g0ogle", "g00gle", "googgle", "gooogle"]),
                TyposquatRule::new("paypal", &["paypa1", "paypaal"]),
                TyposquatRule::new("facebook", &["faceb00k"]),
                TyposquatRule::new("apple", &["app1e"]),
                TyposquatRule::new("microsoft", &["m1crosoft"]),
            ],
            url_keywords: strings(&[
                "urgent action required",
                "account locked",
                "verify now",
                "suspicious activity detected",
                "reset password immediately",
            ]),
            email_keywords: strings(&[
                "verify your account",
                "reset your password",
                "urgent update",
                "your account will be closed",
                "confirm login",
                "bank alert",
                "click this link",
                "urgent",
                "verify now",
                "password reset",
                "bank account",
                "update information",
                "lottery",
                "compromised",
                "suspended",
                "click below",
                "confirm immediately",
            ]),
            suspicious_tlds: strings(&[".zip", ".xyz", ".top", ".tk", ".click"]),
            dangerous_extensions: strings(&["exe", "js", "scr", "bat", "cmd", "vbs", "zip"]),
            blacklisted_domains: strings(&["malicious.com", "fakebank.com", "phishingsite.org"]),
            safe_email_domains: strings(&["gmail.com", "yahoo.com", "outlook.com", "hotmail.com"]),
            trusted_domains: strings(&[
                "google.com",
                "gmail.com",
                "facebook.com",
                "amazon.com",
                "paypal.com",
                "apple.com",
                "microsoft.com",
            ]),
            signals: SignalConfig::default(),
            extended_checks: ExtendedChecks::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("authority_probability", self.signals.authority_probability),
            ("domain_age_probability", self.signals.domain_age_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("signals.{name} must be within [0, 1], got {value}");
            }
        }
        if !self.entropy_threshold.is_finite() || self.entropy_threshold < 0.0 {
            anyhow::bail!(
                "entropy_threshold must be a non-negative number, got {}",
                self.entropy_threshold
            );
        }
        for rule in &self.typosquat_rules {
            if rule.brand.trim().is_empty() {
                anyhow::bail!("typosquat rule with empty brand");
            }
        }
        let tables = [
            ("suspicious_tlds", &self.suspicious_tlds),
            ("dangerous_extensions", &self.dangerous_extensions),
            ("blacklisted_domains", &self.blacklisted_domains),
        ];
        for (name, entries) in tables {
            if entries.iter().any(|entry| entry.trim().is_empty()) {
                anyhow::bail!("{name} contains an empty entry");
            }
        }
        Ok(())
    }

    pub fn weights(&self) -> Weights {
        self.profile.weights()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.profile.thresholds()
    }
}

pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> EngineConfig {
    match EngineConfig::from_file(&path) {
        Ok(config) => {
            log::info!("Loaded configuration from: {}", path.as_ref().display());
            config
        }
        Err(e) => {
            log::warn!("Failed to load config ({:#}), using defaults", e);
            EngineConfig::default()
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
