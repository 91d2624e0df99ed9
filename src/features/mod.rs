pub mod domain_reputation;
pub mod entropy;
pub mod keywords;
pub mod link_analyzer;
pub mod signals;
pub mod tld_risk;
pub mod typosquat;
pub mod url_structure;

use crate::authority::ExternalAuthority;
use crate::config::{EngineConfig, Weights};
use crate::domain_age::DomainAgeSignal;
use crate::extractor::{ExtractedFacts, ParsedUrl, UrlFacts};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    NoContent,
    ExternalAuthority,
    MalformedUrl,
    NonStandardPort,
    ExcessiveSubdomains,
    Punycode,
    RawIpHost,
    SuspiciousTld,
    Base64Token,
    CredentialTrick,
    LongPath,
    EncodedNewline,
    SuspiciousToken,
    NearBrand,
    Typosquatting,
    DomainAge,
    SuspiciousEmailDomain,
    Keyword,
    HighEntropy,
    DangerousAttachment,
    EmbeddedExecutable,
    BlacklistedDomain,
}

/// One labeled, scored observation about the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub message: String,
    pub contribution: i32,
}

impl Finding {
    pub fn new(category: FindingCategory, message: impl Into<String>, contribution: i32) -> Self {
        Self {
            category,
            message: message.into(),
            contribution,
        }
    }

    /// Zero-weight finding that explains why nothing else fired.
    pub fn no_content() -> Self {
        Self::new(FindingCategory::NoContent, "No content to analyze", 0)
    }
}

/// Everything a detector may consult besides the facts themselves.
pub struct DetectionContext<'a> {
    pub config: &'a EngineConfig,
    pub weights: Weights,
    pub authority: &'a dyn ExternalAuthority,
    pub domain_age: &'a dyn DomainAgeSignal,
}

pub trait Detector: Send + Sync {
    fn name(&self) -> &str;

    /// Never fails; an empty vector means the condition did not hold.
    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding>;
}

/// Runs `check` against every URL that parsed cleanly.
pub(crate) fn each_parsed_url<F>(facts: &ExtractedFacts, mut check: F) -> Vec<Finding>
where
    F: FnMut(&UrlFacts, &ParsedUrl) -> Option<Finding>,
{
    facts
        .urls
        .iter()
        .filter_map(|url| match &url.parsed {
            Ok(parsed) => check(url, parsed),
            Err(_) => None,
        })
        .collect()
}

/// Ordered list of detectors for one input shape.
pub struct DetectorSet {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorSet {
    fn url_detectors(config: &EngineConfig) -> Vec<Box<dyn Detector>> {
        let mut detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(signals::AuthorityDetector),
            Box::new(url_structure::MalformedUrlDetector),
            Box::new(url_structure::PortDetector),
            Box::new(url_structure::SubdomainDetector),
            Box::new(url_structure::PunycodeDetector),
            Box::new(url_structure::RawIpDetector),
            Box::new(tld_risk::SuspiciousTldDetector),
            Box::new(url_structure::Base64Detector),
        ];
        if config.extended_checks.enabled {
            detectors.push(Box::new(link_analyzer::LinkAnalyzer::new()));
        }
        detectors.push(Box::new(typosquat::TyposquatDetector));
        detectors.push(Box::new(signals::DomainAgeDetector));
        detectors
    }

    /// Detectors for a single URL input; keywords use the URL-centric table.
    pub fn for_url(config: &EngineConfig) -> Self {
        let mut detectors = Self::url_detectors(config);
        detectors.push(Box::new(keywords::KeywordDetector::url_table()));
        detectors.push(Box::new(entropy::EntropyDetector));
        Self { detectors }
    }

    /// Detectors for free text with embedded URLs and addresses.
    pub fn for_text(config: &EngineConfig) -> Self {
        let mut detectors = Self::url_detectors(config);
        detectors.push(Box::new(domain_reputation::EmailDomainDetector));
        detectors.push(Box::new(keywords::KeywordDetector::email_table()));
        detectors.push(Box::new(entropy::EntropyDetector));
        Self { detectors }
    }

    /// Content checks for a structured email body and subject.
    pub fn for_email() -> Self {
        Self {
            detectors: vec![Box::new(keywords::KeywordDetector::email_table())],
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn run(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        for detector in &self.detectors {
            let found = detector.detect(facts, ctx);
            if !found.is_empty() {
                log::debug!("{} produced {} finding(s)", detector.name(), found.len());
            }
            findings.extend(found);
        }
        findings
    }
}
