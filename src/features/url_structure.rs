//! Structural checks on URL components.

use super::{each_parsed_url, DetectionContext, Detector, Finding, FindingCategory};
use crate::extractor::{find_base64_tokens, ExtractedFacts};

const STANDARD_PORTS: [u16; 2] = [80, 443];
const MAX_HOST_DOTS: usize = 3;

pub struct MalformedUrlDetector;

impl Detector for MalformedUrlDetector {
    fn name(&self) -> &str {
        "malformed_url"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        facts
            .urls
            .iter()
            .filter_map(|url| url.parsed.as_ref().err())
            .map(|err| {
                log::debug!("URL parse failed: {err}");
                Finding::new(
                    FindingCategory::MalformedUrl,
                    "Invalid or Malformed URL Structure",
                    ctx.weights.malformed_url,
                )
            })
            .collect()
    }
}

pub struct PortDetector;

impl Detector for PortDetector {
    fn name(&self) -> &str {
        "non_standard_port"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        each_parsed_url(facts, |_, parsed| {
            let port = parsed.port.filter(|p| !STANDARD_PORTS.contains(p))?;
            Some(Finding::new(
                FindingCategory::NonStandardPort,
                format!("Non-Standard Port Used ({port})"),
                ctx.weights.non_standard_port,
            ))
        })
    }
}

pub struct SubdomainDetector;

impl Detector for SubdomainDetector {
    fn name(&self) -> &str {
        "excessive_subdomains"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        each_parsed_url(facts, |_, parsed| {
            (parsed.host.matches('.').count() > MAX_HOST_DOTS).then(|| {
                Finding::new(
                    FindingCategory::ExcessiveSubdomains,
                    "Excessive Subdomains (Domain Complexity)",
                    ctx.weights.excessive_subdomains,
                )
            })
        })
    }
}

pub struct PunycodeDetector;

impl Detector for PunycodeDetector {
    fn name(&self) -> &str {
        "punycode"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        each_parsed_url(facts, |url, _| {
            url.is_punycode.then(|| {
                Finding::new(
                    FindingCategory::Punycode,
                    "Punycode (IDN) Detected - High Risk Spoofing",
                    ctx.weights.punycode,
                )
            })
        })
    }
}

pub struct RawIpDetector;

impl Detector for RawIpDetector {
    fn name(&self) -> &str {
        "raw_ip_host"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        each_parsed_url(facts, |url, parsed| {
            url.is_ip_host.then(|| {
                Finding::new(
                    FindingCategory::RawIpHost,
                    format!("URL contains raw IP address ({})", parsed.host),
                    ctx.weights.raw_ip_host,
                )
            })
        })
    }
}

/// Works on the raw URL string, so it also covers URLs that failed to parse.
pub struct Base64Detector;

impl Detector for Base64Detector {
    fn name(&self) -> &str {
        "base64_token"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        facts
            .urls
            .iter()
            .filter(|url| !find_base64_tokens(&url.raw).is_empty())
            .map(|_| {
                Finding::new(
                    FindingCategory::Base64Token,
                    "URL contains Base64 tokens",
                    ctx.weights.base64_token,
                )
            })
            .collect()
    }
}
