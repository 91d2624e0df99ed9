use super::{each_parsed_url, DetectionContext, Detector, Finding, FindingCategory};
use crate::domain_utils::DomainUtils;
use crate::extractor::ExtractedFacts;

/// Flags hosts ending in one of the configured high-abuse TLDs.
pub struct SuspiciousTldDetector;

impl SuspiciousTldDetector {
    /// The configured suffix a host ends with, if any
    pub fn suspicious_tld<'a>(host: &str, tlds: &'a [String]) -> Option<&'a str> {
        DomainUtils::matching_tld(host, tlds)
    }
}

impl Detector for SuspiciousTldDetector {
    fn name(&self) -> &str {
        "suspicious_tld"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        each_parsed_url(facts, |_, parsed| {
            let tld = Self::suspicious_tld(&parsed.host, &ctx.config.suspicious_tlds)?;
            Some(Finding::new(
                FindingCategory::SuspiciousTld,
                format!("Suspicious TLD detected ({tld})"),
                ctx.weights.suspicious_tld,
            ))
        })
    }
}
