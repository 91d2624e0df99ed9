use super::{each_parsed_url, DetectionContext, Detector, Finding, FindingCategory};
use crate::extractor::ExtractedFacts;

/// Asks the injected authority about every URL, parsed or not.
pub struct AuthorityDetector;

impl Detector for AuthorityDetector {
    fn name(&self) -> &str {
        "authority"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        facts
            .urls
            .iter()
            .filter(|url| ctx.authority.is_flagged(&url.raw, url.host()))
            .map(|_| {
                Finding::new(
                    FindingCategory::ExternalAuthority,
                    "External API Flags as Known Malware/Phishing",
                    ctx.weights.authority,
                )
            })
            .collect()
    }
}

/// Needs a parsed host, so malformed URLs are skipped.
pub struct DomainAgeDetector;

impl Detector for DomainAgeDetector {
    fn name(&self) -> &str {
        "domain_age"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        each_parsed_url(facts, |_, parsed| {
            ctx.domain_age.is_suspicious(&parsed.host).then(|| {
                Finding::new(
                    FindingCategory::DomainAge,
                    "Domain Age Suspicious (New Registration or Privacy Guarded)",
                    ctx.weights.domain_age,
                )
            })
        })
    }
}
