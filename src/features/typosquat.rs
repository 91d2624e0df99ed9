use super::{DetectionContext, Detector, Finding, FindingCategory};
use crate::config::TyposquatRule;
use crate::extractor::ExtractedFacts;

/// Known misspellings of protected brands inside the host name.
///
/// Each brand contributes at most once per URL, on its first matching typo,
/// and only when the real brand name is absent from the host.
pub struct TyposquatDetector;

impl TyposquatDetector {
    pub fn imitated_brands<'a>(host: &str, rules: &'a [TyposquatRule]) -> Vec<&'a str> {
        let host = host.to_lowercase();
        rules
            .iter()
            .filter(|rule| !host.contains(&rule.brand.to_lowercase()))
            .filter(|rule| {
                rule.typos
                    .iter()
                    .any(|typo| !typo.is_empty() && host.contains(&typo.to_lowercase()))
            })
            .map(|rule| rule.brand.as_str())
            .collect()
    }
}

impl Detector for TyposquatDetector {
    fn name(&self) -> &str {
        "typosquatting"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        facts
            .urls
            .iter()
            .filter_map(|url| url.parsed.as_ref().ok())
            .flat_map(|parsed| {
                Self::imitated_brands(&parsed.host, &ctx.config.typosquat_rules)
                    .into_iter()
                    .map(|brand| {
                        Finding::new(
                            FindingCategory::Typosquatting,
                            format!("Typosquatting: Domain resembles '{brand}'"),
                            ctx.weights.typosquatting,
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
