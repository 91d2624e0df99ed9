//! Opt-in URL heuristics: credential tricks, oversized paths, encoded
//! newlines, red-flag tokens and near-miss spellings of trusted domains.

use super::{DetectionContext, Detector, Finding, FindingCategory};
use crate::domain_utils::DomainUtils;
use crate::extractor::{ExtractedFacts, UrlFacts};
use strsim::levenshtein;

pub struct LinkAnalyzer {
    newline_markers: Vec<&'static str>,
}

impl Default for LinkAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkAnalyzer {
    pub fn new() -> Self {
        Self {
            newline_markers: vec!["%0a", "%0d"],
        }
    }

    /// Closest trusted domain to `host` and its edit distance.
    ///
    /// Ties keep the earlier entry of `trusted`.
    pub fn nearest_trusted<'a>(host: &str, trusted: &'a [String]) -> Option<(&'a str, usize)> {
        let base = DomainUtils::canonicalize_domain(host);
        let mut best: Option<(&str, usize)> = None;
        for candidate in trusted {
            let distance = levenshtein(&base, &candidate.to_lowercase());
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((candidate.as_str(), distance));
            }
        }
        best
    }

    fn analyze_url(&self, url: &UrlFacts, ctx: &DetectionContext) -> Vec<Finding> {
        let checks = &ctx.config.extended_checks;
        let weights = &ctx.weights;
        let lowered = url.raw.to_lowercase();
        let mut findings = Vec::new();

        if url.raw.contains('@') {
            findings.push(Finding::new(
                FindingCategory::CredentialTrick,
                "URL contains @ (possible credential-stealing redirect)",
                weights.credential_trick,
            ));
        }

        if let Ok(parsed) = &url.parsed {
            if parsed.path.chars().count() > checks.max_path_length {
                findings.push(Finding::new(
                    FindingCategory::LongPath,
                    "Very long URL path",
                    weights.long_path,
                ));
            }
        }

        if self.newline_markers.iter().any(|m| lowered.contains(m)) {
            findings.push(Finding::new(
                FindingCategory::EncodedNewline,
                "URL contains encoded newline sequences",
                weights.encoded_newline,
            ));
        }

        if let Some(token) = checks
            .suspicious_tokens
            .iter()
            .find(|t| !t.is_empty() && lowered.contains(&t.to_lowercase()))
        {
            findings.push(Finding::new(
                FindingCategory::SuspiciousToken,
                format!("Suspicious URL token: '{token}'"),
                weights.suspicious_token,
            ));
        }

        if let Some(host) = url.host() {
            if let Some((nearest, distance)) =
                Self::nearest_trusted(host, &ctx.config.trusted_domains)
            {
                if distance > 0 && distance <= checks.max_brand_distance {
                    log::debug!("{host} is {distance} edit(s) from {nearest}");
                    let penalty = weights.near_brand_base - 10 * distance as i32;
                    findings.push(Finding::new(
                        FindingCategory::NearBrand,
                        format!(
                            "Hostname is very similar to trusted domain '{nearest}' (levenshtein={distance})"
                        ),
                        penalty,
                    ));
                }
            }
        }

        findings
    }
}

impl Detector for LinkAnalyzer {
    fn name(&self) -> &str {
        "link_analyzer"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        facts
            .urls
            .iter()
            .flat_map(|url| self.analyze_url(url, ctx))
            .collect()
    }
}
