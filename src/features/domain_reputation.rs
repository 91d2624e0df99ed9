use super::{DetectionContext, Detector, Finding, FindingCategory};
use crate::config::EngineConfig;
use crate::domain_utils::DomainUtils;
use crate::extractor::ExtractedFacts;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainReputation {
    Blacklisted,           // Exact match on the configured blacklist
    SuspiciousTld(String), // Ends in a flagged TLD
    SafeProvider,          // Common consumer mail provider
    Unknown,               // Not categorized
}

impl DomainReputation {
    pub fn is_bad(&self) -> bool {
        matches!(
            self,
            DomainReputation::Blacklisted | DomainReputation::SuspiciousTld(_)
        )
    }
}

/// Lookup tables built once from the engine configuration.
#[derive(Debug, Clone)]
pub struct DomainReputationAnalyzer {
    blacklisted: HashSet<String>,
    safe_providers: HashSet<String>,
    suspicious_tlds: Vec<String>,
}

impl DomainReputationAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            blacklisted: config
                .blacklisted_domains
                .iter()
                .map(|d| DomainUtils::canonicalize_domain(d))
                .collect(),
            safe_providers: config
                .safe_email_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            suspicious_tlds: config
                .suspicious_tlds
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Blacklist first, then TLD, then the provider allowlist.
    pub fn analyze_domain(&self, domain: &str) -> DomainReputation {
        let domain = DomainUtils::canonicalize_domain(domain);

        if self.blacklisted.contains(&domain) {
            return DomainReputation::Blacklisted;
        }

        if let Some(tld) = DomainUtils::matching_tld(&domain, &self.suspicious_tlds) {
            return DomainReputation::SuspiciousTld(tld.to_string());
        }

        if self.safe_providers.contains(&domain) {
            return DomainReputation::SafeProvider;
        }

        DomainReputation::Unknown
    }
}

/// Addresses whose domain is not one of the common consumer providers.
pub struct EmailDomainDetector;

impl EmailDomainDetector {
    /// Scores one address domain; `None` when it is an allowlisted provider.
    pub fn check_domain(domain: &str, ctx: &DetectionContext) -> Option<Finding> {
        let domain = domain.trim().to_lowercase();
        if ctx
            .config
            .safe_email_domains
            .iter()
            .any(|safe| safe.eq_ignore_ascii_case(&domain))
        {
            return None;
        }
        Some(Finding::new(
            FindingCategory::SuspiciousEmailDomain,
            format!("Suspicious email domain: {domain}"),
            ctx.weights.suspicious_email_domain,
        ))
    }
}

impl Detector for EmailDomainDetector {
    fn name(&self) -> &str {
        "email_domain"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        facts
            .emails
            .iter()
            .filter_map(|email| DomainUtils::extract_domain(email))
            .filter_map(|domain| Self::check_domain(&domain, ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::quiet_context;

    #[test]
    fn test_domain_reputation_lookup() {
        let analyzer = DomainReputationAnalyzer::new(&EngineConfig::default());

        assert_eq!(
            analyzer.analyze_domain("malicious.com"),
            DomainReputation::Blacklisted
        );
        assert_eq!(
            analyzer.analyze_domain("WWW.FakeBank.com"),
            DomainReputation::Blacklisted
        );
        assert_eq!(
            analyzer.analyze_domain("cheap-deals.xyz"),
            DomainReputation::SuspiciousTld(".xyz".to_string())
        );
        assert_eq!(
            analyzer.analyze_domain("gmail.com"),
            DomainReputation::SafeProvider
        );
        assert_eq!(
            analyzer.analyze_domain("example.org"),
            DomainReputation::Unknown
        );
    }

    #[test]
    fn test_blacklist_is_exact() {
        let analyzer = DomainReputationAnalyzer::new(&EngineConfig::default());
        assert!(!analyzer.analyze_domain("notmalicious.com").is_bad());
        assert!(!analyzer.analyze_domain("mail.malicious.com").is_bad());
    }

    #[test]
    fn test_email_domain_detector() {
        let config = EngineConfig::default();
        let ctx = quiet_context(&config);
        let facts =
            ExtractedFacts::from_text("from alerts@secure-bank.top cc friend@gmail.com, x@Yahoo.com");

        let findings = EmailDomainDetector.detect(&facts, &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Suspicious email domain: secure-bank.top");
        assert_eq!(findings[0].contribution, 20);
    }

    #[test]
    fn test_check_domain() {
        let config = EngineConfig::default();
        let ctx = quiet_context(&config);
        assert!(EmailDomainDetector::check_domain("outlook.com", &ctx).is_none());
        assert!(EmailDomainDetector::check_domain("xyz-bank.click", &ctx).is_some());
    }
}
