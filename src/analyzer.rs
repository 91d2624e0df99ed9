//! Risk engine
//!
//! Entry points for every input shape. Each call is a single stateless pass:
//! extract facts, run the ordered detector set, aggregate.

use crate::aggregator::Aggregator;
use crate::attachment_analyzer::AttachmentAnalyzer;
use crate::authority::{ExternalAuthority, SimulatedAuthority};
use crate::config::{EngineConfig, SignalMode};
use crate::domain_age::{DomainAgeSignal, MockDomainAge, SimulatedDomainAge, StaticDomainAge};
use crate::domain_utils::DomainUtils;
use crate::error::{ensure_content, AnalysisError};
use crate::extractor::{extract_urls, ExtractedFacts};
use crate::features::domain_reputation::{
    DomainReputation, DomainReputationAnalyzer, EmailDomainDetector,
};
use crate::features::{DetectionContext, DetectorSet, Finding, FindingCategory};
use crate::model::{AnalysisInput, InputKind, Presentation, RiskLevel, RiskResult};

pub struct RiskEngine {
    config: EngineConfig,
    aggregator: Aggregator,
    authority: Box<dyn ExternalAuthority>,
    domain_age: Box<dyn DomainAgeSignal>,
    url_detectors: DetectorSet,
    text_detectors: DetectorSet,
    email_detectors: DetectorSet,
    domain_reputation: DomainReputationAnalyzer,
}

impl RiskEngine {
    /// Builds the engine with signal providers chosen by `signals.mode`.
    pub fn new(config: EngineConfig) -> Self {
        let signals = &config.signals;
        let markers = signals.known_bad_markers.clone();

        let (authority, domain_age): (Box<dyn ExternalAuthority>, Box<dyn DomainAgeSignal>) =
            match signals.mode {
                SignalMode::Simulated => (
                    Box::new(SimulatedAuthority::new(
                        markers,
                        signals.authority_probability,
                    )),
                    Box::new(SimulatedDomainAge::new(signals.domain_age_probability)),
                ),
                SignalMode::Mock => (
                    Box::new(SimulatedAuthority::markers_only(markers)),
                    Box::new(MockDomainAge::new(
                        signals.mock_domain_ages.clone(),
                        signals.max_domain_age_days,
                    )),
                ),
                SignalMode::Disabled => (
                    Box::new(SimulatedAuthority::markers_only(markers)),
                    Box::new(StaticDomainAge(false)),
                ),
            };

        Self::with_signals(config, authority, domain_age)
    }

    /// Builds the engine around caller-supplied signal providers.
    pub fn with_signals(
        config: EngineConfig,
        authority: Box<dyn ExternalAuthority>,
        domain_age: Box<dyn DomainAgeSignal>,
    ) -> Self {
        log::info!(
            "Risk engine ready (profile: {:?}, authority: {}, domain age: {}, extended checks: {})",
            config.profile,
            authority.name(),
            domain_age.name(),
            config.extended_checks.enabled
        );

        let url_detectors = DetectorSet::for_url(&config);
        log::debug!("URL detectors: {}", url_detectors.names().join(", "));

        Self {
            aggregator: Aggregator::new(config.thresholds()),
            url_detectors,
            text_detectors: DetectorSet::for_text(&config),
            email_detectors: DetectorSet::for_email(),
            domain_reputation: DomainReputationAnalyzer::new(&config),
            authority,
            domain_age,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn context(&self) -> DetectionContext<'_> {
        DetectionContext {
            config: &self.config,
            weights: self.config.weights(),
            authority: self.authority.as_ref(),
            domain_age: self.domain_age.as_ref(),
        }
    }

    fn no_content(&self, kind: InputKind, presentation: Presentation) -> RiskResult {
        log::debug!("{}", AnalysisError::EmptyInput);
        self.aggregator
            .aggregate(kind, vec![Finding::no_content()], presentation)
    }

    fn log_outcome(&self, result: &RiskResult) {
        log::debug!(
            "{:?} analysis: score={:?} verdict={:?} risk={:?} findings={}",
            result.kind,
            result.score,
            result.verdict,
            result.risk,
            result.findings.len()
        );
    }

    /// Generic entry point: URL-shaped input goes to the URL analyzer,
    /// everything else is treated as free text.
    pub fn analyze(&self, raw: &str) -> RiskResult {
        let text = match ensure_content(raw) {
            Ok(text) => text.trim(),
            Err(_) => return self.no_content(InputKind::Text, Presentation::Scored),
        };

        if text.to_ascii_lowercase().starts_with("http") {
            return self.analyze_url(text);
        }

        log::debug!("Analyzing free text ({} chars)", text.chars().count());
        let facts = ExtractedFacts::from_text(text);
        let findings = self.text_detectors.run(&facts, &self.context());

        let mut result = self
            .aggregator
            .aggregate(InputKind::Text, findings, Presentation::Scored);
        result.urls_found = facts.urls.iter().map(|u| u.raw.clone()).collect();
        result.emails_found = facts.emails.clone();
        self.log_outcome(&result);
        result
    }

    /// Full score/verdict analysis of a single URL.
    pub fn analyze_url(&self, url: &str) -> RiskResult {
        self.url_result(url, Presentation::Scored)
    }

    /// High/Low form of the URL analysis, driven by the first check that fired.
    pub fn analyze_url_coarse(&self, url: &str) -> RiskResult {
        self.url_result(url, Presentation::Binary)
    }

    fn url_result(&self, url: &str, presentation: Presentation) -> RiskResult {
        let url = match ensure_content(url) {
            Ok(url) => url,
            Err(_) => return self.no_content(InputKind::Url, presentation),
        };

        log::debug!("Analyzing URL: {url}");
        let facts = ExtractedFacts::from_url(url);
        let findings = self.url_detectors.run(&facts, &self.context());

        let mut result = self
            .aggregator
            .aggregate(InputKind::Url, findings, presentation);
        result.url = Some(facts.text.clone());
        result.domain = facts.urls.first().and_then(|u| u.host()).map(str::to_string);
        self.log_outcome(&result);
        result
    }

    /// Keywords over subject and body, sender domain reputation, and a
    /// coarse check of every URL in the body.
    pub fn analyze_email(&self, subject: &str, sender: &str, body: &str) -> RiskResult {
        if [subject, sender, body].iter().all(|s| s.trim().is_empty()) {
            return self.no_content(InputKind::Email, Presentation::Binary);
        }

        log::debug!("Analyzing email from {sender}: {subject}");
        let ctx = self.context();
        let facts = ExtractedFacts::from_text(&format!("{subject}\n{body}"));
        let mut findings = self.email_detectors.run(&facts, &ctx);

        let sender_domain = DomainUtils::extract_domain(sender).or_else(|| {
            let trimmed = sender.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
        });
        if let Some(domain) = sender_domain {
            findings.extend(EmailDomainDetector::check_domain(&domain, &ctx));
        }

        let urls_found = extract_urls(body);
        let url_checks: Vec<RiskResult> = urls_found
            .iter()
            .map(|url| self.analyze_url_coarse(url))
            .collect();

        let mut result = self
            .aggregator
            .aggregate(InputKind::Email, findings, Presentation::Binary);
        if result.risk == RiskLevel::Low {
            if let Some(flagged) = url_checks.iter().find(|check| check.is_high()) {
                result.risk = RiskLevel::High;
                result.reason = format!("Suspicious link: {}", flagged.reason);
            }
        }

        result.subject = Some(subject.to_string());
        result.sender = Some(sender.to_string());
        result.urls_found = urls_found;
        result.url_checks = url_checks;
        self.log_outcome(&result);
        result
    }

    /// Extension blacklist decision plus an embedded-executable scan for archives.
    pub fn analyze_attachment(&self, filename: &str, content: &[u8]) -> RiskResult {
        let name = match ensure_content(filename) {
            Ok(name) => name,
            Err(_) => {
                let mut result = self.no_content(InputKind::Attachment, Presentation::Binary);
                result.size_bytes = Some(content.len());
                return result;
            }
        };

        log::debug!("Analyzing attachment {name} ({} bytes)", content.len());
        let (findings, embedded) =
            AttachmentAnalyzer::analyze(name, content, &self.config.dangerous_extensions);

        let mut result = self
            .aggregator
            .aggregate(InputKind::Attachment, findings, Presentation::Binary);
        result.filename = Some(name.to_string());
        result.size_bytes = Some(content.len());
        result.embedded_files = embedded;
        self.log_outcome(&result);
        result
    }

    /// Exact blacklist or flagged-TLD match; no scoring.
    pub fn domain_reputation(&self, domain: &str) -> RiskResult {
        let domain = match ensure_content(domain) {
            Ok(domain) => domain,
            Err(_) => return self.no_content(InputKind::Domain, Presentation::Binary),
        };

        let canonical = DomainUtils::canonicalize_domain(domain);
        log::debug!("Checking domain reputation: {canonical}");

        let findings = match self.domain_reputation.analyze_domain(&canonical) {
            DomainReputation::Blacklisted => vec![Finding::new(
                FindingCategory::BlacklistedDomain,
                "Blacklisted domain",
                1,
            )],
            DomainReputation::SuspiciousTld(tld) => vec![Finding::new(
                FindingCategory::BlacklistedDomain,
                format!("Blacklisted domain (flagged TLD {tld})"),
                1,
            )],
            DomainReputation::SafeProvider | DomainReputation::Unknown => Vec::new(),
        };

        let mut result = self
            .aggregator
            .aggregate(InputKind::Domain, findings, Presentation::Binary);
        result.domain = Some(canonical);
        self.log_outcome(&result);
        result
    }

    pub fn analyze_input(&self, input: &AnalysisInput) -> RiskResult {
        match input {
            AnalysisInput::RawText { text } => self.analyze(text),
            AnalysisInput::Url { url } => self.analyze_url(url),
            AnalysisInput::Email {
                subject,
                sender,
                body,
            } => self.analyze_email(subject, sender, body),
            AnalysisInput::Attachment { filename, content } => {
                self.analyze_attachment(filename, content)
            }
            AnalysisInput::Domain { domain } => self.domain_reputation(domain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::StaticAuthority;
    use crate::config::ScoringProfile;
    use crate::model::Verdict;

    fn engine_with(config: EngineConfig) -> RiskEngine {
        RiskEngine::with_signals(
            config,
            Box::new(StaticAuthority(false)),
            Box::new(StaticDomainAge(false)),
        )
    }

    fn engine() -> RiskEngine {
        engine_with(EngineConfig::default())
    }

    fn has(result: &RiskResult, category: FindingCategory) -> bool {
        result.findings.iter().any(|f| f.category == category)
    }

    #[test]
    fn test_punycode_url() {
        let result = engine().analyze_url("https://xn--pple-43d.com");
        let punycode = result
            .findings
            .iter()
            .find(|f| f.category == FindingCategory::Punycode)
            .unwrap();
        assert_eq!(punycode.contribution, 35);
        assert!(result.score.unwrap() >= 35);
        assert_eq!(result.domain.as_deref(), Some("xn--pple-43d.com"));
    }

    #[test]
    fn test_raw_ip_url() {
        let result = engine().analyze_url("http://192.168.1.1/login");
        assert!(has(&result, FindingCategory::RawIpHost));
        assert!(!has(&result, FindingCategory::ExcessiveSubdomains));
        assert_eq!(result.score, Some(25));
        assert_eq!(result.verdict, Some(Verdict::Moderate));
        assert_eq!(result.risk, RiskLevel::High);
    }

    #[test]
    fn test_malformed_url_keeps_text_checks() {
        let result = engine().analyze_url("ht!tp:/bad account locked");
        let scored: Vec<(FindingCategory, i32)> = result
            .findings
            .iter()
            .map(|f| (f.category, f.contribution))
            .collect();
        assert_eq!(
            scored,
            vec![(FindingCategory::MalformedUrl, 10), (FindingCategory::Keyword, 8)]
        );
        assert_eq!(result.score, Some(18));
    }

    #[test]
    fn test_archive_with_multibyte_separator() {
        let result = engine().analyze_attachment("bundle.zip", b"PK\x03\x04\xc2\x85setup.exe\x00");
        assert_eq!(result.embedded_files, vec!["setup.exe".to_string()]);
        assert_eq!(result.risk, RiskLevel::High);
    }

    #[test]
    fn test_malformed_url_does_not_crash() {
        let result = engine().analyze_url("ht!tp:/bad");
        assert!(has(&result, FindingCategory::MalformedUrl));
        let score = result.score.unwrap();
        assert!(score <= 100);
        assert_eq!(result.domain, None);
    }

    #[test]
    fn test_typosquatting_url() {
        let result = engine().analyze_url("http://paypa1.com/login");
        assert!(has(&result, FindingCategory::Typosquatting));
    }

    #[test]
    fn test_score_is_clamped_when_everything_fires() {
        let engine = RiskEngine::with_signals(
            EngineConfig::default(),
            Box::new(StaticAuthority(true)),
            Box::new(StaticDomainAge(true)),
        );
        let result = engine.analyze_url(
            "http://a.b.g00gle.xn--p1ai.tk:8080/?t=dGhpcyBpcyBiYXNlNjQ=&m=urgent action required",
        );
        let raw: i32 = result.findings.iter().map(|f| f.contribution).sum();
        assert!(raw > 100);
        assert_eq!(result.score, Some(100));
        assert_eq!(result.verdict, Some(Verdict::High));
    }

    #[test]
    fn test_authority_marker_in_disabled_mode() {
        let mut config = EngineConfig::default();
        config.signals.mode = SignalMode::Disabled;
        let engine = RiskEngine::new(config);

        let result = engine.analyze_url("https://known-bad-site.com/");
        assert_eq!(result.findings[0].category, FindingCategory::ExternalAuthority);
        assert!(result.score.unwrap() >= 50);
    }

    #[test]
    fn test_mock_mode_uses_age_table() {
        let mut config = EngineConfig::default();
        config.signals.mode = SignalMode::Mock;
        let engine = RiskEngine::new(config);

        assert!(has(
            &engine.analyze_url("https://www.newdomain.info/"),
            FindingCategory::DomainAge
        ));
        assert!(!has(
            &engine.analyze_url("https://established.org/"),
            FindingCategory::DomainAge
        ));
    }

    #[test]
    fn test_empty_input() {
        let result = engine().analyze("   \n\t");
        assert_eq!(result.score, Some(0));
        assert_eq!(result.verdict, Some(Verdict::Low));
        assert_eq!(result.findings, vec![Finding::no_content()]);

        let result = engine().analyze_url("");
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.findings[0].category, FindingCategory::NoContent);
    }

    #[test]
    fn test_analyze_routes_urls() {
        let engine = engine();
        assert_eq!(
            engine.analyze("  http://192.168.1.1/login "),
            engine.analyze_url("http://192.168.1.1/login")
        );
        assert_eq!(engine.analyze("http://192.168.1.1/login").kind, InputKind::Url);
    }

    #[test]
    fn test_free_text_analysis() {
        let result =
            engine().analyze("Contact support@secure-mail.com urgent, log in at http://192.168.1.1/login");
        assert_eq!(result.kind, InputKind::Text);
        assert_eq!(result.urls_found, vec!["http://192.168.1.1/login"]);
        assert_eq!(result.emails_found, vec!["support@secure-mail.com"]);
        assert!(has(&result, FindingCategory::SuspiciousEmailDomain));
        assert!(has(&result, FindingCategory::RawIpHost));
        assert!(has(&result, FindingCategory::Keyword));
        assert!(result.score.unwrap() >= 55);
    }

    #[test]
    fn test_idempotent() {
        let engine = engine();
        let input = "URGENT: verify your account at http://g00gle.com.secure-login.xyz:8443/";
        assert_eq!(engine.analyze(input), engine.analyze(input));
    }

    #[test]
    fn test_suspicious_email() {
        let result = engine().analyze_email(
            "Account notice",
            "a@xyz-bank.click",
            "Please verify your account today.",
        );
        assert!(has(&result, FindingCategory::SuspiciousEmailDomain));
        assert!(has(&result, FindingCategory::Keyword));
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.score, None);
        assert_eq!(result.sender.as_deref(), Some("a@xyz-bank.click"));
    }

    #[test]
    fn test_clean_email_with_link() {
        let result = engine().analyze_email(
            "Hello",
            "friend@gmail.com",
            "See https://example.com/photos",
        );
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.reason, "No issues");
        assert_eq!(result.urls_found, vec!["https://example.com/photos"]);
        assert_eq!(result.url_checks.len(), 1);
        assert_eq!(result.url_checks[0].risk, RiskLevel::Low);
    }

    #[test]
    fn test_email_flagged_by_nested_url() {
        let result = engine().analyze_email(
            "Hi",
            "friend@gmail.com",
            "Photos here: http://192.168.1.1/login",
        );
        assert!(result.findings.is_empty());
        assert!(result.url_checks[0].is_high());
        assert_eq!(result.risk, RiskLevel::High);
        assert!(result.reason.starts_with("Suspicious link: "));
    }

    #[test]
    fn test_attachment() {
        let engine = engine();

        let result = engine.analyze_attachment("invoice.exe", b"MZ\x90\x00");
        assert_eq!(result.risk, RiskLevel::High);
        assert!(result.reason.contains(".exe"));
        assert_eq!(result.size_bytes, Some(4));
        assert_eq!(result.score, None);

        let result = engine.analyze_attachment("invoice.pdf", b"%PDF-1.7");
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.reason, "No issues");
        assert_eq!(result.filename.as_deref(), Some("invoice.pdf"));
    }

    #[test]
    fn test_domain_reputation() {
        let engine = engine();
        assert_eq!(engine.domain_reputation("malicious.com").risk, RiskLevel::High);
        assert_eq!(
            engine.domain_reputation("malicious.com").reason,
            "Blacklisted domain"
        );
        assert!(engine.domain_reputation("cheap-pills.xyz").is_high());
        assert_eq!(engine.domain_reputation("example.com").risk, RiskLevel::Low);
        assert_eq!(engine.domain_reputation("").findings[0].category, FindingCategory::NoContent);
    }

    #[test]
    fn test_legacy_profile_thresholds() {
        let config = EngineConfig {
            profile: ScoringProfile::Legacy,
            ..EngineConfig::default()
        };
        let result = engine_with(config).analyze_url("http://192.168.1.1/login");
        assert_eq!(result.score, Some(25));
        assert_eq!(result.verdict, Some(Verdict::Low));
        assert_eq!(result.risk, RiskLevel::Low);
    }

    #[test]
    fn test_analyze_input_dispatch() {
        let engine = engine();
        let input = AnalysisInput::Attachment {
            filename: "run.bat".to_string(),
            content: Vec::new(),
        };
        assert!(engine.analyze_input(&input).is_high());

        let input = AnalysisInput::Domain {
            domain: "fakebank.com".to_string(),
        };
        assert_eq!(engine.analyze_input(&input).kind, InputKind::Domain);
    }
}
