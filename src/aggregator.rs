//! Aggregator
//!
//! Turns an ordered finding list into a clamped score and verdict, or into
//! the coarse High/Low form used by the attachment, domain and email paths.

use crate::config::Thresholds;
use crate::features::Finding;
use crate::model::{InputKind, Presentation, RiskLevel, RiskResult, Verdict};

pub const MAX_SCORE: u8 = 100;

pub struct Aggregator {
    thresholds: Thresholds,
}

impl Aggregator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Sum of contributions, clamped to `0..=100`
    pub fn clamp_score(findings: &[Finding]) -> u8 {
        let total: i64 = findings.iter().map(|f| i64::from(f.contribution)).sum();
        total.clamp(0, i64::from(MAX_SCORE)) as u8
    }

    /// Thresholds are evaluated high to low.
    pub fn verdict_for(&self, score: u8) -> Verdict {
        if score >= self.thresholds.high {
            Verdict::High
        } else if score >= self.thresholds.moderate {
            Verdict::Moderate
        } else {
            Verdict::Low
        }
    }

    pub fn aggregate(
        &self,
        kind: InputKind,
        findings: Vec<Finding>,
        presentation: Presentation,
    ) -> RiskResult {
        let mut result = RiskResult::new(kind);

        match presentation {
            Presentation::Scored => {
                let score = Self::clamp_score(&findings);
                let verdict = self.verdict_for(score);
                result.score = Some(score);
                result.verdict = Some(verdict);
                result.risk = if verdict >= Verdict::Moderate {
                    RiskLevel::High
                } else {
                    RiskLevel::Low
                };
                result.reason = verdict.description().to_string();
            }
            Presentation::Binary => {
                match findings.iter().find(|f| f.contribution > 0) {
                    Some(first) => {
                        result.risk = RiskLevel::High;
                        result.reason = first.message.clone();
                    }
                    None => {
                        result.risk = RiskLevel::Low;
                        result.reason = "No issues".to_string();
                    }
                }
            }
        }

        result.findings = findings;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringProfile;
    use crate::features::FindingCategory;

    fn finding(contribution: i32) -> Finding {
        Finding::new(FindingCategory::Keyword, "kw", contribution)
    }

    fn standard() -> Aggregator {
        Aggregator::new(ScoringProfile::Standard.thresholds())
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(Aggregator::clamp_score(&[finding(50), finding(50), finding(35)]), 100);
        assert_eq!(Aggregator::clamp_score(&[finding(-40), finding(10)]), 0);
        assert_eq!(Aggregator::clamp_score(&[]), 0);
        assert_eq!(Aggregator::clamp_score(&[finding(i32::MAX), finding(i32::MAX)]), 100);
    }

    #[test]
    fn test_verdict_boundaries() {
        let agg = standard();
        assert_eq!(agg.verdict_for(0), Verdict::Low);
        assert_eq!(agg.verdict_for(24), Verdict::Low);
        assert_eq!(agg.verdict_for(25), Verdict::Moderate);
        assert_eq!(agg.verdict_for(59), Verdict::Moderate);
        assert_eq!(agg.verdict_for(60), Verdict::High);
        assert_eq!(agg.verdict_for(100), Verdict::High);

        let legacy = Aggregator::new(ScoringProfile::Legacy.thresholds());
        assert_eq!(legacy.verdict_for(39), Verdict::Low);
        assert_eq!(legacy.verdict_for(69), Verdict::Moderate);
        assert_eq!(legacy.verdict_for(70), Verdict::High);
    }

    #[test]
    fn test_verdict_is_monotonic() {
        let agg = standard();
        let mut previous = Verdict::Low;
        for score in 0..=MAX_SCORE {
            let verdict = agg.verdict_for(score);
            assert!(verdict >= previous);
            previous = verdict;
        }
    }

    #[test]
    fn test_scored_presentation() {
        let result = standard().aggregate(
            InputKind::Url,
            vec![finding(25), finding(8)],
            Presentation::Scored,
        );
        assert_eq!(result.score, Some(33));
        assert_eq!(result.verdict, Some(Verdict::Moderate));
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.reason, "MODERATE RISK (PROCEED WITH EXTREME CAUTION)");
        assert_eq!(result.findings.len(), 2);

        let result = standard().aggregate(InputKind::Text, vec![finding(10)], Presentation::Scored);
        assert_eq!(result.verdict, Some(Verdict::Low));
        assert_eq!(result.risk, RiskLevel::Low);
    }

    #[test]
    fn test_binary_presentation() {
        let result = standard().aggregate(
            InputKind::Attachment,
            vec![
                Finding::new(FindingCategory::NoContent, "nothing", 0),
                Finding::new(FindingCategory::DangerousAttachment, "first", 1),
                Finding::new(FindingCategory::EmbeddedExecutable, "second", 1),
            ],
            Presentation::Binary,
        );
        assert_eq!(result.score, None);
        assert_eq!(result.verdict, None);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.reason, "first");

        let result = standard().aggregate(InputKind::Domain, Vec::new(), Presentation::Binary);
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.reason, "No issues");
    }
}
