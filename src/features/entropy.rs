use super::{DetectionContext, Detector, Finding, FindingCategory};
use crate::extractor::ExtractedFacts;

/// Character entropy of the whole input above the configured threshold.
pub struct EntropyDetector;

impl Detector for EntropyDetector {
    fn name(&self) -> &str {
        "entropy"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        if facts.entropy > ctx.config.entropy_threshold {
            vec![Finding::new(
                FindingCategory::HighEntropy,
                format!("High entropy detected ({:.2})", facts.entropy),
                ctx.weights.high_entropy,
            )]
        } else {
            Vec::new()
        }
    }
}
