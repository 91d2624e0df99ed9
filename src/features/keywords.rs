use super::{DetectionContext, Detector, Finding, FindingCategory};
use crate::config::EngineConfig;
use crate::extractor::ExtractedFacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeywordTable {
    /// High-pressure phrases typical of lure URLs.
    Url,
    /// Phrases typical of phishing email bodies.
    Email,
}

/// Case-insensitive phrase matching; every phrase that occurs contributes once.
pub struct KeywordDetector {
    table: KeywordTable,
}

impl KeywordDetector {
    pub fn url_table() -> Self {
        Self {
            table: KeywordTable::Url,
        }
    }

    pub fn email_table() -> Self {
        Self {
            table: KeywordTable::Email,
        }
    }

    fn phrases<'a>(&self, config: &'a EngineConfig) -> &'a [String] {
        match self.table {
            KeywordTable::Url => &config.url_keywords,
            KeywordTable::Email => &config.email_keywords,
        }
    }

    /// Phrases from the table that occur in `lowered`, in table order
    pub fn matches<'a>(&self, lowered: &str, config: &'a EngineConfig) -> Vec<&'a str> {
        self.phrases(config)
            .iter()
            .map(String::as_str)
            .filter(|kw| !kw.is_empty() && lowered.contains(&kw.to_lowercase()))
            .collect()
    }
}

impl Detector for KeywordDetector {
    fn name(&self) -> &str {
        "keywords"
    }

    fn detect(&self, facts: &ExtractedFacts, ctx: &DetectionContext) -> Vec<Finding> {
        self.matches(&facts.lowered, ctx.config)
            .into_iter()
            .map(|kw| match self.table {
                KeywordTable::Url => Finding::new(
                    FindingCategory::Keyword,
                    format!("Found high-pressure phrase: '{kw}'"),
                    ctx.weights.url_keyword,
                ),
                KeywordTable::Email => Finding::new(
                    FindingCategory::Keyword,
                    format!("High-risk keyword found: '{kw}'"),
                    ctx.weights.email_keyword,
                ),
            })
            .collect()
    }
}
