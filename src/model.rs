use crate::features::Finding;
use base64::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One unit of work for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisInput {
    RawText {
        text: String,
    },
    Url {
        url: String,
    },
    Email {
        subject: String,
        sender: String,
        body: String,
    },
    Attachment {
        filename: String,
        #[serde(
            rename = "content_base64",
            serialize_with = "encode_content",
            deserialize_with = "decode_content"
        )]
        content: Vec<u8>,
    },
    Domain {
        domain: String,
    },
}

fn encode_content<S: Serializer>(content: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64_STANDARD.encode(content))
}

fn decode_content<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Url,
    Email,
    Attachment,
    Domain,
}

/// Discrete tier derived from a clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Low,
    Moderate,
    High,
}

impl Verdict {
    pub fn description(&self) -> &'static str {
        match self {
            Verdict::High => "HIGH RISK (LIKELY PHISHING)",
            Verdict::Moderate => "MODERATE RISK (PROCEED WITH EXTREME CAUTION)",
            Verdict::Low => "LOW RISK (APPEARS SAFE)",
        }
    }
}

/// Coarse two-level risk present on every result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}

/// How the aggregator should present a finding list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Clamped score plus LOW/MODERATE/HIGH verdict.
    Scored,
    /// High if anything fired, Low otherwise.
    Binary,
}

/// Output of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub kind: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    pub risk: RiskLevel,
    pub reason: String,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls_found: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails_found: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url_checks: Vec<RiskResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded_files: Vec<String>,
}

impl RiskResult {
    /// Empty result shell; the aggregator fills in score, verdict and risk.
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            score: None,
            verdict: None,
            risk: RiskLevel::Low,
            reason: String::new(),
            findings: Vec::new(),
            url: None,
            domain: None,
            subject: None,
            sender: None,
            urls_found: Vec::new(),
            emails_found: Vec::new(),
            url_checks: Vec::new(),
            filename: None,
            size_bytes: None,
            embedded_files: Vec::new(),
        }
    }

    pub fn is_high(&self) -> bool {
        self.risk == RiskLevel::High
    }
}
