pub mod aggregator;
pub mod analyzer;
pub mod attachment_analyzer;
pub mod authority;
pub mod batch;
pub mod config;
pub mod domain_age;
pub mod domain_utils;
pub mod error;
pub mod extractor;
pub mod features;
pub mod model;

pub use analyzer::RiskEngine;
pub use config::{load_config_or_default, EngineConfig, ScoringProfile, SignalMode};
pub use error::AnalysisError;
pub use features::{Finding, FindingCategory};
pub use model::{AnalysisInput, InputKind, RiskLevel, RiskResult, Verdict};
