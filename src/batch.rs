use crate::analyzer::RiskEngine;
use crate::model::{AnalysisInput, RiskResult};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Analyzes every input on the blocking pool and returns results in input order.
pub async fn analyze_batch(
    engine: Arc<RiskEngine>,
    inputs: Vec<AnalysisInput>,
) -> Result<Vec<RiskResult>> {
    log::debug!("Starting batch of {} input(s)", inputs.len());

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || engine.analyze_input(&input))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        let result = handle
            .await
            .with_context(|| format!("Analysis task {index} failed"))?;
        results.push(result);
    }

    Ok(results)
}

/// Parses JSON Lines input, skipping blank lines.
pub fn parse_jsonl(content: &str) -> Result<Vec<AnalysisInput>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid input on line {}", number + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::StaticAuthority;
    use crate::config::EngineConfig;
    use crate::domain_age::StaticDomainAge;
    use crate::model::InputKind;

    fn engine() -> Arc<RiskEngine> {
        Arc::new(RiskEngine::with_signals(
            EngineConfig::default(),
            Box::new(StaticAuthority(false)),
            Box::new(StaticDomainAge(false)),
        ))
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let inputs = vec![
            AnalysisInput::Url {
                url: "http://192.168.1.1/login".to_string(),
            },
            AnalysisInput::Domain {
                domain: "malicious.com".to_string(),
            },
            AnalysisInput::RawText {
                text: String::new(),
            },
            AnalysisInput::Attachment {
                filename: "invoice.pdf".to_string(),
                content: b"%PDF".to_vec(),
            },
        ];

        let results = analyze_batch(engine(), inputs).await.unwrap();
        let kinds: Vec<InputKind> = results.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InputKind::Url,
                InputKind::Domain,
                InputKind::Text,
                InputKind::Attachment
            ]
        );
        assert_eq!(results[0].score, Some(25));
        assert!(results[1].is_high());
        assert!(!results[3].is_high());
    }

    #[tokio::test]
    async fn test_batch_matches_sequential_results() {
        let engine = engine();
        let texts = [
            "https://xn--pple-43d.com",
            "Your account is suspended, click below",
            "http://paypa1.com/login",
        ];
        let inputs = texts
            .iter()
            .map(|t| AnalysisInput::RawText {
                text: t.to_string(),
            })
            .collect();

        let results = analyze_batch(Arc::clone(&engine), inputs).await.unwrap();
        for (text, result) in texts.iter().zip(&results) {
            assert_eq!(result, &engine.analyze(text));
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        assert!(analyze_batch(engine(), Vec::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_parse_jsonl() {
        let content = r#"{"type":"url","url":"http://example.com"}

{"type":"attachment","filename":"a.exe","content_base64":"TVo="}
"#;
        let inputs = parse_jsonl(content).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(
            inputs[1],
            AnalysisInput::Attachment {
                filename: "a.exe".to_string(),
                content: b"MZ".to_vec(),
            }
        );

        let err = parse_jsonl("{\"type\":\"url\"}\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
