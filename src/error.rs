use thiserror::Error;

/// Failures raised inside a single analysis pass.
///
/// Analyzers recover from every variant locally and turn it into a finding,
/// so none of these ever reach a caller of `RiskEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("malformed url: {0}")]
    MalformedUrl(String),
    #[error("no content to analyze")]
    EmptyInput,
}

/// Returns the input unchanged unless it is empty or whitespace-only.
pub fn ensure_content(text: &str) -> Result<&str, AnalysisError> {
    if text.trim().is_empty() {
        Err(AnalysisError::EmptyInput)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_content() {
        assert_eq!(ensure_content("hello"), Ok("hello"));
        assert_eq!(ensure_content("   \n\t"), Err(AnalysisError::EmptyInput));
        assert_eq!(ensure_content(""), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AnalysisError::MalformedUrl("ht!tp:/bad".to_string()).to_string(),
            "malformed url: ht!tp:/bad"
        );
        assert_eq!(AnalysisError::EmptyInput.to_string(), "no content to analyze");
    }
}
