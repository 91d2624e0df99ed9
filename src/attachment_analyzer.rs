use crate::features::{Finding, FindingCategory};

const ARCHIVE_EXTENSIONS: [&str; 2] = ["zip", "rar"];
const EMBEDDED_EXECUTABLES: [&str; 8] = [".exe", ".scr", ".bat", ".cmd", ".com", ".pif", ".vbs", ".js"];

pub struct AttachmentAnalyzer;

impl AttachmentAnalyzer {
    /// Lower-cased text after the last '.', if there is one
    pub fn extension(filename: &str) -> Option<String> {
        let (_, ext) = filename.trim().rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }

    pub fn is_archive(filename: &str) -> bool {
        Self::extension(filename)
            .map(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Extension blacklist finding first, then one zero-weight finding per
    /// executable name seen inside an archive.
    pub fn analyze(
        filename: &str,
        content: &[u8],
        dangerous_extensions: &[String],
    ) -> (Vec<Finding>, Vec<String>) {
        let mut findings = Vec::new();

        if let Some(ext) = Self::extension(filename) {
            if dangerous_extensions.iter().any(|d| d.eq_ignore_ascii_case(&ext)) {
                findings.push(Finding::new(
                    FindingCategory::DangerousAttachment,
                    format!("Suspicious file extension (.{ext})"),
                    1,
                ));
            }
        }

        let embedded = if Self::is_archive(filename) {
            Self::find_embedded_executables(content)
        } else {
            Vec::new()
        };
        for name in &embedded {
            log::debug!("Archive {filename} appears to contain {name}");
            findings.push(Finding::new(
                FindingCategory::EmbeddedExecutable,
                format!("Archive contains executable: {name}"),
                0,
            ));
        }

        (findings, embedded)
    }

    /// Executable-looking file names in raw archive bytes. Member names are
    /// stored uncompressed, so a lossy text scan finds them without unpacking.
    pub fn find_embedded_executables(content: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(content);
        let lowered = text.to_ascii_lowercase();
        let mut filenames: Vec<String> = Vec::new();

        for pattern in EMBEDDED_EXECUTABLES {
            let mut search_from = 0;
            while let Some(offset) = lowered[search_from..].find(pattern) {
                let pos = search_from + offset;
                let end = pos + pattern.len();
                search_from = end;

                // ".js" inside ".json" is not an executable
                if lowered[end..]
                    .chars()
                    .next()
                    .map_or(false, |c| c.is_ascii_alphanumeric())
                {
                    continue;
                }

                let start = text[..pos]
                    .rfind(|c: char| c.is_whitespace() || c == '\0' || c == '/' || c.is_control())
                    .map(|i| i + text[i..].chars().next().map_or(1, char::len_utf8))
                    .unwrap_or(0);
                if start >= pos {
                    continue;
                }

                let filename = text[start..end].trim_matches('\0').trim();
                if !filename.is_empty()
                    && filename.len() < 100
                    && !filenames.iter().any(|f| f == filename)
                {
                    filenames.push(filename.to_string());
                }
            }
        }

        filenames
    }
}
