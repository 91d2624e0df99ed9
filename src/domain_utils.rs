/// Minimal domain hierarchy utilities
pub struct DomainUtils;

const TWO_PART_TLDS: &[&str] = &[
    "co.uk", "com.au", "co.jp", "co.kr", "com.br", "co.za", "com.mx", "co.in", "com.sg", "co.nz",
    "com.ar", "co.il", "org.uk", "net.au", "gov.uk", "ac.uk", "edu.au",
];

impl DomainUtils {
    /// Domain part of an email address, lower-cased
    pub fn extract_domain(email: &str) -> Option<String> {
        let (local, domain) = email.trim().rsplit_once('@')?;
        let domain = domain.trim_end_matches('>').trim();
        if local.is_empty() || domain.is_empty() {
            return None;
        }
        Some(domain.to_lowercase())
    }

    /// Canonicalize domain (remove www prefix)
    pub fn canonicalize_domain(domain: &str) -> String {
        let domain_lower = domain.trim().to_lowercase();
        match domain_lower.strip_prefix("www.") {
            Some(stripped) => stripped.to_string(),
            None => domain_lower,
        }
    }

    /// First configured suffix (e.g. ".xyz") the domain ends with
    pub fn matching_tld<'a>(domain: &str, tlds: &'a [String]) -> Option<&'a str> {
        let domain_lower = domain.to_lowercase();
        tlds.iter()
            .map(String::as_str)
            .find(|tld| domain_lower.ends_with(&tld.to_lowercase()))
    }

    /// Registrable root of a host, e.g. "mail.example.co.uk" -> "example.co.uk"
    pub fn root_domain(domain: &str) -> String {
        let domain = domain.to_lowercase();
        let parts: Vec<&str> = domain.split('.').collect();
        if parts.len() < 2 {
            return domain;
        }

        let last_two = format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);
        if parts.len() >= 3 && TWO_PART_TLDS.contains(&last_two.as_str()) {
            return format!("{}.{}", parts[parts.len() - 3], last_two);
        }
        last_two
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            DomainUtils::extract_domain("user@Example.com"),
            Some("example.com".to_string())
        );
        assert_eq!(
            DomainUtils::extract_domain("<a@xyz-bank.click>"),
            Some("xyz-bank.click".to_string())
        );
        assert_eq!(DomainUtils::extract_domain("invalid"), None);
        assert_eq!(DomainUtils::extract_domain("@domain.com"), None);
        assert_eq!(DomainUtils::extract_domain("user@"), None);
    }

    #[test]
    fn test_canonicalize_domain() {
        assert_eq!(
            DomainUtils::canonicalize_domain("www.example.com"),
            "example.com"
        );
        assert_eq!(
            DomainUtils::canonicalize_domain("Example.com"),
            "example.com"
        );
    }

    #[test]
    fn test_matching_tld() {
        let tlds = vec![".xyz".to_string(), ".tk".to_string()];
        assert_eq!(DomainUtils::matching_tld("promo.XYZ", &tlds), Some(".xyz"));
        assert_eq!(DomainUtils::matching_tld("example.com", &tlds), None);
    }

    #[test]
    fn test_root_domain() {
        assert_eq!(DomainUtils::root_domain("example.com"), "example.com");
        assert_eq!(
            DomainUtils::root_domain("email.nationalgeographic.com"),
            "nationalgeographic.com"
        );
        assert_eq!(
            DomainUtils::root_domain("mail.example.co.uk"),
            "example.co.uk"
        );
        assert_eq!(
            DomainUtils::root_domain("test.company.com.au"),
            "company.com.au"
        );
        assert_eq!(DomainUtils::root_domain("single"), "single");
    }
}
