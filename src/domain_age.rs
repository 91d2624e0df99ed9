use crate::domain_utils::DomainUtils;
use rand::Rng;
use std::collections::HashMap;

/// Source of the "newly registered domain" signal.
///
/// A WHOIS-backed implementation would live behind this trait; the engine
/// itself never performs lookups.
pub trait DomainAgeSignal: Send + Sync {
    fn is_suspicious(&self, host: &str) -> bool;

    fn name(&self) -> &str;
}

/// Flags a fixed fraction of domains at random.
#[derive(Debug, Clone)]
pub struct SimulatedDomainAge {
    flag_probability: f64,
}

impl SimulatedDomainAge {
    pub fn new(flag_probability: f64) -> Self {
        Self {
            flag_probability: flag_probability.clamp(0.0, 1.0),
        }
    }
}

impl DomainAgeSignal for SimulatedDomainAge {
    fn is_suspicious(&self, _host: &str) -> bool {
        self.flag_probability > 0.0 && rand::thread_rng().gen_bool(self.flag_probability)
    }

    fn name(&self) -> &str {
        "simulated-domain-age"
    }
}

/// Known domain ages in days; unknown domains are treated as established.
#[derive(Debug, Clone)]
pub struct MockDomainAge {
    ages: HashMap<String, u32>,
    max_age_days: u32,
}

impl MockDomainAge {
    pub fn new(ages: HashMap<String, u32>, max_age_days: u32) -> Self {
        let ages = ages
            .into_iter()
            .map(|(domain, age)| (domain.to_lowercase(), age))
            .collect();
        Self { ages, max_age_days }
    }

    pub fn age_days(&self, host: &str) -> Option<u32> {
        let root = DomainUtils::root_domain(host);
        self.ages.get(&root).copied()
    }
}

impl DomainAgeSignal for MockDomainAge {
    fn is_suspicious(&self, host: &str) -> bool {
        match self.age_days(host) {
            Some(age) => {
                log::debug!(
                    "Domain {host} is {age} days old (threshold: {})",
                    self.max_age_days
                );
                age <= self.max_age_days
            }
            None => {
                log::debug!("No age data for domain: {host}");
                false
            }
        }
    }

    fn name(&self) -> &str {
        "mock-domain-age"
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StaticDomainAge(pub bool);

impl DomainAgeSignal for StaticDomainAge {
    fn is_suspicious(&self, _host: &str) -> bool {
        self.0
    }

    fn name(&self) -> &str {
        "static-domain-age"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock() -> MockDomainAge {
        MockDomainAge::new(
            HashMap::from([
                ("psybook.info".to_string(), 90),
                ("google.com".to_string(), 9000),
                ("suspicious.tk".to_string(), 30),
            ]),
            120,
        )
    }

    #[test]
    fn test_mock_domain_age() {
        let checker = mock();

        assert!(checker.is_suspicious("psybook.info"));
        assert!(checker.is_suspicious("mail.suspicious.tk"));
        assert!(!checker.is_suspicious("google.com"));
        assert!(!checker.is_suspicious("unknown.org"));
    }

    #[test]
    fn test_mock_uses_root_domain() {
        assert_eq!(mock().age_days("www.psybook.info"), Some(90));
        assert_eq!(mock().age_days("unknown.org"), None);
    }

    #[test]
    fn test_simulated_probability_extremes() {
        assert!(SimulatedDomainAge::new(1.0).is_suspicious("a.com"));
        assert!(!SimulatedDomainAge::new(0.0).is_suspicious("a.com"));
    }
}
