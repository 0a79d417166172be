use std::time::Duration;

use crate::strategy::default_alternate_suffixes;

pub const DEFAULT_CONCURRENCY: usize = 16;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RDAP_BASE: &str = "https://rdap.org";

/// Runtime knobs shared by generation and classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Lookups in flight at once while classifying.
    pub concurrency: usize,
    /// Limit applied to each DNS, WHOIS and RDAP exchange.
    pub timeout: Duration,
    /// Stop after this many candidates; `None` for all of them.
    pub max_candidates: Option<usize>,
    /// Suffixes tried by the change-suffix strategy, in `.tld` form.
    pub alternate_suffixes: Vec<String>,
    pub rdap_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            max_candidates: None,
            alternate_suffixes: default_alternate_suffixes(),
            rdap_base: DEFAULT_RDAP_BASE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.concurrency, 16);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.max_candidates, None);
        assert!(settings.alternate_suffixes.contains(&".net".to_string()));
    }
}
