use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed domain {input:?}: {reason}")]
    MalformedDomain { input: String, reason: &'static str },
}

impl DomainError {
    pub(crate) fn malformed(input: &str, reason: &'static str) -> Self {
        DomainError::MalformedDomain {
            input: input.to_string(),
            reason,
        }
    }
}

/// Raised before generation starts; nothing is emitted for the invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("strategy input error: the name left after removing suffix {suffix:?} is empty")]
    StrategyInput { suffix: String },
}

/// Failure of a single network query for one candidate.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("lookup of {domain} timed out after {timeout:?}")]
    Timeout { domain: String, timeout: Duration },

    #[error("DNS lookup of {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },

    #[error("WHOIS query for {domain} failed: {source}")]
    Whois {
        domain: String,
        #[source]
        source: std::io::Error,
    },

    #[error("RDAP query for {domain} failed: {source}")]
    Rdap {
        domain: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unable to determine the status of {domain}")]
    Inconclusive { domain: String },
}
