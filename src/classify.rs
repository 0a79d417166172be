//! Tagging candidates with their DNS/registration status.
//!
//! Resolver failures never escape from here: a candidate whose lookups fail
//! is tagged [`Classification::Unregistered`] and the stream carries on.

use std::fmt;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tracing::debug;

use crate::error::ResolutionError;
use crate::generator::Candidate;

/// Network-observable status queries for one domain.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn has_addresses(&self, domain: &str) -> Result<bool, ResolutionError>;

    async fn is_registered(&self, domain: &str) -> Result<bool, ResolutionError>;

    async fn is_unregistered(&self, domain: &str) -> Result<bool, ResolutionError> {
        self.is_registered(domain).await.map(|registered| !registered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    HasAddresses,
    RegisteredNoAddresses,
    Unregistered,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Classification::HasAddresses => "has-addresses",
            Classification::RegisteredNoAddresses => "registered-no-addresses",
            Classification::Unregistered => "unregistered",
        }
    }

    pub fn is_registered(self) -> bool {
        self != Classification::Unregistered
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified {
    pub candidate: Candidate,
    pub classification: Classification,
}

pub async fn classify<R>(resolver: &R, candidate: Candidate) -> Classified
where
    R: Resolver + ?Sized,
{
    let domain = candidate.domain.as_str();

    let classification = match resolver.has_addresses(domain).await {
        Ok(true) => Classification::HasAddresses,
        outcome => {
            if let Err(e) = outcome {
                debug!(%domain, error = %e, "address lookup failed");
            }
            match resolver.is_registered(domain).await {
                Ok(true) => Classification::RegisteredNoAddresses,
                Ok(false) => Classification::Unregistered,
                Err(e) => {
                    debug!(%domain, error = %e, "registration check failed");
                    Classification::Unregistered
                }
            }
        }
    };

    Classified {
        candidate,
        classification,
    }
}

/// Classifies candidates with at most `concurrency` lookups in flight.
///
/// Candidates are pulled from the iterator only as slots free up. Results
/// arrive in completion order, each paired with its own candidate.
pub fn classify_all<'a, R, I>(
    resolver: &'a R,
    candidates: I,
    concurrency: usize,
) -> impl Stream<Item = Classified> + 'a
where
    R: Resolver + ?Sized + 'a,
    I: IntoIterator<Item = Candidate>,
    I::IntoIter: 'a,
{
    stream::iter(candidates)
        .map(move |candidate| classify(resolver, candidate))
        .buffer_unordered(concurrency.max(1))
}
