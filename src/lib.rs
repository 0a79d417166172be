//! Typo squatted domain generation and classification.
//!
//! ```no_run
//! use typosquat::{CandidateGenerator, DomainName, StrategySet};
//!
//! let domain = DomainName::parse("example.com")?;
//! let generator = CandidateGenerator::new(domain, StrategySet::default())?;
//! for candidate in generator.candidates() {
//!     println!("{} ({})", candidate, candidate.strategy);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod output;
pub mod resolver;
pub mod strategy;
pub mod whois;

pub use classify::{classify, classify_all, Classification, Classified, Resolver};
pub use config::Settings;
pub use domain::DomainName;
pub use error::{DomainError, GenerateError, ResolutionError};
pub use generator::{Candidate, CandidateGenerator, Candidates, StrategySet};
pub use output::{Filter, Format};
pub use resolver::NetworkResolver;
pub use strategy::Strategy;
