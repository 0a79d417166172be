//! Combines the enabled strategies into one lazy, deduplicated stream of
//! candidate domains.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::domain::{is_valid_domain, DomainName};
use crate::error::GenerateError;
use crate::strategy::{
    default_alternate_suffixes, ChangeSuffix, OmitRepeated, RepeatSingle, Strategy, SwapPair,
};

/// Which strategies take part in a generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySet {
    pub omit_chars: bool,
    pub repeat_chars: bool,
    pub swap_chars: bool,
    pub change_suffix: bool,
}

impl Default for StrategySet {
    fn default() -> Self {
        StrategySet {
            omit_chars: true,
            repeat_chars: true,
            swap_chars: true,
            change_suffix: false,
        }
    }
}

impl StrategySet {
    pub fn none() -> Self {
        StrategySet {
            omit_chars: false,
            repeat_chars: false,
            swap_chars: false,
            change_suffix: false,
        }
    }

    pub fn all() -> Self {
        StrategySet {
            omit_chars: true,
            repeat_chars: true,
            swap_chars: true,
            change_suffix: true,
        }
    }

    pub fn only(strategy: Strategy) -> Self {
        StrategySet::none().with(strategy, true)
    }

    pub fn with(mut self, strategy: Strategy, enabled: bool) -> Self {
        *self.flag_mut(strategy) = enabled;
        self
    }

    pub fn toggle(&mut self, strategy: Strategy) {
        let flag = self.flag_mut(strategy);
        *flag = !*flag;
    }

    pub fn is_enabled(&self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::OmitRepeated => self.omit_chars,
            Strategy::RepeatSingle => self.repeat_chars,
            Strategy::SwapPair => self.swap_chars,
            Strategy::ChangeSuffix => self.change_suffix,
        }
    }

    /// Enabled strategies in evaluation order.
    pub fn enabled(&self) -> impl Iterator<Item = Strategy> + '_ {
        Strategy::ALL.into_iter().filter(|s| self.is_enabled(*s))
    }

    fn flag_mut(&mut self, strategy: Strategy) -> &mut bool {
        match strategy {
            Strategy::OmitRepeated => &mut self.omit_chars,
            Strategy::RepeatSingle => &mut self.repeat_chars,
            Strategy::SwapPair => &mut self.swap_chars,
            Strategy::ChangeSuffix => &mut self.change_suffix,
        }
    }
}

/// A generated domain and the strategy that produced it first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    pub domain: String,
    pub strategy: Strategy,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}

#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    domain: DomainName,
    strategies: StrategySet,
    alternate_suffixes: Vec<String>,
}

impl CandidateGenerator {
    pub fn new(domain: DomainName, strategies: StrategySet) -> Result<Self, GenerateError> {
        if domain.name().is_empty() {
            return Err(GenerateError::StrategyInput {
                suffix: domain.suffix().to_string(),
            });
        }

        Ok(CandidateGenerator {
            domain,
            strategies,
            alternate_suffixes: default_alternate_suffixes(),
        })
    }

    /// Replaces the suffix list used by the change-suffix strategy. Entries
    /// are expected in `.tld` form (see [`crate::strategy::normalize_suffix`]).
    pub fn with_alternate_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.alternate_suffixes = suffixes;
        self
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    /// Starts a fresh pass. Every call yields the same sequence.
    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            generator: self,
            pending: self.strategies.enabled().collect::<Vec<_>>().into_iter(),
            current: None,
            seen: HashSet::new(),
            original: self.domain.to_string().to_ascii_lowercase(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateGenerator {
    type Item = Candidate;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Candidates<'a> {
        self.candidates()
    }
}

enum Variants<'a> {
    Omit(OmitRepeated),
    Repeat(RepeatSingle),
    Swap(SwapPair),
    Suffix(ChangeSuffix<'a>),
}

impl<'a> Variants<'a> {
    fn start(strategy: Strategy, generator: &'a CandidateGenerator) -> Self {
        let name = generator.domain.name();
        match strategy {
            Strategy::OmitRepeated => Variants::Omit(OmitRepeated::new(name)),
            Strategy::RepeatSingle => Variants::Repeat(RepeatSingle::new(name)),
            Strategy::SwapPair => Variants::Swap(SwapPair::new(name)),
            Strategy::ChangeSuffix => Variants::Suffix(ChangeSuffix::new(
                generator.domain.suffix(),
                &generator.alternate_suffixes,
            )),
        }
    }

    // name strategies keep the suffix, the suffix strategy keeps the name
    fn next_domain(&mut self, domain: &DomainName) -> Option<String> {
        match self {
            Variants::Omit(iter) => iter.next().map(|v| v + domain.suffix()),
            Variants::Repeat(iter) => iter.next().map(|v| v + domain.suffix()),
            Variants::Swap(iter) => iter.next().map(|v| v + domain.suffix()),
            Variants::Suffix(iter) => iter.next().map(|s| format!("{}{}", domain.name(), s)),
        }
    }
}

/// Pull-based candidate sequence returned by [`CandidateGenerator::candidates`].
///
/// Holds only the per-pass dedup set; dropping it early needs no cleanup.
pub struct Candidates<'a> {
    generator: &'a CandidateGenerator,
    pending: std::vec::IntoIter<Strategy>,
    current: Option<(Strategy, Variants<'a>)>,
    seen: HashSet<String>,
    original: String,
}

impl<'a> Iterator for Candidates<'a> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let generator = self.generator;
        loop {
            if let Some((strategy, variants)) = self.current.as_mut() {
                while let Some(domain) = variants.next_domain(&generator.domain) {
                    if !is_valid_domain(&domain) {
                        trace!(%domain, strategy = %strategy, "dropping invalid variant");
                        continue;
                    }
                    let key = domain.to_ascii_lowercase();
                    if key == self.original || !self.seen.insert(key) {
                        continue;
                    }
                    return Some(Candidate {
                        domain,
                        strategy: *strategy,
                    });
                }
            }

            let strategy = self.pending.next()?;
            self.current = Some((strategy, Variants::start(strategy, generator)));
        }
    }
}
