use serde::Serialize;

use crate::classify::{Classification, Classified};
use crate::generator::Candidate;
use crate::strategy::Strategy;

/// Classification filters selected on the command line. A candidate passes
/// when it matches any selected filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter {
    pub has_addresses: bool,
    pub registered: bool,
    pub unregistered: bool,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        !(self.has_addresses || self.registered || self.unregistered)
    }

    pub fn matches(&self, classification: Classification) -> bool {
        if self.is_empty() {
            return true;
        }
        (self.has_addresses && classification == Classification::HasAddresses)
            || (self.registered && classification.is_registered())
            || (self.unregistered && classification == Classification::Unregistered)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Bare domain per line.
    #[default]
    Plain,
    /// `domain, classification` per line.
    Status,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct Record<'a> {
    domain: &'a str,
    strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
}

fn render(candidate: &Candidate, classification: Option<Classification>, format: Format) -> String {
    match format {
        Format::Plain => candidate.domain.clone(),
        Format::Status => match classification {
            Some(classification) => format!("{}, {}", candidate.domain, classification),
            None => candidate.domain.clone(),
        },
        Format::Json => {
            let record = Record {
                domain: &candidate.domain,
                strategy: candidate.strategy,
                classification,
            };
            // a struct of strings and unit enums always serializes
            serde_json::to_string(&record).unwrap_or_default()
        }
    }
}

pub fn render_candidate(candidate: &Candidate, format: Format) -> String {
    render(candidate, None, format)
}

pub fn render_classified(classified: &Classified, format: Format) -> String {
    render(&classified.candidate, Some(classified.classification), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(domain: &str, classification: Classification) -> Classified {
        Classified {
            candidate: Candidate {
                domain: domain.to_string(),
                strategy: Strategy::SwapPair,
            },
            classification,
        }
    }

    #[test]
    fn empty_filter_passes_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(Classification::Unregistered));
        assert!(filter.matches(Classification::HasAddresses));
    }

    #[test]
    fn filters_combine_as_union() {
        let filter = Filter {
            has_addresses: true,
            unregistered: true,
            ..Filter::default()
        };
        assert!(filter.matches(Classification::HasAddresses));
        assert!(filter.matches(Classification::Unregistered));
        assert!(!filter.matches(Classification::RegisteredNoAddresses));
    }

    #[test]
    fn registered_includes_domains_with_addresses() {
        let filter = Filter {
            registered: true,
            ..Filter::default()
        };
        assert!(filter.matches(Classification::HasAddresses));
        assert!(filter.matches(Classification::RegisteredNoAddresses));
        assert!(!filter.matches(Classification::Unregistered));
    }

    #[test]
    fn renders_each_format() {
        let result = classified("freind.com", Classification::RegisteredNoAddresses);
        assert_eq!(render_classified(&result, Format::Plain), "freind.com");
        assert_eq!(
            render_classified(&result, Format::Status),
            "freind.com, registered-no-addresses"
        );
        assert_eq!(
            render_classified(&result, Format::Json),
            r#"{"domain":"freind.com","strategy":"swap-pair","classification":"registered-no-addresses"}"#
        );
        assert_eq!(
            render_candidate(&result.candidate, Format::Json),
            r#"{"domain":"freind.com","strategy":"swap-pair"}"#
        );
    }
}
