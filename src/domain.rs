//! Splitting a raw domain into the registrant-controlled name and its public
//! suffix, using the Public Suffix List.

use std::fmt;

use url::Host;

use crate::error::DomainError;

/// A lowercase domain split at its public suffix.
///
/// `name` holds everything before the suffix (sub-domains included) and
/// `suffix` keeps its leading dot, so `name + suffix` is the whole domain:
///
/// * `example.com`       -> `example` + `.com`
/// * `shop.example.co.uk` -> `shop.example` + `.co.uk`
///
/// Internationalized input is stored in its ASCII (punycode) form, so
/// `bücher.de` becomes `xn--bcher-kva` + `.de`. Typo strategies therefore
/// mutate the `xn--` label rather than the Unicode spelling a user would type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName {
    name: String,
    suffix: String,
}

impl DomainName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(DomainError::malformed(raw, "empty domain"));
        }

        // Host::parse lowercases and converts IDNs to their punycode form
        let host = match Host::parse(trimmed) {
            Ok(Host::Domain(host)) => host,
            Ok(Host::Ipv4(_)) | Ok(Host::Ipv6(_)) => {
                return Err(DomainError::malformed(raw, "IP addresses have no public suffix"))
            }
            Err(_) => return Err(DomainError::malformed(raw, "not a valid host name")),
        };
        if !is_valid_domain(&host) {
            return Err(DomainError::malformed(raw, "not a valid host name"));
        }

        let suffix = match psl::suffix(host.as_bytes()) {
            Some(suffix) if suffix.is_known() => suffix,
            _ => return Err(DomainError::malformed(raw, "no recognizable public suffix")),
        };
        let suffix = std::str::from_utf8(suffix.as_bytes())
            .map_err(|_| DomainError::malformed(raw, "no recognizable public suffix"))?;

        let name = host
            .strip_suffix(suffix)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| DomainError::malformed(raw, "nothing left before the public suffix"))?;

        Ok(DomainName {
            name: name.to_string(),
            suffix: format!(".{}", suffix),
        })
    }

    /// Builds a domain from an already split name and suffix, for callers with
    /// their own suffix parsing. Only lowercasing is applied.
    pub fn from_parts(name: impl Into<String>, suffix: impl Into<String>) -> Self {
        DomainName {
            name: name.into().to_ascii_lowercase(),
            suffix: suffix.into().to_ascii_lowercase(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.suffix)
    }
}

impl std::str::FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DomainName::parse(s)
    }
}

/// Letter-digit-hyphen syntax check for a whole domain.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}
