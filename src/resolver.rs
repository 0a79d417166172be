//! [`Resolver`] backed by live DNS, WHOIS and RDAP queries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::TokioAsyncResolver;

use crate::classify::Resolver;
use crate::config::Settings;
use crate::error::ResolutionError;
use crate::whois::{self, WhoisVerdict};

#[derive(Debug, Deserialize)]
struct RdapObject {
    #[serde(rename = "objectClassName")]
    object_class_name: String,
}

pub struct NetworkResolver {
    dns: TokioAsyncResolver,
    http: reqwest::Client,
    timeout: Duration,
    rdap_base: String,
}

impl NetworkResolver {
    pub fn new(settings: &Settings) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = settings.timeout;
        opts.attempts = 2;
        let dns = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("typosquat/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        NetworkResolver {
            dns,
            http,
            timeout: settings.timeout,
            rdap_base: settings.rdap_base.trim_end_matches('/').to_string(),
        }
    }

    fn timed_out(&self, domain: &str) -> ResolutionError {
        ResolutionError::Timeout {
            domain: domain.to_string(),
            timeout: self.timeout,
        }
    }

    fn lookup_error(domain: &str, source: ResolveError) -> ResolutionError {
        ResolutionError::Lookup {
            domain: domain.to_string(),
            source,
        }
    }

    async fn whois_status(&self, domain: &str) -> Result<Option<bool>, ResolutionError> {
        let verdict = whois::lookup(domain, self.timeout).await?;
        Ok(verdict.map(|verdict| verdict == WhoisVerdict::Registered))
    }

    async fn rdap_status(&self, domain: &str) -> Result<Option<bool>, ResolutionError> {
        let rdap_err = |source| ResolutionError::Rdap {
            domain: domain.to_string(),
            source,
        };

        let url = format!("{}/domain/{}", self.rdap_base, domain);
        let response = self.http.get(&url).send().await.map_err(rdap_err)?;

        match response.status() {
            reqwest::StatusCode::NOT_FOUND => Ok(Some(false)),
            status if status.is_success() => {
                let object: RdapObject = response.json().await.map_err(rdap_err)?;
                Ok(Some(object.object_class_name == "domain"))
            }
            status => {
                debug!(%domain, %status, "unexpected RDAP status");
                Ok(None)
            }
        }
    }

    async fn delegation_status(&self, domain: &str) -> Result<Option<bool>, ResolutionError> {
        match timeout(self.timeout, self.dns.ns_lookup(domain)).await {
            Err(_) => Err(self.timed_out(domain)),
            Ok(Ok(lookup)) => Ok(Some(lookup.iter().next().is_some())),
            Ok(Err(e)) => {
                let nxdomain = match e.kind() {
                    ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                        Some(*response_code == ResponseCode::NXDomain)
                    }
                    _ => None,
                };
                match nxdomain {
                    Some(true) => Ok(Some(false)),
                    // the name exists but is not a delegated zone
                    Some(false) => Ok(None),
                    None => Err(Self::lookup_error(domain, e)),
                }
            }
        }
    }
}

#[async_trait]
impl Resolver for NetworkResolver {
    async fn has_addresses(&self, domain: &str) -> Result<bool, ResolutionError> {
        match timeout(self.timeout, self.dns.lookup_ip(domain)).await {
            Err(_) => Err(self.timed_out(domain)),
            Ok(Ok(lookup)) => Ok(lookup.iter().next().is_some()),
            Ok(Err(e)) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => Ok(false),
            Ok(Err(e)) => Err(Self::lookup_error(domain, e)),
        }
    }

    // WHOIS, then RDAP, then the zone's NS delegation
    async fn is_registered(&self, domain: &str) -> Result<bool, ResolutionError> {
        let mut last_error = None;

        if let Some(registered) = settle(domain, self.whois_status(domain).await, &mut last_error) {
            return Ok(registered);
        }
        if let Some(registered) = settle(domain, self.rdap_status(domain).await, &mut last_error) {
            return Ok(registered);
        }
        if let Some(registered) =
            settle(domain, self.delegation_status(domain).await, &mut last_error)
        {
            return Ok(registered);
        }

        Err(conclude(domain, last_error))
    }
}

fn settle(
    domain: &str,
    outcome: Result<Option<bool>, ResolutionError>,
    last_error: &mut Option<ResolutionError>,
) -> Option<bool> {
    match outcome {
        Ok(answer) => answer,
        Err(e) => {
            debug!(%domain, error = %e, "registration source failed");
            *last_error = Some(e);
            None
        }
    }
}

/// Error reported once every registration source came up empty.
fn conclude(domain: &str, last_error: Option<ResolutionError>) -> ResolutionError {
    last_error.unwrap_or_else(|| ResolutionError::Inconclusive {
        domain: domain.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One-shot HTTP server. Resolves to the request head it received.
    async fn http_server(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let reply = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/rdap+json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn resolver_for(rdap_base: String) -> NetworkResolver {
        NetworkResolver::new(&Settings {
            timeout: Duration::from_secs(2),
            rdap_base,
            ..Settings::default()
        })
    }

    #[tokio::test]
    async fn rdap_not_found_means_unregistered() {
        let (base, request) = http_server("404 Not Found", "").await;
        let resolver = resolver_for(format!("{}/", base));

        assert_eq!(resolver.rdap_status("examplee.com").await.unwrap(), Some(false));
        assert!(request.await.unwrap().starts_with("GET /domain/examplee.com HTTP/1.1"));
    }

    #[tokio::test]
    async fn rdap_domain_object_means_registered() {
        let body = r#"{"objectClassName":"domain","ldhName":"EXAMPLE.COM"}"#;
        let (base, _request) = http_server("200 OK", body).await;
        let resolver = resolver_for(base);

        assert_eq!(resolver.rdap_status("example.com").await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn rdap_server_errors_are_undecided() {
        let (base, _request) = http_server("500 Internal Server Error", "").await;
        let resolver = resolver_for(base);

        assert_eq!(resolver.rdap_status("example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rdap_garbage_is_an_rdap_error() {
        let (base, _request) = http_server("200 OK", "<html>parked</html>").await;
        let resolver = resolver_for(base);

        let err = resolver.rdap_status("example.com").await.unwrap_err();
        assert!(matches!(err, ResolutionError::Rdap { .. }));
    }

    #[test]
    fn settled_answers_stop_the_chain() {
        let mut last_error = None;
        assert_eq!(settle("a.com", Ok(Some(true)), &mut last_error), Some(true));
        assert_eq!(settle("a.com", Ok(Some(false)), &mut last_error), Some(false));
        assert!(last_error.is_none());
    }

    #[test]
    fn undecided_chain_is_inconclusive() {
        let mut last_error = None;
        assert_eq!(settle("a.com", Ok(None), &mut last_error), None);
        assert_eq!(settle("a.com", Ok(None), &mut last_error), None);
        assert!(last_error.is_none());

        let err = conclude("a.com", last_error);
        assert!(matches!(err, ResolutionError::Inconclusive { ref domain } if domain == "a.com"));
    }

    #[test]
    fn failed_chain_reports_the_last_failure() {
        let mut last_error = None;
        let timeout = ResolutionError::Timeout {
            domain: "a.com".into(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(settle("a.com", Err(timeout), &mut last_error), None);
        // an undecided source after a failure keeps the failure
        assert_eq!(settle("a.com", Ok(None), &mut last_error), None);
        assert!(matches!(last_error, Some(ResolutionError::Timeout { .. })));

        let refused = ResolutionError::Whois {
            domain: "a.com".into(),
            source: std::io::ErrorKind::ConnectionRefused.into(),
        };
        assert_eq!(settle("a.com", Err(refused), &mut last_error), None);

        let err = conclude("a.com", last_error);
        assert!(matches!(err, ResolutionError::Whois { .. }));
    }
}
