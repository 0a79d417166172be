use std::collections::HashMap;
use std::time::Duration;

use lazy_static::lazy_static;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::error::ResolutionError;

/// Answers for TLDs, never for the domains under them.
pub const DIRECTORY_SERVER: &str = "whois.iana.org:43";

lazy_static! {
    static ref WHOIS_SERVERS: HashMap<&'static str, &'static str> = [
        ("com", "whois.verisign-grs.com:43"),
        ("net", "whois.verisign-grs.com:43"),
        ("org", "whois.pir.org:43"),
        ("info", "whois.afilias.net:43"),
        ("biz", "whois.neulevel.biz:43"),
        ("us", "whois.nic.us:43"),
        ("co", "whois.nic.co:43"),
        ("io", "whois.nic.io:43"),
        ("me", "whois.nic.me:43"),
        ("uk", "whois.nic.uk:43"),
        ("ca", "whois.cira.ca:43"),
        ("de", "whois.denic.de:43"),
        ("fr", "whois.afnic.fr:43"),
        ("ru", "whois.tcinet.ru:43"),
        ("cn", "whois.cnnic.net.cn:43"),
        ("jp", "whois.jprs.jp:43"),
        ("au", "whois.auda.org.au:43"),
        ("br", "whois.registro.br:43"),
        ("app", "whois.nic.google:43"),
        ("dev", "whois.nic.google:43"),
        ("xyz", "whois.nic.xyz:43"),
        ("online", "whois.nic.online:43"),
        ("site", "whois.nic.site:43"),
    ]
    .into_iter()
    .collect();
}

const AVAILABLE_MARKERS: [&str; 7] = [
    "no match",
    "not found",
    "no entries found",
    "domain status: available",
    "domain not found",
    "no data found",
    "status: free",
];

const REGISTERED_MARKERS: [&str; 5] = [
    "registrar:",
    "registrant:",
    "creation date:",
    "created:",
    "name server:",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhoisVerdict {
    Available,
    Registered,
}

/// Known WHOIS server for the domain's top-level label.
pub fn server_for(domain: &str) -> Option<&'static str> {
    let tld = domain.rsplit('.').next().unwrap_or("");
    WHOIS_SERVERS.get(tld.to_ascii_lowercase().as_str()).copied()
}

/// The `refer:` server named in a directory response, as `host:port`.
pub fn referral(response: &str) -> Option<String> {
    response.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if !key.trim().eq_ignore_ascii_case("refer") {
            return None;
        }
        let server = value.trim();
        if server.is_empty() {
            None
        } else if server.contains(':') {
            Some(server.to_string())
        } else {
            Some(format!("{}:43", server))
        }
    })
}

/// Reads a WHOIS response. `None` means the text gave no clear answer.
pub fn interpret(response: &str) -> Option<WhoisVerdict> {
    let response = response.to_lowercase();
    if AVAILABLE_MARKERS.iter().any(|m| response.contains(m)) {
        Some(WhoisVerdict::Available)
    } else if REGISTERED_MARKERS.iter().any(|m| response.contains(m)) {
        Some(WhoisVerdict::Registered)
    } else {
        None
    }
}

pub async fn query(domain: &str, server: &str, limit: Duration) -> Result<String, ResolutionError> {
    let io_err = |source: std::io::Error| ResolutionError::Whois {
        domain: domain.to_string(),
        source,
    };
    let timed_out = |_| ResolutionError::Timeout {
        domain: domain.to_string(),
        timeout: limit,
    };

    let mut stream = timeout(limit, TcpStream::connect(server))
        .await
        .map_err(timed_out)?
        .map_err(io_err)?;

    let request = format!("{}\r\n", domain);
    timeout(limit, stream.write_all(request.as_bytes()))
        .await
        .map_err(timed_out)?
        .map_err(io_err)?;

    let mut response = Vec::new();
    timeout(limit, stream.read_to_end(&mut response))
        .await
        .map_err(timed_out)?
        .map_err(io_err)?;

    Ok(String::from_utf8_lossy(&response).into_owned())
}

/// Asks the TLD's own WHOIS server about `domain`.
///
/// TLDs missing from the table are looked up in the IANA directory first and
/// the server it refers to is queried. The directory's own record describes
/// the TLD, so it is never read as an answer for the domain.
pub async fn lookup(
    domain: &str,
    limit: Duration,
) -> Result<Option<WhoisVerdict>, ResolutionError> {
    match server_for(domain) {
        Some(server) => Ok(interpret(&query(domain, server, limit).await?)),
        None => lookup_via_directory(domain, DIRECTORY_SERVER, limit).await,
    }
}

pub async fn lookup_via_directory(
    domain: &str,
    directory: &str,
    limit: Duration,
) -> Result<Option<WhoisVerdict>, ResolutionError> {
    let record = query(domain, directory, limit).await?;
    let Some(server) = referral(&record) else {
        debug!(%domain, %directory, "no WHOIS referral for this TLD");
        return Ok(None);
    };

    let response = query(domain, &server, limit).await?;
    Ok(interpret(&response))
}
