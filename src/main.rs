use std::io::{self, Write};
use std::process;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::builder::TypedValueParser;
use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use typosquat::config::{Settings, DEFAULT_CONCURRENCY};
use typosquat::output::{render_candidate, render_classified};
use typosquat::strategy::normalize_suffix;
use typosquat::{
    classify_all, CandidateGenerator, DomainName, Filter, Format, NetworkResolver, Strategy,
    StrategySet,
};

#[derive(Parser, Debug)]
#[command(name = "typosquat")]
#[command(about = "Finds typo squatted domains")]
#[command(version)]
struct Cli {
    /// The domain to typo squat
    domain: String,

    /// Toggles whether to omit repeated characters (default: on)
    #[arg(long)]
    omit_chars: bool,

    /// Toggles whether to repeat single characters (default: on)
    #[arg(long)]
    repeat_chars: bool,

    /// Toggles whether to swap certain common character pairs (default: on)
    #[arg(long)]
    swap_chars: bool,

    /// Toggles whether to change the public suffix (default: off)
    #[arg(long)]
    change_suffix: bool,

    /// Print typo squat domains with addresses
    #[arg(short = 'A', long)]
    has_addresses: bool,

    /// Print typo squat domains that are already registered
    #[arg(short, long)]
    registered: bool,

    /// Print typo squat domains that can be registered
    #[arg(short, long)]
    unregistered: bool,

    /// Print the classification next to each domain
    #[arg(long)]
    status: bool,

    /// Print one JSON object per line
    #[arg(long)]
    json: bool,

    /// Comma separated suffixes tried by --change-suffix
    #[arg(long, value_delimiter = ',')]
    suffixes: Option<Vec<String>>,

    /// Maximum number of candidates to generate (unlimited if not specified)
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Number of domains checked at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    concurrency: usize,

    /// Seconds to wait for each DNS, WHOIS or RDAP answer
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Base URL of the RDAP service used for registration checks
    #[arg(long)]
    rdap_server: Option<String>,

    /// Show a spinner on stderr while checking domains
    #[arg(long)]
    progress: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn strategies(&self) -> StrategySet {
        let mut strategies = StrategySet::default();
        let toggles = [
            (self.omit_chars, Strategy::OmitRepeated),
            (self.repeat_chars, Strategy::RepeatSingle),
            (self.swap_chars, Strategy::SwapPair),
            (self.change_suffix, Strategy::ChangeSuffix),
        ];
        for (flag, strategy) in toggles {
            if flag {
                strategies.toggle(strategy);
            }
        }
        strategies
    }

    fn filter(&self) -> Filter {
        Filter {
            has_addresses: self.has_addresses,
            registered: self.registered,
            unregistered: self.unregistered,
        }
    }

    fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else if self.status {
            Format::Status
        } else {
            Format::Plain
        }
    }

    fn needs_classification(&self) -> bool {
        self.status || !self.filter().is_empty()
    }

    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings {
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout),
            max_candidates: self.max_candidates,
            ..Settings::default()
        };

        if let Some(suffixes) = &self.suffixes {
            let suffixes: Vec<String> = suffixes.iter().filter_map(|s| normalize_suffix(s)).collect();
            if suffixes.is_empty() {
                bail!("--suffixes needs at least one suffix");
            }
            settings.alternate_suffixes = suffixes;
        }
        if let Some(url) = &self.rdap_server {
            settings.rdap_base = url.clone();
        }

        Ok(settings)
    }
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} checked {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Writes one output line. `Ok(false)` once the reader has gone away
/// (`typosquat example.com | head`), which ends output without an error.
fn write_line<W: Write>(out: &mut W, line: &str) -> io::Result<bool> {
    match writeln!(out, "{}", line) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("typosquat: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let domain = DomainName::parse(&cli.domain)?;
    let settings = cli.settings()?;
    let strategies = cli.strategies();

    if cli.suffixes.is_some() && !strategies.change_suffix {
        warn!("--suffixes has no effect unless --change-suffix is enabled");
    }

    let generator = CandidateGenerator::new(domain, strategies)?
        .with_alternate_suffixes(settings.alternate_suffixes.clone());
    let candidates = generator
        .candidates()
        .take(settings.max_candidates.unwrap_or(usize::MAX));

    let format = cli.format();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !cli.needs_classification() {
        let mut generated = 0usize;
        for candidate in candidates {
            if !write_line(&mut out, &render_candidate(&candidate, format))? {
                break;
            }
            generated += 1;
        }
        info!(domain = %generator.domain(), generated, "generated typo squat domains");
        return Ok(());
    }

    let filter = cli.filter();
    let resolver = NetworkResolver::new(&settings);
    let progress = spinner(cli.progress);
    progress.set_message(generator.domain().to_string());

    let mut checked = 0usize;
    let mut printed = 0usize;
    let mut results = Box::pin(classify_all(&resolver, candidates, settings.concurrency));
    while let Some(classified) = results.next().await {
        checked += 1;
        progress.inc(1);
        if filter.matches(classified.classification) {
            let line = render_classified(&classified, format);
            if !progress.suspend(|| write_line(&mut out, &line))? {
                break;
            }
            printed += 1;
        }
    }
    progress.finish_and_clear();

    info!(domain = %generator.domain(), checked, printed, "checked typo squat domains");
    Ok(())
}
