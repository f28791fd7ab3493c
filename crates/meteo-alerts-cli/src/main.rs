//! Meteo Alerts CLI — entry point.

use std::io::Read;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use meteo_alerts::{assemble_item, RawItem};
use meteo_alerts_cli::config::{resolve_feed_url, resolve_strategy, resolve_timeout_ms};
use meteo_alerts_cli::feed::{parse_feed, FeedClient};
use meteo_alerts_cli::filter::Cutoff;
use meteo_alerts_cli::pipeline::process;
use meteo_alerts_cli::present::{render, OutputFormat};

#[derive(Parser)]
#[command(
    name = "meteo-alerts",
    about = "Meteo Alerts — fetch meteorological alerts and print them as structured records",
    version
)]
struct Cli {
    /// Output records as JSON (machine-readable).
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Feed URL. Also reads METEO_ALERTS_URL.
    #[arg(long, global = true)]
    url: Option<String>,

    /// HTTP timeout in milliseconds. Also reads METEO_ALERTS_TIMEOUT_MS.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Extraction strategy (tree, tokens). Also reads METEO_ALERTS_STRATEGY.
    #[arg(long, global = true)]
    strategy: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the live feed and print its alerts (default).
    Fetch {
        #[command(flatten)]
        window: Window,
    },

    /// Process a saved RSS document ("-" reads stdin).
    Parse {
        /// Path to the RSS file.
        file: String,

        #[command(flatten)]
        window: Window,
    },

    /// Extract a single HTML description fragment ("-" reads stdin).
    Extract {
        /// Path to the HTML fragment.
        file: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

/// Publication-time window.
#[derive(clap::Args, Default)]
struct Window {
    /// Only alerts published at or after this time (RFC 3339 or RFC 2822).
    #[arg(long, conflicts_with = "hours")]
    since: Option<String>,

    /// Only alerts published within the last N hours.
    #[arg(long)]
    hours: Option<u32>,
}

impl Window {
    fn cutoff(&self) -> anyhow::Result<Option<Cutoff>> {
        if let Some(since) = &self.since {
            return Ok(Some(Cutoff::parse(since)?));
        }
        Ok(self
            .hours
            .map(|h| Cutoff::hours_before(chrono::Utc::now(), h))
            .transpose()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let result = run(&cli, format).await;

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": true,
                    "message": format!("{e:#}"),
                })
            );
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}

async fn run(cli: &Cli, format: OutputFormat) -> anyhow::Result<()> {
    let strategy = resolve_strategy(cli.strategy.as_deref())?;
    let mut stdout = std::io::stdout();

    match cli.command.as_ref().unwrap_or(&Commands::Fetch {
        window: Window::default(),
    }) {
        Commands::Fetch { window } => {
            let cutoff = window.cutoff()?;
            let url = resolve_feed_url(cli.url.as_deref());
            let client = FeedClient::new(resolve_timeout_ms(cli.timeout));
            let feed = client
                .fetch(&url)
                .await
                .with_context(|| format!("failed to fetch alerts from {url}"))?;
            let (records, _) = process(&feed.items, strategy, cutoff.as_ref());
            render(&records, format, &mut stdout)?;
        }

        Commands::Parse { file, window } => {
            let cutoff = window.cutoff()?;
            let xml = read_input(file)?;
            let feed = parse_feed(&xml).with_context(|| format!("failed to parse feed {file}"))?;
            let (records, _) = process(&feed.items, strategy, cutoff.as_ref());
            render(&records, format, &mut stdout)?;
        }

        Commands::Extract { file } => {
            let html = read_input(file)?;
            let item = RawItem {
                description_html: html,
                ..RawItem::default()
            };
            let assembly = assemble_item(&item, strategy);
            if let Some(err) = assembly.error {
                return Err(err).with_context(|| format!("failed to extract {file}"));
            }
            render(&[assembly.record], format, &mut stdout)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "meteo-alerts", &mut stdout);
        }
    }

    Ok(())
}

fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}
