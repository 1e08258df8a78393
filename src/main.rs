//! Sumi-Scribe main entry point
//!
//! This is the command-line interface for the Sumi-Scribe site harvester.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use sumi_scribe::config::{load_config_with_hash, load_sites, validate_site, Config, SiteKind, SiteRecord};
use sumi_scribe::crawler::harvest;
use sumi_scribe::extract::ContentSelection;
use sumi_scribe::output::print_statistics;
use sumi_scribe::state::PaginationState;
use tracing_subscriber::EnvFilter;

/// Sumi-Scribe: harvest website content into Markdown
///
/// Sumi-Scribe walks the sites listed in a CSV file, either following links
/// under a URL prefix or stepping through paginated article listings, and
/// writes the selected content of every page as a Markdown document. URLs
/// already processed in earlier runs are never fetched again.
#[derive(Parser, Debug)]
#[command(name = "sumi-scribe")]
#[command(version = "1.0.0")]
#[command(about = "Harvest website content into Markdown", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and site list and show the plan without fetching
    #[arg(long)]
    dry_run: bool,

    /// Site list CSV (overrides output.sites-file)
    #[arg(long, value_name = "CSV")]
    sites: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let sites_path = match cli.sites.or_else(|| config.output.sites_file.clone()) {
        Some(path) => path,
        None => bail!("No site list given: pass --sites or set output.sites-file"),
    };
    let sites = load_sites(&sites_path)
        .with_context(|| format!("Failed to load site list {}", sites_path.display()))?;
    tracing::info!("Loaded {} site records from {}", sites.len(), sites_path.display());

    if cli.dry_run {
        handle_dry_run(&config, &sites);
        return Ok(());
    }

    handle_harvest(config, &sites).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scribe=info,warn"),
            1 => EnvFilter::new("sumi_scribe=debug,info"),
            2 => EnvFilter::new("sumi_scribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates everything and prints the plan
fn handle_dry_run(config: &Config, sites: &[SiteRecord]) {
    println!("=== Sumi-Scribe Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!("  Load timeout: {}ms", config.crawler.load_timeout_ms);
    println!("  Settle delay: {}ms", config.crawler.settle_delay_ms);
    println!("  Empty pages before stopping: {}", config.crawler.max_empty_pages);
    println!(
        "  Listing page caps: {} (article list) / {} (whole page)",
        config.crawler.max_listing_pages, config.crawler.max_domain_listing_pages
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Root: {}", config.output.output_root.display());
    println!("  Visited log: {}", config.output.visited_file.display());
    println!("  Error logs: {}", config.output.log_dir().display());

    println!("\nSites ({}):", sites.len());
    let mut runnable = 0;
    for site in sites {
        println!("  - [{}] {} ({})", site.kind, site.url, site.source);
        if !matches!(site.kind, SiteKind::Base | SiteKind::Blog) {
            continue;
        }

        let selection = validate_site(site).and_then(|_| ContentSelection::from_site(site));
        match selection {
            Ok(selection) => {
                runnable += 1;
                println!(
                    "    container: {} ({})",
                    selection.container.raw(),
                    selection.container.kind()
                );
                if let Some(content) = &selection.content {
                    println!("    content: {} ({})", content.raw(), content.kind());
                }
                if site.kind == SiteKind::Blog {
                    let state = PaginationState::new(&site.url);
                    match &selection.article_list {
                        Some(list) => println!("    article list: {} ({})", list.raw(), list.kind()),
                        None => println!("    article list: whole page"),
                    }
                    println!("    pagination: {:?} on '{}'", state.format(), state.param());
                }
            }
            Err(e) => println!("    ✗ {}", e),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would process {} sites", runnable);
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, sites: &[SiteRecord]) -> anyhow::Result<()> {
    let (ctx, outcomes) = harvest(config, sites)
        .await
        .context("Failed to start harvest")?;

    let summary = ctx.stats.snapshot();
    tracing::info!(
        "Harvest completed: {} documents written, {} errors",
        summary.documents_written,
        summary.total_errors()
    );

    print_statistics(&summary, outcomes.len());
    Ok(())
}
