//! rustadsbib - NASA ADS Publication List Generator
//!
//! Queries the NASA ADS literature database for a researcher's publications,
//! formats each result into a citation line, groups the lines into sections
//! (major/minor, refereed/non-refereed) with manual injections, and writes
//! out the document. Extra subcommands cover group listings, affiliation
//! frequency exports, and token validation.
//!
//! ## Usage
//!
//! ```bash
//! rustadsbib generate --config bib.json --output publications.txt
//! rustadsbib verify-token
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustadsbib::ads::{AdsClient, SearchOptions};
use rustadsbib::config::{resolve_token, RunConfig};
use rustadsbib::document;
use rustadsbib::format::LineOptions;
use rustadsbib::paper::{dedup_papers, merge_curated};
use rustadsbib::pipeline::{
    collect_citations, collect_citations_keyed, merge_group_citations, PipelineParams,
};
use rustadsbib::section::Section;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// NASA ADS Publication List Generator
#[derive(Parser)]
#[command(name = "rustadsbib")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// ADS API token (falls back to ADS_API_TOKEN, then ~/.ads/dev_key)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the sectioned publication list
    Generate {
        /// Run configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document title
        #[arg(long)]
        title: Option<String>,
    },

    /// Merged major-refereed listing for a group of researchers
    Group {
        /// Run configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export affiliation frequencies as CSV
    Affiliations {
        /// Run configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "affiliations.csv")]
        output: PathBuf,
    },

    /// Validate the ADS API token with a probe query
    VerifyToken,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    let token = cli.token.as_deref();

    match cli.command {
        Commands::Generate {
            config,
            output,
            title,
        } => run_generate(config, output, title, token).await,
        Commands::Group { config, output } => run_group(config, output, token).await,
        Commands::Affiliations { config, output } => run_affiliations(config, output, token).await,
        Commands::VerifyToken => run_verify_token(token).await,
    }
}

/// Build an authenticated client and validate the token before any real work.
async fn authenticated_client(token_flag: Option<&str>) -> Result<AdsClient> {
    let token = resolve_token(token_flag)?;
    let client = AdsClient::new(token)?;
    client.verify_token().await?;
    Ok(client)
}

// ============================================================================
// Generate
// ============================================================================

async fn run_generate(
    config_path: PathBuf,
    output: Option<PathBuf>,
    title: Option<String>,
    token: Option<&str>,
) -> Result<()> {
    let config = RunConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {:?}", config_path))?;
    let client = authenticated_client(token).await?;

    let specs = if config.sections.is_empty() {
        println!("No sections configured, using the default layout.");
        RunConfig::default_sections()
    } else {
        config.sections.clone()
    };

    let line_options = LineOptions {
        cutoff: config.cutoff,
        highlight: config.highlight,
        ..Default::default()
    };

    let mut sections: Vec<Section> = Vec::new();
    for spec in &specs {
        println!("--- Section: {} ---", spec.name);

        let search = SearchOptions {
            refereed: spec.refereed,
            years: config.years,
            ..Default::default()
        };
        let papers = dedup_papers(client.search(&config.researcher, &search).await?);
        println!("Fetched {} papers.", papers.len());

        let params = PipelineParams {
            researcher: &config.researcher,
            line: line_options.clone(),
            authorship: spec.authorship,
            reject_keywords: spec.reject_keywords.as_deref(),
            select_keywords: spec.select_keywords.as_deref(),
            abstract_keywords: config.abstract_keywords.as_deref(),
        };
        let citations = collect_citations(&papers, &params);
        println!("Kept {} citations.", citations.len());

        let injections = spec.injections()?;
        sections.push(Section::assemble(
            spec.name.clone(),
            spec.authorship,
            &citations,
            &injections,
        ));
    }

    let title = title.unwrap_or_else(|| format!("Publications of {}", config.researcher));
    let rendered = document::render_document(&title, &sections);

    write_or_print(output, &rendered)?;
    let kept: usize = sections.iter().map(|s| s.lines.len()).sum();
    println!("\n✓ Generated {} sections, {} lines total.", sections.len(), kept);
    Ok(())
}

// ============================================================================
// Group
// ============================================================================

async fn run_group(
    config_path: PathBuf,
    output: Option<PathBuf>,
    token: Option<&str>,
) -> Result<()> {
    let config = RunConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {:?}", config_path))?;
    let client = authenticated_client(token).await?;

    let line_options = LineOptions {
        cutoff: config.cutoff,
        highlight: config.highlight,
        ..Default::default()
    };

    let mut batches = Vec::new();
    for member in config.group_members() {
        let search = SearchOptions {
            refereed: Some(true),
            years: member.years.or(config.years),
            ..Default::default()
        };
        let papers = client.search(&member.name, &search).await?;
        info!(member = %member.name, papers = papers.len(), "group query");

        let params = PipelineParams {
            researcher: &member.name,
            line: line_options.clone(),
            authorship: rustadsbib::filter::Authorship::Major,
            reject_keywords: None,
            select_keywords: None,
            abstract_keywords: config.abstract_keywords.as_deref(),
        };
        batches.push(collect_citations_keyed(&papers, &params));
    }

    let merged = merge_group_citations(batches);
    let body = merged
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    write_or_print(output, &body)?;
    println!("\n✓ {} unique group publications.", merged.len());
    Ok(())
}

// ============================================================================
// Affiliations
// ============================================================================

async fn run_affiliations(
    config_path: PathBuf,
    output: PathBuf,
    token: Option<&str>,
) -> Result<()> {
    let config = RunConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {:?}", config_path))?;
    let client = authenticated_client(token).await?;

    let search = SearchOptions {
        refereed: None,
        years: config.years,
        ..Default::default()
    };
    let queried = client.search(&config.researcher, &search).await?;
    let papers = merge_curated(queried, &config.extra_papers);
    println!("Counting affiliations over {} papers.", papers.len());

    let counts = document::affiliation_counts(&papers);
    document::write_affiliation_csv(&output, &counts)
        .with_context(|| format!("Failed to write {:?}", output))?;

    println!("✓ Saved {} affiliations to {:?}", counts.len(), output);
    Ok(())
}

// ============================================================================
// Verify Token
// ============================================================================

async fn run_verify_token(token: Option<&str>) -> Result<()> {
    authenticated_client(token).await?;
    println!("✓ ADS API token is valid.");
    Ok(())
}

/// Write to the output path, or print when none was given.
fn write_or_print(output: Option<PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Saved: {:?}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}
