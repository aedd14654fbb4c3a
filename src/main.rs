use anyhow::Result;
use clap::{Parser, ValueEnum};
use industry_papers::affiliation::filter_by_company;
use industry_papers::api;
use industry_papers::config::{find_config_file, load_config, Config};
use industry_papers::models::PaperRecord;
use industry_papers::output::{csv, json, table};
use industry_papers::PaperFetcher;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Industry Papers - find PubMed papers with industry-affiliated authors
#[derive(Parser, Debug)]
#[command(name = "industry-papers")]
#[command(version = industry_papers::VERSION)]
#[command(about = "Fetch PubMed papers with non-academic authors and export them", long_about = None)]
struct Cli {
    /// Search query for PubMed
    #[arg(long, short, required_unless_present_any = ["serve", "print_config"])]
    query: Option<String>,

    /// Export papers to this CSV file instead of printing them
    #[arg(long, short, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Output format when not exporting
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Keep only papers with a company affiliation containing this text
    #[arg(long)]
    company: Option<String>,

    /// Number of detail requests in flight (default from config: 1)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Serve GET /fetch_papers/ on this address instead of running one query
    #[arg(long, value_name = "ADDR", conflicts_with_all = ["query", "export"])]
    serve: Option<SocketAddr>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// `{"papers": [...]}` JSON (machine-readable)
    Json,
    /// Table format (human-readable)
    Table,
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("industry_papers={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref())?;
    if let Some(concurrency) = cli.concurrency {
        config.fetch.concurrency = concurrency;
    }

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let fetcher = PaperFetcher::from_config(&config)?;

    if let Some(addr) = cli.serve {
        return api::serve(fetcher, addr).await;
    }

    let Some(query) = cli.query.as_deref() else {
        anyhow::bail!("--query is required");
    };

    if !cli.quiet {
        eprintln!("Searching for papers with query: {}", query);
    }

    let mut papers = fetcher.fetch_and_filter(query).await?;
    if let Some(company) = &cli.company {
        papers = filter_by_company(papers, company);
    }

    if papers.is_empty() {
        eprintln!("No papers found.");
        return Ok(());
    }

    match &cli.export {
        Some(path) => {
            csv::save_papers(path, &papers)?;
            println!("CSV saved successfully: {}", path.display());
        }
        None => output_papers(&papers, cli.output)?,
    }

    Ok(())
}

fn output_papers(papers: &[PaperRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::to_json_string(papers)?),
        OutputFormat::Table => println!("{}", table::render_table(papers)),
    }
    Ok(())
}
