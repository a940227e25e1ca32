//! CLI binary for serp-report.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serp_report::output::default_output_path;
use serp_report::{AppConfig, Pipeline, RunRequest, SearchOverrides};
use serp_search::{Aggregator, CustomSearchEngine, ResultCache};
use tracing_subscriber::EnvFilter;

/// Search the web and save the results as a PDF report.
#[derive(Parser)]
#[command(name = "serp-report", version, about)]
struct Cli {
    /// Text to search for.
    search_term: String,

    /// Number of results to include.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    limit: u32,

    /// API key (overrides the config file).
    #[arg(short, long, env = "SERP_REPORT_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Search engine id (overrides the config file).
    #[arg(short, long)]
    id: Option<String>,

    /// Output PDF path.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip TLS certificate verification for search requests.
    #[arg(long)]
    no_verify: bool,

    /// Include result thumbnails.
    #[arg(long)]
    thumb: bool,

    /// Read and write the on-disk result cache.
    #[arg(long)]
    cache: bool,

    /// Start paging at the first result instead of the eleventh.
    #[arg(long)]
    from_first_page: bool,

    /// Overwrite an existing output file without asking.
    #[arg(short = 'y', long)]
    yes: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout stays clean for the summary line.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("serp_report=info,serp_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let query = cli.search_term.trim().to_owned();
    if query.is_empty() {
        eprintln!("<SEARCH_TERM> must not be empty");
        return Ok(ExitCode::FAILURE);
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let app_config = AppConfig::load_or_default(&config_path)?;

    let output = cli
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(&query, cli.limit));
    if output.exists() && !cli.yes && !confirm_overwrite(&output)? {
        eprintln!("\nexiting...");
        return Ok(ExitCode::FAILURE);
    }

    let overrides = SearchOverrides {
        api_key: cli.key,
        engine_id: cli.id,
        skip_tls_verify: cli.no_verify,
        from_first_page: cli.from_first_page,
    };
    let search_config = app_config.search_config(&overrides);
    let offset_mode = search_config.offset_mode;

    let engine = match CustomSearchEngine::new(search_config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to perform search with error:\n[{e}]");
            return Ok(ExitCode::FAILURE);
        }
    };
    let aggregator = Aggregator::new(engine).with_offset_mode(offset_mode);
    let pipeline = Pipeline::new(aggregator, ResultCache::new(app_config.data_dir()))
        .with_title(app_config.report.title.clone());

    let request = RunRequest {
        query,
        limit: cli.limit,
        use_cache: cli.cache,
        thumbnails: cli.thumb,
        output,
    };

    match pipeline.execute(&request).await {
        Ok(summary) => {
            if summary.cache_saved == Some(false) {
                eprintln!("Warning: failed to save results to cache");
            }
            let source = if summary.from_cache { " (cached)" } else { "" };
            println!(
                "Saved {} results{} to {} ({} pages)",
                summary.results,
                source,
                summary.output.display(),
                summary.pages
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Failed to perform search with error:\n[{e}]");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Ask whether `path` may be overwritten. Only `y` counts as yes.
fn confirm_overwrite(path: &std::path::Path) -> anyhow::Result<bool> {
    print!("{} already exists, overwrite? (y/N) ", path.display());
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim() == "y")
}
