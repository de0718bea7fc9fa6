use clap::{Parser, Subcommand, ValueEnum};
use elixir_releases::config::{self, CatalogConfig};
use elixir_releases::github::GitHubClient;
use elixir_releases::{cache, catalog, ReleaseDetail, ReleaseIndex, ReleaseMap, Result, VersionKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "elixir-releases")]
#[command(about = "Query the catalog of Elixir releases", long_about = None)]
struct Cli {
    /// Path to the catalog configuration
    #[arg(long, global = true, default_value = "catalog.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the release feed from GitHub into the local cache
    Sync,
    /// List known versions in ascending order
    List {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Print the latest stable release
    Latest,
    /// Show the full record for one version
    Show { version: String },
    /// List releases satisfying a requirement such as "~> 1.12"
    Match {
        requirement: String,
        /// Exclude pre-releases even when they fall inside the range
        #[arg(long)]
        no_pre: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Release,
    Prerelease,
}

impl From<KindArg> for VersionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Release => VersionKind::Release,
            KindArg::Prerelease => VersionKind::Prerelease,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sync => sync(&config).await,
        Commands::List { kind } => {
            let index = load_catalog(&config)?;
            for version in index.list_versions(kind.map(Into::into)) {
                println!("{}", version);
            }
            Ok(())
        }
        Commands::Latest => {
            let index = load_catalog(&config)?;
            match index.latest() {
                Some(version) => println!("{}", version),
                None => eprintln!("No stable release in the catalog"),
            }
            Ok(())
        }
        Commands::Show { version } => {
            let index = load_catalog(&config)?;
            let detail = index.require_release_data(&version)?;
            println!("{}", serde_json::to_string_pretty(detail)?);
            Ok(())
        }
        Commands::Match {
            requirement,
            no_pre,
        } => {
            let index = load_catalog(&config)?;
            let matching = index.release_data_matching(&requirement, !no_pre)?;
            print_releases(&matching);
            Ok(())
        }
    }
}

/// Build the index from the cached feed and publish it process-wide
fn load_catalog(config: &CatalogConfig) -> Result<Arc<ReleaseIndex>> {
    let index = cache::load_index(&config.cache_path, &config.normalize_options())?;
    Ok(catalog::install(index)?.snapshot())
}

fn print_releases(releases: &ReleaseMap<'_>) {
    let mut details: Vec<&ReleaseDetail> = releases.values().copied().collect();
    details.sort_by(|a, b| a.version.cmp(&b.version));

    for detail in details {
        let marker = if detail.is_prerelease { " (pre-release)" } else { "" };
        println!(
            "{}{}  published {}  {} assets",
            detail.version,
            marker,
            detail.published_at.format("%Y-%m-%d"),
            detail.assets.len()
        );
    }
}

async fn sync(config: &CatalogConfig) -> Result<()> {
    // Get GitHub token (optional)
    let github_token = std::env::var("GITHUB_TOKEN").ok();

    println!(
        "🚀 elixir-releases sync - {}/{}",
        config.owner, config.repo
    );
    println!();

    let gh_client = GitHubClient::new(github_token)?;
    if !gh_client.is_authenticated() {
        println!("⚠️  No GitHub token found - using unauthenticated requests (lower rate limits)");
        println!();
    }

    let rate_limit = gh_client.check_rate_limit().await?;
    println!(
        "⚡ GitHub API Rate Limit: {}/{}",
        rate_limit.remaining, rate_limit.limit
    );

    let releases = gh_client.fetch_releases(&config.owner, &config.repo).await?;
    println!("📦 Found {} releases", releases.len());

    // Validate before touching the cache so a bad feed never replaces a good one
    let index = elixir_releases::build_index_with(&releases, &config.normalize_options())?;
    cache::save_feed(&config.cache_path, &releases)?;

    println!(
        "✅ Cached {} releases at {:?} ({} indexed, latest {})",
        releases.len(),
        config.cache_path,
        index.len(),
        index
            .latest()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(())
}
