use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use dewdrop::categorize::RuleSet;
use dewdrop::digest::{is_published, parse as parse_metadata, read_digest, record_published};
use dewdrop::export::{build_digest, extract_title, write_digest, ExportFormat};
use dewdrop::feed::FeedAggregator;
use dewdrop::state::DigestState;
use dewdrop::wordpress::{PostStatus, WordPressClient};
use dewdrop::{Config, DewdropError, Result};

#[derive(Parser)]
#[command(name = "dewdrop", version, about = "Developer blog digest curator")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "dewdrop.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch configured feeds and list categorized posts
    Fetch,
    /// Export a digest built from the configured feeds
    Export {
        /// Export format (html or markdown)
        #[arg(long)]
        format: Option<String>,
        /// Output directory override
        #[arg(long)]
        output: Option<String>,
    },
    /// Publish an exported digest file to WordPress
    Publish {
        /// Digest file to publish
        file: PathBuf,
        /// Create the remote post as a draft instead of publishing
        #[arg(long)]
        draft: bool,
        /// Skip the already-published confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the publication metadata embedded in a digest file
    Status {
        /// Digest file to inspect
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load_with_env(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config.display());
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = dewdrop::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        dewdrop::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Fetch => cmd_fetch(&config).await,
        Commands::Export { format, output } => cmd_export(&config, format, output).await,
        Commands::Publish { file, draft, yes } => cmd_publish(&config, &file, draft, yes).await,
        Commands::Status { file } => cmd_status(&file),
    }
}

/// Load the configured rule set, or the built-in rules when no rule
/// file is configured.
fn load_rules(config: &Config) -> RuleSet {
    if config.categories.rules_path.is_empty() {
        RuleSet::builtin()
    } else {
        RuleSet::load(&config.categories.rules_path)
    }
}

async fn cmd_fetch(config: &Config) -> Result<()> {
    let rules = load_rules(config);
    let aggregator = FeedAggregator::new(&config.feeds)?;
    let result = aggregator.collect().await;

    for failure in &result.failures {
        eprintln!("warning: {}: {}", failure.url, failure.error);
    }

    if result.posts.is_empty() {
        println!("No posts collected.");
        return Ok(());
    }

    for post in &result.posts {
        let category = rules.categorize(post);
        let mut line = format!("[{category}] {}", post.title);
        if let Some(author) = post.author.as_deref() {
            line.push_str(&format!(" \u{2013} {author}"));
        }
        if let Some(source) = post.source.as_deref() {
            line.push_str(&format!(" ({source})"));
        }
        println!("{line}");
        if let Some(link) = post.link.as_deref() {
            println!("    {link}");
        }
    }

    println!(
        "\n{} post(s) from {} feed(s), {} failure(s)",
        result.posts.len(),
        config.feeds.urls.len() - result.failures.len(),
        result.failures.len()
    );
    Ok(())
}

async fn cmd_export(
    config: &Config,
    format: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let format = ExportFormat::from_name(format.as_deref().unwrap_or(&config.export.format))?;
    let output_dir = output.unwrap_or_else(|| config.export.output_dir.clone());

    let rules = load_rules(config);
    let aggregator = FeedAggregator::new(&config.feeds)?;
    let result = aggregator.collect().await;

    for failure in &result.failures {
        warn!("Feed {} skipped: {}", failure.url, failure.error);
    }

    if result.posts.is_empty() {
        return Err(DewdropError::Export(
            "no posts collected from the configured feeds".to_string(),
        ));
    }

    let state = DigestState::new(&config.export.state_path, config.export.start_sequence);
    let sequence = state.next_sequence();

    let digest = build_digest(
        result.posts,
        &rules,
        &config.export,
        sequence,
        chrono::Utc::now(),
    );

    let path = write_digest(&digest, format, &output_dir, &config.export.timezone)?;
    state.advance(sequence)?;

    info!(
        "Exported digest #{} with {} post(s) to {}",
        sequence,
        digest.post_count(),
        path.display()
    );
    println!("{}", path.display());
    Ok(())
}

async fn cmd_publish(config: &Config, file: &Path, draft: bool, yes: bool) -> Result<()> {
    if !config.wordpress.enabled {
        return Err(DewdropError::Validation(
            "WordPress publishing is not enabled in the configuration".to_string(),
        ));
    }

    let content = read_digest(file)?;

    // Duplicate-publish guard: advisory, the user decides
    if is_published(&content) {
        let post_id = parse_metadata(&content)
            .and_then(|m| m.wordpress_post_id)
            .map(|id| format!(" (WordPress post {id})"))
            .unwrap_or_default();
        eprintln!(
            "This digest has already been published{post_id}."
        );
        if !yes && !confirm("Publish again anyway?") {
            println!("Publish cancelled.");
            return Ok(());
        }
    }

    let title = extract_title(&content)
        .or_else(|| {
            file.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .ok_or_else(|| DewdropError::Validation("digest has no usable title".to_string()))?;

    let status = if draft {
        PostStatus::Draft
    } else {
        PostStatus::Publish
    };

    let client = WordPressClient::new(&config.wordpress)?;
    let post = client.create_post(&title, &content, status).await?;
    info!("Created WordPress post {} ({})", post.id, status.as_str());
    println!("Published as WordPress post {}", post.id);
    if let Some(link) = post.link.as_deref() {
        println!("{link}");
    }

    // The remote post exists either way; a failed local update is a
    // warning, not a rollback
    if let Err(e) = record_published(file, post.id) {
        warn!(
            "Publish succeeded but updating {} failed: {}",
            file.display(),
            e
        );
        eprintln!(
            "warning: could not record publication in {}: {e}",
            file.display()
        );
    }

    Ok(())
}

fn cmd_status(file: &Path) -> Result<()> {
    let content = read_digest(file)?;
    match parse_metadata(&content) {
        Some(meta) => {
            println!("content id:    {}", meta.content_id);
            println!(
                "status:        {}",
                match meta.status {
                    dewdrop::PublicationStatus::Draft => "draft",
                    dewdrop::PublicationStatus::Published => "published",
                }
            );
            println!("last modified: {}", meta.last_modified.to_rfc3339());
            if let Some(published) = meta.published_date {
                println!("published:     {}", published.to_rfc3339());
            }
            if let Some(post_id) = meta.wordpress_post_id {
                println!("wordpress id:  {post_id}");
            }
        }
        None => println!("No publication metadata found."),
    }
    Ok(())
}

/// Ask for confirmation on stdin. Defaults to no.
fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N]: ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
