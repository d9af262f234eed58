use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use sentiscope::analyzer::Analyzer;
use sentiscope::browser::chromium::ChromiumLauncher;
use sentiscope::browser::manager::SessionManager;
use sentiscope::browser::traits::Locator;
use sentiscope::config::Config;
use sentiscope::error::ClassifyError;
use sentiscope::output::terminal;
use sentiscope::resources::cache::ResourceCache;

/// Sentiscope: sentiment analysis for reviews, web pages and posts.
///
/// Classifies typed text with a pre-trained model, counts the links on a
/// rendered page, or fetches a post through a headless browser and
/// classifies it.
#[derive(Parser)]
#[command(name = "sentiscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the sentiment of a customer review
    Review {
        /// The review text
        text: String,
    },

    /// Count the hyperlinks on a web page
    Links {
        /// Page URL (http or https)
        url: String,

        /// Also print every link
        #[arg(long)]
        show: bool,
    },

    /// Fetch a post's text from its page and classify it
    Post {
        /// Post URL (http or https)
        url: String,

        /// CSS selector for the text node
        #[arg(long, conflicts_with = "xpath")]
        css: Option<String>,

        /// XPath expression for the text node (default: X.com post text)
        #[arg(long)]
        xpath: Option<String>,
    },

    /// Download the model artifacts and write the stopword list
    DownloadArtifacts,

    /// Show configuration and whether the model is ready
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sentiscope=info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            terminal::display_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Review { text } => {
            let analyzer = ready_analyzer(&config).await?;
            match analyzer.classify_sentiment(&text) {
                Ok(label) => terminal::display_card(&text, label),
                Err(ClassifyError::EmptyInput) => {
                    println!("Please enter a review to analyze.");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Links { url, show } => {
            let analyzer = build_analyzer(&config);
            println!("Fetching hyperlinks from {url}...");
            let links = analyzer.count_hyperlinks(&url).await?;
            terminal::display_hyperlinks(&links, show);
        }

        Commands::Post { url, css, xpath } => {
            let locator = match (css, xpath) {
                (Some(selector), _) => Locator::css(selector),
                (None, Some(expression)) => Locator::xpath(expression),
                (None, None) => Locator::default(),
            };

            let analyzer = ready_analyzer(&config).await?;
            println!("Fetching post from {url}...");
            match analyzer.fetch_and_classify(&url, &locator).await? {
                (Some(text), Some(label)) => terminal::display_card(&text, label),
                _ => println!("Could not find the post text on that page ({locator})."),
            }
        }

        Commands::DownloadArtifacts => {
            println!("Preparing model artifacts...");
            println!("  Destination: {}", config.artifact_dir.display());

            sentiscope::resources::download::download_artifacts(
                &config.artifact_dir,
                config.artifact_url.as_deref(),
            )
            .await?;

            println!("\n{}", "Artifacts ready.".bold());
            println!("You can now run `sentiscope review \"...\"` or `sentiscope post <url>`.");
        }

        Commands::Status => {
            let ready = sentiscope::resources::download::artifacts_present(&config.artifact_dir);
            println!("{}", "=== Sentiscope Status ===".bold());
            println!("  Artifact dir:      {}", config.artifact_dir.display());
            println!(
                "  Model artifacts:   {}",
                if ready {
                    "present".green()
                } else {
                    "missing".red()
                }
            );
            println!(
                "  Browser:           {}",
                config
                    .session
                    .chrome_executable
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "auto-detect".to_string())
            );
            println!(
                "  Navigation limit:  {:?} (settle {:?})",
                config.session.navigation_timeout, config.session.settle_delay
            );
            println!("  Node wait:         {:?}", config.session.node_wait);
        }
    }

    Ok(())
}

fn build_analyzer(config: &Config) -> Analyzer {
    let cache = Arc::new(ResourceCache::from_dir(&config.artifact_dir));
    let launcher = Arc::new(ChromiumLauncher::new(&config.session));
    Analyzer::new(cache, SessionManager::new(launcher, config.session.clone()))
}

/// Analyzer with the model already loaded.
async fn ready_analyzer(config: &Config) -> Result<Analyzer> {
    config.require_artifacts()?;
    let analyzer = build_analyzer(config);
    analyzer.prepare().await?;
    info!(dir = %config.artifact_dir.display(), "Model ready");
    Ok(analyzer)
}
