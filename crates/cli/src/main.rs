//! Noteask - ask an AI assistant CLI about a document
//! Composition root: wiring, logging, commands

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::info;

use noteask_core::application::constants::LIVENESS_TIMEOUT;
use noteask_core::application::{
    ConfigurationService, ExecutableCache, OrchestratorConfig, PathResolver, RequestOrchestrator,
};
use noteask_core::domain::DEFAULT_COMMAND;
use noteask_core::port::time_provider::SystemTimeProvider;
use noteask_infra_system::{
    locations, JsonSettingsStore, SubprocessLivenessChecker, SubprocessRunner,
    SystemExecutableLocator,
};

use crate::config::RuntimeConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const CONNECTION_TEST_PROMPT: &str = "Hello";
const CHECK_PREVIEW_CHARS: usize = 100;

#[derive(Parser)]
#[command(name = "noteask")]
#[command(about = "Ask an AI assistant CLI about a document", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default: platform config directory)
    #[arg(long, global = true, env = "NOTEASK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Request timeout in seconds (overrides NOTEASK_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question about a document
    Ask {
        /// Document file (default: read from stdin)
        #[arg(short, long)]
        note: Option<PathBuf>,

        /// Question to ask
        question: String,
    },

    /// Show which executable will be used
    Resolve,

    /// Send a short greeting through the full request path
    Check,

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print current settings
    Show,

    /// Set the executable path ("claude" or "" switches back to auto-discovery)
    SetPath {
        /// Path to the executable
        path: String,
    },
}

/// Wired services
struct App {
    settings_path: PathBuf,
    configuration: ConfigurationService,
    executables: Arc<ExecutableCache>,
    orchestrator: RequestOrchestrator,
}

async fn build_app(cli: &Cli, runtime: &RuntimeConfig) -> Result<App> {
    let settings_path = cli
        .settings
        .clone()
        .or_else(locations::settings_file)
        .context("Could not determine the settings file location; pass --settings")?;
    let home = locations::home_dir();

    let resolver = PathResolver::new(
        Arc::new(SystemExecutableLocator::new()),
        Arc::new(SubprocessLivenessChecker::new()),
        LIVENESS_TIMEOUT,
    );
    let executables = Arc::new(ExecutableCache::new(
        resolver,
        locations::standard_candidates(DEFAULT_COMMAND, home.as_deref()),
        None,
    ));

    let configuration = ConfigurationService::new(
        Arc::new(JsonSettingsStore::new(&settings_path)),
        executables.clone(),
    );
    configuration.initialize().await?;

    let timeout = cli
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| runtime.timeout());

    let mut search_dirs = runtime.extra_search_dirs();
    search_dirs.extend(locations::standard_search_dirs(home.as_deref()));

    let runner = SubprocessRunner::new(Arc::new(SystemTimeProvider)).with_default_timeout(timeout);
    let orchestrator = RequestOrchestrator::new(
        Arc::new(runner),
        executables.clone(),
        OrchestratorConfig {
            search_dirs,
            working_dir: home.unwrap_or_else(|| PathBuf::from(".")),
            timeout,
            ..Default::default()
        },
    );

    Ok(App {
        settings_path,
        configuration,
        executables,
        orchestrator,
    })
}

async fn read_document(note: Option<PathBuf>) -> Result<String> {
    match note {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut body = String::new();
            tokio::io::stdin()
                .read_to_string(&mut body)
                .await
                .context("Failed to read document from stdin")?;
            Ok(body)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Runtime configuration + logging
    let runtime = RuntimeConfig::load()?;
    let log_dir = runtime.log_dir.clone().or_else(locations::log_dir);
    let _log_guard = logging::init_logging(&runtime.log_format, log_dir.as_deref())?;

    info!("Noteask v{} starting...", VERSION);

    // 2. Wiring
    let app = build_app(&cli, &runtime).await?;

    // 3. Command
    match cli.command {
        Commands::Ask { note, question } => {
            let body = read_document(note).await?;
            let response = app.orchestrator.ask(&body, &question).await?;
            println!("{}", response);
        }

        Commands::Resolve => match app.executables.current().await {
            Some(resolved) => println!("{} {}", "Executable:".green().bold(), resolved),
            None => anyhow::bail!(
                "No usable '{}' executable found. Install it or run `noteask config set-path <PATH>`",
                DEFAULT_COMMAND
            ),
        },

        Commands::Check => match app.orchestrator.ask("", CONNECTION_TEST_PROMPT).await {
            Ok(reply) => {
                let preview: String = reply.chars().take(CHECK_PREVIEW_CHARS).collect();
                let ellipsis = if reply.chars().count() > CHECK_PREVIEW_CHARS {
                    "..."
                } else {
                    ""
                };
                println!(
                    "{} {}{}",
                    "✅ Assistant responded:".green().bold(),
                    preview,
                    ellipsis
                );
            }
            Err(e) => {
                eprintln!("{}", "❌ Check failed".red().bold());
                return Err(anyhow::Error::new(e).context("Assistant check failed"));
            }
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let settings = app.configuration.settings()?;
                println!("{} {}", "Settings file:".bold(), app.settings_path.display());
                match settings.override_path() {
                    Some(path) => println!("{} {}", "Executable path:".bold(), path),
                    None => println!("{} auto-discover", "Executable path:".bold()),
                }
                println!(
                    "{} {}s",
                    "Request timeout:".bold(),
                    app.orchestrator.config().timeout.as_secs()
                );
            }
            ConfigAction::SetPath { path } => {
                match app.configuration.set_executable_path(&path).await? {
                    Some(resolved) => {
                        println!("{} {}", "✅ Executable:".green().bold(), resolved)
                    }
                    None => println!(
                        "{} no usable executable found; requests stay disabled",
                        "⚠".yellow().bold()
                    ),
                }
            }
        },
    }

    Ok(())
}
