use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::collectors::{CommitCollector, GitCollector};
use crate::domain::{ProviderConfig, ProviderKind, SlackTarget};
use crate::errors::LlmError;
use crate::infra::secrets::{SLACK_BOT_TOKEN, SLACK_WEBHOOK_URL};
use crate::infra::{init_tracing, ConfigManager, EnvSecretStore, SecretStore, StandupConfig};
use crate::llm::{create_client, StandupReport};
use crate::notify::SlackNotifier;
use crate::prompts::*;
use crate::transport::{HttpTransport, ReqwestTransport};

#[derive(Parser)]
#[command(name = "standup")]
#[command(about = "Turn today's commits into a standup report", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize today's commits into a standup report
    Generate(GenerateArgs),

    /// Check the configured Slack webhook or bot token
    TestSlack,

    /// Check repository, configuration and credentials
    Health,

    /// Write a default .standup.yml in the current repository
    Init,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// LLM provider (openai or gemini); defaults to the configured one
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model identifier; defaults to the configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Summarize this day instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Post the report to Slack after generating it
    #[arg(long)]
    pub send: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate_command(args).await,
        Commands::TestSlack => test_slack_command().await,
        Commands::Health => health_command().await,
        Commands::Init => init_command().await,
    }
}

async fn generate_command(args: GenerateArgs) -> Result<()> {
    eprintln!("{}", MSG_GENERATING.bold());

    let repo_root = get_git_repo_root()?;
    let config = ConfigManager::new(&repo_root)?.get();
    let secrets = EnvSecretStore::new();

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let commits = GitCollector::new()
        .commit_messages_on(&repo_root, date)
        .await?;

    if commits.is_empty() {
        eprintln!("{} {}", "⚠️".yellow(), MSG_NO_COMMITS);
        return Ok(());
    }
    tracing::debug!(count = commits.len(), "Commits to summarize");

    let kind: ProviderKind = match &args.provider {
        Some(tag) => tag.parse()?,
        None => config.provider,
    };
    let provider_config = resolve_provider_config(&config, kind, args.model.as_deref(), &secrets)?;

    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::with_timeout(config.request_timeout()));
    let client = create_client(kind, provider_config, transport.clone())?;
    eprintln!("Using {} ({})", kind.display_name(), client.model());

    let summary = unless_interrupted(client.summarize_commits(&commits), tokio::signal::ctrl_c())
        .await
        .context("Cancelled")?
        .context("Failed to generate standup")?;

    let report = StandupReport::new(date, commits.len(), summary);
    match &args.output {
        Some(path) => {
            std::fs::write(path, report.to_markdown())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Report written to {}", path.display());
        }
        None => println!("{}", report.to_markdown()),
    }

    if args.send {
        send_to_slack(&config, &secrets, transport, &report).await?;
    }

    Ok(())
}

/// Runs `work` to completion unless `interrupt` fires first.
///
/// If the interrupt source itself fails (no signal handler), `work` still runs.
async fn unless_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Option<T> {
    tokio::pin!(work);
    let signal = tokio::select! {
        out = &mut work => return Some(out),
        signal = interrupt => signal,
    };

    match signal {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            Some(work.await)
        }
    }
}

async fn send_to_slack(
    config: &StandupConfig,
    secrets: &dyn SecretStore,
    transport: Arc<dyn HttpTransport>,
    report: &StandupReport,
) -> Result<()> {
    let Some(target) = resolve_slack_target(config, secrets) else {
        eprintln!("{} {}", "⚠️".yellow(), MSG_SLACK_NOT_CONFIGURED);
        eprintln!("{}", MSG_SLACK_CONFIG_INSTRUCTION);
        return Ok(());
    };

    eprintln!("{}", MSG_SENDING_TO_SLACK);
    let notifier = SlackNotifier::new(target, transport);
    if notifier
        .send_commit_summary_for(&report.summary, report.commit_count, report.date)
        .await
    {
        eprintln!("{}", MSG_SLACK_SENT.green());
        Ok(())
    } else {
        anyhow::bail!("{}", MSG_SLACK_SEND_FAILED)
    }
}

async fn test_slack_command() -> Result<()> {
    let repo_root = get_git_repo_root().unwrap_or_else(|_| PathBuf::from("."));
    let config = ConfigManager::new(&repo_root)?.get();

    let Some(target) = resolve_slack_target(&config, &EnvSecretStore::new()) else {
        println!("{} {}", "⚠️".yellow(), MSG_SLACK_NOT_CONFIGURED);
        println!("{}", MSG_SLACK_CONFIG_INSTRUCTION);
        return Ok(());
    };

    println!("{}", MSG_TESTING_SLACK);
    let transport = Arc::new(ReqwestTransport::with_timeout(config.request_timeout()));
    let result = SlackNotifier::new(target, transport).test_connection().await;

    if result.success {
        println!(
            "{}",
            format!("✅ Slack connection successful! (Using {})", result.method).green()
        );
        Ok(())
    } else {
        anyhow::bail!(
            "❌ Slack connection failed: {}",
            result.error.unwrap_or_else(|| "unknown error".to_string())
        )
    }
}

async fn health_command() -> Result<()> {
    println!("{}", MSG_HEALTH_CHECK.bold());

    let mut all_ok = true;
    let secrets = EnvSecretStore::new();
    let mut config = StandupConfig::default();

    match get_git_repo_root() {
        Ok(root) => {
            println!("✓ Git repository: {}", root.display());

            let collector = GitCollector::new();
            match collector.health_check(&root).await {
                Ok(true) => match collector.todays_commit_messages(&root).await {
                    Ok(commits) => println!("✓ Commit history readable ({} today)", commits.len()),
                    Err(e) => {
                        println!("{} Commit history error: {:#}", "✗".red(), e);
                        all_ok = false;
                    }
                },
                Ok(false) => {
                    println!("{} Commit history unavailable", "✗".red());
                    all_ok = false;
                }
                Err(e) => {
                    println!("{} Commit history error: {:#}", "✗".red(), e);
                    all_ok = false;
                }
            }

            match ConfigManager::new(&root) {
                Ok(manager) => {
                    config = manager.get();
                    match manager.source() {
                        Some(path) => println!("✓ Configuration loaded from {}", path.display()),
                        None => println!("✓ Using default configuration"),
                    }
                }
                Err(e) => {
                    println!("{} Config error: {:#}", "✗".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("{} Not in a Git repository: {}", "✗".red(), e);
            all_ok = false;
        }
    }

    println!("\nAPI Configuration:");
    println!(
        "  Provider: {} ({})",
        config.provider.display_name(),
        config.model_for(config.provider)
    );
    for kind in [ProviderKind::OpenAi, ProviderKind::Gemini] {
        if secrets.get(kind.secret_name()).is_some() {
            println!("  ✓ {} API key configured", kind.display_name());
        } else if kind == config.provider {
            println!("  {} {} API key missing", "⚠️".yellow(), kind.display_name());
            println!("  {}", api_key_instruction(&EnvSecretStore::env_var(kind.secret_name())));
            all_ok = false;
        }
    }

    println!("\nSlack:");
    match resolve_slack_target(&config, &secrets).and_then(|t| t.delivery_method()) {
        Some(method) => println!("  ✓ Delivery via {} to {}", method, config.slack.default_channel),
        None => println!("  {} {}", "⚠️".yellow(), MSG_SLACK_NOT_CONFIGURED),
    }

    if all_ok {
        println!("{}", MSG_ALL_SYSTEMS_OK.green().bold());
    } else {
        println!("{}", MSG_ISSUES_DETECTED.yellow().bold());
    }

    Ok(())
}

async fn init_command() -> Result<()> {
    println!("{}", MSG_INITIALIZING.bold());

    let repo_root = get_git_repo_root()?;
    println!("Repository: {}", repo_root.display());

    match ConfigManager::create_default(&repo_root)? {
        Some(path) => println!("✓ Configuration created at {}", path.display()),
        None => println!("✓ Configuration already present"),
    }

    println!("\n{}", MSG_INIT_COMPLETE.green().bold());
    Ok(())
}

// Helper functions

/// Credential and model for `kind`. A missing key is reported here, before
/// any client is built.
pub fn resolve_provider_config(
    config: &StandupConfig,
    kind: ProviderKind,
    model_override: Option<&str>,
    secrets: &dyn SecretStore,
) -> Result<ProviderConfig> {
    let api_key = secrets.get(kind.secret_name()).ok_or_else(|| {
        anyhow::Error::new(LlmError::MissingApiKey(kind.display_name().to_string())).context(
            api_key_instruction(&EnvSecretStore::env_var(kind.secret_name())),
        )
    })?;

    let model = model_override.unwrap_or_else(|| config.model_for(kind));
    Ok(ProviderConfig::new(api_key).with_model(model))
}

/// Slack target with credentials attached, or `None` when neither a webhook
/// nor a bot token is available.
pub fn resolve_slack_target(config: &StandupConfig, secrets: &dyn SecretStore) -> Option<SlackTarget> {
    let mut target = config.slack_target();
    if let Some(url) = secrets.get(SLACK_WEBHOOK_URL) {
        target = target.with_webhook(url);
    }
    if let Some(token) = secrets.get(SLACK_BOT_TOKEN) {
        target = target.with_bot_token(token);
    }
    target.is_configured().then_some(target)
}

fn get_git_repo_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    repo_root_of(&cwd)
}

fn repo_root_of(path: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(path).context("Not in a git repository")?;
    repo.workdir()
        .map(Path::to_path_buf)
        .context("Repository has no working tree")
}
