//! CLI administration tool for contact-gateway.
//!
//! Checks configuration, renders the preview notification and inspects or clears
//! rate limit counters without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Validate configuration and print a summary
//! cargo run --bin admin -- config check
//!
//! # Render the preview notification to stdout or a file
//! cargo run --bin admin -- preview --out preview.html
//!
//! # Inspect a client's counter in the email bucket
//! cargo run --bin admin -- ratelimit show email 203.0.113.7
//!
//! # Clear it
//! cargo run --bin admin -- ratelimit reset email 203.0.113.7
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` (required for `ratelimit`): Redis connection string
//! - Everything `config check` validates, see `contact_gateway::config`

use contact_gateway::application::services::TemplateComposer;
use contact_gateway::config::{self, Config, mask_connection_string};
use contact_gateway::domain::entities::{NotificationDocument, RateLimitKey, SiteMetadata};
use contact_gateway::domain::ports::CounterStore;
use contact_gateway::infrastructure::counter::RedisCounterStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;

/// CLI tool for managing contact-gateway.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Configuration checks
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Render the preview notification
    Preview {
        /// Write the document to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Inspect or clear rate limit counters
    Ratelimit {
        #[command(subcommand)]
        action: RateLimitAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate configuration from the environment
    Check,
}

#[derive(Subcommand)]
enum RateLimitAction {
    /// Show the current count and remaining window for a client
    Show {
        /// Bucket name (`email` or `webhook`)
        bucket: String,
        /// Client address
        ip: String,
    },

    /// Delete a client's counter
    Reset {
        /// Bucket name (`email` or `webhook`)
        bucket: String,
        /// Client address
        ip: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Check => handle_config_check()?,
        },
        Commands::Preview { out } => handle_preview(out)?,
        Commands::Ratelimit { action } => handle_ratelimit_action(action).await?,
    }

    Ok(())
}

/// Loads configuration the same way the server does and prints what it found.
fn handle_config_check() -> Result<()> {
    println!("{}", "🔧 Configuration check".bright_blue().bold());
    println!();

    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("  {} {:#}", "✗".red().bold(), e);
            return Err(e);
        }
    };

    println!("  {:<24} {}", "Environment:".bright_white(), format!("{:?}", config.environment).cyan());
    println!("  {:<24} {}", "Listen:".bright_white(), config.listen_addr.cyan());
    println!(
        "  {:<24} {}",
        "Redis:".bright_white(),
        config
            .redis_url
            .as_deref()
            .map(mask_connection_string)
            .unwrap_or_else(|| "in-memory".to_string())
            .cyan()
    );
    println!(
        "  {:<24} {}:{} ({:?})",
        "SMTP:".bright_white(),
        config.smtp.host.cyan(),
        config.smtp.port,
        config.smtp.security
    );
    println!("  {:<24} {}", "Notify:".bright_white(), config.smtp.to.cyan());
    println!(
        "  {:<24} {}",
        "Webhook:".bright_white(),
        status_label(config.webhook.url.is_some())
    );
    println!(
        "  {:<24} {}",
        "Bot check secret:".bright_white(),
        status_label(config.recaptcha.secret_key.is_some())
    );
    println!(
        "  {:<24} {}",
        "Primary email oracle:".bright_white(),
        status_label(config.primary_email_oracle.url.is_some())
    );
    println!(
        "  {:<24} {}",
        "Secondary email oracle:".bright_white(),
        status_label(config.secondary_email_oracle.url.is_some())
    );
    println!();
    println!("{}", "✅ Configuration is valid".green().bold());

    Ok(())
}

fn status_label(configured: bool) -> ColoredString {
    if configured {
        "configured".green()
    } else {
        "not set".yellow()
    }
}

/// Renders the preview document with the configured site metadata.
///
/// Falls back to defaults when the app name or URL is not set, so the command also
/// works outside a deployment.
fn handle_preview(out: Option<PathBuf>) -> Result<()> {
    let app_name = std::env::var("APP_NAME").unwrap_or_else(|_| "Portfolio".to_string());
    let app_url = std::env::var("APP_URL").unwrap_or_else(|_| "https://yourdomain.com".to_string());

    let meta = SiteMetadata::current(&app_name, &app_url);
    let html = TemplateComposer::preview()
        .compose(&NotificationDocument::preview(&meta))
        .context("Failed to render preview")?;

    match out {
        Some(path) => {
            std::fs::write(&path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {}",
                "✅ Preview written to".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{}", html),
    }

    Ok(())
}

/// Dispatches rate limit commands.
async fn handle_ratelimit_action(action: RateLimitAction) -> Result<()> {
    let redis_url = Config::load_redis_url().context("REDIS_URL must be set")?;

    let store = RedisCounterStore::connect(&redis_url)
        .await
        .context("Failed to connect to Redis")?;

    match action {
        RateLimitAction::Show { bucket, ip } => show_counter(&store, RateLimitKey::new(bucket, ip)).await?,
        RateLimitAction::Reset { bucket, ip, yes } => {
            reset_counter(&store, RateLimitKey::new(bucket, ip), yes).await?
        }
    }

    Ok(())
}

async fn show_counter(store: &RedisCounterStore, key: RateLimitKey) -> Result<()> {
    let storage_key = key.storage_key();

    println!("{}", "📊 Rate limit counter".bright_blue().bold());
    println!();
    println!("  {:<10} {}", "Key:".bright_white(), storage_key.cyan());

    let count = store
        .peek(&storage_key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read counter: {}", e))?;

    match count {
        Some(count) => {
            let ttl = store
                .time_to_live(&storage_key)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read TTL: {}", e))?;

            println!("  {:<10} {}", "Count:".bright_white(), count.to_string().bright_yellow().bold());
            match ttl {
                Some(ttl) => println!("  {:<10} {}s", "Resets in:".bright_white(), ttl.as_secs()),
                None => println!("  {:<10} {}", "Resets in:".bright_white(), "no expiry".red()),
            }
        }
        None => println!("  {}", "No active window for this client".yellow()),
    }
    println!();

    Ok(())
}

async fn reset_counter(store: &RedisCounterStore, key: RateLimitKey, skip_confirm: bool) -> Result<()> {
    let storage_key = key.storage_key();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Reset counter {}?", storage_key))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = store
        .reset(&storage_key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to reset counter: {}", e))?;

    if deleted {
        println!("{} {}", "✅ Counter cleared:".green().bold(), storage_key.cyan());
    } else {
        println!("{} {}", "ℹ️  No counter found for".yellow(), storage_key.cyan());
    }

    Ok(())
}
