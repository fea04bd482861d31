//! Operator CLI for portal-gateway.
//!
//! Issues and inspects session tokens, generates signing secrets and reads
//! the unified message feed without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue an admin session token
//! cargo run --bin admin -- session issue --subject ops-1 --role admin --email ops@example.com
//!
//! # Verify a token and print its claims
//! cargo run --bin admin -- session inspect "<token>"
//!
//! # Generate a value for SESSION_SIGNING_SECRET
//! cargo run --bin admin -- secret generate
//!
//! # Show the newest messages of the unified feed
//! cargo run --bin admin -- messages list --limit 20
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `SESSION_SIGNING_SECRET`: required by `session` commands
//! - `DATABASE_URL`: required by `messages` and `db` commands

use portal_gateway::application::services::MessageService;
use portal_gateway::domain::credentials::CredentialVerifier;
use portal_gateway::domain::identity::Role;
use portal_gateway::infrastructure::credentials::HmacCredentials;
use portal_gateway::infrastructure::persistence::{
    PgContactFormRepository, PgInternalMessageRepository,
};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::RngCore;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for operating portal-gateway.
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
    /// Issue and inspect session tokens
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Signing secret helpers
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Read the unified message feed
    Messages {
        #[command(subcommand)]
        action: MessagesAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Issue a signed session token
    Issue {
        /// Subject id carried in the token
        #[arg(short, long)]
        subject: Option<String>,

        /// `client` or `admin`
        #[arg(short, long)]
        role: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Verify a token and print its claims
    Inspect { token: String },
}

#[derive(Subcommand)]
enum SecretAction {
    /// Print a random 32-byte hex secret
    Generate,
}

#[derive(Subcommand)]
enum MessagesAction {
    /// Print the newest messages
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Session { action } => handle_session_action(action)?,
        Commands::Secret { action } => match action {
            SecretAction::Generate => generate_secret(),
        },
        Commands::Messages { action } => {
            let pool = connect().await?;
            match action {
                MessagesAction::List { limit } => list_messages(pool, limit).await?,
            }
        }
        Commands::Db { action } => {
            let pool = connect().await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn credentials() -> Result<HmacCredentials> {
    let secret =
        std::env::var("SESSION_SIGNING_SECRET").context("SESSION_SIGNING_SECRET must be set")?;
    if secret.is_empty() {
        anyhow::bail!("SESSION_SIGNING_SECRET must not be empty");
    }
    Ok(HmacCredentials::new(secret))
}

fn handle_session_action(action: SessionAction) -> Result<()> {
    match action {
        SessionAction::Issue {
            subject,
            role,
            email,
            ttl_hours,
            yes,
        } => issue_session(subject, role, email, ttl_hours, yes),
        SessionAction::Inspect { token } => inspect_session(&token),
    }
}

/// Issues a session token with interactive prompts for missing values.
///
/// # Flow
///
/// 1. Prompt for subject and role (or use provided)
/// 2. Display token details
/// 3. Confirm (unless `--yes` flag)
/// 4. Print the token and a usage example
fn issue_session(
    subject: Option<String>,
    role: Option<String>,
    email: Option<String>,
    ttl_hours: i64,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Issue Session Token".bright_blue().bold());
    println!();

    let credentials = credentials()?;

    let subject = match subject {
        Some(s) => s,
        None => Input::new().with_prompt("Subject id").interact_text()?,
    };

    let role: Role = match role {
        Some(r) => r,
        None => Input::new()
            .with_prompt("Role (client/admin)")
            .with_initial_text("client")
            .interact_text()?,
    }
    .parse()
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    if role == Role::Anonymous {
        anyhow::bail!("Tokens can only be issued for CLIENT or ADMIN");
    }
    if ttl_hours <= 0 {
        anyhow::bail!("--ttl-hours must be positive");
    }

    println!("{}", "Token details:".bright_white().bold());
    println!("  Subject: {}", subject.cyan());
    println!("  Role:    {}", role.to_string().cyan());
    println!("  Email:   {}", email.as_deref().unwrap_or("-").cyan());
    println!("  TTL:     {}h", ttl_hours.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Issue this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token = credentials.issue(
        &subject,
        role,
        email.as_deref(),
        Duration::hours(ttl_hours),
        Utc::now(),
    );

    println!();
    println!("{}", "✅ Token issued".green().bold());
    println!();
    println!("  {}", token.bright_yellow());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/portal/me",
        token.bright_yellow()
    );
    println!();

    Ok(())
}

fn inspect_session(token: &str) -> Result<()> {
    let credentials = credentials()?;

    match credentials.verify(token, Utc::now()) {
        Ok(claim) => {
            println!("{}", "✅ Valid token".green().bold());
            println!("  Subject: {}", claim.subject_id.cyan());
            println!("  Role:    {}", claim.role.to_string().cyan());
            println!("  Email:   {}", claim.email.as_deref().unwrap_or("-").cyan());
            println!(
                "  Issued:  {}",
                claim.issued_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
            );
            println!(
                "  Expires: {}",
                claim.expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌ Invalid token:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Prints 32 random bytes as lowercase hex, suitable for `SESSION_SIGNING_SECRET`.
fn generate_secret() {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    println!("{}", hex::encode(bytes));
}

/// Prints the newest entries of the unified feed.
///
/// # Output Format
///
/// ```text
///   Received          Source        Status    Subject
///   2025-01-15 10:30  INTERNAL      UNREAD    Pedido 1042
///   2025-01-15 09:12  CONTACT_FORM  ARCHIVED  Formulario de contacto
/// ```
async fn list_messages(pool: PgPool, limit: usize) -> Result<()> {
    println!("{}", "📋 Messages".bright_blue().bold());
    println!();

    let pool = Arc::new(pool);
    let service = MessageService::new(
        Arc::new(PgInternalMessageRepository::new(pool.clone())),
        Arc::new(PgContactFormRepository::new(pool)),
    );

    let feed = service
        .list_unified()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read messages: {}", e))?;

    for source in &feed.unavailable {
        println!("{} {}", "⚠️  Source unavailable:".yellow(), source);
    }

    if feed.items.is_empty() {
        println!("{}", "  No messages found".yellow());
        return Ok(());
    }

    println!(
        "  {:<17} {:<13} {:<9} {}",
        "Received".bright_white().bold(),
        "Source".bright_white().bold(),
        "Status".bright_white().bold(),
        "Subject".bright_white().bold()
    );

    for message in feed.items.iter().take(limit) {
        println!(
            "  {:<17} {:<13} {:<9} {}",
            message
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            message.source.as_str(),
            message.status.as_str(),
            message.subject.cyan()
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        feed.items.len().min(limit).to_string().bright_white().bold(),
        feed.items.len()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
