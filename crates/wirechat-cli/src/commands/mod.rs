//! CLI command definitions and dispatch.

pub mod auth;
pub mod conversations;
pub mod friends;
pub mod listen;
pub mod messages;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use wirechat_auth::coordinator::RefreshCoordinator;
use wirechat_auth::refresher::HttpTokenRefresher;
use wirechat_auth::store::{CredentialStore, FileCredentialStore};
use wirechat_core::config::ClientConfig;
use wirechat_core::error::AppError;
use wirechat_gateway::ApiClient;

use crate::output::OutputFormat;

/// WireChat — realtime chat from the terminal
#[derive(Debug, Parser)]
#[command(name = "wirechat", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (loads config/<env>.toml over defaults)
    #[arg(short, long, default_value = "default")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login(auth::LoginArgs),
    /// Log out and clear the stored session
    Logout,
    /// Show the authenticated user
    Me,
    /// Friends and friend requests
    Friends(friends::FriendsArgs),
    /// Conversations
    Conversations(conversations::ConversationsArgs),
    /// Messages
    Messages(messages::MessagesArgs),
    /// Stream realtime events to the terminal
    Listen(listen::ListenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Login(args) => auth::login(args, &self.env).await,
            Commands::Logout => auth::logout(&self.env).await,
            Commands::Me => auth::me(&self.env, self.format).await,
            Commands::Friends(args) => friends::execute(args, &self.env, self.format).await,
            Commands::Conversations(args) => {
                conversations::execute(args, &self.env, self.format).await
            }
            Commands::Messages(args) => messages::execute(args, &self.env, self.format).await,
            Commands::Listen(args) => listen::execute(args, &self.env).await,
        }
    }
}

/// Shared wiring for every command: config, credential store, and the
/// authenticated client.
pub(crate) struct AppContext {
    pub config: ClientConfig,
    pub store: Arc<dyn CredentialStore>,
    pub client: Arc<ApiClient>,
}

pub(crate) fn build_context(env: &str) -> Result<AppContext, AppError> {
    let config = ClientConfig::load(env)?;
    let store: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::open(credentials_path()));
    let refresher = Arc::new(HttpTokenRefresher::new(&config.api)?);
    let coordinator = Arc::new(RefreshCoordinator::new(
        Arc::clone(&store),
        refresher,
        &config.auth,
    ));
    let client = Arc::new(ApiClient::new(
        &config.api,
        Arc::clone(&store),
        coordinator,
    )?);
    Ok(AppContext {
        config,
        store,
        client,
    })
}

/// Session file shared across CLI invocations.
fn credentials_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wirechat")
        .join("credentials.json")
}
