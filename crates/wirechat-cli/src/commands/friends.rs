//! Friend and friend-request commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wirechat_core::error::AppError;
use wirechat_core::types::pagination::CursorQuery;
use wirechat_entity::friend::FriendRequest;
use wirechat_gateway::FriendsApi;

use crate::output::{self, OutputFormat};

use super::build_context;

/// Arguments for friend commands
#[derive(Debug, Args)]
pub struct FriendsArgs {
    /// Friend subcommand
    #[command(subcommand)]
    pub command: FriendsCommand,
}

/// Friend subcommands
#[derive(Debug, Subcommand)]
pub enum FriendsCommand {
    /// List friends
    List {
        /// Page size
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        /// Opaque cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// List pending incoming requests
    Incoming,
    /// List pending outgoing requests
    Outgoing,
    /// Show the pending incoming request count
    Count,
    /// Send a friend request
    Add {
        /// Receiver user ID
        user_id: Uuid,
    },
    /// Accept an incoming request
    Accept {
        /// Request ID
        request_id: Uuid,
    },
    /// Decline an incoming request
    Decline {
        /// Request ID
        request_id: Uuid,
    },
}

/// Friend display row for table output
#[derive(Debug, Serialize, Tabled)]
struct FriendRow {
    /// User ID
    id: String,
    /// Display name
    name: String,
    /// Email
    email: String,
    /// Friends since
    since: String,
}

/// Friend-request display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RequestRow {
    /// Request ID
    id: String,
    /// Counterparty name
    name: String,
    /// Counterparty email
    email: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

fn request_rows(requests: &[FriendRequest], incoming: bool) -> Vec<RequestRow> {
    requests
        .iter()
        .map(|request| {
            let counterparty = if incoming {
                request.sender.as_ref()
            } else {
                request.receiver.as_ref()
            };
            RequestRow {
                id: request.id.to_string(),
                name: counterparty.map(|u| u.name.clone()).unwrap_or_default(),
                email: counterparty.map(|u| u.email.clone()).unwrap_or_default(),
                status: format!("{:?}", request.status).to_lowercase(),
                created_at: request.created_at.format("%Y-%m-%d %H:%M").to_string(),
            }
        })
        .collect()
}

/// Execute friend commands
pub async fn execute(args: &FriendsArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let context = build_context(env)?;
    let api = FriendsApi::new(context.client);

    match &args.command {
        FriendsCommand::List { limit, cursor } => {
            let query = match cursor {
                Some(cursor) => CursorQuery::after(cursor.clone()),
                None => CursorQuery::first_page(),
            }
            .with_limit(*limit);
            let page = api.list(&query).await?;

            let rows: Vec<FriendRow> = page
                .data
                .iter()
                .map(|friend| FriendRow {
                    id: friend.friend.id.to_string(),
                    name: friend.friend.name.clone(),
                    email: friend.friend.email.clone(),
                    since: friend.created_at.format("%Y-%m-%d").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
            if let Some(cursor) = page.next_cursor() {
                println!("More results: --cursor {cursor}");
            }
        }
        FriendsCommand::Incoming => {
            let page = api.incoming_requests(&CursorQuery::first_page()).await?;
            output::print_list(&request_rows(&page.data, true), format);
        }
        FriendsCommand::Outgoing => {
            let page = api.outgoing_requests(&CursorQuery::first_page()).await?;
            output::print_list(&request_rows(&page.data, false), format);
        }
        FriendsCommand::Count => {
            let count = api.incoming_count().await?;
            println!("{count}");
        }
        FriendsCommand::Add { user_id } => {
            let request = api.send_request(*user_id).await?;
            output::print_success(&format!("Friend request {} sent", request.id));
        }
        FriendsCommand::Accept { request_id } => {
            let friend = api.accept(*request_id).await?;
            output::print_success(&format!("You are now friends with {}", friend.friend.name));
        }
        FriendsCommand::Decline { request_id } => {
            api.decline(*request_id).await?;
            output::print_success("Request declined");
        }
    }
    Ok(())
}
