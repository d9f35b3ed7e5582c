//! Conversation commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wirechat_core::error::AppError;
use wirechat_core::types::pagination::CursorQuery;
use wirechat_entity::conversation::{ConversationType, CreateConversation};
use wirechat_gateway::ConversationsApi;

use crate::output::{self, OutputFormat};

use super::build_context;

/// Arguments for conversation commands
#[derive(Debug, Args)]
pub struct ConversationsArgs {
    /// Conversation subcommand
    #[command(subcommand)]
    pub command: ConversationsCommand,
}

/// Conversation subcommands
#[derive(Debug, Subcommand)]
pub enum ConversationsCommand {
    /// List conversations, most recent activity first
    List {
        /// Page size
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        /// Opaque cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Show a conversation with its members
    Show {
        /// Conversation ID
        id: Uuid,
    },
    /// Start a direct conversation
    Direct {
        /// The other participant's user ID
        user_id: Uuid,
    },
    /// Create a group conversation
    Group {
        /// Group name
        #[arg(short, long)]
        name: String,
        /// Member user IDs
        #[arg(required = true)]
        members: Vec<Uuid>,
    },
}

/// Conversation display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ConversationRow {
    /// Conversation ID
    id: String,
    /// Direct or group
    kind: String,
    /// Display name
    name: String,
    /// Member count
    members: usize,
    /// Last activity
    last_activity: String,
}

/// Execute conversation commands
pub async fn execute(
    args: &ConversationsArgs,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let context = build_context(env)?;
    let api = ConversationsApi::new(context.client);

    match &args.command {
        ConversationsCommand::List { limit, cursor } => {
            let query = match cursor {
                Some(cursor) => CursorQuery::after(cursor.clone()),
                None => CursorQuery::first_page(),
            }
            .with_limit(*limit);
            let page = api.list(&query).await?;

            let rows: Vec<ConversationRow> = page
                .data
                .iter()
                .map(|item| ConversationRow {
                    id: item.conversation.id.to_string(),
                    kind: format!("{:?}", item.conversation.kind).to_lowercase(),
                    name: item.conversation.name.clone().unwrap_or_else(|| {
                        item.members
                            .iter()
                            .map(|m| m.user.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    }),
                    members: item.members.len(),
                    last_activity: item
                        .conversation
                        .last_message_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
            if let Some(cursor) = page.next_cursor() {
                println!("More results: --cursor {cursor}");
            }
        }
        ConversationsCommand::Show { id } => {
            let conversation = api.get(*id).await?;
            output::print_item(&conversation, format);
        }
        ConversationsCommand::Direct { user_id } => {
            let conversation = api
                .create(&CreateConversation {
                    kind: ConversationType::Direct,
                    name: None,
                    member_ids: vec![*user_id],
                })
                .await?;
            output::print_success(&format!(
                "Conversation {} ready",
                conversation.conversation.id
            ));
        }
        ConversationsCommand::Group { name, members } => {
            let conversation = api
                .create(&CreateConversation {
                    kind: ConversationType::Group,
                    name: Some(name.clone()),
                    member_ids: members.clone(),
                })
                .await?;
            output::print_success(&format!(
                "Group '{}' created as {}",
                name, conversation.conversation.id
            ));
        }
    }
    Ok(())
}
