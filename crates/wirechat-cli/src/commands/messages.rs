//! Message commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wirechat_core::error::AppError;
use wirechat_core::types::pagination::CursorQuery;
use wirechat_entity::message::{MessageType, SendMessage};
use wirechat_gateway::MessagesApi;

use crate::output::{self, OutputFormat};

use super::build_context;

/// Arguments for message commands
#[derive(Debug, Args)]
pub struct MessagesArgs {
    /// Message subcommand
    #[command(subcommand)]
    pub command: MessagesCommand,
}

/// Message subcommands
#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// List a conversation's history, newest first
    List {
        /// Conversation ID
        conversation_id: Uuid,
        /// Page size
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        /// Opaque cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Send a text message
    Send {
        /// Conversation ID
        conversation_id: Uuid,
        /// Message text
        content: String,
    },
}

/// Message display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MessageRow {
    /// Sent at
    at: String,
    /// Sender name
    sender: String,
    /// Text content
    content: String,
}

/// Execute message commands
pub async fn execute(args: &MessagesArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let context = build_context(env)?;
    let api = MessagesApi::new(context.client);

    match &args.command {
        MessagesCommand::List {
            conversation_id,
            limit,
            cursor,
        } => {
            let query = match cursor {
                Some(cursor) => CursorQuery::after(cursor.clone()),
                None => CursorQuery::first_page(),
            }
            .with_limit(*limit);
            let page = api.list(*conversation_id, &query).await?;

            let rows: Vec<MessageRow> = page
                .data
                .iter()
                .map(|message| MessageRow {
                    at: message.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    sender: message
                        .sender
                        .as_ref()
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| "system".to_string()),
                    content: message.content.clone().unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
            if let Some(cursor) = page.next_cursor() {
                println!("More results: --cursor {cursor}");
            }
        }
        MessagesCommand::Send {
            conversation_id,
            content,
        } => {
            let message = api
                .send(&SendMessage {
                    conversation_id: *conversation_id,
                    content: content.clone(),
                    kind: MessageType::Text,
                })
                .await?;
            output::print_success(&format!("Message {} sent", message.id));
        }
    }
    Ok(())
}
