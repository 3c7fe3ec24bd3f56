use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console_core::conversation::{Conversation, ConversationStore, SenderRole};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Conversations fixture (JSON)
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Open a conversation by id and print its history
    #[arg(long)]
    pub select: Option<String>,
    /// Send a message to the selected conversation
    #[arg(long, requires = "select")]
    pub send: Option<String>,
    /// Only list conversations whose participant name contains this
    #[arg(long)]
    pub filter: Option<String>,
}

/// Runs one inbox session. Sent messages live in memory only; there is no
/// delivery backend yet.
pub async fn run(ctx: &AppContext, args: ChatArgs) -> Result<()> {
    let source = ctx.conversation_source(args.file).await?;
    let mut store = ConversationStore::new(source.load_conversations().await?);

    if let Some(id) = &args.select {
        store.select_conversation(id)?;
        if let Some(body) = &args.send {
            let message = store.append_message(id, body)?;
            tracing::info!("[Chat] Sent {} to {}", message.id, id);
        }
    }

    print_inbox(&store, args.filter.as_deref().unwrap_or(""));

    if let Some(active) = store.active() {
        print_history(active);
    }
    Ok(())
}

fn print_inbox(store: &ConversationStore, filter: &str) {
    println!("Inbox ({} unread)", store.total_unread());
    for conversation in store.filter_by_name(filter) {
        let marker = if store.active_id() == Some(conversation.id.as_str()) {
            ">"
        } else {
            " "
        };
        let time = conversation
            .last_message_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let unread = match conversation.unread_count {
            0 => String::new(),
            n => format!(" ({n})"),
        };
        println!(
            "{} {:<6} {:<20} {:<16} {}{}",
            marker,
            conversation.id,
            conversation.display_name(),
            time,
            conversation.last_message.as_deref().unwrap_or(""),
            unread
        );
    }
}

fn print_history(conversation: &Conversation) {
    let phone = conversation
        .participant
        .phone
        .as_deref()
        .map(|p| format!(" <{p}>"))
        .unwrap_or_default();
    println!("\n-- {}{} --", conversation.display_name(), phone);
    for message in &conversation.messages {
        let who = match message.sender {
            SenderRole::Operator => "you",
            SenderRole::Counterpart => conversation.display_name(),
        };
        println!(
            "[{}] {}: {} ({:?})",
            message.timestamp.format("%H:%M"),
            who,
            message.body,
            message.status
        );
    }
}
