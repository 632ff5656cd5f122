//! Notification inbox.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use tradeflow_core::notification;

use super::runtime::Runtime;
use crate::output;

#[derive(Subcommand)]
pub enum NotifyCommands {
    /// Show notifications for the acting role
    List {
        /// Only unread notifications
        #[arg(short, long)]
        unread: bool,
    },

    /// Mark notifications as read
    Read {
        /// Notification id
        id: Option<String>,

        /// Mark every notification for the acting role
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
}

pub async fn execute(cmd: NotifyCommands, rt: &Runtime) -> Result<()> {
    let actor = rt.actor().await?;

    match cmd {
        NotifyCommands::List { unread } => {
            let notifications = notification::list_for_role(rt.pool(), actor.role, unread).await?;
            output::print_notifications(&notifications);
        }

        NotifyCommands::Read { id, all } => match (id, all) {
            (_, true) => {
                notification::mark_all_read(&rt.engine, &actor).await?;
                println!("{} All notifications marked as read", "✓".green().bold());
            }
            (Some(id), false) => {
                notification::mark_read(&rt.engine, &actor, &id).await?;
                println!("{} Marked {} as read", "✓".green().bold(), id.cyan());
            }
            (None, false) => anyhow::bail!("Pass a notification id or --all"),
        },
    }

    Ok(())
}
