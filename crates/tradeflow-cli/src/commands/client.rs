//! Client administration.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use tradeflow_core::account::{self, model::NewClient};
use tradeflow_core::Role;

use super::runtime::Runtime;
use crate::output;

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Register a client
    Add {
        /// Client name
        name: String,

        #[arg(short, long)]
        role: Role,

        #[arg(long)]
        email: Option<String>,

        #[arg(short, long)]
        company: Option<String>,
    },

    /// List clients
    List {
        /// Include deactivated clients
        #[arg(long)]
        all: bool,
    },

    /// Deactivate a client by id or email
    Deactivate {
        key: String,
    },
}

pub async fn execute(cmd: ClientCommands, rt: &Runtime) -> Result<()> {
    match cmd {
        ClientCommands::Add {
            name,
            role,
            email,
            company,
        } => {
            let actor = rt.actor().await?;
            let client = account::add_client(
                rt.pool(),
                &actor,
                NewClient {
                    name,
                    email,
                    role,
                    company,
                },
            )
            .await?;
            println!(
                "{} Added {} {} ({})",
                "✓".green().bold(),
                output::role_label(client.role),
                client.name.cyan(),
                client.id.dimmed()
            );
        }

        ClientCommands::List { all } => {
            let clients = account::list_clients(rt.pool(), all).await?;
            output::print_clients(&clients);
        }

        ClientCommands::Deactivate { key } => {
            let actor = rt.actor().await?;
            let client = account::deactivate_client(rt.pool(), &actor, &key).await?;
            println!("{} Deactivated {}", "✓".green().bold(), client.name.cyan());
        }
    }

    Ok(())
}
