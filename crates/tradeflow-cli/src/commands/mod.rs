//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod client;
pub mod contract;
pub mod dashboard;
pub mod data;
pub mod funding;
pub mod invoice;
pub mod notify;
pub mod project;
pub mod runtime;
pub mod serve;
pub mod session;

use runtime::Runtime;

/// Tradeflow - invoice discounting for sellers, buyers, financiers and admins
#[derive(Parser)]
#[command(name = "tradeflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Act as this role instead of the signed-in user (seller, buyer, financier, admin)
    #[arg(long = "as", global = true, value_name = "ROLE", env = "TRADEFLOW_ROLE")]
    pub as_role: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in as a marketplace role
    Login(session::LoginArgs),

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Contract approvals
    #[command(subcommand)]
    Contract(contract::ContractCommands),

    /// Projects and project financing
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Invoice submission, approval and funding
    #[command(subcommand)]
    Invoice(invoice::InvoiceCommands),

    /// Funded invoices and portfolio totals
    Funded,

    /// Approved invoices open for funding
    Opportunities(funding::OpportunitiesArgs),

    /// Role notifications
    #[command(subcommand)]
    Notify(notify::NotifyCommands),

    /// Show a role dashboard
    Dashboard(dashboard::DashboardArgs),

    /// Manage marketplace clients (admin)
    #[command(subcommand)]
    Client(client::ClientCommands),

    /// Load demo data
    Seed,

    /// Delete all marketplace data
    Reset(data::ResetArgs),

    /// Start the web server
    Serve(serve::ServeArgs),
}

impl Cli {
    /// Project directory from `--project` or the working directory.
    pub fn project_dir(&self) -> Result<PathBuf> {
        match &self.project {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }

    pub async fn execute(self) -> Result<()> {
        let project_dir = self.project_dir()?;
        let rt = Runtime::open(&project_dir, self.as_role.as_deref()).await?;

        let result = match self.command {
            Commands::Login(args) => session::login(&rt, args).await,
            Commands::Logout => session::logout(&rt).await,
            Commands::Whoami => session::whoami(&rt).await,
            Commands::Contract(cmd) => contract::execute(cmd, &rt).await,
            Commands::Project(cmd) => project::execute(cmd, &rt).await,
            Commands::Invoice(cmd) => invoice::execute(cmd, &rt).await,
            Commands::Funded => funding::funded(&rt).await,
            Commands::Opportunities(args) => funding::opportunities(args, &rt).await,
            Commands::Notify(cmd) => notify::execute(cmd, &rt).await,
            Commands::Dashboard(args) => dashboard::execute(args, &rt).await,
            Commands::Client(cmd) => client::execute(cmd, &rt).await,
            Commands::Seed => data::seed(&rt).await,
            Commands::Reset(args) => data::reset(args, &rt).await,
            Commands::Serve(args) => return serve::execute(args, rt).await,
        };

        rt.finish().await;
        result
    }
}
