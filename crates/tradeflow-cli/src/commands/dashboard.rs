//! Role dashboard.

use anyhow::Result;
use clap::Args;
use tradeflow_core::{dashboard, Role};

use super::runtime::Runtime;
use crate::output;

#[derive(Args)]
pub struct DashboardArgs {
    /// Role to render (defaults to the acting role)
    pub role: Option<Role>,
}

pub async fn execute(args: DashboardArgs, rt: &Runtime) -> Result<()> {
    let role = match args.role {
        Some(role) => role,
        None => rt.actor().await?.role,
    };
    let dashboard = dashboard::load_dashboard(rt.pool(), role).await?;
    output::print_dashboard(&dashboard);
    Ok(())
}
