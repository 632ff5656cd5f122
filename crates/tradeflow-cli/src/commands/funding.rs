//! Financier views: funded portfolio and open opportunities.

use anyhow::Result;
use clap::Args;
use tradeflow_core::funding;

use super::runtime::Runtime;
use crate::output;

#[derive(Args)]
pub struct OpportunitiesArgs {
    /// Include opportunities that were already taken
    #[arg(long)]
    pub all: bool,
}

pub async fn funded(rt: &Runtime) -> Result<()> {
    let funded = funding::list_funded(rt.pool()).await?;
    let summary = funding::summarize_portfolio(&funded);
    output::print_funded_table(&funded, &summary);
    Ok(())
}

pub async fn opportunities(args: OpportunitiesArgs, rt: &Runtime) -> Result<()> {
    let opportunities = funding::list_opportunities(rt.pool(), !args.all).await?;
    output::print_opportunities(&opportunities);
    Ok(())
}
