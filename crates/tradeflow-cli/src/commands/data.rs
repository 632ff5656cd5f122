//! Demo data and store reset.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use tradeflow_core::seed::seed_demo;

use super::runtime::Runtime;

#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn seed(rt: &Runtime) -> Result<()> {
    let report = rt.run("Seeding demo data", seed_demo(&rt.engine)).await?;
    rt.engine.announce_refresh();

    println!("{} Demo marketplace ready", "✓".green().bold());
    println!("  {} {} clients", "•".dimmed(), report.clients);
    println!("  {} {} contracts", "•".dimmed(), report.contracts);
    println!("  {} {} projects", "•".dimmed(), report.projects);
    println!("  {} {} invoices ({} funded)", "•".dimmed(), report.invoices, report.funded);
    println!();
    println!(
        "Try {} or {}",
        "tradeflow dashboard seller".bold(),
        "tradeflow --as financier opportunities".bold()
    );
    Ok(())
}

pub async fn reset(args: ResetArgs, rt: &Runtime) -> Result<()> {
    if !args.yes {
        println!("{}", "This will permanently delete:".red().bold());
        println!("  {} contracts, projects, invoices and funded positions", "•".red());
        println!("  {} notifications and clients", "•".red());
        println!("  {} the signed-in session", "•".red());
        println!();

        let confirmed = Confirm::new()
            .with_prompt("Delete everything?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Nothing deleted.".dimmed());
            return Ok(());
        }
    }

    let removed = rt.pool().clear().await?;
    rt.engine.announce_refresh();
    println!("{} Removed {} stored collections", "✓".green().bold(), removed);
    Ok(())
}
