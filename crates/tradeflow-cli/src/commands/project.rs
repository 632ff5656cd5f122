//! Project commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;

use tradeflow_core::money::format_compact;
use tradeflow_core::project::{
    self,
    model::{Milestone, NewProject},
};
use tradeflow_core::workflow::Decision;

use super::runtime::Runtime;
use crate::output;

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Submit a project for approval
    New(NewProjectArgs),

    /// List projects visible to the acting role
    List,

    /// Approve a pending project
    Approve(ProjectDecisionArgs),

    /// Reject a pending project
    Reject(ProjectDecisionArgs),

    /// Mark an approved project as started
    Activate {
        /// Project id or code
        id: String,
    },

    /// Finance an approved or active project
    Finance {
        /// Project id or code
        id: String,
    },
}

#[derive(Args)]
pub struct NewProjectArgs {
    /// Project title
    pub title: String,

    /// Project value in rupees
    #[arg(long)]
    pub value: Decimal,

    /// Project code (generated when omitted)
    #[arg(long)]
    pub code: Option<String>,

    /// Contract this project delivers on
    #[arg(long)]
    pub contract: Option<String>,

    #[arg(long)]
    pub buyer_id: Option<String>,

    #[arg(long)]
    pub seller_id: Option<String>,

    /// Milestone as TITLE:AMOUNT[:DUE], repeatable
    #[arg(short, long = "milestone", value_parser = parse_milestone)]
    pub milestones: Vec<Milestone>,
}

#[derive(Args)]
pub struct ProjectDecisionArgs {
    /// Project id or code
    pub id: String,

    #[arg(short, long)]
    pub comment: Option<String>,
}

fn parse_milestone(value: &str) -> Result<Milestone> {
    let mut parts = value.splitn(3, ':');
    let title = parts.next().unwrap_or_default().trim();
    let amount = parts
        .next()
        .context("expected TITLE:AMOUNT[:DUE]")?
        .trim()
        .parse::<Decimal>()
        .context("milestone amount is not a number")?;
    if title.is_empty() {
        anyhow::bail!("milestone title is empty");
    }
    Ok(Milestone {
        title: title.to_string(),
        amount,
        due_date: parts.next().map(|d| d.trim().to_string()),
        completed: false,
    })
}

pub async fn execute(cmd: ProjectCommands, rt: &Runtime) -> Result<()> {
    match cmd {
        ProjectCommands::New(args) => {
            let actor = rt.actor().await?;
            let input = NewProject {
                title: args.title,
                code: args.code,
                value: args.value,
                milestones: args.milestones,
                buyer_id: args.buyer_id,
                contract_id: args.contract,
                seller_id: args.seller_id,
            };
            let project = rt
                .run("Submitting project", project::create_project(&rt.engine, &actor, input))
                .await?;

            println!(
                "{} Submitted project: {} ({}) for {}",
                "✓".green().bold(),
                project.title.cyan(),
                project.code.dimmed(),
                format_compact(project.value)
            );
        }

        ProjectCommands::List => {
            let actor = rt.actor().await?;
            let projects = project::list_for_role(rt.pool(), actor.role).await?;
            output::print_projects_table(&projects);
        }

        ProjectCommands::Approve(args) => decide(rt, args, Decision::Approve).await?,
        ProjectCommands::Reject(args) => decide(rt, args, Decision::Reject).await?,

        ProjectCommands::Activate { id } => {
            let actor = rt.actor().await?;
            let project = rt
                .run("Activating project", project::activate_project(&rt.engine, &actor, &id))
                .await?;
            println!("{} Project {} is now active", "✓".green().bold(), project.code.cyan());
        }

        ProjectCommands::Finance { id } => {
            let actor = rt.actor().await?;
            let project = rt
                .run("Financing project", project::finance_project(&rt.engine, &actor, &id))
                .await?;
            println!(
                "{} Financed project {} for {}",
                "✓".green().bold(),
                project.code.cyan(),
                format_compact(project.value).bold()
            );
        }
    }

    Ok(())
}

async fn decide(rt: &Runtime, args: ProjectDecisionArgs, decision: Decision) -> Result<()> {
    let actor = rt.actor().await?;
    let project = rt
        .run(
            "Recording decision",
            project::decide_project(&rt.engine, &actor, &args.id, decision, args.comment.as_deref()),
        )
        .await?;
    println!(
        "{} Project {} is now {}",
        "✓".green().bold(),
        project.code.cyan(),
        project.status.as_str().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_milestone() {
        let m = parse_milestone("Civil works:400000:2026-06-01").unwrap();
        assert_eq!(m.title, "Civil works");
        assert_eq!(m.amount, dec!(400000));
        assert_eq!(m.due_date.as_deref(), Some("2026-06-01"));

        let m = parse_milestone("Handover:50000").unwrap();
        assert!(m.due_date.is_none());

        assert!(parse_milestone("Handover").is_err());
        assert!(parse_milestone(":100").is_err());
        assert!(parse_milestone("Handover:lots").is_err());
    }
}
