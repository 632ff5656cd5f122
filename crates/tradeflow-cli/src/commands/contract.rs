//! Contract commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;

use tradeflow_core::contract::{
    self,
    model::{ContractRevision, NewContract},
};
use tradeflow_core::money::format_compact;
use tradeflow_core::workflow::Decision;

use super::runtime::Runtime;
use crate::output;

#[derive(Subcommand)]
pub enum ContractCommands {
    /// Submit a new contract for buyer approval
    New(NewContractArgs),

    /// List contracts visible to the acting role
    List(ListContractsArgs),

    /// Show a contract and its approval history
    Show {
        /// Contract id or code
        id: String,
    },

    /// Approve a pending contract
    Approve(DecisionArgs),

    /// Reject a pending contract
    Reject(DecisionArgs),

    /// Send a pending contract back to the seller
    RequestChanges(DecisionArgs),

    /// Revise a contract after changes were requested
    Revise(ReviseArgs),
}

#[derive(Args)]
pub struct NewContractArgs {
    /// Contract title
    pub title: String,

    /// Contract value in rupees
    #[arg(long)]
    pub value: Decimal,

    /// Contract code (generated when omitted)
    #[arg(long)]
    pub code: Option<String>,

    /// Contract type
    #[arg(long = "type", default_value = "Supply")]
    pub contract_type: String,

    /// Payment terms
    #[arg(long, default_value = "Net 30")]
    pub terms: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Buyer id; the contract joins this buyer's approval queue
    #[arg(long)]
    pub buyer_id: Option<String>,

    /// Buyer name
    #[arg(long)]
    pub buyer: Option<String>,

    /// Seller id
    #[arg(long)]
    pub seller_id: Option<String>,

    /// Seller name (defaults to the signed-in seller)
    #[arg(long)]
    pub seller: Option<String>,
}

#[derive(Args)]
pub struct ListContractsArgs {
    /// Only contracts waiting in this buyer's queue
    #[arg(long)]
    pub buyer_id: Option<String>,
}

#[derive(Args)]
pub struct DecisionArgs {
    /// Contract id or code
    pub id: String,

    /// Comment recorded in the approval history
    #[arg(short, long)]
    pub comment: Option<String>,
}

#[derive(Args)]
pub struct ReviseArgs {
    /// Contract id or code
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub value: Option<Decimal>,

    #[arg(long)]
    pub terms: Option<String>,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,

    /// What changed
    #[arg(short, long)]
    pub comment: Option<String>,
}

pub async fn execute(cmd: ContractCommands, rt: &Runtime) -> Result<()> {
    match cmd {
        ContractCommands::New(args) => {
            let actor = rt.actor().await?;
            let input = NewContract {
                title: args.title,
                code: args.code,
                contract_type: args.contract_type,
                value: args.value,
                payment_terms: args.terms,
                start_date: args.start,
                end_date: args.end,
                seller_id: args.seller_id,
                seller_name: args.seller,
                buyer_id: args.buyer_id,
                buyer_name: args.buyer,
            };
            let contract = rt
                .run("Submitting contract", contract::create_contract(&rt.engine, &actor, input))
                .await?;

            println!(
                "{} Submitted contract: {} ({}) for {}",
                "✓".green().bold(),
                contract.title.cyan(),
                contract.code.dimmed(),
                format_compact(contract.value)
            );
        }

        ContractCommands::List(args) => {
            let contracts = match args.buyer_id {
                Some(buyer_id) => contract::pending_for_buyer(rt.pool(), &buyer_id).await?,
                None => {
                    let actor = rt.actor().await?;
                    contract::list_for_role(rt.pool(), actor.role).await?
                }
            };
            output::print_contracts_table(&contracts);
        }

        ContractCommands::Show { id } => {
            let actor = rt.actor().await?;
            let contract = contract::get_contract(rt.pool(), &id).await?;
            if !contract.is_visible_to(actor.role) {
                anyhow::bail!("Contract {} is not visible to {}", id, actor.role);
            }
            output::print_contract(&contract);
        }

        ContractCommands::Approve(args) => decide(rt, args, Decision::Approve).await?,
        ContractCommands::Reject(args) => decide(rt, args, Decision::Reject).await?,
        ContractCommands::RequestChanges(args) => {
            decide(rt, args, Decision::RequestModification).await?
        }

        ContractCommands::Revise(args) => {
            let actor = rt.actor().await?;
            let revision = ContractRevision {
                title: args.title,
                value: args.value,
                payment_terms: args.terms,
                start_date: args.start,
                end_date: args.end,
            };
            let contract = rt
                .run(
                    "Resubmitting contract",
                    contract::revise_contract(
                        &rt.engine,
                        &actor,
                        &args.id,
                        revision,
                        args.comment.as_deref(),
                    ),
                )
                .await?;

            println!(
                "{} Resubmitted contract {} for approval",
                "✓".green().bold(),
                contract.code.cyan()
            );
        }
    }

    Ok(())
}

async fn decide(rt: &Runtime, args: DecisionArgs, decision: Decision) -> Result<()> {
    let actor = rt.actor().await?;
    let contract = rt
        .run(
            "Recording decision",
            contract::decide_contract(
                &rt.engine,
                &actor,
                &args.id,
                decision,
                args.comment.as_deref(),
            ),
        )
        .await?;

    println!(
        "{} Contract {} is now {}",
        "✓".green().bold(),
        contract.code.cyan(),
        contract.status.as_str().bold()
    );
    Ok(())
}
