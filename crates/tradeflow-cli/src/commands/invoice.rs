//! Invoice commands.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;

use tradeflow_core::invoice::{self, model::NewInvoice};
use tradeflow_core::money::format_compact;
use tradeflow_core::workflow::Decision;

use super::runtime::Runtime;
use crate::output;

#[derive(Subcommand)]
pub enum InvoiceCommands {
    /// Raise an invoice
    New(NewInvoiceArgs),

    /// List invoices visible to the acting role
    List,

    /// Send a draft invoice to the buyer
    Submit {
        /// Invoice number
        number: String,
    },

    /// Approve an invoice awaiting the buyer
    Approve(InvoiceDecisionArgs),

    /// Reject an invoice awaiting the buyer
    Reject(InvoiceDecisionArgs),

    /// Price funding for an approved invoice
    Quote(FundingArgs),

    /// Fund an approved invoice
    Fund(FundingArgs),

    /// Record payment of a funded invoice
    Settle {
        /// Invoice number
        number: String,
    },
}

#[derive(Args)]
pub struct NewInvoiceArgs {
    /// Invoice number (generated when omitted)
    #[arg(long)]
    pub number: Option<String>,

    /// Total amount in rupees
    #[arg(long)]
    pub amount: Decimal,

    /// Buyer name
    #[arg(long)]
    pub buyer: String,

    /// Seller name (defaults to the signed-in party)
    #[arg(long)]
    pub seller: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: String,

    /// Issue date (YYYY-MM-DD)
    #[arg(long)]
    pub issue: Option<String>,

    #[arg(long)]
    pub contract: Option<String>,

    #[arg(long)]
    pub project: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Keep as a draft instead of sending to the buyer
    #[arg(long)]
    pub draft: bool,
}

#[derive(Args)]
pub struct InvoiceDecisionArgs {
    /// Invoice number
    pub number: String,

    #[arg(short, long)]
    pub comment: Option<String>,
}

#[derive(Args)]
pub struct FundingArgs {
    /// Invoice number
    pub number: String,

    /// Annual discount rate in percent
    #[arg(short, long)]
    pub rate: Decimal,

    /// Tenure in days (defaults to the days left until due)
    #[arg(short, long)]
    pub tenure: Option<u32>,
}

pub async fn execute(cmd: InvoiceCommands, rt: &Runtime) -> Result<()> {
    match cmd {
        InvoiceCommands::New(args) => {
            let actor = rt.actor().await?;
            let seller_name = args.seller.unwrap_or_else(|| actor.label());
            let input = NewInvoice {
                invoice_number: args.number,
                total_amount: args.amount,
                buyer_name: args.buyer,
                seller_name,
                due_date: args.due,
                issue_date: args.issue,
                contract_id: args.contract,
                project_id: args.project,
                description: args.description,
                submit: !args.draft,
            };
            let invoice = rt
                .run("Creating invoice", invoice::create_invoice(&rt.engine, &actor, input))
                .await?;

            println!(
                "{} Created invoice {} for {} ({})",
                "✓".green().bold(),
                invoice.invoice_number.cyan(),
                format_compact(invoice.total_amount),
                invoice.status.as_str()
            );
        }

        InvoiceCommands::List => {
            let actor = rt.actor().await?;
            let invoices = invoice::list_for_role(rt.pool(), actor.role).await?;
            output::print_invoices_table(&invoices);
        }

        InvoiceCommands::Submit { number } => {
            let actor = rt.actor().await?;
            let invoice = rt
                .run("Submitting invoice", invoice::submit_invoice(&rt.engine, &actor, &number))
                .await?;
            println!(
                "{} Invoice {} sent to {}",
                "✓".green().bold(),
                invoice.invoice_number.cyan(),
                invoice.buyer_name
            );
        }

        InvoiceCommands::Approve(args) => decide(rt, args, Decision::Approve).await?,
        InvoiceCommands::Reject(args) => decide(rt, args, Decision::Reject).await?,

        InvoiceCommands::Quote(args) => {
            let quote = invoice::quote_funding(
                rt.pool(),
                &args.number,
                args.rate,
                args.tenure,
                Utc::now().date_naive(),
            )
            .await?;
            output::print_quote(&args.number, &quote);
        }

        InvoiceCommands::Fund(args) => {
            let actor = rt.actor().await?;
            let current = invoice::get_invoice(rt.pool(), &args.number).await?;
            let terms =
                invoice::terms_for(&current, args.rate, args.tenure, Utc::now().date_naive())?;
            let invoice = rt
                .run(
                    "Funding invoice",
                    invoice::fund_invoice(&rt.engine, &actor, &args.number, terms),
                )
                .await?;

            println!(
                "{} Funded invoice {} at {}% for {} days",
                "✓".green().bold(),
                invoice.invoice_number.cyan(),
                terms.discount_rate,
                terms.tenure_days
            );
        }

        InvoiceCommands::Settle { number } => {
            let actor = rt.actor().await?;
            let invoice = rt
                .run("Settling invoice", invoice::settle_invoice(&rt.engine, &actor, &number))
                .await?;
            println!(
                "{} Invoice {} settled for {}",
                "✓".green().bold(),
                invoice.invoice_number.cyan(),
                format_compact(invoice.total_amount).bold()
            );
        }
    }

    Ok(())
}

async fn decide(rt: &Runtime, args: InvoiceDecisionArgs, decision: Decision) -> Result<()> {
    let actor = rt.actor().await?;
    let invoice = rt
        .run(
            "Recording decision",
            invoice::decide_invoice(
                &rt.engine,
                &actor,
                &args.number,
                decision,
                args.comment.as_deref(),
            ),
        )
        .await?;

    println!(
        "{} Invoice {} is now {}",
        "✓".green().bold(),
        invoice.invoice_number.cyan(),
        invoice.status.as_str().bold()
    );
    Ok(())
}
