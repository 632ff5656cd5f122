//! Login, logout and whoami.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tradeflow_core::{account, Role};

use super::runtime::Runtime;
use crate::output;

#[derive(Args)]
pub struct LoginArgs {
    /// Your name
    pub name: String,

    /// Role to sign in as (seller, buyer, financier, admin)
    #[arg(short, long)]
    pub role: Role,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Company you act for; used as the party name on documents
    #[arg(short, long)]
    pub company: Option<String>,
}

pub async fn login(rt: &Runtime, args: LoginArgs) -> Result<()> {
    let user = account::sign_in(
        rt.pool(),
        &args.name,
        args.role,
        args.email.as_deref(),
        args.company.as_deref(),
    )
    .await?;

    println!(
        "{} Signed in as {} ({})",
        "✓".green().bold(),
        user.name.cyan(),
        output::role_label(user.role)
    );
    Ok(())
}

pub async fn logout(rt: &Runtime) -> Result<()> {
    account::sign_out(rt.pool()).await?;
    println!("{} Signed out", "✓".green().bold());
    Ok(())
}

pub async fn whoami(rt: &Runtime) -> Result<()> {
    match account::current_user(rt.pool()).await? {
        Some(user) => output::print_user(&user),
        None => println!("{}", "Not signed in. Run 'tradeflow login <name> --role <role>'.".dimmed()),
    }
    if let Some(role) = rt.role_override() {
        println!("{} acting as {} via --as", "→".blue().bold(), output::role_label(role));
    }
    Ok(())
}
