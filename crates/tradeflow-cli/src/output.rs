//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use tradeflow_core::account::model::{Client, UserDetails};
use tradeflow_core::contract::model::{Contract, ContractStatus};
use tradeflow_core::dashboard::Dashboard;
use tradeflow_core::funding::model::{FundedInvoice, FundingQuote, FundingStatus, Opportunity};
use tradeflow_core::funding::PortfolioSummary;
use tradeflow_core::invoice::model::{Invoice, InvoiceStatus};
use tradeflow_core::money::{format_compact, format_inr};
use tradeflow_core::notification::model::{Notification, Priority};
use tradeflow_core::project::model::{Project, ProjectStatus};
use tradeflow_core::Role;

pub fn role_label(role: Role) -> ColoredString {
    match role {
        Role::Seller => "seller".green(),
        Role::Buyer => "buyer".blue(),
        Role::Financier => "financier".magenta(),
        Role::Admin => "admin".yellow(),
    }
}

fn contract_status(status: ContractStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        ContractStatus::Pending => label.yellow(),
        ContractStatus::Approved => label.green(),
        ContractStatus::Rejected => label.red(),
        ContractStatus::ModificationRequested => label.magenta(),
    }
}

fn project_status(status: ProjectStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        ProjectStatus::PendingApproval => label.yellow(),
        ProjectStatus::Approved => label.green(),
        ProjectStatus::Rejected => label.red(),
        ProjectStatus::Active => label.cyan(),
        ProjectStatus::Financed => label.blue().bold(),
    }
}

fn invoice_status(status: InvoiceStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        InvoiceStatus::Pending => label.dimmed(),
        InvoiceStatus::PendingBuyerApproval => label.yellow(),
        InvoiceStatus::Approved => label.green(),
        InvoiceStatus::Rejected => label.red(),
        InvoiceStatus::Funded => label.blue().bold(),
        InvoiceStatus::Settled => label.green().dimmed(),
    }
}

fn priority_indicator(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "! ".red().bold(),
        Priority::Medium => "· ".yellow(),
        Priority::Low => "  ".dimmed(),
    }
}

/// Print a single contract with its approval trail.
pub fn print_contract(contract: &Contract) {
    println!("{} {}", contract.title.cyan().bold(), format!("({})", contract.code).dimmed());
    println!();
    println!("{}: {}", "Status".bold(), contract_status(contract.status));
    println!("{}: {}", "Value".bold(), format_inr(contract.value));
    println!("{}: {}", "Type".bold(), contract.contract_type);
    println!("{}: {}", "Payment terms".bold(), contract.payment_terms);
    println!("{}: {} → {}", "Period".bold(), contract.start_date, contract.end_date);
    if let Some(seller) = &contract.seller_name {
        println!("{}: {}", "Seller".bold(), seller);
    }
    if let Some(buyer) = contract.buyer_name.as_ref().or(contract.buyer_id.as_ref()) {
        println!("{}: {}", "Buyer".bold(), buyer);
    }
    let visible: Vec<&str> = contract.visible_to.iter().map(|r| r.as_str()).collect();
    println!("{}: {}", "Visible to".bold(), visible.join(", ").dimmed());

    if !contract.approval_history.is_empty() {
        println!();
        println!("{}", "History".bold());
        for entry in &contract.approval_history {
            let who = entry.actor.clone().unwrap_or_else(|| entry.role.clone());
            println!(
                "  {} {} {} {}",
                entry.at.dimmed(),
                entry.action.cyan(),
                "by".dimmed(),
                who
            );
            if let Some(comment) = &entry.comment {
                println!("      {}", comment.italic());
            }
        }
    }
}

/// Print contracts as a table.
pub fn print_contracts_table(contracts: &[Contract]) {
    if contracts.is_empty() {
        println!("{}", "No contracts found.".dimmed());
        return;
    }

    let title_width = flexible_width(60, 20, 40);
    println!(
        "{:<14} {} {:>10} {:<22} {:<20}",
        "Code",
        pad_right("Title", title_width),
        "Value",
        "Status",
        "Buyer"
    );
    println!("{}", "─".repeat(70 + title_width));

    for contract in contracts {
        println!(
            "{:<14} {} {:>10} {} {:<20}",
            truncate_visual(&contract.code, 14),
            pad_right(&truncate_visual(&contract.title, title_width), title_width),
            format_compact(contract.value),
            pad_colored(contract_status(contract.status), contract.status.as_str(), 22),
            truncate_visual(
                contract
                    .buyer_name
                    .as_deref()
                    .or(contract.buyer_id.as_deref())
                    .unwrap_or("-"),
                20
            )
        );
    }

    println!();
    println!("{} contract(s) total", contracts.len());
}

/// Print projects as a table.
pub fn print_projects_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("{}", "No projects found.".dimmed());
        return;
    }

    let title_width = flexible_width(60, 20, 40);
    println!(
        "{:<14} {} {:>10} {:<18} {:>10}",
        "Code",
        pad_right("Title", title_width),
        "Value",
        "Status",
        "Milestones"
    );
    println!("{}", "─".repeat(56 + title_width));

    for project in projects {
        let done = project.milestones.iter().filter(|m| m.completed).count();
        println!(
            "{:<14} {} {:>10} {} {:>10}",
            truncate_visual(&project.code, 14),
            pad_right(&truncate_visual(&project.title, title_width), title_width),
            format_compact(project.value),
            pad_colored(project_status(project.status), project.status.as_str(), 18),
            format!("{}/{}", done, project.milestones.len())
        );
    }

    println!();
    println!("{} project(s) total", projects.len());
}

/// Print invoices as a table.
pub fn print_invoices_table(invoices: &[Invoice]) {
    if invoices.is_empty() {
        println!("{}", "No invoices found.".dimmed());
        return;
    }

    let party_width = flexible_width(72, 12, 24);
    println!(
        "{:<22} {:>10} {:<24} {} {} {:<10}",
        "Invoice",
        "Amount",
        "Status",
        pad_right("Seller", party_width),
        pad_right("Buyer", party_width),
        "Due"
    );
    println!("{}", "─".repeat(70 + 2 * party_width));

    for invoice in invoices {
        println!(
            "{:<22} {:>10} {} {} {} {:<10}",
            truncate_visual(&invoice.invoice_number, 22),
            format_compact(invoice.total_amount),
            pad_colored(invoice_status(invoice.status), invoice.status.as_str(), 24),
            pad_right(&truncate_visual(&invoice.seller_name, party_width), party_width),
            pad_right(&truncate_visual(&invoice.buyer_name, party_width), party_width),
            invoice.due_date
        );
    }

    println!();
    println!("{} invoice(s) total", invoices.len());
}

/// Print a funding quote.
pub fn print_quote(number: &str, quote: &FundingQuote) {
    println!("{} {}", "Funding quote".bold(), number.cyan());
    println!();
    println!("  {:<18} {}", "Invoice amount", format_inr(quote.total_amount));
    println!(
        "  {:<18} {}% p.a. for {} days",
        "Terms",
        quote.discount_rate.normalize(),
        quote.tenure_days
    );
    println!("  {:<18} {}", "Discount", format_inr(quote.discount_amount).yellow());
    println!("  {:<18} {}", "Paid to seller", format_inr(quote.net_amount).green().bold());
    println!("  {:<18} {}", "Expected return", format_inr(quote.expected_return));
    println!("  {:<18} {}", "Maturity", quote.maturity_date);
}

/// Print funded invoices with portfolio totals.
pub fn print_funded_table(funded: &[FundedInvoice], summary: &PortfolioSummary) {
    if funded.is_empty() {
        println!("{}", "No funded invoices yet.".dimmed());
        return;
    }

    println!(
        "{:<22} {:>10} {:>7} {:>10} {:>10} {:<11} {:<8}",
        "Invoice", "Amount", "Rate", "Discount", "Net", "Maturity", "Status"
    );
    println!("{}", "─".repeat(84));

    for position in funded {
        let status = match position.status {
            FundingStatus::Active => position.status.as_str().yellow(),
            FundingStatus::Settled => position.status.as_str().green(),
        };
        println!(
            "{:<22} {:>10} {:>6}% {:>10} {:>10} {:<11} {}",
            truncate_visual(&position.invoice_number, 22),
            format_compact(position.total_amount),
            position.discount_rate.normalize().to_string(),
            format_compact(position.discount_amount),
            format_compact(position.net_amount),
            position.maturity_date,
            status
        );
    }

    println!();
    println!(
        " {} {} positions ({} active) {} deployed {} {} expected profit {}",
        "■".cyan(),
        summary.positions.to_string().bold(),
        summary.active_positions,
        "·".dimmed(),
        format_compact(summary.deployed).bold(),
        "·".dimmed(),
        format_compact(summary.expected_profit).green()
    );
}

/// Print the funding marketplace.
pub fn print_opportunities(opportunities: &[Opportunity]) {
    if opportunities.is_empty() {
        println!("{}", "No funding opportunities.".dimmed());
        return;
    }

    println!(
        "{:<22} {:>10} {:<20} {:<20} {:<10} {:<6}",
        "Invoice", "Amount", "Seller", "Buyer", "Due", "Open"
    );
    println!("{}", "─".repeat(93));

    for opportunity in opportunities {
        let open = if opportunity.open { "yes".green() } else { "no".dimmed() };
        println!(
            "{:<22} {:>10} {} {} {:<10} {}",
            truncate_visual(&opportunity.invoice_number, 22),
            format_compact(opportunity.amount),
            pad_right(&truncate_visual(&opportunity.seller_name, 20), 20),
            pad_right(&truncate_visual(&opportunity.buyer_name, 20), 20),
            opportunity.due_date,
            open
        );
    }
}

/// Print notifications, newest first.
pub fn print_notifications(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("{}", "No notifications.".dimmed());
        return;
    }

    let message_width = flexible_width(24, 30, 100);
    for n in notifications {
        let marker = if n.read { " ".normal() } else { "●".cyan() };
        let message = truncate_visual(&n.message, message_width);
        let message = if n.read { message.dimmed() } else { message.normal() };
        println!(
            "{} {}{} {} {}",
            marker,
            priority_indicator(n.priority),
            n.id.dimmed(),
            message,
            short_time(&n.created_at).dimmed()
        );
    }
}

/// Print a role dashboard.
pub fn print_dashboard(dashboard: &Dashboard) {
    let summary = &dashboard.summary;
    println!(
        "{} {}",
        " DASHBOARD ".on_blue().white().bold(),
        role_label(dashboard.role).bold()
    );
    println!();
    println!(
        " {} {} pending {} {} invoiced {} {} funded {} {} unread",
        "■".cyan(),
        summary.pending_actions.to_string().bold(),
        "·".dimmed(),
        format_compact(summary.total_value).bold(),
        "·".dimmed(),
        format_compact(summary.funded_value).bold(),
        "·".dimmed(),
        summary.unread_notifications.to_string().yellow()
    );
    println!();

    if !dashboard.contracts.is_empty() {
        println!("{}", "Contracts".bold());
        print_contracts_table(&dashboard.contracts);
        println!();
    }
    if !dashboard.projects.is_empty() {
        println!("{}", "Projects".bold());
        print_projects_table(&dashboard.projects);
        println!();
    }
    if !dashboard.invoices.is_empty() {
        println!("{}", "Invoices".bold());
        print_invoices_table(&dashboard.invoices);
        println!();
    }
    if !dashboard.opportunities.is_empty() {
        println!("{}", "Open for funding".bold());
        print_opportunities(&dashboard.opportunities);
        println!();
    }

    let recent: Vec<Notification> = dashboard.notifications.iter().take(5).cloned().collect();
    if !recent.is_empty() {
        println!("{}", "Latest notifications".bold());
        print_notifications(&recent);
    }
}

pub fn print_user(user: &UserDetails) {
    println!("{} {}", user.name.cyan().bold(), format!("({})", role_label(user.role)).dimmed());
    if let Some(company) = &user.company {
        println!("  {}: {}", "Company".bold(), company);
    }
    if let Some(email) = &user.email {
        println!("  {}: {}", "Email".bold(), email);
    }
}

pub fn print_clients(clients: &[Client]) {
    if clients.is_empty() {
        println!("{}", "No clients registered.".dimmed());
        return;
    }

    println!("{:<10} {:<26} {:<10} {:<28} {:<8}", "ID", "Name", "Role", "Email", "Active");
    println!("{}", "─".repeat(86));
    for client in clients {
        let id_short = if client.id.len() >= 8 { &client.id[..8] } else { &client.id };
        println!(
            "{:<10} {} {} {} {}",
            id_short.dimmed(),
            pad_right(&truncate_visual(&client.name, 26), 26),
            pad_colored(role_label(client.role), client.role.as_str(), 10),
            pad_right(&truncate_visual(client.email.as_deref().unwrap_or("-"), 28), 28),
            if client.active { "yes".green() } else { "no".red() }
        );
    }
}

/// `2026-03-01T10:00:00.000Z` → `2026-03-01 10:00`.
fn short_time(rfc3339: &str) -> String {
    let text = rfc3339.replacen('T', " ", 1);
    text.chars().take(16).collect()
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Width left for a flexible column once `fixed` columns are laid out.
fn flexible_width(fixed: usize, min: usize, max: usize) -> usize {
    term_width().saturating_sub(fixed).clamp(min, max)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Pad a colored label using the width of its plain text.
fn pad_colored(label: ColoredString, plain: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(plain);
    format!("{}{}", label, " ".repeat(width.saturating_sub(visual)))
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("Cotton yarn", 20), "Cotton yarn");
        assert_eq!(truncate_visual("Cotton yarn supply", 8), "Cotton..");
        assert_eq!(truncate_visual("₹₹₹₹", 2), "..");
    }

    #[test]
    fn test_pad_right_uses_visual_width() {
        assert_eq!(pad_right("₹1.00L", 8), "₹1.00L  ");
        assert_eq!(pad_right("too long", 3), "too long");
    }

    #[test]
    fn test_short_time() {
        assert_eq!(short_time("2026-03-01T10:00:00.000Z"), "2026-03-01 10:00");
    }
}
