//! The workflow state machine.
//!
//! `reduce` is pure: given the current state and an action it returns the
//! next state, the store collections that changed and the events to
//! broadcast. A failed action leaves nothing behind.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;

use super::action::{Action, Decision};
use super::state::{Collection, WorkflowState};
use crate::contract::model::{ApprovalEntry, Contract, ContractRevision, ContractStatus, NewContract};
use crate::error::{TradeflowError, TradeflowResult};
use crate::funding::{
    self,
    model::{FundedInvoice, FundingStatus, FundingTerms, Opportunity},
};
use crate::invoice::model::{Invoice, InvoiceStatus, NewInvoice};
use crate::money::format_compact;
use crate::notification::model::{Notification, NotificationKind, Priority};
use crate::project::model::{NewProject, Project, ProjectStatus};
use crate::role::{Actor, Role};
use tradeflow_store::WorkflowEvent;

use Role::{Admin, Buyer, Financier, Seller};

/// Result of applying one action.
#[derive(Debug)]
pub struct Outcome {
    pub state: WorkflowState,
    pub touched: BTreeSet<Collection>,
    pub events: Vec<WorkflowEvent>,
}

/// Apply an action to a state.
pub fn reduce(state: WorkflowState, action: &Action) -> TradeflowResult<Outcome> {
    let mut tx = Transition {
        state,
        touched: BTreeSet::new(),
        events: Vec::new(),
    };

    match action {
        Action::CreateContract { id, input, actor, at } => {
            tx.create_contract(id, input, actor, &stamp(at))?
        }
        Action::DecideContract { id, decision, comment, actor, at } => {
            tx.decide_contract(id, *decision, comment.as_deref(), actor, &stamp(at))?
        }
        Action::ReviseContract { id, revision, comment, actor, at } => {
            tx.revise_contract(id, revision, comment.as_deref(), actor, &stamp(at))?
        }
        Action::CreateProject { id, input, actor, at } => {
            tx.create_project(id, input, actor, &stamp(at))?
        }
        Action::DecideProject { id, decision, comment, actor, at } => {
            tx.decide_project(id, *decision, comment.as_deref(), actor, &stamp(at))?
        }
        Action::ActivateProject { id, actor, at } => tx.activate_project(id, actor, &stamp(at))?,
        Action::FinanceProject { id, actor, at } => tx.finance_project(id, actor, &stamp(at))?,
        Action::CreateInvoice { number, input, actor, at } => {
            tx.create_invoice(number, input, actor, &stamp(at))?
        }
        Action::SubmitInvoice { number, actor, at } => tx.submit_invoice(number, actor, &stamp(at))?,
        Action::DecideInvoice { number, decision, comment, actor, at } => {
            tx.decide_invoice(number, *decision, comment.as_deref(), actor, &stamp(at))?
        }
        Action::FundInvoice { number, terms, actor, at } => tx.fund_invoice(number, terms, actor, at)?,
        Action::SettleInvoice { number, actor, at } => tx.settle_invoice(number, actor, &stamp(at))?,
        Action::MarkNotificationRead { id, actor } => tx.mark_read(id, actor)?,
        Action::MarkAllNotificationsRead { actor } => tx.mark_all_read(actor),
    }

    Ok(Outcome {
        state: tx.state,
        touched: tx.touched,
        events: tx.events,
    })
}

fn stamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn authorize(actor: &Actor, allowed: &[Role], action: &str) -> TradeflowResult<()> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(TradeflowError::Unauthorized {
            role: actor.role.as_str().to_string(),
            action: action.to_string(),
        })
    }
}

/// Human code derived from an id, e.g. `CTR-1A2B3C4D`.
fn default_code(prefix: &str, id: &str) -> String {
    let tail: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();
    format!("{}-{}", prefix, tail.to_uppercase())
}

fn clean_code(code: &Option<String>) -> Option<String> {
    code.as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

struct Transition {
    state: WorkflowState,
    touched: BTreeSet<Collection>,
    events: Vec<WorkflowEvent>,
}

impl Transition {
    fn notify(
        &mut self,
        kind: NotificationKind,
        message: String,
        for_roles: &[Role],
        priority: Priority,
        entity_id: &str,
        at: &str,
    ) {
        let id = format!("NTF-{:06}", self.state.notifications.len() + 1);
        self.state.notifications.push(Notification {
            id,
            kind,
            message,
            for_roles: for_roles.to_vec(),
            priority,
            entity_id: Some(entity_id.to_string()),
            created_at: at.to_string(),
            read: false,
        });
        self.touched.insert(Collection::Notifications);
    }

    fn enqueue_for_buyer(&mut self, buyer_id: &str, contract_id: &str) {
        let queue = self.state.buyer_queues.entry(buyer_id.to_string()).or_default();
        if !queue.iter().any(|id| id == contract_id) {
            queue.push(contract_id.to_string());
        }
        self.touched.insert(Collection::BuyerQueue(buyer_id.to_string()));
    }

    fn dequeue_for_buyer(&mut self, buyer_id: &str, contract_id: &str) {
        if let Some(queue) = self.state.buyer_queues.get_mut(buyer_id) {
            queue.retain(|id| id != contract_id);
            self.touched.insert(Collection::BuyerQueue(buyer_id.to_string()));
        }
    }

    fn contract_index(&self, key: &str) -> TradeflowResult<usize> {
        self.state
            .contracts
            .iter()
            .position(|c| c.matches(key))
            .ok_or_else(|| TradeflowError::ContractNotFound(key.to_string()))
    }

    fn project_index(&self, key: &str) -> TradeflowResult<usize> {
        self.state
            .projects
            .iter()
            .position(|p| p.matches(key))
            .ok_or_else(|| TradeflowError::ProjectNotFound(key.to_string()))
    }

    fn invoice_index(&self, number: &str) -> TradeflowResult<usize> {
        self.state
            .invoices
            .iter()
            .position(|i| i.matches(number))
            .ok_or_else(|| TradeflowError::InvoiceNotFound(number.to_string()))
    }

    // ------------------------------------------------------------------
    // Contracts
    // ------------------------------------------------------------------

    fn create_contract(
        &mut self,
        id: &str,
        input: &NewContract,
        actor: &Actor,
        at: &str,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Seller, Admin], "submit contracts")?;
        input.validate()?;

        let code = clean_code(&input.code).unwrap_or_else(|| default_code("CTR", id));
        if self
            .state
            .contracts
            .iter()
            .any(|c| c.id == id || c.code.eq_ignore_ascii_case(&code))
        {
            return Err(TradeflowError::validation(format!("Contract {} already exists", code)));
        }

        let seller_name = input.seller_name.clone().or_else(|| {
            (actor.role == Seller).then(|| actor.name.clone()).flatten()
        });
        let status = ContractStatus::Pending;
        let contract = Contract {
            id: id.to_string(),
            title: input.title.trim().to_string(),
            code,
            contract_type: input.contract_type.clone(),
            value: input.value,
            payment_terms: input.payment_terms.clone(),
            start_date: input.start_date.clone(),
            end_date: input.end_date.clone(),
            status,
            seller_id: input.seller_id.clone(),
            seller_name,
            buyer_id: input.buyer_id.clone(),
            buyer_name: input.buyer_name.clone(),
            approval_history: vec![ApprovalEntry {
                action: "submitted".to_string(),
                status,
                role: actor.role.as_str().to_string(),
                actor: actor.name.clone(),
                comment: None,
                at: at.to_string(),
            }],
            visible_to: status.visible_roles().to_vec(),
            created_at: at.to_string(),
            updated_at: at.to_string(),
        };

        if let Some(buyer_id) = &contract.buyer_id {
            self.enqueue_for_buyer(buyer_id, &contract.id);
        }
        self.notify(
            NotificationKind::ContractSubmitted,
            format!(
                "New contract '{}' ({}) worth {} awaits approval",
                contract.title,
                contract.code,
                format_compact(contract.value)
            ),
            &[Buyer, Admin],
            Priority::Medium,
            &contract.id,
            at,
        );
        self.events.push(WorkflowEvent::ContractSubmitted(contract.to_row()));
        self.state.contracts.push(contract);
        self.touched.insert(Collection::Contracts);
        Ok(())
    }

    fn decide_contract(
        &mut self,
        key: &str,
        decision: Decision,
        comment: Option<&str>,
        actor: &Actor,
        at: &str,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Buyer, Admin], "decide contracts")?;
        let idx = self.contract_index(key)?;
        let target = match decision {
            Decision::Approve => ContractStatus::Approved,
            Decision::Reject => ContractStatus::Rejected,
            Decision::RequestModification => ContractStatus::ModificationRequested,
        };

        let contract = &mut self.state.contracts[idx];
        if !contract.status.can_transition_to(&target) {
            return Err(TradeflowError::InvalidStateTransition {
                entity: "contract",
                from: contract.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        contract.status = target;
        contract.visible_to = target.visible_roles().to_vec();
        contract.updated_at = at.to_string();
        contract.approval_history.push(ApprovalEntry {
            action: decision.as_str().to_string(),
            status: target,
            role: actor.role.as_str().to_string(),
            actor: actor.name.clone(),
            comment: comment.map(str::to_string),
            at: at.to_string(),
        });
        let snapshot = contract.clone();
        self.touched.insert(Collection::Contracts);

        if let Some(buyer_id) = &snapshot.buyer_id {
            self.dequeue_for_buyer(buyer_id, &snapshot.id);
        }

        let (message, roles): (String, &[Role]) = match target {
            ContractStatus::Approved => (
                format!("Contract '{}' ({}) was approved", snapshot.title, snapshot.code),
                &[Seller, Admin, Financier],
            ),
            ContractStatus::Rejected => (
                format!("Contract '{}' ({}) was rejected", snapshot.title, snapshot.code),
                &[Seller, Admin],
            ),
            _ => (
                format!(
                    "Changes requested on contract '{}' ({}){}",
                    snapshot.title,
                    snapshot.code,
                    comment.map(|c| format!(": {}", c)).unwrap_or_default()
                ),
                &[Seller],
            ),
        };
        self.notify(
            NotificationKind::ContractDecision,
            message,
            roles,
            Priority::High,
            &snapshot.id,
            at,
        );
        self.events.push(WorkflowEvent::ContractDecision(snapshot.to_row()));
        Ok(())
    }

    fn revise_contract(
        &mut self,
        key: &str,
        revision: &ContractRevision,
        comment: Option<&str>,
        actor: &Actor,
        at: &str,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Seller, Admin], "revise contracts")?;
        let idx = self.contract_index(key)?;
        let target = ContractStatus::Pending;

        let contract = &mut self.state.contracts[idx];
        if !contract.status.can_transition_to(&target) {
            return Err(TradeflowError::InvalidStateTransition {
                entity: "contract",
                from: contract.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        revision.apply(contract)?;
        contract.status = target;
        contract.visible_to = target.visible_roles().to_vec();
        contract.updated_at = at.to_string();
        contract.approval_history.push(ApprovalEntry {
            action: "revised".to_string(),
            status: target,
            role: actor.role.as_str().to_string(),
            actor: actor.name.clone(),
            comment: comment.map(str::to_string),
            at: at.to_string(),
        });
        let snapshot = contract.clone();
        self.touched.insert(Collection::Contracts);

        if let Some(buyer_id) = &snapshot.buyer_id {
            self.enqueue_for_buyer(buyer_id, &snapshot.id);
        }
        self.notify(
            NotificationKind::ContractSubmitted,
            format!(
                "Contract '{}' ({}) was revised and resubmitted",
                snapshot.title, snapshot.code
            ),
            &[Buyer, Admin],
            Priority::Medium,
            &snapshot.id,
            at,
        );
        self.events.push(WorkflowEvent::ContractSubmitted(snapshot.to_row()));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    fn create_project(
        &mut self,
        id: &str,
        input: &NewProject,
        actor: &Actor,
        at: &str,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Seller, Admin], "submit projects")?;
        input.validate()?;

        let code = clean_code(&input.code).unwrap_or_else(|| default_code("PRJ", id));
        if self
            .state
            .projects
            .iter()
            .any(|p| p.id == id || p.code.eq_ignore_ascii_case(&code))
        {
            return Err(TradeflowError::validation(format!("Project {} already exists", code)));
        }

        let project = Project {
            id: id.to_string(),
            title: input.title.trim().to_string(),
            code,
            value: input.value,
            milestones: input.milestones.clone(),
            status: ProjectStatus::PendingApproval,
            buyer_id: input.buyer_id.clone(),
            contract_id: input.contract_id.clone(),
            seller_id: input.seller_id.clone(),
            financier_id: None,
            created_at: at.to_string(),
            updated_at: at.to_string(),
        };

        self.notify(
            NotificationKind::ProjectSubmitted,
            format!(
                "Project '{}' ({}) worth {} submitted for approval",
                project.title,
                project.code,
                format_compact(project.value)
            ),
            &[Admin, Buyer],
            Priority::Medium,
            &project.id,
            at,
        );
        self.events.push(WorkflowEvent::ProjectSubmitted(project.to_row()));
        self.state.projects.push(project);
        self.touched.insert(Collection::Projects);
        Ok(())
    }

    /// Move a project to `target`, returning the updated copy.
    fn move_project(&mut self, key: &str, target: ProjectStatus, at: &str) -> TradeflowResult<Project> {
        let idx = self.project_index(key)?;
        let project = &mut self.state.projects[idx];
        if !project.status.can_transition_to(&target) {
            return Err(TradeflowError::InvalidStateTransition {
                entity: "project",
                from: project.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        project.status = target;
        project.updated_at = at.to_string();
        self.touched.insert(Collection::Projects);
        Ok(project.clone())
    }

    fn decide_project(
        &mut self,
        key: &str,
        decision: Decision,
        comment: Option<&str>,
        actor: &Actor,
        at: &str,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Admin, Buyer], "decide projects")?;
        let target = match decision {
            Decision::Approve => ProjectStatus::Approved,
            Decision::Reject => ProjectStatus::Rejected,
            Decision::RequestModification => {
                return Err(TradeflowError::validation(
                    "Projects can only be approved or rejected",
                ))
            }
        };
        let project = self.move_project(key, target, at)?;

        let suffix = comment.map(|c| format!(": {}", c)).unwrap_or_default();
        let (message, roles): (String, &[Role]) = if target == ProjectStatus::Approved {
            (
                format!("Project '{}' ({}) approved and open for financing{}", project.title, project.code, suffix),
                &[Seller, Financier],
            )
        } else {
            (
                format!("Project '{}' ({}) was rejected{}", project.title, project.code, suffix),
                &[Seller],
            )
        };
        self.notify(
            NotificationKind::ProjectApproval,
            message,
            roles,
            Priority::High,
            &project.id,
            at,
        );
        self.events.push(WorkflowEvent::ProjectApproval(project.to_row()));
        Ok(())
    }

    fn activate_project(&mut self, key: &str, actor: &Actor, at: &str) -> TradeflowResult<()> {
        authorize(actor, &[Seller, Admin], "activate projects")?;
        let project = self.move_project(key, ProjectStatus::Active, at)?;
        self.notify(
            NotificationKind::ProjectApproval,
            format!("Work started on project '{}' ({})", project.title, project.code),
            &[Admin, Buyer],
            Priority::Low,
            &project.id,
            at,
        );
        self.events.push(WorkflowEvent::ProjectApproval(project.to_row()));
        Ok(())
    }

    fn finance_project(&mut self, key: &str, actor: &Actor, at: &str) -> TradeflowResult<()> {
        authorize(actor, &[Financier], "finance projects")?;
        let mut project = self.move_project(key, ProjectStatus::Financed, at)?;
        let financier = actor.label();
        if let Some(stored) = self.state.projects.iter_mut().find(|p| p.id == project.id) {
            stored.financier_id = Some(financier.clone());
            project = stored.clone();
        }
        self.notify(
            NotificationKind::ProjectApproval,
            format!(
                "Project '{}' ({}) financed by {} for {}",
                project.title,
                project.code,
                financier,
                format_compact(project.value)
            ),
            &[Seller, Admin, Buyer],
            Priority::High,
            &project.id,
            at,
        );
        self.events.push(WorkflowEvent::ProjectApproval(project.to_row()));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Invoices
    // ------------------------------------------------------------------

    fn create_invoice(
        &mut self,
        number: &str,
        input: &NewInvoice,
        actor: &Actor,
        at: &str,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Seller, Admin], "create invoices")?;
        input.validate()?;
        if number.trim().is_empty() {
            return Err(TradeflowError::validation("Invoice number is required"));
        }
        if self.state.invoices.iter().any(|i| i.matches(number)) {
            return Err(TradeflowError::validation(format!("Invoice {} already exists", number)));
        }

        let invoice = Invoice {
            invoice_number: number.to_string(),
            status: InvoiceStatus::Pending,
            total_amount: input.total_amount,
            buyer_name: input.buyer_name.trim().to_string(),
            seller_name: input.seller_name.trim().to_string(),
            due_date: input.due_date.clone(),
            issue_date: input.issue_date.clone(),
            contract_id: input.contract_id.clone(),
            project_id: input.project_id.clone(),
            description: input.description.clone(),
            created_at: at.to_string(),
            updated_at: at.to_string(),
        };
        self.state.invoices.push(invoice);
        self.touched.insert(Collection::Invoices);

        if input.submit {
            self.submit_invoice(number, actor, at)
        } else {
            self.events.push(WorkflowEvent::StoreRefresh);
            Ok(())
        }
    }

    /// Move an invoice to `target`, returning the updated copy.
    fn move_invoice(&mut self, number: &str, target: InvoiceStatus, at: &str) -> TradeflowResult<Invoice> {
        let idx = self.invoice_index(number)?;
        let invoice = &mut self.state.invoices[idx];
        if !invoice.status.can_transition_to(&target) {
            return Err(TradeflowError::InvalidStateTransition {
                entity: "invoice",
                from: invoice.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        invoice.status = target;
        invoice.updated_at = at.to_string();
        self.touched.insert(Collection::Invoices);
        Ok(invoice.clone())
    }

    fn submit_invoice(&mut self, number: &str, actor: &Actor, at: &str) -> TradeflowResult<()> {
        authorize(actor, &[Seller, Admin], "submit invoices")?;
        let invoice = self.move_invoice(number, InvoiceStatus::PendingBuyerApproval, at)?;
        self.notify(
            NotificationKind::InvoiceSubmitted,
            format!(
                "Invoice {} for {} from {} awaits your approval",
                invoice.invoice_number,
                format_compact(invoice.total_amount),
                invoice.seller_name
            ),
            &[Buyer],
            Priority::Medium,
            &invoice.invoice_number,
            at,
        );
        self.events.push(WorkflowEvent::InvoiceSubmitted(invoice.to_row()));
        Ok(())
    }

    fn decide_invoice(
        &mut self,
        number: &str,
        decision: Decision,
        comment: Option<&str>,
        actor: &Actor,
        at: &str,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Buyer, Admin], "decide invoices")?;
        let target = match decision {
            Decision::Approve => InvoiceStatus::Approved,
            Decision::Reject => InvoiceStatus::Rejected,
            Decision::RequestModification => {
                return Err(TradeflowError::validation(
                    "Invoices can only be approved or rejected",
                ))
            }
        };
        let invoice = self.move_invoice(number, target, at)?;
        let suffix = comment.map(|c| format!(": {}", c)).unwrap_or_default();

        if target == InvoiceStatus::Approved {
            let opportunity_id = format!("OPP-{}", invoice.invoice_number);
            self.state.opportunities.retain(|o| o.id != opportunity_id);
            self.state.opportunities.push(Opportunity {
                id: opportunity_id,
                invoice_number: invoice.invoice_number.clone(),
                amount: invoice.total_amount,
                buyer_name: invoice.buyer_name.clone(),
                seller_name: invoice.seller_name.clone(),
                due_date: invoice.due_date.clone(),
                created_at: at.to_string(),
                open: true,
            });
            self.touched.insert(Collection::Opportunities);
            self.notify(
                NotificationKind::InvoiceDecision,
                format!(
                    "Invoice {} ({}) approved by {} and available for funding{}",
                    invoice.invoice_number,
                    format_compact(invoice.total_amount),
                    invoice.buyer_name,
                    suffix
                ),
                &[Seller, Financier, Admin],
                Priority::High,
                &invoice.invoice_number,
                at,
            );
        } else {
            self.notify(
                NotificationKind::InvoiceDecision,
                format!(
                    "Invoice {} was rejected by {}{}",
                    invoice.invoice_number, invoice.buyer_name, suffix
                ),
                &[Seller],
                Priority::High,
                &invoice.invoice_number,
                at,
            );
        }
        self.events.push(WorkflowEvent::InvoiceDecision(invoice.to_row()));
        Ok(())
    }

    fn fund_invoice(
        &mut self,
        number: &str,
        terms: &FundingTerms,
        actor: &Actor,
        at: &DateTime<Utc>,
    ) -> TradeflowResult<()> {
        authorize(actor, &[Financier], "fund invoices")?;
        terms.validate()?;
        if self.state.find_funded(number).is_some() {
            return Err(TradeflowError::validation(format!(
                "Invoice {} has already been funded",
                number
            )));
        }
        let stamp = stamp(at);
        let invoice = self.move_invoice(number, InvoiceStatus::Funded, &stamp)?;

        let quote = funding::quote(invoice.total_amount, terms, at.date_naive())?;
        let position = FundedInvoice {
            invoice_number: invoice.invoice_number.clone(),
            total_amount: quote.total_amount,
            discount_rate: quote.discount_rate,
            discount_amount: quote.discount_amount,
            net_amount: quote.net_amount,
            expected_return: quote.expected_return,
            tenure: quote.tenure_days,
            funded_at: stamp.clone(),
            maturity_date: quote.maturity_date.format("%Y-%m-%d").to_string(),
            financier_name: actor.name.clone(),
            buyer_name: invoice.buyer_name.clone(),
            seller_name: invoice.seller_name.clone(),
            status: FundingStatus::Active,
        };

        for opportunity in self
            .state
            .opportunities
            .iter_mut()
            .filter(|o| o.invoice_number.eq_ignore_ascii_case(&invoice.invoice_number))
        {
            opportunity.open = false;
            self.touched.insert(Collection::Opportunities);
        }

        self.notify(
            NotificationKind::InvoiceFunded,
            format!(
                "Invoice {} funded: {} disbursed to {} at {}% for {} days",
                invoice.invoice_number,
                format_compact(position.net_amount),
                invoice.seller_name,
                position.discount_rate.normalize(),
                position.tenure
            ),
            &[Seller, Buyer, Admin],
            Priority::High,
            &invoice.invoice_number,
            &stamp,
        );
        self.events.push(WorkflowEvent::InvoiceFunded(position.to_row()));
        self.state.funded.push(position);
        self.touched.insert(Collection::FundedInvoices);
        Ok(())
    }

    fn settle_invoice(&mut self, number: &str, actor: &Actor, at: &str) -> TradeflowResult<()> {
        authorize(actor, &[Buyer, Admin], "settle invoices")?;
        let invoice = self.move_invoice(number, InvoiceStatus::Settled, at)?;

        if let Some(position) = self
            .state
            .funded
            .iter_mut()
            .find(|f| f.invoice_number.eq_ignore_ascii_case(&invoice.invoice_number))
        {
            position.status = FundingStatus::Settled;
            self.touched.insert(Collection::FundedInvoices);
        }

        self.notify(
            NotificationKind::InvoiceSettled,
            format!(
                "Invoice {} settled by {} for {}",
                invoice.invoice_number,
                invoice.buyer_name,
                format_compact(invoice.total_amount)
            ),
            &[Financier, Seller],
            Priority::Medium,
            &invoice.invoice_number,
            at,
        );
        self.events.push(WorkflowEvent::InvoiceDecision(invoice.to_row()));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    fn mark_read(&mut self, id: &str, actor: &Actor) -> TradeflowResult<()> {
        let notification = self
            .state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.is_for(actor.role))
            .ok_or_else(|| TradeflowError::NotificationNotFound(id.to_string()))?;
        if !notification.read {
            notification.read = true;
            self.touched.insert(Collection::Notifications);
            self.events.push(WorkflowEvent::NotificationsChanged);
        }
        Ok(())
    }

    fn mark_all_read(&mut self, actor: &Actor) {
        let mut changed = false;
        for notification in self
            .state
            .notifications
            .iter_mut()
            .filter(|n| n.is_for(actor.role) && !n.read)
        {
            notification.read = true;
            changed = true;
        }
        if changed {
            self.touched.insert(Collection::Notifications);
            self.events.push(WorkflowEvent::NotificationsChanged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    fn seller() -> Actor {
        Actor::named(Seller, "Asha Textiles")
    }

    fn buyer() -> Actor {
        Actor::named(Buyer, "Meridian Retail")
    }

    fn financier() -> Actor {
        Actor::named(Financier, "Northwind Capital")
    }

    fn new_contract() -> NewContract {
        NewContract {
            title: "Cotton yarn supply".to_string(),
            code: Some("CTR-100".to_string()),
            contract_type: "Supply".to_string(),
            value: dec!(2500000),
            payment_terms: "Net 60".to_string(),
            start_date: "2026-03-01".to_string(),
            end_date: "2027-02-28".to_string(),
            seller_id: Some("s1".to_string()),
            seller_name: None,
            buyer_id: Some("b1".to_string()),
            buyer_name: Some("Meridian Retail".to_string()),
        }
    }

    fn new_invoice(number: &str, submit: bool) -> NewInvoice {
        NewInvoice {
            invoice_number: Some(number.to_string()),
            total_amount: dec!(1000000),
            buyer_name: "Meridian Retail".to_string(),
            seller_name: "Asha Textiles".to_string(),
            due_date: "2026-05-30".to_string(),
            issue_date: Some("2026-03-01".to_string()),
            contract_id: None,
            project_id: None,
            description: None,
            submit,
        }
    }

    fn apply(state: WorkflowState, action: Action) -> Outcome {
        reduce(state, &action).unwrap()
    }

    fn with_contract() -> WorkflowState {
        apply(
            WorkflowState::default(),
            Action::CreateContract {
                id: "c1".to_string(),
                input: new_contract(),
                actor: seller(),
                at: at(),
            },
        )
        .state
    }

    fn decide(state: WorkflowState, decision: Decision, actor: Actor) -> TradeflowResult<Outcome> {
        reduce(
            state,
            &Action::DecideContract {
                id: "CTR-100".to_string(),
                decision,
                comment: None,
                actor,
                at: at(),
            },
        )
    }

    #[test]
    fn test_create_contract_queues_for_buyer_and_notifies() {
        let outcome = apply(
            WorkflowState::default(),
            Action::CreateContract {
                id: "c1".to_string(),
                input: new_contract(),
                actor: seller(),
                at: at(),
            },
        );
        let contract = outcome.state.find_contract("c1").unwrap();
        assert_eq!(contract.status, ContractStatus::Pending);
        assert_eq!(contract.seller_name.as_deref(), Some("Asha Textiles"));
        assert!(contract.visibility_consistent());
        assert_eq!(outcome.state.buyer_queues["b1"], vec!["c1"]);

        let note = &outcome.state.notifications[0];
        assert_eq!(note.for_roles, vec![Buyer, Admin]);
        assert!(note.message.contains("₹25.00L"));

        assert!(outcome.touched.contains(&Collection::Contracts));
        assert!(outcome.touched.contains(&Collection::BuyerQueue("b1".to_string())));
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].name(), "contractSubmitted");
    }

    #[test]
    fn test_buyer_approval() {
        let outcome = decide(with_contract(), Decision::Approve, buyer()).unwrap();
        let contract = outcome.state.find_contract("c1").unwrap();
        assert_eq!(contract.status, ContractStatus::Approved);
        assert!(contract.visible_to.contains(&Financier));
        assert!(contract.visibility_consistent());
        assert_eq!(contract.approval_history.len(), 2);
        assert_eq!(contract.approval_history[1].action, "approved");
        assert!(outcome.state.buyer_queues["b1"].is_empty());

        let note = outcome.state.notifications.last().unwrap();
        assert_eq!(note.for_roles, vec![Seller, Admin, Financier]);
        assert_eq!(note.priority, Priority::High);
        assert_eq!(outcome.events[0].name(), "contractDecision");
    }

    #[test]
    fn test_rejection_is_terminal() {
        let state = decide(with_contract(), Decision::Reject, buyer()).unwrap().state;
        let note = state.notifications.last().unwrap();
        assert_eq!(note.for_roles, vec![Seller, Admin]);

        let err = decide(state, Decision::Approve, buyer()).unwrap_err();
        assert!(matches!(
            err,
            TradeflowError::InvalidStateTransition { entity: "contract", .. }
        ));
    }

    #[test]
    fn test_approved_contract_cannot_be_decided_again() {
        let state = decide(with_contract(), Decision::Approve, buyer()).unwrap().state;
        assert!(decide(state.clone(), Decision::Reject, buyer()).is_err());
        assert!(decide(state, Decision::Approve, Actor::new(Admin)).is_err());
    }

    #[test]
    fn test_seller_cannot_approve_own_contract() {
        let err = decide(with_contract(), Decision::Approve, seller()).unwrap_err();
        assert!(matches!(err, TradeflowError::Unauthorized { .. }));
    }

    #[test]
    fn test_modification_and_revision_cycle() {
        let state = decide(with_contract(), Decision::RequestModification, buyer())
            .unwrap()
            .state;
        let contract = state.find_contract("c1").unwrap();
        assert_eq!(contract.status, ContractStatus::ModificationRequested);
        assert_eq!(state.notifications.last().unwrap().for_roles, vec![Seller]);
        assert!(state.buyer_queues["b1"].is_empty());

        let outcome = apply(
            state,
            Action::ReviseContract {
                id: "c1".to_string(),
                revision: ContractRevision {
                    value: Some(dec!(2400000)),
                    ..Default::default()
                },
                comment: Some("Reduced price".to_string()),
                actor: seller(),
                at: at(),
            },
        );
        let contract = outcome.state.find_contract("c1").unwrap();
        assert_eq!(contract.status, ContractStatus::Pending);
        assert_eq!(contract.value, dec!(2400000));
        assert_eq!(contract.approval_history.last().unwrap().action, "revised");
        assert_eq!(outcome.state.buyer_queues["b1"], vec!["c1"]);

        let approved = decide(outcome.state, Decision::Approve, buyer()).unwrap();
        assert_eq!(
            approved.state.find_contract("c1").unwrap().status,
            ContractStatus::Approved
        );
    }

    #[test]
    fn test_revising_pending_contract_is_rejected() {
        let err = reduce(
            with_contract(),
            &Action::ReviseContract {
                id: "c1".to_string(),
                revision: ContractRevision::default(),
                comment: None,
                actor: seller(),
                at: at(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TradeflowError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_duplicate_contract_code() {
        let err = reduce(
            with_contract(),
            &Action::CreateContract {
                id: "c2".to_string(),
                input: new_contract(),
                actor: seller(),
                at: at(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TradeflowError::ValidationError(_)));
    }

    #[test]
    fn test_project_financing_flow() {
        let input = NewProject {
            title: "Loom upgrade".to_string(),
            code: None,
            value: dec!(800000),
            milestones: vec![],
            buyer_id: Some("b1".to_string()),
            contract_id: Some("c1".to_string()),
            seller_id: None,
        };
        let state = apply(
            WorkflowState::default(),
            Action::CreateProject {
                id: "p1".to_string(),
                input,
                actor: seller(),
                at: at(),
            },
        )
        .state;
        let project = state.find_project("p1").unwrap();
        assert_eq!(project.code, "PRJ-P1");
        assert!(!project.is_visible_to(Financier));

        // Financing before approval is not allowed
        let err = reduce(
            state.clone(),
            &Action::FinanceProject {
                id: "p1".to_string(),
                actor: financier(),
                at: at(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TradeflowError::InvalidStateTransition { .. }));

        let outcome = apply(
            state,
            Action::DecideProject {
                id: "p1".to_string(),
                decision: Decision::Approve,
                comment: None,
                actor: Actor::new(Admin),
                at: at(),
            },
        );
        assert_eq!(
            outcome.state.notifications.last().unwrap().for_roles,
            vec![Seller, Financier]
        );
        assert_eq!(outcome.events[0].name(), "projectApproval");

        let outcome = apply(
            outcome.state,
            Action::FinanceProject {
                id: "PRJ-P1".to_string(),
                actor: financier(),
                at: at(),
            },
        );
        let project = outcome.state.find_project("p1").unwrap();
        assert_eq!(project.status, ProjectStatus::Financed);
        assert_eq!(project.financier_id.as_deref(), Some("Northwind Capital"));
    }

    #[test]
    fn test_invoice_happy_path() {
        let outcome = apply(
            WorkflowState::default(),
            Action::CreateInvoice {
                number: "INV-1".to_string(),
                input: new_invoice("INV-1", true),
                actor: seller(),
                at: at(),
            },
        );
        assert_eq!(
            outcome.state.find_invoice("INV-1").unwrap().status,
            InvoiceStatus::PendingBuyerApproval
        );
        assert_eq!(outcome.state.notifications[0].for_roles, vec![Buyer]);

        let outcome = apply(
            outcome.state,
            Action::DecideInvoice {
                number: "INV-1".to_string(),
                decision: Decision::Approve,
                comment: None,
                actor: buyer(),
                at: at(),
            },
        );
        assert_eq!(outcome.state.opportunities.len(), 1);
        assert!(outcome.state.opportunities[0].open);
        assert_eq!(
            outcome.state.notifications.last().unwrap().for_roles,
            vec![Seller, Financier, Admin]
        );

        let outcome = apply(
            outcome.state,
            Action::FundInvoice {
                number: "INV-1".to_string(),
                terms: FundingTerms::new(dec!(12), 90).unwrap(),
                actor: financier(),
                at: at(),
            },
        );
        let funded = outcome.state.find_funded("INV-1").unwrap();
        assert_eq!(funded.discount_amount, dec!(29589.04));
        assert_eq!(funded.net_amount, dec!(970410.96));
        assert_eq!(funded.maturity_date, "2026-05-30");
        assert!(!outcome.state.opportunities[0].open);
        assert_eq!(outcome.events[0].name(), "invoiceFunded");
        assert_eq!(
            outcome.state.notifications.last().unwrap().for_roles,
            vec![Seller, Buyer, Admin]
        );

        let outcome = apply(
            outcome.state,
            Action::SettleInvoice {
                number: "INV-1".to_string(),
                actor: buyer(),
                at: at(),
            },
        );
        assert_eq!(
            outcome.state.find_invoice("INV-1").unwrap().status,
            InvoiceStatus::Settled
        );
        assert_eq!(
            outcome.state.find_funded("INV-1").unwrap().status,
            FundingStatus::Settled
        );
    }

    #[test]
    fn test_invoice_cannot_skip_buyer_approval() {
        let state = apply(
            WorkflowState::default(),
            Action::CreateInvoice {
                number: "INV-2".to_string(),
                input: new_invoice("INV-2", false),
                actor: seller(),
                at: at(),
            },
        )
        .state;
        assert_eq!(state.find_invoice("INV-2").unwrap().status, InvoiceStatus::Pending);

        let err = reduce(
            state.clone(),
            &Action::DecideInvoice {
                number: "INV-2".to_string(),
                decision: Decision::Approve,
                comment: None,
                actor: buyer(),
                at: at(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TradeflowError::InvalidStateTransition { entity: "invoice", .. }));

        let err = reduce(
            state,
            &Action::FundInvoice {
                number: "INV-2".to_string(),
                terms: FundingTerms::new(dec!(10), 30).unwrap(),
                actor: financier(),
                at: at(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TradeflowError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_only_financiers_fund() {
        let state = apply(
            WorkflowState::default(),
            Action::CreateInvoice {
                number: "INV-3".to_string(),
                input: new_invoice("INV-3", true),
                actor: seller(),
                at: at(),
            },
        )
        .state;
        let err = reduce(
            state,
            &Action::FundInvoice {
                number: "INV-3".to_string(),
                terms: FundingTerms::new(dec!(10), 30).unwrap(),
                actor: buyer(),
                at: at(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TradeflowError::Unauthorized { .. }));
    }

    #[test]
    fn test_mark_read_is_scoped_to_role() {
        let state = with_contract();
        let id = state.notifications[0].id.clone();

        let err = reduce(
            state.clone(),
            &Action::MarkNotificationRead {
                id: id.clone(),
                actor: financier(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TradeflowError::NotificationNotFound(_)));

        let outcome = apply(state, Action::MarkNotificationRead { id, actor: buyer() });
        assert!(outcome.state.notifications[0].read);

        // Second time is a no-op
        let outcome = apply(
            outcome.state,
            Action::MarkAllNotificationsRead { actor: buyer() },
        );
        assert!(outcome.touched.is_empty());
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_notification_ids_are_sequential() {
        let state = decide(with_contract(), Decision::Approve, buyer()).unwrap().state;
        let ids: Vec<&str> = state.notifications.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["NTF-000001", "NTF-000002"]);
    }
}
