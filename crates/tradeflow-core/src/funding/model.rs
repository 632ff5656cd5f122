//! Funding domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeflow_store::funded::FundedInvoiceRow;
use tradeflow_store::opportunities::OpportunityRow;

use crate::error::{TradeflowError, TradeflowResult};

pub const MAX_TENURE_DAYS: u32 = 365;

/// Terms a financier offers on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingTerms {
    /// Annualized discount rate in percent.
    pub discount_rate: Decimal,
    pub tenure_days: u32,
}

impl FundingTerms {
    pub fn new(discount_rate: Decimal, tenure_days: u32) -> TradeflowResult<Self> {
        let terms = Self {
            discount_rate,
            tenure_days,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Tenure running from `funded_on` until the invoice due date, at least one day.
    pub fn until_due(
        discount_rate: Decimal,
        funded_on: NaiveDate,
        due_date: NaiveDate,
    ) -> TradeflowResult<Self> {
        let days = (due_date - funded_on).num_days().max(1);
        let tenure = u32::try_from(days).unwrap_or(MAX_TENURE_DAYS);
        Self::new(discount_rate, tenure.min(MAX_TENURE_DAYS))
    }

    pub fn validate(&self) -> TradeflowResult<()> {
        if self.discount_rate <= Decimal::ZERO || self.discount_rate > Decimal::ONE_HUNDRED {
            return Err(TradeflowError::validation(format!(
                "Discount rate {}% must be within (0, 100]",
                self.discount_rate
            )));
        }
        if self.tenure_days == 0 || self.tenure_days > MAX_TENURE_DAYS {
            return Err(TradeflowError::validation(format!(
                "Tenure of {} days must be between 1 and {}",
                self.tenure_days, MAX_TENURE_DAYS
            )));
        }
        Ok(())
    }
}

/// Figures for funding an invoice under given terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingQuote {
    pub total_amount: Decimal,
    pub discount_rate: Decimal,
    pub tenure_days: u32,
    pub discount_amount: Decimal,
    /// Paid to the seller today.
    pub net_amount: Decimal,
    /// Received by the financier at maturity.
    pub expected_return: Decimal,
    pub maturity_date: NaiveDate,
}

/// Lifecycle of a funded position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingStatus {
    Active,
    Settled,
}

impl FundingStatus {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "settled" => Self::Settled,
            _ => Self::Active,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Settled => "Settled",
        }
    }
}

/// An invoice a financier has funded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundedInvoice {
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub discount_rate: Decimal,
    pub discount_amount: Decimal,
    pub net_amount: Decimal,
    pub expected_return: Decimal,
    pub tenure: u32,
    pub funded_at: String,
    pub maturity_date: String,
    pub financier_name: Option<String>,
    pub buyer_name: String,
    pub seller_name: String,
    pub status: FundingStatus,
}

impl FundedInvoice {
    /// Create a FundedInvoice from a stored row.
    pub fn from_row(row: FundedInvoiceRow) -> Self {
        Self {
            invoice_number: row.invoice_number,
            total_amount: row.total_amount,
            discount_rate: row.discount_rate,
            discount_amount: row.discount_amount,
            net_amount: row.net_amount,
            expected_return: row.expected_return,
            tenure: row.tenure,
            funded_at: row.funded_at,
            maturity_date: row.maturity_date,
            financier_name: row.financier_name,
            buyer_name: row.buyer_name,
            seller_name: row.seller_name,
            status: FundingStatus::from_str(&row.status),
        }
    }

    pub fn to_row(&self) -> FundedInvoiceRow {
        FundedInvoiceRow {
            invoice_number: self.invoice_number.clone(),
            total_amount: self.total_amount,
            discount_rate: self.discount_rate,
            discount_amount: self.discount_amount,
            net_amount: self.net_amount,
            expected_return: self.expected_return,
            tenure: self.tenure,
            funded_at: self.funded_at.clone(),
            maturity_date: self.maturity_date.clone(),
            financier_name: self.financier_name.clone(),
            buyer_name: self.buyer_name.clone(),
            seller_name: self.seller_name.clone(),
            status: self.status.as_str().to_string(),
        }
    }

    /// Financier's margin on the position.
    pub fn profit(&self) -> Decimal {
        self.expected_return.saturating_sub(self.net_amount)
    }
}

/// An approved invoice offered to financiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub invoice_number: String,
    pub amount: Decimal,
    pub buyer_name: String,
    pub seller_name: String,
    pub due_date: String,
    pub created_at: String,
    pub open: bool,
}

impl Opportunity {
    pub fn from_row(row: OpportunityRow) -> Self {
        Self {
            id: row.id,
            invoice_number: row.invoice_number,
            amount: row.amount,
            buyer_name: row.buyer_name,
            seller_name: row.seller_name,
            due_date: row.due_date,
            created_at: row.created_at,
            open: row.open,
        }
    }

    pub fn to_row(&self) -> OpportunityRow {
        OpportunityRow {
            id: self.id.clone(),
            invoice_number: self.invoice_number.clone(),
            amount: self.amount,
            buyer_name: self.buyer_name.clone(),
            seller_name: self.seller_name.clone(),
            due_date: self.due_date.clone(),
            created_at: self.created_at.clone(),
            open: self.open,
        }
    }
}
