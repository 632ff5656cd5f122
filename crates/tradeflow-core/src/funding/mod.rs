//! Invoice funding: discount arithmetic and the financier marketplace.

pub mod model;

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{TradeflowError, TradeflowResult};
use model::{FundedInvoice, FundingQuote, FundingStatus, FundingTerms, Opportunity};
use tradeflow_store::{funded, opportunities, StorePool};

const DAYS_PER_YEAR: u32 = 365;

/// Price an invoice under the given terms.
///
/// `discount = total × rate/100 × tenure/365`, rounded to paise. The
/// rate-and-tenure factor is formed first; valid terms keep it within
/// `(0, 1]`, so the discount never exceeds the invoice total.
pub fn quote(
    total_amount: Decimal,
    terms: &FundingTerms,
    funded_on: NaiveDate,
) -> TradeflowResult<FundingQuote> {
    terms.validate()?;
    let overflow = || {
        TradeflowError::validation(format!(
            "Invoice amount {} is too large to fund",
            total_amount
        ))
    };

    let factor = terms
        .discount_rate
        .checked_mul(Decimal::from(terms.tenure_days))
        .and_then(|v| v.checked_div(Decimal::from(100 * DAYS_PER_YEAR)))
        .ok_or_else(overflow)?;
    let discount_amount = total_amount
        .checked_mul(factor)
        .ok_or_else(overflow)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let net_amount = total_amount.checked_sub(discount_amount).ok_or_else(overflow)?;

    let maturity_date = funded_on
        .checked_add_days(Days::new(u64::from(terms.tenure_days)))
        .unwrap_or(funded_on);

    Ok(FundingQuote {
        total_amount,
        discount_rate: terms.discount_rate,
        tenure_days: terms.tenure_days,
        discount_amount,
        net_amount,
        expected_return: total_amount,
        maturity_date,
    })
}

/// All funded invoices.
pub async fn list_funded(pool: &StorePool) -> TradeflowResult<Vec<FundedInvoice>> {
    let rows = funded::list_funded_invoices(pool).await?;
    Ok(rows.into_iter().map(FundedInvoice::from_row).collect())
}

/// Marketplace opportunities, optionally only those still open.
pub async fn list_opportunities(pool: &StorePool, open_only: bool) -> TradeflowResult<Vec<Opportunity>> {
    let rows = opportunities::list_opportunities(pool).await?;
    Ok(rows
        .into_iter()
        .map(Opportunity::from_row)
        .filter(|o| !open_only || o.open)
        .collect())
}

/// Totals across a financier's funded positions.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub positions: usize,
    pub active_positions: usize,
    pub deployed: Decimal,
    pub expected_return: Decimal,
    pub expected_profit: Decimal,
}

pub fn summarize_portfolio(funded: &[FundedInvoice]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        positions: funded.len(),
        ..Default::default()
    };
    for position in funded {
        if position.status == FundingStatus::Active {
            summary.active_positions += 1;
        }
        summary.deployed = summary.deployed.saturating_add(position.net_amount);
        summary.expected_return = summary.expected_return.saturating_add(position.expected_return);
        summary.expected_profit = summary.expected_profit.saturating_add(position.profit());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_quote_discount_math() {
        let terms = FundingTerms::new(dec!(12), 90).unwrap();
        let q = quote(dec!(1000000), &terms, date("2026-01-01")).unwrap();
        // 1,000,000 × 12% × 90/365 = 29,589.041...
        assert_eq!(q.discount_amount, dec!(29589.04));
        assert_eq!(q.net_amount, dec!(970410.96));
        assert_eq!(q.expected_return, dec!(1000000));
        assert_eq!(q.maturity_date, date("2026-04-01"));
    }

    #[test]
    fn test_full_year_at_ten_percent() {
        let terms = FundingTerms::new(dec!(10), 365).unwrap();
        let q = quote(dec!(50000), &terms, date("2026-06-15")).unwrap();
        assert_eq!(q.discount_amount, dec!(5000));
        assert_eq!(q.net_amount, dec!(45000));
    }

    #[test]
    fn test_quote_huge_amount_does_not_overflow() {
        let terms = FundingTerms::new(dec!(100), 365).unwrap();
        let q = quote(dec!(1000000000000000000000000000), &terms, date("2026-01-01")).unwrap();
        assert_eq!(q.discount_amount, dec!(1000000000000000000000000000));
        assert_eq!(q.net_amount, Decimal::ZERO);

        let terms = FundingTerms::new(dec!(12), 90).unwrap();
        let q = quote(Decimal::MAX, &terms, date("2026-01-01")).unwrap();
        assert!(q.discount_amount < Decimal::MAX);
        assert!(q.net_amount > Decimal::ZERO);
    }

    #[test]
    fn test_portfolio_totals_saturate() {
        let position = FundedInvoice {
            invoice_number: "INV-BIG".to_string(),
            total_amount: Decimal::MAX,
            discount_rate: dec!(1),
            discount_amount: Decimal::ZERO,
            net_amount: Decimal::MAX,
            expected_return: Decimal::MAX,
            tenure: 30,
            funded_at: "2026-01-01T00:00:00.000Z".to_string(),
            maturity_date: "2026-01-31".to_string(),
            financier_name: None,
            buyer_name: "Meridian".to_string(),
            seller_name: "Asha".to_string(),
            status: FundingStatus::Active,
        };
        let summary = summarize_portfolio(&[position.clone(), position]);
        assert_eq!(summary.positions, 2);
        assert_eq!(summary.deployed, Decimal::MAX);
        assert_eq!(summary.expected_return, Decimal::MAX);
    }

    #[test]
    fn test_terms_validation() {
        assert!(FundingTerms::new(dec!(0), 30).is_err());
        assert!(FundingTerms::new(dec!(100.01), 30).is_err());
        assert!(FundingTerms::new(dec!(12), 0).is_err());
        assert!(FundingTerms::new(dec!(12), 366).is_err());
        assert!(FundingTerms::new(dec!(100), 365).is_ok());
    }

    #[test]
    fn test_tenure_until_due() {
        let terms = FundingTerms::until_due(dec!(9), date("2026-03-01"), date("2026-03-31")).unwrap();
        assert_eq!(terms.tenure_days, 30);

        // Overdue invoices still carry a one day tenure
        let terms = FundingTerms::until_due(dec!(9), date("2026-03-31"), date("2026-03-01")).unwrap();
        assert_eq!(terms.tenure_days, 1);
    }

    #[test]
    fn test_portfolio_summary() {
        let terms = FundingTerms::new(dec!(12), 90).unwrap();
        let q = quote(dec!(1000000), &terms, date("2026-01-01")).unwrap();
        let position = FundedInvoice {
            invoice_number: "INV-1".to_string(),
            total_amount: q.total_amount,
            discount_rate: q.discount_rate,
            discount_amount: q.discount_amount,
            net_amount: q.net_amount,
            expected_return: q.expected_return,
            tenure: q.tenure_days,
            funded_at: "2026-01-01T00:00:00+00:00".to_string(),
            maturity_date: q.maturity_date.to_string(),
            financier_name: None,
            buyer_name: "Meridian".to_string(),
            seller_name: "Asha".to_string(),
            status: FundingStatus::Active,
        };
        let summary = summarize_portfolio(&[position]);
        assert_eq!(summary.positions, 1);
        assert_eq!(summary.active_positions, 1);
        assert_eq!(summary.expected_profit, dec!(29589.04));
    }
}
