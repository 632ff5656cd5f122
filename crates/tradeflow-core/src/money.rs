//! Rupee formatting.
//!
//! Compact amounts switch units at one thousand (K), one lakh (L) and one
//! crore (Cr). Full amounts use Indian digit grouping (`12,34,567.00`).

use rust_decimal::{Decimal, RoundingStrategy};

const THOUSAND: i64 = 1_000;
const LAKH: i64 = 100_000;
const CRORE: i64 = 10_000_000;

fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compact rupee amount, e.g. `₹2.50Cr`, `₹12.35L`, `₹4.20K`, `₹999.00`.
///
/// The amount is rounded to paise before the unit is chosen, so `999.995`
/// reads `₹1.00K`.
pub fn format_compact(amount: Decimal) -> String {
    let abs = round2(amount.abs());
    let sign = if amount.is_sign_negative() && !abs.is_zero() { "-" } else { "" };

    let (scaled, unit) = if abs >= Decimal::from(CRORE) {
        (abs / Decimal::from(CRORE), "Cr")
    } else if abs >= Decimal::from(LAKH) {
        (abs / Decimal::from(LAKH), "L")
    } else if abs >= Decimal::from(THOUSAND) {
        (abs / Decimal::from(THOUSAND), "K")
    } else {
        return format!("{}₹{}", sign, group_decimal(abs));
    };

    format!("{}₹{:.2}{}", sign, round2(scaled), unit)
}

/// Full rupee amount with Indian grouping, e.g. `₹12,34,567.00`.
pub fn format_inr(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}₹{}", sign, group_decimal(round2(amount.abs())))
}

/// Format a non-negative, already rounded amount with two decimals and
/// Indian grouping.
fn group_decimal(amount: Decimal) -> String {
    let text = format!("{:.2}", amount);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}.{}", group_indian(int_part), frac_part)
}

/// Group an integer digit string: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compact_thresholds() {
        assert_eq!(format_compact(dec!(25000000)), "₹2.50Cr");
        assert_eq!(format_compact(dec!(10000000)), "₹1.00Cr");
        assert_eq!(format_compact(dec!(9999999)), "₹100.00L");
        assert_eq!(format_compact(dec!(1234567)), "₹12.35L");
        assert_eq!(format_compact(dec!(100000)), "₹1.00L");
        assert_eq!(format_compact(dec!(99999)), "₹100.00K");
        assert_eq!(format_compact(dec!(4200)), "₹4.20K");
        assert_eq!(format_compact(dec!(1000)), "₹1.00K");
        assert_eq!(format_compact(dec!(999)), "₹999.00");
        assert_eq!(format_compact(dec!(0)), "₹0.00");
    }

    #[test]
    fn test_compact_negative() {
        assert_eq!(format_compact(dec!(-150000)), "-₹1.50L");
        assert_eq!(format_compact(dec!(-12.5)), "-₹12.50");
    }

    #[test]
    fn test_compact_rounds_before_choosing_unit() {
        assert_eq!(format_compact(dec!(999.995)), "₹1.00K");
        assert_eq!(format_compact(dec!(999.994)), "₹999.99");
        assert_eq!(format_compact(dec!(-999.995)), "-₹1.00K");
        assert_eq!(format_compact(dec!(-0.001)), "₹0.00");
    }

    #[test]
    fn test_full_indian_grouping() {
        assert_eq!(format_inr(dec!(1234567)), "₹12,34,567.00");
        assert_eq!(format_inr(dec!(123456789.456)), "₹12,34,56,789.46");
        assert_eq!(format_inr(dec!(1000)), "₹1,000.00");
        assert_eq!(format_inr(dec!(100)), "₹100.00");
        assert_eq!(format_inr(dec!(-99999.5)), "-₹99,999.50");
    }
}
