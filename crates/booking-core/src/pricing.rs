//! # Pricing
//!
//! Money amounts and the per-booking price breakdown.
//!
//! Amounts are held in cents so the service charge can be rounded exactly
//! (half away from zero) instead of inheriting binary floating point error.

use serde::{Deserialize, Serialize};

/// Service charge applied on top of the subtotal, in basis points (5%)
pub const SERVICE_CHARGE_BPS: i64 = 500;

const BPS_DENOMINATOR: i64 = 10_000;

/// A USD amount in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Price {
    /// Amount in cents
    pub amount: i64,
}

impl Price {
    /// Create a price from a decimal dollar amount, rounding to the nearest cent
    pub fn new(amount: f64) -> Self {
        Self {
            amount: (amount * 100.0).round() as i64,
        }
    }

    /// Create a price from cents
    pub fn from_cents(amount: i64) -> Self {
        Self { amount }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.amount as f64 / 100.0
    }

    /// Two-decimal string as sent to the payment gateway (e.g. "210.00")
    pub fn to_amount_string(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Format for display (e.g. "$210.00")
    pub fn display(&self) -> String {
        format!("${}", self.to_amount_string())
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Self {
        Price::new(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_decimal()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Derived price of one booking. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub unit_price: Price,
    pub party_size: u32,
    /// Fraction of the subtotal charged as service fee
    pub service_charge_rate: f64,
    pub subtotal: Price,
    pub service_charge: Price,
    pub total: Price,
}

/// Compute the breakdown for `party_size` people at `unit_price` each.
///
/// `party_size` must be at least 1 and `unit_price` positive; neither is
/// checked here. Arithmetic is done in `i128`; amounts beyond the `i64`
/// range saturate.
pub fn compute(unit_price: Price, party_size: u32) -> PriceBreakdown {
    let subtotal = i128::from(unit_price.amount) * i128::from(party_size);
    let service_charge = round_div(
        subtotal * i128::from(SERVICE_CHARGE_BPS),
        i128::from(BPS_DENOMINATOR),
    );

    PriceBreakdown {
        unit_price,
        party_size,
        service_charge_rate: SERVICE_CHARGE_BPS as f64 / BPS_DENOMINATOR as f64,
        subtotal: saturating_cents(subtotal),
        service_charge: saturating_cents(service_charge),
        total: saturating_cents(subtotal + service_charge),
    }
}

fn saturating_cents(amount: i128) -> Price {
    let clamped = amount.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
    Price::from_cents(clamped as i64)
}

/// Integer division rounding half away from zero
fn round_div(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_for_two_people() {
        let breakdown = compute(Price::new(100.0), 2);

        assert_eq!(breakdown.subtotal, Price::from_cents(20_000));
        assert_eq!(breakdown.service_charge, Price::from_cents(1_000));
        assert_eq!(breakdown.total, Price::from_cents(21_000));
        assert_eq!(breakdown.total.to_amount_string(), "210.00");
        assert_eq!(breakdown.service_charge_rate, 0.05);
    }

    #[test]
    fn test_service_charge_rounds_half_away_from_zero() {
        // 10.10 * 5% = 0.505
        let breakdown = compute(Price::new(10.10), 1);
        assert_eq!(breakdown.service_charge, Price::from_cents(51));
        assert_eq!(breakdown.total, Price::from_cents(1061));

        // 0.30 * 5% = 0.015
        let breakdown = compute(Price::from_cents(30), 1);
        assert_eq!(breakdown.service_charge, Price::from_cents(2));
    }

    #[test]
    fn test_total_matches_rounded_product() {
        for cents in [1_i64, 99, 1234, 4_999, 25_050, 99_999] {
            for party in 1..=12_u32 {
                let breakdown = compute(Price::from_cents(cents), party);
                let subtotal = cents * i64::from(party);
                // total = round(subtotal * 1.05) in cents, computed in integer space
                let expected_total = (subtotal * 105 + 50) / 100;
                let expected_charge = (subtotal * 5 + 50) / 100;
                assert_eq!(breakdown.total.amount, expected_total);
                assert_eq!(breakdown.service_charge.amount, expected_charge);
            }
        }
    }

    #[test]
    fn test_large_party_does_not_overflow() {
        let breakdown = compute(Price::new(50_000.0), u32::MAX);

        assert_eq!(breakdown.subtotal.amount, 21_474_836_475_000_000);
        assert_eq!(breakdown.service_charge.amount, 1_073_741_823_750_000);
        assert_eq!(breakdown.total.amount, 22_548_578_298_750_000);
    }

    #[test]
    fn test_out_of_range_amounts_saturate() {
        let breakdown = compute(Price::from_cents(i64::MAX), 2);
        assert_eq!(breakdown.subtotal.amount, i64::MAX);
        assert_eq!(breakdown.total.amount, i64::MAX);
    }

    #[test]
    fn test_round_div_negative() {
        assert_eq!(round_div(-15, 10), -2);
        assert_eq!(round_div(-14, 10), -1);
        assert_eq!(round_div(15, 10), 2);
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(Price::new(29.99).display(), "$29.99");
        assert_eq!(Price::from_cents(5).to_amount_string(), "0.05");
        assert_eq!(Price::from_cents(-250).to_amount_string(), "-2.50");
    }

    #[test]
    fn test_price_serde_as_decimal() {
        let price: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(price.amount, 1250);
        assert_eq!(serde_json::to_string(&price).unwrap(), "12.5");
    }
}
