//! Admin-managed buy rates per scrap category.
//!
//! Rates live in the store's `scrap_rates` table; this layer reads them
//! into a card for display and validates admin edits before they are
//! written back. The static per-category hint remains the fallback when
//! no rate has been fetched yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::format_inr;
use crate::scrap::ScrapType;

/// Per-kilogram buy rate for one scrap category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapRate {
    pub scrap_type: ScrapType,
    pub rate_per_kg: f64,
    pub updated_at: DateTime<Utc>,
}

/// The fetched rate table, keyed by scrap category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateCard {
    rates: Vec<ScrapRate>,
}

impl RateCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Replace the card with a fetched snapshot.
    pub fn replace_all(&mut self, rates: impl IntoIterator<Item = ScrapRate>) {
        self.rates = rates.into_iter().collect();
    }

    /// Insert or replace the rate for one category (admin save echo).
    pub fn upsert(&mut self, rate: ScrapRate) {
        match self
            .rates
            .iter_mut()
            .find(|r| r.scrap_type == rate.scrap_type)
        {
            Some(existing) => *existing = rate,
            None => self.rates.push(rate),
        }
    }

    pub fn rate_for(&self, scrap: ScrapType) -> Option<f64> {
        self.rates
            .iter()
            .find(|r| r.scrap_type == scrap)
            .map(|r| r.rate_per_kg)
    }

    /// Card text for one category: the stored rate, or the static hint
    /// when none has been fetched.
    pub fn display_rate(&self, scrap: ScrapType) -> String {
        match self.rate_for(scrap) {
            Some(rate) => format_rate_per_kg(rate),
            None => scrap.rate_hint().to_string(),
        }
    }
}

/// "₹12/kg" style text for a per-kilogram rate.
pub fn format_rate_per_kg(rate: f64) -> String {
    format!("{}/kg", format_inr(rate))
}

/// Validate an admin's typed rate edit. Only finite, non-negative
/// amounts are accepted.
pub fn parse_rate(input: &str) -> Option<f64> {
    let rate: f64 = input.trim().parse().ok()?;
    if rate.is_finite() && rate >= 0.0 {
        Some(rate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn rate(scrap: ScrapType, per_kg: f64) -> ScrapRate {
        ScrapRate {
            scrap_type: scrap,
            rate_per_kg: per_kg,
            updated_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn lookup_by_category() {
        let mut card = RateCard::new();
        card.replace_all([rate(ScrapType::Paper, 12.0), rate(ScrapType::Metal, 35.0)]);
        assert_eq!(card.rate_for(ScrapType::Metal), Some(35.0));
        assert_eq!(card.rate_for(ScrapType::Glass), None);
    }

    #[test]
    fn display_falls_back_to_static_hint() {
        let mut card = RateCard::new();
        card.replace_all([rate(ScrapType::Paper, 14.5)]);
        assert_eq!(card.display_rate(ScrapType::Paper), "₹14.50/kg");
        assert_eq!(
            card.display_rate(ScrapType::Glass),
            ScrapType::Glass.rate_hint()
        );
    }

    #[test]
    fn upsert_replaces_existing_category() {
        let mut card = RateCard::new();
        card.upsert(rate(ScrapType::Paper, 12.0));
        card.upsert(rate(ScrapType::Paper, 15.0));
        assert_eq!(card.rate_for(ScrapType::Paper), Some(15.0));
    }

    #[test]
    fn rate_edits_must_be_non_negative_numbers() {
        assert_eq!(parse_rate("12"), Some(12.0));
        assert_eq!(parse_rate(" 8.5 "), Some(8.5));
        assert_eq!(parse_rate("-3"), None);
        assert_eq!(parse_rate("abc"), None);
        assert_eq!(parse_rate(""), None);
    }
}
