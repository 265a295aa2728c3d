pub mod table;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use self::table::PricingTable;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateStep {
    pub stage: String,
    pub detail: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Itemised estimate. `estimated_cost` equals [`estimate`] for the same input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub category: String,
    pub category_fell_back: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
    pub complexity: String,
    pub complexity_fell_back: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub contingency_factor: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub area_sq_m: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_cost: Decimal,
    pub steps: Vec<EstimateStep>,
}

pub trait QuoteEstimator: Send + Sync {
    fn estimate(&self, category: &str, area_sq_m: Decimal, complexity: &str) -> Decimal;
}

impl QuoteEstimator for PricingTable {
    fn estimate(&self, category: &str, area_sq_m: Decimal, complexity: &str) -> Decimal {
        estimate(self, category, area_sq_m, complexity)
    }
}

/// `area * base_rate(category) * multiplier(complexity) * contingency`, unrounded.
///
/// `area_sq_m` must already be non-negative; callers clamp user input. Products
/// beyond the decimal range saturate at [`Decimal::MAX`].
pub fn estimate(table: &PricingTable, category: &str, area_sq_m: Decimal, complexity: &str) -> Decimal {
    let base = saturating_mul(area_sq_m, table.base_rate(category).value);
    let adjusted = saturating_mul(base, table.multiplier(complexity).value);
    saturating_mul(adjusted, table.contingency_factor)
}

pub fn estimate_with_trace(
    table: &PricingTable,
    category: &str,
    area_sq_m: Decimal,
    complexity: &str,
) -> EstimateBreakdown {
    let rate = table.base_rate(category);
    let multiplier = table.multiplier(complexity);

    let base = saturating_mul(area_sq_m, rate.value);
    let adjusted = saturating_mul(base, multiplier.value);
    let total = saturating_mul(adjusted, table.contingency_factor);

    EstimateBreakdown {
        category: rate.key.to_string(),
        category_fell_back: rate.fell_back,
        base_rate: rate.value,
        complexity: multiplier.key.to_string(),
        complexity_fell_back: multiplier.fell_back,
        multiplier: multiplier.value,
        contingency_factor: table.contingency_factor,
        area_sq_m,
        estimated_cost: total,
        steps: vec![
            EstimateStep {
                stage: "base".to_string(),
                detail: format!("{area_sq_m} m² * {} ({})", rate.value, rate.key),
                amount: base,
            },
            EstimateStep {
                stage: "complexity".to_string(),
                detail: format!("* {} ({})", multiplier.value, multiplier.key),
                amount: adjusted,
            },
            EstimateStep {
                stage: "contingency".to_string(),
                detail: format!("* {}", table.contingency_factor),
                amount: total,
            },
        ],
    }
}

// Every factor is non-negative once the table validates, so overflow is upward.
fn saturating_mul(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_mul(rhs).unwrap_or(Decimal::MAX)
}

/// Clamps raw user input to the estimator's precondition.
pub fn clamp_area(area_sq_m: Option<Decimal>) -> Decimal {
    area_sq_m.filter(|area| *area > Decimal::ZERO).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{clamp_area, estimate, estimate_with_trace, PricingTable, QuoteEstimator};

    fn area(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[test]
    fn zero_area_is_zero_for_every_category_and_level() {
        let table = PricingTable::default();
        for category in table.base_rates.keys().map(String::as_str).chain(["Unknown"]) {
            for level in ["low", "medium", "high", "bogus"] {
                assert_eq!(estimate(&table, category, Decimal::ZERO, level), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn road_construction_medium_matches_formula() {
        let cost = estimate(&PricingTable::default(), "Road Construction", area(100), "medium");
        assert_eq!(cost, Decimal::new(106_400, 0));
    }

    #[test]
    fn unknown_category_uses_other_rate() {
        let cost = estimate(&PricingTable::default(), "UnknownCategory", area(50), "high");
        assert_eq!(cost, Decimal::new(42_000, 0));
    }

    #[test]
    fn unknown_level_behaves_like_medium() {
        let table = PricingTable::default();
        for category in ["Bulk Earthworks", "Water & Sanitation", "Nope"] {
            assert_eq!(
                estimate(&table, category, area(37), "unknown-level"),
                estimate(&table, category, area(37), "medium")
            );
        }
    }

    #[test]
    fn estimate_is_non_decreasing_in_area() {
        let table = PricingTable::default();
        let costs: Vec<Decimal> = [0, 1, 10, 250, 10_000]
            .into_iter()
            .map(|value| estimate(&table, "Waste Management", area(value), "low"))
            .collect();

        assert!(costs.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn category_ordering_follows_base_rates() {
        let table = PricingTable::default();
        let mut by_rate: Vec<(&String, &Decimal)> = table.base_rates.iter().collect();
        by_rate.sort_by_key(|(_, rate)| **rate);

        let costs: Vec<Decimal> = by_rate
            .iter()
            .map(|(category, _)| estimate(&table, category, area(120), "high"))
            .collect();

        assert!(costs.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn trace_total_matches_plain_estimate() {
        let table = PricingTable::default();
        let breakdown = estimate_with_trace(&table, "Bulk Earthworks", Decimal::new(1255, 1), "low");

        assert_eq!(
            breakdown.estimated_cost,
            estimate(&table, "Bulk Earthworks", Decimal::new(1255, 1), "low")
        );
        assert_eq!(breakdown.steps.len(), 3);
        assert_eq!(breakdown.steps[2].amount, breakdown.estimated_cost);
        assert!(!breakdown.category_fell_back);
        assert_eq!(breakdown.multiplier, Decimal::new(90, 2));
    }

    #[test]
    fn trace_reports_fallbacks() {
        let breakdown =
            estimate_with_trace(&PricingTable::default(), "Bridges", area(10), "");

        assert_eq!(breakdown.category, "Other");
        assert!(breakdown.category_fell_back);
        assert_eq!(breakdown.complexity, "medium");
        assert!(breakdown.complexity_fell_back);
    }

    #[test]
    fn table_implements_estimator_trait() {
        let estimator: &dyn QuoteEstimator = &PricingTable::default();
        assert_eq!(
            estimator.estimate("Road Construction", area(100), "medium"),
            Decimal::new(106_400, 0)
        );
    }

    #[test]
    fn huge_area_saturates_instead_of_overflowing() {
        let table = PricingTable::default();
        let area = Decimal::from_str_exact("1000000000000000000000000000").expect("1e27");

        assert_eq!(estimate(&table, "Road Construction", area, "high"), Decimal::MAX);

        let breakdown = estimate_with_trace(&table, "Road Construction", area, "high");
        assert_eq!(breakdown.estimated_cost, Decimal::MAX);
        assert!(breakdown.steps.iter().all(|step| step.amount == Decimal::MAX));
    }

    #[test]
    fn clamp_area_zeroes_negative_and_missing_input() {
        assert_eq!(clamp_area(None), Decimal::ZERO);
        assert_eq!(clamp_area(Some(area(-3))), Decimal::ZERO);
        assert_eq!(clamp_area(Some(area(3))), area(3));
    }
}
