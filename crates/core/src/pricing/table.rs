use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_COMPLEXITY: &str = "medium";
pub const COMPLEXITY_LEVELS: [&str; 3] = ["low", "medium", "high"];

/// Base rates (ZAR per m²) by project category and multipliers by complexity
/// level. Built once at startup and shared read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTable {
    pub base_rates: BTreeMap<String, Decimal>,
    pub complexity_multipliers: BTreeMap<String, Decimal>,
    pub default_category: String,
    pub default_complexity: String,
    pub contingency_factor: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRate<'a> {
    pub key: &'a str,
    pub value: Decimal,
    pub fell_back: bool,
}

impl Default for PricingTable {
    fn default() -> Self {
        let base_rates = [
            ("Road Construction", Decimal::new(950, 0)),
            ("Bulk Earthworks", Decimal::new(450, 0)),
            ("Water & Sanitation", Decimal::new(700, 0)),
            ("Waste Management", Decimal::new(550, 0)),
            (DEFAULT_CATEGORY, Decimal::new(600, 0)),
        ]
        .into_iter()
        .map(|(category, rate)| (category.to_string(), rate))
        .collect();

        let complexity_multipliers = [
            ("low", Decimal::new(90, 2)),
            ("medium", Decimal::new(100, 2)),
            ("high", Decimal::new(125, 2)),
        ]
        .into_iter()
        .map(|(level, factor)| (level.to_string(), factor))
        .collect();

        Self {
            base_rates,
            complexity_multipliers,
            default_category: DEFAULT_CATEGORY.to_string(),
            default_complexity: DEFAULT_COMPLEXITY.to_string(),
            contingency_factor: Decimal::new(112, 2),
        }
    }
}

impl PricingTable {
    /// Case-sensitive lookup; unknown categories use the default category's rate.
    pub fn base_rate<'a>(&'a self, category: &'a str) -> ResolvedRate<'a> {
        resolve(&self.base_rates, category, &self.default_category)
    }

    /// Unknown or blank levels use the default level's multiplier.
    pub fn multiplier<'a>(&'a self, complexity: &'a str) -> ResolvedRate<'a> {
        resolve(&self.complexity_multipliers, complexity, &self.default_complexity)
    }

    /// Checks the fallback invariants. Failing tables are rejected at config load.
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_rates.contains_key(&self.default_category) {
            return Err(format!(
                "pricing.base_rates must contain the default category `{}`",
                self.default_category
            ));
        }

        for level in self.complexity_multipliers.keys() {
            if !COMPLEXITY_LEVELS.contains(&level.as_str()) {
                return Err(format!(
                    "pricing.complexity_multipliers has unknown level `{level}` (expected low|medium|high)"
                ));
            }
        }
        for level in COMPLEXITY_LEVELS {
            if !self.complexity_multipliers.contains_key(level) {
                return Err(format!("pricing.complexity_multipliers is missing level `{level}`"));
            }
        }
        if !self.complexity_multipliers.contains_key(&self.default_complexity) {
            return Err(format!(
                "pricing.default_complexity `{}` is not a known level",
                self.default_complexity
            ));
        }

        if let Some((category, _)) =
            self.base_rates.iter().find(|(_, rate)| **rate < Decimal::ZERO)
        {
            return Err(format!("pricing.base_rates.`{category}` must not be negative"));
        }
        if let Some((level, _)) =
            self.complexity_multipliers.iter().find(|(_, factor)| **factor < Decimal::ZERO)
        {
            return Err(format!("pricing.complexity_multipliers.{level} must not be negative"));
        }
        if self.contingency_factor < Decimal::ONE {
            return Err("pricing.contingency_factor must be at least 1".to_string());
        }

        Ok(())
    }
}

fn resolve<'a>(
    table: &'a BTreeMap<String, Decimal>,
    key: &'a str,
    fallback: &'a str,
) -> ResolvedRate<'a> {
    match table.get_key_value(key) {
        Some((key, value)) => ResolvedRate { key: key.as_str(), value: *value, fell_back: false },
        None => ResolvedRate {
            key: fallback,
            value: table.get(fallback).copied().unwrap_or(Decimal::ZERO),
            fell_back: true,
        },
    }
}
