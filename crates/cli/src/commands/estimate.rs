use ndawonga_core::pricing::{clamp_area, estimate_with_trace};
use rust_decimal::Decimal;

use crate::commands::{load_config, CommandResult};

/// Runs the estimator against the configured pricing table. Negative areas
/// clamp to zero, as on the advisory HTTP endpoint.
pub fn run(project_type: &str, area_sq_m: Decimal, complexity: &str) -> CommandResult {
    let config = match load_config("estimate") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let breakdown =
        estimate_with_trace(&config.pricing, project_type, clamp_area(Some(area_sq_m)), complexity);
    let mut message = format!(
        "estimated cost {} for {} m² of {} at {} complexity",
        breakdown.estimated_cost.normalize(),
        breakdown.area_sq_m,
        breakdown.category,
        breakdown.complexity
    );
    if breakdown.category_fell_back || breakdown.complexity_fell_back {
        message.push_str(" (fallback rate applied)");
    }

    match serde_json::to_value(&breakdown) {
        Ok(detail) => CommandResult::success_with_detail("estimate", message, Some(detail)),
        Err(error) => CommandResult::failure("estimate", "serialization", error.to_string(), 3),
    }
}
