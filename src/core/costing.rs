//! Transport, handling, and consolidation estimates for the cost agent.
//!
//! These are rate-card calculations with no store access: a flat fee plus a
//! per-kilogram rate scaled by delivery speed, per-item labour plus
//! packaging, and a batching saving that shrinks as the shipment grows.

use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use super::packaging::round2;

const TRANSPORT_BASE_FEE: f64 = 50.0;
const TRANSPORT_RATE_PER_KG: f64 = 0.5;
const LABOR_COST_PER_ITEM: f64 = 0.10;

/// Shipments heavier than this already get consolidated freight rates.
pub const BATCHING_WEIGHT_CEILING_KG: f64 = 500.0;
const BATCHING_WAIT_HOURS: u32 = 24;
const MAX_SAVING_PERCENT: f64 = 30.0;
const MIN_SAVING_PERCENT: f64 = 15.0;

/// Requested delivery speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverySpeed {
    /// Base rate.
    Standard,
    /// 1.5x the per-kilogram rate.
    Express,
    /// 2.5x the per-kilogram rate.
    Overnight,
}

impl DeliverySpeed {
    /// Every speed, cheapest first.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::Overnight];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
        }
    }

    /// Multiplier applied to the per-kilogram rate.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Express => 1.5,
            Self::Overnight => 2.5,
        }
    }
}

/// Packaging used when handling items at a warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagingOption {
    /// Corrugated box.
    StandardBox,
    /// Padded mailer.
    EcoMailer,
    /// Wooden crate for fragile goods.
    ProtectiveCrate,
}

impl PackagingOption {
    /// Every option.
    pub const ALL: [Self; 3] = [Self::StandardBox, Self::EcoMailer, Self::ProtectiveCrate];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StandardBox => "standard_box",
            Self::EcoMailer => "eco_mailer",
            Self::ProtectiveCrate => "protective_crate",
        }
    }

    /// Material cost per item.
    #[must_use]
    pub const fn unit_cost(self) -> f64 {
        match self {
            Self::StandardBox => 0.50,
            Self::EcoMailer => 0.25,
            Self::ProtectiveCrate => 5.00,
        }
    }
}

fn string_enum(names: &[&str]) -> Schema {
    json_schema!({
        "type": "string",
        "enum": names,
    })
}

impl JsonSchema for DeliverySpeed {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        "DeliverySpeed".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        let names: Vec<&str> = Self::ALL.into_iter().map(Self::as_str).collect();
        string_enum(&names)
    }
}

impl JsonSchema for PackagingOption {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        "PackagingOption".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        let names: Vec<&str> = Self::ALL.into_iter().map(Self::as_str).collect();
        string_enum(&names)
    }
}

/// Why an estimate could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostingError {
    /// Weight was negative or not a finite number.
    InvalidWeight,
}

impl std::fmt::Display for CostingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeight => f.write_str("Weight must be a non-negative number."),
        }
    }
}

impl std::error::Error for CostingError {}

/// Transport price for one shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportQuote {
    /// Pickup location.
    pub origin: String,
    /// Drop-off location.
    pub destination: String,
    /// Shipment weight.
    pub weight_kg: f64,
    /// Chosen speed.
    pub delivery_speed: DeliverySpeed,
    /// Rounded to two decimals.
    pub estimated_cost: f64,
}

/// Labour and packaging cost at a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlingQuote {
    /// Warehouse doing the handling.
    pub warehouse_id: String,
    /// Number of items handled.
    pub item_count: u32,
    /// Packaging applied to every item.
    pub packaging_type: PackagingOption,
    /// Rounded to two decimals.
    pub estimated_handling_cost: f64,
}

/// Outcome of checking whether waiting to consolidate pays off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchingAdvice {
    /// Shared destination of the candidate orders.
    pub destination: String,
    /// Weight of the shipment being held.
    pub total_weight_kg: f64,
    /// Whether holding the shipment is worth it.
    pub batching_recommended: bool,
    /// Expected saving on transport, 0 when not recommended.
    pub potential_saving_percent: u32,
    /// Expected hold time, 0 when not recommended.
    pub wait_time_hours: u32,
    /// One-line explanation for the model to relay.
    pub summary: String,
}

fn check_weight(weight_kg: f64) -> Result<(), CostingError> {
    if weight_kg.is_finite() && weight_kg >= 0.0 {
        Ok(())
    } else {
        Err(CostingError::InvalidWeight)
    }
}

/// `50 + weight * 0.5 * speed multiplier`.
///
/// # Errors
///
/// Returns [`CostingError::InvalidWeight`] for negative or non-finite weights.
pub fn transportation_cost(
    origin: &str,
    destination: &str,
    weight_kg: f64,
    delivery_speed: DeliverySpeed,
) -> Result<TransportQuote, CostingError> {
    check_weight(weight_kg)?;
    let cost = weight_kg.mul_add(
        TRANSPORT_RATE_PER_KG * delivery_speed.multiplier(),
        TRANSPORT_BASE_FEE,
    );
    Ok(TransportQuote {
        origin: origin.to_string(),
        destination: destination.to_string(),
        weight_kg,
        delivery_speed,
        estimated_cost: round2(cost),
    })
}

/// `items * (0.10 labour + packaging unit cost)`.
#[must_use]
pub fn handling_cost(
    warehouse_id: &str,
    item_count: u32,
    packaging_type: PackagingOption,
) -> HandlingQuote {
    let items = f64::from(item_count);
    HandlingQuote {
        warehouse_id: warehouse_id.to_string(),
        item_count,
        packaging_type,
        estimated_handling_cost: round2(items * (LABOR_COST_PER_ITEM + packaging_type.unit_cost())),
    }
}

/// Estimates the saving from holding a shipment to batch it with other
/// orders to the same destination.
///
/// The saving falls linearly from 30% for an empty load to 15% at the
/// 500 kg ceiling. Heavier shipments are not worth holding.
///
/// # Errors
///
/// Returns [`CostingError::InvalidWeight`] for negative or non-finite weights.
pub fn batching_analysis(
    destination: &str,
    total_weight_kg: f64,
) -> Result<BatchingAdvice, CostingError> {
    check_weight(total_weight_kg)?;

    if total_weight_kg > BATCHING_WEIGHT_CEILING_KG {
        return Ok(BatchingAdvice {
            destination: destination.to_string(),
            total_weight_kg,
            batching_recommended: false,
            potential_saving_percent: 0,
            wait_time_hours: 0,
            summary: "Batching savings are minimal for shipments over 500kg as they already \
                      achieve good freight rates."
                .to_string(),
        });
    }

    let span = MAX_SAVING_PERCENT - MIN_SAVING_PERCENT;
    let percent = span.mul_add(-total_weight_kg / BATCHING_WEIGHT_CEILING_KG, MAX_SAVING_PERCENT);
    // Bounded to [15, 30] by the ceiling check above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = percent.round() as u32;

    Ok(BatchingAdvice {
        destination: destination.to_string(),
        total_weight_kg,
        batching_recommended: true,
        potential_saving_percent: percent,
        wait_time_hours: BATCHING_WAIT_HOURS,
        summary: format!(
            "Potential cost savings of {percent}% on transportation if you wait approximately \
             {BATCHING_WAIT_HOURS} hours to batch this shipment with other orders headed to \
             {destination}."
        ),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(DeliverySpeed::Standard, 100.0 ; "standard")]
    #[test_case(DeliverySpeed::Express, 125.0 ; "express")]
    #[test_case(DeliverySpeed::Overnight, 175.0 ; "overnight")]
    fn test_transportation_cost_by_speed(speed: DeliverySpeed, expected: f64) {
        let quote = transportation_cost("Mumbai", "Delhi", 100.0, speed)
            .unwrap_or_else(|e| panic!("quote failed: {e}"));
        assert!((quote.estimated_cost - expected).abs() < f64::EPSILON);
        assert_eq!(quote.delivery_speed, speed);
    }

    #[test]
    fn test_transportation_rejects_negative_weight() {
        let result = transportation_cost("A", "B", -1.0, DeliverySpeed::Standard);
        assert_eq!(result, Err(CostingError::InvalidWeight));
        assert_eq!(
            CostingError::InvalidWeight.to_string(),
            "Weight must be a non-negative number."
        );
    }

    #[test_case(PackagingOption::StandardBox, 150, 90.0 ; "standard box")]
    #[test_case(PackagingOption::EcoMailer, 10, 3.5 ; "eco mailer")]
    #[test_case(PackagingOption::ProtectiveCrate, 3, 15.3 ; "crate")]
    #[test_case(PackagingOption::EcoMailer, 0, 0.0 ; "no items")]
    fn test_handling_cost(packaging: PackagingOption, items: u32, expected: f64) {
        let quote = handling_cost("MUM-WH-01", items, packaging);
        assert!((quote.estimated_handling_cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_batching_saving_shrinks_with_weight() {
        let light = batching_analysis("Delhi", 0.0).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(light.potential_saving_percent, 30);
        let mid = batching_analysis("Delhi", 400.0).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(mid.potential_saving_percent, 18);
        assert_eq!(mid.wait_time_hours, 24);
        assert!(mid.summary.contains("headed to Delhi"));
        let edge = batching_analysis("Delhi", 500.0).unwrap_or_else(|e| panic!("{e}"));
        assert!(edge.batching_recommended);
        assert_eq!(edge.potential_saving_percent, 15);
    }

    #[test]
    fn test_heavy_shipment_not_batched() {
        let advice = batching_analysis("Delhi", 750.0).unwrap_or_else(|e| panic!("{e}"));
        assert!(!advice.batching_recommended);
        assert_eq!(advice.potential_saving_percent, 0);
        assert!(advice.summary.starts_with("Batching savings are minimal"));
    }

    #[test]
    fn test_enums_use_snake_case_names() {
        let speed: DeliverySpeed =
            serde_json::from_str(r#""overnight""#).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(speed, DeliverySpeed::Overnight);
        let packaging: PackagingOption =
            serde_json::from_str(r#""protective_crate""#).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(packaging, PackagingOption::ProtectiveCrate);
        assert!(serde_json::from_str::<DeliverySpeed>(r#""teleport""#).is_err());
        for speed in DeliverySpeed::ALL {
            assert_eq!(
                serde_json::to_value(speed).unwrap_or_else(|e| panic!("{e}")),
                speed.as_str()
            );
        }
    }

    proptest! {
        #[test]
        fn prop_batching_saving_within_band(
            a in 0.0f64..=500.0,
            b in 0.0f64..=500.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let light = batching_analysis("X", lo).unwrap_or_else(|e| panic!("{e}"));
            let heavy = batching_analysis("X", hi).unwrap_or_else(|e| panic!("{e}"));
            prop_assert!((15..=30).contains(&light.potential_saving_percent));
            prop_assert!((15..=30).contains(&heavy.potential_saving_percent));
            prop_assert!(light.potential_saving_percent >= heavy.potential_saving_percent);
        }
    }
}
