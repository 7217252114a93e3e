//! Fuel quantity and cost estimation for a shipment's route.

use serde::Serialize;

use super::packaging::round2;

/// Unit a vehicle's consumption is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelUnit {
    /// Litres per 100 km.
    Liters,
    /// kWh per km.
    Kwh,
}

impl FuelUnit {
    /// Determines the unit from a vehicle's fuel type.
    ///
    /// `Electric` and `EV` (any case) are metered in kWh; everything else
    /// in litres.
    #[must_use]
    pub fn for_fuel_type(fuel_type: &str) -> Self {
        let t = fuel_type.trim();
        if t.eq_ignore_ascii_case("electric") || t.eq_ignore_ascii_case("ev") {
            Self::Kwh
        } else {
            Self::Liters
        }
    }

    /// Returns `"liters"` or `"kwh"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Liters => "liters",
            Self::Kwh => "kwh",
        }
    }
}

/// Inputs for a route fuel estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelProfile {
    /// Route distance in kilometres.
    pub distance_km: f64,
    /// Vehicle fuel type (`Diesel`, `Electric`, ...).
    pub fuel_type: String,
    /// L/100km for liquid fuels, kWh/km for electric.
    pub consumption_rate: f64,
}

/// Computed fuel quantity and cost.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelEstimate {
    /// Metering unit.
    pub unit: FuelUnit,
    /// Quantity consumed, rounded to two decimals.
    pub total_fuel: f64,
    /// Cost before formatting.
    pub cost: f64,
}

/// Estimates fuel consumed over the route and its cost at `price_per_unit`.
#[must_use]
pub fn estimate(profile: &FuelProfile, price_per_unit: f64) -> FuelEstimate {
    let unit = FuelUnit::for_fuel_type(&profile.fuel_type);
    let quantity = match unit {
        FuelUnit::Liters => profile.distance_km / 100.0 * profile.consumption_rate,
        FuelUnit::Kwh => profile.distance_km * profile.consumption_rate,
    };
    FuelEstimate {
        unit,
        total_fuel: round2(quantity),
        cost: quantity * price_per_unit,
    }
}

/// Renders a cost as `"$<amount>"`, rounded to two decimals and always
/// carrying at least one fractional digit (`"$20.0"`, `"$12.35"`).
#[must_use]
pub fn format_cost(cost: f64) -> String {
    let rounded = round2(cost);
    if rounded.fract() == 0.0 {
        format!("${rounded:.1}")
    } else {
        format!("${rounded}")
    }
}
