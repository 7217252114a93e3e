//! Relational logistics data consumed by the tool registry.
//!
//! [`LogisticsStore`] is the narrow read interface the tools need;
//! [`SqliteStore`] implements it over a single `rusqlite` connection.

mod sqlite;

pub use sqlite::{NewShipment, SqliteStore};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::{FuelProfile, PackagingType};
use crate::error::StoreError;

/// Default database path, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".logimas/logimas.db";

/// Current status of a shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentStatus {
    /// Shipment identifier.
    pub shipment_id: String,
    /// Status label, e.g. `"in_transit"`.
    pub status: String,
    /// Current estimated arrival, if known.
    pub current_eta: Option<String>,
    /// Assigned vehicle, if any.
    pub vehicle_id: Option<String>,
}

/// One telemetry sample for a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryPoint {
    /// Vehicle identifier.
    pub vehicle_id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Speed at sample time.
    pub speed_kmph: f64,
    /// Sample timestamp (RFC 3339).
    pub timestamp: String,
}

/// Stock of one SKU aggregated across warehouses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryLevel {
    /// Stock keeping unit.
    pub sku: String,
    /// Sum over all warehouses.
    pub total_quantity: i64,
    /// Quantity on hand keyed by warehouse id.
    pub stock_by_warehouse: BTreeMap<String, i64>,
}

/// An order with its line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    /// Order identifier.
    pub order_id: String,
    /// Order status label.
    pub status: String,
    /// Line items as stored (JSON).
    pub items: serde_json::Value,
    /// Delivery destination.
    pub destination: String,
    /// Estimated delivery date, if scheduled.
    pub estimated_delivery: Option<String>,
}

/// Result of resolving a shipment's route and vehicle for fuel costing.
#[derive(Debug, Clone, PartialEq)]
pub enum FuelLookup {
    /// Shipment does not exist.
    ShipmentNotFound,
    /// Shipment exists but has no vehicle.
    NoVehicle,
    /// Distance and vehicle consumption data.
    Profile(FuelProfile),
}

/// Read access to the logistics tables.
///
/// `Ok(None)` means "no such row"; `Err` is reserved for backend failures.
pub trait LogisticsStore: Send + Sync {
    /// Looks up a shipment's status.
    fn shipment_status(&self, shipment_id: &str) -> Result<Option<ShipmentStatus>, StoreError>;

    /// Returns the most recent telemetry sample for a vehicle.
    fn latest_telemetry(&self, vehicle_id: &str) -> Result<Option<TelemetryPoint>, StoreError>;

    /// Aggregates stock for a SKU.
    fn inventory_by_sku(&self, sku: &str) -> Result<Option<InventoryLevel>, StoreError>;

    /// Lists every packaging option.
    fn packaging_types(&self) -> Result<Vec<PackagingType>, StoreError>;

    /// Resolves the route distance and vehicle consumption of a shipment.
    fn shipment_fuel_profile(&self, shipment_id: &str) -> Result<FuelLookup, StoreError>;

    /// Price per unit (litre or kWh) for a fuel type.
    fn fuel_price(&self, fuel_type: &str) -> Result<Option<f64>, StoreError>;

    /// Looks up an order.
    fn order_details(&self, order_id: &str) -> Result<Option<OrderDetails>, StoreError>;
}
