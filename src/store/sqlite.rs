//! SQLite-backed [`LogisticsStore`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::{
    FuelLookup, InventoryLevel, LogisticsStore, OrderDetails, ShipmentStatus, TelemetryPoint,
};
use crate::core::{FuelProfile, PackagingType};
use crate::error::StoreError;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS vehicles (
    vehicle_id TEXT PRIMARY KEY,
    fuel_type TEXT NOT NULL,
    consumption_rate REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS shipments (
    shipment_id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    current_eta TEXT,
    vehicle_id TEXT REFERENCES vehicles(vehicle_id),
    distance_km REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS vehicle_telemetry (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id TEXT NOT NULL,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    speed_kmph REAL NOT NULL,
    ts TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_telemetry_vehicle_ts ON vehicle_telemetry(vehicle_id, ts);

CREATE TABLE IF NOT EXISTS inventory (
    sku TEXT NOT NULL,
    warehouse_id TEXT NOT NULL,
    qty_on_hand INTEGER NOT NULL,
    PRIMARY KEY (sku, warehouse_id)
);

CREATE TABLE IF NOT EXISTS packaging_types (
    name TEXT PRIMARY KEY,
    volume_cm3 REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS fuel_prices (
    fuel_type TEXT PRIMARY KEY,
    cost_per_unit REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    order_id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    items TEXT NOT NULL DEFAULT '[]',
    destination TEXT NOT NULL,
    estimated_delivery TEXT
);
";

/// Shipment row for [`SqliteStore::insert_shipment`].
#[derive(Debug, Clone, Default)]
pub struct NewShipment<'a> {
    /// Shipment identifier.
    pub shipment_id: &'a str,
    /// Status label.
    pub status: &'a str,
    /// Estimated arrival.
    pub current_eta: Option<&'a str>,
    /// Assigned vehicle.
    pub vehicle_id: Option<&'a str>,
    /// Route distance.
    pub distance_km: f64,
}

/// Logistics tables in a SQLite database.
///
/// The connection is guarded by a mutex so one store can back concurrent
/// requests.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates the logistics tables if they do not exist.
    pub fn init(&self) -> Result<(), StoreError> {
        self.lock()?.execute_batch(SCHEMA)?;
        debug!("logistics schema initialized");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Inserts or replaces a vehicle.
    pub fn insert_vehicle(
        &self,
        vehicle_id: &str,
        fuel_type: &str,
        consumption_rate: f64,
    ) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO vehicles (vehicle_id, fuel_type, consumption_rate)
             VALUES (?1, ?2, ?3)",
            params![vehicle_id, fuel_type, consumption_rate],
        )?;
        Ok(())
    }

    /// Inserts or replaces a shipment.
    pub fn insert_shipment(&self, shipment: &NewShipment<'_>) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO shipments
                (shipment_id, status, current_eta, vehicle_id, distance_km)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                shipment.shipment_id,
                shipment.status,
                shipment.current_eta,
                shipment.vehicle_id,
                shipment.distance_km
            ],
        )?;
        Ok(())
    }

    /// Appends a telemetry sample.
    pub fn insert_telemetry(&self, point: &TelemetryPoint) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT INTO vehicle_telemetry (vehicle_id, lat, lon, speed_kmph, ts)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                point.vehicle_id,
                point.lat,
                point.lon,
                point.speed_kmph,
                point.timestamp
            ],
        )?;
        Ok(())
    }

    /// Sets the quantity of a SKU in one warehouse.
    pub fn set_inventory(
        &self,
        sku: &str,
        warehouse_id: &str,
        qty_on_hand: i64,
    ) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO inventory (sku, warehouse_id, qty_on_hand)
             VALUES (?1, ?2, ?3)",
            params![sku, warehouse_id, qty_on_hand],
        )?;
        Ok(())
    }

    /// Inserts or replaces a packaging option.
    pub fn insert_packaging(&self, packaging: &PackagingType) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO packaging_types (name, volume_cm3) VALUES (?1, ?2)",
            params![packaging.name, packaging.volume_cm3],
        )?;
        Ok(())
    }

    /// Sets the price per unit for a fuel type.
    pub fn set_fuel_price(&self, fuel_type: &str, cost_per_unit: f64) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT OR REPLACE INTO fuel_prices (fuel_type, cost_per_unit) VALUES (?1, ?2)",
            params![fuel_type, cost_per_unit],
        )?;
        Ok(())
    }

    /// Inserts or replaces an order.
    pub fn insert_order(&self, order: &OrderDetails) -> Result<(), StoreError> {
        let items = serde_json::to_string(&order.items)?;
        self.lock()?.execute(
            "INSERT OR REPLACE INTO orders
                (order_id, status, items, destination, estimated_delivery)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                order.order_id,
                order.status,
                items,
                order.destination,
                order.estimated_delivery
            ],
        )?;
        Ok(())
    }
}

impl LogisticsStore for SqliteStore {
    fn shipment_status(&self, shipment_id: &str) -> Result<Option<ShipmentStatus>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT shipment_id, status, current_eta, vehicle_id
                 FROM shipments WHERE shipment_id = ?1",
                params![shipment_id],
                |row| {
                    Ok(ShipmentStatus {
                        shipment_id: row.get(0)?,
                        status: row.get(1)?,
                        current_eta: row.get(2)?,
                        vehicle_id: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn latest_telemetry(&self, vehicle_id: &str) -> Result<Option<TelemetryPoint>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT vehicle_id, lat, lon, speed_kmph, ts
                 FROM vehicle_telemetry WHERE vehicle_id = ?1
                 ORDER BY ts DESC, id DESC LIMIT 1",
                params![vehicle_id],
                |row| {
                    Ok(TelemetryPoint {
                        vehicle_id: row.get(0)?,
                        lat: row.get(1)?,
                        lon: row.get(2)?,
                        speed_kmph: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn inventory_by_sku(&self, sku: &str) -> Result<Option<InventoryLevel>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT warehouse_id, qty_on_hand FROM inventory
             WHERE sku = ?1 ORDER BY warehouse_id",
        )?;
        let stock = stmt
            .query_map(params![sku], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        if stock.is_empty() {
            return Ok(None);
        }
        Ok(Some(InventoryLevel {
            sku: sku.to_string(),
            total_quantity: stock.values().sum(),
            stock_by_warehouse: stock,
        }))
    }

    fn packaging_types(&self) -> Result<Vec<PackagingType>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name, volume_cm3 FROM packaging_types")?;
        let boxes = stmt
            .query_map([], |row| {
                Ok(PackagingType {
                    name: row.get(0)?,
                    volume_cm3: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(boxes)
    }

    fn shipment_fuel_profile(&self, shipment_id: &str) -> Result<FuelLookup, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT s.distance_km, v.fuel_type, v.consumption_rate
                 FROM shipments s
                 LEFT JOIN vehicles v ON v.vehicle_id = s.vehicle_id
                 WHERE s.shipment_id = ?1",
                params![shipment_id],
                |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(match row {
            None => FuelLookup::ShipmentNotFound,
            Some((distance_km, Some(fuel_type), Some(consumption_rate))) => {
                FuelLookup::Profile(FuelProfile {
                    distance_km,
                    fuel_type,
                    consumption_rate,
                })
            }
            Some(_) => FuelLookup::NoVehicle,
        })
    }

    fn fuel_price(&self, fuel_type: &str) -> Result<Option<f64>, StoreError> {
        let conn = self.lock()?;
        let price = conn
            .query_row(
                "SELECT cost_per_unit FROM fuel_prices WHERE fuel_type = ?1",
                params![fuel_type],
                |row| row.get(0),
            )
            .optional()?;
        Ok(price)
    }

    fn order_details(&self, order_id: &str) -> Result<Option<OrderDetails>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT order_id, status, items, destination, estimated_delivery
                 FROM orders WHERE order_id = ?1",
                params![order_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(order_id, status, items, destination, estimated_delivery)| {
            Ok(OrderDetails {
                order_id,
                status,
                items: serde_json::from_str(&items)?,
                destination,
                estimated_delivery,
            })
        })
        .transpose()
    }
}
