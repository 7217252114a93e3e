//! Tool executor that dispatches tool calls to the logistics store.
//!
//! Maps tool names to direct Rust function calls against a
//! [`LogisticsStore`]. Every failure (bad arguments, unknown tool, missing
//! row, backend error) comes back as an `{"error": ...}` payload rather
//! than an `Err`, so the model can read it and recover.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::core::{
    batching_analysis, estimate, format_cost, handling_cost, recommend, transportation_cost,
};
use crate::error::{AgentError, StoreError};
use crate::store::{FuelLookup, LogisticsStore};

use super::tool::{
    BATCHING_ANALYSIS, BatchingArgs, HANDLING_COST, HandlingArgs, INVENTORY_LEVEL_LOOKUP,
    InventoryArgs, ORDER_DETAILS_LOOKUP, OrderArgs, PACKAGING_OPTIMIZER, PackagingArgs,
    ROUTE_FUEL_COST_CALCULATOR, SHIPMENT_STATUS_LOOKUP, ShipmentArgs, TRANSPORTATION_COST,
    ToolCall, ToolResult, TransportArgs, VEHICLE_LOCATION_LOOKUP, VehicleArgs,
};

/// Maximum raw byte length of tool argument JSON from the LLM.
const MAX_TOOL_ARGS_LEN: usize = 100_000;
/// Maximum number of item volumes per `packaging-optimizer` call.
const MAX_ITEM_VOLUMES: usize = 1_000;

/// Executes tool calls against a shared logistics store.
///
/// An unrestricted executor serves every registered tool. Agents hold a copy
/// narrowed with [`ToolExecutor::restricted_to`] so a model cannot reach
/// tools outside its bound subset.
#[derive(Clone)]
pub struct ToolExecutor {
    store: Arc<dyn LogisticsStore>,
    allowed: Option<Arc<BTreeSet<String>>>,
}

impl ToolExecutor {
    /// Creates a new executor backed by the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LogisticsStore>) -> Self {
        Self {
            store,
            allowed: None,
        }
    }

    /// Returns a copy that only dispatches the named tools.
    #[must_use]
    pub fn restricted_to(&self, names: &[&str]) -> Self {
        Self {
            store: Arc::clone(&self.store),
            allowed: Some(Arc::new(
                names.iter().map(|name| (*name).to_string()).collect(),
            )),
        }
    }

    fn permits(&self, name: &str) -> bool {
        self.allowed
            .as_ref()
            .is_none_or(|allowed| allowed.contains(name))
    }

    /// Dispatches a tool call to the appropriate tool.
    ///
    /// Validates raw argument size before dispatch to prevent oversized payloads.
    #[must_use]
    pub fn execute(&self, call: &ToolCall) -> ToolResult {
        debug!(tool = %call.name, id = %call.id, "executing tool");

        let result = if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            Err(AgentError::ToolExecution {
                name: call.name.clone(),
                message: format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            })
        } else if !self.permits(&call.name) {
            Err(AgentError::ToolExecution {
                name: call.name.clone(),
                message: format!("tool '{}' is not available to this agent", call.name),
            })
        } else {
            match call.name.as_str() {
                SHIPMENT_STATUS_LOOKUP => self.tool_shipment_status(&call.arguments),
                VEHICLE_LOCATION_LOOKUP => self.tool_vehicle_location(&call.arguments),
                INVENTORY_LEVEL_LOOKUP => self.tool_inventory_level(&call.arguments),
                PACKAGING_OPTIMIZER => self.tool_packaging_optimizer(&call.arguments),
                ROUTE_FUEL_COST_CALCULATOR => self.tool_route_fuel_cost(&call.arguments),
                ORDER_DETAILS_LOOKUP => self.tool_order_details(&call.arguments),
                TRANSPORTATION_COST => tool_transportation_cost(&call.arguments),
                HANDLING_COST => tool_handling_cost(&call.arguments),
                BATCHING_ANALYSIS => tool_batching_analysis(&call.arguments),
                other => Err(AgentError::ToolExecution {
                    name: other.to_string(),
                    message: format!("unknown tool: {other}"),
                }),
            }
        };

        match result {
            Ok(content) => ToolResult {
                tool_call_id: call.id.clone(),
                content,
                is_error: false,
            },
            Err(e) => {
                debug!(tool = %call.name, error = %e, "tool returned error payload");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    content: json!({ "error": e.to_string() }).to_string(),
                    is_error: true,
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tool implementations
    // -----------------------------------------------------------------------

    fn tool_shipment_status(&self, args: &str) -> Result<String, AgentError> {
        let args: ShipmentArgs = parse_args(SHIPMENT_STATUS_LOOKUP, args)?;
        let status = self
            .store
            .shipment_status(&args.shipment_id)
            .map_err(|e| db_error(SHIPMENT_STATUS_LOOKUP, &e))?
            .ok_or_else(|| not_found(SHIPMENT_STATUS_LOOKUP, "Shipment not found."))?;
        to_json(SHIPMENT_STATUS_LOOKUP, &status)
    }

    fn tool_vehicle_location(&self, args: &str) -> Result<String, AgentError> {
        let args: VehicleArgs = parse_args(VEHICLE_LOCATION_LOOKUP, args)?;
        let point = self
            .store
            .latest_telemetry(&args.vehicle_id)
            .map_err(|e| db_error(VEHICLE_LOCATION_LOOKUP, &e))?
            .ok_or_else(|| {
                not_found(
                    VEHICLE_LOCATION_LOOKUP,
                    "No telemetry data found for this vehicle.",
                )
            })?;
        to_json(VEHICLE_LOCATION_LOOKUP, &point)
    }

    fn tool_inventory_level(&self, args: &str) -> Result<String, AgentError> {
        let args: InventoryArgs = parse_args(INVENTORY_LEVEL_LOOKUP, args)?;
        let level = self
            .store
            .inventory_by_sku(&args.sku)
            .map_err(|e| db_error(INVENTORY_LEVEL_LOOKUP, &e))?
            .ok_or_else(|| {
                not_found(
                    INVENTORY_LEVEL_LOOKUP,
                    &format!("SKU '{}' not found in inventory.", args.sku),
                )
            })?;
        to_json(INVENTORY_LEVEL_LOOKUP, &level)
    }

    fn tool_packaging_optimizer(&self, args: &str) -> Result<String, AgentError> {
        let args: PackagingArgs = parse_args(PACKAGING_OPTIMIZER, args)?;
        if args.item_volumes.len() > MAX_ITEM_VOLUMES {
            return Err(not_found(
                PACKAGING_OPTIMIZER,
                &format!(
                    "too many item volumes ({}, max {MAX_ITEM_VOLUMES})",
                    args.item_volumes.len()
                ),
            ));
        }
        let boxes = self
            .store
            .packaging_types()
            .map_err(|e| db_error(PACKAGING_OPTIMIZER, &e))?;
        let recommendation = recommend(&args.item_volumes, &boxes)
            .map_err(|e| not_found(PACKAGING_OPTIMIZER, &e.to_string()))?;
        to_json(PACKAGING_OPTIMIZER, &recommendation)
    }

    fn tool_route_fuel_cost(&self, args: &str) -> Result<String, AgentError> {
        const NAME: &str = ROUTE_FUEL_COST_CALCULATOR;
        let args: ShipmentArgs = parse_args(NAME, args)?;

        let profile = match self
            .store
            .shipment_fuel_profile(&args.shipment_id)
            .map_err(|e| db_error(NAME, &e))?
        {
            FuelLookup::Profile(profile) => profile,
            FuelLookup::ShipmentNotFound => {
                return Err(not_found(
                    NAME,
                    &format!("Shipment ID {} not found.", args.shipment_id),
                ));
            }
            FuelLookup::NoVehicle => {
                return Err(not_found(NAME, "No vehicle assigned to this shipment."));
            }
        };

        let price = self
            .store
            .fuel_price(&profile.fuel_type)
            .map_err(|e| db_error(NAME, &e))?
            .ok_or_else(|| {
                not_found(
                    NAME,
                    &format!("Fuel price for '{}' not found.", profile.fuel_type),
                )
            })?;

        let est = estimate(&profile, price);
        let mut body = Map::new();
        body.insert("shipment_id".to_string(), json!(args.shipment_id));
        body.insert("distance_km".to_string(), json!(profile.distance_km));
        body.insert("fuel_type".to_string(), json!(profile.fuel_type));
        body.insert("fuel_unit".to_string(), json!(est.unit.as_str()));
        body.insert(
            format!("total_fuel_{}", est.unit.as_str()),
            json!(est.total_fuel),
        );
        body.insert(
            "estimated_fuel_cost".to_string(),
            json!(format_cost(est.cost)),
        );
        Ok(Value::Object(body).to_string())
    }

    fn tool_order_details(&self, args: &str) -> Result<String, AgentError> {
        let args: OrderArgs = parse_args(ORDER_DETAILS_LOOKUP, args)?;
        let order = self
            .store
            .order_details(&args.order_id)
            .map_err(|e| db_error(ORDER_DETAILS_LOOKUP, &e))?
            .ok_or_else(|| not_found(ORDER_DETAILS_LOOKUP, "Order not found."))?;
        to_json(ORDER_DETAILS_LOOKUP, &order)
    }
}

// Rate-card tools; no store access.

fn tool_transportation_cost(args: &str) -> Result<String, AgentError> {
    let args: TransportArgs = parse_args(TRANSPORTATION_COST, args)?;
    let quote = transportation_cost(
        &args.origin,
        &args.destination,
        args.weight_kg,
        args.delivery_speed,
    )
    .map_err(|e| not_found(TRANSPORTATION_COST, &e.to_string()))?;
    to_json(TRANSPORTATION_COST, &quote)
}

fn tool_handling_cost(args: &str) -> Result<String, AgentError> {
    let args: HandlingArgs = parse_args(HANDLING_COST, args)?;
    let quote = handling_cost(&args.warehouse_id, args.item_count, args.packaging_type);
    to_json(HANDLING_COST, &quote)
}

fn tool_batching_analysis(args: &str) -> Result<String, AgentError> {
    let args: BatchingArgs = parse_args(BATCHING_ANALYSIS, args)?;
    let advice = batching_analysis(&args.destination, args.total_weight_kg)
        .map_err(|e| not_found(BATCHING_ANALYSIS, &e.to_string()))?;
    to_json(BATCHING_ANALYSIS, &advice)
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: &str) -> Result<T, AgentError> {
    serde_json::from_str(args).map_err(|e| AgentError::ToolExecution {
        name: tool.to_string(),
        message: format!("invalid arguments: {e}"),
    })
}

fn db_error(tool: &str, e: &StoreError) -> AgentError {
    AgentError::ToolExecution {
        name: tool.to_string(),
        message: format!("Database error: {e}"),
    }
}

fn not_found(tool: &str, message: &str) -> AgentError {
    AgentError::ToolExecution {
        name: tool.to_string(),
        message: message.to_string(),
    }
}

fn to_json<T: Serialize>(tool: &str, value: &T) -> Result<String, AgentError> {
    serde_json::to_string(value).map_err(|e| AgentError::ToolExecution {
        name: tool.to_string(),
        message: format!("serialization error: {e}"),
    })
}
