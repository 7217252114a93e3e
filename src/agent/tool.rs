//! Tool registry: definitions, calls, results, and typed arguments.
//!
//! Every tool's JSON schema is generated from its argument struct, and the
//! executor decodes calls into the same struct, so the contract the model
//! sees and the one enforced at dispatch cannot drift apart.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{AgentKind, DeliverySpeed, PackagingOption};

/// `shipment-status-lookup`
pub const SHIPMENT_STATUS_LOOKUP: &str = "shipment-status-lookup";
/// `vehicle-location-lookup`
pub const VEHICLE_LOCATION_LOOKUP: &str = "vehicle-location-lookup";
/// `inventory-level-lookup`
pub const INVENTORY_LEVEL_LOOKUP: &str = "inventory-level-lookup";
/// `packaging-optimizer`
pub const PACKAGING_OPTIMIZER: &str = "packaging-optimizer";
/// `route-fuel-cost-calculator`
pub const ROUTE_FUEL_COST_CALCULATOR: &str = "route-fuel-cost-calculator";
/// `order-details-lookup`
pub const ORDER_DETAILS_LOOKUP: &str = "order-details-lookup";
/// `transportation-cost`
pub const TRANSPORTATION_COST: &str = "transportation-cost";
/// `handling-cost`
pub const HANDLING_COST: &str = "handling-cost";
/// `batching-analysis`
pub const BATCHING_ANALYSIS: &str = "batching-analysis";

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match dispatch table in executor).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// JSON payload; `{"error": "..."}` on failure.
    pub content: String,
    /// Whether this result represents an error.
    pub is_error: bool,
}

/// Arguments for `shipment-status-lookup` and `route-fuel-cost-calculator`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ShipmentArgs {
    /// The UUID of the shipment to look up.
    pub shipment_id: String,
}

/// Arguments for `vehicle-location-lookup`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct VehicleArgs {
    /// The UUID of the vehicle to locate.
    pub vehicle_id: String,
}

/// Arguments for `inventory-level-lookup`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InventoryArgs {
    /// The SKU (Stock Keeping Unit) of the product to look up.
    pub sku: String,
}

/// Arguments for `packaging-optimizer`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PackagingArgs {
    /// The individual volumes (in cm³) of each item to be packed.
    pub item_volumes: Vec<f64>,
}

/// Arguments for `order-details-lookup`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OrderArgs {
    /// The UUID of the order to look up.
    pub order_id: String,
}

/// Arguments for `transportation-cost`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TransportArgs {
    /// Pickup city or facility.
    pub origin: String,
    /// Drop-off city or facility.
    pub destination: String,
    /// Total shipment weight in kilograms.
    pub weight_kg: f64,
    /// One of `standard`, `express`, `overnight`.
    pub delivery_speed: DeliverySpeed,
}

/// Arguments for `handling-cost`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HandlingArgs {
    /// Warehouse handling the items.
    pub warehouse_id: String,
    /// Number of items to pick and pack.
    pub item_count: u32,
    /// One of `standard_box`, `eco_mailer`, `protective_crate`.
    pub packaging_type: PackagingOption,
}

/// Arguments for `batching-analysis`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BatchingArgs {
    /// Destination shared with other pending orders.
    pub destination: String,
    /// Weight of the shipment in kilograms.
    pub total_weight_kg: f64,
}

/// JSON schema for `T` without the `$schema` header.
#[must_use]
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let mut schema = serde_json::Value::from(schemars::schema_for!(T));
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
    }
    schema
}

/// A set of tool definitions scoped to an agent role.
///
/// - tracking: shipment status, vehicle location
/// - warehouse: inventory level, packaging optimizer
/// - cost: route fuel cost, transport, handling, batching
/// - RAG agents: none
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Tool names, in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Every registered tool.
    #[must_use]
    pub fn all() -> Self {
        Self {
            definitions: vec![
                def_shipment_status(),
                def_vehicle_location(),
                def_inventory_level(),
                def_packaging_optimizer(),
                def_route_fuel_cost(),
                def_order_details(),
                def_transportation_cost(),
                def_handling_cost(),
                def_batching_analysis(),
            ],
        }
    }

    /// Tools for the tracking agent.
    #[must_use]
    pub fn tracking_tools() -> Self {
        Self {
            definitions: vec![def_shipment_status(), def_vehicle_location()],
        }
    }

    /// Tools for the warehouse agent.
    #[must_use]
    pub fn warehouse_tools() -> Self {
        Self {
            definitions: vec![def_inventory_level(), def_packaging_optimizer()],
        }
    }

    /// Tools for the cost agent.
    #[must_use]
    pub fn cost_tools() -> Self {
        Self {
            definitions: vec![
                def_route_fuel_cost(),
                def_transportation_cost(),
                def_handling_cost(),
                def_batching_analysis(),
            ],
        }
    }

    /// The subset bound to `kind`; empty for retrieval agents.
    #[must_use]
    pub fn for_agent(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Tracking => Self::tracking_tools(),
            AgentKind::Warehouse => Self::warehouse_tools(),
            AgentKind::Cost => Self::cost_tools(),
            AgentKind::Coordinator | AgentKind::Mobility | AgentKind::Supplier => Self::none(),
        }
    }

    /// Empty tool set (no tools available).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Tool schema definitions
// ---------------------------------------------------------------------------

fn def_shipment_status() -> ToolDefinition {
    ToolDefinition {
        name: SHIPMENT_STATUS_LOOKUP.to_string(),
        description: "Looks up the status, current ETA and assigned vehicle ID of a specific \
                      shipment by its ID."
            .to_string(),
        parameters: json_schema_for::<ShipmentArgs>(),
    }
}

fn def_vehicle_location() -> ToolDefinition {
    ToolDefinition {
        name: VEHICLE_LOCATION_LOOKUP.to_string(),
        description: "Finds the most recent telemetry data (GPS location and speed) for a \
                      specific vehicle."
            .to_string(),
        parameters: json_schema_for::<VehicleArgs>(),
    }
}

fn def_inventory_level() -> ToolDefinition {
    ToolDefinition {
        name: INVENTORY_LEVEL_LOOKUP.to_string(),
        description: "Looks up the quantity on hand for a specific product SKU across all \
                      warehouses."
            .to_string(),
        parameters: json_schema_for::<InventoryArgs>(),
    }
}

fn def_packaging_optimizer() -> ToolDefinition {
    ToolDefinition {
        name: PACKAGING_OPTIMIZER.to_string(),
        description: "Calculates the total volume from a list of item volumes and finds the \
                      smallest box that can fit them."
            .to_string(),
        parameters: json_schema_for::<PackagingArgs>(),
    }
}

fn def_route_fuel_cost() -> ToolDefinition {
    ToolDefinition {
        name: ROUTE_FUEL_COST_CALCULATOR.to_string(),
        description: "Calculates the total estimated fuel cost for a given shipment ID."
            .to_string(),
        parameters: json_schema_for::<ShipmentArgs>(),
    }
}

fn def_order_details() -> ToolDefinition {
    ToolDefinition {
        name: ORDER_DETAILS_LOOKUP.to_string(),
        description: "Looks up the details of a specific order, including items, destination, \
                      and status."
            .to_string(),
        parameters: json_schema_for::<OrderArgs>(),
    }
}

fn def_transportation_cost() -> ToolDefinition {
    ToolDefinition {
        name: TRANSPORTATION_COST.to_string(),
        description: "Calculates the transportation cost for a shipment from its origin, \
                      destination, weight and delivery speed. Use it to compare shipping options."
            .to_string(),
        parameters: json_schema_for::<TransportArgs>(),
    }
}

fn def_handling_cost() -> ToolDefinition {
    ToolDefinition {
        name: HANDLING_COST.to_string(),
        description: "Calculates warehouse handling and packaging costs for a number of items."
            .to_string(),
        parameters: json_schema_for::<HandlingArgs>(),
    }
}

fn def_batching_analysis() -> ToolDefinition {
    ToolDefinition {
        name: BATCHING_ANALYSIS.to_string(),
        description: "Estimates the saving from holding a shipment to batch it with other \
                      pending orders headed to the same destination."
            .to_string(),
        parameters: json_schema_for::<BatchingArgs>(),
    }
}
