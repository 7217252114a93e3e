//! The closed set of specialized agents a query can be routed to.

use std::borrow::Cow;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

/// A specialized agent in the dispatch graph.
///
/// This is the only legal routing outcome. The router decodes model output
/// directly into this type, so a value outside the enumeration is a decode
/// error rather than a near-miss string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// General logistics questions, incidents, multi-source questions.
    Coordinator,
    /// Traffic, road closures, congestion, route analysis.
    Mobility,
    /// Real-time shipment status and vehicle location.
    Tracking,
    /// Inventory levels, SKUs, packaging.
    Warehouse,
    /// Shipment fuel and cost questions.
    Cost,
    /// Suppliers, vendors, contracts, lead times.
    Supplier,
}

impl AgentKind {
    /// Every agent, in graph declaration order.
    pub const ALL: [Self; 6] = [
        Self::Coordinator,
        Self::Mobility,
        Self::Tracking,
        Self::Warehouse,
        Self::Cost,
        Self::Supplier,
    ];

    /// Returns the wire name (`"tracking"`, ...).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Coordinator => "coordinator",
            Self::Mobility => "mobility",
            Self::Tracking => "tracking",
            Self::Warehouse => "warehouse",
            Self::Cost => "cost",
            Self::Supplier => "supplier",
        }
    }

    /// Capitalized label used when the node records its output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Coordinator => "Coordinator",
            Self::Mobility => "Mobility",
            Self::Tracking => "Tracking",
            Self::Warehouse => "Warehouse",
            Self::Cost => "Cost",
            Self::Supplier => "Supplier",
        }
    }

    /// Returns `true` for agents that answer via tool calls rather than
    /// retrieval.
    #[must_use]
    pub const fn uses_tools(&self) -> bool {
        matches!(self, Self::Tracking | Self::Warehouse | Self::Cost)
    }
}

/// Inlined as a plain string enum. Strict structured-output decoders accept
/// `enum` but not the `oneOf`/`$ref` form a derived schema would produce.
impl JsonSchema for AgentKind {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        "AgentKind".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        let names: Vec<&str> = Self::ALL.iter().map(Self::as_str).collect();
        json_schema!({
            "type": "string",
            "enum": names,
        })
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAgent(pub String);

impl std::fmt::Display for UnknownAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown agent: {}", self.0)
    }
}

impl std::error::Error for UnknownAgent {}

impl FromStr for AgentKind {
    type Err = UnknownAgent;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownAgent(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_rejects_near_misses() {
        assert!("Tracking".parse::<AgentKind>().is_err());
        assert!("tracking agent".parse::<AgentKind>().is_err());
        assert!("".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AgentKind::Warehouse).unwrap_or_default();
        assert_eq!(json, "\"warehouse\"");
        let parsed: Result<AgentKind, _> = serde_json::from_str("\"supplier\"");
        assert_eq!(parsed.ok(), Some(AgentKind::Supplier));
        let bad: Result<AgentKind, _> = serde_json::from_str("\"billing\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_tool_agents() {
        let tool_agents: Vec<AgentKind> = AgentKind::ALL
            .into_iter()
            .filter(AgentKind::uses_tools)
            .collect();
        assert_eq!(
            tool_agents,
            vec![AgentKind::Tracking, AgentKind::Warehouse, AgentKind::Cost]
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(AgentKind::Cost.label(), "Cost");
        assert_eq!(format!("{}", AgentKind::Mobility), "mobility");
    }
}
