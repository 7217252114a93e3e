//! Domain types shared by the agent graph, the tools, and the CLI.

pub mod agent_kind;
pub mod costing;
pub mod fuel;
pub mod packaging;
pub mod state;

pub use agent_kind::{AgentKind, UnknownAgent};
pub use costing::{
    BatchingAdvice, CostingError, DeliverySpeed, HandlingQuote, PackagingOption, TransportQuote,
    batching_analysis, handling_cost, transportation_cost,
};
pub use fuel::{FuelEstimate, FuelProfile, FuelUnit, estimate, format_cost};
pub use packaging::{PackagingError, PackagingRecommendation, PackagingType, recommend};
pub use state::{AgentState, Identity};
