//! System prompts and templates for the router and the domain agents.
//!
//! Tool-calling agents use their prompt as the system message. The router
//! and RAG templates carry placeholders (`{query}`, `{context}`,
//! `{question}`) and are sent as a single user message once rendered.

use std::path::{Path, PathBuf};

use crate::core::AgentKind;

/// Router template. Placeholder: `{query}`.
pub const ROUTER_PROMPT: &str = r#"You are an expert dispatcher for a logistics AI system called LogiMAS. Your job is to analyze a user's query and route it to the most appropriate specialized agent.

Here are the available agents and their capabilities:
- **coordinator**: A generalist agent. Use this for complex questions that might require information from multiple sources, for questions about incidents (e.g., 'what is the issue with...'), or if no other agent seems suitable.
- **tracking**: Use this for specific questions about the real-time status or location of a known shipment or vehicle. It is best when the query contains a shipment ID or vehicle ID.
- **warehouse**: Use this for questions about inventory, stock levels, product quantities (e.g., 'how many...'), SKUs, or finding the best packaging for items.
- **cost**: Use this for questions specifically about the price, cost, or fuel expenses of a shipment.
- **mobility**: Use this for questions about traffic conditions, road closures, congestion, or route optimization.
- **supplier**: Use this for questions about suppliers, vendors, contracts, or material lead times.

Based on the user's query below, choose the single best agent to handle the request.
Respond with a JSON object of the form {"agent_name": "<agent>"}.

Query:
{query}
"#;

/// Coordinator RAG template. Placeholders: `{context}`, `{question}`.
pub const COORDINATOR_PROMPT: &str = r"You are an expert logistics assistant for a system called LogiMAS.
Use the following retrieved context to answer the user's question.
If you don't know the answer, just say that you don't know. Be concise.

CONTEXT:
{context}

QUESTION:
{question}

ANSWER:
";

/// Mobility RAG template. Placeholders: `{context}`, `{question}`.
pub const MOBILITY_PROMPT: &str = r"You are the Mobility Agent for LogiMAS, specializing in route analysis.
Your task is to analyze the provided context about traffic incidents and answer the user's question about a specific route.
Focus only on information relevant to the user's question. Report only incidents that the context states for the requested route.
If the context is empty or says nothing about the requested route, say that no incident data is available for it and that its status is unknown. Never describe a route as clear unless the context explicitly says so.

CONTEXT:
{context}

ROUTE QUERY:
{question}

ANALYSIS:
";

/// Supplier RAG template. Placeholders: `{context}`, `{question}`.
pub const SUPPLIER_PROMPT: &str = r"You are a supplier management assistant for LogiMAS.
Your role is to answer questions about supplier contracts, lead times, and regions based on the provided context.
If the context does not contain the answer, state that the information is not available in the knowledge base.

CONTEXT:
{context}

QUESTION:
{question}

ANSWER:
";

/// Tracking agent system prompt.
pub const TRACKING_PROMPT: &str = r"You are a helpful tracking assistant for the LogiMAS system.
- Your job is to provide shipment status and vehicle location updates.
- Use the 'shipment-status-lookup' tool to find the status and vehicle ID for a shipment.
- Use the 'vehicle-location-lookup' tool to find the current GPS coordinates of a vehicle.
- Only call a tool when the query contains a shipment ID or vehicle ID. If none is given, ask for one.
- If a tool returns an error, say so plainly. Do not invent statuses or coordinates.";

/// Warehouse agent system prompt.
pub const WAREHOUSE_PROMPT: &str = r#"You are a highly efficient warehouse logistics bot for LogiMAS.
- Your goal is to provide concise, accurate answers by using your available tools.
- Do not make up information. If a tool fails or returns an error, state that you cannot retrieve the data.
- Do not describe your reasoning or the tools you used. Give the answer only.
- **For inventory queries:** Use the 'inventory-level-lookup' tool. State the total quantity and the per-warehouse breakdown.
  Example: "We have 350 units of PROD0001 in stock: 150 in warehouse 1, and 200 in warehouse 2."
- **For packaging queries:** Use the 'packaging-optimizer' tool. State ONLY the recommended box name and its packing efficiency.
  Example: "The recommended packaging is the 'Medium Box', with a packing efficiency of 85%.""#;

/// Cost agent system prompt.
pub const COST_PROMPT: &str = r"You are a cost optimization analyst for LogiMAS. Use your tools to gather cost data before making any recommendation:
- 'route-fuel-cost-calculator' for the fuel cost of an existing shipment ID.
- 'transportation-cost' for shipping a given weight between two places at standard, express, or overnight speed.
- 'handling-cost' for warehouse labour and packaging of a number of items.
- 'batching-analysis' to check whether waiting to consolidate with other orders reduces cost.
For fuel cost, provide a clear summary including the distance, fuel type, and the final estimated cost.
When options exist, calculate each one and compare them, stating the trade-off (for example the saving of standard shipping against its longer transit).
Break down the final cost estimate clearly. If a tool returns an error, report it instead of estimating.";

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/logimas/prompts";

const ROUTER_FILENAME: &str = "router.md";
const COORDINATOR_FILENAME: &str = "coordinator.md";
const MOBILITY_FILENAME: &str = "mobility.md";
const SUPPLIER_FILENAME: &str = "supplier.md";
const TRACKING_FILENAME: &str = "tracking.md";
const WAREHOUSE_FILENAME: &str = "warehouse.md";
const COST_FILENAME: &str = "cost.md";

/// Prompts for the router and all six agents.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults. Use [`PromptSet::load`] to resolve the prompt
/// directory from CLI flags, environment variables, or the default path.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// Router template.
    pub router: String,
    /// Coordinator RAG template.
    pub coordinator: String,
    /// Mobility RAG template.
    pub mobility: String,
    /// Supplier RAG template.
    pub supplier: String,
    /// Tracking system prompt.
    pub tracking: String,
    /// Warehouse system prompt.
    pub warehouse: String,
    /// Cost system prompt.
    pub cost: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from `--prompt-dir` CLI flag)
    /// 2. `LOGIMAS_PROMPT_DIR` environment variable
    /// 3. `~/.config/logimas/prompts/`
    ///
    /// Each file is loaded independently; a missing file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("LOGIMAS_PROMPT_DIR").ok().map(PathBuf::from))
            .or_else(Self::default_dir);

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            router: load_file(ROUTER_FILENAME, ROUTER_PROMPT),
            coordinator: load_file(COORDINATOR_FILENAME, COORDINATOR_PROMPT),
            mobility: load_file(MOBILITY_FILENAME, MOBILITY_PROMPT),
            supplier: load_file(SUPPLIER_FILENAME, SUPPLIER_PROMPT),
            tracking: load_file(TRACKING_FILENAME, TRACKING_PROMPT),
            warehouse: load_file(WAREHOUSE_FILENAME, WAREHOUSE_PROMPT),
            cost: load_file(COST_FILENAME, COST_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            router: ROUTER_PROMPT.to_string(),
            coordinator: COORDINATOR_PROMPT.to_string(),
            mobility: MOBILITY_PROMPT.to_string(),
            supplier: SUPPLIER_PROMPT.to_string(),
            tracking: TRACKING_PROMPT.to_string(),
            warehouse: WAREHOUSE_PROMPT.to_string(),
            cost: COST_PROMPT.to_string(),
        }
    }

    /// The prompt or template for `kind`.
    #[must_use]
    pub fn for_agent(&self, kind: AgentKind) -> &str {
        match kind {
            AgentKind::Coordinator => &self.coordinator,
            AgentKind::Mobility => &self.mobility,
            AgentKind::Supplier => &self.supplier,
            AgentKind::Tracking => &self.tracking,
            AgentKind::Warehouse => &self.warehouse,
            AgentKind::Cost => &self.cost,
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (ROUTER_FILENAME, ROUTER_PROMPT),
            (COORDINATOR_FILENAME, COORDINATOR_PROMPT),
            (MOBILITY_FILENAME, MOBILITY_PROMPT),
            (SUPPLIER_FILENAME, SUPPLIER_PROMPT),
            (TRACKING_FILENAME, TRACKING_PROMPT),
            (WAREHOUSE_FILENAME, WAREHOUSE_PROMPT),
            (COST_FILENAME, COST_PROMPT),
        ];

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Substitutes `{name}` placeholders in a single pass.
///
/// Values are inserted verbatim and never re-scanned, so a retrieved
/// document containing `{question}` stays as written. Unknown placeholders
/// and stray braces are left untouched.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replaced = after.find('}').and_then(|end| {
            let name = &after[..end];
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v, end))
        });
        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renders the router template for `query`.
#[must_use]
pub fn build_router_prompt(template: &str, query: &str) -> String {
    render(template, &[("query", query)])
}

/// Renders a RAG template with the joined context and the question.
#[must_use]
pub fn build_rag_prompt(template: &str, context: &str, question: &str) -> String {
    render(template, &[("context", context), ("question", question)])
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_router_prompt_lists_every_agent() {
        let prompt = build_router_prompt(ROUTER_PROMPT, "Where is S-1?");
        for kind in AgentKind::ALL {
            assert!(
                prompt.contains(&format!("**{}**", kind.as_str())),
                "router prompt missing {kind}"
            );
        }
        assert!(prompt.contains("Query:\nWhere is S-1?"));
        assert!(prompt.contains("shipment ID or vehicle ID"));
    }

    #[test]
    fn test_rag_prompt_substitution() {
        let prompt = build_rag_prompt(MOBILITY_PROMPT, "A7 closed at exit 12", "Is the A7 clear?");
        assert!(prompt.contains("CONTEXT:\nA7 closed at exit 12"));
        assert!(prompt.contains("ROUTE QUERY:\nIs the A7 clear?"));
        assert!(!prompt.contains("{context}"));
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render("{context}|{question}", &[("context", "{question}"), ("question", "q")]);
        assert_eq!(out, "{question}|q");
    }

    #[test]
    fn test_render_leaves_unknown_and_stray_braces() {
        assert_eq!(render("a {x} b", &[("y", "1")]), "a {x} b");
        assert_eq!(render("open { only", &[]), "open { only");
        assert_eq!(render("{\"k\": 1}", &[]), "{\"k\": 1}");
    }

    #[test]
    fn test_prompts_not_empty() {
        let set = PromptSet::defaults();
        for kind in AgentKind::ALL {
            assert!(!set.for_agent(kind).is_empty());
        }
        assert!(!set.router.is_empty());
    }

    #[test]
    fn test_load_falls_back_per_file() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        std::fs::write(dir.path().join("cost.md"), "custom cost prompt")
            .unwrap_or_else(|e| panic!("write failed: {e}"));

        let set = PromptSet::load(Some(dir.path()));
        assert_eq!(set.cost, "custom cost prompt");
        assert_eq!(set.tracking, TRACKING_PROMPT);
    }

    #[test]
    fn test_write_defaults_skips_existing() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        std::fs::write(dir.path().join("router.md"), "keep me")
            .unwrap_or_else(|e| panic!("write failed: {e}"));

        let written =
            PromptSet::write_defaults(dir.path()).unwrap_or_else(|e| panic!("write failed: {e}"));
        assert_eq!(written.len(), 6);
        let router = std::fs::read_to_string(dir.path().join("router.md")).unwrap_or_default();
        assert_eq!(router, "keep me");
    }
}
