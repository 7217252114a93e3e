//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::agent::{
    AgentConfig, InvokeRequest, OrchestrationGraph, PromptSet, Router, ToolCall, ToolExecutor,
    ToolSet, create_provider, validate_query,
};
use crate::audit::SqliteAuditSink;
use crate::cli::output::{
    OutputFormat, format_answer, format_route, format_tool_list, format_tool_result,
};
use crate::cli::parser::{Cli, Commands, ToolsCommands};
use crate::core::Identity;
use crate::error::{CommandError, Result};
use crate::retrieval::{SqliteDocumentStore, default_embedder};
use crate::store::SqliteStore;

// ==================== Parameter Structs ====================

/// Parameters for the ask command.
#[derive(Debug, Clone, Default)]
pub struct AskParams<'a> {
    /// The question to answer.
    pub query: &'a str,
    /// Caller identity.
    pub identity: Identity,
    /// Agent model override.
    pub model: Option<&'a str>,
    /// Step ceiling override.
    pub max_steps: Option<usize>,
    /// Directory containing prompt template files.
    pub prompt_dir: Option<&'a Path>,
}

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force, format),
        Commands::Ask {
            query,
            user_id,
            role,
            permissions,
            model,
            max_steps,
            prompt_dir,
        } => {
            let params = AskParams {
                query,
                identity: Identity {
                    user_id: user_id.clone(),
                    user_role: role.clone(),
                    permissions: permissions.clone(),
                },
                model: model.as_deref(),
                max_steps: *max_steps,
                prompt_dir: prompt_dir.as_deref(),
            };
            cmd_ask(&db_path, &params, format)
        }
        Commands::Route {
            query,
            model,
            prompt_dir,
        } => cmd_route(query, model.as_deref(), prompt_dir.as_deref(), format),
        Commands::Tools(sub) => execute_tools(sub, &db_path, format),
        Commands::InitPrompts { dir } => cmd_init_prompts(dir.as_deref(), format),
    }
}

fn execute_tools(cmd: &ToolsCommands, db_path: &Path, format: OutputFormat) -> Result<String> {
    match cmd {
        ToolsCommands::List => Ok(cmd_tools_list(format)),
        ToolsCommands::Call { name, arguments } => {
            cmd_tools_call(db_path, name, arguments, format)
        }
    }
}

/// Opens the logistics store, requiring a prior `init`.
fn open_store(db_path: &Path) -> Result<SqliteStore> {
    if !db_path.exists() {
        return Err(CommandError::ExecutionFailed(format!(
            "Database not found at {}. Run `logimas init` first.",
            db_path.display()
        ))
        .into());
    }
    Ok(SqliteStore::open(db_path)?)
}

fn build_config(
    model: Option<&str>,
    max_steps: Option<usize>,
    prompt_dir: Option<&Path>,
) -> Result<AgentConfig> {
    let mut builder = AgentConfig::builder();
    if let Some(model) = model {
        builder = builder.model(model);
    }
    if let Some(n) = max_steps {
        builder = builder.max_steps(n);
    }
    if let Some(dir) = prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    builder.from_env().build().map_err(|e| {
        CommandError::ExecutionFailed(format!("Agent configuration error: {e}")).into()
    })
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool, format: OutputFormat) -> Result<String> {
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to create directory: {e}"))
        })?;
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    SqliteStore::open(db_path)?.init()?;
    SqliteDocumentStore::open(db_path, default_embedder())?.init()?;
    SqliteAuditSink::open(db_path)?.init()?;

    match format {
        OutputFormat::Text => Ok(format!(
            "Initialized LogiMAS database at: {}\n",
            db_path.display()
        )),
        OutputFormat::Json => Ok(format.to_json(&serde_json::json!({
            "success": true,
            "path": db_path.to_string_lossy(),
            "force": force
        }))),
    }
}

fn cmd_ask(db_path: &Path, params: &AskParams<'_>, format: OutputFormat) -> Result<String> {
    let store = open_store(db_path)?;
    let documents = SqliteDocumentStore::open(db_path, default_embedder())?;
    let audit = SqliteAuditSink::open(db_path)?;

    let config = build_config(params.model, params.max_steps, params.prompt_dir)?;
    let provider = create_provider(&config).map_err(|e| {
        CommandError::ExecutionFailed(format!("Provider creation failed: {e}"))
    })?;

    let graph = OrchestrationGraph::from_config(
        &config,
        provider,
        Arc::new(store),
        Arc::new(documents),
        Arc::new(audit),
    );

    let request = InvokeRequest {
        query: params.query.to_string(),
        identity: params.identity.clone(),
    };

    let response = runtime()?
        .block_on(graph.invoke_agent(request))
        .map_err(|e| CommandError::ExecutionFailed(format!("Query failed: {e}")))?;

    Ok(format_answer(&response, format))
}

fn cmd_route(
    query: &str,
    model: Option<&str>,
    prompt_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    validate_query(query)?;

    let mut config = build_config(None, None, prompt_dir)?;
    if let Some(model) = model {
        config.router_model = model.to_string();
    }
    let provider = create_provider(&config).map_err(|e| {
        CommandError::ExecutionFailed(format!("Provider creation failed: {e}"))
    })?;
    let prompts = PromptSet::load(config.prompt_dir.as_deref());
    let router = Router::new(provider, &config, prompts.router);

    let agent = runtime()?
        .block_on(router.route(query))
        .map_err(|e| CommandError::ExecutionFailed(format!("Routing failed: {e}")))?;

    Ok(format_route(query, agent, format))
}

fn cmd_tools_list(format: OutputFormat) -> String {
    format_tool_list(ToolSet::all().definitions(), format)
}

fn cmd_tools_call(
    db_path: &Path,
    name: &str,
    arguments: &str,
    format: OutputFormat,
) -> Result<String> {
    let registry = ToolSet::all();
    if registry.get(name).is_none() {
        return Err(CommandError::InvalidArgument(format!(
            "unknown tool '{name}' (available: {})",
            registry.names().join(", ")
        ))
        .into());
    }
    serde_json::from_str::<serde_json::Value>(arguments)
        .map_err(|e| CommandError::InvalidArgument(format!("arguments are not JSON: {e}")))?;

    let store = open_store(db_path)?;
    let executor = ToolExecutor::new(Arc::new(store));
    let result = executor.execute(&ToolCall {
        id: "cli".to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    });

    Ok(format_tool_result(name, &result, format))
}

fn cmd_init_prompts(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir
        .map(PathBuf::from)
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| {
            CommandError::ExecutionFailed(
                "Could not determine home directory for default prompt path".to_string(),
            )
        })?;

    let written = PromptSet::write_defaults(&target_dir).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to write prompt templates: {e}"))
    })?;

    match format {
        OutputFormat::Text => {
            if written.is_empty() {
                return Ok(format!(
                    "All prompt templates already exist in: {}\n",
                    target_dir.display()
                ));
            }
            let mut output = format!(
                "Wrote {} prompt template(s) to: {}\n",
                written.len(),
                target_dir.display()
            );
            for path in &written {
                output.push_str("  ");
                output.push_str(
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                );
                output.push('\n');
            }
            output.push_str("\nEdit these files to customize the router and agent prompts.\n");
            Ok(output)
        }
        OutputFormat::Json => Ok(format.to_json(&serde_json::json!({
            "directory": target_dir.to_string_lossy(),
            "written": written
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect::<Vec<_>>(),
            "count": written.len()
        }))),
    }
}
