//! Unitopia MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio. Logs go to stderr; stdout carries
//! the protocol only.
//!
//! Tools:
//! - convert: Convert an amount between two units of one category
//! - list_categories: Categories with their default unit pairs
//! - list_units: Units of one category in picker order

mod config;

use config::{parse_precision, ServerConfig, MAX_PRECISION};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use unitopia::{ConversionForm, Unitopia, UnitStyle};
use unitopia_core::{Category, ConversionError, UnitopiaError};
use unitopia_units::{parse_amount, parse_category, parse_query, parse_unit, Unit};

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "unitopia";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

/// Engine plus the server-wide defaults it was built from
struct Server {
    engine: Unitopia,
    config: ServerConfig,
}

impl Server {
    fn new(config: ServerConfig) -> Self {
        Self { engine: Unitopia::new(config.format.clone()), config }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = Server::new(ServerConfig::from_env());

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Unitopia MCP server started");
    info!(
        precision = server.config.format.max_fraction_digits,
        style = ?server.config.format.unit_style,
        policy = ?server.config.display_policy,
        "format defaults"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let Some(response) = process_line(&server, &line) else {
                    continue;
                };

                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
                    error!(error = %e, "failed to write response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    info!("server shutting down");
}

/// Handle one input line; `None` when nothing should be written back
fn process_line(server: &Server, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    debug!(bytes = line.len(), "received");

    let response = match serde_json::from_str::<McpRequest>(line) {
        Ok(request) => {
            let response = handle_request(server, &request);
            // Notifications (no id) never receive a response
            if request.id.is_none() {
                debug!(method = %request.method, "notification processed");
                return None;
            }
            response
        }
        Err(e) => {
            warn!(error = %e, "unparseable request");
            error_response(None, McpError {
                code: PARSE_ERROR,
                message: format!("Parse error: {}", e),
                data: None,
            })
        }
    };

    match serde_json::to_string(&response) {
        Ok(s) => Some(s),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            None
        }
    }
}

fn error_response(id: Option<JsonValue>, error: McpError) -> McpResponse {
    McpResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(error),
    }
}

fn handle_request(server: &Server, request: &McpRequest) -> McpResponse {
    if request.jsonrpc != "2.0" {
        return error_response(request.id.clone(), McpError {
            code: INVALID_REQUEST,
            message: format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            data: None,
        });
    }

    debug!(method = %request.method, "processing");

    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(server, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => error_response(request.id.clone(), e),
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Echo the client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion for temperature, length, mass, time, speed, and volume"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'list_categories' and 'list_units' to discover unit keys, then 'convert' with amount/from/to or a query such as '100 km -> mi'. Units must share a category."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();

    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert an amount between two units of the same category. Pass amount/from/to, a query like '98.6 F -> C', or a category to use its default unit pair.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "amount": {
                            "type": ["number", "string"],
                            "description": "Amount in the source unit"
                        },
                        "from": {
                            "type": "string",
                            "description": "Source unit key, symbol, or name"
                        },
                        "to": {
                            "type": "string",
                            "description": "Target unit key, symbol, or name"
                        },
                        "category": {
                            "type": "string",
                            "description": "Category whose default units fill in a missing from/to",
                            "enum": categories
                        },
                        "query": {
                            "type": "string",
                            "description": "Free-form query, e.g. '5 km to mi'"
                        },
                        "style": {
                            "type": "string",
                            "description": "Unit style: short, medium, long",
                            "enum": ["short", "medium", "long"]
                        },
                        "precision": {
                            "type": "integer",
                            "description": "Maximum fraction digits (default: 3)",
                            "minimum": 0,
                            "maximum": MAX_PRECISION
                        }
                    }
                }
            },
            {
                "name": "list_categories",
                "description": "List conversion categories with their base and default units.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List the units of one category in display order.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name",
                            "enum": categories
                        }
                    },
                    "required": ["category"]
                }
            }
        ]
    }))
}

fn handle_tool_call(server: &Server, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "convert" => tool_convert(server, &args),
        "list_categories" => tool_list_categories(server),
        "list_units" => tool_list_units(server, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

/// Tool-level failure: a normal result flagged with `isError`
fn tool_error(err: impl Into<UnitopiaError>) -> JsonValue {
    let err = err.into();
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": err.to_json(),
        "isError": true
    })
}

fn tool_convert(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let engine = engine_for(server, args)?;

    // Queries and explicit arguments both go through a form
    let form = match args.get("query").and_then(|v| v.as_str()) {
        Some(query) => parse_query(query).and_then(|(amount, source, target)| {
            fill_form(source.category, Some(source), Some(target), Some(amount))
        }),
        None => {
            if args.get("from").is_none() && args.get("to").is_none() && args.get("category").is_none() {
                return Err(McpError::invalid_params("Provide query, from/to, or category"));
            }
            form_from_args(args)
        }
    };

    let outcome = form.and_then(|form| {
        let conversion = form.evaluate(&engine)?;
        let text = form.display(&engine, server.config.display_policy);
        Ok((conversion, text))
    });

    match outcome {
        Ok((conversion, text)) => Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "value": conversion.value,
            "record": conversion.to_record().to_json(),
            "isError": false
        })),
        Err(e) => {
            debug!(error = %e, "convert failed");
            Ok(tool_error(e))
        }
    }
}

/// Per-call engine honoring `style`/`precision` overrides
fn engine_for(server: &Server, args: &JsonValue) -> Result<Unitopia, McpError> {
    let mut engine = server.engine.clone();

    if let Some(style) = args.get("style") {
        let style = style.as_str()
            .and_then(UnitStyle::from_name)
            .ok_or_else(|| McpError::invalid_params(format!("Invalid style: {}", style)))?;
        engine = engine.with_style(style);
    }

    if let Some(precision) = args.get("precision") {
        let precision = match precision {
            JsonValue::Number(n) => parse_precision(&n.to_string()),
            JsonValue::String(s) => parse_precision(s),
            _ => None,
        }
        .ok_or_else(|| McpError::invalid_params(format!("Precision must be an integer 0..={}", MAX_PRECISION)))?;
        engine = engine.with_precision(precision);
    }

    Ok(engine)
}

/// Form from tool arguments; category defaults fill in any unit not given
fn form_from_args(args: &JsonValue) -> Result<ConversionForm, ConversionError> {
    let source = args.get("from").and_then(|v| v.as_str()).map(parse_unit).transpose()?;
    let target = args.get("to").and_then(|v| v.as_str()).map(parse_unit).transpose()?;

    let category = match args.get("category").and_then(|v| v.as_str()) {
        Some(name) => parse_category(name)?,
        None => match source.or(target) {
            Some(unit) => unit.category,
            None => Category::default(),
        },
    };

    fill_form(category, source, target, amount_arg(args)?)
}

fn fill_form(
    category: Category,
    source: Option<&'static Unit>,
    target: Option<&'static Unit>,
    amount: Option<f64>,
) -> Result<ConversionForm, ConversionError> {
    let mut form = ConversionForm::new();
    form.select_category(category);
    if let Some(unit) = source {
        form.select_source(unit)?;
    }
    if let Some(unit) = target {
        form.select_target(unit)?;
    }
    form.set_amount(amount);
    Ok(form)
}

fn amount_arg(args: &JsonValue) -> Result<Option<f64>, ConversionError> {
    match args.get("amount") {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n.as_f64()
            .map(Some)
            .ok_or_else(|| ConversionError::InvalidAmount(n.to_string())),
        Some(JsonValue::String(s)) => parse_amount(s).map(Some),
        Some(other) => Err(ConversionError::InvalidAmount(other.to_string())),
    }
}

fn tool_list_categories(server: &Server) -> Result<JsonValue, McpError> {
    let categories: Vec<JsonValue> = server.engine.categories().iter().map(|&category| {
        let (source, target) = server.engine.default_pair(category);
        json!({
            "name": category.name(),
            "title": category.title(),
            "base_unit": category.base_unit_key(),
            "default_from": source.key,
            "default_to": target.key,
            "units": server.engine.units_for(category).len()
        })
    }).collect();

    let text = server.engine.categories().iter()
        .map(|c| c.title())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "categories": categories
    }))
}

fn tool_list_units(server: &Server, args: &JsonValue) -> Result<JsonValue, McpError> {
    let name = args.get("category")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing category argument"))?;

    let category = match parse_category(name) {
        Ok(c) => c,
        Err(e) => return Ok(tool_error(e)),
    };

    let formatter = server.engine.formatter();
    let units: Vec<JsonValue> = server.engine.units_for(category).iter().map(|unit| {
        json!({
            "key": unit.key,
            "symbol": unit.symbol,
            "name": unit.name,
            "label": formatter.unit_label(unit),
            "scale": unit.scale,
            "offset": unit.offset
        })
    }).collect();

    let text = server.engine.units_for(category).iter()
        .map(|u| format!("{} ({})", formatter.unit_label(u), u.symbol))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "category": category.name(),
        "units": units
    }))
}
