use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use epoch_client::models::WireModel;
use epoch_client::{EpochClient, registry};
use reqwest::Method;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "epoch-cli",
    version,
    about = "Small async CLI for querying an Aeternity Epoch node"
)]
struct Cli {
    /// Base URL for the API. Defaults to `OpenAPI` server URL.
    #[arg(long, env = "EPOCH_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token sent in the Authorization header.
    #[arg(long, env = "EPOCH_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// Abort requests that take longer than this many seconds.
    #[arg(long, env = "EPOCH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Emit compact JSON instead of pretty-printed output.
    #[arg(long)]
    compact: bool,

    /// Log requests and responses to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List generated `OpenAPI` operation ids.
    Operations {
        /// Filter operations by substring match on operation id (case-insensitive).
        #[arg(long)]
        filter: Option<String>,
    },
    /// List registered model names.
    Models,
    /// Validate a JSON payload against a model and print its canonical form.
    Decode(DecodeArgs),
    /// Call an endpoint by `OpenAPI` operation id.
    Call(CallArgs),
    /// Send a raw HTTP request using method + path.
    Request(RequestArgs),
    /// Show the current top of the chain.
    Top,
    /// Fetch a block by height or hash.
    Block(BlockArgs),
    /// Show the balance of an account.
    Balance {
        /// Account public key (`ak$...`).
        account_pubkey: String,
    },
    /// List transactions in the node's mempool.
    Transactions,
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Registered model name (for example: Block).
    model: String,

    /// File containing the JSON payload. Reads stdin when omitted.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct BlockArgs {
    /// Block height.
    #[arg(long)]
    height: Option<u64>,

    /// Block hash (`bh$...`).
    #[arg(long)]
    hash: Option<String>,
}

#[derive(Debug, Args)]
struct CallArgs {
    /// `OpenAPI` operation id (for example: getBlockByHeight).
    operation_id: String,

    /// Path parameter in form key=value. Repeat as needed.
    #[arg(long = "path-param", value_name = "KEY=VALUE")]
    path_param: Vec<String>,

    /// Query parameter in form key=value. Repeat as needed.
    #[arg(long = "query", value_name = "KEY=VALUE")]
    query: Vec<String>,

    #[command(flatten)]
    body: BodyInput,
}

#[derive(Debug, Args)]
struct RequestArgs {
    /// HTTP method (GET, POST, ...).
    method: String,

    /// Request path (for example: /top).
    path: String,

    /// Query parameter in form key=value. Repeat as needed.
    #[arg(long = "query", value_name = "KEY=VALUE")]
    query: Vec<String>,

    #[command(flatten)]
    body: BodyInput,
}

#[derive(Debug, Args)]
struct BodyInput {
    /// JSON request body literal.
    #[arg(long, conflicts_with = "body_file")]
    body_json: Option<String>,

    /// Path to a file containing a JSON request body.
    #[arg(long, value_name = "PATH", conflicts_with = "body_json")]
    body_file: Option<PathBuf>,
}

/// Entry point for the async CLI.
///
/// Parses command-line arguments, builds a client, dispatches subcommands,
/// and prints JSON output.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Metadata and offline validation do not require an HTTP client.
    match &cli.command {
        Command::Operations { filter } => {
            print_operations(filter.as_deref());
            return Ok(());
        }
        Command::Models => {
            for name in registry::names() {
                println!("{name}");
            }
            return Ok(());
        }
        Command::Decode(args) => {
            let output = decode_payload(args)
                .with_context(|| format!("payload is not a valid {}", args.model))?;
            return print_json(&output, cli.compact).context("failed to print JSON output");
        }
        _ => {}
    }

    let mut client = match &cli.base_url {
        Some(url) => EpochClient::new(url)
            .with_context(|| format!("failed to create client with base URL '{url}'"))?,
        None => EpochClient::from_openapi_default_server()
            .context("failed to create client from OpenAPI default server URL")?,
    };

    if let Some(token) = &cli.access_token {
        client = client.with_authorization_token(token.clone());
    }

    if let Some(secs) = cli.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    let output = match &cli.command {
        Command::Operations { .. } | Command::Models | Command::Decode(_) => {
            unreachable!("handled above")
        }
        Command::Call(args) => call_operation(&client, args)
            .await
            .with_context(|| format!("operation call failed: '{}'", args.operation_id))?,
        Command::Request(args) => send_request(&client, args)
            .await
            .with_context(|| format!("request failed: {} {}", args.method, args.path))?,
        Command::Top => client
            .top()
            .await
            .context("failed to fetch top")?
            .to_value(),
        Command::Block(args) => fetch_block(&client, args).await?,
        Command::Balance { account_pubkey } => client
            .balance(account_pubkey)
            .await
            .with_context(|| format!("failed to fetch balance of '{account_pubkey}'"))?
            .to_value(),
        Command::Transactions => client
            .transactions()
            .await
            .context("failed to fetch mempool transactions")?
            .to_value(),
    };

    print_json(&output, cli.compact).context("failed to print JSON output")?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let directive = if verbose {
        "epoch_client=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Prints the generated `OpenAPI` operation catalog.
///
/// When `filter` is provided, only operation ids containing that substring are shown.
fn print_operations(filter: Option<&str>) {
    let filter = filter.map(str::to_ascii_lowercase);

    let operations: Vec<_> = EpochClient::operations()
        .iter()
        .filter(|operation| {
            filter
                .as_ref()
                .is_none_or(|needle| operation.operation_id.to_ascii_lowercase().contains(needle))
        })
        .collect();

    let (operation_id_width, method_width) =
        operations
            .iter()
            .fold((0usize, 0usize), |(id_max, method_max), operation| {
                (
                    id_max.max(operation.operation_id.len()),
                    method_max.max(operation.method.len()),
                )
            });

    for operation in operations {
        println!(
            "{:<operation_id_width$}  {:<method_width$}  {}  -> {}",
            operation.operation_id,
            operation.method,
            operation.path_template,
            operation.response_model.unwrap_or("-"),
        );
    }
}

/// Decodes a payload with the model registry and returns its canonical JSON.
fn decode_payload(args: &DecodeArgs) -> Result<Value> {
    let raw = if let Some(path) = &args.file {
        fs::read(path).with_context(|| format!("failed to read --file '{}'", path.display()))?
    } else {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read payload from stdin")?;
        buffer
    };

    let model = registry::decode(&args.model, &raw)?;
    Ok(model.to_value())
}

async fn fetch_block(client: &EpochClient, args: &BlockArgs) -> Result<Value> {
    let block = match (&args.height, &args.hash) {
        (Some(height), None) => client
            .block_by_height(*height)
            .await
            .with_context(|| format!("failed to fetch block at height {height}"))?,
        (None, Some(hash)) => client
            .block_by_hash(hash)
            .await
            .with_context(|| format!("failed to fetch block '{hash}'"))?,
        _ => bail!("use exactly one of --height or --hash"),
    };
    Ok(block.to_value())
}

/// Calls a generated `OpenAPI` operation by `operation_id`.
///
/// Parses path/query pairs and optional JSON body from CLI args, then forwards
/// the request to `EpochClient::call_operation`.
async fn call_operation(client: &EpochClient, args: &CallArgs) -> Result<Value> {
    // Owned pairs first, then borrowed as `&str` for the client call.
    let path_params = parse_pairs(&args.path_param, "--path-param")
        .context("failed to parse --path-param arguments")?;
    let query = parse_pairs(&args.query, "--query").context("failed to parse --query arguments")?;
    let body = parse_body(&args.body).context("failed to parse request body input")?;

    let borrowed_path: Vec<(&str, &str)> = path_params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    let borrowed_query: Vec<(&str, &str)> = query
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let value = client
        .call_operation(&args.operation_id, &borrowed_path, &borrowed_query, body)
        .await
        .with_context(|| {
            format!(
                "OpenAPI operation '{}' returned an error",
                args.operation_id
            )
        })?;
    Ok(value)
}

/// Sends a raw HTTP request using method + path.
///
/// This bypasses operation-id lookup and calls
/// `EpochClient::request_json_with_query` directly.
async fn send_request(client: &EpochClient, args: &RequestArgs) -> Result<Value> {
    let method = Method::from_str(&args.method)
        .with_context(|| format!("invalid HTTP method '{}'", args.method))?;
    let query = parse_pairs(&args.query, "--query").context("failed to parse --query arguments")?;
    let body = parse_body(&args.body).context("failed to parse request body input")?;
    let borrowed_query: Vec<(&str, &str)> = query
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let value = client
        .request_json_with_query(method, &args.path, &borrowed_query, body)
        .await
        .with_context(|| format!("HTTP request failed for path '{}'", args.path))?;
    Ok(value)
}

/// Parses repeated `key=value` arguments into owned key/value pairs.
///
/// Returns an error when a value does not include `=` or has an empty key.
fn parse_pairs(values: &[String], flag_name: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(values.len());
    for item in values {
        let Some((key, value)) = item.split_once('=') else {
            bail!("invalid {flag_name} value '{item}': expected key=value");
        };
        if key.is_empty() {
            bail!("invalid {flag_name} value '{item}': empty key");
        }
        pairs.push((key.to_owned(), value.to_owned()));
    }
    Ok(pairs)
}

/// Parses an optional JSON body from inline text or a file path.
///
/// Exactly one of `--body-json` or `--body-file` may be set.
fn parse_body(body: &BodyInput) -> Result<Option<Value>> {
    match (&body.body_json, &body.body_file) {
        (Some(raw), None) => serde_json::from_str(raw)
            .context("failed to parse JSON from --body-json")
            .map(Some),
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read --body-file '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| {
                    format!("failed to parse JSON in --body-file '{}'", path.display())
                })
                .map(Some)
        }
        (None, None) => Ok(None),
        (Some(_), Some(_)) => bail!("use only one of --body-json or --body-file"),
    }
}

/// Prints a JSON value either compact or pretty-formatted.
fn print_json(value: &Value, compact: bool) -> Result<()> {
    if compact {
        println!(
            "{}",
            serde_json::to_string(value).context("Failed to render JSON")?
        );
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("Failed to render JSON")?
        );
    }
    Ok(())
}
