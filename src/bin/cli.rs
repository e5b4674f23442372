// CLI binary: exits on unrecoverable errors.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

use blueprint_bridge::logging;
use blueprint_bridge::paths;
use blueprint_bridge::registry::{catalog, execute, CommandOutput};
use blueprint_bridge::settings::{self, ServerSettings};
use blueprint_bridge::state::{self, AppState};

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "bpbridge-cli", about = "One-shot blueprint graph commands", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config directory override
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Project file to edit; defaults to the settings entry, then
    /// project.json in the config directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Output the raw response envelope instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// tracing filter directive (RUST_LOG still wins)
    #[arg(long, global = true, default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run any command by name with JSON params
    Run {
        name: String,
        /// JSON object, e.g. '{"blueprint_name": "PlayerChar"}'
        #[arg(long)]
        params: Option<String>,
    },
    /// List commands with their parameter schemas
    Commands,
    /// Show help for all commands, a category, or one command
    Help { topic: Option<String> },
    /// Summarize a blueprint
    Describe { blueprint: String },
    /// Add an event node
    AddEvent {
        blueprint: String,
        event: String,
        #[arg(long, allow_hyphen_values = true)]
        x: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y: Option<f64>,
    },
    /// Add a function call node
    AddFunction {
        blueprint: String,
        function: String,
        /// Component or type name; omit for self
        #[arg(long)]
        target: Option<String>,
        /// JSON object of literal pin values
        #[arg(long)]
        params: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        x: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y: Option<f64>,
    },
    /// Declare a member variable
    AddVariable {
        blueprint: String,
        name: String,
        /// Boolean, Integer, Float, String or Vector
        #[arg(value_name = "TYPE")]
        variable_type: String,
        #[arg(long)]
        exposed: bool,
    },
    /// Connect an output pin to an input pin
    Connect {
        blueprint: String,
        source_node: String,
        source_pin: String,
        target_node: String,
        target_pin: String,
    },
    /// Find nodes by type
    Find {
        blueprint: String,
        node_type: String,
        #[arg(long)]
        event: Option<String>,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        function: Option<String>,
        #[arg(long)]
        variable: Option<String>,
    },
}

// ── Request building ─────────────────────────────────────────────

fn parse_json_arg(flag: &str, raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(s) => serde_json::from_str(s).unwrap_or_else(|e| {
            eprintln!("Error: --{flag} is not valid JSON: {e}");
            process::exit(2);
        }),
    }
}

fn position(x: Option<f64>, y: Option<f64>) -> Value {
    if x.is_none() && y.is_none() {
        Value::Null
    } else {
        json!([x.unwrap_or(0.0), y.unwrap_or(0.0)])
    }
}

/// Drop nulls so optional flags that were not given stay absent.
fn object(pairs: Vec<(&str, Value)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    Value::Object(map)
}

fn opt(s: Option<&String>) -> Value {
    s.map_or(Value::Null, |s| Value::String(s.clone()))
}

/// Map a subcommand to a (command name, params) pair. None for subcommands
/// answered without a workspace.
fn build_request(cmd: &Commands) -> Option<(String, Value)> {
    let request = match cmd {
        Commands::Run { name, params } => {
            (name.clone(), parse_json_arg("params", params.as_deref()))
        }
        Commands::Commands => return None,
        Commands::Help { topic } => ("help".into(), object(vec![("topic", opt(topic.as_ref()))])),
        Commands::Describe { blueprint } => (
            "describe_blueprint".into(),
            json!({ "blueprint_name": blueprint }),
        ),
        Commands::AddEvent { blueprint, event, x, y } => (
            "add_blueprint_event_node".into(),
            object(vec![
                ("blueprint_name", json!(blueprint)),
                ("event_name", json!(event)),
                ("node_position", position(*x, *y)),
            ]),
        ),
        Commands::AddFunction {
            blueprint,
            function,
            target,
            params,
            x,
            y,
        } => (
            "add_blueprint_function_node".into(),
            object(vec![
                ("blueprint_name", json!(blueprint)),
                ("function_name", json!(function)),
                ("target", opt(target.as_ref())),
                ("params", parse_json_arg("params", params.as_deref())),
                ("node_position", position(*x, *y)),
            ]),
        ),
        Commands::AddVariable {
            blueprint,
            name,
            variable_type,
            exposed,
        } => (
            "add_blueprint_variable".into(),
            json!({
                "blueprint_name": blueprint,
                "variable_name": name,
                "variable_type": variable_type,
                "is_exposed": exposed,
            }),
        ),
        Commands::Connect {
            blueprint,
            source_node,
            source_pin,
            target_node,
            target_pin,
        } => (
            "connect_blueprint_nodes".into(),
            json!({
                "blueprint_name": blueprint,
                "source_node_id": source_node,
                "source_pin": source_pin,
                "target_node_id": target_node,
                "target_pin": target_pin,
            }),
        ),
        Commands::Find {
            blueprint,
            node_type,
            event,
            action,
            function,
            variable,
        } => (
            "find_blueprint_nodes".into(),
            object(vec![
                ("blueprint_name", json!(blueprint)),
                ("node_type", json!(node_type)),
                ("event_name", opt(event.as_ref())),
                ("action_name", opt(action.as_ref())),
                ("function_name", opt(function.as_ref())),
                ("variable_name", opt(variable.as_ref())),
            ]),
        ),
    };
    Some(request)
}

// ── Output ───────────────────────────────────────────────────────

/// The message line, then the result fields unless the message already is
/// the help text or the summary.
fn print_output(output: CommandOutput) {
    println!("{}", output.message);
    let data = output.result.into_data();
    if data.get("text").is_none() && data.get("summary").is_none() {
        println!("{}", serde_json::to_string_pretty(&data).unwrap_or_default());
    }
}

// ── Main ─────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let Some((name, params)) = build_request(&cli.command) else {
        println!(
            "{}",
            serde_json::to_string_pretty(&catalog::to_json_schema()).unwrap_or_default()
        );
        return;
    };

    let config_dir = cli.config_dir.clone().unwrap_or_else(paths::default_config_dir);
    let settings: ServerSettings = settings::load_settings(&config_dir).unwrap_or_default();

    let project = state::resolve_project_path(cli.project.clone(), &settings, &config_dir);
    let state = AppState::open(settings, Some(project)).unwrap_or_else(|e| {
        eprintln!("Error: failed to open project: {e}");
        process::exit(1);
    });

    let result = state.run(&name, &params);

    // Saved even with autosave off.
    if let Err(e) = state.save() {
        eprintln!("Error: failed to save project: {e}");
        process::exit(1);
    }

    let failed = result.is_err();
    if cli.json {
        let envelope = execute::respond(result);
        println!("{}", serde_json::to_string_pretty(&envelope).unwrap_or_default());
    } else {
        match result {
            Ok(output) => print_output(output),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    if failed {
        process::exit(1);
    }
}
