use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mymdc_proposal::{Proposal, ProposalConfig, ProposalError, TextRenderer, Timeline};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DATA_ROOT_ENV: &str = "EXTRA_DATA_DATA_ROOT";

#[derive(Parser)]
#[command(name = "mymdc", version = "0.3.0", about = "MyMdC run metadata client")]
struct Cli {
    #[command(flatten)]
    settings: Settings,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Settings {
    /// YAML file with `data_root` and `mymdc` settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    init_server: Option<String>,
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    Locate {
        proposal: u32,
        #[arg(long)]
        json: bool,
    },
    RunInfo {
        proposal: u32,
        run: u32,
        #[arg(long)]
        json: bool,
    },
    Timeline {
        proposal: u32,
        run: u32,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = command_json_mode(&cli.command);
    let result = resolve_config(&cli.settings).and_then(|config| run_command(cli.command, &config));
    match result {
        Ok(Some(payload)) => {
            emit_json(&payload);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            if json_mode {
                let code = err
                    .downcast_ref::<ProposalError>()
                    .map(ProposalError::code)
                    .unwrap_or("command_failed");
                emit_json(&json_error(code, err.to_string(), error_details(&err)));
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

fn resolve_config(settings: &Settings) -> Result<ProposalConfig> {
    let mut config = match &settings.config {
        Some(path) => ProposalConfig::load(path)?,
        None => {
            let mut config = ProposalConfig::default();
            if let Some(root) = std::env::var_os(DATA_ROOT_ENV) {
                config.data_root = PathBuf::from(root);
            }
            config
        }
    };
    if let Some(root) = &settings.data_root {
        config.data_root = root.clone();
    }
    if let Some(secs) = settings.timeout_secs {
        config.mymdc.timeout_secs = secs;
    }
    if let Some(server) = &settings.init_server {
        config.mymdc.init_server = server.clone();
    }
    if settings.no_cache {
        config.mymdc.enable_cache = false;
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn run_command(command: Commands, config: &ProposalConfig) -> Result<Option<Value>> {
    match command {
        Commands::Locate { proposal, json } => {
            let prop = Proposal::open(proposal, config)?;
            if json {
                return Ok(Some(json!({
                    "ok": true,
                    "command": "locate",
                    "proposal": prop.number(),
                    "root": prop.root().display().to_string(),
                    "instrument": prop.instrument(),
                    "cycle": prop.cycle(),
                })));
            }
            println!("proposal: {}", prop.number());
            println!("root: {}", prop.root().display());
            println!("instrument: {}", prop.instrument());
            println!("cycle: {}", prop.cycle());
        }
        Commands::RunInfo {
            proposal,
            run,
            json,
        } => {
            let mut prop = Proposal::open(proposal, config)?;
            let sample = prop.run_sample_name(run)?;
            let run_type = prop.run_type(run)?;
            let techniques = prop.run_techniques(run)?;
            if json {
                return Ok(Some(json!({
                    "ok": true,
                    "command": "run-info",
                    "proposal": proposal,
                    "run": run,
                    "sample": sample,
                    "run_type": run_type,
                    "techniques": techniques,
                })));
            }
            println!("proposal: {}", proposal);
            println!("run: {}", run);
            println!("sample: {}", sample);
            println!("run_type: {}", run_type);
            for technique in &techniques {
                println!("technique: {} ({})", technique.name, technique.identifier);
            }
        }
        Commands::Timeline {
            proposal,
            run,
            json,
        } => {
            let mut prop = Proposal::open(proposal, config)?;
            if json {
                let timeline = prop.run_timeline(run)?;
                return Ok(Some(json!({
                    "ok": true,
                    "command": "timeline",
                    "proposal": proposal,
                    "run": run,
                    "timeline": timeline_to_json(&timeline),
                })));
            }
            let mut renderer = TextRenderer::new(std::io::stdout().lock());
            prop.plot_timeline(run, &mut renderer)?;
        }
    }
    Ok(None)
}

fn emit_json(value: &Value) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(_) => println!(
            "{{\"ok\":false,\"error\":{{\"code\":\"serialization_error\",\"message\":\"failed to serialize JSON payload\",\"details\":{{}}}}}}"
        ),
    }
}

fn json_error(code: &str, message: String, details: Value) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": code,
            "message": message,
            "details": details
        }
    })
}

fn error_details(err: &anyhow::Error) -> Value {
    match err.downcast_ref::<ProposalError>() {
        Some(e) => json!({
            "transient": e.is_transient(),
            "status": e.status().map(|s| s.as_u16()),
        }),
        None => json!({}),
    }
}

fn command_json_mode(command: &Commands) -> bool {
    match command {
        Commands::Locate { json, .. }
        | Commands::RunInfo { json, .. }
        | Commands::Timeline { json, .. } => *json,
    }
}

fn timeline_to_json(timeline: &Timeline) -> Value {
    json!({
        "events": timeline
            .events
            .iter()
            .map(|e| json!({ "label": e.label, "timestamp": e.timestamp.to_rfc3339() }))
            .collect::<Vec<_>>(),
        "intervals": timeline
            .intervals
            .iter()
            .map(|i| json!({
                "label": i.label,
                "seconds": i.duration.num_milliseconds() as f64 / 1000.0,
                "minutes": i.minutes(),
            }))
            .collect::<Vec<_>>(),
    })
}
