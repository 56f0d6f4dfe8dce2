use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use spotrun_core::prelude::{DeployApi, DryRunEngine, ResourceGraph, StackConfig, runner_stack};
use spotrun_observe::{LoggerConfig, LoggerFormat, LoggerLevel, init_logger};

#[derive(Debug, Parser)]
#[command(
    name = "spotrun",
    about = "Single ephemeral CI runner on spot container capacity",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log filter directive (overrides SPOTRUN_LOG), e.g. "debug" or "spotrun_core=trace,info".
    #[arg(long, global = true)]
    log_level: Option<LoggerLevel>,

    /// Log output: text, json or journald (overrides SPOTRUN_LOG_FORMAT).
    #[arg(long, global = true)]
    log_format: Option<LoggerFormat>,

    /// Stack name (overrides SPOTRUN_STACK_NAME).
    #[arg(long, global = true)]
    stack_name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the runner stack and print it as JSON.
    Synth {
        #[arg(long)]
        pretty: bool,
    },
    /// Print the order resources would be created in.
    Order,
    /// Submit the stack to the dry-run engine and print its report.
    Deploy,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1) logger
    let mut log_cfg = LoggerConfig::from_env().context("logger configuration")?;
    if let Some(level) = cli.log_level.clone() {
        log_cfg = log_cfg.with_level(level);
    }
    if let Some(format) = cli.log_format {
        log_cfg = log_cfg.with_format(format);
    }
    init_logger(&log_cfg)?;
    debug!(format = %log_cfg.format, level = log_cfg.level.as_str(), "logger initialized");

    // 2) stack configuration + graph
    let stack = stack_config(&cli);
    let graph = runner_stack(&stack)?;

    // 3) command
    match cli.command {
        Command::Synth { pretty } => println!("{}", synth(&graph, pretty)?),
        Command::Order => {
            for line in order_lines(&graph) {
                println!("{line}");
            }
        }
        Command::Deploy => {
            let api = DeployApi::new(Arc::new(DryRunEngine::new()), stack.stack_name.clone());
            let report = api.deploy(&graph).await?;
            info!(applied = report.applied.len(), engine = %report.engine, "deploy finished");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn stack_config(cli: &Cli) -> StackConfig {
    let mut cfg = StackConfig::from_env();
    if let Some(name) = cli.stack_name.as_deref().filter(|n| !n.trim().is_empty()) {
        cfg.stack_name = name.to_string();
    }
    cfg
}

fn synth(graph: &ResourceGraph, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(graph)
    } else {
        serde_json::to_string(graph)
    }
}

fn order_lines(graph: &ResourceGraph) -> Vec<String> {
    graph
        .apply_order()
        .iter()
        .enumerate()
        .filter_map(|(step, id)| {
            graph
                .get(id)
                .map(|spec| format!("{:>2}. {id} ({})", step + 1, spec.kind()))
        })
        .collect()
}
