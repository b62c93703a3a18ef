//! aish - natural language to shell-step planner
//!
//! CLI entry point for planning instructions and running the planner node.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use aish::cli::{Cli, Command, OutputFormat, get_log_path};
use aish::config::Config;
use aish::domain::Plan;
use aish::graph::{AgentState, Node, PlannerNode};
use aish::planning::Planner;
use aish::prompts::PromptLoader;
use aish::render::render_plan;

fn parse_level(level: &str) -> tracing::Level {
    match level.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", level);
            tracing::Level::INFO
        }
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>, debug: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: --debug > CLI --log-level > config file > INFO
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        cli_log_level
            .or(config_log_level)
            .map(parse_level)
            .unwrap_or(tracing::Level::INFO)
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log level from config is needed before the full load
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if cli.debug {
        config.debug = true;
    }

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref(), config.debug)
        .context("Failed to setup logging")?;

    info!(
        "aish loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Plan { instruction, format }) => cmd_plan(&config, &instruction, format).await,
        Some(Command::Node { state }) => cmd_node(&config, state.as_deref()).await,
        Some(Command::Prompt) => cmd_prompt(&config),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            println!("Logs are written to: {}", get_log_path().display());
            Ok(())
        }
    }
}

/// Build the planner node, checking credentials only when the LLM is needed
fn build_node(config: &Config) -> Result<PlannerNode> {
    config.validate()?;
    let planner = Planner::from_config(config)?;
    Ok(PlannerNode::new(planner))
}

/// Plan a single instruction
async fn cmd_plan(config: &Config, instruction: &str, format: OutputFormat) -> Result<()> {
    // Blank input never reaches the LLM, so skip credential checks
    let plan = if instruction.trim().is_empty() {
        Plan::no_input()
    } else {
        let state = build_node(config)?.run(AgentState::new(instruction)).await;
        state.plan.unwrap_or_else(Plan::no_input)
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => print!("{}", render_plan(&plan)),
    }
    Ok(())
}

/// Run the planner node over a state document and print the new state
async fn cmd_node(config: &Config, state_path: Option<&Path>) -> Result<()> {
    let raw = match state_path {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read state from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read state from stdin")?;
            buf
        }
    };

    let state: AgentState = serde_json::from_str(&raw).context("Failed to parse agent state")?;

    let state = if state.has_input() {
        build_node(config)?.run(state).await
    } else {
        let mut state = state;
        state.plan = Some(Plan::no_input());
        state
    };

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Print the rendered system prompt
fn cmd_prompt(config: &Config) -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let prompt = PromptLoader::new(cwd)
        .with_override(config.prompt_path.clone())
        .planner_prompt()?;
    println!("{}", prompt);
    Ok(())
}
