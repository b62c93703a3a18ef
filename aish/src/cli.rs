//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// aish - natural language to shell-step planner
#[derive(Parser)]
#[command(
    name = "aish",
    about = "Break natural-language instructions into ordered shell steps",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Log prompts and raw LLM responses
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan an instruction and print the result
    Plan {
        /// Natural-language instruction
        instruction: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run the planner node over an agent state document
    Node {
        /// State JSON file (reads stdin when omitted)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Print the rendered planner system prompt
    Prompt,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aish")
        .join("logs")
        .join("aish.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Output format for plan rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["aish"]);
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_parse_plan() {
        let cli = Cli::parse_from(["aish", "plan", "install nginx and start it"]);
        if let Some(Command::Plan { instruction, format }) = cli.command {
            assert_eq!(instruction, "install nginx and start it");
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_plan_json() {
        let cli = Cli::parse_from(["aish", "plan", "-f", "json", "list files"]);
        assert!(matches!(
            cli.command,
            Some(Command::Plan {
                format: OutputFormat::Json,
                ..
            })
        ));
    }

    #[test]
    fn test_cli_parse_node() {
        let cli = Cli::parse_from(["aish", "node", "--state", "state.json"]);
        if let Some(Command::Node { state }) = cli.command {
            assert_eq!(state, Some(PathBuf::from("state.json")));
        } else {
            panic!("Expected Node command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["aish", "-c", "/path/to/aish.yml", "-l", "debug", "--debug", "prompt"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/aish.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.debug);
        assert!(matches!(cli.command, Some(Command::Prompt)));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }
}
