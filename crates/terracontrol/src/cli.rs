//! Command-line interface handling for the TerraControl panel.
//!
//! Global options override the configuration file; the subcommand picks
//! between the interactive panel, the log tail and one-shot actions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal control panel for game servers", long_about = None)]
pub struct Args {
    /// Configuration file path
    ///
    /// If the file doesn't exist, a default configuration will be created.
    #[arg(short, long, default_value = "terracontrol.toml")]
    pub config: PathBuf,

    /// Server base URL override (e.g. http://127.0.0.1:8080)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Output logs in JSON format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from("terracontrol.toml"),
            server: None,
            log_level: None,
            json_logs: false,
            command: None,
        }
    }
}

/// Time-of-day presets accepted by the server.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Dawn,
    Noon,
    Dusk,
    Midnight,
}

impl TimeOfDay {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Dawn => "dawn",
            TimeOfDay::Noon => "noon",
            TimeOfDay::Dusk => "dusk",
            TimeOfDay::Midnight => "midnight",
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive terminal panel (default)
    Panel,
    /// Stream the live server log to stdout
    Tail,
    /// Print the full server status
    Status,
    /// Broadcast a chat message as the server
    Say {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Set the message of the day, or print it when no text is given
    Motd { text: Vec<String> },
    /// Set the server password, or print it when no text is given
    Password { text: Option<String> },
    /// Kick a player
    Kick { player: String },
    /// Ban a player
    Ban { player: String },
    /// Start the game server
    Start,
    /// Stop the game server
    Stop,
    /// Restart the game server
    Restart,
    /// Check whether the game server is up
    ServerStatus,
    /// Query the time, or set it to a preset
    Time {
        #[arg(value_enum)]
        time: Option<TimeOfDay>,
    },
    /// Settle liquids
    Settle,
}
