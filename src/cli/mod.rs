//! CLI module for vidtalk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// vidtalk - chat with the spoken content of a video
///
/// Loads a video's captions (or transcribes its audio when there are none) and
/// answers questions about it with an OpenAI chat model.
#[derive(Parser, Debug)]
#[command(name = "vidtalk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat {
        /// Video URL to load right away
        url: Option<String>,

        /// Chat model (gpt-3.5-turbo, gpt-4o-mini)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Extract the spoken content of a video and print it
    Fetch {
        /// Video URL
        url: String,

        /// Write the content to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Ask a single question about a video
    Ask {
        /// Video URL
        url: String,

        /// The question to ask
        question: String,

        /// Chat model (gpt-3.5-turbo, gpt-4o-mini)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
