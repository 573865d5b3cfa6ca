//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "chainrag")]
#[command(about = "Question answering and analytics over a blockchain transaction dataset")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// CSV file to load instead of the configured one
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the JSON API server
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable permissive CORS
        #[arg(long)]
        cors: bool,
    },
    /// Answer one question and print the response envelope
    Ask {
        /// The question, e.g. "What is the hash of block 3?"
        question: String,
        /// Use the retrieval pipeline instead of the rule-based dispatcher
        #[arg(long)]
        rag: bool,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show dataset statistics
    Stats {
        /// Export statistics to a JSON file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// Show current configuration
    Config,
}
