//! CLI commands and argument parsing

use crate::error::{Error, Result};
use crate::types::ResponseKind;
use base64::Engine as _;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

/// Decode and verify MCU Manager (SMP) file-system responses
#[derive(Parser, Debug)]
#[command(name = "smp-decode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Decoder configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a CBOR response payload
    Decode {
        /// Expected response kind (from the request that was sent)
        kind: ResponseKind,

        #[command(flatten)]
        input: PayloadInput,
    },

    /// Answer a file probe: length for status, hex digest for hash
    Probe {
        /// Expected response kind (from the request that was sent)
        kind: ResponseKind,

        #[command(flatten)]
        input: PayloadInput,
    },

    /// Check a hash response against a local copy of the file
    Verify {
        #[command(flatten)]
        input: PayloadInput,

        /// Local artifact the response describes
        #[arg(long)]
        data: PathBuf,
    },

    /// List known hash algorithms
    Algorithms,
}

/// Where the raw CBOR payload comes from
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PayloadInput {
    /// File containing the raw CBOR payload
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Payload as a hex string
    #[arg(long)]
    pub hex: Option<String>,

    /// Payload as standard base64
    #[arg(long)]
    pub base64: Option<String>,
}

impl PayloadInput {
    /// Read the payload bytes
    pub fn read(&self) -> Result<Vec<u8>> {
        if let Some(path) = &self.file {
            return Ok(fs::read(path)?);
        }

        if let Some(text) = &self.hex {
            let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            return hex::decode(cleaned)
                .map_err(|e| Error::input_encoding(format!("Invalid hex payload: {e}")));
        }

        if let Some(text) = &self.base64 {
            return base64::engine::general_purpose::STANDARD
                .decode(text.trim())
                .map_err(|e| Error::input_encoding(format!("Invalid base64 payload: {e}")));
        }

        Err(Error::input_encoding(
            "No payload given (use --file, --hex or --base64)",
        ))
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
