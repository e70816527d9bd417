//! # smp-decode
//!
//! Typed decoding and integrity verification of MCU Manager (SMP)
//! file-system group responses.
//!
//! ## Features
//!
//! - **Explicit field extraction**: every field is type-checked, missing and
//!   mistyped fields are reported by name
//! - **Algorithm-aware hash output**: `crc32` outputs decode as integers,
//!   `sha256` outputs as byte strings, unknown algorithms pass through as-is
//! - **Device status**: SMP v1 `rc` and v2 `err` codes surface as errors
//! - **Verification**: recompute a reported hash over a local file
//!
//! ## Quick Start
//!
//! ```rust
//! use smp_decode::decode::{Envelope, ResponseDecoder};
//! use smp_decode::types::HashOutput;
//!
//! let envelope = Envelope::new()
//!     .with("type", "crc32")
//!     .with("off", 0u64)
//!     .with("len", 9u64)
//!     .with("output", 0xcbf4_3926u64);
//!
//! let response = ResponseDecoder::new().decode_hash_response(&envelope).unwrap();
//! assert_eq!(response.output, HashOutput::Checksum(0xcbf4_3926));
//!
//! smp_decode::verify::verify(&response, b"123456789").unwrap();
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  CBOR bytes ──► Envelope ──► ResponseDecoder ──► Response
//!                                   │                 │
//!                          AlgorithmRegistry     verify / probe
//!                          (DecoderConfig)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Typed responses
pub mod types;

/// Response decoding
pub mod decode;

/// Decoder configuration
pub mod config;

/// Hash/checksum verification against local data
pub mod verify;

/// File existence and digest probes
pub mod probe;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use decode::{Envelope, ResponseDecoder};
pub use error::{DecodeError, Error, Result};
pub use types::{HashChecksumResponse, HashOutput, Response, ResponseKind, UploadStatusResponse};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
