//! Typed SMP responses
//!
//! Value objects produced by the decoder. They are built fresh for every
//! received response and never mutated afterwards.

use serde::Serialize;
use std::fmt;

/// Untyped CBOR value as handed over by the transport decoder
pub type WireValue = ciborium::Value;

// ============================================================================
// Response Kind
// ============================================================================

/// Which response the caller expects, derived from the request it issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ResponseKind {
    /// File hash/checksum (fs group, command 2)
    Hash,
    /// File status probe (fs group, command 1)
    Status,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::Hash => write!(f, "hash"),
            ResponseKind::Status => write!(f, "status"),
        }
    }
}

// ============================================================================
// Hash Output
// ============================================================================

/// The `output` field of a hash/checksum response
///
/// Its representation follows from the algorithm family of `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HashOutput {
    /// Fixed-width checksum such as CRC32
    Checksum(u64),
    /// Byte-string digest such as SHA-256
    Digest(#[serde(serialize_with = "hex::serde::serialize")] Vec<u8>),
    /// Output of an algorithm this decoder does not know, left uninterpreted
    Raw(#[serde(serialize_with = "serialize_raw")] WireValue),
}

/// Raw byte strings render as hex like digests; other values as-is
fn serialize_raw<S>(value: &WireValue, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        WireValue::Bytes(bytes) => hex::serde::serialize(bytes, serializer),
        other => other.serialize(serializer),
    }
}

impl HashOutput {
    /// Checksum value, if this is a checksum
    pub fn as_checksum(&self) -> Option<u64> {
        match self {
            HashOutput::Checksum(value) => Some(*value),
            _ => None,
        }
    }

    /// Digest bytes, if this is a digest
    pub fn as_digest(&self) -> Option<&[u8]> {
        match self {
            HashOutput::Digest(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Lowercase hex rendering; `None` for raw outputs
    pub fn to_hex(&self) -> Option<String> {
        match self {
            HashOutput::Checksum(value) => Some(format!("{value:08x}")),
            HashOutput::Digest(bytes) => Some(hex::encode(bytes)),
            HashOutput::Raw(_) => None,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Decoded hash/checksum response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashChecksumResponse {
    /// Algorithm identifier as sent by the device
    #[serde(rename = "type")]
    pub algorithm: String,
    /// Byte offset into the file the hash starts at
    pub offset: u64,
    /// Number of bytes covered by the hash
    pub length: u64,
    pub output: HashOutput,
}

impl HashChecksumResponse {
    /// End of the covered range (exclusive)
    ///
    /// Saturates at `u64::MAX`; decoded responses never reach it.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }
}

/// Decoded upload/file status response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadStatusResponse {
    /// Bytes the device already holds for the file
    pub length: u64,
}

/// Closed set of typed responses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum Response {
    Hash(HashChecksumResponse),
    Status(UploadStatusResponse),
}

impl Response {
    /// The kind this response was decoded as
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::Hash(_) => ResponseKind::Hash,
            Response::Status(_) => ResponseKind::Status,
        }
    }
}

impl From<HashChecksumResponse> for Response {
    fn from(response: HashChecksumResponse) -> Self {
        Response::Hash(response)
    }
}

impl From<UploadStatusResponse> for Response {
    fn from(response: UploadStatusResponse) -> Self {
        Response::Status(response)
    }
}
