//! Hash algorithm classification
//!
//! The `type` field of a hash response selects how `output` is encoded on
//! the wire. Fixed-width checksums travel as unsigned integers, digests as
//! byte strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the CRC32 (IEEE) checksum
pub const CRC32: &str = "crc32";

/// Name of the SHA-256 digest
pub const SHA256: &str = "sha256";

/// Wire representation family of a hash algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum AlgorithmFamily {
    /// Unsigned integer output of at most `width_bits` bits
    Checksum { width_bits: u8 },
    /// Byte string output, of exactly `length` bytes when known
    Digest { length: Option<usize> },
}

impl AlgorithmFamily {
    /// Whether an integer checksum value fits this family's width
    pub fn accepts_checksum(&self, value: u64) -> bool {
        match self {
            AlgorithmFamily::Checksum { width_bits } if *width_bits >= 64 => true,
            AlgorithmFamily::Checksum { width_bits } => value >> width_bits == 0,
            AlgorithmFamily::Digest { .. } => false,
        }
    }

    /// Whether a digest of `len` bytes fits this family
    pub fn accepts_digest(&self, len: usize) -> bool {
        match self {
            AlgorithmFamily::Digest { length: Some(expected) } => *expected == len,
            AlgorithmFamily::Digest { length: None } => true,
            AlgorithmFamily::Checksum { .. } => false,
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmFamily::Checksum { width_bits } => write!(f, "checksum ({width_bits}-bit)"),
            AlgorithmFamily::Digest { length: Some(len) } => write!(f, "digest ({len} bytes)"),
            AlgorithmFamily::Digest { length: None } => write!(f, "digest"),
        }
    }
}

/// Known algorithms, keyed by their exact wire identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmRegistry {
    algorithms: BTreeMap<String, AlgorithmFamily>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AlgorithmRegistry {
    /// Registry with no algorithms at all
    pub fn empty() -> Self {
        Self {
            algorithms: BTreeMap::new(),
        }
    }

    /// Registry with the algorithms supported by the Zephyr fs group
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(CRC32, AlgorithmFamily::Checksum { width_bits: 32 });
        registry.register(SHA256, AlgorithmFamily::Digest { length: Some(32) });
        registry
    }

    /// Register or replace an algorithm
    pub fn register(&mut self, name: impl Into<String>, family: AlgorithmFamily) {
        self.algorithms.insert(name.into(), family);
    }

    /// Family of an algorithm, `None` if unknown
    pub fn lookup(&self, name: &str) -> Option<AlgorithmFamily> {
        self.algorithms.get(name).copied()
    }

    /// Iterate over registered algorithms in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, AlgorithmFamily)> {
        self.algorithms.iter().map(|(name, family)| (name.as_str(), *family))
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}
