//! Response envelope
//!
//! The body of one SMP response after CBOR decoding: a map from field names
//! to untyped values. All field access goes through the typed extractors
//! below so that missing and mistyped fields are reported uniformly.

use crate::error::DecodeError;
use crate::types::WireValue;

/// Decoded body of a single SMP response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    entries: Vec<(WireValue, WireValue)>,
}

impl Envelope {
    /// Create an empty envelope
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an envelope from raw CBOR bytes
    ///
    /// The payload must be exactly one CBOR item; trailing bytes are rejected.
    pub fn from_cbor_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = bytes;
        let value: WireValue =
            ciborium::from_reader(&mut reader).map_err(|e| DecodeError::Cbor {
                message: e.to_string(),
            })?;
        if !reader.is_empty() {
            return Err(DecodeError::Cbor {
                message: format!("{} trailing bytes after response map", reader.len()),
            });
        }
        Self::from_value(value)
    }

    /// Wrap an already decoded value; the root must be a map
    pub fn from_value(value: WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Map(entries) => Ok(Self { entries }),
            _ => Err(DecodeError::NotAMap),
        }
    }

    /// Add a text-keyed field
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<WireValue>) -> Self {
        self.entries
            .push((WireValue::Text(name.to_string()), value.into()));
        self
    }

    /// Encode back into CBOR bytes
    pub fn to_cbor_vec(&self) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        ciborium::into_writer(&WireValue::Map(self.entries.clone()), &mut buf).map_err(|e| {
            DecodeError::Cbor {
                message: e.to_string(),
            }
        })?;
        Ok(buf)
    }

    /// Look up a field by its exact, case-sensitive name
    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_text() == Some(name))
            .map(|(_, v)| v)
    }

    /// Whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field that must be present, any type
    pub fn require_present(&self, name: &'static str) -> Result<&WireValue, DecodeError> {
        self.get(name).ok_or(DecodeError::MissingField(name))
    }

    /// Required text string field
    pub fn require_text(&self, name: &'static str) -> Result<&str, DecodeError> {
        self.require_present(name)?
            .as_text()
            .ok_or(DecodeError::MalformedField(name))
    }

    /// Required unsigned integer field
    pub fn require_u64(&self, name: &'static str) -> Result<u64, DecodeError> {
        as_u64(self.require_present(name)?).ok_or(DecodeError::MalformedField(name))
    }

    /// Optional signed integer field
    pub fn optional_i64(&self, name: &'static str) -> Result<Option<i64>, DecodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_integer()
                .and_then(|i| i64::try_from(i).ok())
                .map(Some)
                .ok_or(DecodeError::MalformedField(name)),
        }
    }
}

/// Non-negative integer that fits in a u64
pub(crate) fn as_u64(value: &WireValue) -> Option<u64> {
    value.as_integer().and_then(|i| u64::try_from(i).ok())
}
