//! Response decoder
//!
//! Turns envelopes into typed responses. The caller names the expected
//! response kind; payloads are not self-describing.

use super::algorithm::{AlgorithmFamily, AlgorithmRegistry};
use super::envelope::{as_u64, Envelope};
use super::return_code::DeviceStatus;
use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::types::{
    HashChecksumResponse, HashOutput, Response, ResponseKind, UploadStatusResponse, WireValue,
};
use tracing::{debug, warn};

/// Stateless decoder for SMP fs group responses
///
/// Holds only immutable configuration, so one instance can be shared freely
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder {
    registry: AlgorithmRegistry,
    strict_algorithms: bool,
}

impl ResponseDecoder {
    /// Decoder with the built-in algorithms and permissive handling of unknown ones
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder with a custom algorithm registry
    pub fn with_registry(registry: AlgorithmRegistry) -> Self {
        Self {
            registry,
            strict_algorithms: false,
        }
    }

    /// Decoder built from a loaded configuration
    pub fn from_config(config: &DecoderConfig) -> Self {
        Self {
            registry: config.registry(),
            strict_algorithms: config.strict_algorithms,
        }
    }

    /// Reject unknown algorithms instead of passing their output through
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_algorithms = strict;
        self
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// Decode an envelope as the given response kind
    pub fn decode(&self, kind: ResponseKind, envelope: &Envelope) -> Result<Response, DecodeError> {
        match kind {
            ResponseKind::Hash => self.decode_hash_response(envelope).map(Response::Hash),
            ResponseKind::Status => self.decode_status_response(envelope).map(Response::Status),
        }
    }

    /// Parse raw CBOR bytes and decode them as the given response kind
    pub fn decode_slice(&self, kind: ResponseKind, bytes: &[u8]) -> Result<Response, DecodeError> {
        let envelope = Envelope::from_cbor_slice(bytes)?;
        self.decode(kind, &envelope)
    }

    /// Decode a file hash/checksum response
    pub fn decode_hash_response(
        &self,
        envelope: &Envelope,
    ) -> Result<HashChecksumResponse, DecodeError> {
        check_status(envelope)?;

        let algorithm = envelope.require_text("type")?;
        let offset = envelope.require_u64("off")?;
        let length = envelope.require_u64("len")?;
        let raw_output = envelope.require_present("output")?;

        if offset.checked_add(length).is_none() {
            return Err(DecodeError::MalformedField("len"));
        }

        let output = match self.registry.lookup(algorithm) {
            Some(family) => decode_output(family, raw_output)?,
            None if self.strict_algorithms => {
                return Err(DecodeError::MalformedField("type"));
            }
            None => {
                warn!(
                    algorithm,
                    "Unknown hash algorithm, passing output through uninterpreted"
                );
                HashOutput::Raw(raw_output.clone())
            }
        };

        debug!(algorithm, offset, length, "Decoded hash response");

        Ok(HashChecksumResponse {
            algorithm: algorithm.to_string(),
            offset,
            length,
            output,
        })
    }

    /// Decode a file/upload status response
    pub fn decode_status_response(
        &self,
        envelope: &Envelope,
    ) -> Result<UploadStatusResponse, DecodeError> {
        check_status(envelope)?;

        let length = envelope.require_u64("len")?;
        debug!(length, "Decoded status response");

        Ok(UploadStatusResponse { length })
    }
}

/// Decode a hash response with the built-in algorithm set
pub fn decode_hash_response(envelope: &Envelope) -> Result<HashChecksumResponse, DecodeError> {
    ResponseDecoder::new().decode_hash_response(envelope)
}

/// Decode a status response
pub fn decode_status_response(envelope: &Envelope) -> Result<UploadStatusResponse, DecodeError> {
    ResponseDecoder::new().decode_status_response(envelope)
}

/// Fail on a non-success device status
fn check_status(envelope: &Envelope) -> Result<(), DecodeError> {
    match DeviceStatus::from_envelope(envelope)? {
        Some(status) => {
            debug!(%status, "Device reported error status");
            Err(DecodeError::Device(status))
        }
        None => Ok(()),
    }
}

/// Interpret `output` according to the algorithm family
fn decode_output(family: AlgorithmFamily, raw: &WireValue) -> Result<HashOutput, DecodeError> {
    match family {
        AlgorithmFamily::Checksum { .. } => as_u64(raw)
            .filter(|value| family.accepts_checksum(*value))
            .map(HashOutput::Checksum)
            .ok_or(DecodeError::MalformedField("output")),
        AlgorithmFamily::Digest { .. } => raw
            .as_bytes()
            .filter(|bytes| family.accepts_digest(bytes.len()))
            .map(|bytes| HashOutput::Digest(bytes.clone()))
            .ok_or(DecodeError::MalformedField("output")),
    }
}
