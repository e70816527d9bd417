//! File probes
//!
//! Application-facing answers to "how big is this file" and "what is its
//! digest". A device reporting that the file does not exist is an answer
//! (`None`), not an error.

use crate::decode::{Envelope, ResponseDecoder};
use crate::error::{DecodeError, Error, Result};
use crate::types::HashOutput;
use tracing::debug;

/// Length of a remote file from a status response
///
/// `None` when the device reports that the file does not exist.
pub fn probe_file_length(decoder: &ResponseDecoder, envelope: &Envelope) -> Result<Option<u64>> {
    match decoder.decode_status_response(envelope) {
        Ok(status) => Ok(Some(status.length)),
        Err(err) if err.is_no_entry() => {
            debug!("Status probe: file does not exist");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Lowercase hex digest of a remote file from a hash response
///
/// `None` when the device reports that the file does not exist. A checksum
/// or uninterpreted output is rejected, as callers expect a digest here.
pub fn probe_file_digest(
    decoder: &ResponseDecoder,
    envelope: &Envelope,
) -> Result<Option<String>> {
    let response = match decoder.decode_hash_response(envelope) {
        Ok(response) => response,
        Err(err) if err.is_no_entry() => {
            debug!("Hash probe: file does not exist");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    match response.output {
        HashOutput::Digest(bytes) => Ok(Some(hex::encode(bytes))),
        _ => Err(Error::from(DecodeError::MalformedField("output"))),
    }
}
