//! Response decoder module
//!
//! Supports: fs group hash/checksum and status responses
//!
//! # Overview
//!
//! An [`Envelope`] holds the CBOR map of one SMP response. The
//! [`ResponseDecoder`] checks the device status, extracts each field with
//! explicit type checks and resolves the representation of the hash `output`
//! from the algorithm named in `type`.

mod algorithm;
mod decoders;
mod envelope;
mod return_code;

pub use algorithm::{AlgorithmFamily, AlgorithmRegistry, CRC32, SHA256};
pub use decoders::{decode_hash_response, decode_status_response, ResponseDecoder};
pub use envelope::Envelope;
pub use return_code::{DeviceStatus, ReturnCode, FS_ERR_FILE_NOT_FOUND, FS_GROUP};
