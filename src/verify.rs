//! Integrity verification
//!
//! Recomputes a device-reported hash or checksum over a local copy of the
//! artifact and compares the two.

use crate::decode::{CRC32, SHA256};
use crate::error::{Error, Result};
use crate::types::{HashChecksumResponse, HashOutput};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Compute `algorithm` over `data`
///
/// Only algorithms with a local implementation are supported.
pub fn compute(algorithm: &str, data: &[u8]) -> Result<HashOutput> {
    match algorithm {
        CRC32 => Ok(HashOutput::Checksum(u64::from(crc32fast::hash(data)))),
        SHA256 => Ok(HashOutput::Digest(Sha256::digest(data).to_vec())),
        other => Err(Error::verification(format!(
            "No local implementation of '{other}'"
        ))),
    }
}

/// Check a hash response against the artifact it describes
///
/// The response covers `artifact[offset..offset + length]`.
pub fn verify(response: &HashChecksumResponse, artifact: &[u8]) -> Result<()> {
    let covered = covered_range(response, artifact)?;
    let actual = compute(&response.algorithm, covered)?;

    debug!(
        algorithm = %response.algorithm,
        offset = response.offset,
        length = response.length,
        "Verifying hash response"
    );

    if actual == response.output {
        return Ok(());
    }

    Err(Error::IntegrityMismatch {
        algorithm: response.algorithm.clone(),
        expected: render(&response.output),
        actual: render(&actual),
    })
}

/// Slice of the artifact covered by the response
fn covered_range<'a>(response: &HashChecksumResponse, artifact: &'a [u8]) -> Result<&'a [u8]> {
    let out_of_range = || {
        Error::verification(format!(
            "Range {}..{} exceeds artifact size {}",
            response.offset,
            response.offset.saturating_add(response.length),
            artifact.len()
        ))
    };

    let start = usize::try_from(response.offset).map_err(|_| out_of_range())?;
    let len = usize::try_from(response.length).map_err(|_| out_of_range())?;
    let end = start.checked_add(len).ok_or_else(out_of_range)?;

    artifact.get(start..end).ok_or_else(out_of_range)
}

fn render(output: &HashOutput) -> String {
    output.to_hex().unwrap_or_else(|| format!("{output:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WireValue;

    // sha256("abc")
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    // crc32("123456789"), the standard check value
    const CHECK_CRC32: u64 = 0xcbf4_3926;

    fn response(
        algorithm: &str,
        offset: u64,
        length: u64,
        output: HashOutput,
    ) -> HashChecksumResponse {
        HashChecksumResponse {
            algorithm: algorithm.to_string(),
            offset,
            length,
            output,
        }
    }

    #[test]
    fn test_compute_known_vectors() {
        let sha = compute("sha256", b"abc").unwrap();
        assert_eq!(sha.to_hex().unwrap(), ABC_SHA256);

        let crc = compute("crc32", b"123456789").unwrap();
        assert_eq!(crc, HashOutput::Checksum(CHECK_CRC32));
    }

    #[test]
    fn test_compute_unknown_algorithm() {
        assert!(compute("blake3", b"abc").is_err());
    }

    #[test]
    fn test_verify_sha256_match() {
        let digest = hex::decode(ABC_SHA256).unwrap();
        let response = response("sha256", 0, 3, HashOutput::Digest(digest));
        verify(&response, b"abc").unwrap();
    }

    #[test]
    fn test_verify_partial_range() {
        let response = response("crc32", 2, 9, HashOutput::Checksum(CHECK_CRC32));
        verify(&response, b"xx123456789yy").unwrap();
    }

    #[test]
    fn test_verify_mismatch() {
        let response = response("crc32", 0, 9, HashOutput::Checksum(0));
        let err = verify(&response, b"123456789").unwrap_err();
        match err {
            Error::IntegrityMismatch {
                algorithm,
                expected,
                actual,
            } => {
                assert_eq!(algorithm, "crc32");
                assert_eq!(expected, "00000000");
                assert_eq!(actual, "cbf43926");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_range_beyond_artifact() {
        let response = response("crc32", 4, 10, HashOutput::Checksum(0));
        let err = verify(&response, b"short").unwrap_err();
        assert!(err.to_string().contains("exceeds artifact size 5"));
    }

    #[test]
    fn test_verify_raw_output_fails() {
        let response = response("sha256", 0, 3, HashOutput::Raw(WireValue::Null));
        assert!(matches!(
            verify(&response, b"abc"),
            Err(Error::IntegrityMismatch { .. })
        ));
    }
}
