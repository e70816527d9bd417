//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, PayloadInput};
use crate::config::{load_config, DecoderConfig};
use crate::decode::{Envelope, ResponseDecoder};
use crate::error::{Error, Result, ResultExt};
use crate::probe::{probe_file_digest, probe_file_length};
use crate::types::{Response, ResponseKind};
use crate::verify::verify;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        let decoder = self.decoder()?;

        match &self.cli.command {
            Commands::Decode { kind, input } => self.decode(&decoder, *kind, input),
            Commands::Probe { kind, input } => self.probe(&decoder, *kind, input),
            Commands::Verify { input, data } => {
                let artifact = fs::read(data)
                    .with_context(|| format!("Failed to read artifact '{}'", data.display()))?;
                self.verify(&decoder, input, &artifact)
            }
            Commands::Algorithms => self.algorithms(&decoder),
        }
    }

    /// Build the decoder from the config file, or defaults without one
    fn decoder(&self) -> Result<ResponseDecoder> {
        let config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => DecoderConfig::default(),
        };
        debug!(
            algorithms = config.algorithms.len(),
            strict = config.strict_algorithms,
            "Loaded decoder config"
        );
        Ok(ResponseDecoder::from_config(&config))
    }

    fn decode(
        &self,
        decoder: &ResponseDecoder,
        kind: ResponseKind,
        input: &PayloadInput,
    ) -> Result<()> {
        let bytes = input.read()?;
        let response = decoder.decode_slice(kind, &bytes)?;

        match self.cli.format {
            OutputFormat::Json => self.emit(&response),
            OutputFormat::Pretty => {
                println!("{}", describe(&response));
                Ok(())
            }
        }
    }

    fn probe(
        &self,
        decoder: &ResponseDecoder,
        kind: ResponseKind,
        input: &PayloadInput,
    ) -> Result<()> {
        let envelope = Envelope::from_cbor_slice(&input.read()?)?;

        let answer = match kind {
            ResponseKind::Status => json!({ "length": probe_file_length(decoder, &envelope)? }),
            ResponseKind::Hash => json!({ "digest": probe_file_digest(decoder, &envelope)? }),
        };

        match self.cli.format {
            OutputFormat::Json => self.emit(&answer),
            OutputFormat::Pretty => {
                let text = match answer.as_object().and_then(|o| o.values().next()) {
                    Some(Value::Null) | None => "file does not exist".to_string(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                };
                println!("{text}");
                Ok(())
            }
        }
    }

    fn verify(
        &self,
        decoder: &ResponseDecoder,
        input: &PayloadInput,
        artifact: &[u8],
    ) -> Result<()> {
        let envelope = Envelope::from_cbor_slice(&input.read()?)?;
        let response = decoder.decode_hash_response(&envelope)?;
        verify(&response, artifact)?;

        match self.cli.format {
            OutputFormat::Json => self.emit(&json!({
                "verified": true,
                "type": response.algorithm,
                "offset": response.offset,
                "length": response.length,
            })),
            OutputFormat::Pretty => {
                println!(
                    "OK: {} over bytes {}..{} matches",
                    response.algorithm,
                    response.offset,
                    response.end()
                );
                Ok(())
            }
        }
    }

    fn algorithms(&self, decoder: &ResponseDecoder) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                let list: Vec<Value> = decoder
                    .registry()
                    .iter()
                    .map(|(name, family)| -> Result<Value> {
                        let mut entry = serde_json::to_value(family)?;
                        if let Some(obj) = entry.as_object_mut() {
                            obj.insert("name".to_string(), Value::String(name.to_string()));
                        }
                        Ok(entry)
                    })
                    .collect::<Result<_>>()?;
                self.emit(&list)
            }
            OutputFormat::Pretty => {
                for (name, family) in decoder.registry().iter() {
                    println!("{name:<12} {family}");
                }
                Ok(())
            }
        }
    }

    /// Print one JSON document on stdout
    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let line = serde_json::to_string(value).map_err(Error::from)?;
        println!("{line}");
        Ok(())
    }
}

/// Human-readable summary of a response
fn describe(response: &Response) -> String {
    match response {
        Response::Hash(hash) => {
            let output = hash
                .output
                .to_hex()
                .unwrap_or_else(|| format!("{:?} (uninterpreted)", hash.output));
            format!(
                "{} over bytes {}..{}: {}",
                hash.algorithm,
                hash.offset,
                hash.end(),
                output
            )
        }
        Response::Status(status) => format!("length: {} bytes", status.length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DeviceStatus, ReturnCode};
    use crate::error::DecodeError;
    use crate::types::{HashChecksumResponse, HashOutput, UploadStatusResponse};
    use clap::Parser;
    use std::io::Write;

    // {"len": 4096}
    const STATUS_4096: &str = "a1636c656e191000";

    // {"type": "crc32", "off": 0, "len": 9, "output": 0xcbf43926}
    const CRC32_CHECK: &str = "a46474797065656372633332636f666600636c656e09666f75747075741acbf43926";

    // {"rc": 5}
    const RC_NO_ENTRY: &str = "a162726305";

    fn run(args: &[&str]) -> Result<()> {
        let cli = Cli::parse_from(std::iter::once("smp-decode").chain(args.iter().copied()));
        Runner::new(cli).run()
    }

    fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_run_decode() {
        run(&["decode", "status", "--hex", STATUS_4096]).unwrap();
        run(&["--format", "pretty", "decode", "hash", "--hex", CRC32_CHECK]).unwrap();

        let payload = temp_file(&hex::decode(STATUS_4096).unwrap());
        let path = payload.path().to_str().unwrap();
        run(&["decode", "status", "--file", path]).unwrap();
    }

    #[test]
    fn test_run_decode_wrong_kind() {
        let err = run(&["decode", "hash", "--hex", STATUS_4096]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::MissingField("type"))
        ));
    }

    #[test]
    fn test_run_decode_device_error() {
        let err = run(&["decode", "status", "--hex", RC_NO_ENTRY]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::Device(DeviceStatus::Legacy(ReturnCode::NoEntry)))
        ));
    }

    #[test]
    fn test_run_probe_missing_file() {
        run(&["probe", "status", "--hex", RC_NO_ENTRY]).unwrap();
        run(&["--format", "pretty", "probe", "status", "--hex", RC_NO_ENTRY]).unwrap();
        run(&["--format", "pretty", "probe", "hash", "--hex", RC_NO_ENTRY]).unwrap();
    }

    #[test]
    fn test_run_probe_hash_requires_digest() {
        let err = run(&["probe", "hash", "--hex", CRC32_CHECK]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::MalformedField("output"))
        ));
    }

    #[test]
    fn test_run_verify() {
        let artifact = temp_file(b"123456789");
        let path = artifact.path().to_str().unwrap();
        run(&["verify", "--hex", CRC32_CHECK, "--data", path]).unwrap();
        run(&["--format", "pretty", "verify", "--hex", CRC32_CHECK, "--data", path]).unwrap();

        let corrupted = temp_file(b"123456780");
        let path = corrupted.path().to_str().unwrap();
        let err = run(&["verify", "--hex", CRC32_CHECK, "--data", path]).unwrap_err();
        assert!(matches!(err, Error::IntegrityMismatch { .. }));
    }

    #[test]
    fn test_run_verify_missing_artifact() {
        let err = run(&[
            "verify",
            "--hex",
            CRC32_CHECK,
            "--data",
            "/nonexistent/artifact.bin",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read artifact"));
    }

    #[test]
    fn test_run_algorithms_with_config() {
        let config = temp_file(b"algorithms:\n  - name: crc16\n    family: checksum\n    width_bits: 16\n");
        let path = config.path().to_str().unwrap();
        run(&["--config", path, "algorithms"]).unwrap();
        run(&["--config", path, "--format", "pretty", "algorithms"]).unwrap();
    }

    #[test]
    fn test_run_invalid_config() {
        let config = temp_file(b"algorithms:\n  - name: crc99\n    family: checksum\n    width_bits: 99\n");
        let path = config.path().to_str().unwrap();
        assert!(run(&["--config", path, "algorithms"]).is_err());
    }

    #[test]
    fn test_describe_hash() {
        let response = Response::Hash(HashChecksumResponse {
            algorithm: "crc32".to_string(),
            offset: 16,
            length: 32,
            output: HashOutput::Checksum(0xcafe),
        });
        assert_eq!(describe(&response), "crc32 over bytes 16..48: 0000cafe");
    }

    #[test]
    fn test_describe_status() {
        let response = Response::Status(UploadStatusResponse { length: 4096 });
        assert_eq!(describe(&response), "length: 4096 bytes");
    }
}
