//! SMP status codes
//!
//! SMP version 1 reports failures through a bare `rc` integer. Version 2
//! replaces it with a group-scoped `err: { group, rc }` map.

use super::envelope::{as_u64, Envelope};
use crate::error::DecodeError;
use std::fmt;

/// Management group id of the file-system group
pub const FS_GROUP: u32 = 8;

/// fs group error: file not found
pub const FS_ERR_FILE_NOT_FOUND: u32 = 3;

/// SMP version 1 return code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    Ok,
    Unknown,
    NoMemory,
    InValue,
    Timeout,
    NoEntry,
    BadState,
    MsgSize,
    NotSupported,
    Corrupt,
    Busy,
    AccessDenied,
    TooOld,
    TooNew,
    PerUser,
    Other(i64),
}

impl ReturnCode {
    /// Numeric code as sent on the wire
    pub fn code(&self) -> i64 {
        match self {
            ReturnCode::Ok => 0,
            ReturnCode::Unknown => 1,
            ReturnCode::NoMemory => 2,
            ReturnCode::InValue => 3,
            ReturnCode::Timeout => 4,
            ReturnCode::NoEntry => 5,
            ReturnCode::BadState => 6,
            ReturnCode::MsgSize => 7,
            ReturnCode::NotSupported => 8,
            ReturnCode::Corrupt => 9,
            ReturnCode::Busy => 10,
            ReturnCode::AccessDenied => 11,
            ReturnCode::TooOld => 12,
            ReturnCode::TooNew => 13,
            ReturnCode::PerUser => 256,
            ReturnCode::Other(code) => *code,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ReturnCode::Ok)
    }
}

impl From<i64> for ReturnCode {
    fn from(code: i64) -> Self {
        match code {
            0 => ReturnCode::Ok,
            1 => ReturnCode::Unknown,
            2 => ReturnCode::NoMemory,
            3 => ReturnCode::InValue,
            4 => ReturnCode::Timeout,
            5 => ReturnCode::NoEntry,
            6 => ReturnCode::BadState,
            7 => ReturnCode::MsgSize,
            8 => ReturnCode::NotSupported,
            9 => ReturnCode::Corrupt,
            10 => ReturnCode::Busy,
            11 => ReturnCode::AccessDenied,
            12 => ReturnCode::TooOld,
            13 => ReturnCode::TooNew,
            256 => ReturnCode::PerUser,
            other => ReturnCode::Other(other),
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReturnCode::Ok => "ok",
            ReturnCode::Unknown => "unknown error",
            ReturnCode::NoMemory => "out of memory",
            ReturnCode::InValue => "invalid value",
            ReturnCode::Timeout => "timeout",
            ReturnCode::NoEntry => "no such entry",
            ReturnCode::BadState => "bad state",
            ReturnCode::MsgSize => "message too large",
            ReturnCode::NotSupported => "not supported",
            ReturnCode::Corrupt => "corrupt",
            ReturnCode::Busy => "busy",
            ReturnCode::AccessDenied => "access denied",
            ReturnCode::TooOld => "protocol version too old",
            ReturnCode::TooNew => "protocol version too new",
            ReturnCode::PerUser => "user defined error",
            ReturnCode::Other(_) => "unrecognized error",
        };
        write!(f, "{name} (rc={})", self.code())
    }
}

/// Non-success status reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    /// SMP v1 `rc`
    Legacy(ReturnCode),
    /// SMP v2 `err`
    Group { group: u32, rc: u32 },
}

impl DeviceStatus {
    /// Whether the status means the requested file does not exist
    pub fn is_no_entry(&self) -> bool {
        match self {
            DeviceStatus::Legacy(code) => *code == ReturnCode::NoEntry,
            DeviceStatus::Group { group, rc } => {
                *group == FS_GROUP && *rc == FS_ERR_FILE_NOT_FOUND
            }
        }
    }

    /// Extract the status carried by an envelope
    ///
    /// Returns `None` when the response reports success, either by omitting
    /// both fields or by a zero code.
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<Self>, DecodeError> {
        if let Some(err) = envelope.get("err") {
            let map = Envelope::from_value(err.clone())
                .map_err(|_| DecodeError::MalformedField("err"))?;
            let group = map.get("group").and_then(as_u64);
            let rc = map.get("rc").and_then(as_u64);
            let (Some(group), Some(rc)) = (group, rc) else {
                return Err(DecodeError::MalformedField("err"));
            };
            let group = u32::try_from(group).map_err(|_| DecodeError::MalformedField("err"))?;
            let rc = u32::try_from(rc).map_err(|_| DecodeError::MalformedField("err"))?;
            if rc != 0 {
                return Ok(Some(DeviceStatus::Group { group, rc }));
            }
        }

        match envelope.optional_i64("rc")?.map(ReturnCode::from) {
            None | Some(ReturnCode::Ok) => Ok(None),
            Some(code) => Ok(Some(DeviceStatus::Legacy(code))),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Legacy(code) => write!(f, "{code}"),
            DeviceStatus::Group { group, rc } if *group == FS_GROUP => {
                write!(f, "fs group: {} (rc={rc})", fs_error_name(*rc))
            }
            DeviceStatus::Group { group, rc } => write!(f, "group {group} (rc={rc})"),
        }
    }
}

/// Zephyr fs_mgmt group error names
fn fs_error_name(rc: u32) -> &'static str {
    match rc {
        1 => "unknown error",
        2 => "invalid file name",
        3 => "file not found",
        4 => "file is a directory",
        5 => "file open failed",
        6 => "file seek failed",
        7 => "file read failed",
        8 => "file truncate failed",
        9 => "file delete failed",
        10 => "file write failed",
        11 => "offset not valid",
        12 => "offset larger than file",
        13 => "checksum/hash not found",
        14 => "mount point not found",
        15 => "read-only filesystem",
        16 => "file empty",
        _ => "unrecognized error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WireValue;
    use test_case::test_case;

    fn err_map(group: u64, rc: u64) -> WireValue {
        WireValue::Map(vec![
            (WireValue::Text("group".into()), WireValue::Integer(group.into())),
            (WireValue::Text("rc".into()), WireValue::Integer(rc.into())),
        ])
    }

    #[test_case(0, ReturnCode::Ok)]
    #[test_case(5, ReturnCode::NoEntry)]
    #[test_case(10, ReturnCode::Busy)]
    #[test_case(256, ReturnCode::PerUser)]
    #[test_case(42, ReturnCode::Other(42))]
    fn test_return_code_mapping(code: i64, expected: ReturnCode) {
        let rc = ReturnCode::from(code);
        assert_eq!(rc, expected);
        assert_eq!(rc.code(), code);
    }

    #[test]
    fn test_no_status_is_success() {
        let envelope = Envelope::new().with("len", 10u64);
        assert_eq!(DeviceStatus::from_envelope(&envelope).unwrap(), None);

        let envelope = Envelope::new().with("rc", 0u64);
        assert_eq!(DeviceStatus::from_envelope(&envelope).unwrap(), None);
    }

    #[test]
    fn test_legacy_status() {
        let envelope = Envelope::new().with("rc", 5u64);
        let status = DeviceStatus::from_envelope(&envelope).unwrap().unwrap();
        assert_eq!(status, DeviceStatus::Legacy(ReturnCode::NoEntry));
        assert!(status.is_no_entry());
        assert_eq!(status.to_string(), "no such entry (rc=5)");
    }

    #[test]
    fn test_group_status() {
        let envelope = Envelope::new().with("err", err_map(8, 3));
        let status = DeviceStatus::from_envelope(&envelope).unwrap().unwrap();
        assert_eq!(status, DeviceStatus::Group { group: 8, rc: 3 });
        assert!(status.is_no_entry());
        assert_eq!(status.to_string(), "fs group: file not found (rc=3)");

        let envelope = Envelope::new().with("err", err_map(1, 3));
        let status = DeviceStatus::from_envelope(&envelope).unwrap().unwrap();
        assert!(!status.is_no_entry());
        assert_eq!(status.to_string(), "group 1 (rc=3)");
    }

    #[test]
    fn test_group_status_zero_rc_is_success() {
        let envelope = Envelope::new().with("err", err_map(8, 0));
        assert_eq!(DeviceStatus::from_envelope(&envelope).unwrap(), None);
    }

    #[test]
    fn test_malformed_status() {
        let envelope = Envelope::new().with("rc", "five");
        assert_eq!(
            DeviceStatus::from_envelope(&envelope),
            Err(DecodeError::MalformedField("rc"))
        );

        let envelope = Envelope::new().with("err", 3u64);
        assert_eq!(
            DeviceStatus::from_envelope(&envelope),
            Err(DecodeError::MalformedField("err"))
        );
    }
}
