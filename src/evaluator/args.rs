//! Contract-condition argument decoding.

use crate::datasource::CallArg;
use crate::domain::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("arguments are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("arguments must be a JSON array")]
    NotAnArray,
    #[error("argument {index} ({value}) is not a u64")]
    NotU64 { index: usize, value: String },
}

/// Decode a JSON array of call arguments.
///
/// `0x…` strings become object references; every other value must be an
/// unsigned 64-bit literal, given either as a JSON number or a numeric string.
/// An empty or blank input means no arguments.
pub fn parse_call_args(raw: &str) -> Result<Vec<CallArg>, ArgumentError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value = serde_json::from_str(raw)?;
    let items = value.as_array().ok_or(ArgumentError::NotAnArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::String(s) if Address::is_address_like(s) => {
                Ok(CallArg::Object(Address::new(s.clone())))
            }
            serde_json::Value::String(s) => {
                s.trim()
                    .parse::<u64>()
                    .map(CallArg::U64)
                    .map_err(|_| ArgumentError::NotU64 {
                        index,
                        value: format!("{:?}", s),
                    })
            }
            serde_json::Value::Number(n) => {
                n.as_u64()
                    .map(CallArg::U64)
                    .ok_or_else(|| ArgumentError::NotU64 {
                        index,
                        value: n.to_string(),
                    })
            }
            other => Err(ArgumentError::NotU64 {
                index,
                value: other.to_string(),
            }),
        })
        .collect()
}

/// Decode the first 8 little-endian bytes as u64, zero-padding shorter input.
pub fn decode_u64_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_arguments() {
        let args = parse_call_args(r#"["0xabc", 42, "7"]"#).unwrap();
        assert_eq!(
            args,
            vec![
                CallArg::Object(Address::new("0xabc")),
                CallArg::U64(42),
                CallArg::U64(7),
            ]
        );
    }

    #[test]
    fn test_blank_arguments_are_empty() {
        assert!(parse_call_args("").unwrap().is_empty());
        assert!(parse_call_args("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = parse_call_args("[1, ").unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidJson(_)));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_rejects_non_array_and_non_numeric() {
        assert!(matches!(
            parse_call_args(r#"{"a": 1}"#),
            Err(ArgumentError::NotAnArray)
        ));
        assert!(matches!(
            parse_call_args(r#"[1, -1]"#),
            Err(ArgumentError::NotU64 { index: 1, .. })
        ));
        assert!(matches!(
            parse_call_args(r#"["abc"]"#),
            Err(ArgumentError::NotU64 { index: 0, .. })
        ));
        let err = parse_call_args(r#"[true]"#).unwrap_err();
        assert_eq!(err.to_string(), "argument 0 (true) is not a u64");
    }

    #[test]
    fn test_decode_u64_le_pads_and_truncates() {
        assert_eq!(decode_u64_le(&[1]), 1);
        assert_eq!(decode_u64_le(&[0, 1]), 256);
        assert_eq!(decode_u64_le(&[1, 0, 0, 0, 0, 0, 0, 0, 9, 9]), 1);
        assert_eq!(decode_u64_le(&[]), 0);
    }
}
