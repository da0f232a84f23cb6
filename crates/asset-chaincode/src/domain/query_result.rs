//! # Query Result Serializer
//!
//! Renders a result cursor as one JSON array:
//!
//! ```text
//! [{"Key":"k1", "Record":{...}},{"Key":"k2", "Record":{...}}]
//! ```
//!
//! Records are stored JSON and are copied verbatim, not re-encoded.
//! Iteration order of the source is preserved.

use crate::errors::{ChaincodeError, ChaincodeResult, StoreError};
use crate::ports::KeyValue;

/// Render `(key, record)` results into the query response layout.
///
/// Fails only if the source yields an error, which is reported as a read
/// failure.
pub fn render_query_results<I>(results: I) -> ChaincodeResult<Vec<u8>>
where
    I: IntoIterator<Item = Result<KeyValue, StoreError>>,
{
    let mut buffer = Vec::with_capacity(64);
    buffer.push(b'[');

    let mut member_written = false;
    for result in results {
        let entry = result.map_err(StoreError::into_read_error)?;

        // Comma before every member except the first
        if member_written {
            buffer.push(b',');
        }
        buffer.extend_from_slice(b"{\"Key\":");
        serde_json::to_writer(&mut buffer, entry.key.as_str())
            .map_err(|e| ChaincodeError::Serialization(e.to_string()))?;
        buffer.extend_from_slice(b", \"Record\":");
        buffer.extend_from_slice(&entry.value);
        buffer.push(b'}');
        member_written = true;
    }

    buffer.push(b']');
    Ok(buffer)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kv(key: &str, value: &str) -> Result<KeyValue, StoreError> {
        Ok(KeyValue::new(key, value.as_bytes().to_vec()))
    }

    #[test]
    fn test_empty_sequence() {
        let out = render_query_results(Vec::<Result<KeyValue, StoreError>>::new()).unwrap();
        assert_eq!(out, b"[]");
    }

    #[test]
    fn test_exact_layout() {
        let out = render_query_results(vec![
            kv("k1", r#"{"a":1}"#),
            kv("k2", r#"{"b":2}"#),
        ])
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"[{"Key":"k1", "Record":{"a":1}},{"Key":"k2", "Record":{"b":2}}]"#
        );
    }

    #[test]
    fn test_output_is_valid_json() {
        let out = render_query_results(vec![
            kv("Asset1", r#"{"docType":"Asset","name":"Asset1","owner":"tom"}"#),
            kv("with\"quote", r#"{"x":true}"#),
        ])
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["Record"]["owner"], "tom");
        assert_eq!(parsed[1]["Key"], "with\"quote");
    }

    #[test]
    fn test_iteration_error_propagates() {
        let err = render_query_results(vec![
            kv("k1", "{}"),
            Err(StoreError::Iteration("cursor reset".to_string())),
        ])
        .unwrap_err();
        assert!(matches!(err, ChaincodeError::StoreRead(StoreError::Iteration(_))));
    }

    proptest! {
        #[test]
        fn prop_preserves_order(keys in proptest::collection::vec("[A-Za-z0-9]{1,8}", 0..16)) {
            let source: Vec<_> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| Ok(KeyValue::new(k.clone(), format!("{{\"i\":{i}}}").into_bytes())))
                .collect();
            let out = render_query_results(source).unwrap();
            let parsed: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
            prop_assert_eq!(parsed.len(), keys.len());
            for (i, (entry, key)) in parsed.iter().zip(&keys).enumerate() {
                prop_assert_eq!(entry["Key"].as_str(), Some(key.as_str()));
                prop_assert_eq!(entry["Record"]["i"].as_u64(), Some(i as u64));
            }
        }
    }
}
