//! Ledger exchange between the two import phases.
//!
//! A preview's ledger is written as a JSON object (URI to flag, sorted by
//! URI) so it can be reviewed and edited before it is handed to a commit.

use std::collections::BTreeMap;
use std::path::Path;

use schemaport_core::errors::{ExError, ExErrorKind, ExResult};
use schemaport_core::ledger::Ledger;
use schemaport_store::errors::io_error;

/// Pretty JSON rendering of a ledger, keys sorted
///
/// # Errors
///
/// Returns `ERR_SERIALIZATION` if encoding fails.
pub fn ledger_to_json(ledger: &Ledger) -> ExResult<String> {
    serde_json::to_string_pretty(ledger).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("encode_ledger")
            .with_message(e.to_string())
    })
}

/// Parse decisions from JSON text
///
/// # Errors
///
/// Returns `ERR_INVALID_INPUT` unless the text is an object of booleans.
pub fn ledger_from_json(text: &str) -> ExResult<Ledger> {
    let decisions: BTreeMap<String, bool> = serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("decode_ledger")
            .with_message(format!("ledger must map URIs to true/false: {}", e))
    })?;
    Ok(Ledger::from_decisions(decisions))
}

/// Read decisions written by [`write_ledger`] (or edited by hand)
///
/// # Errors
///
/// Returns `ERR_IO` if the file cannot be read, `ERR_INVALID_INPUT` if it
/// does not hold a ledger.
pub fn read_ledger<P: AsRef<Path>>(path: P) -> ExResult<Ledger> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(|e| io_error("read_ledger", e))?;
    ledger_from_json(&text)
}

/// Write a ledger as pretty JSON
///
/// # Errors
///
/// Returns `ERR_IO` if the file cannot be written.
pub fn write_ledger<P: AsRef<Path>>(path: P, ledger: &Ledger) -> ExResult<()> {
    let mut text = ledger_to_json(ledger)?;
    text.push('\n');
    std::fs::write(path.as_ref(), text).map_err(|e| io_error("write_ledger", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_sorted_by_uri() {
        let mut ledger = Ledger::new();
        ledger.record("http://a/views/z", true);
        ledger.record("http://a/views/a", false);

        let json = ledger_to_json(&ledger).unwrap();
        let a = json.find("views/a").unwrap();
        let z = json.find("views/z").unwrap();
        assert!(a < z);
    }

    #[test]
    fn test_non_boolean_values_are_rejected() {
        let err = ledger_from_json(r#"{"http://a/views/v": "yes"}"#).unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_INPUT");
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut ledger = Ledger::new();
        ledger.record("http://a/views/v", true);

        write_ledger(&path, &ledger).unwrap();
        let back = read_ledger(&path).unwrap();
        assert_eq!(back.get("http://a/views/v"), Some(true));
    }
}
