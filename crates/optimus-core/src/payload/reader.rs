use crate::Result;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Loads saved tool payloads for offline rendering.
pub struct PayloadReader;

impl PayloadReader {
    /// Read and parse a payload file from the given path
    pub fn from_file(path: &Path) -> Result<Value> {
        tracing::debug!("Reading payload from: {}", path.display());

        let content = fs::read_to_string(path)?;
        let payload = Self::from_str(&content)?;

        tracing::info!("Parsed payload from {}", path.display());

        Ok(payload)
    }

    /// Parse a payload from a JSON string
    pub fn from_str(content: &str) -> Result<Value> {
        tracing::debug!("Parsing payload from string");

        // An empty document is a tool that returned nothing, not a parse error
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(content)?)
    }

    /// Read a payload from any reader (stdin for piped input)
    pub fn from_reader(mut reader: impl Read) -> Result<Value> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payload_string() {
        let payload = PayloadReader::from_str(r#"{"applications": []}"#).unwrap();
        assert_eq!(payload, json!({"applications": []}));
    }

    #[test]
    fn test_blank_payload_is_null() {
        assert_eq!(PayloadReader::from_str("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(PayloadReader::from_str("{not json").is_err());
    }

    #[test]
    fn test_empty_file_matches_blank_string() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "").unwrap();

        assert_eq!(PayloadReader::from_file(&path).unwrap(), Value::Null);
        assert_eq!(
            PayloadReader::from_file(&path).unwrap(),
            PayloadReader::from_str("").unwrap()
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = PayloadReader::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_from_reader() {
        let payload = PayloadReader::from_reader("[1, 2]".as_bytes()).unwrap();
        assert_eq!(payload, json!([1, 2]));
    }
}
