use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// One language's localization data: string leaves nested under string keys
/// to arbitrary depth.
///
/// Key order is insertion order and survives parsing, flattening,
/// reconstruction, and serialization. Flattened positions are matched back to
/// their keys purely by index, so this ordering is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TreeValue {
    Node(IndexMap<String, TreeValue>),
    Leaf(String),
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the top level must be an object")]
    RootNotObject,
    #[error("unsupported value at '{path}': found {found}, expected a string or a nested object")]
    UnsupportedValue { path: String, found: &'static str },
}

impl TreeValue {
    /// Parse a language file body, checking that every value is either a
    /// string or a nested object of such values.
    pub fn from_json_str(raw: &str) -> Result<TreeValue, TreeError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(TreeError::RootNotObject);
        }
        let mut path = Vec::new();
        from_value(value, &mut path)
    }

    /// Serialize with tab indentation, the output format of the language
    /// files.
    pub fn to_json_pretty(&self) -> Result<String> {
        to_tab_json(self)
    }
}

fn from_value(value: serde_json::Value, path: &mut Vec<String>) -> Result<TreeValue, TreeError> {
    match value {
        serde_json::Value::String(text) => Ok(TreeValue::Leaf(text)),
        serde_json::Value::Object(entries) => {
            let mut node = IndexMap::with_capacity(entries.len());
            for (key, child) in entries {
                path.push(key.clone());
                let child = from_value(child, path)?;
                path.pop();
                node.insert(key, child);
            }
            Ok(TreeValue::Node(node))
        }
        other => Err(TreeError::UnsupportedValue {
            path: path.join("."),
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Serialize any value as pretty JSON indented with tabs.
pub fn to_tab_json<T: Serialize>(value: &T) -> Result<String> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("Failed to serialize to JSON")?;
    String::from_utf8(buf).context("Serialized JSON was not valid UTF-8")
}

/// Read and parse the language file `name` inside `dir`.
pub fn read_tree(dir: &Path, name: &str) -> Result<TreeValue> {
    let path = dir.join(name);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read language file {}", path.display()))?;
    TreeValue::from_json_str(&raw)
        .with_context(|| format!("{} is not a valid language file", path.display()))
}

/// Write `tree` as a tab-indented JSON language file `name` inside `dir`.
pub fn write_tree(dir: &Path, name: &str, tree: &TreeValue) -> Result<()> {
    let path = dir.join(name);
    let pretty = tree.to_json_pretty()?;
    fs::write(&path, pretty).with_context(|| format!("Could not write file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_nested_object() {
        let tree = TreeValue::from_json_str(r#"{"a": {"b": "Hello", "c": "World"}}"#)
            .expect("Should parse");

        let TreeValue::Node(root) = &tree else {
            panic!("Root should be a node");
        };
        assert_eq!(root.len(), 1);

        let TreeValue::Node(inner) = &root["a"] else {
            panic!("'a' should be a node");
        };
        assert_eq!(inner["b"], TreeValue::Leaf("Hello".to_string()));
        assert_eq!(inner["c"], TreeValue::Leaf("World".to_string()));
    }

    #[test]
    fn test_parse_empty_object() {
        let tree = TreeValue::from_json_str("{}").expect("Should parse");
        assert_eq!(tree, TreeValue::Node(IndexMap::new()));
    }

    #[test]
    fn test_parse_preserves_key_order() {
        // Keys deliberately in non-alphabetical order
        let raw = r#"{"zebra": "Z", "apple": "A", "mango": "M"}"#;
        let tree = TreeValue::from_json_str(raw).expect("Should parse");

        let TreeValue::Node(root) = &tree else {
            panic!("Root should be a node");
        };
        let keys: Vec<&str> = root.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = TreeValue::from_json_str("{not json");
        assert!(matches!(result, Err(TreeError::Json(_))));
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        for raw in [r#""just a string""#, "42", "[1, 2]", "true", "null"] {
            let result = TreeValue::from_json_str(raw);
            assert!(
                matches!(result, Err(TreeError::RootNotObject)),
                "Root {} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_parse_rejects_number_leaf() {
        let result = TreeValue::from_json_str(r#"{"menu": {"count": 3}}"#);
        match result {
            Err(TreeError::UnsupportedValue { path, found }) => {
                assert_eq!(path, "menu.count");
                assert_eq!(found, "a number");
            }
            other => panic!("Expected UnsupportedValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_array_leaf() {
        let result = TreeValue::from_json_str(r#"{"items": ["a", "b"]}"#);
        match result {
            Err(TreeError::UnsupportedValue { path, found }) => {
                assert_eq!(path, "items");
                assert_eq!(found, "an array");
            }
            other => panic!("Expected UnsupportedValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_null_leaf() {
        let result = TreeValue::from_json_str(r#"{"a": null}"#);
        assert!(matches!(
            result,
            Err(TreeError::UnsupportedValue { found: "null", .. })
        ));
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_pretty_output_uses_tabs() {
        let tree = TreeValue::from_json_str(r#"{"a": {"b": "Hello"}}"#).expect("Should parse");
        let pretty = tree.to_json_pretty().expect("Should serialize");

        assert_eq!(pretty, "{\n\t\"a\": {\n\t\t\"b\": \"Hello\"\n\t}\n}");
    }

    #[test]
    fn test_pretty_output_keeps_key_order() {
        let raw = "{\n\t\"zebra\": \"Z\",\n\t\"apple\": \"A\"\n}";
        let tree = TreeValue::from_json_str(raw).expect("Should parse");
        let pretty = tree.to_json_pretty().expect("Should serialize");

        assert_eq!(pretty, raw);
    }

    // ==================== File Helper Tests ====================

    #[test]
    fn test_read_write_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let tree =
            TreeValue::from_json_str(r#"{"greeting": {"morning": "Good morning"}}"#).unwrap();

        write_tree(temp_dir.path(), "en.json", &tree).expect("Should write");
        let restored = read_tree(temp_dir.path(), "en.json").expect("Should read");

        assert_eq!(restored, tree);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = read_tree(temp_dir.path(), "nope.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_read_unparseable_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("bad.json"), "{oops").unwrap();

        let result = read_tree(temp_dir.path(), "bad.json");
        assert!(result.is_err());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("not a valid language file"));
    }
}
