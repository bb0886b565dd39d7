//! Core data model: the selected document and the parameter map returned by
//! the extraction service.

use crate::types::{AppError, AppResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;

/// File extensions offered to the user. Advisory only; the bytes are never
/// inspected.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// A document chosen for analysis.
///
/// Replaced wholesale on every selection, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    filename: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(
        filename: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Build from a filename and payload, guessing the media type from the
    /// extension.
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let media_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self::new(filename, media_type, bytes)
    }

    /// Read a document from disk.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| AppError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        if !metadata.is_file() {
            return Err(AppError::NotAFile(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AppError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        Ok(Self::from_bytes(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the extension is one of [`ACCEPTED_EXTENSIONS`].
    pub fn has_accepted_extension(&self) -> bool {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            })
            .unwrap_or(false)
    }
}

/// A single extracted value.
///
/// Nested arrays and objects are kept verbatim so nothing the service
/// returns is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Nested(Value),
}

impl From<Value> for ParameterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParameterValue::Null,
            Value::Bool(b) => ParameterValue::Bool(b),
            Value::Number(n) => ParameterValue::Number(n),
            Value::String(s) => ParameterValue::Text(s),
            nested @ (Value::Array(_) | Value::Object(_)) => ParameterValue::Nested(nested),
        }
    }
}

impl From<&ParameterValue> for Value {
    fn from(value: &ParameterValue) -> Self {
        match value {
            ParameterValue::Null => Value::Null,
            ParameterValue::Bool(b) => Value::Bool(*b),
            ParameterValue::Number(n) => Value::Number(n.clone()),
            ParameterValue::Text(s) => Value::String(s.clone()),
            ParameterValue::Nested(v) => v.clone(),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Null => write!(f, "null"),
            ParameterValue::Bool(b) => write!(f, "{}", b),
            ParameterValue::Number(n) => write!(f, "{}", n),
            ParameterValue::Text(s) => write!(f, "{}", s),
            // Compact single-line JSON
            ParameterValue::Nested(v) => write!(f, "{}", v),
        }
    }
}

/// Parameter name to value, in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v)))
                .collect(),
        )
    }
}

// Requires serde_json's `preserve_order` feature so the map iterates in
// document order.
impl From<Map<String, Value>> for ParameterMap {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, ParameterValue::from(v)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::Text(s.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        ParameterValue::Text(s)
    }
}

impl From<i64> for ParameterValue {
    fn from(n: i64) -> Self {
        ParameterValue::Number(n.into())
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        ParameterValue::Bool(b)
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, &Value::from(v))?;
        }
        map.end()
    }
}
