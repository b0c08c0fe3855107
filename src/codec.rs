use crate::document::Document;
use crate::errors::StoreError;

/// Serialization strategy for a file or remote backend.
///
/// Resolved once at configuration time from the location's trailing
/// extension; unknown extensions are a configuration error rather than a
/// silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Json,
    Yaml,
}

impl Codec {
    /// Resolve the codec for a file path or URL by its trailing extension.
    pub fn for_location(location: &str) -> Result<Self, StoreError> {
        if location.ends_with(".json") {
            Ok(Self::Json)
        } else if location.ends_with(".yaml") || location.ends_with(".yml") {
            Ok(Self::Yaml)
        } else {
            Err(StoreError::Config(format!(
                "unsupported file type for database location: {location}"
            )))
        }
    }

    /// Parse a document from text.
    pub fn parse(&self, raw: &str) -> Result<Document, StoreError> {
        match self {
            Self::Json => {
                serde_json::from_str(raw).map_err(|e| StoreError::Storage(e.to_string()))
            }
            Self::Yaml => {
                serde_yaml::from_str(raw).map_err(|e| StoreError::Storage(e.to_string()))
            }
        }
    }

    /// Serialize a document to text. JSON is written pretty with a 2-space
    /// indent; YAML uses the safe subset only.
    pub fn serialize(&self, document: &Document) -> Result<String, StoreError> {
        match self {
            Self::Json => serde_json::to_string_pretty(document)
                .map_err(|e| StoreError::Storage(e.to_string())),
            Self::Yaml => {
                serde_yaml::to_string(document).map_err(|e| StoreError::Storage(e.to_string()))
            }
        }
    }
}
