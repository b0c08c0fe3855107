use serde_json::Value;

/// The storage unit: an arbitrary JSON/YAML-representable mapping. No schema
/// is enforced beyond the versioning envelope.
pub type Document = serde_json::Map<String, Value>;

pub(crate) const VERSION_KEY: &str = "version";
pub(crate) const DATA_KEY: &str = "data";

/// Wrap a document in the on-disk `{version, data}` envelope.
pub(crate) fn wrap_envelope(version: u64, data: Document) -> Document {
    let mut wrapper = Document::new();
    wrapper.insert(VERSION_KEY.to_string(), Value::from(version));
    wrapper.insert(DATA_KEY.to_string(), Value::Object(data));
    wrapper
}
