use serde::Deserialize;

use crate::document::Document;

/// Backend selection value, as it appears in the host's configuration.
///
/// A string is a location (file path or http(s) URL); an inline mapping seeds
/// an in-memory backend. An absent or null value is represented by the
/// surrounding `Option`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DbOptions {
    Location(String),
    Seed(Document),
}

/// Static per-extension options carrying the optional database value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreOptions {
    #[serde(default)]
    pub database: Option<DbOptions>,
}
