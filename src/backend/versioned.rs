use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::document::{wrap_envelope, Document, DATA_KEY, VERSION_KEY};
use crate::errors::StoreError;

use super::file::FileBackend;
use super::StorageBackend;

/// A single named migration step advancing a document one version.
///
/// Steps receive the backing file alongside the document, so a migration can
/// reach the storage location itself, such as to read a sibling file.
pub struct Migration {
    name: String,
    apply: Box<dyn FnOnce(&FileBackend, &mut Document) -> anyhow::Result<()> + Send>,
}

impl Migration {
    pub fn new(
        name: impl Into<String>,
        apply: impl FnOnce(&FileBackend, &mut Document) -> anyhow::Result<()> + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            apply: Box::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Produces the ordered migration steps taking a document from
/// `actual_version` to `expected_version`. Steps are applied strictly in
/// returned order, each exactly once.
pub type MigrationCollector =
    Box<dyn Fn(&FileBackend, u64, u64) -> anyhow::Result<Vec<Migration>> + Send + Sync>;

/// File backend maintaining a `{version, data}` envelope around its document.
///
/// Data behind the expected version is upgraded in place by the collected
/// migrations, eagerly during the read that finds it behind, and immediately
/// written back so a crash between migration and use can never re-run a
/// partial migration against an already-migrated file. A timestamped backup
/// is retained before any destructive rewrite.
pub struct VersionedFileBackend {
    file: FileBackend,
    version: u64,
    migrate: MigrationCollector,
}

impl VersionedFileBackend {
    /// The target version and migration collector are injected here; there is
    /// no implicit global wiring.
    pub fn new(file: FileBackend, version: u64, migrate: MigrationCollector) -> Self {
        Self {
            file,
            version,
            migrate,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn extract_version(wrapper: &Document) -> Result<Option<u64>, StoreError> {
        match wrapper.get(VERSION_KEY) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| StoreError::Storage(format!("invalid version field: {n}"))),
            Some(other) => Err(StoreError::Storage(format!(
                "invalid version field: {other}"
            ))),
        }
    }

    fn apply_migrations(
        &self,
        actual_version: u64,
        data: &mut Document,
    ) -> Result<(), StoreError> {
        let failed = |source: anyhow::Error| StoreError::FailedMigration {
            expected: self.version,
            actual: actual_version,
            source: source.into(),
        };
        let migrations =
            (self.migrate)(&self.file, actual_version, self.version).map_err(failed)?;
        if !migrations.is_empty() {
            warn!(count = migrations.len(), "applying data migrations");
            for migration in migrations {
                warn!(name = migration.name.as_str(), "applying migration");
                (migration.apply)(&self.file, data).map_err(failed)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for VersionedFileBackend {
    fn persistent(&self) -> bool {
        self.file.persistent()
    }

    /// Read the enveloped document, upgrading it if necessary.
    ///
    /// A file without a `version` key is a legacy unversioned file and is
    /// wholly treated as data. Note that a legacy file which happens to carry
    /// a `version` key of its own is classified as enveloped; there is no
    /// further disambiguation.
    async fn read(&self) -> Result<Document, StoreError> {
        let wrapper = self.file.read().await?;
        let Some(actual_version) = Self::extract_version(&wrapper)? else {
            // Legacy unversioned file: back up the original, then immediately
            // rewrite it wrapped at the expected version.
            warn!(
                version = self.version,
                "data is unversioned, assuming expected version"
            );
            self.file.backup().await?;
            self.write(&wrapper).await?;
            return Ok(wrapper);
        };
        let mut data = match wrapper.get(DATA_KEY) {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(StoreError::Storage(format!("invalid data field: {other}")))
            }
            None => Document::new(),
        };
        if actual_version < self.version {
            warn!(
                from_version = actual_version,
                to_version = self.version,
                "migrating data"
            );
            self.apply_migrations(actual_version, &mut data)?;
            self.file.backup().await?;
            self.write(&data).await?;
            warn!("data migration complete");
        } else if actual_version > self.version {
            return Err(StoreError::BackwardsMigration {
                expected: self.version,
                actual: actual_version,
            });
        }
        Ok(data)
    }

    /// Writes always wrap the document at the expected version.
    async fn write(&self, document: &Document) -> Result<(), StoreError> {
        self.file
            .write(&wrap_envelope(self.version, document.clone()))
            .await
    }
}
