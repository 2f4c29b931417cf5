//! External collaborators the submission route talks to before a job is
//! dispatched: the object store holding the uploaded CSV, and the table
//! metadata registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

/// Folder uploaded CSVs are keyed under
pub const OBJECT_KEY_PREFIX: &str = "images";

/// Final path component of a client-supplied filename. Fails for names with
/// no usable basename such as `""`, `..` or `dir/`.
pub fn upload_basename(filename: &str) -> Result<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| anyhow!("invalid upload filename: {filename:?}"))
}

/// `images/<millis>_<basename>`; any directory part of the client-supplied
/// name is dropped.
pub fn object_key_for(filename: &str) -> Result<String> {
    let base = upload_basename(filename)?;
    Ok(format!(
        "{}/{}_{}",
        OBJECT_KEY_PREFIX,
        chrono::Utc::now().timestamp_millis(),
        base
    ))
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes`, returning the object key the worker will read from
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Writes uploads below a local directory
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let key = object_key_for(filename)?;
        let path = self.root.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Uploaded {} ({} bytes) as {}", filename, bytes.len(), key);
        Ok(key)
    }
}

/// Keeps uploads in memory (tests, development)
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let key = object_key_for(filename)?;
        self.objects.write().insert(key.clone(), bytes);
        Ok(key)
    }
}

/// A survey table as recorded by the metadata store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub table_name: String,
    pub survey_id: String,
}

#[async_trait]
pub trait TableRegistry: Send + Sync {
    async fn create_table(&self, table_name: &str, survey_id: &str) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct MemoryTableRegistry {
    tables: Arc<RwLock<Vec<TableRecord>>>,
}

impl MemoryTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> Vec<TableRecord> {
        self.tables.read().clone()
    }
}

#[async_trait]
impl TableRegistry for MemoryTableRegistry {
    async fn create_table(&self, table_name: &str, survey_id: &str) -> Result<()> {
        self.tables.write().push(TableRecord {
            table_name: table_name.to_string(),
            survey_id: survey_id.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_strips_directories() {
        let key = object_key_for("../../etc/data.csv").unwrap();
        assert!(key.starts_with("images/"));
        assert!(key.ends_with("_data.csv"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn empty_filename_is_rejected() {
        assert!(object_key_for("").is_err());
        assert!(object_key_for("..").is_err());
        assert!(upload_basename("uploads/..").is_err());
        assert_eq!(upload_basename("a/b/data.csv").unwrap(), "data.csv");
    }

    #[tokio::test]
    async fn fs_store_writes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let key = store.upload("1_data.csv", b"a,b\n1,2\n".to_vec()).await.unwrap();
        let written = tokio::fs::read(dir.path().join(&key)).await.unwrap();
        assert_eq!(written, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn memory_registry_records_tables() {
        let registry = MemoryTableRegistry::new();
        registry.create_table("Q1", "s1").await.unwrap();
        assert_eq!(
            registry.tables(),
            vec![TableRecord { table_name: "Q1".into(), survey_id: "s1".into() }]
        );
    }
}
