//! Catalog fixtures on disk.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use edulist_core::error::{Error, MalformedResponseError, TransportError};
use edulist_core::{Resource, Result};

fn map_io(path: &Path, err: io::Error) -> Error {
    Error::Transport(TransportError::Io {
        message: format!("{}: {}", path.display(), err),
    })
}

/// File contents, in any of the shapes the catalog API answers with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CollectionFile<T> {
    Colleges { colleges: Vec<T> },
    Data { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> CollectionFile<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            CollectionFile::Colleges { colleges } => colleges,
            CollectionFile::Data { data } => data,
            CollectionFile::Bare(items) => items,
        }
    }
}

/// A directory holding one JSON file per resource.
///
/// ```text
/// <root>/colleges.json   { "colleges": [...] }
/// <root>/exams.json      { "data": [...] }
/// <root>/blogs.json      { "data": [...] }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the file holding `resource`.
    pub fn path_for(&self, resource: Resource) -> PathBuf {
        self.root.join(format!("{}.json", resource))
    }

    /// Read every item of `resource`.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn read_collection<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        let path = self.path_for(resource);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| map_io(&path, err))?;

        let file: CollectionFile<T> = serde_json::from_slice(&bytes).map_err(|err| {
            warn!(path = %path.display(), error = %err, "malformed catalog file");
            MalformedResponseError::new(path.display().to_string(), err)
        })?;

        let items = file.into_items();
        debug!(count = items.len(), "read catalog file");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edulist_core::{Blog, Exam};
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_wrapped_and_bare_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("exams.json"),
            r#"{ "data": [{ "_id": "1", "name": "NEET" }] }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("blogs.json"),
            r#"[{ "_id": "b1", "title": "Visa guide" }]"#,
        )
        .unwrap();

        let store = FileStore::new(dir.path());
        let exams: Vec<Exam> = store.read_collection(Resource::Exams).await.unwrap();
        let blogs: Vec<Blog> = store.read_collection(Resource::Blogs).await.unwrap();
        assert_eq!(exams[0].name, "NEET");
        assert_eq!(blogs[0].title, "Visa guide");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let err = store.read_collection::<Exam>(Resource::Exams).await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Io { .. })));
        assert!(err.to_string().contains("exams.json"));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("exams.json"), r#"{ "exams": 3 }"#).unwrap();
        let store = FileStore::new(dir.path());

        let err = store.read_collection::<Exam>(Resource::Exams).await.unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }
}
