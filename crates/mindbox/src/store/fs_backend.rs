use super::backend::StorageBackend;
use super::Collection;
use crate::error::{PersistenceError, Result};
use crate::model::{BoxNode, Keyword, Thought};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PersistenceError::Io)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let path = self.location(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(PersistenceError::Io)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<T> =
            serde_json::from_str(&content).map_err(PersistenceError::Serialization)?;
        Ok(records)
    }

    fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        self.ensure_dir()?;

        let target = self.location(collection);
        let content =
            serde_json::to_string_pretty(records).map_err(PersistenceError::Serialization)?;

        // Atomic write
        let tmp_file = self
            .root
            .join(format!(".{}-{}.tmp", collection, Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(PersistenceError::Io)?;
        if let Err(err) = fs::rename(&tmp_file, &target) {
            let _ = fs::remove_file(&tmp_file);
            return Err(PersistenceError::Io(err).into());
        }

        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_boxes(&self) -> Result<Vec<BoxNode>> {
        self.load(Collection::Boxes)
    }

    fn save_boxes(&self, boxes: &[BoxNode]) -> Result<()> {
        self.save(Collection::Boxes, boxes)
    }

    fn load_thoughts(&self) -> Result<Vec<Thought>> {
        self.load(Collection::Thoughts)
    }

    fn save_thoughts(&self, thoughts: &[Thought]) -> Result<()> {
        self.save(Collection::Thoughts, thoughts)
    }

    fn load_keywords(&self) -> Result<Vec<Keyword>> {
        self.load(Collection::Keywords)
    }

    fn save_keywords(&self, keywords: &[Keyword]) -> Result<()> {
        self.save(Collection::Keywords, keywords)
    }

    fn location(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }
}
