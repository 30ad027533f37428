use super::backend::StorageBackend;
use super::Collection;
use crate::error::{PersistenceError, Result};
use crate::model::{BoxNode, Keyword, Thought};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded.
/// This allows the `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    boxes: RefCell<Vec<BoxNode>>,
    thoughts: RefCell<Vec<Thought>>,
    keywords: RefCell<Vec<Keyword>>,
    simulate_write_error: Cell<bool>,
    failing: RefCell<HashSet<Collection>>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the backend as if the tables had been written earlier.
    pub fn with_records(boxes: Vec<BoxNode>, thoughts: Vec<Thought>, keywords: Vec<Keyword>) -> Self {
        let backend = Self::new();
        *backend.boxes.borrow_mut() = boxes;
        *backend.thoughts.borrow_mut() = thoughts;
        *backend.keywords.borrow_mut() = keywords;
        backend
    }

    /// Enable write error simulation for every table.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make writes to a single table fail (or succeed again).
    pub fn set_failing(&self, collection: Collection, failing: bool) {
        let mut set = self.failing.borrow_mut();
        if failing {
            set.insert(collection);
        } else {
            set.remove(&collection);
        }
    }

    /// Number of successful table writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_write(&self, collection: Collection) -> Result<()> {
        if self.simulate_write_error.get() || self.failing.borrow().contains(&collection) {
            return Err(PersistenceError::Store(format!(
                "Simulated write error for {}",
                collection
            ))
            .into());
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_boxes(&self) -> Result<Vec<BoxNode>> {
        Ok(self.boxes.borrow().clone())
    }

    fn save_boxes(&self, boxes: &[BoxNode]) -> Result<()> {
        self.check_write(Collection::Boxes)?;
        *self.boxes.borrow_mut() = boxes.to_vec();
        Ok(())
    }

    fn load_thoughts(&self) -> Result<Vec<Thought>> {
        Ok(self.thoughts.borrow().clone())
    }

    fn save_thoughts(&self, thoughts: &[Thought]) -> Result<()> {
        self.check_write(Collection::Thoughts)?;
        *self.thoughts.borrow_mut() = thoughts.to_vec();
        Ok(())
    }

    fn load_keywords(&self) -> Result<Vec<Keyword>> {
        Ok(self.keywords.borrow().clone())
    }

    fn save_keywords(&self, keywords: &[Keyword]) -> Result<()> {
        self.check_write(Collection::Keywords)?;
        *self.keywords.borrow_mut() = keywords.to_vec();
        Ok(())
    }

    fn location(&self, collection: Collection) -> PathBuf {
        PathBuf::from(format!("memory://{}", collection.file_name()))
    }
}
