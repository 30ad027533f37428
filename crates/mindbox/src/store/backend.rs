use super::Collection;
use crate::error::Result;
use crate::model::{BoxNode, Keyword, Thought};
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while EntityStore handles the "what" (mutations, cascades, notification).
pub trait StorageBackend {
    /// Load the box table. A table that was never written loads as empty.
    fn load_boxes(&self) -> Result<Vec<BoxNode>>;

    /// Replace the stored box table.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_boxes(&self, boxes: &[BoxNode]) -> Result<()>;

    fn load_thoughts(&self) -> Result<Vec<Thought>>;

    fn save_thoughts(&self, thoughts: &[Thought]) -> Result<()>;

    fn load_keywords(&self) -> Result<Vec<Keyword>>;

    fn save_keywords(&self, keywords: &[Keyword]) -> Result<()>;

    /// Where a table lives. For FsBackend this is the real path,
    /// for MemBackend a virtual one.
    fn location(&self, collection: Collection) -> PathBuf;
}
