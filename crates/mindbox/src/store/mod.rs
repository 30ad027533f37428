//! # Storage Layer
//!
//! The storage layer owns the three entity tables and is the single source of
//! truth for them. It is split in two layers:
//!
//! - [`backend::StorageBackend`] handles the "how" of durable I/O (filesystem
//!   vs memory).
//! - [`entity_store::EntityStore`] handles the "what": mutations, relationship
//!   rules, commit/rollback and change notification.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── boxes.json      # [BoxNode, ...] in store order
//! ├── thoughts.json   # [Thought, ...]
//! └── keywords.json   # [Keyword, ...]
//! ```
//!
//! Each file is rewritten in full whenever its table changes. A missing file
//! is an empty table.
//!
//! ## Commit Protocol
//!
//! Every write follows the same sequence and never skips or reorders a step:
//!
//! 1. **Stage**: copy the tables and apply the mutation to the copy, including
//!    cascade/cleanup rules from [`crate::relations`].
//! 2. **Persist**: write every table the mutation touched.
//! 3. **Swap**: the staged copy becomes the live state.
//! 4. **Notify**: publish a fresh snapshot of each touched table.
//!
//! If step 2 fails, tables already written during that commit are rewritten
//! with their previous contents, the live state is left as it was, nobody is
//! notified, and the caller gets a `PersistenceError`. Observers therefore
//! only ever see committed, durable state.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON file per table, atomic writes.
//! - [`mem_backend::MemBackend`]: for tests, with write-error simulation.

use crate::model::{BoxNode, Keyword, Thought};
use indexmap::IndexMap;
use std::fmt;
use uuid::Uuid;

pub mod backend;
pub mod entity_store;
pub mod fs_backend;
pub mod mem_backend;
pub mod subscription;

/// One of the three persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Boxes,
    Thoughts,
    Keywords,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Boxes, Collection::Thoughts, Collection::Keywords];

    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Boxes => "boxes.json",
            Collection::Thoughts => "thoughts.json",
            Collection::Keywords => "keywords.json",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Boxes => write!(f, "boxes"),
            Collection::Thoughts => write!(f, "thoughts"),
            Collection::Keywords => write!(f, "keywords"),
        }
    }
}

/// The three tables, keyed by id, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub boxes: IndexMap<Uuid, BoxNode>,
    pub thoughts: IndexMap<Uuid, Thought>,
    pub keywords: IndexMap<Uuid, Keyword>,
}

impl Tables {
    pub fn from_records(boxes: Vec<BoxNode>, thoughts: Vec<Thought>, keywords: Vec<Keyword>) -> Self {
        Self {
            boxes: boxes.into_iter().map(|b| (b.id, b)).collect(),
            thoughts: thoughts.into_iter().map(|t| (t.id, t)).collect(),
            keywords: keywords.into_iter().map(|k| (k.id, k)).collect(),
        }
    }

    pub fn box_list(&self) -> Vec<BoxNode> {
        self.boxes.values().cloned().collect()
    }

    pub fn thought_list(&self) -> Vec<Thought> {
        self.thoughts.values().cloned().collect()
    }

    pub fn keyword_list(&self) -> Vec<Keyword> {
        self.keywords.values().cloned().collect()
    }
}

/// Which tables a staged mutation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub boxes: bool,
    pub thoughts: bool,
    pub keywords: bool,
}

impl Touched {
    pub const NONE: Touched = Touched {
        boxes: false,
        thoughts: false,
        keywords: false,
    };
    pub const BOXES: Touched = Touched {
        boxes: true,
        ..Touched::NONE
    };
    pub const THOUGHTS: Touched = Touched {
        thoughts: true,
        ..Touched::NONE
    };
    pub const KEYWORDS: Touched = Touched {
        keywords: true,
        ..Touched::NONE
    };

    pub fn is_empty(&self) -> bool {
        !(self.boxes || self.thoughts || self.keywords)
    }

    pub fn union(self, other: Touched) -> Touched {
        Touched {
            boxes: self.boxes || other.boxes,
            thoughts: self.thoughts || other.thoughts,
            keywords: self.keywords || other.keywords,
        }
    }

    /// Touched tables in persist order: boxes, thoughts, keywords.
    pub fn collections(&self) -> Vec<Collection> {
        Collection::ALL
            .iter()
            .copied()
            .filter(|c| match c {
                Collection::Boxes => self.boxes,
                Collection::Thoughts => self.thoughts,
                Collection::Keywords => self.keywords,
            })
            .collect()
    }
}

/// What a delete (or unlink) removed or modified, cascades included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Removed boxes, descendants before ancestors.
    pub removed_boxes: Vec<Uuid>,
    pub removed_thoughts: Vec<Uuid>,
    pub removed_keywords: Vec<Uuid>,
    /// Keywords that survived but lost one or more thought references.
    pub updated_keywords: Vec<Uuid>,
}

impl CascadeReport {
    pub fn is_empty(&self) -> bool {
        self.removed_boxes.is_empty()
            && self.removed_thoughts.is_empty()
            && self.removed_keywords.is_empty()
            && self.updated_keywords.is_empty()
    }

    pub fn touched(&self) -> Touched {
        Touched {
            boxes: !self.removed_boxes.is_empty(),
            thoughts: !self.removed_thoughts.is_empty(),
            keywords: !self.removed_keywords.is_empty() || !self.updated_keywords.is_empty(),
        }
    }

    pub(crate) fn note_updated_keyword(&mut self, id: Uuid) {
        if !self.updated_keywords.contains(&id) {
            self.updated_keywords.push(id);
        }
    }

    pub(crate) fn note_removed_keyword(&mut self, id: Uuid) {
        self.updated_keywords.retain(|k| *k != id);
        if !self.removed_keywords.contains(&id) {
            self.removed_keywords.push(id);
        }
    }
}

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    /// Boxes whose parent was missing or sat on a cycle; now top-level.
    pub reparented_boxes: usize,
    /// Thoughts whose box no longer exists.
    pub removed_orphan_thoughts: usize,
    /// Keyword references to thoughts that no longer exist.
    pub removed_dangling_refs: usize,
    /// Repeated thought ids inside a single keyword.
    pub collapsed_duplicate_refs: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        *self == DoctorReport::default()
    }
}
