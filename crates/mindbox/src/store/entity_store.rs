use super::backend::StorageBackend;
use super::subscription::{Publisher, Subscription};
use super::{CascadeReport, Collection, DoctorReport, Tables, Touched};
use crate::clock::{Clock, IdSource, RandomIds, SystemClock};
use crate::color::{BoxColor, KeywordColor};
use crate::error::{EntityKind, MindBoxError, Result};
use crate::model::{
    normalize_name, BoxNode, Keyword, Thought, ThoughtStatus, DEFAULT_BOX_NAME,
    DEFAULT_THOUGHT_TITLE,
};
use crate::relations::{self, KeywordPolicy};
use crate::selection::SelectionController;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of [`EntityStore::search_keywords`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSearch {
    /// Keywords whose name contains the term, case-insensitively, in store order.
    pub matches: Vec<Keyword>,
    /// The trimmed term, when it is non-empty and no keyword has exactly that name.
    pub create_candidate: Option<String>,
}

pub struct EntityStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    tables: Tables,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    policy: KeywordPolicy,
    box_feed: Publisher<BoxNode>,
    thought_feed: Publisher<Thought>,
    keyword_feed: Publisher<Keyword>,
}

impl<B: StorageBackend> EntityStore<B> {
    /// Loads all three tables from `backend`.
    pub fn open(backend: B) -> Result<Self> {
        let tables = Tables::from_records(
            backend.load_boxes()?,
            backend.load_thoughts()?,
            backend.load_keywords()?,
        );
        debug!(
            boxes = tables.boxes.len(),
            thoughts = tables.thoughts.len(),
            keywords = tables.keywords.len(),
            "opened entity store"
        );

        Ok(Self {
            backend,
            tables,
            clock: Box::new(SystemClock),
            ids: Box::new(RandomIds),
            policy: KeywordPolicy::default(),
            box_feed: Publisher::default(),
            thought_feed: Publisher::default(),
            keyword_feed: Publisher::default(),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_keyword_policy(mut self, policy: KeywordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn keyword_policy(&self) -> KeywordPolicy {
        self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn location(&self, collection: Collection) -> PathBuf {
        self.backend.location(collection)
    }

    // --- Subscriptions ---

    pub fn subscribe_boxes(&self) -> Subscription<BoxNode> {
        self.box_feed.subscribe(self.tables.box_list())
    }

    pub fn subscribe_thoughts(&self) -> Subscription<Thought> {
        self.thought_feed.subscribe(self.tables.thought_list())
    }

    pub fn subscribe_keywords(&self) -> Subscription<Keyword> {
        self.keyword_feed.subscribe(self.tables.keyword_list())
    }

    /// A fresh selection controller, subscribed to all three tables.
    ///
    /// Every view that needs its own focus gets its own controller.
    pub fn selection(&self) -> SelectionController {
        SelectionController::new(
            self.subscribe_boxes(),
            self.subscribe_thoughts(),
            self.subscribe_keywords(),
        )
    }

    // --- Queries ---

    pub fn boxes(&self) -> Vec<BoxNode> {
        self.tables.box_list()
    }

    pub fn thoughts(&self) -> Vec<Thought> {
        self.tables.thought_list()
    }

    pub fn keywords(&self) -> Vec<Keyword> {
        self.tables.keyword_list()
    }

    pub fn box_by_id(&self, id: Uuid) -> Option<BoxNode> {
        self.tables.boxes.get(&id).cloned()
    }

    pub fn thought(&self, id: Uuid) -> Option<Thought> {
        self.tables.thoughts.get(&id).cloned()
    }

    pub fn keyword(&self, id: Uuid) -> Option<Keyword> {
        self.tables.keywords.get(&id).cloned()
    }

    pub fn top_level_boxes(&self) -> Vec<BoxNode> {
        self.tables
            .boxes
            .values()
            .filter(|b| b.is_top_level())
            .cloned()
            .collect()
    }

    pub fn child_boxes(&self, parent: Uuid) -> Vec<BoxNode> {
        self.tables
            .boxes
            .values()
            .filter(|b| b.parent_box_id == Some(parent))
            .cloned()
            .collect()
    }

    /// The box and its ancestors, root first.
    pub fn box_path(&self, id: Uuid) -> Result<Vec<BoxNode>> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);

        while let Some(cur) = current {
            if !seen.insert(cur) {
                break;
            }
            let node = self
                .tables
                .boxes
                .get(&cur)
                .ok_or_else(|| MindBoxError::not_found(EntityKind::Box, cur))?;
            path.push(node.clone());
            current = node.parent_box_id;
        }

        path.reverse();
        Ok(path)
    }

    pub fn search_keywords(&self, term: &str) -> KeywordSearch {
        let needle = term.trim().to_lowercase();
        let matches: Vec<Keyword> = self
            .tables
            .keywords
            .values()
            .filter(|k| k.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let exact = self
            .tables
            .keywords
            .values()
            .any(|k| k.name.trim().to_lowercase() == needle);
        let create_candidate = if needle.is_empty() || exact {
            None
        } else {
            Some(term.trim().to_string())
        };

        KeywordSearch {
            matches,
            create_candidate,
        }
    }

    // --- Boxes ---

    pub fn create_box(&mut self, parent: Option<Uuid>) -> Result<BoxNode> {
        self.create_box_with(parent, None, None)
    }

    /// Creates a box with its name and color already set, in a single commit.
    pub fn create_box_with(
        &mut self,
        parent: Option<Uuid>,
        name: Option<&str>,
        color: Option<BoxColor>,
    ) -> Result<BoxNode> {
        if let Some(parent_id) = parent {
            if !self.tables.boxes.contains_key(&parent_id) {
                return Err(MindBoxError::not_found(EntityKind::Box, parent_id));
            }
        }

        let mut node = BoxNode::new(self.ids.next_id(), self.clock.now(), parent);
        if let Some(name) = name {
            node.name = normalize_name(name, DEFAULT_BOX_NAME);
        }
        if let Some(color) = color {
            node.color = color;
        }
        let mut staged = self.tables.clone();
        staged.boxes.insert(node.id, node.clone());
        self.commit(staged, Touched::BOXES)?;
        Ok(node)
    }

    /// Empty names fall back to "New Box".
    pub fn rename_box(&mut self, id: Uuid, name: &str) -> Result<bool> {
        let name = normalize_name(name, DEFAULT_BOX_NAME);
        let now = self.clock.now();
        self.edit_box(id, |node| {
            if node.name == name {
                return false;
            }
            node.name = name;
            node.update_date = now;
            true
        })
    }

    pub fn recolor_box(&mut self, id: Uuid, color: BoxColor) -> Result<bool> {
        self.edit_box(id, |node| {
            if node.color == color {
                return false;
            }
            node.color = color;
            true
        })
    }

    pub fn set_box_expanded(&mut self, id: Uuid, expanded: bool) -> Result<bool> {
        self.edit_box(id, |node| {
            if node.expanded == expanded {
                return false;
            }
            node.expanded = expanded;
            true
        })
    }

    /// Reparents a box; `None` moves it to the top level.
    pub fn move_box(&mut self, id: Uuid, new_parent: Option<Uuid>) -> Result<bool> {
        let mut staged = self.tables.clone();
        if !relations::on_reparent_box(&mut staged, id, new_parent, self.clock.now())? {
            return Ok(false);
        }
        self.commit(staged, Touched::BOXES)?;
        Ok(true)
    }

    /// Deletes the box, every descendant box and all their thoughts.
    pub fn delete_box(&mut self, id: Uuid) -> Result<CascadeReport> {
        let mut staged = self.tables.clone();
        let report = relations::on_delete_box(&mut staged, id, self.policy)?;
        self.commit(staged, report.touched())?;
        Ok(report)
    }

    // --- Thoughts ---

    pub fn create_thought(&mut self, box_id: Uuid) -> Result<Thought> {
        self.create_thought_with(box_id, None, None)
    }

    /// Creates a thought with title and Markdown body, in a single commit.
    pub fn create_thought_with(
        &mut self,
        box_id: Uuid,
        title: Option<&str>,
        formatted_body: Option<&str>,
    ) -> Result<Thought> {
        if !self.tables.boxes.contains_key(&box_id) {
            return Err(MindBoxError::not_found(EntityKind::Box, box_id));
        }

        let mut thought = Thought::new(self.ids.next_id(), box_id, self.clock.now());
        if let Some(title) = title {
            thought.title = normalize_name(title, DEFAULT_THOUGHT_TITLE);
        }
        if let Some(body) = formatted_body {
            thought.set_formatted_body(body);
        }
        let mut staged = self.tables.clone();
        staged.thoughts.insert(thought.id, thought.clone());
        self.commit(staged, Touched::THOUGHTS)?;
        Ok(thought)
    }

    /// Empty titles fall back to "New Thought".
    pub fn rename_thought(&mut self, id: Uuid, title: &str) -> Result<bool> {
        let title = normalize_name(title, DEFAULT_THOUGHT_TITLE);
        let now = self.clock.now();
        self.edit_thought(id, |thought| {
            if thought.title == title {
                return false;
            }
            thought.title = title;
            thought.update_date = now;
            true
        })
    }

    pub fn set_thought_status(&mut self, id: Uuid, status: ThoughtStatus) -> Result<bool> {
        let status = status.normalized();
        self.edit_thought(id, |thought| {
            if thought.status == status {
                return false;
            }
            thought.status = status;
            true
        })
    }

    /// Replaces the Markdown body; the plain-text `body` follows.
    pub fn set_thought_body(&mut self, id: Uuid, formatted: &str) -> Result<bool> {
        let now = self.clock.now();
        self.edit_thought(id, |thought| {
            if thought.formatted_body == formatted {
                return false;
            }
            thought.set_formatted_body(formatted);
            thought.update_date = now;
            true
        })
    }

    pub fn delete_thought(&mut self, id: Uuid) -> Result<CascadeReport> {
        let mut staged = self.tables.clone();
        if staged.thoughts.shift_remove(&id).is_none() {
            return Err(MindBoxError::not_found(EntityKind::Thought, id));
        }

        let mut report = CascadeReport::default();
        report.removed_thoughts.push(id);
        relations::on_delete_thought(&mut staged, id, self.policy, &mut report);

        self.commit(staged, report.touched())?;
        Ok(report)
    }

    // --- Keywords ---

    pub fn create_keyword(&mut self, name: &str, color: KeywordColor) -> Result<Keyword> {
        let name = non_empty_keyword_name(name)?;
        let keyword = Keyword::new(self.ids.next_id(), name, color);
        let mut staged = self.tables.clone();
        staged.keywords.insert(keyword.id, keyword.clone());
        self.commit(staged, Touched::KEYWORDS)?;
        Ok(keyword)
    }

    pub fn rename_keyword(&mut self, id: Uuid, name: &str) -> Result<bool> {
        let name = non_empty_keyword_name(name)?;
        self.edit_keyword(id, |keyword| {
            if keyword.name == name {
                return false;
            }
            keyword.name = name;
            true
        })
    }

    pub fn recolor_keyword(&mut self, id: Uuid, color: KeywordColor) -> Result<bool> {
        self.edit_keyword(id, |keyword| {
            if keyword.color == color {
                return false;
            }
            keyword.color = color;
            true
        })
    }

    pub fn delete_keyword(&mut self, id: Uuid) -> Result<CascadeReport> {
        let mut staged = self.tables.clone();
        if staged.keywords.shift_remove(&id).is_none() {
            return Err(MindBoxError::not_found(EntityKind::Keyword, id));
        }

        let mut report = CascadeReport::default();
        report.note_removed_keyword(id);
        self.commit(staged, Touched::KEYWORDS)?;
        Ok(report)
    }

    /// Tags a thought. Linking twice is a no-op.
    pub fn link_keyword(&mut self, thought_id: Uuid, keyword_id: Uuid) -> Result<bool> {
        self.require_thought(thought_id)?;
        self.edit_keyword(keyword_id, |keyword| {
            if keyword.tags(thought_id) {
                return false;
            }
            keyword.thought_ids.push(thought_id);
            true
        })
    }

    /// Removes one tag. With `destroy`, deletes the whole keyword instead.
    pub fn unlink_keyword(
        &mut self,
        thought_id: Uuid,
        keyword_id: Uuid,
        destroy: bool,
    ) -> Result<CascadeReport> {
        self.require_thought(thought_id)?;
        if !self.tables.keywords.contains_key(&keyword_id) {
            return Err(MindBoxError::not_found(EntityKind::Keyword, keyword_id));
        }

        if destroy {
            return self.delete_keyword(keyword_id);
        }

        let mut staged = self.tables.clone();
        let mut report = CascadeReport::default();
        relations::remove_reference(&mut staged, keyword_id, thought_id, self.policy, &mut report);
        if report.is_empty() {
            return Ok(report);
        }

        self.commit(staged, report.touched())?;
        Ok(report)
    }

    // --- Maintenance ---

    /// Repairs tables that were edited by hand.
    ///
    /// Nothing is written when the tables are already consistent.
    pub fn doctor(&mut self) -> Result<DoctorReport> {
        let mut staged = self.tables.clone();
        let mut report = DoctorReport::default();

        // 1. Boxes with a missing parent, or sitting on a parent cycle, go to the top
        let detached: Vec<Uuid> = staged
            .boxes
            .values()
            .filter(|b| match b.parent_box_id {
                None => false,
                Some(parent) => {
                    !staged.boxes.contains_key(&parent)
                        || relations::is_descendant_of(&staged.boxes, b.id, b.id)
                }
            })
            .map(|b| b.id)
            .collect();
        for id in &detached {
            if let Some(node) = staged.boxes.get_mut(id) {
                node.parent_box_id = None;
                report.reparented_boxes += 1;
            }
        }

        // 2. Thoughts whose box is gone
        let before = staged.thoughts.len();
        let box_ids: HashSet<Uuid> = staged.boxes.keys().copied().collect();
        staged.thoughts.retain(|_, t| box_ids.contains(&t.box_id));
        report.removed_orphan_thoughts = before - staged.thoughts.len();

        // 3. Keyword references: drop dangling ids, collapse duplicates
        let thought_ids: HashSet<Uuid> = staged.thoughts.keys().copied().collect();
        for keyword in staged.keywords.values_mut() {
            let mut seen = HashSet::new();
            let mut kept = Vec::with_capacity(keyword.thought_ids.len());
            for id in &keyword.thought_ids {
                if !thought_ids.contains(id) {
                    report.removed_dangling_refs += 1;
                } else if !seen.insert(*id) {
                    report.collapsed_duplicate_refs += 1;
                } else {
                    kept.push(*id);
                }
            }
            keyword.thought_ids = kept;
        }

        if report.is_clean() {
            return Ok(report);
        }

        warn!(?report, "doctor repaired inconsistent tables");
        let touched = Touched {
            boxes: report.reparented_boxes > 0,
            thoughts: report.removed_orphan_thoughts > 0,
            keywords: report.removed_dangling_refs > 0 || report.collapsed_duplicate_refs > 0,
        };
        self.commit(staged, touched)?;
        Ok(report)
    }

    // --- Internals ---

    fn require_thought(&self, id: Uuid) -> Result<()> {
        if self.tables.thoughts.contains_key(&id) {
            Ok(())
        } else {
            Err(MindBoxError::not_found(EntityKind::Thought, id))
        }
    }

    /// Stages a copy of one box, lets `edit` change it, commits if it reports a change.
    fn edit_box(&mut self, id: Uuid, edit: impl FnOnce(&mut BoxNode) -> bool) -> Result<bool> {
        let mut staged = self.tables.clone();
        let node = staged
            .boxes
            .get_mut(&id)
            .ok_or_else(|| MindBoxError::not_found(EntityKind::Box, id))?;
        if !edit(node) {
            return Ok(false);
        }
        self.commit(staged, Touched::BOXES)?;
        Ok(true)
    }

    fn edit_thought(&mut self, id: Uuid, edit: impl FnOnce(&mut Thought) -> bool) -> Result<bool> {
        let mut staged = self.tables.clone();
        let thought = staged
            .thoughts
            .get_mut(&id)
            .ok_or_else(|| MindBoxError::not_found(EntityKind::Thought, id))?;
        if !edit(thought) {
            return Ok(false);
        }
        self.commit(staged, Touched::THOUGHTS)?;
        Ok(true)
    }

    fn edit_keyword(&mut self, id: Uuid, edit: impl FnOnce(&mut Keyword) -> bool) -> Result<bool> {
        let mut staged = self.tables.clone();
        let keyword = staged
            .keywords
            .get_mut(&id)
            .ok_or_else(|| MindBoxError::not_found(EntityKind::Keyword, id))?;
        if !edit(keyword) {
            return Ok(false);
        }
        self.commit(staged, Touched::KEYWORDS)?;
        Ok(true)
    }

    /// Persist, swap, notify. On a failed write nothing after it happens.
    fn commit(&mut self, staged: Tables, touched: Touched) -> Result<()> {
        let mut written = Vec::new();
        for collection in touched.collections() {
            if let Err(err) = self.persist(&staged, collection) {
                self.restore(&written);
                return Err(err);
            }
            written.push(collection);
        }

        self.tables = staged;

        if touched.boxes {
            self.box_feed.publish(&self.tables.box_list());
        }
        if touched.thoughts {
            self.thought_feed.publish(&self.tables.thought_list());
        }
        if touched.keywords {
            self.keyword_feed.publish(&self.tables.keyword_list());
        }

        debug!(tables = ?written, "committed");
        Ok(())
    }

    fn persist(&self, tables: &Tables, collection: Collection) -> Result<()> {
        match collection {
            Collection::Boxes => self.backend.save_boxes(&tables.box_list()),
            Collection::Thoughts => self.backend.save_thoughts(&tables.thought_list()),
            Collection::Keywords => self.backend.save_keywords(&tables.keyword_list()),
        }
    }

    /// Rewrites already-written tables with the live (pre-commit) contents.
    fn restore(&self, written: &[Collection]) {
        for collection in written {
            if let Err(err) = self.persist(&self.tables, *collection) {
                warn!(%collection, error = %err, "rollback could not restore table");
            }
        }
    }
}

fn non_empty_keyword_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MindBoxError::InvalidArgument(
            "keyword name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
