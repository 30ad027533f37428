//! # API Facade
//!
//! The API layer is a **thin facade** over the entity store. It is the single
//! entry point for UI clients, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Forwards intents** to [`EntityStore`] and returns its results unchanged
//! - **Keeps the main selection fresh**: after every write it refreshes its
//!   [`SelectionController`], so write → persist → notify → derive all
//!   happen inside one call
//! - **Resolves user input** into ids (`resolve_*`): a full UUID or any
//!   unambiguous prefix of one
//!
//! It does no business logic and no I/O of its own.
//!
//! ## Windows
//!
//! The facade owns the main window's selection. A second view (for example
//! a keyword browser) calls [`MindBoxApi::open_view`] and gets its own
//! controller; it must call `refresh()` itself after the store changes.
//!
//! ## Generic Over StorageBackend
//!
//! `MindBoxApi<B: StorageBackend>`:
//! - Production: `MindBoxApi<FsBackend>`
//! - Testing: `MindBoxApi<MemBackend>`

use crate::color::{BoxColor, KeywordColor};
use crate::error::{EntityKind, MindBoxError, Result};
use crate::model::{BoxNode, Keyword, Thought, ThoughtStatus};
use crate::selection::{Selection, SelectionController};
use crate::store::backend::StorageBackend;
use crate::store::entity_store::{EntityStore, KeywordSearch};
use crate::store::{CascadeReport, DoctorReport};
use uuid::Uuid;

pub struct MindBoxApi<B: StorageBackend> {
    store: EntityStore<B>,
    selection: SelectionController,
}

impl<B: StorageBackend> MindBoxApi<B> {
    pub fn new(store: EntityStore<B>) -> Self {
        let selection = store.selection();
        Self { store, selection }
    }

    /// Read access to the store: queries and subscriptions.
    pub fn store(&self) -> &EntityStore<B> {
        &self.store
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// A separate selection for another view.
    pub fn open_view(&self) -> SelectionController {
        self.store.selection()
    }

    // --- Selection ---

    pub fn select_box(&mut self, id: Uuid) -> Selection {
        self.selection.select_box(id)
    }

    pub fn select_thought(&mut self, id: Uuid) -> Selection {
        self.selection.select_thought(id)
    }

    pub fn select_keyword(&mut self, id: Uuid) -> Selection {
        self.selection.select_keyword(id)
    }

    pub fn clear_box(&mut self) {
        self.selection.clear_box();
    }

    pub fn clear_thought(&mut self) {
        self.selection.clear_thought();
    }

    pub fn clear_keyword(&mut self) {
        self.selection.clear_keyword();
    }

    // --- Boxes ---

    pub fn create_box(&mut self, parent: Option<Uuid>) -> Result<BoxNode> {
        let outcome = self.store.create_box(parent);
        self.settle(outcome)
    }

    pub fn create_box_with(
        &mut self,
        parent: Option<Uuid>,
        name: Option<&str>,
        color: Option<BoxColor>,
    ) -> Result<BoxNode> {
        let outcome = self.store.create_box_with(parent, name, color);
        self.settle(outcome)
    }

    pub fn rename_box(&mut self, id: Uuid, name: &str) -> Result<bool> {
        let outcome = self.store.rename_box(id, name);
        self.settle(outcome)
    }

    pub fn recolor_box(&mut self, id: Uuid, color: BoxColor) -> Result<bool> {
        let outcome = self.store.recolor_box(id, color);
        self.settle(outcome)
    }

    pub fn set_box_expanded(&mut self, id: Uuid, expanded: bool) -> Result<bool> {
        let outcome = self.store.set_box_expanded(id, expanded);
        self.settle(outcome)
    }

    pub fn move_box(&mut self, id: Uuid, new_parent: Option<Uuid>) -> Result<bool> {
        let outcome = self.store.move_box(id, new_parent);
        self.settle(outcome)
    }

    pub fn delete_box(&mut self, id: Uuid) -> Result<CascadeReport> {
        let outcome = self.store.delete_box(id);
        self.settle(outcome)
    }

    // --- Thoughts ---

    pub fn create_thought(&mut self, box_id: Uuid) -> Result<Thought> {
        let outcome = self.store.create_thought(box_id);
        self.settle(outcome)
    }

    pub fn create_thought_with(
        &mut self,
        box_id: Uuid,
        title: Option<&str>,
        formatted_body: Option<&str>,
    ) -> Result<Thought> {
        let outcome = self.store.create_thought_with(box_id, title, formatted_body);
        self.settle(outcome)
    }

    pub fn rename_thought(&mut self, id: Uuid, title: &str) -> Result<bool> {
        let outcome = self.store.rename_thought(id, title);
        self.settle(outcome)
    }

    pub fn set_thought_status(&mut self, id: Uuid, status: ThoughtStatus) -> Result<bool> {
        let outcome = self.store.set_thought_status(id, status);
        self.settle(outcome)
    }

    pub fn set_thought_body(&mut self, id: Uuid, formatted: &str) -> Result<bool> {
        let outcome = self.store.set_thought_body(id, formatted);
        self.settle(outcome)
    }

    pub fn delete_thought(&mut self, id: Uuid) -> Result<CascadeReport> {
        let outcome = self.store.delete_thought(id);
        self.settle(outcome)
    }

    // --- Keywords ---

    pub fn create_keyword(&mut self, name: &str, color: KeywordColor) -> Result<Keyword> {
        let outcome = self.store.create_keyword(name, color);
        self.settle(outcome)
    }

    pub fn rename_keyword(&mut self, id: Uuid, name: &str) -> Result<bool> {
        let outcome = self.store.rename_keyword(id, name);
        self.settle(outcome)
    }

    pub fn recolor_keyword(&mut self, id: Uuid, color: KeywordColor) -> Result<bool> {
        let outcome = self.store.recolor_keyword(id, color);
        self.settle(outcome)
    }

    pub fn delete_keyword(&mut self, id: Uuid) -> Result<CascadeReport> {
        let outcome = self.store.delete_keyword(id);
        self.settle(outcome)
    }

    pub fn link_keyword(&mut self, thought_id: Uuid, keyword_id: Uuid) -> Result<bool> {
        let outcome = self.store.link_keyword(thought_id, keyword_id);
        self.settle(outcome)
    }

    pub fn unlink_keyword(
        &mut self,
        thought_id: Uuid,
        keyword_id: Uuid,
        destroy: bool,
    ) -> Result<CascadeReport> {
        let outcome = self.store.unlink_keyword(thought_id, keyword_id, destroy);
        self.settle(outcome)
    }

    pub fn search_keywords(&self, term: &str) -> KeywordSearch {
        self.store.search_keywords(term)
    }

    pub fn doctor(&mut self) -> Result<DoctorReport> {
        let outcome = self.store.doctor();
        self.settle(outcome)
    }

    // --- Id resolution ---

    pub fn resolve_box(&self, input: &str) -> Result<Uuid> {
        resolve(input, EntityKind::Box, self.store.boxes().iter().map(|b| b.id))
    }

    pub fn resolve_thought(&self, input: &str) -> Result<Uuid> {
        resolve(
            input,
            EntityKind::Thought,
            self.store.thoughts().iter().map(|t| t.id),
        )
    }

    pub fn resolve_keyword(&self, input: &str) -> Result<Uuid> {
        resolve(
            input,
            EntityKind::Keyword,
            self.store.keywords().iter().map(|k| k.id),
        )
    }

    fn settle<T>(&mut self, outcome: Result<T>) -> Result<T> {
        if outcome.is_ok() {
            self.selection.refresh();
        }
        outcome
    }
}

/// Full UUID, or a unique prefix of the hyphenated form.
fn resolve(input: &str, kind: EntityKind, candidates: impl Iterator<Item = Uuid>) -> Result<Uuid> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Err(MindBoxError::InvalidArgument(format!(
            "empty {} id",
            kind.to_string().to_lowercase()
        )));
    }

    let candidates: Vec<Uuid> = candidates.collect();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return if candidates.contains(&id) {
            Ok(id)
        } else {
            Err(MindBoxError::not_found(kind, id))
        };
    }

    let matches: Vec<Uuid> = candidates
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [] => Err(MindBoxError::not_found(kind, input.trim())),
        [id] => Ok(*id),
        many => Err(MindBoxError::InvalidArgument(format!(
            "'{}' matches {} {} ids",
            input.trim(),
            many.len(),
            kind.to_string().to_lowercase()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::StoreFixture;

    fn api() -> MindBoxApi<MemBackend> {
        MindBoxApi::new(StoreFixture::new().store)
    }

    #[test]
    fn writes_refresh_the_main_selection() {
        let mut api = api();
        let b = api.create_box(None).unwrap();
        api.select_box(b.id);

        let t = api.create_thought(b.id).unwrap();
        assert_eq!(api.selection().thoughts_in_box().len(), 1);

        api.select_thought(t.id);
        api.delete_thought(t.id).unwrap();
        assert_eq!(api.selection().selected_thought(), Selection::NoSelection);
        assert!(api.selection().thoughts_in_box().is_empty());
    }

    #[test]
    fn extra_views_are_independent() {
        let mut api = api();
        let k = api.create_keyword("k", KeywordColor::default()).unwrap();
        let mut view = api.open_view();
        view.select_keyword(k.id);
        assert_eq!(api.selection().selected_keyword(), Selection::NoSelection);
    }

    #[test]
    fn resolve_accepts_full_ids_and_unique_prefixes() {
        // Random ids, so short prefixes are distinct.
        let mut api = MindBoxApi::new(EntityStore::open(MemBackend::new()).unwrap());
        let a = api.create_box(None).unwrap();
        let b = api.create_box(None).unwrap();
        let full = a.id.to_string();

        assert_eq!(api.resolve_box(&full).unwrap(), a.id);
        assert_eq!(api.resolve_box(&full.to_uppercase()).unwrap(), a.id);
        assert_eq!(api.resolve_box(&full[..8]).unwrap(), a.id);
        assert_eq!(api.resolve_box(&b.id.to_string()[..8]).unwrap(), b.id);
    }

    #[test]
    fn resolve_reports_ambiguous_empty_and_missing() {
        let mut api = api();
        api.create_box(None).unwrap();
        api.create_box(None).unwrap();

        assert!(matches!(
            api.resolve_box("0000"),
            Err(MindBoxError::InvalidArgument(_))
        ));
        assert!(matches!(
            api.resolve_box("  "),
            Err(MindBoxError::InvalidArgument(_))
        ));
        assert!(matches!(
            api.resolve_box("ffff"),
            Err(MindBoxError::NotFound { kind: EntityKind::Box, .. })
        ));
        assert!(matches!(
            api.resolve_thought(&Uuid::from_u128(1).to_string()),
            Err(MindBoxError::NotFound { kind: EntityKind::Thought, .. })
        ));
    }

    #[test]
    fn resolve_prefix_picks_the_single_match() {
        let mut api = api();
        let b = api.create_box(None).unwrap();
        let id = api.create_keyword("k", KeywordColor::default()).unwrap().id;
        // from_u128(2) ends in ...0002, from_u128(1) in ...0001
        let tail_prefix = &id.to_string()[..35];
        assert_eq!(api.resolve_keyword(tail_prefix).unwrap(), id);
        assert!(api.resolve_keyword(&b.id.to_string()).is_err());
    }

    #[test]
    fn failed_write_leaves_selection_alone() {
        let mut api = api();
        let b = api.create_box(None).unwrap();
        api.select_box(b.id);
        assert!(api.create_thought(Uuid::from_u128(99)).is_err());
        assert_eq!(api.selection().selected_box(), Selection::Selected(b.id));
    }
}
