//! # Selection and Derived Views
//!
//! A [`SelectionController`] tracks what one view has focused (a box, a thought
//! and a keyword) and keeps the collections that depend on that focus ready to
//! render:
//!
//! | Focus             | Derived view                                          |
//! |-------------------|-------------------------------------------------------|
//! | selected box      | thoughts in that box, newest first                    |
//! | selected thought  | keywords tagging that thought, store order            |
//! | selected keyword  | thoughts tagged by it; all keywords when none         |
//!
//! ## Freshness
//!
//! The controller is an ordinary subscriber of the store. It keeps a mirror of
//! the last snapshot of each table, and [`SelectionController::refresh`] drains
//! its subscriptions and recomputes every view. Each `select_*`/`clear_*` call
//! drains the subscriptions first, so an id is checked against the store as it
//! is now and the views built for the new focus include every committed write.
//! Between intents, a view that was not told about a write calls `refresh`.
//!
//! ## Self-healing
//!
//! Selecting an id that does not exist yields [`Selection::NoSelection`] rather
//! than an error, and a refresh that finds a selected entity gone clears that
//! selection.
//!
//! ## Scope
//!
//! A selected thought always lives in the selected box. Selecting a thought
//! selects its box; switching to another box clears the thought.
//!
//! Selection is local to a controller. Two windows hold two controllers and
//! never see each other's focus.

use crate::model::{BoxNode, Keyword, Thought};
use crate::store::subscription::Subscription;
use crate::store::Tables;
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(Uuid),
}

impl Selection {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Selection::NoSelection => None,
            Selection::Selected(id) => Some(*id),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }

    fn from_lookup(id: Uuid, exists: bool) -> Self {
        if exists {
            Selection::Selected(id)
        } else {
            Selection::NoSelection
        }
    }
}

/// What the keyword side panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordView {
    /// No keyword selected: every keyword, store order.
    AllKeywords(Vec<Keyword>),
    /// Thoughts tagged by the selected keyword, in store order.
    Thoughts(Vec<Thought>),
}

impl Default for KeywordView {
    fn default() -> Self {
        KeywordView::AllKeywords(Vec::new())
    }
}

/// Newest first, then title, then id so equal rows have a fixed order.
pub fn thought_order(a: &Thought, b: &Thought) -> Ordering {
    b.update_date
        .cmp(&a.update_date)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

pub struct SelectionController {
    box_feed: Subscription<BoxNode>,
    thought_feed: Subscription<Thought>,
    keyword_feed: Subscription<Keyword>,
    mirror: Tables,

    selected_box: Selection,
    selected_thought: Selection,
    selected_keyword: Selection,

    thoughts_in_box: Vec<Thought>,
    keywords_on_thought: Vec<Keyword>,
    keyword_view: KeywordView,
}

impl SelectionController {
    pub fn new(
        box_feed: Subscription<BoxNode>,
        thought_feed: Subscription<Thought>,
        keyword_feed: Subscription<Keyword>,
    ) -> Self {
        let mut controller = Self {
            box_feed,
            thought_feed,
            keyword_feed,
            mirror: Tables::default(),
            selected_box: Selection::NoSelection,
            selected_thought: Selection::NoSelection,
            selected_keyword: Selection::NoSelection,
            thoughts_in_box: Vec::new(),
            keywords_on_thought: Vec::new(),
            keyword_view: KeywordView::default(),
        };
        controller.refresh();
        controller
    }

    /// Takes in any pending table snapshots and recomputes all views.
    ///
    /// Returns true if at least one snapshot arrived.
    pub fn refresh(&mut self) -> bool {
        let changed = self.drain();
        self.heal();
        self.recompute();
        changed
    }

    /// Moves pending snapshots into the mirror without touching the views.
    fn drain(&mut self) -> bool {
        let mut changed = false;

        if let Some(boxes) = self.box_feed.latest() {
            self.mirror.boxes = boxes.into_iter().map(|b| (b.id, b)).collect();
            changed = true;
        }
        if let Some(thoughts) = self.thought_feed.latest() {
            self.mirror.thoughts = thoughts.into_iter().map(|t| (t.id, t)).collect();
            changed = true;
        }
        if let Some(keywords) = self.keyword_feed.latest() {
            self.mirror.keywords = keywords.into_iter().map(|k| (k.id, k)).collect();
            changed = true;
        }
        changed
    }

    /// Catches the mirror up before a transition, so lookups see live records.
    fn sync(&mut self) {
        if self.drain() {
            self.heal();
        }
    }

    // --- Transitions ---

    pub fn select_box(&mut self, id: Uuid) -> Selection {
        self.sync();
        let next = Selection::from_lookup(id, self.mirror.boxes.contains_key(&id));
        if next != self.selected_box {
            self.selected_thought = Selection::NoSelection;
        }
        self.selected_box = next;
        self.recompute();
        next
    }

    /// Also selects the box the thought lives in.
    pub fn select_thought(&mut self, id: Uuid) -> Selection {
        self.sync();
        match self.mirror.thoughts.get(&id) {
            Some(thought) => {
                self.selected_box = Selection::from_lookup(
                    thought.box_id,
                    self.mirror.boxes.contains_key(&thought.box_id),
                );
                self.selected_thought = Selection::Selected(id);
            }
            None => self.selected_thought = Selection::NoSelection,
        }
        self.recompute();
        self.selected_thought
    }

    pub fn select_keyword(&mut self, id: Uuid) -> Selection {
        self.sync();
        self.selected_keyword = Selection::from_lookup(id, self.mirror.keywords.contains_key(&id));
        self.recompute();
        self.selected_keyword
    }

    /// Clears the box and, with it, the thought.
    pub fn clear_box(&mut self) {
        self.sync();
        self.selected_box = Selection::NoSelection;
        self.selected_thought = Selection::NoSelection;
        self.recompute();
    }

    pub fn clear_thought(&mut self) {
        self.sync();
        self.selected_thought = Selection::NoSelection;
        self.recompute();
    }

    pub fn clear_keyword(&mut self) {
        self.sync();
        self.selected_keyword = Selection::NoSelection;
        self.recompute();
    }

    // --- Reads ---

    pub fn selected_box(&self) -> Selection {
        self.selected_box
    }

    pub fn selected_thought(&self) -> Selection {
        self.selected_thought
    }

    pub fn selected_keyword(&self) -> Selection {
        self.selected_keyword
    }

    pub fn current_box(&self) -> Option<&BoxNode> {
        self.selected_box.id().and_then(|id| self.mirror.boxes.get(&id))
    }

    pub fn current_thought(&self) -> Option<&Thought> {
        self.selected_thought
            .id()
            .and_then(|id| self.mirror.thoughts.get(&id))
    }

    pub fn current_keyword(&self) -> Option<&Keyword> {
        self.selected_keyword
            .id()
            .and_then(|id| self.mirror.keywords.get(&id))
    }

    /// Thoughts of the selected box, newest first. Empty without a box.
    pub fn thoughts_in_box(&self) -> &[Thought] {
        &self.thoughts_in_box
    }

    /// Keywords tagging the selected thought, in store order.
    pub fn keywords_on_thought(&self) -> &[Keyword] {
        &self.keywords_on_thought
    }

    pub fn keyword_view(&self) -> &KeywordView {
        &self.keyword_view
    }

    // --- Internals ---

    fn heal(&mut self) {
        if let Some(id) = self.selected_box.id() {
            if !self.mirror.boxes.contains_key(&id) {
                self.selected_box = Selection::NoSelection;
            }
        }

        if let Some(id) = self.selected_thought.id() {
            let in_scope = match self.mirror.thoughts.get(&id) {
                Some(thought) => self.selected_box.id() == Some(thought.box_id),
                None => false,
            };
            if !in_scope {
                self.selected_thought = Selection::NoSelection;
            }
        }

        if let Some(id) = self.selected_keyword.id() {
            if !self.mirror.keywords.contains_key(&id) {
                self.selected_keyword = Selection::NoSelection;
            }
        }
    }

    fn recompute(&mut self) {
        self.thoughts_in_box = match self.selected_box.id() {
            Some(box_id) => {
                let mut thoughts: Vec<Thought> = self
                    .mirror
                    .thoughts
                    .values()
                    .filter(|t| t.box_id == box_id)
                    .cloned()
                    .collect();
                thoughts.sort_by(thought_order);
                thoughts
            }
            None => Vec::new(),
        };

        self.keywords_on_thought = match self.selected_thought.id() {
            Some(thought_id) => self
                .mirror
                .keywords
                .values()
                .filter(|k| k.tags(thought_id))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        self.keyword_view = match self.current_keyword() {
            Some(keyword) => KeywordView::Thoughts(
                self.mirror
                    .thoughts
                    .values()
                    .filter(|t| keyword.tags(t.id))
                    .cloned()
                    .collect(),
            ),
            None => KeywordView::AllKeywords(self.mirror.keywords.values().cloned().collect()),
        };
    }
}
