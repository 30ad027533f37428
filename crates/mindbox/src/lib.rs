//! # MindBox Architecture
//!
//! MindBox is a **UI-agnostic note store**: boxes (nested folders), thoughts
//! (Markdown notes living in one box) and keywords (tags across boxes). The
//! command-line client is one UI among possible others; nothing in this crate
//! prints, prompts or exits.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI client (mindbox-cli, a GUI, ...)                        │
//! │  - Issues intents, renders snapshots                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, id resolution, main-window selection        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/entity_store.rs) + rules (relations.rs)       │
//! │  - Stage, persist, swap, notify                             │
//! │  - Cascades, keyword cleanup, cycle checks                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Backend (store/backend.rs)                         │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Views sit beside the store rather than above it: a
//! [`selection::SelectionController`] subscribes to the store's tables and
//! derives what a window shows from what that window has selected.
//!
//! ## Consistency Guarantees
//!
//! - Observers only ever see committed, durable state. A write that cannot be
//!   persisted is rolled back and nobody is notified.
//! - No keyword references a missing thought, no thought references a
//!   missing box, and box parents never form a cycle.
//! - Every value crossing the API is an owned copy.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade UI clients talk to
//! - [`store`]: Entity store, backends, subscriptions
//! - [`relations`]: Cascade and cleanup rules
//! - [`selection`]: Selection state and derived views
//! - [`model`]: `BoxNode`, `Thought`, `Keyword`
//! - [`color`]: Closed theme color sets
//! - [`text`]: Plain-text projection of Markdown bodies
//! - [`clock`]: Injected time and id sources
//! - [`config`]: Configuration
//! - [`init`]: Startup wiring
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod relations;
pub mod selection;
pub mod store;
pub mod text;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
