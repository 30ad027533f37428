//! # MindBox CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/mindbox/`: core library: store, relationship rules, selection
//! - `crates/mindbox-cli/`: this CLI tool, depends on the `mindbox` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/mindbox-cli/src/cli/)                    │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/mindbox/src/api.rs)                      │
//! │  - Resolves id prefixes → UUIDs                             │
//! │  - Forwards intents, keeps the selection fresh              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI layer owns every
//! user-facing concern: parsing, logging setup, rendering, exit codes.
//!
//! ## Testing Approach
//!
//! - `render.rs` is tested with canned records and colors switched off.
//! - `tests/cli_e2e.rs` runs the real binary against a temporary data dir.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
