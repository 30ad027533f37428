//! # CLI Behavior
//!
//! This is **one possible UI client** for mindbox, not the application itself.
//! It is the only place that knows about terminal I/O, exit codes and output
//! formatting.
//!
//! ## Ids on the Command Line
//!
//! Every `ID`, `BOX`, `THOUGHT` or `KEYWORD` argument takes a full UUID or any
//! unambiguous prefix of one. Listings print the first 8 characters, which is
//! almost always enough.
//!
//! ## One Invocation, One Window
//!
//! Each run opens the store, issues a single intent and renders the result.
//! `thought list` and `thought show` go through the main selection, exactly as
//! a GUI's main window would; `keyword show` opens a second view so it never
//! disturbs the main selection.
//!
//! ## Logging
//!
//! Library logs go to stderr through `tracing-subscriber`. `RUST_LOG` picks the
//! filter (default `warn`); `-v` forces `debug`.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, dispatch and per-command handlers
//! - `render`: Output formatting (tables, trees, colors, relative times)
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
