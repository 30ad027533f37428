use clap::{Parser, Subcommand};
use mindbox::color::{BoxColor, KeywordColor};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mindbox",
    bin_name = "mindbox",
    version,
    disable_help_subcommand = true,
    after_help = "Ids may be shortened to any unique prefix, e.g. `mindbox thought show 3f2a`."
)]
#[command(about = "Boxes, thoughts and keywords from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding boxes.json, thoughts.json and keywords.json
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, rename, move and delete boxes
    #[command(subcommand, display_order = 1)]
    Box(BoxCommands),

    /// Notes inside a box
    #[command(subcommand, alias = "t", display_order = 2)]
    Thought(ThoughtCommands),

    /// Tags across boxes
    #[command(subcommand, alias = "kw", display_order = 3)]
    Keyword(KeywordCommands),

    /// Repair data files that were edited by hand
    #[command(display_order = 10)]
    Doctor,

    /// Show effective configuration
    #[command(display_order = 11)]
    Config,
}

#[derive(Subcommand, Debug)]
pub enum BoxCommands {
    /// Create a box
    Add {
        /// Create inside this box
        #[arg(long, short = 'p', value_name = "BOX")]
        parent: Option<String>,

        /// Name (defaults to "New Box")
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Hex value or name, e.g. midnightDream or "#5F0F40"
        #[arg(long, short = 'c')]
        color: Option<BoxColor>,
    },

    /// Rename a box (an empty name resets it to "New Box")
    Rename { id: String, name: String },

    /// Change a box's color
    Color { id: String, color: BoxColor },

    /// Move a box under another one, or to the top level without --to
    #[command(alias = "mv")]
    Move {
        id: String,

        #[arg(long, value_name = "BOX")]
        to: Option<String>,
    },

    /// Delete a box with everything inside it
    #[command(alias = "delete")]
    Rm { id: String },

    /// Show all boxes as a tree
    #[command(alias = "ls")]
    Tree,
}

#[derive(Subcommand, Debug)]
pub enum ThoughtCommands {
    /// Create a thought in a box
    Add {
        #[arg(value_name = "BOX")]
        box_id: String,

        #[arg(long)]
        title: Option<String>,

        /// Markdown body
        #[arg(long)]
        body: Option<String>,
    },

    /// List the thoughts of a box, newest first
    #[command(alias = "ls")]
    List {
        #[arg(value_name = "BOX")]
        box_id: String,
    },

    /// Show one thought with its keywords
    #[command(alias = "view")]
    Show { id: String },

    /// Rename a thought (an empty title resets it to "New Thought")
    Rename { id: String, title: String },

    /// Set status: active, archived, or any custom label
    Status { id: String, status: String },

    /// Replace the Markdown body
    Body { id: String, markdown: String },

    /// Delete a thought
    #[command(alias = "delete")]
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum KeywordCommands {
    /// Create a keyword
    Add {
        name: String,

        /// Hex value or name, e.g. oceanTeal
        #[arg(long, short = 'c')]
        color: Option<KeywordColor>,
    },

    /// List keywords, optionally filtered by a search term
    #[command(alias = "ls")]
    List {
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show the thoughts tagged by a keyword
    Show { id: String },

    /// Tag a thought
    Link { thought: String, keyword: String },

    /// Untag a thought; --destroy deletes the keyword altogether
    Unlink {
        thought: String,
        keyword: String,

        #[arg(long)]
        destroy: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindbox::color::Gold;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mindbox").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn box_add_parses_color_names_and_hex() {
        let cli = parse(&["box", "add", "--name", "Work", "--color", "midnightDream"]);
        match cli.command {
            Commands::Box(BoxCommands::Add { name, color, parent }) => {
                assert_eq!(name.as_deref(), Some("Work"));
                assert_eq!(color, Some(BoxColor::Gold(Gold::MidnightDream)));
                assert!(parent.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }

        let cli = parse(&["box", "color", "abc", "#5f0f40"]);
        assert!(matches!(
            cli.command,
            Commands::Box(BoxCommands::Color { color: BoxColor::Gold(Gold::MidnightDream), .. })
        ));
    }

    #[test]
    fn unknown_color_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from(["mindbox", "box", "color", "abc", "plaid"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_options_work_after_the_subcommand() {
        let cli = parse(&["keyword", "list", "--data-dir", "/tmp/x", "-v"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(cli.verbose);
    }

    #[test]
    fn unlink_destroy_flag() {
        let cli = parse(&["kw", "unlink", "t1", "k1", "--destroy"]);
        match cli.command {
            Commands::Keyword(KeywordCommands::Unlink { destroy, .. }) => assert!(destroy),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn box_move_without_target_means_top_level() {
        let cli = parse(&["box", "mv", "abc"]);
        assert!(matches!(
            cli.command,
            Commands::Box(BoxCommands::Move { to: None, .. })
        ));
    }
}
