use super::render;
use super::setup::{BoxCommands, Cli, Commands, KeywordCommands, ThoughtCommands};
use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use mindbox::api::MindBoxApi;
use mindbox::init::{initialize, MindBoxContext};
use mindbox::model::ThoughtStatus;
use mindbox::selection::KeywordView;
use mindbox::store::fs_backend::FsBackend;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Api = MindBoxApi<FsBackend>;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = initialize(cli.data_dir.clone())?;
    debug!(command = ?cli.command, "dispatching");

    match cli.command {
        Commands::Box(cmd) => handle_box(&mut ctx.api, cmd),
        Commands::Thought(cmd) => handle_thought(&mut ctx.api, cmd),
        Commands::Keyword(cmd) => handle_keyword(&mut ctx.api, cmd),
        Commands::Doctor => {
            let report = ctx.api.doctor()?;
            println!("{}", render::doctor_summary(&report));
            Ok(())
        }
        Commands::Config => handle_config(&ctx),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Keep whichever subscriber was installed first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_box(api: &mut Api, cmd: BoxCommands) -> anyhow::Result<()> {
    match cmd {
        BoxCommands::Add {
            parent,
            name,
            color,
        } => {
            let parent = parent.map(|p| api.resolve_box(&p)).transpose()?;
            let created = api.create_box_with(parent, name.as_deref(), color)?;
            println!("Created box {}", created.id.to_string().yellow());
        }
        BoxCommands::Rename { id, name } => {
            let id = api.resolve_box(&id)?;
            report_change(api.rename_box(id, &name)?, "Renamed box");
        }
        BoxCommands::Color { id, color } => {
            let id = api.resolve_box(&id)?;
            report_change(api.recolor_box(id, color)?, "Recolored box");
        }
        BoxCommands::Move { id, to } => {
            let id = api.resolve_box(&id)?;
            let to = to.map(|t| api.resolve_box(&t)).transpose()?;
            report_change(api.move_box(id, to)?, "Moved box");
        }
        BoxCommands::Rm { id } => {
            let id = api.resolve_box(&id)?;
            let report = api.delete_box(id)?;
            println!("{}", render::cascade_summary(&report));
        }
        BoxCommands::Tree => {
            let store = api.store();
            println!("{}", render::box_tree(&store.boxes(), &store.thoughts()));
        }
    }
    Ok(())
}

fn handle_thought(api: &mut Api, cmd: ThoughtCommands) -> anyhow::Result<()> {
    match cmd {
        ThoughtCommands::Add {
            box_id,
            title,
            body,
        } => {
            let box_id = api.resolve_box(&box_id)?;
            let created = api.create_thought_with(box_id, title.as_deref(), body.as_deref())?;
            println!("Created thought {}", created.id.to_string().yellow());
        }
        ThoughtCommands::List { box_id } => {
            let box_id = api.resolve_box(&box_id)?;
            api.select_box(box_id);
            println!(
                "{}",
                render::thought_list(api.selection().thoughts_in_box(), Utc::now())
            );
        }
        ThoughtCommands::Show { id } => {
            let id = api.resolve_thought(&id)?;
            api.select_thought(id);
            let selection = api.selection();
            let thought = selection
                .current_thought()
                .with_context(|| format!("thought {} vanished while loading", id))?;
            let path = api.store().box_path(thought.box_id)?;
            println!(
                "{}",
                render::thought_detail(thought, &path, selection.keywords_on_thought())
            );
        }
        ThoughtCommands::Rename { id, title } => {
            let id = api.resolve_thought(&id)?;
            report_change(api.rename_thought(id, &title)?, "Renamed thought");
        }
        ThoughtCommands::Status { id, status } => {
            let id = api.resolve_thought(&id)?;
            let status = ThoughtStatus::parse(&status);
            report_change(api.set_thought_status(id, status)?, "Updated status");
        }
        ThoughtCommands::Body { id, markdown } => {
            let id = api.resolve_thought(&id)?;
            report_change(api.set_thought_body(id, &markdown)?, "Updated body");
        }
        ThoughtCommands::Rm { id } => {
            let id = api.resolve_thought(&id)?;
            let report = api.delete_thought(id)?;
            println!("{}", render::cascade_summary(&report));
        }
    }
    Ok(())
}

fn handle_keyword(api: &mut Api, cmd: KeywordCommands) -> anyhow::Result<()> {
    match cmd {
        KeywordCommands::Add { name, color } => {
            let created = api.create_keyword(&name, color.unwrap_or_default())?;
            println!("Created keyword {}", created.id.to_string().yellow());
        }
        KeywordCommands::List { search: None } => {
            println!("{}", render::keyword_list(&api.store().keywords()));
        }
        KeywordCommands::List { search: Some(term) } => {
            let found = api.search_keywords(&term);
            if !found.matches.is_empty() {
                println!("{}", render::keyword_list(&found.matches));
            }
            if let Some(candidate) = found.create_candidate {
                println!("{}", render::create_hint(&candidate));
            }
        }
        KeywordCommands::Show { id } => {
            let id = api.resolve_keyword(&id)?;
            let mut view = api.open_view();
            view.select_keyword(id);
            match view.keyword_view() {
                KeywordView::Thoughts(thoughts) => {
                    println!("{}", render::thought_list(thoughts, Utc::now()))
                }
                KeywordView::AllKeywords(all) => println!("{}", render::keyword_list(all)),
            }
        }
        KeywordCommands::Link { thought, keyword } => {
            let thought = api.resolve_thought(&thought)?;
            let keyword = api.resolve_keyword(&keyword)?;
            report_change(api.link_keyword(thought, keyword)?, "Tagged thought");
        }
        KeywordCommands::Unlink {
            thought,
            keyword,
            destroy,
        } => {
            let thought = api.resolve_thought(&thought)?;
            let keyword = api.resolve_keyword(&keyword)?;
            let report = api.unlink_keyword(thought, keyword, destroy)?;
            println!("{}", render::cascade_summary(&report));
        }
    }
    Ok(())
}

fn handle_config(ctx: &MindBoxContext) -> anyhow::Result<()> {
    let file = ctx
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    println!("{:<22} {}", "config file".dimmed(), file);
    println!("{:<22} {}", "data dir".dimmed(), ctx.data_dir.display());
    println!(
        "{:<22} {}",
        "prune empty keywords".dimmed(),
        ctx.config.prune_empty_keywords
    );
    Ok(())
}

fn report_change(changed: bool, what: &str) {
    if changed {
        println!("{}", what.green());
    } else {
        println!("{}", "No change".dimmed());
    }
}
