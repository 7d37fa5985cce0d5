//! Command-line front end for local editor drafts.
//!
//! # Responsibility
//! - Inspect and edit the persisted editor snapshot in a local database.
//! - Run maintenance such as the media retention sweep.

use blogdraft_core::db::open_db;
use blogdraft_core::editor::text::preview_text;
use blogdraft_core::{
    init_logging, Container, ContainerId, EditorConfig, EditorSession, MediaService, Paragraph,
    SqliteKvRepository, SqliteMediaRepository,
};
use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::PathBuf;

/// Inspect and edit module-editor drafts stored in a local database.
#[derive(Parser)]
#[command(name = "blogdraft", version, about, long_about = None)]
struct Cli {
    /// SQLite database holding the editor snapshot and media cache.
    #[arg(long, global = true, default_value = "blogdraft.db")]
    db: PathBuf,

    /// JSON file with editor config overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for rolling log files; logging stays off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level used with `--log-dir`.
    #[arg(long, global = true, default_value = blogdraft_core::default_log_level())]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the crate version.
    Version,
    /// Print structure diagnostics and the assembled document.
    Show,
    /// Append a section container.
    AddSection {
        name: String,
    },
    /// Append a paragraph, optionally inside a section.
    AddParagraph {
        content: String,
        /// Target container id; the paragraph is unassigned when omitted.
        #[arg(long)]
        section: Option<String>,
    },
    /// Remove a section; its paragraphs return to the unassigned pool.
    DeleteSection {
        id: String,
    },
    /// Mark the draft complete and print the assembled document.
    Complete,
    /// Clear all sections and paragraphs.
    Reset,
    /// Delete cached media older than the retention window.
    SweepMedia,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        let log_dir = std::env::current_dir()?.join(log_dir);
        init_logging(&cli.log_level, &log_dir.to_string_lossy())?;
    }
    if matches!(cli.command, Command::Version) {
        println!("blogdraft_core version={}", blogdraft_core::core_version());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => EditorConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EditorConfig::default(),
    };
    let conn = open_db(&cli.db)?;

    if matches!(cli.command, Command::SweepMedia) {
        let media = MediaService::new(SqliteMediaRepository::try_new(&conn)?);
        let removed = media.sweep_with_config(blogdraft_core::model::now_epoch_ms(), &config)?;
        println!("removed {removed} expired media blob(s)");
        return Ok(());
    }

    let mut session = EditorSession::with_persistence(SqliteKvRepository::try_new(&conn)?, config);
    if session.is_persistence_degraded() {
        eprintln!("warning: local draft could not be read; changes will not be saved");
    }

    match cli.command {
        Command::Show => print_draft(&session),
        Command::AddSection { name } => {
            let id = session.mutate("add_container", |store, _| {
                let container = Container::new(name.trim(), store.next_container_order());
                let id = container.id.clone();
                store.add_container(container)?;
                Ok(id)
            })?;
            println!("{id}");
        }
        Command::AddParagraph { content, section } => {
            let target = section.map(ContainerId::new);
            let id = session.mutate("add_paragraph", |store, _| {
                let mut paragraph =
                    Paragraph::new(content, store.next_paragraph_order(target.as_ref()));
                paragraph.container_id = target.clone();
                let id = paragraph.id.clone();
                store.add_paragraph(paragraph)?;
                Ok(id)
            })?;
            println!("{id}");
        }
        Command::DeleteSection { id } => {
            let removed = session.mutate("delete_container", |store, _| {
                store.delete_container(&ContainerId::new(id))
            })?;
            println!("deleted section {}", removed.name);
        }
        Command::Complete => {
            let content = session.complete()?;
            print!("{content}");
        }
        Command::Reset => session.reset(),
        Command::Version | Command::SweepMedia => {}
    }

    info!("event=cli_command module=cli status=ok");
    Ok(())
}

fn print_draft(session: &EditorSession<'_>) {
    let store = session.store();
    let analysis = store.analysis();
    println!(
        "sections={} paragraphs={} assigned={} unassigned={} completed={}",
        analysis.containers.len(),
        analysis.total_paragraphs,
        analysis.total_assigned_paragraphs,
        analysis.unassigned_paragraph_count,
        store.is_completed()
    );
    for stats in &analysis.containers {
        println!(
            "  [{}] {} ({} paragraph(s))",
            stats.container_id, stats.name, stats.paragraph_count
        );
        for paragraph in store.paragraphs_in_container(&stats.container_id) {
            println!("    - [{}] {}", paragraph.id, preview_text(&paragraph.content));
        }
    }
    for paragraph in store.unassigned_paragraphs() {
        println!("  unassigned [{}] {}", paragraph.id, preview_text(&paragraph.content));
    }
    for issue in &analysis.issues {
        println!("{:?}: {}", issue.severity(), issue.message());
    }
    println!();
    print!("{}", store.completed_content());
}
