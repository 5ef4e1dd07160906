//! promptbar command-line front end.
//!
//! Manages the same prompt collection the palette uses, which is handy for
//! scripting imports, exports and backups.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use promptbar::config::{default_config_path, load_config};
use promptbar::logging;
use promptbar::prompts::{search, NewPrompt, Prompt, PromptId, PromptLibrary, SortMode};
use promptbar::shortcuts::ShortcutBindings;
use promptbar::storage::JsonFilePreferences;

#[derive(Parser)]
#[command(name = "promptbar", about = "Store, search and reuse text prompts")]
struct Cli {
    /// Config file (default: ~/.promptbar/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List active prompts
    List {
        /// Override the stored sort mode (smart or manual)
        #[arg(long)]
        sort: Option<SortMode>,
    },
    /// Show the most recently used prompts
    Recent,
    /// Search with the palette query syntax (#tag, mode:, category:, text)
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create a prompt
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Record that a prompt was inserted
    Use { id: String },
    /// Archive a prompt
    Archive { id: String },
    /// Write all prompts as JSON
    Export { file: PathBuf },
    /// Add prompts from an export, skipping ones already present
    Import { file: PathBuf },
    /// Write a full backup
    Backup { file: PathBuf },
    /// Restore a full backup
    Restore { file: PathBuf },
    /// Show the keyboard shortcuts in effect
    Shortcuts,
}

fn parse_id(raw: &str) -> Result<PromptId> {
    PromptId::parse(raw).ok_or_else(|| anyhow!("'{}' is not a prompt id", raw))
}

fn print_prompts(prompts: &[&Prompt]) {
    for prompt in prompts {
        let slot = prompt
            .quick_slot
            .map(|s| format!("[{}] ", s))
            .unwrap_or_default();
        let tags = if prompt.tags.is_empty() {
            String::new()
        } else {
            format!("  #{}", prompt.tags.join(" #"))
        };
        println!("{}  {}{}{}", prompt.id, slot, prompt.title, tags);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config(&config_path);
    let _guard = logging::init(&config);

    let store = Arc::new(JsonFilePreferences::open(config.preferences_path()));
    let mut library = PromptLibrary::open(Arc::clone(&store), &config);

    match cli.command {
        Command::List { sort } => {
            let sort = sort.unwrap_or_else(|| library.sort_mode());
            print_prompts(&search::filter(library.prompts(), "", sort));
        }
        Command::Recent => {
            print_prompts(&library.recent());
        }
        Command::Search { query, limit } => {
            let limit = limit.unwrap_or(config.search_result_limit);
            let results =
                search::filter_bounded(library.prompts(), &query, library.sort_mode(), limit);
            if results.is_empty() {
                let hints = library.suggestions(&query);
                if !hints.is_empty() {
                    println!("No matches. Did you mean: {}", hints.join(", "));
                }
            }
            print_prompts(&results);
        }
        Command::Add {
            title,
            content,
            tags,
            category,
        } => {
            let id = library.add(NewPrompt {
                title,
                content,
                tags,
                category,
                ..NewPrompt::default()
            })?;
            println!("{}", id);
        }
        Command::Use { id } => {
            library.record_usage(parse_id(&id)?)?;
        }
        Command::Archive { id } => {
            library.archive(parse_id(&id)?)?;
        }
        Command::Export { file } => {
            let bytes = library.export_bytes()?;
            std::fs::write(&file, bytes)
                .with_context(|| format!("Failed to write {}", file.display()))?;
        }
        Command::Import { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let added = library.import_bytes(&bytes)?;
            println!("Imported {} prompt(s)", added);
        }
        Command::Backup { file } => {
            let bytes = library
                .create_backup()
                .map_err(|e| anyhow!(e.user_message()))?;
            std::fs::write(&file, bytes)
                .with_context(|| format!("Failed to write {}", file.display()))?;
        }
        Command::Restore { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = library
                .restore_backup(&bytes)
                .map_err(|e| anyhow!(e.user_message()))?;
            for note in &report.skipped {
                println!("Skipped {}", note);
            }
            println!(
                "Restored {} prompt(s), {} categories",
                report.prompts.unwrap_or(0),
                report.categories.unwrap_or(0)
            );
        }
        Command::Shortcuts => {
            let bindings = ShortcutBindings::load(store.as_ref());
            for (action, shortcut) in bindings.iter() {
                let marker = if bindings.is_customized(action) { "*" } else { " " };
                println!("{} {:<20} {}", marker, action.display_name(), shortcut);
            }
        }
    }

    Ok(())
}
