//! sc2-quotes - Turn StarCraft II unit quotes into hook sounds.
//!
//! Quotes picked from a catalog are saved into hook sound folders or
//! downloaded as a ZIP through the quote backend. Named setup lists bind
//! quotes to hooks and can be synced, downloaded, exported, and imported.
//!
//! Typical flow:
//!   sc2-quotes select -c catalog.json -u marine -o picks.json
//!   sc2-quotes names picks.json               # preview filenames
//!   sc2-quotes save picks.json --folder start
//!   sc2-quotes hooks add --hook done picks.json
//!   sc2-quotes setup sync

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_banner, format_catalog_tree, format_export_records, format_lists_table, format_setup,
    format_sound_folders, filter_sections, select_items, DownloadOutcome, ExpansionState,
    ExportController, QuoteBackend, Selection, SetupCommand, SetupManager, SetupStore,
    ViewIdentity,
};
use cli::{Cli, Commands, ConfigAction, HookAction, ListAction, SetupAction};
use domain::{prepare_export, AppConfig, AppError, SoundFolder};
use infrastructure::{
    config_file_path, config_to_toml, ensure_config_exists, load_catalog, load_config,
    load_selection, read_setup_document, save_selection, setup_document_json,
    write_setup_document, HttpBackend, SetupDb,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }

    match cli.command {
        Commands::Folders => {
            println!("{}", format_sound_folders(config.export.default_folder));
        }
        Commands::Browse {
            catalog,
            unit,
            collapse,
        } => {
            cmd_browse(&catalog, &unit, &collapse)?;
        }
        Commands::Select {
            catalog,
            unit,
            quote,
            output,
        } => {
            cmd_select(&catalog, &unit, &quote, &output)?;
        }
        Commands::Names { selection } => {
            cmd_names(&selection)?;
        }
        Commands::Save { selection, folder } => {
            cmd_save(&config, &selection, folder.as_deref()).await?;
        }
        Commands::Download { selection, dir } => {
            cmd_download(&config, &selection, &dir).await?;
        }
        Commands::Lists { action } => {
            cmd_lists(&config, action)?;
        }
        Commands::Hooks { action } => {
            cmd_hooks(&config, action)?;
        }
        Commands::Setup { action } => {
            cmd_setup(&config, action).await?;
        }
        Commands::Config { action } => {
            cmd_config(&config, cli.config, action)?;
        }
    }

    Ok(())
}

/// Show the catalog tree.
fn cmd_browse(catalog_path: &Path, unit_query: &str, collapse: &[String]) -> domain::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let sections = filter_sections(&catalog.sections, unit_query);
    let view = catalog.game.clone().unwrap_or_else(|| "catalog".to_string());

    let identity = ViewIdentity::Sections {
        view: view.clone(),
        sections: sections.iter().map(|s| s.name.clone()).collect(),
    };
    let mut expansion = ExpansionState::new();
    for name in collapse {
        expansion.toggle(&identity, name);
    }

    if sections.is_empty() {
        println!("No units match '{unit_query}'.");
        return Ok(());
    }

    print!("{}", format_catalog_tree(&view, &sections, &expansion));
    if let Some(attribution) = &catalog.attribution {
        println!();
        println!("{}", attribution.dimmed());
    }

    Ok(())
}

/// Write matching quotes to a selection file.
fn cmd_select(
    catalog_path: &Path,
    unit_query: &str,
    quote_query: &str,
    output: &Path,
) -> domain::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let selection = Selection::from_items(select_items(&catalog, unit_query, quote_query));

    if selection.is_empty() {
        println!("No quotes match.");
        return Ok(());
    }

    save_selection(output, selection.items())?;
    println!(
        "{} Selected {} quotes → {}",
        "✓".green().bold(),
        selection.len(),
        output.display()
    );

    Ok(())
}

/// Preview filenames for a selection.
fn cmd_names(selection_path: &Path) -> domain::Result<()> {
    let items = load_selection(selection_path)?;
    println!("{}", format_export_records(&prepare_export(&items)));
    Ok(())
}

/// Save a selection into a hook folder.
async fn cmd_save(
    config: &AppConfig,
    selection_path: &Path,
    folder: Option<&str>,
) -> domain::Result<()> {
    let controller = export_controller(config, selection_path)?;
    if let Some(folder) = folder {
        controller.set_folder(folder.parse::<SoundFolder>()?);
    }

    let result = controller.save_to_sounds().await;
    print_banner(&controller);
    let response = result?;

    if !response.target_dir.is_empty() {
        println!("  Target: {}", response.target_dir.cyan());
    }
    if response.skipped > 0 || response.deleted > 0 {
        println!(
            "  {} already present, {} removed",
            response.skipped, response.deleted
        );
    }

    Ok(())
}

/// Download a selection as a ZIP.
async fn cmd_download(config: &AppConfig, selection_path: &Path, dir: &Path) -> domain::Result<()> {
    let controller = export_controller(config, selection_path)?;

    let result = controller.download_batch(dir).await;
    print_banner(&controller);
    print_outcome(&result?);

    Ok(())
}

/// Setup list management commands.
fn cmd_lists(config: &AppConfig, action: ListAction) -> domain::Result<()> {
    let mut manager = setup_manager(config)?;

    let command = match action {
        ListAction::Show => {
            let lists = manager.store().lists()?;
            let active = manager.store().active_list_id()?;
            println!("{}", format_lists_table(&lists, &active));
            return Ok(());
        }
        ListAction::Create { name } => {
            manager.open_create();
            manager.set_input(name);
            manager.submit()?
        }
        ListAction::Rename { name, id } => {
            match id {
                Some(id) => manager.open_rename_list(&id)?,
                None => manager.open_rename()?,
            }
            manager.set_input(name);
            manager.submit()?
        }
        ListAction::Delete { id, yes } => {
            manager.open_delete(&id)?;
            if !yes && !confirm(&format!("Delete list '{id}'? This cannot be undone."))? {
                manager.close();
                println!("Cancelled.");
                return Ok(());
            }
            manager.confirm_delete()?
        }
        ListAction::Use { id } => {
            manager.set_active(&id)?;
            let list = manager.active_list()?;
            println!("{} Active list: {}", "✓".green().bold(), list.name.cyan());
            return Ok(());
        }
    };

    match command {
        Some(SetupCommand::Created(list)) => {
            println!(
                "{} Created list {} ({})",
                "✓".green().bold(),
                list.name.cyan(),
                list.id
            );
        }
        Some(SetupCommand::Renamed { id, name }) => {
            println!("{} Renamed {} to {}", "✓".green().bold(), id, name.cyan());
        }
        Some(SetupCommand::Deleted { id }) => {
            println!("{} Deleted list {}", "✓".green().bold(), id);
        }
        None if manager.dialog().is_some() => {
            println!("{}", "Name is blank, nothing changed.".yellow());
        }
        None => {}
    }

    Ok(())
}

/// Edit hooks of the active setup.
fn cmd_hooks(config: &AppConfig, action: HookAction) -> domain::Result<()> {
    let mut manager = setup_manager(config)?;
    let mut setup = manager.active_setup()?;

    match action {
        HookAction::Add {
            hook,
            selection,
            race,
        } => {
            let items = load_selection(&selection)?;
            let added = setup.hook_entry(&hook).add_items(&items, race.as_deref());
            manager.update_active_hooks(&setup.hooks)?;
            println!(
                "{} Added {} of {} quotes to {}",
                "✓".green().bold(),
                added,
                items.len(),
                hook.cyan()
            );
        }
        HookAction::Remove { hook, index } => {
            let entry = find_hook(&mut setup.hooks, &hook)?;
            if index == 0 || index > entry.recommendations.len() {
                return Err(AppError::InvalidData {
                    message: format!(
                        "Index {} is out of range (1-{})",
                        index,
                        entry.recommendations.len()
                    ),
                });
            }
            let removed = entry.recommendations.remove(index - 1);
            manager.update_active_hooks(&setup.hooks)?;
            println!("{} Removed \"{}\" from {}", "✓".green().bold(), removed.text, hook);
        }
        HookAction::Clear { hook } => {
            let entry = find_hook(&mut setup.hooks, &hook)?;
            let count = entry.recommendations.len();
            entry.recommendations.clear();
            manager.update_active_hooks(&setup.hooks)?;
            println!("{} Cleared {} sounds from {}", "✓".green().bold(), count, hook);
        }
    }

    Ok(())
}

/// Commands on the active setup.
async fn cmd_setup(config: &AppConfig, action: SetupAction) -> domain::Result<()> {
    let mut manager = setup_manager(config)?;

    match action {
        SetupAction::Show { collapse } => {
            let setup = manager.active_setup()?;
            let view = ViewIdentity::Recommended {
                list_id: setup.list.id.clone(),
                hooks: setup.hooks.iter().map(|h| h.name.clone()).collect(),
            };
            let mut expansion = ExpansionState::new();
            for name in &collapse {
                expansion.toggle(&view, name);
            }
            print!("{}", format_setup(&setup, &expansion));
        }
        SetupAction::Sync => {
            let setup = manager.active_setup()?;
            let controller = ExportController::new(http_backend(config)?, &config.export);

            let result = controller.sync_setup(&setup).await;
            print_banner(&controller);
            let summary = result?;
            println!("  {} hooks synced", summary.hooks_synced);
        }
        SetupAction::Download { dir } => {
            let setup = manager.active_setup()?;
            let controller = ExportController::new(http_backend(config)?, &config.export);

            let result = controller.download_setup(&setup, &dir).await;
            print_banner(&controller);
            print_outcome(&result?);
        }
        SetupAction::Export { output } => {
            let document = manager.export_active()?;
            match output {
                Some(path) => {
                    write_setup_document(&path, &document)?;
                    println!(
                        "{} Exported {} to {}",
                        "✓".green().bold(),
                        document.name.cyan(),
                        path.display()
                    );
                }
                None => {
                    println!("{}", setup_document_json(&document)?);
                }
            }
        }
        SetupAction::Import { file, as_new } => {
            let document = read_setup_document(&file)?;
            let list = manager.import(&document, as_new)?;
            println!(
                "{} Imported {} hooks into {}",
                "✓".green().bold(),
                document.hooks.len(),
                list.name.cyan()
            );
        }
    }

    Ok(())
}

/// Config inspection commands.
fn cmd_config(
    config: &AppConfig,
    explicit_path: Option<PathBuf>,
    action: ConfigAction,
) -> domain::Result<()> {
    let path = explicit_path.unwrap_or_else(config_file_path);

    match action {
        ConfigAction::Show => {
            println!("{} {}", "Config file:".bold(), path.display());
            println!("{} {}", "Setups db:".bold(), config.setups_db_path().display());
            println!();
            print!("{}", config_to_toml(config)?);
        }
        ConfigAction::Init => {
            if ensure_config_exists(&path)? {
                println!("{} Created {}", "✓".green().bold(), path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
    }

    Ok(())
}

fn http_backend(config: &AppConfig) -> domain::Result<HttpBackend> {
    let backend = HttpBackend::new(config.backend.clone())?;
    tracing::debug!(backend = %backend.base_url(), "Using quote backend");
    Ok(backend)
}

fn export_controller(
    config: &AppConfig,
    selection_path: &Path,
) -> domain::Result<ExportController<HttpBackend>> {
    let items = load_selection(selection_path)?;
    let controller = ExportController::new(http_backend(config)?, &config.export);
    controller.set_selection(Selection::from_items(items));
    Ok(controller)
}

fn setup_manager(config: &AppConfig) -> domain::Result<SetupManager<SetupDb>> {
    Ok(SetupManager::new(SetupDb::open(&config.setups_db_path())?))
}

fn find_hook<'a>(
    hooks: &'a mut [domain::Hook],
    name: &str,
) -> domain::Result<&'a mut domain::Hook> {
    hooks
        .iter_mut()
        .find(|h| h.name == name)
        .ok_or_else(|| AppError::InvalidData {
            message: format!("Hook '{name}' not found in the active setup"),
        })
}

fn print_banner<B: QuoteBackend>(controller: &ExportController<B>) {
    if let Some(message) = controller.banner().current() {
        println!("{}", format_banner(&message));
    }
}

fn print_outcome(outcome: &DownloadOutcome) {
    let entries = outcome
        .entries
        .map_or_else(|| "unknown".to_string(), |n| n.to_string());
    println!(
        "  {} ({} KB, {} files)",
        outcome.path.display().to_string().cyan(),
        outcome.size_bytes / 1024,
        entries
    );
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
fn confirm(question: &str) -> domain::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout()
        .flush()
        .map_err(|e| AppError::io("Failed to write prompt", e))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| AppError::io("Failed to read answer", e))?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
