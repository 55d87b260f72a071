//! Terminal output for quotes, setups, and result banners.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExportRecord, Section, Setup, SetupList, SoundFolder};

use super::banner::BannerMessage;
use super::expansion::{ExpansionState, ViewIdentity};

/// Table of the hook folders quotes can be saved into.
pub fn format_sound_folders(selected: SoundFolder) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "Folder", "Triggered"]);

    for folder in SoundFolder::ALL {
        let marker = if folder == selected { "*" } else { "" };
        table.add_row(vec![marker, folder.as_str(), folder.description()]);
    }

    table.to_string()
}

/// Table of setup lists with the active one marked.
pub fn format_lists_table(lists: &[SetupList], active_id: &str) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "ID", "Name", "Created"]);

    for list in lists {
        let marker = if list.id == active_id { "*" } else { "" };
        let created = list.created_at.map_or_else(
            || "-".to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
        );
        let name = if list.is_default() {
            format!("{} (default)", list.name)
        } else {
            list.name.clone()
        };

        table.add_row(vec![marker, &list.id, &name, &created]);
    }

    table.to_string()
}

/// Filenames a batch will produce.
pub fn format_export_records(records: &[ExportRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Unit", "Category", "Filename"]);

    for record in records {
        table.add_row(vec![
            &record.unit_name,
            &record.category_name,
            &record.filename,
        ]);
    }

    table.to_string()
}

/// Setup hooks as a tree; collapsed hooks show only their header.
pub fn format_setup(setup: &Setup, expansion: &ExpansionState) -> String {
    let view = ViewIdentity::Recommended {
        list_id: setup.list.id.clone(),
        hooks: setup.hooks.iter().map(|h| h.name.clone()).collect(),
    };

    let mut out = format!(
        "{}\n{} sounds across {} hooks.\n\n",
        setup.list.name.bold().yellow(),
        setup.total_sounds(),
        setup.hooks.len()
    );

    for hook in &setup.hooks {
        let expanded = expansion.is_expanded(&view, &hook.name);
        out.push_str(&format!(
            "{} {} ({})\n",
            chevron(expanded),
            hook.name.yellow().bold(),
            hook.recommendations.len()
        ));

        if !expanded {
            continue;
        }
        if !hook.description.is_empty() {
            out.push_str(&format!("    {}\n", hook.description.dimmed()));
        }
        for rec in &hook.recommendations {
            out.push_str(&format!(
                "    {}  {}\n",
                truncate(&rec.text, 60),
                rec.unit.dimmed()
            ));
        }
    }

    out
}

/// Catalog sections and units as a tree, with quote counts.
pub fn format_catalog_tree(view: &str, sections: &[Section], expansion: &ExpansionState) -> String {
    let identity = ViewIdentity::Sections {
        view: view.to_string(),
        sections: sections.iter().map(|s| s.name.clone()).collect(),
    };

    let mut out = String::new();
    for section in sections {
        let expanded = expansion.is_expanded(&identity, &section.name);
        out.push_str(&format!(
            "{} {} ({})\n",
            chevron(expanded),
            section.name.bold(),
            section.units.len()
        ));

        if !expanded {
            continue;
        }
        for unit in &section.units {
            out.push_str(&format!(
                "    {} {}\n",
                unit.name,
                format!("[{} quotes]", unit.quote_count()).dimmed()
            ));
        }
    }

    out
}

/// One-line banner, green for success and red for errors.
pub fn format_banner(message: &BannerMessage) -> String {
    let text = message.text();
    if message.is_success() {
        format!("{} {}", "✓".green().bold(), text.green())
    } else {
        format!("{} {}", "✗".red().bold(), text.red())
    }
}

const fn chevron(expanded: bool) -> &'static str {
    if expanded {
        "▾"
    } else {
        "▸"
    }
}

/// Truncates a string to max chars with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
