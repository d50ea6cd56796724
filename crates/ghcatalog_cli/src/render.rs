//! Terminal rendering of search views.

use clap::ValueEnum;
use ghcatalog::search::{RepositoryRow, SearchStatus, SearchView};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Longest description shown in a table cell.
const DESCRIPTION_WIDTH: usize = 60;

/// Output format for one-shot results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// JSON shape of a loaded page.
#[derive(Debug, Serialize)]
pub(crate) struct PageOutput<'a> {
    pub account: Option<&'a str>,
    pub mode: &'static str,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub has_next_page: bool,
    pub repositories: &'a [RepositoryRow],
}

impl<'a> From<&'a SearchView> for PageOutput<'a> {
    fn from(view: &'a SearchView) -> Self {
        Self {
            account: view.account.as_deref(),
            mode: view.mode.as_str(),
            page: view.page,
            page_size: view.page_size,
            total_count: view.total_count,
            has_next_page: view.has_next_page,
            repositories: &view.rows,
        }
    }
}

/// Render the rows of `view` as a rounded table, or `None` when there are no
/// rows to show.
pub(crate) fn table(view: &SearchView) -> Option<String> {
    if view.rows.is_empty() {
        return None;
    }

    let mut builder = Builder::default();
    builder.push_record(view.columns.iter().map(|c| c.title().to_string()));
    for row in &view.rows {
        builder.push_record(view.columns.iter().map(|&c| {
            let cell = row.cell(c);
            if c == ghcatalog::search::Column::Description {
                truncate(&cell, DESCRIPTION_WIDTH)
            } else {
                cell
            }
        }));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    Some(table.to_string())
}

/// One-line summary of the session state shown under the table.
pub(crate) fn status_line(view: &SearchView) -> String {
    let Some(account) = view.account.as_deref() else {
        return "No account selected. Use `user <login>` to pick one.".to_string();
    };

    let mut line = format!(
        "{account} [{}] page {} of {} ({} repositories, {} per page)",
        view.mode,
        view.page + 1,
        view.page_count().max(1),
        view.total_count,
        view.page_size,
    );

    if !view.name_filter.is_empty() {
        line.push_str(&format!(" name: {:?}", view.name_filter));
    }
    if !view.language_filters.is_empty() {
        line.push_str(&format!(" languages: {}", view.language_filters.join(", ")));
    }

    match view.status {
        SearchStatus::Loading => line.push_str(" - loading..."),
        SearchStatus::Failed => {
            if let Some(error) = &view.last_error {
                line.push_str(&format!(" - error: {error}"));
            }
        }
        SearchStatus::Loaded if view.is_empty_result() => {
            line.push_str(" - no repositories found with the given filters");
        }
        SearchStatus::Loaded | SearchStatus::Idle => {}
    }

    line
}

/// Account suggestions line, if there is anything to say.
pub(crate) fn suggestions_line(view: &SearchView) -> Option<String> {
    if view.suggestions_loading {
        return Some(format!("Looking up accounts matching {:?}...", view.account_input));
    }
    if let Some(error) = &view.suggestions_error {
        return Some(format!("Account lookup failed: {error}"));
    }
    if view.suggestions.is_empty() {
        return None;
    }
    Some(format!("Accounts: {}", view.suggestions.join(", ")))
}

/// Full rendering for the interactive browser.
pub(crate) fn view(view: &SearchView) -> String {
    let mut out = String::new();
    if let Some(table) = table(view) {
        out.push_str(&table);
        out.push('\n');
    }
    out.push_str(&status_line(view));
    if let Some(suggestions) = suggestions_line(view) {
        out.push('\n');
        out.push_str(&suggestions);
    }
    out
}

/// Print a loaded page in the requested format.
pub(crate) fn print_page(view: &SearchView, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Table => {
            match table(view) {
                Some(table) => println!("{table}"),
                None => println!("No repositories found with the given filters."),
            }
            println!("{}", status_line(view));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&PageOutput::from(view))?);
        }
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
