//! Release information rendering.
//!
//! Every archive ships a `release_info.txt` so whoever unpacks the ZIP can
//! tell at a glance which commit it was built from. The table is drawn
//! with box-drawing characters by hand; it is a file format here, not
//! terminal output, so no terminal-table crate is involved.

use chrono::Local;

/// Table border style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Two columns separated by a vertical divider.
    Divided,
    /// A single box without the column divider (used inside Slack code
    /// blocks, where the divider reads as noise).
    Simple,
}

/// Render a key/value table with box-drawing borders.
pub fn render_table(rows: &[(&str, &str)], style: TableStyle) -> String {
    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    match style {
        TableStyle::Divided => {
            lines.push(format!(
                "┌{}┬{}┐",
                "─".repeat(key_width + 2),
                "─".repeat(value_width + 2)
            ));
            for (key, value) in rows {
                lines.push(format!("│ {key:<key_width$} │ {value:<value_width$} │"));
            }
            lines.push(format!(
                "└{}┴{}┘",
                "─".repeat(key_width + 2),
                "─".repeat(value_width + 2)
            ));
        }
        TableStyle::Simple => {
            let inner = key_width + value_width + 4;
            lines.push(format!("┌{}┐", "─".repeat(inner)));
            for (key, value) in rows {
                lines.push(format!("│ {key:<key_width$}  {value:<value_width$} │"));
            }
            lines.push(format!("└{}┘", "─".repeat(inner)));
        }
    }
    lines.join("\n")
}

/// Build the `release_info.txt` content for a release.
pub fn create_release_info(
    plugin_name: &str,
    branch: &str,
    commit: &str,
    version: &str,
    style: TableStyle,
) -> String {
    let created = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let version = format!("v{}", version.trim_start_matches('v'));
    render_table(
        &[
            ("Plugin", plugin_name),
            ("Version", &version),
            ("Created", &created),
            ("Branch", branch),
            ("Commit ID", commit),
        ],
        style,
    )
}
