//! Box-drawn level table

use colored::Colorize;

use crate::network::graph::Network;
use crate::network::order::LEVEL_PENDING;
use crate::network::site::SiteId;

const MAX_CELL: usize = 40;

fn site_cell(network: &Network, sites: &[SiteId]) -> String {
    if sites.is_empty() {
        return "-".to_string();
    }
    let joined = sites
        .iter()
        .map(|sid| network.site_ref(*sid).display_label())
        .collect::<Vec<_>>()
        .join(", ");
    truncate(joined)
}

fn truncate(text: String) -> String {
    if text.chars().count() > MAX_CELL {
        let head: String = text.chars().take(MAX_CELL - 3).collect();
        format!("{}...", head)
    } else {
        text
    }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:width$}", text, width = width)
}

/// Format the channels, in evaluation order, as a table.
///
/// Cells are padded before coloring so ANSI codes never skew the columns.
pub fn format_table(network: &Network, color: bool) -> String {
    let rows: Vec<[String; 4]> = network
        .channels_iter()
        .map(|(_, ch)| {
            let level = if ch.level() == LEVEL_PENDING {
                "-".to_string()
            } else {
                ch.level().to_string()
            };
            [
                level,
                truncate(ch.label().to_string()),
                site_cell(network, ch.sources()),
                site_cell(network, ch.targets()),
            ]
        })
        .collect();

    let headers = ["Level", "Channel", "Sources", "Targets"];
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| -> String {
        let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, parts.join(mid), right)
    };

    let mut output = String::new();
    output.push_str(&rule("┌", "┬", "┐"));

    let header_cells: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| {
            let cell = pad(h, w);
            if color {
                cell.bold().to_string()
            } else {
                cell
            }
        })
        .collect();
    output.push_str(&format!("│ {} │\n", header_cells.join(" │ ")));
    output.push_str(&rule("├", "┼", "┤"));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (cell, w))| {
                let padded = if idx == 0 {
                    format!("{:>width$}", cell, width = w)
                } else {
                    pad(cell, w)
                };
                if !color {
                    return padded;
                }
                match idx {
                    0 if cell == "-" => padded.red().to_string(),
                    0 => padded.cyan().to_string(),
                    1 => padded.green().to_string(),
                    _ => padded,
                }
            })
            .collect();
        output.push_str(&format!("│ {} │\n", cells.join(" │ ")));
    }

    output.push_str(&rule("└", "┴", "┘"));
    output
}
