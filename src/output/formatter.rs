use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::ingest::IngestReport;
use crate::model::{HarmfulProduct, LeaderboardRow};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with two decimals, dropping a trailing ".00" ("9", "12.5")
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.2}", score);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the leaderboard as a ranked table: Rank, Score, User
/// Score column is right-aligned, 8 chars wide (fits "-1234.56")
pub fn format_leaderboard_table(rows: &[LeaderboardRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "Leaderboard is empty. Import purchases and run `eco-score score`.".to_string();
    }

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let rank = format!("{:>3}.", idx + 1);
            let score = format!("{:>8}", format_score(row.score));
            if use_colors {
                format!("{} {}  {}", rank.dimmed(), score.bold(), row.user_id.cyan())
            } else {
                format!("{} {}  {}", rank, score, row.user_id)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format harmful products as a table: Rank, Score, Product, Store / Brand
/// Product names are truncated to fit the terminal; pipes get full names.
pub fn format_harmful_table(user_id: &str, products: &[HarmfulProduct], use_colors: bool) -> String {
    if products.is_empty() {
        return format!("No purchases found for {}.", user_id);
    }

    let term_width = get_terminal_width();
    let score_width = 8;
    let separator = "  ";

    products
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let rank = format!("{:>2}.", idx + 1);
            let score = format!("{:>width$}", format_score(item.score), width = score_width);
            let origin = format!("{} / {}", item.store, item.brand);

            let fixed_width = 3 + 1 + score_width + separator.len() * 2 + origin.chars().count();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(&item.product_name, width - fixed_width)
                }
                Some(_) => truncate(&item.product_name, 20),
                None => item.product_name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank.dimmed(),
                    score.red().bold(),
                    separator,
                    name,
                    separator,
                    origin.dimmed()
                )
            } else {
                format!("{} {}{}{}{}{}", rank, score, separator, name, separator, origin)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard as tab-separated values for scripting
/// Columns: user_id, score (no headers, no colors)
pub fn format_leaderboard_tsv(rows: &[LeaderboardRow]) -> String {
    rows.iter()
        .map(|row| format!("{}\t{}", row.user_id, row.score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Harmful products as tab-separated values
/// Columns: score, store_score, brand_score, product, store, brand
pub fn format_harmful_tsv(products: &[HarmfulProduct]) -> String {
    products
        .iter()
        .map(|p| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                p.score, p.store_score, p.brand_score, p.product_name, p.store, p.brand
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary of an import, with a count of skipped records
pub fn format_ingest_summary(report: &IngestReport, use_colors: bool) -> String {
    let skipped = report.skipped_count();
    let line = format!(
        "{}: {} records, {} new",
        report.source, report.accepted, report.written
    );
    match (skipped, use_colors) {
        (0, _) => line,
        (n, true) => format!("{} ({})", line, format!("{} skipped", n).yellow()),
        (n, false) => format!("{} ({} skipped)", line, n),
    }
}
