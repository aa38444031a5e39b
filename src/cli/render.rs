//! Plain-text rendering of tables, stat cards and charts

use serde::Serialize;

use crate::cli::commands::OutputFormat;
use crate::error::Result;
use crate::models::{Chart, StatCard};
use crate::records::Tally;

/// Widest a table column may grow before cells are truncated
const MAX_COLUMN_WIDTH: usize = 40;
/// Width of the longest bar in a text chart
const BAR_WIDTH: usize = 30;

/// Render rows as an aligned text table
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count()).min(MAX_COLUMN_WIDTH);
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(&truncate(cell, *width), *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str("  ");
    out.push_str(&line(headers.iter().map(|h| h.to_uppercase()).collect()));
    out.push('\n');
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str("  ");
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in rows {
        out.push_str("  ");
        out.push_str(&line(row.clone()));
        out.push('\n');
    }
    out
}

/// Render stat cards as `Title: value` lines
pub fn stat_cards(cards: &[StatCard]) -> String {
    let width = cards
        .iter()
        .map(|c| c.title.chars().count())
        .max()
        .unwrap_or(0);
    cards
        .iter()
        .map(|card| format!("  {}  {}\n", pad(card.title, width), card.value))
        .collect()
}

/// Render a chart as horizontal text bars
pub fn chart(chart: &Chart) -> String {
    let mut out = format!("{}\n", chart.title);
    out.push_str(&bars(&chart.tally));
    out
}

fn bars(tally: &Tally) -> String {
    if tally.is_empty() {
        return "  (no data)\n".to_string();
    }
    let label_width = tally.labels().iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = tally.counts().iter().copied().max().unwrap_or(0).max(1);
    tally
        .iter()
        .map(|(label, count)| {
            let len = count * BAR_WIDTH / max;
            format!("  {}  {} {}\n", pad(label, label_width), "█".repeat(len), count)
        })
        .collect()
}

/// Print records in the selected output format
pub fn print_records<T: Serialize>(
    format: OutputFormat,
    records: &[&T],
    headers: &[&str],
    cells: impl Fn(&T) -> Vec<String>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = records.iter().map(|r| cells(r)).collect();
            print!("{}", table(headers, &rows));
        }
    }
    Ok(())
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let rows = vec![
            vec!["Ama".to_string(), "ama@example.com".to_string()],
            vec!["Kwabena".to_string(), "k@example.com".to_string()],
        ];
        let out = table(&["Name", "Email"], &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  NAME     EMAIL");
        assert_eq!(lines[2], "  Ama      ama@example.com");
        assert_eq!(lines[3], "  Kwabena  k@example.com");
    }

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate("Accra", 10), "Accra");
        assert_eq!(truncate("Bluetooth speaker", 6), "Bluet…");
        assert_eq!(truncate("★★★★", 3), "★★…");
    }

    #[test]
    fn test_chart_bars_scale_to_max() {
        let chart = Chart {
            title: "Roles",
            tally: Tally::from_pairs([("Admins", 1), ("Users", 2)]),
        };
        let out = super::chart(&chart);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Roles");
        assert!(lines[1].ends_with(" 1"));
        assert_eq!(lines[2].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_empty_chart() {
        let chart = Chart {
            title: "Signup Trends",
            tally: Tally::default(),
        };
        assert!(super::chart(&chart).contains("(no data)"));
    }

    #[test]
    fn test_stat_cards() {
        let out = stat_cards(&[StatCard::new("Total", 3), StatCard::new("Avg. Price", "$1.00")]);
        assert_eq!(out, "  Total       3\n  Avg. Price  $1.00\n");
    }
}
