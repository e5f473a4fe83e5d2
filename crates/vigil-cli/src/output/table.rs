#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN: usize = 6;

/// Render a simple aligned table for string rows.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
                .max(MIN_COLUMN)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| pad(&truncate_text(header, *width), *width, None))
        .collect::<Vec<_>>()
        .join("  ");

    let divider = "-".repeat(header_line.chars().count());

    let row_lines = rows.iter().map(|row| {
        widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                let truncated = truncate_text(value, *width);
                let color = if options.color {
                    verdict_color(&truncated)
                } else {
                    None
                };
                pad(&truncated, *width, color)
            })
            .collect::<Vec<_>>()
            .join("  ")
    });

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line);
    lines.push(divider);
    lines.extend(row_lines);
    lines.join("\n")
}

/// Shrink the widest columns one character at a time until the row fits.
fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let candidate = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);

        let Some(idx) = candidate else {
            break;
        };

        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Left-align `value` in `width` columns, optionally wrapped in an ANSI color.
fn pad(value: &str, width: usize, color: Option<&str>) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    match color {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m{fill}"),
        None => format!("{value}{fill}"),
    }
}

/// Green for benign verdicts, yellow for review, red for block.
fn verdict_color(value: &str) -> Option<&'static str> {
    match value {
        "LOW" | "ALLOW" | "first_party" | "framework" | "registry" => Some("32"),
        "MEDIUM" | "MONITOR" | "fallback" => Some("33"),
        "HIGH" | "BLOCK" => Some("31"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_terminal_truncates_widest_column() {
        let headers = ["script", "risk"];
        let rows = vec![vec![
            "a-very-long-script-name-that-overflows".to_string(),
            "HIGH".to_string(),
        ]];
        let table = render_entity_table(
            &headers,
            &rows,
            TableOptions {
                max_width: Some(24),
                color: false,
            },
        );
        let row = table.lines().nth(2).expect("data row");
        assert!(row.chars().count() <= 24);
        assert!(row.contains('…'));
        assert!(row.contains("HIGH"));
    }

    #[test]
    fn color_wraps_risk_cells_only() {
        let headers = ["script", "risk"];
        let rows = vec![vec!["Evil Tracker".to_string(), "HIGH".to_string()]];
        let table = render_entity_table(
            &headers,
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        let row = table.lines().nth(2).expect("data row");
        assert!(row.starts_with("Evil Tracker"));
        assert!(row.contains("\u{1b}[31mHIGH\u{1b}[0m"));
    }
}
