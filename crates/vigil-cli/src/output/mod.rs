use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Column headers plus one row of cells per record.
struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    fn single(header: &str, cells: impl IntoIterator<Item = String>) -> Self {
        Self {
            headers: vec![header.to_string()],
            rows: cells.into_iter().map(|cell| vec![cell]).collect(),
        }
    }

    /// Lists of verdicts or summaries: one row per record, one column per
    /// field seen in any record.
    fn from_records(items: &[Value]) -> Self {
        let columns: BTreeSet<&String> = items
            .iter()
            .filter_map(Value::as_object)
            .flat_map(Map::keys)
            .collect();
        if columns.is_empty() {
            return Self::single("value", items.iter().map(cell));
        }
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|column| {
                        item.get(column.as_str())
                            .map_or_else(|| String::from("-"), cell)
                    })
                    .collect()
            })
            .collect();
        Self {
            headers: columns.into_iter().cloned().collect(),
            rows,
        }
    }

    /// A single response: one `field | value` row per field.
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            headers: vec![String::from("field"), String::from("value")],
            rows: fields
                .iter()
                .map(|(name, value)| vec![name.clone(), cell(value)])
                .collect(),
        }
    }
}

fn render_table(value: &Value) -> String {
    let grid = match value {
        Value::Array(items) => Grid::from_records(items),
        Value::Object(fields) => Grid::from_fields(fields),
        scalar => Grid::single("value", [cell(scalar)]),
    };
    if grid.rows.is_empty() {
        return String::from("(no rows)");
    }

    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };
    let headers = grid.headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render_entity_table(&headers, &grid.rows, options)
}

/// Data categories and destinations read as a comma list; nested records
/// (chat messages, analyses) collapse to a count.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => format!("[{} entries]", items.len()),
        other => other.to_string(),
    }
}
