//! Output Rendering
//!
//! Renders resources as bordered text tables, pretty JSON or YAML.

use crate::resource::Resource;
use crate::sgs::error::{Error, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

/// Output format selected with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse a format name from the config file, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// A list column: header text and the JSON field it shows
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub key: &'static str,
}

const fn col(header: &'static str, key: &'static str) -> Column {
    Column { header, key }
}

pub const VOLUME_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Status", "status"),
    col("Size", "size"),
    col("Replicate Status", "replicate_status"),
    col("Replication ID", "replication_id"),
];

pub const SNAPSHOT_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Status", "status"),
    col("Volume ID", "volume_id"),
    col("Checkpoint ID", "checkpoint_id"),
];

pub const BACKUP_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Status", "status"),
    col("Volume ID", "volume_id"),
    col("Type", "type"),
    col("Destination", "destination"),
];

pub const REPLICATION_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Status", "status"),
    col("Master Volume", "master_volume"),
    col("Slave Volume", "slave_volume"),
];

pub const CHECKPOINT_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Status", "status"),
    col("Replication ID", "replication_id"),
];

/// Cell text for a list column
fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(arr)) => format!("[{} items]", arr.len()),
        Some(Value::Object(_)) => "[object]".to_string(),
    }
}

/// Value text in a property table; nested values are shown as JSON
fn format_property(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Print a list of resources
pub fn print_list<W: Write>(
    out: &mut W,
    items: &[Resource],
    columns: &[Column],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|item| {
                    columns
                        .iter()
                        .map(|c| format_cell(item.get(c.key)))
                        .collect()
                })
                .collect();
            write_table(out, &headers, &rows)
        }
        OutputFormat::Json => write_json(out, items),
        OutputFormat::Yaml => write_yaml(out, items),
    }
}

/// Print every attribute of one resource
pub fn print_dict<W: Write>(out: &mut W, resource: &Resource, format: OutputFormat) -> Result<()> {
    print_map(out, &resource.to_dict(), format)
}

pub fn print_map<W: Write>(
    out: &mut W,
    map: &Map<String, Value>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = map
                .iter()
                .map(|(k, v)| vec![k.clone(), format_property(v)])
                .collect();
            write_table(out, &["Property", "Value"], &rows)
        }
        OutputFormat::Json => write_json(out, map),
        OutputFormat::Yaml => write_yaml(out, map),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", text)?;
    Ok(())
}

fn write_yaml<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    let text = serde_yaml::to_string(value).map_err(|e| Error::Decode(e.to_string()))?;
    write!(out, "{}", text)?;
    Ok(())
}

// =============================================================================
// Table layout
// =============================================================================

fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_text(cell).chars().count());
        }
    }

    let border = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let border = format!("+{}+", border);

    writeln!(out, "{}", border)?;
    write_row(out, headers.iter().copied(), &widths)?;
    writeln!(out, "{}", border)?;
    for row in rows {
        write_row(out, row.iter().map(|c| c.as_str()), &widths)?;
    }
    writeln!(out, "{}", border)?;
    Ok(())
}

fn write_row<'a, W: Write>(
    out: &mut W,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> Result<()> {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let text = cell_text(cell);
            let pad = width - text.chars().count();
            format!(" {}{} ", text, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("|");
    writeln!(out, "|{}|", line)?;
    Ok(())
}

/// Cells are single-line
fn cell_text(cell: &str) -> String {
    cell.replace(['\r', '\n'], " ")
}
