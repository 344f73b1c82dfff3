//! Output formatting: table, JSON, YAML, plain, CSV.
//!
//! Renders data in the format selected by `--output`. Table and CSV use
//! the `Tabled` row types, structured formats use serde, plain emits one
//! identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Color a VLAN state: green when active, yellow otherwise.
pub fn paint_state(state: &str, color: bool) -> String {
    if !color || state.is_empty() {
        return state.to_owned();
    }
    if state == "active" {
        state.green().to_string()
    } else {
        state.yellow().to_string()
    }
}

/// Success/failure marker for status lines.
pub fn mark(ok: bool, color: bool) -> String {
    match (ok, color) {
        (true, true) => "✓".green().to_string(),
        (true, false) => "✓".into(),
        (false, true) => "✗".red().to_string(),
        (false, false) => "✗".into(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `csv`: the same rows, comma-separated with a header line
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Csv => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_csv(&rows)?.trim_end_matches('\n').to_owned()
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
/// CSV falls back to the detail view as well.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table | OutputFormat::Csv => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Write a header record plus one record per row, returning the sink.
pub fn write_csv<W: Write, R: Tabled>(sink: W, rows: &[R]) -> Result<W, CliError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(R::headers().iter().map(|h| h.as_bytes()))?;
    for row in rows {
        writer.write_record(row.fields().iter().map(|f| f.as_bytes()))?;
    }
    writer.into_inner().map_err(|e| CliError::Io(e.into_error()))
}

pub fn render_csv<R: Tabled>(rows: &[R]) -> Result<String, CliError> {
    let bytes = write_csv(Vec::new(), rows)?;
    String::from_utf8(bytes).map_err(|e| CliError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
