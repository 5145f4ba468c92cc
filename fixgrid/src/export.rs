//! CSV export of grid rows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::debug;
use serde_json::Value;

use crate::column::ColumnDef;
use crate::error::Result;
use crate::value::{Row, resolve};

/// A rendered CSV file ready to be handed to an [`ExportSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
    /// Number of data rows, excluding the header line.
    pub row_count: usize,
}

/// Receives finished exports: a download, a file on disk, a clipboard.
pub trait ExportSink {
    fn deliver(&mut self, export: &CsvExport) -> Result<()>;
}

/// Writes exports into a directory, named by their filename.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, export: &CsvExport) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&export.filename);
        fs::write(&path, export.content.as_bytes())?;
        debug!("Wrote {} rows to {}", export.row_count, path.display());
        self.written.push(path);
        Ok(())
    }
}

/// `{table_name}_{YYYY-MM-DD}.csv`, with `export` for a missing or blank name.
pub fn export_filename(table_name: Option<&str>, date: NaiveDate) -> String {
    let name = table_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("export");
    format!("{name}_{}.csv", date.format("%Y-%m-%d"))
}

/// CSV field for a raw value. Objects and arrays are written as JSON.
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other @ (Value::Array(_) | Value::Object(_))) => other.to_string(),
    }
}

/// Serialize `rows` over `columns`: a header line of column labels, then one
/// line per row of raw field values.
///
/// Fields containing a comma, quote or newline are quoted with inner quotes
/// doubled. Lines are separated by `\n` with no trailing newline.
pub fn to_csv<'a>(rows: impl IntoIterator<Item = &'a Row>, columns: &[&ColumnDef]) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buffer);

        writer.write_record(columns.iter().map(|c| c.label.as_str()))?;
        for row in rows {
            writer.write_record(columns.iter().map(|c| field_text(resolve(row, &c.path))))?;
        }
        writer.flush()?;
    }

    let mut content =
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}
