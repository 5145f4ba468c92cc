//! Grid definition files.
//!
//! A definition is a JSON object holding the grid options plus a `columns`
//! list:
//!
//! ```json
//! {
//!   "table_name": "deals",
//!   "show_checkboxes": true,
//!   "columns": [
//!     { "id": "number", "label": "No.", "width": 90, "fixed": true },
//!     { "id": "owner", "label": "Owner", "template": "{owner.first} {owner.last}" },
//!     { "id": "amount", "label": "Amount", "show_total": "1 250" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use fixgrid::value::value_text;
use fixgrid::{
    ColumnDef, ColumnPath, DisplayNode, DisplayValue, FixedGrid, GridOptions, Row, StyleHints,
    extract_text, resolve,
};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CliError, Result};

fn yes() -> bool {
    true
}

/// A full grid definition.
#[derive(Debug, Clone, Deserialize)]
pub struct GridDefinition {
    #[serde(flatten)]
    pub options: GridOptions,
    #[serde(default)]
    pub sorting_locked: bool,
    /// Keys of rows painted at the selection layer.
    #[serde(default)]
    pub highlighted: Vec<String>,
    #[serde(default)]
    pub row_styles: Vec<StyleRule>,
    pub columns: Vec<ColumnSpec>,
}

/// One column entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub path: Option<ColumnPath>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default = "yes")]
    pub searchable: bool,
    #[serde(default = "yes")]
    pub sortable: bool,
    /// String or number shown in place of the filter input.
    #[serde(default)]
    pub show_total: Option<Value>,
    /// Cell text built from row fields, e.g. `"{first_name} {last_name}"`.
    #[serde(default)]
    pub template: Option<String>,
    /// Template searched when the rendered text is blank.
    #[serde(default)]
    pub search_fallback: Option<String>,
    #[serde(default)]
    pub cell_styles: Vec<StyleRule>,
}

/// Applies `style` when the value at `path` equals `equals`.
///
/// Row rules must name a path. Cell rules without one test the cell's own
/// raw value.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleRule {
    #[serde(default)]
    pub path: Option<ColumnPath>,
    pub equals: Value,
    pub style: StyleHints,
}

impl StyleRule {
    fn applies(&self, value: Option<&Value>, row: &Row) -> bool {
        let target = match &self.path {
            Some(path) => resolve(row, path),
            None => value,
        };
        target == Some(&self.equals)
    }

    fn first_match(rules: &[StyleRule], value: Option<&Value>, row: &Row) -> Option<StyleHints> {
        rules
            .iter()
            .find(|rule| rule.applies(value, row))
            .map(|rule| rule.style.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Field(ColumnPath),
}

/// A parsed `{field}` template. `{{` and `}}` are literal braces.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub fn parse(source: &str) -> std::result::Result<Self, String> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err("nested '{'".into()),
                            Some(c) => name.push(c),
                            None => return Err(format!("unclosed '{{{name}'")),
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err("empty field name".into());
                    }
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Field(ColumnPath::from(name)));
                }
                '}' => return Err("unmatched '}'".into()),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    /// A node whose children are the literal text and resolved fields.
    pub fn render(&self, row: &Row) -> DisplayValue {
        DisplayNode::new("template")
            .children(self.pieces.iter().map(|piece| match piece {
                Piece::Literal(text) => DisplayValue::text(text.clone()),
                Piece::Field(path) => DisplayValue::from_raw(resolve(row, path)),
            }))
            .into()
    }

    pub fn text(&self, row: &Row) -> String {
        extract_text(&self.render(row))
    }
}

fn template(column: &str, source: &str) -> Result<Template> {
    Template::parse(source).map_err(|message| CliError::Template {
        column: column.to_string(),
        message,
    })
}

impl ColumnSpec {
    pub fn to_column(&self) -> Result<ColumnDef> {
        let mut column = ColumnDef::new(&self.id, &self.label)
            .searchable(self.searchable)
            .sortable(self.sortable);
        if let Some(path) = &self.path {
            column = column.path(path.clone());
        }
        if let Some(width) = self.width {
            column = column.width(width);
        }
        if self.fixed {
            column = column.fixed();
        }
        if let Some(total) = &self.show_total {
            column = column.show_total(value_text(total));
        }
        if let Some(source) = &self.template {
            let template = template(&self.id, source)?;
            column = column.render(move |_, row| template.render(row));
        }
        if let Some(source) = &self.search_fallback {
            let template = template(&self.id, source)?;
            column = column.search_fallback(move |row| template.text(row));
        }
        if !self.cell_styles.is_empty() {
            let rules = self.cell_styles.clone();
            column = column.cell_style(move |value, row| StyleRule::first_match(&rules, value, row));
        }
        Ok(column)
    }
}

impl GridDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
        let definition: Self = serde_json::from_str(&text).map_err(|e| CliError::json(path, e))?;
        debug!(
            "Loaded grid definition {} with {} columns",
            path.display(),
            definition.columns.len()
        );
        Ok(definition)
    }

    pub fn columns(&self) -> Result<Vec<ColumnDef>> {
        self.columns.iter().map(ColumnSpec::to_column).collect()
    }

    /// Build the grid with every definition-level setting applied.
    pub fn build(&self) -> Result<FixedGrid> {
        let mut grid = FixedGrid::new(self.columns()?, self.options.clone())?;
        if !self.row_styles.is_empty() {
            let rules = self.row_styles.clone();
            grid = grid.with_row_style(move |row| StyleRule::first_match(&rules, None, row));
        }
        grid.set_sorting_locked(self.sorting_locked);
        grid.set_highlighted(self.highlighted.iter().cloned());
        Ok(grid)
    }
}

/// Parse row data: a JSON array, or an object with a `rows` array.
pub fn parse_rows(value: Value) -> Result<Vec<Row>> {
    match value {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut map) => match map.remove("rows") {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Err(CliError::RowShape),
        },
        _ => Err(CliError::RowShape),
    }
}

pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let text = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| CliError::json(path, e))?;
    let rows = parse_rows(value)?;
    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
