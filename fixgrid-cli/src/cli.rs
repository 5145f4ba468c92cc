//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use fixgrid::prelude::*;
use log::{debug, warn};

use crate::config::{GridDefinition, load_rows};
use crate::error::{CliError, Result};

/// Render and export frozen-column data grids
#[derive(Parser, Debug)]
#[command(name = "fixgrid", version, about = "Render and export frozen-column data grids")]
pub struct CliArgs {
    /// Write the log here instead of the cache directory
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the grid as text
    View {
        #[command(flatten)]
        grid: GridArgs,

        /// Scroll the non-fixed columns right by N characters
        #[arg(long, value_name = "N", default_value_t = 0)]
        scroll: u16,

        /// Clip output to N characters
        #[arg(long, value_name = "N")]
        width: Option<u16>,

        /// Pixels per character when mapping column widths
        #[arg(long, value_name = "PX", default_value_t = 8.0)]
        char_width: f64,

        /// Paint backgrounds with ANSI colors
        #[arg(long)]
        color: bool,
    },

    /// Write the selected rows to a CSV file
    Export {
        #[command(flatten)]
        grid: GridArgs,

        /// Directory the CSV file is written to
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// Export every row in view instead of the selection
        #[arg(long)]
        visible: bool,
    },
}

/// Inputs and view state shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// Grid definition (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub grid: PathBuf,

    /// Row data (JSON array)
    #[arg(short, long, value_name = "FILE")]
    pub data: PathBuf,

    /// Sort column, optionally with a direction: `amount` or `amount:desc`
    #[arg(short, long, value_name = "COLUMN[:DIR]")]
    pub sort: Option<String>,

    /// Column filter (repeatable)
    #[arg(short, long = "filter", value_name = "COLUMN=TEXT")]
    pub filters: Vec<String>,

    /// Hide a column (repeatable)
    #[arg(long = "hide", value_name = "COLUMN")]
    pub hidden: Vec<String>,

    /// Resize a column to a pixel width (repeatable)
    #[arg(long = "column-width", value_name = "COLUMN=PX")]
    pub widths: Vec<String>,

    /// Select the row with this key (repeatable)
    #[arg(long = "select", value_name = "KEY")]
    pub selected: Vec<String>,

    /// Select every row in view
    #[arg(long)]
    pub all: bool,
}

/// Parse `column` or `column:asc|desc`.
pub fn parse_sort(value: &str) -> Result<(String, SortDirection)> {
    let (column, direction) = match value.split_once(':') {
        Some((column, "asc")) => (column, SortDirection::Ascending),
        Some((column, "desc")) => (column, SortDirection::Descending),
        Some(_) => return Err(CliError::argument("--sort", value, "direction must be asc or desc")),
        None => (value, SortDirection::Ascending),
    };
    if column.is_empty() {
        return Err(CliError::argument("--sort", value, "missing column"));
    }
    Ok((column.to_string(), direction))
}

/// Split `column=value`.
fn parse_pair<'a>(flag: &'static str, value: &'a str) -> Result<(&'a str, &'a str)> {
    match value.split_once('=') {
        Some((column, rest)) if !column.is_empty() => Ok((column, rest)),
        _ => Err(CliError::argument(flag, value, "expected COLUMN=VALUE")),
    }
}

impl GridArgs {
    /// Load the definition and rows, then apply the command-line view state.
    pub fn open(&self) -> Result<FixedGrid> {
        let definition = GridDefinition::load(&self.grid)?;
        let mut grid = definition.build()?;
        grid.set_data(load_rows(&self.data)?);
        self.apply(&mut grid)?;
        Ok(grid)
    }

    pub fn apply(&self, grid: &mut FixedGrid) -> Result<()> {
        if !self.hidden.is_empty() {
            let mut hidden = grid.options().hidden_columns.clone();
            hidden.extend(self.hidden.iter().cloned());
            grid.set_hidden_columns(hidden);
        }

        for pair in &self.widths {
            let (column, px) = parse_pair("--column-width", pair)?;
            let width: f64 = px
                .parse()
                .map_err(|_| CliError::argument("--column-width", pair, "width must be a number"))?;
            let current = grid
                .column_width(column)
                .ok_or_else(|| GridError::unknown_column(column))?;
            grid.begin_resize(column, 0.0)?;
            grid.pointer_move(width - current);
            grid.end_resize();
        }

        for pair in &self.filters {
            let (column, text) = parse_pair("--filter", pair)?;
            grid.set_filter(column, text)?;
        }

        if let Some(sort) = &self.sort {
            let (column, direction) = parse_sort(sort)?;
            grid.toggle_sort(&column)?;
            if direction == SortDirection::Descending {
                grid.toggle_sort(&column)?;
            }
            if grid.sort().is_none_or(|s| s.column_id != column) {
                warn!("Sorting by '{column}' is not available");
            }
        }

        if self.all {
            grid.select_all(true);
        }
        for key in &self.selected {
            if grid.selection().is_selected(key) {
                continue;
            }
            let index = (0..grid.view_len())
                .find(|&i| grid.view_key(i) == Some(key.as_str()))
                .ok_or_else(|| CliError::argument("--select", key, "no row in view has this key"))?;
            grid.toggle_row(index);
        }
        debug!(
            "Applied view state: {} rows in view, {} selected",
            grid.view_len(),
            grid.selection().len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serde_json::json;

    use super::*;

    fn grid() -> FixedGrid {
        let mut grid = FixedGrid::new(
            vec![
                ColumnDef::new("name", "Name").width(100.0).fixed(),
                ColumnDef::new("amount", "Amount"),
                ColumnDef::new("city", "City"),
            ],
            GridOptions {
                show_checkboxes: true,
                ..GridOptions::default()
            },
        )
        .unwrap();
        grid.set_data(vec![
            json!({"id": 1, "name": "Alice", "amount": "100", "city": "Oslo"}),
            json!({"id": 2, "name": "Bob", "amount": "20", "city": "Bergen"}),
            json!({"id": 3, "name": "Malin", "amount": "75", "city": "Oslo"}),
        ]);
        grid
    }

    fn names(grid: &FixedGrid) -> Vec<&str> {
        grid.view()
            .into_iter()
            .filter_map(|row| row["name"].as_str())
            .collect()
    }

    #[test]
    fn test_command_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_view_command() {
        let args = CliArgs::try_parse_from([
            "fixgrid", "view", "-g", "grid.json", "-d", "rows.json", "-s", "amount:desc", "-f",
            "name=ali", "-f", "city=oslo", "--hide", "city", "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        let Command::View { grid, scroll, .. } = args.command else {
            panic!("expected view");
        };
        assert_eq!(scroll, 0);
        assert_eq!(grid.sort.as_deref(), Some("amount:desc"));
        assert_eq!(grid.filters, vec!["name=ali", "city=oslo"]);
        assert_eq!(grid.hidden, vec!["city"]);
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse_sort("amount").unwrap(),
            ("amount".to_string(), SortDirection::Ascending)
        );
        assert_eq!(
            parse_sort("amount:desc").unwrap(),
            ("amount".to_string(), SortDirection::Descending)
        );
        assert!(parse_sort("amount:sideways").is_err());
        assert!(parse_sort(":desc").is_err());
    }

    #[test]
    fn test_apply_filters_sort_and_selection() {
        let mut grid = grid();
        let args = GridArgs {
            filters: vec!["city=oslo".into()],
            sort: Some("amount:desc".into()),
            selected: vec!["3".into()],
            ..GridArgs::default()
        };
        args.apply(&mut grid).unwrap();

        assert_eq!(names(&grid), vec!["Alice", "Malin"]);
        assert_eq!(grid.selection().selected(), vec!["3".to_string()]);
    }

    #[test]
    fn test_apply_column_width_and_hidden() {
        let mut grid = grid();
        let args = GridArgs {
            widths: vec!["name=180".into()],
            hidden: vec!["city".into()],
            ..GridArgs::default()
        };
        args.apply(&mut grid).unwrap();

        assert_eq!(grid.column_width("name"), Some(180.0));
        assert!(!grid.is_resizing());
        assert!(!grid.columns().is_visible("city"));
    }

    #[test]
    fn test_apply_rejects_bad_arguments() {
        let bad_filter = GridArgs {
            filters: vec!["oslo".into()],
            ..GridArgs::default()
        };
        assert!(matches!(
            bad_filter.apply(&mut grid()),
            Err(CliError::Argument { flag: "--filter", .. })
        ));

        let filtered_out = GridArgs {
            filters: vec!["city=bergen".into()],
            selected: vec!["1".into()],
            ..GridArgs::default()
        };
        assert!(matches!(
            filtered_out.apply(&mut grid()),
            Err(CliError::Argument { flag: "--select", .. })
        ));

        let unknown = GridArgs {
            sort: Some("nope".into()),
            ..GridArgs::default()
        };
        assert!(matches!(
            unknown.apply(&mut grid()),
            Err(CliError::Grid(GridError::UnknownColumn { .. }))
        ));
    }

    #[test]
    fn test_select_all_then_extra_key_is_noop() {
        let mut grid = grid();
        let args = GridArgs {
            all: true,
            selected: vec!["2".into()],
            ..GridArgs::default()
        };
        args.apply(&mut grid).unwrap();
        assert_eq!(grid.selection().len(), 3);
    }
}
