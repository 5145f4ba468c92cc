mod cli;
mod config;
mod error;
mod paths;
mod render;

use std::fs::{self, File};
use std::path::Path;

use clap::Parser;
use fixgrid::prelude::*;
use log::{debug, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::cli::{CliArgs, Command};
use crate::error::{CliError, Result};
use crate::render::TextPainter;

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(args) {
        // The grid already reported its own warnings.
        if !matches!(&e, CliError::Grid(grid) if grid.is_user_warning()) {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    init_logging(args.log_file.as_deref(), args.verbose)?;

    match args.command {
        Command::View {
            grid,
            scroll,
            width,
            char_width,
            color,
        } => {
            let grid = grid.open()?;
            let painter = TextPainter {
                char_width,
                scroll_x: scroll,
                viewport: width,
                color,
            };
            println!("{}", painter.paint(&grid.frame()));
            Ok(())
        }
        Command::Export { grid, out, visible } => {
            let mut grid = grid.open()?;
            grid.subscribe(|event| {
                if let GridEvent::Warning(message) = event {
                    eprintln!("Warning: {message}");
                }
            });
            let mut sink = DirectorySink::new(out);
            let export = if visible {
                grid.export_visible(&mut sink)?
            } else {
                grid.export_selected(&mut sink)?
            };
            info!("Exported {} rows to {}", export.row_count, export.filename);
            for path in sink.written() {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn init_logging(path: Option<&Path>, verbose: u8) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => paths::log_file().ok_or(CliError::NoLogDir)?,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| CliError::LogFile {
            path: path.clone(),
            source,
        })?;
    }
    let file = File::create(&path).map_err(|source| CliError::LogFile {
        path: path.clone(),
        source,
    })?;

    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    WriteLogger::init(level, Config::default(), file)?;
    debug!("Logging to {} at {}", path.display(), level);
    Ok(())
}
