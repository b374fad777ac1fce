//! ╭─────────────────────────────────────────────────────────────────────────────╮
//! │ Delta CLI                                                                   │
//! ╰─────────────────────────────────────────────────────────────────────────────╯
//!
//! A small demonstration binary that exercises the `quillai_delta` algebra
//! end to end: compose, diff, invert, transform, and document rendering,
//! each reading its operands from JSON files and printing the result.
mod cli;
mod error;

use clap::Parser;
use quillai_delta::Delta;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

fn main() -> Result<()> {
    let args = crate::cli::App::parse();

    quillai_log::init_simple_logger(args.log_level)?;

    let output = match args.command {
        cli::Command::Compose(operands) => {
            let base = read_delta(&operands.first)?;
            let change = read_delta(&operands.second)?;
            info!(base_len = base.ops().len(), change_len = change.ops().len(), "composing");
            base.compose(&change)?
        }
        cli::Command::Diff(operands) => {
            let first = read_delta(&operands.first)?;
            let second = read_delta(&operands.second)?;
            info!("diffing documents");
            first.diff(&second)?
        }
        cli::Command::Invert { delta, base } => {
            let delta = read_delta(&delta)?;
            let base = read_delta(&base)?;
            info!("inverting");
            delta.invert(&base)?
        }
        cli::Command::Transform { a, b, priority } => {
            let a = read_delta(&a)?;
            let b = read_delta(&b)?;
            info!(priority, "transforming");
            a.transform(&b, priority)?
        }
        cli::Command::Document { delta } => {
            let delta = read_delta(&delta)?;
            println!("{}", delta.document()?);
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_delta(path: &Path) -> Result<Delta> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
