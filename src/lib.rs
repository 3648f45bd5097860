//! obb-import: fault-isolating importer for YOLO oriented-bounding-box
//! datasets.
//!
//! The importer turns a directory of images plus per-image annotation files
//! (four normalized corner points per box) into materialized dataset items.
//! Items resolve lazily on first access, and failures are isolated to the
//! smallest unit that caused them: a malformed line drops one box, a broken
//! image drops one item, and only structural problems (bad category file,
//! missing root) abort the import.
//!
//! # Modules
//!
//! - [`dataset`]: subset cache, category/index loaders, the data model
//! - [`geometry`]: minimum-area enclosing rectangle for corner points
//! - [`report`]: the [`ErrorSink`](report::ErrorSink) contract and
//!   [`ImportLog`](report::ImportLog)
//! - [`error`]: the structural/item/annotation error taxonomy

pub mod dataset;
pub mod error;
pub mod geometry;
pub mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use dataset::{import_subset, Import, Subset};
pub use error::ImportError;
pub use report::{ErrorSink, ImportLog};

/// The obb-import CLI application.
#[derive(Parser)]
#[command(name = "obb-import")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Import a subset and summarize what survived and what was dropped.
    Inspect(InspectArgs),
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Dataset root directory.
    root: PathBuf,

    /// Subset to import (matches the '<subset>_obj' folder).
    #[arg(long, default_value = "train")]
    subset: String,

    /// Output format for the summary ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the obb-import CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ImportError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("obb-import {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Importer for YOLO oriented-bounding-box datasets.");
            println!();
            println!("Run 'obb-import --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), ImportError> {
    let import = import_subset(&args.root, &args.subset)?;

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&import)
                .expect("import summary serializes to JSON");
            println!("{json}");
        }
        _ => {
            let box_count: usize = import.items.iter().map(|item| item.boxes.len()).sum();
            println!("subset '{}':", import.subset);
            println!(
                "  {} categories, {} items, {} boxes",
                import.categories.len(),
                import.items.len(),
                box_count
            );
            if !import.log.is_clean() {
                println!();
                println!("Dropped:");
                print!("{}", import.log);
            }
        }
    }

    Ok(())
}
