#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # coursekit
//!
//! Course-administration helpers for instructors. The `categorize` command
//! takes a batch of downloaded submission files (a folder or the zip archive
//! the LMS produces) and groups the files into one folder per student.

use std::path::PathBuf;

use anyhow::Result;
use bpaf::*;
use coursekit::submissions::{self, CategorizeOptions};
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Group submission files by student handle
    Categorize {
        /// Flatten archive-internal folders while extracting
        flatten:     bool,
        /// Directory or zip archive of downloaded submission files
        source:      PathBuf,
        /// Directory that receives one folder per student
        destination: PathBuf,
    },
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    let flatten = long("flatten")
        .help("Extract archive members by file name only, dropping archive-internal folders")
        .switch();
    let source =
        positional::<PathBuf>("SOURCE").help("Directory or zip archive of downloaded submissions");
    let destination =
        positional::<PathBuf>("DESTINATION").help("Directory that receives one folder per student");

    let categorize = construct!(Cmd::Categorize {
        flatten,
        source,
        destination
    })
    .to_options()
    .command("categorize")
    .help("Group files from the same student together in a folder");

    let cmd = construct!([categorize]);

    cmd.to_options()
        .descr("Course administration helpers for instructors")
        .run()
}

fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Categorize {
            flatten,
            source,
            destination,
        } => {
            println!("Categorizing files ...");
            let options = CategorizeOptions {
                flatten_archive_paths: flatten,
            };
            submissions::categorize_with(&source, &destination, &options)?;
        }
    }

    Ok(())
}
