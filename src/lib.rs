pub mod align;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod io_utils;
pub mod merge;
pub mod merge_cmd;
pub mod model;
pub mod output;
pub mod preview;
pub mod reader;
pub mod split;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    config::{FileOrder, MergeOptions, MergeSettings},
    error::{ConfigError, DecodeFailure, MergeError},
    merge::{Disposition, FileFailure, MergeReport, merge, merge_with},
    model::{FileKind, InputFile, MergedResult, Row},
    output::serialize,
    preview::{PREVIEW_ROW_LIMIT, preview},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_merge", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Merge(args) => merge_cmd::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}
