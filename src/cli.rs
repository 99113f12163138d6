use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{FileOrder, MergeOptions, MergeSettings};

#[derive(Debug, Parser)]
#[command(author, version, about = "Merge CSV and spreadsheet exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge files of the same kind and write one output per kind
    Merge(MergeArgs),
    /// Merge in memory and print the first rows of each result
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct MergeInputArgs {
    /// Files to merge (.csv/.txt, .xlsx/.xlsm/.xls/.ods), in merge order
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Leading title rows per file, kept from the first file only
    #[arg(short = 's', long = "skip-rows")]
    pub skip_rows: Option<usize>,
    /// YAML file with default merge options
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Candidate encodings for CSV input, tried in order (repeatable)
    #[arg(long = "encoding", action = clap::ArgAction::Append)]
    pub encodings: Vec<String>,
    /// Order in which files of the same kind are concatenated
    #[arg(long = "order", value_enum)]
    pub order: Option<FileOrder>,
    /// Discard data rows whose cells are all empty
    #[arg(long = "drop-blank-rows")]
    pub drop_blank_rows: bool,
}

impl MergeInputArgs {
    /// Config file values (or defaults) overridden by explicit flags.
    pub fn options(&self) -> Result<MergeOptions> {
        let mut options = match &self.config {
            Some(path) => MergeOptions::load(path)
                .with_context(|| format!("Loading merge options from {path:?}"))?,
            None => MergeOptions::default(),
        };
        if let Some(skip_rows) = self.skip_rows {
            options.skip_rows = skip_rows;
        }
        if !self.encodings.is_empty() {
            options.encodings = self.encodings.clone();
        }
        if let Some(order) = self.order {
            options.order = order;
        }
        options.drop_blank_rows |= self.drop_blank_rows;
        Ok(options)
    }

    pub fn settings(&self) -> Result<MergeSettings> {
        Ok(self.options()?.resolve()?)
    }
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub merge: MergeInputArgs,
    /// Directory that receives the merged files
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// Also print a preview of each merged result
    #[arg(long)]
    pub preview: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub merge: MergeInputArgs,
}
