//! CLI argument parsing for pdfknife.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use pdfknife::config::{CompressionLevel, Config, Limits, OverwriteMode};
use pdfknife::error::{PdfKnifeError, Result};
use pdfknife::utils::collect_paths_for_patterns;

/// Split PDF files by page ranges and merge PDF files into one document.
#[derive(Parser, Debug)]
#[command(name = "pdfknife")]
#[command(version)]
#[command(about = "Split PDF files by page ranges and merge PDF files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// The two operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract page groups from one PDF into separate documents
    ///
    /// Each comma-separated selection becomes its own output. A single
    /// output is written as a PDF; several are packed into a ZIP archive.
    ///
    /// Examples:
    ///   pdfknife split report.pdf --pages "1,3-5"
    ///   pdfknife split report.pdf --pages "1-10" -o intro.pdf
    ///   pdfknife split book.pdf --pages "1-20,21-40" --out-dir chapters
    Split(SplitArgs),

    /// Merge PDF files into a single document, in the order given
    ///
    /// Examples:
    ///   pdfknife merge cover.pdf body.pdf -o book.pdf
    ///   pdfknife merge "chapter*.pdf" -o book.pdf
    Merge(MergeArgs),
}

/// Arguments of `pdfknife split`.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Page selections, e.g. "1,3-5,1"
    ///
    /// Page numbers are 1-based. A reversed range such as "5-2" is read
    /// as "2-5". Pages past the end of the document are ignored.
    #[arg(short, long, value_name = "SPEC")]
    pub pages: String,

    /// Output file path
    ///
    /// Defaults to the generated name in the current directory
    /// (e.g. page_1.pdf or split_pdfs.zip).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write each output PDF into this directory instead of one archive
    #[arg(long, value_name = "DIR", conflicts_with = "output")]
    pub out_dir: Option<PathBuf>,

    /// Dry run - show planned outputs without building any document
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Arguments of `pdfknife merge`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input PDF files or glob patterns, in merge order
    ///
    /// Matches of one pattern are merged in alphabetical order.
    #[arg(value_name = "FILE|GLOB", required_unless_present = "input_list")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Read input file list from a file (one path per line)
    ///
    /// Lines starting with '#' are ignored. Use '-' to read from stdin.
    /// Paths from the list are merged after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Dry run - validate inputs and preview the merge without creating output
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Flags shared by both subcommands.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Force overwrite of existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output - show statistics and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Compression level for output PDFs
    ///
    /// - none: No compression (preserves exact quality)
    /// - standard: Compress content streams (default)
    /// - maximum: Also drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard", global = true)]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Number of documents processed concurrently
    ///
    /// Default is number of CPU cores. Use 1 for sequential processing.
    #[arg(short, long, value_name = "N", global = true)]
    pub jobs: Option<usize>,

    /// Print a JSON report instead of status messages
    #[arg(long, global = true)]
    pub json: bool,

    /// Largest accepted input file in bytes
    #[arg(long, value_name = "BYTES", env = "PDFKNIFE_MAX_FILE_SIZE", global = true)]
    pub max_file_size: Option<u64>,

    /// Largest accepted combined merge input in bytes
    #[arg(long, value_name = "BYTES", env = "PDFKNIFE_MAX_TOTAL_SIZE", global = true)]
    pub max_total_size: Option<u64>,

    /// Most files a merge accepts
    #[arg(long, value_name = "N", env = "PDFKNIFE_MAX_MERGE_FILES", global = true)]
    pub max_merge_files: Option<usize>,

    /// Most selections a page specification may contain [default: unlimited]
    #[arg(long, value_name = "N", env = "PDFKNIFE_MAX_SELECTIONS", global = true)]
    pub max_selections: Option<usize>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is invalid or the
    /// resulting configuration fails validation.
    pub fn to_config(&self) -> Result<Config> {
        let common = &self.common;

        let compression = CompressionLevel::from_str(&common.compression)?;

        let overwrite_mode = if common.force {
            OverwriteMode::Force
        } else if common.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let defaults = Limits::default();
        let limits = Limits {
            max_file_size: common.max_file_size.unwrap_or(defaults.max_file_size),
            max_total_size: common.max_total_size.unwrap_or(defaults.max_total_size),
            max_merge_files: common.max_merge_files.unwrap_or(defaults.max_merge_files),
            max_selections: common.max_selections.or(defaults.max_selections),
            ..defaults
        };

        let dry_run = match &self.command {
            Command::Split(args) => args.dry_run,
            Command::Merge(args) => args.dry_run,
        };

        let config = Config {
            limits,
            compression,
            jobs: common.jobs,
            dry_run,
            verbose: common.verbose,
            quiet: common.quiet,
            overwrite_mode,
            ..Config::default()
        };

        config.validate().map_err(|e| {
            PdfKnifeError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.common.jobs
            && jobs == 0
        {
            return Err(PdfKnifeError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if let Command::Split(args) = &self.command
            && args.pages.trim().is_empty()
        {
            return Err(PdfKnifeError::invalid_config("--pages cannot be empty"));
        }

        Ok(())
    }
}

impl MergeArgs {
    /// Get all input paths including those from the input-list file.
    ///
    /// Patterns are expanded first, in argument order; paths from
    /// `--input-list` are appended after them.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or the list cannot be read.
    pub async fn all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = collect_paths_for_patterns(&self.inputs)?;

        if let Some(ref list) = self.input_list {
            all_inputs.extend(read_input_list(list).await?);
        }

        if all_inputs.is_empty() {
            return Err(PdfKnifeError::InsufficientInputs { provided: 0 });
        }

        Ok(all_inputs)
    }
}

/// Read input paths from a file, or from stdin when `path` is `-`.
async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source| PdfKnifeError::FileNotAccessible {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        let stdin = BufReader::new(tokio::io::stdin());
        return parse_input_list(stdin).await.map_err(unreadable);
    }

    let file = tokio::fs::File::open(path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            PdfKnifeError::file_not_found(path.to_path_buf())
        } else {
            unreadable(err)
        }
    })?;

    parse_input_list(BufReader::new(file))
        .await
        .map_err(unreadable)
}

/// One path per line; blank lines and `#` comments are skipped.
async fn parse_input_list<R>(reader: R) -> std::io::Result<Vec<PathBuf>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut paths = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}
