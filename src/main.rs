//! pdfknife - Split PDF files by page ranges and merge PDF files.

mod cli;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

use crate::cli::{Cli, Command, MergeArgs, SplitArgs};
use pdfknife::config::{Config, OverwriteMode};
use pdfknife::error::PdfKnifeError;
use pdfknife::io::{OutputWriter, UploadReader};
use pdfknife::ops::{self, MergeReport, SplitReport};
use pdfknife::output::{
    OutputFormatter, display_merge_plan, display_merge_statistics, display_split_plan,
    display_split_statistics, display_written,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cli.common.verbose {
                    tracing::Level::DEBUG
                } else {
                    tracing::Level::WARN
                }
                .into(),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{}", error_report(&err));
        process::exit(err.exit_code());
    }
}

/// Text printed to stderr for a failed invocation.
fn error_report(err: &PdfKnifeError) -> String {
    if err.is_internal() {
        format!(
            "Error: {err}\nThe input was accepted but the output could not be built; \
             rerun with --verbose for details."
        )
    } else {
        format!("Error: {err}")
    }
}

/// One-line summary of the effective settings, shown in verbose mode.
fn describe_settings(config: &Config) -> String {
    let selections = config
        .limits
        .max_selections
        .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string());
    format!(
        "compression={:?} jobs={} max_file_size={} max_selections={selections}",
        config.compression,
        config.effective_jobs(),
        config.limits.max_file_size,
    )
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfKnifeError> {
    cli.validate()?;
    let config = cli.to_config()?;

    // A JSON report owns stdout.
    let json = cli.common.json;
    let formatter = if json {
        OutputFormatter::new(true, false)
    } else {
        OutputFormatter::from_config(&config)
    };

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfknife::NAME, pdfknife::VERSION));
        formatter.debug(&describe_settings(&config));
        formatter.blank_line();
    }

    match &cli.command {
        Command::Split(args) => run_split(args, &config, &formatter, json).await,
        Command::Merge(args) => run_merge(args, &config, &formatter, json).await,
    }
}

async fn run_split(
    args: &SplitArgs,
    config: &Config,
    formatter: &OutputFormatter,
    json: bool,
) -> Result<(), PdfKnifeError> {
    let reader = UploadReader::with_size_limit(config.limits.max_file_size);
    formatter.info(&format!("Reading {}", args.input.display()));
    let upload = reader.load(&args.input).await?;
    let source = upload.name.clone();

    if config.dry_run {
        let plan = ops::plan_split(upload, &args.pages, config)?;
        if json {
            formatter.json(&plan)?;
        } else {
            display_split_plan(formatter, &plan);
            formatter.blank_line();
            formatter.success("Dry run completed successfully");
            formatter.info("  Run without --dry-run to create the output files");
        }
        return Ok(());
    }

    formatter.info(&format!("Splitting by \"{}\"...", args.pages));
    let result = ops::split_documents(upload, &args.pages, config).await?;
    display_split_statistics(formatter, &result.statistics);

    let writer = OutputWriter::new();
    let report = SplitReport::new(&source, &result);

    if let Some(dir) = &args.out_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| PdfKnifeError::FailedToWrite {
                path: dir.clone(),
                source,
            })?;
        for output in &result.outputs {
            handle_output_overwrite(&writer, &dir.join(&output.name), config, formatter).await?;
        }

        let written = writer.write_all(result.outputs, dir).await?;
        if json {
            formatter.json(&report)?;
        } else {
            for stats in &written {
                display_written(formatter, stats);
            }
        }
        return Ok(());
    }

    let delivered = ops::package_outputs(result.outputs, config)?;
    let report = report.delivered_as(&delivered);
    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&delivered.blob().name));

    handle_output_overwrite(&writer, &target, config, formatter).await?;
    writer.can_write(&target).await?;

    let stats = writer.write(delivered.into_blob().bytes, &target).await?;
    if json {
        formatter.json(&report)?;
    } else {
        display_written(formatter, &stats);
    }

    Ok(())
}

async fn run_merge(
    args: &MergeArgs,
    config: &Config,
    formatter: &OutputFormatter,
    json: bool,
) -> Result<(), PdfKnifeError> {
    let paths = args.all_inputs().await?;

    formatter.info(&format!("Reading {} file(s)...", paths.len()));
    let reader = UploadReader::with_size_limit(config.limits.max_file_size);
    let uploads = reader.load_all(&paths, config.effective_jobs()).await?;

    if config.dry_run {
        let plan = ops::plan_merge(uploads, config).await?;
        if json {
            formatter.json(&plan)?;
        } else {
            display_merge_plan(formatter, &plan);
            formatter.blank_line();
            formatter.success("Dry run completed successfully");
            formatter.info("  Run without --dry-run to create the merged PDF");
        }
        return Ok(());
    }

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.merged_name));

    let writer = OutputWriter::new();
    handle_output_overwrite(&writer, &target, config, formatter).await?;
    writer.can_write(&target).await?;

    formatter.info("Merging documents...");
    let result = ops::merge_documents(uploads, config).await?;
    display_merge_statistics(formatter, &result.statistics);

    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.merged_name.clone());
    let report = MergeReport::new(&name, &result);

    let stats = writer.write(result.bytes, &target).await?;
    if json {
        formatter.json(&report)?;
    } else {
        formatter.info(&format!(
            "Merged {} file(s) into {} pages",
            report.files_merged, report.total_pages
        ));
        display_written(formatter, &stats);
    }

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    writer: &OutputWriter,
    path: &Path,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfKnifeError> {
    if !writer.exists(path).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfKnifeError::output_exists(path.to_path_buf())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(PdfKnifeError::output_exists(path.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin().read_line(&mut response)?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfKnifeError::Cancelled)
            }
        }
    }
}
