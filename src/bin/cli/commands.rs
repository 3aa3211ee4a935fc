//! Command implementations for the CLI tool.

use std::path::Path;

use dexzip::{Error, MergeBuilder, MergeLimits, MergeOptions, verify_merged};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;
use crate::progress::CliProgress;

/// Configuration for the merge command.
pub struct MergeConfig<'a> {
    pub inner_path: &'a Path,
    pub outer_path: &'a Path,
    pub output_path: &'a Path,
    pub max_input_size: Option<u64>,
    pub require_dex: bool,
    pub verify: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl MergeConfig<'_> {
    fn options(&self) -> MergeOptions {
        let mut limits = MergeLimits::default();
        if let Some(max) = self.max_input_size {
            limits = limits.max_inner_size(max).max_outer_size(max);
        }
        MergeOptions::new()
            .limits(limits)
            .require_dex(self.require_dex)
    }
}

/// Merge command implementation
pub fn merge(config: &MergeConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let inner = match read_input(config.inner_path, "inner file") {
        Ok(data) => data,
        Err(code) => return code,
    };
    let outer = match read_input(config.outer_path, "outer archive") {
        Ok(data) => data,
        Err(code) => return code,
    };

    // JSON output owns stdout
    let show_progress = !config.quiet && config.format == OutputFormat::Human;

    let merged = match MergeBuilder::new()
        .options(config.options())
        .observer(CliProgress::new(!show_progress))
        .build(&inner, &outer)
    {
        Ok(merged) => merged,
        Err(e) => {
            eprintln!("Error: merge failed: {}", e);
            return error_to_exit_code(&e);
        }
    };

    let verification = if config.verify {
        match verify_merged(&merged.data, inner.len()) {
            Ok(v) if v.is_ok() => Some(v),
            Ok(v) => {
                eprint!("{}", formatter.format_verification(&v));
                eprintln!("Error: merged file failed verification, nothing written");
                return ExitCode::FatalError;
            }
            Err(e) => {
                eprintln!("Error: verification failed: {}", e);
                return error_to_exit_code(&e);
            }
        }
    } else {
        None
    };

    if let Err(e) = std::fs::write(config.output_path, &merged.data) {
        eprintln!(
            "Error: cannot write {}: {}",
            config.output_path.display(),
            e
        );
        return error_to_exit_code(&Error::Io(e));
    }

    if !config.quiet {
        let text = match &verification {
            Some(v) => formatter.format_verified_report(&merged.report, config.output_path, v),
            None => formatter.format_report(&merged.report, config.output_path),
        };
        print!("{}", text);
        if config.format == OutputFormat::Json {
            println!();
        }
    }

    ExitCode::Success
}

/// Reads an input file
fn read_input(path: &Path, what: &str) -> Result<Vec<u8>, ExitCode> {
    std::fs::read(path).map_err(|e| {
        eprintln!("Error: cannot read {} {}: {}", what, path.display(), e);
        error_to_exit_code(&Error::Io(e))
    })
}
