//! CLI tool for building DEX/ZIP polyglot files.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Prepend a DEX image to a ZIP/APK archive
#[derive(Parser)]
#[command(name = "dexzip")]
#[command(author, version, about = "Prepend a DEX image to a ZIP/APK archive", long_about = None)]
pub struct Cli {
    /// Inner file (DEX image) placed at offset 0
    #[arg(required_unless_present = "completions")]
    inner: Option<PathBuf>,

    /// Outer ZIP-family archive (ZIP, JAR, APK)
    #[arg(required_unless_present = "completions")]
    outer: Option<PathBuf>,

    /// Merged output file
    #[arg(required_unless_present = "completions")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Maximum size of either input in bytes
    #[arg(long, env = "DEXZIP_MAX_INPUT_SIZE")]
    max_input_size: Option<u64>,

    /// Fail if the inner file is not a DEX image
    #[arg(long)]
    require_dex: bool,

    /// Re-check the merged file before reporting success
    #[arg(long)]
    verify: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_codes::BAD_ARGS);
        }
        Err(e) => {
            // --help and --version
            let _ = e.print();
            std::process::exit(exit_codes::SUCCESS);
        }
    };

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        std::process::exit(ExitCode::Success.code());
    }

    let exit_code = match (cli.inner, cli.outer, cli.output) {
        (Some(inner), Some(outer), Some(output)) => commands::merge(&commands::MergeConfig {
            inner_path: &inner,
            outer_path: &outer,
            output_path: &output,
            max_input_size: cli.max_input_size,
            require_dex: cli.require_dex,
            verify: cli.verify,
            format: cli.format,
            quiet: cli.quiet,
        }),
        _ => {
            eprintln!("Error: INNER, OUTER and OUTPUT are required");
            ExitCode::BadArgs
        }
    };

    std::process::exit(exit_code.code());
}
