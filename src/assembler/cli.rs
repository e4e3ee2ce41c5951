// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::core::error::{AsmRunError, Diagnostic, ErrorKind};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Two-pass assembler for a 12-bit word-addressed machine.

Each BASENAME names one compilation unit: BASENAME.as is read, macro
expansion is written to BASENAME.am, and a clean run produces BASENAME.ob
plus BASENAME.ent/BASENAME.ext when the source exports or imports labels.
Inputs are independent; a file that fails to assemble prints its diagnostics
and suppresses only its own outputs.";

#[derive(Parser, Debug)]
#[command(
    name = "wordforge",
    version = VERSION,
    about = "Two-pass assembler for a 12-bit word-addressed machine",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    /// Base filenames; `.as` is appended to locate each source file.
    #[arg(value_name = "BASENAME")]
    pub inputs: Vec<String>,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select diagnostic output format. text is default; json emits one JSON object per diagnostic."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'E',
        long = "error",
        value_name = "FILE",
        long_help = "Write diagnostics to FILE instead of stdout."
    )]
    pub error_file: Option<PathBuf>,
    #[arg(
        long = "error-append",
        action = ArgAction::SetTrue,
        requires = "error_file",
        long_help = "Append diagnostics to --error FILE instead of truncating it."
    )]
    pub error_append: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where diagnostics go.
#[derive(Debug, Clone)]
pub enum DiagnosticsSinkConfig {
    Stdout,
    File { path: PathBuf, append: bool },
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub inputs: Vec<String>,
    pub format: OutputFormat,
    pub diagnostics_sink: DiagnosticsSinkConfig,
}

/// Validate parsed arguments. The input list is checked here rather than by
/// clap so an empty invocation reports the assembler's own diagnostic and
/// exit status.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, AsmRunError> {
    if cli.inputs.is_empty() {
        return Err(AsmRunError::new(Diagnostic::new(
            ErrorKind::NotEnoughParams,
        )));
    }

    let diagnostics_sink = match &cli.error_file {
        Some(path) => DiagnosticsSinkConfig::File {
            path: path.clone(),
            append: cli.error_append,
        },
        None => DiagnosticsSinkConfig::Stdout,
    };

    Ok(CliConfig {
        inputs: cli.inputs.clone(),
        format: cli.format,
        diagnostics_sink,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_inputs_is_rejected_with_the_canonical_diagnostic() {
        let cli = Cli::parse_from(["wordforge"]);
        let err = validate_cli(&cli).unwrap_err();
        assert_eq!(err.diagnostic().kind(), ErrorKind::NotEnoughParams);
        assert_eq!(err.to_string(), "ERROR: Not enough parameters");
    }

    #[test]
    fn inputs_and_sink_pass_through() {
        let cli = Cli::parse_from(["wordforge", "-E", "diag.log", "--error-append", "a", "b"]);
        let config = validate_cli(&cli).expect("valid");
        assert_eq!(config.inputs, ["a", "b"]);
        assert_eq!(config.format, OutputFormat::Text);
        match config.diagnostics_sink {
            DiagnosticsSinkConfig::File { ref path, append } => {
                assert_eq!(path, &PathBuf::from("diag.log"));
                assert!(append);
            }
            DiagnosticsSinkConfig::Stdout => panic!("expected file sink"),
        }
    }

    #[test]
    fn format_defaults_to_text_and_accepts_json() {
        let cli = Cli::parse_from(["wordforge", "--format", "json", "prog"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
