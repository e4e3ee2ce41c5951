// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for wordforge.

use std::fs::OpenOptions;
use std::io::{self, Write};

use clap::Parser;

use wordforge::assembler::cli::{validate_cli, Cli, DiagnosticsSinkConfig, OutputFormat};
use wordforge::core::error::Diagnostic;

struct DiagnosticsSink {
    writer: Box<dyn Write>,
}

impl DiagnosticsSink {
    fn from_config(config: &DiagnosticsSinkConfig) -> io::Result<Self> {
        match config {
            DiagnosticsSinkConfig::Stdout => Ok(Self {
                writer: Box::new(io::stdout()),
            }),
            DiagnosticsSinkConfig::File { path, append } => {
                let mut opts = OpenOptions::new();
                opts.create(true).write(true);
                if *append {
                    opts.append(true);
                } else {
                    opts.truncate(true);
                }
                let file = opts.open(path)?;
                Ok(Self {
                    writer: Box::new(file),
                })
            }
        }
    }

    fn emit(&mut self, diagnostic: &Diagnostic, format: OutputFormat) {
        let line = match format {
            OutputFormat::Text => diagnostic.format(),
            OutputFormat::Json => diagnostic.to_json().to_string(),
        };
        let _ = writeln!(self.writer, "{line}");
    }
}

fn main() {
    let cli = Cli::parse();
    let config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            println!("{err}");
            std::process::exit(1);
        }
    };

    let mut sink = match DiagnosticsSink::from_config(&config.diagnostics_sink) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("Failed to open diagnostics sink: {err}");
            std::process::exit(1);
        }
    };

    match wordforge::assembler::run_with_cli(&cli) {
        Ok(reports) => {
            for report in &reports {
                for diagnostic in report.diagnostics() {
                    sink.emit(diagnostic, config.format);
                }
            }
        }
        Err(err) => {
            sink.emit(err.diagnostic(), config.format);
            std::process::exit(1);
        }
    }
}
