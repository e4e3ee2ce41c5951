//! Assembler run/pass orchestration.
//!
//! This module owns the CLI-driven run flow: per input file, macro
//! preprocessing, the two assembly passes, and output emission. Inputs are
//! fully independent; a failing file reports its diagnostics and never
//! aborts the run.

use super::*;

/// Run the assembler with command-line arguments.
pub(super) fn run() -> Result<Vec<AsmRunReport>, AsmRunError> {
    let cli = Cli::parse();
    run_with_cli(&cli)
}

pub(super) fn run_with_cli(cli: &Cli) -> Result<Vec<AsmRunReport>, AsmRunError> {
    let config = validate_cli(cli)?;

    let mut reports = Vec::with_capacity(config.inputs.len());
    for base in &config.inputs {
        reports.push(run_one(base));
    }
    Ok(reports)
}

fn run_one(base: &str) -> AsmRunReport {
    let mut diagnostics = Vec::new();
    let source_path = format!("{base}.as");
    let expanded_path = format!("{base}.am");

    let lines = match read_source_lines(&source_path) {
        Ok(lines) => lines,
        Err(_) => {
            diagnostics.push(Diagnostic::new(ErrorKind::CannotOpenFile));
            return AsmRunReport::new(base, diagnostics);
        }
    };

    let mut preprocessor = MacroProcessor::new();
    let expanded = match preprocessor.expand(&lines) {
        Ok(expanded) => expanded,
        Err(diagnostic) => {
            diagnostics.push(diagnostic);
            diagnostics.push(Diagnostic::new(ErrorKind::MacroExpansionFailed));
            remove_stale_file(&expanded_path, &mut diagnostics);
            return AsmRunReport::new(base, diagnostics);
        }
    };
    if write_expanded_source(&expanded_path, &expanded).is_err() {
        diagnostics.push(Diagnostic::new(ErrorKind::CannotCreateFile));
        diagnostics.push(Diagnostic::new(ErrorKind::MacroExpansionFailed));
        return AsmRunReport::new(base, diagnostics);
    }

    let mut assembler = Assembler::new();

    let pass1 = assembler.pass1(&expanded);
    diagnostics.extend(assembler.take_diagnostics());
    if pass1.errors > 0 {
        diagnostics.push(Diagnostic::new(ErrorKind::FirstPassFailed));
    }

    // The second pass always runs so its diagnostics are reported too; the
    // expanded source stays on disk as a diagnostic aid.
    let pass2 = assembler.pass2(&expanded);
    diagnostics.extend(assembler.take_diagnostics());
    if pass2.errors > 0 {
        diagnostics.push(Diagnostic::new(ErrorKind::SecondPassFailed));
    }

    if pass1.errors == 0 && pass2.errors == 0 {
        if let Err(diagnostic) = output::write_output_files(&assembler, base) {
            diagnostics.push(diagnostic);
        }
    }

    AsmRunReport::new(base, diagnostics)
}

fn read_source_lines(path: &str) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

fn write_expanded_source(path: &str, lines: &[String]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}

/// A failed preprocessing run must not leave an expanded source behind, not
/// even one from an earlier successful run.
fn remove_stale_file(path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(_) => diagnostics.push(Diagnostic::new(ErrorKind::CannotDeleteFile)),
    }
}
