use super::*;

use crate::core::symbol_table::{ExternLog, SymbolTable};
use crate::core::words::base64_pair;

/// Write the object file and, when the run produced entries or external
/// references, the companion `.ent`/`.ext` files.
pub(super) fn write_output_files(assembler: &Assembler, base: &str) -> Result<(), Diagnostic> {
    write_file(&format!("{base}.ob"), |writer| {
        write_object(writer, &assembler.code, &assembler.data)
    })?;
    if assembler.entry_seen {
        write_file(&format!("{base}.ent"), |writer| {
            write_entries(writer, &assembler.symbols)
        })?;
    }
    if assembler.extern_seen {
        write_file(&format!("{base}.ext"), |writer| {
            write_externals(writer, &assembler.externs)
        })?;
    }
    Ok(())
}

fn write_file(
    path: &str,
    emit: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), Diagnostic> {
    let file = File::create(path).map_err(|_| Diagnostic::new(ErrorKind::CannotCreateFile))?;
    let mut writer = BufWriter::new(file);
    emit(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|_| Diagnostic::new(ErrorKind::CannotCreateFile))
}

/// Header `IC<TAB>DC`, then every code word followed by every data word, one
/// two-character base-64 rendering per line.
pub(super) fn write_object<W: Write>(writer: &mut W, code: &[u16], data: &[u16]) -> io::Result<()> {
    writeln!(writer, "{}\t{}", code.len(), data.len())?;
    for &word in code.iter().chain(data) {
        writeln!(writer, "{}", base64_pair(word))?;
    }
    Ok(())
}

/// One `name<TAB>address` line per entry symbol, in table insertion order.
pub(super) fn write_entries<W: Write>(writer: &mut W, symbols: &SymbolTable) -> io::Result<()> {
    for symbol in symbols.iter().filter(|symbol| symbol.is_entry) {
        writeln!(writer, "{}\t{}", symbol.name, symbol.address)?;
    }
    Ok(())
}

/// One `name<TAB>address` line per recorded reference, in encounter order.
pub(super) fn write_externals<W: Write>(writer: &mut W, externs: &ExternLog) -> io::Result<()> {
    for reference in externs.iter() {
        writeln!(writer, "{}\t{}", reference.name, reference.address)?;
    }
    Ok(())
}
