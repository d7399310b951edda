// Corpus file: one passage per line, UTF-8
use atomicwrites::{AllowOverwrite, AtomicFile};
use liftdoc_core::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read passages from a corpus file.
///
/// Lines are trimmed and blank lines skipped, so a file with N non-blank
/// lines yields exactly N passages in file order.
pub fn load_passages<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut passages = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            passages.push(trimmed.to_string());
        }
    }
    Ok(passages)
}

/// Write passages one per line, atomically replacing any existing file.
///
/// Line breaks inside a passage are folded to spaces so the line/passage
/// correspondence survives a reload.
pub fn save_passages<P, S>(path: P, passages: &[S]) -> Result<()>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let file = AtomicFile::new(path.as_ref(), AllowOverwrite);
    file.write(|f| {
        for passage in passages {
            let line = fold_line_breaks(passage.as_ref());
            f.write_all(line.trim().as_bytes())?;
            f.write_all(b"\n")?;
        }
        f.flush()
    })
    .map_err(|e| match e {
        atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
    })
}

#[inline]
fn fold_line_breaks(text: &str) -> String {
    text.replace(|c: char| c == '\r' || c == '\n', " ")
}
