//! JSON Lines helpers shared by the file-backed stores.
//!
//! Records are appended one JSON object per line. Readers skip lines that
//! fail to parse, and appends first terminate a torn last line, so a single
//! torn write never hides the rest of the log.
//! Callers own the locking: these helpers operate on an already-locked file.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Open (creating if needed) a log for reading and appending
pub(crate) fn open_rw(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;
    Ok(file)
}

/// Read every parseable record from the start of the file
pub(crate) fn read_records<T: DeserializeOwned>(mut file: &File) -> Result<Vec<T>> {
    file.seek(SeekFrom::Start(0))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(records)
}

/// True if the file is non-empty and its last byte is not a newline
fn has_unterminated_tail(mut file: &File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Append records as JSON lines and flush them to disk
///
/// The file must be open for reading as well (see [`open_rw`]).
pub(crate) fn append_records<T: Serialize>(file: &File, records: &[T]) -> Result<()> {
    let mut buf = Vec::new();
    if has_unterminated_tail(file)? {
        tracing::warn!("Log ends with a partial line; terminating it before appending");
        buf.push(b'\n');
    }
    for record in records {
        serde_json::to_writer(&mut buf, record)?;
        buf.push(b'\n');
    }

    let mut writer = std::io::BufWriter::new(file);
    writer.write_all(&buf)?;
    writer.flush()?;
    drop(writer);
    file.sync_data()?;
    Ok(())
}
