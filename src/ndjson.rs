//! NDJSON archive ingestion.
//!
//! The ingestion collaborator writes one self-contained JSON record per
//! line. Blank lines are tolerated; a line that fails to parse is fatal to
//! the run — partial output from a corrupted archive is worse than no
//! output (see [`crate::error`]).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, TelepressError};
use crate::message::Message;

/// Reads all records from an NDJSON archive file.
pub fn read_messages(path: &Path) -> Result<Vec<Message>> {
    let file = File::open(path)?;
    read_messages_from(BufReader::new(file), Some(path))
}

/// Reads all records from any buffered reader.
///
/// `path` is only used to enrich parse errors.
pub fn read_messages_from<R: BufRead>(reader: R, path: Option<&Path>) -> Result<Vec<Message>> {
    let mut messages = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let message: Message = serde_json::from_str(trimmed)
            .map_err(|e| TelepressError::parse(index + 1, e, path.map(Path::to_path_buf)))?;
        messages.push(message);
    }

    Ok(messages)
}
