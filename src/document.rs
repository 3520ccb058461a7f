use std::io::Read;

use crate::constants::RECORD_TYPE_DOCUMENT;
use crate::error::{Result, SavError};
use crate::io_utils::{self, ByteSource};

/// Parse a type 6 (document) record, tag included.
///
/// Returns the document lines (each 80 bytes on disk, trimmed).
pub fn parse_document<R: Read>(source: &mut ByteSource<R>) -> Result<Vec<String>> {
    let tag = source.read_i32()?;
    if tag != RECORD_TYPE_DOCUMENT {
        return Err(SavError::Malformed(format!(
            "expected document record tag 6, got {tag}"
        )));
    }

    let n_lines = source.read_i32()? as usize;
    let mut lines = Vec::with_capacity(n_lines);

    for _ in 0..n_lines {
        let line_bytes = source.read_bytes(80)?;
        lines.push(io_utils::bytes_to_string_lossy(
            io_utils::trim_trailing_padding(&line_bytes),
        ));
    }

    Ok(lines)
}
