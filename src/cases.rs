use std::io::Read;

use crate::constants::*;
use crate::error::{Result, SavError};
use crate::io_utils::{self, ByteSource};
use crate::reconcile::LogicalVariable;

/// One cell of a decoded case.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Numeric value; system-missing surfaces as NaN.
    Number(f64),
    /// String value, trailing spaces trimmed.
    Text(String),
}

/// One case: cells in logical-variable order.
pub type Row = Vec<Cell>;

/// Outcome of decoding a single cell.
enum CellRead {
    Value(Cell),
    /// The opcode stream or the upstream bytes ended.
    End,
}

/// Opcode-driven case decoder.
///
/// For bytecode-compressed data (compression types 1 and 2) opcodes come
/// from an 8-byte chunk that refills as it drains; chunk boundaries do not
/// align with case boundaries, so the chunk and its index persist across
/// `read_case` calls.
#[derive(Debug)]
pub struct CaseDecoder {
    compression: Compression,
    bias: f64,
    sysmis: f64,
    opcodes: [u8; 8],
    /// Index into `opcodes`; starts past the end so the first access
    /// pulls a fresh chunk.
    opcode_idx: usize,
    eof: bool,
}

impl CaseDecoder {
    pub fn new(compression: Compression, bias: f64, sysmis: f64) -> CaseDecoder {
        CaseDecoder {
            compression,
            bias,
            sysmis,
            opcodes: [0u8; 8],
            opcode_idx: 8,
            eof: false,
        }
    }

    /// Decode the next case, or `None` at the end of the data stream.
    ///
    /// An end-of-file opcode (or end of stream) observed mid-case yields
    /// the partial row; observed before any cell it reports EOF.
    pub fn read_case<R: Read>(
        &mut self,
        source: &mut ByteSource<R>,
        variables: &[LogicalVariable],
    ) -> Result<Option<Row>> {
        if self.eof || variables.is_empty() {
            return Ok(None);
        }

        let mut row = Vec::with_capacity(variables.len());
        for var in variables {
            let cell = if var.is_numeric {
                self.numeric_cell(source)?
            } else {
                self.string_cell(source, var.width)?
            };
            match cell {
                CellRead::Value(value) => row.push(value),
                CellRead::End => {
                    self.eof = true;
                    if row.is_empty() {
                        return Ok(None);
                    }
                    if self.compression == Compression::None {
                        // Uncompressed data ends exactly on a case
                        // boundary; anything else is truncation.
                        return Err(SavError::UnexpectedEof);
                    }
                    return Ok(Some(row));
                }
            }
        }

        Ok(Some(row))
    }

    /// Decode one numeric cell (one 8-byte chunk).
    fn numeric_cell<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<CellRead> {
        if self.compression == Compression::None {
            return match source.read_f64() {
                Ok(value) => Ok(CellRead::Value(Cell::Number(self.map_sysmis(value)))),
                Err(SavError::UnexpectedEof) => Ok(CellRead::End),
                Err(e) => Err(e),
            };
        }

        loop {
            let Some(code) = self.next_opcode(source)? else {
                return Ok(CellRead::End);
            };
            match code {
                COMPRESS_SKIP => continue,
                COMPRESS_END_OF_FILE => return Ok(CellRead::End),
                COMPRESS_RAW_FOLLOWS => {
                    let value = source.read_f64()?;
                    return Ok(CellRead::Value(Cell::Number(self.map_sysmis(value))));
                }
                COMPRESS_SYSMIS | COMPRESS_EIGHT_SPACES => {
                    return Ok(CellRead::Value(Cell::Number(f64::NAN)));
                }
                code => {
                    return Ok(CellRead::Value(Cell::Number(f64::from(code) - self.bias)));
                }
            }
        }
    }

    /// Decode one string cell of `width` bytes across `ceil(width / 8)`
    /// chunks.
    fn string_cell<R: Read>(
        &mut self,
        source: &mut ByteSource<R>,
        width: usize,
    ) -> Result<CellRead> {
        let mut chars_to_read = width;
        let mut chunks_to_read = (width.max(1) - 1) / 8 + 1;
        let mut bytes = Vec::with_capacity(io_utils::round_up(width, 8));

        if self.compression == Compression::None {
            for chunk in 0..chunks_to_read {
                match source.read_8_bytes() {
                    Ok(slot) => bytes.extend_from_slice(&slot),
                    Err(SavError::UnexpectedEof) if chunk == 0 => return Ok(CellRead::End),
                    Err(e) => return Err(e),
                }
            }
            return Ok(CellRead::Value(emit_text(bytes)));
        }

        while chunks_to_read > 0 {
            let Some(code) = self.next_opcode(source)? else {
                return Ok(CellRead::End);
            };
            match code {
                COMPRESS_SKIP => continue,
                COMPRESS_END_OF_FILE => return Ok(CellRead::End),
                COMPRESS_RAW_FOLLOWS => {
                    let take = chars_to_read.min(8);
                    bytes.extend_from_slice(&source.read_bytes(take)?);
                    if chars_to_read < 8 {
                        // The final chunk is padded out to 8 bytes on disk.
                        source.discard(8 - chars_to_read)?;
                    }
                    chars_to_read -= take;
                }
                // Filler chunks (all spaces) and compressed numeric codes
                // contribute no string bytes; trimming covers the spaces.
                _ => {}
            }
            chunks_to_read -= 1;
        }

        Ok(CellRead::Value(emit_text(bytes)))
    }

    /// Pull the next opcode, refilling the 8-byte chunk when drained.
    /// Returns `None` when the stream ends at a chunk boundary.
    fn next_opcode<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<Option<u8>> {
        if self.opcode_idx >= 8 {
            match source.read_8_bytes() {
                Ok(chunk) => {
                    self.opcodes = chunk;
                    self.opcode_idx = 0;
                }
                Err(SavError::UnexpectedEof) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
        let code = self.opcodes[self.opcode_idx];
        self.opcode_idx += 1;
        Ok(Some(code))
    }

    fn map_sysmis(&self, value: f64) -> f64 {
        if is_sysmis(value, self.sysmis) {
            f64::NAN
        } else {
            value
        }
    }
}

fn emit_text(bytes: Vec<u8>) -> Cell {
    Cell::Text(io_utils::bytes_to_string_lossy(
        io_utils::trim_trailing_spaces(&bytes),
    ))
}
