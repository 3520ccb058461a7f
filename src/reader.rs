use std::io::Read;

use crate::cases::{CaseDecoder, Row};
use crate::constants::Compression;
use crate::dictionary::{self, RawHeader};
use crate::error::Result;
use crate::header::FileHeader;
use crate::io_utils::{ByteSource, Endian};
use crate::reconcile::{self, LogicalVariable};
use crate::zlib;

/// Streaming reader for SPSS system files.
///
/// Construction eagerly parses the whole dictionary (materializing the
/// DEFLATE region for zlib-compressed files) and reconciles the variable
/// list; rows are then decoded one case at a time. The underlying stream
/// is owned for the reader's lifetime and read strictly forward.
///
/// Not safe for concurrent use without external synchronization.
#[derive(Debug)]
pub struct SavReader<R: Read> {
    source: ByteSource<R>,
    raw_header: RawHeader,
    variables: Vec<LogicalVariable>,
    decoder: CaseDecoder,
}

impl<R: Read> SavReader<R> {
    /// Open a reader, assuming the host's native byte order (in practice
    /// little-endian; see [`SavReader::set_endianness`]).
    pub fn new(inner: R) -> Result<SavReader<R>> {
        Self::with_endianness(inner, Endian::native())
    }

    /// Open a reader with an explicit byte order.
    pub fn with_endianness(inner: R, endian: Endian) -> Result<SavReader<R>> {
        let mut source = ByteSource::with_endian(inner, endian);

        let file_header = FileHeader::parse(&mut source)?;
        let mut raw_header = dictionary::parse_dictionary(&mut source, file_header)?;

        if raw_header.file_header.compression == Compression::Zlib {
            let (zheader, ztrailer) = zlib::materialize(&mut source)?;
            raw_header.zheader = Some(zheader);
            raw_header.ztrailer = Some(ztrailer);
        }

        let variables = reconcile::reconcile(&raw_header, source.endian());
        let decoder = CaseDecoder::new(
            raw_header.file_header.compression,
            raw_header.file_header.bias,
            raw_header.sysmis(),
        );

        Ok(SavReader {
            source,
            raw_header,
            variables,
            decoder,
        })
    }

    /// Decode the next case, or `None` at the end of the data stream.
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        self.decoder.read_case(&mut self.source, &self.variables)
    }

    /// Decode all remaining cases.
    pub fn read_all_rows(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.read_row()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// The full dictionary aggregate.
    pub fn raw_header(&self) -> &RawHeader {
        &self.raw_header
    }

    /// The reconciled variable list that drives case decoding.
    pub fn logical_variables(&self) -> &[LogicalVariable] {
        &self.variables
    }

    /// Declared case count, preferring the extended (64-bit) record over
    /// the header field. `None` when the file does not declare one.
    pub fn case_count(&self) -> Option<i64> {
        if let Some(extended) = &self.raw_header.extended_case_count {
            if extended.ncases >= 0 {
                return Some(extended.ncases);
            }
        }
        if self.raw_header.file_header.ncases >= 0 {
            Some(i64::from(self.raw_header.file_header.ncases))
        } else {
            None
        }
    }

    /// Override the assumed byte order. Rarely needed; the dictionary has
    /// already been parsed by the time a caller can invoke this, so it
    /// only affects subsequent case decoding.
    pub fn set_endianness(&mut self, endian: Endian) {
        self.source.set_endian(endian);
    }
}
