use std::io::Read;

use crate::constants::Compression;
use crate::error::{Result, SavError};
use crate::io_utils::{self, ByteSource};

/// Parsed 176-byte SAV file header.
#[derive(Debug, Clone)]
pub struct FileHeader {
    /// Record-type tag: "$FL2" (standard) or "$FL3" (zlib-compressed).
    pub magic: [u8; 4],
    /// SPSS product that created the file.
    pub product: String,
    /// Layout code (endianness probe; normally 2).
    pub layout_code: i32,
    /// Data elements per case, counting long-string continuations.
    pub nominal_case_size: i32,
    /// Compression type.
    pub compression: Compression,
    /// 1-based index of the weight variable (0 = unweighted).
    pub weight_index: i32,
    /// Declared case count (-1 = unknown).
    pub ncases: i32,
    /// Compression bias (typically 100.0).
    pub bias: f64,
    /// Creation date string ("dd mmm yy").
    pub creation_date: String,
    /// Creation time string ("hh:mm:ss").
    pub creation_time: String,
    /// File label (up to 64 bytes).
    pub file_label: String,
}

impl FileHeader {
    /// Parse the file header. After this call the cursor is positioned at
    /// the first dictionary record.
    pub fn parse<R: Read>(source: &mut ByteSource<R>) -> Result<FileHeader> {
        let mut magic = [0u8; 4];
        source.read_exact(&mut magic)?;

        if &magic != b"$FL2" && &magic != b"$FL3" {
            return Err(SavError::NotValidFile { found: magic });
        }

        let product_bytes = source.read_bytes(60)?;
        let product =
            io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(&product_bytes));

        let layout_code = source.read_i32()?;
        let nominal_case_size = source.read_i32()?;

        let compression_code = source.read_i32()?;
        let compression = Compression::from_i32(compression_code).ok_or_else(|| {
            SavError::Malformed(format!("unknown compression type {compression_code}"))
        })?;
        if (&magic == b"$FL3") != (compression == Compression::Zlib) {
            tracing::debug!(
                magic = %String::from_utf8_lossy(&magic),
                ?compression,
                "record-type tag and compression field disagree"
            );
        }

        let weight_index = source.read_i32()?;
        let ncases = source.read_i32()?;
        let bias = source.read_f64()?;

        let date_bytes = source.read_bytes(9)?;
        let creation_date =
            io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(&date_bytes));

        let time_bytes = source.read_bytes(8)?;
        let creation_time =
            io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(&time_bytes));

        let label_bytes = source.read_bytes(64)?;
        let file_label =
            io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(&label_bytes));

        // 3 bytes of padding close out the 176-byte prefix.
        source.discard(3)?;

        Ok(FileHeader {
            magic,
            product,
            layout_code,
            nominal_case_size,
            compression,
            weight_index,
            ncases,
            bias,
            creation_date,
            creation_time,
            file_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_utils::Endian;

    fn make_header_bytes(compression: i32, ncases: i32) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(b"$FL2");
        let product = b"test product";
        buf.extend_from_slice(product);
        buf.extend_from_slice(&vec![b' '; 60 - product.len()]);
        buf.extend_from_slice(&2_i32.to_le_bytes());
        buf.extend_from_slice(&10_i32.to_le_bytes());
        buf.extend_from_slice(&compression.to_le_bytes());
        buf.extend_from_slice(&0_i32.to_le_bytes());
        buf.extend_from_slice(&ncases.to_le_bytes());
        buf.extend_from_slice(&100.0_f64.to_le_bytes());
        buf.extend_from_slice(b"01 Jan 24");
        buf.extend_from_slice(b"14:30:00");
        let label = b"Test file";
        buf.extend_from_slice(label);
        buf.extend_from_slice(&vec![b' '; 64 - label.len()]);
        buf.extend_from_slice(&[0u8; 3]);

        buf
    }

    #[test]
    fn test_parse_header() {
        let data = make_header_bytes(1, 100);
        let mut source = ByteSource::with_endian(&data[..], Endian::Little);
        let header = FileHeader::parse(&mut source).unwrap();

        assert_eq!(&header.magic, b"$FL2");
        assert_eq!(header.product, "test product");
        assert_eq!(header.layout_code, 2);
        assert_eq!(header.nominal_case_size, 10);
        assert_eq!(header.compression, Compression::Bytecode);
        assert_eq!(header.weight_index, 0);
        assert_eq!(header.ncases, 100);
        assert!((header.bias - 100.0).abs() < f64::EPSILON);
        assert_eq!(header.creation_date, "01 Jan 24");
        assert_eq!(header.creation_time, "14:30:00");
        assert_eq!(header.file_label, "Test file");
        assert_eq!(source.position(), 176);
    }

    #[test]
    fn test_invalid_magic() {
        let mut data = make_header_bytes(1, 100);
        data[0..4].copy_from_slice(b"XXXX");
        let mut source = ByteSource::with_endian(&data[..], Endian::Little);
        let err = FileHeader::parse(&mut source).unwrap_err();
        assert!(matches!(err, SavError::NotValidFile { .. }));
    }

    #[test]
    fn test_unknown_compression() {
        let data = make_header_bytes(7, 100);
        let mut source = ByteSource::with_endian(&data[..], Endian::Little);
        let err = FileHeader::parse(&mut source).unwrap_err();
        assert!(matches!(err, SavError::Malformed(_)));
    }
}
