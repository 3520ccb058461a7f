use std::io::Read;

use flate2::bufread::ZlibDecoder;

use crate::error::{Result, SavError};
use crate::io_utils::ByteSource;

/// ZSAV sub-header: offsets bracketing the compressed data region.
#[derive(Debug, Clone)]
pub struct ZHeader {
    pub zheader_offset: i64,
    pub ztrailer_offset: i64,
    pub ztrailer_length: i64,
}

/// First entry of the ZSAV trailer's block index.
#[derive(Debug, Clone)]
pub struct ZBlockEntry {
    pub uncompressed_offset: i64,
    pub compressed_offset: i64,
    pub uncompressed_size: i32,
    pub compressed_size: i32,
}

/// ZSAV trailer. Only the first block-index entry is decoded; the rest of
/// the table is left unread.
#[derive(Debug, Clone)]
pub struct ZTrailer {
    pub bias: i64,
    pub zero: i64,
    pub block_size: i32,
    pub n_blocks: i32,
    pub first_block: ZBlockEntry,
}

/// Read the 24-byte ZSAV sub-header, positioned immediately after the
/// dictionary termination record.
pub fn read_zheader<R: Read>(source: &mut ByteSource<R>) -> Result<ZHeader> {
    Ok(ZHeader {
        zheader_offset: source.read_i64()?,
        ztrailer_offset: source.read_i64()?,
        ztrailer_length: source.read_i64()?,
    })
}

/// Read the first 48 bytes of the ZSAV trailer, positioned immediately
/// after the compressed region.
pub fn read_ztrailer<R: Read>(source: &mut ByteSource<R>) -> Result<ZTrailer> {
    Ok(ZTrailer {
        bias: source.read_i64()?,
        zero: source.read_i64()?,
        block_size: source.read_i32()?,
        n_blocks: source.read_i32()?,
        first_block: ZBlockEntry {
            uncompressed_offset: source.read_i64()?,
            compressed_offset: source.read_i64()?,
            uncompressed_size: source.read_i32()?,
            compressed_size: source.read_i32()?,
        },
    })
}

/// Materialize the DEFLATE-compressed data region.
///
/// Reads the sub-header, inflates the region between it and the trailer
/// into memory, reads the trailer, and rebinds the source so that all
/// subsequent case reads draw from the inflated buffer.
pub fn materialize<R: Read>(source: &mut ByteSource<R>) -> Result<(ZHeader, ZTrailer)> {
    let metadata_end = source.position() as i64;
    let zheader = read_zheader(source)?;

    if zheader.zheader_offset != metadata_end {
        return Err(SavError::Malformed(format!(
            "zlib header declares offset {} but metadata ended at {metadata_end}",
            zheader.zheader_offset
        )));
    }

    let region_len = zheader.ztrailer_offset - zheader.zheader_offset - 24;
    if region_len < 0 {
        return Err(SavError::Malformed(format!(
            "zlib trailer offset {} precedes the data region",
            zheader.ztrailer_offset
        )));
    }

    let compressed = source.read_bytes(region_len as usize)?;
    let inflated = inflate_region(&compressed)?;
    tracing::debug!(
        compressed = compressed.len(),
        inflated = inflated.len(),
        "materialized zlib data region"
    );

    let ztrailer = read_ztrailer(source)?;
    source.bind_block(inflated);

    Ok((zheader, ztrailer))
}

/// Inflate the data region, which holds one zlib stream per block,
/// concatenated.
fn inflate_region(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < compressed.len() {
        let mut decoder = ZlibDecoder::new(&compressed[pos..]);
        decoder
            .read_to_end(&mut out)
            .map_err(|e| SavError::Malformed(format!("zlib inflate: {e}")))?;
        let consumed = decoder.total_in() as usize;
        if consumed == 0 {
            return Err(SavError::Malformed(
                "zlib stream made no progress".to_string(),
            ));
        }
        pos += consumed;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_utils::Endian;
    use flate2::Compression as ZCompression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), ZCompression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_inflate_single_stream() {
        let payload = b"eight by".repeat(4);
        let compressed = deflate(&payload);
        assert_eq!(inflate_region(&compressed).unwrap(), payload);
    }

    #[test]
    fn test_inflate_concatenated_streams() {
        let mut compressed = deflate(b"first block ");
        compressed.extend_from_slice(&deflate(b"second block"));
        assert_eq!(
            inflate_region(&compressed).unwrap(),
            b"first block second block"
        );
    }

    #[test]
    fn test_materialize_rebinds_source() {
        let payload = vec![7u8; 16];
        let compressed = deflate(&payload);

        let mut buf = Vec::new();
        let zheader_offset = 0_i64;
        let ztrailer_offset = 24 + compressed.len() as i64;
        buf.extend_from_slice(&zheader_offset.to_le_bytes());
        buf.extend_from_slice(&ztrailer_offset.to_le_bytes());
        buf.extend_from_slice(&48_i64.to_le_bytes());
        buf.extend_from_slice(&compressed);
        // Trailer: bias, zero, block size, block count, one index entry.
        buf.extend_from_slice(&(-100_i64).to_le_bytes());
        buf.extend_from_slice(&0_i64.to_le_bytes());
        buf.extend_from_slice(&0x3FF000_i32.to_le_bytes());
        buf.extend_from_slice(&1_i32.to_le_bytes());
        buf.extend_from_slice(&0_i64.to_le_bytes());
        buf.extend_from_slice(&24_i64.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as i32).to_le_bytes());
        buf.extend_from_slice(&(compressed.len() as i32).to_le_bytes());

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let (zheader, ztrailer) = materialize(&mut source).unwrap();

        assert_eq!(zheader.ztrailer_offset, ztrailer_offset);
        assert_eq!(ztrailer.bias, -100);
        assert_eq!(ztrailer.n_blocks, 1);
        assert_eq!(ztrailer.first_block.compressed_offset, 24);
        // Case reads now come from the inflated buffer.
        assert_eq!(source.read_8_bytes().unwrap(), [7u8; 8]);
    }

    #[test]
    fn test_offset_mismatch_is_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&176_i64.to_le_bytes());
        buf.extend_from_slice(&200_i64.to_le_bytes());
        buf.extend_from_slice(&48_i64.to_le_bytes());

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let err = materialize(&mut source).unwrap_err();
        assert!(matches!(err, SavError::Malformed(_)));
    }
}
