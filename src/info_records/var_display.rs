use std::io::Read;

use crate::constants::{Alignment, Measure};
use crate::error::{Result, SavError};
use crate::io_utils::ByteSource;

/// One variable display entry from subtype 11.
#[derive(Debug, Clone)]
pub struct VarDisplayEntry {
    pub measure: Measure,
    pub width: i32,
    pub alignment: Alignment,
}

/// Parse subtype 11: variable display parameters.
///
/// Only the (measure, width, alignment) three-ints-per-variable layout is
/// supported; the record can also be written with two ints per variable,
/// which this parser rejects rather than misreads.
pub fn parse_var_display<R: Read>(
    source: &mut ByteSource<R>,
    count: i32,
) -> Result<Vec<VarDisplayEntry>> {
    let count = count as usize;
    if count % 3 != 0 {
        return Err(SavError::Malformed(format!(
            "variable display count {count} is not three per variable"
        )));
    }

    let n_vars = count / 3;
    let mut entries = Vec::with_capacity(n_vars);

    for _ in 0..n_vars {
        let measure = Measure::from_i32(source.read_i32()?);
        let width = source.read_i32()?;
        let alignment = Alignment::from_i32(source.read_i32()?);
        entries.push(VarDisplayEntry {
            measure,
            width,
            alignment,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_utils::Endian;

    #[test]
    fn test_parse_triples() {
        let mut buf = Vec::new();
        for triple in [[3, 8, 1], [1, 10, 0]] {
            for val in triple {
                buf.extend_from_slice(&(val as i32).to_le_bytes());
            }
        }

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let entries = parse_var_display(&mut source, 6).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].measure, Measure::Scale);
        assert_eq!(entries[0].width, 8);
        assert_eq!(entries[0].alignment, Alignment::Right);
        assert_eq!(entries[1].measure, Measure::Nominal);
        assert_eq!(entries[1].alignment, Alignment::Left);
    }

    #[test]
    fn test_two_per_variable_rejected() {
        let buf = [0u8; 16];
        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let err = parse_var_display(&mut source, 4).unwrap_err();
        assert!(matches!(err, SavError::Malformed(_)));
    }
}
