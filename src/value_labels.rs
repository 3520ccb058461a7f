use std::io::Read;

use crate::constants::{RECORD_TYPE_VALUE_LABEL, RECORD_TYPE_VALUE_LABEL_VARS};
use crate::error::{Result, SavError};
use crate::io_utils::{self, ByteSource};

/// A value-label group from a type 3 record plus its mandatory type 4
/// companion.
///
/// Keys are carried as the raw 8 bytes from the record; whether they mean
/// a double or a short string is decided during reconciliation by the
/// width of the variables the group applies to.
#[derive(Debug, Clone)]
pub struct ValueLabelGroup {
    /// (raw 8-byte key, label bytes) pairs, in record order.
    pub labels: Vec<([u8; 8], Vec<u8>)>,
    /// 0-based data-element indices this group applies to (from type 4).
    pub variable_indices: Vec<usize>,
}

impl ValueLabelGroup {
    /// Parse a type 3 record and the type 4 record that must follow it,
    /// tags included.
    pub fn parse<R: Read>(source: &mut ByteSource<R>) -> Result<ValueLabelGroup> {
        let tag = source.read_i32()?;
        if tag != RECORD_TYPE_VALUE_LABEL {
            return Err(SavError::Malformed(format!(
                "expected value-label record tag 3, got {tag}"
            )));
        }

        let count = source.read_i32()? as usize;
        let mut labels = Vec::with_capacity(count);

        for _ in 0..count {
            let key = source.read_8_bytes()?;

            let mut len_buf = [0u8; 1];
            source.read_exact(&mut len_buf)?;
            let label_len = len_buf[0] as usize;

            // The length byte plus label is padded to a multiple of 8, so
            // after the length byte there are round_up(len + 1, 8) - 1
            // bytes on disk.
            let padded_len = io_utils::round_up(label_len + 1, 8) - 1;
            let label_data = source.read_bytes(padded_len)?;
            labels.push((key, label_data[..label_len].to_vec()));
        }

        let next_tag = source.read_i32()?;
        if next_tag != RECORD_TYPE_VALUE_LABEL_VARS {
            return Err(SavError::Malformed(format!(
                "expected type 4 record after value labels, got type {next_tag}"
            )));
        }

        let variable_indices = parse_variable_indices(source)?;

        Ok(ValueLabelGroup {
            labels,
            variable_indices,
        })
    }
}

/// Parse the body of a type 4 record: the 1-based indices of the data
/// elements a label group applies to, converted to 0-based.
fn parse_variable_indices<R: Read>(source: &mut ByteSource<R>) -> Result<Vec<usize>> {
    let count = source.read_i32()? as usize;
    if count == 0 {
        return Err(SavError::Malformed(
            "type 4 record with 0 variables".to_string(),
        ));
    }

    let mut indices = Vec::with_capacity(count);
    for _ in 0..count {
        let index = source.read_i32()?;
        if index < 1 {
            return Err(SavError::Malformed(format!(
                "invalid variable index {index} in type 4 record"
            )));
        }
        indices.push((index - 1) as usize);
    }

    Ok(indices)
}
