use crate::error::{Result, SavError};
use crate::io_utils;

/// Value labels for one long string variable (subtype 21).
#[derive(Debug, Clone)]
pub struct LongStringLabelSet {
    pub var_name: String,
    pub var_width: i32,
    /// (value bytes, label bytes) pairs.
    pub labels: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Parse subtype 21: long string value labels.
///
/// Per variable: name length (i32), name, variable width (i32), label
/// count (i32), then per label a length-prefixed value and a
/// length-prefixed label. The payload must be consumed exactly.
pub fn parse_long_string_labels(data: &[u8]) -> Result<Vec<LongStringLabelSet>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let name_len = read_i32_le(data, &mut pos)? as usize;
        let var_name = io_utils::bytes_to_string_lossy(read_slice(data, &mut pos, name_len)?);
        let var_width = read_i32_le(data, &mut pos)?;
        let label_count = read_i32_le(data, &mut pos)? as usize;

        let mut labels = Vec::with_capacity(label_count);
        for _ in 0..label_count {
            let value_len = read_i32_le(data, &mut pos)? as usize;
            let value = read_slice(data, &mut pos, value_len)?.to_vec();
            let label_len = read_i32_le(data, &mut pos)? as usize;
            let label = read_slice(data, &mut pos, label_len)?.to_vec();
            labels.push((value, label));
        }

        result.push(LongStringLabelSet {
            var_name,
            var_width,
            labels,
        });
    }

    Ok(result)
}

fn read_i32_le(data: &[u8], pos: &mut usize) -> Result<i32> {
    let bytes = read_slice(data, pos, 4)?;
    Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_slice<'a>(data: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8]> {
    let end = pos.checked_add(n).ok_or_else(|| overrun(data.len()))?;
    if end > data.len() {
        return Err(overrun(data.len()));
    }
    let slice = &data[*pos..end];
    *pos = end;
    Ok(slice)
}

fn overrun(len: usize) -> SavError {
    SavError::Malformed(format!(
        "long string value labels truncated within {len}-byte payload"
    ))
}
