use std::io::Read;

use crate::constants::{RECORD_TYPE_VARIABLE, VarFormat};
use crate::error::{Result, SavError};
use crate::io_utils::{self, ByteSource};

/// Missing value specification from a variable record.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingValues {
    None,
    /// Up to 3 discrete numeric values.
    DiscreteNumeric(Vec<f64>),
    /// A range of numeric values [low, high].
    Range { low: f64, high: f64 },
    /// A range plus one discrete value.
    RangeAndValue { low: f64, high: f64, value: f64 },
    /// Up to 3 discrete string values (8 bytes each, space-padded).
    DiscreteString(Vec<Vec<u8>>),
}

/// One type 2 record: either a data-bearing anchor or the continuation
/// of a preceding long string.
#[derive(Debug, Clone)]
pub enum RawVariable {
    Anchor(AnchorVariable),
    Continuation,
}

impl RawVariable {
    pub fn as_anchor(&self) -> Option<&AnchorVariable> {
        match self {
            RawVariable::Anchor(anchor) => Some(anchor),
            RawVariable::Continuation => None,
        }
    }

    /// Parse one type 2 record, tag included.
    pub fn parse<R: Read>(source: &mut ByteSource<R>) -> Result<RawVariable> {
        let tag = source.read_i32()?;
        if tag != RECORD_TYPE_VARIABLE {
            return Err(SavError::Malformed(format!(
                "expected variable record tag 2, got {tag}"
            )));
        }

        let raw_type = source.read_i32()?;
        let has_label = source.read_i32()?;
        let n_missing = source.read_i32()?;

        let mut print_bytes = [0u8; 4];
        source.read_exact(&mut print_bytes)?;
        let mut write_bytes = [0u8; 4];
        source.read_exact(&mut write_bytes)?;

        let name_bytes = source.read_bytes(8)?;
        let short_name =
            io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(&name_bytes));

        let label = if has_label == 1 {
            let label_len = source.read_i32()? as usize;
            let padded_len = io_utils::round_up(label_len, 4);
            let label_bytes = source.read_bytes(padded_len)?;
            Some(io_utils::bytes_to_string_lossy(
                io_utils::trim_trailing_padding(&label_bytes[..label_len]),
            ))
        } else {
            None
        };

        let missing_values = parse_missing_values(source, n_missing, raw_type)?;

        if raw_type < 0 {
            // Continuation of a preceding long string; the remaining
            // fields carry no information.
            return Ok(RawVariable::Continuation);
        }

        Ok(RawVariable::Anchor(AnchorVariable {
            raw_type,
            short_name,
            label,
            print_format: VarFormat::from_bytes(print_bytes),
            write_format: VarFormat::from_bytes(write_bytes),
            missing_values,
        }))
    }
}

/// A data-bearing variable record.
#[derive(Debug, Clone)]
pub struct AnchorVariable {
    /// 0 = numeric, 1..=255 = string width in bytes.
    pub raw_type: i32,
    /// Short variable name (up to 8 bytes, trailing spaces trimmed).
    pub short_name: String,
    /// Variable label, if the has-label flag was set.
    pub label: Option<String>,
    pub print_format: VarFormat,
    pub write_format: VarFormat,
    pub missing_values: MissingValues,
}

impl AnchorVariable {
    pub fn is_numeric(&self) -> bool {
        self.raw_type == 0
    }
}

fn parse_missing_values<R: Read>(
    source: &mut ByteSource<R>,
    n_missing: i32,
    raw_type: i32,
) -> Result<MissingValues> {
    if n_missing == 0 {
        return Ok(MissingValues::None);
    }

    let abs_n = n_missing.unsigned_abs() as usize;
    let is_range = n_missing < 0;

    if raw_type > 0 {
        let mut values = Vec::with_capacity(abs_n);
        for _ in 0..abs_n {
            values.push(source.read_8_bytes()?.to_vec());
        }
        return Ok(MissingValues::DiscreteString(values));
    }

    let mut values = Vec::with_capacity(abs_n);
    for _ in 0..abs_n {
        values.push(source.read_f64()?);
    }

    if is_range {
        match abs_n {
            2 => Ok(MissingValues::Range {
                low: values[0],
                high: values[1],
            }),
            3 => Ok(MissingValues::RangeAndValue {
                low: values[0],
                high: values[1],
                value: values[2],
            }),
            _ => Ok(MissingValues::DiscreteNumeric(values)),
        }
    } else {
        Ok(MissingValues::DiscreteNumeric(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_utils::Endian;

    fn make_variable_bytes(raw_type: i32, name: &[u8; 8], has_label: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2_i32.to_le_bytes());
        buf.extend_from_slice(&raw_type.to_le_bytes());
        buf.extend_from_slice(&(if has_label { 1_i32 } else { 0_i32 }).to_le_bytes());
        buf.extend_from_slice(&0_i32.to_le_bytes());
        // Print and write formats: F8.2 packed as (decimals, width, type, 0)
        buf.extend_from_slice(&[2, 8, 5, 0]);
        buf.extend_from_slice(&[2, 8, 5, 0]);
        buf.extend_from_slice(name);

        if has_label {
            let label = b"Test label";
            buf.extend_from_slice(&(label.len() as i32).to_le_bytes());
            buf.extend_from_slice(label);
            let padding = io_utils::round_up(label.len(), 4) - label.len();
            buf.extend_from_slice(&vec![0u8; padding]);
        }

        buf
    }

    #[test]
    fn test_parse_numeric_variable() {
        let data = make_variable_bytes(0, b"AGE     ", false);
        let mut source = ByteSource::with_endian(&data[..], Endian::Little);
        let var = RawVariable::parse(&mut source).unwrap();

        let anchor = var.as_anchor().unwrap();
        assert_eq!(anchor.short_name, "AGE");
        assert!(anchor.is_numeric());
        assert!(anchor.label.is_none());
        assert_eq!(anchor.print_format.width, 8);
        assert_eq!(anchor.print_format.decimals, 2);
        assert_eq!(anchor.print_format.format_type, 5);
    }

    #[test]
    fn test_parse_string_variable() {
        let data = make_variable_bytes(20, b"NAME    ", false);
        let mut source = ByteSource::with_endian(&data[..], Endian::Little);
        let var = RawVariable::parse(&mut source).unwrap();

        let anchor = var.as_anchor().unwrap();
        assert_eq!(anchor.short_name, "NAME");
        assert_eq!(anchor.raw_type, 20);
        assert!(!anchor.is_numeric());
    }

    #[test]
    fn test_parse_variable_with_label() {
        let data = make_variable_bytes(0, b"SCORE   ", true);
        let mut source = ByteSource::with_endian(&data[..], Endian::Little);
        let var = RawVariable::parse(&mut source).unwrap();

        let anchor = var.as_anchor().unwrap();
        assert_eq!(anchor.label.as_deref(), Some("Test label"));
    }

    #[test]
    fn test_continuation_record() {
        let data = make_variable_bytes(-1, b"        ", false);
        let mut source = ByteSource::with_endian(&data[..], Endian::Little);
        let var = RawVariable::parse(&mut source).unwrap();
        assert!(matches!(var, RawVariable::Continuation));
    }

    #[test]
    fn test_numeric_missing_range() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2_i32.to_le_bytes());
        buf.extend_from_slice(&0_i32.to_le_bytes());
        buf.extend_from_slice(&0_i32.to_le_bytes());
        buf.extend_from_slice(&(-2_i32).to_le_bytes());
        buf.extend_from_slice(&[0, 8, 5, 0]);
        buf.extend_from_slice(&[0, 8, 5, 0]);
        buf.extend_from_slice(b"X       ");
        buf.extend_from_slice(&1.0_f64.to_le_bytes());
        buf.extend_from_slice(&9.0_f64.to_le_bytes());

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let var = RawVariable::parse(&mut source).unwrap();
        let anchor = var.as_anchor().unwrap();
        assert_eq!(
            anchor.missing_values,
            MissingValues::Range {
                low: 1.0,
                high: 9.0
            }
        );
    }
}
