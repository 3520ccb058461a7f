/// SPSS system-missing value (the "most negative finite double" bit pattern).
pub const SYSMIS_BITS: u64 = 0xFFEF_FFFF_FFFF_FFFF;

/// Default compression bias (subtracted from opcode bytes 1..=251).
pub const DEFAULT_BIAS: f64 = 100.0;

// -- Bytecode compression opcodes --

/// Padding / skip.
pub const COMPRESS_SKIP: u8 = 0;
/// End of case data.
pub const COMPRESS_END_OF_FILE: u8 = 252;
/// Next 8 raw bytes follow as uncompressed data.
pub const COMPRESS_RAW_FOLLOWS: u8 = 253;
/// Represents 8 ASCII spaces (0x20).
pub const COMPRESS_EIGHT_SPACES: u8 = 254;
/// System-missing value.
pub const COMPRESS_SYSMIS: u8 = 255;

// -- SAV record type tags --

pub const RECORD_TYPE_VARIABLE: i32 = 2;
pub const RECORD_TYPE_VALUE_LABEL: i32 = 3;
pub const RECORD_TYPE_VALUE_LABEL_VARS: i32 = 4;
pub const RECORD_TYPE_DOCUMENT: i32 = 6;
pub const RECORD_TYPE_INFO: i32 = 7;
pub const RECORD_TYPE_DICT_TERMINATION: i32 = 999;

// -- Type 7 extension subtypes --

pub const INFO_INTEGER: i32 = 3;
pub const INFO_FLOAT: i32 = 4;
pub const INFO_MR_SETS: i32 = 7;
pub const INFO_PRODUCT_INFO: i32 = 10;
pub const INFO_VAR_DISPLAY: i32 = 11;
pub const INFO_LONG_NAMES: i32 = 13;
pub const INFO_VERY_LONG_STRINGS: i32 = 14;
pub const INFO_EXTENDED_NCASES: i32 = 16;
pub const INFO_FILE_ATTRS: i32 = 17;
pub const INFO_VAR_ATTRS: i32 = 18;
pub const INFO_MR_SETS_NEW: i32 = 19;
pub const INFO_ENCODING: i32 = 20;
pub const INFO_LONG_STRING_LABELS: i32 = 21;
pub const INFO_LONG_STRING_MISSING: i32 = 22;

/// Known extension tuples as (subtype, element size) pairs. The record
/// classifier matches the full `(7, subtype, size)` tag tuple before a
/// parser is selected.
pub const EXTENSION_TAGS: &[(i32, i32)] = &[
    (INFO_INTEGER, 4),
    (INFO_FLOAT, 8),
    (INFO_MR_SETS, 1),
    (INFO_PRODUCT_INFO, 1),
    (INFO_VAR_DISPLAY, 4),
    (INFO_LONG_NAMES, 1),
    (INFO_VERY_LONG_STRINGS, 1),
    (INFO_EXTENDED_NCASES, 8),
    (INFO_FILE_ATTRS, 1),
    (INFO_VAR_ATTRS, 1),
    (INFO_MR_SETS_NEW, 1),
    (INFO_ENCODING, 1),
    (INFO_LONG_STRING_LABELS, 1),
    (INFO_LONG_STRING_MISSING, 1),
];

// -- Enums --

/// SPSS compression type from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Bytecode,
    Zlib,
}

impl Compression {
    pub fn from_i32(val: i32) -> Option<Compression> {
        match val {
            0 => Some(Compression::None),
            1 => Some(Compression::Bytecode),
            2 => Some(Compression::Zlib),
            _ => None,
        }
    }
}

/// Variable measurement level (subtype 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Unknown,
    Nominal,
    Ordinal,
    Scale,
}

impl Measure {
    pub fn from_i32(val: i32) -> Measure {
        match val {
            1 => Measure::Nominal,
            2 => Measure::Ordinal,
            3 => Measure::Scale,
            _ => Measure::Unknown,
        }
    }
}

/// Variable alignment (subtype 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

impl Alignment {
    pub fn from_i32(val: i32) -> Alignment {
        match val {
            1 => Alignment::Right,
            2 => Alignment::Center,
            _ => Alignment::Left,
        }
    }
}

/// Variable role from the variable-attributes record (subtype 18).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Input,
    Output,
    Both,
    None,
    Partition,
    Split,
}

impl Role {
    pub fn from_digit(digit: u8) -> Option<Role> {
        match digit {
            0 => Some(Role::Input),
            1 => Some(Role::Output),
            2 => Some(Role::Both),
            3 => Some(Role::None),
            4 => Some(Role::Partition),
            5 => Some(Role::Split),
            _ => Option::None,
        }
    }
}

/// Decoded print/write format triple.
///
/// On disk the format is packed into 4 bytes as (decimals, width, type-low,
/// type-high); a non-zero fourth byte extends the type code as
/// `10 * low + high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarFormat {
    pub decimals: u8,
    pub width: u8,
    pub format_type: u16,
}

impl VarFormat {
    pub fn from_bytes(raw: [u8; 4]) -> VarFormat {
        let format_type = if raw[3] != 0 {
            u16::from(raw[2]) * 10 + u16::from(raw[3])
        } else {
            u16::from(raw[2])
        };
        VarFormat {
            decimals: raw[0],
            width: raw[1],
            format_type,
        }
    }
}

/// The SYSMIS sentinel as f64 (equal to `-f64::MAX`).
#[inline]
pub fn sysmis() -> f64 {
    f64::from_bits(SYSMIS_BITS)
}

/// Check a raw f64 bit pattern against a SYSMIS sentinel.
#[inline]
pub fn is_sysmis(val: f64, sentinel: f64) -> bool {
    val.to_bits() == sentinel.to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysmis_is_negative_max() {
        let val = sysmis();
        assert!(val.is_finite());
        assert!(val < 0.0);
        assert_eq!(val, -f64::MAX);
    }

    #[test]
    fn test_is_sysmis() {
        assert!(is_sysmis(sysmis(), sysmis()));
        assert!(!is_sysmis(0.0, sysmis()));
        assert!(!is_sysmis(f64::NAN, sysmis()));
    }

    #[test]
    fn test_format_decode() {
        // F8.2: decimals=2, width=8, type=5
        let fmt = VarFormat::from_bytes([2, 8, 5, 0]);
        assert_eq!(fmt.decimals, 2);
        assert_eq!(fmt.width, 8);
        assert_eq!(fmt.format_type, 5);
    }

    #[test]
    fn test_format_decode_extended_type() {
        // Fourth byte non-zero extends the type code as 10 * low + high.
        let fmt = VarFormat::from_bytes([0, 10, 2, 2]);
        assert_eq!(fmt.format_type, 22);
    }

    #[test]
    fn test_compression_from_i32() {
        assert_eq!(Compression::from_i32(0), Some(Compression::None));
        assert_eq!(Compression::from_i32(1), Some(Compression::Bytecode));
        assert_eq!(Compression::from_i32(2), Some(Compression::Zlib));
        assert_eq!(Compression::from_i32(99), None);
    }

    #[test]
    fn test_measure_from_i32() {
        assert_eq!(Measure::from_i32(1), Measure::Nominal);
        assert_eq!(Measure::from_i32(2), Measure::Ordinal);
        assert_eq!(Measure::from_i32(3), Measure::Scale);
        assert_eq!(Measure::from_i32(0), Measure::Unknown);
    }

    #[test]
    fn test_role_from_digit() {
        assert_eq!(Role::from_digit(0), Some(Role::Input));
        assert_eq!(Role::from_digit(5), Some(Role::Split));
        assert_eq!(Role::from_digit(9), None);
    }
}
