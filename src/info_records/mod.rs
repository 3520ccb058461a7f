pub mod encoding_record;
pub mod float_info;
pub mod integer_info;
pub mod long_string_labels;
pub mod long_string_missing;
pub mod long_var_names;
pub mod var_attributes;
pub mod var_display;
pub mod very_long_strings;

use std::io::Read;

use crate::constants::*;
use crate::error::{Result, SavError};
use crate::io_utils::ByteSource;

/// Header shared by all type 7 (extension) records: subtype plus the
/// element size and count describing the payload.
#[derive(Debug, Clone)]
pub struct InfoRecordHeader {
    pub subtype: i32,
    pub size: i32,
    pub count: i32,
}

impl InfoRecordHeader {
    /// Parse the record tag and extension header.
    pub fn parse<R: Read>(source: &mut ByteSource<R>) -> Result<InfoRecordHeader> {
        let tag = source.read_i32()?;
        if tag != RECORD_TYPE_INFO {
            return Err(SavError::Malformed(format!(
                "expected extension record tag 7, got {tag}"
            )));
        }
        Ok(InfoRecordHeader {
            subtype: source.read_i32()?,
            size: source.read_i32()?,
            count: source.read_i32()?,
        })
    }

    /// Total payload bytes for this record.
    pub fn data_len(&self) -> usize {
        (self.size as usize) * (self.count as usize)
    }
}

/// Extended case count from subtype 16.
#[derive(Debug, Clone)]
pub struct ExtendedCaseCount {
    pub unknown: i64,
    pub ncases: i64,
}

/// Parsed extension record payload.
#[derive(Debug)]
pub enum InfoRecord {
    IntegerInfo(integer_info::IntegerInfo),
    FloatInfo(float_info::FloatInfo),
    /// Subtype 7: old-style multiple response sets, surfaced verbatim.
    MrSets(Vec<u8>),
    /// Subtype 10: extra product info, surfaced verbatim.
    ProductInfo(Vec<u8>),
    VarDisplay(Vec<var_display::VarDisplayEntry>),
    LongNames(Vec<(String, String)>),
    VeryLongStrings(Vec<(String, usize)>),
    ExtendedCaseCount(ExtendedCaseCount),
    /// Subtype 17: data-file attributes, surfaced verbatim.
    FileAttributes(Vec<u8>),
    VarAttributes(var_attributes::VarAttributes),
    /// Subtype 19: new-style multiple response sets, surfaced verbatim.
    MrSetsNew(Vec<u8>),
    Encoding(String),
    LongStringLabels(Vec<long_string_labels::LongStringLabelSet>),
    LongStringMissing(Vec<long_string_missing::LongStringMissingEntry>),
}

/// Parse one extension record, tag and header included. Callers dispatch
/// here only for subtypes the record classifier recognizes.
pub fn parse_info_record<R: Read>(source: &mut ByteSource<R>) -> Result<InfoRecord> {
    let header = InfoRecordHeader::parse(source)?;
    let data_len = header.data_len();

    match header.subtype {
        INFO_INTEGER => Ok(InfoRecord::IntegerInfo(integer_info::IntegerInfo::parse(
            source,
        )?)),
        INFO_FLOAT => Ok(InfoRecord::FloatInfo(float_info::FloatInfo::parse(source)?)),
        INFO_MR_SETS => Ok(InfoRecord::MrSets(source.read_bytes(data_len)?)),
        INFO_PRODUCT_INFO => Ok(InfoRecord::ProductInfo(source.read_bytes(data_len)?)),
        INFO_VAR_DISPLAY => Ok(InfoRecord::VarDisplay(var_display::parse_var_display(
            source,
            header.count,
        )?)),
        INFO_LONG_NAMES => {
            let data = source.read_bytes(data_len)?;
            Ok(InfoRecord::LongNames(long_var_names::parse_long_var_names(
                &data,
            )))
        }
        INFO_VERY_LONG_STRINGS => {
            let data = source.read_bytes(data_len)?;
            Ok(InfoRecord::VeryLongStrings(
                very_long_strings::parse_very_long_strings(&data),
            ))
        }
        INFO_EXTENDED_NCASES => Ok(InfoRecord::ExtendedCaseCount(ExtendedCaseCount {
            unknown: source.read_i64()?,
            ncases: source.read_i64()?,
        })),
        INFO_FILE_ATTRS => Ok(InfoRecord::FileAttributes(source.read_bytes(data_len)?)),
        INFO_VAR_ATTRS => {
            let data = source.read_bytes(data_len)?;
            Ok(InfoRecord::VarAttributes(
                var_attributes::parse_var_attributes(&data),
            ))
        }
        INFO_MR_SETS_NEW => Ok(InfoRecord::MrSetsNew(source.read_bytes(data_len)?)),
        INFO_ENCODING => {
            let data = source.read_bytes(data_len)?;
            Ok(InfoRecord::Encoding(encoding_record::parse_encoding_record(
                &data,
            )))
        }
        INFO_LONG_STRING_LABELS => {
            let data = source.read_bytes(data_len)?;
            Ok(InfoRecord::LongStringLabels(
                long_string_labels::parse_long_string_labels(&data)?,
            ))
        }
        INFO_LONG_STRING_MISSING => {
            let data = source.read_bytes(data_len)?;
            Ok(InfoRecord::LongStringMissing(
                long_string_missing::parse_long_string_missing(&data)?,
            ))
        }
        other => Err(SavError::Malformed(format!(
            "unsupported extension subtype {other}"
        ))),
    }
}
