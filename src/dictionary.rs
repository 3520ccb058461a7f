use std::io::Read;

use crate::constants::*;
use crate::document;
use crate::encoding;
use crate::error::{Result, SavError};
use crate::header::FileHeader;
use crate::info_records::{self, ExtendedCaseCount, InfoRecord};
use crate::io_utils::ByteSource;
use crate::value_labels::ValueLabelGroup;
use crate::variable::RawVariable;
use crate::zlib::{ZHeader, ZTrailer};

/// The full dictionary aggregate: everything parsed before case data.
///
/// Constructed once during reader initialization and immutable afterwards.
#[derive(Debug)]
pub struct RawHeader {
    pub file_header: FileHeader,
    /// Raw variable records in file order, continuations included.
    pub variables: Vec<RawVariable>,
    /// Value-label groups in file order.
    pub value_labels: Vec<ValueLabelGroup>,
    pub documents: Option<Vec<String>>,
    pub integer_info: Option<info_records::integer_info::IntegerInfo>,
    pub float_info: Option<info_records::float_info::FloatInfo>,
    /// Old-style multiple response sets (subtype 7), verbatim.
    pub mr_sets: Option<Vec<u8>>,
    /// New-style multiple response sets (subtype 19), verbatim.
    pub mr_sets_new: Option<Vec<u8>>,
    /// Extra product info (subtype 10), verbatim.
    pub product_info: Option<Vec<u8>>,
    pub var_display: Option<Vec<info_records::var_display::VarDisplayEntry>>,
    pub long_names: Option<Vec<(String, String)>>,
    pub very_long_strings: Option<Vec<(String, usize)>>,
    pub extended_case_count: Option<ExtendedCaseCount>,
    /// Data-file attributes (subtype 17), verbatim.
    pub file_attributes: Option<Vec<u8>>,
    pub var_attributes: Option<info_records::var_attributes::VarAttributes>,
    pub encoding_name: Option<String>,
    pub long_string_labels: Option<Vec<info_records::long_string_labels::LongStringLabelSet>>,
    pub long_string_missing: Option<Vec<info_records::long_string_missing::LongStringMissingEntry>>,
    /// Present only for zlib-compressed files, filled by the
    /// decompression stage.
    pub zheader: Option<ZHeader>,
    pub ztrailer: Option<ZTrailer>,
}

impl RawHeader {
    fn new(file_header: FileHeader) -> RawHeader {
        RawHeader {
            file_header,
            variables: Vec::new(),
            value_labels: Vec::new(),
            documents: None,
            integer_info: None,
            float_info: None,
            mr_sets: None,
            mr_sets_new: None,
            product_info: None,
            var_display: None,
            long_names: None,
            very_long_strings: None,
            extended_case_count: None,
            file_attributes: None,
            var_attributes: None,
            encoding_name: None,
            long_string_labels: None,
            long_string_missing: None,
            zheader: None,
            ztrailer: None,
        }
    }

    /// Canonical name of the file's character encoding, resolved from the
    /// encoding record or the machine-integer code page. Reported only;
    /// cell bytes are never transcoded.
    pub fn encoding(&self) -> &'static str {
        encoding::canonical_name(
            self.encoding_name.as_deref(),
            self.integer_info.as_ref().map(|info| info.character_code),
        )
    }

    /// SYSMIS sentinel: the machine-float record's value when present,
    /// else the format's conventional default.
    pub fn sysmis(&self) -> f64 {
        self.float_info
            .as_ref()
            .map_or_else(sysmis, |info| info.sysmis)
    }
}

/// Parse the dictionary region: everything between the file header and
/// the termination record.
///
/// Records are selected by peeking at their tag tuples. Unrecognized
/// content is skipped one byte at a time (well-formed files never hit
/// this path); end of stream during that skip ends the metadata phase.
pub fn parse_dictionary<R: Read>(
    source: &mut ByteSource<R>,
    file_header: FileHeader,
) -> Result<RawHeader> {
    let mut raw = RawHeader::new(file_header);

    loop {
        if source.is_next(&[RECORD_TYPE_VARIABLE])? {
            raw.variables.push(RawVariable::parse(source)?);
        } else if source.is_next(&[RECORD_TYPE_VALUE_LABEL])? {
            raw.value_labels.push(ValueLabelGroup::parse(source)?);
        } else if source.is_next(&[RECORD_TYPE_DOCUMENT])? {
            let lines = document::parse_document(source)?;
            raw.documents.get_or_insert_with(Vec::new).extend(lines);
        } else if source.is_next(&[RECORD_TYPE_DICT_TERMINATION, 0])? {
            source.discard(8)?;
            break;
        } else if next_extension(source)?.is_some() {
            store_info_record(&mut raw, info_records::parse_info_record(source)?);
        } else {
            match source.discard(1) {
                Ok(()) => {
                    tracing::warn!("unrecognized dictionary content, discarding one byte");
                }
                Err(SavError::UnexpectedEof) => break,
                Err(e) => return Err(e),
            }
        }
    }

    Ok(raw)
}

/// Check whether the next record is a known extension, by matching the
/// full (7, subtype, size) tag tuple.
fn next_extension<R: Read>(source: &mut ByteSource<R>) -> Result<Option<(i32, i32)>> {
    for &(subtype, size) in EXTENSION_TAGS {
        if source.is_next(&[RECORD_TYPE_INFO, subtype, size])? {
            return Ok(Some((subtype, size)));
        }
    }
    Ok(None)
}

fn store_info_record(raw: &mut RawHeader, record: InfoRecord) {
    match record {
        InfoRecord::IntegerInfo(info) => raw.integer_info = Some(info),
        InfoRecord::FloatInfo(info) => raw.float_info = Some(info),
        InfoRecord::MrSets(data) => raw.mr_sets = Some(data),
        InfoRecord::ProductInfo(data) => raw.product_info = Some(data),
        InfoRecord::VarDisplay(entries) => raw.var_display = Some(entries),
        InfoRecord::LongNames(names) => raw.long_names = Some(names),
        InfoRecord::VeryLongStrings(entries) => raw.very_long_strings = Some(entries),
        InfoRecord::ExtendedCaseCount(count) => raw.extended_case_count = Some(count),
        InfoRecord::FileAttributes(data) => raw.file_attributes = Some(data),
        InfoRecord::VarAttributes(attrs) => raw.var_attributes = Some(attrs),
        InfoRecord::MrSetsNew(data) => raw.mr_sets_new = Some(data),
        InfoRecord::Encoding(name) => raw.encoding_name = Some(name),
        InfoRecord::LongStringLabels(sets) => raw.long_string_labels = Some(sets),
        InfoRecord::LongStringMissing(entries) => raw.long_string_missing = Some(entries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_utils::Endian;

    fn le(val: i32) -> [u8; 4] {
        val.to_le_bytes()
    }

    fn numeric_variable(name: &[u8; 8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&le(2));
        buf.extend_from_slice(&le(0));
        buf.extend_from_slice(&le(0));
        buf.extend_from_slice(&le(0));
        buf.extend_from_slice(&[2, 8, 5, 0]);
        buf.extend_from_slice(&[2, 8, 5, 0]);
        buf.extend_from_slice(name);
        buf
    }

    fn termination() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&le(999));
        buf.extend_from_slice(&le(0));
        buf
    }

    fn file_header() -> FileHeader {
        FileHeader {
            magic: *b"$FL2",
            product: "test".to_string(),
            layout_code: 2,
            nominal_case_size: 1,
            compression: Compression::None,
            weight_index: 0,
            ncases: 0,
            bias: DEFAULT_BIAS,
            creation_date: String::new(),
            creation_time: String::new(),
            file_label: String::new(),
        }
    }

    #[test]
    fn test_variables_and_termination() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&numeric_variable(b"A       "));
        buf.extend_from_slice(&numeric_variable(b"B       "));
        buf.extend_from_slice(&termination());

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let raw = parse_dictionary(&mut source, file_header()).unwrap();

        assert_eq!(raw.variables.len(), 2);
        assert_eq!(source.position(), buf.len() as u64);
    }

    #[test]
    fn test_extension_dispatch() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&numeric_variable(b"X       "));
        // Subtype 20: encoding record
        buf.extend_from_slice(&le(7));
        buf.extend_from_slice(&le(20));
        buf.extend_from_slice(&le(1));
        buf.extend_from_slice(&le(5));
        buf.extend_from_slice(b"UTF-8");
        buf.extend_from_slice(&termination());

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let raw = parse_dictionary(&mut source, file_header()).unwrap();

        assert_eq!(raw.encoding_name.as_deref(), Some("UTF-8"));
        assert_eq!(raw.encoding(), "UTF-8");
    }

    #[test]
    fn test_unrecognized_bytes_skipped() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&numeric_variable(b"X       "));
        // Garbage the classifier does not recognize; the loop should
        // discard through it and still find the termination record.
        buf.extend_from_slice(&[0xAB, 0xCD, 0xEF]);
        buf.extend_from_slice(&termination());

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let raw = parse_dictionary(&mut source, file_header()).unwrap();
        assert_eq!(raw.variables.len(), 1);
    }

    #[test]
    fn test_eof_during_skip_ends_metadata() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&numeric_variable(b"X       "));
        buf.extend_from_slice(&[0x01, 0x02]);

        let mut source = ByteSource::with_endian(&buf[..], Endian::Little);
        let raw = parse_dictionary(&mut source, file_header()).unwrap();
        assert_eq!(raw.variables.len(), 1);
    }
}
