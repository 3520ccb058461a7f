use std::io::Read;

use crate::error::Result;
use crate::io_utils::ByteSource;

/// Subtype 3: machine integer information.
#[derive(Debug, Clone)]
pub struct IntegerInfo {
    pub version_major: i32,
    pub version_minor: i32,
    pub version_revision: i32,
    pub machine_code: i32,
    /// Floating point representation: 1=IEEE, 2=IBM, 3=VAX.
    pub floating_point_rep: i32,
    pub compression_code: i32,
    /// Endianness flag: 1=big, 2=little.
    pub endianness: i32,
    /// IANA code page number (e.g. 65001=UTF-8, 1252=windows-1252).
    pub character_code: i32,
}

impl IntegerInfo {
    pub fn parse<R: Read>(source: &mut ByteSource<R>) -> Result<IntegerInfo> {
        Ok(IntegerInfo {
            version_major: source.read_i32()?,
            version_minor: source.read_i32()?,
            version_revision: source.read_i32()?,
            machine_code: source.read_i32()?,
            floating_point_rep: source.read_i32()?,
            compression_code: source.read_i32()?,
            endianness: source.read_i32()?,
            character_code: source.read_i32()?,
        })
    }
}
