use std::io::Read;

use crate::error::Result;
use crate::io_utils::ByteSource;

/// Subtype 4: machine floating point information.
#[derive(Debug, Clone)]
pub struct FloatInfo {
    /// System-missing sentinel.
    pub sysmis: f64,
    /// Highest representable value.
    pub highest: f64,
    /// Lowest representable value.
    pub lowest: f64,
}

impl FloatInfo {
    pub fn parse<R: Read>(source: &mut ByteSource<R>) -> Result<FloatInfo> {
        Ok(FloatInfo {
            sysmis: source.read_f64()?,
            highest: source.read_f64()?,
            lowest: source.read_f64()?,
        })
    }
}
