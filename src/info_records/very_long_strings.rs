use crate::io_utils;

/// Parse subtype 14: very long string widths.
///
/// The payload is `NAME=WIDTH` tuples separated by the two-byte sequence
/// {0x00, 0x09}; a trailing 0x00 or {0x00, 0x09} is tolerated.
pub fn parse_very_long_strings(data: &[u8]) -> Vec<(String, usize)> {
    let text = io_utils::bytes_to_string_lossy(data);
    let mut result = Vec::new();

    for entry in text.split("\u{0}\t") {
        let entry = entry.trim_end_matches('\u{0}');
        if entry.is_empty() {
            continue;
        }
        if let Some((name, width_str)) = entry.split_once('=') {
            if let Ok(width) = width_str.parse::<usize>() {
                result.push((name.to_string(), width));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_very_long_strings() {
        let data = b"LONGVAR1=500\0\tLONGVAR2=1000\0\t";
        let entries = parse_very_long_strings(data);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("LONGVAR1".to_string(), 500));
        assert_eq!(entries[1], ("LONGVAR2".to_string(), 1000));
    }

    #[test]
    fn test_trailing_nul_tolerated() {
        let data = b"BIGTEXT=300\0";
        let entries = parse_very_long_strings(data);
        assert_eq!(entries, vec![("BIGTEXT".to_string(), 300)]);
    }
}
