use encoding_rs::Encoding;

/// Resolve the file's character encoding to its canonical name.
///
/// Priority: the subtype 20 encoding label, then the subtype 3 code page,
/// then windows-1252 (the historical SPSS default). The name is surfaced
/// for callers; this crate never transcodes cell bytes.
pub fn canonical_name(encoding_name: Option<&str>, character_code: Option<i32>) -> &'static str {
    if let Some(name) = encoding_name {
        return encoding_from_name(name).name();
    }
    if let Some(code) = character_code {
        return encoding_from_code_page(code).name();
    }
    encoding_rs::WINDOWS_1252.name()
}

/// Map an encoding label (e.g. "UTF-8", "windows-1252") to an encoding.
fn encoding_from_name(name: &str) -> &'static Encoding {
    let normalized = name.trim().to_ascii_lowercase();
    Encoding::for_label(normalized.as_bytes()).unwrap_or(encoding_rs::WINDOWS_1252)
}

/// Map an SPSS IANA code page number to an encoding.
fn encoding_from_code_page(code_page: i32) -> &'static Encoding {
    match code_page {
        874 => encoding_rs::WINDOWS_874,
        932 => encoding_rs::SHIFT_JIS,
        936 => encoding_rs::GBK,
        949 => encoding_rs::EUC_KR,
        950 => encoding_rs::BIG5,
        1200 => encoding_rs::UTF_16LE,
        1201 => encoding_rs::UTF_16BE,
        1250 => encoding_rs::WINDOWS_1250,
        1251 => encoding_rs::WINDOWS_1251,
        1252 => encoding_rs::WINDOWS_1252,
        1253 => encoding_rs::WINDOWS_1253,
        1254 => encoding_rs::WINDOWS_1254,
        1255 => encoding_rs::WINDOWS_1255,
        1256 => encoding_rs::WINDOWS_1256,
        1257 => encoding_rs::WINDOWS_1257,
        1258 => encoding_rs::WINDOWS_1258,
        20127 => encoding_rs::WINDOWS_1252, // US-ASCII, treat as 1252
        28591 => encoding_rs::WINDOWS_1252, // ISO-8859-1 per WHATWG
        28592 => encoding_rs::ISO_8859_2,
        28595 => encoding_rs::ISO_8859_5,
        28597 => encoding_rs::ISO_8859_7,
        28605 => encoding_rs::ISO_8859_15,
        51932 => encoding_rs::EUC_JP,
        51949 => encoding_rs::EUC_KR,
        54936 => encoding_rs::GB18030,
        65001 => encoding_rs::UTF_8,
        _ => encoding_rs::WINDOWS_1252,
    }
}
