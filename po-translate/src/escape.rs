//! Escape codec for quoted strings in gettext `.po` files.
//!
//! Only `\n`, `\t`, `\"` and `\\` are recognised. Any other backslash
//! sequence (`\r`, `\u00e9`, octal escapes, ...) is passed through literally,
//! so data relying on those escapes is not decoded.

/// Decodes the on-disk representation of a quoted `.po` string into its
/// logical value.
///
/// Works in a single pass, so `\\n` decodes to a backslash followed by `n`
/// rather than to a backslash and a newline.
pub fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Encodes a logical string for writing between double quotes in a `.po`
/// file. Inverse of [`unescape`].
pub fn escape(logical: &str) -> String {
    let mut result = String::with_capacity(logical.len() + 2);
    for c in logical.chars() {
        match c {
            '\\' => result.push_str(r"\\"),
            '"' => result.push_str(r#"\""#),
            '\n' => result.push_str(r"\n"),
            '\t' => result.push_str(r"\t"),
            other => result.push(other),
        }
    }
    result
}
