use bytes::{BufMut, BytesMut};

use crate::error::{Result, WireError};

/// Separator between a key and its value.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Terminator after every line, including the last.
pub const LINE_TERMINATOR: &str = "\n";

/// Encode entries into the wire format, appending to `dst`.
///
/// Wire format:
/// ```text
/// KEY=VALUE\n
/// KEY=VALUE\n
/// ```
///
/// Values are written verbatim. A value containing a line break will be read
/// by the receiver as more than one line.
pub fn encode_payload<'a, I>(entries: I, dst: &mut BytesMut)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (key, value) in entries {
        dst.reserve(key.len() + value.len() + 2);
        dst.put_slice(key.as_bytes());
        dst.put_u8(KEY_VALUE_SEPARATOR as u8);
        dst.put_slice(value.as_bytes());
        dst.put_slice(LINE_TERMINATOR.as_bytes());
    }
}

/// Decode a payload into `(key, value)` pairs, in wire order.
///
/// Empty lines are skipped. The value is everything after the first `=`.
pub fn decode_payload(src: &[u8]) -> Result<Vec<(String, String)>> {
    let text = std::str::from_utf8(src)?;
    let mut entries = Vec::new();

    for (idx, line) in text.split(LINE_TERMINATOR).enumerate() {
        if line.is_empty() {
            continue;
        }
        match line.split_once(KEY_VALUE_SEPARATOR) {
            Some((key, value)) if !key.is_empty() => {
                entries.push((key.to_string(), value.to_string()));
            }
            _ => return Err(WireError::MalformedLine { line: idx + 1 }),
        }
    }

    Ok(entries)
}
