//! Fixed alphabets for positional base-64 and base-16 encoding.

/// 64-symbol alphabet used for row identifiers.
pub const MAP64: [u8; 64] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Lowercase hexadecimal digits.
pub const MAP16: [u8; 16] = *b"0123456789abcdef";

/// Render the low `width` nibbles of `value`, most significant first.
///
/// `width` is clamped to 16 (a `u64` has no more nibbles).
pub fn num_to_hex(value: u64, width: usize) -> String {
    let width = width.min(16);
    let mut out = String::with_capacity(width);
    for i in (0..width).rev() {
        out.push(MAP16[((value >> (i * 4)) & 0xF) as usize] as char);
    }
    out
}

/// Render bytes as lowercase hex.
pub fn hex_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for b in data {
        out.push(MAP16[(b >> 4) as usize] as char);
        out.push(MAP16[(b & 0xF) as usize] as char);
    }
    out
}

/// Reverse lookup into [`MAP64`].
pub fn map64_index(symbol: u8) -> Option<u8> {
    match symbol {
        b'A'..=b'Z' => Some(symbol - b'A'),
        b'a'..=b'z' => Some(symbol - b'a' + 26),
        b'0'..=b'9' => Some(symbol - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}
