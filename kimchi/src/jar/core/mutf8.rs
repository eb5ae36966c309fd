//! Modified UTF-8, the text encoding of `CONSTANT_Utf8` entries
//!
//! Identical to UTF-8 except that U+0000 is written as `C0 80` and characters
//! outside the Basic Multilingual Plane are written as a UTF-16 surrogate pair
//! whose halves are encoded as two independent three-byte sequences. The JVM
//! rejects four-byte UTF-8 sequences, so `encode` never produces them.

/// Longest payload a `CONSTANT_Utf8` entry can declare.
pub const MAX_UTF8_LEN: usize = u16::MAX as usize;

/// Decode a constant pool payload into a `String`.
///
/// Never fails: malformed input degrades to U+FFFD one byte at a time.
pub fn decode(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let lead = raw[i];
        match lead {
            0x00..=0x7F => {
                out.push(char::from(lead));
                i += 1;
            }
            0xC0..=0xDF => match continuation(raw, i + 1) {
                Some(b1) => {
                    // C0 80 lands here as U+0000
                    let cp = (u32::from(lead & 0x1F) << 6) | b1;
                    out.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
                    i += 2;
                }
                None => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    i += 1;
                }
            },
            0xE0..=0xEF => {
                if let Some(ch) = surrogate_pair(raw, i) {
                    out.push(ch);
                    i += 6;
                    continue;
                }
                match (continuation(raw, i + 1), continuation(raw, i + 2)) {
                    (Some(b1), Some(b2)) => {
                        let cp = (u32::from(lead & 0x0F) << 12) | (b1 << 6) | b2;
                        // An unpaired surrogate has no `char`.
                        out.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
                        i += 3;
                    }
                    _ => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        i += 1;
                    }
                }
            }
            // Orphaned continuation bytes and 0xF0.. lead bytes
            _ => {
                out.push(char::REPLACEMENT_CHARACTER);
                i += 1;
            }
        }
    }

    out
}

/// Encode text the way `DataOutput.writeUTF` does.
pub fn encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(text));
    for ch in text.chars() {
        let cp = u32::from(ch);
        match cp {
            0 => out.extend_from_slice(&[0xC0, 0x80]),
            0x01..=0x7F => out.push(cp as u8),
            0x80..=0x7FF => {
                out.push(0xC0 | (cp >> 6) as u8);
                out.push(0x80 | (cp & 0x3F) as u8);
            }
            0x800..=0xFFFF => push_three_byte(&mut out, cp),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    push_three_byte(&mut out, u32::from(*unit));
                }
            }
        }
    }
    out
}

/// Number of bytes `encode(text)` produces, without allocating.
pub fn encoded_len(text: &str) -> usize {
    text.chars()
        .map(|ch| match u32::from(ch) {
            0 => 2,
            0x01..=0x7F => 1,
            0x80..=0x7FF => 2,
            0x800..=0xFFFF => 3,
            _ => 6,
        })
        .sum()
}

fn push_three_byte(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&[
        0xE0 | (value >> 12) as u8,
        0x80 | ((value >> 6) & 0x3F) as u8,
        0x80 | (value & 0x3F) as u8,
    ]);
}

fn continuation(raw: &[u8], at: usize) -> Option<u32> {
    raw.get(at)
        .filter(|b| *b & 0xC0 == 0x80)
        .map(|b| u32::from(b & 0x3F))
}

/// `ED A0..AF xx ED B0..BF xx` is a high surrogate followed by a low one.
fn surrogate_pair(raw: &[u8], at: usize) -> Option<char> {
    let seq = raw.get(at..at + 6)?;
    let is_high = seq[0] == 0xED && seq[1] & 0xF0 == 0xA0 && seq[2] & 0xC0 == 0x80;
    let is_low = seq[3] == 0xED && seq[4] & 0xF0 == 0xB0 && seq[5] & 0xC0 == 0x80;
    if !is_high || !is_low {
        return None;
    }

    let high = (u32::from(seq[1] & 0x0F) << 6) | u32::from(seq[2] & 0x3F);
    let low = (u32::from(seq[4] & 0x0F) << 6) | u32::from(seq[5] & 0x3F);
    char::from_u32(0x10000 + (high << 10) + low)
}
