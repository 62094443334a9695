//! Byte <-> 16-bit-code LZW front end (§4.6).
//!
//! The teacher's own `lzw.rs` builds a fixed-width `(BitOrder, width)` code stream from a
//! `HashMap<(usize,usize), Link>` dictionary keyed on `(base_code, sym)` pairs (`LZW::check_match`,
//! `LZW::get_string`). That keying-on-a-pair-not-a-sequence trick is kept here directly: design
//! note §9 calls out the hot-path allocation risk of hashing literal byte sequences, and the
//! teacher already avoids it on the decode side via `Link::root`/`Link::create`. The encode side
//! below keys on `(parent_code: i32, extension_byte: u8)` in the same spirit. The decode side
//! still needs literal bytes to emit, so it keeps a `Vec<Vec<u8>>` table indexed by code, playing
//! the role of the teacher's `get_string` walk but without the repeated dictionary lookups that
//! walk performs.

use std::collections::HashMap;

use crate::error::Error;

/// Reserved code that signals "the dictionary was reset here".
pub const EOB: u16 = 0;
/// Entry count at which the dictionary is flushed and reset.
pub const CAPACITY: u16 = 1 << 15;

pub struct LzwEncoder {
    dict: HashMap<(i32, u8), u16>,
    next_code: u16,
}

fn seed_encode_dict() -> HashMap<(i32, u8), u16> {
    let mut dict = HashMap::with_capacity(256);
    for b in 0..=255u16 {
        dict.insert((0i32, b as u8), b + 1);
    }
    dict
}

impl LzwEncoder {
    pub fn new() -> Self {
        Self { dict: seed_encode_dict(), next_code: 257 }
    }

    fn reset(&mut self) {
        log::debug!("lzw encode dictionary full at {}, resetting", self.next_code);
        self.dict = seed_encode_dict();
        self.next_code = 257;
    }

    /// Encodes a full byte buffer into a list of dictionary codes, inserting [`EOB`] whenever the
    /// dictionary fills up mid-stream.
    pub fn encode(&mut self, bytes: &[u8]) -> Vec<u16> {
        let mut out = Vec::new();
        let mut w_code: i32 = 0;
        let mut w_len = 0usize;

        for &c in bytes {
            if self.next_code >= CAPACITY {
                if w_len > 0 {
                    out.push(w_code as u16);
                }
                out.push(EOB);
                self.reset();
                w_code = 0;
                w_len = 0;
            }

            if let Some(&code) = self.dict.get(&(w_code, c)) {
                w_code = code as i32;
                w_len += 1;
            } else {
                if w_len > 0 {
                    out.push(w_code as u16);
                }
                self.dict.insert((w_code, c), self.next_code);
                self.next_code += 1;
                w_code = c as i32 + 1;
                w_len = 1;
            }
        }
        if w_len > 0 {
            out.push(w_code as u16);
        }
        out
    }
}

impl Default for LzwEncoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LzwDecoder {
    table: Vec<Vec<u8>>,
}

fn seed_decode_table() -> Vec<Vec<u8>> {
    let mut table = Vec::with_capacity(257);
    table.push(Vec::new()); // code 0 / EOB, never emitted as a literal
    for b in 0..=255u16 {
        table.push(vec![b as u8]);
    }
    table
}

impl LzwDecoder {
    pub fn new() -> Self {
        Self { table: seed_decode_table() }
    }

    fn reset(&mut self) {
        log::debug!("lzw decode dictionary reset (EOB observed)");
        self.table = seed_decode_table();
    }

    /// Decodes a list of dictionary codes back into the original byte buffer.
    pub fn decode(&mut self, codes: &[u16]) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        let mut w: Option<Vec<u8>> = None;

        for &k in codes {
            if k == EOB {
                self.reset();
                w = None;
                continue;
            }

            let entry = if (k as usize) < self.table.len() {
                self.table[k as usize].clone()
            } else if k as usize == self.table.len() {
                match &w {
                    Some(prev) => {
                        let mut e = prev.clone();
                        e.push(prev[0]);
                        e
                    }
                    None => {
                        log::error!("lzw decode saw KwKwK code {k} with no prior entry");
                        return Err(Error::BadCompressed);
                    }
                }
            } else {
                log::error!("lzw decode saw out-of-range code {k}");
                return Err(Error::BadCompressed);
            };

            out.extend_from_slice(&entry);
            if let Some(prev) = &w {
                if self.table.len() < CAPACITY as usize {
                    let mut new_entry = prev.clone();
                    new_entry.push(entry[0]);
                    self.table.push(new_entry);
                }
            }
            w = Some(entry);
        }
        Ok(out)
    }
}

impl Default for LzwDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_short_input() {
        let input = b"TOBEORNOTTOBEORTOBEORNOT";
        let codes = LzwEncoder::new().encode(input);
        let decoded = LzwDecoder::new().decode(&codes).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn round_trips_empty_input() {
        let codes = LzwEncoder::new().encode(b"");
        assert!(codes.is_empty());
        let decoded = LzwDecoder::new().decode(&codes).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn round_trips_across_a_forced_reset() {
        // Feed enough distinct content that the dictionary fills past CAPACITY at least once.
        let mut input = Vec::new();
        let mut x: u32 = 12345;
        for _ in 0..200_000 {
            x = x.wrapping_mul(1103515245).wrapping_add(12345);
            input.push((x >> 16) as u8);
        }
        let codes = LzwEncoder::new().encode(&input);
        assert!(codes.contains(&EOB));
        let decoded = LzwDecoder::new().decode(&codes).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn rejects_out_of_range_code() {
        let mut dec = LzwDecoder::new();
        assert!(dec.decode(&[5000]).is_err());
    }
}
