//! Preamble derivation, state machine, and the four public entry points (§4.8, §6, §10.3).
//!
//! Grounded on `src/td0.rs`: a thin layer that owns no state of its own, builds an `Options`-driven
//! pipeline out of a lower-level coder, and exposes both a buffer-in/buffer-out pair (`encode`/
//! `decode`) and an LZW-fronted variant, mirroring `td0::compress`/`expand` sitting on top of
//! `lzss_huff` plus `td0`'s use of `crate::Options`/`STD_OPTIONS`. Unlike the teacher's `Options`,
//! which is a `Copy` struct usable as a `const`, this crate's `key: Vec<u8>` field forces a regular
//! `impl Default` in its place.

use crate::bitio::{BitSink, BitSource};
use crate::coder::{Decoder, Encoder};
use crate::consts::EOF_SYMBOL;
use crate::error::Error;
use crate::lzw::{LzwDecoder, LzwEncoder};
use crate::model::Model;
use crate::prng::{FnvHash, LehmerPrng};

/// Inputs threaded through every public operation below; see §6.
#[derive(Clone, Debug)]
pub struct Options {
    /// Arbitrary key material. Empty means "no key preamble".
    pub key: Vec<u8>,
    /// Zero means "no PRNG seed derived from the PIN".
    pub pin: u32,
    /// Zero means "no IV preamble".
    pub iv_length: usize,
    /// Zero is interpreted as the default of 256.
    pub coding_step: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self { key: Vec::new(), pin: 0, iv_length: 0, coding_step: 0 }
    }
}

/// Derives the optional preamble PRNG and the optional 4-byte key material from `opt`, per the
/// two-step rule in §4.8: the PRNG is seeded from the PIN if both a PIN and an IV length are
/// present; otherwise, if a key is present and an IV is wanted, the PRNG is seeded from the key's
/// hash instead.
fn derive_secrets(opt: &Options) -> (Option<LehmerPrng>, Option<[u8; 4]>) {
    let mut prng = None;
    if opt.iv_length > 0 && opt.pin > 0 {
        let seed = FnvHash::new().compute_hash(&opt.pin.to_be_bytes());
        prng = Some(LehmerPrng::new(seed));
    }

    let mut encrypt_key = None;
    if !opt.key.is_empty() {
        let hash = FnvHash::new().compute_hash(&opt.key);
        let key_bytes = hash.to_be_bytes();
        encrypt_key = Some(key_bytes);
        if prng.is_none() && opt.iv_length > 0 {
            prng = Some(LehmerPrng::new(u32::from_be_bytes(key_bytes)));
        }
    }

    (prng, encrypt_key)
}

fn encode_preamble(
    model: &mut Model,
    enc: &mut Encoder,
    sink: &mut BitSink,
    opt: &Options,
    prng: Option<&mut LehmerPrng>,
    encrypt_key: Option<[u8; 4]>,
) -> Result<(), Error> {
    if let Some(prng) = prng {
        log::debug!("encoding {}-byte IV preamble", opt.iv_length);
        prng.reset();
        let mut prev: Option<usize> = None;
        for _ in 0..opt.iv_length {
            let byte = (prng.next() % 255) as usize;
            model.set_symbol_magic(byte, prev)?;
            enc.encode_symbol(model, sink, byte);
            prev = Some(byte);
        }
        model.reset_model_symbols();
    }

    if let Some(key_bytes) = encrypt_key {
        log::debug!("encoding 4-byte key preamble");
        let mut prev: Option<usize> = None;
        for &b in key_bytes.iter() {
            let byte = b as usize;
            model.set_symbol_magic(byte, prev)?;
            enc.encode_symbol(model, sink, byte);
            prev = Some(byte);
        }
        model.reset_model_symbols();
    }
    Ok(())
}

fn encode_core(opt: &Options, payload: &[u8]) -> Result<Vec<u8>, Error> {
    let mut model = Model::new(opt.coding_step)?;
    let mut enc = Encoder::new();
    let mut sink = BitSink::new();
    let (mut prng, encrypt_key) = derive_secrets(opt);

    encode_preamble(&mut model, &mut enc, &mut sink, opt, prng.as_mut(), encrypt_key)?;

    for &b in payload {
        let byte = b as usize;
        enc.encode_symbol(&model, &mut sink, byte);
        model.update(byte);
    }
    enc.encode_symbol(&model, &mut sink, EOF_SYMBOL);
    enc.finish(&mut sink);
    Ok(sink.finish())
}

/// Returns `Ok(None)` on an authentication mismatch in either preamble phase (§7 `AuthMismatch`),
/// so callers can tell that apart from a structural decode failure without exposing a distinct
/// error variant at the public boundary (§10.2).
fn decode_core(opt: &Options, bytes: &[u8]) -> Result<Option<Vec<u8>>, Error> {
    let mut model = Model::new(opt.coding_step)?;
    let mut source = BitSource::new(bytes);
    let mut dec = Decoder::new(&mut source)?;
    let (mut prng, encrypt_key) = derive_secrets(opt);

    if let Some(prng) = prng.as_mut() {
        prng.reset();
        let mut prev: Option<usize> = None;
        for _ in 0..opt.iv_length {
            let expected = (prng.next() % 255) as usize;
            model.set_symbol_magic(expected, prev)?;
            let got = dec.decode_symbol(&model, &mut source)?;
            if got != expected {
                log::warn!("iv preamble mismatch");
                return Ok(None);
            }
            prev = Some(expected);
        }
        model.reset_model_symbols();
    }

    if let Some(key_bytes) = encrypt_key {
        let mut prev: Option<usize> = None;
        for &b in key_bytes.iter() {
            let expected = b as usize;
            model.set_symbol_magic(expected, prev)?;
            let got = dec.decode_symbol(&model, &mut source)?;
            if got != expected {
                log::warn!("key preamble mismatch");
                return Ok(None);
            }
            prev = Some(expected);
        }
        model.reset_model_symbols();
    }

    let mut out = Vec::new();
    loop {
        let s = dec.decode_symbol(&model, &mut source)?;
        if s == EOF_SYMBOL {
            break;
        }
        if s >= 256 {
            log::error!("decoded out-of-range literal symbol {s}");
            return Err(Error::BadCompressed);
        }
        out.push(s as u8);
        model.update(s);
    }
    Ok(Some(out))
}

/// Encodes `bytes` directly through the arithmetic coder, preceded by whatever IV/key preamble
/// `opt` calls for. Any underlying failure (only [`Error::ModelOverflow`] can occur here) is
/// wrapped in [`Error::EncodeError`], per §6.
pub fn encode(opt: &Options, bytes: &[u8]) -> Result<Vec<u8>, Error> {
    encode_core(opt, bytes).map_err(|e| Error::EncodeError(Box::new(e)))
}

/// Decodes a buffer produced by [`encode`]. Returns an empty buffer, not an error, when the
/// preamble does not match `opt` (§7, §8 scenarios S3/S6). Structural failures
/// ([`Error::InputExhausted`], [`Error::BadCompressed`]) are wrapped in [`Error::DecodeError`].
pub fn decode(opt: &Options, bytes: &[u8]) -> Result<Vec<u8>, Error> {
    match decode_core(opt, bytes) {
        Ok(out) => Ok(out.unwrap_or_default()),
        Err(e) => Err(Error::DecodeError(Box::new(e))),
    }
}

/// Runs the LZW front end first, splits the resulting 16-bit codes into a high-byte half-stream
/// followed by a low-byte half-stream (§4.8), then arithmetic-codes the concatenation.
pub fn lzw_encode(opt: &Options, bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let codes = LzwEncoder::new().encode(bytes);
    let mut stream = Vec::with_capacity(codes.len() * 2);
    stream.extend(codes.iter().map(|c| (c >> 8) as u8));
    stream.extend(codes.iter().map(|c| (c & 0xff) as u8));
    encode_core(opt, &stream).map_err(|e| Error::EncodeError(Box::new(e)))
}

/// Inverse of [`lzw_encode`]. Returns an empty buffer on preamble mismatch, same as [`decode`].
pub fn lzw_decode(opt: &Options, bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let stream = match decode_core(opt, bytes).map_err(|e| Error::DecodeError(Box::new(e)))? {
        Some(s) => s,
        None => return Ok(Vec::new()),
    };
    if stream.len() % 2 != 0 {
        log::error!("lzw half-stream split has odd total length {}", stream.len());
        return Err(Error::DecodeError(Box::new(Error::BadCompressed)));
    }
    let n = stream.len() / 2;
    let mut codes = Vec::with_capacity(n);
    for i in 0..n {
        codes.push(((stream[i] as u16) << 8) | stream[n + i] as u16);
    }
    LzwDecoder::new().decode(&codes).map_err(|e| Error::DecodeError(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_round_trips() {
        let opt = Options::default();
        let enc = encode(&opt, b"").unwrap();
        let dec = decode(&opt, &enc).unwrap();
        assert_eq!(dec, b"");
    }

    #[test]
    fn plain_round_trip_with_key_pin_iv() {
        // "Hello, World!" as a literal hex fixture, matching scenario S2.
        let payload = hex::decode("48656c6c6f2c20576f726c6421").unwrap();
        let opt = Options { key: b"secret".to_vec(), pin: 0, iv_length: 0, coding_step: 0 };
        let enc = encode(&opt, &payload).unwrap();
        let dec = decode(&opt, &enc).unwrap();
        assert_eq!(dec, payload);
    }

    #[test]
    fn wrong_key_yields_empty_output() {
        let opt_a = Options { key: b"secret".to_vec(), ..Options::default() };
        let opt_b = Options { key: b"Secret".to_vec(), ..Options::default() };
        let payload = b"Hello, World!";
        let enc = encode(&opt_a, payload).unwrap();
        let dec = decode(&opt_b, &enc).unwrap();
        assert_eq!(dec, Vec::<u8>::new());
    }

    #[test]
    fn cross_key_pin_iv_mismatch_yields_empty_output() {
        let opt_a = Options { key: b"k".to_vec(), pin: 0, iv_length: 0, coding_step: 0 };
        let opt_b = Options { key: b"k".to_vec(), pin: 1234, iv_length: 4, coding_step: 0 };
        let payload = b"payload data";
        let enc = encode(&opt_a, payload).unwrap();
        let dec = decode(&opt_b, &enc).unwrap();
        assert_eq!(dec, Vec::<u8>::new());
    }

    #[test]
    fn repetitive_input_with_large_step_compresses() {
        let opt = Options { key: Vec::new(), pin: 0, iv_length: 0, coding_step: 4096 };
        let payload = vec![0x41u8; 4096];
        let enc = encode(&opt, &payload).unwrap();
        assert!(enc.len() < 200);
        let dec = decode(&opt, &enc).unwrap();
        assert_eq!(dec, payload);
    }

    #[test]
    fn lzw_variant_round_trips_with_full_preamble() {
        let opt = Options { key: b"k".to_vec(), pin: 1234, iv_length: 8, coding_step: 0 };
        let mut payload = Vec::new();
        let mut x: u32 = 7;
        for _ in 0..4096 {
            x = x.wrapping_mul(1103515245).wrapping_add(12345);
            payload.push((x >> 16) as u8);
        }
        let enc = lzw_encode(&opt, &payload).unwrap();
        let dec = lzw_decode(&opt, &enc).unwrap();
        assert_eq!(dec, payload);
    }
}
