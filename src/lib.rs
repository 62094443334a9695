//! # Magicoder
//!
//! Compress and lightly obfuscate a byte stream with an order-1 adaptive arithmetic coder.
//! Obfuscation comes from a known-plaintext preamble — derived from a key, a PIN, and an IV
//! length — encoded through the same coder as the payload, rather than from a block cipher.
//!
//! * [`orchestrator::encode`] / [`orchestrator::decode`] run the plain pipeline.
//! * [`orchestrator::lzw_encode`] / [`orchestrator::lzw_decode`] front it with LZW.
//!
//! ## Buffer Example
//!
//! ```rs
//! use magicoder::{orchestrator, Options};
//! let opt = Options { key: b"secret".to_vec(), ..Options::default() };
//! let compressed = orchestrator::encode(&opt, b"the quick brown fox").expect("encode failed");
//! let restored = orchestrator::decode(&opt, &compressed).expect("decode failed");
//! assert_eq!(restored, b"the quick brown fox");
//! ```

pub mod bitio;
pub mod coder;
pub mod consts;
pub mod error;
pub mod fenwick;
pub mod lzw;
pub mod model;
pub mod orchestrator;
pub mod prng;

pub use error::Error;
pub use orchestrator::Options;
