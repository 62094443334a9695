//! Crate-wide error types.

/// Errors that can arise while building or driving the coder.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("frequency table exceeded MaxFrequency")]
    ModelOverflow,
    #[error("bit source exhausted beyond garbage tolerance")]
    InputExhausted,
    #[error("LZW decoder received an out-of-range code")]
    BadCompressed,
    /// Wraps [`Error::ModelOverflow`] (construction-time or preamble-time) at the
    /// [`crate::orchestrator::encode`]/[`crate::orchestrator::lzw_encode`] boundary, per §6/§7.
    #[error("encoding failed")]
    EncodeError(#[source] Box<Error>),
    /// Wraps [`Error::InputExhausted`]/[`Error::BadCompressed`] at the
    /// [`crate::orchestrator::decode`]/[`crate::orchestrator::lzw_decode`] boundary. Preamble
    /// `AuthMismatch` never reaches here — it resolves to an empty buffer instead, per §7.
    #[error("decoding failed")]
    DecodeError(#[source] Box<Error>),
}

pub type DYNERR = Box<dyn std::error::Error>;
