//! Error types for configuration and frame transport.
//!
//! Per the error handling design, out-of-range columns and row boundaries
//! are *not* errors — they are ordinary [`crate::SubmitOutcome`] variants.
//! Only construction-time misconfiguration and malformed wire frames are
//! represented as [`std::error::Error`] types here.

/// Errors raised while validating an [`crate::EngineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `bank_count` was zero or not a power of two.
    #[error("bank_count must be a non-zero power of two, got {0}")]
    BankCountNotPowerOfTwo(u16),

    /// `bank_depth` was zero or not a power of two.
    #[error("bank_depth must be a non-zero power of two, got {0}")]
    BankDepthNotPowerOfTwo(u16),

    /// `value_bits` is not the only width this implementation supports (32).
    #[error("value_bits must be 32, got {0}")]
    UnsupportedValueBits(u32),

    /// `index_bits` is not the only width this implementation supports (16).
    #[error("index_bits must be 16, got {0}")]
    UnsupportedIndexBits(u32),

    /// `bank_count * bank_depth` does not fit in `index_bits`.
    #[error(
        "bank_count * bank_depth = {columns} columns does not fit in a {index_bits}-bit index"
    )]
    ColumnRangeExceedsIndexWidth {
        /// The computed column count, `bank_count * bank_depth`.
        columns: u32,
        /// The configured index width in bits.
        index_bits: u32,
    },
}

/// Errors raised by the byte-oriented framed transport (§4.5).
///
/// The engine itself never sees these: a [`crate::transport::FrameDecoder`]
/// surfaces them to its caller before a triple is ever handed to
/// [`crate::Engine::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Fewer than 9 bytes were available to decode a frame.
    #[error("frame is too short: need 9 bytes, got {0}")]
    FrameTooShort(usize),

    /// The flags byte had a reserved bit (bits 1..7) set.
    #[error("frame flags byte 0x{0:02X} has reserved bits set")]
    ReservedBitsSet(u8),

    /// A text output record could not be parsed.
    #[error("malformed output record: {0:?}")]
    MalformedRecord(String),
}
