//! Framed Transport (C5): byte-oriented input framing, line-oriented output
//! record emission.
//!
//! The bit-level SPI path and clock-domain-crossing synchronizer of the
//! reference hardware collapse here into an ordinary buffered byte decoder;
//! this is a pure simplification that preserves externally observable
//! behavior, per the design notes. The engine itself never sees a
//! [`TransportError`] — a caller decodes a frame into a [`crate::Triple`]
//! before ever calling [`crate::Engine::submit`].

use bitflags::bitflags;

use crate::error::TransportError;
use crate::types::{OutputRecord, Triple};

/// Size in bytes of one input frame (§4.5).
pub const FRAME_LEN: usize = 9;

bitflags! {
    /// The flags byte of an input frame (byte 8).
    ///
    /// Only bit 0 (`LAST`) is defined; bits 1..7 are reserved and must be
    /// zero on decode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameFlags: u8 {
        /// Marks the final triple of the stream.
        const LAST = 1 << 0;
    }
}

impl FrameFlags {
    /// All bits outside [`Self::LAST`] are reserved and must be unset.
    const RESERVED: u8 = !Self::LAST.bits();
}

/// Decodes 9-byte, big-endian input frames into [`Triple`]s.
///
/// ```text
/// byte 0..3 : value   (signed 32-bit)
/// byte 4..5 : row     (unsigned 16-bit)
/// byte 6..7 : col     (unsigned 16-bit)
/// byte 8    : flags   (bit 0 = last; bits 1..7 reserved, must be 0)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder;

impl FrameDecoder {
    /// Creates a decoder. Stateless; provided for symmetry with encoders
    /// and to leave room for future buffering without breaking callers.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes one frame from `bytes`, which must be exactly
    /// [`FRAME_LEN`] bytes (the caller is responsible for chunking a
    /// longer buffer).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::FrameTooShort`] if `bytes` has fewer than
    /// [`FRAME_LEN`] bytes, or [`TransportError::ReservedBitsSet`] if the
    /// flags byte has a reserved bit set.
    pub fn decode(&self, bytes: &[u8]) -> Result<Triple, TransportError> {
        if bytes.len() < FRAME_LEN {
            return Err(TransportError::FrameTooShort(bytes.len()));
        }
        let flags_byte = bytes[8];
        if flags_byte & FrameFlags::RESERVED != 0 {
            log::warn!("spgemm-engine: frame flags byte 0x{flags_byte:02X} has reserved bits set");
            return Err(TransportError::ReservedBitsSet(flags_byte));
        }
        let value = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let row = u16::from_be_bytes([bytes[4], bytes[5]]);
        let col = u16::from_be_bytes([bytes[6], bytes[7]]);
        let flags = FrameFlags::from_bits_truncate(flags_byte);
        Ok(Triple {
            row,
            col,
            value,
            last: flags.contains(FrameFlags::LAST),
        })
    }
}

/// Encodes a [`Triple`] back into its 9-byte wire representation, the
/// inverse of [`FrameDecoder::decode`]. Used by tests and by replay
/// tooling that needs to re-synthesize a frame stream.
#[must_use]
pub fn encode_frame(triple: Triple) -> [u8; FRAME_LEN] {
    let mut out = [0u8; FRAME_LEN];
    out[0..4].copy_from_slice(&triple.value.to_be_bytes());
    out[4..6].copy_from_slice(&triple.row.to_be_bytes());
    out[6..8].copy_from_slice(&triple.col.to_be_bytes());
    let mut flags = FrameFlags::empty();
    if triple.last {
        flags |= FrameFlags::LAST;
    }
    out[8] = flags.bits();
    out
}

/// Formats an [`OutputRecord`] as `"<row>,<col>,<value>\n"`.
///
/// This implementation's deployment choice is plain decimal integer
/// formatting for `value` (see the design decision in the engine's
/// expanded specification), not the historical decimal-real rendering some
/// source paths use.
#[must_use]
pub fn format_record(record: OutputRecord) -> String {
    format!("{},{},{}\n", record.row, record.col, record.value)
}

/// Parses a text output record, tolerating both this deployment's plain
/// integer rendering and the historical decimal-real rendering (e.g.
/// `"0,5,33.0\n"`) so replay tooling can read logs from either source.
///
/// # Errors
///
/// Returns [`TransportError::MalformedRecord`] if the line does not have
/// exactly three comma-separated fields, or if `row`/`col`/`value` fail to
/// parse as their respective integer types.
pub fn parse_record(line: &str) -> Result<OutputRecord, TransportError> {
    let line = line.trim_end_matches(['\n', '\r']);
    let mut fields = line.splitn(3, ',');
    let (Some(row_str), Some(col_str), Some(value_str)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(TransportError::MalformedRecord(line.to_string()));
    };
    let row = row_str
        .parse::<u16>()
        .map_err(|_| TransportError::MalformedRecord(line.to_string()))?;
    let col = col_str
        .parse::<u16>()
        .map_err(|_| TransportError::MalformedRecord(line.to_string()))?;
    // Tolerate a historical `"33.0"`-style real rendering by parsing as a
    // float and truncating, falling back to a strict integer parse first
    // so exact values are never perturbed by float round-trip error.
    let value = if let Ok(v) = value_str.parse::<i32>() {
        v
    } else {
        let as_float = value_str
            .parse::<f64>()
            .map_err(|_| TransportError::MalformedRecord(line.to_string()))?;
        if as_float.fract() != 0.0 || as_float.abs() > f64::from(i32::MAX) {
            return Err(TransportError::MalformedRecord(line.to_string()));
        }
        as_float as i32
    };
    Ok(OutputRecord { row, col, value })
}
