//! Core data types: the input triple, the output record, and submit outcomes.

/// A partial product `(row, col, value)` arising from expanding one multiply
/// in row-wise SpGEMM (`A[i,k] * B[k,:]`).
///
/// `last` is an advisory hint marking the final triple of the stream; it is
/// not required for correctness at ordinary row boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triple {
    /// Row index of the partial product.
    pub row: u16,
    /// Column index of the partial product.
    pub col: u16,
    /// Signed scalar value of the partial product.
    pub value: i32,
    /// Advisory end-of-stream marker.
    pub last: bool,
}

impl Triple {
    /// Convenience constructor for a non-final triple.
    #[must_use]
    pub const fn new(row: u16, col: u16, value: i32) -> Self {
        Self {
            row,
            col,
            value,
            last: false,
        }
    }

    /// Convenience constructor for the final triple of the stream.
    #[must_use]
    pub const fn last(row: u16, col: u16, value: i32) -> Self {
        Self {
            row,
            col,
            value,
            last: true,
        }
    }
}

/// An accumulated, emitted nonzero of `C[row, :]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputRecord {
    /// Row index this record belongs to.
    pub row: u16,
    /// Column index of the accumulated nonzero.
    pub col: u16,
    /// Final accumulated value (wrapping 32-bit sum of all contributions).
    pub value: i32,
}

/// The result of calling [`crate::Engine::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The triple was in range and belonged to the current row (or was the
    /// first triple since the last clear); it was written or accumulated
    /// into the store.
    Accepted,
    /// The triple's `col` fell outside `[0, bank_count * bank_depth)`. It
    /// was dropped; the input handshake did not advance.
    Refused,
    /// The triple's `row` differed from `current_row`; it was not stored.
    /// The engine has begun draining the previous row and is holding this
    /// triple to be accepted once merge completes.
    RowBoundary {
        /// The triple now held pending, to be accepted on return to `FILL`.
        held: Triple,
    },
    /// The engine is mid-merge (`FLUSH`/`MERGE_*`) and cannot accept input
    /// this step; `in_ready` is deasserted. The caller should drain output
    /// via [`crate::Engine::poll_output`]/[`crate::Engine::ack_output`] (or
    /// call [`crate::Engine::tick`]) and retry.
    Busy,
}
