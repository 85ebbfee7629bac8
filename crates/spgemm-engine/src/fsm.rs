//! Row Controller state machine (C4).
//!
//! The hardware `enum`-driven FSM maps directly onto a tagged Rust enum;
//! each state's transition is a pure function of the current state and the
//! inputs available that step (see [`crate::Engine::tick`]).

/// Row-controller execution state.
///
/// Mirrors the state set `{RESET, FILL, FLUSH, MERGE_START, MERGE_FIND,
/// MERGE_OUTPUT, MERGE_DONE}`. `MergeFind`/`MergeOutput` carry the scan
/// cursor directly rather than storing it alongside the enum, since the
/// cursor only has meaning while in those states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    /// Initial state; always taken once, on construction.
    #[default]
    Reset,
    /// Accepting (or refusing, or row-boundary-holding) input triples.
    Fill,
    /// Transitional state entered right after a row boundary or
    /// end-of-stream; always advances to `MergeStart`.
    Flush,
    /// Transitional state that resets the merge scan cursor to bank 0.
    MergeStart,
    /// Scanning bank `bank` for its next occupied slot at or after `addr`.
    MergeFind {
        /// Bank currently being scanned.
        bank: u16,
    },
    /// Holding the record at `(bank, addr)` for the consumer to acknowledge.
    MergeOutput {
        /// Bank of the record being presented.
        bank: u16,
        /// Address (within `bank`) of the record being presented.
        addr: u16,
    },
    /// All banks exhausted; row drain complete, about to return to `Fill`.
    MergeDone,
}

impl RowState {
    /// Returns `true` if the controller can accept a new input triple this
    /// step (`in_ready` is asserted only in `FILL`).
    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        matches!(self, Self::Fill)
    }

    /// Returns `true` if the controller is presenting an output record
    /// this step, waiting on `out_ready`.
    #[must_use]
    pub const fn presenting_output(&self) -> bool {
        matches!(self, Self::MergeOutput { .. })
    }

    /// Returns `true` if this state advances on its own, with no external
    /// handshake (`RESET`, `FLUSH`, `MERGE_START`, `MERGE_FIND`,
    /// `MERGE_DONE`) — the states an implementation is free to collapse
    /// into a single internal `drive` loop between suspension points.
    #[must_use]
    pub const fn auto_advances(&self) -> bool {
        !matches!(self, Self::Fill | Self::MergeOutput { .. })
    }
}
