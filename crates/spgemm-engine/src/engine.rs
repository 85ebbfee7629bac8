//! Row Controller (C4): sequences fill and merge phases and exposes the
//! engine's public streaming interface.
//!
//! Following the teacher crate's `Cpu`/`Bus` split — the CPU never owns its
//! bus, it receives `&mut impl Bus` per call — the [`Engine`] never owns an
//! [`EventSink`]; every entry point takes one as an explicit parameter. A
//! caller that doesn't care about the structured event stream passes
//! `&mut NullSink`.

use crate::bank::ColumnBankStore;
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::events::{EngineEvent, EventSink};
use crate::fsm::RowState;
use crate::types::{OutputRecord, SubmitOutcome, Triple};

/// The row-wise SpGEMM accumulation engine.
///
/// Owns the [`ColumnBankStore`] exclusively — no other component may alias
/// it — and the [`RowState`] that decides, at every step, whether the Fill
/// path or the Merge path is allowed to touch it. Because the two paths are
/// mutually exclusive by construction, no arbitration logic is needed.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    store: ColumnBankStore,
    state: RowState,
    current_row: u16,
    first_element: bool,
    /// A triple held across a row boundary, to be accepted once the
    /// previous row's merge completes and the FSM returns to `FILL`.
    pending: Option<Triple>,
}

impl Engine {
    /// Builds an engine from `config`, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is not a valid bank geometry
    /// (see [`EngineConfig::validate`]).
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Self {
            store: ColumnBankStore::new(config.bank_count, config.bank_depth),
            config,
            state: RowState::Reset,
            current_row: 0,
            first_element: true,
            pending: None,
        };
        // Drive RESET -> FILL immediately; RESET never needs a handshake.
        engine.drive(&mut crate::events::NullSink);
        Ok(engine)
    }

    /// The validated configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current row-controller state.
    #[must_use]
    pub const fn state(&self) -> RowState {
        self.state
    }

    /// The row all currently stored entries belong to.
    ///
    /// Only meaningful once at least one triple has been accepted since
    /// construction or the last clear (see [`Self::is_idle`]).
    #[must_use]
    pub const fn current_row(&self) -> u16 {
        self.current_row
    }

    /// `true` if the engine is quiescent: in `FILL`, nothing accumulated
    /// since the last clear, and no output pending.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, RowState::Fill) && self.first_element
    }

    /// Submits one triple.
    ///
    /// Mirrors the `in_valid`/`in_ready` handshake: if the controller is
    /// mid-merge (`FLUSH`/`MERGE_*`), `in_ready` is deasserted and this
    /// returns [`SubmitOutcome::Busy`] without consuming the triple — the
    /// caller should drain output (`poll_output`/`ack_output`) and retry.
    pub fn submit(&mut self, triple: Triple, sink: &mut impl EventSink) -> SubmitOutcome {
        self.drive(sink);
        if !self.state.accepts_input() {
            return SubmitOutcome::Busy;
        }
        self.process_fill(triple, sink)
    }

    /// Returns the output record currently being presented, if any,
    /// without acknowledging it (`out_valid` without `out_ready`).
    ///
    /// Calling this repeatedly without [`Self::ack_output`] returns the
    /// same record every time.
    pub fn poll_output(&mut self, sink: &mut impl EventSink) -> Option<OutputRecord> {
        self.drive(sink);
        match self.state {
            RowState::MergeOutput { bank, addr } => Some(OutputRecord {
                row: self.current_row,
                col: self.config.combine(bank, addr),
                value: self.store.value(bank, addr),
            }),
            _ => None,
        }
    }

    /// Acknowledges the currently presented output record (`out_ready`),
    /// clearing its slot and advancing the merge cursor.
    ///
    /// Returns `false` if there was nothing presented to acknowledge.
    pub fn ack_output(&mut self, sink: &mut impl EventSink) -> bool {
        let RowState::MergeOutput { bank, addr } = self.state else {
            return false;
        };
        self.store.clear(bank, addr);
        let row = self.current_row;
        let col = self.config.combine(bank, addr);
        sink.on_event(EngineEvent::MergeRecordAcked { row, col });
        self.state = match self.store.find_next_occupied(bank, addr + 1) {
            Some(next_addr) => RowState::MergeOutput {
                bank,
                addr: next_addr,
            },
            None => RowState::MergeFind { bank: bank + 1 },
        };
        self.drive(sink);
        true
    }

    /// Advances the FSM exactly one step and returns the event produced.
    ///
    /// For `FILL` with nothing submitted this step, or `MERGE_OUTPUT` with
    /// nothing acknowledged this step, the engine simply holds — `tick`
    /// still returns an event describing that it held.
    pub fn tick(&mut self, sink: &mut impl EventSink) -> EngineEvent {
        self.step_once(sink)
    }

    /// Signals end of stream.
    ///
    /// If the store holds unflushed data for `current_row` (a triple was
    /// accepted but no `last` flag ever arrived), forces the same flush a
    /// `last=true` triple would have triggered, then drains every remaining
    /// output record for that row. A drained row-boundary-held triple can
    /// itself leave the next row dirty (held triple accepted with
    /// `last=false`), so this repeats the force-flush-and-drain cycle until
    /// [`Self::is_idle`] holds, not just once — otherwise a nonzero record
    /// submitted before end-of-stream could be left unflushed in the store.
    /// Leaves the engine idle (`FILL`, empty store) once the vector is
    /// returned.
    pub fn finish(&mut self, sink: &mut impl EventSink) -> Vec<OutputRecord> {
        let mut drained = Vec::new();
        loop {
            self.drive(sink);
            if matches!(self.state, RowState::Fill) && !self.first_element {
                self.state = RowState::Flush;
                self.drive(sink);
            }
            while let Some(record) = self.poll_output(sink) {
                drained.push(record);
                self.ack_output(sink);
            }
            if self.is_idle() {
                break;
            }
        }
        drained
    }

    /// Runs the states that advance on their own ("always" in the
    /// transition table — `RESET`, `FLUSH`, `MERGE_START`, `MERGE_FIND`,
    /// `MERGE_DONE`) until reaching a state that requires an external
    /// handshake (`FILL` or `MERGE_OUTPUT`).
    fn drive(&mut self, sink: &mut impl EventSink) {
        while self.state.auto_advances() {
            self.step_once(sink);
        }
    }

    /// Performs exactly one row of the transition table for the current
    /// state.
    fn step_once(&mut self, sink: &mut impl EventSink) -> EngineEvent {
        match self.state {
            RowState::Reset => {
                self.store.clear_all();
                self.first_element = true;
                self.state = RowState::Fill;
                let event = EngineEvent::Reset;
                sink.on_event(event);
                event
            }
            RowState::Fill => {
                let event = EngineEvent::FillIdle;
                sink.on_event(event);
                event
            }
            RowState::Flush => {
                let row = self.current_row;
                self.state = RowState::MergeStart;
                let event = EngineEvent::FlushStarted { row };
                sink.on_event(event);
                event
            }
            RowState::MergeStart => {
                self.state = RowState::MergeFind { bank: 0 };
                let event = EngineEvent::MergeStarted;
                sink.on_event(event);
                event
            }
            RowState::MergeFind { bank } => self.step_merge_find(bank, sink),
            RowState::MergeOutput { bank, addr } => {
                // Held: out_ready was not asserted this step.
                EngineEvent::MergeRecordReady {
                    row: self.current_row,
                    col: self.config.combine(bank, addr),
                }
            }
            RowState::MergeDone => self.step_merge_done(sink),
        }
    }

    fn step_merge_find(&mut self, bank: u16, sink: &mut impl EventSink) -> EngineEvent {
        if bank >= self.config.bank_count {
            self.state = RowState::MergeDone;
            let event = EngineEvent::MergeDone {
                row: self.current_row,
            };
            sink.on_event(event);
            return event;
        }
        if let Some(addr) = self.store.find_next_occupied(bank, 0) {
            self.state = RowState::MergeOutput { bank, addr };
            let event = EngineEvent::MergeRecordReady {
                row: self.current_row,
                col: self.config.combine(bank, addr),
            };
            sink.on_event(event);
            event
        } else if bank + 1 >= self.config.bank_count {
            self.state = RowState::MergeDone;
            let event = EngineEvent::MergeDone {
                row: self.current_row,
            };
            sink.on_event(event);
            event
        } else {
            self.state = RowState::MergeFind { bank: bank + 1 };
            let event = EngineEvent::MergeBankAdvanced { empty_bank: bank };
            sink.on_event(event);
            event
        }
    }

    fn step_merge_done(&mut self, sink: &mut impl EventSink) -> EngineEvent {
        let next_row = self.pending.as_ref().map_or(self.current_row, |t| t.row);
        self.current_row = next_row;
        self.first_element = true;
        self.state = RowState::Fill;
        let event = EngineEvent::ReturnedToFill {
            row: self.current_row,
        };
        sink.on_event(event);
        if let Some(triple) = self.pending.take() {
            self.accept_and_maybe_flush(triple, sink);
        }
        event
    }

    fn process_fill(&mut self, triple: Triple, sink: &mut impl EventSink) -> SubmitOutcome {
        let col = u32::from(triple.col);
        if !self.config.column_in_range(col) {
            log::debug!(
                "spgemm-engine: dropping out-of-range triple row={} col={} (supported range is [0, {}))",
                triple.row,
                triple.col,
                self.config.column_count()
            );
            sink.on_event(EngineEvent::FillRefusedOutOfRange {
                row: triple.row,
                col: triple.col,
            });
            return SubmitOutcome::Refused;
        }
        if !self.first_element && triple.row != self.current_row {
            sink.on_event(EngineEvent::FillRowBoundary {
                old_row: self.current_row,
                new_row: triple.row,
            });
            self.pending = Some(triple);
            self.state = RowState::Flush;
            self.drive(sink);
            return SubmitOutcome::RowBoundary { held: triple };
        }
        self.accept_and_maybe_flush(triple, sink);
        self.drive(sink);
        SubmitOutcome::Accepted
    }

    fn accept_and_maybe_flush(&mut self, triple: Triple, sink: &mut impl EventSink) {
        let (bank, addr) = self.config.split(u32::from(triple.col));
        if self.store.occupied(bank, addr) {
            self.store.accumulate(bank, addr, triple.value);
        } else {
            self.store.write(bank, addr, triple.value);
        }
        self.current_row = triple.row;
        self.first_element = false;
        sink.on_event(EngineEvent::FillAccepted {
            row: triple.row,
            col: triple.col,
        });
        if triple.last {
            self.state = RowState::Flush;
        }
    }
}
