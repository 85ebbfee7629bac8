//! Row-wise sparse-sparse matrix multiplication (SpGEMM) accumulation
//! engine, modeled on a streaming fill/merge hardware core.
//!
//! A producer expands partial products `A[i,k] * B[k,:]` upstream of this
//! crate and submits them as `(row, col, value)` [`Triple`]s, one at a time,
//! in any order within a row. The engine scatters each triple into a bank of
//! column-addressed slots ([`ColumnBankStore`]), accumulating duplicate
//! columns in place, then — on a row boundary or explicit [`Engine::finish`]
//! — drains the row back out through [`Engine::poll_output`] in ascending
//! column order, one [`OutputRecord`] at a time.
//!
//! # Architecture
//!
//! The engine is a single [`RowState`] state machine ([`Engine`]) driving
//! two mutually exclusive phases over one owned [`ColumnBankStore`]: fill
//! (scatter-accumulate) and merge (bank-parallel ascending drain). Neither
//! phase ever aliases the store while the other runs.
//!
//! Every [`Engine`] entry point takes an [`EventSink`] by `&mut` rather than
//! owning one, so a caller that doesn't care about the structured event
//! stream pays nothing for it (pass [`NullSink`]); a test harness that wants
//! to assert on FSM behavior can pass a [`RecordingSink`] instead.
//!
//! # Example
//!
//! ```
//! use spgemm_engine::{Engine, EngineConfig, NullSink, Triple};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let mut sink = NullSink;
//! engine.submit(Triple::new(0, 5, 10), &mut sink);
//! engine.submit(Triple::last(0, 5, 32), &mut sink);
//!
//! let mut out = Vec::new();
//! while let Some(record) = engine.poll_output(&mut sink) {
//!     out.push(record);
//!     engine.ack_output(&mut sink);
//! }
//! assert_eq!(out[0].value, 42);
//! ```

#![warn(missing_docs)]

mod bank;
mod config;
mod engine;
mod error;
mod events;
mod fsm;
mod transport;
mod types;

pub use bank::ColumnBankStore;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{ConfigError, TransportError};
pub use events::{EngineEvent, EventSink, NullSink, RecordingSink};
pub use fsm::RowState;
pub use transport::{encode_frame, format_record, parse_record, FrameDecoder, FrameFlags, FRAME_LEN};
pub use types::{OutputRecord, SubmitOutcome, Triple};
