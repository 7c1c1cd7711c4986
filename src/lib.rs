//! Deterministic backtest execution simulator: a single-threaded, step-driven state machine that
//! replays historical bid/ask bars against strategy order commands and emits an ordered event
//! stream plus account and position state changes.

pub mod account;
pub mod bar;
pub mod config;
pub mod cursor;
pub mod error;
pub mod event;
pub mod instrument;
pub mod logging;
pub mod order;
pub mod position;
pub mod price;
pub mod services;
pub mod simulator;

/// Fixture builders shared by in-crate unit tests and `tests/scenarios.rs`. Kept out of release
/// builds: available under `cfg(test)` for this crate's own tests, and under the `test-util`
/// feature (enabled by the self-referential dev-dependency in `Cargo.toml`) for the external
/// integration-test crate.
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub mod prelude {
    pub use crate::account::Account;
    pub use crate::bar::{Bar, BarSeries};
    pub use crate::config::SimulatorConfig;
    pub use crate::cursor::BarCursor;
    pub use crate::error::{SimError, SimResult};
    pub use crate::event::Event;
    pub use crate::instrument::{Instrument, InstrumentCatalogue};
    pub use crate::order::{Order, OrderId, OrderState, OrderType, Side, TimeInForce};
    pub use crate::position::Position;
    pub use crate::price::{Money, Price, Quantity};
    pub use crate::services::{
        Clock, EventSink, IdFactory, Logger, RecordingEventSink, SequentialIdFactory, SharedRecordingEventSink,
        SimulatedClock, TracingLogger,
    };
    pub use crate::simulator::ExecutionSimulator;
}
