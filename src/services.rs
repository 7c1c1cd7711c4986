//! Injected services (component C8): clock, id factory, event sink, logger.
//!
//! Trait shapes mirror the teacher's pluggable-backend style (`execution::Executor`); the
//! `SequentialIdFactory`'s optional seed salting is grounded on `execution/types.rs::OrderId::new_random`,
//! and `TracingLogger` adapts `utils/logger.rs`'s use of the `tracing` macros.

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::event::Event;

pub trait Clock: std::fmt::Debug {
    fn time_now(&self) -> DateTime<Utc>;
    fn set_time(&mut self, t: DateTime<Utc>);
}

#[derive(Debug, Clone)]
pub struct SimulatedClock {
    now: DateTime<Utc>,
}

impl SimulatedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        SimulatedClock { now: start }
    }
}

impl Clock for SimulatedClock {
    fn time_now(&self) -> DateTime<Utc> {
        self.now
    }

    fn set_time(&mut self, t: DateTime<Utc>) {
        self.now = t;
    }
}

pub trait IdFactory: std::fmt::Debug {
    fn generate(&mut self) -> String;
}

/// Deterministic under a fixed seed: a monotonic counter, optionally salted so that two runs with
/// different seeds produce distinguishable but still reproducible identifiers.
#[derive(Debug)]
pub struct SequentialIdFactory {
    next: u64,
    salt: u64,
}

impl SequentialIdFactory {
    pub fn new() -> Self {
        SequentialIdFactory { next: 1, salt: 0 }
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        SequentialIdFactory {
            next: 1,
            salt: rng.gen::<u32>() as u64,
        }
    }
}

impl Default for SequentialIdFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl IdFactory for SequentialIdFactory {
    fn generate(&mut self) -> String {
        let id = if self.salt == 0 {
            self.next.to_string()
        } else {
            format!("{}-{}", self.salt, self.next)
        };
        self.next += 1;
        id
    }
}

pub trait EventSink: std::fmt::Debug {
    fn on_event(&mut self, event: Event);
}

#[derive(Debug, Default)]
pub struct RecordingEventSink {
    pub events: Vec<Event>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        RecordingEventSink::default()
    }
}

/// A clonable handle onto a shared event buffer, so a test can hand the simulator a boxed sink
/// while retaining a reference it can later inspect.
#[derive(Debug, Clone, Default)]
pub struct SharedRecordingEventSink(std::rc::Rc<std::cell::RefCell<Vec<Event>>>);

impl SharedRecordingEventSink {
    pub fn new() -> Self {
        SharedRecordingEventSink::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }
}

impl EventSink for SharedRecordingEventSink {
    fn on_event(&mut self, event: Event) {
        self.0.borrow_mut().push(event);
    }
}

impl EventSink for RecordingEventSink {
    fn on_event(&mut self, event: Event) {
        self.events.push(event);
    }
}

pub trait Logger: std::fmt::Debug {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_id_factory_is_monotonic() {
        let mut factory = SequentialIdFactory::new();
        assert_eq!(factory.generate(), "1");
        assert_eq!(factory.generate(), "2");
    }

    #[test]
    fn seeded_factory_is_deterministic() {
        let mut a = SequentialIdFactory::with_seed(42);
        let mut b = SequentialIdFactory::with_seed(42);
        assert_eq!(a.generate(), b.generate());
    }

    #[test]
    fn recording_sink_preserves_order() {
        let mut sink = RecordingEventSink::new();
        sink.on_event(Event::OrderCancelled {
            event_id: "1".into(),
            event_timestamp: Utc::now(),
            symbol: "EURUSD".into(),
            order_id: crate::order::OrderId::new("1"),
        });
        assert_eq!(sink.events.len(), 1);
    }
}
