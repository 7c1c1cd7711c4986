//! OHLC bar storage: a single bar and the per-symbol dense series built from raw floats.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;
use crate::price::Price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl Bar {
    pub fn new(open: Price, high: Price, low: Price, close: Price) -> Self {
        Bar {
            open,
            high,
            low,
            close,
        }
    }

    /// Build a bar from raw floating-point OHLC, quantising each field to the instrument's tick
    /// precision with banker's rounding.
    pub fn from_floats(instrument: &Instrument, open: f64, high: f64, low: f64, close: f64) -> Self {
        let to_price = |v: f64| instrument.quantize(Decimal::try_from(v).unwrap_or_default());
        Bar::new(to_price(open), to_price(high), to_price(low), to_price(close))
    }
}

/// A dense, time-indexed sequence of bars for one symbol.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        BarSeries { bars }
    }

    pub fn get(&self, iteration: usize) -> Option<&Bar> {
        self.bars.get(iteration)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// The shared UTC datetime index all per-symbol bid/ask series are aligned to.
pub type DatetimeIndex = Vec<DateTime<Utc>>;
