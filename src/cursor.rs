//! Random-access view into precomputed per-symbol OHLC price arrays (component C3).
//!
//! Grounded on the dense-array/integer-cursor style of a historical-data bot loop (see
//! `nkaz001-hftbacktest`'s tick arrays), adapted here to quantised [`Bar`] entries and a shared
//! UTC datetime index rather than raw price ticks.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::bar::{Bar, BarSeries, DatetimeIndex};
use crate::error::SimError;

#[derive(Debug)]
pub struct BarCursor {
    index: DatetimeIndex,
    bid_series: HashMap<String, BarSeries>,
    ask_series: HashMap<String, BarSeries>,
    iteration: usize,
}

impl BarCursor {
    pub fn new(
        index: DatetimeIndex,
        bid_series: HashMap<String, BarSeries>,
        ask_series: HashMap<String, BarSeries>,
    ) -> Self {
        BarCursor {
            index,
            bid_series,
            ask_series,
            iteration: 0,
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn current_time(&self) -> Option<DateTime<Utc>> {
        self.index.get(self.iteration).copied()
    }

    /// Advance the iteration counter to match `t`, if `t` is present in the index.
    pub fn advance_to(&mut self, t: DateTime<Utc>) {
        while let Some(next) = self.index.get(self.iteration + 1) {
            if *next > t {
                break;
            }
            self.iteration += 1;
        }
    }

    /// Wind the cursor forward from `index[0]` in `step` increments until the wall clock reaches
    /// or passes `to_time`, returning the resulting wall-clock value (which may overshoot
    /// `to_time` when `to_time - index[0]` is not an exact multiple of `step`) for the caller to
    /// set its clock to. If `to_time` precedes `index[0]`, zero steps are taken, the iteration
    /// stays at 0, and `index[0]` itself is returned.
    pub fn set_initial_iteration(
        &mut self,
        to_time: DateTime<Utc>,
        step: chrono::Duration,
    ) -> Result<DateTime<Utc>, SimError> {
        let Some(start) = self.index.first().copied() else {
            return Ok(to_time);
        };
        if to_time < start {
            self.iteration = 0;
            return Ok(start);
        }
        self.iteration = 0;
        let mut wall_clock = start;
        while wall_clock < to_time {
            wall_clock += step;
            if let Some(next) = self.index.get(self.iteration + 1) {
                if wall_clock >= *next {
                    self.iteration += 1;
                }
            }
        }
        Ok(wall_clock)
    }

    fn bid_bar(&self, symbol: &str) -> Result<&Bar, SimError> {
        self.bid_series
            .get(symbol)
            .ok_or_else(|| SimError::UnknownSymbol(symbol.to_string()))?
            .get(self.iteration)
            .ok_or(SimError::BarIndexOutOfRange {
                symbol: symbol.to_string(),
                iteration: self.iteration,
            })
    }

    fn ask_bar(&self, symbol: &str) -> Result<&Bar, SimError> {
        self.ask_series
            .get(symbol)
            .ok_or_else(|| SimError::UnknownSymbol(symbol.to_string()))?
            .get(self.iteration)
            .ok_or(SimError::BarIndexOutOfRange {
                symbol: symbol.to_string(),
                iteration: self.iteration,
            })
    }

    pub fn highest_bid(&self, symbol: &str) -> Result<crate::price::Price, SimError> {
        self.bid_bar(symbol).map(|b| b.high)
    }

    pub fn lowest_bid(&self, symbol: &str) -> Result<crate::price::Price, SimError> {
        self.bid_bar(symbol).map(|b| b.low)
    }

    pub fn closing_bid(&self, symbol: &str) -> Result<crate::price::Price, SimError> {
        self.bid_bar(symbol).map(|b| b.close)
    }

    pub fn highest_ask(&self, symbol: &str) -> Result<crate::price::Price, SimError> {
        self.ask_bar(symbol).map(|b| b.high)
    }

    pub fn lowest_ask(&self, symbol: &str) -> Result<crate::price::Price, SimError> {
        self.ask_bar(symbol).map(|b| b.low)
    }

    pub fn closing_ask(&self, symbol: &str) -> Result<crate::price::Price, SimError> {
        self.ask_bar(symbol).map(|b| b.close)
    }

    pub fn step(&mut self) {
        if self.iteration + 1 < self.index.len() {
            self.iteration += 1;
        }
    }
}
