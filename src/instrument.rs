//! Immutable instrument metadata and the catalogue that keys it by symbol.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::price::Price;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub tick_size: Decimal,
    pub tick_precision: u32,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, tick_size: Decimal, tick_precision: u32) -> Self {
        Instrument {
            symbol: symbol.into(),
            tick_size,
            tick_precision,
        }
    }

    pub fn quantize(&self, value: Decimal) -> Price {
        Price::quantize(value, self.tick_precision)
    }
}

/// Built once at construction time and handed to the simulator as a read-only table, replacing
/// the global-mutable lookup of the original design.
#[derive(Debug, Clone, Default)]
pub struct InstrumentCatalogue {
    instruments: HashMap<String, Instrument>,
}

impl InstrumentCatalogue {
    pub fn new(instruments: Vec<Instrument>) -> Result<Self, SimError> {
        let mut map = HashMap::with_capacity(instruments.len());
        for instrument in instruments {
            if map.insert(instrument.symbol.clone(), instrument).is_some() {
                return Err(SimError::InvalidConfig(
                    "duplicate instrument symbol in catalogue".to_string(),
                ));
            }
        }
        Ok(InstrumentCatalogue { instruments: map })
    }

    pub fn get(&self, symbol: &str) -> Result<&Instrument, SimError> {
        self.instruments
            .get(symbol)
            .ok_or_else(|| SimError::UnknownSymbol(symbol.to_string()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_duplicate_symbols() {
        let instruments = vec![
            Instrument::new("EURUSD", dec!(0.0001), 4),
            Instrument::new("EURUSD", dec!(0.0001), 4),
        ];
        assert!(InstrumentCatalogue::new(instruments).is_err());
    }

    #[test]
    fn looks_up_by_symbol() {
        let catalogue =
            InstrumentCatalogue::new(vec![Instrument::new("EURUSD", dec!(0.0001), 4)]).unwrap();
        assert!(catalogue.get("EURUSD").is_ok());
        assert!(catalogue.get("GBPUSD").is_err());
    }
}
