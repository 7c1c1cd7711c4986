//! Simulator configuration and its validation pass, mirroring `config/mod.rs::Config::validate()`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::instrument::Instrument;
use crate::price::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub instruments: Vec<Instrument>,
    pub starting_capital: Decimal,
    pub slippage_ticks: u32,
    pub account_number: String,
    pub currency: String,
    pub log_level: String,
    pub json_logs: bool,
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.starting_capital <= Decimal::ZERO {
            return Err(SimError::InvalidConfig(
                "starting_capital must be positive".to_string(),
            ));
        }
        if self.instruments.is_empty() {
            return Err(SimError::InvalidConfig(
                "at least one instrument is required".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for instrument in &self.instruments {
            if !seen.insert(instrument.symbol.as_str()) {
                return Err(SimError::InvalidConfig(format!(
                    "duplicate instrument symbol: {}",
                    instrument.symbol
                )));
            }
            if instrument.tick_size <= Decimal::ZERO {
                return Err(SimError::InvalidConfig(format!(
                    "instrument {} must have a positive tick_size",
                    instrument.symbol
                )));
            }
        }
        const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(SimError::InvalidConfig(format!(
                "invalid log_level: {}",
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn starting_capital_money(&self) -> Money {
        Money::new(self.starting_capital)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_config() -> SimulatorConfig {
        SimulatorConfig {
            instruments: vec![Instrument::new("EURUSD", dec!(0.0001), 4)],
            starting_capital: dec!(1000000),
            slippage_ticks: 1,
            account_number: "000001".to_string(),
            currency: "USD".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_capital() {
        let mut config = valid_config();
        config.starting_capital = dec!(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_instruments() {
        let mut config = valid_config();
        config.instruments.push(Instrument::new("EURUSD", dec!(0.0001), 4));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_invalid_log_level() {
        let mut config = valid_config();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}
