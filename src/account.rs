//! Account ledger: a pure snapshot-overwriting structure. No independent math is performed here;
//! the simulator computes new values and applies them via [`Event::AccountEvent`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::event::Event;
use crate::price::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub broker: String,
    pub account_number: String,
    pub currency: String,
    pub cash_balance: Money,
    pub cash_start_day: Money,
    pub cash_activity_day: Money,
    pub margin_used_liquidation: Decimal,
    pub margin_used_maintenance: Decimal,
    pub margin_ratio: Decimal,
    pub margin_call_status: String,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        account_number: impl Into<String>,
        currency: impl Into<String>,
        starting_capital: Money,
    ) -> Self {
        Account {
            id: id.into(),
            broker: "SIMULATED".to_string(),
            account_number: account_number.into(),
            currency: currency.into(),
            cash_balance: starting_capital,
            cash_start_day: starting_capital,
            cash_activity_day: Money::zero(),
            margin_used_liquidation: Decimal::ZERO,
            margin_used_maintenance: Decimal::ZERO,
            margin_ratio: Decimal::ZERO,
            margin_call_status: "NONE".to_string(),
        }
    }

    pub fn apply(&mut self, event: &Event) -> Result<(), SimError> {
        match event {
            Event::AccountEvent {
                account_id,
                broker,
                account_number,
                currency,
                cash_balance,
                cash_start_day,
                cash_activity_day,
                margin_used_liquidation,
                margin_used_maintenance,
                margin_ratio,
                margin_call_status,
                ..
            } => {
                self.id = account_id.clone();
                self.broker = broker.clone();
                self.account_number = account_number.clone();
                self.currency = currency.clone();
                self.cash_balance = Money::new(*cash_balance);
                self.cash_start_day = Money::new(*cash_start_day);
                self.cash_activity_day = Money::new(*cash_activity_day);
                self.margin_used_liquidation = *margin_used_liquidation;
                self.margin_used_maintenance = *margin_used_maintenance;
                self.margin_ratio = *margin_ratio;
                self.margin_call_status = margin_call_status.clone();
                Ok(())
            }
            other => Err(SimError::InvalidTransition {
                state: "account".to_string(),
                event: other.kind_name().to_string(),
            }),
        }
    }
}
