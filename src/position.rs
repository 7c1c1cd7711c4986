//! Position entity: net exposure accumulated per symbol by a sequence of fills.
//!
//! Field shape grounded on `risk/types.rs::Position` (plain `Decimal` fields, `avg_entry_price`,
//! `is_flat`/`is_long`/`is_short`) in preference to the atomic `core/types.rs::Position`, since
//! this simulator is single-threaded and needs no atomics. Mutation is event-sourced: the only
//! entry point is [`Position::apply`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::event::Event;
use crate::order::Side;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub realized_pnl: Decimal,
    pub trade_count: u64,
    pub is_exited: bool,
}

impl Position {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Position {
            id: id.into(),
            symbol: symbol.into(),
            quantity: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            trade_count: 0,
            is_exited: false,
        }
    }

    pub fn avg_entry_price(&self) -> Option<Decimal> {
        if self.quantity != Decimal::ZERO {
            Some(self.cost_basis / self.quantity)
        } else {
            None
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == Decimal::ZERO
    }

    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    pub fn is_short(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    /// Apply a fill event, updating signed net quantity and the cost basis. When a fill crosses
    /// through zero (a sign flip), the crossed quantity realises against the prior average entry
    /// price and the residual opens a fresh average entry price at the fill price.
    pub fn apply(&mut self, event: &Event) -> Result<(), SimError> {
        let (fill_qty, fill_price, side) = match event {
            Event::OrderFilled {
                quantity,
                fill_price,
                side,
                ..
            } => (quantity.raw(), fill_price.raw(), *side),
            other => {
                return Err(SimError::InvalidTransition {
                    state: "position".to_string(),
                    event: other.kind_name().to_string(),
                })
            }
        };

        let signed_qty = match side {
            Side::Buy => fill_qty,
            Side::Sell => -fill_qty,
        };

        let prior_qty = self.quantity;
        let same_direction = prior_qty == Decimal::ZERO
            || (prior_qty > Decimal::ZERO && signed_qty > Decimal::ZERO)
            || (prior_qty < Decimal::ZERO && signed_qty < Decimal::ZERO);

        if same_direction {
            self.cost_basis += signed_qty * fill_price;
            self.quantity += signed_qty;
        } else {
            let closing_qty = signed_qty.abs().min(prior_qty.abs());
            let avg_entry = self.avg_entry_price().unwrap_or(fill_price);
            let realized = match side {
                Side::Sell => closing_qty * (fill_price - avg_entry),
                Side::Buy => closing_qty * (avg_entry - fill_price),
            };
            self.realized_pnl += realized;

            let remaining_close = prior_qty.abs() - closing_qty;
            if remaining_close == Decimal::ZERO {
                // fully closed, any leftover opens a fresh position in the new direction
                let leftover = signed_qty.abs() - closing_qty;
                self.quantity = if side == Side::Buy { leftover } else { -leftover };
                self.cost_basis = self.quantity * fill_price;
            } else {
                // partially closed, direction unchanged
                self.quantity = if prior_qty > Decimal::ZERO {
                    remaining_close
                } else {
                    -remaining_close
                };
                self.cost_basis = self.quantity * avg_entry;
            }
        }

        self.trade_count += 1;
        self.is_exited = self.quantity == Decimal::ZERO;
        Ok(())
    }
}
