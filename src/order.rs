//! Order entity: an explicit runtime state machine driven only by applied [`crate::event::Event`]s.
//!
//! This replaces the teacher's compile-time typestate pattern (`core/order_fsm.rs`) with a
//! runtime enum-state machine, per the redesign note that favours explicit `apply(event)`
//! transitions over dynamic attribute mutation. Field and lifecycle shape is grounded on
//! `execution/types.rs::Order`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::event::Event;
use crate::price::{Price, Quantity};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
    StopLimit,
    MarketIfTouched,
}

impl OrderType {
    pub fn requires_price(self) -> bool {
        !matches!(self, OrderType::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopMarket => "STOP_MARKET",
            OrderType::StopLimit => "STOP_LIMIT",
            OrderType::MarketIfTouched => "MIT",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    Day,
    GoodTillCancel,
    GoodTillDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderState {
    Initialised,
    Submitted,
    Accepted,
    Rejected,
    Working,
    Filled,
    Cancelled,
    Expired,
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub expire_time: Option<DateTime<Utc>>,
    pub label: Option<String>,
    pub strategy_id: String,
    pub state: OrderState,
    pub broker_id: Option<String>,
    pub filled_quantity: rust_decimal::Decimal,
    pub last_fill_price: Option<Price>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        price: Option<Price>,
        time_in_force: TimeInForce,
        expire_time: Option<DateTime<Utc>>,
        label: Option<String>,
        strategy_id: impl Into<String>,
    ) -> Result<Self, SimError> {
        if order_type.requires_price() && price.is_none() {
            return Err(SimError::MissingPrice);
        }
        if !order_type.requires_price() && price.is_some() {
            return Err(SimError::MarketOrderHasPrice);
        }
        Ok(Order {
            id,
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            price,
            time_in_force,
            expire_time,
            label,
            strategy_id: strategy_id.into(),
            state: OrderState::Initialised,
            broker_id: None,
            filled_quantity: rust_decimal::Decimal::ZERO,
            last_fill_price: None,
        })
    }

    pub fn is_working(&self) -> bool {
        self.state == OrderState::Working
    }

    pub fn is_complete(&self) -> bool {
        matches!(
            self.state,
            OrderState::Rejected | OrderState::Filled | OrderState::Cancelled | OrderState::Expired
        )
    }

    /// Validate and apply an event to this order's state machine. Events not addressed to this
    /// order, or illegal for the current state, fail with [`SimError::InvalidTransition`].
    pub fn apply(&mut self, event: &Event) -> Result<(), SimError> {
        let invalid = |state: OrderState, event: &Event| SimError::InvalidTransition {
            state: state.to_string(),
            event: event.kind_name().to_string(),
        };

        match event {
            Event::OrderSubmitted { order_id, .. } if *order_id == self.id => {
                if self.state != OrderState::Initialised {
                    return Err(invalid(self.state, event));
                }
                self.state = OrderState::Submitted;
            }
            Event::OrderAccepted { order_id, .. } if *order_id == self.id => {
                if self.state != OrderState::Submitted {
                    return Err(invalid(self.state, event));
                }
                self.state = OrderState::Accepted;
            }
            Event::OrderRejected { order_id, .. } if *order_id == self.id => {
                if self.state != OrderState::Accepted && self.state != OrderState::Submitted {
                    return Err(invalid(self.state, event));
                }
                self.state = OrderState::Rejected;
            }
            Event::OrderWorking {
                order_id,
                broker_id,
                ..
            } if *order_id == self.id => {
                if self.state != OrderState::Accepted {
                    return Err(invalid(self.state, event));
                }
                self.broker_id = Some(broker_id.clone());
                self.state = OrderState::Working;
            }
            Event::OrderModified {
                order_id, new_price, ..
            } if *order_id == self.id => {
                if self.state != OrderState::Working {
                    return Err(invalid(self.state, event));
                }
                self.price = Some(*new_price);
            }
            Event::OrderCancelled { order_id, .. } if *order_id == self.id => {
                if self.state != OrderState::Working {
                    return Err(invalid(self.state, event));
                }
                self.state = OrderState::Cancelled;
            }
            Event::OrderExpired { order_id, .. } if *order_id == self.id => {
                if self.state != OrderState::Working {
                    return Err(invalid(self.state, event));
                }
                self.state = OrderState::Expired;
            }
            Event::OrderFilled {
                order_id,
                quantity,
                fill_price,
                ..
            } if *order_id == self.id => {
                if self.state != OrderState::Working && self.state != OrderState::Accepted {
                    return Err(invalid(self.state, event));
                }
                self.filled_quantity += quantity.raw();
                self.last_fill_price = Some(*fill_price);
                self.state = OrderState::Filled;
            }
            _ => return Err(invalid(self.state, event)),
        }
        Ok(())
    }
}
