//! Immutable, timestamped event records — the only legitimate means of mutating Order, Position,
//! and Account state. Field shape grounded on `execution/types.rs::Fill`'s timestamped payload
//! convention; the kind taxonomy is this crate's own (see the external interfaces table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::order::{Order, OrderId, Side};
use crate::price::{Price, Quantity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderSubmitted {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
    },
    OrderAccepted {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
    },
    OrderRejected {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
        reason: String,
    },
    OrderWorking {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
        broker_id: String,
        label: Option<String>,
        side: Side,
        order_type: crate::order::OrderType,
        quantity: Quantity,
        price: Option<Price>,
        time_in_force: crate::order::TimeInForce,
        expire_time: Option<DateTime<Utc>>,
    },
    OrderModified {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
        broker_id: String,
        new_price: Price,
    },
    OrderCancelled {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
    },
    OrderCancelReject {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
        reason_code: String,
        reason_text: String,
    },
    OrderExpired {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
    },
    OrderFilled {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        symbol: String,
        order_id: OrderId,
        execution_id: String,
        execution_ticket: String,
        side: Side,
        quantity: Quantity,
        fill_price: Price,
    },
    AccountEvent {
        event_id: String,
        event_timestamp: DateTime<Utc>,
        account_id: String,
        broker: String,
        account_number: String,
        currency: String,
        cash_balance: rust_decimal::Decimal,
        cash_start_day: rust_decimal::Decimal,
        cash_activity_day: rust_decimal::Decimal,
        margin_used_liquidation: rust_decimal::Decimal,
        margin_used_maintenance: rust_decimal::Decimal,
        margin_ratio: rust_decimal::Decimal,
        margin_call_status: String,
    },
}

impl Event {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::OrderSubmitted { .. } => "OrderSubmitted",
            Event::OrderAccepted { .. } => "OrderAccepted",
            Event::OrderRejected { .. } => "OrderRejected",
            Event::OrderWorking { .. } => "OrderWorking",
            Event::OrderModified { .. } => "OrderModified",
            Event::OrderCancelled { .. } => "OrderCancelled",
            Event::OrderCancelReject { .. } => "OrderCancelReject",
            Event::OrderExpired { .. } => "OrderExpired",
            Event::OrderFilled { .. } => "OrderFilled",
            Event::AccountEvent { .. } => "AccountEvent",
        }
    }

    pub fn order_submitted(order: &Order, now: DateTime<Utc>) -> Self {
        Event::OrderSubmitted {
            event_id: format!("ES{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
        }
    }

    pub fn order_accepted(order: &Order, now: DateTime<Utc>) -> Self {
        Event::OrderAccepted {
            event_id: format!("EA{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
        }
    }

    pub fn order_rejected(order: &Order, reason: impl Into<String>, now: DateTime<Utc>) -> Self {
        Event::OrderRejected {
            event_id: format!("ER{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
            reason: reason.into(),
        }
    }

    pub fn order_working(order: &Order, now: DateTime<Utc>) -> Self {
        Event::OrderWorking {
            event_id: format!("EW{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
            broker_id: format!("B{}", order.id),
            label: order.label.clone(),
            side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            price: order.price,
            time_in_force: order.time_in_force,
            expire_time: order.expire_time,
        }
    }

    pub fn order_modified(order: &Order, new_price: Price, now: DateTime<Utc>) -> Self {
        Event::OrderModified {
            event_id: format!("EM{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
            broker_id: order.broker_id.clone().unwrap_or_else(|| format!("B{}", order.id)),
            new_price,
        }
    }

    pub fn order_cancelled(order: &Order, now: DateTime<Utc>) -> Self {
        Event::OrderCancelled {
            event_id: format!("EC{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
        }
    }

    pub fn order_cancel_reject(order: &Order, reason_text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Event::OrderCancelReject {
            event_id: format!("ECR{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
            reason_code: "INVALID PRICE".to_string(),
            reason_text: reason_text.into(),
        }
    }

    pub fn order_expired(order: &Order, now: DateTime<Utc>) -> Self {
        Event::OrderExpired {
            event_id: format!("EX{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
        }
    }

    pub fn order_filled(order: &Order, fill_price: Price, now: DateTime<Utc>) -> Self {
        Event::OrderFilled {
            event_id: format!("EF{}", order.id),
            event_timestamp: now,
            symbol: order.symbol.clone(),
            order_id: order.id.clone(),
            execution_id: format!("E{}", order.id),
            execution_ticket: format!("ET{}", order.id),
            side: order.side,
            quantity: order.quantity,
            fill_price,
        }
    }

    pub fn account_snapshot(account: &Account, event_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Event::AccountEvent {
            event_id: event_id.into(),
            event_timestamp: now,
            account_id: account.id.clone(),
            broker: account.broker.clone(),
            account_number: account.account_number.clone(),
            currency: account.currency.clone(),
            cash_balance: account.cash_balance.raw(),
            cash_start_day: account.cash_start_day.raw(),
            cash_activity_day: account.cash_activity_day.raw(),
            margin_used_liquidation: account.margin_used_liquidation,
            margin_used_maintenance: account.margin_used_maintenance,
            margin_ratio: account.margin_ratio,
            margin_call_status: account.margin_call_status.clone(),
        }
    }
}
