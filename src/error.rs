//! Error taxonomy for the execution simulator.
//!
//! Two disjoint classes are carried by [`SimError`]: precondition violations (caller misuse,
//! always `Err`, never surfaced as a simulated event) and fatal internal invariants (the run
//! cannot continue meaningfully). Domain rejections are never represented here: a rejected order
//! is an ordinary `Ok` return that additionally pushes an `OrderRejected` / `OrderCancelReject`
//! event to the sink.

use thiserror::Error;

use crate::order::OrderId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("order {0} is already working")]
    OrderAlreadyWorking(OrderId),

    #[error("order {0} is not in the working set")]
    OrderNotWorking(OrderId),

    #[error("unknown instrument symbol: {0}")]
    UnknownSymbol(String),

    #[error("bar cursor for {symbol} has no bar at iteration {iteration}")]
    BarIndexOutOfRange { symbol: String, iteration: usize },

    #[error("market orders must not carry a price")]
    MarketOrderHasPrice,

    #[error("non-market orders require a price")]
    MissingPrice,

    #[error("quantity must be strictly positive, got {0}")]
    NonPositiveQuantity(rust_decimal::Decimal),

    #[error("invalid state transition: {event} is not legal while order is {state}")]
    InvalidTransition { state: String, event: String },

    #[error("invalid simulator configuration: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;
