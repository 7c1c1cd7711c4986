//! Test fixture builders, grounded on `testing/helpers.rs`'s builder-function convention.
//! Used both by in-module unit tests and by the scenario integration tests under `tests/`.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::bar::Bar;
use crate::instrument::Instrument;
use crate::order::{Order, OrderId, OrderType, Side, TimeInForce};
use crate::price::{Price, Quantity};

pub mod fixtures {
    use super::*;

    pub fn eurusd_instrument() -> Instrument {
        Instrument::new("EURUSD", Decimal::new(1, 4), 4)
    }

    pub fn price(value: &str) -> Price {
        Price::quantize(value.parse().unwrap(), 4)
    }

    pub fn bar(open: &str, high: &str, low: &str, close: &str) -> Bar {
        Bar::new(price(open), price(high), price(low), price(close))
    }

    pub fn minute_index(start: DateTime<Utc>, n: usize) -> Vec<DateTime<Utc>> {
        (0..n).map(|i| start + Duration::minutes(i as i64)).collect()
    }

    pub fn market_buy_order(id: &str, symbol: &str, qty: Decimal) -> Order {
        Order::new(
            OrderId::new(id),
            symbol,
            Side::Buy,
            OrderType::Market,
            Quantity::new(qty).unwrap(),
            None,
            TimeInForce::Day,
            None,
            None,
            "strat",
        )
        .unwrap()
    }

    pub fn market_sell_order(id: &str, symbol: &str, qty: Decimal) -> Order {
        Order::new(
            OrderId::new(id),
            symbol,
            Side::Sell,
            OrderType::Market,
            Quantity::new(qty).unwrap(),
            None,
            TimeInForce::Day,
            None,
            None,
            "strat",
        )
        .unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn priced_order(
        id: &str,
        symbol: &str,
        side: Side,
        order_type: OrderType,
        qty: Decimal,
        order_price: Price,
        expire_time: Option<DateTime<Utc>>,
    ) -> Order {
        Order::new(
            OrderId::new(id),
            symbol,
            side,
            order_type,
            Quantity::new(qty).unwrap(),
            Some(order_price),
            TimeInForce::Day,
            expire_time,
            None,
            "strat",
        )
        .unwrap()
    }
}
