//! The execution simulator (component C7): the core step-driven algorithm.
//!
//! Generalised from `execution/simulated.rs::SimulatedExecutor` (orders map, fill handling, the
//! surrounding `Executor` trait surface) away from "always fill instantly" toward the
//! admission-check / working-order-scan algorithm this specification requires. Public operation
//! names follow `execution/mod.rs::Executor` (`place_order` -> `submit_order`, `amend_order` ->
//! `modify_order`).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::account::Account;
use crate::bar::DatetimeIndex;
use crate::config::SimulatorConfig;
use crate::cursor::BarCursor;
use crate::error::{SimError, SimResult};
use crate::event::Event;
use crate::instrument::InstrumentCatalogue;
use crate::order::{Order, OrderId, OrderType, Side};
use crate::position::Position;
use crate::price::{Money, Price};
use crate::services::{Clock, EventSink, IdFactory, Logger};

pub struct ExecutionSimulator {
    catalogue: InstrumentCatalogue,
    bar_cursor: BarCursor,
    slippage_table: HashMap<String, Decimal>,
    orders: HashMap<OrderId, Order>,
    working_order_ids: Vec<OrderId>,
    open_positions: HashMap<String, Position>,
    completed_positions: HashMap<String, Position>,
    position_seq: HashMap<String, u64>,
    account: Account,
    day_number: Option<NaiveDate>,
    clock: Box<dyn Clock>,
    id_factory: Box<dyn IdFactory>,
    event_sink: Box<dyn EventSink>,
    logger: Box<dyn Logger>,
}

impl ExecutionSimulator {
    pub fn new(
        config: &SimulatorConfig,
        index: DatetimeIndex,
        bid_series: HashMap<String, crate::bar::BarSeries>,
        ask_series: HashMap<String, crate::bar::BarSeries>,
        clock: Box<dyn Clock>,
        id_factory: Box<dyn IdFactory>,
        event_sink: Box<dyn EventSink>,
        logger: Box<dyn Logger>,
    ) -> SimResult<Self> {
        config.validate()?;
        let catalogue = InstrumentCatalogue::new(config.instruments.clone())?;
        let slippage_table = config
            .instruments
            .iter()
            .map(|i| (i.symbol.clone(), i.tick_size * Decimal::from(config.slippage_ticks)))
            .collect();
        let account = Account::new(
            format!("ACC-{}", config.account_number),
            config.account_number.clone(),
            config.currency.clone(),
            config.starting_capital_money(),
        );
        let bar_cursor = BarCursor::new(index, bid_series, ask_series);

        Ok(ExecutionSimulator {
            catalogue,
            bar_cursor,
            slippage_table,
            orders: HashMap::new(),
            working_order_ids: Vec::new(),
            open_positions: HashMap::new(),
            completed_positions: HashMap::new(),
            position_seq: HashMap::new(),
            account,
            day_number: None,
            clock,
            id_factory,
            event_sink,
            logger,
        })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn open_positions(&self) -> &HashMap<String, Position> {
        &self.open_positions
    }

    pub fn completed_positions(&self) -> &HashMap<String, Position> {
        &self.completed_positions
    }

    pub fn next_id(&mut self) -> OrderId {
        OrderId::new(self.id_factory.generate())
    }

    pub fn connect(&mut self) {
        self.logger.info("connected to simulated venue");
    }

    pub fn disconnect(&mut self) {
        self.logger.info("disconnected from simulated venue");
    }

    pub fn set_initial_iteration(&mut self, to_time: DateTime<Utc>, step: chrono::Duration) -> SimResult<()> {
        let wall_clock = self.bar_cursor.set_initial_iteration(to_time, step)?;
        self.clock.set_time(wall_clock);
        Ok(())
    }

    fn emit(&mut self, event: Event) {
        self.logger.debug(&format!("emit {}", event.kind_name()));
        self.event_sink.on_event(event);
    }

    pub fn collateral_inquiry(&mut self) -> SimResult<()> {
        let now = self.clock.time_now();
        let event_id = format!("ACC{}", self.id_factory.generate());
        let event = Event::account_snapshot(&self.account, event_id, now);
        self.account.apply(&event)?;
        self.emit(event);
        Ok(())
    }

    fn slippage(&self, symbol: &str) -> SimResult<Decimal> {
        self.slippage_table
            .get(symbol)
            .copied()
            .ok_or_else(|| SimError::UnknownSymbol(symbol.to_string()))
    }

    fn admission_reject_reason(
        &self,
        side: Side,
        order_type: OrderType,
        price: Price,
        closing_bid: Price,
        closing_ask: Price,
    ) -> Option<String> {
        match (side, order_type) {
            (Side::Buy, OrderType::StopMarket | OrderType::StopLimit | OrderType::MarketIfTouched) => {
                (price.raw() < closing_ask.raw())
                    .then(|| format!("buy stop price {price} is below the ask {closing_ask}"))
            }
            (Side::Buy, OrderType::Limit) => {
                (price.raw() > closing_ask.raw())
                    .then(|| format!("buy limit price {price} is above the ask {closing_ask}"))
            }
            (Side::Sell, OrderType::StopMarket | OrderType::StopLimit | OrderType::MarketIfTouched) => {
                (price.raw() > closing_bid.raw())
                    .then(|| format!("sell stop price {price} is above the bid {closing_bid}"))
            }
            (Side::Sell, OrderType::Limit) => {
                (price.raw() < closing_bid.raw())
                    .then(|| format!("sell limit price {price} is below the bid {closing_bid}"))
            }
            (_, OrderType::Market) => None,
        }
    }

    pub fn submit_order(&mut self, mut order: Order) -> SimResult<OrderId> {
        if self.orders.contains_key(&order.id) {
            return Err(SimError::OrderAlreadyWorking(order.id));
        }
        let now = self.clock.time_now();
        let submitted = Event::order_submitted(&order, now);
        order.apply(&submitted)?;
        self.emit(submitted);
        let accepted = Event::order_accepted(&order, now);
        order.apply(&accepted)?;
        self.emit(accepted);

        let instrument = self.catalogue.get(&order.symbol)?;
        let tick_precision = instrument.tick_precision;
        let closing_bid = self.bar_cursor.closing_bid(&order.symbol)?;
        let closing_ask = self.bar_cursor.closing_ask(&order.symbol)?;
        let slip = self.slippage(&order.symbol)?;

        if order.order_type == OrderType::Market {
            let fill_price = match order.side {
                Side::Buy => closing_ask.shift(slip, tick_precision),
                Side::Sell => closing_bid.shift(-slip, tick_precision),
            };
            self.fill_order(&mut order, fill_price)?;
            let id = order.id.clone();
            self.orders.insert(id.clone(), order);
            return Ok(id);
        }

        let price = order.price.expect("non-market order carries a price");
        if let Some(reason) = self.admission_reject_reason(order.side, order.order_type, price, closing_bid, closing_ask) {
            let rejected = Event::order_rejected(&order, reason, now);
            order.apply(&rejected)?;
            self.emit(rejected);
        } else {
            let working = Event::order_working(&order, now);
            order.apply(&working)?;
            self.emit(working);
            self.working_order_ids.push(order.id.clone());
        }
        let id = order.id.clone();
        self.orders.insert(id.clone(), order);
        Ok(id)
    }

    pub fn cancel_order(&mut self, order_id: &OrderId) -> SimResult<()> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| SimError::OrderNotWorking(order_id.clone()))?;
        if !order.is_working() {
            return Err(SimError::OrderNotWorking(order_id.clone()));
        }
        let now = self.clock.time_now();
        let cancelled = Event::order_cancelled(order, now);
        order.apply(&cancelled)?;
        self.emit(cancelled);
        self.working_order_ids.retain(|id| id != order_id);
        Ok(())
    }

    /// Validates `order.price` (the order's current resting price), not the proposed `new_price`
    /// — this mirrors the source behaviour literally rather than the presumably-intended check.
    pub fn modify_order(&mut self, order_id: &OrderId, new_price: Price) -> SimResult<()> {
        let order = self
            .orders
            .get(order_id)
            .ok_or_else(|| SimError::OrderNotWorking(order_id.clone()))?;
        if !order.is_working() {
            return Err(SimError::OrderNotWorking(order_id.clone()));
        }
        let symbol = order.symbol.clone();
        let side = order.side;
        let order_type = order.order_type;
        let current_price = order.price.expect("working order carries a price");

        let closing_bid = self.bar_cursor.closing_bid(&symbol)?;
        let closing_ask = self.bar_cursor.closing_ask(&symbol)?;
        let now = self.clock.time_now();

        let reject_reason = self.admission_reject_reason(side, order_type, current_price, closing_bid, closing_ask);
        let order = self.orders.get_mut(order_id).unwrap();
        if let Some(reason) = reject_reason {
            let cancel_reject = Event::order_cancel_reject(order, reason, now);
            order.apply(&cancel_reject)?;
            self.emit(cancel_reject);
        } else {
            let event = Event::order_modified(order, new_price, now);
            order.apply(&event)?;
            self.emit(event);
        }
        Ok(())
    }

    /// Emits `OrderFilled` then two `AccountEvent` snapshots: one immediately (the pre-position
    /// hook) and one after the fill has been applied to the position, per the two-AccountEvent
    /// sequence of scenario 1.
    fn fill_order(&mut self, order: &mut Order, fill_price: Price) -> SimResult<()> {
        let now = self.clock.time_now();
        let event = Event::order_filled(order, fill_price, now);
        order.apply(&event)?;
        self.emit(event.clone());
        self.collateral_inquiry()?;
        self.apply_fill_to_position(&event)?;
        self.collateral_inquiry()?;
        Ok(())
    }

    fn apply_fill_to_position(&mut self, event: &Event) -> SimResult<()> {
        let symbol = match event {
            Event::OrderFilled { symbol, .. } => symbol.clone(),
            _ => unreachable!("apply_fill_to_position called with a non-fill event"),
        };
        if !self.open_positions.contains_key(&symbol) {
            let seq = self.position_seq.entry(symbol.clone()).or_insert(0);
            *seq += 1;
            self.open_positions
                .insert(symbol.clone(), Position::new(format!("{symbol}-{seq}"), symbol.clone()));
        }
        let position = self.open_positions.get_mut(&symbol).unwrap();
        position.apply(event)?;
        if position.is_exited {
            let position = self.open_positions.remove(&symbol).unwrap();
            self.completed_positions.insert(position.id.clone(), position);
        }
        Ok(())
    }

    fn check_fill(&self, symbol: &str, side: Side, order_type: OrderType, price: Price) -> SimResult<Option<Price>> {
        let instrument = self.catalogue.get(symbol)?;
        let slip = self.slippage(symbol)?;
        match side {
            Side::Buy => {
                let highest_ask = self.bar_cursor.highest_ask(symbol)?;
                let fills = match order_type {
                    OrderType::StopMarket | OrderType::StopLimit | OrderType::MarketIfTouched => {
                        highest_ask.raw() >= price.raw()
                    }
                    OrderType::Limit => highest_ask.raw() < price.raw(),
                    OrderType::Market => false,
                };
                Ok(fills.then(|| price.shift(slip, instrument.tick_precision)))
            }
            Side::Sell => {
                let lowest_bid = self.bar_cursor.lowest_bid(symbol)?;
                let fills = match order_type {
                    OrderType::StopMarket | OrderType::StopLimit | OrderType::MarketIfTouched => {
                        lowest_bid.raw() <= price.raw()
                    }
                    OrderType::Limit => lowest_bid.raw() > price.raw(),
                    OrderType::Market => false,
                };
                Ok(fills.then(|| price.shift(-slip, instrument.tick_precision)))
            }
        }
    }

    /// Advance one simulated timestamp: roll the daily cash anchor over on day change, then scan
    /// working orders for fills and expiries. Fills take precedence over expiry within the same
    /// iteration.
    pub fn iterate(&mut self, t: DateTime<Utc>) -> SimResult<()> {
        self.clock.set_time(t);
        let day = t.date_naive();
        if self.day_number != Some(day) {
            self.day_number = Some(day);
            self.account.cash_start_day = self.account.cash_balance;
            self.account.cash_activity_day = Money::zero();
            self.collateral_inquiry()?;
        }
        self.bar_cursor.advance_to(t);

        let snapshot = self.working_order_ids.clone();
        let mut still_working = Vec::with_capacity(snapshot.len());

        for order_id in snapshot {
            let Some(order) = self.orders.get(&order_id) else {
                continue;
            };
            if !order.is_working() {
                continue;
            }
            let symbol = order.symbol.clone();
            let side = order.side;
            let order_type = order.order_type;
            let price = order.price.expect("working order carries a price");
            let expire_time = order.expire_time;

            if let Some(fill_price) = self.check_fill(&symbol, side, order_type, price)? {
                let mut order = self.orders.remove(&order_id).unwrap();
                self.fill_order(&mut order, fill_price)?;
                self.orders.insert(order_id, order);
                continue;
            }

            if let Some(expire) = expire_time {
                if t >= expire {
                    let now = self.clock.time_now();
                    let order = self.orders.get_mut(&order_id).unwrap();
                    let expired = Event::order_expired(order, now);
                    order.apply(&expired)?;
                    self.emit(expired);
                    continue;
                }
            }
            still_working.push(order_id);
        }
        self.working_order_ids = still_working;
        Ok(())
    }
}
