use autotrader::gateway::{
    ExecutionGateway, GatewayEvent, MarketEventHandler, OutboundRequest, PaperGateway,
};
use autotrader::math::WindowedStats;
use autotrader::orders::{OrderId, SlotSide, SlotState};
use autotrader::strategy::{AutoTrader, SpreadSignalEngine, TraderConfig};
use autotrader::types::{BookUpdate, Instrument, Lifespan, Price, Side, Volume};
use mockall::mock;
use mockall::predicate::*;

// --- Mocks ---

mock! {
    pub Gateway {}

    impl ExecutionGateway for Gateway {
        fn insert_order(
            &mut self,
            id: OrderId,
            side: Side,
            price: Price,
            volume: Volume,
            lifespan: Lifespan,
        );
        fn cancel_order(&mut self, id: OrderId);
        fn send_hedge_order(&mut self, id: OrderId, side: Side, price: Price, volume: Volume);
    }
}

/// Window with mean 100 and sample standard deviation 20.
fn seeded_engine() -> SpreadSignalEngine {
    let mut stats = WindowedStats::new(100);
    for spread in [80.0, 100.0, 120.0] {
        stats.push(spread);
    }
    SpreadSignalEngine::with_stats(stats)
}

/// Full window alternating 80/120, so a handful of new spreads barely move it.
fn deep_engine() -> SpreadSignalEngine {
    let mut stats = WindowedStats::new(100);
    for i in 0..100 {
        stats.push(if i % 2 == 0 { 80.0 } else { 120.0 });
    }
    SpreadSignalEngine::with_stats(stats)
}

fn book(instrument: Instrument, seq: u64, bid: Price, ask: Price) -> BookUpdate {
    BookUpdate::top_of_book(instrument, seq, bid, ask)
}

// --- Entry: a wide spread places a BUY one tick above the index bid ---

#[test]
fn test_signal_above_threshold_places_bid() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_insert_order()
        .with(
            eq(OrderId::new(1)),
            eq(Side::Buy),
            eq(9_900),
            eq(10),
            eq(Lifespan::GoodForDay),
        )
        .times(1)
        .return_const(());
    gateway.expect_cancel_order().never();
    gateway.expect_send_hedge_order().never();

    let mut trader =
        AutoTrader::with_signal_engine(TraderConfig::default(), gateway, seeded_engine());

    trader.on_order_book(&book(Instrument::Future, 1, 10_000, 10_100));
    trader.on_order_book(&book(Instrument::Index, 1, 9_800, 9_900));

    let signal = trader.last_signal().unwrap();
    assert_eq!(signal.spread, Some(200));
    assert_eq!(signal.value, 5.0);
    assert!(matches!(
        trader.slot(SlotSide::Bid),
        SlotState::Pending(order) if order.id == OrderId::new(1) && order.price == 9_900
    ));
}

// --- Fills: a bid fill is hedged with a SELL at the minimum bid ---

#[test]
fn test_bid_fill_hedges_with_sell_at_min_bid() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_insert_order()
        .withf(|_, side, price, volume, lifespan| {
            *side == Side::Buy && *price == 9_900 && *volume == 10 && *lifespan == Lifespan::GoodForDay
        })
        .times(5)
        .return_const(());
    gateway
        .expect_send_hedge_order()
        .with(eq(OrderId::new(6)), eq(Side::Sell), eq(100), eq(10))
        .times(1)
        .return_const(());
    gateway.expect_cancel_order().never();

    let mut trader =
        AutoTrader::with_signal_engine(TraderConfig::default(), gateway, deep_engine());
    trader.on_quote_update(Instrument::Future, 10_100, 10_000);

    // Orders 1..=4 are rejected, leaving order 5 resting on the bid
    for id in 1..=4 {
        trader.on_quote_update(Instrument::Index, 9_900, 9_800);
        trader.on_error(OrderId::new(id), "rejected");
        assert!(trader.slot(SlotSide::Bid).is_empty());
    }
    trader.on_quote_update(Instrument::Index, 9_900, 9_800);
    assert_eq!(
        trader.slot(SlotSide::Bid).order().map(|o| o.id),
        Some(OrderId::new(5))
    );

    trader.on_order_filled(OrderId::new(5), 9_900, 10);
    assert_eq!(trader.position(), 10);
}

// --- Repricing: touch moves away, cancel is confirmed by a zero-remaining status ---

#[test]
fn test_touch_move_cancels_then_status_clears_slot() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_insert_order()
        .with(
            eq(OrderId::new(1)),
            eq(Side::Sell),
            eq(9_950),
            eq(10),
            eq(Lifespan::GoodForDay),
        )
        .times(1)
        .return_const(());
    gateway
        .expect_cancel_order()
        .with(eq(OrderId::new(1)))
        .times(1)
        .return_const(());
    gateway.expect_send_hedge_order().never();

    let mut trader =
        AutoTrader::with_signal_engine(TraderConfig::default(), gateway, seeded_engine());

    trader.on_quote_update(Instrument::Future, 9_900, 9_800);
    trader.on_quote_update(Instrument::Index, 10_050, 9_950);
    assert_eq!(
        trader.slot(SlotSide::Ask).order().map(|o| o.price),
        Some(9_950)
    );

    trader.on_quote_update(Instrument::Index, 9_800, 9_700);
    assert!(trader.slot(SlotSide::Ask).is_cancel_pending());

    trader.on_order_status(OrderId::new(1), 0, 0, 0);
    assert!(trader.slot(SlotSide::Ask).is_empty());
    assert!(trader.orders().active().is_empty());
}

#[test]
fn test_cancel_pending_is_not_cancelled_twice() {
    let mut trader =
        AutoTrader::with_signal_engine(TraderConfig::default(), PaperGateway::new(), seeded_engine());

    trader.on_quote_update(Instrument::Future, 9_900, 9_800);
    trader.on_quote_update(Instrument::Index, 10_050, 9_950);
    trader.on_quote_update(Instrument::Index, 9_800, 9_700);
    // Index moves again while the cancel is in flight
    trader.on_quote_update(Instrument::Index, 9_700, 9_600);

    assert_eq!(trader.gateway().cancels().count(), 1);
    assert!(trader.slot(SlotSide::Ask).is_cancel_pending());
}

#[test]
fn test_fill_during_cancel_is_still_hedged() {
    let mut trader =
        AutoTrader::with_signal_engine(TraderConfig::default(), PaperGateway::new(), seeded_engine());

    trader.on_quote_update(Instrument::Future, 9_900, 9_800);
    trader.on_quote_update(Instrument::Index, 10_050, 9_950);
    trader.on_quote_update(Instrument::Index, 9_800, 9_700);
    assert!(trader.slot(SlotSide::Ask).is_cancel_pending());
    trader.gateway_mut().take_requests();

    // The venue filled part of the order before the cancel reached it
    trader.on_order_filled(OrderId::new(1), 9_950, 3);
    assert_eq!(trader.position(), -3);
    assert_eq!(
        trader.gateway().requests(),
        &[OutboundRequest::Hedge {
            id: OrderId::new(2),
            side: Side::Buy,
            price: 2_147_483_600,
            volume: 3,
        }]
    );
    assert!(trader.slot(SlotSide::Ask).is_cancel_pending());

    trader.on_order_status(OrderId::new(1), 3, 0, 0);
    assert!(trader.slot(SlotSide::Ask).is_empty());
    assert!(trader.orders().active().is_empty());
}

// --- Degenerate window: a single observation yields no signal ---

#[test]
fn test_single_observation_window_never_enters() {
    let mut gateway = MockGateway::new();
    gateway.expect_insert_order().never();
    gateway.expect_cancel_order().never();
    gateway.expect_send_hedge_order().never();

    let mut trader = AutoTrader::new(TraderConfig::default(), gateway);
    trader.on_quote_update(Instrument::Future, 10_100, 10_000);
    let first = trader.on_quote_update(Instrument::Index, 9_900, 9_800);
    let second = trader.on_quote_update(Instrument::Index, 9_500, 9_400);

    assert_eq!(first.value, 0.0);
    assert_eq!(second.value, 0.0);
    assert_eq!(trader.signal_engine().stats().len(), 2);
}

// --- Event stream through GatewayEvent dispatch ---

#[test]
fn test_event_stream_round_trip_through_paper_gateway() {
    let mut trader =
        AutoTrader::with_signal_engine(TraderConfig::default(), PaperGateway::new(), seeded_engine());

    let events = vec![
        GatewayEvent::OrderBook(book(Instrument::Future, 1, 10_000, 10_100)),
        GatewayEvent::OrderBook(book(Instrument::Index, 1, 9_800, 9_900)),
        GatewayEvent::OrderFilled {
            id: OrderId::new(1),
            price: 9_900,
            volume: 4,
        },
        GatewayEvent::HedgeFilled {
            id: OrderId::new(2),
            price: 9_850,
            volume: 4,
        },
        GatewayEvent::OrderStatus {
            id: OrderId::new(1),
            fill_volume: 4,
            remaining_volume: 6,
            fees: -2,
        },
        GatewayEvent::TradeTicks(book(Instrument::Future, 2, 10_000, 10_100)),
    ];
    for event in &events {
        event.dispatch(&mut trader);
    }

    let snapshot = trader.snapshot();
    assert_eq!(snapshot.position, 4);
    assert_eq!(snapshot.hedged_volume, 4);
    assert_eq!(snapshot.total_fees, -2);
    assert_eq!(snapshot.active_orders, 1);
    assert!(snapshot.bid_slot.is_pending());
    assert_eq!(trader.gateway().hedges().count(), 1);
}
