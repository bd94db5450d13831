//! Property tests for pipeline invariants.
//!
//! 1. Composite scores stay in [0, 1] for any bar history, empty included
//! 2. Grades never get worse as composite or breadth improves
//! 3. Position multipliers stay in [0, 3] and are 0 exactly for REJECT
//! 4. Evaluating the same inputs twice gives the same decision
//! 5. Percent levels land on the expected side of price

mod common;

use chrono::Duration;
use proptest::prelude::*;

use signal_gate::convert_tp_sl;
use signal_gate::core::sizing::position_multiplier;
use signal_gate::models::{
    AccountSnapshot, Candle, CandleSeries, Direction, Grade, IndicatorVote, Signal, TpSlUnit,
};
use signal_gate::quality::grade::classify;
use signal_gate::SignalPipeline;

use common::{snapshot_at_hour, test_config};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Random walk of `len` bars with positive prices.
fn arb_bars() -> impl Strategy<Value = CandleSeries> {
    (
        500.0..2000.0_f64,
        prop::collection::vec((-5.0..5.0_f64, 0.0..4.0_f64, 0.0..4.0_f64, 0.0..500.0_f64), 0..60),
    )
        .prop_map(|(start, steps)| {
            let base = chrono::DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc);
            let mut price = start;
            let candles = steps
                .into_iter()
                .enumerate()
                .map(|(i, (step, up, down, volume))| {
                    let open = price;
                    let close = (price + step).max(1.0);
                    price = close;
                    Candle {
                        timestamp: base + Duration::minutes(i as i64),
                        open,
                        high: open.max(close) + up,
                        low: (open.min(close) - down).max(0.5),
                        close,
                        volume,
                    }
                })
                .collect();
            CandleSeries::new(candles)
        })
}

fn arb_grade() -> impl Strategy<Value = Grade> {
    (0usize..Grade::ALL.len()).prop_map(|i| Grade::ALL[i])
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Buy), Just(Direction::Sell)]
}

fn arb_vote() -> impl Strategy<Value = Option<IndicatorVote>> {
    prop_oneof![
        Just(None),
        Just(Some(IndicatorVote::Buy)),
        Just(Some(IndicatorVote::Sell)),
        Just(Some(IndicatorVote::Neutral)),
    ]
}

fn arb_symbol() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("EURUSD"),
        Just("GBPUSD"),
        Just("USDJPY"),
        Just("XAUUSD"),
        Just("BTCUSD"),
        Just("AUDCAD"),
    ]
}

// ── 1 + 4. Pipeline ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decisions_stay_in_range_and_repeat(
        bars in arb_bars(),
        symbol in arb_symbol(),
        direction in arb_direction(),
        confidence in -0.5..1.5_f64,
        hour in 0u32..24,
        spread in prop::option::of(0.0..20.0_f64),
        votes in prop::collection::vec(arb_vote(), 5),
    ) {
        let pipeline = SignalPipeline::new(test_config());
        let mut snap = snapshot_at_hour(symbol, bars, hour);
        snap.spread = spread;
        snap.indicators.ema = votes[0];
        snap.indicators.rsi = votes[1];
        snap.indicators.macd = votes[2];
        snap.indicators.bollinger = votes[3];
        snap.indicators.stochastic = votes[4];
        let signal = Signal::new(symbol, direction, confidence)
            .with_take_profit("2", TpSlUnit::Percent)
            .with_stop_loss("1", TpSlUnit::Percent);
        let account = AccountSnapshot::new(10_000.0, 10_000.0);

        let a = pipeline.evaluate(&signal, &snap, &account);
        prop_assert!((0.0..=1.0).contains(&a.composite_score));
        prop_assert!((0.0..=1.0).contains(&a.adjusted_confidence));
        prop_assert!((0.0..=1.0).contains(&a.final_threshold));
        prop_assert!(a.component_scores.values().all(|v| (0.0..=1.0).contains(v)));
        prop_assert_eq!(a.position_multiplier == 0.0, a.grade == Grade::Reject);
        prop_assert!(!(a.should_trade && a.grade == Grade::Reject));

        let b = pipeline.evaluate(&signal, &snap, &account);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(pipeline.get_statistics().total, 2);
    }
}

// ── 2. Grade monotonicity ────────────────────────────────────────────

proptest! {
    #[test]
    fn grade_monotone_in_composite(a in 0.0..1.0_f64, b in 0.0..1.0_f64, ratio in 0.0..1.0_f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo, ratio) <= classify(hi, ratio));
    }

    #[test]
    fn grade_monotone_in_breadth(composite in 0.0..1.0_f64, a in 0.0..1.0_f64, b in 0.0..1.0_f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(composite, lo) <= classify(composite, hi));
    }
}

// ── 3. Position multiplier ───────────────────────────────────────────

proptest! {
    #[test]
    fn multiplier_bounded_and_zero_only_for_reject(
        grade in arb_grade(),
        composite in -1.0..2.0_f64,
        session in 0.01..5.0_f64,
    ) {
        let m = position_multiplier(grade, composite, session);
        prop_assert!((0.0..=3.0).contains(&m));
        prop_assert_eq!(m == 0.0, grade == Grade::Reject);
    }
}

// ── 5. Percent conversion ────────────────────────────────────────────

proptest! {
    #[test]
    fn percent_levels_fall_on_the_right_side(
        price in 0.5..2.0_f64,
        pct in 0.1..10.0_f64,
        direction in arb_direction(),
    ) {
        let tp = convert_tp_sl(&format!("{}", pct), "percent", "EURUSD", direction, price, 0.01);
        let sl = convert_tp_sl(&format!("-{}", pct), "percent", "EURUSD", direction, price, 0.01);
        let offset = price * pct / 100.0;

        prop_assert!((tp - (price + direction.sign() * offset)).abs() <= 1e-5);
        prop_assert!((sl - (price - direction.sign() * offset)).abs() <= 1e-5);
        match direction {
            Direction::Buy => prop_assert!(sl < price && price < tp),
            Direction::Sell => prop_assert!(tp < price && price < sl),
        }
    }

    #[test]
    fn unknown_symbols_use_default_profile(symbol in "[Q-W]{6}") {
        let cfg = test_config();
        prop_assert_eq!(cfg.profile_for(&symbol), &cfg.default_profile);
    }
}
