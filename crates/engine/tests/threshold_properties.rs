//! Property tests for the alert decision rule.

use cryptoshark_core::Thresholds;
use cryptoshark_engine::{percent_change, should_alert};
use proptest::prelude::*;

fn arb_pct() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-50.0..50.0_f64),
        (-10.0..10.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
    ]
}

fn arb_ratio() -> impl Strategy<Value = f64> {
    prop_oneof![
        (0.0..=1.0_f64),
        (0u32..=10).prop_map(|n| f64::from(n) / 10.0),
    ]
}

fn arb_price() -> impl Strategy<Value = f64> {
    (0.01..100_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

proptest! {
    /// The decision is exactly the conjunction of the three conditions.
    #[test]
    fn alert_iff_move_and_mood(
        pct in proptest::option::of(arb_pct()),
        negative in arb_ratio(),
        th_pct in (0.0..20.0_f64),
        th_sentiment in arb_ratio(),
    ) {
        let thresholds = Thresholds::new(th_pct, th_sentiment);
        let expected = match pct {
            Some(p) => p.abs() >= th_pct && negative >= th_sentiment,
            None => false,
        };
        prop_assert_eq!(should_alert(pct, negative, &thresholds), expected);
    }

    /// Values sitting exactly on both thresholds alert.
    #[test]
    fn equal_to_thresholds_alerts(
        th_pct in (0.0..20.0_f64),
        th_sentiment in arb_ratio(),
        down in any::<bool>()
    ) {
        let pct = if down { -th_pct } else { th_pct };
        let thresholds = Thresholds::new(th_pct, th_sentiment);
        prop_assert!(should_alert(Some(pct), th_sentiment, &thresholds));
    }

    /// A first observation never alerts, whatever the sentiment.
    #[test]
    fn first_observation_never_alerts(price in arb_price(), negative in arb_ratio()) {
        let pct = percent_change(price, None);
        prop_assert!(pct.is_none());
        prop_assert!(!should_alert(pct, negative, &Thresholds::new(0.0, 0.0)));
    }

    /// Percent change has the sign of the price move.
    #[test]
    fn change_sign_follows_price(price in arb_price(), last in arb_price()) {
        let pct = percent_change(price, Some(last)).unwrap();
        prop_assert_eq!(pct > 0.0, price > last);
        prop_assert_eq!(pct < 0.0, price < last);
    }
}
