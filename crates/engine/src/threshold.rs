//! Alert decision rule.

use cryptoshark_core::Thresholds;

/// Percent change from the last observed price.
///
/// Absent on first observation and when the previous price is zero or the
/// result is not finite.
pub fn percent_change(price: f64, last_price: Option<f64>) -> Option<f64> {
    let last = last_price?;
    if last == 0.0 {
        return None;
    }
    let pct = (price - last) / last * 100.0;
    pct.is_finite().then_some(pct)
}

/// An alert needs both a material price move and a negative mood.
pub fn should_alert(pct_change: Option<f64>, pct_negative: f64, thresholds: &Thresholds) -> bool {
    match pct_change {
        Some(pct) => pct.abs() >= thresholds.pct && pct_negative >= thresholds.sentiment,
        None => false,
    }
}
