//! Per-asset check outcomes and cycle reports.

use crate::{display_label, AssetId};
use serde::{Deserialize, Serialize};

/// Format a ratio (0.0 - 1.0) as a whole percentage, e.g. `0.7` -> `"70%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Format a percent change with an explicit sign, e.g. `4.0` -> `"+4.00%"`.
pub fn format_signed_pct(pct: f64) -> String {
    format!("{:+.2}%", pct)
}

/// Result of checking a single asset in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub asset_id: AssetId,
    pub price: f64,
    /// Percent change since the previous cycle, absent on first observation.
    pub pct_change: Option<f64>,
    pub pct_positive: f64,
    pub pct_negative: f64,
    /// Number of texts attributed to this asset.
    pub message_count: usize,
    pub alert_fired: bool,
    /// Set when classification failed for this asset.
    pub sentiment_error: Option<String>,
    /// Set when the alert was warranted but could not be delivered.
    pub alert_error: Option<String>,
}

impl CheckOutcome {
    /// One-line human readable summary, e.g. `BITCOIN: $104.00 (+4.00%) | POS 30% | NEG 70%`.
    pub fn summary_line(&self) -> String {
        let mut line = format!("{}: ${:.2}", display_label(&self.asset_id), self.price);
        if let Some(pct) = self.pct_change {
            line.push_str(&format!(" ({})", format_signed_pct(pct)));
        }
        line.push_str(&format!(
            " | POS {} | NEG {}",
            format_ratio(self.pct_positive),
            format_ratio(self.pct_negative)
        ));
        line
    }

    /// Summary line followed by any status lines for this asset.
    pub fn lines(&self) -> Vec<String> {
        let label = display_label(&self.asset_id);
        let mut lines = vec![self.summary_line()];
        if let Some(ref e) = self.sentiment_error {
            lines.push(format!("[SENTIMENT UNAVAILABLE] {}: {}", label, e));
        }
        if self.alert_fired {
            lines.push(format!("[ALERT SENT] {}", label));
        }
        if let Some(ref e) = self.alert_error {
            lines.push(format!("[ALERT FAILED] {}: {}", label, e));
        }
        lines
    }
}

/// Result of one check cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CycleReport {
    /// Every tracked asset was evaluated, in config order.
    Completed { outcomes: Vec<CheckOutcome> },
    /// The cycle stopped before evaluating any asset.
    Aborted { reason: String },
}

impl CycleReport {
    pub fn aborted(reason: impl Into<String>) -> Self {
        CycleReport::Aborted {
            reason: reason.into(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, CycleReport::Aborted { .. })
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        match self {
            CycleReport::Completed { outcomes } => outcomes,
            CycleReport::Aborted { .. } => &[],
        }
    }

    /// Number of alerts delivered in this cycle.
    pub fn alerts_sent(&self) -> usize {
        self.outcomes().iter().filter(|o| o.alert_fired).count()
    }

    /// Human readable lines: one summary per asset plus status lines,
    /// or the single abort reason.
    pub fn summary_lines(&self) -> Vec<String> {
        match self {
            CycleReport::Completed { outcomes } => {
                outcomes.iter().flat_map(CheckOutcome::lines).collect()
            }
            CycleReport::Aborted { reason } => vec![reason.clone()],
        }
    }
}
