//! Append-only history log, one line per asset per cycle.
//!
//! Line layout (fields separated by two spaces):
//!
//! ```text
//! 2024-05-01T12:30:00.000000Z  bitcoin  104.00  +4.00%  30%  70%  1
//! ```
//!
//! timestamp, asset id, price, signed percent change (0 when absent),
//! positive share, negative share, alert flag.

use crate::{StoreError, StoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use cryptoshark_core::{asset_id, format_ratio, format_signed_pct, AssetId, CheckOutcome};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const FIELD_SEPARATOR: &str = "  ";
const FIELD_COUNT: usize = 7;

/// One parsed or to-be-written log line.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub asset_id: AssetId,
    pub price: f64,
    /// Signed percent change, 0.0 when there was no previous price.
    pub pct_change: f64,
    pub pct_positive: f64,
    pub pct_negative: f64,
    pub alert_sent: bool,
}

impl AuditRecord {
    pub fn from_outcome(outcome: &CheckOutcome, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            asset_id: outcome.asset_id.clone(),
            price: outcome.price,
            pct_change: outcome.pct_change.unwrap_or(0.0),
            pct_positive: outcome.pct_positive,
            pct_negative: outcome.pct_negative,
            alert_sent: outcome.alert_fired,
        }
    }

    /// Render the line, without the trailing newline.
    pub fn to_line(&self) -> String {
        let fields = [
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.asset_id.to_string(),
            format!("{:.2}", self.price),
            format_signed_pct(self.pct_change),
            format_ratio(self.pct_positive),
            format_ratio(self.pct_negative),
            if self.alert_sent { "1" } else { "0" }.to_string(),
        ];
        fields.join(FIELD_SEPARATOR)
    }

    /// Parse a line written by `to_line`.
    pub fn parse(line: &str) -> StoreResult<Self> {
        let malformed = |why: &str| StoreError::MalformedAuditLine(format!("{}: {:?}", why, line));

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return Err(malformed("expected 7 fields"));
        }

        let timestamp = DateTime::parse_from_rfc3339(fields[0])
            .map_err(|_| malformed("bad timestamp"))?
            .with_timezone(&Utc);
        let price: f64 = fields[2].parse().map_err(|_| malformed("bad price"))?;
        let pct_change = parse_percent(fields[3]).ok_or_else(|| malformed("bad change"))?;
        let pct_positive = parse_percent(fields[4])
            .map(|p| p / 100.0)
            .ok_or_else(|| malformed("bad positive share"))?;
        let pct_negative = parse_percent(fields[5])
            .map(|p| p / 100.0)
            .ok_or_else(|| malformed("bad negative share"))?;
        let alert_sent = match fields[6] {
            "0" => false,
            "1" => true,
            _ => return Err(malformed("bad alert flag")),
        };

        Ok(Self {
            timestamp,
            asset_id: asset_id(fields[1]),
            price,
            pct_change,
            pct_positive,
            pct_negative,
            alert_sent,
        })
    }

    /// Label for the alert flag as shown by the log viewer.
    pub fn alert_label(&self) -> &'static str {
        if self.alert_sent {
            "Yes"
        } else {
            "No"
        }
    }
}

fn parse_percent(field: &str) -> Option<f64> {
    field.strip_suffix('%')?.parse().ok()
}

/// Parsed contents of the history log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLog {
    pub records: Vec<AuditRecord>,
    /// Lines that could not be parsed and were skipped.
    pub malformed: usize,
}

/// Appends records to the history log. No rotation or truncation.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line.
    pub async fn append(&self, record: &AuditRecord) -> StoreResult<()> {
        let mut line = record.to_line();
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.flush().await.map_err(|e| StoreError::io(&self.path, e))
    }

    /// Read and parse the whole log. A missing file is an empty log.
    pub async fn read_all(&self) -> StoreResult<AuditLog> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AuditLog::default()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut log = AuditLog::default();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match AuditRecord::parse(line) {
                Ok(record) => log.records.push(record),
                Err(_) => log.malformed += 1,
            }
        }
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn record(pct_change: f64, alert_sent: bool) -> AuditRecord {
        AuditRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            asset_id: asset_id("bitcoin"),
            price: 104.0,
            pct_change,
            pct_positive: 0.3,
            pct_negative: 0.7,
            alert_sent,
        }
    }

    #[test]
    fn test_line_layout() {
        assert_eq!(
            record(4.0, true).to_line(),
            "2024-05-01T12:30:00.000000Z  bitcoin  104.00  +4.00%  30%  70%  1"
        );
    }

    #[test]
    fn test_line_parses_back() {
        let original = AuditRecord {
            price: 27_123.456,
            pct_change: -3.14159,
            pct_positive: 0.333,
            pct_negative: 0.667,
            ..record(0.0, false)
        };
        let parsed = AuditRecord::parse(&original.to_line()).unwrap();

        assert_eq!(parsed.timestamp, original.timestamp);
        assert_eq!(parsed.asset_id, original.asset_id);
        assert!((parsed.price - original.price).abs() <= 0.005);
        assert!((parsed.pct_change - original.pct_change).abs() <= 0.005);
        assert!((parsed.pct_positive - original.pct_positive).abs() <= 0.005);
        assert!((parsed.pct_negative - original.pct_negative).abs() <= 0.005);
        assert!(!parsed.alert_sent);
    }

    #[test]
    fn test_absent_change_is_zero() {
        let outcome = CheckOutcome {
            asset_id: asset_id("solana"),
            price: 150.0,
            pct_change: None,
            pct_positive: 0.0,
            pct_negative: 0.0,
            message_count: 0,
            alert_fired: false,
            sentiment_error: None,
            alert_error: None,
        };
        let line = AuditRecord::from_outcome(&outcome, Utc::now()).to_line();
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields[1..], ["solana", "150.00", "+0.00%", "0%", "0%", "0"]);
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(AuditRecord::parse("").is_err());
        assert!(AuditRecord::parse("2024-05-01T12:30:00Z  bitcoin  1.00  +0.00%  0%  0%").is_err());
        assert!(
            AuditRecord::parse("2024-05-01T12:30:00Z  bitcoin  1.00  +0.00%  0%  0%  2").is_err()
        );
        assert!(AuditRecord::parse("yesterday  bitcoin  1.00  +0.00%  0%  0%  0").is_err());
    }

    #[tokio::test]
    async fn test_append_and_read_all() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AuditLogger::new(dir.path().join("logs.txt"));

        logger.append(&record(4.0, true)).await.unwrap();
        logger.append(&record(-1.0, false)).await.unwrap();
        tokio::fs::OpenOptions::new()
            .append(true)
            .open(logger.path())
            .await
            .unwrap()
            .write_all(b"garbage line\n")
            .await
            .unwrap();

        let log = logger.read_all().await.unwrap();
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.malformed, 1);
        assert_eq!(log.records[0].alert_label(), "Yes");
        assert_eq!(log.records[1].alert_label(), "No");
        assert_eq!(log.records[1].pct_change, -1.0);
    }

    #[tokio::test]
    async fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AuditLogger::new(dir.path().join("logs.txt"));
        assert_eq!(logger.read_all().await.unwrap(), AuditLog::default());
    }
}
