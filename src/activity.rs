use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

fn default_success() -> bool {
    true
}

/// A transaction as shown in the activity feed. Adapted from the raw cached
/// record; anything the cache holds beyond these fields is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub signature: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub memo: Option<String>,
}

impl TransactionRecord {
    /// Adapt a raw cached record. A record that fails to deserialize is
    /// treated the same as one missing from the cache: skipped.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        serde_json::from_value(raw.clone()).ok()
    }

    /// Local calendar day of the transaction, or None when the record has
    /// no usable timestamp. A zero timestamp means "not yet confirmed" in
    /// the fetcher's output and counts as unknown.
    pub fn local_day(&self) -> Option<NaiveDate> {
        self.timestamp
            .filter(|&ts| ts != 0)
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.with_timezone(&Local).date_naive())
    }
}

/// One run of same-day transactions in display order. `date` is None for
/// transactions with no usable timestamp; such a bucket renders without a
/// header row.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: Option<NaiveDate>,
    pub items: Vec<TransactionRecord>,
}

/// Group an ordered signature sequence into day buckets.
///
/// Single forward pass, run-length grouping: a new bucket opens whenever the
/// calendar day changes between consecutive resolved records, so a day that
/// the input revisits after switching away gets a second separate bucket.
/// Signatures missing from `lookup` (or whose record fails to adapt) are
/// skipped without disturbing the current run. The trailing bucket is always
/// flushed, even when the last signatures in the input are unresolved.
pub fn group_by_day(order: &[String], lookup: &HashMap<String, Value>) -> Vec<DayBucket> {
    let mut buckets = Vec::new();
    let mut items: Vec<TransactionRecord> = Vec::new();
    let mut current_day: Option<NaiveDate> = None;

    for signature in order {
        let record = match lookup.get(signature).and_then(TransactionRecord::from_raw) {
            Some(record) => record,
            None => continue,
        };

        let day = record.local_day();

        if !items.is_empty() && day != current_day {
            buckets.push(DayBucket {
                date: current_day,
                items: std::mem::take(&mut items),
            });
        }

        current_day = day;
        items.push(record);
    }

    if !items.is_empty() {
        buckets.push(DayBucket {
            date: current_day,
            items,
        });
    }

    buckets
}

/// Header text for a bucket. The two most recent days collapse to
/// "Today" / "Yesterday"; an unknown date gets no header at all.
pub fn day_label(date: Option<NaiveDate>, today: NaiveDate) -> Option<String> {
    let date = date?;

    if date == today {
        Some("Today".to_string())
    } else if Some(date) == today.pred_opt() {
        Some("Yesterday".to_string())
    } else {
        Some(date.format("%B %-d, %Y").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DAY: i64 = 86_400;
    // 2024-01-05 12:00:00 UTC, mid-day so small offsets within a test stay
    // on one local calendar day
    const NOON: i64 = 1_704_456_000;

    fn raw(signature: &str, timestamp: Option<i64>) -> Value {
        json!({
            "signature": signature,
            "timestamp": timestamp,
            "slot": 250_000_000u64,
            "amount": 0.5,
            "symbol": "SOL",
            "success": true,
        })
    }

    fn lookup(entries: &[(&str, Value)]) -> HashMap<String, Value> {
        entries
            .iter()
            .map(|(sig, value)| (sig.to_string(), value.clone()))
            .collect()
    }

    fn order(sigs: &[&str]) -> Vec<String> {
        sigs.iter().map(|s| s.to_string()).collect()
    }

    fn signatures(buckets: &[DayBucket]) -> Vec<&str> {
        buckets
            .iter()
            .flat_map(|b| b.items.iter().map(|t| t.signature.as_str()))
            .collect()
    }

    #[test]
    fn empty_order_yields_no_buckets() {
        let buckets = group_by_day(&[], &HashMap::new());
        assert!(buckets.is_empty());
    }

    #[test]
    fn all_unresolved_yields_no_buckets() {
        let buckets = group_by_day(&order(&["a", "b"]), &HashMap::new());
        assert!(buckets.is_empty());
    }

    #[test]
    fn same_day_records_share_one_bucket() {
        let lookup = lookup(&[
            ("s1", raw("s1", Some(NOON))),
            ("s2", raw("s2", Some(NOON + 3))),
        ]);
        let buckets = group_by_day(&order(&["s1", "s2"]), &lookup);

        assert_eq!(buckets.len(), 1);
        assert_eq!(signatures(&buckets), vec!["s1", "s2"]);
        assert!(buckets[0].date.is_some());
    }

    #[test]
    fn unresolved_trailing_id_still_flushes_bucket() {
        let lookup = lookup(&[
            ("s1", raw("s1", Some(NOON))),
            ("s2", raw("s2", Some(NOON + 3))),
        ]);
        let buckets = group_by_day(&order(&["s1", "s2", "s3"]), &lookup);

        assert_eq!(buckets.len(), 1);
        assert_eq!(signatures(&buckets), vec!["s1", "s2"]);
    }

    #[test]
    fn unadaptable_record_is_skipped() {
        let mut table = lookup(&[("s1", raw("s1", Some(NOON)))]);
        // no signature field, adaptation fails
        table.insert("s2".to_string(), json!({ "timestamp": NOON }));
        table.insert("s3".to_string(), json!("not even an object"));

        let buckets = group_by_day(&order(&["s1", "s2", "s3"]), &table);
        assert_eq!(signatures(&buckets), vec!["s1"]);
    }

    #[test]
    fn day_change_opens_new_bucket() {
        let lookup = lookup(&[
            ("s1", raw("s1", Some(NOON))),
            ("s2", raw("s2", Some(NOON - 2 * DAY))),
        ]);
        let buckets = group_by_day(&order(&["s1", "s2"]), &lookup);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].items.len(), 1);
        assert_eq!(buckets[1].items.len(), 1);
        assert_ne!(buckets[0].date, buckets[1].date);
    }

    #[test]
    fn last_record_on_new_day_is_not_dropped() {
        let lookup = lookup(&[
            ("s1", raw("s1", Some(NOON))),
            ("s2", raw("s2", Some(NOON + 2))),
            ("s3", raw("s3", Some(NOON - 2 * DAY))),
        ]);
        let buckets = group_by_day(&order(&["s1", "s2", "s3"]), &lookup);

        assert_eq!(buckets.len(), 2);
        assert_eq!(signatures(&buckets), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn revisited_day_gets_a_separate_bucket() {
        let lookup = lookup(&[
            ("a1", raw("a1", Some(NOON))),
            ("b1", raw("b1", Some(NOON - 2 * DAY))),
            ("a2", raw("a2", Some(NOON + 5))),
        ]);
        let buckets = group_by_day(&order(&["a1", "b1", "a2"]), &lookup);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].date, buckets[2].date);
        assert_eq!(signatures(&buckets), vec!["a1", "b1", "a2"]);
    }

    #[test]
    fn missing_timestamp_groups_under_unknown_date() {
        let lookup = lookup(&[
            ("s1", raw("s1", None)),
            ("s2", raw("s2", None)),
            ("s3", raw("s3", Some(NOON))),
        ]);
        let buckets = group_by_day(&order(&["s1", "s2", "s3"]), &lookup);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, None);
        assert_eq!(buckets[0].items.len(), 2);
        assert!(buckets[1].date.is_some());
    }

    #[test]
    fn zero_timestamp_counts_as_unknown_date() {
        let lookup = lookup(&[("s1", raw("s1", Some(0)))]);
        let buckets = group_by_day(&order(&["s1"]), &lookup);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].date, None);
    }

    #[test]
    fn concatenated_buckets_preserve_input_order() {
        let lookup = lookup(&[
            ("s1", raw("s1", Some(NOON))),
            ("s2", raw("s2", None)),
            ("s3", raw("s3", Some(NOON - 3 * DAY))),
            ("s5", raw("s5", Some(NOON - 3 * DAY + 4))),
        ]);
        let buckets = group_by_day(&order(&["s1", "s2", "s3", "s4", "s5"]), &lookup);

        assert_eq!(signatures(&buckets), vec!["s1", "s2", "s3", "s5"]);
        for bucket in &buckets {
            for item in &bucket.items {
                assert_eq!(item.local_day(), bucket.date);
            }
        }
    }

    #[test]
    fn label_collapses_today_and_yesterday() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

        assert_eq!(day_label(Some(today), today).as_deref(), Some("Today"));
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2024, 1, 6), today).as_deref(),
            Some("Yesterday")
        );
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2024, 1, 5), today).as_deref(),
            Some("January 5, 2024")
        );
        assert_eq!(day_label(None, today), None);
    }
}
