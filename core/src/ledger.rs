//! Activity ledger — per-user, per-date flag lookup plus the date set.
//!
//! RULE: `record()` is the only mutation and must be fed in input order.
//! Last write wins on `(user_id, date)`, so reordering input changes
//! results. Once ingestion finishes the ledger is read-only.

use crate::{
    record::Record,
    types::{DateKey, Flag, UserId},
};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default, Clone)]
pub struct ActivityLedger {
    activity: HashMap<UserId, HashMap<DateKey, Flag>>,
    dates:    BTreeSet<DateKey>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: Record) {
        self.dates.insert(record.date);
        self.activity
            .entry(record.user_id)
            .or_default()
            .insert(record.date, record.flag);
    }

    /// Any record at all for this pair, whatever its flag.
    pub fn has_activity(&self, user_id: &str, date: DateKey) -> bool {
        self.flag(user_id, date).is_some()
    }

    /// A record exists for this pair and its flag is nonzero.
    pub fn qualifies(&self, user_id: &str, date: DateKey) -> bool {
        matches!(self.flag(user_id, date), Some(flag) if flag != 0)
    }

    pub fn flag(&self, user_id: &str, date: DateKey) -> Option<Flag> {
        self.activity.get(user_id)?.get(&date).copied()
    }

    pub fn all_user_ids(&self) -> impl Iterator<Item = &str> {
        self.activity.keys().map(String::as_str)
    }

    /// Distinct dates, ascending.
    pub fn sorted_dates(&self) -> Vec<DateKey> {
        self.dates.iter().copied().collect()
    }

    pub fn user_count(&self) -> usize {
        self.activity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
