//! Cohort engine — builds the retention matrix from a frozen ledger.
//!
//! For every base date (ascending):
//!   1. Cohort = users whose record on the base date is qualifying (flag != 0).
//!      Its size is the diagonal cell `(base, base)`.
//!   2. For every later offset date (ascending), count cohort members with
//!      ANY record on that date. Non-qualifying visits count as a return.
//!   3. The cohort is fixed for the whole row; it is never pruned.
//!
//! Cells below the diagonal (`offset < base`) are never computed.

use crate::{ledger::ActivityLedger, types::DateKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RetentionCell {
    pub offset_date: DateKey,
    pub users:       u64,
    /// Percentage of the cohort, 0.0 when the cohort is empty.
    pub rate:        f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CohortRow {
    pub base_date:   DateKey,
    pub cohort_size: u64,
    /// Diagonal first, then every later date ascending.
    pub cells:       Vec<RetentionCell>,
}

impl CohortRow {
    pub fn cell(&self, offset_date: DateKey) -> Option<&RetentionCell> {
        self.cells.iter().find(|c| c.offset_date == offset_date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetentionMatrix {
    /// Distinct dates, ascending. Both axes of the matrix.
    pub dates: Vec<DateKey>,
    /// One row per base date, in `dates` order.
    pub rows:  Vec<CohortRow>,
}

impl RetentionMatrix {
    pub fn row(&self, base_date: DateKey) -> Option<&CohortRow> {
        self.rows.iter().find(|r| r.base_date == base_date)
    }

    /// User count at `(base_date, offset_date)`.
    /// `None` below the diagonal or for dates never observed.
    pub fn users(&self, base_date: DateKey, offset_date: DateKey) -> Option<u64> {
        self.row(base_date)?.cell(offset_date).map(|c| c.users)
    }

    pub fn rate(&self, base_date: DateKey, offset_date: DateKey) -> Option<f64> {
        self.row(base_date)?.cell(offset_date).map(|c| c.rate)
    }

    pub fn cohort_size(&self, base_date: DateKey) -> Option<u64> {
        self.row(base_date).map(|r| r.cohort_size)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// `users / cohort_size * 100`, defined as zero for an empty cohort.
pub fn retention_rate(users: u64, cohort_size: u64) -> f64 {
    if cohort_size == 0 {
        0.0
    } else {
        users as f64 / cohort_size as f64 * 100.0
    }
}

pub struct CohortEngine<'a> {
    ledger: &'a ActivityLedger,
}

impl<'a> CohortEngine<'a> {
    pub fn new(ledger: &'a ActivityLedger) -> Self {
        Self { ledger }
    }

    pub fn compute(&self) -> RetentionMatrix {
        let dates = self.ledger.sorted_dates();
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, &base_date)| self.compute_row(base_date, &dates[i + 1..]))
            .collect();
        RetentionMatrix { dates, rows }
    }

    /// `later_dates` must be ascending and strictly after `base_date`.
    fn compute_row(&self, base_date: DateKey, later_dates: &[DateKey]) -> CohortRow {
        let cohort: Vec<&str> = self
            .ledger
            .all_user_ids()
            .filter(|user_id| self.ledger.qualifies(user_id, base_date))
            .collect();
        let cohort_size = cohort.len() as u64;

        let mut cells = Vec::with_capacity(later_dates.len() + 1);
        cells.push(RetentionCell {
            offset_date: base_date,
            users:       cohort_size,
            rate:        retention_rate(cohort_size, cohort_size),
        });

        for &offset_date in later_dates {
            let users = cohort
                .iter()
                .filter(|user_id| self.ledger.has_activity(user_id, offset_date))
                .count() as u64;
            cells.push(RetentionCell {
                offset_date,
                users,
                rate: retention_rate(users, cohort_size),
            });
        }

        log::debug!(
            "base_date={base_date} cohort: {cohort_size} users, {} offset dates",
            later_dates.len()
        );

        CohortRow { base_date, cohort_size, cells }
    }
}
