use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::types::ListingEntry;

/// Age-based retention: files dated on or before `today - threshold_days` are eligible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub threshold_days: u32,
}

impl RetentionPolicy {
    pub const fn new(threshold_days: u32) -> Self {
        RetentionPolicy { threshold_days }
    }

    /// Inclusive boundary date. Saturates at the earliest representable date.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.threshold_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn is_eligible(&self, entry: &ListingEntry, cutoff: NaiveDate) -> bool {
        entry.is_file() && entry.modified <= cutoff
    }

    /// Paths of eligible entries, in listing order.
    pub fn select(&self, entries: &[ListingEntry], today: NaiveDate) -> Vec<String> {
        // computed once so a long listing can't straddle two cutoffs
        let cutoff = self.cutoff(today);
        entries
            .iter()
            .filter(|entry| self.is_eligible(entry, cutoff))
            .map(|entry| entry.path.clone())
            .collect()
    }
}
