use std::collections::BTreeSet;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{ChartPoint, GlobalStats, HeadlineMetric, RankedAsset, TimeRange};

use crate::error::FetchError;
use crate::merge::{Merge, Slot};

/// Everything a consumer renders, published as one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub metrics: Vec<HeadlineMetric>,
    pub chart: Vec<ChartPoint>,
    pub ranking: Vec<RankedAsset>,
    pub global: Option<GlobalStats>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub selected_asset: String,
    pub selected_range_days: u32,
    pub using_fallback: bool,
    /// Slots currently showing placeholder data.
    pub fallback_slots: BTreeSet<Slot>,
    /// Ticket of the last refresh cycle that was applied.
    pub cycle: u64,
    #[serde(skip)]
    pub(crate) chart_ticket: u64,
    #[serde(skip)]
    pub(crate) in_flight: u32,
}

impl DashboardSnapshot {
    pub fn new(selected_asset: impl Into<String>, selected_range_days: u32) -> Self {
        DashboardSnapshot {
            metrics: Vec::new(),
            chart: Vec::new(),
            ranking: Vec::new(),
            global: None,
            loading: true,
            error: None,
            last_update: None,
            selected_asset: selected_asset.into(),
            selected_range_days,
            using_fallback: false,
            fallback_slots: BTreeSet::new(),
            cycle: 0,
            chart_ticket: 0,
            in_flight: 0,
        }
    }

    /// Marks one refresh as settled. Loading clears once none are outstanding.
    pub(crate) fn leave_flight(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.loading = false;
        }
    }

    /// The selected range as one of the UI buckets, if it is one.
    pub fn selected_range(&self) -> Option<TimeRange> {
        TimeRange::from_days(self.selected_range_days)
    }

    /// Applies a merge decision to the bookkeeping for `slot` and hands back the
    /// value the slot should now hold, or `None` to keep what it has.
    pub(crate) fn merge_slot<T>(&mut self, slot: Slot, merge: Merge<T>) -> Option<T> {
        let value = match merge {
            Merge::Apply(value) => {
                self.fallback_slots.remove(&slot);
                Some(value)
            }
            Merge::Placeholder(value, err) => {
                self.fallback_slots.insert(slot);
                self.record_failure(slot, &err);
                Some(value)
            }
            Merge::Keep(err) => {
                self.record_failure(slot, &err);
                None
            }
        };
        self.using_fallback = !self.fallback_slots.is_empty();
        value
    }

    pub(crate) fn record_failure(&mut self, slot: Slot, err: &FetchError) {
        let message = match err {
            FetchError::Orchestration => err.to_string(),
            _ => format!("Failed to fetch {}: {}", slot, err),
        };
        self.error = Some(message);
    }
}

/// Progress notifications for refreshes requested with `notify = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefreshEvent {
    Started {
        cycle: u64,
    },
    Finished {
        cycle: u64,
        failed: Vec<Slot>,
        /// A newer cycle had already been applied, so nothing from this one was.
        stale: bool,
    },
}
