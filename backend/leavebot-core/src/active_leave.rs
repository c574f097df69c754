// src/active_leave.rs
use chrono::NaiveDate;
use tracing::info;

use crate::leave::LeaveRecord;

// --- Allow-lists ---

pub const DEFAULT_LEAVE_TYPES: [&str; 2] = ["annual leave", "sick leave"];
pub const DEFAULT_STATUSES: [&str; 2] = ["approved", "submitted"];

// Decides which leave records count as "out today".
#[derive(Debug, Clone)]
pub struct ActiveLeavePolicy {
    leave_types: Vec<String>,
    statuses: Vec<String>,
    check_finish_day: bool,
}

impl Default for ActiveLeavePolicy {
    fn default() -> Self {
        Self::new(&DEFAULT_LEAVE_TYPES, &DEFAULT_STATUSES, false)
    }
}

impl ActiveLeavePolicy {
    /// Allow-list entries are lower-cased here, matching how records are stored,
    /// so a literal like "Annual Leave" still matches.
    pub fn new(leave_types: &[&str], statuses: &[&str], check_finish_day: bool) -> Self {
        Self {
            leave_types: leave_types.iter().map(|t| t.trim().to_lowercase()).collect(),
            statuses: statuses.iter().map(|s| s.trim().to_lowercase()).collect(),
            check_finish_day,
        }
    }

    pub fn with_finish_day_check(mut self, enabled: bool) -> Self {
        self.check_finish_day = enabled;
        self
    }

    pub fn allows_leave_type(&self, leave_type: &str) -> bool {
        self.leave_types.iter().any(|t| t == leave_type)
    }

    pub fn allows_status(&self, status: &str) -> bool {
        self.statuses.iter().any(|s| s == status)
    }

    /// Dates are calendar days, so the interval check already includes both
    /// boundaries; the explicit boundary checks are kept as separate rules.
    pub fn is_active_on(&self, record: &LeaveRecord, today: NaiveDate) -> bool {
        if !self.allows_leave_type(&record.leave_type) || !self.allows_status(&record.status) {
            return false;
        }

        record.covers(today)
            || today == record.start_date
            || (self.check_finish_day && today == record.finish_date)
    }

    /// Keeps the records active on `today`, in their original order.
    pub fn active_leaves(&self, records: &[LeaveRecord], today: NaiveDate) -> Vec<LeaveRecord> {
        let active: Vec<LeaveRecord> = records
            .iter()
            .filter(|record| self.is_active_on(record, today))
            .cloned()
            .collect();
        info!(
            "{} of {} leave records are active on {}",
            active.len(),
            records.len(),
            today
        );
        active
    }
}
