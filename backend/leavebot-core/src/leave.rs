// src/leave.rs
use chrono::NaiveDate;

// --- Leave Record ---

/// One normalized row of the leave export.
///
/// `leave_type`, `status` and `org_unit` are lower-cased once here so every
/// later comparison is case-insensitive without repeating the work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRecord {
    pub employee: String,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub leave_type: String,
    pub status: String,
    pub org_unit: String, // Department (generic) or office (pune/test)
}

impl LeaveRecord {
    pub fn new(
        employee: &str,
        start_date: NaiveDate,
        finish_date: NaiveDate,
        leave_type: &str,
        status: &str,
        raw_org_unit: &str,
    ) -> Self {
        Self {
            employee: employee.trim().to_string(),
            start_date,
            finish_date,
            leave_type: leave_type.trim().to_lowercase(),
            status: status.trim().to_lowercase(),
            org_unit: normalize_org_unit(raw_org_unit),
        }
    }

    /// Whether `day` lies in the closed interval [start_date, finish_date].
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.finish_date
    }
}

/// "ClearRoute UK Ltd / UK " -> "uk". Values without a `/` are kept whole.
pub fn normalize_org_unit(raw: &str) -> String {
    raw.rsplit('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_org_unit_takes_last_path_segment() {
        assert_eq!(normalize_org_unit("ClearRoute Ltd / UK"), "uk");
        assert_eq!(normalize_org_unit("A/B/ India "), "india");
        assert_eq!(normalize_org_unit("  ClearRoute India "), "clearroute india");
        assert_eq!(normalize_org_unit(""), "");
        assert_eq!(normalize_org_unit("Company /"), "");
    }

    #[test]
    fn test_new_normalizes_casing_and_whitespace() {
        let record = LeaveRecord::new(
            "  Jane Doe ",
            d(2025, 5, 23),
            d(2025, 5, 23),
            "Annual Leave",
            " APPROVED",
            "Group / OZ",
        );
        assert_eq!(record.employee, "Jane Doe");
        assert_eq!(record.leave_type, "annual leave");
        assert_eq!(record.status, "approved");
        assert_eq!(record.org_unit, "oz");
    }

    #[test]
    fn test_covers_is_inclusive_on_both_ends() {
        let record = LeaveRecord::new("A", d(2025, 5, 20), d(2025, 5, 22), "sick leave", "submitted", "UK");
        assert!(!record.covers(d(2025, 5, 19)));
        assert!(record.covers(d(2025, 5, 20)));
        assert!(record.covers(d(2025, 5, 21)));
        assert!(record.covers(d(2025, 5, 22)));
        assert!(!record.covers(d(2025, 5, 23)));
    }
}
