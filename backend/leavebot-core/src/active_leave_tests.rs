// src/active_leave_tests.rs

#[cfg(test)]
mod tests {
    use crate::active_leave::*;
    use crate::leave::LeaveRecord;
    use chrono::{Duration, NaiveDate};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // Helper function to create a test record
    fn create_test_record(
        employee: &str,
        start: NaiveDate,
        finish: NaiveDate,
        leave_type: &str,
        status: &str,
    ) -> LeaveRecord {
        LeaveRecord::new(employee, start, finish, leave_type, status, "UK")
    }

    fn both_policies() -> [ActiveLeavePolicy; 2] {
        [
            ActiveLeavePolicy::default(),
            ActiveLeavePolicy::default().with_finish_day_check(true),
        ]
    }

    #[test]
    fn test_single_day_leave_today_is_active() {
        let today = d(2025, 5, 23);
        let record = create_test_record("A", today, today, "annual leave", "approved");
        for policy in both_policies() {
            assert!(policy.is_active_on(&record, today));
        }
    }

    #[test]
    fn test_every_day_of_range_is_active() {
        let start = d(2025, 5, 20);
        let finish = d(2025, 5, 24);
        let record = create_test_record("A", start, finish, "sick leave", "submitted");
        let policy = ActiveLeavePolicy::default();

        let mut day = start;
        while day <= finish {
            assert!(policy.is_active_on(&record, day), "{} should be active", day);
            day += Duration::days(1);
        }
        assert!(!policy.is_active_on(&record, start - Duration::days(1)));
        assert!(!policy.is_active_on(&record, finish + Duration::days(1)));
    }

    #[test]
    fn test_finish_day_is_active_with_and_without_explicit_check() {
        let today = d(2025, 5, 23);
        let record = create_test_record("A", d(2025, 5, 19), today, "annual leave", "approved");
        for policy in both_policies() {
            assert!(policy.is_active_on(&record, today));
        }
    }

    #[test]
    fn test_leave_ending_yesterday_is_not_active() {
        let today = d(2025, 5, 23);
        let record = create_test_record("A", d(2025, 5, 19), today - Duration::days(1), "annual leave", "approved");
        for policy in both_policies() {
            assert!(!policy.is_active_on(&record, today));
        }
    }

    #[test]
    fn test_leave_starting_tomorrow_is_not_active() {
        let today = d(2025, 5, 23);
        let record = create_test_record("B", today + Duration::days(1), d(2025, 5, 30), "sick leave", "submitted");
        assert!(!ActiveLeavePolicy::default().is_active_on(&record, today));
    }

    #[test]
    fn test_status_and_type_allow_lists() {
        let today = d(2025, 5, 23);
        let policy = ActiveLeavePolicy::default();

        let rejected = create_test_record("C", today, today, "annual leave", "rejected");
        assert!(!policy.is_active_on(&rejected, today));

        let unpaid = create_test_record("D", today, today, "unpaid leave", "approved");
        assert!(!policy.is_active_on(&unpaid, today));

        let submitted = create_test_record("E", today, today, "Sick Leave", "Submitted");
        assert!(policy.is_active_on(&submitted, today));
    }

    #[test]
    fn test_mixed_case_allow_list_still_matches_lowercased_records() {
        // Regression: a title-cased allow-list used to match nothing once the
        // record values were lower-cased.
        let today = d(2025, 5, 23);
        let policy = ActiveLeavePolicy::new(&["Annual Leave", "Sick Leave"], &["Approved", "SUBMITTED"], false);
        let upper = create_test_record("A", today, today, "ANNUAL LEAVE", "APPROVED");
        let lower = create_test_record("B", today, today, "annual leave", "submitted");

        assert!(policy.is_active_on(&upper, today));
        assert!(policy.is_active_on(&lower, today));
        assert_eq!(upper.leave_type, lower.leave_type);
    }

    #[test]
    fn test_active_leaves_preserves_order() {
        let today = d(2025, 5, 23);
        let records = vec![
            create_test_record("First", today, today, "annual leave", "approved"),
            create_test_record("Skipped", today, today, "annual leave", "rejected"),
            create_test_record("Second", d(2025, 5, 1), d(2025, 6, 1), "sick leave", "submitted"),
            create_test_record("Third", today, d(2025, 5, 24), "annual leave", "approved"),
        ];

        let active = ActiveLeavePolicy::default().active_leaves(&records, today);
        let names: Vec<&str> = active.iter().map(|r| r.employee.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_active_leaves_empty_input() {
        let active = ActiveLeavePolicy::default().active_leaves(&[], d(2025, 5, 23));
        assert!(active.is_empty());
    }
}
