// src/report.rs
use chrono::NaiveDate;

use crate::routing::ChannelGroup;

// --- Report Text ---

pub const EMPTY_BODY: &str = "No one is slacking today!";
pub const FOOTER: &str = "Stay sunny! :sun_with_face:";

/// How dates are shown in a report. One format is used for the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateDisplay {
    DayMonthYearDashed,  // 23-05-2025
    DayMonthYearSlashed, // 23/05/2025
    YearMonthDayDashed,  // 2025-05-23
}

impl DateDisplay {
    fn pattern(self) -> &'static str {
        match self {
            DateDisplay::DayMonthYearDashed => "%d-%m-%Y",
            DateDisplay::DayMonthYearSlashed => "%d/%m/%Y",
            DateDisplay::YearMonthDayDashed => "%Y-%m-%d",
        }
    }

    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTemplate {
    pub date_display: DateDisplay,
    /// Adds "There are **N** leaves today in <channel>:" above the bullets.
    pub summary_line: bool,
}

impl ReportTemplate {
    /// Renders the report for one channel. Output depends only on the inputs.
    pub fn render(&self, group: &ChannelGroup, today: NaiveDate) -> String {
        let mut lines = Vec::with_capacity(group.records.len() + 3);
        lines.push(format!(
            ":palm_tree: *Daily Leave Report ({})* :palm_tree:",
            self.date_display.format(today)
        ));

        if group.records.is_empty() {
            lines.push(EMPTY_BODY.to_string());
        } else {
            if self.summary_line {
                lines.push(format!(
                    "There are **{}** leaves today in {}:",
                    group.records.len(),
                    group.channel
                ));
            }
            for record in &group.records {
                lines.push(format!(
                    "• {} - {} ({} - {})",
                    record.employee,
                    record.leave_type,
                    self.date_display.format(record.start_date),
                    self.date_display.format(record.finish_date)
                ));
            }
        }

        lines.push(FOOTER.to_string());
        lines.join("\n")
    }
}
