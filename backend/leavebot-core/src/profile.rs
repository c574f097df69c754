// src/profile.rs
use clap::ValueEnum;

use crate::active_leave::ActiveLeavePolicy;
use crate::leave_sheet::{ColumnLayout, DateTextFormat, LeaveSheetReader};
use crate::report::{DateDisplay, ReportTemplate};
use crate::routing::{ChannelMap, ChannelMapError, EmptyGroupPolicy, Routing};

// --- Built-in routing defaults ---

pub const DEFAULT_DEPARTMENT_CHANNELS: [(&str, &str); 3] = [
    ("UK", "#garytesting"),
    ("India", "#garytesting"),
    ("OZ", "#garytesting"),
];

pub const DEFAULT_OFFICE_CHANNELS: [(&str, &str); 1] = [("ClearRoute India", "#testing")];

pub const DEFAULT_TEST_CHANNEL: &str = "#testing";

/// Which flavour of the daily report to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileKind {
    /// Header-driven columns, one report per department channel
    Generic,
    /// Fixed columns, one report for everyone in the test channel
    Test,
    /// Fixed columns, one report per office channel
    Pune,
}

/// Everything that differs between report flavours.
#[derive(Debug, Clone)]
pub struct ReportProfile {
    pub kind: ProfileKind,
    pub layout: ColumnLayout,
    pub date_text: DateTextFormat,
    pub policy: ActiveLeavePolicy,
    pub routing: Routing,
    pub empty_groups: EmptyGroupPolicy,
    pub template: ReportTemplate,
}

impl ReportProfile {
    pub fn generic(departments: ChannelMap, fallback_channel: Option<String>) -> Self {
        Self {
            kind: ProfileKind::Generic,
            layout: ColumnLayout::ByHeader,
            date_text: DateTextFormat::Standard,
            policy: ActiveLeavePolicy::default(),
            routing: Routing::ByUnit {
                map: departments,
                fallback_channel,
            },
            empty_groups: EmptyGroupPolicy::Skip,
            template: ReportTemplate {
                date_display: DateDisplay::DayMonthYearDashed,
                summary_line: true,
            },
        }
    }

    pub fn test(channel: String) -> Self {
        Self {
            kind: ProfileKind::Test,
            layout: ColumnLayout::Fixed,
            date_text: DateTextFormat::WeekdayPrefixed,
            policy: ActiveLeavePolicy::default().with_finish_day_check(true),
            routing: Routing::Single(channel),
            empty_groups: EmptyGroupPolicy::SendPlaceholder,
            template: ReportTemplate {
                date_display: DateDisplay::YearMonthDayDashed,
                summary_line: false,
            },
        }
    }

    pub fn pune(offices: ChannelMap, fallback_channel: Option<String>) -> Self {
        Self {
            kind: ProfileKind::Pune,
            layout: ColumnLayout::Fixed,
            date_text: DateTextFormat::WeekdayPrefixed,
            policy: ActiveLeavePolicy::default().with_finish_day_check(true),
            routing: Routing::ByUnit {
                map: offices,
                fallback_channel,
            },
            empty_groups: EmptyGroupPolicy::SendPlaceholder,
            template: ReportTemplate {
                date_display: DateDisplay::DayMonthYearSlashed,
                summary_line: false,
            },
        }
    }

    pub fn reader(&self) -> LeaveSheetReader {
        LeaveSheetReader::new(self.layout, self.date_text)
    }
}

pub fn default_department_map() -> Result<ChannelMap, ChannelMapError> {
    ChannelMap::new(DEFAULT_DEPARTMENT_CHANNELS)
}

pub fn default_office_map() -> Result<ChannelMap, ChannelMapError> {
    ChannelMap::new(DEFAULT_OFFICE_CHANNELS)
}
