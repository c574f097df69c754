// src/pipeline.rs
use chrono::NaiveDate;
use std::path::Path;
use tracing::{error, info};

use crate::clock::{Clock, SystemClock};
use crate::leave::LeaveRecord;
use crate::leave_sheet::ExtractError;
use crate::notifier::Notifier;
use crate::profile::ReportProfile;

/// A rendered report ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReport {
    pub channel: String,
    pub leave_count: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub active: usize,
    /// Extracted records of the traced employee, if one is set.
    pub traced: usize,
    pub delivered: Vec<String>,
    pub failed: Vec<String>,
}

/// read -> filter -> group -> format -> send, once.
pub struct LeaveReportPipeline {
    profile: ReportProfile,
    notifier: Box<dyn Notifier + Send + Sync>,
    clock: Box<dyn Clock + Send + Sync>,
    trace_employee: Option<String>,
}

impl LeaveReportPipeline {
    pub fn new(profile: ReportProfile, notifier: Box<dyn Notifier + Send + Sync>) -> Self {
        Self {
            profile,
            notifier,
            clock: Box::new(SystemClock),
            trace_employee: None,
        }
    }

    /// Replaces the local wall clock as the source of "today".
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Logs every extracted record of this employee before filtering.
    pub fn with_trace_employee(mut self, employee: Option<String>) -> Self {
        self.trace_employee = employee;
        self
    }

    /// Extracts the workbook completely, then reports on it as of the
    /// clock's today. Extraction failures abort before anything is sent.
    pub async fn run(&self, excel_path: &Path) -> Result<RunSummary, ExtractError> {
        let records = self.profile.reader().read_workbook(excel_path)?;
        Ok(self.run_records(&records, self.clock.today()).await)
    }

    pub async fn run_records(&self, records: &[LeaveRecord], today: NaiveDate) -> RunSummary {
        let traced = self.trace(records);
        let active = self.profile.policy.active_leaves(records, today);
        let reports = self.build_reports(&active, today);

        let mut summary = RunSummary {
            extracted: records.len(),
            active: active.len(),
            traced,
            ..RunSummary::default()
        };

        // One at a time; a failed channel never stops the others
        for report in &reports {
            match self.notifier.deliver(&report.channel, &report.text).await {
                Ok(()) => {
                    info!(
                        "Delivered leave report to {} ({} leave(s))",
                        report.channel, report.leave_count
                    );
                    summary.delivered.push(report.channel.clone());
                }
                Err(e) => {
                    error!("Failed to send to Slack channel {}: {}", report.channel, e);
                    summary.failed.push(report.channel.clone());
                }
            }
        }

        info!(
            "Run finished: {} extracted, {} active, {} delivered, {} failed",
            summary.extracted,
            summary.active,
            summary.delivered.len(),
            summary.failed.len()
        );
        summary
    }

    /// Groups already-filtered records and renders one report per channel.
    pub fn build_reports(&self, active: &[LeaveRecord], today: NaiveDate) -> Vec<ChannelReport> {
        self.profile
            .routing
            .group(active, self.profile.empty_groups)
            .into_iter()
            .map(|group| ChannelReport {
                text: self.profile.template.render(&group, today),
                leave_count: group.records.len(),
                channel: group.channel,
            })
            .collect()
    }

    fn trace(&self, records: &[LeaveRecord]) -> usize {
        let Some(name) = self.trace_employee.as_deref() else {
            return 0;
        };
        let date_display = self.profile.template.date_display;
        let matching: Vec<&LeaveRecord> = records.iter().filter(|r| r.employee == name).collect();
        info!("{} extracted record(s) for {}", matching.len(), name);
        for r in &matching {
            info!(
                "  {} -> {} | {} | {} | {}",
                date_display.format(r.start_date),
                date_display.format(r.finish_date),
                r.leave_type,
                r.status,
                r.org_unit
            );
        }
        matching.len()
    }
}
