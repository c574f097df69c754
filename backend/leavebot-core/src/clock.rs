// src/clock.rs
use chrono::{Local, NaiveDate};

/// Source of "today". Only the calendar day matters to the report.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

// Local wall clock of the machine running the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned day, used by `--today` and by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    day: NaiveDate,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.day
    }
}
