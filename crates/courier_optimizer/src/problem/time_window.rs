use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: i64 = 1440;

/// Windows wider than this are considered flexible.
const FLEXIBLE_WINDOW_MINUTES: i64 = 240;

/// `[start, end]` in minutes from midnight.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::full_day()
    }
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn full_day() -> Self {
        TimeWindow {
            start: 0,
            end: MINUTES_PER_DAY,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_flexible(&self) -> bool {
        self.duration() > FLEXIBLE_WINDOW_MINUTES
    }

    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start >= 0 && self.end <= MINUTES_PER_DAY && self.end > self.start
    }

    /// Minutes spent idle when arriving at `arrival`.
    pub fn waiting_time(&self, arrival: i64) -> i64 {
        (self.start - arrival).max(0)
    }
}
