use crate::domain::models::lies_on_day;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Geometry of the vertical day timeline: minutes after `start_hour` map to
/// pixel offsets at a fixed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineScale {
    pub start_hour: u32,
    pub end_hour: u32,
    pub pixels_per_minute: u32,
    pub default_block_minutes: u32,
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 22,
            pixels_per_minute: 2,
            default_block_minutes: 60,
        }
    }
}

impl TimelineScale {
    pub fn validate(&self) -> Result<(), String> {
        if self.end_hour > 24 || self.start_hour >= self.end_hour {
            return Err("timeline hours must satisfy start < end <= 24".to_string());
        }
        if self.pixels_per_minute == 0 {
            return Err("timeline pixels per minute must be > 0".to_string());
        }
        if self.default_block_minutes == 0 {
            return Err("default block length must be > 0".to_string());
        }
        Ok(())
    }

    pub fn visible_minutes(&self) -> u32 {
        (self.end_hour - self.start_hour) * 60
    }

    pub fn height_px(&self) -> u32 {
        self.visible_minutes() * self.pixels_per_minute
    }

    /// Minutes after midnight at a pixel offset, or `None` when the offset
    /// falls outside `0..height_px()`.
    pub fn minutes_at(&self, offset_px: i64) -> Option<i64> {
        if !(0..i64::from(self.height_px())).contains(&offset_px) {
            return None;
        }
        Some(i64::from(self.start_hour) * 60 + offset_px / i64::from(self.pixels_per_minute))
    }

    pub fn time_at(&self, date: NaiveDate, offset_px: i64) -> Option<NaiveDateTime> {
        let minutes = Duration::try_minutes(self.minutes_at(offset_px)?)?;
        date.and_time(NaiveTime::MIN).checked_add_signed(minutes)
    }

    /// The one-click block proposal for a click at `offset_px`. Proposals
    /// that would run past midnight are refused.
    pub fn default_block_at(&self, date: NaiveDate, offset_px: i64) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = self.time_at(date, offset_px)?;
        let end = start.checked_add_signed(Duration::try_minutes(i64::from(self.default_block_minutes))?)?;
        lies_on_day(date, start, end).then_some((start, end))
    }
}
