use crate::infrastructure::config::ClockZone;
use chrono::{Local, NaiveDateTime, Utc};
use std::sync::Arc;

/// Wall-clock source in the planner's local time.
pub type NowProvider = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn system_clock(zone: ClockZone) -> NowProvider {
    match zone {
        ClockZone::Local => Arc::new(|| Local::now().naive_local()),
        ClockZone::Named(tz) => Arc::new(move || Utc::now().with_timezone(&tz).naive_local()),
    }
}

pub fn fixed_clock(now: NaiveDateTime) -> NowProvider {
    Arc::new(move || now)
}
