use crate::domain::error::ValidationError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_BLOCK_COLOR: &str = "#FF2B2B";

pub const BLOCK_PALETTE: [&str; 8] = [
    "#FF2B2B", "#FF4444", "#FF6B6B", "#FF8B8B", "#FF4C4C", "#FF6666", "#FF8C8C", "#FFAAAA",
];

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn generate() -> Self {
        let sequence = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("blk-{}-{sequence}", Utc::now().timestamp_micros()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockColor(String);

impl BlockColor {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyColor);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_palette(&self) -> bool {
        BLOCK_PALETTE
            .iter()
            .any(|swatch| swatch.eq_ignore_ascii_case(&self.0))
    }
}

impl Default for BlockColor {
    fn default() -> Self {
        Self(DEFAULT_BLOCK_COLOR.to_string())
    }
}

impl fmt::Display for BlockColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEdit {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub notify_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBlock {
    id: BlockId,
    start: NaiveDateTime,
    end: NaiveDateTime,
    title: String,
    color: BlockColor,
    notify_enabled: bool,
}

impl TimeBlock {
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        title: &str,
        color: BlockColor,
        notify_enabled: bool,
    ) -> Result<Self, ValidationError> {
        Self::with_id(BlockId::generate(), start, end, title, color, notify_enabled)
    }

    pub fn with_id(
        id: BlockId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        title: &str,
        color: BlockColor,
        notify_enabled: bool,
    ) -> Result<Self, ValidationError> {
        validate_range(start, end)?;
        let title = validate_title(title)?;
        Ok(Self {
            id,
            start,
            end,
            title,
            color,
            notify_enabled,
        })
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn color(&self) -> &BlockColor {
        &self.color
    }

    pub fn notify_enabled(&self) -> bool {
        self.notify_enabled
    }

    /// Applies all edit fields or none of them.
    pub fn edit(&mut self, edit: BlockEdit) -> Result<(), ValidationError> {
        validate_range(edit.start, edit.end)?;
        let title = validate_title(&edit.title)?;
        self.start = edit.start;
        self.end = edit.end;
        self.title = title;
        self.notify_enabled = edit.notify_enabled;
        Ok(())
    }

    pub fn set_times(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<(), ValidationError> {
        validate_range(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    pub fn move_to(&mut self, start: NaiveDateTime) {
        let length = self.end - self.start;
        self.start = start;
        self.end = start + length;
    }

    pub fn resize(&mut self, edge: ResizeEdge, time: NaiveDateTime) -> Result<(), ValidationError> {
        match edge {
            ResizeEdge::Top => self.set_times(time, self.end),
            ResizeEdge::Bottom => self.set_times(self.start, time),
        }
    }

    pub fn set_color(&mut self, color: BlockColor) {
        self.color = color;
    }

    pub fn toggle_notify(&mut self) -> bool {
        self.notify_enabled = !self.notify_enabled;
        self.notify_enabled
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn overlaps(&self, other: &TimeBlock) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Whether `start..end` lies on `date`. An end at the following midnight
/// still counts as the same day.
pub fn lies_on_day(date: NaiveDate, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start.date() == date
        && (end.date() == date
            || date
                .succ_opt()
                .is_some_and(|next| end == next.and_time(NaiveTime::MIN)))
}

fn validate_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::InvalidRange { start, end });
    }
    Ok(())
}

fn validate_title(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 16)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    fn sample_block() -> TimeBlock {
        TimeBlock::new(at(9, 0), at(10, 30), "Focus work", BlockColor::default(), true)
            .expect("valid block")
    }

    #[test]
    fn new_block_reports_duration_and_defaults() {
        let block = sample_block();
        assert_eq!(block.duration_minutes(), 90);
        assert_eq!(block.color().as_str(), DEFAULT_BLOCK_COLOR);
        assert!(block.color().is_palette());
        assert!(block.notify_enabled());
    }

    #[test]
    fn new_block_rejects_zero_length_and_inverted_ranges() {
        let zero = TimeBlock::new(at(9, 0), at(9, 0), "x", BlockColor::default(), true);
        assert!(matches!(zero, Err(ValidationError::InvalidRange { .. })));

        let inverted = TimeBlock::new(at(10, 0), at(9, 0), "x", BlockColor::default(), true);
        assert!(matches!(inverted, Err(ValidationError::InvalidRange { .. })));
    }

    #[test]
    fn new_block_rejects_blank_title_and_trims() {
        let blank = TimeBlock::new(at(9, 0), at(10, 0), "   ", BlockColor::default(), true);
        assert_eq!(blank, Err(ValidationError::EmptyTitle));

        let block = TimeBlock::new(at(9, 0), at(10, 0), "  Review  ", BlockColor::default(), true)
            .expect("valid block");
        assert_eq!(block.title(), "Review");
    }

    #[test]
    fn block_ids_are_unique() {
        let first = sample_block();
        let second = sample_block();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn failed_edit_leaves_block_untouched() {
        let mut block = sample_block();
        let before = block.clone();
        let result = block.edit(BlockEdit {
            start: at(11, 0),
            end: at(10, 0),
            title: "Changed".to_string(),
            notify_enabled: false,
        });
        assert!(result.is_err());
        assert_eq!(block, before);

        let result = block.edit(BlockEdit {
            start: at(11, 0),
            end: at(12, 0),
            title: " ".to_string(),
            notify_enabled: false,
        });
        assert_eq!(result, Err(ValidationError::EmptyTitle));
        assert_eq!(block, before);
    }

    #[test]
    fn edit_replaces_all_fields() {
        let mut block = sample_block();
        block
            .edit(BlockEdit {
                start: at(13, 0),
                end: at(13, 45),
                title: "Lunch".to_string(),
                notify_enabled: false,
            })
            .expect("valid edit");
        assert_eq!(block.start(), at(13, 0));
        assert_eq!(block.duration_minutes(), 45);
        assert_eq!(block.title(), "Lunch");
        assert!(!block.notify_enabled());
    }

    #[test]
    fn move_keeps_duration_and_resize_checks_order() {
        let mut block = sample_block();
        block.move_to(at(14, 0));
        assert_eq!(block.end(), at(15, 30));

        block.resize(ResizeEdge::Bottom, at(16, 0)).expect("grow");
        assert_eq!(block.duration_minutes(), 120);
        block.resize(ResizeEdge::Top, at(15, 0)).expect("shrink");
        assert_eq!(block.duration_minutes(), 60);
        assert!(block.resize(ResizeEdge::Top, at(16, 0)).is_err());
        assert!(block.resize(ResizeEdge::Bottom, at(14, 59)).is_err());
        assert_eq!(block.start(), at(15, 0));
    }

    #[test]
    fn toggle_notify_flips_state() {
        let mut block = sample_block();
        assert!(!block.toggle_notify());
        assert!(block.toggle_notify());
    }

    #[test]
    fn color_accepts_custom_values_but_not_blank() {
        assert_eq!(BlockColor::new("  "), Err(ValidationError::EmptyColor));
        let custom = BlockColor::new("#123456").expect("custom color");
        assert!(!custom.is_palette());
        assert!(BlockColor::new("#ff6b6b").expect("palette color").is_palette());
    }

    #[test]
    fn lies_on_day_allows_ending_at_midnight_only() {
        let day = NaiveDate::from_ymd_opt(2026, 2, 16).expect("valid date");
        let next = NaiveDate::from_ymd_opt(2026, 2, 17).expect("valid date");
        assert!(lies_on_day(day, at(9, 0), at(10, 0)));
        assert!(lies_on_day(day, at(23, 0), next.and_time(NaiveTime::MIN)));
        assert!(!lies_on_day(day, at(23, 0), next.and_hms_opt(0, 30, 0).expect("valid time")));
        assert!(!lies_on_day(next, at(9, 0), at(10, 0)));
    }

    #[test]
    fn overlap_is_half_open() {
        let block = sample_block();
        let adjacent = TimeBlock::new(at(10, 30), at(11, 0), "Next", BlockColor::default(), true)
            .expect("valid block");
        let inside = TimeBlock::new(at(10, 0), at(10, 15), "Call", BlockColor::default(), true)
            .expect("valid block");
        assert!(!block.overlaps(&adjacent));
        assert!(block.overlaps(&inside));
        assert!(inside.overlaps(&block));
    }

    proptest! {
        #[test]
        fn valid_ranges_report_exact_duration(start_minute in 0i64..1439, length in 1i64..600) {
            let start = at(0, 0) + Duration::minutes(start_minute);
            let end = start + Duration::minutes(length);
            let block = TimeBlock::new(start, end, "Block", BlockColor::default(), false)
                .expect("valid block");
            prop_assert_eq!(block.duration_minutes(), length);
        }
    }

    proptest! {
        #[test]
        fn non_positive_ranges_are_rejected(start_minute in 0i64..1439, back in 0i64..600) {
            let start = at(0, 0) + Duration::minutes(start_minute);
            let end = start - Duration::minutes(back);
            let result = TimeBlock::new(start, end, "Block", BlockColor::default(), false);
            let is_invalid_range = matches!(result, Err(ValidationError::InvalidRange { .. }));
            prop_assert!(is_invalid_range);
        }
    }
}
