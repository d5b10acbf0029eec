use crate::domain::error::ScheduleError;
use crate::domain::models::{BlockColor, BlockEdit, BlockId, ResizeEdge, TimeBlock};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_WORKDAY_MINUTES: u32 = 480;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    Created(BlockId),
    Edited(BlockId),
    ColorChanged { id: BlockId, color: BlockColor },
    NotifyToggled { id: BlockId, enabled: bool },
    TimeChanged(BlockId),
    Deleted(BlockId),
    Cleared { date: NaiveDate, removed: usize },
}

pub type BlockObserver = Box<dyn Fn(&BlockEvent) + Send>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub block_count: usize,
    pub total_minutes: i64,
    pub hours: i64,
    pub minutes: i64,
    pub productivity_percent: u32,
}

/// The blocks of the open day. Overlaps are allowed.
pub struct ScheduleStore {
    current_date: NaiveDate,
    blocks: Vec<TimeBlock>,
    observers: Vec<BlockObserver>,
}

impl fmt::Debug for ScheduleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleStore")
            .field("current_date", &self.current_date)
            .field("blocks", &self.blocks)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ScheduleStore {
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            current_date,
            blocks: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Fn(&BlockEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&self, event: BlockEvent) {
        for observer in &self.observers {
            observer(&event);
        }
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Empties the store and re-keys it to `date`. Loading the new day's
    /// blocks is left to the caller.
    pub fn set_current_date(&mut self, date: NaiveDate) {
        self.clear();
        self.current_date = date;
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    pub fn blocks_by_start(&self) -> Vec<&TimeBlock> {
        let mut sorted = self.blocks.iter().collect::<Vec<_>>();
        sorted.sort_by(|left, right| {
            left.start()
                .cmp(&right.start())
                .then_with(|| left.end().cmp(&right.end()))
        });
        sorted
    }

    pub fn get(&self, id: &BlockId) -> Option<&TimeBlock> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn add_block(&mut self, block: TimeBlock) -> &TimeBlock {
        let id = block.id().clone();
        self.blocks.push(block);
        self.emit(BlockEvent::Created(id));
        let index = self.blocks.len() - 1;
        &self.blocks[index]
    }

    pub fn remove_block(&mut self, id: &BlockId) -> Option<TimeBlock> {
        let index = self.blocks.iter().position(|block| block.id() == id)?;
        let removed = self.blocks.remove(index);
        self.emit(BlockEvent::Deleted(removed.id().clone()));
        Some(removed)
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.blocks.len();
        self.blocks.clear();
        self.emit(BlockEvent::Cleared {
            date: self.current_date,
            removed,
        });
        removed
    }

    fn block_mut(&mut self, id: &BlockId) -> Result<&mut TimeBlock, ScheduleError> {
        self.blocks
            .iter_mut()
            .find(|block| block.id() == id)
            .ok_or_else(|| ScheduleError::NotFound(id.clone()))
    }

    pub fn edit_block(&mut self, id: &BlockId, edit: BlockEdit) -> Result<&TimeBlock, ScheduleError> {
        self.block_mut(id)?.edit(edit)?;
        self.emit(BlockEvent::Edited(id.clone()));
        self.find(id)
    }

    pub fn set_block_color(&mut self, id: &BlockId, color: BlockColor) -> Result<&TimeBlock, ScheduleError> {
        self.block_mut(id)?.set_color(color.clone());
        self.emit(BlockEvent::ColorChanged {
            id: id.clone(),
            color,
        });
        self.find(id)
    }

    pub fn toggle_block_notify(&mut self, id: &BlockId) -> Result<&TimeBlock, ScheduleError> {
        let enabled = self.block_mut(id)?.toggle_notify();
        self.emit(BlockEvent::NotifyToggled {
            id: id.clone(),
            enabled,
        });
        self.find(id)
    }

    pub fn move_block(&mut self, id: &BlockId, start: NaiveDateTime) -> Result<&TimeBlock, ScheduleError> {
        self.block_mut(id)?.move_to(start);
        self.emit(BlockEvent::TimeChanged(id.clone()));
        self.find(id)
    }

    pub fn resize_block(
        &mut self,
        id: &BlockId,
        edge: ResizeEdge,
        time: NaiveDateTime,
    ) -> Result<&TimeBlock, ScheduleError> {
        self.block_mut(id)?.resize(edge, time)?;
        self.emit(BlockEvent::TimeChanged(id.clone()));
        self.find(id)
    }

    fn find(&self, id: &BlockId) -> Result<&TimeBlock, ScheduleError> {
        self.get(id).ok_or_else(|| ScheduleError::NotFound(id.clone()))
    }

    pub fn overlapping(&self, id: &BlockId) -> Vec<&TimeBlock> {
        let Some(target) = self.get(id) else {
            return Vec::new();
        };
        self.blocks
            .iter()
            .filter(|candidate| candidate.id() != id && candidate.overlaps(target))
            .collect()
    }

    pub fn total_minutes(&self) -> i64 {
        self.blocks.iter().map(TimeBlock::duration_minutes).sum()
    }

    pub fn productivity_percent(&self, workday_minutes: u32) -> u32 {
        productivity_percent(self.total_minutes(), workday_minutes)
    }

    pub fn stats(&self, workday_minutes: u32) -> DayStats {
        let total_minutes = self.total_minutes();
        DayStats {
            date: self.current_date,
            block_count: self.blocks.len(),
            total_minutes,
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
            productivity_percent: productivity_percent(total_minutes, workday_minutes),
        }
    }
}

/// `min(100, round(total / workday * 100))`.
pub fn productivity_percent(total_minutes: i64, workday_minutes: u32) -> u32 {
    if workday_minutes == 0 || total_minutes <= 0 {
        return 0;
    }
    let ratio = total_minutes as f64 / f64::from(workday_minutes) * 100.0;
    ratio.round().min(100.0) as u32
}
