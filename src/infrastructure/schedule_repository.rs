use crate::domain::error::ValidationError;
use crate::domain::models::{BlockColor, BlockId, TimeBlock};
use crate::infrastructure::error::InfraError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

const FILE_PREFIX: &str = "schedule_";
const FILE_SUFFIX: &str = ".json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub title: String,
    #[serde(default)]
    pub color: BlockColor,
    #[serde(default = "default_notify")]
    pub notify: bool,
}

fn default_notify() -> bool {
    true
}

impl From<&TimeBlock> for BlockSnapshot {
    fn from(block: &TimeBlock) -> Self {
        Self {
            id: Some(block.id().clone()),
            start_time: block.start(),
            end_time: block.end(),
            title: block.title().to_string(),
            color: block.color().clone(),
            notify: block.notify_enabled(),
        }
    }
}

impl BlockSnapshot {
    /// Rebuilds a block, keeping the stored id when there is one.
    pub fn into_block(self) -> Result<TimeBlock, ValidationError> {
        let color = BlockColor::new(self.color.as_str()).unwrap_or_default();
        let id = self.id.filter(|id| !id.as_str().is_empty());
        match id {
            Some(id) => TimeBlock::with_id(
                id,
                self.start_time,
                self.end_time,
                &self.title,
                color,
                self.notify,
            ),
            None => TimeBlock::new(
                self.start_time,
                self.end_time,
                &self.title,
                color,
                self.notify,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub created: NaiveDateTime,
    pub time_blocks: Vec<BlockSnapshot>,
}

impl DaySnapshot {
    pub fn new(date: NaiveDate, created: NaiveDateTime, blocks: &[TimeBlock]) -> Self {
        Self {
            date,
            created,
            time_blocks: blocks.iter().map(BlockSnapshot::from).collect(),
        }
    }
}

pub trait ScheduleRepository: Send + Sync {
    fn save(&self, date: NaiveDate, blocks: &[TimeBlock], saved_at: NaiveDateTime) -> Result<(), InfraError>;
    /// An absent snapshot is an empty day, not an error.
    fn load(&self, date: NaiveDate) -> Result<Vec<BlockSnapshot>, InfraError>;
    fn list_saved_dates(&self) -> Result<Vec<NaiveDate>, InfraError>;
}

pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}{FILE_SUFFIX}", date.format("%Y-%m-%d"))
}

fn parse_snapshot_file_name(name: &str) -> Option<NaiveDate> {
    let raw = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn write_snapshot(path: &Path, snapshot: &DaySnapshot) -> Result<(), InfraError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let formatted = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, format!("{formatted}\n"))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<DaySnapshot, InfraError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[derive(Debug, Clone)]
pub struct JsonFileScheduleRepository {
    data_dir: PathBuf,
}

impl JsonFileScheduleRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(snapshot_file_name(date))
    }
}

impl ScheduleRepository for JsonFileScheduleRepository {
    fn save(&self, date: NaiveDate, blocks: &[TimeBlock], saved_at: NaiveDateTime) -> Result<(), InfraError> {
        let path = self.path_for(date);
        write_snapshot(&path, &DaySnapshot::new(date, saved_at, blocks))?;
        debug!(path = %path.display(), blocks = blocks.len(), "saved day snapshot");
        Ok(())
    }

    fn load(&self, date: NaiveDate) -> Result<Vec<BlockSnapshot>, InfraError> {
        let path = self.path_for(date);
        match read_snapshot(&path) {
            Ok(snapshot) => Ok(snapshot.time_blocks),
            Err(InfraError::Io(error)) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot for day");
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }

    fn list_saved_dates(&self) -> Result<Vec<NaiveDate>, InfraError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(date) = entry.file_name().to_str().and_then(parse_snapshot_file_name) {
                dates.push(date);
            }
        }
        dates.sort_unstable();
        Ok(dates)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryScheduleRepository {
    days: Mutex<HashMap<NaiveDate, DaySnapshot>>,
}

impl InMemoryScheduleRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<NaiveDate, DaySnapshot>>, InfraError> {
        self.days
            .lock()
            .map_err(|error| InfraError::StatePoisoned(format!("schedule repository: {error}")))
    }
}

impl ScheduleRepository for InMemoryScheduleRepository {
    fn save(&self, date: NaiveDate, blocks: &[TimeBlock], saved_at: NaiveDateTime) -> Result<(), InfraError> {
        self.lock()?
            .insert(date, DaySnapshot::new(date, saved_at, blocks));
        Ok(())
    }

    fn load(&self, date: NaiveDate) -> Result<Vec<BlockSnapshot>, InfraError> {
        Ok(self
            .lock()?
            .get(&date)
            .map(|snapshot| snapshot.time_blocks.clone())
            .unwrap_or_default())
    }

    fn list_saved_dates(&self) -> Result<Vec<NaiveDate>, InfraError> {
        let mut dates = self.lock()?.keys().copied().collect::<Vec<_>>();
        dates.sort_unstable();
        Ok(dates)
    }
}
