use crate::application::bootstrap::bootstrap_workspace;
use crate::application::reminders::{PendingReminder, ReminderEvent, ReminderScheduler};
use crate::domain::models::{lies_on_day, BlockColor, BlockEdit, BlockId, ResizeEdge, TimeBlock};
use crate::domain::schedule::{BlockEvent, DayStats, ScheduleStore};
use crate::domain::timeline::TimelineScale;
use crate::infrastructure::clock::{system_clock, NowProvider};
use crate::infrastructure::config::{save_reminder_settings, ConfigBundle, ReminderSettings};
use crate::infrastructure::error::InfraError;
use crate::infrastructure::schedule_repository::{
    read_snapshot, write_snapshot, BlockSnapshot, DaySnapshot, JsonFileScheduleRepository,
    ScheduleRepository,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct AppState {
    config_dir: PathBuf,
    logs_dir: PathBuf,
    config: ConfigBundle,
    repository: Arc<dyn ScheduleRepository>,
    now_provider: NowProvider,
    runtime: Mutex<RuntimeState>,
    log_guard: Mutex<()>,
}

impl AppState {
    pub fn new(
        workspace_root: PathBuf,
        reminder_sink: mpsc::UnboundedSender<ReminderEvent>,
    ) -> Result<Self, InfraError> {
        let bootstrap = bootstrap_workspace(&workspace_root)?;
        let config = bootstrap.config;
        let now_provider = system_clock(config.app.clock_zone()?);

        let mut store = ScheduleStore::new(now_provider().date());
        store.subscribe(|event: &BlockEvent| debug!(?event, "schedule changed"));

        let mut reminders = ReminderScheduler::new(reminder_sink).with_lead_time(Duration::minutes(
            i64::from(config.reminders.lead_time_minutes),
        ));
        reminders.set_enabled(config.reminders.enabled);

        Ok(Self {
            config_dir: bootstrap.config_dir,
            logs_dir: bootstrap.logs_dir,
            repository: Arc::new(JsonFileScheduleRepository::new(bootstrap.data_dir)),
            config,
            now_provider,
            runtime: Mutex::new(RuntimeState {
                store,
                reminders,
                saved: Vec::new(),
            }),
            log_guard: Mutex::new(()),
        })
    }

    pub fn with_now_provider(mut self, now_provider: NowProvider) -> Self {
        self.now_provider = now_provider;
        self
    }

    pub fn with_repository(mut self, repository: Arc<dyn ScheduleRepository>) -> Self {
        self.repository = repository;
        self
    }

    pub fn config(&self) -> &ConfigBundle {
        &self.config
    }

    pub fn timeline(&self) -> TimelineScale {
        self.config.planner.timeline()
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.now_provider)()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub fn command_error(&self, command: &str, error: InfraError) -> InfraError {
        self.log_error(command, &error.to_string());
        error
    }

    pub fn log_info(&self, command: &str, message: &str) {
        self.append_log("info", command, message);
    }

    pub fn log_error(&self, command: &str, message: &str) {
        self.append_log("error", command, message);
    }

    fn append_log(&self, level: &str, command: &str, message: &str) {
        let Ok(_guard) = self.log_guard.lock() else {
            return;
        };
        let path = self.logs_dir.join("commands.log");
        let payload = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level,
            "command": command,
            "message": message,
        });

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", payload);
        }
    }
}

#[derive(Debug)]
struct RuntimeState {
    store: ScheduleStore,
    reminders: ReminderScheduler,
    // Repository contents for the open day as of the last load or save.
    saved: Vec<BlockSnapshot>,
}

impl RuntimeState {
    /// Replaces the block's reminder with one matching its current state.
    /// Blocks that already started get none.
    fn sync_reminder(&mut self, id: &BlockId, now: NaiveDateTime) {
        self.reminders.unregister(id);
        if let Some(block) = self.store.get(id) {
            if block.notify_enabled() && block.start() > now {
                self.reminders.register_block(block);
            }
        }
    }

    fn replace_blocks(&mut self, date: NaiveDate, blocks: Vec<TimeBlock>, now: NaiveDateTime) {
        self.store.set_current_date(date);
        self.reminders.clear_all();
        for block in blocks {
            let id = self.store.add_block(block).id().clone();
            self.sync_reminder(&id, now);
        }
    }

    /// Like `replace_blocks`, but a block whose reminder already fired stays
    /// silent as long as its start is unchanged.
    fn reload_blocks(&mut self, blocks: Vec<TimeBlock>, now: NaiveDateTime) {
        let fired = self
            .store
            .blocks()
            .iter()
            .filter(|block| {
                block.notify_enabled() && block.start() > now && !self.reminders.is_pending(block.id())
            })
            .map(|block| (block.id().clone(), block.start()))
            .collect::<HashSet<_>>();

        let date = self.store.current_date();
        self.replace_blocks(date, blocks, now);
        for block in self.store.blocks() {
            if fired.contains(&(block.id().clone(), block.start())) {
                self.reminders.unregister(block.id());
            }
        }
    }
}

fn lock_runtime(state: &AppState) -> Result<MutexGuard<'_, RuntimeState>, InfraError> {
    state
        .runtime
        .lock()
        .map_err(|error| InfraError::StatePoisoned(error.to_string()))
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OpenDayResponse {
    pub date: NaiveDate,
    pub loaded: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub pending_reminders: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SaveDayResponse {
    pub date: NaiveDate,
    pub blocks: usize,
}

/// Converts stored blocks for `date`. Invalid blocks and blocks lying on
/// another day are skipped; repeated ids are replaced with fresh ones.
fn snapshots_to_blocks(date: NaiveDate, snapshots: Vec<BlockSnapshot>) -> (Vec<TimeBlock>, usize) {
    let mut blocks = Vec::with_capacity(snapshots.len());
    let mut seen = HashSet::new();
    let mut skipped = 0;
    for mut snapshot in snapshots {
        if !lies_on_day(date, snapshot.start_time, snapshot.end_time) {
            warn!(%date, start = %snapshot.start_time, "skipping stored block outside its day");
            skipped += 1;
            continue;
        }
        if let Some(id) = &snapshot.id {
            if !seen.insert(id.clone()) {
                warn!(block_id = %id, "duplicate stored block id; assigning a new one");
                snapshot.id = None;
            }
        }
        match snapshot.into_block() {
            Ok(block) => {
                seen.insert(block.id().clone());
                blocks.push(block);
            }
            Err(error) => {
                warn!(%error, "skipping invalid stored block");
                skipped += 1;
            }
        }
    }
    (blocks, skipped)
}

/// Makes `date` the open day, replacing whatever was open without saving it.
pub fn open_day_impl(state: &AppState, date: Option<String>) -> Result<OpenDayResponse, InfraError> {
    let date = match date {
        Some(raw) => parse_date_input(&raw, "date")?,
        None => state.today(),
    };

    let (snapshots, load_error) = match state.repository.load(date) {
        Ok(snapshots) => (snapshots, None),
        Err(error) => {
            warn!(%date, %error, "failed to load day; starting empty");
            state.log_error("open_day", &format!("load failed for {date}: {error}"));
            (Vec::new(), Some(error.to_string()))
        }
    };
    let (blocks, skipped) = snapshots_to_blocks(date, snapshots.clone());
    let loaded = blocks.len();
    let now = state.now();

    let pending_reminders = {
        let mut runtime = lock_runtime(state)?;
        runtime.replace_blocks(date, blocks, now);
        runtime.saved = snapshots;
        runtime.reminders.len()
    };

    state.log_info(
        "open_day",
        &format!("opened date={date} loaded={loaded} skipped={skipped}"),
    );
    Ok(OpenDayResponse {
        date,
        loaded,
        skipped,
        load_error,
        pending_reminders,
    })
}

/// Picks up changes another process saved for the open day. Returns whether
/// the open day was reloaded. Saved content wins over unsaved local edits.
pub fn reload_if_changed_impl(state: &AppState) -> Result<bool, InfraError> {
    let date = current_date_impl(state)?;
    let snapshots = match state.repository.load(date) {
        Ok(snapshots) => snapshots,
        Err(error) => {
            warn!(%date, %error, "cannot check saved day for changes");
            return Ok(false);
        }
    };
    let now = state.now();

    let reloaded = {
        let mut runtime = lock_runtime(state)?;
        if runtime.store.current_date() != date || runtime.saved == snapshots {
            None
        } else {
            let (blocks, skipped) = snapshots_to_blocks(date, snapshots.clone());
            runtime.reload_blocks(blocks, now);
            runtime.saved = snapshots;
            Some((runtime.store.len(), skipped))
        }
    };

    let Some((loaded, skipped)) = reloaded else {
        return Ok(false);
    };
    info!(%date, loaded, "saved day changed; reloaded");
    state.log_info(
        "reload_day",
        &format!("reloaded date={date} loaded={loaded} skipped={skipped}"),
    );
    Ok(true)
}

pub fn switch_day_impl(
    state: &AppState,
    date: String,
    save_current: bool,
) -> Result<OpenDayResponse, InfraError> {
    if save_current {
        save_day_impl(state)?;
    }
    open_day_impl(state, Some(date))
}

pub fn new_day_impl(state: &AppState, save_current: bool) -> Result<OpenDayResponse, InfraError> {
    let today = state.today().format("%Y-%m-%d").to_string();
    switch_day_impl(state, today, save_current)
}

pub fn current_date_impl(state: &AppState) -> Result<NaiveDate, InfraError> {
    Ok(lock_runtime(state)?.store.current_date())
}

fn insert_block(state: &AppState, command: &str, block: TimeBlock) -> Result<TimeBlock, InfraError> {
    let now = state.now();
    let created = {
        let mut runtime = lock_runtime(state)?;
        let created = runtime.store.add_block(block).clone();
        runtime.sync_reminder(created.id(), now);
        created
    };

    state.log_info(
        command,
        &format!(
            "created block_id={} start={} end={}",
            created.id(),
            created.start(),
            created.end()
        ),
    );
    Ok(created)
}

fn resolve_color(color: Option<String>) -> Result<BlockColor, InfraError> {
    match color {
        Some(raw) => Ok(BlockColor::new(raw)?),
        None => Ok(BlockColor::default()),
    }
}

pub fn create_block_impl(
    state: &AppState,
    start: String,
    end: String,
    title: String,
    color: Option<String>,
    notify: Option<bool>,
) -> Result<TimeBlock, InfraError> {
    let date = current_date_impl(state)?;
    let start = parse_time_input(&start, date, "start")?;
    let end = parse_time_input(&end, date, "end")?;
    let block = TimeBlock::new(start, end, &title, resolve_color(color)?, notify.unwrap_or(true))?;
    ensure_on_day(date, block.start(), block.end())?;
    insert_block(state, "create_block", block)
}

pub fn create_block_at_offset_impl(
    state: &AppState,
    offset_px: i64,
    title: String,
    color: Option<String>,
    notify: Option<bool>,
) -> Result<TimeBlock, InfraError> {
    let date = current_date_impl(state)?;
    let timeline = state.timeline();
    let (start, end) = timeline.default_block_at(date, offset_px).ok_or_else(|| {
        InfraError::InvalidInput(format!(
            "offset must be within 0..{} px and leave room for a {} minute block",
            timeline.height_px(),
            timeline.default_block_minutes
        ))
    })?;
    let block = TimeBlock::new(start, end, &title, resolve_color(color)?, notify.unwrap_or(true))?;
    insert_block(state, "create_block_at_offset", block)
}

fn ensure_on_day(date: NaiveDate, start: NaiveDateTime, end: NaiveDateTime) -> Result<(), InfraError> {
    if lies_on_day(date, start, end) {
        return Ok(());
    }
    Err(InfraError::InvalidInput(format!(
        "block {start}..{end} must lie on {date}"
    )))
}

fn require_block_id(block_id: &str) -> Result<BlockId, InfraError> {
    let block_id = block_id.trim();
    if block_id.is_empty() {
        return Err(InfraError::InvalidInput(
            "block_id must not be empty".to_string(),
        ));
    }
    Ok(BlockId::from(block_id))
}

/// Absent fields keep their current values.
pub fn edit_block_impl(
    state: &AppState,
    block_id: String,
    start: Option<String>,
    end: Option<String>,
    title: Option<String>,
    notify: Option<bool>,
) -> Result<TimeBlock, InfraError> {
    let id = require_block_id(&block_id)?;
    let now = state.now();

    let updated = {
        let mut runtime = lock_runtime(state)?;
        let current = runtime
            .store
            .get(&id)
            .cloned()
            .ok_or_else(|| InfraError::BlockNotFound(id.clone()))?;
        let date = runtime.store.current_date();
        let edit = BlockEdit {
            start: match start {
                Some(raw) => parse_time_input(&raw, date, "start")?,
                None => current.start(),
            },
            end: match end {
                Some(raw) => parse_time_input(&raw, date, "end")?,
                None => current.end(),
            },
            title: title.unwrap_or_else(|| current.title().to_string()),
            notify_enabled: notify.unwrap_or(current.notify_enabled()),
        };
        if edit.start < edit.end {
            ensure_on_day(date, edit.start, edit.end)?;
        }
        let updated = runtime.store.edit_block(&id, edit)?.clone();
        runtime.sync_reminder(&id, now);
        updated
    };

    state.log_info("edit_block", &format!("edited block_id={id}"));
    Ok(updated)
}

pub fn set_block_color_impl(
    state: &AppState,
    block_id: String,
    color: String,
) -> Result<TimeBlock, InfraError> {
    let id = require_block_id(&block_id)?;
    let color = BlockColor::new(color)?;
    if !color.is_palette() {
        debug!(%color, "color outside the block palette");
    }
    let updated = lock_runtime(state)?
        .store
        .set_block_color(&id, color)?
        .clone();

    state.log_info(
        "set_block_color",
        &format!("recolored block_id={id} color={}", updated.color()),
    );
    Ok(updated)
}

pub fn toggle_block_notify_impl(state: &AppState, block_id: String) -> Result<TimeBlock, InfraError> {
    let id = require_block_id(&block_id)?;
    let now = state.now();
    let updated = {
        let mut runtime = lock_runtime(state)?;
        let updated = runtime.store.toggle_block_notify(&id)?.clone();
        runtime.sync_reminder(&id, now);
        updated
    };

    state.log_info(
        "toggle_block_notify",
        &format!("block_id={id} notify={}", updated.notify_enabled()),
    );
    Ok(updated)
}

pub fn move_block_impl(state: &AppState, block_id: String, start: String) -> Result<TimeBlock, InfraError> {
    let id = require_block_id(&block_id)?;
    let now = state.now();
    let updated = {
        let mut runtime = lock_runtime(state)?;
        let length = runtime
            .store
            .get(&id)
            .map(TimeBlock::duration)
            .ok_or_else(|| InfraError::BlockNotFound(id.clone()))?;
        let date = runtime.store.current_date();
        let start = parse_time_input(&start, date, "start")?;
        let end = start
            .checked_add_signed(length)
            .ok_or_else(|| InfraError::InvalidInput(format!("cannot move block to {start}")))?;
        ensure_on_day(date, start, end)?;
        let updated = runtime.store.move_block(&id, start)?.clone();
        runtime.sync_reminder(&id, now);
        updated
    };

    state.log_info(
        "move_block",
        &format!("moved block_id={id} start={} end={}", updated.start(), updated.end()),
    );
    Ok(updated)
}

pub fn resize_block_impl(
    state: &AppState,
    block_id: String,
    edge: String,
    time: String,
) -> Result<TimeBlock, InfraError> {
    let id = require_block_id(&block_id)?;
    let edge = parse_resize_edge(&edge)?;
    let now = state.now();
    let updated = {
        let mut runtime = lock_runtime(state)?;
        let current = runtime
            .store
            .get(&id)
            .ok_or_else(|| InfraError::BlockNotFound(id.clone()))?;
        let (start, end) = (current.start(), current.end());
        let date = runtime.store.current_date();
        let time = parse_time_input(&time, date, "time")?;
        let (start, end) = match edge {
            ResizeEdge::Top => (time, end),
            ResizeEdge::Bottom => (start, time),
        };
        if start < end {
            ensure_on_day(date, start, end)?;
        }
        let updated = runtime.store.resize_block(&id, edge, time)?.clone();
        runtime.sync_reminder(&id, now);
        updated
    };

    state.log_info(
        "resize_block",
        &format!("resized block_id={id} start={} end={}", updated.start(), updated.end()),
    );
    Ok(updated)
}

pub fn delete_block_impl(state: &AppState, block_id: String) -> Result<bool, InfraError> {
    let id = require_block_id(&block_id)?;
    let removed = {
        let mut runtime = lock_runtime(state)?;
        runtime.reminders.unregister(&id);
        runtime.store.remove_block(&id).is_some()
    };
    if !removed {
        return Ok(false);
    }

    state.log_info("delete_block", &format!("deleted block_id={id}"));
    Ok(true)
}

pub fn clear_blocks_impl(state: &AppState) -> Result<usize, InfraError> {
    let removed = {
        let mut runtime = lock_runtime(state)?;
        runtime.reminders.clear_all();
        runtime.store.clear()
    };

    state.log_info("clear_blocks", &format!("cleared {removed} blocks"));
    Ok(removed)
}

pub fn list_blocks_impl(state: &AppState) -> Result<Vec<TimeBlock>, InfraError> {
    let runtime = lock_runtime(state)?;
    Ok(runtime.store.blocks_by_start().into_iter().cloned().collect())
}

pub fn overlapping_blocks_impl(state: &AppState, block_id: String) -> Result<Vec<TimeBlock>, InfraError> {
    let id = require_block_id(&block_id)?;
    let runtime = lock_runtime(state)?;
    if runtime.store.get(&id).is_none() {
        return Err(InfraError::BlockNotFound(id));
    }
    Ok(runtime.store.overlapping(&id).into_iter().cloned().collect())
}

pub fn day_stats_impl(state: &AppState) -> Result<DayStats, InfraError> {
    let runtime = lock_runtime(state)?;
    Ok(runtime.store.stats(state.config.planner.workday_minutes))
}

pub fn list_saved_dates_impl(state: &AppState) -> Result<Vec<NaiveDate>, InfraError> {
    state.repository.list_saved_dates()
}

pub fn save_day_impl(state: &AppState) -> Result<SaveDayResponse, InfraError> {
    let (date, blocks) = {
        let runtime = lock_runtime(state)?;
        (runtime.store.current_date(), runtime.store.blocks().to_vec())
    };
    state.repository.save(date, &blocks, state.now())?;
    {
        let mut runtime = lock_runtime(state)?;
        if runtime.store.current_date() == date {
            runtime.saved = blocks.iter().map(BlockSnapshot::from).collect();
        }
    }

    info!(%date, blocks = blocks.len(), "day saved");
    state.log_info("save_day", &format!("saved date={date} blocks={}", blocks.len()));
    Ok(SaveDayResponse {
        date,
        blocks: blocks.len(),
    })
}

/// Saves only when the open day has blocks, so an empty session never
/// overwrites a stored day. Changes saved elsewhere are picked up first.
pub fn autosave_impl(state: &AppState) -> Result<Option<SaveDayResponse>, InfraError> {
    reload_if_changed_impl(state)?;
    let is_empty = lock_runtime(state)?.store.is_empty();
    if is_empty {
        return Ok(None);
    }
    save_day_impl(state).map(Some)
}

pub fn shutdown_impl(state: &AppState) -> Result<Option<SaveDayResponse>, InfraError> {
    let saved = autosave_impl(state)?;
    state.log_info("shutdown", "planner stopped");
    Ok(saved)
}

pub fn export_day_impl(state: &AppState, path: PathBuf) -> Result<SaveDayResponse, InfraError> {
    let snapshot = {
        let runtime = lock_runtime(state)?;
        DaySnapshot::new(runtime.store.current_date(), state.now(), runtime.store.blocks())
    };
    write_snapshot(&path, &snapshot)?;

    state.log_info(
        "export_day",
        &format!("exported {} blocks to {}", snapshot.time_blocks.len(), path.display()),
    );
    Ok(SaveDayResponse {
        date: snapshot.date,
        blocks: snapshot.time_blocks.len(),
    })
}

/// Replaces the open day's blocks with the ones in `path`, re-dated onto the open day.
pub fn import_day_impl(state: &AppState, path: PathBuf) -> Result<usize, InfraError> {
    let snapshot = read_snapshot(&path)?;
    let now = state.now();

    let imported = {
        let mut runtime = lock_runtime(state)?;
        let target = runtime.store.current_date();
        let shift = target - snapshot.date;
        let shifted = snapshot
            .time_blocks
            .into_iter()
            .filter_map(|mut block| {
                block.start_time = block.start_time.checked_add_signed(shift)?;
                block.end_time = block.end_time.checked_add_signed(shift)?;
                Some(block)
            })
            .collect::<Vec<_>>();
        let (blocks, skipped) = snapshots_to_blocks(target, shifted);
        if skipped > 0 {
            warn!(skipped, "import skipped invalid blocks");
        }
        let imported = blocks.len();
        runtime.replace_blocks(target, blocks, now);
        imported
    };

    state.log_info(
        "import_day",
        &format!("imported {imported} blocks from {}", path.display()),
    );
    Ok(imported)
}

pub fn set_notifications_enabled_impl(state: &AppState, enabled: bool) -> Result<bool, InfraError> {
    lock_runtime(state)?.reminders.set_enabled(enabled);
    state.log_info(
        "set_notifications_enabled",
        &format!("notifications enabled={enabled}"),
    );
    Ok(enabled)
}

pub fn toggle_notifications_impl(state: &AppState) -> Result<bool, InfraError> {
    let enabled = !lock_runtime(state)?.reminders.is_enabled();
    set_notifications_enabled_impl(state, enabled)
}

pub fn persist_notifications_impl(state: &AppState) -> Result<bool, InfraError> {
    let enabled = lock_runtime(state)?.reminders.is_enabled();
    let settings = ReminderSettings {
        enabled,
        ..state.config.reminders.clone()
    };
    save_reminder_settings(&state.config_dir, &settings)?;
    state.log_info(
        "persist_notifications",
        &format!("saved notifications enabled={enabled}"),
    );
    Ok(enabled)
}

pub fn pending_reminders_impl(state: &AppState) -> Result<Vec<PendingReminder>, InfraError> {
    Ok(lock_runtime(state)?.reminders.pending())
}

pub fn tick_reminders_impl(state: &AppState) -> Result<Vec<ReminderEvent>, InfraError> {
    tick_reminders_at(state, state.now())
}

pub fn tick_reminders_at(state: &AppState, now: NaiveDateTime) -> Result<Vec<ReminderEvent>, InfraError> {
    let fired = lock_runtime(state)?.reminders.tick(now);
    for event in &fired {
        state.log_info(
            "reminder",
            &format!("fired block_id={} title={}", event.block_id, event.title),
        );
    }
    Ok(fired)
}

fn parse_date_input(value: &str, field_name: &str) -> Result<NaiveDate, InfraError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| InfraError::InvalidInput(format!("{field_name} must be YYYY-MM-DD")))
}

fn parse_time_input(value: &str, date: NaiveDate, field_name: &str) -> Result<NaiveDateTime, InfraError> {
    let value = value.trim();
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M") {
        return Ok(date.and_time(time));
    }
    if let Ok(datetime) = value.parse::<NaiveDateTime>() {
        return Ok(datetime);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .map_err(|_| {
            InfraError::InvalidInput(format!(
                "{field_name} must be HH:MM or YYYY-MM-DDTHH:MM[:SS]"
            ))
        })
}

fn parse_resize_edge(value: &str) -> Result<ResizeEdge, InfraError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "top" | "start" => Ok(ResizeEdge::Top),
        "bottom" | "end" => Ok(ResizeEdge::Bottom),
        other => Err(InfraError::InvalidInput(format!(
            "unsupported resize edge: {}",
            other
        ))),
    }
}
