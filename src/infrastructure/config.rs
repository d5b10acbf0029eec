use crate::domain::schedule::DEFAULT_WORKDAY_MINUTES;
use crate::domain::timeline::TimelineScale;
use crate::infrastructure::error::InfraError;
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const APP_JSON: &str = "app.json";
const REMINDERS_JSON: &str = "reminders.json";
const PLANNER_JSON: &str = "planner.json";
const LOCAL_TIMEZONE: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub app_name: String,
    pub timezone: String,
    pub data_dir: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "Time Blocking Planner".to_string(),
            timezone: LOCAL_TIMEZONE.to_string(),
            data_dir: "time_blocking_data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockZone {
    Local,
    Named(Tz),
}

impl AppSettings {
    pub fn clock_zone(&self) -> Result<ClockZone, InfraError> {
        let timezone = self.timezone.trim();
        if timezone.is_empty() || timezone.eq_ignore_ascii_case(LOCAL_TIMEZONE) {
            return Ok(ClockZone::Local);
        }
        timezone
            .parse::<Tz>()
            .map(ClockZone::Named)
            .map_err(|error| InfraError::InvalidConfig(format!("timezone '{timezone}': {error}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub enabled: bool,
    pub lead_time_minutes: u32,
    pub poll_interval_seconds: u64,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            lead_time_minutes: 2,
            poll_interval_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSettings {
    pub timeline_start_hour: u32,
    pub timeline_end_hour: u32,
    pub pixels_per_minute: u32,
    pub default_block_minutes: u32,
    pub workday_minutes: u32,
    pub autosave_interval_seconds: u64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        let timeline = TimelineScale::default();
        Self {
            timeline_start_hour: timeline.start_hour,
            timeline_end_hour: timeline.end_hour,
            pixels_per_minute: timeline.pixels_per_minute,
            default_block_minutes: timeline.default_block_minutes,
            workday_minutes: DEFAULT_WORKDAY_MINUTES,
            autosave_interval_seconds: 300,
        }
    }
}

impl PlannerSettings {
    pub fn timeline(&self) -> TimelineScale {
        TimelineScale {
            start_hour: self.timeline_start_hour,
            end_hour: self.timeline_end_hour,
            pixels_per_minute: self.pixels_per_minute,
            default_block_minutes: self.default_block_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigBundle {
    pub app: AppSettings,
    pub reminders: ReminderSettings,
    pub planner: PlannerSettings,
}

impl ConfigBundle {
    pub fn validate(&self) -> Result<(), InfraError> {
        self.app.clock_zone()?;
        if self.app.data_dir.trim().is_empty() {
            return Err(InfraError::InvalidConfig("dataDir must not be empty".to_string()));
        }
        if self.reminders.poll_interval_seconds == 0 {
            return Err(InfraError::InvalidConfig(
                "pollIntervalSeconds must be > 0".to_string(),
            ));
        }
        self.planner
            .timeline()
            .validate()
            .map_err(InfraError::InvalidConfig)?;
        if self.planner.workday_minutes == 0 {
            return Err(InfraError::InvalidConfig(
                "workdayMinutes must be > 0".to_string(),
            ));
        }
        if self.planner.autosave_interval_seconds == 0 {
            return Err(InfraError::InvalidConfig(
                "autosaveIntervalSeconds must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn with_schema<T: Serialize>(settings: &T) -> Result<serde_json::Value, InfraError> {
    let mut value = serde_json::to_value(settings)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("schema".to_string(), serde_json::json!(1));
    }
    Ok(value)
}

fn default_files() -> Result<HashMap<&'static str, serde_json::Value>, InfraError> {
    Ok(HashMap::from([
        (APP_JSON, with_schema(&AppSettings::default())?),
        (REMINDERS_JSON, with_schema(&ReminderSettings::default())?),
        (PLANNER_JSON, with_schema(&PlannerSettings::default())?),
    ]))
}

pub fn ensure_default_configs(config_dir: &Path) -> Result<(), InfraError> {
    for (name, value) in default_files()? {
        let path = config_dir.join(name);
        if !path.exists() {
            let formatted = serde_json::to_string_pretty(&value)?;
            fs::write(path, format!("{formatted}\n"))?;
        }
    }
    Ok(())
}

/// Rewrites `reminders.json` with `settings`.
pub fn save_reminder_settings(config_dir: &Path, settings: &ReminderSettings) -> Result<(), InfraError> {
    let formatted = serde_json::to_string_pretty(&with_schema(settings)?)?;
    fs::write(config_dir.join(REMINDERS_JSON), format!("{formatted}\n"))?;
    Ok(())
}

fn read_config(path: &Path) -> Result<serde_json::Value, InfraError> {
    let raw = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let schema = parsed
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| InfraError::InvalidConfig(format!("missing schema in {}", path.display())))?;
    if schema != 1 {
        return Err(InfraError::InvalidConfig(format!(
            "unsupported schema {} in {}",
            schema,
            path.display()
        )));
    }
    Ok(parsed)
}

/// Reads one settings file, filling absent keys from `T::default()`.
fn read_settings<T>(path: &Path) -> Result<T, InfraError>
where
    T: Serialize + DeserializeOwned + Default,
{
    let mut merged = serde_json::to_value(T::default())?;
    let parsed = read_config(path)?;
    if let (Some(target), Some(source)) = (merged.as_object_mut(), parsed.as_object()) {
        for (key, value) in source {
            if key != "schema" && target.contains_key(key) {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    serde_json::from_value(merged).map_err(|error| {
        InfraError::InvalidConfig(format!("invalid settings in {}: {error}", path.display()))
    })
}

pub fn load_configs(config_dir: &Path) -> Result<ConfigBundle, InfraError> {
    let bundle = ConfigBundle {
        app: read_settings(&config_dir.join(APP_JSON))?,
        reminders: read_settings(&config_dir.join(REMINDERS_JSON))?,
        planner: read_settings(&config_dir.join(PLANNER_JSON))?,
    };
    bundle.validate()?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_written_once_and_load_back() {
        let dir = TempDir::new().expect("temp dir");
        ensure_default_configs(dir.path()).expect("write defaults");

        let loaded = load_configs(dir.path()).expect("load configs");
        assert_eq!(loaded, ConfigBundle::default());
        assert_eq!(loaded.reminders.lead_time_minutes, 2);
        assert_eq!(loaded.reminders.poll_interval_seconds, 60);
        assert_eq!(loaded.planner.workday_minutes, 480);
        assert_eq!(loaded.app.clock_zone().expect("zone"), ClockZone::Local);
    }

    #[test]
    fn existing_files_are_not_overwritten_and_missing_keys_default() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join(REMINDERS_JSON),
            r#"{ "schema": 1, "leadTimeMinutes": 5 }"#,
        )
        .expect("seed reminders");
        ensure_default_configs(dir.path()).expect("write defaults");

        let loaded = load_configs(dir.path()).expect("load configs");
        assert_eq!(loaded.reminders.lead_time_minutes, 5);
        assert!(loaded.reminders.enabled);
        assert_eq!(loaded.reminders.poll_interval_seconds, 60);
    }

    #[test]
    fn unsupported_schema_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        ensure_default_configs(dir.path()).expect("write defaults");
        fs::write(dir.path().join(PLANNER_JSON), r#"{ "schema": 2 }"#).expect("seed planner");

        match load_configs(dir.path()) {
            Err(InfraError::InvalidConfig(message)) => assert!(message.contains("schema 2")),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn named_timezone_is_parsed_and_bad_one_rejected() {
        let mut settings = AppSettings {
            timezone: "Europe/Moscow".to_string(),
            ..AppSettings::default()
        };
        assert_eq!(
            settings.clock_zone().expect("zone"),
            ClockZone::Named(chrono_tz::Europe::Moscow)
        );

        settings.timezone = "Mars/Olympus".to_string();
        assert!(settings.clock_zone().is_err());
    }

    #[test]
    fn zero_poll_interval_fails_validation() {
        let mut bundle = ConfigBundle::default();
        bundle.reminders.poll_interval_seconds = 0;
        assert!(matches!(bundle.validate(), Err(InfraError::InvalidConfig(_))));
    }

    #[test]
    fn saved_reminder_settings_load_back() {
        let dir = TempDir::new().expect("temp dir");
        ensure_default_configs(dir.path()).expect("write defaults");
        let settings = ReminderSettings {
            enabled: false,
            ..ReminderSettings::default()
        };
        save_reminder_settings(dir.path(), &settings).expect("save reminders");

        let loaded = load_configs(dir.path()).expect("load configs");
        assert_eq!(loaded.reminders, settings);
    }
}
