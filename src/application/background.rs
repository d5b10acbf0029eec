use crate::application::commands::{
    autosave_impl, reload_if_changed_impl, tick_reminders_impl, AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Polls the reminder scheduler every `period`, reloading the open day first
/// when another process saved it. The first poll runs immediately.
pub fn spawn_reminder_loop(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(period_secs = period.as_secs_f64(), "reminder loop started");
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            if let Err(err) = reload_if_changed_impl(&state) {
                error!("reload before reminder tick failed: {err}");
                state.log_error("reload_day", &err.to_string());
            }
            match tick_reminders_impl(&state) {
                Ok(fired) if !fired.is_empty() => debug!(count = fired.len(), "reminders fired"),
                Ok(_) => {}
                Err(err) => {
                    error!("reminder tick failed: {err}");
                    state.log_error("tick_reminders", &err.to_string());
                }
            }
        }
    })
}

pub fn spawn_autosave_loop(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(period_secs = period.as_secs_f64(), "autosave loop started");
        let mut interval = tokio::time::interval(period);
        // Skip the immediate first tick; nothing has changed yet.
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(err) = autosave_impl(&state) {
                error!("autosave failed: {err}");
                state.log_error("autosave", &err.to_string());
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::{
        create_block_impl, list_saved_dates_impl, open_day_impl, save_day_impl,
    };
    use crate::application::reminders::ReminderEvent;
    use crate::infrastructure::clock::fixed_clock;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn state_at(
        dir: &TempDir,
        hour: u32,
        minute: u32,
    ) -> (Arc<AppState>, mpsc::UnboundedReceiver<ReminderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let now = NaiveDate::from_ymd_opt(2026, 2, 16)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid datetime");
        let state = AppState::new(dir.path().to_path_buf(), tx)
            .expect("initialize app state")
            .with_now_provider(fixed_clock(now));
        open_day_impl(&state, Some("2026-02-16".to_string())).expect("open day");
        (Arc::new(state), rx)
    }

    #[tokio::test]
    async fn reminder_loop_delivers_due_reminders() {
        let dir = TempDir::new().expect("temp dir");
        let (state, mut rx) = state_at(&dir, 8, 58);
        create_block_impl(
            &state,
            "09:00".to_string(),
            "10:30".to_string(),
            "Focus work".to_string(),
            None,
            None,
        )
        .expect("create block");

        let handle = spawn_reminder_loop(state.clone(), Duration::from_millis(10));
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("reminder within timeout")
            .expect("channel open");
        handle.abort();

        assert_eq!(event.title, "Focus work");
        assert_eq!(event.minutes_remaining, 0);
    }

    #[tokio::test]
    async fn autosave_loop_persists_non_empty_day() {
        let dir = TempDir::new().expect("temp dir");
        let (state, _rx) = state_at(&dir, 8, 0);
        create_block_impl(
            &state,
            "09:00".to_string(),
            "10:00".to_string(),
            "Plan".to_string(),
            None,
            None,
        )
        .expect("create block");

        let handle = spawn_autosave_loop(state.clone(), Duration::from_millis(10));
        let saved = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if !list_saved_dates_impl(&state).expect("dates").is_empty() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        handle.abort();

        assert!(saved.is_ok());
    }

    #[tokio::test]
    async fn reminder_loop_picks_up_blocks_saved_elsewhere() {
        let dir = TempDir::new().expect("temp dir");
        let (watcher, mut rx) = state_at(&dir, 8, 58);
        let handle = spawn_reminder_loop(watcher.clone(), Duration::from_millis(10));

        let (other, _other_rx) = state_at(&dir, 8, 58);
        create_block_impl(
            &other,
            "09:00".to_string(),
            "10:00".to_string(),
            "Added elsewhere".to_string(),
            None,
            None,
        )
        .expect("create block");
        save_day_impl(&other).expect("save");

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("reminder within timeout")
            .expect("channel open");
        handle.abort();

        assert_eq!(event.title, "Added elsewhere");
    }
}
