use crate::application::background::{spawn_autosave_loop, spawn_reminder_loop};
use crate::application::commands::{
    clear_blocks_impl, create_block_at_offset_impl, create_block_impl, day_stats_impl,
    delete_block_impl, edit_block_impl, export_day_impl, import_day_impl, list_blocks_impl,
    list_saved_dates_impl, move_block_impl, new_day_impl, open_day_impl, overlapping_blocks_impl,
    pending_reminders_impl, persist_notifications_impl, resize_block_impl, save_day_impl,
    set_block_color_impl, set_notifications_enabled_impl, shutdown_impl, switch_day_impl,
    toggle_block_notify_impl, toggle_notifications_impl, AppState,
};
use crate::application::reminders::ReminderEvent;
use crate::domain::models::BlockId;
use crate::infrastructure::error::InfraError;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser)]
#[command(name = "timeblock-planner")]
#[command(about = "Plan a day as colored time blocks and get reminded before each one starts")]
pub struct Cli {
    /// Workspace directory holding config/, logs/ and saved days (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Day to operate on (YYYY-MM-DD, defaults to today)
    #[arg(short, long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a block between two times (HH:MM or YYYY-MM-DDTHH:MM)
    Add {
        title: String,
        #[arg(short, long)]
        start: String,
        #[arg(short, long)]
        end: String,
        #[arg(short, long)]
        color: Option<String>,
        #[arg(long)]
        no_notify: bool,
    },
    /// Add a default-length block at a timeline pixel offset
    Place {
        title: String,
        #[arg(long)]
        offset: i64,
        #[arg(short, long)]
        color: Option<String>,
        #[arg(long)]
        no_notify: bool,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        #[arg(long)]
        notify: Option<bool>,
    },
    Color {
        id: String,
        color: String,
    },
    ToggleNotify {
        id: String,
    },
    /// Move a block to a new start, keeping its length
    Move {
        id: String,
        start: String,
    },
    /// Drag one edge of a block ("top" or "bottom") to a new time
    Resize {
        id: String,
        edge: String,
        time: String,
    },
    Delete {
        id: String,
    },
    Clear,
    List {
        #[arg(long)]
        overlapping: Option<String>,
    },
    Stats,
    Dates,
    Reminders,
    /// Show another day, optionally saving the one given by --date first
    Switch {
        target: String,
        #[arg(long)]
        save: bool,
    },
    /// Show today, optionally saving the one given by --date first
    NewDay {
        #[arg(long)]
        save: bool,
    },
    /// Turn block reminders on or off for later `watch` runs
    Notifications {
        #[arg(value_enum)]
        mode: NotificationMode,
    },
    Export {
        path: PathBuf,
    },
    Import {
        path: PathBuf,
    },
    /// Run reminders and autosave until Ctrl-C
    Watch {
        #[arg(long)]
        muted: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NotificationMode {
    On,
    Off,
    Toggle,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "create_block",
            Commands::Place { .. } => "create_block_at_offset",
            Commands::Edit { .. } => "edit_block",
            Commands::Color { .. } => "set_block_color",
            Commands::ToggleNotify { .. } => "toggle_block_notify",
            Commands::Move { .. } => "move_block",
            Commands::Resize { .. } => "resize_block",
            Commands::Delete { .. } => "delete_block",
            Commands::Clear => "clear_blocks",
            Commands::List { .. } => "list_blocks",
            Commands::Stats => "day_stats",
            Commands::Dates => "list_saved_dates",
            Commands::Reminders => "pending_reminders",
            Commands::Switch { .. } => "switch_day",
            Commands::NewDay { .. } => "new_day",
            Commands::Notifications { .. } => "notifications",
            Commands::Export { .. } => "export_day",
            Commands::Import { .. } => "import_day",
            Commands::Watch { .. } => "watch",
        }
    }

    fn mutates_day(&self) -> bool {
        !matches!(
            self,
            Commands::List { .. }
                | Commands::Stats
                | Commands::Dates
                | Commands::Reminders
                | Commands::Switch { .. }
                | Commands::NewDay { .. }
                | Commands::Notifications { .. }
                | Commands::Export { .. }
                | Commands::Watch { .. }
        )
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), InfraError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn execute(cli: Cli) -> Result<(), InfraError> {
    let root = match cli.root {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let (reminder_tx, reminder_rx) = mpsc::unbounded_channel();
    let state = Arc::new(AppState::new(root, reminder_tx)?);

    let name = cli.command.name();
    open_day_impl(&state, cli.date).map_err(|error| state.command_error("open_day", error))?;

    let mutates = cli.command.mutates_day();
    run_command(&state, cli.command, reminder_rx)
        .await
        .map_err(|error| state.command_error(name, error))?;
    if mutates {
        save_day_impl(&state).map_err(|error| state.command_error("save_day", error))?;
    }
    Ok(())
}

async fn run_command(
    state: &Arc<AppState>,
    command: Commands,
    reminder_rx: mpsc::UnboundedReceiver<ReminderEvent>,
) -> Result<(), InfraError> {
    match command {
        Commands::Add {
            title,
            start,
            end,
            color,
            no_notify,
        } => print_json(&create_block_impl(state, start, end, title, color, Some(!no_notify))?),
        Commands::Place {
            title,
            offset,
            color,
            no_notify,
        } => print_json(&create_block_at_offset_impl(
            state,
            offset,
            title,
            color,
            Some(!no_notify),
        )?),
        Commands::Edit {
            id,
            title,
            start,
            end,
            notify,
        } => print_json(&edit_block_impl(state, id, start, end, title, notify)?),
        Commands::Color { id, color } => print_json(&set_block_color_impl(state, id, color)?),
        Commands::ToggleNotify { id } => print_json(&toggle_block_notify_impl(state, id)?),
        Commands::Move { id, start } => print_json(&move_block_impl(state, id, start)?),
        Commands::Resize { id, edge, time } => {
            print_json(&resize_block_impl(state, id, edge, time)?)
        }
        Commands::Delete { id } => {
            if !delete_block_impl(state, id.clone())? {
                return Err(InfraError::BlockNotFound(BlockId::from(id)));
            }
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Commands::Clear => print_json(&serde_json::json!({ "removed": clear_blocks_impl(state)? })),
        Commands::List { overlapping } => match overlapping {
            Some(id) => print_json(&overlapping_blocks_impl(state, id)?),
            None => print_json(&list_blocks_impl(state)?),
        },
        Commands::Stats => print_json(&day_stats_impl(state)?),
        Commands::Dates => print_json(&list_saved_dates_impl(state)?),
        Commands::Reminders => print_json(&pending_reminders_impl(state)?),
        Commands::Switch { target, save } => print_json(&switch_day_impl(state, target, save)?),
        Commands::NewDay { save } => print_json(&new_day_impl(state, save)?),
        Commands::Notifications { mode } => {
            match mode {
                NotificationMode::On => set_notifications_enabled_impl(state, true)?,
                NotificationMode::Off => set_notifications_enabled_impl(state, false)?,
                NotificationMode::Toggle => toggle_notifications_impl(state)?,
            };
            let enabled = persist_notifications_impl(state)?;
            print_json(&serde_json::json!({ "enabled": enabled }))
        }
        Commands::Export { path } => print_json(&export_day_impl(state, path)?),
        Commands::Import { path } => {
            print_json(&serde_json::json!({ "imported": import_day_impl(state, path)? }))
        }
        Commands::Watch { muted } => watch(state, muted, reminder_rx).await,
    }
}

async fn watch(
    state: &Arc<AppState>,
    muted: bool,
    mut reminder_rx: mpsc::UnboundedReceiver<ReminderEvent>,
) -> Result<(), InfraError> {
    if muted {
        set_notifications_enabled_impl(state, false)?;
    }
    let reminders = &state.config().reminders;
    let planner = &state.config().planner;
    let reminder_loop = spawn_reminder_loop(
        state.clone(),
        Duration::from_secs(reminders.poll_interval_seconds),
    );
    let autosave_loop = spawn_autosave_loop(
        state.clone(),
        Duration::from_secs(planner.autosave_interval_seconds),
    );
    info!(
        pending = pending_reminders_impl(state)?.len(),
        "watching for reminders; press Ctrl-C to stop"
    );

    loop {
        tokio::select! {
            Some(event) = reminder_rx.recv() => {
                println!("Reminder: '{}' starts in {} minutes", event.title, event.minutes_remaining);
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    reminder_loop.abort();
    autosave_loop.abort();
    if let Some(saved) = shutdown_impl(state)? {
        info!(date = %saved.date, blocks = saved.blocks, "saved on exit");
    }
    Ok(())
}
