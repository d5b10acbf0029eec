use crate::domain::models::{BlockId, TimeBlock};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const DEFAULT_LEAD_TIME_MINUTES: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderEvent {
    pub block_id: BlockId,
    pub title: String,
    pub minutes_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReminder {
    pub block_id: BlockId,
    pub fire_time: NaiveDateTime,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Registration {
    fire_time: NaiveDateTime,
    title: String,
}

/// Pending reminders keyed by block. Fired entries are removed; callers
/// re-register after changing a block's start or notify flag.
#[derive(Debug)]
pub struct ReminderScheduler {
    registrations: HashMap<BlockId, Registration>,
    enabled: bool,
    lead_time: Duration,
    sink: mpsc::UnboundedSender<ReminderEvent>,
}

impl ReminderScheduler {
    pub fn new(sink: mpsc::UnboundedSender<ReminderEvent>) -> Self {
        Self {
            registrations: HashMap::new(),
            enabled: true,
            lead_time: Duration::minutes(DEFAULT_LEAD_TIME_MINUTES),
            sink,
        }
    }

    pub fn with_lead_time(mut self, lead_time: Duration) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn register(&mut self, id: BlockId, fire_time: NaiveDateTime, title: &str) {
        debug!(block_id = %id, %fire_time, "registered reminder");
        self.registrations.insert(
            id,
            Registration {
                fire_time,
                title: title.to_string(),
            },
        );
    }

    pub fn register_block(&mut self, block: &TimeBlock) {
        self.register(block.id().clone(), block.start() - self.lead_time, block.title());
    }

    pub fn unregister(&mut self, id: &BlockId) -> bool {
        let removed = self.registrations.remove(id).is_some();
        if removed {
            debug!(block_id = %id, "unregistered reminder");
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.registrations.clear();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_pending(&self, id: &BlockId) -> bool {
        self.registrations.contains_key(id)
    }

    pub fn fire_time(&self, id: &BlockId) -> Option<NaiveDateTime> {
        self.registrations.get(id).map(|registration| registration.fire_time)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn pending(&self) -> Vec<PendingReminder> {
        let mut pending = self
            .registrations
            .iter()
            .map(|(id, registration)| PendingReminder {
                block_id: id.clone(),
                fire_time: registration.fire_time,
                title: registration.title.clone(),
            })
            .collect::<Vec<_>>();
        pending.sort_by(|left, right| {
            left.fire_time
                .cmp(&right.fire_time)
                .then_with(|| left.block_id.cmp(&right.block_id))
        });
        pending
    }

    /// Fires every entry due at `now`. While disabled nothing fires and
    /// nothing is consumed.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<ReminderEvent> {
        if !self.enabled {
            return Vec::new();
        }

        let mut due = self
            .registrations
            .iter()
            .filter(|(_, registration)| registration.fire_time <= now)
            .map(|(id, registration)| (registration.fire_time, id.clone()))
            .collect::<Vec<_>>();
        due.sort();

        let mut fired = Vec::with_capacity(due.len());
        for (fire_time, id) in due {
            let Some(registration) = self.registrations.remove(&id) else {
                continue;
            };
            let event = ReminderEvent {
                block_id: id,
                title: registration.title,
                minutes_remaining: minutes_remaining(fire_time, now),
            };
            info!(block_id = %event.block_id, title = %event.title, "reminder fired");
            if self.sink.send(event.clone()).is_err() {
                warn!(block_id = %event.block_id, "reminder receiver closed; event dropped");
            }
            fired.push(event);
        }
        fired
    }
}

pub fn minutes_remaining(fire_time: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let seconds = (fire_time - now).num_seconds() as f64;
    (seconds / 60.0).round().max(0.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::BlockColor;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 16)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid datetime")
    }

    fn scheduler() -> (ReminderScheduler, mpsc::UnboundedReceiver<ReminderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ReminderScheduler::new(tx), rx)
    }

    #[test]
    fn overdue_entry_fires_once() {
        let (mut scheduler, mut rx) = scheduler();
        let now = at(9, 0, 0);
        let id = BlockId::from("blk-1");
        scheduler.register(id.clone(), now - Duration::seconds(1), "Standup");

        let fired = scheduler.tick(now);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].minutes_remaining, 0);
        assert!(!scheduler.is_pending(&id));
        assert_eq!(rx.try_recv().expect("event").title, "Standup");

        assert!(scheduler.tick(now).is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn future_entry_waits_for_its_fire_time() {
        let (mut scheduler, _rx) = scheduler();
        let id = BlockId::from("blk-1");
        scheduler.register(id.clone(), at(9, 0, 10), "Later");

        assert!(scheduler.tick(at(9, 0, 0)).is_empty());
        assert!(scheduler.is_pending(&id));
        assert_eq!(scheduler.tick(at(9, 1, 0)).len(), 1);
    }

    #[test]
    fn reregistering_overwrites_instead_of_duplicating() {
        let (mut scheduler, _rx) = scheduler();
        let id = BlockId::from("blk-1");
        scheduler.register(id.clone(), at(10, 0, 0), "First");
        scheduler.register(id.clone(), at(11, 0, 0), "Second");

        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.fire_time(&id), Some(at(11, 0, 0)));
        assert!(scheduler.tick(at(10, 30, 0)).is_empty());
        let fired = scheduler.tick(at(11, 0, 0));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].title, "Second");
    }

    #[test]
    fn disabled_scheduler_keeps_entries_until_reenabled() {
        let (mut scheduler, mut rx) = scheduler();
        let id = BlockId::from("blk-1");
        scheduler.register(id.clone(), at(9, 0, 0), "Paused");
        scheduler.set_enabled(false);

        assert!(scheduler.tick(at(9, 5, 0)).is_empty());
        assert!(scheduler.is_pending(&id));
        assert!(rx.try_recv().is_err());

        scheduler.set_enabled(true);
        let fired = scheduler.tick(at(9, 6, 0));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].minutes_remaining, 0);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn unregister_and_clear_are_idempotent() {
        let (mut scheduler, _rx) = scheduler();
        let id = BlockId::from("blk-1");
        scheduler.register(id.clone(), at(9, 0, 0), "A");
        scheduler.register(BlockId::from("blk-2"), at(9, 0, 0), "B");

        assert!(scheduler.unregister(&id));
        assert!(!scheduler.unregister(&id));
        scheduler.clear_all();
        scheduler.clear_all();
        assert!(scheduler.is_empty());
        assert!(scheduler.tick(at(10, 0, 0)).is_empty());
    }

    #[test]
    fn focus_work_block_fires_two_minutes_early() {
        let (mut scheduler, mut rx) = scheduler();
        let block = TimeBlock::new(
            at(9, 0, 0),
            at(10, 30, 0),
            "Focus work",
            BlockColor::default(),
            true,
        )
        .expect("valid block");
        scheduler.register_block(&block);
        assert_eq!(scheduler.fire_time(block.id()), Some(at(8, 58, 0)));

        assert!(scheduler.tick(at(8, 57, 59)).is_empty());
        scheduler.tick(at(8, 58, 0));
        let event = rx.try_recv().expect("event");
        assert_eq!(
            (event.title.as_str(), event.minutes_remaining),
            ("Focus work", 0)
        );
    }

    #[test]
    fn simultaneous_entries_fire_in_fire_time_order() {
        let (mut scheduler, _rx) = scheduler();
        scheduler.register(BlockId::from("b"), at(9, 1, 0), "Second");
        scheduler.register(BlockId::from("a"), at(9, 0, 0), "First");
        scheduler.register(BlockId::from("c"), at(9, 1, 0), "Third");

        let titles = scheduler
            .tick(at(9, 2, 0))
            .into_iter()
            .map(|event| event.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn closed_receiver_does_not_prevent_firing() {
        let (mut scheduler, rx) = scheduler();
        drop(rx);
        let id = BlockId::from("blk-1");
        scheduler.register(id.clone(), at(9, 0, 0), "Dropped");
        assert_eq!(scheduler.tick(at(9, 0, 0)).len(), 1);
        assert!(!scheduler.is_pending(&id));
    }

    #[test]
    fn custom_lead_time_is_applied() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = ReminderScheduler::new(tx).with_lead_time(Duration::minutes(10));
        let block = TimeBlock::new(at(9, 0, 0), at(9, 30, 0), "Call", BlockColor::default(), true)
            .expect("valid block");
        scheduler.register_block(&block);
        assert_eq!(scheduler.fire_time(block.id()), Some(at(8, 50, 0)));
    }

    #[test]
    fn minutes_remaining_rounds_and_clamps() {
        assert_eq!(minutes_remaining(at(9, 2, 0), at(9, 0, 0)), 2);
        assert_eq!(minutes_remaining(at(9, 1, 31), at(9, 0, 0)), 2);
        assert_eq!(minutes_remaining(at(9, 1, 29), at(9, 0, 0)), 1);
        assert_eq!(minutes_remaining(at(9, 0, 0), at(9, 0, 59)), 0);
    }

    proptest! {
        #[test]
        fn each_registration_fires_exactly_once(offsets in proptest::collection::vec(0i64..7200, 1..20)) {
            let (mut scheduler, _rx) = scheduler();
            let base = at(8, 0, 0);
            for (index, offset) in offsets.iter().enumerate() {
                scheduler.register(BlockId::from(format!("blk-{index}")), base + Duration::seconds(*offset), "P");
            }

            let mut fired = 0;
            let mut now = base;
            while now <= base + Duration::seconds(7200) {
                fired += scheduler.tick(now).len();
                now += Duration::seconds(60);
            }
            fired += scheduler.tick(now).len();

            prop_assert_eq!(fired, offsets.len());
            prop_assert!(scheduler.is_empty());
        }
    }
}
