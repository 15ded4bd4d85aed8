use std::time::Duration;

/// Delay between hard-drop steps.
pub const HARD_DROP_STEP: Duration = Duration::from_millis(30);
/// How long a slow or fast effect lasts.
pub const SPEED_EFFECT_DURATION: Duration = Duration::from_secs(5);
/// Delay between a column blast and the blocks disintegrating.
pub const DISINTEGRATE_DELAY: Duration = Duration::from_millis(500);
/// Pause held after the column blocks disintegrate.
pub const COLUMN_HOLD: Duration = Duration::from_millis(1000);

/// Deferred action, checked for liveness when it fires.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum ScheduledEvent {
    /// Moves piece `piece_id` one row further down.
    HardDropStep { piece_id: u64 },
    /// Restores the level-derived gravity interval.
    RevertSpeed,
    /// Clears the snapshotted `rows` of column `x`.
    Disintegrate {
        sequence: u64,
        x: usize,
        rows: Vec<usize>,
    },
    /// Ends the pause that follows a disintegration.
    ReleaseColumnHold { sequence: u64 },
}

#[derive(Debug, Clone)]
struct Entry {
    remaining: Duration,
    event: ScheduledEvent,
}

/// Timers advanced by the game loop instead of the wall clock.
///
/// ```
/// use std::time::Duration;
///
/// use orbtris_engine::{ScheduledEvent, Scheduler};
///
/// let mut scheduler = Scheduler::default();
/// scheduler.schedule(Duration::from_millis(30), ScheduledEvent::RevertSpeed);
///
/// let tick = Duration::from_secs(1) / 60;
/// assert!(scheduler.advance(tick).is_empty());
/// assert_eq!(scheduler.advance(tick), [ScheduledEvent::RevertSpeed]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn schedule(&mut self, delay: Duration, event: ScheduledEvent) {
        self.entries.push(Entry {
            remaining: delay,
            event,
        });
    }

    /// Advances every timer by `elapsed` and returns the events now due, in
    /// the order they were scheduled.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ScheduledEvent> {
        let mut due = vec![];
        self.entries.retain_mut(|entry| {
            entry.remaining = entry.remaining.saturating_sub(elapsed);
            if entry.remaining.is_zero() {
                due.push(entry.event.clone());
                return false;
            }
            true
        });
        due
    }

    /// Whether any pending event matches `f`.
    pub fn any(&self, mut f: impl FnMut(&ScheduledEvent) -> bool) -> bool {
        self.entries.iter().any(|entry| f(&entry.event))
    }

    /// Time left until the first pending event matching `f` fires.
    pub fn time_until(&self, mut f: impl FnMut(&ScheduledEvent) -> bool) -> Option<Duration> {
        self.entries
            .iter()
            .filter(|entry| f(&entry.event))
            .map(|entry| entry.remaining)
            .min()
    }

    /// Drops every pending event matching `f`.
    pub fn cancel(&mut self, mut f: impl FnMut(&ScheduledEvent) -> bool) {
        self.entries.retain(|entry| !f(&entry.event));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
