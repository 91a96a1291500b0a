//! Daily refresh scheduler.
//!
//! Fires a full refresh once per day at a fixed wall-clock time in a fixed
//! timezone. A time skipped by a daylight-saving transition fires the next
//! day; a repeated one fires at its first occurrence. Manual refreshes go straight to [`CacheStore::refresh`]; the
//! scheduler does not coordinate with them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;

use crate::cache::CacheStore;
use crate::config::AppConfig;
use crate::error::Error;

/// A fixed local time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    time: NaiveTime,
    tz: Tz,
}

impl DailyTrigger {
    pub fn new(hour: u32, minute: u32, tz: Tz) -> Result<Self, Error> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| Error::Schedule(format!("invalid refresh time {hour:02}:{minute:02}")))?;
        Ok(Self { time, tz })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(config.refresh_hour, config.refresh_minute, config.tz())
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// First firing instant strictly after `instant`.
    pub fn next_after(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        let today = instant.with_timezone(&self.tz).date_naive();

        // At most one of any three consecutive days can lose the trigger time to a DST gap.
        today
            .iter_days()
            .take(3)
            .filter_map(|day| self.tz.from_local_datetime(&day.and_time(self.time)).earliest())
            .find(|fire| fire.with_timezone(&Utc) > instant)
            .map(|fire| fire.fixed_offset())
            .unwrap_or_else(|| (instant + TimeDelta::days(1)).with_timezone(&self.tz).fixed_offset())
    }
}

/// Clears the liveness flag when the scheduler task ends or is aborted.
struct RunningGuard(Arc<AtomicBool>);

impl RunningGuard {
    fn new(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Background task refreshing the cache once a day.
pub struct RefreshScheduler {
    store: Arc<CacheStore>,
    trigger: DailyTrigger,
}

impl RefreshScheduler {
    pub fn new(store: Arc<CacheStore>, trigger: DailyTrigger) -> Self {
        Self { store, trigger }
    }

    /// Start the scheduler on the current tokio runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let running = Arc::new(AtomicBool::new(true));
        let trigger = self.trigger;
        let task = tokio::spawn(Self::run(self.store, trigger, Arc::clone(&running)));
        SchedulerHandle { running, trigger, task }
    }

    async fn run(store: Arc<CacheStore>, trigger: DailyTrigger, running: Arc<AtomicBool>) {
        let _guard = RunningGuard::new(running);
        let mut after = Utc::now();

        loop {
            let next = trigger.next_after(after);
            let wait = (next.with_timezone(&Utc) - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(next = %next.to_rfc3339(), wait_secs = wait.as_secs(), "next scheduled trend refresh");

            tokio::time::sleep(wait).await;
            store.refresh().await;
            after = next.with_timezone(&Utc);
        }
    }
}

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    running: Arc<AtomicBool>,
    trigger: DailyTrigger,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Whether the background task is still alive.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    /// Next time the scheduler will fire.
    pub fn next_update(&self) -> DateTime<FixedOffset> {
        self.trigger.next_after(Utc::now())
    }

    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
