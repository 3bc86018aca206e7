use std::{fmt, time::Duration};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info_span, Instrument};

/// How often the page clock is refreshed in production.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Wall-clock time formatted for the page footer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    /// `09:05:03 PM`
    pub time: String,
    /// `FRIDAY, OCTOBER 16, 2026`
    pub date: String,
}

impl ClockReading {
    pub fn from_datetime<Tz>(at: &DateTime<Tz>) -> ClockReading
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        ClockReading {
            time: at.format("%I:%M:%S %p").to_string().to_uppercase(),
            date: at.format("%A, %B %-d, %Y").to_string().to_uppercase(),
        }
    }

    pub fn now() -> ClockReading {
        ClockReading::from_datetime(&Local::now())
    }
}

/// A periodic task pushing `ClockReading`s into a channel.
///
/// The first reading is sent right away.  The task stops when `stop` is
/// called, when the `Clock` is dropped, or when the receiver goes away, so
/// tearing down the owning view is enough to stop it.
#[derive(Debug)]
pub struct Clock {
    handle: JoinHandle<()>,
}

impl Clock {
    /// `period` must be non-zero.
    pub fn start(period: Duration, sink: mpsc::Sender<ClockReading>) -> Clock {
        debug_assert!(!period.is_zero(), "clock period must be non-zero");
        let handle = tokio::spawn(
            async move {
                let mut ticker = interval(period);
                // A stalled runtime shouldn't produce a burst of stale times.
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    if sink.send(ClockReading::now()).await.is_err() {
                        debug!("clock receiver gone, stopping");
                        break;
                    }
                }
            }
            .instrument(info_span!("clock")),
        );
        Clock { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
