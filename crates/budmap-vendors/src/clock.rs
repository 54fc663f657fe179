use budmap_core::DayOfWeek;
use chrono::{DateTime, Datelike, Local, Utc};

/// Source of "now" for check-in timestamps and "today" for daily deals.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The current day of the week where the vendors are.
    fn today(&self) -> DayOfWeek;
}

/// Wall clock. `today` uses the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> DayOfWeek {
        Local::now().weekday().into()
    }
}

/// A clock stopped at a given instant and weekday.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub today: DayOfWeek,
}

impl FixedClock {
    /// Stopped at `now`, with `today` taken from its UTC weekday.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            today: now.weekday().into(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> DayOfWeek {
        self.today
    }
}
