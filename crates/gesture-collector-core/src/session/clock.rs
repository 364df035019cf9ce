use chrono::{Local, NaiveDateTime};

/// Wall-clock source for session names.
pub trait SessionClock: Send {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The system's local time zone clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl SessionClock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
