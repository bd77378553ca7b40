//! GPS time: (week, time of week) to calendar and back,
//! sequence counter resolution and week rollover.
use hifitime::prelude::{Duration, Epoch, TimeScale};

pub const SECONDS_PER_WEEK: f64 = 604_800.0;

/// Receiver sequence counter wraps every 30'
pub const SEQUENCE_PERIOD_S: f64 = 1_800.0;

/// Sequence counter resolution is 50 ms
const SEQUENCE_TICKS_PER_SECOND: f64 = 20.0;

/// Broadcast week number modulus
pub const WEEK_ROLLOVER: u32 = 1024;

/// Default rollover threshold: any week below that value
/// is considered to have rolled over.
pub const DEFAULT_ROLLOVER_THRESHOLD: u32 = 2048;

/// Corrects a broadcast week number, adding [WEEK_ROLLOVER] until
/// it reaches `threshold`. Stops at the last cycle `u32` can represent.
pub fn fix_rollover(raw_week: u32, threshold: u32) -> u32 {
    let mut week = raw_week;
    while week < threshold {
        match week.checked_add(WEEK_ROLLOVER) {
            Some(next) => week = next,
            None => break,
        }
    }
    week
}

/// Calendar breakdown, expressed in GPS time (no leap seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calendar {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Seconds including fractional part
    pub second: f64,
}

/// GPS week and time of week [s]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GpsTime {
    pub week: u32,
    pub tow: f64,
}

impl std::fmt::Display for GpsTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_epoch())
    }
}

impl GpsTime {
    pub fn new(week: u32, tow: f64) -> Self {
        Self { week, tow }
    }

    /// GPS time origin (1980-01-06 00:00:00). TAI and GPST both ignore
    /// leap seconds, so TAI calendar arithmetic gives GPS calendar fields.
    fn origin() -> Epoch {
        Epoch::from_gregorian_tai_at_midnight(1980, 1, 6)
    }

    /// Converts to [Epoch] in [TimeScale::GPST]
    pub fn to_epoch(&self) -> Epoch {
        let nanos = (self.tow * 1.0E9).round().max(0.0) as u64;
        Epoch::from_time_of_week(self.week, nanos, TimeScale::GPST)
    }

    /// Calendar fields of this GPS time
    pub fn to_calendar(&self) -> Calendar {
        let t = Self::origin()
            + Duration::from_days(7.0 * self.week as f64)
            + Duration::from_seconds(self.tow);

        let (year, month, day, hour, minute, second, nanos) = t.to_gregorian_tai();

        Calendar {
            year,
            month,
            day,
            hour,
            minute,
            second: second as f64 + nanos as f64 * 1.0E-9,
        }
    }

    /// Builds [GpsTime] from calendar fields expressed in GPS time.
    pub fn from_calendar(calendar: &Calendar) -> Self {
        let whole = calendar.second.trunc();
        let nanos = ((calendar.second - whole) * 1.0E9).round() as u32;

        let t = Epoch::from_gregorian_tai(
            calendar.year,
            calendar.month,
            calendar.day,
            calendar.hour,
            calendar.minute,
            whole as u8,
            nanos,
        );

        let elapsed = (t - Self::origin()).to_seconds();
        let week = (elapsed / SECONDS_PER_WEEK).floor();

        Self {
            week: week as u32,
            tow: elapsed - week * SECONDS_PER_WEEK,
        }
    }

    /// Resolves a sequence counter (50 ms units, modulo 30') into a
    /// complete [GpsTime], using `self` as the latest known time.
    /// The candidate closest to `self` is retained, so a counter that
    /// wrapped just before (or after) the latest 30' mark resolves correctly.
    pub fn resolve_sequence(&self, seq: u16) -> Self {
        let offset = seq as f64 / SEQUENCE_TICKS_PER_SECOND;
        let base = (self.tow / SEQUENCE_PERIOD_S).floor() * SEQUENCE_PERIOD_S;

        let mut tow = base + offset;

        if tow - self.tow > SEQUENCE_PERIOD_S / 2.0 {
            tow -= SEQUENCE_PERIOD_S;
        } else if self.tow - tow > SEQUENCE_PERIOD_S / 2.0 {
            tow += SEQUENCE_PERIOD_S;
        }

        let mut week = self.week;

        if tow < 0.0 {
            tow += SECONDS_PER_WEEK;
            week = week.saturating_sub(1);
        } else if tow >= SECONDS_PER_WEEK {
            tow -= SECONDS_PER_WEEK;
            week += 1;
        }

        Self { week, tow }
    }
}
