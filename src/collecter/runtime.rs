use hifitime::prelude::{Duration, Epoch};

use crate::{
    error::Error,
    time::{Calendar, GpsTime},
};

#[derive(Debug, Copy, Clone)]
pub struct Runtime {
    pub deploy_time: Epoch,
}

impl Runtime {
    pub fn new() -> Result<Self, Error> {
        let now = Epoch::now().map_err(|e| Error::SystemTime(e.to_string()))?;

        Ok(Self {
            deploy_time: now.round(Duration::from_seconds(1.0)),
        })
    }

    /// GPS week of the deploy time, according to the system clock
    /// (leap seconds ignored).
    pub fn gps_week(&self) -> u32 {
        let (year, month, day, hour, minute, second, nanos) = self.deploy_time.to_gregorian_utc();
        let calendar = Calendar {
            year,
            month,
            day,
            hour,
            minute,
            second: second as f64 + nanos as f64 * 1.0E-9,
        };
        GpsTime::from_calendar(&calendar).week
    }

    /// Elapsed time since deployment
    pub fn uptime(&self) -> Duration {
        match Epoch::now() {
            Ok(now) => (now - self.deploy_time).round(Duration::from_seconds(1.0)),
            Err(_) => Duration::ZERO,
        }
    }
}
