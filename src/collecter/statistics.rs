use std::collections::BTreeMap;

use hifitime::prelude::Duration;

use crate::error::Error;

/// Run [Statistics], reported on exit
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statistics {
    /// Records decoded
    pub records: usize,
    /// Epochs written
    pub epochs: usize,
    /// Dropped messages, per reason
    pub dropped: BTreeMap<&'static str, usize>,
    /// Satellite sets never released
    pub abandoned_sets: usize,
    /// Measurements replaced within a set
    pub duplicates: usize,
    pub uptime: Duration,
}

impl Statistics {
    /// Accounts for one dropped message
    pub fn drop_message(&mut self, error: &Error) {
        let reason = match error {
            Error::Checksum { .. } => "checksum",
            Error::InvalidPrn(_) => "invalid prn",
            Error::MalformedMessage { .. } => "malformed",
            Error::UnknownMessage(_) => "unknown type",
            _ => "other",
        };

        *self.dropped.entry(reason).or_insert(0) += 1;
    }

    /// Total number of dropped messages
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "run time: {} - {} records - {} epochs written - {} dropped messages",
            self.uptime,
            self.records,
            self.epochs,
            self.total_dropped()
        )?;

        for (reason, count) in self.dropped.iter() {
            write!(f, " ({}: {})", reason, count)?;
        }

        if self.abandoned_sets > 0 {
            write!(f, " - {} abandoned sets", self.abandoned_sets)?;
        }

        if self.duplicates > 0 {
            write!(f, " - {} duplicates", self.duplicates)?;
        }

        Ok(())
    }
}
