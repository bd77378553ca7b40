//! Lock loss indicators and signal strength classes
use bitflags::bitflags;

bitflags! {
    /// Loss of Lock Indication, as defined by RINEX.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct LliFlags: u8 {
        /// Lock lost since previous observation, cycle slip possible
        const LOCK_LOSS = 0x01;
        /// Opposite wavelength factor
        const HALF_CYCLE_SLIP = 0x02;
        /// Observation made under anti spoofing
        const UNDER_ANTI_SPOOFING = 0x04;
    }
}

/// Receiver warning bits, per signal.
pub mod warning {
    /// Carrier phase questionable
    pub const PHASE_QUESTIONABLE: u8 = 4;
    /// Z tracking mode (P code under anti spoofing)
    pub const Z_TRACKING: u8 = 32;
    /// Possible cycle slip
    pub const CYCLE_SLIP: u8 = 64;
}

/// Good/bad status: measurement not available
pub const GOODBAD_NO_DATA: u8 = 0;

impl LliFlags {
    /// Derives the [LliFlags] from the receiver warning bitfield
    /// and the good/bad status. First match wins.
    pub fn from_status(warning: u8, goodbad: u8) -> Self {
        if goodbad == GOODBAD_NO_DATA {
            Self::LOCK_LOSS
        } else if warning >= warning::CYCLE_SLIP {
            Self::LOCK_LOSS
        } else if warning > warning::Z_TRACKING {
            Self::LOCK_LOSS | Self::UNDER_ANTI_SPOOFING
        } else if warning == warning::Z_TRACKING {
            Self::UNDER_ANTI_SPOOFING
        } else if warning >= warning::PHASE_QUESTIONABLE {
            Self::LOCK_LOSS
        } else {
            Self::empty()
        }
    }
}

/// Signal strength class table: ascending thresholds,
/// a value below the first one is class 1, each reached threshold
/// adds one class, up to 9.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalClassTable {
    thresholds: Vec<f64>,
}

/// The receiver documentation does not match these thresholds,
/// they are empirical.
pub const DEFAULT_SNR_THRESHOLDS: [f64; 8] =
    [100.0, 115.0, 130.0, 145.0, 160.0, 175.0, 190.0, 205.0];

impl Default for SignalClassTable {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_SNR_THRESHOLDS.to_vec(),
        }
    }
}

impl SignalClassTable {
    /// Builds a new table. Thresholds must be ascending
    /// and there can't be more than 8 of them.
    pub fn new(thresholds: &[f64]) -> Option<Self> {
        if thresholds.len() > 8 || thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }

        Some(Self {
            thresholds: thresholds.to_vec(),
        })
    }

    /// Signal class (1-9) of this (scaled) signal strength,
    /// 0 when unknown.
    pub fn classify(&self, strength: f64) -> u8 {
        if !strength.is_finite() {
            return 0;
        }

        let reached = self.thresholds.iter().filter(|t| strength >= **t).count();
        1 + reached as u8
    }
}
