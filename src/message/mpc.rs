//! MPC: satellite measurements (MBN stream)
use gnss::prelude::{Constellation, SV};

use crate::{
    error::Error,
    message::{
        be_f64, be_i32, be_u16,
        checksum::{verify, Checksum},
        flags::LliFlags,
        settings::DecoderSettings,
    },
};

/// Speed of light [km/s]
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Carrier phase wraps at this many cycles
pub const PHASE_WRAP_CYCLES: f64 = 1.0E10;

/// Beyond this number of corrections, the phase is discarded
pub const MAX_PHASE_CORRECTIONS: u32 = 10;

/// Highest valid PRN
pub const MAX_PRN: u8 = 32;

const HEADER_SIZE: usize = 7;
const BAND_SIZE: usize = 29;

/// Observed signals, one block each in every MPC message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Band {
    /// C/A code on L1
    CA,
    /// P code on L1
    L1,
    /// P code on L2
    L2,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::CA, Band::L1, Band::L2];

    /// Block index within the message
    pub const fn index(&self) -> usize {
        match self {
            Self::CA => 0,
            Self::L1 => 1,
            Self::L2 => 2,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CA => write!(f, "CA"),
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

/// Quality indicators attached to one [BandObservation].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QualityFlags {
    /// Applies to range and doppler
    pub lli: LliFlags,
    /// Applies to carrier phase: [QualityFlags::lli] and
    /// [LliFlags::LOCK_LOSS] when the phase had to be unwrapped.
    pub phase_lli: LliFlags,
    /// Signal class (1-9), 0 when unknown
    pub ssi: u8,
}

/// Carrier phase, once unwrapped
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UnwrappedPhase {
    /// Phase [cycles]
    pub phase: f64,
    /// Number of corrections applied
    pub corrections: u32,
    /// Phase could not be unwrapped and was forced to 0
    pub forced: bool,
}

/// Brings a raw carrier phase back within ]-1E10; 1E10[ cycles.
pub fn unwrap_phase(raw: f64) -> UnwrappedPhase {
    if !raw.is_finite() {
        return UnwrappedPhase {
            phase: 0.0,
            corrections: 0,
            forced: true,
        };
    }

    let mut phase = raw;
    let mut corrections = 0;

    while phase >= PHASE_WRAP_CYCLES || phase <= -PHASE_WRAP_CYCLES {
        if corrections == MAX_PHASE_CORRECTIONS {
            return UnwrappedPhase {
                phase: 0.0,
                corrections,
                forced: true,
            };
        }

        if phase > 0.0 {
            phase -= PHASE_WRAP_CYCLES;
        } else {
            phase += PHASE_WRAP_CYCLES;
        }

        corrections += 1;
    }

    UnwrappedPhase {
        phase,
        corrections,
        forced: false,
    }
}

/// Single band measurement
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BandObservation {
    /// Receiver warning bitfield
    pub warning: u8,
    /// Good/bad status
    pub goodbad: u8,
    /// Scaled signal strength
    pub snr: f64,
    /// Tracking quality indicator
    pub quality: u8,
    /// Carrier phase [cycles]
    pub phase: f64,
    /// Code range [m]
    pub range: f64,
    /// Doppler [Hz]
    pub doppler: f64,
    /// Smoothing correction (raw)
    pub correction: i32,
    pub flags: QualityFlags,
}

impl BandObservation {
    /// Decodes one 29 byte band block
    fn decode(block: &[u8], settings: &DecoderSettings) -> Self {
        let warning = block[0];
        let goodbad = block[1];
        let snr = block[3] as f64 / settings.snr_scale;
        let quality = block[4];

        let lli = LliFlags::from_status(warning, goodbad);

        let unwrapped = unwrap_phase(be_f64(&block[5..13]));

        let mut phase_lli = lli;
        if unwrapped.corrections > 0 || unwrapped.forced {
            phase_lli |= LliFlags::LOCK_LOSS;
        }

        Self {
            warning,
            goodbad,
            snr,
            quality,
            phase: unwrapped.phase,
            range: be_f64(&block[13..21]) * SPEED_OF_LIGHT_KM_S * 1000.0,
            doppler: be_i32(&block[21..25]) as f64 / 10_000.0,
            correction: be_i32(&block[25..29]),
            flags: QualityFlags {
                lli,
                phase_lli,
                ssi: settings.snr_classes.classify(snr),
            },
        }
    }
}

/// Decoded MPC message: one satellite, three bands.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteMeasurement {
    /// Sequence counter: 50 ms units, modulo 30'
    pub sequence: u16,
    /// Remaining messages in this epoch, 0 on the last one
    pub left: u8,
    pub prn: u8,
    /// Elevation [°]
    pub elevation: u8,
    /// Azimuth [°]
    pub azimuth: u16,
    /// Receiver channel
    pub channel: u8,
    /// Indexed by [Band::index]
    pub bands: [BandObservation; 3],
}

impl SatelliteMeasurement {
    /// Payload size (without checksum)
    pub const SIZE: usize = HEADER_SIZE + 3 * BAND_SIZE;

    pub const CHECKSUM: Checksum = Checksum::Xor8;

    /// Decodes an MPC payload, checksum verification included.
    pub fn decode(
        payload: &[u8],
        checksum: &[u8],
        settings: &DecoderSettings,
    ) -> Result<Self, Error> {
        if payload.len() != Self::SIZE || checksum.len() != Self::CHECKSUM.size() {
            return Err(Error::MalformedMessage {
                kind: "MPC".to_string(),
                size: payload.len() + checksum.len(),
            });
        }

        if !verify(payload, checksum) {
            return Err(Error::Checksum {
                kind: "MPC".to_string(),
            });
        }

        let prn = payload[3];
        if prn == 0 || prn > MAX_PRN {
            return Err(Error::InvalidPrn(prn));
        }

        let band = |band: Band| {
            let offset = HEADER_SIZE + band.index() * BAND_SIZE;
            BandObservation::decode(&payload[offset..offset + BAND_SIZE], settings)
        };

        Ok(Self {
            sequence: be_u16(&payload[0..2]),
            left: payload[2],
            prn,
            elevation: payload[4],
            azimuth: payload[5] as u16 * 2,
            channel: payload[6],
            bands: Band::ALL.map(band),
        })
    }

    /// Last message of this epoch
    pub fn is_last(&self) -> bool {
        self.left == 0
    }

    pub fn band(&self, band: Band) -> &BandObservation {
        &self.bands[band.index()]
    }

    pub fn sv(&self) -> SV {
        SV::new(Constellation::GPS, self.prn)
    }
}

impl std::fmt::Display for SatelliteMeasurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} seq={} left={} el={}° az={}° ch={}",
            self.sv(),
            self.sequence,
            self.left,
            self.elevation,
            self.azimuth,
            self.channel
        )?;
        for band in Band::ALL {
            let obs = self.band(band);
            write!(
                f,
                " {}(pr={:.3} cp={:.3} dop={:.4} snr={})",
                band, obs.range, obs.phase, obs.doppler, obs.snr
            )?;
        }
        Ok(())
    }
}
