//! Gathers satellite measurements and navigation fixes into complete epochs
use log::{debug, info, warn};

use crate::{
    message::{
        mpc::{SatelliteMeasurement, MAX_PRN},
        pbn::NavigationFix,
        Record,
    },
    time::{fix_rollover, GpsTime, DEFAULT_ROLLOVER_THRESHOLD, SECONDS_PER_WEEK},
};

/// Sequence counter resolution [s]
const SEQUENCE_TICK_S: f64 = 0.05;

/// Epoch assembly [AssemblerSettings]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AssemblerSettings {
    /// Broadcast week numbers below this value have rolled over
    pub rollover_threshold: u32,

    /// Only release an epoch when the time of week is non zero,
    /// which also drops an epoch at the exact start of week.
    pub strict_tow_gate: bool,
}

impl Default for AssemblerSettings {
    fn default() -> Self {
        Self {
            rollover_threshold: DEFAULT_ROLLOVER_THRESHOLD,
            strict_tow_gate: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    /// Navigation fixes are ignored until a satellite measurement is received
    AwaitingFirstMeasurement,
    CollectingSatellites,
    /// Transient: epoch is being released
    EpochReady,
}

/// Current GPS time knowledge
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct GpsWeekState {
    /// 0 until known
    pub week: u32,
    /// Time of week of the latest fix, zeroed once released
    pub tow: f64,
    /// Time of week of the latest fix, never zeroed
    pub last_tow: f64,
}

/// Complete observation epoch
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationEpoch {
    /// Epoch time, from the navigation fix
    pub time: GpsTime,
    pub fix: NavigationFix,
    /// Indexed by PRN - 1
    slots: [Option<SatelliteMeasurement>; MAX_PRN as usize],
}

impl ObservationEpoch {
    /// Satellite measurements, in ascending PRN order
    pub fn satellites(&self) -> impl Iterator<Item = &SatelliteMeasurement> + '_ {
        self.slots.iter().flatten()
    }

    pub fn satellite(&self, prn: u8) -> Option<&SatelliteMeasurement> {
        self.slots.get(prn.checked_sub(1)? as usize)?.as_ref()
    }

    pub fn len(&self) -> usize {
        self.satellites().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn empty_slots() -> [Option<SatelliteMeasurement>; MAX_PRN as usize] {
    std::array::from_fn(|_| None)
}

/// [Assembler] is fed [Record]s in arrival order and releases an
/// [ObservationEpoch] once a satellite set is complete and a navigation
/// fix for it has been received.
pub struct Assembler {
    settings: AssemblerSettings,
    state: State,
    gps: GpsWeekState,
    slots: [Option<SatelliteMeasurement>; MAX_PRN as usize],
    /// Sequence counter of the satellite set in progress
    sequence: Option<u16>,
    /// Satellite set is complete
    closed: bool,
    fix: Option<NavigationFix>,
    /// Fix received since the latest release
    fresh_fix: bool,
    first_observation: Option<GpsTime>,
    abandoned_sets: usize,
    duplicates: usize,
}

impl Assembler {
    pub fn new(settings: AssemblerSettings) -> Self {
        Self {
            settings,
            state: State::AwaitingFirstMeasurement,
            gps: GpsWeekState::default(),
            slots: empty_slots(),
            sequence: None,
            closed: false,
            fix: None,
            fresh_fix: false,
            first_observation: None,
            abandoned_sets: 0,
            duplicates: 0,
        }
    }

    /// Defines the GPS week, from a broadcast (possibly rolled over) week number.
    pub fn set_week(&mut self, raw_week: u32) {
        let week = fix_rollover(raw_week, self.settings.rollover_threshold);
        if week != raw_week {
            info!("gps week {} corrected to {}", raw_week, week);
        }
        self.gps.week = week;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn week_state(&self) -> GpsWeekState {
        self.gps
    }

    /// Time of the first navigation fix of this session
    pub fn first_observation(&self) -> Option<GpsTime> {
        self.first_observation
    }

    /// Number of incomplete satellite sets that were dropped
    pub fn abandoned_sets(&self) -> usize {
        self.abandoned_sets
    }

    /// Number of satellite records that replaced an earlier one
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Processes a new [Record], returns an [ObservationEpoch] when one is complete.
    pub fn push(&mut self, record: Record) -> Option<ObservationEpoch> {
        match record {
            Record::Satellite(mpc) => self.push_satellite(mpc),
            Record::Navigation(fix) => self.push_fix(fix),
            Record::Ignored(tag) => debug!("ignored {} message", tag),
        }

        self.drop_stale_set();

        if self.is_ready() {
            self.state = State::EpochReady;
            self.release()
        } else {
            None
        }
    }

    fn push_satellite(&mut self, mpc: SatelliteMeasurement) {
        if let Some(sequence) = self.sequence {
            if sequence != mpc.sequence {
                let count = self.slots.iter().flatten().count();
                if self.closed {
                    warn!(
                        "satellite set seq={} ({} sv) never released: dropped",
                        sequence, count
                    );
                } else {
                    warn!(
                        "incomplete satellite set seq={} ({} sv) abandoned",
                        sequence, count
                    );
                }
                self.abandoned_sets += 1;
                self.clear_set();
            }
        }

        debug!("{}", mpc);

        let slot = &mut self.slots[(mpc.prn - 1) as usize];
        if slot.is_some() {
            warn!("{} duplicate measurement replaces previous one", mpc.sv());
            self.duplicates += 1;
        }

        self.sequence = Some(mpc.sequence);

        if mpc.is_last() {
            self.closed = true;
        }

        *slot = Some(mpc);
        self.state = State::CollectingSatellites;
    }

    fn push_fix(&mut self, fix: NavigationFix) {
        if self.state == State::AwaitingFirstMeasurement {
            debug!("navigation fix ignored: no measurement yet");
            return;
        }

        debug!("{}", fix);

        if self.gps.week > 0 && self.gps.last_tow - fix.tow > SECONDS_PER_WEEK / 2.0 {
            self.gps.week += 1;
            info!("new gps week {}", self.gps.week);
        }

        self.gps.tow = fix.tow;
        self.gps.last_tow = fix.tow;

        if self.first_observation.is_none() && self.gps.week > 0 {
            let t = GpsTime::new(self.gps.week, fix.tow);
            info!("first observation: {}", t);
            self.first_observation = Some(t);
        }

        self.fix = Some(fix);
        self.fresh_fix = true;
    }

    /// Offset [s] of the satellite set sequence counter, with respect
    /// to the latest navigation fix.
    fn set_offset(&self) -> Option<f64> {
        let sequence = self.sequence?;
        let fix = GpsTime::new(self.gps.week, self.fix.as_ref()?.tow);
        let tagged = fix.resolve_sequence(sequence);
        Some((tagged.to_epoch() - fix.to_epoch()).to_seconds())
    }

    /// A complete satellite set that is older than a fresh fix
    /// will never receive its own fix.
    fn drop_stale_set(&mut self) {
        if !self.closed || !self.fresh_fix {
            return;
        }

        let offset = match self.set_offset() {
            Some(offset) => offset,
            None => return,
        };

        if offset < -SEQUENCE_TICK_S {
            warn!(
                "satellite set seq={} precedes navigation fix by {:.2}s: dropped",
                self.sequence.unwrap_or_default(),
                -offset
            );
            self.abandoned_sets += 1;
            self.clear_set();
        }
    }

    fn is_ready(&self) -> bool {
        if !self.closed || !self.fresh_fix || self.gps.week == 0 {
            return false;
        }

        match self.set_offset() {
            Some(offset) if offset.abs() <= SEQUENCE_TICK_S => {},
            _ => return false,
        }

        !self.settings.strict_tow_gate || self.gps.tow != 0.0
    }

    fn clear_set(&mut self) {
        self.slots = empty_slots();
        self.sequence = None;
        self.closed = false;
    }

    fn release(&mut self) -> Option<ObservationEpoch> {
        let fix = self.fix.clone()?;
        let time = GpsTime::new(self.gps.week, self.gps.tow);

        let epoch = ObservationEpoch {
            time,
            fix,
            slots: std::mem::replace(&mut self.slots, empty_slots()),
        };

        self.sequence = None;
        self.closed = false;
        self.fresh_fix = false;
        self.gps.tow = 0.0;
        self.state = State::CollectingSatellites;

        Some(epoch)
    }
}
