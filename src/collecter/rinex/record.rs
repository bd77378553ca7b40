//! RINEX 2.11 observation records
use std::fmt::Write;

use log::warn;

use crate::{
    collecter::assembler::ObservationEpoch,
    error::Error,
    message::{
        flags::LliFlags,
        mpc::{Band, SatelliteMeasurement},
    },
};

/// Satellites per epoch line
const SV_PER_LINE: usize = 12;

/// Observation field width, flags excluded
const OBS_WIDTH: usize = 14;

/// Continuation lines start at column 33
const CONTINUATION_INDENT: usize = 32;

/// Epoch flag: OK
const EPOCH_FLAG_OK: u8 = 0;

/// Formats an observation as F14.3, blank when it does not fit.
fn format_value(
    s: &mut String,
    sv: &SatelliteMeasurement,
    name: &str,
    value: f64,
) -> std::fmt::Result {
    let formatted = format!("{:14.3}", value);
    if value.is_finite() && formatted.len() == OBS_WIDTH {
        s.push_str(&formatted);
    } else {
        warn!("{} {}={} can't be formatted", sv.sv(), name, value);
        write!(s, "{:1$}", "", OBS_WIDTH)?;
    }
    Ok(())
}

/// Observation followed by its LLI and signal strength digits
fn format_observation(
    s: &mut String,
    sv: &SatelliteMeasurement,
    name: &str,
    value: f64,
    lli: LliFlags,
    ssi: u8,
) -> std::fmt::Result {
    format_value(s, sv, name, value)?;
    write!(s, "{}{}", lli.bits(), ssi)
}

/// Epoch line, PRN list included
fn format_epoch_line(s: &mut String, epoch: &ObservationEpoch) -> std::fmt::Result {
    let t = epoch.time.to_calendar();

    write!(
        s,
        " {:02}{:3}{:3}{:3}{:3}{:11.7}  {}{:3}",
        t.year.rem_euclid(100),
        t.month,
        t.day,
        t.hour,
        t.minute,
        t.second,
        EPOCH_FLAG_OK,
        epoch.len()
    )?;

    let prns = epoch.satellites().map(|sat| sat.prn).collect::<Vec<_>>();

    for (nth, chunk) in prns.chunks(SV_PER_LINE).enumerate() {
        if nth > 0 {
            write!(s, "\n{:1$}", "", CONTINUATION_INDENT)?;
        }
        for prn in chunk {
            write!(s, "G{:02}", prn)?;
        }
    }

    writeln!(s)
}

/// Two lines per satellite: C1 P1 P2 L1 L2, then D1 D2 S1 S2
fn format_satellite(s: &mut String, sat: &SatelliteMeasurement) -> std::fmt::Result {
    let ca = sat.band(Band::CA);
    let l1 = sat.band(Band::L1);
    let l2 = sat.band(Band::L2);

    format_observation(s, sat, "C1", ca.range, ca.flags.lli, ca.flags.ssi)?;
    format_observation(s, sat, "P1", l1.range, l1.flags.lli, l1.flags.ssi)?;
    format_observation(s, sat, "P2", l2.range, l2.flags.lli, l2.flags.ssi)?;
    format_observation(s, sat, "L1", l1.phase, l1.flags.phase_lli, l1.flags.ssi)?;
    format_observation(s, sat, "L2", l2.phase, l2.flags.phase_lli, l2.flags.ssi)?;
    writeln!(s)?;

    format_observation(s, sat, "D1", l1.doppler, l1.flags.lli, l1.flags.ssi)?;
    format_observation(s, sat, "D2", l2.doppler, l2.flags.lli, l2.flags.ssi)?;
    format_value(s, sat, "S1", l1.snr)?;
    format_value(s, sat, "S2", l2.snr)?;
    writeln!(s)
}

/// Formats a complete epoch stanza
pub fn format_epoch(epoch: &ObservationEpoch) -> Result<String, Error> {
    let mut s = String::with_capacity(64 + epoch.len() * 2 * 81);

    format_epoch_line(&mut s, epoch)?;

    for sat in epoch.satellites() {
        format_satellite(&mut s, sat)?;
    }

    Ok(s)
}

#[cfg(test)]
mod test {
    use super::format_epoch;
    use crate::{
        collecter::assembler::{Assembler, AssemblerSettings, ObservationEpoch},
        message::{
            fixture::{BandFixture, MpcFixture, PbnFixture},
            mpc::{Band, SatelliteMeasurement},
            pbn::NavigationFix,
            settings::DecoderSettings,
            Record,
        },
    };

    /// 2019-06-28 14:36:40 GPST
    const TOW: f64 = 484_600.0;

    fn satellite(prn: u8, left: u8) -> Record {
        let mut fixture = MpcFixture::new(prn);
        fixture.sequence = ((TOW % 1800.0) * 20.0) as u16;
        fixture.left = left;
        fixture.bands[1] = BandFixture {
            warning: 32,
            goodbad: 24,
            snr: 160,
            quality: 5,
            phase: 12_345_678.625 + prn as f64,
            range: 0.0712,
            doppler: -12_345_678,
            correction: 0,
        };
        fixture.bands[2].phase = 3.0E10 + 9_876_543.25;
        let (payload, crc) = fixture.payload();
        Record::Satellite(
            SatelliteMeasurement::decode(&payload, &crc, &DecoderSettings::default()).unwrap(),
        )
    }

    fn epoch(prns: &[u8]) -> ObservationEpoch {
        let mut assembler = Assembler::new(AssemblerSettings::default());
        assembler.set_week(2059);

        for (i, prn) in prns.iter().enumerate() {
            let left = (prns.len() - 1 - i) as u8;
            assert!(assembler.push(satellite(*prn, left)).is_none());
        }

        let (payload, crc) = PbnFixture::new(TOW).payload();
        let fix = NavigationFix::decode(&payload, &crc).unwrap();
        assembler.push(Record::Navigation(fix)).unwrap()
    }

    /// Parses an observation line: (value, lli, ssi) per 16 columns
    fn parse_line(line: &str) -> Vec<(Option<f64>, Option<u8>, Option<u8>)> {
        let mut fields = Vec::new();
        let mut offset = 0;
        while offset < line.len() {
            let end = (offset + 16).min(line.len());
            let field = &line[offset..end];
            let value = field[..14.min(field.len())].trim().parse::<f64>().ok();
            let lli = field.get(14..15).and_then(|c| c.parse::<u8>().ok());
            let ssi = field.get(15..16).and_then(|c| c.parse::<u8>().ok());
            fields.push((value, lli, ssi));
            offset = end;
        }
        fields
    }

    #[test]
    fn three_satellites() {
        let stanza = format_epoch(&epoch(&[14, 2, 5])).unwrap();
        let lines = stanza.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 1 + 6);
        assert_eq!(lines[0], " 19  6 28 14 36 40.0000000  0  3G02G05G14");

        for line in lines[1..].iter().step_by(2) {
            assert_eq!(line.len(), 80);
        }
        for line in lines[2..].iter().step_by(2) {
            assert_eq!(line.len(), 16 * 2 + 14 * 2);
        }
    }

    #[test]
    fn round_trip() {
        let epoch = epoch(&[2, 5, 14]);
        let stanza = format_epoch(&epoch).unwrap();
        let lines = stanza.lines().collect::<Vec<_>>();

        for (nth, sat) in epoch.satellites().enumerate() {
            let first = parse_line(lines[1 + 2 * nth]);
            let second = parse_line(lines[2 + 2 * nth]);

            let ca = sat.band(Band::CA);
            let l1 = sat.band(Band::L1);
            let l2 = sat.band(Band::L2);

            let expected = [
                (ca.range, ca.flags.lli.bits(), ca.flags.ssi),
                (l1.range, l1.flags.lli.bits(), l1.flags.ssi),
                (l2.range, l2.flags.lli.bits(), l2.flags.ssi),
                (l1.phase, l1.flags.phase_lli.bits(), l1.flags.ssi),
                (l2.phase, l2.flags.phase_lli.bits(), l2.flags.ssi),
            ];

            assert_eq!(first.len(), 5);
            for (parsed, expected) in first.iter().zip(expected.iter()) {
                assert!((parsed.0.unwrap() - expected.0).abs() < 1.0E-3);
                assert_eq!(parsed.1, Some(expected.1));
                assert_eq!(parsed.2, Some(expected.2));
            }

            assert_eq!(second.len(), 4);
            assert!((second[0].0.unwrap() - l1.doppler).abs() < 1.0E-3);
            assert_eq!(second[0].1, Some(4));
            assert_eq!(second[0].2, Some(6));
            assert!((second[1].0.unwrap() - l2.doppler).abs() < 1.0E-3);
            assert!((second[2].0.unwrap() - 160.0).abs() < 1.0E-3);
            assert!((second[3].0.unwrap() - 120.0).abs() < 1.0E-3);
        }

        // L2 phase was unwrapped: lock loss on phase only
        let first = parse_line(lines[1]);
        assert_eq!(first[2].1, Some(0));
        assert_eq!(first[4].1, Some(1));
        // Z tracking on L1
        assert_eq!(first[1].1, Some(4));
    }

    #[test]
    fn continuation_lines() {
        let prns = (1..=14).collect::<Vec<u8>>();
        let stanza = format_epoch(&epoch(&prns)).unwrap();
        let lines = stanza.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2 + 2 * 14);
        assert_eq!(
            lines[0],
            " 19  6 28 14 36 40.0000000  0 14G01G02G03G04G05G06G07G08G09G10G11G12"
        );
        assert_eq!(lines[1], format!("{:32}G13G14", ""));
    }

    #[test]
    fn unprintable_values() {
        let mut fixture = MpcFixture::new(3);
        fixture.sequence = ((TOW % 1800.0) * 20.0) as u16;
        // range beyond F14.3
        fixture.bands[0].range = 1.0E3;
        let (payload, crc) = fixture.payload();
        let sat =
            SatelliteMeasurement::decode(&payload, &crc, &DecoderSettings::default()).unwrap();

        let mut assembler = Assembler::new(AssemblerSettings::default());
        assembler.set_week(2059);
        assert!(assembler.push(Record::Satellite(sat)).is_none());
        let (payload, crc) = PbnFixture::new(TOW).payload();
        let epoch = assembler
            .push(Record::Navigation(NavigationFix::decode(&payload, &crc).unwrap()))
            .unwrap();

        let stanza = format_epoch(&epoch).unwrap();
        let lines = stanza.lines().collect::<Vec<_>>();
        assert_eq!(&lines[1][..14], "              ");
        assert_eq!(lines[1].len(), 80);
    }
}
