//! RINEX 2.11 observation header
use std::fmt::Write;

use hifitime::prelude::Epoch;
use itertools::Itertools;

use crate::{
    ashtech::ReceiverIdentity, collecter::rinex::station::Station, error::Error,
    message::pbn::NavigationFix, time::GpsTime,
};

pub const RINEX_VERSION: f64 = 2.11;

/// Observables, in order of appearance
pub const OBSERVABLES: [&str; 9] = ["C1", "P1", "P2", "L1", "L2", "D1", "D2", "S1", "S2"];

fn program() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Truncates to the column width
fn fit(content: &str, width: usize) -> String {
    content.chars().take(width).collect()
}

fn run_date(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = t.to_gregorian_utc();
    format!("{:04}{:02}{:02} {:02}{:02}{:02} UTC", y, m, d, hh, mm, ss)
}

/// Formats the complete header. Every line is 80 columns wide,
/// labels sit in columns 61-80.
pub fn format_header(
    identity: &ReceiverIdentity,
    station: &Station,
    first_obs: GpsTime,
    fix: &NavigationFix,
    run: Epoch,
) -> Result<String, Error> {
    let mut s = String::with_capacity(20 * 81);

    writeln!(
        s,
        "{:9.2}{:11}{:<20}{:<20}{:<20}",
        RINEX_VERSION, "", "OBSERVATION", "GPS", "RINEX VERSION / TYPE"
    )?;

    writeln!(
        s,
        "{:<20}{:<20}{:<20}{:<20}",
        fit(&program(), 20),
        fit(&station.operator, 20),
        run_date(run),
        "PGM / RUN BY / DATE"
    )?;

    if let Some(comment) = &station.comment {
        writeln!(s, "{:<60}{:<20}", fit(comment, 60), "COMMENT")?;
    }

    writeln!(s, "{:<60}{:<20}", fit(&station.marker_name, 60), "MARKER NAME")?;
    writeln!(s, "{:<60}{:<20}", fit(&station.marker_number, 20), "MARKER NUMBER")?;

    writeln!(
        s,
        "{:<20}{:<40}{:<20}",
        fit(&station.observer, 20),
        fit(&station.agency, 40),
        "OBSERVER / AGENCY"
    )?;

    let receiver_number = match (&station.receiver_number, &identity.serial_number) {
        (Some(number), _) => number.clone(),
        (None, Some(serial)) => serial.clone(),
        (None, None) => "NONE".to_string(),
    };

    writeln!(
        s,
        "{:<20}{:<20}{:<20}{:<20}",
        fit(&receiver_number, 20),
        fit(&identity.model(), 20),
        fit(&identity.version(), 20),
        "REC # / TYPE / VERS"
    )?;

    if let Some(serial) = &identity.serial_number {
        writeln!(s, "{:<60}{:<20}", fit(&format!("SN: {}", serial), 60), "COMMENT")?;
    }

    writeln!(
        s,
        "{:<20}{:<20}{:<20}{:<20}",
        fit(&station.antenna_number, 20),
        fit(&station.antenna_type, 20),
        "",
        "ANT # / TYPE"
    )?;

    let (lat, lon, height) = fix.position.ddmm_strings();
    writeln!(
        s,
        "{:<20}{:<20}{:<20}{:<20}",
        fit(&lat, 20),
        fit(&lon, 20),
        fit(&height, 20),
        "COMMENT"
    )?;

    writeln!(
        s,
        "{:14.4}{:14.4}{:14.4}{:18}{:<20}",
        fix.position.x, fix.position.y, fix.position.z, "", "APPROX POSITION XYZ"
    )?;

    writeln!(
        s,
        "{:14.4}{:14.4}{:14.4}{:18}{:<20}",
        station.antenna_height,
        station.antenna_east,
        station.antenna_north,
        "",
        "ANTENNA: DELTA H/E/N"
    )?;

    writeln!(s, "{:6}{:6}{:48}{:<20}", 1, 1, "", "WAVELENGTH FACT L1/2")?;

    let observables = OBSERVABLES
        .iter()
        .map(|obs| format!("{:>6}", obs))
        .join("");

    writeln!(
        s,
        "{:6}{:<54}{:<20}",
        OBSERVABLES.len(),
        observables,
        "# / TYPES OF OBSERV"
    )?;

    if let Some(interval) = station.interval {
        writeln!(s, "{:10.3}{:50}{:<20}", interval, "", "INTERVAL")?;
    }

    let t = first_obs.to_calendar();
    writeln!(
        s,
        "{:6}{:6}{:6}{:6}{:6}{:13.7}{:5}{:<3}{:9}{:<20}",
        t.year, t.month, t.day, t.hour, t.minute, t.second, "", "GPS", "", "TIME OF FIRST OBS"
    )?;

    writeln!(s, "{:<60}{:<20}", "", "END OF HEADER")?;

    Ok(s)
}

#[cfg(test)]
mod test {
    use super::format_header;
    use crate::{
        ashtech::ReceiverIdentity,
        collecter::rinex::station::Station,
        message::{fixture::PbnFixture, pbn::NavigationFix},
        time::GpsTime,
    };
    use hifitime::prelude::Epoch;

    fn fix() -> NavigationFix {
        let (payload, crc) = PbnFixture::new(484_600.0).payload();
        NavigationFix::decode(&payload, &crc).unwrap()
    }

    fn identity() -> ReceiverIdentity {
        let mut identity =
            ReceiverIdentity::from_rid("$PASHR,RID,UZ,12,UC00,-Y-M-----,UC00*3F").unwrap();
        identity.serial_number = Some("ZR520021306".to_string());
        identity
    }

    fn station() -> Station {
        Station {
            marker_name: "N8UR".to_string(),
            marker_number: "0001".to_string(),
            observer: "jra".to_string(),
            agency: "TAPR".to_string(),
            operator: "n8ur".to_string(),
            receiver_number: None,
            antenna_number: "12345".to_string(),
            antenna_type: "ASH700936D_M".to_string(),
            antenna_height: 1.5,
            antenna_east: 0.0,
            antenna_north: 0.0,
            comment: Some("test run".to_string()),
            interval: Some(30.0),
        }
    }

    #[test]
    fn header_layout() {
        // 2019-06-28 14:36:40 GPST
        let first_obs = GpsTime::new(2059, 484_600.0);
        let run = Epoch::from_gregorian_utc(2019, 6, 28, 14, 40, 0, 0);

        let header = format_header(&identity(), &station(), first_obs, &fix(), run).unwrap();
        let lines = header.lines().collect::<Vec<_>>();

        for line in lines.iter() {
            assert_eq!(line.len(), 80, "invalid line \"{}\"", line);
        }

        let labels = lines
            .iter()
            .map(|line| line[60..].trim_end())
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            vec![
                "RINEX VERSION / TYPE",
                "PGM / RUN BY / DATE",
                "COMMENT",
                "MARKER NAME",
                "MARKER NUMBER",
                "OBSERVER / AGENCY",
                "REC # / TYPE / VERS",
                "COMMENT",
                "ANT # / TYPE",
                "COMMENT",
                "APPROX POSITION XYZ",
                "ANTENNA: DELTA H/E/N",
                "WAVELENGTH FACT L1/2",
                "# / TYPES OF OBSERV",
                "INTERVAL",
                "TIME OF FIRST OBS",
                "END OF HEADER",
            ]
        );

        assert_eq!(
            lines[0],
            "     2.11           OBSERVATION         GPS                 RINEX VERSION / TYPE"
        );
        assert!(lines[1].starts_with("ash2rinex v"));
        assert_eq!(&lines[1][20..60], "n8ur                20190628 144000 UTC ");
        assert!(lines[2].starts_with("test run "));
        assert!(lines[5].starts_with("jra                 TAPR "));
        assert_eq!(
            &lines[6][..60],
            "ZR520021306         UZ 12/-Y-M-----     UC00/UC00           "
        );
        assert!(lines[7].starts_with("SN: ZR520021306 "));
        assert!(lines[9].starts_with("37:25."));
        assert_eq!(&lines[9][20..21], "1");
        assert_eq!(
            &lines[10][..42],
            " -2694892.5000 -4296917.0000  3855357.0000"
        );
        assert_eq!(&lines[11][..14], "        1.5000");
        assert_eq!(&lines[12][..12], "     1     1");
        assert_eq!(
            &lines[13][..60],
            "     9    C1    P1    P2    L1    L2    D1    D2    S1    S2"
        );
        assert_eq!(&lines[14][..10], "    30.000");
        assert_eq!(
            &lines[15][..60],
            "  2019     6    28    14    36   40.0000000     GPS         "
        );
        assert!(lines[16].starts_with("       "));
    }

    #[test]
    fn receiver_number_priority() {
        let run = Epoch::from_gregorian_utc(2019, 6, 28, 14, 40, 0, 0);
        let first_obs = GpsTime::new(2059, 484_600.0);

        let mut station = station();
        station.receiver_number = Some("RX42".to_string());
        station.comment = None;

        let header = format_header(&identity(), &station, first_obs, &fix(), run).unwrap();
        let rec = header
            .lines()
            .find(|line| line.ends_with("REC # / TYPE / VERS "))
            .unwrap();
        assert!(rec.starts_with("RX42 "));

        let header =
            format_header(&ReceiverIdentity::default(), &Station::default(), first_obs, &fix(), run)
                .unwrap();
        let rec = header
            .lines()
            .find(|line| line.ends_with("REC # / TYPE / VERS "))
            .unwrap();
        assert!(rec.starts_with("NONE "));
        assert!(!header.contains("SN: "));
        assert!(!header.contains("INTERVAL"));
    }
}
