use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};

mod decoding;
use decoding::*;

mod header;
use header::*;

use crate::{
    ashtech::{ReceiverIdentity, Settings as ReceiverSettings},
    collecter::{
        assembler::AssemblerSettings, rinex::Station, settings::Settings as OutputSettings,
    },
    error::Error,
    message::settings::DecoderSettings,
};

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }

    fn command() -> Command {
        let cmd =
            Command::new("ash2rinex")
        .author("Guillaume W. Bres, <guillaume.bressaix@gmail.com>")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Ashtech Z-12 / micro-Z to RINEX observation file collecter")
        .color(ColorChoice::Always)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Debug traces, unless RUST_LOG is defined")
        )
        .next_help_heading("Serial port")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .default_value("/dev/ttyS0")
                .help("Define serial port. Example /dev/ttyUSB0 on Linux")
        )
        .arg(
            Arg::new("baudrate")
                .short('b')
                .long("baud")
                .value_name("Baudrate (u32)")
                .value_parser(value_parser!(u32))
                .default_value("115200")
                .help("Define serial port baud rate, between 300 and 115200. By default we use 115_200"),
        )
        .next_help_heading("Receiver configuration")
        .arg(
            Arg::new("receiver-port")
                .long("receiver-port")
                .value_name("A|B|C|D")
                .default_value("A")
                .help("Receiver port we are connected to. Default is A.")
        )
        .arg(
            Arg::new("rate")
                .short('r')
                .long("rate")
                .value_name("SECONDS")
                .value_parser(value_parser!(u32))
                .default_value("20")
                .help("Measurement rate [s]. Default is 20s.")
        )
        .arg(
            Arg::new("elevation-mask")
                .long("elevation-mask")
                .value_name("DEGREES")
                .value_parser(value_parser!(u8))
                .default_value("10")
                .help("Elevation mask [°]. Default is 10°.")
        )
        .arg(
            Arg::new("pdop-mask")
                .long("pdop-mask")
                .value_parser(value_parser!(u8))
                .default_value("10")
                .help("PDOP mask. Default is 10.")
        )
        .arg(
            Arg::new("site")
                .short('s')
                .long("site")
                .default_value("TEST")
                .help("4 character site name, programmed in the receiver and used in the standard file name.")
        )
        .next_help_heading("Replay")
        .arg(
            Arg::new("replay")
                .long("replay")
                .value_name("FILE")
                .requires("week")
                .help("Replay a raw capture instead of talking to the receiver.")
        )
        .arg(
            Arg::new("week")
                .short('w')
                .long("week")
                .value_parser(value_parser!(u32))
                .help("GPS week number (possibly rolled over). Required in replay mode, overrides the receiver otherwise.")
        )
        .next_help_heading("Output")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Custom file name. Default is the standard SSSSDDDh.YYo name.")
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .required(false)
                .help("Custom directory prefix for output products. Default is none."),
        )
        .arg(
            Arg::new("gzip")
                .long("gzip")
                .action(ArgAction::SetTrue)
                .help("Add GZIP compression.")
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace an existing file. Refused by default.")
        );

        let cmd = cmd
            .next_help_heading("RINEX header")
            .args(HEADER_ARGS.iter());

        let cmd = cmd
            .next_help_heading("Receiver identity (replay)")
            .args(RECEIVER_ID_ARGS.iter());

        cmd.next_help_heading("Decoding")
            .args(DECODING_ARGS.iter())
    }

    fn string(&self, key: &str) -> Option<String> {
        self.matches.get_one::<String>(key).map(|s| s.to_string())
    }

    fn float(&self, key: &str) -> Option<f64> {
        self.matches.get_one::<f64>(key).copied()
    }

    pub fn verbose(&self) -> bool {
        self.matches.get_flag("verbose")
    }

    /// Raw capture to replay
    pub fn replay(&self) -> Option<String> {
        self.string("replay")
    }

    /// User defined GPS week
    pub fn week(&self) -> Option<u32> {
        self.matches.get_one::<u32>("week").copied()
    }

    pub fn receiver_settings(&self) -> ReceiverSettings {
        let defaults = ReceiverSettings::default();
        ReceiverSettings {
            port: self.string("port").unwrap_or(defaults.port),
            baud: self
                .matches
                .get_one::<u32>("baudrate")
                .copied()
                .unwrap_or(defaults.baud),
            receiver_port: self
                .string("receiver-port")
                .and_then(|port| port.trim().chars().next())
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or(defaults.receiver_port),
            elevation_mask: self
                .matches
                .get_one::<u8>("elevation-mask")
                .copied()
                .unwrap_or(defaults.elevation_mask),
            pdop_mask: self
                .matches
                .get_one::<u8>("pdop-mask")
                .copied()
                .unwrap_or(defaults.pdop_mask),
            site: self.string("site").unwrap_or(defaults.site),
            message_rate: self
                .matches
                .get_one::<u32>("rate")
                .copied()
                .unwrap_or(defaults.message_rate),
        }
    }

    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            prefix: self.string("prefix"),
            name: self.string("output"),
            site: self.string("site").unwrap_or_default(),
            gzip: self.matches.get_flag("gzip"),
            overwrite: self.matches.get_flag("overwrite"),
        }
    }

    pub fn decoder_settings(&self) -> Result<DecoderSettings, Error> {
        let mut settings = DecoderSettings::default();

        if let Some(scale) = self.float("snr-scale") {
            if scale.is_nan() || scale <= 0.0 {
                return Err(Error::Config(format!("invalid snr scale {}", scale)));
            }
            settings.snr_scale = scale;
        }

        if let Some(thresholds) = self.string("snr-thresholds") {
            settings.snr_classes = DecoderSettings::parse_thresholds(&thresholds).ok_or_else(|| {
                Error::Config(format!(
                    "invalid snr thresholds \"{}\" (default: \"{}\")",
                    thresholds,
                    DecoderSettings::default_thresholds()
                ))
            })?;
        }

        Ok(settings)
    }

    pub fn assembler_settings(&self) -> AssemblerSettings {
        let defaults = AssemblerSettings::default();
        AssemblerSettings {
            rollover_threshold: self
                .matches
                .get_one::<u32>("rollover-threshold")
                .copied()
                .unwrap_or(defaults.rollover_threshold),
            strict_tow_gate: self.matches.get_flag("strict-tow-gate"),
        }
    }

    /// Station description: configuration file (if any), then user overrides
    pub fn station(&self) -> Result<Station, Error> {
        let mut station = match self.string("config") {
            Some(path) => Station::from_file(path)?,
            None => Station::default(),
        };

        if let Some(name) = self.string("marker-name") {
            station.marker_name = name;
        }
        if let Some(number) = self.string("marker-number") {
            station.marker_number = number;
        }
        if let Some(observer) = self.string("observer") {
            station.observer = observer;
        }
        if let Some(agency) = self.string("agency") {
            station.agency = agency;
        }
        if let Some(operator) = self.string("operator") {
            station.operator = operator;
        }
        if let Some(number) = self.string("receiver-number") {
            station.receiver_number = Some(number);
        }
        if let Some(number) = self.string("antenna-number") {
            station.antenna_number = number;
        }
        if let Some(antenna) = self.string("antenna-type") {
            station.antenna_type = antenna;
        }
        if let Some(height) = self.float("antenna-height") {
            station.antenna_height = height;
        }
        if let Some(east) = self.float("antenna-east") {
            station.antenna_east = east;
        }
        if let Some(north) = self.float("antenna-north") {
            station.antenna_north = north;
        }
        if let Some(comment) = self.string("comment") {
            station.comment = Some(comment);
        }
        if let Some(interval) = self.float("interval") {
            station.interval = Some(interval);
        }

        if station.interval.is_none() {
            station.interval = Some(self.receiver_settings().message_rate as f64);
        }

        Ok(station)
    }

    /// Receiver identity, for receivers that can't be queried
    pub fn receiver_identity(&self) -> ReceiverIdentity {
        let firmware = self.string("receiver-firmware").unwrap_or_default();
        ReceiverIdentity {
            receiver_type: self.string("receiver-type").unwrap_or_default(),
            channel_option: self.string("receiver-channels").unwrap_or_default(),
            options: self.string("receiver-options").unwrap_or_default(),
            nav_version: firmware.clone(),
            channel_version: firmware,
            serial_number: self.string("receiver-serial"),
        }
    }
}
