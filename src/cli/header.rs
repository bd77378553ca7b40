use clap::{value_parser, Arg};
use lazy_static::lazy_static;

lazy_static! {
    pub static ref HEADER_ARGS: Vec<Arg> = vec![
        Arg::new("config")
            .long("config")
            .value_name("FILE")
            .help("Station description (JSON). Any of the following options overrides its content."),
        Arg::new("marker-name")
            .long("marker-name")
            .value_name("NAME")
            .help("Geodetic marker name"),
        Arg::new("marker-number")
            .long("marker-number")
            .value_name("NUMBER")
            .help("Geodetic marker number"),
        Arg::new("observer")
            .long("observer")
            .help("Name of the observer. Defaults to the login name."),
        Arg::new("agency")
            .long("agency")
            .help("Name of the agency"),
        Arg::new("operator")
            .long("operator")
            .help("Person or agency running the program"),
        Arg::new("receiver-number")
            .long("receiver-number")
            .help("Receiver number. Defaults to the receiver serial number when reported."),
        Arg::new("antenna-number")
            .long("antenna-number")
            .help("Antenna number"),
        Arg::new("antenna-type")
            .long("antenna-type")
            .help("Antenna type, like \"ASH700936D_M\""),
        Arg::new("antenna-height")
            .long("antenna-height")
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true)
            .help("Antenna height above marker [m]"),
        Arg::new("antenna-east")
            .long("antenna-east")
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true)
            .help("Antenna eccentricity, east [m]"),
        Arg::new("antenna-north")
            .long("antenna-north")
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true)
            .help("Antenna eccentricity, north [m]"),
        Arg::new("comment")
            .long("comment")
            .help("Header comment"),
        Arg::new("interval")
            .long("interval")
            .value_parser(value_parser!(f64))
            .help("Observation interval published in the header [s]. Default is the measurement rate."),
    ];
}

lazy_static! {
    pub static ref RECEIVER_ID_ARGS: Vec<Arg> = vec![
        Arg::new("receiver-type")
            .long("receiver-type")
            .default_value("UZ")
            .help("Receiver type, when it can't be queried (replay)"),
        Arg::new("receiver-channels")
            .long("receiver-channels")
            .default_value("12")
            .help("Receiver channel option, when it can't be queried (replay)"),
        Arg::new("receiver-options")
            .long("receiver-options")
            .default_value("")
            .help("Receiver option codes, when they can't be queried (replay)"),
        Arg::new("receiver-firmware")
            .long("receiver-firmware")
            .default_value("")
            .help("Receiver firmware version, when it can't be queried (replay)"),
        Arg::new("receiver-serial")
            .long("receiver-serial")
            .help("Receiver serial number, when it can't be queried (replay)"),
    ];
}
