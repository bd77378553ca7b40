use clap::{value_parser, Arg, ArgAction};
use lazy_static::lazy_static;

/// Week 65535 is in year 3236
const MAX_ROLLOVER_THRESHOLD: i64 = u16::MAX as i64;

lazy_static! {
    pub static ref DECODING_ARGS: Vec<Arg> = vec![
        Arg::new("snr-scale")
            .long("snr-scale")
            .value_parser(value_parser!(f64))
            .default_value("1.0")
            .help("Raw signal strength is divided by this factor. Default is 1."),
        Arg::new("snr-thresholds")
            .long("snr-thresholds")
            .value_name("T1,T2,..")
            .help(
                "Signal strength class thresholds, ascending, comma separated (8 at most).
Scaled signal strength below the first threshold is class 1, then each threshold crossed adds one class."
            ),
        Arg::new("rollover-threshold")
            .long("rollover-threshold")
            .value_parser(value_parser!(u32).range(..=MAX_ROLLOVER_THRESHOLD))
            .default_value("2048")
            .help("Any GPS week below this value has rolled over. Default is 2048."),
        Arg::new("strict-tow-gate")
            .long("strict-tow-gate")
            .action(ArgAction::SetTrue)
            .help("Never release an epoch at time of week 0 (start of week)."),
    ];
}
