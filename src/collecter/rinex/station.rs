use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Error;

fn default_observer() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Station metadata, published in the RINEX header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub marker_name: String,

    #[serde(default)]
    pub marker_number: String,

    /// Defaults to the login name
    #[serde(default = "default_observer")]
    pub observer: String,

    #[serde(default)]
    pub agency: String,

    /// Person or agency running the program
    #[serde(default)]
    pub operator: String,

    /// Receiver number, the receiver serial number when not specified
    #[serde(default)]
    pub receiver_number: Option<String>,

    #[serde(default)]
    pub antenna_number: String,

    #[serde(default)]
    pub antenna_type: String,

    /// Antenna height above marker [m]
    #[serde(default)]
    pub antenna_height: f64,

    /// Antenna eccentricity, east [m]
    #[serde(default)]
    pub antenna_east: f64,

    /// Antenna eccentricity, north [m]
    #[serde(default)]
    pub antenna_north: f64,

    #[serde(default)]
    pub comment: Option<String>,

    /// Observation interval [s], the message rate when not specified
    #[serde(default)]
    pub interval: Option<f64>,
}

impl Default for Station {
    fn default() -> Self {
        Self {
            marker_name: Default::default(),
            marker_number: Default::default(),
            observer: default_observer(),
            agency: Default::default(),
            operator: Default::default(),
            receiver_number: None,
            antenna_number: Default::default(),
            antenna_type: Default::default(),
            antenna_height: 0.0,
            antenna_east: 0.0,
            antenna_north: 0.0,
            comment: None,
            interval: None,
        }
    }
}

impl Station {
    /// Loads [Station] from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let fd = File::open(path)?;
        let station = serde_json::from_reader(BufReader::new(fd))?;
        Ok(station)
    }
}
