use itertools::Itertools;

use crate::message::flags::{SignalClassTable, DEFAULT_SNR_THRESHOLDS};

/// Measurement decoding [DecoderSettings]
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderSettings {
    /// Raw signal strength is divided by this factor
    pub snr_scale: f64,

    /// Signal class thresholds, applied to the scaled signal strength
    pub snr_classes: SignalClassTable,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            snr_scale: 1.0,
            snr_classes: SignalClassTable::default(),
        }
    }
}

impl DecoderSettings {
    /// Parses a comma separated threshold list, like "100,115,130".
    pub fn parse_thresholds(content: &str) -> Option<SignalClassTable> {
        let thresholds = content
            .split(',')
            .map(|item| item.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .ok()?;

        SignalClassTable::new(&thresholds)
    }

    /// Default threshold list, as a CLI default value
    pub fn default_thresholds() -> String {
        DEFAULT_SNR_THRESHOLDS.iter().join(",")
    }
}
