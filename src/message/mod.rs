//! Ashtech `$PASHR` binary messages
pub mod checksum;
pub mod flags;
pub mod framing;
pub mod mpc;
pub mod pbn;
pub mod settings;

#[cfg(test)]
pub mod fixture;

use crate::error::Error;

use mpc::SatelliteMeasurement;
use pbn::NavigationFix;
use settings::DecoderSettings;

/// Every receiver response starts with this marker
pub const MARKER: &[u8; 6] = b"$PASHR";

/// Message tags the receiver may stream that we do not process
const IGNORED_TAGS: [&str; 5] = ["SNV", "SAL", "EPB", "RPC", "DAL"];

/// Undecoded receiver message
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    /// Message type, trimmed
    pub tag: String,
    pub payload: Vec<u8>,
    /// Trailing checksum bytes (binary messages only)
    pub checksum: Vec<u8>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// Satellite measurements
    Mpc,
    /// Navigation solution
    Pbn,
    /// Known message, not processed
    Ignored,
    Unknown,
}

impl MessageKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "MPC" => Self::Mpc,
            "PBN" => Self::Pbn,
            tag if IGNORED_TAGS.contains(&tag) => Self::Ignored,
            _ => Self::Unknown,
        }
    }

    /// Fixed (payload, checksum) sizes of binary messages we decode
    pub fn fixed_size(&self) -> Option<(usize, usize)> {
        match self {
            Self::Mpc => Some((SatelliteMeasurement::SIZE, SatelliteMeasurement::CHECKSUM.size())),
            Self::Pbn => Some((NavigationFix::SIZE, NavigationFix::CHECKSUM.size())),
            Self::Ignored | Self::Unknown => None,
        }
    }
}

/// Decoded message
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Satellite(SatelliteMeasurement),
    Navigation(NavigationFix),
    /// Recognized but not processed
    Ignored(String),
}

impl Record {
    /// Decodes a [RawMessage]
    pub fn decode(raw: &RawMessage, settings: &DecoderSettings) -> Result<Self, Error> {
        match MessageKind::from_tag(&raw.tag) {
            MessageKind::Mpc => Ok(Self::Satellite(SatelliteMeasurement::decode(
                &raw.payload,
                &raw.checksum,
                settings,
            )?)),
            MessageKind::Pbn => Ok(Self::Navigation(NavigationFix::decode(
                &raw.payload,
                &raw.checksum,
            )?)),
            MessageKind::Ignored => Ok(Self::Ignored(raw.tag.clone())),
            MessageKind::Unknown => Err(Error::UnknownMessage(raw.tag.clone())),
        }
    }
}

pub(crate) fn be_u16(b: &[u8]) -> u16 {
    u16::from_be_bytes([b[0], b[1]])
}

pub(crate) fn be_i32(b: &[u8]) -> i32 {
    i32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

pub(crate) fn be_f32(b: &[u8]) -> f32 {
    f32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

pub(crate) fn be_f64(b: &[u8]) -> f64 {
    f64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}
