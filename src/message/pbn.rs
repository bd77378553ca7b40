//! PBN: navigation solution
use crate::{
    error::Error,
    message::{
        be_f32, be_f64, be_i32, be_u16,
        checksum::{verify, Checksum},
    },
    position::Position,
};

/// Decoded PBN message
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFix {
    /// Time of week [s]
    pub tow: f64,
    /// Site name, as programmed in the receiver
    pub site: String,
    /// ECEF position [m]
    pub position: Position,
    /// Receiver clock offset
    pub clock_offset: f32,
    /// ECEF velocity [m/s]
    pub velocity: (f32, f32, f32),
    /// Receiver clock drift
    pub clock_drift: f32,
    pub pdop: f64,
}

impl NavigationFix {
    /// Payload size (without checksum)
    pub const SIZE: usize = 54;

    pub const CHECKSUM: Checksum = Checksum::Sum16;

    /// Decodes a PBN payload, checksum verification included.
    pub fn decode(payload: &[u8], checksum: &[u8]) -> Result<Self, Error> {
        if payload.len() != Self::SIZE || checksum.len() != Self::CHECKSUM.size() {
            return Err(Error::MalformedMessage {
                kind: "PBN".to_string(),
                size: payload.len() + checksum.len(),
            });
        }

        if !verify(payload, checksum) {
            return Err(Error::Checksum {
                kind: "PBN".to_string(),
            });
        }

        let site = String::from_utf8_lossy(&payload[4..8])
            .trim_matches(|c: char| c.is_whitespace() || c == '\0')
            .to_string();

        Ok(Self {
            tow: be_i32(&payload[0..4]) as f64 / 1000.0,
            site,
            position: Position::new(
                be_f64(&payload[8..16]),
                be_f64(&payload[16..24]),
                be_f64(&payload[24..32]),
            ),
            clock_offset: be_f32(&payload[32..36]),
            velocity: (
                be_f32(&payload[36..40]),
                be_f32(&payload[40..44]),
                be_f32(&payload[44..48]),
            ),
            clock_drift: be_f32(&payload[48..52]),
            pdop: be_u16(&payload[52..54]) as f64 / 100.0,
        })
    }
}

impl std::fmt::Display for NavigationFix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tow={:.3} site=\"{}\" {} pdop={:.2}",
            self.tow, self.site, self.position, self.pdop
        )
    }
}
