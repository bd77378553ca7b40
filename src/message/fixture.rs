//! Byte exact MPC and PBN frames, for testing purposes
use crate::message::{mpc::SatelliteMeasurement, pbn::NavigationFix, MARKER};

#[derive(Debug, Copy, Clone)]
pub struct BandFixture {
    pub warning: u8,
    pub goodbad: u8,
    pub snr: u8,
    pub quality: u8,
    pub phase: f64,
    /// Range [s]
    pub range: f64,
    pub doppler: i32,
    pub correction: i32,
}

impl Default for BandFixture {
    fn default() -> Self {
        Self {
            warning: 0,
            goodbad: 24,
            snr: 120,
            quality: 5,
            phase: 1_234_567.125,
            range: 0.0712,
            doppler: 25_000,
            correction: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MpcFixture {
    pub sequence: u16,
    pub left: u8,
    pub prn: u8,
    pub elevation: u8,
    /// Raw azimuth (half degrees)
    pub azimuth: u8,
    pub channel: u8,
    pub bands: [BandFixture; 3],
}

impl MpcFixture {
    pub fn new(prn: u8) -> Self {
        Self {
            sequence: 0,
            left: 0,
            prn,
            elevation: 30,
            azimuth: 45,
            channel: 1,
            bands: [BandFixture::default(); 3],
        }
    }

    /// (payload, checksum)
    pub fn payload(&self) -> (Vec<u8>, Vec<u8>) {
        let mut payload = Vec::with_capacity(SatelliteMeasurement::SIZE);
        payload.extend_from_slice(&self.sequence.to_be_bytes());
        payload.extend_from_slice(&[
            self.left,
            self.prn,
            self.elevation,
            self.azimuth,
            self.channel,
        ]);

        for band in self.bands.iter() {
            payload.extend_from_slice(&[band.warning, band.goodbad, 0, band.snr, band.quality]);
            payload.extend_from_slice(&band.phase.to_be_bytes());
            payload.extend_from_slice(&band.range.to_be_bytes());
            payload.extend_from_slice(&band.doppler.to_be_bytes());
            payload.extend_from_slice(&band.correction.to_be_bytes());
        }

        let crc = SatelliteMeasurement::CHECKSUM.encode(&payload);
        (payload, crc)
    }

    /// Complete frame, as streamed by the receiver
    pub fn frame(&self) -> Vec<u8> {
        let (payload, crc) = self.payload();
        frame("MPC", &payload, &crc)
    }
}

#[derive(Debug, Clone)]
pub struct PbnFixture {
    /// Time of week [s]
    pub tow: f64,
    pub site: [u8; 4],
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub clock_offset: f32,
    pub velocity: (f32, f32, f32),
    pub clock_drift: f32,
    /// Raw PDOP (1/100)
    pub pdop: u16,
}

impl PbnFixture {
    pub fn new(tow: f64) -> Self {
        Self {
            tow,
            site: *b"TEST",
            x: -2694892.5,
            y: -4296917.0,
            z: 3855357.0,
            clock_offset: 1.5E-4,
            velocity: (0.25, -0.5, 0.125),
            clock_drift: -2.0E-6,
            pdop: 180,
        }
    }

    /// (payload, checksum)
    pub fn payload(&self) -> (Vec<u8>, Vec<u8>) {
        let mut payload = Vec::with_capacity(NavigationFix::SIZE);
        payload.extend_from_slice(&((self.tow * 1000.0).round() as i32).to_be_bytes());
        payload.extend_from_slice(&self.site);
        payload.extend_from_slice(&self.x.to_be_bytes());
        payload.extend_from_slice(&self.y.to_be_bytes());
        payload.extend_from_slice(&self.z.to_be_bytes());
        payload.extend_from_slice(&self.clock_offset.to_be_bytes());
        payload.extend_from_slice(&self.velocity.0.to_be_bytes());
        payload.extend_from_slice(&self.velocity.1.to_be_bytes());
        payload.extend_from_slice(&self.velocity.2.to_be_bytes());
        payload.extend_from_slice(&self.clock_drift.to_be_bytes());
        payload.extend_from_slice(&self.pdop.to_be_bytes());

        let crc = NavigationFix::CHECKSUM.encode(&payload);
        (payload, crc)
    }

    /// Complete frame, as streamed by the receiver
    pub fn frame(&self) -> Vec<u8> {
        let (payload, crc) = self.payload();
        frame("PBN", &payload, &crc)
    }
}

/// Frames any payload
pub fn frame(tag: &str, payload: &[u8], crc: &[u8]) -> Vec<u8> {
    let mut bytes = MARKER.to_vec();
    bytes.push(b',');
    bytes.extend_from_slice(tag.as_bytes());
    bytes.push(b',');
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(crc);
    bytes.extend_from_slice(b"\r\n");
    bytes
}
