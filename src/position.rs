//! ECEF to WGS-84 geodetic coordinates
use map_3d::{ecef2geodetic, Ellipsoid};

/// WGS-84 semi minor axis [m]
const WGS84_SEMI_MINOR_AXIS_M: f64 = 6_356_752.314245;

/// ECEF coordinates [m]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Geodetic coordinates: latitude and longitude in decimal degrees,
/// ellipsoidal height in meters.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude_ddeg: f64,
    pub longitude_ddeg: f64,
    pub height_m: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Converts to WGS-84 [Geodetic] coordinates.
    /// On the polar axis longitude is 0. The origin (no position)
    /// converts to all zeros.
    pub fn to_geodetic(&self) -> Geodetic {
        if self.x == 0.0 && self.y == 0.0 {
            if self.z == 0.0 {
                return Geodetic::default();
            }
            return Geodetic {
                latitude_ddeg: 90.0_f64.copysign(self.z),
                longitude_ddeg: 0.0,
                height_m: self.z.abs() - WGS84_SEMI_MINOR_AXIS_M,
            };
        }

        let (lat, lon, h) = ecef2geodetic(self.x, self.y, self.z, Ellipsoid::WGS84);

        Geodetic {
            latitude_ddeg: lat.to_degrees(),
            longitude_ddeg: lon.to_degrees(),
            height_m: h,
        }
    }

    /// Latitude, longitude as "DD:MM.mmmmH" and height as "H.hhh"
    pub fn ddmm_strings(&self) -> (String, String, String) {
        let geo = self.to_geodetic();

        let (lat_d, lat_m) = to_dm(geo.latitude_ddeg.abs());
        let (lon_d, lon_m) = to_dm(geo.longitude_ddeg.abs());

        (
            format!(
                "{}:{:.4}{}",
                lat_d as i64,
                lat_m,
                hemisphere(geo.latitude_ddeg, 'N', 'S')
            ),
            format!(
                "{}:{:.4}{}",
                lon_d as i64,
                lon_m,
                hemisphere(geo.longitude_ddeg, 'E', 'W')
            ),
            format!("{:.3}", geo.height_m),
        )
    }

    /// Latitude, longitude as "DD:MM:SS.sssH" and height as "H.hhh"
    pub fn ddmmss_strings(&self) -> (String, String, String) {
        let geo = self.to_geodetic();

        let (lat_d, lat_m, lat_s) = to_dms(geo.latitude_ddeg.abs());
        let (lon_d, lon_m, lon_s) = to_dms(geo.longitude_ddeg.abs());

        (
            format!(
                "{}:{}:{:.3}{}",
                lat_d as i64,
                lat_m as i64,
                lat_s,
                hemisphere(geo.latitude_ddeg, 'N', 'S')
            ),
            format!(
                "{}:{}:{:.3}{}",
                lon_d as i64,
                lon_m as i64,
                lon_s,
                hemisphere(geo.longitude_ddeg, 'E', 'W')
            ),
            format!("{:.3}", geo.height_m),
        )
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x={:.3}m y={:.3}m z={:.3}m", self.x, self.y, self.z)
    }
}

fn hemisphere(value: f64, positive: char, negative: char) -> char {
    if value >= 0.0 {
        positive
    } else {
        negative
    }
}

/// Splits decimal degrees into (degrees, minutes, seconds), all unsigned.
fn split_dms(ddeg: f64) -> (f64, f64, f64) {
    let total_s = ddeg.abs() * 3600.0;
    let total_min = (total_s / 60.0).floor();
    let seconds = total_s - total_min * 60.0;
    let degrees = (total_min / 60.0).floor();
    let minutes = total_min - degrees * 60.0;
    (degrees, minutes, seconds)
}

/// Decimal degrees to (degrees, decimal minutes).
/// The sign is carried by the leading non zero component only.
pub fn to_dm(ddeg: f64) -> (f64, f64) {
    let (mut degrees, seconds_min, seconds) = split_dms(ddeg);
    let mut minutes = seconds_min + seconds / 60.0;

    if ddeg < 0.0 {
        if degrees > 0.0 {
            degrees = -degrees;
        } else {
            minutes = -minutes;
        }
    }

    (degrees, minutes)
}

/// Decimal degrees to (degrees, minutes, decimal seconds).
/// The sign is carried by the leading non zero component only.
pub fn to_dms(ddeg: f64) -> (f64, f64, f64) {
    let (mut degrees, mut minutes, mut seconds) = split_dms(ddeg);

    if ddeg < 0.0 {
        if degrees > 0.0 {
            degrees = -degrees;
        } else if minutes > 0.0 {
            minutes = -minutes;
        } else {
            seconds = -seconds;
        }
    }

    (degrees, minutes, seconds)
}
