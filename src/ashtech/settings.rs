use crate::error::Error;

/// Serial speeds supported by the receiver,
/// the receiver refers to them by index.
pub const BAUD_RATES: [u32; 10] = [300, 600, 1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];

/// Receiver [Settings]
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Serial port
    pub port: String,
    pub baud: u32,
    /// Receiver port we are connected to
    pub receiver_port: char,
    /// Elevation mask [°]
    pub elevation_mask: u8,
    /// PDOP mask
    pub pdop_mask: u8,
    /// Site name, programmed in the receiver
    pub site: String,
    /// Message rate [s]
    pub message_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyS0".to_string(),
            baud: 115200,
            receiver_port: 'A',
            elevation_mask: 10,
            pdop_mask: 10,
            site: "TEST".to_string(),
            message_rate: 20,
        }
    }
}

/// Receiver speed index of this baud rate
pub fn baud_index(baud: u32) -> Option<usize> {
    BAUD_RATES.iter().position(|b| *b == baud)
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        if baud_index(self.baud).is_none() {
            return Err(Error::Config(format!(
                "unsupported baud rate {} (valid: {:?})",
                self.baud, BAUD_RATES
            )));
        }
        if self.elevation_mask > 90 {
            return Err(Error::Config(format!(
                "invalid elevation mask {}°",
                self.elevation_mask
            )));
        }
        if self.message_rate == 0 || self.message_rate > 999 {
            return Err(Error::Config(format!(
                "invalid message rate {}s",
                self.message_rate
            )));
        }
        if !self.receiver_port.is_ascii_alphabetic() {
            return Err(Error::Config(format!(
                "invalid receiver port \"{}\"",
                self.receiver_port
            )));
        }
        Ok(())
    }

    /// Site name as the receiver accepts it: 4 alphanumeric characters
    pub fn receiver_site(&self) -> String {
        let mut site = self
            .site
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(4)
            .collect::<String>()
            .to_ascii_uppercase();

        while site.len() < 4 {
            site.push('?');
        }
        site
    }

    /// Configuration commands, in order of application
    pub fn configuration(&self) -> Vec<String> {
        vec![
            format!("ELM,{}", self.elevation_mask),
            format!("PDP,{}", self.pdop_mask),
            format!("SIT,{}", self.receiver_site()),
        ]
    }
}
