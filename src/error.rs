use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Any I/O error on the serial link, a replay file or the output file
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// Transport did not deliver any byte within its timeout.
    #[error("no data received")]
    NoData,

    #[error("{kind} checksum error")]
    Checksum { kind: String },

    #[error("invalid PRN #{0}")]
    InvalidPrn(u8),

    #[error("malformed {kind} message ({size} bytes)")]
    MalformedMessage { kind: String, size: usize },

    #[error("unknown message type \"{0}\"")]
    UnknownMessage(String),

    /// Receiver answered a query with something we can't interpret
    #[error("invalid receiver response: \"{0}\"")]
    InvalidResponse(String),

    #[error("failed to create \"{path}\": {reason}")]
    OutputCreation { path: String, reason: String },

    #[error("RINEX formatting error: {0}")]
    Encoding(#[from] std::fmt::Error),

    #[error("system time: {0}")]
    SystemTime(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("station file error: {0}")]
    StationFile(#[from] serde_json::Error),
}

impl Error {
    /// Fatal errors stop the pipeline. Everything else drops
    /// the current message and the pipeline moves on.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::NoData
            | Self::Checksum { .. }
            | Self::InvalidPrn(_)
            | Self::MalformedMessage { .. }
            | Self::UnknownMessage(_)
            | Self::InvalidResponse(_) => false,
            Self::Io(_)
            | Self::SerialPort(_)
            | Self::OutputCreation { .. }
            | Self::Encoding(_)
            | Self::SystemTime(_)
            | Self::Config(_)
            | Self::StationFile(_) => true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Error;

    #[test]
    fn fatal_classification() {
        assert!(!Error::NoData.is_fatal());
        assert!(!Error::InvalidPrn(33).is_fatal());
        assert!(!Error::Checksum {
            kind: "MPC".to_string()
        }
        .is_fatal());
        assert!(!Error::UnknownMessage("XYZ".to_string()).is_fatal());

        assert!(Error::OutputCreation {
            path: "test.19o".to_string(),
            reason: "denied".to_string(),
        }
        .is_fatal());

        let closed = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(Error::Io(closed).is_fatal());
    }
}
