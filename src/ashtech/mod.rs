//! Ashtech receiver control
pub mod device;
pub mod identity;
pub mod settings;

pub use device::Device;
pub use identity::ReceiverIdentity;
pub use settings::Settings;

/// Receiver command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `$PASHS`: set
    Set(String),
    /// `$PASHQ`: query
    Query(String),
}

impl Command {
    pub fn set(content: &str) -> Self {
        Self::Set(content.to_string())
    }

    pub fn query(content: &str) -> Self {
        Self::Query(content.to_string())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Set(content) => format!("$PASHS,{}\r\n", content).into_bytes(),
            Self::Query(content) => format!("$PASHQ,{}\r\n", content).into_bytes(),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set(content) => write!(f, "$PASHS,{}", content),
            Self::Query(content) => write!(f, "$PASHQ,{}", content),
        }
    }
}

/// Content of a `$PASHR,<tag>,<content>` text response
pub(crate) fn strip_response<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    line.trim()
        .strip_prefix("$PASHR,")?
        .strip_prefix(tag)?
        .strip_prefix(',')
}
