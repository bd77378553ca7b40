use crate::{ashtech::strip_response, error::Error};

/// Receiver identification, as reported by the RID query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiverIdentity {
    /// Receiver type, like "UZ" or "Z12"
    pub receiver_type: String,
    pub channel_option: String,
    /// Navigation firmware version
    pub nav_version: String,
    /// Option codes
    pub options: String,
    /// Channel firmware version
    pub channel_version: String,
    /// Only micro-Z receivers report it
    pub serial_number: Option<String>,
}

impl ReceiverIdentity {
    /// Parses a `$PASHR,RID,<type>,<chan>,<nav>,<options>,<chan_ver>[*cc]` response
    pub fn from_rid(response: &str) -> Result<Self, Error> {
        let content = strip_response(response, "RID")
            .ok_or_else(|| Error::InvalidResponse(response.to_string()))?;

        let fields = content.split(',').map(|s| s.trim()).collect::<Vec<_>>();

        if fields.len() < 5 {
            return Err(Error::InvalidResponse(response.to_string()));
        }

        // the checksum is optional
        let channel_version = fields[4].split('*').next().unwrap_or_default();

        Ok(Self {
            receiver_type: fields[0].to_string(),
            channel_option: fields[1].to_string(),
            nav_version: fields[2].to_string(),
            options: fields[3].to_string(),
            channel_version: channel_version.to_string(),
            serial_number: None,
        })
    }

    /// Micro-Z receivers report their serial number (SID query)
    pub fn is_micro_z(&self) -> bool {
        self.receiver_type == "UZ"
    }

    /// "<type> <channel option>/<options>"
    pub fn model(&self) -> String {
        format!("{} {}/{}", self.receiver_type, self.channel_option, self.options)
    }

    /// "<nav version>/<channel version>"
    pub fn version(&self) -> String {
        format!("{}/{}", self.nav_version, self.channel_version)
    }
}

impl std::fmt::Display for ReceiverIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rx type: {}", self.receiver_type)?;
        if let Some(sn) = &self.serial_number {
            write!(f, " SN: {}", sn)?;
        }
        write!(
            f,
            " Options: {}/{} Versions: {}",
            self.channel_option,
            self.options,
            self.version()
        )
    }
}

/// Serial number line of the SID response
pub fn parse_serial_number(line: &str) -> Option<String> {
    let content = line.trim();
    let content = content.strip_prefix("$PASHR,").unwrap_or(content);
    let content = content.strip_prefix("SID,").unwrap_or(content);
    let serial = content.split('*').next()?.trim();

    if serial.is_empty() {
        None
    } else {
        Some(serial.to_string())
    }
}

/// Broadcast (possibly rolled over) week number, from a DAL sentence (field 14)
pub fn parse_dal_week(line: &str) -> Option<u32> {
    let content = strip_response(line, "DAL")?;
    // fields are counted from the DAL tag itself
    let field = content.split(',').nth(12)?;
    field.split('*').next()?.trim().parse::<u32>().ok()
}
