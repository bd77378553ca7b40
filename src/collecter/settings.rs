use std::str::FromStr;

use hifitime::{
    efmt::Format,
    prelude::{Epoch, Formatter},
};

use log::warn;

use crate::error::Error;

/// Output file [Settings]
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Output directory
    pub prefix: Option<String>,

    /// Custom file name, replaces the standard name
    pub name: Option<String>,

    /// Site name, used in the standard name
    pub site: String,

    /// GZip compression
    pub gzip: bool,

    /// Replace an existing file
    pub overwrite: bool,
}

/// Keeps alphanumerics, spaces, dots and slashes
fn sanitize(content: &str) -> String {
    content
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '/'))
        .collect()
}

/// Sanitizes a custom file name, which can't leave the working directory
fn sanitize_filename(name: &str) -> String {
    let mut sanitized = sanitize(name);

    while sanitized.contains("../") {
        sanitized = sanitized.replace("../", "./");
        sanitized = sanitized.trim_start_matches(['.', '/']).to_string();
    }

    if sanitized != name {
        warn!("requested file name \"{}\" changed to \"{}\"", name, sanitized);
    }

    sanitized
}

impl Settings {
    /// Output file path, for a file created at `t`
    pub fn filename(&self, t: Epoch) -> Result<String, Error> {
        let mut filepath = if let Some(prefix) = &self.prefix {
            format!("{}/", prefix.trim_end_matches('/'))
        } else {
            "".to_string()
        };

        let filename = match &self.name {
            Some(name) => sanitize_filename(name),
            None => self.v2_filename(t)?,
        };

        if filename.is_empty() {
            return Err(Error::Config("empty output file name".to_string()));
        }

        filepath.push_str(&filename);

        if self.gzip {
            filepath.push_str(".gz");
        }

        Ok(filepath)
    }

    /// `SSSSDDDh.YYo` standard name: site, day of year,
    /// hour letter (a-x), year
    fn v2_filename(&self, t: Epoch) -> Result<String, Error> {
        let (year, _, _, hour, _, _, _) = t.to_gregorian_utc();

        let fmt = Format::from_str("%j")
            .map_err(|e| Error::Config(format!("day of year format: {}", e)))?;

        let formatter = Formatter::new(t, fmt);

        let site = sanitize(&self.site);

        let mut formatted = if site.is_empty() {
            "NONE".to_string()
        } else {
            site
        };

        formatted.push_str(&formatter.to_string());
        formatted.push((b'a' + hour) as char);
        formatted.push('.');
        formatted.push_str(&format!("{:02}", year.rem_euclid(100)));
        formatted.push('o');

        Ok(formatted)
    }
}
