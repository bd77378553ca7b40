use std::{
    io::{ErrorKind, Read, Write},
    thread,
    time::{Duration, Instant},
};

use serialport::{ClearBuffer, SerialPort};

use log::{debug, info, trace};

use crate::{
    ashtech::{
        identity::{parse_dal_week, parse_serial_number, ReceiverIdentity},
        Command, Settings,
    },
    error::Error,
};

/// Serial read timeout: the longest the pipeline waits before
/// regaining control.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Query response timeout
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

/// DAL sentences are requested every 20s
const WEEK_TIMEOUT: Duration = Duration::from_secs(45);

/// Grace period after each command
const COMMAND_DELAY: Duration = Duration::from_millis(100);

/// Binary messages we stream
pub const STREAMED_MESSAGES: [&str; 2] = ["PBN", "MBN"];

pub struct Device {
    port: Box<dyn SerialPort>,
    receiver_port: char,
    /// Received but not consumed yet
    pending: Vec<u8>,
}

impl Device {
    /// Opens the serial port
    pub fn open(settings: &Settings) -> Result<Self, Error> {
        settings.validate()?;

        let port = serialport::new(&settings.port, settings.baud)
            .timeout(READ_TIMEOUT)
            .open()?;

        info!("{} opened at {} baud", settings.port, settings.baud);

        Ok(Self {
            port,
            receiver_port: settings.receiver_port,
            pending: Vec::with_capacity(1024),
        })
    }

    fn send(&mut self, command: Command) -> Result<(), Error> {
        debug!("{}", command);
        self.port.write_all(&command.to_bytes())?;
        self.port.flush()?;
        thread::sleep(COMMAND_DELAY);
        Ok(())
    }

    /// Sends a `$PASHS` set command, no response expected
    pub fn set(&mut self, content: &str) -> Result<(), Error> {
        self.send(Command::set(content))
    }

    /// Sends a `$PASHQ` query command
    pub fn query(&mut self, content: &str) -> Result<(), Error> {
        self.send(Command::query(content))
    }

    /// Drops anything received so far
    pub fn clear(&mut self) -> Result<(), Error> {
        self.pending.clear();
        self.port.clear(ClearBuffer::All)?;
        Ok(())
    }

    /// Reads one line, CRLF excluded
    fn read_line(&mut self, timeout: Duration) -> Result<String, Error> {
        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; 256];

        loop {
            if let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
                let line = self.pending.drain(..=pos).collect::<Vec<_>>();
                let line = String::from_utf8_lossy(&line).trim_end().to_string();
                trace!("rx: {}", line);
                return Ok(line);
            }

            if Instant::now() > deadline {
                return Err(Error::NoData);
            }

            match self.port.read(&mut buf) {
                Ok(size) => self.pending.extend_from_slice(&buf[..size]),
                Err(e) if e.kind() == ErrorKind::TimedOut => {},
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Waits for a `$PASHR,<tag>` response, skipping anything else
    fn response(&mut self, tag: &str, timeout: Duration) -> Result<String, Error> {
        let deadline = Instant::now() + timeout;
        let prefix = format!("$PASHR,{},", tag);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let line = self.read_line(remaining)?;
            if let Some(pos) = line.find(&prefix) {
                return Ok(line[pos..].to_string());
            }
        }
    }

    /// Stops any output on our port and drops pending content
    pub fn disable_output(&mut self) -> Result<(), Error> {
        self.set(&format!("OUT,{}", self.receiver_port))?;
        thread::sleep(Duration::from_secs(1));
        self.clear()
    }

    /// Queries the [ReceiverIdentity] (RID), and serial number on micro-Z receivers (SID).
    pub fn query_receiver_identity(&mut self) -> Result<ReceiverIdentity, Error> {
        self.clear()?;
        self.query(&format!("RID,{}", self.receiver_port))?;

        let response = self.response("RID", RESPONSE_TIMEOUT)?;
        let mut identity = ReceiverIdentity::from_rid(&response)?;

        if identity.is_micro_z() {
            self.query("SID")?;
            // dummy date line, then serial number
            let _ = self.read_line(RESPONSE_TIMEOUT)?;
            let line = self.read_line(RESPONSE_TIMEOUT)?;
            identity.serial_number = parse_serial_number(&line);
        }

        info!("{}", identity);
        Ok(identity)
    }

    /// Obtains the broadcast week number from the first DAL (almanac) sentence.
    /// The receiver does not answer a DAL query, so sentences are streamed
    /// at a slow rate, then turned off.
    pub fn query_gps_week(&mut self) -> Result<u32, Error> {
        let port = self.receiver_port;

        self.set(&format!("OUT,{},NMEA", port))?;
        self.set("NME,PER,20")?;
        self.set(&format!("NME,DAL,{},ON", port))?;
        self.clear()?;

        let deadline = Instant::now() + WEEK_TIMEOUT;

        let week = loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let line = self.response("DAL", remaining)?;
            if let Some(week) = parse_dal_week(&line) {
                break week;
            }
            debug!("invalid DAL sentence: {}", line);
        };

        self.set(&format!("NME,ALL,{},OFF", port))?;
        self.disable_output()?;

        info!("broadcast gps week: {}", week);
        Ok(week)
    }

    /// Applies masks and site name
    pub fn configure(&mut self, settings: &Settings) -> Result<(), Error> {
        for command in settings.configuration() {
            self.set(&command)?;
        }
        Ok(())
    }

    /// Requests binary `messages` every `rate` seconds
    pub fn request_stream(&mut self, rate: u32, messages: &[&str]) -> Result<(), Error> {
        self.set(&format!("RCI,{}", rate))?;
        self.set(&format!(
            "OUT,{},{},BIN",
            self.receiver_port,
            messages.join(",")
        ))?;
        info!("streaming {} every {}s", messages.join(","), rate);
        Ok(())
    }
}

impl Read for Device {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.pending.is_empty() {
            let size = buf.len().min(self.pending.len());
            buf[..size].copy_from_slice(&self.pending[..size]);
            self.pending.drain(..size);
            return Ok(size);
        }
        self.port.read(buf)
    }
}
