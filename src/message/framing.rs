//! Splits the receiver byte stream into [RawMessage]s
use std::io::{ErrorKind, Read};

use log::{debug, trace};

use crate::{
    error::Error,
    message::{MessageKind, RawMessage, MARKER},
};

/// Bytes pulled from the transport at once
const READ_SIZE: usize = 1024;

/// Text (or unsupported binary) messages larger than this are discarded
const MAX_UNSIZED_FRAME: usize = 4096;

/// Longest message tag
const MAX_TAG_LEN: usize = 4;

const TERMINATOR: &[u8; 2] = b"\r\n";

enum Parsed {
    /// Complete message, and number of bytes it occupies
    Frame(RawMessage, usize),
    /// Invalid frame
    Invalid { kind: String, size: usize },
    /// More bytes are needed
    Incomplete,
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| pos + from)
}

/// [Framer] is a lazy, pull based iterator of [RawMessage]s, over any
/// [Read]able transport. Each frame is `$PASHR,<tag>,<payload><checksum>\r\n`.
/// MPC and PBN frames are cut at their fixed length, others at the
/// following marker. A transport timeout yields [Error::NoData], so the
/// consumer regains control even on a silent link.
pub struct Framer<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    eof: bool,
}

impl<R: Read> Framer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            eof: false,
            buffer: Vec::with_capacity(2 * READ_SIZE),
        }
    }

    /// Drops anything preceding the next marker
    fn align(&mut self) {
        match find(&self.buffer, MARKER, 0) {
            Some(0) => {},
            Some(pos) => {
                trace!("framer: discarding {} bytes", pos);
                self.buffer.drain(..pos);
            },
            None => {
                // keep what could be the beginning of a marker
                let garbage = self.buffer.len().saturating_sub(MARKER.len() - 1);
                if garbage > 0 {
                    trace!("framer: discarding {} bytes", garbage);
                    self.buffer.drain(..garbage);
                }
            },
        }
    }

    /// Parses the frame at the start of the buffer, which starts with [MARKER].
    fn parse(&self) -> Parsed {
        let buf = &self.buffer;
        let tag_start = MARKER.len() + 1;

        if buf.len() <= MARKER.len() {
            return Parsed::Incomplete;
        }

        if buf[MARKER.len()] != b',' {
            return Parsed::Invalid {
                kind: "unframed".to_string(),
                size: MARKER.len() + 1,
            };
        }

        let tag_end = buf[tag_start..]
            .iter()
            .take(MAX_TAG_LEN + 1)
            .position(|b| *b == b',');

        let tag_len = match tag_end {
            Some(len) if (3..=MAX_TAG_LEN).contains(&len) => len,
            Some(len) => {
                return Parsed::Invalid {
                    kind: "unframed".to_string(),
                    size: tag_start + len,
                };
            },
            None => {
                if buf.len() > tag_start + MAX_TAG_LEN {
                    return Parsed::Invalid {
                        kind: "unframed".to_string(),
                        size: buf.len(),
                    };
                }
                return Parsed::Incomplete;
            },
        };

        let tag = String::from_utf8_lossy(&buf[tag_start..tag_start + tag_len])
            .trim()
            .to_string();

        let body = tag_start + tag_len + 1;

        if let Some((size, crc_size)) = MessageKind::from_tag(&tag).fixed_size() {
            let end = body + size + crc_size;

            if buf.len() < end + TERMINATOR.len() {
                return Parsed::Incomplete;
            }

            if &buf[end..end + TERMINATOR.len()] != TERMINATOR {
                return Parsed::Invalid {
                    kind: tag,
                    size: size + crc_size,
                };
            }

            let raw = RawMessage {
                payload: buf[body..body + size].to_vec(),
                checksum: buf[body + size..end].to_vec(),
                tag,
            };

            return Parsed::Frame(raw, end + TERMINATOR.len());
        }

        let mut next = TERMINATOR.to_vec();
        next.extend_from_slice(MARKER);

        let (end, consumed) = match find(buf, &next, body) {
            Some(pos) => (pos, pos + TERMINATOR.len()),
            None if self.eof => {
                if buf.ends_with(TERMINATOR) && buf.len() >= body + TERMINATOR.len() {
                    (buf.len() - TERMINATOR.len(), buf.len())
                } else {
                    (buf.len(), buf.len())
                }
            },
            None => {
                if buf.len() > MAX_UNSIZED_FRAME {
                    return Parsed::Invalid {
                        kind: tag,
                        size: buf.len(),
                    };
                }
                return Parsed::Incomplete;
            },
        };

        let raw = RawMessage {
            payload: buf[body..end].to_vec(),
            checksum: Vec::new(),
            tag,
        };

        Parsed::Frame(raw, consumed)
    }
}

impl<R: Read> Iterator for Framer<R> {
    type Item = Result<RawMessage, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.align();

            if self.buffer.starts_with(MARKER) {
                match self.parse() {
                    Parsed::Frame(raw, consumed) => {
                        trace!(
                            "framer: {} ({} bytes + {} checksum)",
                            raw.tag,
                            raw.payload.len(),
                            raw.checksum.len()
                        );
                        self.buffer.drain(..consumed);
                        return Some(Ok(raw));
                    },
                    Parsed::Invalid { kind, size } => {
                        // resync on the next marker
                        self.buffer.drain(..1);
                        return Some(Err(Error::MalformedMessage { kind, size }));
                    },
                    Parsed::Incomplete => {},
                }
            }

            if self.eof {
                if !self.buffer.is_empty() {
                    debug!("framer: {} trailing bytes dropped", self.buffer.len());
                    self.buffer.clear();
                }
                return None;
            }

            let mut chunk = [0u8; READ_SIZE];

            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                },
                Ok(size) => {
                    self.buffer.extend_from_slice(&chunk[..size]);
                },
                Err(e) => match e.kind() {
                    ErrorKind::TimedOut | ErrorKind::WouldBlock => {
                        return Some(Err(Error::NoData));
                    },
                    ErrorKind::Interrupted => {},
                    _ => {
                        self.eof = true;
                        self.buffer.clear();
                        return Some(Err(Error::Io(e)));
                    },
                },
            }
        }
    }
}
