//! RINEX 2.11 observation encoder
pub mod header;
pub mod record;
pub mod station;

use std::io::Write;

use hifitime::prelude::Epoch;

use crate::{
    ashtech::ReceiverIdentity, collecter::assembler::ObservationEpoch, error::Error,
    message::pbn::NavigationFix, time::GpsTime,
};

pub use station::Station;

/// [Encoder] renders each block (header, epoch) completely before
/// writing it in one go and flushing, so the output never holds a
/// partial block.
pub struct Encoder<W: Write> {
    writer: W,
    /// File creation date
    run: Epoch,
    header_released: bool,
    epochs: usize,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W, run: Epoch) -> Self {
        Self {
            writer,
            run,
            epochs: 0,
            header_released: false,
        }
    }

    fn release(&mut self, block: &str) -> Result<(), Error> {
        self.writer.write_all(block.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Releases the header, once
    pub fn emit_header(
        &mut self,
        identity: &ReceiverIdentity,
        station: &Station,
        first_obs: GpsTime,
        fix: &NavigationFix,
    ) -> Result<(), Error> {
        if self.header_released {
            return Ok(());
        }

        let header = header::format_header(identity, station, first_obs, fix, self.run)?;
        self.release(&header)?;
        self.header_released = true;
        Ok(())
    }

    /// Releases one epoch
    pub fn emit_epoch(&mut self, epoch: &ObservationEpoch) -> Result<(), Error> {
        let stanza = record::format_epoch(epoch)?;
        self.release(&stanza)?;
        self.epochs += 1;
        Ok(())
    }

    pub fn header_released(&self) -> bool {
        self.header_released
    }

    /// Number of epochs released so far
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
