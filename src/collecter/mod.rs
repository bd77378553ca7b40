use std::io::{Read, Write};

use log::{debug, error, info, warn};

use tokio::sync::watch;

pub mod assembler;
pub mod fd;
pub mod rinex;
pub mod runtime;
pub mod settings;
pub mod statistics;

use assembler::{Assembler, ObservationEpoch};
use rinex::{Encoder, Station};
use runtime::Runtime;
use statistics::Statistics;

use crate::{ashtech::ReceiverIdentity, error::Error, stream::RecordStream};

/// [Collecter] drives the pipeline: records are pulled from the stream,
/// assembled into epochs, each epoch being encoded as soon as it completes.
pub struct Collecter<R: Read, W: Write> {
    rtm: Runtime,
    stream: RecordStream<R>,
    assembler: Assembler,
    encoder: Encoder<W>,
    identity: ReceiverIdentity,
    station: Station,
    shutdown: watch::Receiver<bool>,
    stats: Statistics,
}

impl<R: Read, W: Write> Collecter<R, W> {
    pub fn new(
        rtm: Runtime,
        stream: RecordStream<R>,
        assembler: Assembler,
        writer: W,
        identity: ReceiverIdentity,
        station: Station,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            rtm,
            stream,
            assembler,
            identity,
            station,
            shutdown,
            encoder: Encoder::new(writer, rtm.deploy_time),
            stats: Statistics::default(),
        }
    }

    /// Runs until end of stream, shutdown request or fatal error.
    /// Statistics are reported in every case.
    pub fn run(&mut self) -> Result<(), Error> {
        debug!("{} - collecter deployed", self.rtm.deploy_time);

        let ret = self.consume();

        self.stats.epochs = self.encoder.epochs();
        self.stats.abandoned_sets = self.assembler.abandoned_sets();
        self.stats.duplicates = self.assembler.duplicates();
        self.stats.uptime = self.rtm.uptime();

        info!("{}", self.stats);
        ret
    }

    fn consume(&mut self) -> Result<(), Error> {
        loop {
            if *self.shutdown.borrow() {
                info!("shutdown requested");
                if self.assembler.state() == assembler::State::CollectingSatellites {
                    debug!("pending satellite set abandoned");
                }
                return Ok(());
            }

            let record = match self.stream.next() {
                Some(Ok(record)) => record,
                Some(Err(Error::NoData)) => continue,
                Some(Err(e)) => {
                    if e.is_fatal() {
                        error!("{}", e);
                        return Err(e);
                    }
                    warn!("message dropped: {}", e);
                    self.stats.drop_message(&e);
                    continue;
                },
                None => {
                    info!("end of stream");
                    return Ok(());
                },
            };

            self.stats.records += 1;

            if let Some(epoch) = self.assembler.push(record) {
                self.release(&epoch)?;
            }
        }
    }

    fn release(&mut self, epoch: &ObservationEpoch) -> Result<(), Error> {
        if !self.encoder.header_released() {
            let first_obs = self.assembler.first_observation().unwrap_or(epoch.time);

            self.encoder
                .emit_header(&self.identity, &self.station, first_obs, &epoch.fix)?;

            info!("{} - header released", first_obs);

            let (lat, lon, height) = epoch.fix.position.ddmmss_strings();
            info!("approximate position: {} {} {}m", lat, lon, height);
        }

        self.encoder.emit_epoch(epoch)?;
        debug!("{} - epoch released ({} sv)", epoch.time, epoch.len());
        Ok(())
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Returns the output, once the run is over
    pub fn into_inner(self) -> W {
        self.encoder.into_inner()
    }
}

#[cfg(test)]
mod test {
    use super::{runtime::Runtime, Collecter, Station};
    use crate::{
        ashtech::ReceiverIdentity,
        collecter::assembler::{Assembler, AssemblerSettings},
        message::{
            fixture::{MpcFixture, PbnFixture},
            settings::DecoderSettings,
        },
        stream::RecordStream,
    };
    use std::io::Cursor;
    use tokio::sync::watch;

    /// Two satellites then the navigation fix, for each time of week
    fn capture(tows: &[f64]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for tow in tows {
            for (prn, left) in [(12, 1), (3, 0)] {
                let mut mpc = MpcFixture::new(prn);
                mpc.sequence = ((tow % 1800.0) * 20.0) as u16;
                mpc.left = left;
                bytes.extend(mpc.frame());
            }
            bytes.extend(PbnFixture::new(*tow).frame());
        }
        bytes
    }

    fn collecter(
        bytes: Vec<u8>,
        shutdown: watch::Receiver<bool>,
    ) -> Collecter<Cursor<Vec<u8>>, Vec<u8>> {
        let mut assembler = Assembler::new(AssemblerSettings::default());
        assembler.set_week(2059);

        Collecter::new(
            Runtime::new().unwrap(),
            RecordStream::new(Cursor::new(bytes), DecoderSettings::default()),
            assembler,
            Vec::new(),
            ReceiverIdentity::default(),
            Station::default(),
            shutdown,
        )
    }

    #[test]
    fn pipeline() {
        let mut bytes = capture(&[484_600.0]);

        // noise between epochs
        let mut corrupt = MpcFixture::new(7).frame();
        corrupt[20] ^= 0x01;
        bytes.extend(corrupt);
        bytes.extend(MpcFixture::new(40).frame());
        bytes.extend(b"$PASHR,XYZ,abc\r\n");

        bytes.extend(capture(&[484_620.0]));

        let (_tx, rx) = watch::channel(false);
        let mut collecter = collecter(bytes, rx);

        collecter.run().unwrap();

        let stats = collecter.statistics().clone();
        assert_eq!(stats.epochs, 2);
        assert_eq!(stats.records, 6);
        assert_eq!(stats.total_dropped(), 3);
        assert_eq!(stats.dropped.get("checksum"), Some(&1));
        assert_eq!(stats.dropped.get("invalid prn"), Some(&1));
        assert_eq!(stats.dropped.get("unknown type"), Some(&1));

        let content = String::from_utf8(collecter.into_inner()).unwrap();
        assert_eq!(content.matches("END OF HEADER").count(), 1);

        let header = content
            .lines()
            .find(|line| line.contains("TIME OF FIRST OBS"))
            .unwrap();
        assert!(header.starts_with("  2019     6    28    14    36   40.0000000"));

        let epochs = content
            .lines()
            .filter(|line| line.starts_with(" 19  6 28"))
            .collect::<Vec<_>>();

        assert_eq!(
            epochs,
            vec![
                " 19  6 28 14 36 40.0000000  0  2G03G12",
                " 19  6 28 14 37  0.0000000  0  2G03G12",
            ]
        );
    }

    #[test]
    fn shutdown() {
        let (tx, rx) = watch::channel(false);
        let mut collecter = collecter(capture(&[484_600.0, 484_620.0]), rx);

        tx.send(true).unwrap();
        collecter.run().unwrap();

        assert_eq!(collecter.statistics().epochs, 0);
        assert!(collecter.into_inner().is_empty());
    }
}
