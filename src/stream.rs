//! Pull based stream of decoded [Record]s
use std::io::Read;

use crate::{
    error::Error,
    message::{framing::Framer, settings::DecoderSettings, Record},
};

/// [RecordStream] decodes each frame of its [Framer] as it is pulled.
/// Items are yielded in arrival order; decoding errors are yielded
/// as they come so the consumer may log and count them.
pub struct RecordStream<R: Read> {
    framer: Framer<R>,
    settings: DecoderSettings,
}

impl<R: Read> RecordStream<R> {
    pub fn new(reader: R, settings: DecoderSettings) -> Self {
        Self {
            settings,
            framer: Framer::new(reader),
        }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = match self.framer.next()? {
            Ok(raw) => raw,
            Err(e) => return Some(Err(e)),
        };

        Some(Record::decode(&raw, &self.settings))
    }
}

#[cfg(test)]
mod test {
    use super::RecordStream;
    use crate::{
        error::Error,
        message::{
            fixture::{MpcFixture, PbnFixture},
            settings::DecoderSettings,
            Record,
        },
    };
    use std::io::Cursor;

    #[test]
    fn record_stream() {
        let mut bytes = PbnFixture::new(600.0).frame();

        let mut corrupt = MpcFixture::new(3).frame();
        corrupt[40] ^= 0xff;
        bytes.extend(corrupt);

        bytes.extend(MpcFixture::new(33).frame());
        bytes.extend(MpcFixture::new(4).frame());
        bytes.extend(b"$PASHR,SAL,whatever\r\n");
        bytes.extend(b"$PASHR,ZZZ,whatever\r\n");

        let items = RecordStream::new(Cursor::new(bytes), DecoderSettings::default())
            .collect::<Vec<_>>();

        assert_eq!(items.len(), 6);
        assert!(matches!(items[0], Ok(Record::Navigation(_))));
        assert!(matches!(items[1], Err(Error::Checksum { .. })));
        assert!(matches!(items[2], Err(Error::InvalidPrn(33))));
        assert!(matches!(items[3], Ok(Record::Satellite(ref mpc)) if mpc.prn == 4));
        assert!(matches!(items[4], Ok(Record::Ignored(_))));
        assert!(matches!(items[5], Err(Error::UnknownMessage(_))));
    }
}
