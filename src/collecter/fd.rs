//! Output file descriptor, with optional gzip compression
use std::{
    fs::{create_dir_all, File, OpenOptions},
    io::Write,
    path::Path,
};

use flate2::{write::GzEncoder, Compression};

use crate::error::Error;

pub enum FileDescriptor {
    /// Readable file
    Plain(File),
    /// Gzip compressed file
    Gzip(GzEncoder<File>),
}

impl FileDescriptor {
    /// Creates the output file. An existing file is refused unless
    /// `overwrite` is set. Parent directories are created as needed.
    pub fn create(path: &str, gzip: bool, overwrite: bool) -> Result<Self, Error> {
        let failure = |e: std::io::Error| Error::OutputCreation {
            path: path.to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent).map_err(failure)?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true);

        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let fd = options.open(path).map_err(failure)?;

        if gzip {
            Ok(Self::Gzip(GzEncoder::new(fd, Compression::new(5))))
        } else {
            Ok(Self::Plain(fd))
        }
    }

    /// Terminates the file. Required to obtain a valid gzip trailer.
    pub fn finish(self) -> Result<(), Error> {
        match self {
            Self::Plain(mut fd) => fd.flush()?,
            Self::Gzip(fd) => {
                let mut fd = fd.finish()?;
                fd.flush()?;
            },
        }
        Ok(())
    }
}

impl Write for FileDescriptor {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(fd) => fd.write(buf),
            Self::Gzip(fd) => fd.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Plain(fd) => fd.flush(),
            Self::Gzip(fd) => fd.flush(),
        }
    }
}
