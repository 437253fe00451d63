//! Named line sources and sinks.
//!
//! Every failure coming out of a [`HexReader`] or [`HexWriter`] is wrapped
//! in [`Error::Source`] so that messages carry the file they came from.

use crate::error::{Error, Result};
use crate::transfer::{self, Region, WriteOptions};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct HexReader<R> {
    name: String,
    inner: R,
}

impl<R: BufRead> HexReader<R> {
    pub fn new(name: impl Into<String>, inner: R) -> Self {
        HexReader {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read_bytes(self, size: usize) -> Result<Vec<u8>> {
        let HexReader { name, inner } = self;
        transfer::try_read_bytes(lines(inner), size).map_err(|error| error.in_source(name))
    }

    pub fn read_words(self, size: usize, fill: u16) -> Result<Vec<u16>> {
        let HexReader { name, inner } = self;
        transfer::try_read_words(lines(inner), size, fill).map_err(|error| error.in_source(name))
    }

    pub fn read_dump(self, regions: &[Region]) -> Result<Vec<Vec<u8>>> {
        let HexReader { name, inner } = self;
        transfer::try_read_dump(lines(inner), regions).map_err(|error| error.in_source(name))
    }
}

/// Splits on `\n` and drops a trailing `\r`. Lines stay bytes so that a
/// stray non-ASCII byte is reported by the record parser with its line.
fn lines<R: BufRead>(inner: R) -> impl Iterator<Item = Result<Vec<u8>>> {
    inner.split(b'\n').map(|line| -> Result<Vec<u8>> {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(line)
    })
}

/// Appends record lines to a sink. Several writes to the same writer
/// compose into one file.
pub struct HexWriter<W> {
    name: String,
    inner: W,
}

impl<W: Write> HexWriter<W> {
    pub fn new(name: impl Into<String>, inner: W) -> Self {
        HexWriter {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write_bytes(&mut self, dump: &[u8], options: &WriteOptions) -> Result<()> {
        transfer::write_bytes(&mut self.inner, dump, options)
            .map_err(|error| error.in_source(self.name.as_str()))
    }

    pub fn write_words(&mut self, dump: &[u16], options: &WriteOptions) -> Result<()> {
        transfer::write_words(&mut self.inner, dump, options)
            .map_err(|error| error.in_source(self.name.as_str()))
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn open(path: &Path) -> Result<HexReader<BufReader<File>>> {
    let name = path.display().to_string();
    debug!("opening {} for reading", name);

    match File::open(path) {
        Ok(file) => Ok(HexReader::new(name, BufReader::new(file))),
        Err(error) => Err(Error::from(error).in_source(name)),
    }
}

fn append(path: &Path) -> Result<HexWriter<BufWriter<File>>> {
    let name = path.display().to_string();
    debug!("opening {} for appending", name);

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Ok(HexWriter::new(name, BufWriter::new(file))),
        Err(error) => Err(Error::from(error).in_source(name)),
    }
}

pub fn read_bytes_from_path<P: AsRef<Path>>(path: P, size: usize) -> Result<Vec<u8>> {
    open(path.as_ref())?.read_bytes(size)
}

pub fn read_words_from_path<P: AsRef<Path>>(path: P, size: usize, fill: u16) -> Result<Vec<u16>> {
    open(path.as_ref())?.read_words(size, fill)
}

pub fn read_dump_from_path<P: AsRef<Path>>(path: P, regions: &[Region]) -> Result<Vec<Vec<u8>>> {
    open(path.as_ref())?.read_dump(regions)
}

/// Appends `dump` to the file at `path`, creating it if needed.
pub fn append_bytes_to_path<P: AsRef<Path>>(
    path: P,
    dump: &[u8],
    options: &WriteOptions,
) -> Result<()> {
    append(path.as_ref())?.write_bytes(dump, options)
}

/// Appends `dump` to the file at `path`, creating it if needed.
pub fn append_words_to_path<P: AsRef<Path>>(
    path: P,
    dump: &[u16],
    options: &WriteOptions,
) -> Result<()> {
    append(path.as_ref())?.write_words(dump, options)
}
