use super::{Error, Result};
use crate::error::EncodeError;
use crate::record::{Record, MAX_PAYLOAD, MAX_WORD_PAYLOAD};
use log::{debug, trace};
use std::io::Write;

/// Data bytes per line when [`WriteOptions::width`] is not set.
pub const DEFAULT_BYTE_WIDTH: usize = 16;

/// Data words per line when [`WriteOptions::width`] is not set.
pub const DEFAULT_WORD_WIDTH: usize = 8;

const PAGE_SIZE: u64 = 0x1_0000;
const ADDRESS_SPACE: u64 = 0x1_0000_0000;

/// Placement and framing of one write pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    offset: u32,
    width: Option<usize>,
    end_of_file: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            offset: 0,
            width: None,
            end_of_file: true,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address of the first byte of the dump.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Cells per data record: bytes for byte dumps, words for word dumps.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Whether the pass ends the file. Leave it off on every pass but the
    /// last when several dumps go into one file.
    pub fn end_of_file(mut self, end_of_file: bool) -> Self {
        self.end_of_file = end_of_file;
        self
    }
}

/// Writes `dump` as data records starting at `options.offset`.
pub fn write_bytes<W: Write>(sink: W, dump: &[u8], options: &WriteOptions) -> Result<()> {
    let width = check_width(options.width.unwrap_or(DEFAULT_BYTE_WIDTH), MAX_PAYLOAD)?;
    check_range(options.offset, dump.len() as u64)?;

    debug!(
        "writing {} bytes at {:#010x}, {} per line",
        dump.len(),
        options.offset,
        width
    );

    write_pass(sink, dump, 1, width, options, Record::data)
}

/// Writes `dump` as big-endian words starting at byte address `options.offset`.
pub fn write_words<W: Write>(sink: W, dump: &[u16], options: &WriteOptions) -> Result<()> {
    let width = check_width(options.width.unwrap_or(DEFAULT_WORD_WIDTH), MAX_WORD_PAYLOAD)?;
    if options.offset % 2 != 0 {
        return Err(Error::UnalignedOffset {
            offset: options.offset,
        });
    }
    check_range(options.offset, 2 * dump.len() as u64)?;

    debug!(
        "writing {} words at {:#010x}, {} per line",
        dump.len(),
        options.offset,
        width
    );

    write_pass(sink, dump, 2, width, options, Record::data_words)
}

fn check_width(width: usize, max: usize) -> Result<usize> {
    if width == 0 || width > max {
        return Err(Error::InvalidWidth { width, max });
    }

    Ok(width)
}

fn check_range(offset: u32, length: u64) -> Result<()> {
    if u64::from(offset) + length > ADDRESS_SPACE {
        return Err(Error::AddressOutOfRange { offset, length });
    }

    Ok(())
}

fn write_pass<W, T, E>(
    mut sink: W,
    cells: &[T],
    cell_size: usize,
    width: usize,
    options: &WriteOptions,
    encode: E,
) -> Result<()>
where
    W: Write,
    E: Fn(u16, &[T]) -> core::result::Result<Record, EncodeError>,
{
    let written = write_records(&mut sink, cells, cell_size, width, options, encode);
    let flushed = sink.flush().map_err(Error::from);

    written.and(flushed)
}

fn write_records<W, T, E>(
    sink: &mut W,
    cells: &[T],
    cell_size: usize,
    width: usize,
    options: &WriteOptions,
    encode: E,
) -> Result<()>
where
    W: Write,
    E: Fn(u16, &[T]) -> core::result::Result<Record, EncodeError>,
{
    let mut address = u64::from(options.offset);
    let mut index = 0;

    while index < cells.len() {
        let page_offset = address % PAGE_SIZE;
        let first = index == 0;

        // The first line needs the page announced whenever it is not page
        // zero; later lines only when they start a new page.
        if (first && address >= PAGE_SIZE) || (!first && page_offset == 0) {
            let page = (address / PAGE_SIZE) as u16;
            trace!("entering page {:#06x}", page);
            writeln!(sink, "{}", Record::extended_linear_address(page))?;
        }

        let room = ((PAGE_SIZE - page_offset) as usize) / cell_size;
        let count = room.min(width).min(cells.len() - index);

        let record = encode(page_offset as u16, &cells[index..index + count])?;
        writeln!(sink, "{}", record)?;

        index += count;
        address += (count * cell_size) as u64;
    }

    if options.end_of_file {
        writeln!(sink, "{}", Record::end_of_file())?;
    }

    Ok(())
}
