//! Moves whole memory dumps in and out of Intel Hex.
//!
//! Readers walk the lines in order, keeping a 32-bit running address that
//! data records advance and extended linear address records replace.
//! Writers do the reverse, splitting a dump into data records that never
//! cross a 64 KiB page and announcing each new page with an extended
//! linear address record.

use crate::error::{Error, Result};
use crate::record::{Record, RecordKind};
use alloc::vec;
use alloc::vec::Vec;
use log::{debug, trace};

#[cfg(feature = "std")]
mod write;

#[cfg(feature = "std")]
pub use write::{write_bytes, write_words, WriteOptions, DEFAULT_BYTE_WIDTH, DEFAULT_WORD_WIDTH};

/// Value of a byte no record wrote to.
pub const ERASED_BYTE: u8 = 0xFF;

/// Value of a word no record wrote to, unless the caller picks another.
pub const ERASED_WORD: u16 = 0xFFFF;

/// A window of the 32-bit address space collected into its own dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub offset: u32,
    pub size: usize,
}

impl Region {
    pub const fn new(offset: u32, size: usize) -> Self {
        Region { offset, size }
    }

    /// Offset of `address` into the region. The end of the region is
    /// included so that a record starting there is reported as overflowing
    /// this region rather than searched for elsewhere.
    fn offset_of(&self, address: u32) -> Option<usize> {
        address
            .checked_sub(self.offset)
            .map(|offset| offset as usize)
            .filter(|&offset| offset <= self.size)
    }
}

/// Reads a flat byte dump of `size` bytes starting at address 0.
pub fn read_bytes<I, L>(lines: I, size: usize) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    try_read_bytes(lines.into_iter().map(Ok), size)
}

/// Reads a dump of `size` big-endian words. Word `n` lives at byte address `2 * n`.
pub fn read_words<I, L>(lines: I, size: usize, fill: u16) -> Result<Vec<u16>>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    try_read_words(lines.into_iter().map(Ok), size, fill)
}

/// Reads one byte dump per region.
///
/// The region holding the running address is found with a cursor that
/// starts at the last region used and steps forward, wrapping to the
/// first, until a region contains the address. Files whose records run
/// in ascending address order resolve with no search at all.
pub fn read_dump<I, L>(lines: I, regions: &[Region]) -> Result<Vec<Vec<u8>>>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    try_read_dump(lines.into_iter().map(Ok), regions)
}

pub(crate) fn try_read_bytes<I, L>(lines: I, size: usize) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Result<L>>,
    L: AsRef<[u8]>,
{
    debug!("reading byte dump of {} bytes", size);

    let mut dump = vec![ERASED_BYTE; size];

    assemble(lines, |line, address, payload| {
        let offset = address as usize;
        let end = fit(line, offset, payload.len(), size)?;

        dump[offset..end].copy_from_slice(payload);
        Ok(())
    })?;

    Ok(dump)
}

pub(crate) fn try_read_words<I, L>(lines: I, size: usize, fill: u16) -> Result<Vec<u16>>
where
    I: IntoIterator<Item = Result<L>>,
    L: AsRef<[u8]>,
{
    debug!("reading word dump of {} words", size);

    let mut dump = vec![fill; size];

    assemble(lines, |line, address, payload| {
        if payload.len() % 2 != 0 {
            return Err(Error::OddWordLength {
                line,
                length: payload.len(),
            });
        }

        let offset = (address / 2) as usize;
        let end = fit(line, offset, payload.len() / 2, size)?;

        for (word, pair) in dump[offset..end].iter_mut().zip(payload.chunks_exact(2)) {
            *word = u16::from_be_bytes([pair[0], pair[1]]);
        }
        Ok(())
    })?;

    Ok(dump)
}

pub(crate) fn try_read_dump<I, L>(lines: I, regions: &[Region]) -> Result<Vec<Vec<u8>>>
where
    I: IntoIterator<Item = Result<L>>,
    L: AsRef<[u8]>,
{
    debug!("reading dump into {} regions", regions.len());

    let mut dumps: Vec<Vec<u8>> = regions
        .iter()
        .map(|region| vec![ERASED_BYTE; region.size])
        .collect();
    let mut cursor = 0;

    assemble(lines, |line, address, payload| {
        let offset =
            seek(regions, &mut cursor, address).ok_or(Error::UnmappedAddress { line, address })?;

        let capacity = regions[cursor].size;
        let end = offset + payload.len();
        if end > capacity {
            return Err(Error::RegionOverflow {
                line,
                region: cursor,
                offset,
                count: payload.len(),
                capacity,
            });
        }

        dumps[cursor][offset..end].copy_from_slice(payload);
        Ok(())
    })?;

    Ok(dumps)
}

/// Moves `cursor` to the first region, counting cyclically from its
/// current position, that contains `address`. Leaves it unchanged when
/// no region does.
fn seek(regions: &[Region], cursor: &mut usize, address: u32) -> Option<usize> {
    for step in 0..regions.len() {
        let index = (*cursor + step) % regions.len();

        if let Some(offset) = regions[index].offset_of(address) {
            if index != *cursor {
                trace!("address {:#010x} moves to region {}", address, index);
                *cursor = index;
            }
            return Some(offset);
        }
    }

    None
}

fn fit(line: usize, offset: usize, count: usize, capacity: usize) -> Result<usize> {
    offset
        .checked_add(count)
        .filter(|&end| end <= capacity)
        .ok_or(Error::Overflow {
            line,
            offset,
            count,
            capacity,
        })
}

/// Feeds every data record to `place` along with the address it loads at,
/// stopping at the end of file record.
///
/// A data record loads at its own offset within the page of the running
/// address, and the running address then moves past it. Crossing the end
/// of a page this way carries into the next page even without an extended
/// linear address record.
fn assemble<I, L, F>(lines: I, mut place: F) -> Result<()>
where
    I: IntoIterator<Item = Result<L>>,
    L: AsRef<[u8]>,
    F: FnMut(usize, u32, &[u8]) -> Result<()>,
{
    let mut address: u32 = 0;

    for (line, text) in lines.into_iter().enumerate() {
        let record = Record::parse(text?).map_err(|source| Error::Parse { line, source })?;

        match record.kind() {
            RecordKind::Data => {
                let load = (address & 0xFFFF_0000) | u32::from(record.address());
                place(line, load, record.payload())?;
                address = load.wrapping_add(record.len() as u32);
            }
            RecordKind::ExtendedLinearAddress => {
                let payload = record.payload();
                if payload.len() != 2 {
                    return Err(Error::MalformedExtendedAddress {
                        line,
                        length: payload.len(),
                    });
                }

                address = u32::from(payload[0]) << 24 | u32::from(payload[1]) << 16;
                trace!("line {}: running address set to {:#010x}", line, address);
            }
            RecordKind::EndOfFile => {
                debug!("end of file record at line {}", line);
                return Ok(());
            }
            RecordKind::ExtendedSegmentAddress
            | RecordKind::StartSegmentAddress
            | RecordKind::StartLinearAddress => {}
        }
    }

    debug!("input ended without an end of file record");
    Ok(())
}
