use crate::error::EncodeError;
use crate::types;
use core::fmt;

/// Largest payload a single record can carry.
pub const MAX_PAYLOAD: usize = 0xFF;

/// Largest payload, in 16-bit words, a single data record can carry.
pub const MAX_WORD_PAYLOAD: usize = MAX_PAYLOAD / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordKind {
    Data = types::DATA,
    EndOfFile = types::END_OF_FILE,
    ExtendedSegmentAddress = types::EXTENDED_SEGMENT_ADDRESS,
    StartSegmentAddress = types::START_SEGMENT_ADDRESS,
    ExtendedLinearAddress = types::EXTENDED_LINEAR_ADDRESS,
    StartLinearAddress = types::START_LINEAR_ADDRESS,
}

impl RecordKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RecordKind {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            types::DATA => Ok(Self::Data),
            types::END_OF_FILE => Ok(Self::EndOfFile),
            types::EXTENDED_SEGMENT_ADDRESS => Ok(Self::ExtendedSegmentAddress),
            types::START_SEGMENT_ADDRESS => Ok(Self::StartSegmentAddress),
            types::EXTENDED_LINEAR_ADDRESS => Ok(Self::ExtendedLinearAddress),
            types::START_LINEAR_ADDRESS => Ok(Self::StartLinearAddress),
            other => Err(other),
        }
    }
}

/// One line of an Intel Hex file.
///
/// The payload is stored inline so that parsing and serializing never
/// allocate. Only the first `len()` bytes are meaningful.
#[derive(Clone, Copy)]
pub struct Record {
    kind: RecordKind,
    address: u16,
    length: u8,
    bytes: [u8; MAX_PAYLOAD],
}

impl Record {
    pub fn new(kind: RecordKind, address: u16, payload: &[u8]) -> Result<Record, EncodeError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(EncodeError::InvalidCount {
                count: payload.len(),
                max: MAX_PAYLOAD,
            });
        }

        let mut bytes = [0; MAX_PAYLOAD];
        bytes[..payload.len()].copy_from_slice(payload);

        Ok(Record {
            kind,
            address,
            length: payload.len() as u8,
            bytes,
        })
    }

    /// Wraps a payload already decoded in place. Bytes past `length` are ignored.
    pub(crate) fn from_parts(
        kind: RecordKind,
        address: u16,
        length: u8,
        bytes: [u8; MAX_PAYLOAD],
    ) -> Record {
        Record {
            kind,
            address,
            length,
            bytes,
        }
    }

    pub fn data(address: u16, payload: &[u8]) -> Result<Record, EncodeError> {
        Self::new(RecordKind::Data, address, payload)
    }

    /// Builds a data record from 16-bit words, each stored big-endian.
    pub fn data_words(address: u16, words: &[u16]) -> Result<Record, EncodeError> {
        if words.len() > MAX_WORD_PAYLOAD {
            return Err(EncodeError::InvalidCount {
                count: words.len(),
                max: MAX_WORD_PAYLOAD,
            });
        }

        let mut bytes = [0; MAX_PAYLOAD];
        for (pair, word) in bytes.chunks_exact_mut(2).zip(words) {
            pair.copy_from_slice(&word.to_be_bytes());
        }

        Ok(Record {
            kind: RecordKind::Data,
            address,
            length: (words.len() * 2) as u8,
            bytes,
        })
    }

    pub fn end_of_file() -> Record {
        Record {
            kind: RecordKind::EndOfFile,
            address: 0,
            length: 0,
            bytes: [0; MAX_PAYLOAD],
        }
    }

    /// Sets the upper 16 bits of the address applied to the data records that follow.
    pub fn extended_linear_address(high: u16) -> Record {
        let mut bytes = [0; MAX_PAYLOAD];
        bytes[..2].copy_from_slice(&high.to_be_bytes());

        Record {
            kind: RecordKind::ExtendedLinearAddress,
            address: 0,
            length: 2,
            bytes,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.address == other.address && self.payload() == other.payload()
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("kind", &self.kind)
            .field("address", &format_args!("{:#06x}", self.address))
            .field("payload", &self.payload())
            .finish()
    }
}
