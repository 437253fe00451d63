use core::fmt;
use thiserror::Error;

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, string::String};

/// What [`Error::Io`] carries. Without std there is no i/o to fail.
#[cfg(feature = "std")]
pub type IoError = std::io::Error;
#[cfg(all(feature = "alloc", not(feature = "std")))]
pub type IoError = core::convert::Infallible;

/// Field of a record line that failed to decode as hexadecimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Count,
    Address,
    Type,
    Data(usize),
    Checksum,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => f.write_str("byte count"),
            Self::Address => f.write_str("address"),
            Self::Type => f.write_str("record type"),
            Self::Data(index) => write!(f, "data byte {}", index),
            Self::Checksum => f.write_str("checksum"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("record is {length} characters long, the minimum is 11")]
    TooShort { length: usize },
    #[error("record does not start with ':'")]
    MissingStartMarker,
    #[error("malformed {0} field")]
    MalformedField(Field),
    #[error("byte count {count} needs a {expected} character record, found {actual}")]
    LengthMismatch {
        count: u8,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported record type {0:#04x}")]
    UnknownType(u8),
    #[error("checksum mismatch: record carries {expected:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { expected: u8, computed: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("invalid count {count}, at most {max} fit in one record")]
    InvalidCount { count: usize, max: usize },
    #[error("record needs {required} bytes, buffer holds {available}")]
    BufferTooSmall { required: usize, available: usize },
}

#[cfg(feature = "alloc")]
pub type Result<T> = core::result::Result<T, Error>;

/// Failure of a whole read or write pass.
///
/// Line numbers are 0-based and count every line handed to the reader.
#[cfg(feature = "alloc")]
#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("line {line}: dump overflow, cannot copy {count} cells at offset {offset:#x} into {capacity} cells")]
    Overflow {
        line: usize,
        offset: usize,
        count: usize,
        capacity: usize,
    },

    #[error("line {line}: region {region} overflow, cannot copy {count} bytes at offset {offset:#x} into {capacity} bytes")]
    RegionOverflow {
        line: usize,
        region: usize,
        offset: usize,
        count: usize,
        capacity: usize,
    },

    #[error("line {line}: address {address:#010x} is outside every region")]
    UnmappedAddress { line: usize, address: u32 },

    #[error("line {line}: {length} data bytes cannot be split into words")]
    OddWordLength { line: usize, length: usize },

    #[error("line {line}: extended linear address record carries {length} bytes, expected 2")]
    MalformedExtendedAddress { line: usize, length: usize },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("invalid line width {width}, expected 1 to {max}")]
    InvalidWidth { width: usize, max: usize },

    #[error("word dump offset {offset:#x} is not word aligned")]
    UnalignedOffset { offset: u32 },

    #[error("{length} bytes at offset {offset:#x} run past the 32-bit address space")]
    AddressOutOfRange { offset: u32, length: u64 },

    #[error("i/o error: {0}")]
    Io(#[from] IoError),

    #[error("\"{name}\": {source}")]
    Source {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

#[cfg(feature = "alloc")]
impl Error {
    #[cfg(feature = "std")]
    pub(crate) fn in_source(self, name: impl Into<String>) -> Self {
        Self::Source {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Strips any source identifier wrapping and returns the underlying failure.
    pub fn root(&self) -> &Error {
        match self {
            Self::Source { source, .. } => source.root(),
            other => other,
        }
    }
}
