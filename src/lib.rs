#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod checksum;
mod error;
mod parser;
mod record;
mod serializer;
pub mod types;

#[cfg(feature = "std")]
pub mod io;
#[cfg(feature = "alloc")]
pub mod transfer;

pub use error::{EncodeError, Field, ParseError};
pub use parser::{Parser, MIN_LINE_LENGTH};
pub use record::{Record, RecordKind, MAX_PAYLOAD, MAX_WORD_PAYLOAD};
pub use serializer::MAX_LINE_LENGTH;

#[cfg(feature = "alloc")]
pub use serializer::{encode_data_bytes, encode_data_words, encode_extended_address};

#[cfg(feature = "alloc")]
pub use error::{Error, IoError, Result};
#[cfg(feature = "alloc")]
pub use transfer::{read_bytes, read_dump, read_words, Region, ERASED_BYTE, ERASED_WORD};

#[cfg(feature = "std")]
pub use io::{HexReader, HexWriter};
#[cfg(feature = "std")]
pub use transfer::{
    write_bytes, write_words, WriteOptions, DEFAULT_BYTE_WIDTH, DEFAULT_WORD_WIDTH,
};
