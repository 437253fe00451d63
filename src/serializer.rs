use crate::checksum::checksum;
use crate::error::EncodeError;
use crate::parser::START_CODE;
use crate::record::{Record, MAX_PAYLOAD};
use core::fmt;

#[cfg(feature = "alloc")]
use alloc::string::{String, ToString};

/// Longest line a record can serialize to.
pub const MAX_LINE_LENGTH: usize = 1 + 2 * (4 + MAX_PAYLOAD + 1);

impl Record {
    /// Writes the framed line, in upper-case hex and without a line
    /// terminator, to the front of `buffer` and returns its length.
    pub fn serialize<T>(&self, buffer: &mut T) -> Result<usize, EncodeError>
    where
        T: AsMut<[u8]>,
    {
        format(
            self.kind().code(),
            self.address(),
            self.payload(),
            buffer.as_mut(),
        )
    }

    /// Length of the serialized line.
    pub fn line_len(&self) -> usize {
        1 + 2 * (4 + self.len() + 1)
    }

    #[cfg(feature = "alloc")]
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

fn format(
    record_type: u8,
    offset: u16,
    data: &[u8],
    buffer: &mut [u8],
) -> Result<usize, EncodeError> {
    let data_length = 1 + 2 + 1 + data.len() + 1;

    let buffer_length = 2 * data_length + 1;
    if buffer.len() < buffer_length {
        return Err(EncodeError::BufferTooSmall {
            required: buffer_length,
            available: buffer.len(),
        });
    }

    let mut bytes = [0; 4 + MAX_PAYLOAD + 1];
    bytes[0] = data.len() as u8;
    bytes[1..3].copy_from_slice(&offset.to_be_bytes());
    bytes[3] = record_type;
    bytes[4..data_length - 1].copy_from_slice(data);
    bytes[data_length - 1] = checksum(&bytes[..data_length - 1]);

    buffer[0] = START_CODE;

    let text = &mut buffer[1..buffer_length];
    if hex::encode_to_slice(&bytes[..data_length], text).is_err() {
        return Err(EncodeError::BufferTooSmall {
            required: buffer_length,
            available: buffer.len(),
        });
    }
    text.make_ascii_uppercase();

    Ok(buffer_length)
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0; MAX_LINE_LENGTH];
        let length = self.serialize(&mut buffer).map_err(|_| fmt::Error)?;
        let line = core::str::from_utf8(&buffer[..length]).map_err(|_| fmt::Error)?;

        f.write_str(line)
    }
}

/// Encodes `bytes` as one data record loaded at `address`.
#[cfg(feature = "alloc")]
pub fn encode_data_bytes(address: u16, bytes: &[u8]) -> Result<String, EncodeError> {
    Record::data(address, bytes).map(|record| record.to_line())
}

/// Encodes `words` as one data record loaded at `address`, each word
/// emitted high byte first.
#[cfg(feature = "alloc")]
pub fn encode_data_words(address: u16, words: &[u16]) -> Result<String, EncodeError> {
    Record::data_words(address, words).map(|record| record.to_line())
}

/// Encodes the extended linear address record selecting the 64 KiB page `high`.
#[cfg(feature = "alloc")]
pub fn encode_extended_address(high: u16) -> String {
    Record::extended_linear_address(high).to_line()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;

    #[test]
    fn serialize_data() {
        let record = Record::data(
            0x0010,
            &[
                0x61, 0x64, 0x64, 0x72, 0x65, 0x73, 0x73, 0x20, 0x67, 0x61, 0x70,
            ],
        )
        .unwrap();

        let mut buffer = [0; 0x200];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], b":0B0010006164647265737320676170A7");
        assert_eq!(length, record.line_len());
    }

    #[test]
    fn serialize_eof() {
        let mut buffer = [0; 0x200];
        let length = Record::end_of_file().serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], b":00000001FF");
    }

    #[test]
    fn serialize_extended_segment_address() {
        let record = Record::new(RecordKind::ExtendedSegmentAddress, 0, &[0x12, 0xFE]).unwrap();

        let mut buffer = [0; 0x200];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], b":0200000212FEEC");
    }

    #[test]
    fn serialize_start_segment_address() {
        let record =
            Record::new(RecordKind::StartSegmentAddress, 0, &[0x12, 0x34, 0x38, 0x00]).unwrap();

        let mut buffer = [0; 0x200];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], b":04000003123438007B");
    }

    #[test]
    fn serialize_extended_linear_address() {
        let mut buffer = [0; 0x200];
        let length = Record::extended_linear_address(0xABCD)
            .serialize(&mut buffer)
            .unwrap();

        assert_eq!(&buffer[..length], b":02000004ABCD82");
    }

    #[test]
    fn serialize_into_short_buffer() {
        let mut buffer = [0; 10];

        assert_eq!(
            Record::end_of_file().serialize(&mut buffer),
            Err(EncodeError::BufferTooSmall {
                required: 11,
                available: 10
            })
        );
    }

    #[test]
    fn full_record_fits_max_line() {
        let record = Record::data(0xFFFF, &[0xEE; MAX_PAYLOAD]).unwrap();
        let mut buffer = [0; MAX_LINE_LENGTH];

        assert_eq!(record.serialize(&mut buffer), Ok(MAX_LINE_LENGTH));
        assert_eq!(Record::parse(&buffer[..]), Ok(record));
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn encode_lines() {
        assert_eq!(
            encode_data_bytes(0x0010, b"address gap").unwrap(),
            ":0B0010006164647265737320676170A7"
        );
        assert_eq!(
            encode_data_words(0x0000, &[0x0C94, 0x3400]).unwrap(),
            ":040000000C94340028"
        );
        assert_eq!(encode_extended_address(0x0030), ":020000040030CA");
        assert_eq!(Record::end_of_file().to_line(), ":00000001FF");
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn encode_rejects_invalid_counts() {
        assert_eq!(
            encode_data_bytes(0, &[0; 256]),
            Err(EncodeError::InvalidCount {
                count: 256,
                max: 255
            })
        );
        assert_eq!(
            encode_data_words(0, &[0; 128]),
            Err(EncodeError::InvalidCount {
                count: 128,
                max: 127
            })
        );
    }
}
