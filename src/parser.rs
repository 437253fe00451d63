use crate::checksum::{checksum, sum};
use crate::error::{Field, ParseError};
use crate::record::{Record, RecordKind, MAX_PAYLOAD};
use core::iter::{Enumerate, FusedIterator};
use core::str::FromStr;

pub(crate) const START_CODE: u8 = b':';

/// Marker, count, address, type and checksum with no payload.
pub const MIN_LINE_LENGTH: usize = 1 + 2 + 4 + 2 + 2;

type ParseResult = Result<Record, ParseError>;

impl Record {
    /// Parses a single line, without its line terminator.
    ///
    /// Fields are checked in wire order, so the first problem found on the
    /// line is the one reported.
    pub fn parse<T: AsRef<[u8]>>(line: T) -> ParseResult {
        let line = line.as_ref();

        if line.len() < MIN_LINE_LENGTH {
            return Err(ParseError::TooShort { length: line.len() });
        }

        if line[0] != START_CODE {
            return Err(ParseError::MissingStartMarker);
        }

        let [count] = decode_field::<1>(&line[1..3], Field::Count)?;

        let expected = MIN_LINE_LENGTH + 2 * count as usize;
        if line.len() != expected {
            return Err(ParseError::LengthMismatch {
                count,
                expected,
                actual: line.len(),
            });
        }

        let address = decode_field::<2>(&line[3..7], Field::Address)?;
        let [record_type] = decode_field::<1>(&line[7..9], Field::Type)?;

        // Start linear address records are not accepted on input.
        let kind = match RecordKind::try_from(record_type) {
            Ok(RecordKind::StartLinearAddress) | Err(_) => {
                return Err(ParseError::UnknownType(record_type))
            }
            Ok(kind) => kind,
        };

        let mut payload = [0; MAX_PAYLOAD];
        let data = &line[9..line.len() - 2];
        for (index, pair) in data.chunks_exact(2).enumerate() {
            let [byte] = decode_field::<1>(pair, Field::Data(index))?;
            payload[index] = byte;
        }

        let header = [count, address[0], address[1], record_type];
        let computed = checksum(&header).wrapping_sub(sum(&payload[..count as usize]));
        let [carried] = decode_field::<1>(&line[line.len() - 2..], Field::Checksum)?;

        if computed != carried {
            return Err(ParseError::ChecksumMismatch {
                expected: carried,
                computed,
            });
        }

        Ok(Record::from_parts(
            kind,
            u16::from_be_bytes(address),
            count,
            payload,
        ))
    }
}

fn decode_field<const N: usize>(text: &[u8], field: Field) -> Result<[u8; N], ParseError> {
    let mut bytes = [0; N];

    if hex::decode_to_slice(text, &mut bytes).is_err() {
        return Err(ParseError::MalformedField(field));
    }

    Ok(bytes)
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Record::parse(s)
    }
}

/// Parses every line of a text, numbering lines from 0.
///
/// Blank lines are not skipped: they are reported as too short, the same
/// as the dump readers do.
pub struct Parser<'a> {
    inner: Enumerate<core::str::Lines<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Parser {
            inner: s.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = (usize, ParseResult);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(number, line)| (number, Record::parse(line)))
    }
}

impl<'a> FusedIterator for Parser<'a> {}
