#![cfg(feature = "std")]

use ihex_dump::{
    read_bytes, read_dump, write_bytes, write_words, Error, HexReader, HexWriter, ParseError,
    Parser, Record, RecordKind, Region, WriteOptions, DEFAULT_BYTE_WIDTH, DEFAULT_WORD_WIDTH,
};
use pretty_assertions::assert_eq;
use std::io::Cursor;

const EEPROM: &str = "\
:10000000000102030405060708090A0B0C0D0E0F78
:10001000101112131415161718191A1B1C1D1E1F68
:00000001FF
";

fn write_lines(dump: &[u8], options: &WriteOptions) -> Vec<String> {
    let mut sink = Vec::new();
    write_bytes(&mut sink, dump, options).unwrap();

    String::from_utf8(sink)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn reads_known_file() {
    let dump = read_bytes(EEPROM.lines(), 40).unwrap();

    assert_eq!(&dump[..32], &(0..32).collect::<Vec<u8>>()[..]);
    assert_eq!(&dump[32..], &[0xFF; 8]);
}

#[test]
fn writes_known_file() {
    let dump: Vec<u8> = (0..32).collect();

    assert_eq!(
        write_lines(&dump, &WriteOptions::new()),
        EEPROM.lines().map(String::from).collect::<Vec<_>>()
    );
}

#[test]
fn unset_width_falls_back_to_default() {
    let lines = write_lines(&[0; DEFAULT_BYTE_WIDTH + 1], &WriteOptions::new());
    assert_eq!(Record::parse(&lines[0]).unwrap().len(), DEFAULT_BYTE_WIDTH);
    assert_eq!(Record::parse(&lines[1]).unwrap().len(), 1);

    let mut sink = Vec::new();
    write_words(&mut sink, &[0; DEFAULT_WORD_WIDTH + 1], &WriteOptions::new()).unwrap();
    let text = String::from_utf8(sink).unwrap();
    let first = text.lines().next().unwrap();

    assert_eq!(Record::parse(first).unwrap().len(), 2 * DEFAULT_WORD_WIDTH);
}

#[test]
fn crossing_a_page_emits_one_extended_address_line() {
    let dump = vec![0x5A; 0x10000 + 16];
    let lines = write_lines(&dump, &WriteOptions::new());

    let extended: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with(":02000004"))
        .map(|(index, _)| index)
        .collect();

    assert_eq!(extended, vec![0x1000]);
    assert_eq!(lines[0x1000], ":020000040001F9");
    assert_eq!(
        Record::parse(&lines[0x1001]).unwrap().address(),
        0x0000
    );
    assert_eq!(lines.len(), 0x1000 + 3);
    assert_eq!(lines.last().map(String::as_str), Some(":00000001FF"));
}

#[test]
fn regions_are_filled_in_order() {
    let lines = [
        ":0100000011EE",
        ":0100010022DC",
        ":0100020033CA",
        ":0100030044B8",
        ":0101000055A9",
        ":010101006697",
        ":00000001FF",
    ];
    let regions = [Region::new(0, 4), Region::new(0x100, 4)];

    assert_eq!(
        read_dump(&lines, &regions).unwrap(),
        vec![
            vec![0x11, 0x22, 0x33, 0x44],
            vec![0x55, 0x66, 0xFF, 0xFF]
        ]
    );
}

#[test]
fn regions_written_separately_read_back_together() {
    let flash: Vec<u8> = (0..40).collect();
    let config = [0x3F, 0xCF];
    let eeprom = [0xA5; 4];

    let mut writer = HexWriter::new("pic.hex", Vec::new());
    writer
        .write_bytes(&flash, &WriteOptions::new().end_of_file(false))
        .unwrap();
    writer
        .write_bytes(
            &eeprom,
            &WriteOptions::new().offset(0x00F0_0000).end_of_file(false),
        )
        .unwrap();
    writer
        .write_bytes(&config, &WriteOptions::new().offset(0x0030_0000))
        .unwrap();

    let text = String::from_utf8(writer.into_inner()).unwrap();
    let end_lines = text.lines().filter(|line| *line == ":00000001FF").count();
    assert_eq!(end_lines, 1);
    assert_eq!(text.lines().last(), Some(":00000001FF"));

    let regions = [
        Region::new(0, 64),
        Region::new(0x0030_0000, 2),
        Region::new(0x00F0_0000, 8),
    ];
    let dumps = HexReader::new("pic.hex", Cursor::new(text))
        .read_dump(&regions)
        .unwrap();

    assert_eq!(&dumps[0][..40], &flash[..]);
    assert_eq!(&dumps[0][40..], &[0xFF; 24]);
    assert_eq!(dumps[1], config.to_vec());
    assert_eq!(dumps[2], vec![0xA5, 0xA5, 0xA5, 0xA5, 0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn structural_errors_carry_source_and_line() {
    let text = ":0100000042BD\n:0200000042BD\n";
    let error = HexReader::new("bad.hex", Cursor::new(text))
        .read_bytes(4)
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "\"bad.hex\": line 1: byte count 2 needs a 15 character record, found 13"
    );
    assert!(matches!(
        error.root(),
        Error::Parse {
            line: 1,
            source: ParseError::LengthMismatch { count: 2, .. }
        }
    ));
}

#[test]
fn parser_walks_every_line() {
    let kinds: Vec<_> = Parser::new(EEPROM)
        .map(|(_, record)| record.map(|record| record.kind()))
        .collect();

    assert_eq!(
        kinds,
        vec![
            Ok(RecordKind::Data),
            Ok(RecordKind::Data),
            Ok(RecordKind::EndOfFile)
        ]
    );
}
