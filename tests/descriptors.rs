mod common;

use atomdump::{MAX_DESCRIPTOR_DEPTH, ParseError};
use common::{descriptor, dump_str, find, full_atom, sample_entry, track_with_entry};

fn sound_track_with_esds(descriptors: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8; 8];
    body.extend_from_slice(&2u16.to_be_bytes());
    body.extend_from_slice(&16u16.to_be_bytes());
    body.extend_from_slice(&[0u8; 4]);
    body.extend_from_slice(&(48_000u32 << 16).to_be_bytes());
    body.extend_from_slice(&full_atom(b"esds", 0, 0, descriptors));
    track_with_entry(b"soun", &sample_entry(b"mp4a", &body))
}

#[test]
fn long_lengths_use_several_bytes() {
    let unknown = descriptor(0x42, &[0x5a; 130]);
    assert_eq!(&unknown[..3], &[0x42, 0x81, 0x02]);

    let (result, text) = dump_str(sound_track_with_esds(&unknown));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "esds").map(|a| a.unparsed), Some(0));
    assert!(text.contains("tag: 0x42"));
    assert!(text.contains("length: 130"));
}

#[test]
fn descriptor_larger_than_its_parent_fails() {
    let mut es = vec![0x03, 30];
    es.extend_from_slice(&[0u8; 25]);

    let (result, text) = dump_str(sound_track_with_esds(&es));
    assert!(matches!(result, Err(ParseError::Check { .. })));
    assert!(text.contains("length: 30"));
}

#[test]
fn children_must_fill_the_descriptor() {
    // ES payload claims 6 bytes but its child needs 4 after the 3-byte header
    let mut es = vec![0x00, 0x01, 0x00];
    es.extend_from_slice(&descriptor(0x06, &[0x02, 0x00]));
    let mut bytes = descriptor(0x03, &es);
    bytes[1] = 6;
    bytes.push(0);

    let (result, _) = dump_str(sound_track_with_esds(&bytes));
    assert!(matches!(result, Err(ParseError::Check { .. })));
}

#[test]
fn five_length_bytes_are_rejected() {
    let bytes = [0x05, 0x80, 0x80, 0x80, 0x80, 0x01, 0x00];
    let (result, _) = dump_str(sound_track_with_esds(&bytes));
    assert!(matches!(result, Err(ParseError::Check { .. })));
}

#[test]
fn nesting_is_capped() {
    let mut nested = descriptor(0x03, &[0x00, 0x01, 0x00]);
    for _ in 0..MAX_DESCRIPTOR_DEPTH + 4 {
        let mut es = vec![0x00, 0x01, 0x00];
        es.extend_from_slice(&nested);
        nested = descriptor(0x03, &es);
    }

    let (result, _) = dump_str(sound_track_with_esds(&nested));
    match result {
        Err(ParseError::TooDeep { what, limit }) => {
            assert_eq!(what, "descriptors");
            assert_eq!(limit, MAX_DESCRIPTOR_DEPTH);
        }
        other => panic!("expected TooDeep, got {other:?}"),
    }
}

#[test]
fn nested_fields_indent_per_level() {
    let mut es = vec![0x00, 0x02, 0x00];
    es.extend_from_slice(&descriptor(0x06, &[0x02]));
    let (result, text) = dump_str(sound_track_with_esds(&descriptor(0x03, &es)));
    result.expect("dump");

    let esds_indent = text
        .lines()
        .find(|l| l.trim_start().starts_with("esds:"))
        .map(|l| l.len() - l.trim_start().len())
        .expect("esds line");
    let value = " ".repeat(esds_indent + 2);
    assert!(text.contains(&format!("\n{value}descriptor:\n")));
    assert!(text.contains(&format!("\n{value}    es_id: 0x0002\n")));
    assert!(text.contains(&format!("\n{value}    descriptor:\n")));
    assert!(text.contains(&format!("\n{value}        predefined: 0x02\n")));
}
