mod common;

use atomdump::ParseError;
use common::{atom_lines, be32, dump_str, find, full_atom, sample_table};

fn table(typ: &[u8; 4], count: u32, rows: &[u8]) -> Vec<u8> {
    let mut payload = count.to_be_bytes().to_vec();
    payload.extend_from_slice(rows);
    full_atom(typ, 0, 0, &payload)
}

fn stsz(sample_size: u32, count: u32, sizes: &[u32]) -> Vec<u8> {
    full_atom(b"stsz", 0, 0, &be32(&[&[sample_size, count][..], sizes].concat()))
}

fn header_and(rows: &[&str]) -> Vec<String> {
    ["  version: 0", "  flags: 0x000000"]
        .iter()
        .chain(rows)
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn time_and_sync_tables() {
    let mut ctts_rows = be32(&[1]);
    ctts_rows.extend_from_slice(&2002i32.to_be_bytes());
    ctts_rows.extend_from_slice(&be32(&[2]));
    ctts_rows.extend_from_slice(&(-1001i32).to_be_bytes());

    let children = [
        table(b"stts", 2, &be32(&[5, 1001, 1, 2002])),
        table(b"ctts", 2, &ctts_rows),
        table(b"stss", 2, &be32(&[1, 31])),
        full_atom(b"sdtp", 0, 0, &[0x24, 0x98]),
    ]
    .concat();

    let (result, text) = dump_str(sample_table(&children));
    let outline = result.expect("dump");
    assert!(outline.iter().flat_map(|a| a.walk()).all(|a| a.unparsed == 0));

    assert_eq!(
        atom_lines(&text, "stts"),
        header_and(&[
            "  entries (         2):",
            "         i       count   duration",
            "      0000  0x00000005 0x000003e9",
            "      0001  0x00000001 0x000007d2",
        ])
    );
    assert_eq!(
        atom_lines(&text, "ctts"),
        header_and(&[
            "  entries (         2):",
            "         i       count     offset",
            "      0000  0x00000001       2002",
            "      0001  0x00000002      -1001",
        ])
    );
    assert_eq!(
        atom_lines(&text, "stss"),
        header_and(&[
            "  entries (         2):",
            "         i      sample",
            "      0000  0x00000001",
            "      0001  0x0000001f",
        ])
    );
    // the sample count comes from the atom size
    assert_eq!(
        atom_lines(&text, "sdtp"),
        header_and(&[
            "  entries (         2):",
            "         i    is_leading  depends  dependent  redundancy",
            "      0000             0        2          1           0",
            "      0001             2        1          2           0",
        ])
    );
}

#[test]
fn chunk_tables() {
    let children = [
        table(b"stsc", 1, &be32(&[1, 6, 1])),
        stsz(0, 2, &[0x1a2b, 0x300]),
        table(b"stco", 1, &be32(&[48])),
        table(b"co64", 1, &0x1_0000_0010u64.to_be_bytes()),
    ]
    .concat();

    let (result, text) = dump_str(sample_table(&children));
    let outline = result.expect("dump");
    assert_eq!(find(&outline, "co64").map(|a| a.handler.as_str()), Some("64-bit Chunk Offset Atom"));

    assert_eq!(
        atom_lines(&text, "stsc"),
        header_and(&[
            "  entries (         1):",
            "         i  first chunk  samples-per-chunk         descr. id",
            "      0000   0x00000001         0x00000006                 1",
        ])
    );
    assert_eq!(
        atom_lines(&text, "stsz"),
        header_and(&[
            "  sample_size: 0",
            "  entries (         2):",
            "         i         size",
            "      0000   0x00001a2b",
            "      0001   0x00000300",
        ])
    );
    assert_eq!(
        atom_lines(&text, "stco"),
        header_and(&[
            "  entries (         1):",
            "         i      offset (hex offset)",
            "      0000          48 (0x00000030)",
        ])
    );
    assert_eq!(
        atom_lines(&text, "co64"),
        header_and(&[
            "  entries (         1):",
            "         i                offset         (hex offset)",
            "      0000            4294967312 (0x0000000100000010)",
        ])
    );
}

#[test]
fn constant_sample_size_has_no_table() {
    let (result, text) = dump_str(sample_table(&stsz(1024, 3, &[])));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "stsz").map(|a| a.unparsed), Some(0));
    assert_eq!(
        atom_lines(&text, "stsz"),
        header_and(&["  sample_size: 1024", "  entries (         3):", "      ...none"])
    );
}

#[test]
fn missing_size_table_is_an_error() {
    let (result, text) = dump_str(sample_table(&stsz(0, 3, &[])));
    assert!(matches!(result, Err(ParseError::Check { .. })));
    assert!(text.contains("      ...none"));
}

#[test]
fn empty_tables_print_only_the_count() {
    let children = [table(b"stts", 0, &[]), table(b"stco", 0, &[])].concat();
    let (result, text) = dump_str(sample_table(&children));
    result.expect("dump");

    assert_eq!(atom_lines(&text, "stts"), header_and(&["  entries (         0):"]));
    assert_eq!(atom_lines(&text, "stco"), header_and(&["  entries (         0):"]));
}
