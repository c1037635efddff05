#![allow(dead_code)]

use atomdump::{AtomSummary, DumpOptions, ParseError, dump};
use std::io::Cursor;

/// `size | type | payload` with a 32-bit size.
pub fn atom(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(8 + payload.len());
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

/// Same atom in the extended-size form.
pub fn atom64(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(&(16 + payload.len() as u64).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

pub fn full_atom(typ: &[u8; 4], version: u8, flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut body = vec![version];
    body.extend_from_slice(&flags.to_be_bytes()[1..]);
    body.extend_from_slice(payload);
    atom(typ, &body)
}

pub fn ftyp(brand: &[u8; 4]) -> Vec<u8> {
    let mut payload = brand.to_vec();
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(brand);
    atom(b"ftyp", &payload)
}

/// Handler with explicit component type and trailing name bytes.
pub fn hdlr_with(component_type: &[u8; 4], sub_type: &[u8; 4], name: &[u8]) -> Vec<u8> {
    let mut payload = component_type.to_vec();
    payload.extend_from_slice(sub_type);
    payload.extend_from_slice(&[0u8; 12]);
    payload.extend_from_slice(name);
    full_atom(b"hdlr", 0, 0, &payload)
}

/// Media handler with a zero component type, as ISO files write it.
pub fn hdlr(sub_type: &[u8; 4]) -> Vec<u8> {
    hdlr_with(&[0; 4], sub_type, &[0])
}

/// `trak/mdia/minf/stbl/stsd` holding `entry`. `mdia_head` goes in front of
/// `minf`, `minf_head` in front of `stbl`.
pub fn trak(mdia_head: &[u8], minf_head: &[u8], entry: &[u8]) -> Vec<u8> {
    let mut stsd = 1u32.to_be_bytes().to_vec();
    stsd.extend_from_slice(entry);
    let stbl = atom(b"stbl", &full_atom(b"stsd", 0, 0, &stsd));
    let minf = atom(b"minf", &[minf_head, stbl.as_slice()].concat());
    let mdia = atom(b"mdia", &[mdia_head, minf.as_slice()].concat());
    atom(b"trak", &mdia)
}

/// `ftyp isom` plus a single track whose `stsd` holds `entry`.
pub fn track_with_entry(sub_type: &[u8; 4], entry: &[u8]) -> Vec<u8> {
    let trak = trak(&hdlr(sub_type), &[], entry);
    [ftyp(b"isom"), atom(b"moov", &trak)].concat()
}

/// `moov/trak/mdia/minf/stbl` holding `children`, no handler.
pub fn sample_table(children: &[u8]) -> Vec<u8> {
    let stbl = atom(b"stbl", children);
    let mdia = atom(b"mdia", &atom(b"minf", &stbl));
    atom(b"moov", &atom(b"trak", &mdia))
}

pub fn be32(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Generic sample entry header followed by `body`.
pub fn sample_entry(format: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut v = (16 + body.len() as u32).to_be_bytes().to_vec();
    v.extend_from_slice(format);
    v.extend_from_slice(&[0u8; 6]);
    v.extend_from_slice(&1u16.to_be_bytes());
    v.extend_from_slice(body);
    v
}

/// Video sample entry fields with a Pascal compressor name, then
/// `extensions`.
pub fn video_body_named(name_len: u8, name: &[u8], extensions: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&0u16.to_be_bytes()); // version
    v.extend_from_slice(&0u16.to_be_bytes()); // revision
    v.extend_from_slice(b"appl");
    v.extend_from_slice(&0u32.to_be_bytes());
    v.extend_from_slice(&0u32.to_be_bytes());
    v.extend_from_slice(&1920u16.to_be_bytes());
    v.extend_from_slice(&1080u16.to_be_bytes());
    v.extend_from_slice(&0x0048_0000u32.to_be_bytes());
    v.extend_from_slice(&0x0048_0000u32.to_be_bytes());
    v.extend_from_slice(&0u32.to_be_bytes());
    v.extend_from_slice(&1u16.to_be_bytes());
    let mut field = [0u8; 32];
    field[0] = name_len;
    field[1..1 + name.len()].copy_from_slice(name);
    v.extend_from_slice(&field);
    v.extend_from_slice(&24u16.to_be_bytes());
    v.extend_from_slice(&0xffffu16.to_be_bytes());
    v.extend_from_slice(extensions);
    v
}

pub fn video_body(extensions: &[u8]) -> Vec<u8> {
    video_body_named(3, b"avc", extensions)
}

pub fn pasp() -> Vec<u8> {
    atom(b"pasp", &be32(&[1, 1]))
}

/// MPEG-4 descriptor with a one- or two-byte length.
pub fn descriptor(tag: u8, body: &[u8]) -> Vec<u8> {
    let len = body.len();
    let mut v = vec![tag];
    if len < 0x80 {
        v.push(len as u8);
    } else {
        v.push(0x80 | (len >> 7) as u8);
        v.push((len & 0x7f) as u8);
    }
    v.extend_from_slice(body);
    v
}

pub fn dump_with(
    bytes: Vec<u8>,
    opts: &DumpOptions,
) -> (Result<Vec<AtomSummary>, ParseError>, String) {
    let mut out = Vec::new();
    let result = dump(Cursor::new(bytes), &mut out, opts);
    (result, String::from_utf8_lossy(&out).into_owned())
}

pub fn dump_str(bytes: Vec<u8>) -> (Result<Vec<AtomSummary>, ParseError>, String) {
    dump_with(bytes, &DumpOptions::default())
}

/// Value lines of the first `typ` atom in `text`, header excluded, with the
/// header's indentation stripped. Lines of nested atoms are included.
pub fn atom_lines(text: &str, typ: &str) -> Vec<String> {
    let head = format!("{}: s=", typ);
    let mut lines = text.lines();
    let Some(indent) = lines.by_ref().find_map(|l| {
        let trimmed = l.trim_start();
        trimmed.starts_with(&head).then(|| l.len() - trimmed.len())
    }) else {
        return Vec::new();
    };
    lines
        .take_while(|l| l.len() > indent && l.as_bytes()[..=indent].iter().all(|&b| b == b' '))
        .map(|l| l[indent..].to_string())
        .collect()
}

/// First node of `typ` anywhere in the outline.
pub fn find<'a>(outline: &'a [AtomSummary], typ: &str) -> Option<&'a AtomSummary> {
    outline.iter().flat_map(|a| a.walk()).find(|a| a.typ == typ)
}
