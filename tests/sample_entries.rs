mod common;

use atomdump::ParseError;
use common::{
    atom, atom_lines, be32, descriptor, dump_str, find, full_atom, pasp, sample_entry,
    track_with_entry, video_body, video_body_named,
};

/// Sound entry fields for `version`, the version-specific block in
/// `versioned`, then `extensions`.
fn sound_body(version: u16, versioned: &[u8], extensions: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&version.to_be_bytes());
    v.extend_from_slice(&0u16.to_be_bytes());
    v.extend_from_slice(&[0u8; 4]);
    v.extend_from_slice(&2u16.to_be_bytes());
    v.extend_from_slice(&16u16.to_be_bytes());
    v.extend_from_slice(&0i16.to_be_bytes());
    v.extend_from_slice(&0u16.to_be_bytes());
    v.extend_from_slice(&(44_100u32 << 16).to_be_bytes());
    v.extend_from_slice(versioned);
    v.extend_from_slice(extensions);
    v
}

/// ES descriptor carrying a decoder config (with 2 bytes of decoder specific
/// info) and an SL config.
fn es_descriptor() -> Vec<u8> {
    let mut config = vec![0x40, 0x15, 0x00, 0x00, 0x00];
    config.extend_from_slice(&128_000u32.to_be_bytes());
    config.extend_from_slice(&96_000u32.to_be_bytes());
    config.extend_from_slice(&descriptor(0x05, &[0x12, 0x10]));

    let mut es = vec![0x00, 0x01, 0x00];
    es.extend_from_slice(&descriptor(0x04, &config));
    es.extend_from_slice(&descriptor(0x06, &[0x02]));
    descriptor(0x03, &es)
}

#[test]
fn short_sample_entry_fails() {
    let mut entry = 12u32.to_be_bytes().to_vec();
    entry.extend_from_slice(b"avc1");
    entry.extend_from_slice(&[0u8; 4]);

    let (result, text) = dump_str(track_with_entry(b"vide", &entry));
    assert!(matches!(result, Err(ParseError::Check { .. })));
    assert!(text.contains("size: 0000000c"));
}

#[test]
fn video_entry_with_pixel_aspect() {
    let entry = sample_entry(b"avc1", &video_body(&pasp()));
    assert_eq!(entry.len(), 102);

    let (result, text) = dump_str(track_with_entry(b"vide", &entry));
    let outline = result.expect("dump");

    assert!(text.contains("data_format: avc1 (61 76 63 31)"));
    assert!(text.contains("width: 1920"));
    assert!(text.contains("horizontal_resolution: 72.000000"));
    assert!(text.contains("compressor_name: 'avc' +"));
    assert!(text.contains("h_spacing: 1"));

    let stsd = find(&outline, "stsd").expect("stsd");
    assert_eq!(stsd.unparsed, 0);
    assert_eq!(stsd.children.len(), 1);
    assert_eq!(stsd.children[0].typ, "pasp");
    assert_eq!(stsd.children[0].handler, "Pixel Aspect Ratio Atom");
}

#[test]
fn sound_entry_with_esds() {
    let es = es_descriptor();
    assert_eq!(es.len(), 27);
    let esds = full_atom(b"esds", 0, 0, &es);
    let entry = sample_entry(b"mp4a", &sound_body(0, &[], &esds));

    let (result, text) = dump_str(track_with_entry(b"soun", &entry));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "esds").map(|a| a.unparsed), Some(0));
    assert!(text.contains("sample_rate: 44100.000000"));
    assert!(text.contains("es_descriptor:"));
    assert!(text.contains("obj_profile_indication: 0x40"));
    assert!(text.contains("stream_type: 0x05"));
    assert!(text.contains("max_bitrate: 128000"));
    assert!(text.contains("decoder_specific_info:"));
    assert!(text.contains("predefined: 0x02"));
    assert!(!text.contains("remainder"));
}

#[test]
fn unknown_handler_leaves_entry_unparsed() {
    let entry = sample_entry(b"text", &[9u8; 6]);
    let (result, text) = dump_str(track_with_entry(b"sbtl", &entry));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "stsd").map(|a| a.unparsed), Some(6));
    assert!(text.contains("remainder...: 6 unparsed bytes"));
}

#[test]
fn quicktime_brand_without_component_type_is_not_trusted() {
    let entry = sample_entry(b"avc1", &video_body(&pasp()));
    let mut bytes = track_with_entry(b"vide", &entry);
    // swap the isom brand for qt
    bytes[8..12].copy_from_slice(b"qt  ");
    bytes[16..20].copy_from_slice(b"qt  ");

    let (result, text) = dump_str(bytes);
    let outline = result.expect("dump");
    assert!(!text.contains("width: 1920"));
    assert_eq!(find(&outline, "stsd").map(|a| a.unparsed), Some(86));
}

fn bit_rate() -> Vec<u8> {
    atom(b"btrt", &be32(&[0x100, 128_000, 96_000]))
}

#[test]
fn compressor_name_length_up_to_33_is_accepted() {
    let entry = sample_entry(b"avc1", &video_body_named(32, &[b'a'; 31], &pasp()));
    let (result, text) = dump_str(track_with_entry(b"vide", &entry));
    let outline = result.expect("dump");

    assert!(text.contains(&format!("compressor_name: '{}'\n", "a".repeat(31))));
    assert_eq!(find(&outline, "stsd").map(|a| a.unparsed), Some(0));

    let entry = sample_entry(b"avc1", &video_body_named(34, b"x", &pasp()));
    let (result, text) = dump_str(track_with_entry(b"vide", &entry));
    assert!(matches!(result, Err(ParseError::Check { .. })));
    assert!(text.contains("frame_count: 1"));
}

#[test]
fn colour_parameters_with_full_range() {
    let colr = atom(b"colr", &[b"nclx".as_slice(), &[0, 1, 0, 1, 0, 1, 0x80]].concat());
    let entry = sample_entry(b"avc1", &video_body(&colr));
    let (result, text) = dump_str(track_with_entry(b"vide", &entry));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "colr").map(|a| a.unparsed), Some(0));
    assert_eq!(
        atom_lines(&text, "colr"),
        [
            "  color_param_type: nclx",
            "  primaries: 1",
            "  transfer_func: 1",
            "  matrix: 1",
            "  full_range: 1",
        ]
    );
}

#[test]
fn timecode_entry_with_name() {
    let name = atom(b"name", &[&[0, 4, 0, 0][..], b"tc01"].concat());
    let mut body = be32(&[0, 0, 30_000]);
    body.extend_from_slice(&1001i32.to_be_bytes());
    body.extend_from_slice(&[30, 0]);
    body.extend_from_slice(&name);
    let entry = sample_entry(b"tmcd", &body);
    assert_eq!(entry.len(), 50);

    let (result, text) = dump_str(track_with_entry(b"tmcd", &entry));
    let outline = result.expect("dump");
    assert_eq!(find(&outline, "stsd").map(|a| a.unparsed), Some(0));
    assert_eq!(find(&outline, "name").map(|a| a.handler.as_str()), Some("International Text Atom"));

    let lines = atom_lines(&text, "stsd");
    assert_eq!(
        lines[..12],
        [
            "  version: 0",
            "  flags: 0x000000",
            "  sample_descriptions (0x00000001):",
            "    size: 00000032",
            "    data_format: tmcd (74 6d 63 64)",
            "    reserved: (size 6)  00 00 00 00 00 00  |......|",
            "    data_ref_index: 0x0001",
            "    reserved: 0x00000000",
            "    flags: 0x00000000",
            "    timescale: 30000",
            "    frame_duration: 1001 (0.033367 sec)",
            "    number_of_frames: 30",
        ]
    );
    assert_eq!(lines[12], "    reserved: 0x00");
    assert!(lines[13].starts_with("    name: s=        16 (0x00000010), o="));
    assert_eq!(lines[14], "      value: (len=4,lang=0x0000) 'tc01'");
    assert_eq!(lines.len(), 15);
}

#[test]
fn sound_entry_version_one() {
    let entry = sample_entry(b"mp4a", &sound_body(1, &be32(&[1024, 1, 4, 2]), &bit_rate()));
    let (result, text) = dump_str(track_with_entry(b"soun", &entry));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "stsd").map(|a| a.unparsed), Some(0));
    let lines = atom_lines(&text, "stsd");
    for expected in [
        "    version: 1",
        "    samples_per_packet: 1024",
        "    bytes_per_packet: 1",
        "    bytes_per_frame: 4",
        "    bytes_per_sample: 2",
    ] {
        assert!(lines.iter().any(|l| l == expected), "missing {expected:?}");
    }
    assert_eq!(
        atom_lines(&text, "btrt"),
        ["  buffer_size_db: 0x0100", "  max_bitrate: 128000", "  avg_bitrate: 96000"]
    );
}

#[test]
fn sound_entry_version_two_block() {
    let mut block = be32(&[72]);
    block.extend_from_slice(&48_000f64.to_bits().to_be_bytes());
    block.extend_from_slice(&be32(&[2, 0x7f00_0000, 16, 0x0c, 4, 1]));
    assert_eq!(block.len(), 36);

    let entry = sample_entry(b"lpcm", &sound_body(2, &block, &bit_rate()));
    let (result, text) = dump_str(track_with_entry(b"soun", &entry));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "stsd").map(|a| a.unparsed), Some(0));
    assert_eq!(find(&outline, "btrt").map(|a| a.size), Some(20));

    let lines = atom_lines(&text, "stsd");
    let start = lines
        .iter()
        .position(|l| l == "    size_of_struct_only: 72")
        .expect("v2 block");
    assert_eq!(
        lines[start..start + 8],
        [
            "    size_of_struct_only: 72",
            "    audio_sample_rate: 48000.000000",
            "    audio_channels: 2",
            "    always_7f000000: 0x7f000000",
            "    const_bits_per_channel: 16",
            "    format_specific_flags: 0x0000000c",
            "    const_bytes_per_audio_packet: 4",
            "    const_lpcm_frames_per_audio_packet: 1",
        ]
    );
}

#[test]
fn sound_entry_version_three_skips_extensions() {
    let entry = sample_entry(b"mp4a", &sound_body(3, &[], &bit_rate()));
    let (result, text) = dump_str(track_with_entry(b"soun", &entry));
    let outline = result.expect("dump");

    assert_eq!(find(&outline, "stsd").map(|a| a.unparsed), Some(20));
    assert!(find(&outline, "btrt").is_none());
    assert!(text.contains("    remainder...: 20 unparsed bytes"));
    assert!(!text.contains("max_bitrate"));
}
