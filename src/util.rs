//! Fixed-width rendering helpers shared by the decoders.

/// Seconds between 1904-01-01 (QuickTime epoch) and 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

pub fn is_printable(c: u8) -> bool {
    (32..=126).contains(&c)
}

pub fn printable_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|&c| is_printable(c))
}

/// Offsets and sizes: 10 digits while they fit in 32 bits, 20 after.
pub fn file_size(v: u64) -> String {
    if v > u32::MAX as u64 {
        size64(v)
    } else {
        size32(v as u32)
    }
}

pub fn size64(v: u64) -> String {
    format!("{:20} (0x{:016x})", v, v)
}

pub fn size32(v: u32) -> String {
    format!("{:10} (0x{:08x})", v, v)
}

pub fn u64_hex(v: u64) -> String {
    format!("0x{:016x}", v)
}

pub fn u64_dec(v: u64) -> String {
    format!("{:20}", v)
}

pub fn i64_dec(v: i64) -> String {
    format!("{:20}", v)
}

pub fn u32_hex(v: u32) -> String {
    format!("0x{:08x}", v)
}

pub fn u32_dec(v: u32) -> String {
    format!("{:10}", v)
}

pub fn i32_dec(v: i32) -> String {
    format!("{:10}", v)
}

pub fn u16_hex(v: u16) -> String {
    format!("0x{:04x}", v)
}

pub fn u16_dec(v: u16) -> String {
    format!("{:5}", v)
}

pub fn u8_hex(v: u8) -> String {
    format!("0x{:02x}", v)
}

pub fn u8_dec(v: u8) -> String {
    format!("{:3}", v)
}

/// Row index in hex, wide enough for `count` rows.
pub fn index_u64(count: u64, i: u64) -> String {
    if count < 0xffff {
        format!("{:04x}", i)
    } else if count < 0xff_ffff {
        format!("{:06x}", i)
    } else if count < 0xffff_ffff {
        format!("{:08x}", i)
    } else {
        format!("{:016x}", i)
    }
}

/// Same as [`index_u64`] but never wider than 8 digits.
pub fn index_u32(count: u32, i: u32) -> String {
    if count < 0xffff {
        format!("{:04x}", i)
    } else if count < 0xff_ffff {
        format!("{:06x}", i)
    } else {
        format!("{:08x}", i)
    }
}

pub fn index_u16(count: u16, i: u16) -> String {
    if count < 0xff {
        format!("{:02x}", i)
    } else {
        format!("{:04x}", i)
    }
}

/// Right-aligned `i` column heading matching [`index_u32`].
pub fn index_heading(count: u32) -> &'static str {
    if count < 0xffff {
        "   i"
    } else if count < 0xff_ffff {
        "     i"
    } else {
        "       i"
    }
}

fn ascii_column(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&c| if is_printable(c) { c as char } else { '.' })
        .collect()
}

/// Short byte run on a single line: `(size N)  00 01  |..|`.
pub fn inline_bytes(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!(" {:02x}", b)).collect();
    format!("(size {}) {}  |{}|", bytes.len(), hex, ascii_column(bytes))
}

/// One 16-byte row of a hex dump. `total` sizes the index column.
pub fn hex_row(total: u64, index: u64, line: &[u8]) -> String {
    let mut out = index_u64(total, index);
    out.push_str("  ");
    for i in 0..16 {
        if i == 8 {
            out.push(' ');
        }
        match line.get(i) {
            Some(b) => out.push_str(&format!(" {:02x}", b)),
            None => out.push_str("   "),
        }
    }
    out.push_str("  |");
    out.push_str(&ascii_column(line));
    out.push('|');
    out
}

/// A tag shown both as characters and as bytes: `avc1 (61 76 63 31)`.
pub fn fourcc_chars(v: u32) -> String {
    let bytes = v.to_be_bytes();
    let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{} ({})", ascii_column(&bytes), hex.join(" "))
}

/// Raw tag characters, no escaping.
pub fn fourcc_tag(v: u32) -> String {
    v.to_be_bytes().iter().map(|&b| b as char).collect()
}

/// Packed ISO-639-2/T language code.
pub fn language(v: u16) -> String {
    let letters = [(v >> 10) & 0x1f, (v >> 5) & 0x1f, v & 0x1f];
    if letters.iter().all(|l| (1..=26).contains(l)) {
        let code: String = letters.iter().map(|&l| (l as u8 + 0x60) as char).collect();
        format!("0x{:04x} ({})", v, code)
    } else {
        format!("0x{:04x}", v)
    }
}

/// Unsigned 32-bit fixed point with `int_bits` integer bits (16.16, 2.30).
pub fn fixed_u32(v: u32, int_bits: u8) -> String {
    format!("{:.6}", v as f64 / (1u64 << (32 - int_bits)) as f64)
}

pub fn fixed_u16(v: u16, int_bits: u8) -> String {
    format!("{:.6}", v as f64 / (1u32 << (16 - int_bits)) as f64)
}

pub fn fixed_i16(v: i16, int_bits: u8) -> String {
    format!("{:.6}", v as f64 / (1u32 << (16 - int_bits)) as f64)
}

/// Seconds since 1904-01-01 rendered as UTC.
pub fn timestamp(v: u64) -> String {
    let date = i64::try_from(v)
        .ok()
        .and_then(|secs| secs.checked_sub(MAC_EPOCH_OFFSET))
        .and_then(|unix| chrono::DateTime::from_timestamp(unix, 0));
    match date {
        Some(dt) => format!(
            "{} ({} sec since 1904-01-01)",
            dt.format("%Y-%m-%dT%H:%M:%SZ"),
            v
        ),
        None => format!("{} seconds since 1904-01-01", v),
    }
}

/// The 3x3 display matrix, one row per line. Columns a/b/c are 16.16 except
/// the last (u, v, w), which is 2.30.
pub fn matrix_rows(m: &[u32; 9]) -> [String; 3] {
    std::array::from_fn(|row| {
        let r = &m[row * 3..row * 3 + 3];
        format!(
            "{} {} {}",
            fixed_u32(r[0], 16),
            fixed_u32(r[1], 16),
            fixed_u32(r[2], 2)
        )
    })
}

pub fn color(r: u16, g: u16, b: u16) -> String {
    format!("RGB(0x{:04x},0x{:04x},0x{:04x})", r, g, b)
}

/// Breakdown of a fragment sample-flags word.
pub fn sample_flags(f: u32) -> String {
    format!(
        "res=0x{:x}, lead=0x{:x}, deps_on=0x{:x}, depd_on=0x{:x}, red=0x{:x}, pad=0x{:x}, nsync=0x{:x}, priority=0x{:04x}",
        (f >> 28) & 0x0f,
        (f >> 26) & 0x03,
        (f >> 24) & 0x03,
        (f >> 22) & 0x03,
        (f >> 20) & 0x03,
        (f >> 17) & 0x07,
        (f >> 16) & 0x01,
        f & 0xffff
    )
}
