use crate::dumper::{Dumper, write_rows};
use crate::parser::Result;
use crate::util;
use std::io::{Read, Seek, Write};

/// Profile names by `profile_idc`, optionally requiring a constraint flag.
/// The first matching row wins.
const PROFILE_NAMES: &[(u8, u8, &str)] = &[
    (66, 0x40, "Constrained Baseline"),
    (66, 0x00, "Baseline"),
    (77, 0x00, "Main"),
    (88, 0x00, "Extended"),
    (100, 0x00, "High"),
    (110, 0x10, "High 10 Intra"),
    (110, 0x00, "High 10"),
    (122, 0x10, "High 4:2:2 Intra"),
    (122, 0x00, "High 4:2:2"),
    (244, 0x10, "High 4:4:4 Intra"),
    (244, 0x00, "High 4:4:4"),
    (44, 0x00, "CAVLC 4:4:4 Intra"),
];

fn profile_name(profile_idc: u8, constraint_flags: u8) -> &'static str {
    PROFILE_NAMES
        .iter()
        .find(|(idc, mask, _)| *idc == profile_idc && (*mask == 0 || constraint_flags & mask != 0))
        .map_or("unknown", |(_, _, name)| name)
}

fn chroma_format_name(chroma_format: u8) -> &'static str {
    match chroma_format & 0x03 {
        0 => "Monochrome",
        1 => "4:2:0",
        2 => "4:2:2",
        _ => "4:4:4",
    }
}

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    pub(super) fn avc_configuration(&mut self) -> Result<()> {
        self.header()?;

        let configuration_version = self.rdr.read_u8()?;
        self.field("configuration_version", configuration_version)?;
        let profile_idc = self.rdr.read_u8()?;
        let constraint_flags = self.rdr.read_u8()?;
        self.field(
            "profile_idc",
            format_args!("{} ('{}')", profile_idc, profile_name(profile_idc, constraint_flags)),
        )?;
        self.field("constraint_flags_byte", util::u8_hex(constraint_flags))?;

        let level_idc = self.rdr.read_u8()?;
        if level_idc == 11 && constraint_flags & 0x10 != 0 {
            self.field("level_idc", format_args!("{} (1b)", level_idc))?;
        } else {
            self.field(
                "level_idc",
                format_args!("{} ({:.1})", level_idc, level_idc as f64 / 10.0),
            )?;
        }

        let length_size_byte = self.rdr.read_u8()?;
        let length_size = (length_size_byte & 0x03) + 1;
        self.field(
            "length_size_minus1_byte",
            format_args!("0x{:02x} (length_size={})", length_size_byte, length_size),
        )?;

        let num_sps_byte = self.rdr.read_u8()?;
        let num_sps = num_sps_byte & 0x1f;
        self.field(
            "num_sps_byte",
            format_args!("0x{:02x} (num_sps={})", num_sps_byte, num_sps),
        )?;
        for i in 0..num_sps {
            self.parameter_set(format_args!("sps {}:", i), length_size)?;
        }

        let num_pps = self.rdr.read_u8()?;
        self.field("num_pps", num_pps)?;
        for i in 0..num_pps {
            self.parameter_set(format_args!("pps {}:", i), length_size)?;
        }

        // High profile extension
        if self.rdr.remaining() >= 4 {
            let chroma_byte = self.rdr.read_u8()?;
            let chroma_format = chroma_byte & 0x03;
            self.field(
                "chroma_format_byte",
                format_args!(
                    "0x{:02x} (chroma_format={} '{}')",
                    chroma_byte,
                    chroma_format,
                    chroma_format_name(chroma_format)
                ),
            )?;
            let luma_byte = self.rdr.read_u8()?;
            self.field(
                "bit_depth_luma_minus8_byte",
                format_args!("0x{:02x} (bit_depth_luma={})", luma_byte, (luma_byte & 0x07) + 8),
            )?;
            let chroma_depth_byte = self.rdr.read_u8()?;
            self.field(
                "bit_depth_chroma_minus8_byte",
                format_args!(
                    "0x{:02x} (bit_depth_chroma={})",
                    chroma_depth_byte,
                    (chroma_depth_byte & 0x07) + 8
                ),
            )?;
            let num_sps_ext = self.rdr.read_u8()?;
            self.field("num_sps_ext", num_sps_ext)?;
            for i in 0..num_sps_ext {
                self.parameter_set(format_args!("sps ext {}:", i), length_size)?;
            }
        }
        Ok(())
    }

    /// One 16-bit length-prefixed parameter set. With an export configured
    /// the bytes are staged, written out and dumped from memory.
    fn parameter_set(&mut self, label: std::fmt::Arguments<'_>, length_size: u8) -> Result<()> {
        let size = self.rdr.read_u16()? as usize;
        self.line(4, label)?;

        let indent = self.indent(6);
        match self.export.as_mut() {
            Some(export) => {
                self.rdr.read_bytes(export.stage(size))?;
                export.commit(length_size, size)?;
                write_rows(&mut self.out, &indent, export.staged(size))
            }
            None => self.dump_bytes(size as u64, 6),
        }
    }
}
