//! Fragmented-file atoms: `mvex` defaults, `moof` headers and the segment
//! indexes that sit at top level.

use crate::dumper::Dumper;
use crate::parser::Result;
use crate::util;
use std::io::{Read, Seek, Write};

const TFHD_BASE_DATA_OFFSET: u32 = 0x01;
const TFHD_SAMPLE_DESCRIPTION_INDEX: u32 = 0x02;
const TFHD_DEFAULT_DURATION: u32 = 0x08;
const TFHD_DEFAULT_SIZE: u32 = 0x10;
const TFHD_DEFAULT_FLAGS: u32 = 0x20;

const TRUN_DATA_OFFSET: u32 = 0x001;
const TRUN_FIRST_SAMPLE_FLAGS: u32 = 0x004;
const TRUN_DURATION: u32 = 0x100;
const TRUN_SIZE: u32 = 0x200;
const TRUN_FLAGS: u32 = 0x400;
const TRUN_CT_OFFSET: u32 = 0x800;

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    /// 32-bit for version 0, 64-bit for version 1.
    fn versioned_u64(&mut self, version: u8) -> Result<u64> {
        if version == 1 {
            self.rdr.read_u64()
        } else {
            Ok(self.rdr.read_u32()? as u64)
        }
    }

    fn versioned_hex(&mut self, version: u8) -> Result<String> {
        Ok(if version == 1 {
            util::u64_hex(self.rdr.read_u64()?)
        } else {
            util::u32_hex(self.rdr.read_u32()?)
        })
    }

    pub(super) fn segment_index(&mut self) -> Result<()> {
        let Some((version, _)) = self.full_atom(1)? else {
            return Ok(());
        };
        let reference_id = self.rdr.read_u32()?;
        self.field("reference_id", reference_id)?;
        let timescale = self.rdr.read_u32()?;
        self.field("timescale", timescale)?;
        let earliest = self.versioned_u64(version)?;
        self.field("earliest_presentation_time", earliest)?;
        let first_offset = self.versioned_u64(version)?;
        self.field("first_offset", first_offset)?;
        let reserved = self.rdr.read_u16()?;
        self.field("reserved", util::u16_hex(reserved))?;

        let count = self.rdr.read_u16()?;
        self.count_field("references", util::u16_dec(count))?;
        if count == 0 {
            return Ok(());
        }
        let index_column = if count < 0xff { 2 } else { 4 };
        self.line(
            4,
            format_args!(
                "{:>w$}{:>10}{:>12}{:>14}{:>16}{:>10}{:>16}",
                "i",
                "ref_type",
                "ref_size",
                "subseg_dur",
                "start_with_sap",
                "sap_type",
                "sap_delta_time",
                w = index_column
            ),
        )?;
        for i in 0..count {
            let reference = self.rdr.read_u32()?;
            let duration = self.rdr.read_u32()?;
            let sap = self.rdr.read_u32()?;
            let ref_type = if reference & 0x8000_0000 != 0 { "sidx" } else { "media" };
            self.line(
                4,
                format_args!(
                    "{}{:>10}  {}    {}{:>16}       {}      {}",
                    util::index_u16(count, i),
                    ref_type,
                    util::u32_hex(reference & 0x7fff_ffff),
                    util::u32_hex(duration),
                    sap & 0x8000_0000 != 0,
                    util::u8_dec(((sap >> 28) & 0x07) as u8),
                    util::u32_dec(sap & 0x0fff_ffff)
                ),
            )?;
        }
        Ok(())
    }

    pub(super) fn subsegment_index(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let count = self.rdr.read_u32()?;
        self.count_field("sub_segments", util::u32_dec(count))?;

        for i in 0..count {
            let ranges = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!("{}: ranges ({}):", util::index_u32(count, i), util::u32_dec(ranges)),
            )?;
            if ranges == 0 {
                continue;
            }
            self.line(
                4,
                format_args!("{}{:>8}{:>12}", util::index_heading(ranges), "level", "range_size"),
            )?;
            for r in 0..ranges {
                let level = self.rdr.read_u8()?;
                let range_size = self.rdr.read_u24()?;
                self.line(
                    4,
                    format_args!(
                        "{}    {}  {}",
                        util::index_u32(ranges, r),
                        util::u8_hex(level),
                        util::u32_hex(range_size)
                    ),
                )?;
            }
        }
        Ok(())
    }

    pub(super) fn movie_extends_header(&mut self) -> Result<()> {
        let Some((version, _)) = self.full_atom(1)? else {
            return Ok(());
        };
        let duration = self.versioned_hex(version)?;
        self.field("fragment_duration", duration)
    }

    pub(super) fn track_extends(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let track_id = self.rdr.read_u32()?;
        self.field("track_id", track_id)?;
        let description = self.rdr.read_u32()?;
        self.field("default_sample_description_index", description)?;
        let duration = self.rdr.read_u32()?;
        self.field("default_sample_duration", util::u32_hex(duration))?;
        let size = self.rdr.read_u32()?;
        self.field("default_sample_size", util::u32_hex(size))?;
        let flags = self.rdr.read_u32()?;
        self.field(
            "default_sample_flags",
            format_args!("0x{:08x} ({})", flags, util::sample_flags(flags)),
        )
    }

    pub(super) fn movie_fragment_header(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let sequence = self.rdr.read_u32()?;
        self.field("sequence_number", sequence)
    }

    /// Optional fields present according to the flags word.
    pub(super) fn track_fragment_header(&mut self) -> Result<()> {
        let Some((_, flags)) = self.full_atom(0)? else {
            return Ok(());
        };
        let track_id = self.rdr.read_u32()?;
        self.field("track_id", track_id)?;

        if flags & TFHD_BASE_DATA_OFFSET != 0 {
            let offset = self.rdr.read_u64()?;
            self.field("base_data_offset", util::file_size(offset))?;
        }
        if flags & TFHD_SAMPLE_DESCRIPTION_INDEX != 0 {
            let index = self.rdr.read_u32()?;
            self.field("sample_description_index", index)?;
        }
        if flags & TFHD_DEFAULT_DURATION != 0 {
            let duration = self.rdr.read_u32()?;
            self.field("default_sample_duration", util::u32_hex(duration))?;
        }
        if flags & TFHD_DEFAULT_SIZE != 0 {
            let size = self.rdr.read_u32()?;
            self.field("default_sample_size", util::u32_hex(size))?;
        }
        if flags & TFHD_DEFAULT_FLAGS != 0 {
            let sample_flags = self.rdr.read_u32()?;
            self.field(
                "default_sample_flags",
                format_args!("0x{:08x} ({})", sample_flags, util::sample_flags(sample_flags)),
            )?;
        }
        Ok(())
    }

    pub(super) fn track_run(&mut self) -> Result<()> {
        let Some((version, flags)) = self.full_atom(1)? else {
            return Ok(());
        };
        let count = self.rdr.read_u32()?;
        if flags & TRUN_DATA_OFFSET != 0 {
            let offset = self.rdr.read_i32()?;
            self.field("data_offset", offset)?;
        }
        if flags & TRUN_FIRST_SAMPLE_FLAGS != 0 {
            let first = self.rdr.read_u32()?;
            self.field(
                "first_sample_flags",
                format_args!("0x{:08x} ({})", first, util::sample_flags(first)),
            )?;
        }
        if count == 0 {
            return Ok(());
        }

        self.count_field("samples", util::u32_dec(count))?;
        self.table_heading(
            count,
            &format!("{:>12}{:>12}{:>12}{:>12}", "duration", "size", "flags", "ct_offset"),
        )?;
        for i in 0..count {
            let mut row = util::index_u32(count, i);
            for bit in [TRUN_DURATION, TRUN_SIZE, TRUN_FLAGS] {
                if flags & bit != 0 {
                    row.push_str("  ");
                    row.push_str(&util::u32_hex(self.rdr.read_u32()?));
                } else {
                    row.push_str(&format!("{:>12}", "x"));
                }
            }
            if flags & TRUN_CT_OFFSET != 0 {
                row.push_str("  ");
                if version == 0 {
                    row.push_str(&util::u32_dec(self.rdr.read_u32()?));
                } else {
                    row.push_str(&util::i32_dec(self.rdr.read_i32()?));
                }
            } else {
                row.push_str(&format!("{:>12}", "x"));
            }
            self.line(4, format_args!("{}", row))?;
        }
        Ok(())
    }

    pub(super) fn track_fragment_decode_time(&mut self) -> Result<()> {
        let Some((version, _)) = self.full_atom(1)? else {
            return Ok(());
        };
        let time = self.versioned_hex(version)?;
        self.field("base_media_decode_time", time)
    }
}
