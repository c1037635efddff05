use crate::context::ParseContext;
use crate::dumper::Dumper;
use crate::parser::Result;
use crate::registry::{TRACK, USER_DATA};
use crate::util;
use std::io::{Read, Seek, Write};

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    pub(super) fn file_type(&mut self) -> Result<()> {
        self.header()?;

        let major_brand = self.rdr.read_fourcc()?;
        self.ctx.set_major_brand(major_brand);
        self.field("major_brand", util::fourcc_chars(major_brand.as_u32()))?;

        let minor_version = self.rdr.read_u32()?;
        self.field("minor_version", util::u32_hex(minor_version))?;

        let mut brands = Vec::new();
        while self.rdr.remaining() >= 4 {
            brands.push(util::fourcc_chars(self.rdr.read_u32()?));
        }
        self.field("compatible_brands", brands.join(", "))
    }

    /// `mdat`, `free`, `skip` and `wide`: the payload is seeked over.
    pub(super) fn skipped(&mut self) -> Result<()> {
        self.header()?;
        let left = self.rdr.remaining();
        if left > 0 {
            self.line(0, format_args!("...skipped {} bytes", left))?;
            self.rdr.skip(left)?;
        }
        Ok(())
    }

    /// Creation and modification times, 32-bit in version 0 and 64-bit in 1.
    pub(super) fn creation_times(&mut self, version: u8) -> Result<()> {
        for name in ["creation_time", "modification_time"] {
            let t = if version == 0 {
                self.rdr.read_u32()? as u64
            } else {
                self.rdr.read_u64()?
            };
            self.field(name, util::timestamp(t))?;
        }
        Ok(())
    }

    pub(super) fn duration(&mut self, version: u8, timescale: u32) -> Result<()> {
        let d = if version == 0 {
            self.rdr.read_i32()? as i64
        } else {
            self.rdr.read_i64()?
        };
        self.line(
            0,
            format_args!("duration: {} ({:.6} sec)", d, ParseContext::seconds(d, timescale)),
        )
    }

    pub(super) fn matrix(&mut self) -> Result<()> {
        let mut m = [0u32; 9];
        for v in m.iter_mut() {
            *v = self.rdr.read_u32()?;
        }
        self.field("matrix", "")?;
        for row in util::matrix_rows(&m) {
            self.line(2, format_args!("{}", row))?;
        }
        Ok(())
    }

    pub(super) fn movie_header(&mut self) -> Result<()> {
        let Some((version, _)) = self.full_atom(1)? else {
            return Ok(());
        };
        self.creation_times(version)?;

        let timescale = self.rdr.read_u32()?;
        self.ctx.movie_timescale = timescale;
        self.field("timescale", timescale)?;
        self.duration(version, timescale)?;

        let rate = self.rdr.read_u32()?;
        self.field("preferred_rate", util::fixed_u32(rate, 16))?;
        let volume = self.rdr.read_u16()?;
        self.field("preferred_volume", util::fixed_u16(volume, 8))?;
        let reserved = self.rdr.read_vec(10)?;
        self.field("reserved", util::inline_bytes(&reserved))?;
        self.matrix()?;

        let preview_time = self.rdr.read_u32()?;
        self.field("preview_time", preview_time)?;
        let preview_duration = self.rdr.read_u32()?;
        self.line(
            0,
            format_args!(
                "preview_duration: {} ({:.6} sec)",
                preview_duration,
                ParseContext::seconds(preview_duration as i64, timescale)
            ),
        )?;
        let poster_time = self.rdr.read_u32()?;
        self.field("poster_time", poster_time)?;
        let selection_time = self.rdr.read_u32()?;
        self.field("selection_time", selection_time)?;
        let selection_duration = self.rdr.read_u32()?;
        self.line(
            0,
            format_args!(
                "selection_duration: {} ({:.6} sec)",
                selection_duration,
                ParseContext::seconds(selection_duration as i64, timescale)
            ),
        )?;
        let current_time = self.rdr.read_u32()?;
        self.field("current_time", current_time)?;
        let next_track_id = self.rdr.read_u32()?;
        self.field("next_track_id", next_track_id)
    }

    /// A new track forgets the handler of the previous one.
    pub(super) fn track(&mut self) -> Result<()> {
        self.ctx.reset_track();
        self.container(&TRACK)
    }

    pub(super) fn track_header(&mut self) -> Result<()> {
        let Some((version, _)) = self.full_atom(1)? else {
            return Ok(());
        };
        self.creation_times(version)?;

        let track_id = self.rdr.read_u32()?;
        self.field("track_id", track_id)?;
        let reserved = self.rdr.read_u32()?;
        self.field("reserved", util::u32_hex(reserved))?;
        let timescale = self.ctx.movie_timescale;
        self.duration(version, timescale)?;

        let reserved = self.rdr.read_vec(8)?;
        self.field("reserved", util::inline_bytes(&reserved))?;
        let layer = self.rdr.read_u16()?;
        self.field("layer", layer)?;
        let alternate_group = self.rdr.read_u16()?;
        self.field("alternate_group", alternate_group)?;
        let volume = self.rdr.read_u16()?;
        self.field("volume", util::fixed_u16(volume, 8))?;
        let reserved = self.rdr.read_u16()?;
        self.field("reserved", util::u16_hex(reserved))?;
        self.matrix()?;

        let width = self.rdr.read_u32()?;
        self.field("track_width", util::fixed_u32(width, 16))?;
        let height = self.rdr.read_u32()?;
        self.field("track_height", util::fixed_u32(height, 16))
    }

    /// `clef`, `prof` and `enof` inside `tapt`.
    pub(super) fn aperture_dimensions(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let width = self.rdr.read_u32()?;
        self.field("width", util::fixed_u32(width, 16))?;
        let height = self.rdr.read_u32()?;
        self.field("height", util::fixed_u32(height, 16))
    }

    pub(super) fn edit_list(&mut self) -> Result<()> {
        let Some((version, _)) = self.full_atom(1)? else {
            return Ok(());
        };
        let count = self.rdr.read_u32()?;
        self.count_field("edit_list_table", util::u32_dec(count))?;
        if version == 0 {
            self.table_heading(count, "    duration       time          rate")?;
        } else {
            self.table_heading(count, "              duration                 time          rate")?;
        }

        for i in 0..count {
            let (duration, time) = if version == 0 {
                let duration = self.rdr.read_u32()?;
                let time = self.rdr.read_i32()?;
                (util::u32_dec(duration), util::i32_dec(time))
            } else {
                let duration = self.rdr.read_u64()?;
                let time = self.rdr.read_i64()?;
                (util::u64_dec(duration), util::i64_dec(time))
            };
            let rate = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!(
                    "{}  {} {}      {}",
                    util::index_u32(count, i),
                    duration,
                    time,
                    util::fixed_u32(rate, 16)
                ),
            )?;
        }
        Ok(())
    }

    /// A `tref` child: its type names the reference kind, its payload is a
    /// list of track ids.
    pub(super) fn track_reference(&mut self) -> Result<()> {
        self.header()?;
        let count = (self.rdr.remaining() / 4) as u32;
        self.count_field("track_ids", util::u32_dec(count))?;
        self.table_heading(count, "          id")?;
        for i in 0..count {
            let id = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!("{}  {}", util::index_u32(count, i), util::u32_hex(id)),
            )?;
        }
        Ok(())
    }

    /// QuickTime lets `udta` end with a 32-bit zero terminator, so children
    /// are only read while a full atom header could still follow.
    pub(super) fn user_data(&mut self) -> Result<()> {
        self.header()?;
        self.walk_entries(&USER_DATA, 0)
    }

    pub(super) fn user_data_name(&mut self) -> Result<()> {
        self.header()?;
        let len = self.rdr.remaining();
        self.field_string(0, format_args!("value: (len={}) ", len), len, 2)
    }
}
