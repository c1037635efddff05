use crate::dumper::Dumper;
use crate::parser::Result;
use crate::util;
use std::io::{Read, Seek, Write};

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    /// Version 0 header plus the `entries (N):` line shared by the tables.
    fn table_count(&mut self) -> Result<Option<u32>> {
        if self.full_atom(0)?.is_none() {
            return Ok(None);
        }
        let count = self.rdr.read_u32()?;
        self.entries_line(count)?;
        Ok(Some(count))
    }

    fn entries_line(&mut self, count: u32) -> Result<()> {
        self.count_field("entries", util::u32_dec(count))
    }

    pub(super) fn time_to_sample(&mut self) -> Result<()> {
        let Some(count) = self.table_count()? else {
            return Ok(());
        };
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "       count   duration")?;
        for i in 0..count {
            let sample_count = self.rdr.read_u32()?;
            let duration = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!(
                    "{}  {} {}",
                    util::index_u32(count, i),
                    util::u32_hex(sample_count),
                    util::u32_hex(duration)
                ),
            )?;
        }
        Ok(())
    }

    pub(super) fn composition_offset(&mut self) -> Result<()> {
        let Some(count) = self.table_count()? else {
            return Ok(());
        };
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "       count     offset")?;
        for i in 0..count {
            let sample_count = self.rdr.read_u32()?;
            let offset = self.rdr.read_i32()?;
            self.line(
                4,
                format_args!(
                    "{}  {} {}",
                    util::index_u32(count, i),
                    util::u32_hex(sample_count),
                    util::i32_dec(offset)
                ),
            )?;
        }
        Ok(())
    }

    pub(super) fn composition_shift(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        for name in ["dts_shift", "min_cts", "max_cts", "pts_start", "pts_end"] {
            let v = self.rdr.read_i32()?;
            self.field(name, v)?;
        }
        Ok(())
    }

    /// `stss` and `stps`.
    pub(super) fn sync_sample(&mut self) -> Result<()> {
        let Some(count) = self.table_count()? else {
            return Ok(());
        };
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "      sample")?;
        for i in 0..count {
            let sample = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!("{}  {}", util::index_u32(count, i), util::u32_hex(sample)),
            )?;
        }
        Ok(())
    }

    /// One flag byte per sample; the count is implied by the atom size.
    pub(super) fn sample_dependency(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let count = u32::try_from(self.rdr.remaining()).unwrap_or(u32::MAX);
        self.entries_line(count)?;
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "    is_leading  depends  dependent  redundancy")?;
        for i in 0..count {
            let b = self.rdr.read_u8()?;
            self.line(
                4,
                format_args!(
                    "{}             {}        {}          {}           {}",
                    util::index_u32(count, i),
                    (b & 0xc0) >> 6,
                    (b & 0x30) >> 4,
                    (b & 0x0c) >> 2,
                    b & 0x03
                ),
            )?;
        }
        Ok(())
    }

    pub(super) fn sample_to_chunk(&mut self) -> Result<()> {
        let Some(count) = self.table_count()? else {
            return Ok(());
        };
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "  first chunk  samples-per-chunk         descr. id")?;
        for i in 0..count {
            let first_chunk = self.rdr.read_u32()?;
            let samples_per_chunk = self.rdr.read_u32()?;
            let description_id = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!(
                    "{}   {}         {}        {}",
                    util::index_u32(count, i),
                    util::u32_hex(first_chunk),
                    util::u32_hex(samples_per_chunk),
                    util::u32_dec(description_id)
                ),
            )?;
        }
        Ok(())
    }

    /// A non-zero `sample_size` means every sample has that size and no
    /// table follows.
    pub(super) fn sample_size(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let sample_size = self.rdr.read_u32()?;
        self.field("sample_size", sample_size as i32)?;
        let count = self.rdr.read_u32()?;
        self.entries_line(count)?;

        if self.rdr.remaining() == 0 {
            if count > 0 {
                self.line(4, format_args!("...none"))?;
            }
            check!(sample_size > 0 || count == 0);
            return Ok(());
        }
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "         size")?;
        for i in 0..count {
            let size = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!("{}   {}", util::index_u32(count, i), util::u32_hex(size)),
            )?;
        }
        Ok(())
    }

    pub(super) fn chunk_offset(&mut self) -> Result<()> {
        let Some(count) = self.table_count()? else {
            return Ok(());
        };
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "      offset (hex offset)")?;
        for i in 0..count {
            let offset = self.rdr.read_u32()?;
            self.line(
                4,
                format_args!("{}  {}", util::index_u32(count, i), util::size32(offset)),
            )?;
        }
        Ok(())
    }

    pub(super) fn chunk_offset64(&mut self) -> Result<()> {
        let Some(count) = self.table_count()? else {
            return Ok(());
        };
        if count == 0 {
            return Ok(());
        }
        self.table_heading(count, "                offset         (hex offset)")?;
        for i in 0..count {
            let offset = self.rdr.read_u64()?;
            self.line(
                4,
                format_args!("{}  {}", util::index_u32(count, i), util::size64(offset)),
            )?;
        }
        Ok(())
    }
}
