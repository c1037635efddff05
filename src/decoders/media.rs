use crate::boxes::FourCC;
use crate::dumper::Dumper;
use crate::parser::Result;
use crate::registry::DATA_REFERENCE;
use crate::util;
use std::io::{Read, Seek, Write};

const NO_LEAN_AHEAD: Option<&str> = Some("(no lean ahead)");

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    pub(super) fn media_header(&mut self) -> Result<()> {
        let Some((version, _)) = self.full_atom(1)? else {
            return Ok(());
        };
        self.creation_times(version)?;
        let timescale = self.rdr.read_u32()?;
        self.field("timescale", timescale)?;
        self.duration(version, timescale)?;
        let language = self.rdr.read_u16()?;
        self.field("language", util::language(language))?;
        let quality = self.rdr.read_u16()?;
        self.field("quality", quality)
    }

    /// `hdlr`. Inside `mdia` it also decides how the track's sample
    /// descriptions are read.
    pub(super) fn handler_reference(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }

        let component_type = self.rdr.read_fourcc()?;
        self.field("component_type", util::fourcc_chars(component_type.as_u32()))?;
        let component_sub_type = self.rdr.read_fourcc()?;
        self.field(
            "component_sub_type",
            util::fourcc_tag(component_sub_type.as_u32()),
        )?;
        if self.parent_type() == Some(FourCC(*b"mdia")) {
            self.ctx.set_handler(component_type, component_sub_type);
        }

        let manufacturer = self.rdr.read_u32()?;
        self.field("component_manufacturer", manufacturer)?;
        let flags = self.rdr.read_u32()?;
        self.field("component_flags", util::u32_hex(flags))?;
        let flags_mask = self.rdr.read_u32()?;
        self.field("component_flags_mask", util::u32_hex(flags_mask))?;

        if self.rdr.remaining() > 0 {
            // QuickTime writes a Pascal string, ISO a NUL-terminated one
            let len = if self.ctx.quicktime_brand {
                self.rdr.read_u8()? as u64
            } else {
                self.rdr.remaining()
            };
            self.field_string(0, format_args!("component_name: "), len, 2)?;
        }
        Ok(())
    }

    pub(super) fn video_media_header(&mut self) -> Result<()> {
        if self.full_atom_noted(0, NO_LEAN_AHEAD)?.is_none() {
            return Ok(());
        }
        self.graphics_mode()
    }

    fn graphics_mode(&mut self) -> Result<()> {
        let mode = self.rdr.read_u16()?;
        self.field("graphics_mode", format_args!("{:02x}", mode))?;
        let color = self.read_color()?;
        self.field("opcolor", color)
    }

    fn read_color(&mut self) -> Result<String> {
        let r = self.rdr.read_u16()?;
        let g = self.rdr.read_u16()?;
        let b = self.rdr.read_u16()?;
        Ok(util::color(r, g, b))
    }

    fn balance(&mut self) -> Result<()> {
        let balance = self.rdr.read_i16()?;
        self.field("balance", util::fixed_i16(balance, 8))?;
        let reserved = self.rdr.read_u16()?;
        self.field("reserved", util::u16_hex(reserved))
    }

    pub(super) fn sound_media_header(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        self.balance()
    }

    pub(super) fn null_media_header(&mut self) -> Result<()> {
        self.full_atom(0).map(|_| ())
    }

    /// `gmin` inside `gmhd`.
    pub(super) fn base_media_info(&mut self) -> Result<()> {
        if self.full_atom_noted(0, NO_LEAN_AHEAD)?.is_none() {
            return Ok(());
        }
        self.graphics_mode()?;
        self.balance()
    }

    /// `tcmi` inside the timecode media header.
    pub(super) fn timecode_media_info(&mut self) -> Result<()> {
        if self.full_atom_noted(0, NO_LEAN_AHEAD)?.is_none() {
            return Ok(());
        }
        let font = self.rdr.read_u16()?;
        self.field("text_font", format_args!("{:02x}", font))?;
        let face = self.rdr.read_u16()?;
        self.field("text_face", format_args!("{:02x}", face))?;
        let size = self.rdr.read_u32()?;
        self.field("text_size", util::fixed_u32(size, 16))?;
        let text_color = self.read_color()?;
        self.field("text_color", text_color)?;
        let background = self.read_color()?;
        self.field("background_color", background)?;
        let name_len = self.rdr.read_u8()?;
        self.field_string(0, format_args!("font_name: "), name_len as u64, 2)
    }

    pub(super) fn data_reference(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let count = self.rdr.read_u32()?;
        self.count_field("entries", util::u32_dec(count))?;
        for _ in 0..count {
            self.child(&DATA_REFERENCE, None)?;
        }
        Ok(())
    }

    pub(super) fn data_reference_entry(&mut self) -> Result<()> {
        if self
            .full_atom_noted(0, Some("(self reference)"))?
            .is_none()
        {
            return Ok(());
        }
        let len = self.rdr.remaining();
        if self.current_type() == FourCC(*b"url ") {
            self.field_string(0, format_args!("data: ({} bytes) url: ", len), len, 0)
        } else {
            self.line(0, format_args!("data: ({} bytes)", len))?;
            self.dump_bytes(len, 2)
        }
    }

    /// `©xxx` text: 16-bit length and language, then the string.
    pub(super) fn international_text(&mut self) -> Result<()> {
        self.header()?;
        let len = self.rdr.read_u16()?;
        let language = self.rdr.read_u16()?;
        self.field_string(
            0,
            format_args!("value: (len={},lang=0x{:04x}) ", len, language),
            len as u64,
            2,
        )
    }
}
