//! MPEG-4 object descriptors carried by `esds`.
//!
//! Each descriptor is a tag byte, a 7-bits-per-byte length of one to four
//! bytes, then `length` payload bytes. ES and decoder-config descriptors
//! contain further descriptors that must exactly fill their payload.

use crate::dumper::Dumper;
use crate::parser::{ParseError, Result};
use std::io::{Read, Seek, Write};

/// Deepest descriptor nesting accepted.
pub const MAX_DESCRIPTOR_DEPTH: usize = 32;

const MAX_LENGTH_BYTES: u32 = 4;

const ES_DESCRIPTOR: u8 = 0x03;
const DECODER_CONFIG: u8 = 0x04;
const DECODER_SPECIFIC_INFO: u8 = 0x05;
const SL_CONFIG: u8 = 0x06;

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    pub(super) fn elementary_stream_descriptor(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        self.desc_depth = 0;
        while self.rdr.remaining() > 2 {
            let budget = u32::try_from(self.rdr.remaining()).unwrap_or(u32::MAX);
            self.parse_descriptor(budget)?;
        }
        Ok(())
    }

    /// Decode one descriptor that must fit in `parent_budget` bytes and
    /// return how many bytes it occupied, header included.
    pub(crate) fn parse_descriptor(&mut self, parent_budget: u32) -> Result<u32> {
        check!(parent_budget >= 2);
        if self.desc_depth >= MAX_DESCRIPTOR_DEPTH {
            return Err(ParseError::TooDeep {
                what: "descriptors",
                limit: MAX_DESCRIPTOR_DEPTH,
            });
        }
        let base = 4 * self.desc_depth;

        self.line(base, format_args!("descriptor:"))?;
        let tag = self.rdr.read_u8()?;
        self.line(base + 2, format_args!("tag: 0x{:02x}", tag))?;

        let mut head_length = 1u32;
        let mut length = 0u32;
        loop {
            let b = self.rdr.read_u8()?;
            head_length += 1;
            length = (length << 7) | (b & 0x7f) as u32;
            if b & 0x80 == 0 {
                break;
            }
            check!(head_length - 1 < MAX_LENGTH_BYTES);
        }
        self.line(base + 2, format_args!("length: {}", length))?;
        check!(head_length as u64 + length as u64 <= parent_budget as u64);

        let used = match tag {
            ES_DESCRIPTOR => self.es_descriptor(length, base)?,
            DECODER_CONFIG => self.decoder_config(length, base)?,
            DECODER_SPECIFIC_INFO => {
                self.line(base + 2, format_args!("decoder_specific_info:"))?;
                self.dump_bytes(length as u64, base + 4)?;
                length
            }
            SL_CONFIG => self.sl_config(length, base)?,
            _ => {
                self.dump_bytes(length as u64, base + 4)?;
                length
            }
        };
        Ok(head_length + used)
    }

    /// Parse child descriptors until `remaining` bytes are used up.
    fn nested_descriptors(&mut self, mut remaining: u32) -> Result<()> {
        while remaining > 0 {
            self.desc_depth += 1;
            let used = self.parse_descriptor(remaining);
            self.desc_depth -= 1;
            remaining -= used?;
        }
        Ok(())
    }

    fn es_descriptor(&mut self, length: u32, base: usize) -> Result<u32> {
        check!(length >= 3);
        self.line(base + 2, format_args!("es_descriptor:"))?;

        let es_id = self.rdr.read_u16()?;
        self.line(base + 4, format_args!("es_id: 0x{:04x}", es_id))?;
        let flags = self.rdr.read_u8()?;
        let depends = flags & 0x80 != 0;
        let url = flags & 0x40 != 0;
        let ocr = flags & 0x20 != 0;
        self.line(base + 4, format_args!("stream_dep_flag: {}", depends as u8))?;
        self.line(base + 4, format_args!("url_flag: {}", url as u8))?;
        self.line(base + 4, format_args!("ocr_stream_flag: {}", ocr as u8))?;
        self.line(base + 4, format_args!("stream_priority: 0x{:02x}", flags & 0x1f))?;

        let mut remaining = length - 3;
        if depends {
            check!(remaining >= 2);
            let id = self.rdr.read_u16()?;
            self.line(base + 4, format_args!("dependson_es_id: 0x{:04x}", id))?;
            remaining -= 2;
        }
        if url {
            check!(remaining >= 1);
            let url_len = self.rdr.read_u8()?;
            remaining -= 1;
            check!(remaining >= url_len as u32);
            self.field_string(base + 4, format_args!("url: "), url_len as u64, base + 6)?;
            remaining -= url_len as u32;
        }
        if ocr {
            check!(remaining >= 2);
            let id = self.rdr.read_u16()?;
            self.line(base + 4, format_args!("ocr_es_id: 0x{:04x}", id))?;
            remaining -= 2;
        }

        self.nested_descriptors(remaining)?;
        Ok(length)
    }

    fn decoder_config(&mut self, length: u32, base: usize) -> Result<u32> {
        check!(length >= 13);
        self.line(base + 2, format_args!("decoder_config:"))?;

        let profile = self.rdr.read_u8()?;
        self.line(base + 4, format_args!("obj_profile_indication: 0x{:02x}", profile))?;
        let stream = self.rdr.read_u8()?;
        self.line(base + 4, format_args!("stream_type: 0x{:02x}", stream >> 2))?;
        self.line(base + 4, format_args!("up_stream: {}", (stream & 0x02) >> 1))?;
        self.line(base + 4, format_args!("reserved: {}", stream & 0x01))?;
        let buffer_size = self.rdr.read_u24()?;
        self.line(base + 4, format_args!("buffer_size_db: {}", buffer_size))?;
        let max = self.rdr.read_u32()?;
        self.line(base + 4, format_args!("max_bitrate: {}", max))?;
        let avg = self.rdr.read_u32()?;
        self.line(base + 4, format_args!("avg_bitrate: {}", avg))?;

        self.nested_descriptors(length - 13)?;
        Ok(length)
    }

    fn sl_config(&mut self, length: u32, base: usize) -> Result<u32> {
        check!(length >= 1);
        self.line(base + 2, format_args!("sl_config:"))?;
        let predefined = self.rdr.read_u8()?;
        self.line(base + 4, format_args!("predefined: 0x{:02x}", predefined))?;
        if length > 1 {
            self.dump_bytes(length as u64 - 1, base + 6)?;
        }
        Ok(length)
    }
}
