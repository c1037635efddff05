use crate::context::{ParseContext, SampleEntryLayout};
use crate::dumper::Dumper;
use crate::parser::Result;
use crate::registry::{SOUND_SAMPLE_ENTRY, TIMECODE_SAMPLE_ENTRY, VIDEO_SAMPLE_ENTRY};
use crate::util;
use std::io::{Read, Seek, Write};

/// Size of the generic entry header: size, format, reserved, data ref index.
const ENTRY_HEADER_SIZE: u32 = 16;

/// Bytes of the compressor name that follow its length byte.
const COMPRESSOR_NAME_SIZE: u64 = 31;

/// Largest length byte accepted. Encoders that count the length byte or a
/// trailing NUL write 32 or 33.
const MAX_COMPRESSOR_NAME_LEN: u8 = 33;

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    pub(super) fn sample_description(&mut self) -> Result<()> {
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let count = self.rdr.read_u32()?;
        self.count_field("sample_descriptions", util::u32_hex(count))?;

        for _ in 0..count {
            let size = self.rdr.read_u32()?;
            self.line(2, format_args!("size: {:08x}", size))?;
            check!(size >= ENTRY_HEADER_SIZE);

            let data_format = self.rdr.read_u32()?;
            self.line(2, format_args!("data_format: {}", util::fourcc_chars(data_format)))?;
            let reserved = self.rdr.read_vec(6)?;
            self.line(2, format_args!("reserved: {}", util::inline_bytes(&reserved)))?;
            let data_ref_index = self.rdr.read_u16()?;
            self.line(2, format_args!("data_ref_index: {}", util::u16_hex(data_ref_index)))?;

            let body = (size - ENTRY_HEADER_SIZE) as u64;
            check!(body <= self.rdr.remaining());
            let end = self.rdr.remaining() - body;

            match self.ctx.sample_entry_layout() {
                Some(SampleEntryLayout::Video) => self.video_entry(end)?,
                Some(SampleEntryLayout::Sound) => self.sound_entry(end)?,
                Some(SampleEntryLayout::Timecode) => self.timecode_entry(end)?,
                None => {}
            }

            check!(self.rdr.remaining() >= end);
            let left = self.rdr.remaining() - end;
            if left > 0 {
                tracing::warn!(
                    format = %util::fourcc_tag(data_format),
                    left,
                    "unparsed sample entry bytes"
                );
                self.line(2, format_args!("remainder...: {} unparsed bytes", left))?;
                self.dump_bytes(left, 4)?;
                self.note_unparsed(left);
            }
        }
        Ok(())
    }

    fn video_entry(&mut self, end: u64) -> Result<()> {
        let version = self.rdr.read_u16()?;
        self.line(2, format_args!("version: {}", version))?;
        let revision = self.rdr.read_u16()?;
        self.line(2, format_args!("revision: {}", util::u16_hex(revision)))?;
        let vendor = self.rdr.read_u32()?;
        self.line(2, format_args!("vendor: {}", util::fourcc_chars(vendor)))?;
        let temporal = self.rdr.read_u32()?;
        self.line(2, format_args!("temporal_quality: {}", util::u32_hex(temporal)))?;
        let spatial = self.rdr.read_u32()?;
        self.line(2, format_args!("spatial_quality: {}", util::u32_hex(spatial)))?;
        let width = self.rdr.read_u16()?;
        self.line(2, format_args!("width: {}", width))?;
        let height = self.rdr.read_u16()?;
        self.line(2, format_args!("height: {}", height))?;
        let h_res = self.rdr.read_u32()?;
        self.line(2, format_args!("horizontal_resolution: {}", util::fixed_u32(h_res, 16)))?;
        let v_res = self.rdr.read_u32()?;
        self.line(2, format_args!("vertical_resolution: {}", util::fixed_u32(v_res, 16)))?;
        let data_size = self.rdr.read_u32()?;
        self.line(2, format_args!("data_size: {}", data_size))?;
        let frame_count = self.rdr.read_u16()?;
        self.line(2, format_args!("frame_count: {}", frame_count))?;

        let name_len = self.rdr.read_u8()?;
        check!(name_len <= MAX_COMPRESSOR_NAME_LEN);
        self.field_string(2, format_args!("compressor_name: "), COMPRESSOR_NAME_SIZE, 4)?;

        let depth = self.rdr.read_u16()?;
        self.line(2, format_args!("depth: {}", depth))?;
        let color_table_id = self.rdr.read_u16()?;
        self.line(2, format_args!("color_table_id: {}", util::u16_hex(color_table_id)))?;

        self.walk_entries(&VIDEO_SAMPLE_ENTRY, end)
    }

    fn sound_entry(&mut self, end: u64) -> Result<()> {
        let version = self.rdr.read_u16()?;
        self.line(2, format_args!("version: {}", version))?;
        let revision = self.rdr.read_u16()?;
        self.line(2, format_args!("revision: {}", util::u16_hex(revision)))?;
        let vendor = self.rdr.read_u32()?;
        self.line(2, format_args!("vendor: {}", util::fourcc_chars(vendor)))?;
        let channel_count = self.rdr.read_u16()?;
        self.line(2, format_args!("channel_count: {}", channel_count))?;
        let sample_size = self.rdr.read_u16()?;
        self.line(2, format_args!("sample_size: {}", sample_size))?;
        let compression_id = self.rdr.read_i16()?;
        self.line(2, format_args!("compression_id: {}", compression_id))?;
        let packet_size = self.rdr.read_u16()?;
        self.line(2, format_args!("packet_size: {}", packet_size))?;
        let sample_rate = self.rdr.read_u32()?;
        self.line(2, format_args!("sample_rate: {}", util::fixed_u32(sample_rate, 16)))?;

        match version {
            1 => {
                for name in [
                    "samples_per_packet",
                    "bytes_per_packet",
                    "bytes_per_frame",
                    "bytes_per_sample",
                ] {
                    let v = self.rdr.read_u32()?;
                    self.line(2, format_args!("{}: {}", name, v))?;
                }
            }
            2 => self.sound_entry_v2()?,
            _ => {}
        }

        // extension atoms only follow the layouts above
        if version <= 2 {
            self.walk_entries(&SOUND_SAMPLE_ENTRY, end)?;
        }
        Ok(())
    }

    /// The QuickTime version 2 sound description block.
    fn sound_entry_v2(&mut self) -> Result<()> {
        let struct_size = self.rdr.read_u32()?;
        self.line(2, format_args!("size_of_struct_only: {}", struct_size))?;
        let rate = f64::from_bits(self.rdr.read_u64()?);
        self.line(2, format_args!("audio_sample_rate: {:.6}", rate))?;
        let channels = self.rdr.read_u32()?;
        self.line(2, format_args!("audio_channels: {}", channels))?;
        let always = self.rdr.read_u32()?;
        self.line(2, format_args!("always_7f000000: {}", util::u32_hex(always)))?;
        let bits = self.rdr.read_u32()?;
        self.line(2, format_args!("const_bits_per_channel: {}", bits))?;
        let flags = self.rdr.read_u32()?;
        self.line(2, format_args!("format_specific_flags: {}", util::u32_hex(flags)))?;
        let bytes_per_packet = self.rdr.read_u32()?;
        self.line(2, format_args!("const_bytes_per_audio_packet: {}", bytes_per_packet))?;
        let frames_per_packet = self.rdr.read_u32()?;
        self.line(2, format_args!("const_lpcm_frames_per_audio_packet: {}", frames_per_packet))
    }

    fn timecode_entry(&mut self, end: u64) -> Result<()> {
        let reserved = self.rdr.read_u32()?;
        self.line(2, format_args!("reserved: {}", util::u32_hex(reserved)))?;
        let flags = self.rdr.read_u32()?;
        self.line(2, format_args!("flags: {}", util::u32_hex(flags)))?;
        let timescale = self.rdr.read_u32()?;
        self.line(2, format_args!("timescale: {}", timescale))?;
        let frame_duration = self.rdr.read_i32()?;
        self.line(
            2,
            format_args!(
                "frame_duration: {} ({:.6} sec)",
                frame_duration,
                ParseContext::seconds(frame_duration as i64, timescale)
            ),
        )?;
        let frames = self.rdr.read_u8()?;
        self.line(2, format_args!("number_of_frames: {}", frames))?;
        let reserved = self.rdr.read_u8()?;
        self.line(2, format_args!("reserved: {}", util::u8_hex(reserved)))?;

        self.walk_entries(&TIMECODE_SAMPLE_ENTRY, end)
    }

    // ---------- sample entry extensions ----------

    pub(super) fn color_parameter(&mut self) -> Result<()> {
        self.header()?;
        let kind = self.rdr.read_u32()?;
        self.field("color_param_type", util::fourcc_tag(kind))?;
        match &kind.to_be_bytes() {
            b"nclc" | b"nclx" => {
                for name in ["primaries", "transfer_func", "matrix"] {
                    let v = self.rdr.read_u16()?;
                    self.field(name, v)?;
                }
                if &kind.to_be_bytes() == b"nclx" {
                    let range = self.rdr.read_u8()?;
                    self.field("full_range", (range & 0x80) >> 7)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub(super) fn field_handling(&mut self) -> Result<()> {
        self.header()?;
        let fields = self.rdr.read_u8()?;
        match fields {
            1 => self.field("fields", format_args!("{} (progressive)", fields))?,
            2 => self.field("fields", format_args!("{} (interlaced)", fields))?,
            _ => self.field("fields", fields)?,
        }
        let detail = self.rdr.read_u8()?;
        self.field("detail", detail)
    }

    pub(super) fn pixel_aspect_ratio(&mut self) -> Result<()> {
        self.header()?;
        let h = self.rdr.read_i32()?;
        self.field("h_spacing", h)?;
        let v = self.rdr.read_i32()?;
        self.field("v_spacing", v)
    }

    pub(super) fn clean_aperture(&mut self) -> Result<()> {
        self.header()?;
        for name in [
            "clean_aperture_width",
            "clean_aperture_height",
            "horiz_offset",
            "vert_offset",
        ] {
            let num = self.rdr.read_i32()?;
            let den = self.rdr.read_i32()?;
            self.field(name, format_args!("{}/{}", num, den))?;
        }
        Ok(())
    }

    pub(super) fn bit_rate(&mut self) -> Result<()> {
        self.header()?;
        let buffer_size = self.rdr.read_u32()?;
        self.field("buffer_size_db", format_args!("0x{:04x}", buffer_size))?;
        let max = self.rdr.read_u32()?;
        self.field("max_bitrate", max)?;
        let avg = self.rdr.read_u32()?;
        self.field("avg_bitrate", avg)
    }
}
