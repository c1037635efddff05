use crate::boxes::FourCC;
use crate::dumper::Dumper;
use crate::parser::Result;
use crate::registry::{METADATA, METADATA_ITEM};
use crate::util;
use std::io::{Read, Seek, Write};

const MDTA_NAMESPACE: FourCC = FourCC(*b"mdta");

/// Longest key or UTF-8 value shown as text.
const MAX_TEXT_VALUE: u32 = 128;

const WELL_KNOWN_UTF8: u32 = 1;
const WELL_KNOWN_SIGNED: u32 = 21;
const WELL_KNOWN_UNSIGNED: u32 = 22;

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    /// `meta` comes in two shapes: QuickTime puts children right after the
    /// header, ISO prefixes them with version and flags. A zero first word
    /// can only be the latter since no child atom has size zero.
    pub(super) fn metadata(&mut self) -> Result<()> {
        self.ctx.metadata_keys.clear();
        self.header()?;
        if self.rdr.peek_u32()? == Some(0) {
            let version = self.rdr.read_u8()?;
            self.field("version", version)?;
            let flags = self.rdr.read_u24()?;
            self.line(0, format_args!("flags: 0x{:06x}", flags))?;
        }
        self.walk_children(&METADATA)?;
        self.ctx.metadata_keys.clear();
        Ok(())
    }

    pub(super) fn metadata_keys(&mut self) -> Result<()> {
        self.ctx.metadata_keys.clear();
        if self.full_atom(0)?.is_none() {
            return Ok(());
        }
        let count = self.rdr.read_u32()?;
        self.count_field("key_values", util::u32_dec(count))?;

        for i in 1..=count {
            let key_size = self.rdr.read_u32()?;
            check!(key_size >= 8);
            let namespace = self.rdr.read_fourcc()?;
            let value_size = key_size - 8;
            let row = format!("{:4}  {}", i, util::u32_hex(key_size));

            if namespace == MDTA_NAMESPACE && value_size <= MAX_TEXT_VALUE {
                let value = self.rdr.read_vec(value_size as usize)?;
                if util::printable_ascii(&value) {
                    let name = String::from_utf8_lossy(&value).into_owned();
                    self.line(2, format_args!("{}  mdta  '{}'", row, name))?;
                    self.ctx.metadata_keys.push(name);
                } else {
                    self.line(2, format_args!("{}  {}", row, util::fourcc_chars(namespace.as_u32())))?;
                    self.dump_buffer(&value, 4)?;
                    self.ctx.metadata_keys.push(String::new());
                }
            } else {
                self.line(2, format_args!("{}  {}", row, util::fourcc_chars(namespace.as_u32())))?;
                self.dump_bytes(value_size as u64, 4)?;
                self.ctx.metadata_keys.push(String::new());
            }
        }
        Ok(())
    }

    /// An `ilst` entry. Its type field is the 1-based index of a key from
    /// the enclosing `meta` block's `keys` atom.
    pub(super) fn metadata_item(&mut self) -> Result<()> {
        let index = self.current_type().as_u32();
        self.header()?;

        let key_count = self.ctx.metadata_keys.len() as u64;
        check!(key_count == 0 || (1..=key_count).contains(&(index as u64)));
        match self.ctx.key_name(index).map(str::to_owned) {
            Some(name) => self.field("key_index", format_args!("{} ('{}')", index, name))?,
            None => self.field("key_index", index)?,
        }

        self.walk_children(&METADATA_ITEM)
    }

    /// `data` inside an `ilst` entry.
    pub(super) fn metadata_value(&mut self) -> Result<()> {
        self.header()?;
        let type_set = self.rdr.read_u8()?;
        let well_known = self.rdr.read_u24()?;
        self.field("type 1", type_set)?;
        self.field("type 2", well_known)?;
        let locale = self.rdr.read_u16()?;
        let country = self.rdr.read_u16()?;
        self.field("locale", locale)?;
        self.field("country", country)?;

        let left = self.rdr.remaining();
        match (type_set, well_known) {
            (0, WELL_KNOWN_SIGNED) => self.signed_value(left),
            (0, WELL_KNOWN_UNSIGNED) => self.unsigned_value(left),
            (0, WELL_KNOWN_UTF8) => self.utf8_value(left),
            _ => self.raw_value(left),
        }
    }

    fn raw_value(&mut self, size: u64) -> Result<()> {
        self.line(0, format_args!("value:"))?;
        self.dump_bytes(size, 4)
    }

    fn signed_value(&mut self, size: u64) -> Result<()> {
        let (kind, value) = match size {
            8 => ("int64", self.rdr.read_i64()?),
            4 => ("int32", self.rdr.read_i32()? as i64),
            3 => ("int24", self.rdr.read_i24()? as i64),
            2 => ("int16", self.rdr.read_i16()? as i64),
            1 => ("int8", self.rdr.read_i8()? as i64),
            _ => return self.raw_value(size),
        };
        self.line(0, format_args!("value ({}): {}", kind, value))
    }

    fn unsigned_value(&mut self, size: u64) -> Result<()> {
        let (kind, value) = match size {
            8 => ("uint64", self.rdr.read_u64()?),
            4 => ("uint32", self.rdr.read_u32()? as u64),
            3 => ("uint24", self.rdr.read_u24()? as u64),
            2 => ("uint16", self.rdr.read_u16()? as u64),
            1 => ("uint8", self.rdr.read_u8()? as u64),
            _ => return self.raw_value(size),
        };
        self.line(0, format_args!("value ({}): {}", kind, value))
    }

    fn utf8_value(&mut self, size: u64) -> Result<()> {
        if size == 0 {
            return self.field("value", "''");
        }
        if size > MAX_TEXT_VALUE as u64 {
            return self.raw_value(size);
        }
        let value = self.rdr.read_vec(size as usize)?;
        if util::printable_ascii(&value) {
            self.field("value", format_args!("'{}'", String::from_utf8_lossy(&value)))
        } else {
            self.line(0, format_args!("value:"))?;
            self.dump_buffer(&value, 4)
        }
    }
}
